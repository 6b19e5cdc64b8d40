use serde::{Deserialize, Serialize};

use crate::validate::{Checker, FieldError, Validate};

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailSettingsUpsert {
    #[serde(default)]
    pub recipients: Vec<String>,
    #[serde(default = "default_true")]
    pub auto_send: bool,
    #[serde(default = "default_true")]
    pub attach_pdf: bool,
    #[serde(default)]
    pub attach_csv: bool,
}

fn default_true() -> bool {
    true
}

impl Validate for EmailSettingsUpsert {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut c = Checker::new();
        for (idx, r) in self.recipients.iter().enumerate() {
            c.email(&format!("recipients[{idx}]"), Some(r.as_str()));
        }
        c.finish()
    }
}
