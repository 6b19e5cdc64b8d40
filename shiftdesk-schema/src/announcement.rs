use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::validate::{Checker, FieldError, MAX_LONG_TEXT_LEN, Validate};

/// `property_id = None` publishes to every property.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnouncementCreate {
    pub property_id: Option<i64>,
    pub title: String,
    pub message: String,
    pub expires_at: Option<DateTime<Utc>>,
}

impl Validate for AnnouncementCreate {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut c = Checker::new();
        c.required("title", &self.title);
        if self.message.trim().is_empty() {
            c.fail("message", "is required");
        }
        c.max_len("message", Some(self.message.as_str()), MAX_LONG_TEXT_LEN)
            .finish()
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnouncementQuery {
    pub property_id: Option<i64>,
}
