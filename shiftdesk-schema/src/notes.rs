use serde::{Deserialize, Serialize};

use crate::validate::{Checker, FieldError, MAX_LONG_TEXT_LEN, Validate};

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotesUpsert {
    pub content: String,
    pub agent_name: Option<String>,
}

impl Validate for NotesUpsert {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        Checker::new()
            .max_len("content", Some(self.content.as_str()), MAX_LONG_TEXT_LEN)
            .present("agentName", self.agent_name.as_deref())
            .finish()
    }
}
