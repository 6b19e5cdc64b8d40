use serde::{Deserialize, Serialize};
use shiftdesk_core::Shift;

use crate::validate::{Checker, FieldError, Validate};

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DutyTemplateCreate {
    pub shift: Shift,
    pub task: String,
    pub sort_order: Option<i64>,
    pub active: Option<bool>,
}

impl Validate for DutyTemplateCreate {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        Checker::new()
            .required("task", &self.task)
            .non_negative("sortOrder", self.sort_order)
            .finish()
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DutyTemplatePatch {
    /// `None` => do not change; `Some(v)` => update
    pub shift: Option<Shift>,
    pub task: Option<String>,
    pub sort_order: Option<i64>,
    pub active: Option<bool>,
}

impl Validate for DutyTemplatePatch {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        Checker::new()
            .present("task", self.task.as_deref())
            .non_negative("sortOrder", self.sort_order)
            .finish()
    }
}
