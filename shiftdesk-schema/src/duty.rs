use serde::{Deserialize, Serialize};
use shiftdesk_core::Shift;

use crate::validate::{Checker, FieldError, Validate};

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DutyCreate {
    pub shift: Shift,
    pub task: String,
    pub sort_order: Option<i64>,
}

impl Validate for DutyCreate {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        Checker::new()
            .required("task", &self.task)
            .non_negative("sortOrder", self.sort_order)
            .finish()
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DutyPatch {
    /// `None` => do not change; `Some(v)` => update
    pub task: Option<String>,
    pub completed: Option<bool>,
    pub completed_by: Option<String>,
    pub sort_order: Option<i64>,
}

impl Validate for DutyPatch {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        Checker::new()
            .present("task", self.task.as_deref())
            .present("completedBy", self.completed_by.as_deref())
            .non_negative("sortOrder", self.sort_order)
            .finish()
    }
}
