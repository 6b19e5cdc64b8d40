use serde::{Deserialize, Serialize};
use shiftdesk_core::RosterRange;

use crate::validate::{Checker, FieldError, Validate};

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentShiftCreate {
    pub shift_range: RosterRange,
    pub agent_name: String,
}

impl Validate for AgentShiftCreate {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        Checker::new().required("agentName", &self.agent_name).finish()
    }
}
