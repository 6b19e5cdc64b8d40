use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use shiftdesk_core::Shift;

use crate::validate::{Checker, FieldError, Validate};

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportCreate {
    pub property_id: i64,
    pub report_date: NaiveDate,
    pub agent_name: Option<String>,
    pub current_shift: Option<Shift>,
}

impl Validate for ReportCreate {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut c = Checker::new();
        if self.property_id <= 0 {
            c.fail("propertyId", "must be a positive id");
        }
        c.present("agentName", self.agent_name.as_deref()).finish()
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportPatch {
    /// `None` => do not change; `Some(v)` => update
    pub agent_name: Option<String>,
    pub current_shift: Option<Shift>,
}

impl Validate for ReportPatch {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        Checker::new()
            .present("agentName", self.agent_name.as_deref())
            .finish()
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportQuery {
    pub property_id: Option<i64>,
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendEmailRequest {
    /// Overrides the property's configured recipients.
    pub recipients: Option<Vec<String>>,
    /// Shift named in the subject line; defaults to the report's current shift.
    pub shift: Option<Shift>,
}

impl Validate for SendEmailRequest {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut c = Checker::new();
        for (idx, r) in self.recipients.iter().flatten().enumerate() {
            c.email(&format!("recipients[{idx}]"), Some(r.as_str()));
        }
        c.finish()
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DispatchRunRequest {
    pub shift: Option<Shift>,
    pub date: Option<NaiveDate>,
}

impl Validate for DispatchRunRequest {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        Ok(())
    }
}

/// Outcome of one scheduled (or manual) dispatch pass.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct DispatchSummary {
    pub date: NaiveDate,
    pub shift: Shift,
    pub sent: usize,
    pub skipped: usize,
    pub failed: usize,
}
