use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use shiftdesk_core::{PackageStatus, Shift};

use crate::validate::{Checker, FieldError, MAX_LONG_TEXT_LEN, Validate};

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageCreate {
    pub shift: Shift,
    pub recipient_name: String,
    pub unit: Option<String>,
    pub carrier: Option<String>,
    pub tracking_number: Option<String>,
    /// Local wall-clock time; the server fills in "now" when absent.
    pub received_at: Option<NaiveDateTime>,
    pub notes: Option<String>,
}

impl Validate for PackageCreate {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        Checker::new()
            .required("recipientName", &self.recipient_name)
            .present("unit", self.unit.as_deref())
            .present("carrier", self.carrier.as_deref())
            .present("trackingNumber", self.tracking_number.as_deref())
            .max_len("notes", self.notes.as_deref(), MAX_LONG_TEXT_LEN)
            .finish()
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PackagePatch {
    /// `None` => do not change; `Some(v)` => update
    pub recipient_name: Option<String>,
    pub unit: Option<String>,
    pub carrier: Option<String>,
    pub tracking_number: Option<String>,
    pub status: Option<PackageStatus>,
    pub picked_up_at: Option<NaiveDateTime>,
    pub picked_up_by: Option<String>,
    pub notes: Option<String>,
}

impl Validate for PackagePatch {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        Checker::new()
            .present("recipientName", self.recipient_name.as_deref())
            .present("unit", self.unit.as_deref())
            .present("carrier", self.carrier.as_deref())
            .present("trackingNumber", self.tracking_number.as_deref())
            .present("pickedUpBy", self.picked_up_by.as_deref())
            .max_len("notes", self.notes.as_deref(), MAX_LONG_TEXT_LEN)
            .finish()
    }
}

/// Shelf count taken at the end of a shift.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageAuditUpsert {
    pub packages_on_hand: i64,
    pub discrepancies: Option<String>,
    pub audited_by: Option<String>,
}

impl Validate for PackageAuditUpsert {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        Checker::new()
            .non_negative("packagesOnHand", Some(self.packages_on_hand))
            .max_len("discrepancies", self.discrepancies.as_deref(), MAX_LONG_TEXT_LEN)
            .present("auditedBy", self.audited_by.as_deref())
            .finish()
    }
}
