use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use shiftdesk_core::Shift;

use crate::validate::{Checker, FieldError, MAX_LONG_TEXT_LEN, Validate};

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckinCreate {
    pub shift: Shift,
    pub guest_name: String,
    pub unit: Option<String>,
    pub resident_id: Option<i64>,
    pub purpose: Option<String>,
    #[serde(default)]
    pub id_verified: bool,
    /// Local wall-clock time; the server fills in "now" when absent.
    pub checked_in_at: Option<NaiveDateTime>,
    pub notes: Option<String>,
}

impl Validate for CheckinCreate {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        Checker::new()
            .required("guestName", &self.guest_name)
            .present("unit", self.unit.as_deref())
            .present("purpose", self.purpose.as_deref())
            .max_len("notes", self.notes.as_deref(), MAX_LONG_TEXT_LEN)
            .finish()
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckinPatch {
    /// `None` => do not change; `Some(v)` => update
    pub guest_name: Option<String>,
    pub unit: Option<String>,
    pub purpose: Option<String>,
    pub id_verified: Option<bool>,
    pub checked_out_at: Option<NaiveDateTime>,
    pub notes: Option<String>,
}

impl Validate for CheckinPatch {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        Checker::new()
            .present("guestName", self.guest_name.as_deref())
            .present("unit", self.unit.as_deref())
            .present("purpose", self.purpose.as_deref())
            .max_len("notes", self.notes.as_deref(), MAX_LONG_TEXT_LEN)
            .finish()
    }
}
