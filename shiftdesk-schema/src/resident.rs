use serde::{Deserialize, Serialize};
use shiftdesk_core::ColumnMapping;

use crate::validate::{Checker, FieldError, MAX_LONG_TEXT_LEN, Validate};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ResidentCreate {
    pub name: String,
    pub unit: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub notes: Option<String>,
}

impl Validate for ResidentCreate {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        Checker::new()
            .required("name", &self.name)
            .present("unit", self.unit.as_deref())
            .present("phone", self.phone.as_deref())
            .email("email", self.email.as_deref())
            .max_len("notes", self.notes.as_deref(), MAX_LONG_TEXT_LEN)
            .finish()
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ResidentPatch {
    /// `None` => do not change; `Some(v)` => update
    pub name: Option<String>,
    pub unit: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub notes: Option<String>,
}

impl Validate for ResidentPatch {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        Checker::new()
            .present("name", self.name.as_deref())
            .present("unit", self.unit.as_deref())
            .present("phone", self.phone.as_deref())
            .email("email", self.email.as_deref())
            .max_len("notes", self.notes.as_deref(), MAX_LONG_TEXT_LEN)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ResidentImportResponse {
    pub imported: usize,
    pub skipped: usize,
    pub mapping: ColumnMapping,
}
