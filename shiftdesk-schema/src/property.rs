use serde::{Deserialize, Serialize};

use crate::validate::{Checker, FieldError, Validate};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PropertyCreate {
    pub name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
}

impl Validate for PropertyCreate {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        Checker::new()
            .required("name", &self.name)
            .present("address", self.address.as_deref())
            .present("phone", self.phone.as_deref())
            .finish()
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PropertyPatch {
    /// `None` => do not change; `Some(v)` => update
    pub name: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
}

impl Validate for PropertyPatch {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        Checker::new()
            .present("name", self.name.as_deref())
            .present("address", self.address.as_deref())
            .present("phone", self.phone.as_deref())
            .finish()
    }
}
