use serde::{Deserialize, Serialize};
use shiftdesk_core::Role;

use crate::validate::{Checker, FieldError, Validate};

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserCreateRequest {
    pub username: String,
    pub password: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
    #[serde(default = "default_role")]
    pub role: Role,
}

fn default_role() -> Role {
    Role::Agent
}

impl Validate for UserCreateRequest {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut c = Checker::new();
        c.required("username", &self.username)
            .password("password", &self.password)
            .email("email", self.email.as_deref())
            .present("displayName", self.display_name.as_deref());
        if self.username.contains(char::is_whitespace) {
            c.fail("username", "must not contain whitespace");
        }
        c.finish()
    }
}

/// `password`, when present, replaces the user's password (manager reset).
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPatchRequest {
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub role: Option<Role>,
    pub password: Option<String>,
}

impl Validate for UserPatchRequest {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut c = Checker::new();
        c.email("email", self.email.as_deref())
            .present("displayName", self.display_name.as_deref());
        if let Some(password) = self.password.as_deref() {
            c.password("password", password);
        }
        c.finish()
    }
}
