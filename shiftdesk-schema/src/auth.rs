use serde::{Deserialize, Serialize};

use crate::validate::{Checker, FieldError, Validate};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl Validate for LoginRequest {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut c = Checker::new();
        c.required("username", &self.username);
        if self.password.is_empty() {
            c.fail("password", "is required");
        }
        c.finish()
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

impl Validate for ChangePasswordRequest {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        Checker::new()
            .password("newPassword", &self.new_password)
            .finish()
    }
}

/// `identifier` is either a username or an email address.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ForgotPasswordRequest {
    #[serde(alias = "username", alias = "email")]
    pub identifier: String,
}

impl Validate for ForgotPasswordRequest {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        Checker::new().required("identifier", &self.identifier).finish()
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ResetPasswordRequest {
    pub token: String,
    pub password: String,
}

impl Validate for ResetPasswordRequest {
    fn validate(&self) -> Result<(), Vec<FieldError>> {
        Checker::new()
            .required("token", &self.token)
            .password("password", &self.password)
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VerifyResetTokenResponse {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
