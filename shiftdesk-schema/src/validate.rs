use serde::Serialize;
use shiftdesk_core::password_violations;

/// A single rejected field in a request payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Payload-level checks run after deserialization succeeded.
pub trait Validate {
    fn validate(&self) -> Result<(), Vec<FieldError>>;
}

pub const MAX_TEXT_LEN: usize = 200;
pub const MAX_LONG_TEXT_LEN: usize = 10_000;

/// Collects field errors; `finish()` turns them into the `Validate` result.
#[derive(Debug, Default)]
pub struct Checker {
    errors: Vec<FieldError>,
}

impl Checker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail(&mut self, field: &str, message: impl Into<String>) -> &mut Self {
        self.errors.push(FieldError::new(field, message));
        self
    }

    pub fn required(&mut self, field: &str, value: &str) -> &mut Self {
        if value.trim().is_empty() {
            self.fail(field, "is required");
        } else if value.chars().count() > MAX_TEXT_LEN {
            self.fail(field, format!("must be at most {MAX_TEXT_LEN} characters"));
        }
        self
    }

    /// Same as `required` but only when the field is present.
    pub fn present(&mut self, field: &str, value: Option<&str>) -> &mut Self {
        if let Some(v) = value {
            self.required(field, v);
        }
        self
    }

    pub fn max_len(&mut self, field: &str, value: Option<&str>, max: usize) -> &mut Self {
        if value.is_some_and(|v| v.chars().count() > max) {
            self.fail(field, format!("must be at most {max} characters"));
        }
        self
    }

    pub fn email(&mut self, field: &str, value: Option<&str>) -> &mut Self {
        if value.is_some_and(|v| !looks_like_email(v)) {
            self.fail(field, "must be a valid email address");
        }
        self
    }

    pub fn non_negative(&mut self, field: &str, value: Option<i64>) -> &mut Self {
        if value.is_some_and(|v| v < 0) {
            self.fail(field, "must not be negative");
        }
        self
    }

    pub fn password(&mut self, field: &str, value: &str) -> &mut Self {
        for rule in password_violations(value) {
            self.fail(field, rule.message());
        }
        self
    }

    pub fn finish(&mut self) -> Result<(), Vec<FieldError>> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(std::mem::take(&mut self.errors))
        }
    }
}

/// Minimal shape check: one `@`, non-empty local part, a dot in the domain.
pub fn looks_like_email(value: &str) -> bool {
    let value = value.trim();
    match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !value.contains(char::is_whitespace)
        }
        None => false,
    }
}
