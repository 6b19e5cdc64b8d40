use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Serialize;
use serde_json::{Value, json};
use shiftdesk_schema::FieldError;
use thiserror::Error as ThisError;
use tracing::error;

#[derive(Debug, ThisError)]
pub enum DeskError {
    #[error("Validation failed: {message}")]
    Validation {
        message: String,
        errors: Vec<FieldError>,
    },

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Authentication required")]
    Unauthorized,

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Insufficient permissions")]
    Forbidden,

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Too many requests")]
    RateLimited,

    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("No email recipients configured")]
    NoRecipients,

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Password hash error: {0}")]
    HashError(#[from] bcrypt::BcryptError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Mail error: {0}")]
    MailError(String),

    #[error("Render error: {0}")]
    RenderError(String),

    #[error("Ractor error: {0}")]
    RactorError(String),

    #[error("Unexpected error: {0}")]
    UnexpectedError(String),
}

impl DeskError {
    pub fn validation(errors: Vec<FieldError>) -> Self {
        DeskError::Validation {
            message: "Request validation failed.".to_string(),
            errors,
        }
    }

    pub fn invalid(field: &str, message: impl Into<String>) -> Self {
        Self::validation(vec![FieldError::new(field, message)])
    }

    /// Map a UNIQUE violation to `Conflict`, pass everything else through.
    pub fn from_unique(err: sqlx::Error, what: &str) -> Self {
        let is_unique = err
            .as_database_error()
            .is_some_and(|db| db.is_unique_violation());
        if is_unique {
            DeskError::Conflict(format!("{what} already exists"))
        } else {
            DeskError::DatabaseError(err)
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, DeskError::NotFound(_))
    }
}

impl From<JsonRejection> for DeskError {
    fn from(rejection: JsonRejection) -> Self {
        DeskError::invalid("body", rejection.body_text())
    }
}

impl From<QueryRejection> for DeskError {
    fn from(rejection: QueryRejection) -> Self {
        DeskError::invalid("query", rejection.body_text())
    }
}

impl From<PathRejection> for DeskError {
    fn from(rejection: PathRejection) -> Self {
        DeskError::invalid("path", rejection.body_text())
    }
}

impl IntoResponse for DeskError {
    fn into_response(self) -> axum::response::Response {
        let (status, error_body) = match self {
            DeskError::Validation { message, errors } => {
                let details = (!errors.is_empty()).then(|| json!({ "errors": errors }));
                (
                    StatusCode::BAD_REQUEST,
                    ApiErrorObject {
                        code: "VALIDATION_ERROR".to_string(),
                        message,
                        details,
                    },
                )
            }

            DeskError::InvalidToken => (
                StatusCode::BAD_REQUEST,
                ApiErrorObject {
                    code: "INVALID_TOKEN".to_string(),
                    message: "Invalid or expired reset token.".to_string(),
                    details: None,
                },
            ),

            DeskError::NoRecipients => (
                StatusCode::BAD_REQUEST,
                ApiErrorObject {
                    code: "NO_RECIPIENTS".to_string(),
                    message: "No email recipients are configured for this property.".to_string(),
                    details: None,
                },
            ),

            DeskError::NotFound(what) => (
                StatusCode::NOT_FOUND,
                ApiErrorObject {
                    code: "NOT_FOUND".to_string(),
                    message: format!("{what} not found."),
                    details: None,
                },
            ),

            DeskError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                ApiErrorObject {
                    code: "UNAUTHORIZED".to_string(),
                    message: "Authentication required.".to_string(),
                    details: None,
                },
            ),

            DeskError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                ApiErrorObject {
                    code: "INVALID_CREDENTIALS".to_string(),
                    message: "Invalid username or password.".to_string(),
                    details: None,
                },
            ),

            DeskError::Forbidden => (
                StatusCode::FORBIDDEN,
                ApiErrorObject {
                    code: "FORBIDDEN".to_string(),
                    message: "You do not have permission to perform this action.".to_string(),
                    details: None,
                },
            ),

            DeskError::Conflict(message) => (
                StatusCode::CONFLICT,
                ApiErrorObject {
                    code: "CONFLICT".to_string(),
                    message,
                    details: None,
                },
            ),

            DeskError::RateLimited => (
                StatusCode::TOO_MANY_REQUESTS,
                ApiErrorObject {
                    code: "RATE_LIMIT".to_string(),
                    message: "Too many attempts, try again later.".to_string(),
                    details: None,
                },
            ),

            other @ (DeskError::DatabaseError(_)
            | DeskError::JsonError(_)
            | DeskError::CsvError(_)
            | DeskError::HashError(_)
            | DeskError::IoError(_)
            | DeskError::MailError(_)
            | DeskError::RenderError(_)
            | DeskError::RactorError(_)
            | DeskError::UnexpectedError(_)) => {
                error!(error = %other, "request failed with internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiErrorObject {
                        code: "INTERNAL_ERROR".to_string(),
                        message: "An internal server error occurred.".to_string(),
                        details: None,
                    },
                )
            }
        };
        (status, Json(ApiErrorBody { inner: error_body })).into_response()
    }
}

/// Standardized API error response payload.
#[derive(Serialize)]
pub struct ApiErrorObject {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

#[derive(Serialize)]
pub struct ApiErrorBody {
    #[serde(rename = "error")]
    pub inner: ApiErrorObject,
}
