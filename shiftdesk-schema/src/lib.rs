//! Request and response payloads of the front-desk HTTP API.
//!
//! Request types double as the create/patch payloads accepted by the storage layer.

pub mod agent;
pub mod announcement;
pub mod auth;
pub mod checkin;
pub mod duty;
pub mod email;
pub mod notes;
pub mod package;
pub mod property;
pub mod report;
pub mod resident;
pub mod template;
pub mod user;
pub mod validate;

pub use auth::{
    ChangePasswordRequest, ForgotPasswordRequest, LoginRequest, MessageResponse,
    ResetPasswordRequest, VerifyResetTokenResponse,
};
pub use report::{DispatchRunRequest, DispatchSummary, ReportQuery, SendEmailRequest};
pub use validate::{FieldError, Validate};
