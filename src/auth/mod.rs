//! Credentials, sessions and the throttling in front of them.

pub mod limiter;
pub mod password;
pub mod reset;
pub mod session;

pub use limiter::AuthLimiter;
pub use password::{hash_password, verify_password};
pub use session::{SESSION_COOKIE, Session};
