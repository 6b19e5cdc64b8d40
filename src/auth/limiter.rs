use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};
use std::num::NonZeroU32;
use std::sync::Arc;
use tracing::warn;

use crate::error::DeskError;

/// Per-identifier attempt budget for login and password-reset requests.
#[derive(Clone)]
pub struct AuthLimiter {
    inner: Arc<DefaultKeyedRateLimiter<String>>,
}

impl AuthLimiter {
    pub fn per_minute(attempts: NonZeroU32) -> Self {
        Self {
            inner: Arc::new(RateLimiter::keyed(Quota::per_minute(attempts))),
        }
    }

    /// Keys are case-folded so `Admin` and `admin` share a budget.
    pub fn check(&self, scope: &str, key: &str) -> Result<(), DeskError> {
        let key = format!("{scope}:{}", key.trim().to_ascii_lowercase());
        self.inner.check_key(&key).map_err(|_| {
            warn!(scope, "auth rate limit hit");
            DeskError::RateLimited
        })
    }
}

impl Default for AuthLimiter {
    fn default() -> Self {
        Self::per_minute(NonZeroU32::new(10).unwrap_or(NonZeroU32::MIN))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn budget_is_per_key() {
        let limiter = AuthLimiter::per_minute(NonZeroU32::new(2).unwrap());
        assert!(limiter.check("login", "alice").is_ok());
        assert!(limiter.check("login", "ALICE").is_ok());
        assert!(matches!(
            limiter.check("login", "alice"),
            Err(DeskError::RateLimited)
        ));
        assert!(limiter.check("login", "bob").is_ok());
        assert!(limiter.check("forgot", "alice").is_ok());
    }
}
