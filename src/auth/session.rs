use axum_extra::extract::cookie::{Cookie, SameSite};
use chrono::{DateTime, Utc};
use time::Duration;

pub const SESSION_COOKIE: &str = "shiftdesk_session";

/// Sessions older than this are rejected even if the browser still sends the cookie.
pub const SESSION_TTL_HOURS: i64 = 12;

/// Contents of the encrypted session cookie: `"<user id>.<issued at, unix seconds>"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Session {
    pub user_id: i64,
    pub issued_at: i64,
}

impl Session {
    pub fn new(user_id: i64, now: DateTime<Utc>) -> Self {
        Self {
            user_id,
            issued_at: now.timestamp(),
        }
    }

    pub fn encode(&self) -> String {
        format!("{}.{}", self.user_id, self.issued_at)
    }

    pub fn decode(raw: &str) -> Option<Self> {
        let (user_id, issued_at) = raw.split_once('.')?;
        Some(Self {
            user_id: user_id.parse().ok()?,
            issued_at: issued_at.parse().ok()?,
        })
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        let age = now.timestamp() - self.issued_at;
        !(0..SESSION_TTL_HOURS * 3600).contains(&age)
    }

    pub fn cookie(&self, secure: bool) -> Cookie<'static> {
        Cookie::build((SESSION_COOKIE, self.encode()))
            .path("/")
            .http_only(true)
            .secure(secure)
            .same_site(SameSite::Lax)
            .max_age(Duration::hours(SESSION_TTL_HOURS))
            .build()
    }
}

/// Cookie that clears the session on the client.
pub fn removal_cookie() -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE).path("/").build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;

    #[test]
    fn cookie_value_round_trips() {
        let session = Session::new(42, Utc::now());
        assert_eq!(Session::decode(&session.encode()), Some(session));
        assert_eq!(Session::decode("42"), None);
        assert_eq!(Session::decode("x.1"), None);
    }

    #[test]
    fn sessions_expire_after_twelve_hours() {
        let issued = Utc::now();
        let session = Session::new(1, issued);
        assert!(!session.is_expired(issued + TimeDelta::hours(11)));
        assert!(session.is_expired(issued + TimeDelta::hours(12)));
        // issued in the future: clock skew or tampering
        assert!(session.is_expired(issued - TimeDelta::minutes(5)));
    }
}
