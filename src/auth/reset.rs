use base64::Engine as _;
use chrono::{DateTime, TimeDelta, Utc};
use rand::RngCore;
use url::Url;

/// Reset links stay valid for one hour.
pub const RESET_TOKEN_TTL_MINUTES: i64 = 60;

pub fn generate_token() -> String {
    // 256 bits => 43 chars base64url (no padding).
    let mut bytes = [0u8; 32];
    rand::rng().fill_bytes(&mut bytes);
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}

pub fn expires_at(now: DateTime<Utc>) -> DateTime<Utc> {
    now + TimeDelta::minutes(RESET_TOKEN_TTL_MINUTES)
}

/// `<public_url>/reset-password?token=...`
pub fn reset_link(public_url: &Url, token: &str) -> String {
    let mut url = public_url.clone();
    url.set_path("/reset-password");
    url.query_pairs_mut().clear().append_pair("token", token);
    url.to_string()
}

pub fn reset_email_body(username: &str, link: &str) -> String {
    format!(
        "Hello {username},\n\n\
         A password reset was requested for your front desk account.\n\
         Open the link below within {RESET_TOKEN_TTL_MINUTES} minutes to choose a new password:\n\n\
         {link}\n\n\
         If you did not request this, you can ignore this email.\n"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_are_url_safe_and_unique() {
        let a = generate_token();
        let b = generate_token();
        assert_eq!(a.len(), 43);
        assert_ne!(a, b);
        assert!(a.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[test]
    fn link_points_at_reset_page() {
        let base = Url::parse("https://desk.example.com/app/").unwrap();
        assert_eq!(
            reset_link(&base, "abc"),
            "https://desk.example.com/reset-password?token=abc"
        );
    }
}
