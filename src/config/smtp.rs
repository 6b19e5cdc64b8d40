use super::lax::deserialize_opt_string_lax;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Outgoing mail settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SmtpConfig {
    /// SMTP relay host. Unset disables outgoing mail (sends fail and are logged).
    /// Env: `SMTP_HOST`.
    #[serde(default)]
    pub host: Option<String>,

    /// Env: `SMTP_PORT`. Default: `587`.
    #[serde(default = "default_smtp_port")]
    pub port: u16,

    /// Env: `SMTP_USER`.
    #[serde(default, deserialize_with = "deserialize_opt_string_lax")]
    pub user: Option<String>,

    /// Env: `SMTP_PASS`.
    #[serde(default, deserialize_with = "deserialize_opt_string_lax")]
    pub pass: Option<String>,

    /// Sender mailbox. Env: `SMTP_FROM`. Default: `Front Desk <frontdesk@localhost>`.
    #[serde(default = "default_from")]
    pub from: String,

    /// Use STARTTLS (port 587) instead of implicit TLS (port 465).
    /// Env: `SMTP_STARTTLS`. Default: `true`.
    #[serde(default = "default_true")]
    pub starttls: bool,

    /// Fallback recipients when a property has none configured.
    /// Env: `DEFAULT_RECIPIENTS` (comma separated). Default: empty.
    #[serde(default, deserialize_with = "deserialize_recipients")]
    pub default_recipients: Vec<String>,
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            host: None,
            port: default_smtp_port(),
            user: None,
            pass: None,
            from: default_from(),
            starttls: true,
            default_recipients: Vec::new(),
        }
    }
}

fn default_smtp_port() -> u16 {
    587
}

fn default_from() -> String {
    "Front Desk <frontdesk@localhost>".to_string()
}

fn default_true() -> bool {
    true
}

/// Accepts a list or a single comma separated string.
fn deserialize_recipients<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Value::deserialize(deserializer)?;

    let raw: Vec<String> = match v {
        Value::Null => Vec::new(),
        Value::String(s) => s.split(',').map(str::to_string).collect(),
        Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Value::String(s) => Ok(s),
                _ => Err(serde::de::Error::custom(
                    "expected strings in smtp.default_recipients",
                )),
            })
            .collect::<Result<_, _>>()?,
        _ => {
            return Err(serde::de::Error::custom(
                "expected a string or a list for smtp.default_recipients",
            ));
        }
    };

    Ok(raw
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn recipients_accept_comma_separated_string() {
        let cfg: SmtpConfig =
            serde_json::from_value(json!({ "default_recipients": "a@x.com, b@y.com,," }))
                .unwrap();
        assert_eq!(cfg.default_recipients, vec!["a@x.com", "b@y.com"]);
    }

    #[test]
    fn recipients_accept_list() {
        let cfg: SmtpConfig =
            serde_json::from_value(json!({ "default_recipients": ["a@x.com"] })).unwrap();
        assert_eq!(cfg.default_recipients, vec!["a@x.com"]);
        assert_eq!(cfg.port, 587);
        assert!(cfg.starttls);
    }
}
