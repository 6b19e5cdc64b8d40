mod basic;
mod lax;
mod smtp;

pub use basic::BasicConfig;
pub use smtp::SmtpConfig;

use chrono_tz::Tz;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Scheduled report dispatch settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DispatchConfig {
    /// Run the 07:00 / 15:00 / 23:00 dispatcher.
    /// TOML: `dispatch.enabled`. Default: `true`.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
        }
    }
}

fn default_enabled() -> bool {
    true
}

/// Application configuration managed by Figment.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    /// Core server configuration (see `basic` table in config.toml).
    #[serde(default)]
    pub basic: BasicConfig,

    /// Outgoing mail (see `smtp` table in config.toml).
    #[serde(default)]
    pub smtp: SmtpConfig,

    #[serde(default)]
    pub dispatch: DispatchConfig,
}

const DEFAULT_CONFIG_FILE: &str = "config.toml";

/// Plain environment variables mapped onto the `basic` table.
const BASIC_ENV_KEYS: [&str; 9] = [
    "listen_addr",
    "listen_port",
    "database_url",
    "loglevel",
    "timezone",
    "public_url",
    "session_secret",
    "admin_username",
    "admin_password",
];

impl Config {
    /// Builds a Figment that merges defaults, an optional config TOML file and the environment.
    ///
    /// Environment wins: `SMTP_*` maps onto the `smtp` table, `DEFAULT_RECIPIENTS` onto
    /// `smtp.default_recipients`, and the keys in `BASIC_ENV_KEYS` onto `basic`.
    pub fn figment() -> Figment {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));
        if PathBuf::from(DEFAULT_CONFIG_FILE).is_file() {
            figment = figment.merge(Toml::file(DEFAULT_CONFIG_FILE));
        }
        figment
            .merge(
                Env::raw()
                    .only(&BASIC_ENV_KEYS)
                    .map(|k| format!("basic.{}", k.as_str().to_ascii_lowercase()).into()),
            )
            .merge(
                Env::prefixed("SMTP_")
                    .map(|k| format!("smtp.{}", k.as_str().to_ascii_lowercase()).into()),
            )
            .merge(
                Env::raw()
                    .only(&["default_recipients"])
                    .map(|_| "smtp.default_recipients".into()),
            )
    }

    pub fn load() -> Result<Self, figment::Error> {
        Self::figment().extract()
    }

    /// Resolved time zone; `None` means the host's local time.
    pub fn timezone(&self) -> Result<Option<Tz>, String> {
        self.basic
            .timezone
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|name| {
                name.parse::<Tz>()
                    .map_err(|e| format!("invalid basic.timezone {name:?}: {e}"))
            })
            .transpose()
    }

    /// Checks settings that cannot be expressed through serde defaults.
    pub fn validate(&self) -> Result<(), String> {
        self.timezone()?;
        if self
            .basic
            .session_secret
            .as_deref()
            .is_some_and(|secret| secret.len() < 32)
        {
            return Err("basic.session_secret must be at least 32 bytes".to_string());
        }
        if self.basic.database_url.trim().is_empty() {
            return Err("basic.database_url must be set".to_string());
        }
        Ok(())
    }
}
