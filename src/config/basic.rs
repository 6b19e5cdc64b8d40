use super::lax::deserialize_opt_string_lax;
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr};
use url::Url;

/// Basic (core) configuration managed by Figment.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BasicConfig {
    /// HTTP server listen address (e.g., "0.0.0.0", "127.0.0.1").
    /// TOML: `basic.listen_addr`. Env: `LISTEN_ADDR`. Default: `0.0.0.0`.
    #[serde(default = "default_listen_ip")]
    pub listen_addr: IpAddr,

    /// HTTP server listen port.
    /// TOML: `basic.listen_port`. Env: `LISTEN_PORT`. Default: `5000`.
    #[serde(default = "default_listen_port")]
    pub listen_port: u16,

    /// Database URL for SQLite.
    /// TOML: `basic.database_url`. Env: `DATABASE_URL`. Default: `sqlite://shiftdesk.db`.
    #[serde(default)]
    pub database_url: String,

    /// Log level for tracing subscriber initialization (e.g., "error", "warn", "info", "debug", "trace").
    /// TOML: `basic.loglevel`. Env: `LOGLEVEL`. Default: `info`.
    #[serde(default)]
    pub loglevel: String,

    /// IANA time zone used for shift classification and the dispatch schedule
    /// (e.g. "America/New_York"). Unset means the host's local time.
    /// TOML: `basic.timezone`. Env: `TIMEZONE`.
    #[serde(default)]
    pub timezone: Option<String>,

    /// Externally reachable base URL, used to build password reset links.
    /// TOML: `basic.public_url`. Env: `PUBLIC_URL`. Default: `http://localhost:5000`.
    #[serde(default = "default_public_url")]
    pub public_url: Url,

    /// Secret the session cookie key is derived from; at least 32 bytes.
    /// Unset means a random key per process (sessions do not survive restarts).
    /// TOML: `basic.session_secret`. Env: `SESSION_SECRET`.
    #[serde(default, deserialize_with = "deserialize_opt_string_lax")]
    pub session_secret: Option<String>,

    /// Drop the `Secure` flag on the session cookie (plain-HTTP development only).
    /// TOML: `basic.insecure_cookie`. Default: `false`.
    #[serde(default)]
    pub insecure_cookie: bool,

    /// Manager account created when the users table is empty.
    /// TOML: `basic.admin_username`. Default: `admin`.
    #[serde(default = "default_admin_username")]
    pub admin_username: String,

    /// Password for the bootstrap manager. Unset skips bootstrapping.
    /// TOML: `basic.admin_password`. Env: `ADMIN_PASSWORD`.
    #[serde(default, deserialize_with = "deserialize_opt_string_lax")]
    pub admin_password: Option<String>,
}

impl Default for BasicConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_ip(),
            listen_port: default_listen_port(),
            database_url: "sqlite://shiftdesk.db".to_string(),
            loglevel: "info".to_string(),
            timezone: None,
            public_url: default_public_url(),
            session_secret: None,
            insecure_cookie: false,
            admin_username: default_admin_username(),
            admin_password: None,
        }
    }
}

/// Default IP address for the HTTP server listen address.
fn default_listen_ip() -> IpAddr {
    Ipv4Addr::new(0, 0, 0, 0).into()
}

/// Default port for the HTTP server.
fn default_listen_port() -> u16 {
    5000
}

fn default_public_url() -> Url {
    Url::parse("http://localhost:5000").expect("valid default public url")
}

fn default_admin_username() -> String {
    "admin".to_string()
}
