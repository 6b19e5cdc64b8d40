use serde::Serialize;
use tracing::{Level, debug};

/// Logs `value` as pretty JSON at DEBUG. Serialization is skipped when DEBUG is off.
pub(crate) fn debug_json<T: Serialize>(what: &str, value: &T) {
    if !tracing::enabled!(Level::DEBUG) {
        return;
    }
    match serde_json::to_string_pretty(value) {
        Ok(json) => debug!(payload = %json, "{what}"),
        Err(error) => debug!(%error, "{what} (payload not serializable)"),
    }
}
