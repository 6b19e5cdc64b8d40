pub mod columns;
pub mod package;
pub mod policy;
pub mod role;
pub mod roster;
pub mod schedule;
pub mod shift;
pub mod status;

pub use columns::{ColumnMapping, auto_map_columns};
pub use package::PackageStatus;
pub use policy::{PasswordRule, password_violations};
pub use role::Role;
pub use roster::{RosterEntry, RosterRange, match_assignment};
pub use schedule::{
    DISPATCH_TRIGGERS, DispatchTrigger, ended_shift_at, next_trigger, previous_trigger,
};
pub use shift::{Shift, classify_shift};
pub use status::{ShiftStatusEntry, ShiftStatusMap};

use std::fmt;

/// A label that is not one of the known values for its kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseLabelError {
    kind: &'static str,
    value: String,
}

impl ParseLabelError {
    pub(crate) fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

impl fmt::Display for ParseLabelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown {}: {:?}", self.kind, self.value)
    }
}

impl std::error::Error for ParseLabelError {}
