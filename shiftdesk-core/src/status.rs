use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::Shift;

/// Completion and delivery state of one shift on a report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftStatusEntry {
    #[serde(default)]
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub sent: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sent_at: Option<DateTime<Utc>>,
}

/// Per-report status blob keyed by shift label, e.g.
/// `{"1st": {"completed": true, "sent": true, "sentAt": "..."}}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShiftStatusMap(BTreeMap<Shift, ShiftStatusEntry>);

impl ShiftStatusMap {
    pub fn get(&self, shift: Shift) -> Option<&ShiftStatusEntry> {
        self.0.get(&shift)
    }

    pub fn is_sent(&self, shift: Shift) -> bool {
        self.0.get(&shift).is_some_and(|e| e.sent)
    }

    pub fn is_completed(&self, shift: Shift) -> bool {
        self.0.get(&shift).is_some_and(|e| e.completed)
    }

    /// Returns `false` if the shift was already marked sent; the first timestamp is kept.
    pub fn mark_sent(&mut self, shift: Shift, at: DateTime<Utc>) -> bool {
        let entry = self.0.entry(shift).or_default();
        if entry.sent {
            return false;
        }
        entry.sent = true;
        entry.sent_at = Some(at);
        true
    }

    pub fn mark_completed(&mut self, shift: Shift, at: DateTime<Utc>) {
        let entry = self.0.entry(shift).or_default();
        if !entry.completed {
            entry.completed = true;
            entry.completed_at = Some(at);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Shift, &ShiftStatusEntry)> {
        self.0.iter()
    }
}
