use chrono::{Duration, NaiveDateTime, NaiveTime};

use crate::Shift;

/// A fixed wall-clock time at which the report for the shift that just ended is mailed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchTrigger {
    pub hour: u32,
    pub ended: Shift,
}

impl DispatchTrigger {
    pub fn time(&self) -> NaiveTime {
        NaiveTime::MIN + Duration::hours(i64::from(self.hour))
    }
}

/// Ordered by hour of day.
pub const DISPATCH_TRIGGERS: [DispatchTrigger; 3] = [
    DispatchTrigger {
        hour: 7,
        ended: Shift::Third,
    },
    DispatchTrigger {
        hour: 15,
        ended: Shift::First,
    },
    DispatchTrigger {
        hour: 23,
        ended: Shift::Second,
    },
];

/// The shift that ends at `hour`, if `hour` is a dispatch trigger.
pub fn ended_shift_at(hour: u32) -> Option<Shift> {
    DISPATCH_TRIGGERS
        .iter()
        .find(|t| t.hour == hour)
        .map(|t| t.ended)
}

/// The first trigger strictly after `now`, with the shift it closes.
pub fn next_trigger(now: NaiveDateTime) -> (NaiveDateTime, Shift) {
    let today = now.date();
    let tomorrow = today + Duration::days(1);
    [today, tomorrow]
        .into_iter()
        .flat_map(|day| {
            DISPATCH_TRIGGERS
                .iter()
                .map(move |t| (day.and_time(t.time()), t.ended))
        })
        .find(|(at, _)| *at > now)
        .unwrap_or_else(|| {
            let first = DISPATCH_TRIGGERS[0];
            (tomorrow.and_time(first.time()), first.ended)
        })
}

/// The latest trigger at or before `now`, with the shift it closed.
pub fn previous_trigger(now: NaiveDateTime) -> (NaiveDateTime, Shift) {
    let today = now.date();
    let yesterday = today - Duration::days(1);
    [today, yesterday]
        .into_iter()
        .flat_map(|day| {
            DISPATCH_TRIGGERS
                .iter()
                .rev()
                .map(move |t| (day.and_time(t.time()), t.ended))
        })
        .find(|(at, _)| *at <= now)
        .unwrap_or_else(|| {
            let last = DISPATCH_TRIGGERS[DISPATCH_TRIGGERS.len() - 1];
            (yesterday.and_time(last.time()), last.ended)
        })
}
