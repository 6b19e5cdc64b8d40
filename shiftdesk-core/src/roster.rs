use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::ParseLabelError;

/// Named agent roster ranges. The 8-hour ranges mirror the front-desk shifts; the 12-hour
/// ranges overlap them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
pub enum RosterRange {
    #[serde(rename = "7:00 am to 3:00 pm")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "7:00 am to 3:00 pm"))]
    Morning,
    #[serde(rename = "3:00 pm to 11:00 pm")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "3:00 pm to 11:00 pm"))]
    Evening,
    #[serde(rename = "11:00 pm to 7:00 am")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "11:00 pm to 7:00 am"))]
    Overnight,
    #[serde(rename = "7:00 am to 7:00 pm")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "7:00 am to 7:00 pm"))]
    LongDay,
    #[serde(rename = "7:00 pm to 7:00 am")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "7:00 pm to 7:00 am"))]
    LongNight,
}

impl RosterRange {
    pub const ALL: [RosterRange; 5] = [
        RosterRange::Morning,
        RosterRange::Evening,
        RosterRange::Overnight,
        RosterRange::LongDay,
        RosterRange::LongNight,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            RosterRange::Morning => "7:00 am to 3:00 pm",
            RosterRange::Evening => "3:00 pm to 11:00 pm",
            RosterRange::Overnight => "11:00 pm to 7:00 am",
            RosterRange::LongDay => "7:00 am to 7:00 pm",
            RosterRange::LongNight => "7:00 pm to 7:00 am",
        }
    }

    /// `(start, end)` hours; `end` is exclusive and may be smaller than `start`.
    pub fn bounds(&self) -> (u32, u32) {
        match self {
            RosterRange::Morning => (7, 15),
            RosterRange::Evening => (15, 23),
            RosterRange::Overnight => (23, 7),
            RosterRange::LongDay => (7, 19),
            RosterRange::LongNight => (19, 7),
        }
    }

    pub fn wraps_midnight(&self) -> bool {
        let (start, end) = self.bounds();
        start >= end
    }

    pub fn contains(&self, hour: u32) -> bool {
        let hour = hour % 24;
        let (start, end) = self.bounds();
        if self.wraps_midnight() {
            hour >= start || hour < end
        } else {
            hour >= start && hour < end
        }
    }

    pub fn duration_hours(&self) -> u32 {
        let (start, end) = self.bounds();
        (end + 24 - start) % 24
    }
}

impl fmt::Display for RosterRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for RosterRange {
    type Err = ParseLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        RosterRange::ALL
            .into_iter()
            .find(|r| r.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ParseLabelError::new("roster range", wanted))
    }
}

/// Anything carrying a roster range, e.g. a stored agent assignment.
pub trait RosterEntry {
    fn roster_range(&self) -> RosterRange;
}

impl RosterEntry for RosterRange {
    fn roster_range(&self) -> RosterRange {
        *self
    }
}

/// Pick the assignment on duty at `hour`.
///
/// When several ranges cover the hour the longest one wins; among equally long ranges the
/// earliest entry in `entries` is kept.
pub fn match_assignment<T: RosterEntry>(entries: &[T], hour: u32) -> Option<&T> {
    let mut best: Option<&T> = None;
    for entry in entries
        .iter()
        .filter(|e| e.roster_range().contains(hour))
    {
        match best {
            Some(current)
                if current.roster_range().duration_hours()
                    >= entry.roster_range().duration_hours() => {}
            _ => best = Some(entry),
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Assignment {
        agent: &'static str,
        range: RosterRange,
    }

    impl RosterEntry for Assignment {
        fn roster_range(&self) -> RosterRange {
            self.range
        }
    }

    fn assignment(agent: &'static str, range: RosterRange) -> Assignment {
        Assignment { agent, range }
    }

    #[test]
    fn twelve_hour_range_wins_over_eight_hour_range() {
        let roster = vec![
            assignment("dana", RosterRange::Morning),
            assignment("lee", RosterRange::LongDay),
        ];
        let hit = match_assignment(&roster, 10).expect("someone is on duty at 10");
        assert_eq!(hit.agent, "lee");
    }

    #[test]
    fn uncovered_hour_returns_none() {
        let roster = vec![
            assignment("dana", RosterRange::Morning),
            assignment("sam", RosterRange::Evening),
        ];
        assert_eq!(match_assignment(&roster, 2), None);
    }

    #[test]
    fn wrapping_ranges_cover_both_sides_of_midnight() {
        assert!(RosterRange::Overnight.contains(23));
        assert!(RosterRange::Overnight.contains(0));
        assert!(RosterRange::Overnight.contains(6));
        assert!(!RosterRange::Overnight.contains(7));
        assert!(RosterRange::LongNight.contains(19));
        assert!(!RosterRange::LongNight.contains(18));
    }

    #[test]
    fn single_match_is_returned() {
        let roster = vec![
            assignment("dana", RosterRange::Morning),
            assignment("pat", RosterRange::Overnight),
        ];
        assert_eq!(match_assignment(&roster, 3).map(|a| a.agent), Some("pat"));
    }

    #[test]
    fn equal_duration_ties_keep_input_order() {
        let roster = vec![
            assignment("first", RosterRange::Morning),
            assignment("second", RosterRange::Morning),
        ];
        assert_eq!(match_assignment(&roster, 8).map(|a| a.agent), Some("first"));
    }

    #[test]
    fn durations_are_eight_or_twelve_hours() {
        for range in RosterRange::ALL {
            let d = range.duration_hours();
            assert!(d == 8 || d == 12, "{range} has {d}h");
            let covered = (0..24).filter(|h| range.contains(*h)).count() as u32;
            assert_eq!(covered, d);
        }
    }

    #[test]
    fn labels_parse_case_insensitively() {
        assert_eq!(
            "7:00 AM to 7:00 PM".parse::<RosterRange>().unwrap(),
            RosterRange::LongDay
        );
        assert!("9:00 am to 5:00 pm".parse::<RosterRange>().is_err());
    }
}
