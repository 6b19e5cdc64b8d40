use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::ParseLabelError;

/// One of the three 8-hour front-desk shifts.
///
/// Serialized as the short labels used across the API and the stored status blob
/// (`"1st"`, `"2nd"`, `"3rd"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
pub enum Shift {
    #[serde(rename = "1st")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "1st"))]
    First,
    #[serde(rename = "2nd")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "2nd"))]
    Second,
    #[serde(rename = "3rd")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "3rd"))]
    Third,
}

impl Shift {
    pub const ALL: [Shift; 3] = [Shift::First, Shift::Second, Shift::Third];

    /// Classify an hour of the day (local time) into its shift.
    ///
    /// `[7,15)` is the 1st shift, `[15,23)` the 2nd, and everything else
    /// (`23` plus `[0,7)`) the 3rd. Hours past 23 wrap around.
    pub fn classify(hour: u32) -> Shift {
        match hour % 24 {
            7..=14 => Shift::First,
            15..=22 => Shift::Second,
            _ => Shift::Third,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Shift::First => "1st",
            Shift::Second => "2nd",
            Shift::Third => "3rd",
        }
    }

    /// Human readable window, as printed on exported reports.
    pub fn window(&self) -> &'static str {
        match self {
            Shift::First => "7:00 am to 3:00 pm",
            Shift::Second => "3:00 pm to 11:00 pm",
            Shift::Third => "11:00 pm to 7:00 am",
        }
    }

    /// Hour at which this shift ends (the next shift's first hour).
    pub fn end_hour(&self) -> u32 {
        match self {
            Shift::First => 15,
            Shift::Second => 23,
            Shift::Third => 7,
        }
    }
}

/// Free-function form of [`Shift::classify`].
pub fn classify_shift(hour: u32) -> Shift {
    Shift::classify(hour)
}

impl fmt::Display for Shift {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Shift {
    type Err = ParseLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1st" => Ok(Shift::First),
            "2nd" => Ok(Shift::Second),
            "3rd" => Ok(Shift::Third),
            other => Err(ParseLabelError::new("shift", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundary_hours_classify_as_documented() {
        assert_eq!(classify_shift(6), Shift::Third);
        assert_eq!(classify_shift(7), Shift::First);
        assert_eq!(classify_shift(14), Shift::First);
        assert_eq!(classify_shift(15), Shift::Second);
        assert_eq!(classify_shift(22), Shift::Second);
        assert_eq!(classify_shift(23), Shift::Third);
        assert_eq!(classify_shift(0), Shift::Third);
    }

    #[test]
    fn shifts_partition_the_day() {
        let mut counts = [0usize; 3];
        for hour in 0..24 {
            match classify_shift(hour) {
                Shift::First => counts[0] += 1,
                Shift::Second => counts[1] += 1,
                Shift::Third => counts[2] += 1,
            }
        }
        assert_eq!(counts, [8, 8, 8]);
    }

    #[test]
    fn each_hour_lies_inside_its_shift_window() {
        for hour in 0..24 {
            let shift = classify_shift(hour);
            let end = shift.end_hour();
            let start = (end + 16) % 24;
            let inside = if start < end {
                hour >= start && hour < end
            } else {
                hour >= start || hour < end
            };
            assert!(inside, "hour {hour} outside {shift}");
        }
    }

    #[test]
    fn label_round_trips_through_serde_and_from_str() {
        for shift in Shift::ALL {
            let json = serde_json::to_string(&shift).unwrap();
            assert_eq!(json, format!("\"{}\"", shift.as_str()));
            assert_eq!(shift.as_str().parse::<Shift>().unwrap(), shift);
        }
        assert!("4th".parse::<Shift>().is_err());
    }
}
