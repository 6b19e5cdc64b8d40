use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, Timelike, Utc};
use chrono_tz::Tz;

/// Source of "now" in the property's local time.
///
/// Shift classification and the dispatch schedule work on local wall-clock hours; storage
/// timestamps stay in UTC.
#[derive(Debug, Clone, Copy)]
pub enum Clock {
    /// Host clock, converted to `tz` when configured, otherwise the host's local zone.
    System { tz: Option<Tz> },
    /// Frozen local time.
    Fixed(NaiveDateTime),
}

impl Clock {
    pub fn system(tz: Option<Tz>) -> Self {
        Clock::System { tz }
    }

    pub fn now_local(&self) -> NaiveDateTime {
        match self {
            Clock::System { tz: Some(tz) } => Utc::now().with_timezone(tz).naive_local(),
            Clock::System { tz: None } => Local::now().naive_local(),
            Clock::Fixed(at) => *at,
        }
    }

    pub fn now_utc(&self) -> DateTime<Utc> {
        match self {
            Clock::System { .. } => Utc::now(),
            Clock::Fixed(at) => at.and_utc(),
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.now_local().date()
    }

    pub fn hour(&self) -> u32 {
        self.now_local().hour()
    }
}

impl Default for Clock {
    fn default() -> Self {
        Clock::System { tz: None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_clock_reports_its_hour_and_day() {
        let at = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(23, 30, 0)
            .unwrap();
        let clock = Clock::Fixed(at);
        assert_eq!(clock.hour(), 23);
        assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
    }

    #[test]
    fn zoned_clock_uses_the_configured_zone() {
        let tz: Tz = "Asia/Tokyo".parse().unwrap();
        let clock = Clock::system(Some(tz));
        let expected = Utc::now().with_timezone(&tz).naive_local();
        let diff = (clock.now_local() - expected).num_seconds().abs();
        assert!(diff < 5);
    }
}
