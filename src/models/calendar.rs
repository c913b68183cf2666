//! Working-day calendar.
//!
//! Converts quantities of working days into calendar dates, skipping
//! non-working weekdays and holidays.
//!
//! # Time Model
//! Dates are `chrono::NaiveDate`: timezone-naive calendar days. A working
//! day is the smallest schedulable unit; spans are inclusive of both ends.
//!
//! # Precedence
//! A date is a working day iff its weekday is not excluded AND it is not
//! a holiday.

use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::{Result, ScheduleError};

/// Calendar configuration: which days are excluded from work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarConfig {
    /// Weekdays nobody works (default: Saturday, Sunday).
    pub non_working_weekdays: Vec<Weekday>,
    /// Individual non-working dates.
    pub holidays: BTreeSet<NaiveDate>,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            non_working_weekdays: vec![Weekday::Sat, Weekday::Sun],
            holidays: BTreeSet::new(),
        }
    }
}

impl CalendarConfig {
    /// Monday–Friday, no holidays.
    pub fn weekdays() -> Self {
        Self::default()
    }

    /// Every day is a working day.
    pub fn every_day() -> Self {
        Self {
            non_working_weekdays: Vec::new(),
            holidays: BTreeSet::new(),
        }
    }

    /// Adds a holiday.
    pub fn with_holiday(mut self, date: NaiveDate) -> Self {
        self.holidays.insert(date);
        self
    }

    /// Replaces the non-working weekdays.
    pub fn with_non_working_weekdays(mut self, weekdays: Vec<Weekday>) -> Self {
        self.non_working_weekdays = weekdays;
        self
    }
}

/// A run of working days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkSpan {
    /// First day (inclusive).
    pub start: NaiveDate,
    /// Last day (inclusive).
    pub end: NaiveDate,
    /// Working days between `start` and `end`, inclusive.
    pub working_days: u32,
}

impl WorkSpan {
    /// Whether this span consumes any working time.
    #[inline]
    pub fn consumes(&self) -> bool {
        self.working_days > 0
    }
}

/// Working-day arithmetic over a [`CalendarConfig`].
///
/// # Example
/// ```
/// use chrono::NaiveDate;
/// use gantt_schedule::models::{CalendarConfig, WorkCalendar};
///
/// let cal = WorkCalendar::new(CalendarConfig::weekdays()).unwrap();
/// let fri = NaiveDate::from_ymd_opt(2025, 1, 3).unwrap();
/// let span = cal.end_date(fri, 2);
/// // Friday + Monday
/// assert_eq!(span.end, NaiveDate::from_ymd_opt(2025, 1, 6).unwrap());
/// ```
#[derive(Debug, Clone)]
pub struct WorkCalendar {
    /// Indexed by `Weekday::num_days_from_monday`.
    working_weekday: [bool; 7],
    holidays: BTreeSet<NaiveDate>,
}

impl WorkCalendar {
    /// Builds a calendar. Fails if no weekday is a working day.
    pub fn new(config: CalendarConfig) -> Result<Self> {
        let mut working_weekday = [true; 7];
        for wd in &config.non_working_weekdays {
            working_weekday[wd.num_days_from_monday() as usize] = false;
        }
        if !working_weekday.iter().any(|&w| w) {
            return Err(ScheduleError::InvalidCalendar {
                reason: "every weekday is marked non-working".into(),
            });
        }
        Ok(Self {
            working_weekday,
            holidays: config.holidays,
        })
    }

    /// Working weekdays per calendar week (ignoring holidays).
    pub fn working_days_per_week(&self) -> u32 {
        self.working_weekday.iter().filter(|&&w| w).count() as u32
    }

    /// Whether `date` is a working day.
    #[inline]
    pub fn is_working_day(&self, date: NaiveDate) -> bool {
        self.working_weekday[date.weekday().num_days_from_monday() as usize]
            && !self.holidays.contains(&date)
    }

    /// First working day on or after `date`.
    pub fn next_working_day(&self, date: NaiveDate) -> NaiveDate {
        // At least one weekday works, so a working day is found within a
        // week plus the number of holidays.
        let limit = 7 + self.holidays.len();
        let mut current = date;
        for _ in 0..=limit {
            if self.is_working_day(current) {
                return current;
            }
            match current.succ_opt() {
                Some(next) => current = next,
                None => break,
            }
        }
        current
    }

    /// First working day strictly after `date`.
    pub fn following_working_day(&self, date: NaiveDate) -> NaiveDate {
        match date.succ_opt() {
            Some(next) => self.next_working_day(next),
            None => date,
        }
    }

    /// Span that consumes exactly `working_days` working days from `start`.
    ///
    /// The span begins on the first working day at or after `start`.
    /// A zero request is a non-consuming span on `start` itself.
    pub fn end_date(&self, start: NaiveDate, working_days: u32) -> WorkSpan {
        if working_days == 0 {
            return WorkSpan {
                start,
                end: start,
                working_days: 0,
            };
        }

        let first = self.next_working_day(start);
        let mut end = first;
        for _ in 1..working_days {
            end = self.following_working_day(end);
        }
        WorkSpan {
            start: first,
            end,
            working_days,
        }
    }

    /// Working days in `[start, end]`, inclusive. Zero if `end < start`.
    pub fn count_working_days(&self, start: NaiveDate, end: NaiveDate) -> u32 {
        if end < start {
            return 0;
        }

        let total_days = (end - start).num_days() + 1;
        let full_weeks = total_days / 7;
        let mut count = full_weeks * i64::from(self.working_days_per_week());

        // Remainder days after the full weeks
        let mut day = start + chrono::Duration::days(full_weeks * 7);
        while day <= end {
            if self.working_weekday[day.weekday().num_days_from_monday() as usize] {
                count += 1;
            }
            match day.succ_opt() {
                Some(next) => day = next,
                None => break,
            }
        }

        // Subtract holidays that fall on otherwise-working weekdays
        let holidays = self
            .holidays
            .range(start..=end)
            .filter(|h| self.working_weekday[h.weekday().num_days_from_monday() as usize])
            .count() as i64;

        (count - holidays).max(0) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn weekdays() -> WorkCalendar {
        WorkCalendar::new(CalendarConfig::weekdays()).unwrap()
    }

    #[test]
    fn test_is_working_day() {
        let cal = weekdays();
        assert!(cal.is_working_day(d(2025, 1, 6))); // Monday
        assert!(!cal.is_working_day(d(2025, 1, 4))); // Saturday
        assert!(!cal.is_working_day(d(2025, 1, 5))); // Sunday
    }

    #[test]
    fn test_holiday_overrides_weekday() {
        let cal = WorkCalendar::new(CalendarConfig::weekdays().with_holiday(d(2025, 1, 1))).unwrap();
        assert!(!cal.is_working_day(d(2025, 1, 1))); // Wednesday, holiday
        assert_eq!(cal.next_working_day(d(2025, 1, 1)), d(2025, 1, 2));
    }

    #[test]
    fn test_next_and_following() {
        let cal = weekdays();
        assert_eq!(cal.next_working_day(d(2025, 1, 6)), d(2025, 1, 6));
        assert_eq!(cal.next_working_day(d(2025, 1, 4)), d(2025, 1, 6));
        assert_eq!(cal.following_working_day(d(2025, 1, 3)), d(2025, 1, 6));
        assert_eq!(cal.following_working_day(d(2025, 1, 6)), d(2025, 1, 7));
    }

    #[test]
    fn test_end_date_skips_weekend() {
        let cal = weekdays();
        let span = cal.end_date(d(2025, 1, 2), 3); // Thu
        assert_eq!(span.start, d(2025, 1, 2));
        assert_eq!(span.end, d(2025, 1, 6)); // Thu, Fri, Mon
        assert_eq!(span.working_days, 3);
        assert!(span.consumes());
    }

    #[test]
    fn test_end_date_aligns_start() {
        let cal = weekdays();
        let span = cal.end_date(d(2025, 1, 4), 1); // Saturday
        assert_eq!(span.start, d(2025, 1, 6));
        assert_eq!(span.end, d(2025, 1, 6));
    }

    #[test]
    fn test_zero_request_is_non_consuming() {
        let cal = weekdays();
        let span = cal.end_date(d(2025, 1, 4), 0);
        assert_eq!(span.start, d(2025, 1, 4));
        assert_eq!(span.end, d(2025, 1, 4));
        assert!(!span.consumes());
    }

    #[test]
    fn test_two_week_sprint() {
        let cal = weekdays();
        let span = cal.end_date(d(2025, 1, 6), 10);
        assert_eq!(span.end, d(2025, 1, 17));
    }

    #[test]
    fn test_count_working_days() {
        let cal = weekdays();
        assert_eq!(cal.count_working_days(d(2025, 1, 6), d(2025, 1, 17)), 10);
        assert_eq!(cal.count_working_days(d(2025, 1, 4), d(2025, 1, 5)), 0);
        assert_eq!(cal.count_working_days(d(2025, 1, 6), d(2025, 1, 6)), 1);
        assert_eq!(cal.count_working_days(d(2025, 1, 7), d(2025, 1, 6)), 0);
        // Across a full year: 2025 has 261 weekdays
        assert_eq!(cal.count_working_days(d(2025, 1, 1), d(2025, 12, 31)), 261);
    }

    #[test]
    fn test_count_with_holidays() {
        let cal = WorkCalendar::new(
            CalendarConfig::weekdays()
                .with_holiday(d(2025, 1, 1)) // Wednesday
                .with_holiday(d(2025, 1, 4)), // Saturday, already off
        )
        .unwrap();
        assert_eq!(cal.count_working_days(d(2024, 12, 30), d(2025, 1, 5)), 4);
    }

    #[test]
    fn test_round_trip() {
        let cal = weekdays();
        let start = d(2025, 2, 3);
        for offset in 0..40 {
            let end = cal.next_working_day(start + chrono::Duration::days(offset));
            let n = cal.count_working_days(start, end);
            assert_eq!(cal.end_date(start, n).end, end);
        }
    }

    #[test]
    fn test_every_day_calendar() {
        let cal = WorkCalendar::new(CalendarConfig::every_day()).unwrap();
        assert_eq!(cal.working_days_per_week(), 7);
        assert_eq!(cal.end_date(d(2025, 1, 4), 2).end, d(2025, 1, 5));
    }

    #[test]
    fn test_rejects_no_working_days() {
        let config = CalendarConfig::every_day().with_non_working_weekdays(vec![
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
            Weekday::Sat,
            Weekday::Sun,
        ]);
        assert!(matches!(
            WorkCalendar::new(config),
            Err(ScheduleError::InvalidCalendar { .. })
        ));
    }

    #[test]
    fn test_config_deserialize() {
        let config: CalendarConfig =
            serde_json::from_str(r#"{"holidays":["2025-12-25"]}"#).unwrap();
        assert_eq!(config.non_working_weekdays, vec![Weekday::Sat, Weekday::Sun]);
        assert!(config.holidays.contains(&d(2025, 12, 25)));
    }
}
