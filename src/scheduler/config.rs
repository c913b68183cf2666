//! Scheduler configuration.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ScheduleError};
use crate::models::CalendarConfig;

/// Settings for a scheduling run.
///
/// Every field has a default so partial JSON/TOML documents deserialize.
///
/// # Example
/// ```
/// use chrono::NaiveDate;
/// use gantt_schedule::scheduler::SchedulerConfig;
///
/// let config = SchedulerConfig::new(NaiveDate::from_ymd_opt(2025, 1, 6).unwrap())
///     .with_hours_per_day(7.5)
///     .with_max_periods_per_task(500);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// No work starts before this date.
    pub project_start: NaiveDate,
    /// Working-day calendar.
    pub calendar: CalendarConfig,
    /// Hours in one effort day (for `Days` estimates).
    pub hours_per_day: f64,
    /// Relative subtask/parent divergence that triggers a warning.
    pub divergence_tolerance: f64,
    /// Working days one task may draw from before it is reported as
    /// capacity-exhausted. Days already booked out by other tasks do not
    /// count.
    pub max_periods_per_task: u32,
    /// Whether dependents of unschedulable tasks become unschedulable too.
    pub propagate_unschedulable: bool,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            project_start: NaiveDate::default(),
            calendar: CalendarConfig::default(),
            hours_per_day: 8.0,
            divergence_tolerance: 0.1,
            max_periods_per_task: 2_600,
            propagate_unschedulable: true,
        }
    }
}

impl SchedulerConfig {
    /// Default settings starting on `project_start`.
    pub fn new(project_start: NaiveDate) -> Self {
        Self {
            project_start,
            ..Self::default()
        }
    }

    /// Sets the calendar.
    pub fn with_calendar(mut self, calendar: CalendarConfig) -> Self {
        self.calendar = calendar;
        self
    }

    /// Sets hours per effort day.
    pub fn with_hours_per_day(mut self, hours: f64) -> Self {
        self.hours_per_day = hours;
        self
    }

    /// Sets the divergence tolerance.
    pub fn with_divergence_tolerance(mut self, tolerance: f64) -> Self {
        self.divergence_tolerance = tolerance;
        self
    }

    /// Sets the per-task period guard.
    pub fn with_max_periods_per_task(mut self, periods: u32) -> Self {
        self.max_periods_per_task = periods;
        self
    }

    /// Sets cascading of unschedulable tasks to their dependents.
    pub fn with_propagation(mut self, propagate: bool) -> Self {
        self.propagate_unschedulable = propagate;
        self
    }

    /// Checks numeric settings.
    pub fn validate(&self) -> Result<()> {
        if !self.hours_per_day.is_finite() || self.hours_per_day <= 0.0 {
            return Err(ScheduleError::InvalidConfig {
                reason: format!("hours_per_day must be positive, got {}", self.hours_per_day),
            });
        }
        if !self.divergence_tolerance.is_finite() || self.divergence_tolerance < 0.0 {
            return Err(ScheduleError::InvalidConfig {
                reason: format!(
                    "divergence_tolerance must not be negative, got {}",
                    self.divergence_tolerance
                ),
            });
        }
        if self.max_periods_per_task == 0 {
            return Err(ScheduleError::InvalidConfig {
                reason: "max_periods_per_task must be at least 1".into(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SchedulerConfig::default();
        assert_eq!(config.hours_per_day, 8.0);
        assert!(config.propagate_unschedulable);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json() {
        let config: SchedulerConfig = serde_json::from_str(
            r#"{"project_start":"2025-03-03","calendar":{"holidays":["2025-03-05"]},"propagate_unschedulable":false}"#,
        )
        .unwrap();
        assert_eq!(config.project_start, NaiveDate::from_ymd_opt(2025, 3, 3).unwrap());
        assert_eq!(config.calendar.holidays.len(), 1);
        assert!(!config.propagate_unschedulable);
        assert_eq!(config.max_periods_per_task, 2_600);
    }

    #[test]
    fn test_validate_rejects_bad_numbers() {
        let start = NaiveDate::from_ymd_opt(2025, 1, 6).unwrap();
        assert!(SchedulerConfig::new(start).with_hours_per_day(0.0).validate().is_err());
        assert!(SchedulerConfig::new(start)
            .with_divergence_tolerance(-0.5)
            .validate()
            .is_err());
        assert!(SchedulerConfig::new(start)
            .with_max_periods_per_task(0)
            .validate()
            .is_err());
    }
}
