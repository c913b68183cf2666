//! Team model.
//!
//! Teams are the capacity holders. Each team has a throughput (velocity)
//! measured in one unit system, per a period (day, week, sprint).
//!
//! # Capacity
//! Team capacity per period is `velocity × members`, unless a direct
//! `capacity_per_period` figure is configured. Daily capacity divides
//! that by the number of working days in the period.

use serde::{Deserialize, Serialize};

use super::EstimateUnit;

/// Unit system a team's capacity is measured in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapacityUnit {
    /// Work hours.
    Hours,
    /// Story points.
    Points,
}

impl CapacityUnit {
    /// The estimate unit that carries the same quantity.
    pub fn as_estimate_unit(self) -> EstimateUnit {
        match self {
            Self::Hours => EstimateUnit::Hours,
            Self::Points => EstimateUnit::Points,
        }
    }
}

/// Period a velocity figure refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VelocityPeriod {
    /// One working day.
    Day,
    /// One calendar week (its working days).
    Week,
    /// One sprint of `sprint_length_days` working days.
    Sprint,
}

/// Configuration problems that make a team unusable.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TeamConfigError {
    /// Velocity is zero, negative, or not a number.
    #[error("velocity must be positive, got {0}")]
    InvalidVelocity(f64),
    /// Capacity override is negative or not a number.
    #[error("capacity per period must not be negative, got {0}")]
    NegativeCapacity(f64),
    /// Sprint-based team without a sprint length.
    #[error("sprint length must be at least one working day")]
    InvalidSprintLength,
    /// Team has no members.
    #[error("team must have at least one member")]
    NoMembers,
}

/// A team's capacity configuration.
///
/// # Example
/// ```
/// use gantt_schedule::models::{TeamConfig, VelocityPeriod};
///
/// // 30 points per 10-day sprint → 3 points per working day
/// let team = TeamConfig::points("core", 30.0, VelocityPeriod::Sprint);
/// assert!((team.daily_capacity(5) - 3.0).abs() < 1e-9);
/// assert!((team.nominal_working_days(30.0, 5) - 10.0).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamConfig {
    /// Unique team identifier.
    pub id: String,
    /// Throughput per member per period.
    pub velocity: f64,
    /// Unit of `velocity` and of the work this team consumes.
    pub unit: CapacityUnit,
    /// Period `velocity` refers to.
    pub period: VelocityPeriod,
    /// Direct team capacity per period; replaces `velocity × members`.
    #[serde(default)]
    pub capacity_per_period: Option<f64>,
    /// Working days per sprint.
    #[serde(default = "default_sprint_length")]
    pub sprint_length_days: u32,
    /// Headcount.
    #[serde(default = "default_members")]
    pub members: u32,
}

fn default_sprint_length() -> u32 {
    10
}

fn default_members() -> u32 {
    1
}

impl TeamConfig {
    /// Creates a team.
    pub fn new(
        id: impl Into<String>,
        velocity: f64,
        unit: CapacityUnit,
        period: VelocityPeriod,
    ) -> Self {
        Self {
            id: id.into(),
            velocity,
            unit,
            period,
            capacity_per_period: None,
            sprint_length_days: default_sprint_length(),
            members: default_members(),
        }
    }

    /// Hour-based team with `hours_per_day` per member.
    pub fn hours(id: impl Into<String>, hours_per_day: f64) -> Self {
        Self::new(id, hours_per_day, CapacityUnit::Hours, VelocityPeriod::Day)
    }

    /// Point-based team.
    pub fn points(id: impl Into<String>, velocity: f64, period: VelocityPeriod) -> Self {
        Self::new(id, velocity, CapacityUnit::Points, period)
    }

    /// Sets the headcount.
    pub fn with_members(mut self, members: u32) -> Self {
        self.members = members;
        self
    }

    /// Sets the sprint length (working days).
    pub fn with_sprint_length(mut self, days: u32) -> Self {
        self.sprint_length_days = days;
        self
    }

    /// Sets a direct capacity figure per period.
    pub fn with_capacity_per_period(mut self, capacity: f64) -> Self {
        self.capacity_per_period = Some(capacity);
        self
    }

    /// Checks the configuration.
    pub fn validate(&self) -> Result<(), TeamConfigError> {
        match self.capacity_per_period {
            Some(c) if !c.is_finite() || c < 0.0 => {
                return Err(TeamConfigError::NegativeCapacity(c));
            }
            Some(_) => {}
            None => {
                if !self.velocity.is_finite() || self.velocity <= 0.0 {
                    return Err(TeamConfigError::InvalidVelocity(self.velocity));
                }
                if self.members == 0 {
                    return Err(TeamConfigError::NoMembers);
                }
            }
        }
        if self.period == VelocityPeriod::Sprint && self.sprint_length_days == 0 {
            return Err(TeamConfigError::InvalidSprintLength);
        }
        Ok(())
    }

    /// Working days in one velocity period.
    pub fn period_working_days(&self, working_days_per_week: u32) -> f64 {
        match self.period {
            VelocityPeriod::Day => 1.0,
            VelocityPeriod::Week => f64::from(working_days_per_week),
            VelocityPeriod::Sprint => f64::from(self.sprint_length_days),
        }
    }

    /// Team capacity per period.
    pub fn period_capacity(&self) -> f64 {
        self.capacity_per_period
            .unwrap_or(self.velocity * f64::from(self.members))
    }

    /// Team capacity per working day.
    ///
    /// Returns 0.0 for degenerate periods; callers validate first.
    pub fn daily_capacity(&self, working_days_per_week: u32) -> f64 {
        let days = self.period_working_days(working_days_per_week);
        if days <= 0.0 {
            return 0.0;
        }
        (self.period_capacity() / days).max(0.0)
    }

    /// Capacity one member contributes per working day.
    pub fn member_daily_capacity(&self, working_days_per_week: u32) -> f64 {
        self.daily_capacity(working_days_per_week) / f64::from(self.members.max(1))
    }

    /// Working days the whole team needs for `quantity` of work.
    ///
    /// `quantity / capacity_per_period × period_length`.
    pub fn nominal_working_days(&self, quantity: f64, working_days_per_week: u32) -> f64 {
        let per_period = self.period_capacity();
        if per_period <= 0.0 {
            return f64::INFINITY;
        }
        quantity / per_period * self.period_working_days(working_days_per_week)
    }
}
