//! Task (backlog item) model.
//!
//! A task is a normalized backlog record: an epic, story, or subtask as
//! delivered by the ingestion layer. Tasks are read-only inputs; the
//! scheduler never mutates them.
//!
//! # Hierarchy
//! Only the child → parent link is stored (`parent_id`). Children are
//! derived when the task index is built.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Unit of an estimate as reported by the tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EstimateUnit {
    /// Work hours.
    Hours,
    /// Effort days (converted to hours via the configured hours per day).
    Days,
    /// Story points.
    Points,
}

impl std::fmt::Display for EstimateUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Hours => "hours",
            Self::Days => "days",
            Self::Points => "points",
        };
        f.write_str(s)
    }
}

/// A quantity of work with its unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Estimate {
    /// Amount of work.
    pub value: f64,
    /// Unit of `value`.
    pub unit: EstimateUnit,
}

impl Estimate {
    /// Creates an estimate.
    pub fn new(value: f64, unit: EstimateUnit) -> Self {
        Self { value, unit }
    }

    /// Estimate in hours.
    pub fn hours(value: f64) -> Self {
        Self::new(value, EstimateUnit::Hours)
    }

    /// Estimate in effort days.
    pub fn days(value: f64) -> Self {
        Self::new(value, EstimateUnit::Days)
    }

    /// Estimate in story points.
    pub fn points(value: f64) -> Self {
        Self::new(value, EstimateUnit::Points)
    }

    /// Whether this estimate carries schedulable work.
    #[inline]
    pub fn is_positive(&self) -> bool {
        self.value.is_finite() && self.value > 0.0
    }
}

/// A backlog item to be scheduled.
///
/// # Example
/// ```
/// use gantt_schedule::models::{Estimate, Task};
///
/// let task = Task::new("API-12")
///     .with_title("Token refresh")
///     .with_estimate(Estimate::hours(16.0))
///     .with_team("backend")
///     .with_dependency("API-10");
/// assert_eq!(task.dependencies, vec!["API-10".to_string()]);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Task {
    /// Unique task identifier.
    pub id: String,
    /// Human-readable title (also matched by title patterns).
    pub title: String,
    /// Original estimate.
    pub estimate: Option<Estimate>,
    /// Remaining-work override for in-flight tasks.
    pub remaining_estimate: Option<Estimate>,
    /// Ids of tasks that must finish before this one starts.
    pub dependencies: Vec<String>,
    /// Explicitly assigned team.
    pub team_id: Option<String>,
    /// Tracker labels.
    pub labels: Vec<String>,
    /// Parent task (epic or story).
    pub parent_id: Option<String>,
    /// How many team members may work this task in parallel.
    /// `None` = the whole team.
    pub max_concurrency: Option<u32>,
    /// Zero-duration marker.
    pub milestone: bool,
    /// Target date for milestones.
    pub target_date: Option<NaiveDate>,
    /// Ordering hint (lower = earlier). `None` = keep input order.
    pub rank: Option<i64>,
}

impl Task {
    /// Creates a new task with the given ID.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// Creates a milestone with an optional target date.
    pub fn milestone(id: impl Into<String>, target_date: Option<NaiveDate>) -> Self {
        Self {
            milestone: true,
            target_date,
            ..Self::new(id)
        }
    }

    /// Sets the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Sets the original estimate.
    pub fn with_estimate(mut self, estimate: Estimate) -> Self {
        self.estimate = Some(estimate);
        self
    }

    /// Sets the remaining-estimate override.
    pub fn with_remaining(mut self, remaining: Estimate) -> Self {
        self.remaining_estimate = Some(remaining);
        self
    }

    /// Adds a dependency.
    pub fn with_dependency(mut self, task_id: impl Into<String>) -> Self {
        self.dependencies.push(task_id.into());
        self
    }

    /// Assigns a team explicitly.
    pub fn with_team(mut self, team_id: impl Into<String>) -> Self {
        self.team_id = Some(team_id.into());
        self
    }

    /// Adds a label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.labels.push(label.into());
        self
    }

    /// Sets the parent task.
    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    /// Caps parallel workers on this task.
    pub fn with_max_concurrency(mut self, workers: u32) -> Self {
        self.max_concurrency = Some(workers);
        self
    }

    /// Sets the rank.
    pub fn with_rank(mut self, rank: i64) -> Self {
        self.rank = Some(rank);
        self
    }

    /// Remaining override if positive, else the original estimate if positive.
    pub fn effective_estimate(&self) -> Option<Estimate> {
        self.remaining_estimate
            .filter(Estimate::is_positive)
            .or_else(|| self.estimate.filter(Estimate::is_positive))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_builder() {
        let task = Task::new("T1")
            .with_title("Login form")
            .with_estimate(Estimate::hours(8.0))
            .with_remaining(Estimate::hours(3.0))
            .with_team("web")
            .with_label("frontend")
            .with_parent("E1")
            .with_dependency("T0")
            .with_max_concurrency(2)
            .with_rank(5);

        assert_eq!(task.id, "T1");
        assert_eq!(task.title, "Login form");
        assert_eq!(task.estimate, Some(Estimate::hours(8.0)));
        assert_eq!(task.team_id.as_deref(), Some("web"));
        assert_eq!(task.labels, vec!["frontend".to_string()]);
        assert_eq!(task.parent_id.as_deref(), Some("E1"));
        assert_eq!(task.max_concurrency, Some(2));
        assert_eq!(task.rank, Some(5));
        assert!(!task.milestone);
    }

    #[test]
    fn test_effective_estimate_prefers_remaining() {
        let task = Task::new("T1")
            .with_estimate(Estimate::hours(8.0))
            .with_remaining(Estimate::hours(3.0));
        assert_eq!(task.effective_estimate(), Some(Estimate::hours(3.0)));

        let zero_remaining = Task::new("T2")
            .with_estimate(Estimate::hours(8.0))
            .with_remaining(Estimate::hours(0.0));
        assert_eq!(zero_remaining.effective_estimate(), Some(Estimate::hours(8.0)));

        assert_eq!(Task::new("T3").effective_estimate(), None);
    }

    #[test]
    fn test_milestone() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 14).unwrap();
        let m = Task::milestone("M1", Some(date));
        assert!(m.milestone);
        assert_eq!(m.target_date, Some(date));
        assert!(m.estimate.is_none());
    }

    #[test]
    fn test_task_deserialize_defaults() {
        let task: Task =
            serde_json::from_str(r#"{"id":"T1","estimate":{"value":5,"unit":"points"}}"#).unwrap();
        assert_eq!(task.estimate, Some(Estimate::points(5.0)));
        assert!(task.dependencies.is_empty());
        assert!(task.parent_id.is_none());
    }
}
