//! Schedule quality metrics (KPIs).
//!
//! Computes summary indicators from a finished [`ScheduleResult`].
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Makespan | Working days from project start to the latest end |
//! | Project end | Latest entry end date |
//! | Completion rate | Scheduled / (scheduled + unschedulable) |
//! | Team utilization | Allocated / capacity over the days a team was loaded |
//! | Avg utilization | Mean of team utilizations |
//!
//! # Reference
//! Pinedo (2016), "Scheduling", Ch. 1.2: Performance Measures

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{ScheduleResult, WorkCalendar};

/// Schedule performance indicators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleKpi {
    /// Working days from the project start through the last end date.
    pub makespan_days: u32,
    /// Latest end date, if anything was scheduled.
    pub project_end: Option<NaiveDate>,
    /// Tasks with an entry.
    pub scheduled: usize,
    /// Tasks without one.
    pub unschedulable: usize,
    /// Fraction of tasks that received an entry (1.0 for empty input).
    pub completion_rate: f64,
    /// Per-team utilization (0.0..=1.0).
    pub utilization_by_team: BTreeMap<String, f64>,
    /// Mean team utilization.
    pub avg_utilization: f64,
    /// Number of warnings raised.
    pub warnings: usize,
}

impl ScheduleKpi {
    /// Computes KPIs for a result.
    pub fn calculate(result: &ScheduleResult, calendar: &WorkCalendar, project_start: NaiveDate) -> Self {
        let project_end = result.project_end();
        let makespan_days = project_end
            .filter(|&end| end >= project_start)
            .map_or(0, |end| calendar.count_working_days(project_start, end));

        let scheduled = result.entries.len();
        let unschedulable = result.unschedulable.len();
        let total = scheduled + unschedulable;
        let completion_rate = if total == 0 {
            1.0
        } else {
            scheduled as f64 / total as f64
        };

        let mut sums: BTreeMap<String, (f64, f64)> = BTreeMap::new();
        for load in &result.team_load {
            let acc = sums.entry(load.team_id.clone()).or_insert((0.0, 0.0));
            acc.0 += load.allocated;
            acc.1 += load.capacity;
        }
        let utilization_by_team: BTreeMap<String, f64> = sums
            .into_iter()
            .map(|(team, (allocated, capacity))| {
                let u = if capacity > 0.0 { (allocated / capacity).min(1.0) } else { 0.0 };
                (team, u)
            })
            .collect();
        let avg_utilization = if utilization_by_team.is_empty() {
            0.0
        } else {
            utilization_by_team.values().sum::<f64>() / utilization_by_team.len() as f64
        };

        Self {
            makespan_days,
            project_end,
            scheduled,
            unschedulable,
            completion_rate,
            utilization_by_team,
            avg_utilization,
            warnings: result.warnings.len(),
        }
    }
}
