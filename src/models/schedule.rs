//! Schedule (result) model.
//!
//! A schedule result is the timeline handed to the rendering layer:
//! one entry per scheduled task, the tasks that could not be scheduled
//! (with reasons), non-fatal warnings, and the per-day team load.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::EstimateUnit;

/// Which rule produced a task's effective workload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResolutionScenario {
    /// Remaining-estimate override on in-flight work.
    InFlight,
    /// Sum of subtask estimates.
    SubtaskRollup,
    /// The task's own estimate.
    ParentLevel,
    /// Zero-duration milestone.
    Milestone,
}

impl std::fmt::Display for ResolutionScenario {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::InFlight => "in-flight",
            Self::SubtaskRollup => "subtask-rollup",
            Self::ParentLevel => "parent-level",
            Self::Milestone => "milestone",
        };
        f.write_str(s)
    }
}

/// A scheduled task.
///
/// Created once by the scheduler and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    /// Scheduled task.
    pub task_id: String,
    /// First day of work (inclusive).
    pub start: NaiveDate,
    /// Last day of work (inclusive).
    pub end: NaiveDate,
    /// Working days between `start` and `end`, inclusive. 0 for milestones.
    pub working_days: u32,
    /// Team that carries the work. `None` for milestones and for
    /// summaries of unassigned parents.
    pub team_id: Option<String>,
    /// Provenance of the workload.
    pub scenario: ResolutionScenario,
    /// Effective workload in `workload_unit`.
    pub workload: Option<f64>,
    /// Unit of `workload`.
    pub workload_unit: Option<EstimateUnit>,
    /// Set when the task was scheduled as part of this ancestor's unit.
    pub covered_by: Option<String>,
}

impl ScheduleEntry {
    /// Whether the entry occupies working time.
    #[inline]
    pub fn consumes_time(&self) -> bool {
        self.working_days > 0
    }
}

/// Why a task could not be scheduled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum UnschedulableReason {
    /// No remaining, rollup, or own estimate.
    NoEstimate,
    /// Estimate units cannot be converted into the team's unit.
    UnitMismatch {
        /// Unit found on the task.
        found: EstimateUnit,
        /// Unit the team consumes (or the rollup unit).
        expected: EstimateUnit,
    },
    /// The assigned team is misconfigured.
    InvalidTeamConfig {
        /// Team id.
        team_id: String,
        /// What is wrong with it.
        message: String,
    },
    /// The assigned team has no configuration.
    UnknownTeam {
        /// Team id.
        team_id: String,
    },
    /// No assignment rule matched.
    NoTeam,
    /// More than one team matched.
    AmbiguousTeam {
        /// All matching teams.
        candidates: Vec<String>,
    },
    /// Team capacity never covered the workload within the period guard.
    CapacityExhausted {
        /// Working days scanned before giving up.
        periods_scanned: u32,
        /// Work left unallocated.
        unallocated: f64,
    },
    /// A dependency is unschedulable.
    DependencyUnschedulable {
        /// The dependency.
        dependency_id: String,
    },
    /// A subtask is unschedulable, so the summary has no end.
    SubtaskUnschedulable {
        /// The subtask.
        subtask_id: String,
    },
}

impl UnschedulableReason {
    /// Stable reason code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NoEstimate => "no_estimate",
            Self::UnitMismatch { .. } => "unit_mismatch",
            Self::InvalidTeamConfig { .. } => "invalid_team_config",
            Self::UnknownTeam { .. } => "unknown_team",
            Self::NoTeam => "no_team",
            Self::AmbiguousTeam { .. } => "ambiguous_team",
            Self::CapacityExhausted { .. } => "capacity_exhausted",
            Self::DependencyUnschedulable { .. } => "dependency_unschedulable",
            Self::SubtaskUnschedulable { .. } => "subtask_unschedulable",
        }
    }

    /// Whether this is a configuration error rather than missing data.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Self::UnitMismatch { .. } | Self::InvalidTeamConfig { .. } | Self::UnknownTeam { .. }
        )
    }
}

impl std::fmt::Display for UnschedulableReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoEstimate => write!(f, "no estimate could be resolved"),
            Self::UnitMismatch { found, expected } => {
                write!(f, "cannot convert {found} into {expected}")
            }
            Self::InvalidTeamConfig { team_id, message } => {
                write!(f, "team '{team_id}' is misconfigured: {message}")
            }
            Self::UnknownTeam { team_id } => write!(f, "team '{team_id}' is not configured"),
            Self::NoTeam => write!(f, "no team assignment rule matched"),
            Self::AmbiguousTeam { candidates } => {
                write!(f, "matches several teams: {}", candidates.join(", "))
            }
            Self::CapacityExhausted {
                periods_scanned,
                unallocated,
            } => write!(
                f,
                "capacity exhausted after {periods_scanned} working days ({unallocated} unallocated)"
            ),
            Self::DependencyUnschedulable { dependency_id } => {
                write!(f, "dependency '{dependency_id}' is unschedulable")
            }
            Self::SubtaskUnschedulable { subtask_id } => {
                write!(f, "subtask '{subtask_id}' is unschedulable")
            }
        }
    }
}

/// A task that could not be scheduled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnschedulableTask {
    /// Task id.
    pub task_id: String,
    /// Why.
    pub reason: UnschedulableReason,
}

/// Subtask sum and parent estimate disagree beyond the tolerance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DivergenceWarning {
    /// Parent task.
    pub task_id: String,
    /// Parent's own estimate, converted to `unit`.
    pub parent_quantity: f64,
    /// Sum of subtask estimates.
    pub subtask_quantity: f64,
    /// Unit of both quantities.
    pub unit: EstimateUnit,
}

impl DivergenceWarning {
    /// `|subtasks - parent| / parent`.
    pub fn relative_difference(&self) -> f64 {
        if self.parent_quantity == 0.0 {
            return f64::INFINITY;
        }
        (self.subtask_quantity - self.parent_quantity).abs() / self.parent_quantity
    }
}

/// Non-fatal findings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScheduleWarning {
    /// Subtask rollup diverges from the parent estimate.
    Divergence(DivergenceWarning),
    /// Dependencies push a milestone past its target date.
    MilestoneSlipped {
        /// Milestone id.
        task_id: String,
        /// Requested date.
        target: NaiveDate,
        /// Date it was placed on.
        scheduled: NaiveDate,
    },
}

/// Work a team carries on one day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamLoad {
    /// Team id.
    pub team_id: String,
    /// Working day.
    pub date: NaiveDate,
    /// Allocated quantity.
    pub allocated: f64,
    /// Capacity of that day.
    pub capacity: f64,
}

/// Result of one scheduling run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScheduleResult {
    /// Scheduled tasks, in scheduling order.
    pub entries: Vec<ScheduleEntry>,
    /// Tasks that could not be scheduled.
    pub unschedulable: Vec<UnschedulableTask>,
    /// Divergence and milestone warnings.
    pub warnings: Vec<ScheduleWarning>,
    /// Per (team, day) allocations, sorted by team then date.
    pub team_load: Vec<TeamLoad>,
    /// Task id to position in `entries` / `unschedulable`.
    #[serde(skip)]
    positions: HashMap<String, Position>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Position {
    Entry(usize),
    Unschedulable(usize),
}

impl ScheduleResult {
    /// Creates an empty result.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds the id lookup after `entries` or `unschedulable` changed.
    ///
    /// Lookups stay correct without it (they fall back to a scan when the
    /// index is missing or stale), just slower.
    pub fn reindex(&mut self) {
        self.positions.clear();
        for (i, e) in self.entries.iter().enumerate() {
            self.positions.insert(e.task_id.clone(), Position::Entry(i));
        }
        for (i, u) in self.unschedulable.iter().enumerate() {
            self.positions
                .entry(u.task_id.clone())
                .or_insert(Position::Unschedulable(i));
        }
    }

    /// Finds the entry for a task.
    pub fn entry(&self, task_id: &str) -> Option<&ScheduleEntry> {
        match self.positions.get(task_id) {
            Some(&Position::Entry(i)) => {
                if let Some(e) = self.entries.get(i).filter(|e| e.task_id == task_id) {
                    return Some(e);
                }
            }
            Some(&Position::Unschedulable(i))
                if self.unschedulable.get(i).is_some_and(|u| u.task_id == task_id) =>
            {
                return None;
            }
            _ => {}
        }
        self.entries.iter().find(|e| e.task_id == task_id)
    }

    /// Reason a task is unschedulable, if it is.
    pub fn unschedulable_reason(&self, task_id: &str) -> Option<&UnschedulableReason> {
        match self.positions.get(task_id) {
            Some(&Position::Unschedulable(i)) => {
                if let Some(u) = self.unschedulable.get(i).filter(|u| u.task_id == task_id) {
                    return Some(&u.reason);
                }
            }
            Some(&Position::Entry(i))
                if self.entries.get(i).is_some_and(|e| e.task_id == task_id) =>
            {
                return None;
            }
            _ => {}
        }
        self.unschedulable
            .iter()
            .find(|u| u.task_id == task_id)
            .map(|u| &u.reason)
    }

    /// Whether a task is unschedulable.
    pub fn is_unschedulable(&self, task_id: &str) -> bool {
        self.unschedulable_reason(task_id).is_some()
    }

    /// Whether every task was scheduled.
    pub fn is_complete(&self) -> bool {
        self.unschedulable.is_empty()
    }

    /// Earliest start across all entries.
    pub fn project_start(&self) -> Option<NaiveDate> {
        self.entries.iter().map(|e| e.start).min()
    }

    /// Latest end across all entries.
    pub fn project_end(&self) -> Option<NaiveDate> {
        self.entries.iter().map(|e| e.end).max()
    }

    /// Entries carried by a team.
    pub fn entries_for_team(&self, team_id: &str) -> Vec<&ScheduleEntry> {
        self.entries
            .iter()
            .filter(|e| e.team_id.as_deref() == Some(team_id))
            .collect()
    }

    /// Divergence warnings only.
    pub fn divergences(&self) -> Vec<&DivergenceWarning> {
        self.warnings
            .iter()
            .filter_map(|w| match w {
                ScheduleWarning::Divergence(d) => Some(d),
                ScheduleWarning::MilestoneSlipped { .. } => None,
            })
            .collect()
    }

    /// Total allocated per team.
    pub fn allocated_by_team(&self) -> HashMap<String, f64> {
        let mut totals: HashMap<String, f64> = HashMap::new();
        for load in &self.team_load {
            *totals.entry(load.team_id.clone()).or_insert(0.0) += load.allocated;
        }
        totals
    }

    /// Number of scheduled entries.
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }
}
