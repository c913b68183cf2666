//! Effective workload resolution.
//!
//! Decides how much work a task represents, and which rule decided it.
//!
//! # Priority
//!
//! | Order | Rule | Scenario |
//! |-------|------|----------|
//! | 0 | Task is a milestone | `Milestone` (zero work) |
//! | 1 | Positive remaining-estimate override | `InFlight` |
//! | 2 | Subtasks sum to a positive quantity | `SubtaskRollup` |
//! | 3 | Positive own estimate | `ParentLevel` |
//! | 4 | Nothing usable | `NoEstimate` failure |
//!
//! A subtask's contribution to a rollup follows the same order (remaining,
//! then its own rollup, then its estimate). The parent's own estimate is
//! only cross-checked against the rollup; a divergence beyond the
//! tolerance is reported, never applied.
//!
//! # Units
//! Days are effort days and become hours via `hours_per_day`. Hours and
//! points never convert into each other; a team consumes exactly one of
//! them.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::graph::TaskIndex;
use crate::models::{
    DivergenceWarning, Estimate, EstimateUnit, ResolutionScenario, TeamConfig, UnschedulableReason,
};

/// Resolved amount of work for one task.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EffectiveWorkload {
    /// Amount of work in `unit`.
    pub quantity: f64,
    /// Hours or points (days are normalized away).
    pub unit: EstimateUnit,
    /// Rule that produced it.
    pub scenario: ResolutionScenario,
}

/// Output of [`EstimationResolver::resolve`].
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    /// The effective workload.
    pub workload: EffectiveWorkload,
    /// Rollup vs. parent estimate disagreement, if beyond tolerance.
    pub divergence: Option<DivergenceWarning>,
}

/// Estimation resolver.
///
/// # Example
/// ```
/// use gantt_schedule::estimation::EstimationResolver;
/// use gantt_schedule::graph::TaskIndex;
/// use gantt_schedule::models::{Estimate, ResolutionScenario, Task};
///
/// let tasks = vec![
///     Task::new("S1").with_estimate(Estimate::hours(12.0)).with_parent("P"),
///     Task::new("S2").with_estimate(Estimate::days(1.0)).with_parent("P"),
///     Task::new("P"),
/// ];
/// let index = TaskIndex::new(&tasks).unwrap();
/// let r = EstimationResolver::new().resolve(&index, 2, None).unwrap();
/// assert_eq!(r.workload.scenario, ResolutionScenario::SubtaskRollup);
/// assert!((r.workload.quantity - 20.0).abs() < 1e-9);
/// ```
#[derive(Debug, Clone)]
pub struct EstimationResolver {
    hours_per_day: f64,
    divergence_tolerance: f64,
}

impl EstimationResolver {
    /// Creates a resolver with 8 hours per day and a 10% tolerance.
    pub fn new() -> Self {
        Self {
            hours_per_day: 8.0,
            divergence_tolerance: 0.1,
        }
    }

    /// Sets the hours in one effort day.
    pub fn with_hours_per_day(mut self, hours: f64) -> Self {
        self.hours_per_day = hours;
        self
    }

    /// Sets the relative divergence tolerance (0.1 = 10%).
    pub fn with_divergence_tolerance(mut self, tolerance: f64) -> Self {
        self.divergence_tolerance = tolerance;
        self
    }

    /// Expresses an estimate in hours or points.
    pub fn normalize(&self, estimate: Estimate) -> Estimate {
        match estimate.unit {
            EstimateUnit::Days => Estimate::hours(estimate.value * self.hours_per_day),
            _ => estimate,
        }
    }

    /// Converts an estimate into the unit a team consumes.
    pub fn to_team_units(
        &self,
        estimate: Estimate,
        team: &TeamConfig,
    ) -> Result<f64, UnschedulableReason> {
        let normalized = self.normalize(estimate);
        let expected = team.unit.as_estimate_unit();
        if normalized.unit == expected {
            Ok(normalized.value)
        } else {
            Err(UnschedulableReason::UnitMismatch {
                found: estimate.unit,
                expected,
            })
        }
    }

    /// Resolves the effective workload of `index.task(idx)`.
    ///
    /// With a team, the quantity is expressed in the team's unit and a
    /// unit mismatch is a failure. Without one (summaries), the quantity
    /// stays in its normalized unit.
    ///
    /// The hierarchy must be acyclic (checked by `DependencyGraph::build`).
    pub fn resolve(
        &self,
        index: &TaskIndex<'_>,
        idx: usize,
        team: Option<&TeamConfig>,
    ) -> Result<Resolution, UnschedulableReason> {
        let task = index.task(idx);

        if task.milestone {
            let unit = team.map_or(EstimateUnit::Hours, |t| t.unit.as_estimate_unit());
            return Ok(Resolution {
                workload: EffectiveWorkload {
                    quantity: 0.0,
                    unit,
                    scenario: ResolutionScenario::Milestone,
                },
                divergence: None,
            });
        }

        if let Some(remaining) = task.remaining_estimate.filter(Estimate::is_positive) {
            return Ok(Resolution {
                workload: self.workload(remaining, team, ResolutionScenario::InFlight)?,
                divergence: None,
            });
        }

        if index.has_children(idx) {
            if let Some(sum) = self.rollup(index, idx)? {
                let divergence = self.cross_check(task.id.as_str(), task.estimate, sum);
                return Ok(Resolution {
                    workload: self.workload(sum, team, ResolutionScenario::SubtaskRollup)?,
                    divergence,
                });
            }
        }

        if let Some(own) = task.estimate.filter(Estimate::is_positive) {
            return Ok(Resolution {
                workload: self.workload(own, team, ResolutionScenario::ParentLevel)?,
                divergence: None,
            });
        }

        Err(UnschedulableReason::NoEstimate)
    }

    /// Sum of subtask quantities, or `None` if it is not positive.
    pub fn rollup(
        &self,
        index: &TaskIndex<'_>,
        idx: usize,
    ) -> Result<Option<Estimate>, UnschedulableReason> {
        let mut sum: Option<Estimate> = None;
        for &child in index.children(idx) {
            let Some(part) = self.contribution(index, child)? else {
                continue;
            };
            sum = Some(match sum {
                None => part,
                Some(acc) if acc.unit == part.unit => Estimate::new(acc.value + part.value, acc.unit),
                Some(acc) => {
                    return Err(UnschedulableReason::UnitMismatch {
                        found: part.unit,
                        expected: acc.unit,
                    });
                }
            });
        }
        Ok(sum.filter(Estimate::is_positive))
    }

    /// What a subtask contributes to its parent's rollup, normalized.
    fn contribution(
        &self,
        index: &TaskIndex<'_>,
        idx: usize,
    ) -> Result<Option<Estimate>, UnschedulableReason> {
        let task = index.task(idx);
        if task.milestone {
            return Ok(None);
        }
        if let Some(remaining) = task.remaining_estimate.filter(Estimate::is_positive) {
            return Ok(Some(self.normalize(remaining)));
        }
        if index.has_children(idx) {
            if let Some(sum) = self.rollup(index, idx)? {
                return Ok(Some(sum));
            }
        }
        Ok(task
            .estimate
            .filter(Estimate::is_positive)
            .map(|e| self.normalize(e)))
    }

    fn workload(
        &self,
        estimate: Estimate,
        team: Option<&TeamConfig>,
        scenario: ResolutionScenario,
    ) -> Result<EffectiveWorkload, UnschedulableReason> {
        let (quantity, unit) = match team {
            Some(team) => (self.to_team_units(estimate, team)?, team.unit.as_estimate_unit()),
            None => {
                let n = self.normalize(estimate);
                (n.value, n.unit)
            }
        };
        Ok(EffectiveWorkload {
            quantity,
            unit,
            scenario,
        })
    }

    fn cross_check(
        &self,
        task_id: &str,
        parent: Option<Estimate>,
        rollup: Estimate,
    ) -> Option<DivergenceWarning> {
        let parent = self.normalize(parent.filter(Estimate::is_positive)?);
        if parent.unit != rollup.unit {
            debug!(
                task_id,
                parent_unit = %parent.unit,
                rollup_unit = %rollup.unit,
                "parent estimate not comparable with subtask rollup"
            );
            return None;
        }

        let warning = DivergenceWarning {
            task_id: task_id.to_string(),
            parent_quantity: parent.value,
            subtask_quantity: rollup.value,
            unit: rollup.unit,
        };
        (warning.relative_difference() > self.divergence_tolerance).then_some(warning)
    }
}

impl Default for EstimationResolver {
    fn default() -> Self {
        Self::new()
    }
}
