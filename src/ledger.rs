//! Per-run team capacity bookkeeping.
//!
//! The ledger records how much of each team's daily capacity has been
//! consumed. One ledger belongs to exactly one scheduling run: it is
//! created empty, mutated only through [`CapacityLedger::allocate`] and
//! [`CapacityLedger::rollback`], and dropped with the run.
//!
//! # Periods
//! A period is one working day, identified by its date. Every working day
//! of a team has the same capacity.
//!
//! # Invariant
//! `allocated(team, day) <= capacity(team)` for every team and day.

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::models::TeamLoad;

/// Tolerance for floating-point capacity comparisons.
pub const CAPACITY_EPSILON: f64 = 1e-9;

/// An allocation that does not fit.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("team '{team_id}' has {available} left on {period}, requested {requested}")]
pub struct CapacityShortfall {
    /// Team id.
    pub team_id: String,
    /// Period (working day).
    pub period: NaiveDate,
    /// Requested amount.
    pub requested: f64,
    /// Remaining capacity.
    pub available: f64,
}

/// Team capacity ledger.
///
/// # Example
/// ```
/// use chrono::NaiveDate;
/// use gantt_schedule::ledger::CapacityLedger;
///
/// let day = NaiveDate::from_ymd_opt(2025, 1, 6).unwrap();
/// let mut ledger = CapacityLedger::new();
/// ledger.register_team("web", 8.0);
///
/// assert!(ledger.allocate("web", day, 6.0).is_ok());
/// assert!(ledger.allocate("web", day, 4.0).is_err()); // only 2 left
/// assert!((ledger.remaining("web", day) - 2.0).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, Default)]
pub struct CapacityLedger {
    slots: HashMap<String, usize>,
    team_ids: Vec<String>,
    capacities: Vec<f64>,
    consumed: HashMap<(usize, NaiveDate), f64>,
}

impl CapacityLedger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a team with its capacity per working day.
    ///
    /// Re-registering replaces the capacity but keeps consumption.
    pub fn register_team(&mut self, team_id: impl Into<String>, capacity_per_period: f64) {
        let team_id = team_id.into();
        let capacity = capacity_per_period.max(0.0);
        match self.slots.get(&team_id) {
            Some(&slot) => self.capacities[slot] = capacity,
            None => {
                self.slots.insert(team_id.clone(), self.team_ids.len());
                self.team_ids.push(team_id);
                self.capacities.push(capacity);
            }
        }
    }

    /// Whether a team is registered.
    pub fn has_team(&self, team_id: &str) -> bool {
        self.slots.contains_key(team_id)
    }

    /// Capacity per working day. 0.0 for unknown teams.
    pub fn capacity(&self, team_id: &str) -> f64 {
        self.slots
            .get(team_id)
            .map_or(0.0, |&slot| self.capacities[slot])
    }

    /// Amount consumed on a day.
    pub fn allocated(&self, team_id: &str, period: NaiveDate) -> f64 {
        self.slots
            .get(team_id)
            .and_then(|&slot| self.consumed.get(&(slot, period)))
            .copied()
            .unwrap_or(0.0)
    }

    /// Capacity left on a day. 0.0 for unknown teams.
    pub fn remaining(&self, team_id: &str, period: NaiveDate) -> f64 {
        (self.capacity(team_id) - self.allocated(team_id, period)).max(0.0)
    }

    /// Consumes `amount` of a team's capacity on `period`.
    ///
    /// Returns the capacity left afterwards. Nothing is consumed when the
    /// amount does not fit.
    pub fn allocate(
        &mut self,
        team_id: &str,
        period: NaiveDate,
        amount: f64,
    ) -> Result<f64, CapacityShortfall> {
        let available = self.remaining(team_id, period);
        let slot = match self.slots.get(team_id) {
            Some(&slot) if amount <= available + CAPACITY_EPSILON => slot,
            _ => {
                return Err(CapacityShortfall {
                    team_id: team_id.to_string(),
                    period,
                    requested: amount,
                    available,
                });
            }
        };

        let used = self.consumed.entry((slot, period)).or_insert(0.0);
        *used = (*used + amount.max(0.0)).min(self.capacities[slot]);
        Ok((self.capacities[slot] - *used).max(0.0))
    }

    /// Returns `amount` of previously allocated capacity.
    ///
    /// Consumption never drops below zero.
    pub fn rollback(&mut self, team_id: &str, period: NaiveDate, amount: f64) {
        let Some(&slot) = self.slots.get(team_id) else {
            return;
        };
        if let Some(used) = self.consumed.get_mut(&(slot, period)) {
            *used = (*used - amount.max(0.0)).max(0.0);
            if *used <= CAPACITY_EPSILON {
                self.consumed.remove(&(slot, period));
            }
        }
    }

    /// All non-empty allocations, sorted by team id then date.
    pub fn snapshot(&self) -> Vec<TeamLoad> {
        let mut loads: Vec<TeamLoad> = self
            .consumed
            .iter()
            .filter(|(_, &used)| used > CAPACITY_EPSILON)
            .map(|(&(slot, date), &used)| TeamLoad {
                team_id: self.team_ids[slot].clone(),
                date,
                allocated: used,
                capacity: self.capacities[slot],
            })
            .collect();
        loads.sort_by(|a, b| a.team_id.cmp(&b.team_id).then(a.date.cmp(&b.date)));
        loads
    }
}
