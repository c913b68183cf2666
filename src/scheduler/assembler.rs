//! Result assembly.
//!
//! Collects what the engine decides into a [`ScheduleResult`]. No
//! business logic lives here.

use crate::models::{
    ScheduleEntry, ScheduleResult, ScheduleWarning, TeamLoad, UnschedulableReason,
    UnschedulableTask,
};

/// Accumulates one run's output.
#[derive(Debug, Default)]
pub struct ResultAssembler {
    result: ScheduleResult,
}

impl ResultAssembler {
    /// Creates an empty assembler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a committed entry.
    pub fn record_entry(&mut self, entry: ScheduleEntry) {
        self.result.entries.push(entry);
    }

    /// Inserts a committed entry at `position`, clamped to the end.
    pub fn record_entry_at(&mut self, position: usize, entry: ScheduleEntry) {
        let position = position.min(self.result.entries.len());
        self.result.entries.insert(position, entry);
    }

    /// Adds an unschedulable task.
    pub fn record_unschedulable(&mut self, task_id: impl Into<String>, reason: UnschedulableReason) {
        self.result.unschedulable.push(UnschedulableTask {
            task_id: task_id.into(),
            reason,
        });
    }

    /// Adds a warning.
    pub fn record_warning(&mut self, warning: ScheduleWarning) {
        self.result.warnings.push(warning);
    }

    /// Entries recorded so far.
    pub fn entry_count(&self) -> usize {
        self.result.entries.len()
    }

    /// Finishes the result with the ledger snapshot.
    pub fn finish(mut self, team_load: Vec<TeamLoad>) -> ScheduleResult {
        self.result.team_load = team_load;
        self.result.reindex();
        self.result
    }
}
