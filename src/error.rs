//! Run-level error types.
//!
//! Only structural and configuration problems that make the whole run
//! meaningless surface here. Per-task problems degrade to
//! [`UnschedulableReason`](crate::models::UnschedulableReason) entries instead.

use crate::validation::ValidationError;

/// The result type used throughout gantt-schedule.
pub type Result<T> = std::result::Result<T, ScheduleError>;

/// Errors that abort a scheduling run.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScheduleError {
    /// Structural input problems (duplicate ids, dangling references).
    #[error("invalid scheduling input: {}", summarize(.errors))]
    InvalidInput {
        /// Every issue found, not just the first.
        errors: Vec<ValidationError>,
    },

    /// The precedence graph contains a cycle.
    #[error("cyclic dependency between tasks: {}", .task_ids.join(" -> "))]
    CyclicDependency {
        /// Task ids on the cycle, in traversal order.
        task_ids: Vec<String>,
    },

    /// The calendar has no working days at all.
    #[error("invalid calendar: {reason}")]
    InvalidCalendar {
        /// Why the calendar was rejected.
        reason: String,
    },

    /// Scheduler configuration is unusable.
    #[error("invalid scheduler configuration: {reason}")]
    InvalidConfig {
        /// Why the configuration was rejected.
        reason: String,
    },

    /// A title pattern in the team rules failed to compile.
    #[error("invalid team rule pattern '{pattern}': {reason}")]
    InvalidTeamRule {
        /// The offending pattern.
        pattern: String,
        /// Compiler message.
        reason: String,
    },
}

fn summarize(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ValidationErrorKind;

    #[test]
    fn test_cycle_message_names_tasks() {
        let err = ScheduleError::CyclicDependency {
            task_ids: vec!["A".into(), "B".into(), "A".into()],
        };
        assert_eq!(err.to_string(), "cyclic dependency between tasks: A -> B -> A");
    }

    #[test]
    fn test_invalid_input_lists_all() {
        let err = ScheduleError::InvalidInput {
            errors: vec![
                ValidationError::new(ValidationErrorKind::DuplicateId, "Duplicate task ID: T1"),
                ValidationError::new(ValidationErrorKind::UnknownParent, "Task 'T2' has unknown parent 'X'"),
            ],
        };
        let msg = err.to_string();
        assert!(msg.contains("Duplicate task ID: T1"));
        assert!(msg.contains("unknown parent 'X'"));
    }
}
