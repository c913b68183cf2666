//! Input validation for scheduling runs.
//!
//! Checks structural integrity of tasks and teams before the graph is
//! built. Detects:
//! - Duplicate task and team IDs
//! - Dependencies on tasks that don't exist
//! - Parent links to tasks that don't exist
//! - Tasks depending on, or parented by, themselves
//!
//! Cycles are detected by [`DependencyGraph`](crate::graph::DependencyGraph),
//! which needs the references checked here to be sound.

use crate::models::{Task, TeamConfig};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidationErrorKind {
    /// Two entities share the same ID.
    DuplicateId,
    /// A task depends on a task that doesn't exist.
    UnknownDependency,
    /// A task names a parent that doesn't exist.
    UnknownParent,
    /// A task depends on itself or is its own parent.
    SelfReference,
}

impl ValidationError {
    pub(crate) fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates task references.
///
/// Checks:
/// 1. No duplicate task IDs
/// 2. No self dependencies or self parenting
/// 3. All dependency references point to existing tasks
/// 4. All parent references point to existing tasks
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_structure(tasks: &[Task]) -> ValidationResult {
    let mut errors = Vec::new();

    let mut task_ids = HashSet::new();
    for task in tasks {
        if !task_ids.insert(task.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate task ID: {}", task.id),
            ));
        }
    }

    for task in tasks {
        for dep in &task.dependencies {
            if dep == &task.id {
                errors.push(ValidationError::new(
                    ValidationErrorKind::SelfReference,
                    format!("Task '{}' depends on itself", task.id),
                ));
            } else if !task_ids.contains(dep.as_str()) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::UnknownDependency,
                    format!("Task '{}' depends on unknown task '{}'", task.id, dep),
                ));
            }
        }

        if let Some(parent) = &task.parent_id {
            if parent == &task.id {
                errors.push(ValidationError::new(
                    ValidationErrorKind::SelfReference,
                    format!("Task '{}' is its own parent", task.id),
                ));
            } else if !task_ids.contains(parent.as_str()) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::UnknownParent,
                    format!("Task '{}' has unknown parent '{}'", task.id, parent),
                ));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validates team identifiers.
///
/// Per-team configuration problems (velocity, capacity) are not checked
/// here: they only affect the tasks that use the team.
pub fn validate_teams(teams: &[TeamConfig]) -> ValidationResult {
    let mut errors = Vec::new();
    let mut team_ids = HashSet::new();
    for team in teams {
        if !team_ids.insert(team.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate team ID: {}", team.id),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Estimate;

    fn sample_tasks() -> Vec<Task> {
        vec![
            Task::new("E1").with_estimate(Estimate::points(20.0)),
            Task::new("S1").with_parent("E1").with_estimate(Estimate::hours(8.0)),
            Task::new("S2")
                .with_parent("E1")
                .with_dependency("S1")
                .with_estimate(Estimate::hours(4.0)),
        ]
    }

    #[test]
    fn test_valid_input() {
        assert!(validate_structure(&sample_tasks()).is_ok());
    }

    #[test]
    fn test_duplicate_task_id() {
        let tasks = vec![Task::new("T1"), Task::new("T1")];
        let errors = validate_structure(&tasks).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::DuplicateId));
    }

    #[test]
    fn test_unknown_dependency() {
        let tasks = vec![Task::new("T1").with_dependency("NONEXISTENT")];
        let errors = validate_structure(&tasks).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ValidationErrorKind::UnknownDependency);
        assert!(errors[0].message.contains("NONEXISTENT"));
    }

    #[test]
    fn test_unknown_parent() {
        let tasks = vec![Task::new("T1").with_parent("E9")];
        let errors = validate_structure(&tasks).unwrap_err();
        assert_eq!(errors[0].kind, ValidationErrorKind::UnknownParent);
    }

    #[test]
    fn test_self_reference() {
        let tasks = vec![
            Task::new("T1").with_dependency("T1"),
            Task::new("T2").with_parent("T2"),
        ];
        let errors = validate_structure(&tasks).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors
            .iter()
            .all(|e| e.kind == ValidationErrorKind::SelfReference));
    }

    #[test]
    fn test_multiple_errors() {
        let tasks = vec![
            Task::new("T1").with_dependency("X"),
            Task::new("T1").with_parent("Y"),
        ];
        let errors = validate_structure(&tasks).unwrap_err();
        assert!(errors.len() >= 3);
    }

    #[test]
    fn test_duplicate_team_id() {
        let teams = vec![TeamConfig::hours("web", 8.0), TeamConfig::hours("web", 6.0)];
        let errors = validate_teams(&teams).unwrap_err();
        assert!(errors[0].message.contains("team"));

        assert!(validate_teams(&[TeamConfig::hours("web", 8.0)]).is_ok());
    }
}
