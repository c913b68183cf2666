//! Team assignment rules.
//!
//! Every task is owned by exactly one team. The owner is taken from the
//! first rule that yields an answer:
//!
//! 1. The task's explicit `team_id`
//! 2. Label rules (`label → team`), case-insensitive
//! 3. Title patterns (regular expressions, in configured order)
//! 4. The parent's team
//!
//! A label or pattern step that matches several different teams is an
//! error rather than a guess: shared ownership must be split into
//! subtasks upstream.

use std::collections::BTreeMap;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ScheduleError};
use crate::models::{Task, UnschedulableReason};

/// A title pattern rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TitlePattern {
    /// Regular expression matched against the task title.
    pub pattern: String,
    /// Team assigned on match.
    pub team: String,
}

/// Serializable team assignment rules.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TeamRules {
    /// Label → team.
    pub labels: BTreeMap<String, String>,
    /// Title patterns, tried in order.
    pub title_patterns: Vec<TitlePattern>,
}

impl TeamRules {
    /// Creates empty rules (explicit fields and inheritance only).
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a label rule.
    pub fn with_label(mut self, label: impl Into<String>, team: impl Into<String>) -> Self {
        self.labels.insert(label.into(), team.into());
        self
    }

    /// Adds a title pattern rule.
    pub fn with_title_pattern(mut self, pattern: impl Into<String>, team: impl Into<String>) -> Self {
        self.title_patterns.push(TitlePattern {
            pattern: pattern.into(),
            team: team.into(),
        });
        self
    }
}

/// Which rule produced an assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignmentSource {
    /// The task's `team_id` field.
    Explicit,
    /// A label rule.
    Label,
    /// A title pattern.
    TitlePattern,
    /// Inherited from the parent.
    Inherited,
}

/// A resolved team assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamAssignment {
    /// Owning team.
    pub team_id: String,
    /// Rule that decided it.
    pub source: AssignmentSource,
}

/// Compiled [`TeamRules`].
///
/// # Example
/// ```
/// use gantt_schedule::assignment::{TeamResolver, TeamRules};
/// use gantt_schedule::models::Task;
///
/// let rules = TeamRules::new()
///     .with_label("frontend", "web")
///     .with_title_pattern(r"(?i)^\[api\]", "backend");
/// let resolver = TeamResolver::new(&rules).unwrap();
///
/// let task = Task::new("T1").with_title("[API] rate limits");
/// assert_eq!(resolver.resolve(&task, None).unwrap().team_id, "backend");
/// ```
#[derive(Debug, Clone, Default)]
pub struct TeamResolver {
    labels: BTreeMap<String, String>,
    patterns: Vec<(Regex, String)>,
}

impl TeamResolver {
    /// Compiles the rules.
    ///
    /// # Errors
    /// [`ScheduleError::InvalidTeamRule`] for a pattern that fails to compile.
    pub fn new(rules: &TeamRules) -> Result<Self> {
        let labels = rules
            .labels
            .iter()
            .map(|(label, team)| (label.to_lowercase(), team.clone()))
            .collect();

        let patterns = rules
            .title_patterns
            .iter()
            .map(|rule| {
                Regex::new(&rule.pattern)
                    .map(|re| (re, rule.team.clone()))
                    .map_err(|e| ScheduleError::InvalidTeamRule {
                        pattern: rule.pattern.clone(),
                        reason: e.to_string(),
                    })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { labels, patterns })
    }

    /// Resolves the owning team of `task`.
    ///
    /// `inherited` is the parent's team, if the parent has one.
    pub fn resolve(
        &self,
        task: &Task,
        inherited: Option<&str>,
    ) -> std::result::Result<TeamAssignment, UnschedulableReason> {
        if let Some(team) = task.team_id.as_deref().filter(|t| !t.is_empty()) {
            return Ok(TeamAssignment {
                team_id: team.to_string(),
                source: AssignmentSource::Explicit,
            });
        }

        let by_label = task
            .labels
            .iter()
            .filter_map(|label| self.labels.get(&label.to_lowercase()).map(String::as_str));
        if let Some(team_id) = single_team(by_label)? {
            return Ok(TeamAssignment {
                team_id,
                source: AssignmentSource::Label,
            });
        }

        let by_title = self
            .patterns
            .iter()
            .filter(|(re, _)| re.is_match(&task.title))
            .map(|(_, team)| team.as_str());
        if let Some(team_id) = single_team(by_title)? {
            return Ok(TeamAssignment {
                team_id,
                source: AssignmentSource::TitlePattern,
            });
        }

        match inherited {
            Some(team) => Ok(TeamAssignment {
                team_id: team.to_string(),
                source: AssignmentSource::Inherited,
            }),
            None => Err(UnschedulableReason::NoTeam),
        }
    }
}

/// `Ok(None)` for no match, `Ok(Some)` for one distinct team,
/// `Err(AmbiguousTeam)` for several.
fn single_team<'a>(
    matches: impl Iterator<Item = &'a str>,
) -> std::result::Result<Option<String>, UnschedulableReason> {
    let mut candidates: Vec<String> = Vec::new();
    for team in matches {
        if !candidates.iter().any(|c| c == team) {
            candidates.push(team.to_string());
        }
    }
    match candidates.len() {
        0 => Ok(None),
        1 => Ok(candidates.pop()),
        _ => Err(UnschedulableReason::AmbiguousTeam { candidates }),
    }
}
