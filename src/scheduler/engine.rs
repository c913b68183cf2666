//! Capacity-levelled Gantt scheduler.
//!
//! # Algorithm
//!
//! 1. Validate structure and build the precedence graph (fatal on error).
//! 2. Resolve every task's team and effective workload.
//! 3. Group parents that are scheduled as one unit (in-flight or
//!    parent-level estimates) with their subtasks. A group whose merging
//!    would close a precedence cycle is split again: its subtasks are
//!    placed individually and the parent spans them.
//! 4. Visit units in precedence order. For each unit:
//!    - earliest start = max(project start, readiness of every gate)
//!    - walk working days, drawing from the team's remaining capacity
//!      and spilling what does not fit into the next day
//!    - commit an entry, or report the unit as unschedulable
//! 5. Summaries (subtask rollups) span their subtasks.
//!
//! # Complexity
//! O(V + E) for ordering plus O(D) ledger lookups per task, where D is the
//! number of working days its work spans.
//!
//! # Reference
//! Kolisch (1996), "Serial and parallel resource-constrained project
//! scheduling methods revisited"

use std::collections::HashMap;

use chrono::NaiveDate;
use tracing::{debug, info, info_span, warn};

use super::assembler::ResultAssembler;
use super::config::SchedulerConfig;
use crate::assignment::{TeamAssignment, TeamResolver, TeamRules};
use crate::error::{Result, ScheduleError};
use crate::estimation::{EffectiveWorkload, EstimationResolver};
use crate::graph::{DependencyGraph, TaskIndex};
use crate::ledger::{CapacityLedger, CAPACITY_EPSILON};
use crate::models::{
    ResolutionScenario, ScheduleEntry, ScheduleResult, ScheduleWarning, Task, TeamConfig,
    UnschedulableReason, WorkCalendar,
};
use crate::validation::validate_teams;

/// Input container for scheduling.
#[derive(Debug, Clone)]
pub struct ScheduleRequest {
    /// Tasks to schedule.
    pub tasks: Vec<Task>,
    /// Team configurations.
    pub teams: Vec<TeamConfig>,
    /// Run settings.
    pub config: SchedulerConfig,
    /// Team assignment rules.
    pub team_rules: TeamRules,
}

impl ScheduleRequest {
    /// Creates a new schedule request.
    pub fn new(tasks: Vec<Task>, teams: Vec<TeamConfig>, config: SchedulerConfig) -> Self {
        Self {
            tasks,
            teams,
            config,
            team_rules: TeamRules::default(),
        }
    }

    /// Sets team assignment rules.
    pub fn with_team_rules(mut self, rules: TeamRules) -> Self {
        self.team_rules = rules;
        self
    }
}

/// Gantt scheduler.
///
/// Holds only immutable settings; every call to [`schedule`](Self::schedule)
/// builds its own capacity ledger, so one scheduler can serve concurrent
/// runs.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use gantt_schedule::models::{Estimate, Task, TeamConfig};
/// use gantt_schedule::scheduler::{GanttScheduler, SchedulerConfig};
///
/// let monday = NaiveDate::from_ymd_opt(2025, 1, 6).unwrap();
/// let tasks = vec![
///     Task::new("A").with_team("web").with_estimate(Estimate::hours(8.0)),
///     Task::new("B").with_team("web").with_estimate(Estimate::hours(8.0)).with_dependency("A"),
/// ];
/// let teams = vec![TeamConfig::hours("web", 8.0)];
///
/// let scheduler = GanttScheduler::new(SchedulerConfig::new(monday)).unwrap();
/// let result = scheduler.schedule(&tasks, &teams).unwrap();
/// assert_eq!(result.entry("A").unwrap().end, monday);
/// assert_eq!(result.entry("B").unwrap().start, NaiveDate::from_ymd_opt(2025, 1, 7).unwrap());
/// ```
#[derive(Debug, Clone)]
pub struct GanttScheduler {
    config: SchedulerConfig,
    calendar: WorkCalendar,
    estimator: EstimationResolver,
    team_resolver: TeamResolver,
}

impl GanttScheduler {
    /// Creates a scheduler.
    ///
    /// # Errors
    /// [`ScheduleError::InvalidConfig`] or [`ScheduleError::InvalidCalendar`].
    pub fn new(config: SchedulerConfig) -> Result<Self> {
        config.validate()?;
        let calendar = WorkCalendar::new(config.calendar.clone())?;
        let estimator = EstimationResolver::new()
            .with_hours_per_day(config.hours_per_day)
            .with_divergence_tolerance(config.divergence_tolerance);
        Ok(Self {
            config,
            calendar,
            estimator,
            team_resolver: TeamResolver::default(),
        })
    }

    /// Sets compiled team assignment rules.
    pub fn with_team_resolver(mut self, resolver: TeamResolver) -> Self {
        self.team_resolver = resolver;
        self
    }

    /// The run settings.
    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// The working-day calendar.
    pub fn calendar(&self) -> &WorkCalendar {
        &self.calendar
    }

    /// Schedules tasks on teams.
    ///
    /// # Errors
    /// Only structural problems abort the run: duplicate ids, dangling
    /// references ([`ScheduleError::InvalidInput`]) and cycles
    /// ([`ScheduleError::CyclicDependency`]). Everything else is reported
    /// per task in [`ScheduleResult::unschedulable`].
    pub fn schedule(&self, tasks: &[Task], teams: &[TeamConfig]) -> Result<ScheduleResult> {
        let span = info_span!("schedule", tasks = tasks.len(), teams = teams.len());
        let _guard = span.enter();

        validate_teams(teams).map_err(|errors| ScheduleError::InvalidInput { errors })?;
        let index = TaskIndex::new(tasks)?;
        let graph = DependencyGraph::build(&index)?;

        let mut run = Run::new(self, &index, teams);
        run.plan();
        let order = loop {
            match graph.condensed_order(&run.group_of) {
                Ok(order) => break order,
                Err(cycle) => {
                    if !run.split_group(&cycle.representatives) {
                        return Err(ScheduleError::CyclicDependency {
                            task_ids: cycle
                                .representatives
                                .iter()
                                .map(|&i| index.task(i).id.clone())
                                .collect(),
                        });
                    }
                }
            }
        };
        for unit in order {
            run.place(unit);
        }
        let result = run.finish();

        info!(
            scheduled = result.entries.len(),
            unschedulable = result.unschedulable.len(),
            warnings = result.warnings.len(),
            "schedule complete"
        );
        Ok(result)
    }

    /// Schedules from a request.
    pub fn schedule_request(request: &ScheduleRequest) -> Result<ScheduleResult> {
        let resolver = TeamResolver::new(&request.team_rules)?;
        let scheduler = Self::new(request.config.clone())?.with_team_resolver(resolver);
        scheduler.schedule(&request.tasks, &request.teams)
    }
}

/// How a task is placed.
#[derive(Debug, Clone)]
enum Plan {
    Milestone,
    /// Spans its subtasks. No workload when the subtasks mix units or
    /// the parent's own estimate was set aside.
    Summary(Option<EffectiveWorkload>),
    /// Consumes team capacity.
    Work {
        team_id: String,
        workload: EffectiveWorkload,
        /// Per-day draw limit from `max_concurrency`.
        daily_cap: f64,
    },
    Failed(UnschedulableReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Status {
    Pending,
    Scheduled,
    Unschedulable,
}

/// State of one scheduling run.
struct Run<'s, 'a> {
    scheduler: &'s GanttScheduler,
    index: &'s TaskIndex<'a>,
    teams: HashMap<&'s str, &'s TeamConfig>,
    ledger: CapacityLedger,
    assembler: ResultAssembler,
    assignments: Vec<std::result::Result<TeamAssignment, UnschedulableReason>>,
    plans: Vec<Plan>,
    /// Parents scheduled as one unit with their subtasks.
    absorbs: Vec<bool>,
    /// Representative of each task's scheduling unit.
    group_of: Vec<usize>,
    /// Covered subtasks per representative, in input order.
    members: Vec<Vec<usize>>,
    status: Vec<Status>,
    entries: Vec<Option<ScheduleEntry>>,
    /// First working day with free capacity, per team.
    open_from: HashMap<String, NaiveDate>,
}

impl<'s, 'a> Run<'s, 'a> {
    fn new(scheduler: &'s GanttScheduler, index: &'s TaskIndex<'a>, teams: &'s [TeamConfig]) -> Self {
        let working_days_per_week = scheduler.calendar.working_days_per_week();
        let mut ledger = CapacityLedger::new();
        for team in teams {
            match team.validate() {
                Ok(()) => ledger.register_team(team.id.as_str(), team.daily_capacity(working_days_per_week)),
                Err(e) => warn!(team_id = %team.id, error = %e, "team configuration rejected"),
            }
        }

        let n = index.len();
        Self {
            scheduler,
            index,
            teams: teams.iter().map(|t| (t.id.as_str(), t)).collect(),
            ledger,
            assembler: ResultAssembler::new(),
            assignments: Vec::with_capacity(n),
            plans: Vec::with_capacity(n),
            absorbs: vec![false; n],
            group_of: (0..n).collect(),
            members: vec![Vec::new(); n],
            status: vec![Status::Pending; n],
            entries: vec![None; n],
            open_from: HashMap::new(),
        }
    }

    /// Resolves teams, workloads, and grouping for every task.
    fn plan(&mut self) {
        let n = self.index.len();
        self.assignments = self.resolve_teams();

        for idx in 0..n {
            let plan = self.plan_task(idx);
            self.absorbs[idx] = self.index.has_children(idx)
                && (matches!(
                    plan,
                    Plan::Work { ref workload, .. }
                        if workload.scenario != ResolutionScenario::SubtaskRollup
                ) || self.is_absorbing_failure(idx, &plan));
            self.plans.push(plan);
        }
        self.regroup();
    }

    /// Assigns every task to its outermost absorbing ancestor.
    fn regroup(&mut self) {
        let n = self.index.len();
        for idx in 0..n {
            self.group_of[idx] = idx;
            self.members[idx].clear();
        }
        for idx in 0..n {
            let outermost = self
                .index
                .ancestors(idx)
                .into_iter()
                .rev()
                .find(|&a| self.absorbs[a]);
            if let Some(rep) = outermost {
                self.group_of[idx] = rep;
                self.members[rep].push(idx);
            }
        }
    }

    /// Splits the first real group among `representatives` back into
    /// individual tasks. The parent's own workload is set aside and it
    /// spans its subtasks instead.
    ///
    /// Returns false when none of them is a group.
    fn split_group(&mut self, representatives: &[usize]) -> bool {
        let Some(&rep) = representatives
            .iter()
            .find(|&&r| !self.members[r].is_empty())
        else {
            return false;
        };
        warn!(
            task_id = %self.index.task(rep).id,
            subtasks = self.members[rep].len(),
            "outside work sits between subtasks; scheduling them individually"
        );
        self.absorbs[rep] = false;
        if matches!(self.plans[rep], Plan::Work { .. }) {
            self.plans[rep] = Plan::Summary(None);
        }
        self.regroup();
        true
    }

    /// Team assignment for every task, parents before children so
    /// inheritance sees the parent's result.
    fn resolve_teams(&self) -> Vec<std::result::Result<TeamAssignment, UnschedulableReason>> {
        let n = self.index.len();
        let mut out: Vec<Option<std::result::Result<TeamAssignment, UnschedulableReason>>> = vec![None; n];
        for idx in 0..n {
            let mut chain = self.index.ancestors(idx);
            chain.reverse();
            chain.push(idx);
            for i in chain {
                if out[i].is_some() {
                    continue;
                }
                let inherited = self
                    .index
                    .parent(i)
                    .and_then(|p| out[p].as_ref())
                    .and_then(|r| r.as_ref().ok())
                    .map(|a| a.team_id.as_str());
                let assignment = self.scheduler.team_resolver.resolve(self.index.task(i), inherited);
                if let Ok(a) = &assignment {
                    debug!(task_id = %self.index.task(i).id, team_id = %a.team_id, source = ?a.source, "team assigned");
                }
                out[i] = Some(assignment);
            }
        }
        out.into_iter()
            .map(|r| r.unwrap_or(Err(UnschedulableReason::NoTeam)))
            .collect()
    }

    fn plan_task(&mut self, idx: usize) -> Plan {
        let task = self.index.task(idx);
        let estimator = &self.scheduler.estimator;

        let resolution = match estimator.resolve(self.index, idx, None) {
            Ok(r) => r,
            Err(UnschedulableReason::UnitMismatch { found, expected }) if self.index.has_children(idx) => {
                debug!(
                    task_id = %task.id,
                    %found,
                    %expected,
                    "subtasks use different units; parent spans them"
                );
                return Plan::Summary(None);
            }
            Err(reason) => return Plan::Failed(reason),
        };
        if let Some(divergence) = resolution.divergence {
            warn!(
                task_id = %task.id,
                parent = divergence.parent_quantity,
                subtasks = divergence.subtask_quantity,
                unit = %divergence.unit,
                "subtask rollup diverges from parent estimate"
            );
            self.assembler.record_warning(ScheduleWarning::Divergence(divergence));
        }

        match resolution.workload.scenario {
            ResolutionScenario::Milestone => Plan::Milestone,
            ResolutionScenario::SubtaskRollup => Plan::Summary(Some(resolution.workload)),
            ResolutionScenario::InFlight | ResolutionScenario::ParentLevel => {
                let team_id = match &self.assignments[idx] {
                    Ok(a) => a.team_id.clone(),
                    Err(reason) => return Plan::Failed(reason.clone()),
                };
                let Some(team) = self.teams.get(team_id.as_str()).copied() else {
                    return Plan::Failed(UnschedulableReason::UnknownTeam { team_id });
                };
                if let Err(e) = team.validate() {
                    return Plan::Failed(UnschedulableReason::InvalidTeamConfig {
                        team_id,
                        message: e.to_string(),
                    });
                }
                let workload = match estimator.resolve(self.index, idx, Some(team)) {
                    Ok(r) => r.workload,
                    Err(reason) => return Plan::Failed(reason),
                };
                let daily_cap = task.max_concurrency.map_or(f64::INFINITY, |workers| {
                    let per_member =
                        team.member_daily_capacity(self.scheduler.calendar.working_days_per_week());
                    per_member * f64::from(workers.max(1))
                });
                Plan::Work {
                    team_id,
                    workload,
                    daily_cap,
                }
            }
        }
    }

    /// A parent whose own estimate resolved but whose team did not still
    /// owns its subtasks; they fail with it.
    fn is_absorbing_failure(&self, idx: usize, plan: &Plan) -> bool {
        if !matches!(plan, Plan::Failed(_)) {
            return false;
        }
        matches!(
            self.scheduler.estimator.resolve(self.index, idx, None),
            Ok(r) if matches!(
                r.workload.scenario,
                ResolutionScenario::InFlight | ResolutionScenario::ParentLevel
            )
        )
    }

    /// Places one scheduling unit.
    fn place(&mut self, unit: usize) {
        let earliest = match self.earliest_start(unit) {
            Ok(date) => date,
            Err(reason) => {
                self.fail_unit(unit, reason);
                return;
            }
        };

        match self.plans[unit].clone() {
            Plan::Failed(reason) => self.fail_unit(unit, reason),
            Plan::Milestone => self.place_milestone(unit, earliest),
            Plan::Summary(workload) => self.place_summary(unit, workload),
            Plan::Work {
                team_id,
                workload,
                daily_cap,
            } => self.place_work(unit, earliest, &team_id, workload, daily_cap),
        }
    }

    /// Earliest start of a unit: the project start or the day after the
    /// latest gate, whichever is later.
    fn earliest_start(&self, unit: usize) -> std::result::Result<NaiveDate, UnschedulableReason> {
        let calendar = &self.scheduler.calendar;
        let mut earliest = self.scheduler.config.project_start;

        let mut gated: Vec<usize> = self.index.ancestors(unit);
        gated.push(unit);
        gated.extend(self.members[unit].iter().copied());

        for task in gated {
            for dep in self.index.dependencies(task) {
                if self.group_of[dep] == unit {
                    continue;
                }
                match self.status[dep] {
                    Status::Scheduled => {
                        if let Some(entry) = &self.entries[dep] {
                            let ready = if entry.consumes_time() {
                                calendar.following_working_day(entry.end)
                            } else {
                                entry.end
                            };
                            earliest = earliest.max(ready);
                        }
                    }
                    Status::Unschedulable => {
                        if self.scheduler.config.propagate_unschedulable {
                            return Err(UnschedulableReason::DependencyUnschedulable {
                                dependency_id: self.index.task(dep).id.clone(),
                            });
                        }
                        debug!(
                            task_id = %self.index.task(unit).id,
                            dependency_id = %self.index.task(dep).id,
                            "ignoring unschedulable dependency"
                        );
                    }
                    Status::Pending => {
                        debug!(
                            task_id = %self.index.task(unit).id,
                            dependency_id = %self.index.task(dep).id,
                            "dependency not yet placed"
                        );
                    }
                }
            }
        }
        Ok(earliest)
    }

    fn place_milestone(&mut self, unit: usize, earliest: NaiveDate) {
        let task = self.index.task(unit);
        let date = match task.target_date {
            Some(target) if target < earliest => {
                warn!(task_id = %task.id, %target, scheduled = %earliest, "milestone slipped");
                self.assembler.record_warning(ScheduleWarning::MilestoneSlipped {
                    task_id: task.id.clone(),
                    target,
                    scheduled: earliest,
                });
                earliest
            }
            Some(target) => target,
            None => earliest,
        };

        let entry = ScheduleEntry {
            task_id: task.id.clone(),
            start: date,
            end: date,
            working_days: 0,
            team_id: self.assignments[unit].as_ref().ok().map(|a| a.team_id.clone()),
            scenario: ResolutionScenario::Milestone,
            workload: None,
            workload_unit: None,
            covered_by: None,
        };
        self.commit(unit, entry);
    }

    fn place_summary(&mut self, unit: usize, workload: Option<EffectiveWorkload>) {
        let propagate = self.scheduler.config.propagate_unschedulable;
        let mut span: Option<(NaiveDate, NaiveDate)> = None;
        let mut any_consumes = false;
        let mut first_failed: Option<usize> = None;

        for &child in self.index.children(unit) {
            match (self.status[child], &self.entries[child]) {
                (Status::Scheduled, Some(entry)) => {
                    any_consumes |= entry.consumes_time();
                    span = Some(match span {
                        None => (entry.start, entry.end),
                        Some((s, e)) => (s.min(entry.start), e.max(entry.end)),
                    });
                }
                _ => {
                    if first_failed.is_none() {
                        first_failed = Some(child);
                    }
                }
            }
        }

        let (start, end) = match (span, first_failed) {
            (Some(bounds), None) => bounds,
            (Some(bounds), Some(_)) if !propagate => bounds,
            (_, Some(child)) => {
                let reason = UnschedulableReason::SubtaskUnschedulable {
                    subtask_id: self.index.task(child).id.clone(),
                };
                self.fail_unit(unit, reason);
                return;
            }
            (None, None) => {
                self.fail_unit(unit, UnschedulableReason::NoEstimate);
                return;
            }
        };

        let working_days = if any_consumes {
            self.scheduler.calendar.count_working_days(start, end)
        } else {
            0
        };
        let entry = ScheduleEntry {
            task_id: self.index.task(unit).id.clone(),
            start,
            end,
            working_days,
            team_id: self.assignments[unit].as_ref().ok().map(|a| a.team_id.clone()),
            scenario: ResolutionScenario::SubtaskRollup,
            workload: workload.map(|w| w.quantity),
            workload_unit: workload.map(|w| w.unit),
            covered_by: None,
        };
        self.commit(unit, entry);
    }

    fn place_work(
        &mut self,
        unit: usize,
        earliest: NaiveDate,
        team_id: &str,
        workload: EffectiveWorkload,
        daily_cap: f64,
    ) {
        let task_id = self.index.task(unit).id.clone();
        let (start, end) = match self.allocate(&task_id, team_id, workload.quantity, earliest, daily_cap) {
            Ok(bounds) => bounds,
            Err(reason) => {
                self.fail_unit(unit, reason);
                return;
            }
        };

        let entry = ScheduleEntry {
            task_id,
            start,
            end,
            working_days: self.scheduler.calendar.count_working_days(start, end),
            team_id: Some(team_id.to_string()),
            scenario: workload.scenario,
            workload: Some(workload.quantity),
            workload_unit: Some(workload.unit),
            covered_by: None,
        };
        self.commit(unit, entry);
    }

    /// Greedy day-by-day allocation with spillover.
    ///
    /// Days already booked out by earlier tasks are skipped without counting
    /// against the guard; only days the task could draw from count. A team
    /// without capacity therefore trips the guard after
    /// `max_periods_per_task` days, while a long backlog does not.
    ///
    /// Returns the first and last day that received work. On guard trip the
    /// task's allocations are rolled back.
    fn allocate(
        &mut self,
        task_id: &str,
        team_id: &str,
        quantity: f64,
        earliest: NaiveDate,
        daily_cap: f64,
    ) -> std::result::Result<(NaiveDate, NaiveDate), UnschedulableReason> {
        let scheduler = self.scheduler;
        let calendar = &scheduler.calendar;
        let max_periods = scheduler.config.max_periods_per_task;
        let team_capacity = self.ledger.capacity(team_id);

        let mut day = calendar.next_working_day(earliest);
        if let Some(&open) = self.open_from.get(team_id) {
            day = day.max(open);
        }
        let mut remaining = quantity;
        let mut allocations: Vec<(NaiveDate, f64)> = Vec::new();
        let mut periods = 0;

        while periods < max_periods {
            let free = self.ledger.remaining(team_id, day);
            if team_capacity > CAPACITY_EPSILON && free <= CAPACITY_EPSILON {
                day = calendar.following_working_day(day);
                continue;
            }
            periods += 1;

            let take = free.min(daily_cap).min(remaining);
            if take > CAPACITY_EPSILON {
                match self.ledger.allocate(team_id, day, take) {
                    Ok(_) => {
                        allocations.push((day, take));
                        remaining -= take;
                    }
                    Err(shortfall) => debug!(task_id, %shortfall, "allocation refused"),
                }
            }
            if remaining <= CAPACITY_EPSILON {
                let start = allocations.first().map_or(day, |&(d, _)| d);
                if allocations.len() > 1 {
                    debug!(task_id, team_id, days = allocations.len(), "work spilled over");
                }
                self.advance_open(team_id);
                return Ok((start, day));
            }
            day = calendar.following_working_day(day);
        }

        for (d, amount) in allocations {
            self.ledger.rollback(team_id, d, amount);
        }
        warn!(task_id, team_id, max_periods, unallocated = remaining, "capacity guard tripped");
        Err(UnschedulableReason::CapacityExhausted {
            periods_scanned: max_periods,
            unallocated: remaining,
        })
    }

    /// Moves a team's first open day past days that are now booked out.
    fn advance_open(&mut self, team_id: &str) {
        if self.ledger.capacity(team_id) <= CAPACITY_EPSILON {
            return;
        }
        let scheduler = self.scheduler;
        let calendar = &scheduler.calendar;
        let mut day = match self.open_from.get(team_id) {
            Some(&open) => open,
            None => calendar.next_working_day(scheduler.config.project_start),
        };
        while self.ledger.remaining(team_id, day) <= CAPACITY_EPSILON {
            day = calendar.following_working_day(day);
        }
        self.open_from.insert(team_id.to_string(), day);
    }

    /// Records an entry for the unit and covered entries for its members.
    fn commit(&mut self, unit: usize, entry: ScheduleEntry) {
        debug!(task_id = %entry.task_id, start = %entry.start, end = %entry.end, "task scheduled");
        for &member in &self.members[unit] {
            let team_id = match &self.assignments[member] {
                Ok(own) => Some(own.team_id.clone()),
                Err(_) => entry.team_id.clone(),
            };
            let covered = ScheduleEntry {
                task_id: self.index.task(member).id.clone(),
                team_id,
                workload: None,
                workload_unit: None,
                covered_by: Some(entry.task_id.clone()),
                ..entry.clone()
            };
            self.status[member] = Status::Scheduled;
            self.entries[member] = Some(covered.clone());
            self.assembler.record_entry(covered);
        }
        // The unit's own entry goes first in the output
        let insert_at = self.assembler.entry_count() - self.members[unit].len();
        self.status[unit] = Status::Scheduled;
        self.entries[unit] = Some(entry.clone());
        self.assembler.record_entry_at(insert_at, entry);
    }

    fn fail_unit(&mut self, unit: usize, reason: UnschedulableReason) {
        let task_id = self.index.task(unit).id.clone();
        warn!(task_id = %task_id, code = reason.code(), %reason, "task unschedulable");
        self.status[unit] = Status::Unschedulable;
        self.assembler.record_unschedulable(task_id.clone(), reason);

        for &member in &self.members[unit] {
            self.status[member] = Status::Unschedulable;
            self.assembler.record_unschedulable(
                self.index.task(member).id.clone(),
                UnschedulableReason::DependencyUnschedulable {
                    dependency_id: task_id.clone(),
                },
            );
        }
    }

    fn finish(self) -> ScheduleResult {
        self.assembler.finish(self.ledger.snapshot())
    }
}
