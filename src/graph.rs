//! Task index and precedence graph.
//!
//! [`TaskIndex`] is an arena view over the input tasks: ids map to dense
//! indices, and parent/child links are resolved to index lists.
//! [`DependencyGraph`] holds precedence edges between those indices,
//! rejects cycles, and produces the processing order.
//!
//! # Edges
//! `u → v` means `u` must be finished before `v` can be placed:
//! - dependency → task
//! - subtask → parent (a summary ends after its subtasks)
//! - parent's dependency → subtask (subtasks inherit their ancestors' gates)
//!
//! # Reference
//! Cormen et al. (2009), "Introduction to Algorithms", Ch. 22.4 (Topological Sort)
//! Kahn (1962), "Topological sorting of large networks"

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

use crate::error::{Result, ScheduleError};
use crate::models::Task;
use crate::validation::validate_structure;

/// Groups whose merging closes a precedence cycle.
///
/// The input itself is acyclic (checked by [`DependencyGraph::build`]); the
/// cycle only exists because several tasks were merged into one unit.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("grouping closes a cycle through {} units", .representatives.len())]
pub struct GroupCycle {
    /// Representatives on the cycle, in path order (no repeat).
    pub representatives: Vec<usize>,
}

/// Index arena over a task slice.
#[derive(Debug, Clone)]
pub struct TaskIndex<'a> {
    tasks: &'a [Task],
    by_id: HashMap<&'a str, usize>,
    parent: Vec<Option<usize>>,
    children: Vec<Vec<usize>>,
}

impl<'a> TaskIndex<'a> {
    /// Builds the index. Fails with [`ScheduleError::InvalidInput`] on
    /// duplicate ids or dangling references.
    pub fn new(tasks: &'a [Task]) -> Result<Self> {
        validate_structure(tasks).map_err(|errors| ScheduleError::InvalidInput { errors })?;

        let by_id: HashMap<&str, usize> = tasks
            .iter()
            .enumerate()
            .map(|(i, t)| (t.id.as_str(), i))
            .collect();

        let mut parent = vec![None; tasks.len()];
        let mut children = vec![Vec::new(); tasks.len()];
        for (i, task) in tasks.iter().enumerate() {
            if let Some(p) = task.parent_id.as_deref().and_then(|id| by_id.get(id)) {
                parent[i] = Some(*p);
                children[*p].push(i);
            }
        }

        Ok(Self {
            tasks,
            by_id,
            parent,
            children,
        })
    }

    /// Number of tasks.
    #[inline]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Whether there are no tasks.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// The underlying tasks.
    pub fn tasks(&self) -> &'a [Task] {
        self.tasks
    }

    /// Task at `idx`.
    #[inline]
    pub fn task(&self, idx: usize) -> &'a Task {
        &self.tasks[idx]
    }

    /// Index of a task id.
    #[inline]
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.by_id.get(id).copied()
    }

    /// Parent index.
    #[inline]
    pub fn parent(&self, idx: usize) -> Option<usize> {
        self.parent[idx]
    }

    /// Subtask indices, in input order.
    #[inline]
    pub fn children(&self, idx: usize) -> &[usize] {
        &self.children[idx]
    }

    /// Whether the task has subtasks.
    #[inline]
    pub fn has_children(&self, idx: usize) -> bool {
        !self.children[idx].is_empty()
    }

    /// Dependency indices of a task.
    pub fn dependencies(&self, idx: usize) -> impl Iterator<Item = usize> + '_ {
        self.tasks[idx]
            .dependencies
            .iter()
            .filter_map(|id| self.index_of(id))
    }

    /// Proper ancestors, nearest first.
    ///
    /// Stops after `len()` steps so a malformed parent cycle cannot hang;
    /// such cycles are reported by [`DependencyGraph::build`].
    pub fn ancestors(&self, idx: usize) -> Vec<usize> {
        let mut out = Vec::new();
        let mut current = self.parent[idx];
        while let Some(p) = current {
            if out.len() >= self.len() {
                break;
            }
            out.push(p);
            current = self.parent[p];
        }
        out
    }
}

/// Precedence graph over a [`TaskIndex`].
///
/// # Example
/// ```
/// use gantt_schedule::graph::{DependencyGraph, TaskIndex};
/// use gantt_schedule::models::Task;
///
/// let tasks = vec![
///     Task::new("B").with_dependency("A"),
///     Task::new("A"),
/// ];
/// let index = TaskIndex::new(&tasks).unwrap();
/// let graph = DependencyGraph::build(&index).unwrap();
/// let order: Vec<&str> = graph
///     .topological_order()
///     .into_iter()
///     .map(|i| index.task(i).id.as_str())
///     .collect();
/// assert_eq!(order, vec!["A", "B"]);
/// ```
#[derive(Debug, Clone)]
pub struct DependencyGraph {
    successors: Vec<Vec<usize>>,
    /// `(unranked, rank, input position)`: smaller goes first.
    keys: Vec<(bool, i64, usize)>,
    ids: Vec<String>,
}

impl DependencyGraph {
    /// Builds the graph and rejects cycles.
    ///
    /// # Errors
    /// [`ScheduleError::CyclicDependency`] naming the tasks on the first
    /// cycle found.
    pub fn build(index: &TaskIndex<'_>) -> Result<Self> {
        let n = index.len();
        let mut successors: Vec<Vec<usize>> = vec![Vec::new(); n];

        for v in 0..n {
            for d in index.dependencies(v) {
                successors[d].push(v);
            }
            if let Some(p) = index.parent(v) {
                successors[v].push(p);
            }
            for a in index.ancestors(v) {
                for d in index.dependencies(a) {
                    successors[d].push(v);
                }
            }
        }
        for succ in &mut successors {
            succ.sort_unstable();
            succ.dedup();
        }

        let keys = (0..n)
            .map(|i| {
                let rank = index.task(i).rank;
                (rank.is_none(), rank.unwrap_or(0), i)
            })
            .collect();
        let ids = index.tasks().iter().map(|t| t.id.clone()).collect();

        let graph = Self {
            successors,
            keys,
            ids,
        };
        let active = vec![true; n];
        if let Some(cycle) = find_cycle(&active, &graph.successors) {
            return Err(graph.cycle_error(cycle));
        }
        Ok(graph)
    }

    /// Number of tasks.
    pub fn node_count(&self) -> usize {
        self.successors.len()
    }

    /// Number of distinct precedence edges.
    pub fn edge_count(&self) -> usize {
        self.successors.iter().map(Vec::len).sum()
    }

    /// Tasks that must wait for `idx`.
    pub fn successors(&self, idx: usize) -> &[usize] {
        &self.successors[idx]
    }

    /// All tasks in precedence order.
    ///
    /// Among ready tasks, ranked tasks go first by ascending rank; equal or
    /// missing ranks keep input order.
    pub fn topological_order(&self) -> Vec<usize> {
        let active = vec![true; self.node_count()];
        kahn_order(&active, &self.successors, &self.keys)
    }

    /// Precedence order over groups of tasks.
    ///
    /// `group_of[i]` is the representative of task `i`'s group (a
    /// representative maps to itself). Edges inside a group are dropped;
    /// edges between groups connect their representatives. Only
    /// representatives appear in the returned order.
    ///
    /// # Errors
    /// [`GroupCycle`] when grouping closes a cycle, e.g. an outside task
    /// both waits for one subtask of a group and gates another. Callers
    /// split one of the named groups and retry.
    pub fn condensed_order(&self, group_of: &[usize]) -> std::result::Result<Vec<usize>, GroupCycle> {
        let n = self.node_count();
        let mut active = vec![false; n];
        let mut successors: Vec<Vec<usize>> = vec![Vec::new(); n];
        for u in 0..n {
            let gu = group_of[u];
            active[gu] = true;
            for &v in &self.successors[u] {
                let gv = group_of[v];
                if gu != gv {
                    successors[gu].push(gv);
                }
            }
        }
        for succ in &mut successors {
            succ.sort_unstable();
            succ.dedup();
        }

        if let Some(mut cycle) = find_cycle(&active, &successors) {
            cycle.pop();
            return Err(GroupCycle {
                representatives: cycle,
            });
        }
        Ok(kahn_order(&active, &successors, &self.keys))
    }

    fn cycle_error(&self, cycle: Vec<usize>) -> ScheduleError {
        ScheduleError::CyclicDependency {
            task_ids: cycle.into_iter().map(|i| self.ids[i].clone()).collect(),
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    Visiting,
    Visited,
}

/// DFS with visiting/visited marks. Returns the first cycle found as a
/// closed path (first node repeated at the end).
fn find_cycle(active: &[bool], successors: &[Vec<usize>]) -> Option<Vec<usize>> {
    let n = successors.len();
    let mut marks = vec![Mark::Unvisited; n];
    // (node, next successor position)
    let mut stack: Vec<(usize, usize)> = Vec::new();

    for root in 0..n {
        if !active[root] || marks[root] != Mark::Unvisited {
            continue;
        }
        marks[root] = Mark::Visiting;
        stack.push((root, 0));

        while let Some(top) = stack.last_mut() {
            let (node, pos) = *top;
            if let Some(&next) = successors[node].get(pos) {
                top.1 += 1;
                match marks[next] {
                    Mark::Visiting => {
                        // Back edge: the cycle is the stack suffix from `next`
                        let start = stack.iter().position(|&(v, _)| v == next).unwrap_or(0);
                        let mut cycle: Vec<usize> = stack[start..].iter().map(|&(v, _)| v).collect();
                        cycle.push(next);
                        return Some(cycle);
                    }
                    Mark::Unvisited => {
                        marks[next] = Mark::Visiting;
                        stack.push((next, 0));
                    }
                    Mark::Visited => {}
                }
            } else {
                marks[node] = Mark::Visited;
                stack.pop();
            }
        }
    }
    None
}

/// Kahn's algorithm with a min-heap on `keys` for deterministic ties.
/// Assumes the active subgraph is acyclic.
fn kahn_order(active: &[bool], successors: &[Vec<usize>], keys: &[(bool, i64, usize)]) -> Vec<usize> {
    let n = successors.len();
    let mut in_degree = vec![0usize; n];
    for u in (0..n).filter(|&u| active[u]) {
        for &v in &successors[u] {
            in_degree[v] += 1;
        }
    }

    let mut ready: BinaryHeap<Reverse<(bool, i64, usize)>> = (0..n)
        .filter(|&u| active[u] && in_degree[u] == 0)
        .map(|u| Reverse(keys[u]))
        .collect();

    let mut order = Vec::with_capacity(n);
    while let Some(Reverse((_, _, u))) = ready.pop() {
        order.push(u);
        for &v in &successors[u] {
            in_degree[v] -= 1;
            if in_degree[v] == 0 {
                ready.push(Reverse(keys[v]));
            }
        }
    }
    order
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(index: &TaskIndex<'_>, order: &[usize]) -> Vec<String> {
        order.iter().map(|&i| index.task(i).id.clone()).collect()
    }

    #[test]
    fn test_index_hierarchy() {
        let tasks = vec![
            Task::new("E1"),
            Task::new("S1").with_parent("E1"),
            Task::new("T1").with_parent("S1"),
            Task::new("S2").with_parent("E1"),
        ];
        let index = TaskIndex::new(&tasks).unwrap();
        assert_eq!(index.children(0), &[1, 3]);
        assert_eq!(index.parent(2), Some(1));
        assert_eq!(index.ancestors(2), vec![1, 0]);
        assert!(index.has_children(1));
        assert!(!index.has_children(2));
        assert_eq!(index.index_of("S2"), Some(3));
        assert_eq!(index.index_of("nope"), None);
    }

    #[test]
    fn test_index_rejects_dangling() {
        let tasks = vec![Task::new("T1").with_dependency("X")];
        assert!(matches!(
            TaskIndex::new(&tasks),
            Err(ScheduleError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_chain_order() {
        let tasks = vec![
            Task::new("C").with_dependency("B"),
            Task::new("B").with_dependency("A"),
            Task::new("A"),
        ];
        let index = TaskIndex::new(&tasks).unwrap();
        let graph = DependencyGraph::build(&index).unwrap();
        assert_eq!(ids(&index, &graph.topological_order()), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_rank_tie_break() {
        let tasks = vec![
            Task::new("unranked1"),
            Task::new("late").with_rank(20),
            Task::new("unranked2"),
            Task::new("early").with_rank(10),
            Task::new("early_too").with_rank(10),
        ];
        let index = TaskIndex::new(&tasks).unwrap();
        let graph = DependencyGraph::build(&index).unwrap();
        assert_eq!(
            ids(&index, &graph.topological_order()),
            vec!["early", "early_too", "late", "unranked1", "unranked2"]
        );
    }

    #[test]
    fn test_precedence_beats_rank() {
        let tasks = vec![
            Task::new("A").with_rank(100),
            Task::new("B").with_rank(1).with_dependency("A"),
        ];
        let index = TaskIndex::new(&tasks).unwrap();
        let graph = DependencyGraph::build(&index).unwrap();
        assert_eq!(ids(&index, &graph.topological_order()), vec!["A", "B"]);
    }

    #[test]
    fn test_two_node_cycle_named() {
        let tasks = vec![
            Task::new("A").with_dependency("B"),
            Task::new("B").with_dependency("A"),
        ];
        let index = TaskIndex::new(&tasks).unwrap();
        match DependencyGraph::build(&index) {
            Err(ScheduleError::CyclicDependency { task_ids }) => {
                assert!(task_ids.contains(&"A".to_string()));
                assert!(task_ids.contains(&"B".to_string()));
                assert_eq!(task_ids.first(), task_ids.last());
            }
            other => panic!("expected cycle, got {other:?}"),
        }
    }

    #[test]
    fn test_three_node_cycle() {
        let tasks = vec![
            Task::new("A").with_dependency("C"),
            Task::new("B").with_dependency("A"),
            Task::new("C").with_dependency("B"),
            Task::new("D"),
        ];
        let index = TaskIndex::new(&tasks).unwrap();
        let err = DependencyGraph::build(&index).unwrap_err();
        match err {
            ScheduleError::CyclicDependency { task_ids } => {
                assert_eq!(task_ids.len(), 4);
                assert!(!task_ids.contains(&"D".to_string()));
            }
            other => panic!("expected cycle, got {other:?}"),
        }
    }

    #[test]
    fn test_parent_cycle_detected() {
        let tasks = vec![Task::new("A").with_parent("B"), Task::new("B").with_parent("A")];
        let index = TaskIndex::new(&tasks).unwrap();
        assert_eq!(index.ancestors(0).len(), 2);
        assert!(matches!(
            DependencyGraph::build(&index),
            Err(ScheduleError::CyclicDependency { .. })
        ));
    }

    #[test]
    fn test_subtasks_before_parent_and_inherit_gates() {
        let tasks = vec![
            Task::new("E1").with_dependency("X"),
            Task::new("S1").with_parent("E1"),
            Task::new("X"),
        ];
        let index = TaskIndex::new(&tasks).unwrap();
        let graph = DependencyGraph::build(&index).unwrap();
        assert_eq!(ids(&index, &graph.topological_order()), vec!["X", "S1", "E1"]);
        // X → E1, X → S1 (inherited), S1 → E1
        assert_eq!(graph.edge_count(), 3);
    }

    #[test]
    fn test_parent_depending_on_own_subtask_is_cycle() {
        let tasks = vec![Task::new("E1").with_dependency("S1"), Task::new("S1").with_parent("E1")];
        let index = TaskIndex::new(&tasks).unwrap();
        assert!(DependencyGraph::build(&index).is_err());
    }

    #[test]
    fn test_condensed_order() {
        // E1 = {E1, S1, S2}; Y depends on S2; E1 depends on X
        let tasks = vec![
            Task::new("Y").with_dependency("S2"),
            Task::new("E1").with_dependency("X"),
            Task::new("S1").with_parent("E1"),
            Task::new("S2").with_parent("E1"),
            Task::new("X"),
        ];
        let index = TaskIndex::new(&tasks).unwrap();
        let graph = DependencyGraph::build(&index).unwrap();
        let group_of = vec![0, 1, 1, 1, 4];
        let order = graph.condensed_order(&group_of).unwrap();
        assert_eq!(ids(&index, &order), vec!["X", "E1", "Y"]);
    }

    #[test]
    fn test_condensed_order_names_groups_on_merge_cycle() {
        // X waits for S1 and gates S2: acyclic as tasks, cyclic once
        // S1 and S2 are merged into E1
        let tasks = vec![
            Task::new("E1"),
            Task::new("S1").with_parent("E1"),
            Task::new("S2").with_parent("E1").with_dependency("X"),
            Task::new("X").with_dependency("S1"),
        ];
        let index = TaskIndex::new(&tasks).unwrap();
        let graph = DependencyGraph::build(&index).unwrap();

        let order = graph.condensed_order(&[0, 1, 2, 3]).unwrap();
        assert_eq!(ids(&index, &order), vec!["S1", "X", "S2", "E1"]);

        let cycle = graph.condensed_order(&[0, 0, 0, 3]).unwrap_err();
        let mut named = ids(&index, &cycle.representatives);
        named.sort_unstable();
        assert_eq!(named, vec!["E1", "X"]);
    }

    #[test]
    fn test_empty_graph() {
        let index = TaskIndex::new(&[]).unwrap();
        let graph = DependencyGraph::build(&index).unwrap();
        assert!(graph.topological_order().is_empty());
        assert!(index.is_empty());
    }
}
