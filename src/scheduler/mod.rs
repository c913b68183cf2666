//! Gantt scheduler and KPI evaluation.
//!
//! # Algorithm
//!
//! `GanttScheduler` is a serial schedule-generation scheme: tasks are taken
//! in precedence order (rank breaks ties) and each is placed at the earliest
//! working day its team has capacity for. It is greedy and deterministic,
//! not optimal.
//!
//! # KPI
//!
//! `ScheduleKpi` summarizes a result: makespan, completion rate, and team
//! utilization.
//!
//! # References
//!
//! - Kolisch (1996), "Serial and parallel resource-constrained project
//!   scheduling methods revisited"
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 3-4

mod assembler;
mod config;
mod engine;
mod kpi;

pub use assembler::ResultAssembler;
pub use config::SchedulerConfig;
pub use engine::{GanttScheduler, ScheduleRequest};
pub use kpi::ScheduleKpi;
