//! Gantt schedule calculation engine.
//!
//! Turns a set of estimated tasks and capacity-limited teams into dated
//! schedule entries. Work is levelled against each team's daily capacity,
//! precedence is respected, and tasks that cannot be placed are reported
//! with a reason instead of failing the whole run.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Task`, `Estimate`, `TeamConfig`,
//!   `WorkCalendar`, `ScheduleEntry`, `ScheduleResult`
//! - **`validation`**: Input integrity checks (duplicate ids, dangling references)
//! - **`graph`**: Task index and precedence graph with cycle detection
//! - **`assignment`**: Team resolution (explicit, label, title pattern, inherited)
//! - **`estimation`**: Effective workload resolution and unit conversion
//! - **`ledger`**: Per-run team capacity bookkeeping
//! - **`scheduler`**: `GanttScheduler`, configuration, and KPIs
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use gantt_schedule::models::{Estimate, Task, TeamConfig};
//! use gantt_schedule::scheduler::{GanttScheduler, SchedulerConfig};
//!
//! let start = NaiveDate::from_ymd_opt(2025, 1, 6).unwrap();
//! let tasks = vec![Task::new("T1").with_team("web").with_estimate(Estimate::hours(16.0))];
//! let teams = vec![TeamConfig::hours("web", 8.0)];
//!
//! let result = GanttScheduler::new(SchedulerConfig::new(start))
//!     .unwrap()
//!     .schedule(&tasks, &teams)
//!     .unwrap();
//! assert_eq!(result.entry("T1").unwrap().working_days, 2);
//! ```
//!
//! # References
//!
//! - Kolisch (1996), "Serial and parallel resource-constrained project
//!   scheduling methods revisited"
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems"

pub mod assignment;
pub mod error;
pub mod estimation;
pub mod graph;
pub mod ledger;
pub mod models;
pub mod scheduler;
pub mod validation;

pub use error::{Result, ScheduleError};
