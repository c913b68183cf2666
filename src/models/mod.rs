//! Scheduling domain models.
//!
//! Plain data handed across the crate boundary: normalized backlog
//! records in, timeline records out, plus the working-day calendar.
//!
//! # Domain Mappings
//!
//! | gantt-schedule | Jira | Azure Boards | Linear |
//! |----------------|------|--------------|--------|
//! | Task | Epic/Story/Sub-task | Feature/Story/Task | Project/Issue/Sub-issue |
//! | TeamConfig | Board/Team | Team | Team |
//! | ScheduleEntry | Timeline bar | Delivery plan item | Roadmap bar |

mod calendar;
mod schedule;
mod task;
mod team;

pub use calendar::{CalendarConfig, WorkCalendar, WorkSpan};
pub use schedule::{
    DivergenceWarning, ResolutionScenario, ScheduleEntry, ScheduleResult, ScheduleWarning,
    TeamLoad, UnschedulableReason, UnschedulableTask,
};
pub use task::{Estimate, EstimateUnit, Task};
pub use team::{CapacityUnit, TeamConfig, TeamConfigError, VelocityPeriod};
