//! Domain model for task time tracking.
//!
//! Projects own tasks; tasks move through a validated lifecycle and leave
//! behind immutable time periods. Infrastructure stays outside this boundary.

mod duration;
mod error;
mod ids;
pub mod machine;
mod names;
mod project;
mod state;
mod task;
mod time_period;

pub use duration::{RunningTime, humanize};
pub use error::{ParseTaskEventError, ParseTaskStateError, TaskDomainError};
pub use ids::{ExternalId, ProjectId, TaskId, TaskNumber, TimePeriodId};
pub use names::{ProjectName, TaskName};
pub use project::Project;
pub use state::{TaskEvent, TaskState, task_transitions};
pub use task::{PendingTaskTransition, Task, TaskDraft};
pub use time_period::TimePeriod;
