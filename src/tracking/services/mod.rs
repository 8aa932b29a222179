//! Application services for time tracking.

mod hooks;
mod lifecycle;

pub use hooks::{TaskHooks, TransitionScope, task_hooks};
pub use lifecycle::{TrackingError, TrackingResult, TrackingService, TransitionReport};
