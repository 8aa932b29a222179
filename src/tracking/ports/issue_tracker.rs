//! External issue tracker port.
//!
//! The tracker mirrors projects and tasks into a remote system. Calls are
//! blocking; failures surface unchanged to the caller and are never retried
//! here.

use crate::tracking::domain::{ExternalId, Project, Task, TaskName};
use thiserror::Error;

/// Result type for issue tracker operations.
pub type IssueTrackerResult<T> = Result<T, IssueTrackerError>;

/// Capability contract for the external issue tracker.
#[cfg_attr(test, mockall::automock)]
pub trait IssueTracker: Send + Sync {
    /// Creates the project remotely and returns its identifier.
    ///
    /// # Errors
    ///
    /// Returns an [`IssueTrackerError`] when the remote call fails.
    fn add_project(&self, name: &str) -> IssueTrackerResult<ExternalId>;

    /// Creates a task under `project` remotely and returns its identifier.
    ///
    /// # Errors
    ///
    /// Returns an [`IssueTrackerError`] when the remote call fails.
    fn add_task(&self, project: &Project, name: &TaskName) -> IssueTrackerResult<ExternalId>;

    /// Pushes the task's current state to the remote record.
    ///
    /// # Errors
    ///
    /// Returns an [`IssueTrackerError`] when the remote call fails.
    fn push_task(&self, task: &Task) -> IssueTrackerResult<()>;
}

/// Errors reported by issue tracker adapters.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IssueTrackerError {
    /// Credentials were rejected.
    #[error("the issue tracker rejected our credentials")]
    Unauthorized,

    /// The remote record does not exist.
    #[error("the issue tracker has no record of {0}")]
    NotFound(String),

    /// The remote system rejected the payload.
    #[error("the issue tracker rejected the request: {0}")]
    Invalid(String),

    /// The remote system failed.
    #[error("the issue tracker failed: {0}")]
    Internal(String),
}
