//! Error types for tracking domain validation and parsing.

use super::{TaskEvent, TaskNumber, TaskState};
use thiserror::Error;

/// Errors returned while constructing or mutating tracking domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The project name is empty after trimming.
    #[error("project name must not be empty")]
    EmptyProjectName,

    /// The task name is empty after trimming.
    #[error("task name must not be empty")]
    EmptyTaskName,

    /// The value is not a positive task number.
    #[error("invalid task number '{0}', expected a positive integer like 12 or #12")]
    InvalidTaskNumber(String),

    /// The external tracker returned a blank identifier.
    #[error("external identifier must not be empty")]
    EmptyExternalId,

    /// The requested event is not legal from the task's current state.
    ///
    /// The message is user facing and specific to the event and state pair.
    #[error("{message}")]
    InvalidTransition {
        /// Task whose transition was rejected.
        number: TaskNumber,
        /// Event that was requested.
        event: TaskEvent,
        /// State the task was in when the event was requested.
        from: TaskState,
        /// Human-readable rejection message.
        message: String,
    },
}

/// Error returned while parsing task states from persistence or input.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task state: {0}")]
pub struct ParseTaskStateError(pub String);

/// Error returned while parsing task events from input.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task event: {0}")]
pub struct ParseTaskEventError(pub String);
