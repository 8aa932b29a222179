//! Port contracts for time tracking.
//!
//! Ports define infrastructure-agnostic interfaces used by tracking services.

pub mod issue_tracker;
pub mod repository;

pub use issue_tracker::{IssueTracker, IssueTrackerError, IssueTrackerResult};
pub use repository::{
    ProjectRepository, RepositoryError, RepositoryResult, TaskRepository, TimePeriodRepository,
    TrackerStore,
};
