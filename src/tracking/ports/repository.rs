//! Repository ports for projects, tasks, and time periods.

use crate::tracking::domain::{
    Project, ProjectId, ProjectName, Task, TaskId, TaskName, TaskNumber, TimePeriod, TimePeriodId,
};
use std::sync::Arc;
use thiserror::Error;

/// Result type for repository operations.
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Project persistence contract.
pub trait ProjectRepository: Send + Sync {
    /// Stores a new project.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::DuplicateProject`] when the identifier
    /// exists or [`RepositoryError::DuplicateProjectName`] when the name is
    /// taken.
    fn store_project(&self, project: &Project) -> RepositoryResult<()>;

    /// Finds a project by identifier.
    fn find_project(&self, id: ProjectId) -> RepositoryResult<Option<Project>>;

    /// Finds a project by its unique name.
    fn find_project_by_name(&self, name: &ProjectName) -> RepositoryResult<Option<Project>>;

    /// Returns every project sorted by name.
    fn list_projects(&self) -> RepositoryResult<Vec<Project>>;
}

/// Task persistence contract.
pub trait TaskRepository: Send + Sync {
    /// Stores a new task.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::DuplicateTask`] when the identifier exists
    /// or [`RepositoryError::DuplicateTaskNumber`] when the number is taken.
    fn store_task(&self, task: &Task) -> RepositoryResult<()>;

    /// Persists changes to an existing task.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::TaskNotFound`] when the task does not exist.
    fn update_task(&self, task: &Task) -> RepositoryResult<()>;

    /// Finds a task by identifier.
    fn find_task(&self, id: TaskId) -> RepositoryResult<Option<Task>>;

    /// Finds a task by its sequential number.
    fn find_task_by_number(&self, number: TaskNumber) -> RepositoryResult<Option<Task>>;

    /// Finds a task by name within a project.
    fn find_task_by_name(
        &self,
        project_id: ProjectId,
        name: &TaskName,
    ) -> RepositoryResult<Option<Task>>;

    /// Returns a project's tasks sorted by number.
    fn list_tasks(&self, project_id: ProjectId) -> RepositoryResult<Vec<Task>>;

    /// Returns the highest task number across all projects.
    fn max_task_number(&self) -> RepositoryResult<Option<TaskNumber>>;
}

/// Time period persistence contract.
pub trait TimePeriodRepository: Send + Sync {
    /// Stores a new time period.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::DuplicateTimePeriod`] when the identifier
    /// exists or [`RepositoryError::TaskNotFound`] when the owning task is
    /// missing.
    fn store_time_period(&self, period: &TimePeriod) -> RepositoryResult<()>;

    /// Returns a task's periods sorted by start time.
    fn list_time_periods(&self, task_id: TaskId) -> RepositoryResult<Vec<TimePeriod>>;
}

/// Combined store used by tracking services.
pub trait TrackerStore: ProjectRepository + TaskRepository + TimePeriodRepository {}

impl<T> TrackerStore for T where T: ProjectRepository + TaskRepository + TimePeriodRepository {}

/// Errors returned by repository implementations.
#[derive(Debug, Clone, Error)]
pub enum RepositoryError {
    /// A project with the same identifier already exists.
    #[error("duplicate project identifier: {0}")]
    DuplicateProject(ProjectId),

    /// A project with the same name already exists.
    #[error("a project named '{0}' already exists")]
    DuplicateProjectName(ProjectName),

    /// A task with the same identifier already exists.
    #[error("duplicate task identifier: {0}")]
    DuplicateTask(TaskId),

    /// A task with the same number already exists.
    #[error("task number {0} is already taken")]
    DuplicateTaskNumber(TaskNumber),

    /// A time period with the same identifier already exists.
    #[error("duplicate time period identifier: {0}")]
    DuplicateTimePeriod(TimePeriodId),

    /// The task was not found.
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl RepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
