//! In-memory tracker store for tests and ephemeral sessions.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::state::TrackerState;
use crate::tracking::{
    domain::{Project, ProjectId, ProjectName, Task, TaskId, TaskName, TaskNumber, TimePeriod},
    ports::{
        ProjectRepository, RepositoryError, RepositoryResult, TaskRepository,
        TimePeriodRepository,
    },
};

/// Thread-safe in-memory store implementing every tracking repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTrackerStore {
    state: Arc<RwLock<TrackerState>>,
}

impl InMemoryTrackerStore {
    /// Creates an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RepositoryResult<RwLockReadGuard<'_, TrackerState>> {
        self.state.read().map_err(|err| {
            RepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }

    fn write(&self) -> RepositoryResult<RwLockWriteGuard<'_, TrackerState>> {
        self.state.write().map_err(|err| {
            RepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }
}

impl ProjectRepository for InMemoryTrackerStore {
    fn store_project(&self, project: &Project) -> RepositoryResult<()> {
        self.write()?.insert_project(project)
    }

    fn find_project(&self, id: ProjectId) -> RepositoryResult<Option<Project>> {
        Ok(self.read()?.project(id))
    }

    fn find_project_by_name(&self, name: &ProjectName) -> RepositoryResult<Option<Project>> {
        Ok(self.read()?.project_by_name(name))
    }

    fn list_projects(&self) -> RepositoryResult<Vec<Project>> {
        Ok(self.read()?.projects())
    }
}

impl TaskRepository for InMemoryTrackerStore {
    fn store_task(&self, task: &Task) -> RepositoryResult<()> {
        self.write()?.insert_task(task)
    }

    fn update_task(&self, task: &Task) -> RepositoryResult<()> {
        self.write()?.replace_task(task)
    }

    fn find_task(&self, id: TaskId) -> RepositoryResult<Option<Task>> {
        Ok(self.read()?.task(id))
    }

    fn find_task_by_number(&self, number: TaskNumber) -> RepositoryResult<Option<Task>> {
        Ok(self.read()?.task_by_number(number))
    }

    fn find_task_by_name(
        &self,
        project_id: ProjectId,
        name: &TaskName,
    ) -> RepositoryResult<Option<Task>> {
        Ok(self.read()?.task_by_name(project_id, name))
    }

    fn list_tasks(&self, project_id: ProjectId) -> RepositoryResult<Vec<Task>> {
        Ok(self.read()?.tasks_in(project_id))
    }

    fn max_task_number(&self) -> RepositoryResult<Option<TaskNumber>> {
        Ok(self.read()?.max_number())
    }
}

impl TimePeriodRepository for InMemoryTrackerStore {
    fn store_time_period(&self, period: &TimePeriod) -> RepositoryResult<()> {
        self.write()?.insert_period(period)
    }

    fn list_time_periods(&self, task_id: TaskId) -> RepositoryResult<Vec<TimePeriod>> {
        Ok(self.read()?.periods_of(task_id))
    }
}
