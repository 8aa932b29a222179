//! JSON document-file store.
//!
//! All records live in a single `timecard.json` document inside the data
//! directory. Each write serialises the whole document to a temporary file and
//! renames it over the previous one, so a failed write leaves the last good
//! document in place and the in-memory view unchanged.

use camino::Utf8Path;
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use std::io;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::memory::{TrackerDocument, TrackerState};
use crate::tracking::{
    domain::{Project, ProjectId, ProjectName, Task, TaskId, TaskName, TaskNumber, TimePeriod},
    ports::{
        ProjectRepository, RepositoryError, RepositoryResult, TaskRepository,
        TimePeriodRepository,
    },
};

/// File name of the persisted document.
pub const DOCUMENT_FILE: &str = "timecard.json";
const STAGING_FILE: &str = "timecard.json.tmp";

/// Tracker store persisted as a JSON document.
#[derive(Debug)]
pub struct JsonFileStore {
    dir: Dir,
    state: RwLock<TrackerState>,
}

impl JsonFileStore {
    /// Opens the store in `data_dir`, creating the directory when missing.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Persistence`] when the directory cannot be
    /// opened or the existing document cannot be read or parsed.
    pub fn open(data_dir: &Utf8Path) -> RepositoryResult<Self> {
        Dir::create_ambient_dir_all(data_dir, ambient_authority())
            .map_err(RepositoryError::persistence)?;
        let dir = Dir::open_ambient_dir(data_dir, ambient_authority())
            .map_err(RepositoryError::persistence)?;

        let state = match dir.read_to_string(DOCUMENT_FILE) {
            Ok(contents) => {
                let document: TrackerDocument =
                    serde_json::from_str(&contents).map_err(RepositoryError::persistence)?;
                TrackerState::from_document(document)?
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => TrackerState::default(),
            Err(err) => return Err(RepositoryError::persistence(err)),
        };
        tracing::debug!(path = %data_dir.join(DOCUMENT_FILE), "opened tracker document");

        Ok(Self {
            dir,
            state: RwLock::new(state),
        })
    }

    fn read(&self) -> RepositoryResult<RwLockReadGuard<'_, TrackerState>> {
        self.state.read().map_err(|err| {
            RepositoryError::persistence(io::Error::other(err.to_string()))
        })
    }

    fn write(&self) -> RepositoryResult<RwLockWriteGuard<'_, TrackerState>> {
        self.state.write().map_err(|err| {
            RepositoryError::persistence(io::Error::other(err.to_string()))
        })
    }

    /// Applies `change` to a copy of the state, persists it, then publishes it.
    fn mutate(
        &self,
        change: impl FnOnce(&mut TrackerState) -> RepositoryResult<()>,
    ) -> RepositoryResult<()> {
        let mut guard = self.write()?;
        let mut next = guard.clone();
        change(&mut next)?;
        self.persist(&next)?;
        *guard = next;
        Ok(())
    }

    fn persist(&self, state: &TrackerState) -> RepositoryResult<()> {
        let contents = serde_json::to_string_pretty(&state.to_document())
            .map_err(RepositoryError::persistence)?;
        self.dir
            .write(STAGING_FILE, contents)
            .map_err(RepositoryError::persistence)?;
        self.dir
            .rename(STAGING_FILE, &self.dir, DOCUMENT_FILE)
            .map_err(RepositoryError::persistence)
    }
}

impl ProjectRepository for JsonFileStore {
    fn store_project(&self, project: &Project) -> RepositoryResult<()> {
        self.mutate(|state| state.insert_project(project))
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

impl TaskRepository for JsonFileStore {
    fn store_task(&self, task: &Task) -> RepositoryResult<()> {
        self.mutate(|state| state.insert_task(task))
    }

    fn update_task(&self, task: &Task) -> RepositoryResult<()> {
        self.mutate(|state| state.replace_task(task))
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

impl TimePeriodRepository for JsonFileStore {
    fn store_time_period(&self, period: &TimePeriod) -> RepositoryResult<()> {
        self.mutate(|state| state.insert_period(period))
    }

    fn list_time_periods(&self, task_id: TaskId) -> RepositoryResult<Vec<TimePeriod>> {
        Ok(self.read()?.periods_of(task_id))
    }
}
