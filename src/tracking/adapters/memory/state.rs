//! Indexed tracker records shared by the in-memory and JSON stores.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::tracking::{
    domain::{
        Project, ProjectId, ProjectName, Task, TaskId, TaskName, TaskNumber, TimePeriod,
    },
    ports::{RepositoryError, RepositoryResult},
};

/// Every tracked record, indexed for the repository queries.
#[derive(Debug, Clone, Default)]
pub(crate) struct TrackerState {
    projects: HashMap<ProjectId, Project>,
    tasks: HashMap<TaskId, Task>,
    number_index: HashMap<TaskNumber, TaskId>,
    periods: HashMap<TaskId, Vec<TimePeriod>>,
}

/// Serialised form of [`TrackerState`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct TrackerDocument {
    #[serde(default)]
    projects: Vec<Project>,
    #[serde(default)]
    tasks: Vec<Task>,
    #[serde(default)]
    time_periods: Vec<TimePeriod>,
}

impl TrackerState {
    pub(crate) fn insert_project(&mut self, project: &Project) -> RepositoryResult<()> {
        if self.projects.contains_key(&project.id()) {
            return Err(RepositoryError::DuplicateProject(project.id()));
        }
        if self.project_by_name(project.name()).is_some() {
            return Err(RepositoryError::DuplicateProjectName(project.name().clone()));
        }
        self.projects.insert(project.id(), project.clone());
        Ok(())
    }

    pub(crate) fn project(&self, id: ProjectId) -> Option<Project> {
        self.projects.get(&id).cloned()
    }

    pub(crate) fn project_by_name(&self, name: &ProjectName) -> Option<Project> {
        self.projects
            .values()
            .find(|project| project.name() == name)
            .cloned()
    }

    pub(crate) fn projects(&self) -> Vec<Project> {
        let mut projects: Vec<_> = self.projects.values().cloned().collect();
        projects.sort_by(|left, right| left.name().cmp(right.name()));
        projects
    }

    pub(crate) fn insert_task(&mut self, task: &Task) -> RepositoryResult<()> {
        if self.tasks.contains_key(&task.id()) {
            return Err(RepositoryError::DuplicateTask(task.id()));
        }
        if self.number_index.contains_key(&task.number()) {
            return Err(RepositoryError::DuplicateTaskNumber(task.number()));
        }
        self.number_index.insert(task.number(), task.id());
        self.tasks.insert(task.id(), task.clone());
        Ok(())
    }

    pub(crate) fn replace_task(&mut self, task: &Task) -> RepositoryResult<()> {
        let existing = self
            .tasks
            .get_mut(&task.id())
            .ok_or(RepositoryError::TaskNotFound(task.id()))?;
        *existing = task.clone();
        Ok(())
    }

    pub(crate) fn task(&self, id: TaskId) -> Option<Task> {
        self.tasks.get(&id).cloned()
    }

    pub(crate) fn task_by_number(&self, number: TaskNumber) -> Option<Task> {
        self.number_index
            .get(&number)
            .and_then(|id| self.tasks.get(id))
            .cloned()
    }

    pub(crate) fn task_by_name(&self, project_id: ProjectId, name: &TaskName) -> Option<Task> {
        self.tasks
            .values()
            .filter(|task| task.project_id() == project_id && task.name() == name)
            .min_by_key(|task| task.number())
            .cloned()
    }

    pub(crate) fn tasks_in(&self, project_id: ProjectId) -> Vec<Task> {
        let mut tasks: Vec<_> = self
            .tasks
            .values()
            .filter(|task| task.project_id() == project_id)
            .cloned()
            .collect();
        tasks.sort_by_key(Task::number);
        tasks
    }

    pub(crate) fn max_number(&self) -> Option<TaskNumber> {
        self.number_index.keys().max().copied()
    }

    pub(crate) fn insert_period(&mut self, period: &TimePeriod) -> RepositoryResult<()> {
        if !self.tasks.contains_key(&period.task_id()) {
            return Err(RepositoryError::TaskNotFound(period.task_id()));
        }
        let periods = self.periods.entry(period.task_id()).or_default();
        if periods.iter().any(|existing| existing.id() == period.id()) {
            return Err(RepositoryError::DuplicateTimePeriod(period.id()));
        }
        periods.push(period.clone());
        periods.sort_by_key(TimePeriod::started_at);
        Ok(())
    }

    pub(crate) fn periods_of(&self, task_id: TaskId) -> Vec<TimePeriod> {
        self.periods.get(&task_id).cloned().unwrap_or_default()
    }

    pub(crate) fn to_document(&self) -> TrackerDocument {
        let mut tasks: Vec<_> = self.tasks.values().cloned().collect();
        tasks.sort_by_key(Task::number);
        let time_periods = tasks
            .iter()
            .flat_map(|task| self.periods_of(task.id()))
            .collect();
        TrackerDocument {
            projects: self.projects(),
            tasks,
            time_periods,
        }
    }

    pub(crate) fn from_document(document: TrackerDocument) -> RepositoryResult<Self> {
        let mut state = Self::default();
        for project in &document.projects {
            state.insert_project(project)?;
        }
        for task in &document.tasks {
            state.insert_task(task)?;
        }
        for period in &document.time_periods {
            state.insert_period(period)?;
        }
        Ok(state)
    }
}
