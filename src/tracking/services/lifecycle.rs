//! Service layer for project and task lifecycle orchestration.

use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

use super::hooks::{TaskHooks, TransitionScope, task_hooks};
use crate::tracking::{
    domain::{
        PendingTaskTransition, Project, ProjectId, ProjectName, RunningTime, Task,
        TaskDomainError, TaskDraft, TaskEvent, TaskName, TaskNumber, TaskState, TimePeriod,
        machine::{CallbackPhase, SaveKind, Transition, TransitionTable},
        task_transitions,
    },
    ports::{IssueTracker, IssueTrackerError, RepositoryError, TimePeriodRepository, TrackerStore},
};

/// Service-level errors for tracking operations.
#[derive(Debug, Error)]
pub enum TrackingError {
    /// Domain validation failed, including rejected transitions.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    /// The external issue tracker failed.
    #[error(transparent)]
    IssueTracker(#[from] IssueTrackerError),
    /// No task carries the requested number.
    #[error("There's no task {0}.")]
    TaskNotFound(TaskNumber),
    /// No task with the requested name exists in the project.
    #[error("There's no task called \"{name}\" in {project}.")]
    TaskNameNotFound {
        /// Project that was searched.
        project: ProjectName,
        /// Requested task name.
        name: TaskName,
    },
    /// The project was not found.
    #[error("There's no project called \"{0}\".")]
    ProjectNotFound(ProjectName),
    /// A draft referenced a project id the store does not hold.
    #[error("project {0} does not exist")]
    UnknownProject(ProjectId),
}

impl TrackingError {
    /// Returns whether the error is a user mistake rather than a fault.
    ///
    /// Rejected transitions, invalid input and missing records are reported
    /// to the user; repository and tracker failures are not.
    #[must_use]
    pub const fn is_user_facing(&self) -> bool {
        matches!(
            self,
            Self::Domain(_)
                | Self::TaskNotFound(_)
                | Self::TaskNameNotFound { .. }
                | Self::ProjectNotFound(_)
        )
    }
}

/// Result type for tracking service operations.
pub type TrackingResult<T> = Result<T, TrackingError>;

/// Outcome of a successful lifecycle transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionReport {
    /// Task as saved after the transition.
    pub task: Task,
    /// Completed transition record.
    pub transition: Transition<TaskState, TaskEvent>,
    /// Time periods created by the transition's callbacks.
    pub recorded: Vec<TimePeriod>,
}

/// Project and task lifecycle orchestration service.
pub struct TrackingService<R, C>
where
    R: TrackerStore + 'static,
    C: Clock + Send + Sync,
{
    store: Arc<R>,
    clock: Arc<C>,
    issue_tracker: Option<Arc<dyn IssueTracker>>,
    transitions: Arc<TransitionTable<TaskState, TaskEvent>>,
    hooks: Arc<TaskHooks>,
}

impl<R, C> Clone for TrackingService<R, C>
where
    R: TrackerStore + 'static,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            clock: Arc::clone(&self.clock),
            issue_tracker: self.issue_tracker.clone(),
            transitions: Arc::clone(&self.transitions),
            hooks: Arc::clone(&self.hooks),
        }
    }
}

impl<R, C> TrackingService<R, C>
where
    R: TrackerStore + 'static,
    C: Clock + Send + Sync,
{
    /// Creates a service with the standard lifecycle table and callbacks.
    #[must_use]
    pub fn new(store: Arc<R>, clock: Arc<C>) -> Self {
        Self {
            store,
            clock,
            issue_tracker: None,
            transitions: Arc::new(task_transitions()),
            hooks: Arc::new(task_hooks()),
        }
    }

    /// Mirrors project and task changes into `tracker`.
    #[must_use]
    pub fn with_issue_tracker(mut self, tracker: Arc<dyn IssueTracker>) -> Self {
        self.issue_tracker = Some(tracker);
        self
    }

    /// Returns the backing store.
    #[must_use]
    pub const fn store(&self) -> &Arc<R> {
        &self.store
    }

    /// Returns the named project, creating it when missing.
    ///
    /// A new project is registered with the issue tracker before it is saved.
    ///
    /// # Errors
    ///
    /// Returns [`TrackingError`] when the name is blank, the tracker fails, or
    /// the store rejects the project.
    pub fn find_or_create_project(&self, name: &str) -> TrackingResult<Project> {
        let project_name = ProjectName::new(name)?;
        if let Some(existing) = self.store.find_project_by_name(&project_name)? {
            return Ok(existing);
        }

        let mut project = Project::new(project_name, &*self.clock);
        if let Some(tracker) = &self.issue_tracker {
            project.link_external(tracker.add_project(project.name().as_str())?);
        }
        self.store.store_project(&project)?;
        tracing::info!(project = %project.name(), "created project");
        Ok(project)
    }

    /// Returns the named project.
    ///
    /// # Errors
    ///
    /// Returns [`TrackingError::ProjectNotFound`] when no project has the name.
    pub fn project(&self, name: &str) -> TrackingResult<Project> {
        let project_name = ProjectName::new(name)?;
        self.store
            .find_project_by_name(&project_name)?
            .ok_or(TrackingError::ProjectNotFound(project_name))
    }

    /// Returns every project sorted by name.
    ///
    /// # Errors
    ///
    /// Returns [`TrackingError::Repository`] when the lookup fails.
    pub fn projects(&self) -> TrackingResult<Vec<Project>> {
        Ok(self.store.list_projects()?)
    }

    /// Creates and saves a new task.
    ///
    /// # Errors
    ///
    /// Returns [`TrackingError`] when the project is missing, the tracker
    /// fails, or the store rejects the task.
    pub fn create_task(&self, draft: TaskDraft) -> TrackingResult<Task> {
        let task = self.prepare_task(draft)?;
        self.store.store_task(&task)?;
        tracing::info!(task = %task.number(), name = %task.name(), "created task");
        Ok(task)
    }

    /// Returns the task named in the draft's project, creating it when missing.
    ///
    /// # Errors
    ///
    /// Returns [`TrackingError`] when lookup or creation fails.
    pub fn find_or_create_task(&self, draft: TaskDraft) -> TrackingResult<Task> {
        self.store
            .find_task_by_name(draft.project_id(), draft.name())?
            .map_or_else(|| self.create_task(draft), Ok)
    }

    /// Returns the task with `number`.
    ///
    /// # Errors
    ///
    /// Returns [`TrackingError::TaskNotFound`] when no task has the number.
    pub fn task(&self, number: TaskNumber) -> TrackingResult<Task> {
        self.store
            .find_task_by_number(number)?
            .ok_or(TrackingError::TaskNotFound(number))
    }

    /// Returns the task named `name` in `project`, if any.
    ///
    /// # Errors
    ///
    /// Returns [`TrackingError::Repository`] when the lookup fails.
    pub fn find_task_by_name(
        &self,
        project: &Project,
        name: &TaskName,
    ) -> TrackingResult<Option<Task>> {
        Ok(self.store.find_task_by_name(project.id(), name)?)
    }

    /// Returns a project's tasks, optionally restricted to one state.
    ///
    /// # Errors
    ///
    /// Returns [`TrackingError::Repository`] when the lookup fails.
    pub fn tasks(&self, project_id: ProjectId, state: Option<TaskState>) -> TrackingResult<Vec<Task>> {
        let mut tasks = self.store.list_tasks(project_id)?;
        if let Some(wanted) = state {
            tasks.retain(|task| task.state() == wanted);
        }
        Ok(tasks)
    }

    /// Starts an unstarted task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidTransition`] (wrapped) when the task
    /// is not unstarted, or any lookup, save or tracker failure.
    pub fn start(&self, number: TaskNumber) -> TrackingResult<TransitionReport> {
        self.fire(number, TaskEvent::Start)
    }

    /// Creates a task and starts it with a single save.
    ///
    /// # Errors
    ///
    /// Returns [`TrackingError`] when creation or the transition fails.
    pub fn start_new(&self, draft: TaskDraft) -> TrackingResult<TransitionReport> {
        let task = self.prepare_task(draft)?;
        self.transition(task, TaskEvent::Start, SaveKind::Create)
    }

    /// Pauses a running task, recording the interval that just ended.
    ///
    /// # Errors
    ///
    /// Returns [`TrackingError`] when the task is not running or saving fails.
    pub fn pause(&self, number: TaskNumber) -> TrackingResult<TransitionReport> {
        self.fire(number, TaskEvent::Pause)
    }

    /// Resumes a paused task.
    ///
    /// # Errors
    ///
    /// Returns [`TrackingError`] when the task is not paused or saving fails.
    pub fn resume(&self, number: TaskNumber) -> TrackingResult<TransitionReport> {
        self.fire(number, TaskEvent::Resume)
    }

    /// Finishes a running or paused task.
    ///
    /// An interval is recorded only when the task was running.
    ///
    /// # Errors
    ///
    /// Returns [`TrackingError`] when the task is unstarted or finished, or
    /// saving fails.
    pub fn finish(&self, number: TaskNumber) -> TrackingResult<TransitionReport> {
        self.fire(number, TaskEvent::Finish)
    }

    /// Fires `event` on the task with `number`.
    ///
    /// # Errors
    ///
    /// Returns [`TrackingError`] when the task is missing, the transition is
    /// rejected, or saving fails.
    pub fn fire(&self, number: TaskNumber, event: TaskEvent) -> TrackingResult<TransitionReport> {
        let task = self.task(number)?;
        self.transition(task, event, SaveKind::Update)
    }

    /// Checks that `event` is legal for `task` without changing anything.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidTransition`] (wrapped) when the
    /// event is not legal from the task's state.
    pub fn check(&self, task: &Task, event: TaskEvent) -> TrackingResult<()> {
        task.begin(event, &self.transitions, &*self.clock)?;
        Ok(())
    }

    /// Adds a vote to the task with `number`.
    ///
    /// # Errors
    ///
    /// Returns [`TrackingError`] when the task is missing or saving fails.
    pub fn upvote(&self, number: TaskNumber) -> TrackingResult<Task> {
        let mut task = self.task(number)?;
        task.upvote(&*self.clock);
        self.store.update_task(&task)?;
        self.push(&task)?;
        tracing::debug!(task = %task.number(), votes = task.num_votes(), "upvoted task");
        Ok(task)
    }

    /// Returns the task's recorded periods sorted by start time.
    ///
    /// # Errors
    ///
    /// Returns [`TrackingError`] when the task is missing or lookup fails.
    pub fn time_periods(&self, number: TaskNumber) -> TrackingResult<Vec<TimePeriod>> {
        let task = self.task(number)?;
        Ok(self.store.list_time_periods(task.id())?)
    }

    /// Returns the total recorded running time of the task.
    ///
    /// # Errors
    ///
    /// Returns [`TrackingError`] when the task is missing or lookup fails.
    pub fn total_running_time(&self, number: TaskNumber) -> TrackingResult<RunningTime> {
        let task = self.task(number)?;
        let periods = self.store.list_time_periods(task.id())?;
        Ok(task.total_running_time(&periods))
    }

    fn prepare_task(&self, draft: TaskDraft) -> TrackingResult<Task> {
        let project = self
            .store
            .find_project(draft.project_id())?
            .ok_or_else(|| TrackingError::UnknownProject(draft.project_id()))?;
        let next_number = self
            .store
            .max_task_number()?
            .map_or(TaskNumber::FIRST, TaskNumber::next);

        let mut task = Task::new(draft, next_number, &*self.clock);
        if let Some(tracker) = &self.issue_tracker {
            task.link_external(tracker.add_task(&project, task.name())?);
        }
        Ok(task)
    }

    /// Validates, runs callbacks around the save, and commits a transition.
    ///
    /// Validation happens before anything is touched, so a rejected event
    /// leaves no trace: no state change, no time period, no tracker call.
    fn transition(
        &self,
        task: Task,
        event: TaskEvent,
        save: SaveKind,
    ) -> TrackingResult<TransitionReport> {
        let mut pending = match task.begin(event, &self.transitions, &*self.clock) {
            Ok(pending) => pending,
            Err(err) => {
                tracing::warn!(task = %task.number(), %event, state = %task.state(), "rejected transition");
                return Err(err.into());
            }
        };
        tracing::debug!(
            task = %task.number(),
            %event,
            from = %pending.from(),
            to = %pending.to(),
            "validated transition"
        );

        let periods: Arc<dyn TimePeriodRepository> = self.store.clone();
        let mut scope = TransitionScope::new(task, periods);
        self.run_phases(&save.before_phases(), &pending, &mut scope)?;

        scope.task_mut().commit(&mut pending);
        match save {
            SaveKind::Create => self.store.store_task(scope.task())?,
            SaveKind::Update => self.store.update_task(scope.task())?,
        }

        self.run_phases(&save.after_phases(), &pending, &mut scope)?;
        let transition = pending.complete();
        let (saved, recorded) = scope.into_parts();

        if save == SaveKind::Update {
            self.push(&saved)?;
        }
        Ok(TransitionReport {
            task: saved,
            transition,
            recorded,
        })
    }

    fn run_phases(
        &self,
        phases: &[CallbackPhase],
        pending: &PendingTaskTransition,
        scope: &mut TransitionScope,
    ) -> TrackingResult<()> {
        for phase in phases {
            tracing::trace!(event = %pending.event(), ?phase, "running callbacks");
            self.hooks.run(*phase, pending, scope)?;
        }
        Ok(())
    }

    /// Pushes a saved task to the tracker when it is mirrored there.
    fn push(&self, task: &Task) -> TrackingResult<()> {
        let Some(tracker) = &self.issue_tracker else {
            return Ok(());
        };
        if task.external_id().is_none() {
            return Ok(());
        }
        tracker.push_task(task).inspect_err(|err| {
            tracing::warn!(task = %task.number(), error = %err, "issue tracker push failed");
        })?;
        Ok(())
    }
}
