//! Task aggregate root.

use super::machine::{PendingTransition, TransitionTable};
use super::{
    ExternalId, ProjectId, RunningTime, TaskDomainError, TaskEvent, TaskId, TaskName, TaskNumber,
    TaskState, TimePeriod,
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Transition of a task that has been validated but not yet saved.
pub type PendingTaskTransition = PendingTransition<TaskState, TaskEvent>;

/// Task aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    number: TaskNumber,
    name: TaskName,
    project_id: ProjectId,
    state: TaskState,
    num_votes: u32,
    tags: BTreeSet<String>,
    creator: String,
    owner: String,
    external_id: Option<ExternalId>,
    last_started_at: DateTime<Utc>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Input for creating a new task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    project_id: ProjectId,
    name: TaskName,
    number: Option<TaskNumber>,
    last_started_at: Option<DateTime<Utc>>,
    tags: BTreeSet<String>,
    creator: String,
    owner: String,
}

impl TaskDraft {
    /// Creates a draft with the required fields.
    #[must_use]
    pub fn new(project_id: ProjectId, name: TaskName, creator: impl Into<String>) -> Self {
        let creator = creator.into();
        Self {
            project_id,
            name,
            number: None,
            last_started_at: None,
            tags: BTreeSet::new(),
            owner: creator.clone(),
            creator,
        }
    }

    /// Uses an explicit number instead of the next sequential one.
    #[must_use]
    pub const fn with_number(mut self, number: TaskNumber) -> Self {
        self.number = Some(number);
        self
    }

    /// Uses an explicit `last_started_at` instead of the creation time.
    #[must_use]
    pub const fn with_last_started_at(mut self, at: DateTime<Utc>) -> Self {
        self.last_started_at = Some(at);
        self
    }

    /// Sets the task tags. Blank tags are dropped.
    #[must_use]
    pub fn with_tags(mut self, tags: impl IntoIterator<Item = String>) -> Self {
        self.tags = tags
            .into_iter()
            .map(|tag| tag.trim().to_owned())
            .filter(|tag| !tag.is_empty())
            .collect();
        self
    }

    /// Sets the owner label.
    #[must_use]
    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = owner.into();
        self
    }

    /// Returns the owning project.
    #[must_use]
    pub const fn project_id(&self) -> ProjectId {
        self.project_id
    }

    /// Returns the task name.
    #[must_use]
    pub const fn name(&self) -> &TaskName {
        &self.name
    }

    /// Returns the explicitly requested number, if any.
    #[must_use]
    pub const fn number(&self) -> Option<TaskNumber> {
        self.number
    }
}

impl Task {
    /// Creates a new, unsaved task.
    ///
    /// `next_number` is used unless the draft carries an explicit number.
    #[must_use]
    pub fn new(draft: TaskDraft, next_number: TaskNumber, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        Self {
            id: TaskId::new(),
            number: draft.number.unwrap_or(next_number),
            name: draft.name,
            project_id: draft.project_id,
            state: TaskState::Unstarted,
            num_votes: 1,
            tags: draft.tags,
            creator: draft.creator,
            owner: draft.owner,
            external_id: None,
            last_started_at: draft.last_started_at.unwrap_or(timestamp),
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the sequential task number.
    #[must_use]
    pub const fn number(&self) -> TaskNumber {
        self.number
    }

    /// Returns the task name.
    #[must_use]
    pub const fn name(&self) -> &TaskName {
        &self.name
    }

    /// Returns the owning project.
    #[must_use]
    pub const fn project_id(&self) -> ProjectId {
        self.project_id
    }

    /// Returns the lifecycle state.
    #[must_use]
    pub const fn state(&self) -> TaskState {
        self.state
    }

    /// Returns the vote count.
    #[must_use]
    pub const fn num_votes(&self) -> u32 {
        self.num_votes
    }

    /// Returns the tag set.
    #[must_use]
    pub const fn tags(&self) -> &BTreeSet<String> {
        &self.tags
    }

    /// Returns the creator label.
    #[must_use]
    pub fn creator(&self) -> &str {
        &self.creator
    }

    /// Returns the owner label.
    #[must_use]
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Returns the external tracker identifier, if synced.
    #[must_use]
    pub const fn external_id(&self) -> Option<&ExternalId> {
        self.external_id.as_ref()
    }

    /// Returns when the task most recently entered `running`.
    #[must_use]
    pub const fn last_started_at(&self) -> DateTime<Utc> {
        self.last_started_at
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Validates firing `event` against `table` without touching the task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidTransition`] carrying the table's
    /// message for this event and the task's current state.
    pub fn begin(
        &self,
        event: TaskEvent,
        table: &TransitionTable<TaskState, TaskEvent>,
        clock: &impl Clock,
    ) -> Result<PendingTaskTransition, TaskDomainError> {
        table
            .validate(event, self.state, clock.utc())
            .map_err(|rejection| TaskDomainError::InvalidTransition {
                number: self.number,
                event,
                from: self.state,
                message: rejection.message,
            })
    }

    /// Applies a pending transition's target state.
    pub fn commit(&mut self, pending: &mut PendingTaskTransition) {
        self.state = pending.to();
        self.updated_at = pending.at();
        pending.mark_committed();
    }

    /// Records `at` as the start of the current running interval.
    pub const fn stamp_started(&mut self, at: DateTime<Utc>) {
        self.last_started_at = at;
    }

    /// Adds one vote.
    pub fn upvote(&mut self, clock: &impl Clock) {
        self.num_votes = self.num_votes.saturating_add(1);
        self.touch(clock);
    }

    /// Stores the identifier assigned by the external tracker.
    pub fn link_external(&mut self, external_id: ExternalId) {
        self.external_id = Some(external_id);
    }

    /// Sums the durations of this task's periods.
    ///
    /// Periods belonging to other tasks are ignored.
    #[must_use]
    pub fn total_running_time(&self, periods: &[TimePeriod]) -> RunningTime {
        RunningTime::from_periods(periods.iter().filter(|period| period.task_id() == self.id))
    }

    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}
