//! Unit tests for the tracking service lifecycle.

use chrono::TimeDelta;
use eyre::{bail, ensure};
use rstest::{fixture, rstest};
use std::sync::Arc;

use super::{StepClock, epoch};
use crate::tracking::{
    adapters::memory::InMemoryTrackerStore,
    domain::{
        ExternalId, Project, TaskDomainError, TaskDraft, TaskEvent, TaskName, TaskNumber,
        TaskState,
    },
    ports::{IssueTrackerError, TaskRepository, TimePeriodRepository, issue_tracker::MockIssueTracker},
    services::{TrackingError, TrackingService},
};

type TestService = TrackingService<InMemoryTrackerStore, StepClock>;

const STEP_SECONDS: i64 = 60;

#[fixture]
fn store() -> Arc<InMemoryTrackerStore> {
    Arc::new(InMemoryTrackerStore::new())
}

fn service_with(store: &Arc<InMemoryTrackerStore>) -> TestService {
    TrackingService::new(
        Arc::clone(store),
        Arc::new(StepClock::starting_at_epoch(STEP_SECONDS)),
    )
}

fn draft(project: &Project, name: &str) -> TaskDraft {
    TaskDraft::new(project.id(), TaskName::new(name).expect("valid name"), "ada")
}

#[rstest]
fn numbers_follow_the_highest_existing_number(store: Arc<InMemoryTrackerStore>) -> eyre::Result<()> {
    let service = service_with(&store);
    let work = service.find_or_create_project("work")?;
    let home = service.find_or_create_project("home")?;

    let first = service.create_task(draft(&work, "one"))?;
    let second = service.create_task(draft(&home, "two"))?;
    let jumped = service.create_task(draft(&work, "three").with_number(TaskNumber::new(10)?))?;
    let after_jump = service.create_task(draft(&home, "four"))?;

    ensure!(first.number() == TaskNumber::FIRST);
    ensure!(second.number() == TaskNumber::new(2)?);
    ensure!(jumped.number() == TaskNumber::new(10)?);
    ensure!(after_jump.number() == TaskNumber::new(11)?);
    Ok(())
}

#[rstest]
fn numbers_are_never_reassigned_on_update(store: Arc<InMemoryTrackerStore>) -> eyre::Result<()> {
    let service = service_with(&store);
    let work = service.find_or_create_project("work")?;
    let task = service.create_task(draft(&work, "one"))?;

    service.start(task.number())?;
    service.upvote(task.number())?;
    let reloaded = service.task(task.number())?;

    ensure!(reloaded.number() == task.number());
    ensure!(reloaded.id() == task.id());
    Ok(())
}

#[rstest]
fn find_or_create_returns_existing_records(store: Arc<InMemoryTrackerStore>) -> eyre::Result<()> {
    let service = service_with(&store);
    let first = service.find_or_create_project("work")?;
    let again = service.find_or_create_project("  work ")?;
    let task = service.find_or_create_task(draft(&first, "one"))?;
    let same_task = service.find_or_create_task(draft(&first, "one"))?;

    ensure!(first.id() == again.id());
    ensure!(task.id() == same_task.id());
    ensure!(service.projects()?.len() == 1);
    Ok(())
}

#[rstest]
fn start_stamps_last_started_at(store: Arc<InMemoryTrackerStore>) -> eyre::Result<()> {
    let service = service_with(&store);
    let work = service.find_or_create_project("work")?;
    let task = service.create_task(draft(&work, "one"))?;

    let report = service.start(task.number())?;

    ensure!(report.task.state() == TaskState::Running);
    ensure!(report.task.last_started_at() == report.transition.at);
    ensure!(report.task.last_started_at() > task.created_at());
    ensure!(report.recorded.is_empty());
    Ok(())
}

#[rstest]
#[case(TaskEvent::Pause, TaskState::Unstarted)]
#[case(TaskEvent::Resume, TaskState::Unstarted)]
#[case(TaskEvent::Finish, TaskState::Unstarted)]
#[case(TaskEvent::Start, TaskState::Running)]
#[case(TaskEvent::Resume, TaskState::Running)]
#[case(TaskEvent::Start, TaskState::Paused)]
#[case(TaskEvent::Pause, TaskState::Paused)]
#[case(TaskEvent::Start, TaskState::Finished)]
#[case(TaskEvent::Pause, TaskState::Finished)]
#[case(TaskEvent::Resume, TaskState::Finished)]
#[case(TaskEvent::Finish, TaskState::Finished)]
fn rejected_transitions_leave_no_trace(
    store: Arc<InMemoryTrackerStore>,
    #[case] event: TaskEvent,
    #[case] state: TaskState,
) -> eyre::Result<()> {
    let service = service_with(&store);
    let work = service.find_or_create_project("work")?;
    let task = service.create_task(draft(&work, "one"))?;
    let path: &[TaskEvent] = match state {
        TaskState::Unstarted => &[],
        TaskState::Running => &[TaskEvent::Start],
        TaskState::Paused => &[TaskEvent::Start, TaskEvent::Pause],
        TaskState::Finished => &[TaskEvent::Start, TaskEvent::Finish],
    };
    for step in path {
        service.fire(task.number(), *step)?;
    }
    let before = service.task(task.number())?;
    let periods_before = store.list_time_periods(task.id())?.len();

    let result = service.fire(task.number(), event);

    let Err(TrackingError::Domain(TaskDomainError::InvalidTransition { from, .. })) = result else {
        bail!("expected an invalid transition, got {result:?}");
    };
    ensure!(from == state);
    ensure!(service.task(task.number())? == before);
    ensure!(store.list_time_periods(task.id())?.len() == periods_before);
    Ok(())
}

#[rstest]
fn pause_then_finish_records_one_period(store: Arc<InMemoryTrackerStore>) -> eyre::Result<()> {
    let service = service_with(&store);
    let work = service.find_or_create_project("work")?;
    let task = service.create_task(draft(&work, "one"))?;

    let started = service.start(task.number())?;
    let paused = service.pause(task.number())?;
    let finished = service.finish(task.number())?;

    let periods = service.time_periods(task.number())?;
    ensure!(periods.len() == 1);
    ensure!(paused.recorded == periods);
    ensure!(finished.recorded.is_empty());
    ensure!(finished.transition.from == TaskState::Paused);
    let Some(period) = periods.first() else {
        bail!("expected a recorded period");
    };
    ensure!(period.started_at() == started.transition.at);
    ensure!(period.ended_at() == paused.transition.at);
    Ok(())
}

#[rstest]
fn start_then_finish_records_the_running_interval(
    store: Arc<InMemoryTrackerStore>,
) -> eyre::Result<()> {
    let service = service_with(&store);
    let work = service.find_or_create_project("work")?;
    let task = service.create_task(draft(&work, "one"))?;

    let started = service.start(task.number())?;
    let finished = service.finish(task.number())?;

    let periods = service.time_periods(task.number())?;
    ensure!(periods.len() == 1);
    ensure!(finished.recorded == periods);
    let Some(period) = periods.first() else {
        bail!("expected a recorded period");
    };
    ensure!(period.started_at() == started.task.last_started_at());
    ensure!(period.ended_at() == finished.transition.at);
    ensure!(period.duration() == TimeDelta::seconds(STEP_SECONDS));
    Ok(())
}

#[rstest]
fn resume_restamps_and_totals_accumulate(store: Arc<InMemoryTrackerStore>) -> eyre::Result<()> {
    let service = service_with(&store);
    let work = service.find_or_create_project("work")?;
    let task = service.create_task(draft(&work, "one"))?;

    service.start(task.number())?;
    service.pause(task.number())?;
    let resumed = service.resume(task.number())?;
    service.finish(task.number())?;

    ensure!(resumed.task.last_started_at() == resumed.transition.at);
    let total = service.total_running_time(task.number())?;
    ensure!(total.periods() == 2);
    ensure!(total.total() == TimeDelta::seconds(2 * STEP_SECONDS));
    Ok(())
}

#[rstest]
fn start_new_creates_and_starts_in_one_save(store: Arc<InMemoryTrackerStore>) -> eyre::Result<()> {
    let service = service_with(&store);
    let work = service.find_or_create_project("work")?;

    let report = service.start_new(draft(&work, "fresh"))?;

    ensure!(report.task.state() == TaskState::Running);
    ensure!(report.transition.from == TaskState::Unstarted);
    let stored = store.find_task(report.task.id())?;
    ensure!(stored.as_ref() == Some(&report.task));
    Ok(())
}

#[rstest]
fn upvote_twice_adds_two_votes(store: Arc<InMemoryTrackerStore>) -> eyre::Result<()> {
    let service = service_with(&store);
    let work = service.find_or_create_project("work")?;
    let task = service.create_task(draft(&work, "one"))?;
    service.upvote(task.number())?;

    service.upvote(task.number())?;
    let voted = service.upvote(task.number())?;

    ensure!(voted.num_votes() == 4);
    ensure!(service.task(task.number())?.num_votes() == 4);
    Ok(())
}

#[rstest]
fn tasks_filter_by_state(store: Arc<InMemoryTrackerStore>) -> eyre::Result<()> {
    let service = service_with(&store);
    let work = service.find_or_create_project("work")?;
    let idle = service.create_task(draft(&work, "idle"))?;
    let busy = service.create_task(draft(&work, "busy"))?;
    service.start(busy.number())?;

    let running = service.tasks(work.id(), Some(TaskState::Running))?;
    let everything = service.tasks(work.id(), None)?;

    ensure!(running.iter().map(|task| task.id()).eq([busy.id()]));
    ensure!(everything.iter().map(|task| task.id()).eq([idle.id(), busy.id()]));
    Ok(())
}

#[rstest]
fn missing_task_number_is_reported(store: Arc<InMemoryTrackerStore>) -> eyre::Result<()> {
    let service = service_with(&store);
    let number = TaskNumber::new(99)?;

    let result = service.start(number);

    ensure!(matches!(result, Err(TrackingError::TaskNotFound(missing)) if missing == number));
    Ok(())
}

fn external(value: &str) -> ExternalId {
    ExternalId::new(value).expect("valid external id")
}

#[rstest]
fn issue_tracker_mirrors_creation_and_updates(store: Arc<InMemoryTrackerStore>) -> eyre::Result<()> {
    let mut tracker = MockIssueTracker::new();
    tracker
        .expect_add_project()
        .withf(|name| name == "work")
        .times(1)
        .returning(|_| Ok(external("PRJ-1")));
    tracker
        .expect_add_task()
        .times(1)
        .returning(|_, _| Ok(external("TSK-1")));
    tracker
        .expect_push_task()
        .withf(|task| task.state() == TaskState::Running)
        .times(1)
        .returning(|_| Ok(()));
    let service = service_with(&store).with_issue_tracker(Arc::new(tracker));

    let work = service.find_or_create_project("work")?;
    let task = service.create_task(draft(&work, "one"))?;
    service.start(task.number())?;

    ensure!(work.external_id() == Some(&external("PRJ-1")));
    ensure!(task.external_id() == Some(&external("TSK-1")));
    Ok(())
}

#[rstest]
fn rejected_transition_never_reaches_the_tracker(
    store: Arc<InMemoryTrackerStore>,
) -> eyre::Result<()> {
    let mut tracker = MockIssueTracker::new();
    tracker
        .expect_add_project()
        .returning(|_| Ok(external("PRJ-1")));
    tracker
        .expect_add_task()
        .returning(|_, _| Ok(external("TSK-1")));
    tracker.expect_push_task().times(0);
    let service = service_with(&store).with_issue_tracker(Arc::new(tracker));
    let work = service.find_or_create_project("work")?;
    let task = service.create_task(draft(&work, "one"))?;

    let result = service.pause(task.number());

    ensure!(result.is_err());
    Ok(())
}

#[rstest]
fn tracker_errors_surface_unchanged(store: Arc<InMemoryTrackerStore>) -> eyre::Result<()> {
    let mut tracker = MockIssueTracker::new();
    tracker
        .expect_add_project()
        .returning(|_| Err(IssueTrackerError::Unauthorized));
    let service = service_with(&store).with_issue_tracker(Arc::new(tracker));

    let result = service.find_or_create_project("work");

    ensure!(matches!(
        result,
        Err(TrackingError::IssueTracker(IssueTrackerError::Unauthorized))
    ));
    ensure!(service.projects()?.is_empty());
    Ok(())
}

#[rstest]
fn tasks_without_external_ids_are_not_pushed(store: Arc<InMemoryTrackerStore>) -> eyre::Result<()> {
    let plain = service_with(&store);
    let work = plain.find_or_create_project("work")?;
    let task = plain.create_task(draft(&work, "local"))?;
    let mut tracker = MockIssueTracker::new();
    tracker.expect_push_task().times(0);
    let mirrored = service_with(&store).with_issue_tracker(Arc::new(tracker));

    let report = mirrored.start(task.number())?;

    ensure!(report.task.state() == TaskState::Running);
    ensure!(report.task.last_started_at() >= epoch());
    Ok(())
}

#[rstest]
fn push_failure_keeps_the_saved_transition(store: Arc<InMemoryTrackerStore>) -> eyre::Result<()> {
    let mut tracker = MockIssueTracker::new();
    tracker
        .expect_add_project()
        .returning(|_| Ok(external("PRJ-1")));
    tracker
        .expect_add_task()
        .returning(|_, _| Ok(external("TSK-1")));
    tracker
        .expect_push_task()
        .times(1)
        .returning(|_| Err(IssueTrackerError::NotFound("TSK-1".to_owned())));
    let service = service_with(&store).with_issue_tracker(Arc::new(tracker));
    let work = service.find_or_create_project("work")?;
    let task = service.create_task(draft(&work, "one"))?;

    let result = service.start(task.number());

    let Err(TrackingError::IssueTracker(IssueTrackerError::NotFound(record))) = &result else {
        bail!("expected a NotFound tracker error, got {result:?}");
    };
    ensure!(record == "TSK-1");
    let stored = store
        .find_task(task.id())?
        .ok_or_else(|| eyre::eyre!("task should still be stored"))?;
    ensure!(stored.state() == TaskState::Running);
    Ok(())
}
