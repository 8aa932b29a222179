//! Built-in commands.

use chrono::Local;
use mockable::Clock;

use super::session::Session;
use crate::command::{
    domain::{Abort, CommandDefinition, CommandError},
    ports::Console,
    services::Dispatcher,
};
use crate::tracking::{
    domain::{Task, TaskDraft, TaskEvent, TaskState, humanize},
    ports::TrackerStore,
    services::TransitionReport,
};

type CommandResult = Result<(), CommandError>;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Builds a dispatcher with every built-in command registered.
#[must_use]
pub fn builtin_dispatcher<R, K>(program: &str) -> Dispatcher<Session<R, K>>
where
    R: TrackerStore + 'static,
    K: Clock + Send + Sync + 'static,
{
    let mut dispatcher = Dispatcher::new(program);
    dispatcher
        .register(
            CommandDefinition::new("project")
                .with_args("<name>")
                .with_description("Switch to a project, creating it if needed"),
            project::<R, K>,
        )
        .register(
            CommandDefinition::new("projects").with_description("List all projects"),
            projects::<R, K>,
        )
        .register(
            CommandDefinition::new("start")
                .with_args("<task>")
                .with_description("Start a task, creating it if needed"),
            start::<R, K>,
        )
        .register(
            CommandDefinition::new("pause")
                .with_args("<task>")
                .with_description("Pause a running task"),
            pause::<R, K>,
        )
        .register(
            CommandDefinition::new("resume")
                .with_args("<task>")
                .with_description("Resume a paused task"),
            resume::<R, K>,
        )
        .register(
            CommandDefinition::new("finish")
                .with_args("<task>")
                .with_description("Finish a running or paused task"),
            finish::<R, K>,
        )
        .register(
            CommandDefinition::new("upvote")
                .with_args("<task>")
                .with_description("Add a vote to a task"),
            upvote::<R, K>,
        )
        .register(
            CommandDefinition::new("tasks")
                .with_args("[state]")
                .with_subcommands(TaskState::ALL.map(TaskState::as_str))
                .with_description("List tasks in the current project"),
            tasks::<R, K>,
        )
        .register(
            CommandDefinition::new("log")
                .with_args("<task>")
                .with_description("Show the time recorded for a task"),
            log::<R, K>,
        )
        .register(
            CommandDefinition::new("help").with_description("List commands"),
            help::<R, K>,
        );
    dispatcher
}

fn first_arg(args: &[String]) -> &str {
    args.first().map_or("", String::as_str)
}

fn describe(task: &Task) -> String {
    format!("{} \"{}\"", task.number(), task.name())
}

fn votes(count: u32) -> String {
    if count == 1 {
        "1 vote".to_owned()
    } else {
        format!("{count} votes")
    }
}

fn project<R, K>(session: &mut Session<R, K>, args: &[String]) -> CommandResult
where
    R: TrackerStore + 'static,
    K: Clock + Send + Sync,
{
    let selected = session.switch_project(first_arg(args))?;
    session.say(&format!("Switched to project \"{}\".", selected.name()))?;
    Ok(())
}

fn projects<R, K>(session: &mut Session<R, K>, _args: &[String]) -> CommandResult
where
    R: TrackerStore + 'static,
    K: Clock + Send + Sync,
{
    let all = session.service().projects()?;
    if all.is_empty() {
        session.say("No projects yet.")?;
        return Ok(());
    }
    let selected = session.selected_project().map(|current| current.id());
    for entry in &all {
        let marker = if Some(entry.id()) == selected { '*' } else { ' ' };
        session.say(&format!("{marker} {}", entry.name()))?;
    }
    Ok(())
}

/// Task a `start` command will act on, resolved before anything is written.
enum StartTarget {
    Existing(Task),
    New(TaskDraft),
}

impl StartTarget {
    fn is(&self, task: &Task) -> bool {
        matches!(self, Self::Existing(target) if target.id() == task.id())
    }
}

fn start<R, K>(session: &mut Session<R, K>, args: &[String]) -> CommandResult
where
    R: TrackerStore + 'static,
    K: Clock + Send + Sync,
{
    let reference = first_arg(args);
    let target = match session.lookup_task(reference)? {
        Some(task) => {
            session.service().check(&task, TaskEvent::Start)?;
            StartTarget::Existing(task)
        }
        None => StartTarget::New(session.draft(reference)?),
    };
    let current = session.current_project()?;
    let running = session
        .service()
        .tasks(current.id(), Some(TaskState::Running))?;

    // Every answer is collected before anything is written.
    let mut to_pause = Vec::with_capacity(running.len());
    for other in running
        .into_iter()
        .filter(|task| !target.is(task))
    {
        let question = format!("You're still working on {}. Pause it?", describe(&other));
        if !session.confirm(&question)? {
            return Err(Abort::with_message(format!("Okay, {} keeps running.", describe(&other))).into());
        }
        to_pause.push(other);
    }

    let report = match target {
        StartTarget::Existing(task) => session.service().start(task.number())?,
        StartTarget::New(draft) => session.service().start_new(draft)?,
    };
    for other in &to_pause {
        let paused = session.service().pause(other.number())?;
        say_paused(session, &paused)?;
    }
    session.say(&format!("Started {}.", describe(&report.task)))?;
    Ok(())
}

fn pause<R, K>(session: &mut Session<R, K>, args: &[String]) -> CommandResult
where
    R: TrackerStore + 'static,
    K: Clock + Send + Sync,
{
    let task = session.resolve_task(first_arg(args))?;
    let report = session.service().pause(task.number())?;
    say_paused(session, &report)
}

fn say_paused<R, K>(session: &mut Session<R, K>, report: &TransitionReport) -> CommandResult
where
    R: TrackerStore + 'static,
    K: Clock + Send + Sync,
{
    let line = report.recorded.first().map_or_else(
        || format!("Paused {}.", describe(&report.task)),
        |period| {
            format!(
                "Paused {} after {}.",
                describe(&report.task),
                humanize(period.duration())
            )
        },
    );
    session.say(&line)?;
    Ok(())
}

fn resume<R, K>(session: &mut Session<R, K>, args: &[String]) -> CommandResult
where
    R: TrackerStore + 'static,
    K: Clock + Send + Sync,
{
    let task = session.resolve_task(first_arg(args))?;
    let report = session.service().resume(task.number())?;
    session.say(&format!("Resumed {}.", describe(&report.task)))?;
    Ok(())
}

fn finish<R, K>(session: &mut Session<R, K>, args: &[String]) -> CommandResult
where
    R: TrackerStore + 'static,
    K: Clock + Send + Sync,
{
    let task = session.resolve_task(first_arg(args))?;
    let report = session.service().finish(task.number())?;
    let total = session.service().total_running_time(task.number())?;
    session.say(&format!(
        "Finished {} after {total}.",
        describe(&report.task)
    ))?;
    Ok(())
}

fn upvote<R, K>(session: &mut Session<R, K>, args: &[String]) -> CommandResult
where
    R: TrackerStore + 'static,
    K: Clock + Send + Sync,
{
    let task = session.resolve_task(first_arg(args))?;
    let voted = session.service().upvote(task.number())?;
    session.say(&format!(
        "{} now has {}.",
        describe(&voted),
        votes(voted.num_votes())
    ))?;
    Ok(())
}

fn tasks<R, K>(session: &mut Session<R, K>, args: &[String]) -> CommandResult
where
    R: TrackerStore + 'static,
    K: Clock + Send + Sync,
{
    let filter = args
        .first()
        .map(|state| TaskState::try_from(state.as_str()))
        .transpose()?;
    let current = session.current_project()?;
    let listed = session.service().tasks(current.id(), filter)?;

    if listed.is_empty() {
        let qualifier = filter.map_or_else(String::new, |state| format!("{state} "));
        session.say(&format!("No {qualifier}tasks in {}.", current.name()))?;
        return Ok(());
    }
    for task in &listed {
        session.say(&format!(
            "{:>6}  {:<9}  {}  ({})",
            task.number().to_string(),
            task.state().as_str(),
            task.name(),
            votes(task.num_votes())
        ))?;
    }
    Ok(())
}

fn log<R, K>(session: &mut Session<R, K>, args: &[String]) -> CommandResult
where
    R: TrackerStore + 'static,
    K: Clock + Send + Sync,
{
    let task = session.resolve_task(first_arg(args))?;
    let periods = session.service().time_periods(task.number())?;
    session.say(&format!("{} is {}.", describe(&task), task.state()))?;
    for period in &periods {
        session.say(&format!(
            "  {} to {}  ({})",
            period.started_at().with_timezone(&Local).format(TIMESTAMP_FORMAT),
            period.ended_at().with_timezone(&Local).format(TIMESTAMP_FORMAT),
            humanize(period.duration())
        ))?;
    }
    session.say(&format!("Total: {}", task.total_running_time(&periods)))?;
    Ok(())
}

fn help<R, K>(session: &mut Session<R, K>, _args: &[String]) -> CommandResult
where
    R: TrackerStore + 'static,
    K: Clock + Send + Sync,
{
    let lines = session.help().to_vec();
    for line in &lines {
        session.say(line)?;
    }
    Ok(())
}
