//! Per-process command context.

use mockable::Clock;
use std::fmt;
use std::io::{self, BufRead, Write};

use crate::command::ports::Console;
use crate::config::Settings;
use crate::tracking::{
    domain::{Project, Task, TaskDraft, TaskName, TaskNumber},
    ports::TrackerStore,
    services::{TrackingError, TrackingResult, TrackingService},
};

/// State threaded through every command handler.
///
/// Holds the tracking service, the selected project, and the terminal
/// streams. The selected project is chosen lazily from the configured
/// default the first time a command needs one.
pub struct Session<R, K>
where
    R: TrackerStore + 'static,
    K: Clock + Send + Sync,
{
    service: TrackingService<R, K>,
    settings: Settings,
    current_project: Option<Project>,
    input: Box<dyn BufRead>,
    output: Box<dyn Write>,
    errors: Box<dyn Write>,
    help: Vec<String>,
}

impl<R, K> Session<R, K>
where
    R: TrackerStore + 'static,
    K: Clock + Send + Sync,
{
    /// Creates a session bound to the process's standard streams.
    #[must_use]
    pub fn new(service: TrackingService<R, K>, settings: Settings) -> Self {
        Self {
            service,
            settings,
            current_project: None,
            input: Box::new(io::stdin().lock()),
            output: Box::new(io::stdout()),
            errors: Box::new(io::stderr()),
            help: Vec::new(),
        }
    }

    /// Replaces the input, output, and error streams.
    #[must_use]
    pub fn with_io(
        mut self,
        input: impl BufRead + 'static,
        output: impl Write + 'static,
        errors: impl Write + 'static,
    ) -> Self {
        self.input = Box::new(input);
        self.output = Box::new(output);
        self.errors = Box::new(errors);
        self
    }

    /// Returns the tracking service.
    #[must_use]
    pub const fn service(&self) -> &TrackingService<R, K> {
        &self.service
    }

    /// Returns the loaded settings.
    #[must_use]
    pub const fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Returns the help listing shown by `help`.
    #[must_use]
    pub fn help(&self) -> &[String] {
        &self.help
    }

    /// Stores the help listing shown by `help`.
    pub fn set_help(&mut self, lines: Vec<String>) {
        self.help = lines;
    }

    /// Returns the selected project, selecting the default one when unset.
    ///
    /// # Errors
    ///
    /// Returns [`TrackingError`] when the default project cannot be loaded
    /// or created.
    pub fn current_project(&mut self) -> TrackingResult<Project> {
        if let Some(project) = &self.current_project {
            return Ok(project.clone());
        }
        let project = self
            .service
            .find_or_create_project(&self.settings.default_project)?;
        self.current_project = Some(project.clone());
        Ok(project)
    }

    /// Returns the selected project without selecting a default.
    #[must_use]
    pub const fn selected_project(&self) -> Option<&Project> {
        self.current_project.as_ref()
    }

    /// Selects the named project, creating it when missing.
    ///
    /// # Errors
    ///
    /// Returns [`TrackingError`] when the project cannot be loaded or created.
    pub fn switch_project(&mut self, name: &str) -> TrackingResult<Project> {
        let project = self.service.find_or_create_project(name)?;
        tracing::debug!(project = %project.name(), "switched project");
        self.current_project = Some(project.clone());
        Ok(project)
    }

    /// Looks up a task by `#number` or by name in the selected project.
    ///
    /// A number that matches no task is an error; a name that matches no
    /// task yields `None`.
    ///
    /// # Errors
    ///
    /// Returns [`TrackingError`] when the reference is blank or the lookup
    /// fails.
    pub fn lookup_task(&mut self, reference: &str) -> TrackingResult<Option<Task>> {
        if let Ok(number) = TaskNumber::try_from(reference) {
            return self.service.task(number).map(Some);
        }
        let name = TaskName::new(reference)?;
        let project = self.current_project()?;
        self.service.find_task_by_name(&project, &name)
    }

    /// Looks up a task that must exist.
    ///
    /// # Errors
    ///
    /// Returns [`TrackingError::TaskNameNotFound`] when no task in the
    /// selected project has the name, or any lookup failure.
    pub fn resolve_task(&mut self, reference: &str) -> TrackingResult<Task> {
        if let Some(task) = self.lookup_task(reference)? {
            return Ok(task);
        }
        let project = self.current_project()?;
        Err(TrackingError::TaskNameNotFound {
            project: project.name().clone(),
            name: TaskName::new(reference)?,
        })
    }

    /// Builds a draft for a new task in the selected project.
    ///
    /// # Errors
    ///
    /// Returns [`TrackingError`] when the name is blank or no project can be
    /// selected.
    pub fn draft(&mut self, name: &str) -> TrackingResult<TaskDraft> {
        let task_name = TaskName::new(name)?;
        let project = self.current_project()?;
        Ok(TaskDraft::new(project.id(), task_name, self.settings.owner.clone()))
    }

    /// Asks a yes/no question. Anything but an answer starting with `y`,
    /// including end of input, counts as no.
    ///
    /// # Errors
    ///
    /// Returns the I/O error when the terminal cannot be written or read.
    pub fn confirm(&mut self, question: &str) -> io::Result<bool> {
        write!(self.output, "{question} [y/N] ")?;
        self.output.flush()?;
        let answer = self.read_line()?.unwrap_or_default();
        Ok(answer
            .trim_start()
            .chars()
            .next()
            .is_some_and(|first| first.eq_ignore_ascii_case(&'y')))
    }

    /// Writes the interactive prompt.
    ///
    /// # Errors
    ///
    /// Returns the I/O error when the prompt cannot be written.
    pub fn prompt(&mut self) -> io::Result<()> {
        write!(self.output, "{}> ", self.settings.program_name)?;
        self.output.flush()
    }

    /// Reads one line of input without its line ending, or `None` at end of
    /// input.
    ///
    /// # Errors
    ///
    /// Returns the I/O error when input cannot be read.
    pub fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let trimmed_len = line.trim_end_matches(['\r', '\n']).len();
        line.truncate(trimmed_len);
        Ok(Some(line))
    }

    /// Writes a user-facing error message.
    ///
    /// # Errors
    ///
    /// Returns the I/O error when the message cannot be written.
    pub fn report(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.errors, "{message}")?;
        self.errors.flush()
    }
}

impl<R, K> Console for Session<R, K>
where
    R: TrackerStore + 'static,
    K: Clock + Send + Sync,
{
    fn say(&mut self, line: &str) -> io::Result<()> {
        writeln!(self.output, "{line}")
    }
}

impl<R, K> fmt::Debug for Session<R, K>
where
    R: TrackerStore + 'static,
    K: Clock + Send + Sync,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("settings", &self.settings)
            .field("current_project", &self.current_project)
            .finish_non_exhaustive()
    }
}
