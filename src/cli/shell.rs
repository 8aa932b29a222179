//! One-shot and interactive command execution.

use mockable::Clock;

use super::commands::builtin_dispatcher;
use super::session::Session;
use crate::command::{
    domain::{DispatchError, split_line},
    services::Dispatcher,
};
use crate::tracking::{domain::TaskDomainError, ports::TrackerStore, services::TrackingError};

/// Words that end an interactive session.
pub const EXIT_WORDS: [&str; 2] = ["exit", "quit"];

/// Result of running one command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The command completed or aborted itself.
    Success,
    /// The command failed with a message the user can act on.
    Failure,
}

/// Runs command lines against a session.
#[derive(Debug)]
pub struct Shell<R, K>
where
    R: TrackerStore + 'static,
    K: Clock + Send + Sync + 'static,
{
    dispatcher: Dispatcher<Session<R, K>>,
    session: Session<R, K>,
}

impl<R, K> Shell<R, K>
where
    R: TrackerStore + 'static,
    K: Clock + Send + Sync + 'static,
{
    /// Creates a shell with the built-in commands.
    #[must_use]
    pub fn new(mut session: Session<R, K>) -> Self {
        let dispatcher = builtin_dispatcher(&session.settings().program_name);
        session.set_help(dispatcher.listing());
        Self {
            dispatcher,
            session,
        }
    }

    /// Returns the session.
    #[must_use]
    pub const fn session(&self) -> &Session<R, K> {
        &self.session
    }

    /// Runs one argument vector.
    ///
    /// Routing mistakes, rejected transitions, and unknown tasks or projects
    /// are written to the error stream and reported as
    /// [`Outcome::Failure`].
    ///
    /// # Errors
    ///
    /// Returns any other failure unchanged.
    pub fn run(&mut self, argv: &[String]) -> eyre::Result<Outcome> {
        match self.dispatcher.dispatch(&mut self.session, argv) {
            Ok(_) => Ok(Outcome::Success),
            Err(error) if is_recoverable(&error) => {
                tracing::debug!(%error, "command failed");
                self.session.report(&error.to_string())?;
                Ok(Outcome::Failure)
            }
            Err(error) => Err(error.into()),
        }
    }

    /// Reads and runs lines until end of input or an exit word.
    ///
    /// Recoverable failures are reported and the loop continues.
    ///
    /// # Errors
    ///
    /// Returns I/O failures and any unrecoverable command failure.
    pub fn repl(&mut self) -> eyre::Result<()> {
        loop {
            self.session.prompt()?;
            let Some(line) = self.session.read_line()? else {
                break;
            };
            let argv = match split_line(&line) {
                Ok(argv) => argv,
                Err(error) => {
                    self.session.report(&error.to_string())?;
                    continue;
                }
            };
            match argv.first() {
                None => continue,
                Some(word) if EXIT_WORDS.contains(&word.as_str()) => break,
                Some(_) => {}
            }
            self.run(&argv)?;
        }
        Ok(())
    }
}

/// Returns whether a dispatch failure should be reported rather than
/// propagated.
#[must_use]
pub fn is_recoverable(error: &DispatchError) -> bool {
    if error.is_routing() {
        return true;
    }
    error.handler_error().is_some_and(|source| {
        source
            .downcast_ref::<TrackingError>()
            .is_some_and(TrackingError::is_user_facing)
            || source.downcast_ref::<TaskDomainError>().is_some()
    })
}
