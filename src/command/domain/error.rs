//! Error and control-flow types for command dispatch.

use std::error::Error;
use std::io;
use thiserror::Error;

/// Boxed error raised by a command body.
pub type BoxedError = Box<dyn Error + Send + Sync>;

/// Errors returned by [`crate::command::services::Dispatcher::dispatch`].
#[derive(Debug, Error)]
pub enum DispatchError {
    /// No command is registered under the requested name.
    #[error("Oops! \"{name}\" isn't a command. Try one of these instead:\n\n{listing}\n")]
    UnknownCommand {
        /// Requested command name.
        name: String,
        /// Formatted listing of every registered command.
        listing: String,
    },
    /// The command exists but was called with the wrong arguments.
    #[error("Oops! That isn't the right way to call \"{name}\". Try this instead: {usage}")]
    InvalidInvocation {
        /// Command name.
        name: String,
        /// Expected invocation, including the program name.
        usage: String,
    },
    /// The command body failed. The error is carried unchanged.
    #[error("{0}")]
    Handler(BoxedError),
    /// An abort message could not be written.
    #[error("failed to write command output: {0}")]
    Output(#[from] io::Error),
}

impl DispatchError {
    /// Returns whether this is a routing mistake the user can correct.
    #[must_use]
    pub const fn is_routing(&self) -> bool {
        matches!(
            self,
            Self::UnknownCommand { .. } | Self::InvalidInvocation { .. }
        )
    }

    /// Returns the command body's error, if that is what failed.
    #[must_use]
    pub fn handler_error(&self) -> Option<&(dyn Error + Send + Sync + 'static)> {
        match self {
            Self::Handler(source) => Some(source.as_ref()),
            _ => None,
        }
    }
}

/// Voluntary early exit from a command body.
///
/// Not an error: the dispatcher prints the message, if any, and returns
/// normally.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Abort {
    message: Option<String>,
}

impl Abort {
    /// Aborts without output.
    #[must_use]
    pub const fn silently() -> Self {
        Self { message: None }
    }

    /// Aborts and prints `message`.
    #[must_use]
    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
        }
    }

    /// Returns the message to print, if any.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

/// Outcome of a failed command body.
#[derive(Debug)]
pub enum CommandError {
    /// The command stopped itself early.
    Abort(Abort),
    /// The command failed.
    Failed(BoxedError),
}

impl CommandError {
    /// Wraps an arbitrary failure.
    #[must_use]
    pub fn failed(error: impl Into<BoxedError>) -> Self {
        Self::Failed(error.into())
    }
}

impl From<Abort> for CommandError {
    fn from(abort: Abort) -> Self {
        Self::Abort(abort)
    }
}

impl<E> From<E> for CommandError
where
    E: Error + Send + Sync + 'static,
{
    fn from(error: E) -> Self {
        Self::Failed(Box::new(error))
    }
}
