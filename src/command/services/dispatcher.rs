//! Routes argument vectors to command handlers.

use std::collections::HashMap;
use std::fmt;

use crate::command::{
    domain::{CommandDefinition, CommandError, DispatchError},
    ports::Console,
    registry::CommandRegistry,
};

/// Command body invoked with the caller's context and positional arguments.
pub type Handler<C> = Box<dyn Fn(&mut C, &[String]) -> Result<(), CommandError>>;

/// How a dispatched command ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The command ran to completion.
    Completed,
    /// The command aborted itself.
    Aborted,
}

/// The command being dispatched, alive only for one call.
struct Invocation<'a> {
    definition: &'a CommandDefinition,
    args: &'a [String],
}

impl Invocation<'_> {
    fn invalid(&self, program: &str) -> DispatchError {
        DispatchError::InvalidInvocation {
            name: self.definition.name().to_owned(),
            usage: self.definition.usage(program),
        }
    }
}

/// Table of commands keyed by name, with their handlers.
pub struct Dispatcher<C> {
    program: String,
    registry: CommandRegistry,
    commands: HashMap<String, (CommandDefinition, Handler<C>)>,
}

impl<C: Console> Dispatcher<C> {
    /// Creates an empty dispatcher for `program`.
    #[must_use]
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            registry: CommandRegistry::new(),
            commands: HashMap::new(),
        }
    }

    /// Registers `definition` with its handler, replacing any earlier command
    /// of the same name.
    pub fn register<F>(&mut self, definition: CommandDefinition, handler: F) -> &mut Self
    where
        F: Fn(&mut C, &[String]) -> Result<(), CommandError> + 'static,
    {
        self.registry
            .register(definition.name(), definition.info().clone());
        self.commands.insert(
            definition.name().to_owned(),
            (definition, Box::new(handler)),
        );
        self
    }

    /// Returns the program name used in usage lines.
    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Returns the help registry.
    #[must_use]
    pub const fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    /// Returns the formatted command listing.
    #[must_use]
    pub fn listing(&self) -> Vec<String> {
        self.registry.list()
    }

    /// Runs the command named by `argv[0]` with the remaining arguments.
    ///
    /// An [`Abort`](crate::command::domain::Abort) from the handler is not an
    /// error: its message, if any, is written to `context` and the call
    /// returns [`DispatchOutcome::Aborted`].
    ///
    /// # Errors
    ///
    /// - [`DispatchError::UnknownCommand`] when `argv` is empty or names no
    ///   registered command.
    /// - [`DispatchError::InvalidInvocation`] when the argument count or
    ///   subcommand does not fit the command.
    /// - [`DispatchError::Handler`] carrying the handler's own error.
    /// - [`DispatchError::Output`] when an abort message cannot be written.
    pub fn dispatch(
        &self,
        context: &mut C,
        argv: &[String],
    ) -> Result<DispatchOutcome, DispatchError> {
        let (name, args) = argv.split_first().map_or(("", argv), |(name, args)| {
            (name.as_str(), args)
        });
        let Some((definition, handler)) = self.commands.get(name) else {
            tracing::debug!(command = name, "unknown command");
            return Err(DispatchError::UnknownCommand {
                name: name.to_owned(),
                listing: self.listing().join("\n"),
            });
        };

        let invocation = Invocation { definition, args };
        if !invocation.definition.accepts(invocation.args) {
            tracing::debug!(
                command = name,
                supplied = args.len(),
                expected = %definition.arity(),
                "invalid invocation"
            );
            return Err(invocation.invalid(&self.program));
        }

        tracing::debug!(command = name, "dispatching");
        match handler(context, invocation.args) {
            Ok(()) => Ok(DispatchOutcome::Completed),
            Err(CommandError::Abort(abort)) => {
                if let Some(message) = abort.message() {
                    context.say(message)?;
                }
                tracing::debug!(command = name, "command aborted");
                Ok(DispatchOutcome::Aborted)
            }
            Err(CommandError::Failed(source)) => Err(DispatchError::Handler(source)),
        }
    }
}

impl<C> fmt::Debug for Dispatcher<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("program", &self.program)
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}
