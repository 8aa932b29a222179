//! Command-line front end.
//!
//! A [`Session`] carries the tracking service, the selected project, and the
//! terminal streams. A [`Shell`] runs command lines against it, either once
//! or in a read-eval loop.

mod commands;
mod session;
mod shell;

pub use commands::builtin_dispatcher;
pub use session::Session;
pub use shell::{EXIT_WORDS, Outcome, Shell, is_recoverable};

#[cfg(test)]
mod tests;
