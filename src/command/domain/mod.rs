//! Command domain types.

mod argv;
mod definition;
mod error;

pub use argv::{LineSyntaxError, split_line};
pub use definition::{Arity, CommandDefinition, CommandInfo};
pub use error::{Abort, BoxedError, CommandError, DispatchError};
