//! Port contracts for command output.

use std::io;

/// Line-oriented sink for command output.
pub trait Console {
    /// Writes one line of output.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error when the line cannot be written.
    fn say(&mut self, line: &str) -> io::Result<()>;
}
