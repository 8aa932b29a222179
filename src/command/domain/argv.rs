//! Splitting an input line into an argument vector.

use thiserror::Error;

/// Errors for malformed input lines.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum LineSyntaxError {
    /// A quoted argument was not closed.
    #[error("Oops! A quoted argument is missing its closing quote.")]
    UnterminatedQuote,
    /// The line ended with a lone backslash.
    #[error("Oops! The line ends with a backslash that escapes nothing.")]
    DanglingEscape,
}

/// Splits `line` on whitespace into arguments.
///
/// Single or double quotes group words into one argument and a backslash
/// escapes the next character, inside or outside quotes. An empty pair of
/// quotes yields an empty argument.
///
/// # Errors
///
/// Returns [`LineSyntaxError`] when a quote is left open or the line ends
/// with an escape.
pub fn split_line(line: &str) -> Result<Vec<String>, LineSyntaxError> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut started = false;
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for character in line.chars() {
        if escaped {
            current.push(character);
            escaped = false;
            continue;
        }

        match (quote, character) {
            (_, '\\') => {
                escaped = true;
                started = true;
            }
            (Some(open), _) if character == open => quote = None,
            (Some(_), _) => current.push(character),
            (None, '"' | '\'') => {
                quote = Some(character);
                started = true;
            }
            (None, _) if character.is_whitespace() => {
                if started {
                    args.push(std::mem::take(&mut current));
                    started = false;
                }
            }
            (None, _) => {
                current.push(character);
                started = true;
            }
        }
    }

    if quote.is_some() {
        return Err(LineSyntaxError::UnterminatedQuote);
    }
    if escaped {
        return Err(LineSyntaxError::DanglingEscape);
    }
    if started {
        args.push(current);
    }
    Ok(args)
}
