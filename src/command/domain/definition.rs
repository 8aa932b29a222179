//! Command metadata and invocation-shape rules.

use std::fmt;

/// Help metadata stored per command name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandInfo {
    /// Argument usage, for example `<task>` or `[state]`.
    pub args_usage: Option<String>,
    /// Human-readable description.
    pub description: Option<String>,
}

impl CommandInfo {
    /// Creates empty metadata.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            args_usage: None,
            description: None,
        }
    }

    /// Sets the argument usage string.
    #[must_use]
    pub fn with_args(mut self, usage: impl Into<String>) -> Self {
        self.args_usage = Some(usage.into());
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Returns `name` followed by the usage string, if any.
    #[must_use]
    pub fn signature(&self, name: &str) -> String {
        self.args_usage
            .as_deref()
            .map(str::trim)
            .filter(|args| !args.is_empty())
            .map_or_else(|| name.to_owned(), |args| format!("{name} {args}"))
    }
}

/// Number of positional arguments a command accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// Exactly this many arguments.
    Exact(usize),
    /// Between `min` and `max` arguments, inclusive.
    Between {
        /// Fewest accepted arguments.
        min: usize,
        /// Most accepted arguments.
        max: usize,
    },
    /// At least this many arguments.
    AtLeast(usize),
}

impl Arity {
    /// Infers arity from a usage string.
    ///
    /// Each whitespace-separated word is one argument. Words wrapped in
    /// `[...]` are optional and a word ending in `...` accepts any number of
    /// further arguments.
    #[must_use]
    pub fn from_usage(usage: Option<&str>) -> Self {
        let mut required = 0_usize;
        let mut optional = 0_usize;
        for word in usage.unwrap_or_default().split_whitespace() {
            if word.ends_with("...") {
                return Self::AtLeast(required);
            }
            if word.starts_with('[') {
                optional += 1;
            } else {
                required += 1;
            }
        }
        if optional == 0 {
            Self::Exact(required)
        } else {
            Self::Between {
                min: required,
                max: required + optional,
            }
        }
    }

    /// Returns whether `count` arguments satisfy this arity.
    #[must_use]
    pub const fn accepts(self, count: usize) -> bool {
        match self {
            Self::Exact(expected) => count == expected,
            Self::Between { min, max } => count >= min && count <= max,
            Self::AtLeast(min) => count >= min,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(expected) => write!(f, "{expected}"),
            Self::Between { min, max } => write!(f, "{min} to {max}"),
            Self::AtLeast(min) => write!(f, "{min} or more"),
        }
    }
}

/// A command as registered on a dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandDefinition {
    name: String,
    info: CommandInfo,
    arity: Arity,
    subcommands: Vec<String>,
}

impl CommandDefinition {
    /// Creates a command that takes no arguments.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            info: CommandInfo::new(),
            arity: Arity::Exact(0),
            subcommands: Vec::new(),
        }
    }

    /// Sets the usage string and infers the arity from it.
    #[must_use]
    pub fn with_args(mut self, usage: impl Into<String>) -> Self {
        self.info = self.info.with_args(usage);
        self.arity = Arity::from_usage(self.info.args_usage.as_deref());
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.info = self.info.with_description(description);
        self
    }

    /// Restricts the first positional argument to `subcommands`.
    #[must_use]
    pub fn with_subcommands(mut self, subcommands: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.subcommands = subcommands.into_iter().map(Into::into).collect();
        self
    }

    /// Returns the command name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the help metadata.
    #[must_use]
    pub const fn info(&self) -> &CommandInfo {
        &self.info
    }

    /// Returns the accepted argument count.
    #[must_use]
    pub const fn arity(&self) -> Arity {
        self.arity
    }

    /// Returns the permitted first arguments, empty when unrestricted.
    #[must_use]
    pub fn subcommands(&self) -> &[String] {
        &self.subcommands
    }

    /// Returns whether `args` has the shape this command expects.
    #[must_use]
    pub fn accepts(&self, args: &[String]) -> bool {
        if !self.arity.accepts(args.len()) {
            return false;
        }
        match args.first() {
            Some(first) if !self.subcommands.is_empty() => {
                self.subcommands.iter().any(|allowed| allowed == first)
            }
            _ => true,
        }
    }

    /// Returns the usage line shown when the command is called wrongly.
    #[must_use]
    pub fn usage(&self, program: &str) -> String {
        format!("{program} {}", self.info.signature(&self.name))
    }
}
