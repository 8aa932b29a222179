//! Command registry and help listing.

use std::collections::BTreeMap;

use crate::command::domain::CommandInfo;

/// Narrowest width of the signature column in a listing.
pub const MIN_COLUMN_WIDTH: usize = 25;

/// Help metadata for every registered command, keyed by name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandRegistry {
    commands: BTreeMap<String, CommandInfo>,
}

impl CommandRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            commands: BTreeMap::new(),
        }
    }

    /// Stores `info` under `name`, replacing any previous entry.
    pub fn register(&mut self, name: impl Into<String>, info: CommandInfo) {
        self.commands.insert(name.into(), info);
    }

    /// Returns the metadata registered under `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&CommandInfo> {
        self.commands.get(name)
    }

    /// Returns whether `name` is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.commands.contains_key(name)
    }

    /// Returns the number of registered commands.
    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Returns whether no command is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Returns one formatted line per command, sorted by name.
    ///
    /// Each line is the name and usage padded to a shared column, then
    /// `# description`. The column is at least [`MIN_COLUMN_WIDTH`] wide.
    #[must_use]
    pub fn list(&self) -> Vec<String> {
        let signatures: Vec<_> = self
            .commands
            .iter()
            .map(|(name, info)| (info.signature(name), info.description.as_deref()))
            .collect();
        let width = signatures
            .iter()
            .map(|(signature, _)| signature.chars().count())
            .max()
            .unwrap_or_default()
            .max(MIN_COLUMN_WIDTH);

        signatures
            .into_iter()
            .map(|(signature, description)| {
                description.map_or_else(
                    || signature.clone(),
                    |text| format!("{signature:<width$}  # {text}"),
                )
            })
            .collect()
    }
}
