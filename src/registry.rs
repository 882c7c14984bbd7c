use std::collections::HashMap;

use thiserror::Error;

/// One name under which a command can be invoked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandEntry {
    pub registered_name: String,
    pub canonical_name: String,
}

impl CommandEntry {
    pub fn is_alias(&self) -> bool {
        self.registered_name != self.canonical_name
    }

    /// Composite names are two words, `"<main> <sub>"`.
    pub fn is_composite(&self) -> bool {
        self.registered_name.contains(' ')
    }

    /// Number of input words this name stands for.
    pub fn word_count(&self) -> usize {
        self.registered_name.split(' ').count()
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Command \"{0}\" is already registered")]
    Duplicate(String),
    #[error("Cannot alias \"{alias}\" to unknown command \"{canonical}\"")]
    UnknownCanonical { alias: String, canonical: String },
    #[error("Invalid command name \"{0}\"")]
    InvalidName(String),
}

/// Command table consulted by the resolver.
///
/// Entries keep their registration order, which is the order candidates are
/// reported in when a name is ambiguous.
#[derive(Debug, Clone, Default)]
pub struct CommandRegistry {
    entries: Vec<CommandEntry>,
    index: HashMap<String, usize>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a canonical command name.
    pub fn command(&mut self, name: &str) -> Result<&mut Self, RegistryError> {
        self.insert(name, name)?;
        Ok(self)
    }

    /// Registers `alias` as another name for the already registered `canonical`.
    pub fn alias(&mut self, alias: &str, canonical: &str) -> Result<&mut Self, RegistryError> {
        match self.get(canonical) {
            Some(entry) if !entry.is_alias() => {}
            _ => {
                return Err(RegistryError::UnknownCanonical {
                    alias: alias.to_string(),
                    canonical: canonical.to_string(),
                });
            }
        }
        self.insert(alias, canonical)?;
        Ok(self)
    }

    fn insert(&mut self, registered: &str, canonical: &str) -> Result<(), RegistryError> {
        if !is_valid_name(registered) {
            return Err(RegistryError::InvalidName(registered.to_string()));
        }
        if self.index.contains_key(registered) {
            return Err(RegistryError::Duplicate(registered.to_string()));
        }
        self.index
            .insert(registered.to_string(), self.entries.len());
        self.entries.push(CommandEntry {
            registered_name: registered.to_string(),
            canonical_name: canonical.to_string(),
        });
        Ok(())
    }

    pub fn get(&self, registered_name: &str) -> Option<&CommandEntry> {
        self.index
            .get(registered_name)
            .map(|&idx| &self.entries[idx])
    }

    pub fn contains(&self, registered_name: &str) -> bool {
        self.index.contains_key(registered_name)
    }

    pub fn entries(&self) -> &[CommandEntry] {
        &self.entries
    }

    /// All registered names, aliases included, in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.registered_name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// One or two non-empty words separated by a single space.
fn is_valid_name(name: &str) -> bool {
    let words: Vec<&str> = name.split(' ').collect();
    (1..=2).contains(&words.len())
        && words
            .iter()
            .all(|w| !w.is_empty() && !w.chars().any(char::is_whitespace))
}
