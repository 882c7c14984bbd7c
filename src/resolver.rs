//! Maps a typed command line to one registered command.
//!
//! Both words of a command can be abbreviated to any unambiguous prefix:
//! with `package` and `package install` registered, `pac ins` resolves to
//! `package install`. Aliases resolve to the command they stand for and are
//! never reported as competing with it.

use std::collections::HashSet;
use std::fmt;

use log::debug;
use thiserror::Error;

use crate::registry::{CommandEntry, CommandRegistry};
use crate::suggest::find_alternatives;

/// The first two words of a command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedInput {
    pub main_command: String,
    /// Second token, unless it looks like an option. Options always follow
    /// a sub-command, so `-x` is never one.
    pub sub_or_arg: Option<String>,
}

impl ParsedInput {
    pub fn parse(input: &str) -> Self {
        let mut tokens = input.split_whitespace();
        let main_command = tokens.next().unwrap_or_default().to_string();
        let sub_or_arg = tokens
            .next()
            .filter(|token| !token.starts_with('-'))
            .map(str::to_string);
        Self {
            main_command,
            sub_or_arg,
        }
    }

    fn composite(&self) -> Option<String> {
        self.sub_or_arg
            .as_ref()
            .map(|sub| format!("{} {}", self.main_command, sub))
    }
}

/// A successfully resolved command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Canonical name to dispatch to.
    pub command: String,
    /// How many input words the matched name covers (1 or 2).
    pub consumed: usize,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("{}", render_not_defined(.name, .alternatives))]
    NotDefined {
        name: String,
        alternatives: Vec<String>,
    },
    #[error("{}", render_ambiguous(.name, .alternatives))]
    Ambiguous {
        name: String,
        alternatives: Vec<String>,
    },
}

/// Resolves `input` and returns the canonical command name.
pub fn resolve(input: &str, registry: &CommandRegistry) -> Result<String, ResolveError> {
    resolve_input(input, registry).map(|resolution| resolution.command)
}

/// Like [`resolve`], but also reports how many words of `input` were used.
pub fn resolve_input(input: &str, registry: &CommandRegistry) -> Result<Resolution, ResolveError> {
    let parsed = ParsedInput::parse(input);
    let main = parsed.main_command.as_str();
    if main.is_empty() {
        return Err(not_defined(&parsed, registry));
    }

    let simple_matches: Vec<&CommandEntry> = registry
        .entries()
        .iter()
        .filter(|entry| matches_simple(main, entry))
        .collect();

    let composite_matches: Vec<&CommandEntry> = match parsed.sub_or_arg.as_deref() {
        Some(sub) => registry
            .entries()
            .iter()
            .filter(|entry| matches_composite(main, sub, entry))
            .collect(),
        None => Vec::new(),
    };

    if let Some(entry) = simple_matches
        .iter()
        .chain(composite_matches.iter())
        .find(|entry| entry.registered_name == input)
    {
        debug!("resolved exact command \"{}\"", entry.registered_name);
        return Ok(resolved(entry));
    }

    if simple_matches.is_empty() && composite_matches.is_empty() {
        return Err(not_defined(&parsed, registry));
    }

    let composite_matches = without_aliases(composite_matches);
    match composite_matches.as_slice() {
        [] => {}
        [entry] => {
            debug!("resolved \"{}\" to \"{}\"", input, entry.canonical_name);
            return Ok(resolved(entry));
        }
        entries => {
            return Err(ResolveError::Ambiguous {
                name: parsed.composite().unwrap_or_else(|| main.to_string()),
                alternatives: names(entries),
            });
        }
    }

    if let Some(entry) = simple_matches
        .iter()
        .find(|entry| entry.registered_name == main)
    {
        debug!("resolved exact command \"{}\"", main);
        return Ok(resolved(entry));
    }

    let candidates = without_aliases(simple_matches);
    match candidates.as_slice() {
        [entry] => {
            debug!("resolved \"{}\" to \"{}\"", main, entry.canonical_name);
            Ok(resolved(entry))
        }
        [] => Err(not_defined(&parsed, registry)),
        entries => Err(ResolveError::Ambiguous {
            name: main.to_string(),
            alternatives: names(entries),
        }),
    }
}

// `main` followed by any non-space characters.
fn matches_simple(main: &str, entry: &CommandEntry) -> bool {
    !entry.is_composite() && entry.registered_name.starts_with(main)
}

// Both words prefix-matched independently.
fn matches_composite(main: &str, sub: &str, entry: &CommandEntry) -> bool {
    match entry.registered_name.split_once(' ') {
        Some((head, tail)) => head.starts_with(main) && tail.starts_with(sub),
        None => false,
    }
}

/// Drops aliases so a command never competes with its own alias.
///
/// When only aliases matched, one entry per distinct command is kept, so an
/// unambiguous prefix of an alias still resolves: `pack rm` only matches
/// the alias `package rm` and resolves to `package remove`.
fn without_aliases(matches: Vec<&CommandEntry>) -> Vec<&CommandEntry> {
    if matches.iter().any(|entry| !entry.is_alias()) {
        return matches.into_iter().filter(|entry| !entry.is_alias()).collect();
    }
    let mut seen = HashSet::new();
    matches
        .into_iter()
        .filter(|entry| seen.insert(entry.canonical_name.clone()))
        .collect()
}

fn resolved(entry: &CommandEntry) -> Resolution {
    Resolution {
        command: entry.canonical_name.clone(),
        consumed: entry.word_count(),
    }
}

fn names(entries: &[&CommandEntry]) -> Vec<String> {
    entries
        .iter()
        .map(|entry| entry.registered_name.clone())
        .collect()
}

fn not_defined(parsed: &ParsedInput, registry: &CommandRegistry) -> ResolveError {
    let main = parsed.main_command.as_str();
    let alternatives = if main.is_empty() {
        Vec::new()
    } else {
        match parsed.composite() {
            Some(composite) => {
                let mut merged = find_alternatives(&composite, registry.names());
                merged.extend(find_alternatives(main, registry.names()));
                merged.sort();
                merged.dedup();
                merged
            }
            None => find_alternatives(main, registry.names()),
        }
    };
    debug!(
        "command \"{}\" is not defined ({} alternative(s))",
        main,
        alternatives.len()
    );
    ResolveError::NotDefined {
        name: main.to_string(),
        alternatives,
    }
}

fn render_not_defined(name: &str, alternatives: &[String]) -> String {
    let mut message = format!("Command \"{}\" is not defined.", name);
    match alternatives {
        [] => {}
        [single] => {
            message.push_str("\n\nDid you mean this?\n    ");
            message.push_str(single);
        }
        many => {
            message.push_str("\n\nDid you mean one of these?");
            for alternative in many {
                message.push_str("\n    ");
                message.push_str(alternative);
            }
        }
    }
    message
}

fn render_ambiguous(name: &str, alternatives: &[String]) -> String {
    format!(
        "Command \"{}\" is ambiguous ({}).",
        name,
        AlternativeList(alternatives)
    )
}

// "first, second" or "first, second and N more".
struct AlternativeList<'a>(&'a [String]);

impl fmt::Display for AlternativeList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            [] => Ok(()),
            [only] => write!(f, "{}", only),
            [first, second] => write!(f, "{}, {}", first, second),
            [first, second, rest @ ..] => {
                write!(f, "{}, {} and {} more", first, second, rest.len())
            }
        }
    }
}
