//! The flag schema consulted while classifying tokens.

use std::collections::HashMap;

/// Metadata about the build tool's flag definitions.
///
/// Only two facts matter to the parser: which flags may be given without a
/// value (boolean flags), and which single characters abbreviate which full
/// flag names. The schema is built once and shared immutably across any
/// number of parses.
///
/// # Examples
///
/// ```
/// use bazelrc_core::FlagSchema;
///
/// let schema = FlagSchema::new()
///     .with_boolean_flag("verbose_failures")
///     .with_value_flag("jobs")
///     .with_abbreviation('j', "jobs");
///
/// assert!(schema.is_boolean("verbose_failures"));
/// assert!(!schema.is_boolean("jobs"));
/// assert_eq!(schema.expand_abbreviation('j'), Some("jobs"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlagSchema {
    boolean_flags: HashMap<String, bool>,
    abbreviations: HashMap<char, String>,
}

impl FlagSchema {
    /// Creates an empty schema with no known flags.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a schema from raw tables.
    ///
    /// `boolean_flags` maps a flag name (no dashes) to whether it may be
    /// specified without a value. `false` entries record flags known to
    /// require a value.
    pub fn from_parts(
        boolean_flags: HashMap<String, bool>,
        abbreviations: HashMap<char, String>,
    ) -> Self {
        Self {
            boolean_flags,
            abbreviations,
        }
    }

    /// Registers a flag that may be given without a value.
    pub fn with_boolean_flag(mut self, name: impl Into<String>) -> Self {
        self.boolean_flags.insert(name.into(), true);
        self
    }

    /// Registers a flag that requires a value.
    pub fn with_value_flag(mut self, name: impl Into<String>) -> Self {
        self.boolean_flags.insert(name.into(), false);
        self
    }

    /// Registers `abbreviation` as the short form of `name`.
    pub fn with_abbreviation(mut self, abbreviation: char, name: impl Into<String>) -> Self {
        self.abbreviations.insert(abbreviation, name.into());
        self
    }

    /// Returns `true` only if `name` is registered as a boolean flag.
    pub fn is_boolean(&self, name: &str) -> bool {
        self.boolean_flags.get(name).copied().unwrap_or(false)
    }

    /// Returns `true` if `name` is a boolean flag, or if `name` is entirely
    /// unknown and `no` followed by the rest names a boolean flag.
    ///
    /// This is the lookup used when deciding whether a pending flag can take
    /// the following token as its value.
    pub fn is_known_boolean(&self, name: &str) -> bool {
        if let Some(&known) = self.boolean_flags.get(name) {
            return known;
        }
        match name.strip_prefix("no") {
            Some(rest) => self.is_boolean(rest),
            None => false,
        }
    }

    /// Returns the full flag name abbreviated by `abbreviation`.
    pub fn expand_abbreviation(&self, abbreviation: char) -> Option<&str> {
        self.abbreviations.get(&abbreviation).map(String::as_str)
    }

    /// Returns the number of flags the schema knows about.
    pub fn flag_count(&self) -> usize {
        self.boolean_flags.len()
    }

    /// Iterates over `(abbreviation, full name)` pairs.
    pub fn abbreviations(&self) -> impl Iterator<Item = (char, &str)> {
        self.abbreviations
            .iter()
            .map(|(abbreviation, name)| (*abbreviation, name.as_str()))
    }
}
