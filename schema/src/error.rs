//! Error types for schema and configuration loading.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading schema or configuration files.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON parsing or serialization failure.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// The file extension doesn't name a supported format.
    #[error("unsupported schema format for '{}': expected .json, .yaml, or .yml", .0.display())]
    UnsupportedFormat(PathBuf),

    /// An abbreviation that isn't exactly one character.
    #[error("saw flag {flag:?} abbreviates to {abbreviation:?} but expect all flag abbreviations to be single characters")]
    InvalidAbbreviation { flag: String, abbreviation: String },

    /// Two flags claim the same abbreviation.
    #[error("abbreviation {abbreviation:?} is declared by both {first:?} and {second:?}")]
    DuplicateAbbreviation {
        abbreviation: char,
        first: String,
        second: String,
    },

    /// A flag entry with an empty or dash-prefixed name.
    #[error("invalid flag name {0:?}: names are given without leading dashes")]
    InvalidFlagName(String),
}

/// Convenience alias for results with [`SchemaError`].
pub type Result<T> = std::result::Result<T, SchemaError>;
