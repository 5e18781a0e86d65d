//! Serializable flag schema descriptions.
//!
//! A schema file lists the flags a Bazel version knows about, which of them
//! may be given without a value, and their single-character abbreviations.
//! It is converted into the [`FlagSchema`] the parser consults.
//!
//! # Example YAML
//!
//! ```yaml
//! flags:
//!   - name: jobs
//!     abbreviation: j
//!   - name: keep_going
//!     boolean: true
//!     abbreviation: k
//!   - name: verbose_failures
//!     boolean: true
//! ```

use std::collections::HashMap;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use bazelrc_core::FlagSchema;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, SchemaError};

/// On-disk encoding of a schema file, chosen by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaFormat {
    Json,
    Yaml,
}

impl SchemaFormat {
    /// Picks the format from `path`'s extension (`.json`, `.yaml`, `.yml`).
    pub fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Ok(Self::Json),
            Some("yaml" | "yml") => Ok(Self::Yaml),
            _ => Err(SchemaError::UnsupportedFormat(path.to_path_buf())),
        }
    }
}

/// One flag definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlagEntry {
    /// Flag name without leading dashes.
    pub name: String,
    /// Whether the flag may be given without a value.
    #[serde(default)]
    pub boolean: bool,
    /// Single-character short form, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abbreviation: Option<String>,
}

impl FlagEntry {
    /// Creates a flag that requires a value.
    pub fn value(name: &str) -> Self {
        Self {
            name: name.to_string(),
            boolean: false,
            abbreviation: None,
        }
    }

    /// Creates a flag that may be given without a value.
    pub fn boolean(name: &str) -> Self {
        Self {
            boolean: true,
            ..Self::value(name)
        }
    }

    /// Adds a short form.
    pub fn with_abbreviation(mut self, abbreviation: &str) -> Self {
        self.abbreviation = Some(abbreviation.to_string());
        self
    }
}

/// A schema description loaded from JSON or YAML.
///
/// # Examples
///
/// ```
/// use bazelrc_schema::SchemaFile;
///
/// let file = SchemaFile::from_yaml_str(
///     "flags:\n  - name: jobs\n    abbreviation: j\n  - name: keep_going\n    boolean: true\n",
/// )
/// .unwrap();
/// let schema = file.to_flag_schema().unwrap();
///
/// assert!(schema.is_boolean("keep_going"));
/// assert_eq!(schema.expand_abbreviation('j'), Some("jobs"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaFile {
    /// Version of the build tool the flags were taken from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bazel_version: Option<String>,
    /// Flag definitions.
    #[serde(default)]
    pub flags: Vec<FlagEntry>,
}

impl SchemaFile {
    /// Loads a schema file, picking JSON or YAML by extension.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::UnsupportedFormat`] for unknown extensions,
    /// [`SchemaError::IoError`] if the file cannot be read, or a
    /// deserialization error if it is malformed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let format = SchemaFormat::from_path(path)?;
        let reader = BufReader::new(std::fs::File::open(path)?);
        let file: Self = match format {
            SchemaFormat::Json => serde_json::from_reader(reader)?,
            SchemaFormat::Yaml => serde_yaml::from_reader(reader)?,
        };
        debug!(path = %path.display(), flags = file.flags.len(), "Loaded schema file");
        Ok(file)
    }

    /// Saves the schema file, picking JSON or YAML by extension.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let format = SchemaFormat::from_path(path)?;
        let writer = BufWriter::new(std::fs::File::create(path)?);
        match format {
            SchemaFormat::Json => serde_json::to_writer_pretty(writer, self)?,
            SchemaFormat::Yaml => serde_yaml::to_writer(writer, self)?,
        }
        Ok(())
    }

    pub fn from_json_str(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn from_yaml_str(raw: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(raw)?)
    }

    /// Validates the definitions and builds a [`FlagSchema`].
    ///
    /// # Errors
    ///
    /// Fails if a flag name is empty or starts with a dash, if an
    /// abbreviation is not exactly one character, or if two flags share an
    /// abbreviation.
    pub fn to_flag_schema(&self) -> Result<FlagSchema> {
        let mut boolean_flags = HashMap::with_capacity(self.flags.len());
        let mut abbreviations: HashMap<char, String> = HashMap::new();

        for flag in &self.flags {
            if flag.name.is_empty() || flag.name.starts_with('-') {
                return Err(SchemaError::InvalidFlagName(flag.name.clone()));
            }
            boolean_flags.insert(flag.name.clone(), flag.boolean);

            let Some(raw) = &flag.abbreviation else {
                continue;
            };
            let mut chars = raw.chars();
            let (Some(abbreviation), None) = (chars.next(), chars.next()) else {
                return Err(SchemaError::InvalidAbbreviation {
                    flag: flag.name.clone(),
                    abbreviation: raw.clone(),
                });
            };
            if let Some(first) = abbreviations.get(&abbreviation) {
                if *first != flag.name {
                    return Err(SchemaError::DuplicateAbbreviation {
                        abbreviation,
                        first: first.clone(),
                        second: flag.name.clone(),
                    });
                }
            }
            abbreviations.insert(abbreviation, flag.name.clone());
        }

        Ok(FlagSchema::from_parts(boolean_flags, abbreviations))
    }
}

/// Loads a schema file and converts it into a [`FlagSchema`].
pub fn load_flag_schema(path: impl AsRef<Path>) -> Result<FlagSchema> {
    SchemaFile::load(path)?.to_flag_schema()
}
