//! Tool configuration for the `bazelrc` command.
//!
//! # Example YAML
//!
//! ```yaml
//! workspace: /home/me/project
//! schema: flags.yaml
//! rc_files:
//!   - /etc/bazel.bazelrc
//!   - .bazelrc
//! ```
//!
//! Relative paths are resolved against the directory holding the
//! configuration file.

use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use bazelrc_core::FlagSchema;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::schema_file::load_flag_schema;

/// Defaults for parsing a workspace's rc files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolConfig {
    /// Directory substituted for `%workspace%` in import paths.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workspace: Option<PathBuf>,
    /// Schema file describing the known flags.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<PathBuf>,
    /// rc files parsed when none are given on the command line.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rc_files: Vec<PathBuf>,
}

impl ToolConfig {
    /// Loads configuration from a YAML file, resolving relative paths
    /// against the file's directory.
    ///
    /// # Errors
    ///
    /// Returns [`IoError`](crate::SchemaError::IoError) if the file cannot
    /// be read, or [`YamlError`](crate::SchemaError::YamlError) if parsing
    /// fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)?;
        let config: Self = serde_yaml::from_reader(BufReader::new(file))?;
        let base = path.parent().unwrap_or_else(|| Path::new(""));
        Ok(config.relative_to(base))
    }

    /// Saves the configuration as YAML.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path)?;
        serde_yaml::to_writer(BufWriter::new(file), self)?;
        Ok(())
    }

    /// Loads the configured schema, or an empty schema when none is set.
    pub fn load_schema(&self) -> Result<FlagSchema> {
        match &self.schema {
            Some(path) => load_flag_schema(path),
            None => Ok(FlagSchema::new()),
        }
    }

    /// Returns the workspace directory as a string, empty when unset.
    pub fn workspace_directory(&self) -> String {
        self.workspace
            .as_deref()
            .map(|p| p.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    fn relative_to(mut self, base: &Path) -> Self {
        let resolve = |p: PathBuf| if p.is_relative() { base.join(p) } else { p };
        self.workspace = self.workspace.map(resolve);
        self.schema = self.schema.map(resolve);
        self.rc_files = self.rc_files.into_iter().map(resolve).collect();
        self
    }
}
