//! Flag schema files and tool configuration for bazelrc parsing.
//!
//! The parser in [`bazelrc_core`] needs a [`FlagSchema`] telling it which
//! flags are boolean and which characters abbreviate which flags. This crate
//! loads that schema from a JSON or YAML description ([`SchemaFile`]) and
//! reads the YAML configuration used by the `bazelrc` command
//! ([`ToolConfig`]).
//!
//! # Quick start
//!
//! ```no_run
//! use bazelrc_core::RcParser;
//! use bazelrc_schema::{ToolConfig, load_flag_schema};
//!
//! let schema = load_flag_schema("flags.yaml").unwrap();
//! let parser = RcParser::new("/home/me/project", &schema);
//! let contents = parser.parse_path("/home/me/project/.bazelrc").unwrap();
//!
//! let config = ToolConfig::load(".bazelrc-tool.yaml").unwrap();
//! let schema = config.load_schema().unwrap();
//! ```
//!
//! [`FlagSchema`]: bazelrc_core::FlagSchema

mod config;
mod error;
mod schema_file;

pub use config::ToolConfig;
pub use error::{Result, SchemaError};
pub use schema_file::{FlagEntry, SchemaFile, SchemaFormat, load_flag_schema};
