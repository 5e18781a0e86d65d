//! Parsing of bazelrc files and Bazel command lines.
//!
//! bazelrc files map sub-commands (`build`, `test`, `build:asan`, ...) to the
//! flags Bazel should add to them. This crate turns such files, and the
//! argument vectors of real invocations, into a structured form:
//!
//! - [`RcParser`]: parses an rc file, following `import` and `try-import`
//!   directives, shell quoting, abbreviated and negated boolean flags, and
//!   `\` continuation lines, into [`RcContents`].
//! - [`parse_command_line_args`]: splits the arguments after a sub-command
//!   into targets, flags, and arguments after `--` ([`CommandLineArgs`]).
//! - [`FlagSchema`]: the flag metadata both of them need, i.e. which flags are
//!   boolean and which single characters abbreviate which flags.
//!
//! Values are recorded in the order they were seen; [`FlagValues::flag_value`]
//! returns the last one, which is the effective value for single-valued flags.
//!
//! # Example
//!
//! ```
//! use bazelrc_core::*;
//!
//! let schema = FlagSchema::new()
//!     .with_boolean_flag("bool_flag")
//!     .with_abbreviation('b', "bool_flag")
//!     .with_abbreviation('j', "jobs");
//! let parser = RcParser::new("/workspace", &schema);
//!
//! let contents = parser
//!     .parse("build -b -j 200 --nobool_flag".as_bytes(), "/workspace/.bazelrc")
//!     .unwrap();
//! let build = contents.command("build").unwrap();
//! assert_eq!(build.values("bool_flag").unwrap(), ["true", "false"]);
//! assert_eq!(build.flag_value("jobs"), Some("200"));
//! ```

mod classify;
mod command_line;
mod contents;
mod error;
mod parser;
mod schema;
mod tokenize;

pub use command_line::{CommandLineArgs, parse_command_line_args};
pub use contents::{FlagValues, RcContents};
pub use error::{ClassifyError, CommandLineError, ImportChain, RcError, TokenizeError};
pub use parser::{FsOpener, RcParser, SourceOpener, WORKSPACE_PLACEHOLDER};
pub use schema::FlagSchema;
pub use tokenize::tokenize_line;
