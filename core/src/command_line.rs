//! Parsing of a real Bazel invocation's arguments after the sub-command.

use serde::{Deserialize, Serialize};

use crate::classify::{Classifier, LineState, TokenOutcome};
use crate::contents::FlagValues;
use crate::error::CommandLineError;
use crate::schema::FlagSchema;

/// The parts of a Bazel command line that follow the sub-command name.
///
/// Every argument lands in exactly one place: a target, a flag (or flag
/// value), or an argument after the standalone `--` separator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandLineArgs {
    /// Anything that didn't look like a flag or a flag value.
    pub targets: Vec<String>,
    /// Every recognized flag and its values.
    pub flags: FlagValues,
    /// Everything after a standalone `--`, passed through verbatim.
    pub executable_args: Vec<String>,
}

/// Splits the arguments following the sub-command into targets, flags, and
/// executable arguments.
///
/// For `bazel --host_jvm_debug build //blah --jobs=10` this expects
/// `["//blah", "--jobs=10"]`. Command lines cannot contain imports, so no
/// workspace directory is involved.
///
/// # Errors
///
/// Fails on any token the classifier rejects, on a trailing `\`, and when the
/// arguments end with a flag still waiting for its value.
///
/// # Examples
///
/// ```
/// use bazelrc_core::{FlagSchema, parse_command_line_args};
///
/// let schema = FlagSchema::new().with_value_flag("jobs");
/// let args = parse_command_line_args(
///     &schema,
///     &["--jobs=8", "@x//y:z", "--", "--flag", "pos"],
/// )
/// .unwrap();
///
/// assert_eq!(args.targets, vec!["@x//y:z"]);
/// assert_eq!(args.flags.flag_value("jobs"), Some("8"));
/// assert_eq!(args.executable_args, vec!["--flag", "pos"]);
/// ```
pub fn parse_command_line_args<S: AsRef<str>>(
    schema: &FlagSchema,
    tokens: &[S],
) -> Result<CommandLineArgs, CommandLineError> {
    let classifier = Classifier::new(schema);
    let mut flags = FlagValues::new();
    let mut state = LineState::default();

    for (i, token) in tokens.iter().enumerate() {
        match classifier.classify(token.as_ref(), i + 1 == tokens.len(), &mut flags, &mut state)? {
            TokenOutcome::Consumed => {}
            TokenOutcome::ContinueOnNextLine => return Err(CommandLineError::DanglingContinuation),
            TokenOutcome::RestAreTargets => {
                state
                    .targets
                    .extend(tokens[i + 1..].iter().map(|t| t.as_ref().to_string()));
                break;
            }
        }
    }

    if let Some(pending) = state.pending {
        return Err(CommandLineError::DanglingFlag(pending));
    }

    let mut targets = state.targets;
    let executable_args = match targets.iter().position(|t| t == "--") {
        Some(separator) => {
            let rest = targets.split_off(separator + 1);
            targets.truncate(separator);
            rest
        }
        None => Vec::new(),
    };

    Ok(CommandLineArgs {
        targets,
        flags,
        executable_args,
    })
}
