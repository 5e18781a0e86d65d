//! Error types for rc-file and command-line parsing.
//!
//! Errors are assembled bottom-up: the token classifier and tokenizer report
//! what went wrong with a single token or line, and the file parser wraps that
//! with the file, line, and import chain it was working on.

use std::fmt;
use std::io;

use thiserror::Error;

/// Failure splitting one line into shell-style words.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenizeError {
    /// A `'` or `"` span was opened but never closed.
    #[error("EOF found when expecting closing quote")]
    UnterminatedQuote {
        /// The quote character that was left open.
        quote: char,
    },
}

/// Failure classifying a single token against the flag schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClassifyError {
    /// A single `-` with nothing after it.
    #[error("{0:?} isn't a valid flag")]
    InvalidFlag(String),

    /// `-x` where `x` is not a registered abbreviation.
    #[error("flag {0} wasn't a known abbreviation")]
    UnknownAbbreviation(char),

    /// An abbreviated boolean flag in any form other than `-b` or `-b-`.
    #[error("token {0:?} wasn't a valid abbreviated flag")]
    MalformedAbbreviatedBoolean(String),

    /// An abbreviated value flag with an inline or `=` value (`-j200`, `-j=200`).
    #[error("flag {0:?} wasn't a valid abbreviated flag")]
    MalformedAbbreviatedFlag(String),

    /// A flag with no value that is not registered as boolean.
    #[error("value-requiring flag {0} didn't have value")]
    MissingBooleanRegistration(String),
}

/// The chain of files from the root rc file down to the file being parsed.
///
/// Rendered as ` - File A imports file B which imports file C` when the chain
/// has more than two entries, and as nothing otherwise.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportChain(pub Vec<String>);

impl ImportChain {
    /// Returns the files in the chain, root first.
    pub fn files(&self) -> &[String] {
        &self.0
    }
}

impl fmt::Display for ImportChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.len() <= 2 {
            return Ok(());
        }
        write!(
            f,
            " - File {} imports file {}",
            self.0[0],
            self.0[1..].join(" which imports file ")
        )
    }
}

/// Errors produced while parsing rc files.
#[derive(Debug, Error)]
pub enum RcError {
    /// The input stream could not be read.
    #[error("failed to read file: {0}")]
    Read(#[source] io::Error),

    /// A line could not be split into words.
    #[error("unable to split line: {0}")]
    Tokenize(#[from] TokenizeError),

    /// A token could not be classified.
    #[error(transparent)]
    Classify(#[from] ClassifyError),

    /// An `import` or `try-import` directive without exactly one path.
    #[error("expected exactly 1 argument after {directive}, but got {count}")]
    ImportArity { directive: String, count: usize },

    /// The imported path is already being parsed further up the chain.
    #[error("bazelrc file contains import cycle")]
    ImportCycle,

    /// An `import` target could not be opened.
    #[error("unable to open file: {path}: {source}")]
    FileOpen {
        path: String,
        #[source]
        source: io::Error,
    },

    /// A failure attributed to a file and, when known, a 1-based line.
    #[error("failed to process {file}{}, {source}{chain}", describe_line(.line))]
    Located {
        file: String,
        line: Option<usize>,
        chain: ImportChain,
        #[source]
        source: Box<RcError>,
    },

    /// A failure inside a file pulled in by `import` or `try-import`.
    #[error("unable to parse import file due to error: {source}{chain}")]
    Import {
        chain: ImportChain,
        #[source]
        source: Box<RcError>,
    },
}

impl RcError {
    /// Returns `true` if this error, or any error it wraps, is an import cycle.
    pub fn is_import_cycle(&self) -> bool {
        match self {
            Self::ImportCycle => true,
            Self::Located { source, .. } | Self::Import { source, .. } => source.is_import_cycle(),
            _ => false,
        }
    }

    /// Returns the innermost error, skipping file and import context.
    pub fn root_cause(&self) -> &RcError {
        match self {
            Self::Located { source, .. } | Self::Import { source, .. } => source.root_cause(),
            other => other,
        }
    }

    pub(crate) fn located(
        self,
        import_call_stack: &[String],
        zero_based_line: Option<usize>,
    ) -> Self {
        Self::Located {
            file: import_call_stack.last().cloned().unwrap_or_default(),
            line: zero_based_line.map(|line| line + 1),
            chain: ImportChain(import_call_stack.to_vec()),
            source: Box::new(self),
        }
    }
}

fn describe_line(line: &Option<usize>) -> String {
    match line {
        Some(line) => format!(" on line {line}"),
        None => String::new(),
    }
}

/// Errors produced while parsing a command line after the sub-command name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandLineError {
    /// A token could not be classified.
    #[error("failed to parse command line: {0}")]
    Classify(#[from] ClassifyError),

    /// A bare `\` ended the command line.
    #[error("didn't understand continuation \\ at end of command")]
    DanglingContinuation,

    /// The command line ended with a flag still waiting for its value.
    #[error("ended parsing command line while expecting value for flag {0:?}")]
    DanglingFlag(String),
}
