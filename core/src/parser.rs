//! Parsing of bazelrc files, including continuation lines and imports.

use std::fs::File;
use std::io::{self, BufReader, Read};

use tracing::{debug, trace};

use crate::classify::{Classifier, LineState, TokenOutcome};
use crate::contents::{FlagValues, RcContents};
use crate::error::{ImportChain, RcError};
use crate::schema::FlagSchema;
use crate::tokenize::tokenize_line;

/// Placeholder in import paths replaced by the workspace root.
pub const WORKSPACE_PLACEHOLDER: &str = "%workspace%";

const IMPORT: &str = "import";
const TRY_IMPORT: &str = "try-import";

/// Opens the files named by `import` and `try-import` directives.
pub trait SourceOpener {
    /// Opens `path` for reading.
    ///
    /// The returned reader is dropped as soon as the imported file has been
    /// parsed, whether or not parsing succeeded.
    fn open(&self, path: &str) -> io::Result<Box<dyn Read + '_>>;
}

impl<T: SourceOpener + ?Sized> SourceOpener for &T {
    fn open(&self, path: &str) -> io::Result<Box<dyn Read + '_>> {
        (**self).open(path)
    }
}

/// Opens import targets from the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsOpener;

impl SourceOpener for FsOpener {
    fn open(&self, path: &str) -> io::Result<Box<dyn Read + '_>> {
        Ok(Box::new(BufReader::new(File::open(path)?)))
    }
}

/// A parser of bazelrc files.
///
/// The parser itself holds no per-parse state, so one instance can parse any
/// number of files, and the same [`FlagSchema`] can back parsers on several
/// threads at once.
///
/// # Examples
///
/// ```
/// use bazelrc_core::{FlagSchema, RcParser};
///
/// let schema = FlagSchema::new()
///     .with_boolean_flag("verbose_failures")
///     .with_abbreviation('j', "jobs");
/// let parser = RcParser::new("/home/me/project", &schema);
///
/// let rc = "\
/// # Shared settings
/// build --verbose_failures -j 8
/// build:asan --copt -fsanitize=address \\
///     --linkopt=-fsanitize=address
/// try-import %workspace%/user.bazelrc
/// ";
/// let contents = parser.parse(rc.as_bytes(), "/home/me/project/.bazelrc").unwrap();
///
/// assert_eq!(contents.flag_value("build", "verbose_failures"), Some("true"));
/// assert_eq!(contents.flag_value("build", "jobs"), Some("8"));
/// assert_eq!(contents.flag_value("build:asan", "copt"), Some("-fsanitize=address"));
/// assert_eq!(contents.flag_value("build:asan", "linkopt"), Some("-fsanitize=address"));
/// ```
#[derive(Debug, Clone)]
pub struct RcParser<'a, O = FsOpener> {
    workspace_directory: String,
    schema: &'a FlagSchema,
    opener: O,
}

impl<'a> RcParser<'a, FsOpener> {
    /// Creates a parser that resolves `%workspace%` to `workspace_directory`
    /// and reads imports from the filesystem.
    pub fn new(workspace_directory: impl Into<String>, schema: &'a FlagSchema) -> Self {
        Self::with_opener(workspace_directory, schema, FsOpener)
    }
}

impl<'a, O: SourceOpener> RcParser<'a, O> {
    /// Creates a parser that opens imports through `opener`.
    pub fn with_opener(
        workspace_directory: impl Into<String>,
        schema: &'a FlagSchema,
        opener: O,
    ) -> Self {
        Self {
            workspace_directory: workspace_directory.into(),
            schema,
            opener,
        }
    }

    /// Returns the schema this parser classifies flags with.
    pub fn schema(&self) -> &'a FlagSchema {
        self.schema
    }

    /// Parses the rc file read from `reader`, labelled `path` in errors and
    /// in import cycle detection.
    ///
    /// # Errors
    ///
    /// Any failure in this file or anything it imports aborts the parse. The
    /// error names the file, the 1-based line, and the import chain when the
    /// failure happened inside an imported file.
    pub fn parse(&self, reader: impl Read, path: &str) -> Result<RcContents, RcError> {
        let mut contents = RcContents::new();
        self.parse_file_internal(&mut contents, reader, &[path.to_string()])?;
        Ok(contents)
    }

    /// Opens `path` through the parser's opener and parses it.
    pub fn parse_path(&self, path: &str) -> Result<RcContents, RcError> {
        let stack = [path.to_string()];
        let reader = self.opener.open(path).map_err(|source| {
            RcError::FileOpen {
                path: path.to_string(),
                source,
            }
            .located(&stack, None)
        })?;
        let mut contents = RcContents::new();
        self.parse_file_internal(&mut contents, reader, &stack)?;
        Ok(contents)
    }

    /// `import_call_stack` always holds at least the file being parsed, as its
    /// last element.
    fn parse_file_internal(
        &self,
        out: &mut RcContents,
        mut reader: impl Read,
        import_call_stack: &[String],
    ) -> Result<(), RcError> {
        let mut text = String::new();
        reader
            .read_to_string(&mut text)
            .map_err(|err| RcError::Read(err).located(import_call_stack, None))?;

        let lines: Vec<&str> = text.split('\n').collect();
        // A flag still waiting for its value at the end of a line takes the
        // first token of the next flag line. One left at end of file is dropped.
        let mut state = LineState::default();
        let mut line_index = 0;
        while line_index < lines.len() {
            let line = lines[line_index];
            if line.is_empty() || line.starts_with('#') {
                line_index += 1;
                continue;
            }

            let tokens = tokenize(line, import_call_stack, line_index)?;
            let Some((command, arguments)) = tokens.split_first() else {
                trace!(line = line_index + 1, "Skipping blank line");
                line_index += 1;
                continue;
            };

            if command == IMPORT || command == TRY_IMPORT {
                self.resolve_import(out, command, arguments, import_call_stack, line_index)?;
                line_index += 1;
                continue;
            }

            if arguments.is_empty() {
                trace!(line = line_index + 1, command = %command, "Skipping line without flags");
                line_index += 1;
                continue;
            }

            // Targets are collected but unused; a line like
            // `run:repin --action_env=REPIN=true @maven//:repin` is legal.
            state.targets.clear();
            self.parse_flag_line(
                arguments.to_vec(),
                &lines,
                &mut line_index,
                out.command_mut(command),
                &mut state,
                import_call_stack,
            )?;
            line_index += 1;
        }

        Ok(())
    }

    /// Feeds one logical line through the classifier, pulling in further
    /// physical lines for each trailing `\`. On return `line_index` points at
    /// the last physical line consumed.
    fn parse_flag_line(
        &self,
        mut tokens: Vec<String>,
        lines: &[&str],
        line_index: &mut usize,
        values: &mut FlagValues,
        state: &mut LineState,
        import_call_stack: &[String],
    ) -> Result<(), RcError> {
        let classifier = Classifier::new(self.schema);

        loop {
            let mut continues = false;
            for (i, token) in tokens.iter().enumerate() {
                let outcome = classifier
                    .classify(token, i + 1 == tokens.len(), values, state)
                    .map_err(|err| RcError::from(err).located(import_call_stack, Some(*line_index)))?;
                match outcome {
                    TokenOutcome::Consumed => {}
                    TokenOutcome::ContinueOnNextLine => continues = true,
                    TokenOutcome::RestAreTargets => {
                        state.targets.extend(tokens[i + 1..].iter().cloned());
                        break;
                    }
                }
            }
            if !continues {
                break;
            }
            if *line_index + 1 >= lines.len() {
                debug!(line = *line_index + 1, "Continuation at end of file");
                return Ok(());
            }
            *line_index += 1;
            tokens = tokenize(lines[*line_index], import_call_stack, *line_index)?;
        }
        Ok(())
    }

    fn resolve_import(
        &self,
        out: &mut RcContents,
        directive: &str,
        arguments: &[String],
        import_call_stack: &[String],
        line_index: usize,
    ) -> Result<(), RcError> {
        let [path] = arguments else {
            return Err(RcError::ImportArity {
                directive: directive.to_string(),
                count: arguments.len(),
            }
            .located(import_call_stack, Some(line_index)));
        };

        let path = path.replace(WORKSPACE_PLACEHOLDER, &self.workspace_directory);
        let is_cycle = import_call_stack.contains(&path);
        let mut nested_stack = import_call_stack.to_vec();
        nested_stack.push(path.clone());

        if is_cycle {
            return Err(RcError::ImportCycle.located(&nested_stack, Some(line_index)));
        }

        let reader = match self.opener.open(&path) {
            Ok(reader) => reader,
            Err(err) if directive == TRY_IMPORT => {
                debug!(path = %path, error = %err, "Skipping missing try-import");
                return Ok(());
            }
            Err(source) => {
                return Err(RcError::FileOpen { path, source }.located(&nested_stack, Some(line_index)));
            }
        };

        debug!(path = %path, depth = nested_stack.len() - 1, "Parsing imported file");
        self.parse_file_internal(out, reader, &nested_stack)
            .map_err(|err| {
                if err.is_import_cycle() {
                    err
                } else {
                    RcError::Import {
                        chain: ImportChain(nested_stack.clone()),
                        source: Box::new(err),
                    }
                }
            })
    }
}

fn tokenize(line: &str, import_call_stack: &[String], line_index: usize) -> Result<Vec<String>, RcError> {
    tokenize_line(line).map_err(|err| RcError::from(err).located(import_call_stack, Some(line_index)))
}
