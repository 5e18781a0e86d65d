use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use bazelrc_core::{CommandLineArgs, FlagSchema, FlagValues, RcContents, RcParser, parse_command_line_args};
use bazelrc_schema::{ToolConfig, load_flag_schema};
use clap::{Args, Parser, Subcommand};
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info};

/// Output format for parse results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum OutputFormat {
    Json,
    Yaml,
    Table,
}

#[derive(Debug, Parser)]
#[command(name = "bazelrc")]
#[command(about = "Inspect bazelrc files and Bazel command lines")]
struct Cli {
    /// YAML configuration supplying defaults for --workspace, --schema, and rc files.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Log parser activity to stderr.
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Parse rc files and print the flags for each sub-command.
    Parse(ParseArgs),
    /// Print the effective value of one flag for one sub-command.
    Flag(FlagArgs),
    /// Split the arguments after a Bazel sub-command into targets, flags, and executable args.
    Args(CommandLineArgsArgs),
}

#[derive(Debug, Args)]
struct SchemaArgs {
    /// Schema file (JSON or YAML) listing boolean flags and abbreviations.
    #[arg(long)]
    schema: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct WorkspaceArgs {
    /// Directory substituted for %workspace% in imports (default: current directory).
    #[arg(long)]
    workspace: Option<PathBuf>,
    #[command(flatten)]
    schema: SchemaArgs,
}

#[derive(Debug, Args)]
struct ParseArgs {
    /// rc files to parse (default: rc_files from --config).
    files: Vec<PathBuf>,
    #[command(flatten)]
    workspace: WorkspaceArgs,
    /// Output format.
    #[arg(long, default_value = "json")]
    format: OutputFormat,
}

#[derive(Debug, Args)]
struct FlagArgs {
    /// rc file to parse.
    file: PathBuf,
    /// Sub-command the flag applies to (e.g. build, test, build:asan).
    #[arg(long)]
    command: String,
    /// Flag name without leading dashes.
    #[arg(long)]
    flag: String,
    /// Print every value in order instead of only the effective one.
    #[arg(long)]
    all: bool,
    #[command(flatten)]
    workspace: WorkspaceArgs,
}

#[derive(Debug, Args)]
struct CommandLineArgsArgs {
    #[command(flatten)]
    schema: SchemaArgs,
    /// Output format.
    #[arg(long, default_value = "json")]
    format: OutputFormat,
    /// Arguments following the sub-command, e.g. `-- //pkg:target --jobs=8`.
    #[arg(last = true)]
    args: Vec<String>,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = load_config(cli.config.as_deref()).and_then(|config| match cli.command {
        Command::Parse(args) => run_parse(args, &config),
        Command::Flag(args) => run_flag(args, &config),
        Command::Args(args) => run_args(args, &config),
    });

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .init();
}

fn load_config(path: Option<&Path>) -> Result<ToolConfig, String> {
    match path {
        Some(path) => ToolConfig::load(path)
            .map_err(|err| format!("Failed to load config '{}': {err}", path.display())),
        None => Ok(ToolConfig::default()),
    }
}

fn resolve_schema(args: &SchemaArgs, config: &ToolConfig) -> Result<FlagSchema, String> {
    let schema = match &args.schema {
        Some(path) => load_flag_schema(path)
            .map_err(|err| format!("Failed to load schema '{}': {err}", path.display()))?,
        None => config
            .load_schema()
            .map_err(|err| format!("Failed to load configured schema: {err}"))?,
    };
    debug!(flags = schema.flag_count(), "Loaded flag schema");
    Ok(schema)
}

fn resolve_workspace(args: &WorkspaceArgs, config: &ToolConfig) -> Result<String, String> {
    if let Some(path) = &args.workspace {
        return Ok(path.to_string_lossy().into_owned());
    }
    if config.workspace.is_some() {
        return Ok(config.workspace_directory());
    }
    std::env::current_dir()
        .map(|dir| dir.to_string_lossy().into_owned())
        .map_err(|err| format!("Failed to determine current directory: {err}"))
}

fn run_parse(args: ParseArgs, config: &ToolConfig) -> Result<(), String> {
    let files = if args.files.is_empty() {
        config.rc_files.clone()
    } else {
        args.files
    };
    if files.is_empty() {
        return Err("Specify at least one rc file, or rc_files in --config".to_string());
    }

    let schema = resolve_schema(&args.workspace.schema, config)?;
    let workspace = resolve_workspace(&args.workspace, config)?;
    let parser = RcParser::new(workspace, &schema);

    let outcomes: Vec<(String, Result<RcContents, String>)> = files
        .par_iter()
        .map(|path| {
            let label = path.to_string_lossy().into_owned();
            let outcome = parser.parse_path(&label).map_err(|err| err.to_string());
            (label, outcome)
        })
        .collect();

    let mut parsed = BTreeMap::new();
    let mut failures = Vec::new();
    for (label, outcome) in outcomes {
        match outcome {
            Ok(contents) => {
                parsed.insert(label, contents);
            }
            Err(err) => failures.push(err),
        }
    }
    info!(parsed = parsed.len(), failed = failures.len(), "Parsed rc files");

    if !failures.is_empty() {
        return Err(failures.join("\n"));
    }

    print!("{}", format_parsed(&parsed, args.format)?);
    Ok(())
}

fn run_flag(args: FlagArgs, config: &ToolConfig) -> Result<(), String> {
    let schema = resolve_schema(&args.workspace.schema, config)?;
    let workspace = resolve_workspace(&args.workspace, config)?;
    let parser = RcParser::new(workspace, &schema);
    let contents = parser
        .parse_path(&args.file.to_string_lossy())
        .map_err(|err| err.to_string())?;

    let values = contents
        .command(&args.command)
        .and_then(|flags| flags.values(&args.flag))
        .ok_or_else(|| {
            format!(
                "flag {} is not set for command {} in '{}'",
                args.flag,
                args.command,
                args.file.display()
            )
        })?;

    if args.all {
        for value in values {
            println!("{value}");
        }
    } else if let Some(value) = values.last() {
        println!("{value}");
    }
    Ok(())
}

fn run_args(args: CommandLineArgsArgs, config: &ToolConfig) -> Result<(), String> {
    let schema = resolve_schema(&args.schema, config)?;
    let parsed = parse_command_line_args(&schema, &args.args).map_err(|err| err.to_string())?;
    print!("{}", format_command_line(&parsed, args.format)?);
    Ok(())
}

fn format_parsed(
    parsed: &BTreeMap<String, RcContents>,
    format: OutputFormat,
) -> Result<String, String> {
    match format {
        OutputFormat::Table => {
            let mut out = String::new();
            for (path, contents) in parsed {
                out.push_str(&format!("{path}\n"));
                for (command, flags) in contents.iter() {
                    out.push_str(&format_flag_rows(command, flags));
                }
            }
            Ok(out)
        }
        _ => serialize(parsed, format),
    }
}

fn format_command_line(parsed: &CommandLineArgs, format: OutputFormat) -> Result<String, String> {
    match format {
        OutputFormat::Table => Ok(format!(
            "targets: {}\n{}executable args: {}\n",
            parsed.targets.join(" "),
            format_flag_rows("flags", &parsed.flags),
            parsed.executable_args.join(" ")
        )),
        _ => serialize(parsed, format),
    }
}

fn format_flag_rows(heading: &str, flags: &FlagValues) -> String {
    let width = flags.iter().map(|(flag, _)| flag.len()).max().unwrap_or(0);
    let mut out = format!("  {heading}\n");
    for (flag, values) in flags.iter() {
        out.push_str(&format!("    {flag:<width$}  {}\n", values.join(", ")));
    }
    out
}

fn serialize<T: Serialize>(value: &T, format: OutputFormat) -> Result<String, String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(value)
            .map(|mut raw| {
                raw.push('\n');
                raw
            })
            .map_err(|err| format!("Failed to serialize JSON: {err}")),
        OutputFormat::Yaml => {
            serde_yaml::to_string(value).map_err(|err| format!("Failed to serialize YAML: {err}"))
        }
        OutputFormat::Table => Err("Table output is not supported here".to_string()),
    }
}
