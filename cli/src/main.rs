mod config;
mod output;

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use optscan_core::ParseContext;
use optscan_help::{
    CommandHandler, CommandRegistry, DispatchOutcome, Dispatcher, HandlerError, HelpDocument,
    Invocation, normalize_path, parse_help_text, render_all, render_section,
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::config::ScanConfig;
use crate::output::{OutputFormat, ParseReport, format_report};

/// Exit code for command lines with illegal option usages.
const EXIT_INVALID_USAGE: i32 = 2;

#[derive(Debug, Parser)]
#[command(name = "optscan")]
#[command(version)]
#[command(about = "Scan command lines against option tables described in help text")]
struct Cli {
    /// YAML file with defaults for the flags below.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Log debug output to stderr (overrides RUST_LOG).
    #[arg(long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Scan an argument list against one command's options and print the result.
    Parse(ParseArgs),
    /// Parse a help file and validate the options of every section.
    Check(CheckArgs),
    /// Render help pages from a help file.
    Render(RenderArgs),
    /// Resolve the command path of an argument list and run an inspecting handler.
    Dispatch(DispatchArgs),
    /// Write a config file from the given flags (merged over --config, if any).
    Init(InitArgs),
}

#[derive(Debug, Args)]
struct SourceArgs {
    /// Help text file written in the option DSL.
    #[arg(long)]
    help_file: Option<PathBuf>,
    /// Tool name of the level-1 header to read (default: the help file's stem).
    #[arg(long)]
    tool: Option<String>,
}

#[derive(Debug, Args)]
struct ParseArgs {
    #[command(flatten)]
    source: SourceArgs,
    /// Command path whose options are used (default: the root command).
    #[arg(long, default_value = "")]
    command: String,
    /// Allowed group tag; repeatable (default: the command path itself).
    #[arg(long = "group")]
    groups: Vec<String>,
    /// Index of the first argument to scan.
    #[arg(long, default_value_t = 0)]
    offset: usize,
    /// Output format (default: json).
    #[arg(long)]
    format: Option<OutputFormat>,
    /// Arguments to scan, after `--`.
    #[arg(last = true)]
    args: Vec<String>,
}

#[derive(Debug, Args)]
struct CheckArgs {
    #[command(flatten)]
    source: SourceArgs,
}

#[derive(Debug, Args)]
struct RenderArgs {
    #[command(flatten)]
    source: SourceArgs,
    /// Render every section instead of one.
    #[arg(long, conflicts_with = "path")]
    all: bool,
    /// Command path to render (default: the root command).
    path: Vec<String>,
}

#[derive(Debug, Args)]
struct DispatchArgs {
    #[command(flatten)]
    source: SourceArgs,
    /// Command line to dispatch, after `--`.
    #[arg(last = true)]
    args: Vec<String>,
}

#[derive(Debug, Args)]
struct InitArgs {
    #[command(flatten)]
    source: SourceArgs,
    /// Allowed group tag; repeatable.
    #[arg(long = "group")]
    groups: Vec<String>,
    /// Default output format for `parse`.
    #[arg(long)]
    format: Option<OutputFormat>,
    /// Path of the config file to write.
    #[arg(long)]
    output: PathBuf,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = load_config(cli.config.as_deref()).and_then(|config| match cli.command {
        Command::Parse(args) => run_parse(args, &config),
        Command::Check(args) => run_check(args, &config),
        Command::Render(args) => run_render(args, &config),
        Command::Dispatch(args) => run_dispatch(args, &config),
        Command::Init(args) => run_init(args, config),
    });

    match result {
        Ok(0) => {}
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<ScanConfig, String> {
    match path {
        Some(path) => ScanConfig::load(path)
            .map_err(|err| format!("Failed to load config '{}': {err}", path.display())),
        None => Ok(ScanConfig::default()),
    }
}

/// Reads and parses the help file named on the command line or in the config.
fn load_document(source: &SourceArgs, config: &ScanConfig) -> Result<HelpDocument, String> {
    let help_file = source
        .help_file
        .as_ref()
        .or(config.help_file.as_ref())
        .ok_or("No help file given; pass --help-file or set help_file in the config")?;
    let tool = match source.tool.as_ref().or(config.tool.as_ref()) {
        Some(tool) => tool.clone(),
        None => help_file
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .ok_or_else(|| {
                format!("Cannot derive a tool name from '{}'", help_file.display())
            })?,
    };

    let raw = fs::read_to_string(help_file)
        .map_err(|err| format!("Failed to read '{}': {err}", help_file.display()))?;
    debug!(file = %help_file.display(), tool = %tool, "loading help document");
    let document = parse_help_text(&raw, &tool)
        .map_err(|err| format!("Invalid help file '{}': {err}", help_file.display()))?;
    if document.sections.is_empty() {
        return Err(format!(
            "No '= {tool}' header found in '{}'",
            help_file.display()
        ));
    }
    Ok(document)
}

fn run_parse(args: ParseArgs, config: &ScanConfig) -> Result<i32, String> {
    let document = load_document(&args.source, config)?;
    let path = normalize_path(&args.command);
    let table = document.option_table(&path).map_err(|err| err.to_string())?;

    let groups = if !args.groups.is_empty() {
        args.groups
    } else if !config.allowed_groups.is_empty() {
        config.allowed_groups.clone()
    } else {
        document
            .section(&path)
            .map(|section| vec![section.command_path.clone()])
            .unwrap_or_default()
    };
    let context = ParseContext::default()
        .with_offset(args.offset)
        .with_allowed_groups(groups);

    let result = table.parse(&args.args, &context);
    let report = ParseReport::new(&path, &result);
    let format = args.format.or(config.format).unwrap_or(OutputFormat::Json);
    println!("{}", format_report(&report, format)?.trim_end());

    Ok(if report.valid { 0 } else { EXIT_INVALID_USAGE })
}

fn run_check(args: CheckArgs, config: &ScanConfig) -> Result<i32, String> {
    let document = load_document(&args.source, config)?;
    let mut options = 0usize;
    for section in &document.sections {
        let name = if section.command_path.is_empty() {
            document.tool.as_str()
        } else {
            section.command_path.as_str()
        };
        println!("{name}: {} option(s)", section.options.len());
        options += section.options.len();
    }
    println!(
        "Checked {} section(s) with {options} option(s) for '{}'.",
        document.sections.len(),
        document.tool
    );
    Ok(0)
}

fn run_render(args: RenderArgs, config: &ScanConfig) -> Result<i32, String> {
    let document = load_document(&args.source, config)?;
    if args.all {
        print!("{}", render_all(&document));
        return Ok(0);
    }
    let path = normalize_path(&args.path.join(" "));
    let text = render_section(&document, &path)
        .ok_or_else(|| format!("No help section for '{path}'"))?;
    print!("{text}");
    Ok(0)
}

fn run_dispatch(args: DispatchArgs, config: &ScanConfig) -> Result<i32, String> {
    let document = load_document(&args.source, config)?;
    let mut registry = CommandRegistry::new();
    for path in document.command_paths() {
        registry
            .register(path, inspect_handler)
            .map_err(|err| err.to_string())?;
    }

    let dispatcher = Dispatcher::new(document, registry);
    match dispatcher.dispatch(&args.args).map_err(|err| err.to_string())? {
        DispatchOutcome::Help { text, .. } => {
            print!("{text}");
            Ok(0)
        }
        DispatchOutcome::InvalidUsage { path, illegal } => {
            for usage in &illegal {
                eprintln!("{}: {usage}", display_path(&path));
            }
            Ok(EXIT_INVALID_USAGE)
        }
        DispatchOutcome::Completed { exit_code, .. } => Ok(exit_code),
    }
}

fn run_init(args: InitArgs, mut config: ScanConfig) -> Result<i32, String> {
    if args.source.help_file.is_some() {
        config.help_file = args.source.help_file;
    }
    if args.source.tool.is_some() {
        config.tool = args.source.tool;
    }
    if !args.groups.is_empty() {
        config.allowed_groups = args.groups;
    }
    if args.format.is_some() {
        config.format = args.format;
    }

    config
        .save(&args.output)
        .map_err(|err| format!("Failed to write '{}': {err}", args.output.display()))?;
    println!("Wrote config to '{}'.", args.output.display());
    Ok(0)
}

/// Prints what the dispatcher handed over instead of running a real command.
fn inspect_handler() -> Box<dyn CommandHandler> {
    Box::new(|invocation: &Invocation<'_>| -> Result<i32, HandlerError> {
        let report = ParseReport::new(invocation.path, invocation.result);
        let table = format_report(&report, OutputFormat::Table).map_err(HandlerError::Failed)?;
        let mut stdout = std::io::stdout().lock();
        write!(stdout, "{table}")?;
        stdout.flush()?;
        Ok(0)
    })
}

fn display_path(path: &str) -> &str {
    if path.is_empty() { "(root)" } else { path }
}
