use std::path::PathBuf;

use clap::{Parser, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "tmos-explode")]
#[command(about = "Parse TMOS configuration dumps and rebuild per-application bundles")]
pub struct Cli {
    /// Log level for stderr output (overrides RUST_LOG).
    #[arg(long, global = true, value_enum)]
    pub log_level: Option<LogLevel>,
    /// Settings TOML file. Defaults to the embedded settings.
    #[arg(long, global = true)]
    pub settings: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(clap::Subcommand, Debug)]
pub enum Command {
    /// Parse config files and print stats and diagnostics.
    Parse(ParseArgs),
    /// Print reconstructed application bundles.
    Apps(AppsArgs),
    /// Write the aggregate JSON report of all applications and base objects.
    Explode(ExplodeArgs),
    /// Show the parsed config tree.
    Inspect(InspectArgs),
}

#[derive(Parser, Debug)]
pub struct ParseArgs {
    /// Config files; the first one fixes the version.
    #[arg(required = true)]
    pub files: Vec<PathBuf>,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Parser, Debug)]
pub struct AppsArgs {
    #[arg(required = true)]
    pub files: Vec<PathBuf>,
    /// Only this virtual server (partition prefix optional).
    #[arg(long, conflicts_with = "list")]
    pub app: Option<String>,
    /// Only list virtual server names.
    #[arg(long)]
    pub list: bool,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Parser, Debug)]
pub struct ExplodeArgs {
    #[arg(required = true)]
    pub files: Vec<PathBuf>,
    /// Write the report here instead of stdout.
    #[arg(long)]
    pub output: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct InspectArgs {
    #[arg(required = true)]
    pub files: Vec<PathBuf>,
    /// Start at this path, e.g. "ltm pool".
    #[arg(long)]
    pub path: Option<String>,
    #[arg(long, default_value_t = 3)]
    pub depth: usize,
}

#[derive(Clone, Copy, Debug, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Clone, Copy, Debug, ValueEnum, PartialEq, Eq)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_directive(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}
