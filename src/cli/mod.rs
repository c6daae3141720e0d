//! CLI module for NordicSense
//!
//! Command-line interface definitions and handlers.
//!
//! # Commands
//!
//! - `serve` - Start the HTTP API server
//! - `analyze` - Run one full analysis from the terminal
//! - `config` - Configuration utilities (init)
//! - `completions` - Generate shell completions
//!
//! # Example
//!
//! ```bash
//! # Start server with default config
//! nordicsense serve
//!
//! # Analyze a text once and print a table
//! nordicsense analyze "Leveransen var sen men personalen var trevlig."
//!
//! # Generate shell completions
//! nordicsense completions bash > ~/.bash_completion.d/nordicsense
//! ```

pub mod analyze;
pub mod completions;
pub mod config;
pub mod output;
pub mod serve;

pub use completions::handle_completions;
pub use config::handle_config_init;

use crate::analysis::{Language, SummaryLength};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// NordicSense - Nordic text analysis API
#[derive(Parser, Debug)]
#[command(
    name = "nordicsense",
    version,
    about = "Text analysis API for Nordic languages"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the NordicSense server
    Serve(ServeArgs),
    /// Run a full analysis on one text
    Analyze(AnalyzeArgs),
    /// Configuration utilities
    #[command(subcommand)]
    Config(ConfigCommands),
    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "nordicsense.toml")]
    pub config: PathBuf,

    /// Override server port
    #[arg(short, long, env = "NORDICSENSE_PORT")]
    pub port: Option<u16>,

    /// Override server host
    #[arg(short = 'H', long, env = "NORDICSENSE_HOST")]
    pub host: Option<String>,

    /// Set log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "NORDICSENSE_LOG_LEVEL")]
    pub log_level: Option<String>,
}

#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Text to analyze (reads --file when omitted)
    #[arg(conflicts_with = "file")]
    pub text: Option<String>,

    /// Read the text from a file
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Language hint (sv, no, da, fi, en)
    #[arg(short = 'L', long)]
    pub language: Option<Language>,

    /// Summary length (short, long)
    #[arg(short, long)]
    pub summary_length: Option<SummaryLength>,

    /// Redact PII before analysis
    #[arg(short, long)]
    pub anonymize: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Path to configuration file
    #[arg(short, long, default_value = "nordicsense.toml")]
    pub config: PathBuf,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Initialize a new configuration file
    Init(ConfigInitArgs),
}

#[derive(Args, Debug)]
pub struct ConfigInitArgs {
    /// Output file path
    #[arg(short, long, default_value = "nordicsense.toml")]
    pub output: PathBuf,

    /// Overwrite existing file
    #[arg(short, long)]
    pub force: bool,
}

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}
