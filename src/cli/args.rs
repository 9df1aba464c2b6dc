//! Command-line argument parsing for the manifest fetcher
//!
//! This module defines the CLI structure using clap derive macros.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Manifest Fetcher - save embedded HLS stream manifests with absolute segment URLs
#[derive(Parser, Debug)]
#[command(
    name = "manifest_fetcher",
    version,
    about = "Fetch embedded HLS stream manifests and rewrite relative segment URLs",
    long_about = "Fetches the embed page of every configured stream, extracts the manifest URL,
downloads the manifest, rewrites relative segment references into absolute URLs and
saves it under country/subdivision/folder_name/. Streams are processed one at a time."
)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all subcommands
#[derive(Args, Debug)]
pub struct GlobalArgs {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Very verbose logging (debug level)
    #[arg(long, global = true)]
    pub very_verbose: bool,

    /// Quiet mode - suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Configuration file path
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Process every stream in the streams file
    Run(RunArgs),

    /// Load the streams file and list its jobs without fetching anything
    Check(CheckArgs),

    /// Write a default configuration file
    InitConfig(InitConfigArgs),
}

/// Arguments for the run command
#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// Streams file (JSON array of stream objects)
    #[arg(short, long, value_name = "FILE")]
    pub streams: Option<PathBuf>,

    /// Root directory of the output tree
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Seconds to wait between streams
    #[arg(short, long, value_name = "SECS")]
    pub delay_secs: Option<u64>,

    /// Write the batch summary as JSON to this file
    #[arg(long, value_name = "FILE")]
    pub summary: Option<PathBuf>,
}

/// Arguments for the check command
#[derive(Args, Debug, Clone, Default)]
pub struct CheckArgs {
    /// Streams file (JSON array of stream objects)
    #[arg(short, long, value_name = "FILE")]
    pub streams: Option<PathBuf>,
}

/// Arguments for the init-config command
#[derive(Args, Debug, Clone, Default)]
pub struct InitConfigArgs {
    /// Where to write the file (defaults to the user config directory)
    #[arg(value_name = "FILE")]
    pub path: Option<PathBuf>,

    /// Overwrite an existing file
    #[arg(short, long)]
    pub force: bool,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the logging level based on global arguments
    ///
    /// `None` leaves the level to the configuration file.
    pub fn log_level(&self) -> Option<tracing::Level> {
        if self.global.quiet {
            Some(tracing::Level::ERROR)
        } else if self.global.very_verbose {
            Some(tracing::Level::DEBUG)
        } else if self.global.verbose {
            Some(tracing::Level::INFO)
        } else {
            None
        }
    }
}
