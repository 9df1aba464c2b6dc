//! Command-line interface components
//!
//! This module contains CLI-specific code for the manifest fetcher, including
//! argument parsing and the command handlers that report to the operator.

pub mod args;
pub mod commands;

pub use args::{CheckArgs, Cli, Commands, GlobalArgs, InitConfigArgs, RunArgs};
pub use commands::{handle_check, handle_init_config, handle_run, print_summary};
