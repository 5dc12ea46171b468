//! Billbook CLI library.
//!
//! This library provides the pieces behind the `billbook` binary: argument
//! parsing, configuration, the one-shot `analyze` command, the interactive
//! REPL and output formatting.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;
pub mod repl;

pub use cli::{Cli, Command};
pub use config::Config;
pub use error::{CliError, Result};
pub use output::Formatter;
