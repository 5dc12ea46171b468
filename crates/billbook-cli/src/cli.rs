//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Billbook CLI - Extract invoices with an LLM and manage them in a session.
#[derive(Debug, Parser)]
#[command(name = "billbook")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true, env = "BILLBOOK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Model to use instead of the configured one
    #[arg(short, long, global = true, env = "BILLBOOK_MODEL")]
    pub model: Option<String>,

    /// LLM endpoint to use instead of the configured one
    #[arg(short, long, global = true, env = "BILLBOOK_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Log progress to stderr (repeat for more detail)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (IDs only)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Extract a batch of invoice files and print the results
    Analyze(AnalyzeArgs),

    /// Enter interactive REPL mode
    Repl(ReplArgs),
}

/// Arguments for the analyze command.
#[derive(Debug, Parser)]
pub struct AnalyzeArgs {
    /// Invoice files (PDF, PNG or JPEG; the Ollama backend reads images only)
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Write the extracted invoices as CSV to this path
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Columns to export (invoiceNumber, invoiceDate, provider, amount)
    #[arg(long, value_delimiter = ',')]
    pub columns: Vec<String>,

    /// Use field names instead of labels in the CSV header
    #[arg(long)]
    pub field_names: bool,
}

/// Arguments for the repl command.
#[derive(Debug, Default, Parser)]
pub struct ReplArgs {
    /// Files to ingest before the prompt opens
    pub files: Vec<PathBuf>,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand() {
        let cli = Cli::parse_from(["billbook"]);
        assert!(cli.command.is_none());
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn test_analyze_command() {
        let cli = Cli::parse_from([
            "billbook",
            "analyze",
            "a.pdf",
            "b.png",
            "--export",
            "out.csv",
            "--columns",
            "invoiceNumber,amount",
            "-vv",
        ]);
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Some(Command::Analyze(args)) => {
                assert_eq!(args.files.len(), 2);
                assert_eq!(args.export, Some(PathBuf::from("out.csv")));
                assert_eq!(args.columns, vec!["invoiceNumber", "amount"]);
            }
            _ => panic!("Expected Analyze command"),
        }
    }

    #[test]
    fn test_analyze_requires_files() {
        assert!(Cli::try_parse_from(["billbook", "analyze"]).is_err());
    }

    #[test]
    fn test_global_overrides() {
        let cli = Cli::parse_from([
            "billbook",
            "repl",
            "--model",
            "qwen2.5vl",
            "--format",
            "json",
            "--no-color",
        ]);
        assert_eq!(cli.model.as_deref(), Some("qwen2.5vl"));
        assert!(matches!(cli.format, Some(CliFormat::Json)));
        assert!(cli.no_color);
        assert!(matches!(cli.command, Some(Command::Repl(_))));
    }
}
