//! Billbook CLI - Extract invoice data with an LLM and manage it interactively.

use billbook_cli::commands;
use billbook_cli::repl::{self, Session};
use billbook_cli::config::pdf_warning;
use billbook_cli::{Cli, Command, Config, Formatter};
use billbook_extractor::{Coordinator, LlmExtractionClient};
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> billbook_cli::Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    // Load config; a missing file means defaults
    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    if let Some(model) = cli.model {
        config.llm.model = model;
    }
    if let Some(endpoint) = cli.endpoint {
        config.llm.endpoint = Some(endpoint);
    }

    // Determine output format and color
    let format = cli
        .format
        .map(Into::into)
        .unwrap_or(config.settings.format);
    let color_enabled = !cli.no_color && config.settings.color;
    let formatter = Formatter::new(format, color_enabled);

    let provider = config.build_provider()?;
    debug!(backend = ?config.llm.backend, model = %config.llm.model, "LLM provider ready");
    let coordinator = Coordinator::new(
        LlmExtractionClient::new(provider),
        config.extractor.clone(),
    );

    let backend = config.llm.backend;
    match cli.command {
        None => {
            let mut session = Session::new(coordinator).with_backend(backend);
            repl::run_repl(&mut session, Vec::new(), &config, &formatter).await?;
        }
        Some(Command::Repl(args)) => {
            let mut session = Session::new(coordinator).with_backend(backend);
            repl::run_repl(&mut session, args.files, &config, &formatter).await?;
        }
        Some(Command::Analyze(args)) => {
            if let Some(warning) = pdf_warning(backend, commands::count_pdfs(&args.files)) {
                eprintln!("{}", formatter.warning(&warning));
            }
            commands::execute_analyze(args, &coordinator, &formatter).await?;
        }
    }

    Ok(())
}

/// Log to stderr; `RUST_LOG` wins over `-v`.
fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
