//! Interactive REPL (Read-Eval-Print Loop) mode.

use crate::commands;
use crate::config::{billbook_dir, pdf_warning, Config, LlmBackend};
use crate::error::{CliError, Result};
use crate::output::Formatter;
use billbook_domain::traits::ExtractionClient;
use billbook_extractor::Coordinator;
use billbook_store::{BillBook, ExportOptions, ProviderSelection};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::path::PathBuf;

/// One interactive session: the book, the provider selection and the
/// extraction pipeline feeding them.
pub struct Session<C: ExtractionClient> {
    coordinator: Coordinator<C>,
    book: BillBook,
    selection: ProviderSelection,
    backend: Option<LlmBackend>,
    pdf_warned: bool,
}

/// REPL command type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Exit,
    Help,
    Ingest(Vec<PathBuf>),
    Invoices,
    /// One invoice with its source file and privacy details
    ShowInvoice(String),
    /// Write an invoice's source document to disk
    SaveInvoice {
        id: String,
        path: Option<PathBuf>,
    },
    Providers,
    /// Provider detail; the selected provider when no id is given
    Show(Option<String>),
    Select(String),
    EditInvoice {
        id: String,
        assignments: Vec<(String, String)>,
    },
    EditProvider {
        id: String,
        assignments: Vec<(String, String)>,
    },
    DeleteInvoice(String),
    DeleteProvider(String),
    Export(Option<PathBuf>),
    Reset {
        confirmed: bool,
    },
}

impl<C: ExtractionClient> Session<C> {
    /// Start an empty session.
    pub fn new(coordinator: Coordinator<C>) -> Self {
        Self {
            coordinator,
            book: BillBook::new(),
            selection: ProviderSelection::new(),
            backend: None,
            pdf_warned: false,
        }
    }

    /// Warn (once) when PDFs are ingested for a backend that cannot read them.
    pub fn with_backend(mut self, backend: LlmBackend) -> Self {
        self.backend = Some(backend);
        self
    }

    /// The session's invoices and providers.
    pub fn book(&self) -> &BillBook {
        &self.book
    }

    /// The provider selection.
    pub fn selection(&self) -> &ProviderSelection {
        &self.selection
    }

    /// Run one command against the session.
    ///
    /// `Exit` and `Help` are handled by the loop and do nothing here. An
    /// unconfirmed `Reset` is refused.
    pub async fn execute(&mut self, command: ReplCommand, formatter: &Formatter) -> Result<()> {
        match command {
            ReplCommand::Exit | ReplCommand::Help => {}
            ReplCommand::Ingest(paths) => {
                if !self.pdf_warned {
                    let warning = self
                        .backend
                        .and_then(|backend| pdf_warning(backend, commands::count_pdfs(&paths)));
                    if let Some(warning) = warning {
                        eprintln!("{}", formatter.warning(&warning));
                        self.pdf_warned = true;
                    }
                }
                commands::execute_ingest(&paths, &self.coordinator, &mut self.book, formatter)
                    .await?;
                self.selection.reconcile(self.book.providers());
            }
            ReplCommand::Invoices => {
                let invoices: Vec<_> = self.book.invoices().iter().collect();
                println!("{}", formatter.format_invoices(&invoices)?);
            }
            ReplCommand::ShowInvoice(token) => {
                let id = commands::resolve_invoice(&self.book, &token)?;
                let invoice = self.book.invoices().get(id).ok_or_else(|| CliError::UnknownId {
                    kind: "invoice",
                    id: id.to_string(),
                })?;
                println!("{}", formatter.format_invoice_detail(invoice)?);
            }
            ReplCommand::SaveInvoice { id, path } => {
                let id = commands::resolve_invoice(&self.book, &id)?;
                commands::save_source(&self.book, id, path.as_deref(), formatter)?;
            }
            ReplCommand::Providers => {
                let providers: Vec<_> = self.book.providers().iter().collect();
                let selected = self.selection.selected(self.book.providers());
                println!("{}", formatter.format_providers(&providers, selected)?);
            }
            ReplCommand::Show(token) => {
                let id = match token {
                    Some(token) => commands::resolve_provider(&self.book, &token)?,
                    None => self.selection.current().ok_or_else(|| {
                        CliError::InvalidInput("No provider selected".to_string())
                    })?,
                };
                let provider = self.book.providers().get(id).ok_or_else(|| CliError::UnknownId {
                    kind: "provider",
                    id: id.to_string(),
                })?;
                let invoices = self.book.invoices_for_provider(provider.name());
                println!("{}", formatter.format_provider_detail(provider, &invoices)?);
            }
            ReplCommand::Select(token) => {
                let id = commands::resolve_provider(&self.book, &token)?;
                self.selection.select(self.book.providers(), id)?;
                println!("{}", formatter.success(&format!("Selected provider {}", id.short())));
            }
            ReplCommand::EditInvoice { id, assignments } => {
                let id = commands::resolve_invoice(&self.book, &id)?;
                let invoice = self.book.invoices().get(id).ok_or_else(|| CliError::UnknownId {
                    kind: "invoice",
                    id: id.to_string(),
                })?;
                let edit = commands::invoice_edit(invoice, &assignments)?;
                self.book.update_invoice(id, edit)?;
                println!("{}", formatter.success(&format!("Updated invoice {}", id.short())));
            }
            ReplCommand::EditProvider { id, assignments } => {
                let id = commands::resolve_provider(&self.book, &id)?;
                let provider = self.book.providers().get(id).ok_or_else(|| CliError::UnknownId {
                    kind: "provider",
                    id: id.to_string(),
                })?;
                let draft = commands::provider_draft(provider, &assignments)?;
                self.book.update_provider(id, draft)?;
                self.selection.reconcile(self.book.providers());
                println!("{}", formatter.success(&format!("Updated provider {}", id.short())));
            }
            ReplCommand::DeleteInvoice(token) => {
                let id = commands::resolve_invoice(&self.book, &token)?;
                self.book.delete_invoice(id)?;
                println!("{}", formatter.success(&format!("Deleted invoice {}", id.short())));
            }
            ReplCommand::DeleteProvider(token) => {
                let id = commands::resolve_provider(&self.book, &token)?;
                self.book.delete_provider(id)?;
                self.selection.reconcile(self.book.providers());
                println!("{}", formatter.success(&format!("Deleted provider {}", id.short())));
            }
            ReplCommand::Export(path) => {
                commands::execute_export(
                    &self.book,
                    path.as_deref(),
                    &ExportOptions::default(),
                    formatter,
                )?;
            }
            ReplCommand::Reset { confirmed } => {
                if !confirmed {
                    return Err(CliError::InvalidInput(
                        "Reset not confirmed; use 'reset --yes'".to_string(),
                    ));
                }
                self.book.reset()?;
                self.selection.clear();
                println!("{}", formatter.success("Cleared all invoices and providers"));
            }
        }
        Ok(())
    }
}

/// Run the interactive REPL, ingesting `files` first when given.
pub async fn run_repl<C: ExtractionClient>(
    session: &mut Session<C>,
    files: Vec<PathBuf>,
    config: &Config,
    formatter: &Formatter,
) -> Result<()> {
    println!("{}", formatter.info("Billbook REPL - Type 'help' for commands, 'exit' to quit"));
    println!();

    let editor_config = rustyline::Config::builder()
        .max_history_size(config.settings.history_size)
        .map_err(editor_error)?
        .build();
    let mut editor = DefaultEditor::with_config(editor_config).map_err(editor_error)?;

    let history_path = get_history_path()?;
    let _ = editor.load_history(&history_path);

    if !files.is_empty() {
        if let Err(e) = session.execute(ReplCommand::Ingest(files), formatter).await {
            eprintln!("{}", formatter.error(&e.to_string()));
        }
    }

    loop {
        match editor.readline("billbook> ") {
            Ok(line) => {
                let line = line.trim();

                if line.is_empty() {
                    continue;
                }

                editor.add_history_entry(line).ok();

                let command = match parse_repl_command(line) {
                    Ok(ReplCommand::Exit) => {
                        println!("{}", formatter.info("Goodbye!"));
                        break;
                    }
                    Ok(ReplCommand::Help) => {
                        print_help(formatter);
                        continue;
                    }
                    Ok(ReplCommand::Reset { confirmed: false }) => {
                        let answer = editor
                            .readline("Clear all invoices and providers? [y/N] ")
                            .unwrap_or_default();
                        if !answer.trim().eq_ignore_ascii_case("y") {
                            println!("{}", formatter.info("Operation cancelled"));
                            continue;
                        }
                        ReplCommand::Reset { confirmed: true }
                    }
                    Ok(command) => command,
                    Err(e) => {
                        eprintln!("{}", formatter.error(&e.to_string()));
                        continue;
                    }
                };

                if let Err(e) = session.execute(command, formatter).await {
                    eprintln!("{}", formatter.error(&e.to_string()));
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", formatter.info("Use 'exit' to quit"));
            }
            Err(ReadlineError::Eof) => {
                break;
            }
            Err(err) => {
                eprintln!("{}", formatter.error(&format!("Error: {}", err)));
                break;
            }
        }
    }

    editor.save_history(&history_path).ok();

    Ok(())
}

/// Parse a REPL command line.
pub fn parse_repl_command(line: &str) -> Result<ReplCommand> {
    let parts = split_args(line)?;
    let Some((head, args)) = parts.split_first() else {
        return Err(CliError::InvalidInput("Empty command".to_string()));
    };

    match head.as_str() {
        "exit" | "quit" | "q" => Ok(ReplCommand::Exit),
        "help" | "?" => Ok(ReplCommand::Help),
        "ingest" | "add" => {
            if args.is_empty() {
                return Err(usage("ingest <file> [file...]"));
            }
            Ok(ReplCommand::Ingest(args.iter().map(PathBuf::from).collect()))
        }
        "invoices" | "ls" => Ok(ReplCommand::Invoices),
        "show-invoice" => match args {
            [id] => Ok(ReplCommand::ShowInvoice(id.clone())),
            _ => Err(usage("show-invoice <id>")),
        },
        "save-invoice" => match args {
            [id] => Ok(ReplCommand::SaveInvoice {
                id: id.clone(),
                path: None,
            }),
            [id, path] => Ok(ReplCommand::SaveInvoice {
                id: id.clone(),
                path: Some(PathBuf::from(path)),
            }),
            _ => Err(usage("save-invoice <id> [path]")),
        },
        "providers" => Ok(ReplCommand::Providers),
        "show" => Ok(ReplCommand::Show(args.first().cloned())),
        "select" => match args {
            [id] => Ok(ReplCommand::Select(id.clone())),
            _ => Err(usage("select <provider-id>")),
        },
        "edit-invoice" => match args {
            [id, rest @ ..] if !rest.is_empty() => Ok(ReplCommand::EditInvoice {
                id: id.clone(),
                assignments: commands::parse_assignments(rest)?,
            }),
            _ => Err(usage("edit-invoice <id> <field>=<value> [...]")),
        },
        "edit-provider" => match args {
            [id, rest @ ..] if !rest.is_empty() => Ok(ReplCommand::EditProvider {
                id: id.clone(),
                assignments: commands::parse_assignments(rest)?,
            }),
            _ => Err(usage("edit-provider <id> <field>=<value> [...]")),
        },
        "delete-invoice" => match args {
            [id] => Ok(ReplCommand::DeleteInvoice(id.clone())),
            _ => Err(usage("delete-invoice <id>")),
        },
        "delete-provider" => match args {
            [id] => Ok(ReplCommand::DeleteProvider(id.clone())),
            _ => Err(usage("delete-provider <id>")),
        },
        "export" => Ok(ReplCommand::Export(args.first().map(PathBuf::from))),
        "reset" => Ok(ReplCommand::Reset {
            confirmed: matches!(args.first().map(String::as_str), Some("-y" | "--yes")),
        }),
        other => Err(CliError::InvalidInput(format!(
            "Unknown command: {}. Type 'help' for available commands.",
            other
        ))),
    }
}

/// Split a line on whitespace; double quotes group words and may appear
/// mid-word (`provider="Acme Corp"`).
fn split_args(line: &str) -> Result<Vec<String>> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut quoted = false;

    for c in line.chars() {
        match c {
            '"' => {
                quoted = !quoted;
                in_token = true;
            }
            c if c.is_whitespace() && !quoted => {
                if in_token {
                    parts.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            c => {
                current.push(c);
                in_token = true;
            }
        }
    }

    if quoted {
        return Err(CliError::InvalidInput("Unterminated quote".to_string()));
    }
    if in_token {
        parts.push(current);
    }
    Ok(parts)
}

fn usage(text: &str) -> CliError {
    CliError::InvalidInput(format!("Usage: {}", text))
}

fn editor_error(e: ReadlineError) -> CliError {
    CliError::Io(std::io::Error::other(format!(
        "Failed to initialize editor: {}",
        e
    )))
}

fn get_history_path() -> Result<PathBuf> {
    let dir = billbook_dir()?;
    std::fs::create_dir_all(&dir)?;
    Ok(dir.join("history.txt"))
}

fn print_help(formatter: &Formatter) {
    println!("{}", formatter.info("Available commands:"));
    println!();
    println!("  ingest <file> [file...]           - Extract invoices from PDF/PNG/JPEG files");
    println!("  invoices                          - List invoices, newest first");
    println!("  show-invoice <id>                 - Invoice details, source file and privacy notes");
    println!("  save-invoice <id> [path]          - Save the invoice's original file");
    println!("  providers                         - List providers (* = selected)");
    println!("  show [provider-id]                - Provider details and its invoices");
    println!("  select <provider-id>              - Select a provider");
    println!("  edit-invoice <id> <f>=<v> [...]   - Edit invoice fields");
    println!("    f: invoiceNumber | invoiceDate | provider | amount");
    println!("  edit-provider <id> <f>=<v> [...]  - Edit provider fields");
    println!("    f: name | address | phone | email | website | vatId");
    println!("  delete-invoice <id>               - Delete an invoice");
    println!("  delete-provider <id>              - Delete a provider (invoices are kept)");
    println!("  export [path]                     - Write invoices as CSV (default: invoices.csv)");
    println!("  reset [--yes]                     - Clear all invoices and providers");
    println!("  help, ?                           - Show this help");
    println!("  exit, quit, q                     - Exit REPL");
    println!();
    println!("  Ids may be given in full or as the short form shown in tables.");
    println!("  The Ollama backend reads images only; PDFs need llm.backend = \"openai\".");
    println!();
}
