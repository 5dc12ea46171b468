//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use billbook_domain::{BatchOutcome, Invoice, Provider, RejectedFile};
use colored::*;
use serde_json::json;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format invoices output.
    pub fn format_invoices(&self, invoices: &[&Invoice]) -> Result<String> {
        match self.format {
            OutputFormat::Json => self.format_invoices_json(invoices),
            OutputFormat::Table => Ok(self.format_invoices_table(invoices)),
            OutputFormat::Quiet => Ok(invoices
                .iter()
                .map(|i| i.id.to_string())
                .collect::<Vec<_>>()
                .join("\n")),
        }
    }

    fn format_invoices_json(&self, invoices: &[&Invoice]) -> Result<String> {
        let json_invoices: Vec<serde_json::Value> = invoices
            .iter()
            .map(|i| {
                json!({
                    "id": i.id.to_string(),
                    "fileName": i.source.file_name(),
                    "invoiceNumber": i.invoice_number,
                    "invoiceDate": i.invoice_date,
                    "provider": i.provider,
                    "amount": i.amount,
                    "privacyAssessment": i.privacy,
                })
            })
            .collect();

        Ok(serde_json::to_string_pretty(&json_invoices)?)
    }

    fn format_invoices_table(&self, invoices: &[&Invoice]) -> String {
        if invoices.is_empty() {
            return self.colorize("No invoices.", "yellow");
        }

        let mut builder = Builder::default();
        builder.push_record(["ID", "File", "Number", "Date", "Provider", "Amount", "Privacy"]);

        for invoice in invoices {
            let privacy = if invoice.privacy.has_concerns {
                self.colorize("⚠ personal data", "yellow")
            } else {
                "-".to_string()
            };
            builder.push_record([
                invoice.id.short(),
                invoice.source.file_name().to_string(),
                invoice.invoice_number.clone(),
                invoice.invoice_date.clone(),
                invoice.provider.clone(),
                invoice.amount.clone(),
                privacy,
            ]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        table.to_string()
    }

    /// Format one invoice with its source file and privacy details.
    pub fn format_invoice_detail(&self, invoice: &Invoice) -> Result<String> {
        let source = &invoice.source;
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&json!({
                "id": invoice.id.to_string(),
                "fileName": source.file_name(),
                "fileType": source.kind().mime_type(),
                "fileSize": source.len(),
                "invoiceNumber": invoice.invoice_number,
                "invoiceDate": invoice.invoice_date,
                "provider": invoice.provider,
                "amount": invoice.amount,
                "privacyAssessment": invoice.privacy,
            }))?),
            OutputFormat::Quiet => Ok(invoice.id.to_string()),
            OutputFormat::Table => {
                let mut out = String::new();
                out.push_str(&self.colorize(&invoice.invoice_number, "cyan"));
                out.push('\n');
                for (label, value) in [
                    ("ID", invoice.id.to_string()),
                    ("Date", invoice.invoice_date.clone()),
                    ("Provider", invoice.provider.clone()),
                    ("Amount", invoice.amount.clone()),
                    (
                        "File",
                        format!(
                            "{} ({}, {} bytes)",
                            source.file_name(),
                            source.kind().mime_type(),
                            source.len()
                        ),
                    ),
                ] {
                    out.push_str(&format!("  {:<9} {}\n", label, value));
                }
                out.push('\n');
                if invoice.privacy.has_concerns {
                    let details = if invoice.privacy.details.is_empty() {
                        "no details given"
                    } else {
                        invoice.privacy.details.as_str()
                    };
                    out.push_str(&self.warning(&format!("Privacy concerns: {}", details)));
                } else {
                    out.push_str(&self.info("No privacy concerns"));
                }
                Ok(out)
            }
        }
    }

    /// Format providers output; the selected one is marked.
    pub fn format_providers(&self, providers: &[&Provider], selected: Option<&Provider>) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let json_providers: Vec<serde_json::Value> =
                    providers.iter().map(|p| provider_json(p)).collect();
                Ok(serde_json::to_string_pretty(&json_providers)?)
            }
            OutputFormat::Quiet => Ok(providers
                .iter()
                .map(|p| p.id().to_string())
                .collect::<Vec<_>>()
                .join("\n")),
            OutputFormat::Table => {
                if providers.is_empty() {
                    return Ok(self.colorize("No providers.", "yellow"));
                }

                let mut builder = Builder::default();
                builder.push_record(["", "ID", "Name", "Email", "Phone", "Website", "VAT ID"]);
                for provider in providers {
                    let marker = if selected.is_some_and(|s| s.id() == provider.id()) {
                        "*"
                    } else {
                        ""
                    };
                    builder.push_record([
                        marker.to_string(),
                        provider.id().short(),
                        provider.name().to_string(),
                        provider.email.clone(),
                        provider.phone.clone(),
                        provider.website.clone(),
                        provider.vat_id.clone(),
                    ]);
                }

                let mut table = builder.build();
                table
                    .with(Style::rounded())
                    .with(Modify::new(Rows::first()).with(Alignment::center()));
                Ok(table.to_string())
            }
        }
    }

    /// Format one provider with the invoices that name it.
    pub fn format_provider_detail(&self, provider: &Provider, invoices: &[&Invoice]) -> Result<String> {
        if self.format == OutputFormat::Json {
            let mut value = provider_json(provider);
            value["invoices"] = json!(invoices.iter().map(|i| i.id.to_string()).collect::<Vec<_>>());
            return Ok(serde_json::to_string_pretty(&value)?);
        }

        let mut out = String::new();
        out.push_str(&self.colorize(provider.name(), "cyan"));
        out.push('\n');
        for (label, value) in [
            ("ID", provider.id().to_string()),
            ("Address", provider.address.clone()),
            ("Phone", provider.phone.clone()),
            ("Email", provider.email.clone()),
            ("Website", provider.website.clone()),
            ("VAT ID", provider.vat_id.clone()),
        ] {
            out.push_str(&format!("  {:<8} {}\n", label, value));
        }
        out.push('\n');
        out.push_str(&self.format_invoices(invoices)?);
        Ok(out)
    }

    /// Format the summary of an ingestion batch.
    pub fn format_outcome(&self, outcome: &BatchOutcome) -> Result<String> {
        if self.format == OutputFormat::Json {
            let failures: Vec<serde_json::Value> = outcome
                .failures
                .iter()
                .map(|f| json!({"fileName": f.file_name, "error": f.error}))
                .collect();
            return Ok(serde_json::to_string_pretty(&json!({
                "invoicesCreated": outcome.invoices_created.iter().map(ToString::to_string).collect::<Vec<_>>(),
                "providersCreated": outcome.providers_created.iter().map(ToString::to_string).collect::<Vec<_>>(),
                "failures": failures,
            }))?);
        }

        let mut lines = Vec::new();
        lines.push(self.success(&format!(
            "Extracted {} invoice(s), {} new provider(s)",
            outcome.succeeded(),
            outcome.providers_created.len()
        )));
        for failure in &outcome.failures {
            lines.push(self.error(&format!("{}: {}", failure.file_name, failure.error)));
        }
        Ok(lines.join("\n"))
    }

    /// Format files refused at intake.
    pub fn format_rejected(&self, rejected: &[RejectedFile]) -> String {
        rejected
            .iter()
            .map(|r| self.warning(&format!("{}: {}", r.file_name, r.reason)))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            "cyan" => text.cyan().to_string(),
            _ => text.to_string(),
        }
    }
}

fn provider_json(provider: &Provider) -> serde_json::Value {
    json!({
        "id": provider.id().to_string(),
        "name": provider.name(),
        "address": provider.address,
        "phone": provider.phone,
        "email": provider.email,
        "website": provider.website,
        "vatId": provider.vat_id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use billbook_domain::{
        ExtractedInvoice, ExtractionReport, FileFailure, IntakeError, PrivacyAssessment,
        SourceDocument,
    };

    fn create_test_invoice() -> Invoice {
        let doc = SourceDocument::accept("acme.pdf", b"%PDF".to_vec(), None, 1024).unwrap();
        let report = ExtractionReport {
            fields: ExtractedInvoice {
                invoice_number: "INV-001".to_string(),
                invoice_date: "2024-01-10".to_string(),
                provider: "Acme Corp".to_string(),
                amount: "$120.00".to_string(),
                provider_email: Some("billing@acme.com".to_string()),
                ..Default::default()
            },
            privacy: PrivacyAssessment::flagged("Customer address"),
        };
        Invoice::from_extraction(doc, &report)
    }

    #[test]
    fn test_json_format() {
        let formatter = Formatter::new(OutputFormat::Json, false);
        let invoice = create_test_invoice();
        let output = formatter.format_invoices(&[&invoice]).unwrap();
        assert!(output.contains("\"invoiceNumber\": \"INV-001\""));
        assert!(output.contains("hasPrivacyConcerns"));
    }

    #[test]
    fn test_quiet_format() {
        let formatter = Formatter::new(OutputFormat::Quiet, false);
        let invoice = create_test_invoice();
        let output = formatter.format_invoices(&[&invoice]).unwrap();
        assert_eq!(output, invoice.id.to_string());
    }

    #[test]
    fn test_table_format() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let invoice = create_test_invoice();
        let output = formatter.format_invoices(&[&invoice]).unwrap();
        assert!(output.contains("Provider"));
        assert!(output.contains("Acme Corp"));
        assert!(output.contains(&invoice.id.short()));
        assert!(output.contains("personal data"));
    }

    #[test]
    fn test_invoice_detail_shows_privacy_details() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let invoice = create_test_invoice();
        let output = formatter.format_invoice_detail(&invoice).unwrap();
        assert!(output.contains("acme.pdf (application/pdf, 4 bytes)"));
        assert!(output.contains("⚠ Privacy concerns: Customer address"));
        assert!(output.contains("$120.00"));
    }

    #[test]
    fn test_invoice_detail_json() {
        let formatter = Formatter::new(OutputFormat::Json, false);
        let invoice = create_test_invoice();
        let output = formatter.format_invoice_detail(&invoice).unwrap();
        assert!(output.contains("\"fileType\": \"application/pdf\""));
        assert!(output.contains("\"privacyConcernsDetails\": \"Customer address\""));
    }

    #[test]
    fn test_empty_invoices() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_invoices(&[]).unwrap();
        assert!(output.contains("No invoices"));
    }

    #[test]
    fn test_provider_table_marks_selection() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let invoice = create_test_invoice();
        let provider = Provider::from_extraction(&ExtractedInvoice {
            provider: invoice.provider.clone(),
            provider_email: Some("billing@acme.com".to_string()),
            ..Default::default()
        })
        .unwrap();
        let output = formatter
            .format_providers(&[&provider], Some(&provider))
            .unwrap();
        assert!(output.contains("billing@acme.com"));
        assert!(output.contains('*'));
    }

    #[test]
    fn test_outcome_lists_failures() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let outcome = BatchOutcome {
            failures: vec![FileFailure {
                file_name: "broken.pdf".to_string(),
                error: "timed out".to_string(),
            }],
            ..Default::default()
        };
        let output = formatter.format_outcome(&outcome).unwrap();
        assert!(output.contains("Extracted 0 invoice(s)"));
        assert!(output.contains("✗ broken.pdf: timed out"));
    }

    #[test]
    fn test_rejected_files() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_rejected(&[RejectedFile {
            file_name: "notes.txt".to_string(),
            reason: IntakeError::UnsupportedType("text/plain".to_string()),
        }]);
        assert!(output.starts_with("⚠ notes.txt: Unsupported file type"));
    }

    #[test]
    fn test_colorize_disabled() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let msg = formatter.success("test");
        assert_eq!(msg, "✓ test");
    }
}
