//! LLM prompts for the two extraction operations

use billbook_domain::DocumentKind;

/// Which extraction operation a prompt drives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionTask {
    /// Invoice fields plus provider contact details
    Fields,
    /// Personal-information assessment
    Privacy,
}

impl ExtractionTask {
    /// JSON schema the response must satisfy
    pub fn schema(&self) -> &'static str {
        match self {
            ExtractionTask::Fields => FIELD_SCHEMA,
            ExtractionTask::Privacy => PRIVACY_SCHEMA,
        }
    }
}

/// Builds prompts for the LLM; the document itself travels as attached media
pub struct PromptBuilder {
    task: ExtractionTask,
    kind: DocumentKind,
}

impl PromptBuilder {
    /// Create a new prompt builder
    pub fn new(task: ExtractionTask, kind: DocumentKind) -> Self {
        Self { task, kind }
    }

    /// Build the complete prompt
    pub fn build(&self) -> String {
        let mut prompt = String::new();

        prompt.push_str(match self.task {
            ExtractionTask::Fields => FIELD_INSTRUCTIONS,
            ExtractionTask::Privacy => PRIVACY_INSTRUCTIONS,
        });
        prompt.push_str("\n\n");

        prompt.push_str(&format!(
            "The attached invoice document is a {}.\n\n",
            self.describe_kind()
        ));

        prompt.push_str("Output format (JSON object only, matching this schema):\n");
        prompt.push_str(self.task.schema());
        prompt.push_str("\n\n");
        prompt.push_str(OUTPUT_FORMAT_REMINDER);

        prompt
    }

    fn describe_kind(&self) -> &'static str {
        match self.kind {
            DocumentKind::Pdf => "PDF file",
            DocumentKind::Png => "PNG image",
            DocumentKind::Jpeg => "JPEG image",
        }
    }
}

const FIELD_INSTRUCTIONS: &str = r#"You are an expert accounting assistant specializing in extracting data from invoices.

Extract the invoice number, invoice date, provider (the company that issued the invoice) and total amount from the invoice document.
Also extract the following details for the provider when they are shown: address, phone number, email, website, and VAT/tax ID.

Rules:
- Copy values as printed; do not reformat dates or amounts
- Keep the currency symbol or code with the amount
- invoiceNumber, invoiceDate, provider and amount are always required; give your best reading if unsure
- Omit provider contact fields that do not appear in the document"#;

const PRIVACY_INSTRUCTIONS: &str = r#"You are an AI assistant specialized in assessing privacy concerns in invoices.

Analyze the attached invoice document and determine whether it contains personal information that could raise privacy concerns.

Consider information such as names, addresses, phone numbers, email addresses, VAT IDs, and any other data that could be used to identify an individual or organization.

Set hasPrivacyConcerns to true when such information is present and describe what you found in privacyConcernsDetails. Use an empty string for privacyConcernsDetails when there are no concerns."#;

const OUTPUT_FORMAT_REMINDER: &str =
    "Remember: Return ONLY a single valid JSON object, no markdown code blocks, no explanations.";

/// Schema for the field-extraction response
pub const FIELD_SCHEMA: &str = r#"{
  "type": "object",
  "properties": {
    "invoiceNumber": {"type": "string"},
    "invoiceDate": {"type": "string"},
    "provider": {"type": "string"},
    "amount": {"type": "string"},
    "providerAddress": {"type": "string"},
    "providerPhone": {"type": "string"},
    "providerEmail": {"type": "string"},
    "providerWebsite": {"type": "string"},
    "providerVatId": {"type": "string"}
  },
  "required": ["invoiceNumber", "invoiceDate", "provider", "amount"]
}"#;

/// Schema for the privacy-assessment response
pub const PRIVACY_SCHEMA: &str = r#"{
  "type": "object",
  "properties": {
    "hasPrivacyConcerns": {"type": "boolean"},
    "privacyConcernsDetails": {"type": "string"}
  },
  "required": ["hasPrivacyConcerns", "privacyConcernsDetails"]
}"#;
