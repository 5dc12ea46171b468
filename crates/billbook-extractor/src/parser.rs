//! Parse LLM output into extraction results

use crate::error::ExtractorError;
use billbook_domain::{ExtractedInvoice, PrivacyAssessment};
use serde_json::{Map, Value};

/// Parse a field-extraction response
///
/// Missing or non-string required fields are an error. Optional provider
/// fields that are null or blank are treated as absent.
pub fn parse_fields(response: &str) -> Result<ExtractedInvoice, ExtractorError> {
    let obj = parse_object(response)?;
    let mut fields: ExtractedInvoice = serde_json::from_value(Value::Object(obj))
        .map_err(|e| ExtractorError::InvalidFormat(e.to_string()))?;

    for slot in [
        &mut fields.provider_address,
        &mut fields.provider_phone,
        &mut fields.provider_email,
        &mut fields.provider_website,
        &mut fields.provider_vat_id,
    ] {
        *slot = slot
            .take()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());
    }

    Ok(fields)
}

/// Parse a privacy-assessment response
pub fn parse_privacy(response: &str) -> Result<PrivacyAssessment, ExtractorError> {
    let obj = parse_object(response)?;

    let has_concerns = obj
        .get("hasPrivacyConcerns")
        .and_then(Value::as_bool)
        .ok_or_else(|| {
            ExtractorError::InvalidFormat("Missing or invalid 'hasPrivacyConcerns'".to_string())
        })?;

    // Some models drop the details when there is nothing to report
    let details = obj
        .get("privacyConcernsDetails")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    Ok(PrivacyAssessment {
        has_concerns,
        details,
    })
}

fn parse_object(response: &str) -> Result<Map<String, Value>, ExtractorError> {
    let json_str = extract_json(response)?;
    let value: Value = serde_json::from_str(json_str)?;
    match value {
        Value::Object(obj) => Ok(obj),
        _ => Err(ExtractorError::InvalidFormat(
            "Expected JSON object".to_string(),
        )),
    }
}

/// Extract the outermost JSON object, skipping code fences and any
/// reasoning text around it
fn extract_json(response: &str) -> Result<&str, ExtractorError> {
    let trimmed = response
        .trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim();

    let start = trimmed
        .find('{')
        .ok_or_else(|| ExtractorError::InvalidFormat("No JSON object in response".to_string()))?;
    let end = trimmed
        .rfind('}')
        .ok_or_else(|| ExtractorError::InvalidFormat("No JSON object in response".to_string()))?;
    if end <= start {
        return Err(ExtractorError::InvalidFormat(
            "Malformed JSON object in response".to_string(),
        ));
    }
    Ok(&trimmed[start..=end])
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_fields_full() {
        let response = r#"{
            "invoiceNumber": "INV-001",
            "invoiceDate": "2024-01-10",
            "provider": "Acme Corp",
            "amount": "$120.00",
            "providerEmail": "billing@acme.com",
            "providerPhone": ""
        }"#;

        let fields = parse_fields(response).unwrap();
        assert_eq!(
            fields,
            ExtractedInvoice {
                invoice_number: "INV-001".to_string(),
                invoice_date: "2024-01-10".to_string(),
                provider: "Acme Corp".to_string(),
                amount: "$120.00".to_string(),
                provider_email: Some("billing@acme.com".to_string()),
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_parse_fields_with_markdown_wrapper() {
        let response = "```json\n{\"invoiceNumber\":\"7\",\"invoiceDate\":\"d\",\"provider\":\"p\",\"amount\":\"1\"}\n```";
        let fields = parse_fields(response).unwrap();
        assert_eq!(fields.invoice_number, "7");
    }

    #[test]
    fn test_parse_fields_with_reasoning_prefix() {
        let response = "<think>looking at the header</think>\nHere you go: {\"invoiceNumber\":\"7\",\"invoiceDate\":\"d\",\"provider\":\"p\",\"amount\":\"1\"} done";
        let fields = parse_fields(response).unwrap();
        assert_eq!(fields.provider, "p");
    }

    #[test]
    fn test_parse_fields_missing_required() {
        let response = r#"{"invoiceNumber": "1", "invoiceDate": "d", "provider": "p"}"#;
        let err = parse_fields(response).unwrap_err();
        assert!(matches!(err, ExtractorError::InvalidFormat(ref m) if m.contains("amount")));
    }

    #[test]
    fn test_parse_fields_non_string_required() {
        let response = r#"{"invoiceNumber": 1, "invoiceDate": "d", "provider": "p", "amount": "1"}"#;
        assert!(matches!(
            parse_fields(response),
            Err(ExtractorError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_parse_fields_blank_optionals_are_absent() {
        let response = r#"{
            "invoiceNumber": "9",
            "invoiceDate": "d",
            "provider": "p",
            "amount": "1",
            "providerAddress": "   ",
            "providerWebsite": null,
            "providerVatId": " DE123 "
        }"#;

        let fields = parse_fields(response).unwrap();
        assert_eq!(fields.provider_address, None);
        assert_eq!(fields.provider_website, None);
        assert_eq!(fields.provider_vat_id.as_deref(), Some("DE123"));
    }

    #[test]
    fn test_parse_invalid_json() {
        assert!(parse_fields("This is not JSON").is_err());
        assert!(matches!(
            parse_fields("{ not: valid }"),
            Err(ExtractorError::JsonParse(_))
        ));
    }

    #[test]
    fn test_parse_privacy() {
        let flagged = parse_privacy(
            r#"{"hasPrivacyConcerns": true, "privacyConcernsDetails": "Customer home address"}"#,
        )
        .unwrap();
        assert_eq!(flagged, PrivacyAssessment::flagged("Customer home address"));

        let clear = parse_privacy(r#"{"hasPrivacyConcerns": false}"#).unwrap();
        assert_eq!(clear, PrivacyAssessment::clear());
    }

    #[test]
    fn test_parse_privacy_missing_flag() {
        assert!(parse_privacy(r#"{"privacyConcernsDetails": ""}"#).is_err());
    }

    #[test]
    fn test_extract_json_empty_fence() {
        assert!(extract_json("```\n```").is_err());
    }
}
