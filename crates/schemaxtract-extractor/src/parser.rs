//! Parse LLM output into per-field values

use crate::error::ExtractorError;
use crate::types::{FieldValue, FieldValues};
use schemaxtract_domain::SchemaField;
use serde_json::{Map, Value};
use tracing::{debug, warn};

/// Longest piece of the raw response quoted in a parse error
const SNIPPET_CHARS: usize = 80;

/// Parse a model response into one value per field
///
/// Accepts the `Name: value` line format the instructions ask for, and a
/// JSON object keyed by field name. Fields without a marker map to
/// `NotFound`; a response with no marker at all is a parse error.
pub fn parse_llm_response(
    fields: &[SchemaField],
    response: &str,
) -> Result<FieldValues, ExtractorError> {
    let body = strip_code_fence(response);

    let (mut values, markers) = match parse_json_object(body) {
        Some(object) => match_json_fields(fields, &object),
        None => match_lines(fields, body),
    };

    if markers == 0 {
        return Err(ExtractorError::Parse(format!(
            "no field markers in response: \"{}\"",
            snippet(response)
        )));
    }
    debug!("Matched {} of {} fields", markers, fields.len());

    for field in fields {
        if !values.contains_key(field.name()) {
            warn!("Field '{}' missing from model response", field.name());
            values.insert(field.name().to_string(), FieldValue::NotFound);
        }
    }

    Ok(values)
}

/// Return the body of the first Markdown code block, or the trimmed response
///
/// Text before the opening fence is dropped; a missing closing fence runs
/// to the end of the response.
fn strip_code_fence(response: &str) -> &str {
    let trimmed = response.trim();

    let Some(open) = trimmed.find("```") else {
        return trimmed;
    };
    let after_open = &trimmed[open + 3..];

    // Skip the info string (```text, ```json)
    let content = match after_open.find('\n') {
        Some(newline) => &after_open[newline + 1..],
        None => after_open,
    };

    match content.find("```") {
        Some(close) => content[..close].trim(),
        None => content.trim(),
    }
}

fn parse_json_object(body: &str) -> Option<Map<String, Value>> {
    if !body.starts_with('{') {
        return None;
    }
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(object)) => Some(object),
        _ => None,
    }
}

fn match_json_fields(fields: &[SchemaField], object: &Map<String, Value>) -> (FieldValues, usize) {
    let mut values = FieldValues::new();

    for field in fields {
        let entry = object.get(field.name()).or_else(|| {
            object
                .iter()
                .find(|(key, _)| key.trim().eq_ignore_ascii_case(field.name()))
                .map(|(_, value)| value)
        });

        if let Some(value) = entry {
            let answer = match value {
                Value::String(text) => FieldValue::from_answer(text),
                Value::Null => FieldValue::NotFound,
                other => FieldValue::from_answer(&other.to_string()),
            };
            values.insert(field.name().to_string(), answer);
        }
    }

    let markers = values.len();
    (values, markers)
}

fn match_lines(fields: &[SchemaField], body: &str) -> (FieldValues, usize) {
    // Longest names first so "Invoice Number" wins over "Invoice"
    let mut by_length: Vec<&SchemaField> = fields.iter().collect();
    by_length.sort_by(|a, b| b.name().len().cmp(&a.name().len()));

    let mut values = FieldValues::new();
    let mut markers = 0;

    for line in body.lines() {
        let line = strip_bullet(line.trim());

        let candidates: Vec<(&SchemaField, &str)> = by_length
            .iter()
            .filter_map(|field| match_marker(line, field.name()).map(|raw| (*field, raw)))
            .collect();

        // Exact-case marker first, then the first field still unanswered
        let hit = candidates
            .iter()
            .find(|(field, _)| marker_is_exact(line, field.name()))
            .or_else(|| candidates.iter().find(|(field, _)| !values.contains_key(field.name())))
            .or_else(|| candidates.first());

        if let Some((field, raw)) = hit {
            markers += 1;
            if !values.contains_key(field.name()) {
                values.insert(field.name().to_string(), clean_value(raw, field));
            }
        }
    }

    (values, markers)
}

fn strip_bullet(line: &str) -> &str {
    for bullet in ["- ", "* ", "• "] {
        if let Some(rest) = line.strip_prefix(bullet) {
            return rest.trim_start();
        }
    }
    line
}

/// Value text after `name:` when `line` starts with the field marker
fn match_marker<'a>(line: &'a str, name: &str) -> Option<&'a str> {
    let line = line.strip_prefix("**").unwrap_or(line);

    let n = name.len();
    if line.len() < n || !line.is_char_boundary(n) || !line[..n].eq_ignore_ascii_case(name) {
        return None;
    }

    let rest = &line[n..];
    let rest = rest.strip_prefix("**").unwrap_or(rest);
    let rest = rest.trim_start().strip_prefix(':')?;
    let rest = rest.strip_prefix("**").unwrap_or(rest);

    Some(rest.trim())
}

fn marker_is_exact(line: &str, name: &str) -> bool {
    line.strip_prefix("**").unwrap_or(line).starts_with(name)
}

fn clean_value(raw: &str, field: &SchemaField) -> FieldValue {
    let mut value = raw.trim();
    for quote in ['"', '\'', '`'] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            value = &value[1..value.len() - 1];
            break;
        }
    }

    // Template line echoed back unfilled
    let placeholder = format!("<{}>", field.description());
    if value == placeholder {
        return FieldValue::NotFound;
    }

    FieldValue::from_answer(value)
}

fn snippet(response: &str) -> String {
    let trimmed = response.trim();
    let mut snippet: String = trimmed.chars().take(SNIPPET_CHARS).collect();
    if trimmed.chars().count() > SNIPPET_CHARS {
        snippet.push_str("...");
    }
    snippet
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields() -> Vec<SchemaField> {
        vec![
            SchemaField::new("Invoice Number", "The invoice's unique ID").unwrap(),
            SchemaField::new("Total", "The total amount due").unwrap(),
        ]
    }

    fn found(value: &str) -> FieldValue {
        FieldValue::Found(value.to_string())
    }

    #[test]
    fn test_parse_plain_lines() {
        let values = parse_llm_response(&fields(), "Invoice Number: INV-2024-001\nTotal: $452.10").unwrap();

        assert_eq!(values.len(), 2);
        assert_eq!(values["Invoice Number"], found("INV-2024-001"));
        assert_eq!(values["Total"], found("$452.10"));
    }

    #[test]
    fn test_parse_missing_field_is_not_found() {
        let values = parse_llm_response(&fields(), "Invoice Number: INV-2024-001").unwrap();

        assert_eq!(values["Invoice Number"], found("INV-2024-001"));
        assert_eq!(values["Total"], FieldValue::NotFound);
    }

    #[test]
    fn test_parse_no_markers_is_error() {
        let result = parse_llm_response(&fields(), "I'm sorry, I cannot read this document.");

        match result {
            Err(ExtractorError::Parse(msg)) => assert!(msg.contains("I'm sorry")),
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_empty_response_is_error() {
        assert!(parse_llm_response(&fields(), "   ").is_err());
    }

    #[test]
    fn test_parse_with_markdown_wrapper() {
        let response = "Here you go:\n```text\nInvoice Number: INV-7\nTotal: 12.00\n```\nLet me know!";
        let values = parse_llm_response(&fields(), response).unwrap();

        assert_eq!(values["Invoice Number"], found("INV-7"));
        assert_eq!(values["Total"], found("12.00"));
    }

    #[test]
    fn test_parse_lenient_markers() {
        let response = "- **invoice number:** \"INV-9\"\n* TOTAL : `$3`";
        let values = parse_llm_response(&fields(), response).unwrap();

        assert_eq!(values["Invoice Number"], found("INV-9"));
        assert_eq!(values["Total"], found("$3"));
    }

    #[test]
    fn test_parse_sentinel_and_placeholder() {
        let response = "Invoice Number: Not Found\nTotal: <The total amount due>";
        let values = parse_llm_response(&fields(), response).unwrap();

        assert_eq!(values["Invoice Number"], FieldValue::NotFound);
        assert_eq!(values["Total"], FieldValue::NotFound);
    }

    #[test]
    fn test_first_occurrence_wins() {
        let response = "Total: $10\nTotal: $20";
        let values = parse_llm_response(&fields(), response).unwrap();

        assert_eq!(values["Total"], found("$10"));
    }

    #[test]
    fn test_longest_name_matched_first() {
        let fields = vec![
            SchemaField::new("Invoice", "Whether this is an invoice").unwrap(),
            SchemaField::new("Invoice Date", "Date of issue").unwrap(),
        ];
        let values = parse_llm_response(&fields, "Invoice Date: 2024-03-01\nInvoice: yes").unwrap();

        assert_eq!(values["Invoice Date"], found("2024-03-01"));
        assert_eq!(values["Invoice"], found("yes"));
    }

    #[test]
    fn test_prefix_of_other_word_does_not_match() {
        let values = parse_llm_response(&fields(), "Totals: 5\nInvoice Number: A1").unwrap();
        assert_eq!(values["Total"], FieldValue::NotFound);
    }

    #[test]
    fn test_value_keeps_inner_colons() {
        let values = parse_llm_response(&fields(), "Invoice Number: REF: 12:30").unwrap();
        assert_eq!(values["Invoice Number"], found("REF: 12:30"));
    }

    #[test]
    fn test_parse_json_object() {
        let response = "```json\n{\"invoice number\": \"INV-1\", \"Total\": 452.1}\n```";
        let values = parse_llm_response(&fields(), response).unwrap();

        assert_eq!(values["Invoice Number"], found("INV-1"));
        assert_eq!(values["Total"], found("452.1"));
    }

    #[test]
    fn test_parse_json_null_is_not_found() {
        let values = parse_llm_response(&fields(), r#"{"Invoice Number": "A", "Total": null}"#).unwrap();
        assert_eq!(values["Total"], FieldValue::NotFound);
    }

    #[test]
    fn test_parse_json_without_known_keys_is_error() {
        let result = parse_llm_response(&fields(), r#"{"answer": "nothing"}"#);
        assert!(matches!(result, Err(ExtractorError::Parse(_))));
    }

    #[test]
    fn test_names_differing_only_in_case() {
        let fields = vec![
            SchemaField::new("total", "Subtotal before tax").unwrap(),
            SchemaField::new("Total", "Grand total").unwrap(),
        ];

        let values = parse_llm_response(&fields, "total: $400\nTotal: $452.10").unwrap();
        assert_eq!(values["total"], found("$400"));
        assert_eq!(values["Total"], found("$452.10"));

        // Declaration order reversed in the answer
        let values = parse_llm_response(&fields, "Total: $452.10\ntotal: $400").unwrap();
        assert_eq!(values["total"], found("$400"));
        assert_eq!(values["Total"], found("$452.10"));
    }

    #[test]
    fn test_case_mismatch_fills_unanswered_field() {
        let fields = vec![
            SchemaField::new("total", "Subtotal before tax").unwrap(),
            SchemaField::new("Total", "Grand total").unwrap(),
        ];

        let values = parse_llm_response(&fields, "total: $400\nTOTAL: $452.10").unwrap();
        assert_eq!(values["total"], found("$400"));
        assert_eq!(values["Total"], found("$452.10"));
    }

    #[test]
    fn test_snippet_truncates() {
        let long = "x".repeat(200);
        let s = snippet(&long);
        assert_eq!(s.chars().count(), SNIPPET_CHARS + 3);
        assert!(s.ends_with("..."));
    }
}
