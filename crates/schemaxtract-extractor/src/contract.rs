//! Format contract: instructions telling the model how to answer, paired
//! with the parser that reads the answer back

use crate::error::ExtractorError;
use crate::parser::parse_llm_response;
use crate::types::FieldValues;
use schemaxtract_domain::{SchemaField, SchemaSet};

/// Formatting instructions and the matching parser for one schema set
///
/// Built deterministically: the same schema set always yields the same
/// instructions.
#[derive(Debug, Clone)]
pub struct FormatContract {
    fields: Vec<SchemaField>,
    instructions: String,
}

impl FormatContract {
    /// Build the contract for a schema set
    pub fn build(schema: &SchemaSet) -> Self {
        let mut instructions = String::new();

        instructions.push_str(FORMAT_RULES);
        instructions.push_str("\n\n");
        instructions.push_str(TEMPLATE_INTRO);
        instructions.push_str("\n\n```text\n");
        for field in schema {
            instructions.push_str(&format!("{}: <{}>\n", field.name(), field.description()));
        }
        instructions.push_str("```\n\n");
        instructions.push_str(FORMAT_REMINDER);

        Self {
            fields: schema.fields().to_vec(),
            instructions,
        }
    }

    /// Text to embed in the prompt
    pub fn instructions(&self) -> &str {
        &self.instructions
    }

    /// Fields the contract covers, in declaration order
    pub fn fields(&self) -> &[SchemaField] {
        &self.fields
    }

    /// Parse a model answer into one value per field
    ///
    /// # Errors
    /// Returns `ExtractorError::Parse` when the answer has no recognizable field marker
    pub fn parse(&self, raw: &str) -> Result<FieldValues, ExtractorError> {
        parse_llm_response(&self.fields, raw)
    }
}

const FORMAT_RULES: &str = r#"The output should be a plain-text block with exactly one line per entity, in the order listed below.
Each line must have the form `<entity name>: <value>`: the entity name exactly as written, a colon, a space, then the value.
Keep every value on a single line.
If the documents do not contain a value for an entity, write `not found` as its value.
Do not add numbering, explanations or any other text."#;

const TEMPLATE_INTRO: &str =
    "Fill in this template, replacing each description in angle brackets with the value you extracted:";

const FORMAT_REMINDER: &str =
    "Remember: return ONLY the filled-in lines, with the angle brackets removed.";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FieldValue;

    fn invoice_schema() -> SchemaSet {
        let mut schema = SchemaSet::new();
        schema.add("Invoice Number", "The invoice's unique ID");
        schema.add("Total", "The total amount due");
        schema
    }

    #[test]
    fn test_instructions_list_fields_in_order() {
        let contract = FormatContract::build(&invoice_schema());
        let instructions = contract.instructions();

        let first = instructions.find("Invoice Number: <The invoice's unique ID>").unwrap();
        let second = instructions.find("Total: <The total amount due>").unwrap();
        assert!(first < second);
    }

    #[test]
    fn test_instructions_mention_each_field_once() {
        let contract = FormatContract::build(&invoice_schema());
        let instructions = contract.instructions();

        for field in contract.fields() {
            assert_eq!(instructions.matches(field.name()).count(), 1, "name {}", field.name());
            assert_eq!(instructions.matches(field.description()).count(), 1);
        }
    }

    #[test]
    fn test_instructions_document_sentinel_and_example() {
        let contract = FormatContract::build(&invoice_schema());
        assert!(contract.instructions().contains("`not found`"));
        assert!(contract.instructions().contains("```text\n"));
    }

    #[test]
    fn test_build_is_deterministic() {
        let a = FormatContract::build(&invoice_schema());
        let b = FormatContract::build(&invoice_schema());
        assert_eq!(a.instructions(), b.instructions());
    }

    #[test]
    fn test_parse_uses_contract_fields() {
        let contract = FormatContract::build(&invoice_schema());
        let values = contract.parse("Invoice Number: INV-2024-001\nTotal: $452.10").unwrap();

        assert_eq!(values["Invoice Number"], FieldValue::Found("INV-2024-001".to_string()));
        assert_eq!(values["Total"], FieldValue::Found("$452.10".to_string()));
    }

    #[test]
    fn test_filled_template_parses_back() {
        let contract = FormatContract::build(&invoice_schema());

        // Fill the template exactly as documented
        let filled: String = contract
            .fields()
            .iter()
            .map(|f| format!("{}: value of {}\n", f.name(), f.name().to_lowercase()))
            .collect();
        let values = contract.parse(&format!("```text\n{}```", filled)).unwrap();

        assert_eq!(values["Invoice Number"].as_str(), "value of invoice number");
        assert_eq!(values["Total"].as_str(), "value of total");
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: each field has exactly one template line
        #[test]
        fn test_template_lists_each_field_once(
            entries in prop::collection::vec(("[A-Za-z]{1,8}", "[a-z]{1,10}( [a-z]{1,10}){0,3}"), 1..8)
        ) {
            let mut schema = SchemaSet::new();
            for (word, description) in &entries {
                schema.add(word.as_str(), description.as_str());
            }

            let contract = FormatContract::build(&schema);
            for field in schema.iter() {
                let marker = format!("{}: <", field.name());
                let template_line = format!("{}: <{}>", field.name(), field.description());
                let lines: Vec<&str> = contract
                    .instructions()
                    .lines()
                    .filter(|line| line.starts_with(&marker))
                    .collect();
                prop_assert_eq!(lines, vec![template_line.as_str()]);
            }
        }

        /// Property: a template filled per the instructions parses back exactly
        #[test]
        fn test_documented_format_round_trips(
            values in prop::collection::vec("[A-Za-z0-9$.,/-][A-Za-z0-9 $.,/-]{0,20}[A-Za-z0-9$.,/-]", 1..6)
        ) {
            let mut schema = SchemaSet::new();
            for i in 0..values.len() {
                schema.add(format!("Field {}", i), format!("value number {}", i));
            }
            let contract = FormatContract::build(&schema);

            let response: String = values
                .iter()
                .enumerate()
                .map(|(i, v)| format!("Field {}: {}\n", i, v))
                .collect();
            let parsed = contract.parse(&response).unwrap();

            for (i, v) in values.iter().enumerate() {
                let expected = crate::types::FieldValue::from_answer(v);
                prop_assert_eq!(&parsed[&format!("Field {}", i)], &expected);
            }
        }
    }
}
