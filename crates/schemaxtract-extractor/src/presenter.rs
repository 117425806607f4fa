//! Tabular rows and JSON export for extraction results

use crate::error::ExtractorError;
use crate::types::ExtractionResult;
use schemaxtract_domain::SchemaSet;
use serde::{Deserialize, Serialize};

/// One output row: a schema field and the model's answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultRow {
    /// Schema field name
    #[serde(rename = "Entity Name")]
    pub entity_name: String,

    /// Extracted value, or the `not found` sentinel
    #[serde(rename = "Response")]
    pub response: String,
}

/// Rows in schema declaration order
pub fn to_rows(schema: &SchemaSet, result: &ExtractionResult) -> Vec<ResultRow> {
    schema
        .iter()
        .map(|field| ResultRow {
            entity_name: field.name().to_string(),
            response: result.get(field.name()).as_str().to_string(),
        })
        .collect()
}

/// Compact JSON array of row objects
pub fn to_json(rows: &[ResultRow]) -> Result<String, ExtractorError> {
    Ok(serde_json::to_string(rows)?)
}

/// Indented JSON array of row objects
pub fn to_json_pretty(rows: &[ResultRow]) -> Result<String, ExtractorError> {
    Ok(serde_json::to_string_pretty(rows)?)
}

/// Parse rows back from JSON
pub fn from_json(json: &str) -> Result<Vec<ResultRow>, ExtractorError> {
    Ok(serde_json::from_str(json)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RequestMode;
    use crate::types::{ExtractionMetadata, FieldValue, FieldValues};

    fn result(values: FieldValues) -> ExtractionResult {
        ExtractionResult {
            values,
            metadata: ExtractionMetadata {
                model_name: "mock".to_string(),
                mode: RequestMode::Single,
                chunk_count: 1,
                requests_completed: 1,
                processing_time_ms: 3,
            },
        }
    }

    #[test]
    fn test_rows_follow_schema_order() {
        let mut schema = SchemaSet::new();
        schema.add("Zeta", "last letter");
        schema.add("Alpha", "first letter");
        schema.add("Mu", "middle letter");

        let mut values = FieldValues::new();
        values.insert("Mu".to_string(), FieldValue::Found("m".to_string()));
        values.insert("Alpha".to_string(), FieldValue::Found("a".to_string()));
        values.insert("Zeta".to_string(), FieldValue::NotFound);

        let names: Vec<String> = to_rows(&schema, &result(values))
            .into_iter()
            .map(|row| row.entity_name)
            .collect();
        assert_eq!(names, vec!["Zeta", "Alpha", "Mu"]);
    }

    #[test]
    fn test_json_shape() {
        let rows = vec![ResultRow {
            entity_name: "Total".to_string(),
            response: "not found".to_string(),
        }];

        assert_eq!(to_json(&rows).unwrap(), r#"[{"Entity Name":"Total","Response":"not found"}]"#);
    }

    #[test]
    fn test_json_round_trip_with_escapes() {
        let rows = vec![
            ResultRow {
                entity_name: "Quote \"A\"".to_string(),
                response: "line\nbreak, ünïcode".to_string(),
            },
            ResultRow {
                entity_name: "Empty".to_string(),
                response: String::new(),
            },
        ];

        assert_eq!(from_json(&to_json(&rows).unwrap()).unwrap(), rows);
        assert_eq!(from_json(&to_json_pretty(&rows).unwrap()).unwrap(), rows);
    }

    #[test]
    fn test_from_json_rejects_other_shapes() {
        assert!(matches!(from_json(r#"{"a": 1}"#), Err(ExtractorError::JsonParse(_))));
    }
}
