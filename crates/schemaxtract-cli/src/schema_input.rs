//! Building the schema set from command-line flags, files and prompts.

use crate::cli::SchemaArgs;
use crate::error::{CliError, Result};
use crate::interactive;
use crate::output::Formatter;
use schemaxtract_domain::SchemaSet;
use schemaxtract_extractor::ExtractorError;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// One field entry in a schema file.
#[derive(Debug, Deserialize)]
struct FieldDefinition {
    name: String,
    description: String,
}

/// Schema file layout: `[[fields]]` tables in TOML, `{"fields": [...]}` in JSON.
#[derive(Debug, Deserialize)]
struct SchemaFile {
    fields: Vec<FieldDefinition>,
}

/// JSON files may also be a bare array of fields.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum JsonSchemaFile {
    List(Vec<FieldDefinition>),
    Wrapped(SchemaFile),
}

/// Collect schema fields from every source in `args`.
///
/// File fields come first, then `--field` flags, then interactive entries.
/// The resulting set must hold at least one field.
pub fn load_schema(args: &SchemaArgs, formatter: &Formatter) -> Result<SchemaSet> {
    let mut schema = SchemaSet::new();

    if let Some(path) = &args.schema {
        for field in read_schema_file(path)? {
            schema
                .try_add(&field.name, &field.description)
                .map_err(|e| CliError::InvalidInput(format!("{}: {}", path.display(), e)))?;
        }
    }

    for flag in &args.fields {
        let (name, description) = parse_field_flag(flag)?;
        schema.try_add(name, description).map_err(CliError::InvalidInput)?;
    }

    if args.interactive {
        for field in interactive::prompt_schema(formatter)?.iter() {
            // Invalid or duplicate interactive entries are dropped silently
            schema.add(field.name(), field.description());
        }
    }

    schema
        .ensure_ready()
        .map_err(|e| ExtractorError::Validation(format!("{} (use --field, --schema or --interactive)", e)))?;
    Ok(schema)
}

/// Split a `Name=Description` flag value.
fn parse_field_flag(flag: &str) -> Result<(&str, &str)> {
    flag.split_once('=').ok_or_else(|| {
        CliError::InvalidInput(format!("Field '{}' must have the form Name=Description", flag))
    })
}

fn read_schema_file(path: &Path) -> Result<Vec<FieldDefinition>> {
    let contents = fs::read_to_string(path)?;

    let is_toml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));

    if is_toml {
        let file: SchemaFile = toml::from_str(&contents)?;
        Ok(file.fields)
    } else {
        match serde_json::from_str::<JsonSchemaFile>(&contents)? {
            JsonSchemaFile::List(fields) => Ok(fields),
            JsonSchemaFile::Wrapped(file) => Ok(file.fields),
        }
    }
}
