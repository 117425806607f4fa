//! Interactive schema entry.

use crate::error::Result;
use crate::output::Formatter;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use schemaxtract_domain::SchemaSet;
use tracing::debug;

/// Number of schemas offered when the user just presses enter
const DEFAULT_SCHEMA_COUNT: usize = 3;

/// Ask for schema fields on the terminal.
///
/// Entries with an empty name or description are skipped, as are duplicate
/// names. Ctrl-D or Ctrl-C ends entry early.
pub fn prompt_schema(formatter: &Formatter) -> Result<SchemaSet> {
    println!("{}", formatter.info("Enter the name and description for each response schema."));

    let mut editor = DefaultEditor::new()?;
    read_schema(formatter, |prompt| match editor.readline(prompt) {
        Ok(line) => Ok(Some(line)),
        Err(ReadlineError::Eof) | Err(ReadlineError::Interrupted) => Ok(None),
        Err(e) => Err(e.into()),
    })
}

/// Schema entry loop over any line source; `None` means input ended.
pub fn read_schema<R>(formatter: &Formatter, mut read_line: R) -> Result<SchemaSet>
where
    R: FnMut(&str) -> Result<Option<String>>,
{
    let mut schema = SchemaSet::new();

    let count = loop {
        let prompt = format!("Number of response schemas [{}]: ", DEFAULT_SCHEMA_COUNT);
        let Some(line) = read_line(&prompt)? else {
            return Ok(schema);
        };
        let line = line.trim();
        if line.is_empty() {
            break DEFAULT_SCHEMA_COUNT;
        }
        match line.parse::<usize>() {
            Ok(n) if n >= 1 => break n,
            _ => eprintln!("{}", formatter.warning("Enter a whole number of at least 1")),
        }
    };

    for i in 1..=count {
        let Some(name) = read_line(&format!("Entity {} Name: ", i))? else {
            break;
        };
        let Some(description) = read_line(&format!("Entity {} Description: ", i))? else {
            break;
        };

        if !schema.add(&name, &description) {
            debug!("Skipped incomplete or duplicate schema entry {}", i);
        }
    }

    Ok(schema)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;

    fn scripted(lines: &[&str]) -> impl FnMut(&str) -> Result<Option<String>> {
        let mut lines: Vec<String> = lines.iter().rev().map(|s| s.to_string()).collect();
        move |_prompt| Ok(lines.pop())
    }

    fn formatter() -> Formatter {
        Formatter::new(OutputFormat::Table, false)
    }

    #[test]
    fn test_reads_requested_number_of_fields() {
        let schema = read_schema(
            &formatter(),
            scripted(&["2", "Invoice Number", "The invoice's unique ID", "Total", "The total amount due"]),
        )
        .unwrap();

        assert_eq!(schema.count(), 2);
        let names: Vec<&str> = schema.iter().map(|f| f.name()).collect();
        assert_eq!(names, vec!["Invoice Number", "Total"]);
    }

    #[test]
    fn test_incomplete_entries_skipped() {
        let schema = read_schema(
            &formatter(),
            scripted(&["3", "Invoice Number", "", "", "Orphan description", "Total", "Amount due"]),
        )
        .unwrap();

        assert_eq!(schema.count(), 1);
        assert!(schema.contains("Total"));
    }

    #[test]
    fn test_default_count_and_early_end() {
        let schema = read_schema(&formatter(), scripted(&["", "Total", "Amount due"])).unwrap();
        assert_eq!(schema.count(), 1);
    }

    #[test]
    fn test_invalid_count_asks_again() {
        let schema = read_schema(&formatter(), scripted(&["zero", "0", "1", "Total", "Amount due"])).unwrap();
        assert_eq!(schema.count(), 1);
    }

    #[test]
    fn test_no_input_gives_empty_schema() {
        let schema = read_schema(&formatter(), scripted(&[])).unwrap();
        assert!(schema.is_empty());
    }
}
