//! Instructions command implementation.

use crate::cli::InstructionsArgs;
use crate::config::OutputFormat;
use crate::error::Result;
use crate::output::Formatter;
use crate::schema_input::load_schema;
use schemaxtract_extractor::FormatContract;

/// Execute the instructions command.
pub async fn execute_instructions(args: InstructionsArgs, formatter: &Formatter) -> Result<()> {
    let schema = load_schema(&args.schema, formatter)?;
    let contract = FormatContract::build(&schema);

    match formatter.format() {
        OutputFormat::Json => {
            let fields: Vec<serde_json::Value> = contract
                .fields()
                .iter()
                .map(|f| serde_json::json!({ "name": f.name(), "description": f.description() }))
                .collect();
            let json = serde_json::json!({
                "fields": fields,
                "instructions": contract.instructions(),
            });
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
        _ => println!("{}", contract.instructions()),
    }

    Ok(())
}
