//! Prompt assembly for entity extraction

use crate::contract::FormatContract;

/// Opening line of every extraction prompt
const PREAMBLE: &str = "Answer the following questions using the docs provided:";

/// Delimiter placed around each document section
const DOC_DELIMITER: &str = "---";

/// Builds the prompt sent to the LLM for one request
pub struct PromptBuilder<'a> {
    documents: Vec<&'a str>,
    instructions: &'a str,
}

impl<'a> PromptBuilder<'a> {
    /// Create a builder around a contract's instructions
    pub fn new(contract: &'a FormatContract) -> Self {
        Self {
            documents: Vec::new(),
            instructions: contract.instructions(),
        }
    }

    /// Add one document section
    pub fn with_document(mut self, text: &'a str) -> Self {
        self.documents.push(text);
        self
    }

    /// Build the complete extraction prompt
    pub fn build(&self) -> String {
        let mut prompt = String::new();

        prompt.push_str(PREAMBLE);
        prompt.push_str("\n\n");

        for doc in &self.documents {
            prompt.push_str(DOC_DELIMITER);
            prompt.push('\n');
            prompt.push_str(doc.trim_end());
            prompt.push('\n');
        }
        if !self.documents.is_empty() {
            prompt.push_str(DOC_DELIMITER);
            prompt.push_str("\n\n");
        }

        prompt.push_str(self.instructions);
        prompt.push('\n');

        prompt
    }

    /// Prompt size without any document text, used for budgeting
    pub fn overhead(contract: &FormatContract) -> String {
        PromptBuilder::new(contract).build()
    }
}
