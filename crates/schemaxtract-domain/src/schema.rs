//! Schema module - the user-declared entities to extract

use std::fmt;

/// One entity the user wants extracted from a document
///
/// Names are used verbatim as parser keys, so they are trimmed and may not
/// contain line breaks. Descriptions are normalized to a single line.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SchemaField {
    name: String,
    description: String,
}

impl SchemaField {
    /// Create a new schema field
    ///
    /// # Errors
    /// Returns error if the name or description is empty, or the name spans lines
    ///
    /// # Examples
    ///
    /// ```
    /// use schemaxtract_domain::SchemaField;
    ///
    /// let field = SchemaField::new("Total", "The total\n amount due").unwrap();
    /// assert_eq!(field.name(), "Total");
    /// assert_eq!(field.description(), "The total amount due");
    /// ```
    pub fn new(name: impl AsRef<str>, description: impl AsRef<str>) -> Result<Self, String> {
        let name = name.as_ref().trim();
        if name.is_empty() {
            return Err("Schema field name cannot be empty".to_string());
        }
        if name.contains(['\n', '\r']) {
            return Err(format!("Schema field name '{}' cannot span multiple lines", name.escape_debug()));
        }

        let description = description
            .as_ref()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");
        if description.is_empty() {
            return Err(format!("Schema field '{}' needs a description", name));
        }

        Ok(Self {
            name: name.to_string(),
            description,
        })
    }

    /// Field name, used as the key in the model's answer
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Natural-language description of what to extract
    pub fn description(&self) -> &str {
        &self.description
    }
}

impl fmt::Display for SchemaField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.description)
    }
}

/// Ordered collection of schema fields for one extraction request
///
/// Insertion order is the display and output order. Names are unique.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaSet {
    fields: Vec<SchemaField>,
}

impl SchemaSet {
    /// Create an empty schema set
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field, silently skipping invalid or duplicate entries
    ///
    /// Returns whether the field was added.
    ///
    /// # Examples
    ///
    /// ```
    /// use schemaxtract_domain::SchemaSet;
    ///
    /// let mut schema = SchemaSet::new();
    /// assert!(schema.add("Invoice Number", "The invoice's unique ID"));
    /// assert!(!schema.add("Invoice Number", "Again"));
    /// assert!(!schema.add("Total", ""));
    /// assert_eq!(schema.count(), 1);
    /// ```
    pub fn add(&mut self, name: impl AsRef<str>, description: impl AsRef<str>) -> bool {
        self.try_add(name, description).is_ok()
    }

    /// Add a field, reporting why it was rejected
    ///
    /// # Errors
    /// Returns error if the field is invalid or its name is already present
    pub fn try_add(&mut self, name: impl AsRef<str>, description: impl AsRef<str>) -> Result<(), String> {
        let field = SchemaField::new(name, description)?;
        if self.contains(field.name()) {
            return Err(format!("Duplicate schema field '{}'", field.name()));
        }
        self.fields.push(field);
        Ok(())
    }

    /// Number of fields
    pub fn count(&self) -> usize {
        self.fields.len()
    }

    /// Whether the set has no fields
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Whether a field with exactly this name exists
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Look up a field by exact name
    pub fn get(&self, name: &str) -> Option<&SchemaField> {
        self.fields.iter().find(|f| f.name() == name)
    }

    /// Iterate fields in declaration order
    pub fn iter(&self) -> std::slice::Iter<'_, SchemaField> {
        self.fields.iter()
    }

    /// Fields in declaration order
    pub fn fields(&self) -> &[SchemaField] {
        &self.fields
    }

    /// Check that extraction may proceed
    ///
    /// # Errors
    /// Returns error if the set has no fields
    pub fn ensure_ready(&self) -> Result<(), String> {
        if self.fields.is_empty() {
            return Err("At least one schema field is required".to_string());
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a SchemaSet {
    type Item = &'a SchemaField;
    type IntoIter = std::slice::Iter<'a, SchemaField>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_creation_trims() {
        let field = SchemaField::new("  Invoice Number ", " The invoice's unique ID ").unwrap();
        assert_eq!(field.name(), "Invoice Number");
        assert_eq!(field.description(), "The invoice's unique ID");
    }

    #[test]
    fn test_field_rejects_empty_parts() {
        assert!(SchemaField::new("", "desc").is_err());
        assert!(SchemaField::new("   ", "desc").is_err());
        assert!(SchemaField::new("Name", "").is_err());
        assert!(SchemaField::new("Name", " \n\t ").is_err());
    }

    #[test]
    fn test_field_rejects_multiline_name() {
        assert!(SchemaField::new("Due\nDate", "When payment is due").is_err());
    }

    #[test]
    fn test_description_collapses_whitespace() {
        let field = SchemaField::new("Total", "The total\n\namount   due").unwrap();
        assert_eq!(field.description(), "The total amount due");
    }

    #[test]
    fn test_set_preserves_insertion_order() {
        let mut schema = SchemaSet::new();
        schema.add("Zeta", "last letter");
        schema.add("Alpha", "first letter");
        schema.add("Mu", "middle letter");

        let names: Vec<_> = schema.iter().map(|f| f.name()).collect();
        assert_eq!(names, vec!["Zeta", "Alpha", "Mu"]);
    }

    #[test]
    fn test_set_rejects_duplicates() {
        let mut schema = SchemaSet::new();
        assert!(schema.add("Total", "The total amount due"));
        assert!(!schema.add("Total", "Another total"));
        assert!(!schema.add(" Total ", "Trimmed duplicate"));

        let err = schema.try_add("Total", "Once more").unwrap_err();
        assert!(err.contains("Duplicate"));
        assert_eq!(schema.count(), 1);
        assert_eq!(schema.get("Total").unwrap().description(), "The total amount due");
    }

    #[test]
    fn test_set_names_are_case_sensitive() {
        let mut schema = SchemaSet::new();
        assert!(schema.add("total", "lowercase"));
        assert!(schema.add("Total", "capitalized"));
        assert_eq!(schema.count(), 2);
    }

    #[test]
    fn test_ensure_ready() {
        let mut schema = SchemaSet::new();
        assert!(schema.ensure_ready().is_err());
        schema.add("Total", "The total amount due");
        assert!(schema.ensure_ready().is_ok());
    }
}
