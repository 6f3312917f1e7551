// Validation errors

use rulebook_i18n::Catalog;
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

/// Failure of a whole validation run.
#[derive(Debug, Clone, Error)]
pub enum ValidateError {
    /// The input is not a JSON object; nothing was validated
    #[error("malformed request: {0}")]
    MalformedInput(String),

    /// At least one field failed
    #[error("validation failed: {0}")]
    Failed(FieldErrors),
}

impl ValidateError {
    /// The per-field messages of a failed run.
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            ValidateError::Failed(errors) => Some(errors),
            ValidateError::MalformedInput(_) => None,
        }
    }
}

/// Parameter of a [`FieldError`] message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Param {
    /// A field name, shown through the catalog's attribute aliases
    Attribute(String),
    /// Field names, each aliased, joined with `, `
    Attributes(Vec<String>),
    /// Literal text
    Text(String),
}

/// Failure of a single verb or of type coercion.
///
/// Carries the message kind and its parameters; the engine renders it
/// through the message catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Catalog key, e.g. `string.email`
    pub kind: String,
    pub params: Vec<Param>,
}

impl FieldError {
    /// A failure without parameters.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            params: Vec::new(),
        }
    }

    /// A failure whose first parameter is the field itself.
    pub fn for_field(kind: impl Into<String>, field: &str) -> Self {
        Self::new(kind).with_attribute(field)
    }

    /// The generic "field is invalid" failure.
    pub fn invalid(field: &str) -> Self {
        Self::for_field(rulebook_i18n::FALLBACK_KIND, field)
    }

    /// Append a field-name parameter.
    pub fn with_attribute(mut self, field: impl Into<String>) -> Self {
        self.params.push(Param::Attribute(field.into()));
        self
    }

    /// Append a list of field names as one parameter.
    pub fn with_attributes<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.params
            .push(Param::Attributes(fields.into_iter().map(Into::into).collect()));
        self
    }

    /// Append a literal parameter.
    pub fn with_text(mut self, text: impl ToString) -> Self {
        self.params.push(Param::Text(text.to_string()));
        self
    }

    /// Render the message in the catalog's default locale.
    pub fn render(&self, catalog: &Catalog) -> String {
        let args: Vec<String> = self
            .params
            .iter()
            .map(|param| match param {
                Param::Attribute(field) => catalog.attribute(field),
                Param::Attributes(fields) => fields
                    .iter()
                    .map(|field| catalog.attribute(field))
                    .collect::<Vec<_>>()
                    .join(", "),
                Param::Text(text) => text.clone(),
            })
            .collect();
        catalog.format(&self.kind, &args)
    }
}

/// Messages of the failed fields of a run, one per field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    errors: BTreeMap<String, String>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Record the message of a field, replacing an earlier one.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.insert(field.into(), message.into());
    }

    /// Message of a field.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.errors.contains_key(field)
    }

    /// Fields and messages ordered by field name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.errors.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn into_map(self) -> BTreeMap<String, String> {
        self.errors
    }

    /// JSON object of field to message.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.errors
                .iter()
                .map(|(field, message)| (field.clone(), serde_json::Value::String(message.clone())))
                .collect(),
        )
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in &self.errors {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", field, message)?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for FieldErrors {}

impl From<BTreeMap<String, String>> for FieldErrors {
    fn from(errors: BTreeMap<String, String>) -> Self {
        Self { errors }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rulebook_i18n::{Locale, MessageBundle};

    #[test]
    fn test_render_resolves_attributes() {
        let catalog = Catalog::new();
        let mut bundle = MessageBundle::new();
        bundle.add("requiredWith", "{1} needs {0}");
        bundle.add_attribute("age", "Age");
        catalog.add_bundle(&Locale::en(), bundle);

        let error = FieldError::new("requiredWith")
            .with_text("Age|name")
            .with_attribute("age");
        assert_eq!(error.render(&catalog), "Age needs Age|name");
    }

    #[test]
    fn test_render_aliases_each_listed_field() {
        let catalog = Catalog::new();
        let mut bundle = MessageBundle::new();
        bundle.add("requiredWithAll", "{1} needs {0}");
        bundle.add_attribute("dob", "Date of birth");
        bundle.add_attribute("tel", "Phone");
        catalog.add_bundle(&Locale::en(), bundle);

        let error = FieldError::new("requiredWithAll")
            .with_attributes(["dob", "email", "tel"])
            .with_attribute("name");
        assert_eq!(error.render(&catalog), "name needs Date of birth, email, Phone");
    }

    #[test]
    fn test_invalid_uses_none_kind() {
        let error = FieldError::invalid("x");
        assert_eq!(error.kind, "none");
        assert_eq!(error.params, vec![Param::Attribute("x".into())]);
    }

    #[test]
    fn test_field_errors_json_and_display() {
        let mut errors = FieldErrors::new();
        errors.add("name", "The name field is required.");
        errors.add("age", "The age must be a number.");

        assert_eq!(errors.len(), 2);
        assert_eq!(errors.get("age"), Some("The age must be a number."));
        assert_eq!(
            errors.to_json(),
            serde_json::json!({
                "age": "The age must be a number.",
                "name": "The name field is required."
            })
        );
        assert_eq!(
            errors.to_string(),
            "age: The age must be a number.; name: The name field is required."
        );
    }

    #[test]
    fn test_validate_error_display() {
        let err = ValidateError::MalformedInput("expected value at line 1".into());
        assert_eq!(err.to_string(), "malformed request: expected value at line 1");
        assert!(err.field_errors().is_none());

        let mut errors = FieldErrors::new();
        errors.add("a", "bad");
        let err = ValidateError::Failed(errors);
        assert_eq!(err.to_string(), "validation failed: a: bad");
        assert_eq!(err.field_errors().unwrap().get("a"), Some("bad"));
    }
}
