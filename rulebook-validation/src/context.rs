//! Per-field state threaded through coercion and verb dispatch

use crate::{FieldError, TypeTag, Value};

/// Mutable state of one field while its rule string is evaluated.
///
/// Created fresh for every rule string. Once an error is recorded the field
/// stays failed; a later presence check may only replace the message.
#[derive(Debug, Clone)]
pub struct FieldContext {
    /// Field name, the first token of the rule
    pub name: String,
    /// Declared type, `any` when none was given
    pub type_tag: TypeTag,
    /// Current value; `None` while the key is absent from the document
    pub value: Option<Value>,
    /// Set by the `nullable` verb
    pub nullable: bool,
    /// Name of the verb being dispatched
    pub verb: String,
    /// Arguments of the verb being dispatched
    pub args: Vec<String>,
    /// Mime type captured from a `data:` URI by image coercion
    pub mime: Option<String>,
    error: Option<FieldError>,
}

impl FieldContext {
    pub fn new(name: impl Into<String>, value: Option<Value>) -> Self {
        Self {
            name: name.into(),
            type_tag: TypeTag::Any,
            value,
            nullable: false,
            verb: String::new(),
            args: Vec::new(),
            mime: None,
            error: None,
        }
    }

    /// Prepare the context for the next verb.
    pub(crate) fn begin(&mut self, verb: &str, args: Vec<String>) {
        self.verb.clear();
        self.verb.push_str(verb);
        self.args = args;
    }

    /// Mark the field failed with `error`.
    pub fn record(&mut self, error: FieldError) {
        self.error = Some(error);
    }

    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }

    pub fn error(&self) -> Option<&FieldError> {
        self.error.as_ref()
    }

    pub(crate) fn take_error(&mut self) -> Option<FieldError> {
        self.error.take()
    }

    /// Whether there is a value type verbs can inspect.
    pub fn has_value(&self) -> bool {
        matches!(&self.value, Some(value) if !value.is_null())
    }

    /// A failure of `kind` for this field.
    pub fn fail(&self, kind: &str) -> FieldError {
        FieldError::for_field(kind, &self.name)
    }

    /// The generic failure, for malformed verb usage.
    pub fn invalid(&self) -> FieldError {
        FieldError::invalid(&self.name)
    }

    /// Argument `index`, or the generic failure when missing.
    pub fn arg(&self, index: usize) -> Result<&str, FieldError> {
        self.args
            .get(index)
            .map(String::as_str)
            .ok_or_else(|| self.invalid())
    }

    /// Argument `index` parsed as a number.
    pub fn arg_f64(&self, index: usize) -> Result<f64, FieldError> {
        self.arg(index)?.parse().map_err(|_| self.invalid())
    }

    /// Argument `index` parsed as a count.
    pub fn arg_usize(&self, index: usize) -> Result<usize, FieldError> {
        self.arg(index)?.parse().map_err(|_| self.invalid())
    }

    /// The current value as text, for string verbs.
    pub fn text(&self) -> Result<&str, FieldError> {
        self.value
            .as_ref()
            .and_then(Value::as_str)
            .ok_or_else(|| self.invalid())
    }

    /// The current value as a number, for number verbs.
    pub fn number(&self) -> Result<f64, FieldError> {
        self.value
            .as_ref()
            .and_then(Value::as_f64)
            .ok_or_else(|| self.invalid())
    }
}
