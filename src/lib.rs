// Rulebook - rule-string validation for JSON documents
//
// Re-exports the engine, the message catalog and the logging macros so an
// application needs a single dependency.

// Re-export the validation engine
pub use rulebook_validation::*;

// Re-export member crates
pub use rulebook_i18n;
pub use rulebook_log;
pub use rulebook_validation;

// Prelude for common imports
pub mod prelude {
    pub use crate::{
        Document, FieldErrors, TypeTag, ValidateError, Validator, ValidatorConfig, Value, Values,
        VerbRegistry, validate,
    };
    pub use rulebook_i18n::{Catalog, Locale, MessageBundle};
}
