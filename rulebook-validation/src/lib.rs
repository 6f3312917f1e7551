//! Rule-string validation for JSON documents
//!
//! Each field is declared with one rule string: the field name, an optional
//! type tag and a chain of verbs.
//!
//! ```text
//! age number required greaterThan(18) lessThanOrEqual(65)
//! email(string) required email
//! code string regex(^[A-Z]\,[0-9]+$)
//! ```
//!
//! # Examples
//!
//! ## One-off validation
//!
//! ```
//! use rulebook_validation::{validate, ValidateError, Value};
//!
//! let values = validate(
//!     r#"{"name": "Ali", "age": "25"}"#,
//!     &["name string required between(2,20)", "age number integer"],
//! )
//! .unwrap();
//! assert_eq!(values["age"], Value::Integer(25));
//!
//! let err = validate(r#"{"age": 15}"#, &["age number greaterThan(18)"]).unwrap_err();
//! let errors = err.field_errors().unwrap();
//! assert_eq!(errors.get("age"), Some("The age must be greater than 18."));
//! ```
//!
//! ## Reusable validator
//!
//! ```
//! use rulebook_validation::{Validator, ValidatorConfig};
//!
//! let validator = Validator::from_config(&ValidatorConfig::new().with_locale("fa")).unwrap();
//! let err = validator.validate("{}", &["name required"]).unwrap_err();
//! assert_eq!(err.field_errors().unwrap().get("name"), Some("فیلد نام الزامی است."));
//! ```

mod chain;
mod coerce;
mod config;
mod context;
mod date;
mod engine;
mod errors;
mod national;
mod value;
mod verbs;

pub use chain::{Call, RuleChain, scan};
pub use coerce::{TypeTag, coerce, parse_number};
pub use config::ValidatorConfig;
pub use context::FieldContext;
pub use date::{parse_date_phrase, parse_date_phrase_at};
pub use engine::{Validator, Values};
pub use errors::{FieldError, FieldErrors, Param, ValidateError};
pub use national::is_valid_national_code;
pub use value::{Document, Value, document_from_json};
pub use verbs::{DateVerb, NumberVerb, SharedVerb, StringVerb, VerbFn, VerbRegistry, VerbTable};

use once_cell::sync::Lazy;

static DEFAULT_VALIDATOR: Lazy<Validator> = Lazy::new(Validator::default);

/// Validate a JSON document with the built-in verbs and English messages.
pub fn validate<R: AsRef<str>>(raw: &str, rules: &[R]) -> Result<Values, ValidateError> {
    DEFAULT_VALIDATOR.validate(raw, rules)
}

/// The validator behind [`validate`].
pub fn default_validator() -> &'static Validator {
    &DEFAULT_VALIDATOR
}
