//! Localized messages for rulebook validation errors
//!
//! - **Catalog**: locale-aware lookup of message templates with fallback
//! - **Bundles**: JSON message files, nested keys flatten to `kind.sub`
//! - **Attributes**: display aliases for field names (`attributes.<field>`)
//! - **Formatting**: positional `{0}` placeholders, date and number rendering
//!
//! # Quick Start
//!
//! ```rust
//! use rulebook_i18n::{Catalog, Locale};
//!
//! let catalog = Catalog::builtin();
//!
//! let msg = catalog.format("number.greaterThan", &["age", "18"]);
//! assert_eq!(msg, "The age must be greater than 18.");
//!
//! let msg = catalog.format_in(&Locale::fa(), "required", &[catalog.attribute_in(&Locale::fa(), "name")]);
//! assert_eq!(msg, "فیلد نام الزامی است.");
//! ```

mod error;
mod format;
mod locale;
mod messages;

pub use error::I18nError;
pub use format::{format_date, format_number, interpolate};
pub use locale::Locale;
pub use messages::{Catalog, FALLBACK_KIND, MessageBundle};

/// Result type for catalog operations
pub type Result<T> = std::result::Result<T, I18nError>;
