//! Message bundles and the validation message catalog.

use crate::format::interpolate;
use crate::{I18nError, Locale, Result};
use parking_lot::RwLock;
use rulebook_log::{debug, warn};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

/// Key of the template used when a message kind is unknown.
pub const FALLBACK_KIND: &str = "none";

/// Prefix of field-name alias entries inside a bundle.
const ATTRIBUTE_PREFIX: &str = "attributes.";

static BUILTIN_EN: &str = include_str!("../locales/en.json");
static BUILTIN_FA: &str = include_str!("../locales/fa.json");

/// Messages of a single locale, keyed by dotted message kind.
#[derive(Debug, Clone, Default)]
pub struct MessageBundle {
    messages: HashMap<String, String>,
}

impl MessageBundle {
    /// Create an empty bundle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a bundle from a JSON object.
    ///
    /// Nested objects flatten into dotted keys, so
    /// `{"type": {"string": "..."}}` defines `type.string`.
    pub fn from_json(json: &str) -> Result<Self> {
        let data: serde_json::Value = serde_json::from_str(json)?;
        let serde_json::Value::Object(root) = data else {
            return Err(I18nError::ParseError(
                "message file must contain a JSON object".to_string(),
            ));
        };

        let mut bundle = Self::new();
        bundle.flatten("", root)?;
        Ok(bundle)
    }

    fn flatten(&mut self, prefix: &str, map: serde_json::Map<String, serde_json::Value>) -> Result<()> {
        for (key, value) in map {
            let key = if prefix.is_empty() {
                key
            } else {
                format!("{}.{}", prefix, key)
            };
            match value {
                serde_json::Value::String(message) => {
                    self.messages.insert(key, message);
                }
                serde_json::Value::Object(nested) => self.flatten(&key, nested)?,
                other => {
                    return Err(I18nError::ParseError(format!(
                        "message {} must be a string, found {}",
                        key, other
                    )));
                }
            }
        }
        Ok(())
    }

    /// Add or replace a message.
    pub fn add(&mut self, kind: impl Into<String>, message: impl Into<String>) {
        self.messages.insert(kind.into(), message.into());
    }

    /// Add a display alias for a field name.
    pub fn add_attribute(&mut self, field: &str, alias: impl Into<String>) {
        self.messages
            .insert(format!("{}{}", ATTRIBUTE_PREFIX, field), alias.into());
    }

    /// Get a message template.
    pub fn get(&self, kind: &str) -> Option<&str> {
        self.messages.get(kind).map(String::as_str)
    }

    /// Get the alias of a field name.
    pub fn attribute(&self, field: &str) -> Option<&str> {
        self.get(&format!("{}{}", ATTRIBUTE_PREFIX, field))
    }

    /// Copy every entry of `other` over this bundle.
    pub fn merge(&mut self, other: MessageBundle) {
        self.messages.extend(other.messages);
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

/// Thread-safe message catalog with locale fallback.
///
/// Lookups try the requested locale, its language-only form, the fallback
/// locale and finally the default locale.
///
/// ```
/// use rulebook_i18n::{Catalog, Locale};
///
/// let catalog = Catalog::builtin();
/// assert_eq!(catalog.format("required", &["email"]), "The email field is required.");
///
/// let persian = catalog.clone().with_default_locale(Locale::fa());
/// assert_eq!(persian.attribute("age"), "سن");
/// ```
#[derive(Debug, Clone)]
pub struct Catalog {
    bundles: Arc<RwLock<HashMap<String, MessageBundle>>>,
    default_locale: Locale,
    fallback_locale: Option<Locale>,
}

impl Catalog {
    /// An empty catalog with `en` as default locale.
    pub fn new() -> Self {
        Self {
            bundles: Arc::new(RwLock::new(HashMap::new())),
            default_locale: Locale::en(),
            fallback_locale: None,
        }
    }

    /// A catalog holding the bundled `en` and `fa` messages, falling back to `en`.
    pub fn builtin() -> Self {
        let catalog = Self::new().with_fallback(Locale::en());
        for (locale, json) in [(Locale::en(), BUILTIN_EN), (Locale::fa(), BUILTIN_FA)] {
            match MessageBundle::from_json(json) {
                Ok(bundle) => catalog.add_bundle(&locale, bundle),
                Err(e) => warn!("Built-in {} messages failed to load: {}", locale, e),
            }
        }
        catalog
    }

    /// Set the locale used when no locale is given.
    pub fn with_default_locale(mut self, locale: Locale) -> Self {
        self.default_locale = locale;
        self
    }

    /// Set the locale consulted when the requested one lacks a message.
    pub fn with_fallback(mut self, locale: Locale) -> Self {
        self.fallback_locale = Some(locale);
        self
    }

    /// Load every `<locale>.json` file in `dir`, merged over existing bundles.
    pub fn load_from_dir(self, dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(I18nError::IoError(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("Directory not found: {}", dir.display()),
            )));
        }

        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.extension().is_none_or(|ext| ext != "json") {
                continue;
            }

            let stem = path
                .file_stem()
                .and_then(|s| s.to_str())
                .ok_or_else(|| I18nError::ParseError(format!("Invalid filename: {}", path.display())))?;
            let locale = Locale::parse(stem)?;
            let bundle = MessageBundle::from_json(&fs::read_to_string(&path)?)?;

            debug!(["locale" => locale, "messages" => bundle.len()], "Loaded message file");
            self.merge_bundle(&locale, bundle);
        }

        Ok(self)
    }

    /// Replace the bundle of a locale.
    pub fn add_bundle(&self, locale: &Locale, bundle: MessageBundle) {
        self.bundles.write().insert(locale.tag(), bundle);
    }

    /// Merge entries into the bundle of a locale, creating it if needed.
    pub fn merge_bundle(&self, locale: &Locale, bundle: MessageBundle) {
        self.bundles
            .write()
            .entry(locale.tag())
            .or_default()
            .merge(bundle);
    }

    pub fn default_locale(&self) -> &Locale {
        &self.default_locale
    }

    /// Whether any bundle exists for the locale or its language.
    pub fn supports(&self, locale: &Locale) -> bool {
        let bundles = self.bundles.read();
        bundles.contains_key(&locale.tag()) || bundles.contains_key(&locale.language_only().tag())
    }

    fn lookup<F>(&self, locale: &Locale, find: F) -> Option<String>
    where
        F: Fn(&MessageBundle) -> Option<&str>,
    {
        let bundles = self.bundles.read();
        let mut candidates = vec![locale.clone(), locale.language_only()];
        if let Some(fallback) = &self.fallback_locale {
            candidates.push(fallback.clone());
        }
        candidates.push(self.default_locale.clone());

        candidates
            .iter()
            .filter_map(|candidate| bundles.get(&candidate.tag()))
            .find_map(|bundle| find(bundle).map(str::to_string))
    }

    /// Format a message of the default locale.
    pub fn format<S: AsRef<str>>(&self, kind: &str, args: &[S]) -> String {
        self.format_in(&self.default_locale, kind, args)
    }

    /// Format a message; unknown kinds use the generic `none` template.
    pub fn format_in<S: AsRef<str>>(&self, locale: &Locale, kind: &str, args: &[S]) -> String {
        let template = self
            .lookup(locale, |bundle| bundle.get(kind))
            .or_else(|| self.lookup(locale, |bundle| bundle.get(FALLBACK_KIND)))
            .unwrap_or_else(|| "{0} is invalid.".to_string());
        interpolate(&template, args)
    }

    /// Display name of a field in the default locale.
    pub fn attribute(&self, field: &str) -> String {
        self.attribute_in(&self.default_locale, field)
    }

    /// Display name of a field; the field name itself when no alias exists.
    pub fn attribute_in(&self, locale: &Locale, field: &str) -> String {
        self.lookup(locale, |bundle| bundle.attribute(field))
            .unwrap_or_else(|| field.to_string())
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}
