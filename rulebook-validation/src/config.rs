//! Validator configuration

use std::env;
use std::path::PathBuf;

/// Message locale settings of a [`Validator`](crate::Validator).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatorConfig {
    /// Locale messages are rendered in
    pub locale: String,
    /// Directory of `<locale>.json` files merged over the built-in messages
    pub locales_dir: Option<PathBuf>,
    /// Locale consulted when the main one lacks a message
    pub fallback_locale: Option<String>,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            locale: "en".to_string(),
            locales_dir: None,
            fallback_locale: Some("en".to_string()),
        }
    }
}

impl ValidatorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the configuration from `RULEBOOK_LOCALE`, `RULEBOOK_LOCALES_DIR`
    /// and `RULEBOOK_FALLBACK_LOCALE`, keeping defaults for unset variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let locale = non_empty_var("RULEBOOK_LOCALE").unwrap_or(defaults.locale);
        let locales_dir = non_empty_var("RULEBOOK_LOCALES_DIR").map(PathBuf::from);
        let fallback_locale = non_empty_var("RULEBOOK_FALLBACK_LOCALE").or(defaults.fallback_locale);

        Self {
            locale,
            locales_dir,
            fallback_locale,
        }
    }

    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = locale.into();
        self
    }

    pub fn with_locales_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.locales_dir = Some(dir.into());
        self
    }

    pub fn with_fallback_locale(mut self, locale: impl Into<String>) -> Self {
        self.fallback_locale = Some(locale.into());
        self
    }

    pub fn without_fallback(mut self) -> Self {
        self.fallback_locale = None;
        self
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ValidatorConfig::default();
        assert_eq!(config.locale, "en");
        assert_eq!(config.locales_dir, None);
        assert_eq!(config.fallback_locale.as_deref(), Some("en"));
    }

    #[test]
    fn test_builder() {
        let config = ValidatorConfig::new()
            .with_locale("fa")
            .with_locales_dir("/etc/rulebook/locales")
            .without_fallback();
        assert_eq!(config.locale, "fa");
        assert_eq!(config.locales_dir, Some(PathBuf::from("/etc/rulebook/locales")));
        assert_eq!(config.fallback_locale, None);

        let config = config.with_fallback_locale("en-US");
        assert_eq!(config.fallback_locale.as_deref(), Some("en-US"));
    }
}
