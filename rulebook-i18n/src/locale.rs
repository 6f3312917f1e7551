//! Locale tags

use crate::{I18nError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A language with an optional region, e.g. `fa` or `en-US`.
///
/// ```
/// use rulebook_i18n::Locale;
///
/// let locale = Locale::parse("fa_IR").unwrap();
/// assert_eq!(locale.tag(), "fa-IR");
/// assert_eq!(locale.language_only(), Locale::fa());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Locale {
    /// ISO 639 language code, lower case
    pub language: String,
    /// ISO 3166 region code, upper case
    pub region: Option<String>,
}

impl Locale {
    /// Create a locale without validating the parts.
    pub fn new(language: impl Into<String>, region: Option<&str>) -> Self {
        Self {
            language: language.into().to_ascii_lowercase(),
            region: region.map(|r| r.to_ascii_uppercase()),
        }
    }

    /// Parse a `language[-REGION]` tag; `_` is accepted as separator.
    pub fn parse(tag: &str) -> Result<Self> {
        let mut parts = tag.trim().split(['-', '_']);

        let language = parts.next().unwrap_or_default().to_ascii_lowercase();
        if !(2..=3).contains(&language.len()) || !language.chars().all(|c| c.is_ascii_alphabetic())
        {
            return Err(I18nError::InvalidLocale(tag.to_string()));
        }

        let region = match parts.next() {
            None => None,
            Some(part) if part.len() == 2 && part.chars().all(|c| c.is_ascii_alphabetic()) => {
                Some(part.to_ascii_uppercase())
            }
            Some(_) => return Err(I18nError::InvalidLocale(tag.to_string())),
        };

        if parts.next().is_some() {
            return Err(I18nError::InvalidLocale(tag.to_string()));
        }

        Ok(Self { language, region })
    }

    /// The canonical tag, e.g. `en-US`.
    pub fn tag(&self) -> String {
        match &self.region {
            Some(region) => format!("{}-{}", self.language, region),
            None => self.language.clone(),
        }
    }

    /// The same locale without its region.
    pub fn language_only(&self) -> Self {
        Self {
            language: self.language.clone(),
            region: None,
        }
    }

    pub fn en() -> Self {
        Self::new("en", None)
    }

    pub fn fa() -> Self {
        Self::new("fa", None)
    }
}

impl FromStr for Locale {
    type Err = I18nError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tag())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_language_only() {
        let locale = Locale::parse("EN").unwrap();
        assert_eq!(locale.language, "en");
        assert_eq!(locale.region, None);
    }

    #[test]
    fn test_parse_with_region() {
        assert_eq!(Locale::parse("en-us").unwrap().tag(), "en-US");
        assert_eq!(Locale::parse("fa_IR").unwrap().tag(), "fa-IR");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(Locale::parse("").is_err());
        assert!(Locale::parse("e").is_err());
        assert!(Locale::parse("english").is_err());
        assert!(Locale::parse("en-USA1").is_err());
        assert!(Locale::parse("en-US-x").is_err());
    }

    #[test]
    fn test_language_only() {
        let locale = Locale::new("fa", Some("ir"));
        assert_eq!(locale.tag(), "fa-IR");
        assert_eq!(locale.language_only(), Locale::fa());
    }
}
