//! Validation engine
//!
//! Every rule string is evaluated on its own [`FieldContext`]:
//!
//! 1. the first call names the field, optionally with its type as
//!    `field(type)` or as a following bare `type` token;
//! 2. the value is coerced to the declared type;
//! 3. the remaining calls are dispatched to the shared table, then to the
//!    table of the declared type, until one fails or the rule ends.
//!
//! A run fails when any field fails; the result then holds only the
//! messages of the failed fields.

use crate::chain::{Call, scan};
use crate::coerce::coerce;
use crate::config::ValidatorConfig;
use crate::verbs::VerbRegistry;
use crate::{Document, FieldContext, FieldErrors, TypeTag, ValidateError, Value, document_from_json};
use rulebook_i18n::{Catalog, I18nError, Locale};
use rulebook_log::{debug, trace, warn};
use std::collections::BTreeMap;
use std::iter::Peekable;
use std::sync::Arc;

/// Coerced values of a successful run, by field name.
pub type Values = BTreeMap<String, Value>;

/// Verb registry plus message catalog; build once, validate many times.
///
/// # Examples
///
/// ```
/// use rulebook_validation::{Validator, Value};
///
/// let validator = Validator::default();
/// let values = validator
///     .validate(r#"{"age": "۲۵"}"#, &["age number between(18,30)"])
///     .unwrap();
/// assert_eq!(values["age"], Value::Number(25.0));
/// ```
#[derive(Debug, Clone)]
pub struct Validator {
    registry: Arc<VerbRegistry>,
    catalog: Catalog,
}

impl Default for Validator {
    fn default() -> Self {
        Self::new(VerbRegistry::shared_standard(), Catalog::builtin())
    }
}

impl Validator {
    pub fn new(registry: Arc<VerbRegistry>, catalog: Catalog) -> Self {
        Self { registry, catalog }
    }

    /// Build a validator with the built-in verbs and the configured messages.
    ///
    /// The locale must have a bundle, built in or loaded from `locales_dir`.
    pub fn from_config(config: &ValidatorConfig) -> Result<Self, I18nError> {
        let locale = Locale::parse(&config.locale)?;
        let mut catalog = Catalog::builtin().with_default_locale(locale.clone());
        if let Some(fallback) = &config.fallback_locale {
            catalog = catalog.with_fallback(Locale::parse(fallback)?);
        }
        if let Some(dir) = &config.locales_dir {
            catalog = catalog.load_from_dir(dir)?;
        }
        if !catalog.supports(&locale) {
            warn!(["locale" => config.locale], "No messages for locale");
            return Err(I18nError::InvalidLocale(config.locale.clone()));
        }
        debug!(
            ["locale" => config.locale, "fallback" => config.fallback_locale.as_deref().unwrap_or("-")],
            "Validator configured"
        );
        Ok(Self::new(VerbRegistry::shared_standard(), catalog))
    }

    pub fn registry(&self) -> &VerbRegistry {
        &self.registry
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Decode `raw` as a JSON object and validate it.
    pub fn validate<R: AsRef<str>>(&self, raw: &str, rules: &[R]) -> Result<Values, ValidateError> {
        let json: serde_json::Value =
            serde_json::from_str(raw).map_err(|e| malformed(e.to_string()))?;
        let doc = document_from_json(json).ok_or_else(|| malformed("expected a JSON object"))?;
        self.validate_document(&doc, rules)
            .map_err(ValidateError::Failed)
    }

    /// Validate an already decoded document.
    pub fn validate_document<R: AsRef<str>>(
        &self,
        doc: &Document,
        rules: &[R],
    ) -> Result<Values, FieldErrors> {
        let mut values = Values::new();
        let mut errors = FieldErrors::new();

        for rule in rules {
            let rule: &str = rule.as_ref();
            let Some(mut ctx) = self.run_rule(rule, doc) else {
                warn!(["rule" => rule], "Rule without a field name skipped");
                continue;
            };
            match ctx.take_error() {
                Some(error) => {
                    debug!(
                        ["field" => ctx.name, "type" => ctx.type_tag, "outcome" => error.kind],
                        "Field failed"
                    );
                    errors.add(ctx.name, error.render(&self.catalog));
                }
                None => {
                    debug!(["field" => ctx.name, "type" => ctx.type_tag, "outcome" => "ok"], "Field validated");
                    values.insert(ctx.name, ctx.value.unwrap_or(Value::Null));
                }
            }
        }

        if errors.is_empty() {
            Ok(values)
        } else {
            Err(errors)
        }
    }

    /// Evaluate one rule string; `None` when it names no field.
    fn run_rule(&self, rule: &str, doc: &Document) -> Option<FieldContext> {
        let mut calls = scan(rule).peekable();
        let head = calls.next()?;
        let mut ctx = FieldContext::new(head.verb, doc.get(head.verb).cloned());

        if let Some(tag) = declared_type(&head, &mut calls) {
            match TypeTag::parse(&tag) {
                Some(tag) => ctx.type_tag = tag,
                None => ctx.record(ctx.fail(TypeTag::Any.error_kind())),
            }
        }
        let coerced = if ctx.has_error() { Ok(()) } else { coerce(&mut ctx) };
        if let Err(error) = coerced {
            ctx.record(error);
        }

        for call in calls {
            if self.registry.knows(ctx.type_tag, call.verb) {
                trace!(["field" => ctx.name, "verb" => call.verb], "Dispatching verb");
            } else {
                trace!(["field" => ctx.name, "verb" => call.verb], "Unknown verb ignored");
            }
            ctx.begin(call.verb, call.args);

            let shared = self.registry.shared(call.verb);
            if let Some(Err(error)) = shared.map(|verb| verb(&mut ctx, doc)) {
                ctx.record(error);
                break;
            }
            // A failed coercion still lets presence checks replace the message.
            if ctx.has_error() {
                if shared.is_some() {
                    continue;
                }
                break;
            }
            if !ctx.has_value() && !self.registry.is_eager(ctx.type_tag, call.verb) {
                continue;
            }
            let typed = self.registry.typed(ctx.type_tag, call.verb);
            if let Some(Err(error)) = typed.map(|verb| verb(&mut ctx, doc)) {
                ctx.record(error);
                break;
            }
        }

        Some(ctx)
    }
}

/// Type tag written as `field(type)` or as a bare `type` token after the
/// field name; the bare form only counts when it names a known tag.
fn declared_type<'a, I>(head: &Call<'a>, calls: &mut Peekable<I>) -> Option<String>
where
    I: Iterator<Item = Call<'a>>,
{
    if head.parenthesized {
        return head.args.first().cloned();
    }
    let bare = calls
        .peek()
        .filter(|call| !call.parenthesized && TypeTag::parse(call.verb).is_some())
        .map(|call| call.verb.to_string());
    if bare.is_some() {
        calls.next();
    }
    bare
}

fn malformed(reason: impl Into<String>) -> ValidateError {
    let reason = reason.into();
    warn!(["reason" => reason], "Malformed input document");
    ValidateError::MalformedInput(reason)
}
