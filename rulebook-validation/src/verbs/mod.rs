//! Verb dispatch tables
//!
//! Two tables are consulted for every token after the field name: the
//! shared table, valid for any declared type, then the table of the
//! field's declared type. Unknown verb names are ignored.
//!
//! Typed verbs normally skip absent or null values. Verbs registered with
//! [`VerbRegistry::register_typed_eager`] run regardless because they read
//! the raw document instead of the coerced value.

mod date;
mod number;
mod shared;
mod string;

pub use date::DateVerb;
pub use number::NumberVerb;
pub use shared::SharedVerb;
pub use string::StringVerb;

use crate::{Document, FieldContext, FieldError, TypeTag};
use once_cell::sync::Lazy;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Uniform signature of every verb.
pub type VerbFn = fn(&mut FieldContext, &Document) -> Result<(), FieldError>;

/// Verb name to function.
#[derive(Debug, Clone, Default)]
pub struct VerbTable {
    verbs: HashMap<String, VerbFn>,
    eager: HashSet<String>,
}

impl VerbTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a verb.
    pub fn insert(&mut self, name: impl Into<String>, verb: VerbFn) {
        let name = name.into();
        self.eager.remove(&name);
        self.verbs.insert(name, verb);
    }

    /// Add or replace a verb that also runs on absent or null values.
    pub fn insert_eager(&mut self, name: impl Into<String>, verb: VerbFn) {
        let name = name.into();
        self.eager.insert(name.clone());
        self.verbs.insert(name, verb);
    }

    pub fn get(&self, name: &str) -> Option<VerbFn> {
        self.verbs.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.verbs.contains_key(name)
    }

    pub fn is_eager(&self, name: &str) -> bool {
        self.eager.contains(name)
    }
}

/// The shared table and one table per declared type.
///
/// Built once, then shared read-only between validators and threads.
#[derive(Debug, Clone, Default)]
pub struct VerbRegistry {
    shared: VerbTable,
    typed: HashMap<TypeTag, VerbTable>,
}

static STANDARD: Lazy<Arc<VerbRegistry>> = Lazy::new(|| Arc::new(VerbRegistry::standard()));

impl VerbRegistry {
    /// A registry without any verbs.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A registry holding every built-in verb.
    pub fn standard() -> Self {
        let mut registry = Self::empty();
        for verb in SharedVerb::ALL {
            registry.register_shared(verb.name(), verb.handler());
        }
        for verb in StringVerb::ALL {
            if verb.reads_document() {
                registry.register_typed_eager(TypeTag::String, verb.name(), verb.handler());
            } else {
                registry.register_typed(TypeTag::String, verb.name(), verb.handler());
            }
        }
        for verb in NumberVerb::ALL {
            registry.register_typed(TypeTag::Number, verb.name(), verb.handler());
        }
        for verb in DateVerb::ALL {
            registry.register_typed(TypeTag::Date, verb.name(), verb.handler());
        }
        registry
    }

    /// The process-wide built-in registry.
    pub fn shared_standard() -> Arc<VerbRegistry> {
        Arc::clone(&STANDARD)
    }

    /// Add a verb valid for every declared type.
    pub fn register_shared(&mut self, name: impl Into<String>, verb: VerbFn) -> &mut Self {
        self.shared.insert(name, verb);
        self
    }

    /// Add a verb valid only for fields declared as `tag`.
    pub fn register_typed(
        &mut self,
        tag: TypeTag,
        name: impl Into<String>,
        verb: VerbFn,
    ) -> &mut Self {
        self.typed.entry(tag).or_default().insert(name, verb);
        self
    }

    /// Add a typed verb that is dispatched even while the value is absent or
    /// null, such as a comparison against a sibling field.
    pub fn register_typed_eager(
        &mut self,
        tag: TypeTag,
        name: impl Into<String>,
        verb: VerbFn,
    ) -> &mut Self {
        self.typed.entry(tag).or_default().insert_eager(name, verb);
        self
    }

    pub fn shared(&self, name: &str) -> Option<VerbFn> {
        self.shared.get(name)
    }

    pub fn typed(&self, tag: TypeTag, name: &str) -> Option<VerbFn> {
        self.typed.get(&tag).and_then(|table| table.get(name))
    }

    /// Whether the typed verb runs on absent or null values.
    pub fn is_eager(&self, tag: TypeTag, name: &str) -> bool {
        self.typed.get(&tag).is_some_and(|table| table.is_eager(name))
    }

    /// Whether `name` resolves in either table for `tag`.
    pub fn knows(&self, tag: TypeTag, name: &str) -> bool {
        self.shared.contains(name) || self.typed(tag, name).is_some()
    }
}

/// Sibling document value that is present and non-empty.
pub(crate) fn filled(doc: &Document, field: &str) -> bool {
    doc.get(field).is_some_and(|value| !value.is_empty(false))
}
