// Verbs valid for every declared type

use super::{VerbFn, filled};
use crate::{Document, FieldContext, FieldError};

/// Built-in shared verbs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SharedVerb {
    Nullable,
    Present,
    Required,
    RequiredWith,
    RequiredWithout,
    Confirmed,
}

impl SharedVerb {
    pub const ALL: [SharedVerb; 6] = [
        SharedVerb::Nullable,
        SharedVerb::Present,
        SharedVerb::Required,
        SharedVerb::RequiredWith,
        SharedVerb::RequiredWithout,
        SharedVerb::Confirmed,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            SharedVerb::Nullable => "nullable",
            SharedVerb::Present => "present",
            SharedVerb::Required => "required",
            SharedVerb::RequiredWith => "requiredWith",
            SharedVerb::RequiredWithout => "requiredWithout",
            SharedVerb::Confirmed => "confirmed",
        }
    }

    pub fn handler(&self) -> VerbFn {
        match self {
            SharedVerb::Nullable => nullable,
            SharedVerb::Present => present,
            SharedVerb::Required => required,
            SharedVerb::RequiredWith => required_with,
            SharedVerb::RequiredWithout => required_without,
            SharedVerb::Confirmed => confirmed,
        }
    }
}

fn nullable(ctx: &mut FieldContext, _doc: &Document) -> Result<(), FieldError> {
    ctx.nullable = true;
    Ok(())
}

fn present(ctx: &mut FieldContext, doc: &Document) -> Result<(), FieldError> {
    if doc.contains_key(&ctx.name) {
        Ok(())
    } else {
        Err(ctx.fail("present"))
    }
}

fn is_missing(ctx: &FieldContext, doc: &Document) -> bool {
    doc.get(&ctx.name)
        .is_none_or(|value| value.is_empty(ctx.nullable))
}

fn required(ctx: &mut FieldContext, doc: &Document) -> Result<(), FieldError> {
    if is_missing(ctx, doc) {
        Err(ctx.fail("required"))
    } else {
        Ok(())
    }
}

/// Failure naming the sibling fields first, then the field itself.
fn required_because(ctx: &FieldContext, kind: &str) -> FieldError {
    let kind = if ctx.args.len() > 1 {
        format!("{}All", kind)
    } else {
        kind.to_string()
    };
    FieldError::new(kind)
        .with_attributes(&ctx.args)
        .with_attribute(&ctx.name)
}

fn required_with(ctx: &mut FieldContext, doc: &Document) -> Result<(), FieldError> {
    if ctx.args.is_empty() {
        return Err(ctx.invalid());
    }
    let all_filled = ctx.args.iter().all(|field| filled(doc, field));
    if all_filled && is_missing(ctx, doc) {
        return Err(required_because(ctx, "requiredWith"));
    }
    Ok(())
}

fn required_without(ctx: &mut FieldContext, doc: &Document) -> Result<(), FieldError> {
    if ctx.args.is_empty() {
        return Err(ctx.invalid());
    }
    let any_missing = ctx.args.iter().any(|field| !filled(doc, field));
    if any_missing && is_missing(ctx, doc) {
        return Err(required_because(ctx, "requiredWithout"));
    }
    Ok(())
}

fn confirmed(ctx: &mut FieldContext, doc: &Document) -> Result<(), FieldError> {
    let other = match ctx.args.first() {
        Some(field) if !field.is_empty() => field.clone(),
        _ => format!("{}Confirmation", ctx.name),
    };
    match (doc.get(&ctx.name), doc.get(&other)) {
        (Some(value), Some(confirmation)) if value == confirmation => Ok(()),
        _ => Err(ctx.fail("confirmed")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Param, Value};

    fn doc(pairs: &[(&str, Value)]) -> Document {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    fn run(verb: SharedVerb, field: &str, args: &[&str], doc: &Document) -> Result<(), FieldError> {
        let mut ctx = FieldContext::new(field, doc.get(field).cloned());
        ctx.begin(verb.name(), args.iter().map(|a| a.to_string()).collect());
        (verb.handler())(&mut ctx, doc)
    }

    #[test]
    fn test_present_accepts_null() {
        let d = doc(&[("a", Value::Null)]);
        assert!(run(SharedVerb::Present, "a", &[], &d).is_ok());
        assert_eq!(run(SharedVerb::Present, "b", &[], &d).unwrap_err().kind, "present");
    }

    #[test]
    fn test_required() {
        let d = doc(&[
            ("name", Value::from("Ali")),
            ("empty", Value::from("")),
            ("list", Value::Sequence(vec![])),
            ("zero", Value::Number(0.0)),
            ("nothing", Value::Null),
        ]);
        assert!(run(SharedVerb::Required, "name", &[], &d).is_ok());
        assert!(run(SharedVerb::Required, "zero", &[], &d).is_ok());
        assert_eq!(run(SharedVerb::Required, "missing", &[], &d).unwrap_err().kind, "required");
        assert!(run(SharedVerb::Required, "empty", &[], &d).is_err());
        assert!(run(SharedVerb::Required, "list", &[], &d).is_err());
        assert!(run(SharedVerb::Required, "nothing", &[], &d).is_err());
    }

    #[test]
    fn test_required_respects_nullable() {
        let d = doc(&[("a", Value::Null), ("b", Value::from(""))]);

        let mut ctx = FieldContext::new("a", Some(Value::Null));
        ctx.nullable = true;
        assert!(required(&mut ctx, &d).is_ok());

        let mut ctx = FieldContext::new("b", Some(Value::from("")));
        ctx.nullable = true;
        assert!(required(&mut ctx, &d).is_err());
    }

    #[test]
    fn test_required_with() {
        let d = doc(&[("email", Value::from("a@b.c")), ("phone", Value::from(""))]);

        let err = run(SharedVerb::RequiredWith, "name", &["email"], &d).unwrap_err();
        assert_eq!(err.kind, "requiredWith");
        assert_eq!(
            err.params,
            vec![Param::Attributes(vec!["email".into()]), Param::Attribute("name".into())]
        );

        // not every sibling is filled
        assert!(run(SharedVerb::RequiredWith, "name", &["email", "phone"], &d).is_ok());

        let d = doc(&[("email", Value::from("a@b.c")), ("phone", Value::from("0912"))]);
        let err = run(SharedVerb::RequiredWith, "name", &["email", "phone"], &d).unwrap_err();
        assert_eq!(err.kind, "requiredWithAll");
        assert_eq!(err.params[0], Param::Attributes(vec!["email".into(), "phone".into()]));
    }

    #[test]
    fn test_required_without() {
        let d = doc(&[("email", Value::from("a@b.c"))]);
        assert!(run(SharedVerb::RequiredWithout, "phone", &["email"], &d).is_ok());
        assert_eq!(
            run(SharedVerb::RequiredWithout, "email", &["phone"], &doc(&[])).unwrap_err().kind,
            "requiredWithout"
        );
        assert_eq!(
            run(SharedVerb::RequiredWithout, "x", &["email", "phone"], &d).unwrap_err().kind,
            "requiredWithoutAll"
        );
    }

    #[test]
    fn test_required_with_needs_fields() {
        let err = run(SharedVerb::RequiredWith, "a", &[], &doc(&[])).unwrap_err();
        assert_eq!(err, FieldError::invalid("a"));
    }

    #[test]
    fn test_confirmed() {
        let d = doc(&[
            ("password", Value::from("secret")),
            ("passwordConfirmation", Value::from("secret")),
            ("repeat", Value::from("other")),
        ]);
        assert!(run(SharedVerb::Confirmed, "password", &[], &d).is_ok());
        assert_eq!(
            run(SharedVerb::Confirmed, "password", &["repeat"], &d).unwrap_err().kind,
            "confirmed"
        );

        let d = doc(&[("password", Value::from("secret"))]);
        assert!(run(SharedVerb::Confirmed, "password", &[], &d).is_err());
    }
}
