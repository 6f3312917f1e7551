// Verbs of `number` fields

use super::VerbFn;
use crate::{Document, FieldContext, FieldError, Value};
use rulebook_i18n::format_number;

/// Built-in verbs of `number` fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberVerb {
    Digits,
    DigitsBetween,
    Integer,
    GreaterThan,
    GreaterThanOrEqual,
    LessThan,
    LessThanOrEqual,
    Between,
    In,
}

impl NumberVerb {
    pub const ALL: [NumberVerb; 9] = [
        NumberVerb::Digits,
        NumberVerb::DigitsBetween,
        NumberVerb::Integer,
        NumberVerb::GreaterThan,
        NumberVerb::GreaterThanOrEqual,
        NumberVerb::LessThan,
        NumberVerb::LessThanOrEqual,
        NumberVerb::Between,
        NumberVerb::In,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            NumberVerb::Digits => "digits",
            NumberVerb::DigitsBetween => "digitsBetween",
            NumberVerb::Integer => "integer",
            NumberVerb::GreaterThan => "greaterThan",
            NumberVerb::GreaterThanOrEqual => "greaterThanOrEqual",
            NumberVerb::LessThan => "lessThan",
            NumberVerb::LessThanOrEqual => "lessThanOrEqual",
            NumberVerb::Between => "between",
            NumberVerb::In => "in",
        }
    }

    pub fn handler(&self) -> VerbFn {
        match self {
            NumberVerb::Digits => digits,
            NumberVerb::DigitsBetween => digits_between,
            NumberVerb::Integer => integer,
            NumberVerb::GreaterThan => greater_than,
            NumberVerb::GreaterThanOrEqual => greater_than_or_equal,
            NumberVerb::LessThan => less_than,
            NumberVerb::LessThanOrEqual => less_than_or_equal,
            NumberVerb::Between => between,
            NumberVerb::In => one_of,
        }
    }
}

/// Decimal digit count of the floored magnitude.
fn digit_count(n: f64) -> usize {
    let mut rest = n.abs().floor();
    let mut count = 1;
    while rest >= 10.0 {
        rest = (rest / 10.0).floor();
        count += 1;
    }
    count
}

fn digits(ctx: &mut FieldContext, _doc: &Document) -> Result<(), FieldError> {
    let n = ctx.arg_usize(0)?;
    if digit_count(ctx.number()?) != n {
        return Err(ctx.fail("number.digits").with_text(n));
    }
    Ok(())
}

fn digits_between(ctx: &mut FieldContext, _doc: &Document) -> Result<(), FieldError> {
    let (low, high) = (ctx.arg_usize(0)?, ctx.arg_usize(1)?);
    let count = digit_count(ctx.number()?);
    if count < low || count > high {
        return Err(ctx
            .fail("number.digitsBetween")
            .with_text(low)
            .with_text(high));
    }
    Ok(())
}

fn integer(ctx: &mut FieldContext, _doc: &Document) -> Result<(), FieldError> {
    let n = ctx.number()?;
    ctx.value = Some(Value::Integer(n.trunc() as i64));
    Ok(())
}

/// Compare the value against the first argument.
fn bound(
    ctx: &FieldContext,
    kind: &str,
    holds: fn(f64, f64) -> bool,
) -> Result<(), FieldError> {
    let limit = ctx.arg_f64(0)?;
    if holds(ctx.number()?, limit) {
        Ok(())
    } else {
        Err(ctx.fail(kind).with_text(format_number(limit)))
    }
}

fn greater_than(ctx: &mut FieldContext, _doc: &Document) -> Result<(), FieldError> {
    bound(ctx, "number.greaterThan", |v, limit| v > limit)
}

fn greater_than_or_equal(ctx: &mut FieldContext, _doc: &Document) -> Result<(), FieldError> {
    bound(ctx, "number.greaterThanOrEqual", |v, limit| v >= limit)
}

fn less_than(ctx: &mut FieldContext, _doc: &Document) -> Result<(), FieldError> {
    bound(ctx, "number.lessThan", |v, limit| v < limit)
}

fn less_than_or_equal(ctx: &mut FieldContext, _doc: &Document) -> Result<(), FieldError> {
    bound(ctx, "number.lessThanOrEqual", |v, limit| v <= limit)
}

fn between(ctx: &mut FieldContext, _doc: &Document) -> Result<(), FieldError> {
    let (low, high) = (ctx.arg_f64(0)?, ctx.arg_f64(1)?);
    let v = ctx.number()?;
    if v < low || v > high {
        return Err(ctx
            .fail("number.between")
            .with_text(format_number(low))
            .with_text(format_number(high)));
    }
    Ok(())
}

fn one_of(ctx: &mut FieldContext, _doc: &Document) -> Result<(), FieldError> {
    let v = ctx.number()?;
    for index in 0..ctx.args.len() {
        if ctx.arg_f64(index)? == v {
            return Ok(());
        }
    }
    Err(ctx.fail("number.in"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Param;

    fn check(verb: NumberVerb, n: f64, args: &[&str]) -> Result<FieldContext, FieldError> {
        let mut ctx = FieldContext::new("n", Some(Value::Number(n)));
        ctx.begin(verb.name(), args.iter().map(|a| a.to_string()).collect());
        (verb.handler())(&mut ctx, &Document::new())?;
        Ok(ctx)
    }

    fn passes(verb: NumberVerb, n: f64, args: &[&str]) -> bool {
        check(verb, n, args).is_ok()
    }

    #[test]
    fn test_digit_count() {
        assert_eq!(digit_count(0.0), 1);
        assert_eq!(digit_count(7.9), 1);
        assert_eq!(digit_count(10.0), 2);
        assert_eq!(digit_count(99.5), 2);
        assert_eq!(digit_count(100.0), 3);
        assert_eq!(digit_count(-12345.0), 5);
    }

    #[test]
    fn test_digits() {
        assert!(passes(NumberVerb::Digits, 1234.0, &["4"]));
        assert!(!passes(NumberVerb::Digits, 123.0, &["4"]));
        assert!(passes(NumberVerb::DigitsBetween, 123.0, &["2", "4"]));
        assert!(!passes(NumberVerb::DigitsBetween, 12345.0, &["2", "4"]));
    }

    #[test]
    fn test_integer_truncates() {
        let ctx = check(NumberVerb::Integer, 7.9, &[]).unwrap();
        assert_eq!(ctx.value, Some(Value::Integer(7)));

        let ctx = check(NumberVerb::Integer, -2.5, &[]).unwrap();
        assert_eq!(ctx.value, Some(Value::Integer(-2)));
    }

    #[test]
    fn test_integer_is_idempotent() {
        let mut ctx = FieldContext::new("n", Some(Value::Integer(7)));
        integer(&mut ctx, &Document::new()).unwrap();
        assert_eq!(ctx.value, Some(Value::Integer(7)));
    }

    #[test]
    fn test_bounds() {
        assert!(passes(NumberVerb::GreaterThan, 19.0, &["18"]));
        assert!(!passes(NumberVerb::GreaterThan, 18.0, &["18"]));
        assert!(passes(NumberVerb::GreaterThanOrEqual, 18.0, &["18"]));
        assert!(passes(NumberVerb::LessThan, 64.5, &["65"]));
        assert!(!passes(NumberVerb::LessThan, 65.0, &["65"]));
        assert!(passes(NumberVerb::LessThanOrEqual, 65.0, &["65"]));
        assert!(passes(NumberVerb::Between, 18.0, &["18", "30"]));
        assert!(passes(NumberVerb::Between, 30.0, &["18", "30"]));
        assert!(!passes(NumberVerb::Between, 30.5, &["18", "30"]));
    }

    #[test]
    fn test_bound_message_params() {
        let err = check(NumberVerb::GreaterThan, 1.0, &["2.5"]).unwrap_err();
        assert_eq!(err.kind, "number.greaterThan");
        assert_eq!(err.params, vec![Param::Attribute("n".into()), Param::Text("2.5".into())]);

        let err = check(NumberVerb::Between, 1.0, &["18", "30"]).unwrap_err();
        assert_eq!(err.params[1], Param::Text("18".into()));
        assert_eq!(err.params[2], Param::Text("30".into()));
    }

    #[test]
    fn test_in() {
        assert!(passes(NumberVerb::In, 2.0, &["1", "2", "3"]));
        assert_eq!(check(NumberVerb::In, 4.0, &["1", "2"]).unwrap_err().kind, "number.in");
        assert_eq!(
            check(NumberVerb::In, 4.0, &["1", "x"]).unwrap_err(),
            FieldError::invalid("n")
        );
    }

    #[test]
    fn test_unparsable_arguments() {
        assert_eq!(check(NumberVerb::GreaterThan, 1.0, &["abc"]).unwrap_err(), FieldError::invalid("n"));
        assert_eq!(check(NumberVerb::Digits, 1.0, &[]).unwrap_err(), FieldError::invalid("n"));
    }
}
