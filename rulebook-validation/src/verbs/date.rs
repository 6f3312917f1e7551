// Verbs of `date` fields

use super::VerbFn;
use crate::date::parse_date_phrase;
use crate::{Document, FieldContext, FieldError};
use chrono::{DateTime, Utc};
use rulebook_i18n::format_date;

/// Built-in verbs of `date` fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateVerb {
    After,
    Before,
    Between,
}

impl DateVerb {
    pub const ALL: [DateVerb; 3] = [DateVerb::After, DateVerb::Before, DateVerb::Between];

    pub fn name(&self) -> &'static str {
        match self {
            DateVerb::After => "after",
            DateVerb::Before => "before",
            DateVerb::Between => "between",
        }
    }

    pub fn handler(&self) -> VerbFn {
        match self {
            DateVerb::After => after,
            DateVerb::Before => before,
            DateVerb::Between => between,
        }
    }
}

fn instant(ctx: &FieldContext) -> Result<DateTime<Utc>, FieldError> {
    ctx.value
        .as_ref()
        .and_then(|value| value.as_timestamp())
        .copied()
        .ok_or_else(|| ctx.invalid())
}

fn arg_instant(ctx: &FieldContext, index: usize) -> Result<DateTime<Utc>, FieldError> {
    parse_date_phrase(ctx.arg(index)?).map_err(|_| ctx.invalid())
}

/// Failure showing the value, then the bounds.
fn out_of_range(ctx: &FieldContext, kind: &str, value: &DateTime<Utc>, bounds: &[DateTime<Utc>]) -> FieldError {
    bounds.iter().fold(
        ctx.fail(kind).with_text(format_date(value)),
        |error, bound| error.with_text(format_date(bound)),
    )
}

fn after(ctx: &mut FieldContext, _doc: &Document) -> Result<(), FieldError> {
    let limit = arg_instant(ctx, 0)?;
    let value = instant(ctx)?;
    if value <= limit {
        return Err(out_of_range(ctx, "date.after", &value, &[limit]));
    }
    Ok(())
}

fn before(ctx: &mut FieldContext, _doc: &Document) -> Result<(), FieldError> {
    let limit = arg_instant(ctx, 0)?;
    let value = instant(ctx)?;
    if value >= limit {
        return Err(out_of_range(ctx, "date.before", &value, &[limit]));
    }
    Ok(())
}

fn between(ctx: &mut FieldContext, _doc: &Document) -> Result<(), FieldError> {
    let (low, high) = (arg_instant(ctx, 0)?, arg_instant(ctx, 1)?);
    let value = instant(ctx)?;
    if value < low || value > high {
        return Err(out_of_range(ctx, "date.between", &value, &[low, high]));
    }
    Ok(())
}
