//! Type tags and coercion of raw values into their canonical form

use crate::date::parse_date_phrase;
use crate::{FieldContext, FieldError, Value};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use std::fmt;

/// Declared type of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeTag {
    Any,
    String,
    Number,
    Bool,
    Date,
    Image,
    File,
    Object,
    Array,
}

impl TypeTag {
    pub const ALL: [TypeTag; 9] = [
        TypeTag::Any,
        TypeTag::String,
        TypeTag::Number,
        TypeTag::Bool,
        TypeTag::Date,
        TypeTag::Image,
        TypeTag::File,
        TypeTag::Object,
        TypeTag::Array,
    ];

    /// Parse a tag as written in a rule string.
    pub fn parse(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == tag)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TypeTag::Any => "any",
            TypeTag::String => "string",
            TypeTag::Number => "number",
            TypeTag::Bool => "bool",
            TypeTag::Date => "date",
            TypeTag::Image => "image",
            TypeTag::File => "file",
            TypeTag::Object => "object",
            TypeTag::Array => "array",
        }
    }

    /// Catalog key of the type mismatch message.
    pub fn error_kind(&self) -> &'static str {
        match self {
            TypeTag::Any => "type.none",
            TypeTag::String => "type.string",
            TypeTag::Number => "type.number",
            TypeTag::Bool => "type.bool",
            TypeTag::Date => "type.date",
            TypeTag::Image => "type.image",
            TypeTag::File => "type.file",
            TypeTag::Object => "type.object",
            TypeTag::Array => "type.array",
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Check the shape of `ctx.value` against `ctx.type_tag` and convert it in
/// place.
///
/// An absent or `null` value is left alone for every type but `object`,
/// which must be present. On failure the value may already hold a partial
/// conversion.
pub fn coerce(ctx: &mut FieldContext) -> Result<(), FieldError> {
    let tag = ctx.type_tag;
    let mismatch = |ctx: &FieldContext| ctx.fail(tag.error_kind());

    let Some(value) = ctx.value.take() else {
        return match tag {
            TypeTag::Object => Err(mismatch(ctx)),
            _ => Ok(()),
        };
    };
    if value.is_null() {
        ctx.value = Some(value);
        return match tag {
            TypeTag::Object => Err(mismatch(ctx)),
            _ => Ok(()),
        };
    }

    let (converted, ok) = match (tag, value) {
        (TypeTag::Any, value) => (value, true),

        (TypeTag::String, value @ Value::String(_)) => (value, true),
        (TypeTag::Bool, value @ Value::Bool(_)) => (value, true),
        (TypeTag::Array, value @ Value::Sequence(_)) => (value, true),
        (TypeTag::Object, value @ (Value::Mapping(_) | Value::Sequence(_))) => (value, true),

        (TypeTag::Number, value @ Value::Number(_)) => (value, true),
        (TypeTag::Number, Value::Integer(i)) => (Value::Number(i as f64), true),
        (TypeTag::Number, Value::String(text)) => {
            let (number, strict) = parse_number(&text);
            (Value::Number(number), strict)
        }

        (TypeTag::Date, value @ Value::Timestamp(_)) => (value, true),
        (TypeTag::Date, Value::String(text)) => match parse_date_phrase(&text) {
            Ok(instant) => (Value::Timestamp(instant), true),
            Err(_) => (Value::String(text), false),
        },

        (TypeTag::File | TypeTag::Image, value @ Value::Bytes { .. }) => (value, true),
        (TypeTag::File, Value::String(text)) => match STANDARD.decode(&text) {
            Ok(data) => (Value::Bytes { data, mime: None }, true),
            Err(_) => (Value::String(text), false),
        },
        (TypeTag::Image, Value::String(text)) => match decode_image(&text) {
            Some((data, mime)) => {
                ctx.mime.clone_from(&mime);
                (Value::Bytes { data, mime }, true)
            }
            None => (Value::String(text), false),
        },

        (_, value) => (value, false),
    };

    ctx.value = Some(converted);
    if ok { Ok(()) } else { Err(mismatch(ctx)) }
}

/// Length of the encoding marker following the mime type, `;base64,`.
const ENCODING_MARKER_LEN: usize = 8;

/// Decode a base64 image, optionally wrapped in a `data:<mime>;base64,` URI.
fn decode_image(text: &str) -> Option<(Vec<u8>, Option<String>)> {
    let (payload, mime) = match text.strip_prefix("data:") {
        Some(rest) => match rest.find(';') {
            Some(semi) => (
                rest.get(semi + ENCODING_MARKER_LEN..)?,
                Some(rest[..semi].to_string()),
            ),
            None => (rest, None),
        },
        None => (text, None),
    };
    STANDARD.decode(payload).ok().map(|data| (data, mime))
}

/// Best-effort lexical number parse.
///
/// ASCII, Arabic-Indic (`٠`-`٩`) and Extended Arabic-Indic (`۰`-`۹`) digits
/// are accepted. The first `-` makes the result negative and later ones are
/// ignored; every `.` starts a fresh fractional part. Any other character
/// makes the parse non-strict, reported as `false` next to the partial value.
pub fn parse_number(text: &str) -> (f64, bool) {
    if text.is_empty() {
        return (0.0, false);
    }

    let mut strict = true;
    let mut out = 0.0_f64;
    let mut fraction: Option<f64> = None;
    let mut negative = false;

    for c in text.chars() {
        match c {
            '.' => fraction = Some(10.0),
            '-' => negative = true,
            _ => match digit_value(c) {
                Some(digit) => match fraction.as_mut() {
                    None => out = out * 10.0 + digit,
                    Some(scale) => {
                        out += digit / *scale;
                        *scale *= 10.0;
                    }
                },
                None => strict = false,
            },
        }
    }

    (if negative { -out } else { out }, strict)
}

fn digit_value(c: char) -> Option<f64> {
    let digit = match c {
        '0'..='9' => c as u32 - '0' as u32,
        '\u{0660}'..='\u{0669}' => c as u32 - 0x0660,
        '\u{06F0}'..='\u{06F9}' => c as u32 - 0x06F0,
        _ => return None,
    };
    Some(f64::from(digit))
}
