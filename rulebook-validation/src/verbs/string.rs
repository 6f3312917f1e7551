// Verbs of `string` fields

use super::VerbFn;
use crate::national::is_valid_national_code;
use crate::{Document, FieldContext, FieldError, Value};
use once_cell::sync::Lazy;
use regex::Regex;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

// Common regex patterns
static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$").unwrap()
});

static MOBILE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^09[0-9]{9}$").unwrap());

static PHONE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^0[1-8][0-9]{9}$").unwrap());

static USERNAME_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z]+[\-_a-zA-Z0-9]+$").unwrap());

static ALPHANUMERIC_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9\s.\-]+$").unwrap());

static ALPHA_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-zA-Z0-9\s]+$").unwrap());

static PERSIAN_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[\x{0600}-\x{06FF}\s]+$").unwrap());

static ALPHA_PERSIAN_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9\x{0600}-\x{06FF}\s]+$").unwrap());

/// Built-in verbs of `string` fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringVerb {
    National,
    Filled,
    Json,
    Url,
    Uuid,
    Ip,
    Ipv4,
    Ipv6,
    Email,
    Mobile,
    Phone,
    In,
    NotIn,
    InArray,
    Size,
    Min,
    Max,
    Between,
    Username,
    AlphaNum,
    Alpha,
    Regex,
    NotRegex,
    Contains,
    StartsWith,
    EndsWith,
    Same,
    Different,
}

impl StringVerb {
    pub const ALL: [StringVerb; 28] = [
        StringVerb::National,
        StringVerb::Filled,
        StringVerb::Json,
        StringVerb::Url,
        StringVerb::Uuid,
        StringVerb::Ip,
        StringVerb::Ipv4,
        StringVerb::Ipv6,
        StringVerb::Email,
        StringVerb::Mobile,
        StringVerb::Phone,
        StringVerb::In,
        StringVerb::NotIn,
        StringVerb::InArray,
        StringVerb::Size,
        StringVerb::Min,
        StringVerb::Max,
        StringVerb::Between,
        StringVerb::Username,
        StringVerb::AlphaNum,
        StringVerb::Alpha,
        StringVerb::Regex,
        StringVerb::NotRegex,
        StringVerb::Contains,
        StringVerb::StartsWith,
        StringVerb::EndsWith,
        StringVerb::Same,
        StringVerb::Different,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            StringVerb::National => "national",
            StringVerb::Filled => "filled",
            StringVerb::Json => "json",
            StringVerb::Url => "url",
            StringVerb::Uuid => "uuid",
            StringVerb::Ip => "ip",
            StringVerb::Ipv4 => "ipv4",
            StringVerb::Ipv6 => "ipv6",
            StringVerb::Email => "email",
            StringVerb::Mobile => "mobile",
            StringVerb::Phone => "phone",
            StringVerb::In => "in",
            StringVerb::NotIn => "notIn",
            StringVerb::InArray => "inArray",
            StringVerb::Size => "size",
            StringVerb::Min => "min",
            StringVerb::Max => "max",
            StringVerb::Between => "between",
            StringVerb::Username => "username",
            StringVerb::AlphaNum => "alphaNum",
            StringVerb::Alpha => "alpha",
            StringVerb::Regex => "regex",
            StringVerb::NotRegex => "notRegex",
            StringVerb::Contains => "contains",
            StringVerb::StartsWith => "startsWith",
            StringVerb::EndsWith => "endsWith",
            StringVerb::Same => "same",
            StringVerb::Different => "different",
        }
    }

    pub fn handler(&self) -> VerbFn {
        match self {
            StringVerb::National => national,
            StringVerb::Filled => filled,
            StringVerb::Json => json,
            StringVerb::Url => url,
            StringVerb::Uuid => uuid,
            StringVerb::Ip => ip,
            StringVerb::Ipv4 => ipv4,
            StringVerb::Ipv6 => ipv6,
            StringVerb::Email => email,
            StringVerb::Mobile => mobile,
            StringVerb::Phone => phone,
            StringVerb::In => one_of,
            StringVerb::NotIn => none_of,
            StringVerb::InArray => in_array,
            StringVerb::Size => size,
            StringVerb::Min => min,
            StringVerb::Max => max,
            StringVerb::Between => between,
            StringVerb::Username => username,
            StringVerb::AlphaNum => alpha_num,
            StringVerb::Alpha => alpha,
            StringVerb::Regex => regex,
            StringVerb::NotRegex => not_regex,
            StringVerb::Contains => contains,
            StringVerb::StartsWith => starts_with,
            StringVerb::EndsWith => ends_with,
            StringVerb::Same => same,
            StringVerb::Different => different,
        }
    }

    /// Compares raw document values, so it runs while the field is absent or null.
    pub fn reads_document(&self) -> bool {
        matches!(self, StringVerb::Same | StringVerb::Different)
    }
}

/// Fail with `kind` unless `check` accepts the text.
fn check_text(
    ctx: &FieldContext,
    kind: &str,
    check: impl FnOnce(&str) -> bool,
) -> Result<(), FieldError> {
    if check(ctx.text()?) {
        Ok(())
    } else {
        Err(ctx.fail(kind))
    }
}

fn national(ctx: &mut FieldContext, _doc: &Document) -> Result<(), FieldError> {
    check_text(ctx, "string.national", is_valid_national_code)
}

fn filled(ctx: &mut FieldContext, _doc: &Document) -> Result<(), FieldError> {
    check_text(ctx, "string.filled", |text| !text.is_empty())
}

fn json(ctx: &mut FieldContext, _doc: &Document) -> Result<(), FieldError> {
    check_text(ctx, "string.json", |text| {
        serde_json::from_str::<serde_json::Map<String, serde_json::Value>>(text).is_ok()
    })
}

fn url(ctx: &mut FieldContext, _doc: &Document) -> Result<(), FieldError> {
    check_text(ctx, "string.url", |text| url::Url::parse(text).is_ok())
}

fn uuid(ctx: &mut FieldContext, _doc: &Document) -> Result<(), FieldError> {
    check_text(ctx, "string.uuid", |text| uuid::Uuid::parse_str(text).is_ok())
}

fn ip(ctx: &mut FieldContext, _doc: &Document) -> Result<(), FieldError> {
    check_text(ctx, "string.ip", |text| text.parse::<IpAddr>().is_ok())
}

fn ipv4(ctx: &mut FieldContext, _doc: &Document) -> Result<(), FieldError> {
    check_text(ctx, "string.ipv4", |text| text.parse::<Ipv4Addr>().is_ok())
}

fn ipv6(ctx: &mut FieldContext, _doc: &Document) -> Result<(), FieldError> {
    check_text(ctx, "string.ipv6", |text| text.parse::<Ipv6Addr>().is_ok())
}

fn email(ctx: &mut FieldContext, _doc: &Document) -> Result<(), FieldError> {
    check_text(ctx, "string.email", |text| EMAIL_REGEX.is_match(text))
}

fn mobile(ctx: &mut FieldContext, _doc: &Document) -> Result<(), FieldError> {
    check_text(ctx, "string.mobile", |text| MOBILE_REGEX.is_match(text))
}

fn phone(ctx: &mut FieldContext, _doc: &Document) -> Result<(), FieldError> {
    check_text(ctx, "string.phone", |text| PHONE_REGEX.is_match(text))
}

fn username(ctx: &mut FieldContext, _doc: &Document) -> Result<(), FieldError> {
    check_text(ctx, "string.username", |text| USERNAME_REGEX.is_match(text))
}

fn alpha_num(ctx: &mut FieldContext, _doc: &Document) -> Result<(), FieldError> {
    check_text(ctx, "string.alphaNum", |text| ALPHANUMERIC_REGEX.is_match(text))
}

/// `alpha(fa)` allows Persian letters only, `alpha(fa,en)` Persian and
/// Latin, and `alpha` or `alpha(en)` Latin only.
fn alpha(ctx: &mut FieldContext, _doc: &Document) -> Result<(), FieldError> {
    let persian = ctx.args.iter().any(|arg| arg == "fa");
    let latin = ctx.args.iter().any(|arg| arg == "en");
    let (kind, pattern): (&str, &Regex) = match (persian, latin) {
        (true, true) => ("string.alpha", &*ALPHA_PERSIAN_REGEX),
        (true, false) => ("string.persian", &*PERSIAN_REGEX),
        _ => ("string.alpha", &*ALPHA_REGEX),
    };
    check_text(ctx, kind, |text| pattern.is_match(text))
}

fn compile(ctx: &FieldContext) -> Result<Regex, FieldError> {
    Regex::new(ctx.arg(0)?).map_err(|_| ctx.invalid())
}

fn regex(ctx: &mut FieldContext, _doc: &Document) -> Result<(), FieldError> {
    let pattern = compile(ctx)?;
    check_text(ctx, "string.regex", |text| pattern.is_match(text))
}

fn not_regex(ctx: &mut FieldContext, _doc: &Document) -> Result<(), FieldError> {
    let pattern = compile(ctx)?;
    check_text(ctx, "string.regex", |text| !pattern.is_match(text))
}

fn one_of(ctx: &mut FieldContext, _doc: &Document) -> Result<(), FieldError> {
    check_text(ctx, "string.in", |text| ctx.args.iter().any(|arg| arg == text))
}

fn none_of(ctx: &mut FieldContext, _doc: &Document) -> Result<(), FieldError> {
    check_text(ctx, "string.notIn", |text| ctx.args.iter().all(|arg| arg != text))
}

fn in_array(ctx: &mut FieldContext, doc: &Document) -> Result<(), FieldError> {
    let sibling = ctx.arg(0)?;
    let text = ctx.text()?;
    let found = doc
        .get(sibling)
        .and_then(Value::as_sequence)
        .is_some_and(|items| items.iter().any(|item| item.as_str() == Some(text)));
    if found {
        Ok(())
    } else {
        Err(ctx.fail("string.inArray").with_attribute(sibling))
    }
}

fn char_len(ctx: &FieldContext) -> Result<usize, FieldError> {
    Ok(ctx.text()?.chars().count())
}

fn size(ctx: &mut FieldContext, _doc: &Document) -> Result<(), FieldError> {
    let n = ctx.arg_usize(0)?;
    if char_len(ctx)? != n {
        return Err(ctx.fail("string.size").with_text(n));
    }
    Ok(())
}

fn min(ctx: &mut FieldContext, _doc: &Document) -> Result<(), FieldError> {
    let n = ctx.arg_usize(0)?;
    if char_len(ctx)? < n {
        return Err(ctx.fail("string.min").with_text(n));
    }
    Ok(())
}

fn max(ctx: &mut FieldContext, _doc: &Document) -> Result<(), FieldError> {
    let n = ctx.arg_usize(0)?;
    if char_len(ctx)? > n {
        return Err(ctx.fail("string.max").with_text(n));
    }
    Ok(())
}

fn between(ctx: &mut FieldContext, _doc: &Document) -> Result<(), FieldError> {
    let (low, high) = (ctx.arg_usize(0)?, ctx.arg_usize(1)?);
    let len = char_len(ctx)?;
    if len < low || len > high {
        return Err(ctx
            .fail("string.between")
            .with_text(low)
            .with_text(high));
    }
    Ok(())
}

/// Any-of match over the arguments; the failure lists them.
fn affix(
    ctx: &FieldContext,
    kind: &str,
    matches: fn(&str, &str) -> bool,
) -> Result<(), FieldError> {
    if ctx.args.is_empty() {
        return Err(ctx.invalid());
    }
    let text = ctx.text()?;
    if ctx.args.iter().any(|arg| matches(text, arg)) {
        Ok(())
    } else {
        Err(ctx.fail(kind).with_text(ctx.args.join(",")))
    }
}

fn contains(ctx: &mut FieldContext, _doc: &Document) -> Result<(), FieldError> {
    affix(ctx, "string.contains", |text, arg| text.contains(arg))
}

fn starts_with(ctx: &mut FieldContext, _doc: &Document) -> Result<(), FieldError> {
    affix(ctx, "string.startsWith", |text, arg| text.starts_with(arg))
}

fn ends_with(ctx: &mut FieldContext, _doc: &Document) -> Result<(), FieldError> {
    affix(ctx, "string.endsWith", |text, arg| text.ends_with(arg))
}

/// Raw document values of the field and its sibling; both must exist.
fn pair<'d>(ctx: &FieldContext, doc: &'d Document) -> Result<(&'d Value, &'d Value), FieldError> {
    let other = ctx.arg(0)?;
    match (doc.get(&ctx.name), doc.get(other)) {
        (Some(value), Some(sibling)) => Ok((value, sibling)),
        _ => Err(ctx.invalid()),
    }
}

fn same(ctx: &mut FieldContext, doc: &Document) -> Result<(), FieldError> {
    let (value, sibling) = pair(ctx, doc)?;
    if value != sibling {
        return Err(ctx.fail("same").with_attribute(&ctx.args[0]));
    }
    Ok(())
}

fn different(ctx: &mut FieldContext, doc: &Document) -> Result<(), FieldError> {
    let (value, sibling) = pair(ctx, doc)?;
    if value == sibling {
        return Err(ctx.fail("different").with_attribute(&ctx.args[0]));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Param;

    fn check_with(verb: StringVerb, text: &str, args: &[&str], doc: &Document) -> Result<(), FieldError> {
        let mut ctx = FieldContext::new("f", Some(Value::from(text)));
        ctx.begin(verb.name(), args.iter().map(|a| a.to_string()).collect());
        (verb.handler())(&mut ctx, doc)
    }

    fn check(verb: StringVerb, text: &str, args: &[&str]) -> Result<(), FieldError> {
        check_with(verb, text, args, &Document::new())
    }

    fn passes(verb: StringVerb, text: &str, args: &[&str]) -> bool {
        check(verb, text, args).is_ok()
    }

    #[test]
    fn test_every_verb_has_a_distinct_name() {
        let mut names: Vec<_> = StringVerb::ALL.iter().map(StringVerb::name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), StringVerb::ALL.len());
    }

    #[test]
    fn test_only_comparisons_read_the_document() {
        let eager: Vec<_> = StringVerb::ALL
            .iter()
            .filter(|verb| verb.reads_document())
            .map(StringVerb::name)
            .collect();
        assert_eq!(eager, vec!["same", "different"]);
    }

    #[test]
    fn test_formats() {
        assert!(passes(StringVerb::Email, "user@example.com", &[]));
        assert!(!passes(StringVerb::Email, "user@", &[]));
        assert!(passes(StringVerb::Url, "https://example.com/a?b=1", &[]));
        assert!(!passes(StringVerb::Url, "example", &[]));
        assert!(passes(StringVerb::Uuid, "67e55044-10b1-426f-9247-bb680e5fe0c8", &[]));
        assert!(!passes(StringVerb::Uuid, "67e55044-10b1", &[]));
        assert!(passes(StringVerb::Json, r#"{"a": 1}"#, &[]));
        assert!(!passes(StringVerb::Json, "[1, 2]", &[]));
        assert!(!passes(StringVerb::Json, "{", &[]));
        assert!(passes(StringVerb::National, "0499370899", &[]));
        assert!(!passes(StringVerb::National, "0499370898", &[]));
    }

    #[test]
    fn test_ip_families() {
        assert!(passes(StringVerb::Ip, "10.0.0.1", &[]));
        assert!(passes(StringVerb::Ip, "::1", &[]));
        assert!(!passes(StringVerb::Ip, "10.0.0", &[]));
        assert!(passes(StringVerb::Ipv4, "192.168.1.1", &[]));
        assert!(!passes(StringVerb::Ipv4, "fe80::1", &[]));
        assert!(passes(StringVerb::Ipv6, "fe80::1", &[]));
        assert!(!passes(StringVerb::Ipv6, "192.168.1.1", &[]));
    }

    #[test]
    fn test_phone_numbers() {
        assert!(passes(StringVerb::Mobile, "09123456789", &[]));
        assert!(!passes(StringVerb::Mobile, "9123456789", &[]));
        assert!(!passes(StringVerb::Mobile, "0912345678a", &[]));
        assert!(passes(StringVerb::Phone, "02112345678", &[]));
        assert!(!passes(StringVerb::Phone, "09123456789", &[]));
    }

    #[test]
    fn test_length_bounds_count_characters() {
        assert!(passes(StringVerb::Between, "abc", &["3", "5"]));
        assert!(passes(StringVerb::Between, "abcde", &["3", "5"]));
        assert!(!passes(StringVerb::Between, "abcdef", &["3", "5"]));
        assert!(passes(StringVerb::Size, "علی", &["3"]));
        assert!(passes(StringVerb::Max, "رضا", &["3"]));
        assert!(!passes(StringVerb::Min, "ab", &["3"]));

        let err = check(StringVerb::Min, "ab", &["3"]).unwrap_err();
        assert_eq!(err.params, vec![Param::Attribute("f".into()), Param::Text("3".into())]);
    }

    #[test]
    fn test_bad_arguments_are_invalid() {
        assert_eq!(check(StringVerb::Size, "a", &[]), Err(FieldError::invalid("f")));
        assert_eq!(check(StringVerb::Between, "a", &["1", "x"]), Err(FieldError::invalid("f")));
        assert_eq!(check(StringVerb::Regex, "a", &["(unclosed"]), Err(FieldError::invalid("f")));
        assert_eq!(check(StringVerb::StartsWith, "a", &[]), Err(FieldError::invalid("f")));
    }

    #[test]
    fn test_character_classes() {
        assert!(passes(StringVerb::Username, "ali_reza-1", &[]));
        assert!(!passes(StringVerb::Username, "1ali", &[]));
        assert!(passes(StringVerb::AlphaNum, "Flat 3.2-b", &[]));
        assert!(!passes(StringVerb::AlphaNum, "a_b", &[]));

        assert!(passes(StringVerb::Alpha, "Ali 2", &[]));
        assert!(!passes(StringVerb::Alpha, "علی", &[]));
        assert!(passes(StringVerb::Alpha, "علی رضا", &["fa"]));
        assert_eq!(check(StringVerb::Alpha, "Ali", &["fa"]).unwrap_err().kind, "string.persian");
        assert!(passes(StringVerb::Alpha, "Ali علی", &["fa", "en"]));
        assert!(!passes(StringVerb::Alpha, "Ali!", &["fa", "en"]));
    }

    #[test]
    fn test_regex() {
        assert!(passes(StringVerb::Regex, "ab12", &["^[a-z]+[0-9]+$"]));
        assert!(!passes(StringVerb::Regex, "12ab", &["^[a-z]+[0-9]+$"]));
        assert_eq!(
            check(StringVerb::NotRegex, "admin", &["^admin$"]).unwrap_err().kind,
            "string.regex"
        );
        assert!(passes(StringVerb::NotRegex, "user", &["^admin$"]));
    }

    #[test]
    fn test_membership() {
        assert!(passes(StringVerb::In, "b", &["a", "b"]));
        assert_eq!(check(StringVerb::In, "c", &["a", "b"]).unwrap_err().kind, "string.in");
        assert!(passes(StringVerb::NotIn, "c", &["a", "b"]));
        assert!(!passes(StringVerb::NotIn, "a", &["a", "b"]));
    }

    #[test]
    fn test_in_array() {
        let mut doc = Document::new();
        doc.insert(
            "roles".into(),
            Value::Sequence(vec![Value::from("admin"), Value::from("editor")]),
        );
        doc.insert("label".into(), Value::from("admin"));

        assert!(check_with(StringVerb::InArray, "admin", &["roles"], &doc).is_ok());
        let err = check_with(StringVerb::InArray, "guest", &["roles"], &doc).unwrap_err();
        assert_eq!(err.kind, "string.inArray");
        assert_eq!(err.params[1], Param::Attribute("roles".into()));

        assert!(check_with(StringVerb::InArray, "admin", &["label"], &doc).is_err());
        assert!(check_with(StringVerb::InArray, "admin", &["missing"], &doc).is_err());
    }

    #[test]
    fn test_affixes() {
        assert!(passes(StringVerb::StartsWith, "+98912", &["0", "+98"]));
        assert!(passes(StringVerb::EndsWith, "photo.jpeg", &[".png", ".jpeg"]));
        assert!(!passes(StringVerb::EndsWith, "a.png.txt", &[".png"]));
        assert!(passes(StringVerb::Contains, "hello world", &["lo w"]));

        let err = check(StringVerb::Contains, "abc", &["x", "y"]).unwrap_err();
        assert_eq!(err.params[1], Param::Text("x,y".into()));
    }

    #[test]
    fn test_same_and_different() {
        let mut doc = Document::new();
        doc.insert("f".into(), Value::from("a"));
        doc.insert("g".into(), Value::from("a"));
        doc.insert("h".into(), Value::from("b"));

        assert!(check_with(StringVerb::Same, "a", &["g"], &doc).is_ok());
        assert_eq!(check_with(StringVerb::Same, "a", &["h"], &doc).unwrap_err().kind, "same");
        assert!(check_with(StringVerb::Different, "a", &["h"], &doc).is_ok());
        assert_eq!(
            check_with(StringVerb::Different, "a", &["g"], &doc).unwrap_err().kind,
            "different"
        );
        assert_eq!(
            check_with(StringVerb::Same, "a", &["missing"], &doc),
            Err(FieldError::invalid("f"))
        );
        assert_eq!(
            check_with(StringVerb::Different, "a", &["g"], &Document::new()),
            Err(FieldError::invalid("f"))
        );
    }
}
