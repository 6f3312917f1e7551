//! Placeholder interpolation and value rendering for messages

use chrono::{DateTime, Utc};

/// Replace positional placeholders `{0}`, `{1}`, … with `args`.
///
/// Placeholders without a matching argument are left untouched, as is any
/// brace text that is not a plain index.
///
/// ```
/// use rulebook_i18n::interpolate;
///
/// assert_eq!(interpolate("{0} must be between {1} and {2}.", &["age", "18", "65"]),
///            "age must be between 18 and 65.");
/// ```
pub fn interpolate<S: AsRef<str>>(template: &str, args: &[S]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];

        let replaced = after.find('}').and_then(|close| {
            let index: usize = after[..close].parse().ok()?;
            let arg = args.get(index)?;
            Some((arg.as_ref(), close))
        });

        match replaced {
            Some((arg, close)) => {
                out.push_str(arg);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}

/// Render an instant the way validation messages show dates: `2024-01-31/13:05` (UTC).
pub fn format_date(instant: &DateTime<Utc>) -> String {
    instant.format("%Y-%m-%d/%H:%M").to_string()
}

/// Render a number with the shortest representation (`18`, `2.5`).
pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}
