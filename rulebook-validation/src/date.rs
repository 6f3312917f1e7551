//! Date phrase resolution

use chrono::{DateTime, Duration, Utc};

/// Resolve `now`, `today`, `yesterday`, `tomorrow` or a strict RFC 3339
/// timestamp into a UTC instant.
///
/// Day literals are truncated to midnight UTC.
pub fn parse_date_phrase(text: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    parse_date_phrase_at(text, Utc::now())
}

/// [`parse_date_phrase`] against a fixed clock.
pub fn parse_date_phrase_at(
    text: &str,
    now: DateTime<Utc>,
) -> Result<DateTime<Utc>, chrono::ParseError> {
    let midnight = |instant: DateTime<Utc>| {
        instant
            .date_naive()
            .and_hms_opt(0, 0, 0)
            .map(|day| day.and_utc())
            .unwrap_or(instant)
    };

    match text {
        "now" => Ok(now),
        "today" => Ok(midnight(now)),
        "yesterday" => Ok(midnight(now - Duration::days(1))),
        "tomorrow" => Ok(midnight(now + Duration::days(1))),
        _ => DateTime::parse_from_rfc3339(text).map(|t| t.with_timezone(&Utc)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn clock() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 2, 29, 17, 45, 12).unwrap()
    }

    #[test]
    fn test_literals() {
        let now = clock();
        assert_eq!(parse_date_phrase_at("now", now).unwrap(), now);
        assert_eq!(
            parse_date_phrase_at("today", now).unwrap(),
            Utc.with_ymd_and_hms(2024, 2, 29, 0, 0, 0).unwrap()
        );
        assert_eq!(
            parse_date_phrase_at("yesterday", now).unwrap(),
            Utc.with_ymd_and_hms(2024, 2, 28, 0, 0, 0).unwrap()
        );
        assert_eq!(
            parse_date_phrase_at("tomorrow", now).unwrap(),
            Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_rfc3339_normalized_to_utc() {
        let parsed = parse_date_phrase_at("2024-01-01T03:30:00+03:30", clock()).unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_rejects_loose_formats() {
        for text in ["2024-01-01", "Today", "01/02/2024", "", "2024-01-01 10:00:00"] {
            assert!(parse_date_phrase_at(text, clock()).is_err(), "{}", text);
        }
    }

    #[test]
    fn test_wall_clock_variant() {
        assert!(parse_date_phrase("now").unwrap() <= Utc::now());
    }
}
