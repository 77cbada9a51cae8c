//! Message parser: raw bytes to a structured [`Message`]

use crate::error::ParseError;
use crate::types::{Message, ParseOutcome, Participant};
use chrono::{DateTime, NaiveDateTime, Utc};
use mailparse::{DispositionType, MailHeader, ParsedMail};
use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, warn};

/// Trailing zone comment such as `(CEST)` or `(UTC)`
static DATE_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\([^)]*\)\s*$").unwrap());

/// Day, month name, year and time of day, in RFC 2822 order
static RFC2822_SHAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b\d{1,2}\s+(jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*\s+\d{2,4}\s+\d{1,2}:\d{2}",
    )
    .unwrap()
});

const OFFSET_LAYOUTS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S %z",
    "%Y-%m-%dT%H:%M:%S%z",
    "%a, %d %b %Y %H:%M %z",
    "%d %b %Y %H:%M:%S %z",
];

const NAIVE_LAYOUTS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%a, %d %b %Y %H:%M:%S",
    "%d %b %Y %H:%M:%S",
    "%a %b %d %H:%M:%S %Y",
    "%b %d %Y %H:%M:%S",
    "%b %d %Y %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
];

/// Parse a raw message.
///
/// Never fails on malformed content: fields that cannot be read fall back to
/// defaults and the problem is recorded in [`ParseOutcome::Degraded`].
#[must_use]
pub fn parse_message(source: &str, raw: &[u8]) -> ParseOutcome {
    let parsed = match mailparse::parse_mail(raw) {
        Ok(parsed) => parsed,
        Err(e) => {
            warn!(source, error = %e, "Unreadable message");
            return ParseOutcome::Unreadable(ParseError::Structure(e.to_string()));
        }
    };

    let mut issues = Vec::new();

    let date = extract_date(&parsed.headers, &mut issues);
    let from = extract_from(&parsed.headers, &mut issues);
    let to = extract_addresses(&parsed.headers, "to", &mut issues);
    let cc = extract_addresses(&parsed.headers, "cc", &mut issues);
    let subject = header_value(&parsed.headers, "subject").unwrap_or_default();
    let body = extract_body(&parsed, &mut issues);

    debug!(source, subject = %subject, from = %from.address, "Parsed message");

    let message = Message {
        source: source.to_string(),
        date,
        subject,
        from,
        to,
        cc,
        body,
    };

    if issues.is_empty() {
        ParseOutcome::Parsed(message)
    } else {
        for issue in &issues {
            warn!(source, %issue, "Message parsed with defaults");
        }
        ParseOutcome::Degraded { message, issues }
    }
}

/// Parse a Date header value into a UTC instant.
///
/// Tries RFC 2822, RFC 3339, a few ISO-like, ctime and day-first layouts and
/// finally the lenient `mailparse` date parser, which only sees values shaped
/// like `15 Mar 2024 10:00`. Values without an offset are taken as UTC. A date
/// without a time of day is not accepted.
#[must_use]
pub fn parse_date(value: &str) -> Option<DateTime<Utc>> {
    let cleaned = DATE_COMMENT.replace(value.trim(), "");
    let cleaned = cleaned.trim();

    if !cleaned.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc2822(cleaned) {
        return Some(dt.with_timezone(&Utc));
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(cleaned) {
        return Some(dt.with_timezone(&Utc));
    }

    for layout in OFFSET_LAYOUTS {
        if let Ok(dt) = DateTime::parse_from_str(cleaned, layout) {
            return Some(dt.with_timezone(&Utc));
        }
    }

    for layout in NAIVE_LAYOUTS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(cleaned, layout) {
            return Some(dt.and_utc());
        }
    }

    if !RFC2822_SHAPE.is_match(cleaned) {
        return None;
    }
    mailparse::dateparse(cleaned)
        .ok()
        .and_then(|ts| DateTime::from_timestamp(ts, 0))
}

fn header_value(headers: &[MailHeader], name: &str) -> Option<String> {
    headers
        .iter()
        .find(|h| h.get_key().eq_ignore_ascii_case(name))
        .map(MailHeader::get_value)
}

fn extract_date(headers: &[MailHeader], issues: &mut Vec<ParseError>) -> Option<DateTime<Utc>> {
    let Some(value) = header_value(headers, "date") else {
        issues.push(ParseError::MissingHeader("Date".into()));
        return None;
    };

    let date = parse_date(&value);
    if date.is_none() {
        issues.push(ParseError::InvalidDate(value));
    }
    date
}

fn extract_from(headers: &[MailHeader], issues: &mut Vec<ParseError>) -> Participant {
    let Some(value) = header_value(headers, "from") else {
        issues.push(ParseError::MissingHeader("From".into()));
        return Participant::default();
    };

    let from = Participant::parse(&value);
    if !from.is_known() {
        issues.push(ParseError::InvalidHeader {
            header: "From".into(),
            details: format!("Could not parse: {value}"),
        });
    }
    from
}

/// Every occurrence of the header contributes, matching is case-insensitive.
fn extract_addresses(
    headers: &[MailHeader],
    header_name: &str,
    issues: &mut Vec<ParseError>,
) -> Vec<Participant> {
    let mut addresses = Vec::new();

    for header in headers
        .iter()
        .filter(|h| h.get_key().eq_ignore_ascii_case(header_name))
    {
        let value = header.get_value();
        for participant in Participant::parse_list(&value) {
            if participant.is_known() {
                addresses.push(participant);
            } else {
                issues.push(ParseError::InvalidHeader {
                    header: header.get_key(),
                    details: format!("Unbalanced address in: {value}"),
                });
            }
        }
    }

    addresses
}

fn extract_body(parsed: &ParsedMail, issues: &mut Vec<ParseError>) -> String {
    let mut text = String::new();

    if parsed.subparts.is_empty() {
        match parsed.get_body() {
            Ok(body) => text = body,
            Err(e) => issues.push(ParseError::Decode(e.to_string())),
        }
    } else {
        extract_body_recursive(parsed, &mut text, issues);
    }

    text
}

/// Attachment exclusion is per part; parts after an attachment are still read.
fn extract_body_recursive(parsed: &ParsedMail, text: &mut String, issues: &mut Vec<ParseError>) {
    for part in &parsed.subparts {
        if !part.subparts.is_empty() {
            extract_body_recursive(part, text, issues);
            continue;
        }

        if matches!(
            part.get_content_disposition().disposition,
            DispositionType::Attachment
        ) {
            continue;
        }

        if !part.ctype.mimetype.eq_ignore_ascii_case("text/plain") {
            continue;
        }

        match part.get_body() {
            Ok(body) => {
                if !text.is_empty() && !text.ends_with('\n') {
                    text.push('\n');
                }
                text.push_str(&body);
            }
            Err(e) => issues.push(ParseError::Decode(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn strips_zone_comment() {
        let dt = parse_date("Tue, 1 Jul 2003 10:52:37 +0200 (CEST)").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2003, 7, 1, 8, 52, 37).unwrap());
    }

    #[test]
    fn naive_layout_is_utc() {
        let dt = parse_date("2024-03-05 14:00:00").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2024, 3, 5, 14, 0, 0).unwrap());
    }

    #[test]
    fn rfc3339_is_converted() {
        let dt = parse_date("2024-03-05T14:00:00-05:00").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2024, 3, 5, 19, 0, 0).unwrap());
    }

    #[test]
    fn text_without_digits_is_rejected() {
        assert!(parse_date("sometime last week").is_none());
        assert!(parse_date("").is_none());
    }

    #[test]
    fn numeric_garbage_is_rejected() {
        for value in ["15.03.2024", "2024-03-15", "3", "version 2", "99/99/99"] {
            assert_eq!(parse_date(value), None, "{value}");
        }
    }

    #[test]
    fn ctime_layout() {
        let dt = parse_date("Fri Mar 15 10:00:00 2024").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2024, 3, 15, 10, 0, 0).unwrap());
    }

    #[test]
    fn month_name_first_layout() {
        let dt = parse_date("Mar 15 2024 10:00").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2024, 3, 15, 10, 0, 0).unwrap());
    }

    #[test]
    fn slash_layouts_prefer_month_first() {
        let dt = parse_date("15/03/2024 10:00").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2024, 3, 15, 10, 0, 0).unwrap());

        let dt = parse_date("03/04/2024 10:00").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2024, 3, 4, 10, 0, 0).unwrap());
    }

    #[test]
    fn wrong_weekday_falls_back_to_lenient_parser() {
        let dt = parse_date("Sat, 15 Mar 2024 10:00:00 +0000").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2024, 3, 15, 10, 0, 0).unwrap());
    }
}
