//! Backup name derivation
//!
//! A backup's name is `<YYYY-MM-DD>-<slug(summary)>`. It doubles as the
//! remote folder name and the local cache file stem, so it only ever
//! contains lowercase ASCII word characters and single hyphens.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Offset-carrying timestamp formats, tried after RFC 3339
const ZONED_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f %z", "%Y-%m-%d %H:%M:%S%.f%z"];

/// Timestamp formats without an offset
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
];

/// Plain calendar date formats, numeric and with month names
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%B %d, %Y",
    "%B %d %Y",
    "%d %B %Y",
    "%b %d, %Y",
    "%d %b %Y",
];

/// Turn free text into a lowercase, hyphen-separated slug
///
/// Every run of characters outside `[A-Za-z0-9_]` (whitespace included)
/// collapses into a single hyphen, and hyphens never lead or trail.
///
/// ```
/// use bkp::models::naming::slug;
///
/// assert_eq!(slug("Hello, World!  Backup"), "hello-world-backup");
/// ```
pub fn slug(text: &str) -> String {
    text.trim_end_matches(['\r', '\n'])
        .split(|c: char| !is_word_char(c))
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-")
        .to_ascii_lowercase()
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Parse the manifest date text, returning the calendar date as written
///
/// Offsets are honoured: `2024-03-05 23:30:00 -0800` is March 5th, not the
/// UTC day it falls on.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.date_naive());
    }

    if let Ok(dt) = DateTime::parse_from_rfc2822(text) {
        return Some(dt.date_naive());
    }

    for format in ZONED_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(text, format) {
            return Some(dt.date_naive());
        }
    }

    parse_naive(text).or_else(|| strip_zone_name(text).and_then(parse_naive))
}

fn parse_naive(text: &str) -> Option<NaiveDate> {
    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, format) {
            return Some(dt.date());
        }
    }

    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
}

/// Drop a trailing zone abbreviation such as `UTC` or `CET`
fn strip_zone_name(text: &str) -> Option<&str> {
    let (rest, zone) = text.rsplit_once(' ')?;
    let is_zone = (1..=5).contains(&zone.len()) && zone.chars().all(|c| c.is_ascii_uppercase());
    is_zone.then(|| rest.trim_end())
}

/// Combine a date and a summary into the canonical backup name
pub fn derive_name(date: NaiveDate, summary: &str) -> String {
    format!("{}-{}", date.format("%Y-%m-%d"), slug(summary))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_collapses_punctuation_and_spaces() {
        assert_eq!(slug("Hello, World!  Backup"), "hello-world-backup");
        assert_eq!(slug("Nightly DB Dump"), "nightly-db-dump");
    }

    #[test]
    fn test_slug_strips_edges_and_newline() {
        assert_eq!(slug("  --Weekly photos--  \n"), "weekly-photos");
        assert_eq!(slug("...release v1.2..."), "release-v1-2");
    }

    #[test]
    fn test_slug_keeps_underscores() {
        assert_eq!(slug("db_prod snapshot"), "db_prod-snapshot");
    }

    #[test]
    fn test_slug_drops_non_ascii() {
        assert_eq!(slug("Café Übersicht"), "caf-bersicht");
    }

    #[test]
    fn test_slug_properties() {
        let samples = [
            "Hello, World!  Backup",
            "\tTabs\tand\nnewlines\n",
            "---",
            "",
            "MiXeD CaSe 123",
            "a  -  b",
            "emoji 🎉 party",
        ];

        for sample in samples {
            let s = slug(sample);
            assert!(!s.chars().any(char::is_whitespace), "{s:?}");
            assert!(!s.starts_with('-') && !s.ends_with('-'), "{s:?}");
            assert!(!s.contains("--"), "{s:?}");
            assert_eq!(s, s.to_lowercase(), "{s:?}");
        }
    }

    #[test]
    fn test_parse_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();

        assert_eq!(parse_date("2024-03-05"), Some(expected));
        assert_eq!(parse_date("2024/03/05"), Some(expected));
        assert_eq!(parse_date("2024-03-05 10:11:12"), Some(expected));
        assert_eq!(parse_date("2024-03-05T10:11:12"), Some(expected));
        assert_eq!(parse_date("2024-03-05T10:11:12Z"), Some(expected));
        assert_eq!(parse_date("2024-03-05 10:11:12 +0200"), Some(expected));
    }

    #[test]
    fn test_parse_date_loose_formats() {
        let expected = Some(NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());

        assert_eq!(parse_date("2024-03-05 10:11:12 UTC"), expected);
        assert_eq!(parse_date("2024-03-05 10:11:12 CET"), expected);
        assert_eq!(parse_date("Tue, 05 Mar 2024 10:11:12 +0000"), expected);
        assert_eq!(parse_date("2024-03-05T10:11"), expected);
        assert_eq!(parse_date("March 5, 2024"), expected);
        assert_eq!(parse_date("5 Mar 2024"), expected);
        assert_eq!(parse_date("2024/03/05 10:11:12"), expected);
    }

    #[test]
    fn test_parse_date_keeps_written_day() {
        let date = parse_date("2024-03-05 23:30:00 -0800").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());
    }

    #[test]
    fn test_parse_date_rejects_garbage() {
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("   "), None);
        assert_eq!(parse_date("yesterday"), None);
        assert_eq!(parse_date("2024-13-40"), None);
        assert_eq!(parse_date("UTC"), None);
        assert_eq!(parse_date("soon UTC"), None);
    }

    #[test]
    fn test_derive_name() {
        let date = parse_date("2024-03-05").unwrap();
        assert_eq!(
            derive_name(date, "Nightly DB Dump"),
            "2024-03-05-nightly-db-dump"
        );
    }
}
