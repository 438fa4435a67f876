use std::fmt::Write;

use chrono::{DateTime, NaiveDate};
use minijinja::Value;

use crate::core::DEFAULT_DATE_FORMAT;

/// Reformats an ISO date with the given chrono format; other values pass
/// through unchanged.
pub fn date_filter(value: Value, format: Option<Value>) -> Result<Value, minijinja::Error> {
    let format_str = format
        .as_ref()
        .and_then(|f| f.as_str())
        .unwrap_or(DEFAULT_DATE_FORMAT);

    if let Some(date_str) = value.as_str() {
        return Ok(Value::from(format_date_string(date_str, format_str)));
    }
    Ok(value)
}

/// Keeps http(s) and relative links, replaces any other scheme with `#`.
/// The result is attribute-escaped here and marked safe so auto-escaping
/// leaves the slashes of the URL alone.
pub fn safe_url_filter(value: Value) -> Result<Value, minijinja::Error> {
    let url = value.as_str().ok_or_else(|| {
        minijinja::Error::new(
            minijinja::ErrorKind::InvalidOperation,
            "Link must be a string",
        )
    })?;

    Ok(Value::from_safe_string(escape_attr(&sanitize_url(url))))
}

// Helpers

/// Unparseable dates and invalid format strings leave the input as is.
pub fn format_date_string(date_str: &str, format: &str) -> String {
    let mut out = String::new();

    if let Ok(date) = NaiveDate::parse_from_str(date_str, "%Y-%m-%d") {
        if write!(out, "{}", date.format(format)).is_ok() {
            return out;
        }
    } else if let Ok(datetime) = DateTime::parse_from_rfc3339(date_str) {
        if write!(out, "{}", datetime.format(format)).is_ok() {
            return out;
        }
    }

    date_str.to_string()
}

pub fn sanitize_url(url: &str) -> String {
    let trimmed = url.trim();

    // Anything before the first ':' that precedes '/', '?' or '#' is a scheme.
    let scheme_end = trimmed
        .find(|c: char| matches!(c, ':' | '/' | '?' | '#'))
        .filter(|&i| trimmed[i..].starts_with(':'));

    match scheme_end {
        None => trimmed.to_string(),
        Some(i) => {
            let scheme = trimmed[..i].to_ascii_lowercase();
            if scheme == "http" || scheme == "https" {
                trimmed.to_string()
            } else {
                "#".to_string()
            }
        }
    }
}

pub fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_iso_dates() {
        assert_eq!(format_date_string("2024-01-02", "%d.%m.%Y"), "02.01.2024");
        assert_eq!(format_date_string("2024-01-02T18:00:00+01:00", "%Y-%m-%d"), "2024-01-02");
        assert_eq!(format_date_string("jutro", "%Y-%m-%d"), "jutro");
        assert_eq!(format_date_string("2024-01-02", "%Q"), "2024-01-02");
    }

    #[test]
    fn date_filter_defaults_to_iso() {
        let out = date_filter(Value::from("2024-01-07"), None).unwrap();
        assert_eq!(out.as_str(), Some("2024-01-07"));
    }

    #[test]
    fn keeps_http_and_relative_links() {
        assert_eq!(sanitize_url("https://www.kinonh.pl/film/1"), "https://www.kinonh.pl/film/1");
        assert_eq!(sanitize_url("HTTP://example.com"), "HTTP://example.com");
        assert_eq!(sanitize_url("/film.php?id=7"), "/film.php?id=7");
        assert_eq!(sanitize_url("//cdn.example.com/a"), "//cdn.example.com/a");
        assert_eq!(sanitize_url("film.php?t=12:30"), "film.php?t=12:30");
    }

    #[test]
    fn replaces_other_schemes() {
        assert_eq!(sanitize_url("javascript:alert(1)"), "#");
        assert_eq!(sanitize_url("  JavaScript:alert(1)"), "#");
        assert_eq!(sanitize_url("data:text/html;base64,AAAA"), "#");
    }

    #[test]
    fn safe_url_escapes_attribute_characters() {
        let out = safe_url_filter(Value::from("https://example.com/?a=1&b=\"x\"")).unwrap();
        assert_eq!(out.as_str(), Some("https://example.com/?a=1&amp;b=&quot;x&quot;"));
        assert!(out.is_safe());
    }

    #[test]
    fn safe_url_rejects_non_strings() {
        assert!(safe_url_filter(Value::from(42)).is_err());
    }
}
