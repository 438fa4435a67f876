use std::env;
use std::path::PathBuf;

use super::error::{ShowtimesError, ShowtimesResult};

pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";
pub const DEFAULT_FALLBACK_TEXT: &str = "Brak dostępnych godzin seansów";
pub const DEFAULT_RECIPIENTS_FILE: &str = "emails.txt";
pub const DEFAULT_DAYS_AHEAD: u32 = 10;

/// Settings for rendering the showtimes layout.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Directory holding a `showtimes.html` that replaces the embedded layout.
    pub templates_dir: Option<PathBuf>,
    /// chrono format applied to ISO dates in the header.
    pub date_format: String,
    pub fallback_text: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        RenderConfig {
            templates_dir: None,
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            fallback_text: DEFAULT_FALLBACK_TEXT.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MailConfig {
    pub sender_email: String,
    pub recipients_file: PathBuf,
    pub days_ahead: u32,
}

impl Default for MailConfig {
    fn default() -> Self {
        MailConfig {
            sender_email: String::new(),
            recipients_file: PathBuf::from(DEFAULT_RECIPIENTS_FILE),
            days_ahead: DEFAULT_DAYS_AHEAD,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub render: RenderConfig,
    pub mail: MailConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            host: "0.0.0.0".to_string(),
            port: 8080,
            render: RenderConfig::default(),
            mail: MailConfig::default(),
        }
    }
}

impl AppConfig {
    /// Reads the configuration from the process environment. Callers load
    /// `.env` beforehand.
    pub fn from_env() -> ShowtimesResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> ShowtimesResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = AppConfig::default();

        let port = match lookup("PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|e| ShowtimesError::Config(format!("PORT={}: {}", raw, e)))?,
            None => defaults.port,
        };

        let days_ahead = match lookup("DAYS_AHEAD") {
            Some(raw) => raw
                .parse::<u32>()
                .map_err(|e| ShowtimesError::Config(format!("DAYS_AHEAD={}: {}", raw, e)))?,
            None => defaults.mail.days_ahead,
        };
        if days_ahead == 0 {
            return Err(ShowtimesError::Config("DAYS_AHEAD must be at least 1".to_string()));
        }

        Ok(AppConfig {
            host: lookup("HOST").unwrap_or(defaults.host),
            port,
            render: RenderConfig {
                templates_dir: lookup("TEMPLATES_DIR")
                    .filter(|dir| !dir.trim().is_empty())
                    .map(PathBuf::from),
                date_format: lookup("DATE_FORMAT").unwrap_or(defaults.render.date_format),
                fallback_text: lookup("FALLBACK_TEXT").unwrap_or(defaults.render.fallback_text),
            },
            mail: MailConfig {
                sender_email: lookup("SENDER_EMAIL").unwrap_or(defaults.mail.sender_email),
                recipients_file: lookup("RECIPIENTS_FILE")
                    .map(PathBuf::from)
                    .unwrap_or(defaults.mail.recipients_file),
                days_ahead,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_environment_is_empty() {
        let config = AppConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.render.fallback_text, DEFAULT_FALLBACK_TEXT);
        assert_eq!(config.render.date_format, "%Y-%m-%d");
        assert!(config.render.templates_dir.is_none());
        assert_eq!(config.mail.days_ahead, 10);
        assert_eq!(config.mail.recipients_file, PathBuf::from("emails.txt"));
    }

    #[test]
    fn reads_overrides() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("PORT", "9000"),
            ("TEMPLATES_DIR", "layouts"),
            ("SENDER_EMAIL", "kino@example.com"),
            ("DAYS_AHEAD", "7"),
        ]))
        .unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.render.templates_dir, Some(PathBuf::from("layouts")));
        assert_eq!(config.mail.sender_email, "kino@example.com");
        assert_eq!(config.mail.days_ahead, 7);
    }

    #[test]
    fn rejects_bad_numbers() {
        let err = AppConfig::from_lookup(lookup_from(&[("PORT", "eighty")])).unwrap_err();
        assert!(matches!(err, ShowtimesError::Config(_)));

        let err = AppConfig::from_lookup(lookup_from(&[("DAYS_AHEAD", "0")])).unwrap_err();
        assert!(matches!(err, ShowtimesError::Config(_)));
    }
}
