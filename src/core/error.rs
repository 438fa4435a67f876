use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ShowtimesError {
    /// A required field of the report, a movie or a screening is absent or null.
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Template error: {0}")]
    Template(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ShowtimesError {
    pub fn missing(field: impl Into<String>) -> Self {
        ShowtimesError::MissingField { field: field.into() }
    }
}

impl From<std::io::Error> for ShowtimesError {
    fn from(error: std::io::Error) -> Self {
        ShowtimesError::Io(error.to_string())
    }
}

impl From<minijinja::Error> for ShowtimesError {
    fn from(error: minijinja::Error) -> Self {
        ShowtimesError::Template(error.to_string())
    }
}

impl From<serde_json::Error> for ShowtimesError {
    fn from(error: serde_json::Error) -> Self {
        ShowtimesError::Validation(error.to_string())
    }
}

pub type ShowtimesResult<T> = Result<T, ShowtimesError>;
