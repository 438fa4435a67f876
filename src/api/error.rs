use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use std::fmt;

use crate::core::ShowtimesError;

#[derive(Debug)]
pub struct ApiError {
    message: String,
    status_code: StatusCode,
}

impl ApiError {
    pub fn new(message: impl Into<String>, status_code: StatusCode) -> Self {
        ApiError {
            message: message.into(),
            status_code,
        }
    }

    pub fn internal_server_error(message: impl Into<String>) -> Self {
        Self::new(message, StatusCode::INTERNAL_SERVER_ERROR)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(message, StatusCode::BAD_REQUEST)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl ResponseError for ApiError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code)
            .json(serde_json::json!({
                "error": self.message,
                "status": self.status_code.as_u16()
            }))
    }

    fn status_code(&self) -> StatusCode {
        self.status_code
    }
}

impl From<ShowtimesError> for ApiError {
    fn from(err: ShowtimesError) -> Self {
        match err {
            ShowtimesError::MissingField { .. } | ShowtimesError::Validation(_) => {
                ApiError::bad_request(err.to_string())
            }
            ShowtimesError::Template(_) | ShowtimesError::Io(_) | ShowtimesError::Config(_) => {
                ApiError::internal_server_error(err.to_string())
            }
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::internal_server_error(err.to_string())
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
