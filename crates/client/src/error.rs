//! Client error handling

use fhir_core::FhirError;
use reqwest::StatusCode;
use thiserror::Error;

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// Rejected locally, no request was sent
    #[error("Invalid argument: {0}")]
    InvalidArgument(&'static str),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("FHIR server error ({status}): {message}")]
    Server { status: StatusCode, message: String },

    #[error("Invalid URL: {0}")]
    Url(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Fhir(#[from] FhirError),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ClientError {
    /// Whether the error was raised before contacting the server
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, ClientError::InvalidArgument(_))
    }
}
