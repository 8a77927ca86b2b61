use thiserror::Error;

/// FHIR model errors
#[derive(Debug, Error)]
pub enum FhirError {
    #[error("Invalid resource: {0}")]
    Invalid(String),

    #[error("Failed to decode resource {0}")]
    Decode(String),
}
