//! fhir-core: Shared FHIR R4 types and utilities
//!
//! This crate provides the resource types the tutorial client exchanges
//! with a FHIR server: Patient (from fhir-sdk), Bundle and OperationOutcome.

pub mod bundle;
pub mod error;
pub mod outcome;
pub mod patient;

// Re-export fhir-sdk types
pub use fhir_sdk::r4b::codes::AdministrativeGender;
pub use fhir_sdk::r4b::resources::Patient;
pub use fhir_sdk::r4b::types::{ContactPoint, HumanName};

// Re-export our types
pub use bundle::{Bundle, BundleEntry, BundleEntrySearch, BundleLink, BundleType};
pub use error::FhirError;
pub use outcome::{IssueSeverity, IssueType, OperationOutcome, OperationOutcomeIssue};
pub use patient::{ENCOUNTER, PATIENT, PatientExt, format_name, home_phone, new_patient};
