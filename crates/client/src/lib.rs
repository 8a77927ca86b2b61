//! fhir-client library crate
//!
//! A small FHIR REST client and the tutorial operations built on it:
//! single-patient CRUD and a paged patient collection with an optional
//! encounter filter. The binary entrypoint is in `main.rs`.

mod client;
pub mod collector;
pub mod config;
mod error;
pub mod pages;
pub mod patients;
mod source;

#[cfg(test)]
mod testing;

pub use client::{FHIR_JSON, FhirClient, REQUEST_ID_HEADER};
pub use collector::{CollectOptions, Collection, collect_patients};
pub use config::{Config, ServerProfile};
pub use error::ClientError;
pub use pages::Pages;
pub use patients::{create_patient, delete_patient, read_patient, update_patient};
pub use source::FhirSource;
