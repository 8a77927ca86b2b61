//! Patient helpers over the fhir-sdk R4B model
//!
//! Patients are built with the fhir-sdk builders and decoded through its
//! serde impls, so a resource that reaches the client has valid codes and
//! primitives, including extended primitives such as `_given`.

use chrono::NaiveDate;
use fhir_sdk::Date;
use fhir_sdk::r4b::codes::{ContactPointSystem, ContactPointUse};
use fhir_sdk::r4b::resources::{Patient, PatientBuilder};
use fhir_sdk::r4b::types::{ContactPoint, ContactPointBuilder, HumanName, HumanNameBuilder};

use crate::error::FhirError;

/// Resource type name of Patient
pub const PATIENT: &str = "Patient";

/// Resource type name of Encounter
pub const ENCOUNTER: &str = "Encounter";

/// Create an unsaved patient with a single name and a birth date
pub fn new_patient(family: &str, given: &str, birth_date: NaiveDate) -> Result<Patient, FhirError> {
    let name = HumanNameBuilder::default()
        .family(family.to_string())
        .given(vec![Some(given.to_string())])
        .build()
        .map_err(|e| FhirError::Invalid(format!("HumanName: {}", e)))?;

    let birth_date = birth_date
        .format("%Y-%m-%d")
        .to_string()
        .parse::<Date>()
        .map_err(|_| FhirError::Invalid(format!("Invalid birth date: {}", birth_date)))?;

    PatientBuilder::default()
        .name(vec![Some(name)])
        .birth_date(birth_date)
        .build()
        .map_err(|e| FhirError::Invalid(format!("Patient: {}", e)))
}

/// Home phone contact point
pub fn home_phone(number: &str) -> Result<ContactPoint, FhirError> {
    ContactPointBuilder::default()
        .system(ContactPointSystem::Phone)
        .value(number.to_string())
        .r#use(ContactPointUse::Home)
        .build()
        .map_err(|e| FhirError::Invalid(format!("ContactPoint: {}", e)))
}

/// Display form of a name: `text` when present, otherwise the name parts
/// joined by spaces. Null parts are left out.
pub fn format_name(name: &HumanName) -> String {
    if let Some(text) = &name.text {
        return text.clone();
    }

    name.prefix
        .iter()
        .flatten()
        .chain(name.given.iter().flatten())
        .chain(name.family.iter())
        .chain(name.suffix.iter().flatten())
        .map(String::as_str)
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Lookups the client needs on a [`Patient`]
pub trait PatientExt {
    /// Relative reference `Patient/{id}`, once the server has assigned an id
    fn reference(&self) -> Option<String>;

    /// Display form of the first name, if the patient has one
    fn display_name(&self) -> Option<String>;
}

impl PatientExt for Patient {
    fn reference(&self) -> Option<String> {
        self.id.as_ref().map(|id| format!("{}/{}", PATIENT, id))
    }

    fn display_name(&self) -> Option<String> {
        self.name.iter().flatten().next().map(format_name)
    }
}
