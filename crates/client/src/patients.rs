//! Single-patient create, read, update and delete

use chrono::NaiveDate;
use fhir_core::{AdministrativeGender, PATIENT, Patient, home_phone, new_patient};
use serde_json::Value as JsonValue;

use crate::error::ClientError;
use crate::source::FhirSource;

/// Birth date given to every patient created by the tutorial
pub const DEMO_BIRTH_DATE: NaiveDate = match NaiveDate::from_ymd_opt(1994, 1, 2) {
    Some(date) => date,
    None => panic!("invalid demo birth date"),
};

/// Home phone number added by [`update_patient`]
pub const DEMO_PHONE: &str = "123.456.789";

/// Create a patient with one name and the demo birth date
pub async fn create_patient<S: FhirSource>(
    source: &S,
    family_name: &str,
    given_name: &str,
) -> Result<Patient, ClientError> {
    let patient = new_patient(family_name, given_name, DEMO_BIRTH_DATE)?;

    let created = source.create(&to_resource(&patient)?).await?;
    let created: Patient = serde_json::from_value(created)?;

    tracing::info!(
        id = created.id.as_deref().unwrap_or_default(),
        "Patient created"
    );
    Ok(created)
}

/// Read a patient by id
pub async fn read_patient<S: FhirSource>(source: &S, id: &str) -> Result<Patient, ClientError> {
    if id.is_empty() {
        return Err(ClientError::InvalidArgument("id"));
    }

    let resource = source.read(&format!("{}/{}", PATIENT, id)).await?;
    Ok(serde_json::from_value(resource)?)
}

/// Add the demo home phone, mark the gender unknown and store the patient
/// as a full replacement
pub async fn update_patient<S: FhirSource>(
    source: &S,
    patient: &mut Patient,
) -> Result<(), ClientError> {
    if patient.id.as_deref().is_none_or(str::is_empty) {
        return Err(ClientError::InvalidArgument("id"));
    }

    patient.telecom.push(Some(home_phone(DEMO_PHONE)?));
    patient.gender = Some(AdministrativeGender::Unknown);

    source.update(&to_resource(patient)?).await
}

/// Delete a patient by id
pub async fn delete_patient<S: FhirSource>(source: &S, id: &str) -> Result<(), ClientError> {
    if id.is_empty() {
        return Err(ClientError::InvalidArgument("id"));
    }

    source.delete(&format!("{}/{}", PATIENT, id)).await
}

/// JSON body of an outgoing Patient
fn to_resource(patient: &Patient) -> Result<JsonValue, ClientError> {
    let mut resource = serde_json::to_value(patient)?;
    if let Some(object) = resource.as_object_mut() {
        object
            .entry("resourceType")
            .or_insert_with(|| JsonValue::from(PATIENT));
    }
    Ok(resource)
}
