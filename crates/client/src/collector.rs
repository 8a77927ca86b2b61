//! Patient collection across search pages, with an optional encounter filter
//!
//! Walks the pages of a Patient search in order and, for every patient,
//! runs an Encounter search scoped to `patient=Patient/{id}`.
//!
//! The size check happens twice: before each acceptance and after each
//! page. Both use `accepted > max_patients`, so one patient past the
//! nominal maximum can be accepted. `patients_with_encounters` receives
//! every accepted id whether or not encounters were found. Both are
//! candidates for correction.
//!
//! An entry that is not a Patient is skipped. A Patient payload that fails
//! to decode aborts the run.

use fhir_core::{ENCOUNTER, FhirError, PATIENT, Patient, PatientExt};

use crate::error::ClientError;
use crate::pages::Pages;
use crate::source::FhirSource;

/// Parameters of a collection run
#[derive(Debug, Clone)]
pub struct CollectOptions {
    /// Filter expressions such as `name=jo`; empty means unfiltered
    pub criteria: Vec<String>,
    pub max_patients: usize,
    /// Accept only patients referenced by at least one Encounter
    pub only_with_encounters: bool,
}

impl CollectOptions {
    pub const DEFAULT_MAX_PATIENTS: usize = 20;

    pub fn with_criteria<I, T>(mut self, criteria: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.criteria = criteria.into_iter().map(Into::into).collect();
        self
    }

    pub fn max_patients(mut self, max_patients: usize) -> Self {
        self.max_patients = max_patients;
        self
    }

    pub fn only_with_encounters(mut self, only_with_encounters: bool) -> Self {
        self.only_with_encounters = only_with_encounters;
        self
    }
}

impl Default for CollectOptions {
    fn default() -> Self {
        Self {
            criteria: Vec::new(),
            max_patients: Self::DEFAULT_MAX_PATIENTS,
            only_with_encounters: false,
        }
    }
}

/// Result of a collection run
#[derive(Debug, Clone, Default)]
pub struct Collection {
    /// Accepted patients in page-then-entry order
    pub patients: Vec<Patient>,
    /// Ids of accepted patients
    pub patients_with_encounters: Vec<String>,
    /// Entries seen across all pages, including skipped ones
    pub entries_seen: usize,
    pub pages_fetched: usize,
}

impl Collection {
    pub fn len(&self) -> usize {
        self.patients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patients.is_empty()
    }

    fn over_limit(&self, max_patients: usize) -> bool {
        self.patients.len() > max_patients
    }
}

/// Collect patients from `source`.
///
/// Any failure of the source aborts the run; no partial result is returned.
pub async fn collect_patients<S: FhirSource>(
    source: &S,
    options: &CollectOptions,
) -> Result<Collection, ClientError> {
    let mut collection = Collection::default();
    let mut pages = Pages::new(source, PATIENT, options.criteria.clone());

    while let Some(page) = pages.next().await? {
        tracing::info!(
            total = ?page.total,
            entry_count = page.entry.len(),
            "Patient bundle"
        );

        for entry in &page.entry {
            let entry_number = collection.entries_seen;
            collection.entries_seen += 1;
            tracing::info!(
                entry = entry_number,
                full_url = entry.full_url_or_empty(),
                "Entry"
            );

            let patient = match entry.decode::<Patient>(PATIENT) {
                Ok(Some(patient)) => patient,
                Ok(None) => continue,
                Err(FhirError::Invalid(reason)) => {
                    tracing::warn!(entry = entry_number, reason = %reason, "Skipping non-Patient entry");
                    continue;
                }
                Err(e) => return Err(e.into()),
            };

            let Some(reference) = patient.reference() else {
                tracing::warn!(entry = entry_number, "Skipping Patient without id");
                continue;
            };
            tracing::info!(id = patient.id.as_deref().unwrap_or_default(), "Patient");

            let encounters = source
                .search(ENCOUNTER, &[format!("patient={}", reference)])
                .await?;

            if options.only_with_encounters && encounters.total == Some(0) {
                continue;
            }
            if collection.over_limit(options.max_patients) {
                break;
            }

            if let Some(id) = &patient.id {
                collection.patients_with_encounters.push(id.clone());
            }
            if let Some(name) = patient.display_name() {
                tracing::info!(name = %name, "Accepted patient");
            }
            if encounters.total_or_zero() > 0 {
                tracing::info!(
                    encounters_total = encounters.total_or_zero(),
                    entry_count = encounters.entry.len(),
                    "Encounters"
                );
            }
            collection.patients.push(patient);
        }

        if collection.over_limit(options.max_patients) {
            break;
        }
    }

    collection.pages_fetched = pages.fetched();
    Ok(collection)
}
