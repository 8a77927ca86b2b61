//! In-memory data source for unit tests

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use fhir_core::{Bundle, BundleEntry, ENCOUNTER, PATIENT};
use reqwest::StatusCode;
use serde_json::{Value as JsonValue, json};

use crate::error::ClientError;
use crate::source::FhirSource;

const NEXT_PREFIX: &str = "fixture://page/";

/// Patient resource as a server would return it
pub fn patient_json(id: &str) -> JsonValue {
    json!({
        "resourceType": "Patient",
        "id": id,
        "name": [{"family": format!("Family-{}", id), "given": [format!("Given-{}", id)]}]
    })
}

pub fn patient_entry(id: &str) -> BundleEntry {
    BundleEntry::new(
        Some(format!("http://fixture/Patient/{}", id)),
        patient_json(id),
    )
}

/// Build a page chain with `total` set to the overall entry count
pub fn chain(pages: Vec<Vec<BundleEntry>>) -> Vec<Bundle> {
    let total: usize = pages.iter().map(Vec::len).sum();
    let count = pages.len();
    pages
        .into_iter()
        .enumerate()
        .map(|(i, entries)| {
            let page = Bundle::searchset(total as u32, entries);
            if i + 1 < count {
                page.with_link("next", format!("{}{}", NEXT_PREFIX, i + 1))
            } else {
                page
            }
        })
        .collect()
}

/// Fixture FHIR server holding a fixed patient page chain and encounter
/// counts per patient id
#[derive(Default)]
pub struct FixtureSource {
    pages: Vec<Bundle>,
    encounters: HashMap<String, u32>,
    fail_continue: bool,
    omit_encounter_totals: bool,
    search_calls: AtomicUsize,
    continue_calls: AtomicUsize,
    encounter_searches: AtomicUsize,
    write_calls: AtomicUsize,
    read_calls: AtomicUsize,
    pub patient_criteria: Mutex<Vec<Vec<String>>>,
    pub created: Mutex<Vec<JsonValue>>,
    pub updated: Mutex<Vec<JsonValue>>,
    pub deleted: Mutex<Vec<String>>,
}

impl FixtureSource {
    pub fn with_pages(pages: Vec<Bundle>) -> Self {
        Self {
            pages,
            ..Default::default()
        }
    }

    /// Pages of patients `p0`, `p1`, ... with the given page sizes
    pub fn with_patient_pages(sizes: &[usize]) -> Self {
        let mut next_id = 0;
        let pages: Vec<Vec<BundleEntry>> = sizes
            .iter()
            .map(|&size| {
                (0..size)
                    .map(|_| {
                        let entry = patient_entry(&format!("p{}", next_id));
                        next_id += 1;
                        entry
                    })
                    .collect::<Vec<_>>()
            })
            .collect();
        Self::with_pages(chain(pages))
    }

    pub fn encounters(mut self, counts: &[(&str, u32)]) -> Self {
        for (id, count) in counts {
            self.encounters.insert(id.to_string(), *count);
        }
        self
    }

    pub fn failing_continue(mut self) -> Self {
        self.fail_continue = true;
        self
    }

    /// Encounter pages carry their entries but no `total`
    pub fn without_encounter_totals(mut self) -> Self {
        self.omit_encounter_totals = true;
        self
    }

    pub fn search_calls(&self) -> usize {
        self.search_calls.load(Ordering::SeqCst)
    }

    pub fn continue_calls(&self) -> usize {
        self.continue_calls.load(Ordering::SeqCst)
    }

    pub fn encounter_searches(&self) -> usize {
        self.encounter_searches.load(Ordering::SeqCst)
    }

    /// Every call made against the source
    pub fn total_calls(&self) -> usize {
        self.search_calls()
            + self.continue_calls()
            + self.encounter_searches()
            + self.write_calls.load(Ordering::SeqCst)
            + self.read_calls.load(Ordering::SeqCst)
    }

    fn encounter_page(&self, criteria: &[String]) -> Bundle {
        let id = criteria
            .iter()
            .find_map(|c| c.strip_prefix("patient=Patient/"))
            .unwrap_or_default();
        let total = self.encounters.get(id).copied().unwrap_or(0);
        let entries = (0..total)
            .map(|n| {
                BundleEntry::new(
                    None,
                    json!({
                        "resourceType": "Encounter",
                        "id": format!("{}-e{}", id, n),
                        "subject": {"reference": format!("Patient/{}", id)}
                    }),
                )
            })
            .collect();
        let mut page = Bundle::searchset(total, entries);
        if self.omit_encounter_totals {
            page.total = None;
        }
        page
    }
}

impl FhirSource for FixtureSource {
    async fn search(&self, resource_type: &str, criteria: &[String]) -> Result<Bundle, ClientError> {
        match resource_type {
            ENCOUNTER => {
                self.encounter_searches.fetch_add(1, Ordering::SeqCst);
                Ok(self.encounter_page(criteria))
            }
            PATIENT => {
                self.search_calls.fetch_add(1, Ordering::SeqCst);
                self.patient_criteria
                    .lock()
                    .unwrap()
                    .push(criteria.to_vec());
                Ok(self
                    .pages
                    .first()
                    .cloned()
                    .unwrap_or_else(|| Bundle::searchset(0, vec![])))
            }
            other => panic!("unexpected search for {}", other),
        }
    }

    async fn continue_search(&self, page: &Bundle) -> Result<Option<Bundle>, ClientError> {
        self.continue_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_continue {
            return Err(ClientError::Server {
                status: StatusCode::SERVICE_UNAVAILABLE,
                message: "fixture unavailable".to_string(),
            });
        }

        Ok(page
            .next_url()
            .and_then(|url| url.strip_prefix(NEXT_PREFIX))
            .and_then(|index| index.parse::<usize>().ok())
            .and_then(|index| self.pages.get(index).cloned()))
    }

    async fn create(&self, resource: &JsonValue) -> Result<JsonValue, ClientError> {
        self.write_calls.fetch_add(1, Ordering::SeqCst);
        let mut created = self.created.lock().unwrap();
        let mut stored = resource.clone();
        stored["id"] = json!(format!("new-{}", created.len() + 1));
        created.push(stored.clone());
        Ok(stored)
    }

    async fn read(&self, reference: &str) -> Result<JsonValue, ClientError> {
        self.read_calls.fetch_add(1, Ordering::SeqCst);
        match reference.strip_prefix("Patient/") {
            Some(id) => Ok(patient_json(id)),
            None => Err(ClientError::Server {
                status: StatusCode::NOT_FOUND,
                message: format!("{} not found", reference),
            }),
        }
    }

    async fn update(&self, resource: &JsonValue) -> Result<(), ClientError> {
        self.write_calls.fetch_add(1, Ordering::SeqCst);
        self.updated.lock().unwrap().push(resource.clone());
        Ok(())
    }

    async fn delete(&self, reference: &str) -> Result<(), ClientError> {
        self.write_calls.fetch_add(1, Ordering::SeqCst);
        self.deleted.lock().unwrap().push(reference.to_string());
        Ok(())
    }
}
