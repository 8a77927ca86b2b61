//! The remote data source the collector and patient helpers work against

use std::future::Future;

use fhir_core::Bundle;
use serde_json::Value as JsonValue;

use crate::error::ClientError;

/// Operations a FHIR data source offers.
///
/// [`crate::FhirClient`] implements this over HTTP; tests substitute
/// in-memory fixtures. Every call completes or fails before the caller
/// issues the next one.
pub trait FhirSource {
    /// Start a paginated search. An empty `criteria` slice searches
    /// without filters.
    fn search(
        &self,
        resource_type: &str,
        criteria: &[String],
    ) -> impl Future<Output = Result<Bundle, ClientError>> + Send;

    /// Fetch the page after `page`, or `None` once the chain is exhausted
    fn continue_search(
        &self,
        page: &Bundle,
    ) -> impl Future<Output = Result<Option<Bundle>, ClientError>> + Send;

    /// Create a resource; the result carries the server-assigned id
    fn create(
        &self,
        resource: &JsonValue,
    ) -> impl Future<Output = Result<JsonValue, ClientError>> + Send;

    /// Read a resource by relative reference (`Patient/123`)
    fn read(&self, reference: &str) -> impl Future<Output = Result<JsonValue, ClientError>> + Send;

    /// Replace a resource as a whole
    fn update(&self, resource: &JsonValue) -> impl Future<Output = Result<(), ClientError>> + Send;

    /// Delete a resource by relative reference
    fn delete(&self, reference: &str) -> impl Future<Output = Result<(), ClientError>> + Send;
}
