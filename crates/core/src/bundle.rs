use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::error::FhirError;

/// FHIR Bundle types
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum BundleType {
    Searchset,
    History,
    Collection,
    Document,
    Message,
    Transaction,
    TransactionResponse,
    Batch,
    BatchResponse,
    SubscriptionNotification,
}

/// FHIR Bundle resource, one page of a search result
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bundle {
    pub resource_type: String,

    #[serde(rename = "type")]
    pub bundle_type: BundleType,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<u32>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub link: Vec<BundleLink>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub entry: Vec<BundleEntry>,
}

impl Bundle {
    /// Create a searchset bundle
    pub fn searchset(total: u32, entries: Vec<BundleEntry>) -> Self {
        Self {
            resource_type: "Bundle".to_string(),
            bundle_type: BundleType::Searchset,
            total: Some(total),
            link: Vec::new(),
            entry: entries,
        }
    }

    /// Add a link with the given relation
    pub fn with_link(mut self, relation: &str, url: impl Into<String>) -> Self {
        self.link.push(BundleLink {
            relation: relation.to_string(),
            url: url.into(),
        });
        self
    }

    /// URL of the link with the given relation, if any
    pub fn link_url(&self, relation: &str) -> Option<&str> {
        self.link
            .iter()
            .find(|l| l.relation == relation)
            .map(|l| l.url.as_str())
    }

    /// URL of the following page; `None` on the last page
    pub fn next_url(&self) -> Option<&str> {
        self.link_url("next")
    }

    /// Total matches reported by the server, 0 when omitted
    pub fn total_or_zero(&self) -> u32 {
        self.total.unwrap_or(0)
    }
}

/// Link to a related page (self, next, previous...)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BundleLink {
    pub relation: String,
    pub url: String,
}

/// Search metadata attached to an entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BundleEntrySearch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

/// An entry in a Bundle
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource: Option<JsonValue>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<BundleEntrySearch>,
}

impl BundleEntry {
    pub fn new(full_url: Option<String>, resource: JsonValue) -> Self {
        Self {
            full_url,
            resource: Some(resource),
            search: None,
        }
    }

    /// Entry without a resource payload
    pub fn empty(full_url: Option<String>) -> Self {
        Self {
            full_url,
            resource: None,
            search: None,
        }
    }

    /// `resourceType` of the payload, if there is one
    pub fn resource_type(&self) -> Option<&str> {
        self.resource
            .as_ref()
            .and_then(|r| r.get("resourceType"))
            .and_then(|v| v.as_str())
    }

    /// Decode the payload as a typed resource.
    ///
    /// Returns `Ok(None)` when the entry carries no payload, and
    /// [`FhirError::Invalid`] when the payload is a different resource type.
    pub fn decode<T: DeserializeOwned>(
        &self,
        resource_type: &str,
    ) -> Result<Option<T>, FhirError> {
        let Some(resource) = &self.resource else {
            return Ok(None);
        };

        match self.resource_type() {
            Some(actual) if actual == resource_type => {}
            Some(actual) => {
                return Err(FhirError::Invalid(format!(
                    "Expected resourceType '{}', got '{}'",
                    resource_type, actual
                )));
            }
            None => {
                return Err(FhirError::Invalid(
                    "Missing required field: resourceType".to_string(),
                ));
            }
        }

        serde_json::from_value(resource.clone())
            .map(Some)
            .map_err(|e| FhirError::Decode(format!("{}: {}", resource_type, e)))
    }

    /// Display form of `fullUrl`, empty when absent
    pub fn full_url_or_empty(&self) -> &str {
        self.full_url.as_deref().unwrap_or("")
    }
}
