//! HTTP client for a FHIR R4 REST server

use fhir_core::{Bundle, FhirError, OperationOutcome};
use reqwest::header::{ACCEPT, CONTENT_TYPE, LOCATION};
use reqwest::{Method, Response, Url};
use serde_json::Value as JsonValue;
use uuid::Uuid;

use crate::config::Config;
use crate::error::ClientError;
use crate::source::FhirSource;

/// Media type for FHIR JSON
pub const FHIR_JSON: &str = "application/fhir+json";

/// Header carrying a per-request correlation id
pub const REQUEST_ID_HEADER: &str = "X-Request-ID";

const PREFER_HEADER: &str = "Prefer";
const RETURN_REPRESENTATION: &str = "return=representation";

/// Client for a FHIR REST endpoint
///
/// JSON is the only wire format and writes always ask for the full
/// representation back.
#[derive(Clone)]
pub struct FhirClient {
    http: reqwest::Client,
    base: Url,
}

impl FhirClient {
    /// Create a client for the server named in the configuration
    pub fn new(config: &Config) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            http,
            base: parse_base(&config.server_url)?,
        })
    }

    /// GET /{type}?criteria - Start a search
    pub async fn search(
        &self,
        resource_type: &str,
        criteria: &[String],
    ) -> Result<Bundle, ClientError> {
        let mut url = self.resolve(resource_type)?;
        if !criteria.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for criterion in criteria {
                let (name, value) = split_criterion(criterion)?;
                pairs.append_pair(name, value);
            }
        }

        let response = self.send(Method::GET, url, None).await?;
        Ok(response.json::<Bundle>().await?)
    }

    /// Follow the `next` link of a search page
    pub async fn continue_search(&self, page: &Bundle) -> Result<Option<Bundle>, ClientError> {
        let Some(next) = page.next_url() else {
            return Ok(None);
        };

        let url = self.resolve(next)?;
        let response = self.send(Method::GET, url, None).await?;
        Ok(Some(response.json::<Bundle>().await?))
    }

    /// POST /{type} - Create a resource, returning the stored representation
    pub async fn create(&self, resource: &JsonValue) -> Result<JsonValue, ClientError> {
        let resource_type = resource_type_of(resource)?;
        let url = self.resolve(resource_type)?;
        let response = self.send(Method::POST, url, Some(resource)).await?;
        self.representation(response).await
    }

    /// GET /{type}/{id} - Read a resource by reference
    pub async fn read(&self, reference: &str) -> Result<JsonValue, ClientError> {
        let url = self.resolve(reference)?;
        let response = self.send(Method::GET, url, None).await?;
        Ok(response.json::<JsonValue>().await?)
    }

    /// PUT /{type}/{id} - Replace a resource
    pub async fn update(&self, resource: &JsonValue) -> Result<(), ClientError> {
        let resource_type = resource_type_of(resource)?;
        let id = resource
            .get("id")
            .and_then(|v| v.as_str())
            .filter(|id| !id.is_empty())
            .ok_or(ClientError::InvalidArgument("resource id is required for update"))?;

        let url = self.resolve(&format!("{}/{}", resource_type, id))?;
        self.send(Method::PUT, url, Some(resource)).await?;
        Ok(())
    }

    /// DELETE /{type}/{id} - Delete a resource by reference
    pub async fn delete(&self, reference: &str) -> Result<(), ClientError> {
        let url = self.resolve(reference)?;
        self.send(Method::DELETE, url, None).await?;
        Ok(())
    }

    fn resolve(&self, reference: &str) -> Result<Url, ClientError> {
        self.base
            .join(reference)
            .map_err(|e| ClientError::Url(format!("{}: {}", reference, e)))
    }

    /// Send a request and turn non-2xx responses into errors
    async fn send(
        &self,
        method: Method,
        url: Url,
        body: Option<&JsonValue>,
    ) -> Result<Response, ClientError> {
        let request_id = Uuid::new_v4().to_string();
        tracing::debug!(
            request_id = %request_id,
            method = %method,
            url = %url,
            "FHIR request"
        );

        let mut request = self
            .http
            .request(method.clone(), url.clone())
            .header(ACCEPT, FHIR_JSON)
            .header(REQUEST_ID_HEADER, &request_id);

        if let Some(body) = body {
            request = request
                .header(CONTENT_TYPE, FHIR_JSON)
                .header(PREFER_HEADER, RETURN_REPRESENTATION)
                .body(serde_json::to_vec(body)?);
        }

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = match OperationOutcome::from_body(&body) {
                Some(outcome) => outcome.summary(),
                None => body,
            };
            tracing::warn!(
                request_id = %request_id,
                method = %method,
                url = %url,
                status = %status.as_u16(),
                "FHIR request failed"
            );
            return Err(ClientError::Server { status, message });
        }

        Ok(response)
    }

    /// Body of a write response, fetched from `Location` when the server
    /// did not honour the return preference
    async fn representation(&self, response: Response) -> Result<JsonValue, ClientError> {
        let location = response
            .headers()
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let body = response.text().await?;
        if !body.trim().is_empty() {
            return Ok(serde_json::from_str(&body)?);
        }

        match location {
            Some(location) => self.read(&location).await,
            None => Err(FhirError::Invalid(
                "server returned neither a representation nor a Location".to_string(),
            )
            .into()),
        }
    }
}

impl FhirSource for FhirClient {
    async fn search(&self, resource_type: &str, criteria: &[String]) -> Result<Bundle, ClientError> {
        FhirClient::search(self, resource_type, criteria).await
    }

    async fn continue_search(&self, page: &Bundle) -> Result<Option<Bundle>, ClientError> {
        FhirClient::continue_search(self, page).await
    }

    async fn create(&self, resource: &JsonValue) -> Result<JsonValue, ClientError> {
        FhirClient::create(self, resource).await
    }

    async fn read(&self, reference: &str) -> Result<JsonValue, ClientError> {
        FhirClient::read(self, reference).await
    }

    async fn update(&self, resource: &JsonValue) -> Result<(), ClientError> {
        FhirClient::update(self, resource).await
    }

    async fn delete(&self, reference: &str) -> Result<(), ClientError> {
        FhirClient::delete(self, reference).await
    }
}

/// Parse the server base URL, making sure relative joins keep its path
fn parse_base(server_url: &str) -> Result<Url, ClientError> {
    let normalized = if server_url.ends_with('/') {
        server_url.to_string()
    } else {
        format!("{}/", server_url)
    };

    Url::parse(&normalized).map_err(|e| ClientError::Url(format!("{}: {}", server_url, e)))
}

/// Split a `name=value` filter expression
fn split_criterion(criterion: &str) -> Result<(&str, &str), ClientError> {
    match criterion.split_once('=') {
        Some((name, value)) if !name.is_empty() => Ok((name, value)),
        _ => Err(ClientError::InvalidArgument(
            "search criteria must have the form name=value",
        )),
    }
}

fn resource_type_of(resource: &JsonValue) -> Result<&str, ClientError> {
    resource
        .get("resourceType")
        .and_then(|v| v.as_str())
        .ok_or_else(|| FhirError::Invalid("Missing required field: resourceType".to_string()).into())
}
