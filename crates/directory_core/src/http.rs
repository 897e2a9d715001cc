//! reqwest-backed implementation of the registry contract.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client as HttpClient, Response, StatusCode};
use serde::de::DeserializeOwned;
use shared::{
    domain::{Client, ClientId, NewClient},
    error::Rejection,
    protocol::ApiEnvelope,
};
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

use crate::service::{ClientService, RouteService, ServiceResponse};

const CLIENTS_PATH: &str = "clients";
const ROUTE_PATH: &str = "route";

#[derive(Debug, Error)]
pub enum RequestError {
    #[error("invalid registry base url '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("registry rejected request with status {status}{}", detail_suffix(.detail))]
    Rejected {
        status: StatusCode,
        detail: Option<Rejection>,
    },
    #[error("malformed registry payload: {0}")]
    Malformed(String),
}

fn detail_suffix(detail: &Option<Rejection>) -> String {
    detail
        .as_ref()
        .map(|detail| format!(" ({detail})"))
        .unwrap_or_default()
}

impl RequestError {
    fn category(&self) -> &'static str {
        match self {
            Self::InvalidBaseUrl { .. } => "config",
            Self::Transport(_) => "transport",
            Self::Rejected { .. } => "rejected",
            Self::Malformed(_) => "malformed",
        }
    }
}

pub struct HttpClientService {
    http: HttpClient,
    base_url: Url,
}

impl HttpClientService {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, RequestError> {
        let http = HttpClient::builder().timeout(timeout).build()?;
        Self::with_client(http, base_url)
    }

    pub fn with_client(http: HttpClient, base_url: &str) -> Result<Self, RequestError> {
        let invalid = |reason: String| RequestError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason,
        };
        let base_url = Url::parse(base_url.trim()).map_err(|err| invalid(err.to_string()))?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(invalid("scheme must be http or https".into()));
        }
        if base_url.cannot_be_a_base() {
            return Err(invalid("url cannot be used as a base".into()));
        }
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, RequestError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| RequestError::InvalidBaseUrl {
                url: self.base_url.to_string(),
                reason: "url cannot be used as a base".into(),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn fetch_clients(&self, query: Option<&str>) -> Result<Vec<Client>, RequestError> {
        let url = self.endpoint(&[CLIENTS_PATH])?;
        debug!(%url, query, "registry: fetching clients");
        let mut request = self.http.get(url);
        if let Some(query) = query {
            request = request.query(&[("query", query)]);
        }
        let response = expect_ok(request.send().await?).await?;
        decode_envelope(response).await
    }

    async fn send_create(&self, record: &NewClient) -> Result<Client, RequestError> {
        let url = self.endpoint(&[CLIENTS_PATH])?;
        debug!(%url, name = %record.name, "registry: creating client");
        let response = expect_ok(self.http.post(url).json(record).send().await?).await?;
        decode_envelope(response).await
    }

    async fn send_delete(&self, id: &ClientId) -> Result<(), RequestError> {
        let url = self.endpoint(&[CLIENTS_PATH, id.as_str()])?;
        debug!(%url, client_id = %id, "registry: deleting client");
        expect_ok(self.http.delete(url).send().await?).await?;
        Ok(())
    }

    async fn fetch_route(&self) -> Result<Vec<Client>, RequestError> {
        let url = self.endpoint(&[ROUTE_PATH])?;
        debug!(%url, "registry: fetching optimized route");
        let response = expect_ok(self.http.get(url).send().await?).await?;
        decode_envelope(response).await
    }
}

async fn expect_ok(response: Response) -> Result<Response, RequestError> {
    let status = response.status();
    if status == StatusCode::OK {
        return Ok(response);
    }
    // Best effort: a rejection body is diagnostic only.
    let detail = response
        .bytes()
        .await
        .ok()
        .and_then(|body| serde_json::from_slice::<Rejection>(&body).ok());
    Err(RequestError::Rejected { status, detail })
}

async fn decode_envelope<T: DeserializeOwned>(response: Response) -> Result<T, RequestError> {
    let body = response.bytes().await?;
    serde_json::from_slice::<ApiEnvelope<T>>(&body)
        .map(|envelope| envelope.response)
        .map_err(|err| RequestError::Malformed(err.to_string()))
}

fn collapse<T>(operation: &'static str, result: Result<T, RequestError>) -> ServiceResponse<T> {
    match result {
        Ok(value) => ServiceResponse::ok(value),
        Err(error) => {
            warn!(operation, category = error.category(), %error, "registry: request failed");
            ServiceResponse::failed()
        }
    }
}

#[async_trait]
impl ClientService for HttpClientService {
    async fn list(&self) -> ServiceResponse<Vec<Client>> {
        collapse("list", self.fetch_clients(None).await)
    }

    async fn filter(&self, query: &str) -> ServiceResponse<Vec<Client>> {
        collapse("filter", self.fetch_clients(Some(query)).await)
    }

    async fn create(&self, record: &NewClient) -> ServiceResponse<Client> {
        collapse("create", self.send_create(record).await)
    }

    async fn delete(&self, id: &ClientId) -> ServiceResponse<()> {
        collapse("delete", self.send_delete(id).await)
    }
}

#[async_trait]
impl RouteService for HttpClientService {
    /// The registry computes the route from its own persisted clients, so the
    /// local set is only used for diagnostics.
    async fn ordered_route(&self, clients: &[Client]) -> ServiceResponse<Vec<Client>> {
        debug!(local_clients = clients.len(), "registry: requesting route");
        collapse("route", self.fetch_route().await)
    }
}

#[cfg(test)]
#[path = "tests/http_tests.rs"]
mod tests;
