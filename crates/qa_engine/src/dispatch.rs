use std::time::Duration;

use qa_logging::{qa_debug, qa_warn};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde::Serialize;
use serde_json::Value;
use url::Url;

use crate::answer::{answer_text, IngestReply};
use crate::{AskRequest, ChatRequest, DispatchError, IngestRequest};

/// Upper bound for the startup health probe, independent of `request_timeout`.
pub const HEALTH_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone)]
pub struct DispatchSettings {
    /// Origin of the answering API (`/chat`, `/health`).
    pub backend_url: Url,
    /// Origin serving `/api/ingest` and `/api/ask`.
    pub site_url: Url,
    /// `None` waits for the backend indefinitely.
    pub request_timeout: Option<Duration>,
    pub health_timeout: Duration,
}

impl DispatchSettings {
    pub fn new(backend_url: Url, site_url: Url) -> Self {
        Self {
            backend_url,
            site_url,
            request_timeout: None,
            health_timeout: HEALTH_TIMEOUT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub chat: Url,
    pub ingest: Url,
    pub ask: Url,
    pub health: Url,
}

impl Endpoints {
    pub fn from_settings(settings: &DispatchSettings) -> Result<Self, DispatchError> {
        Ok(Self {
            chat: join_endpoint(&settings.backend_url, "chat")?,
            ingest: join_endpoint(&settings.site_url, "api/ingest")?,
            ask: join_endpoint(&settings.site_url, "api/ask")?,
            health: join_endpoint(&settings.backend_url, "health")?,
        })
    }
}

/// Joins `path` below `base`, keeping any path prefix `base` already has.
fn join_endpoint(base: &Url, path: &str) -> Result<Url, DispatchError> {
    if base.cannot_be_a_base() {
        return Err(DispatchError::InvalidEndpoint(base.to_string()));
    }
    let mut base = base.clone();
    if !base.path().ends_with('/') {
        let with_slash = format!("{}/", base.path());
        base.set_path(&with_slash);
    }
    base.join(path)
        .map_err(|err| DispatchError::InvalidEndpoint(format!("{base}{path}: {err}")))
}

#[async_trait::async_trait]
pub trait Backend: Send + Sync {
    async fn chat(&self, request: &ChatRequest) -> Result<String, DispatchError>;
    async fn ingest(&self, request: &IngestRequest) -> Result<IngestReply, DispatchError>;
    async fn ask(&self, request: &AskRequest) -> Result<String, DispatchError>;
    async fn health(&self) -> bool;
}

#[derive(Debug, Clone)]
pub struct ReqwestBackend {
    client: reqwest::Client,
    endpoints: Endpoints,
    health_timeout: Duration,
}

impl ReqwestBackend {
    pub fn new(settings: DispatchSettings) -> Result<Self, DispatchError> {
        let endpoints = Endpoints::from_settings(&settings)?;
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = settings.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|err| DispatchError::Transport(err.to_string()))?;
        Ok(Self {
            client,
            endpoints,
            health_timeout: settings.health_timeout,
        })
    }

    /// POSTs `payload` as JSON and parses the reply body as JSON.
    ///
    /// The HTTP status is not inspected: an error status with a JSON body is
    /// handled like any other reply.
    pub async fn submit<T>(&self, endpoint: &Url, payload: &T) -> Result<Value, DispatchError>
    where
        T: Serialize + Sync,
    {
        let body =
            serde_json::to_vec(payload).map_err(|err| DispatchError::Encode(err.to_string()))?;
        qa_debug!("POST {} ({} bytes)", endpoint, body.len());

        let response = self
            .client
            .post(endpoint.clone())
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .body(body)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            qa_warn!("POST {} answered with status {}", endpoint, status);
        }

        let bytes = response.bytes().await.map_err(map_reqwest_error)?;
        serde_json::from_slice(&bytes).map_err(|err| DispatchError::Malformed(err.to_string()))
    }
}

#[async_trait::async_trait]
impl Backend for ReqwestBackend {
    async fn chat(&self, request: &ChatRequest) -> Result<String, DispatchError> {
        let body = self.submit(&self.endpoints.chat, request).await?;
        Ok(answer_text(&body))
    }

    async fn ingest(&self, request: &IngestRequest) -> Result<IngestReply, DispatchError> {
        let body = self.submit(&self.endpoints.ingest, request).await?;
        Ok(IngestReply::from_json(&body))
    }

    async fn ask(&self, request: &AskRequest) -> Result<String, DispatchError> {
        let body = self.submit(&self.endpoints.ask, request).await?;
        Ok(answer_text(&body))
    }

    async fn health(&self) -> bool {
        let result = self
            .client
            .get(self.endpoints.health.clone())
            .timeout(self.health_timeout)
            .send()
            .await;
        match result {
            Ok(response) => response.status().is_success(),
            Err(err) => {
                qa_warn!("Health probe {} failed: {}", self.endpoints.health, err);
                false
            }
        }
    }
}

fn map_reqwest_error(err: reqwest::Error) -> DispatchError {
    if err.is_timeout() {
        return DispatchError::Timeout;
    }
    DispatchError::Transport(err.to_string())
}
