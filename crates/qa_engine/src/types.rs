use serde::Serialize;
use thiserror::Error;

pub type RequestId = u64;

/// Body of `POST /chat`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatRequest {
    pub query: String,
    pub k: u32,
}

/// Body of `POST /api/ingest`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IngestRequest {
    pub url: String,
}

/// Body of `POST /api/ask`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AskRequest {
    pub question: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    ChatAnswered {
        request_id: RequestId,
        result: Result<String, DispatchError>,
    },
    IngestFinished {
        request_id: RequestId,
        result: Result<crate::IngestReply, DispatchError>,
    },
    AskAnswered {
        request_id: RequestId,
        result: Result<String, DispatchError>,
    },
    HealthChecked {
        online: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),
    #[error("failed to encode request: {0}")]
    Encode(String),
    #[error("request timed out")]
    Timeout,
    #[error("network error: {0}")]
    Transport(String),
    #[error("response is not valid JSON: {0}")]
    Malformed(String),
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to start engine runtime: {0}")]
    Runtime(#[from] std::io::Error),
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}
