//! Grounded QA engine: HTTP dispatch and effect execution.
mod answer;
mod dispatch;
mod engine;
mod types;

pub use answer::{answer_text, IngestReply};
pub use dispatch::{Backend, DispatchSettings, Endpoints, ReqwestBackend, HEALTH_TIMEOUT};
pub use engine::EngineHandle;
pub use types::{
    AskRequest, ChatRequest, DispatchError, EngineError, EngineEvent, IngestRequest, RequestId,
};
