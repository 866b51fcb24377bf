use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use qa_logging::qa_debug;

use crate::dispatch::{Backend, DispatchSettings, ReqwestBackend};
use crate::{AskRequest, ChatRequest, EngineError, EngineEvent, IngestRequest, RequestId};

enum EngineCommand {
    Chat {
        request_id: RequestId,
        request: ChatRequest,
    },
    Ingest {
        request_id: RequestId,
        request: IngestRequest,
    },
    Ask {
        request_id: RequestId,
        request: AskRequest,
    },
    CheckHealth,
}

/// Runs backend calls on a dedicated tokio runtime and reports results as
/// [`EngineEvent`]s. Commands are never cancelled once sent.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(settings: DispatchSettings) -> Result<Self, EngineError> {
        let backend = ReqwestBackend::new(settings)?;
        Self::with_backend(Arc::new(backend))
    }

    pub fn with_backend(backend: Arc<dyn Backend>) -> Result<Self, EngineError> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()?;

        thread::Builder::new()
            .name("qa-engine".to_string())
            .spawn(move || {
                while let Ok(command) = cmd_rx.recv() {
                    let backend = backend.clone();
                    let event_tx = event_tx.clone();
                    runtime.spawn(async move {
                        let event = handle_command(backend.as_ref(), command).await;
                        let _ = event_tx.send(event);
                    });
                }
                qa_debug!("Engine command channel closed");
            })?;

        Ok(Self { cmd_tx, event_rx })
    }

    pub fn chat(&self, request_id: RequestId, request: ChatRequest) {
        self.send(EngineCommand::Chat {
            request_id,
            request,
        });
    }

    pub fn ingest(&self, request_id: RequestId, request: IngestRequest) {
        self.send(EngineCommand::Ingest {
            request_id,
            request,
        });
    }

    pub fn ask(&self, request_id: RequestId, request: AskRequest) {
        self.send(EngineCommand::Ask {
            request_id,
            request,
        });
    }

    pub fn check_health(&self) {
        self.send(EngineCommand::CheckHealth);
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }

    fn send(&self, command: EngineCommand) {
        let _ = self.cmd_tx.send(command);
    }
}

async fn handle_command(backend: &dyn Backend, command: EngineCommand) -> EngineEvent {
    match command {
        EngineCommand::Chat {
            request_id,
            request,
        } => EngineEvent::ChatAnswered {
            request_id,
            result: backend.chat(&request).await,
        },
        EngineCommand::Ingest {
            request_id,
            request,
        } => EngineEvent::IngestFinished {
            request_id,
            result: backend.ingest(&request).await,
        },
        EngineCommand::Ask {
            request_id,
            request,
        } => EngineEvent::AskAnswered {
            request_id,
            result: backend.ask(&request).await,
        },
        EngineCommand::CheckHealth => EngineEvent::HealthChecked {
            online: backend.health().await,
        },
    }
}
