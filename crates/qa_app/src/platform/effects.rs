use qa_core::{AnswerOutcome, Effect, IngestOutcome, Msg};
use qa_engine::{
    AskRequest, ChatRequest, DispatchError, DispatchSettings, EngineError, EngineEvent,
    EngineHandle, IngestRequest,
};
use qa_logging::{qa_debug, qa_info};

/// Hands core effects to the engine and turns engine events back into messages.
pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(settings: DispatchSettings) -> Result<Self, EngineError> {
        Ok(Self::with_engine(EngineHandle::new(settings)?))
    }

    pub fn with_engine(engine: EngineHandle) -> Self {
        Self { engine }
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::PostChat {
                    request_id,
                    query,
                    k,
                } => {
                    qa_info!(
                        "PostChat request_id={} query_len={} k={}",
                        request_id,
                        query.len(),
                        k
                    );
                    self.engine.chat(request_id, ChatRequest { query, k });
                }
                Effect::PostIngest { request_id, url } => {
                    qa_info!("PostIngest request_id={} url={}", request_id, url);
                    self.engine.ingest(request_id, IngestRequest { url });
                }
                Effect::PostAsk {
                    request_id,
                    question,
                    url,
                } => {
                    qa_info!(
                        "PostAsk request_id={} question_len={} url={}",
                        request_id,
                        question.len(),
                        url
                    );
                    self.engine.ask(request_id, AskRequest { question, url });
                }
                Effect::CheckHealth => {
                    qa_debug!("CheckHealth");
                    self.engine.check_health();
                }
            }
        }
    }

    /// Drains every engine event that is ready without blocking.
    pub fn drain(&self) -> Vec<Msg> {
        let mut inbox = Vec::new();
        while let Some(event) = self.engine.try_recv() {
            inbox.push(map_event(event));
        }
        inbox
    }
}

pub fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::ChatAnswered { request_id, result } => Msg::ChatAnswered {
            request_id,
            outcome: map_answer(result),
        },
        EngineEvent::AskAnswered { request_id, result } => Msg::AskAnswered {
            request_id,
            outcome: map_answer(result),
        },
        EngineEvent::IngestFinished { request_id, result } => Msg::IngestFinished {
            request_id,
            outcome: match result {
                Ok(reply) if reply.success => IngestOutcome::Accepted,
                Ok(reply) => IngestOutcome::Rejected { error: reply.error },
                Err(err) => IngestOutcome::Failed(err.to_string()),
            },
        },
        EngineEvent::HealthChecked { online } => Msg::BackendHealth { online },
    }
}

fn map_answer(result: Result<String, DispatchError>) -> AnswerOutcome {
    match result {
        Ok(text) => AnswerOutcome::Answered(text),
        Err(err) => AnswerOutcome::Failed(err.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::{Duration, Instant};

    use qa_core::{update, AppState, Mode};
    use qa_engine::{Backend, IngestReply};

    use super::*;

    struct SiteBackend;

    #[async_trait::async_trait]
    impl Backend for SiteBackend {
        async fn chat(&self, _request: &ChatRequest) -> Result<String, DispatchError> {
            Err(DispatchError::Timeout)
        }

        async fn ingest(&self, _request: &IngestRequest) -> Result<IngestReply, DispatchError> {
            Ok(IngestReply {
                success: true,
                error: None,
            })
        }

        async fn ask(&self, _request: &AskRequest) -> Result<String, DispatchError> {
            Ok("A site.".to_string())
        }

        async fn health(&self) -> bool {
            false
        }
    }

    fn settle(runner: &EffectRunner, mut state: AppState, effects: Vec<Effect>) -> AppState {
        runner.enqueue(effects);
        let deadline = Instant::now() + Duration::from_secs(5);
        while state.is_loading() || state.is_ingesting() {
            assert!(Instant::now() < deadline, "engine did not answer in time");
            for msg in runner.drain() {
                let (next, more) = update(state, msg);
                assert!(more.is_empty());
                state = next;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        state
    }

    #[test]
    fn ingest_then_ask_round_trip() {
        let engine = EngineHandle::with_backend(Arc::new(SiteBackend)).unwrap();
        let runner = EffectRunner::with_engine(engine);

        let (state, _) = update(
            AppState::new(Mode::Site),
            Msg::InputChanged("https://example.com".to_string()),
        );
        let (state, effects) = update(state, Msg::Submit);
        let state = settle(&runner, state, effects);
        assert_eq!(
            state.view().ingested_url.as_deref(),
            Some("https://example.com")
        );

        let (state, _) = update(state, Msg::InputChanged("What is this?".to_string()));
        let (state, effects) = update(state, Msg::Submit);
        let state = settle(&runner, state, effects);
        assert_eq!(state.view().answer.as_deref(), Some("A site."));
    }

    #[test]
    fn maps_dispatch_failures_to_failed_outcomes() {
        assert_eq!(
            map_event(EngineEvent::ChatAnswered {
                request_id: 3,
                result: Err(DispatchError::Timeout),
            }),
            Msg::ChatAnswered {
                request_id: 3,
                outcome: AnswerOutcome::Failed("request timed out".to_string()),
            }
        );
        assert_eq!(
            map_event(EngineEvent::IngestFinished {
                request_id: 4,
                result: Ok(IngestReply {
                    success: false,
                    error: Some("nope".to_string()),
                }),
            }),
            Msg::IngestFinished {
                request_id: 4,
                outcome: IngestOutcome::Rejected {
                    error: Some("nope".to_string())
                },
            }
        );
        assert_eq!(
            map_event(EngineEvent::HealthChecked { online: false }),
            Msg::BackendHealth { online: false }
        );
    }
}
