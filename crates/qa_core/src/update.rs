use qa_logging::{qa_debug, qa_info, qa_warn};

use crate::view_model::InputField;
use crate::{
    AnswerOutcome, AppState, BackendStatus, Effect, IngestOutcome, Mode, Msg, Phase, RequestId,
    ANSWER_ERROR_TEXT, INGEST_ERROR_TEXT,
};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        // `/health` lives on the chat backend, which site mode never uses.
        Msg::Started => match state.mode() {
            Mode::Chat => vec![Effect::CheckHealth],
            Mode::Site => Vec::new(),
        },
        Msg::InputChanged(text) => {
            if state.set_input(text) {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::Submit => match state.active_field() {
            InputField::Query => submit_query(&mut state),
            InputField::Url => submit_url(&mut state),
            InputField::Question => submit_question(&mut state),
        },
        Msg::FocusToggled => {
            state.toggle_focus();
            state.mark_dirty();
            Vec::new()
        }
        Msg::AnswerScrolled(delta) => {
            if state.scroll_answer(delta) {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::AnswerViewport { max_scroll } => {
            if state.set_answer_scroll_max(max_scroll) {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::ChatAnswered {
            request_id,
            outcome,
        }
        | Msg::AskAnswered {
            request_id,
            outcome,
        } => {
            apply_answer(&mut state, request_id, outcome);
            Vec::new()
        }
        Msg::IngestFinished {
            request_id,
            outcome,
        } => {
            apply_ingest(&mut state, request_id, outcome);
            Vec::new()
        }
        Msg::BackendHealth { online } => {
            let status = if online {
                BackendStatus::Online
            } else {
                BackendStatus::Offline
            };
            if state.set_backend(status) {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::Tick => {
            if state.advance_spinner() {
                state.mark_dirty();
            }
            Vec::new()
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn submit_query(state: &mut AppState) -> Vec<Effect> {
    if state.is_loading() || state.query().trim().is_empty() {
        return Vec::new();
    }
    let query = state.query().to_string();
    let k = state.top_k();
    let request_id = state.begin_answer_request();
    state.mark_dirty();
    vec![Effect::PostChat {
        request_id,
        query,
        k,
    }]
}

fn submit_url(state: &mut AppState) -> Vec<Effect> {
    let url = state.url_input().trim();
    if state.is_ingesting() || url.is_empty() {
        return Vec::new();
    }
    let url = url.to_string();
    let request_id = state.begin_ingest_request(url.clone());
    state.mark_dirty();
    vec![Effect::PostIngest { request_id, url }]
}

fn submit_question(state: &mut AppState) -> Vec<Effect> {
    let Phase::Ready { url } = state.phase() else {
        return Vec::new();
    };
    if state.is_loading() || state.question().trim().is_empty() {
        return Vec::new();
    }
    let url = url.clone();
    let question = state.question().to_string();
    let request_id = state.begin_answer_request();
    state.mark_dirty();
    vec![Effect::PostAsk {
        request_id,
        question,
        url,
    }]
}

fn apply_answer(state: &mut AppState, request_id: RequestId, outcome: AnswerOutcome) {
    if !state.finish_answer_request(request_id) {
        qa_debug!("Ignoring answer for stale request {}", request_id);
        return;
    }
    match outcome {
        AnswerOutcome::Answered(text) => state.set_answer(text),
        AnswerOutcome::Failed(detail) => {
            qa_warn!("Request {} failed: {}", request_id, detail);
            state.set_error(ANSWER_ERROR_TEXT);
        }
    }
    state.mark_dirty();
}

fn apply_ingest(state: &mut AppState, request_id: RequestId, outcome: IngestOutcome) {
    let Some(url) = state.finish_ingest_request(request_id) else {
        qa_debug!("Ignoring ingest result for stale request {}", request_id);
        return;
    };
    match outcome {
        IngestOutcome::Accepted => {
            qa_info!("Ingest {} succeeded for {}", request_id, url);
            state.mark_ingested(url);
        }
        IngestOutcome::Rejected { error } => {
            qa_warn!("Ingest {} rejected: {:?}", request_id, error);
            let text = match error {
                Some(error) if !error.trim().is_empty() => {
                    format!("{}: {}", INGEST_ERROR_TEXT.trim_end_matches('.'), error)
                }
                _ => INGEST_ERROR_TEXT.to_string(),
            };
            state.set_error(text);
        }
        IngestOutcome::Failed(detail) => {
            qa_warn!("Ingest {} failed: {}", request_id, detail);
            state.set_error(INGEST_ERROR_TEXT);
        }
    }
    state.mark_dirty();
}
