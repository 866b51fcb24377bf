//! Grounded QA core: pure state machine and view-model helpers.
mod effect;
mod msg;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use msg::{AnswerOutcome, IngestOutcome, Msg};
pub use state::{
    AppState, BackendStatus, Focus, Mode, Phase, RequestId, ANSWER_ERROR_TEXT, DEFAULT_TOP_K,
    INGEST_ERROR_TEXT,
};
pub use update::update;
pub use view_model::{AppViewModel, InputField};
