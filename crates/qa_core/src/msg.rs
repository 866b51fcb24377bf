use crate::RequestId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Startup hook; asks for a backend health probe in chat mode.
    Started,
    /// User edited the active input field (full text).
    InputChanged(String),
    /// User pressed Enter / the action button for the active field.
    Submit,
    /// User switched focus between the input and the answer pane.
    FocusToggled,
    /// User scrolled the answer pane by the given number of lines.
    AnswerScrolled(i16),
    /// Rendered answer height changed; bounds how far the pane can scroll.
    AnswerViewport { max_scroll: u16 },
    /// Backend answered a `/chat` request.
    ChatAnswered {
        request_id: RequestId,
        outcome: AnswerOutcome,
    },
    /// Backend finished an `/api/ingest` request.
    IngestFinished {
        request_id: RequestId,
        outcome: IngestOutcome,
    },
    /// Backend answered an `/api/ask` request.
    AskAnswered {
        request_id: RequestId,
        outcome: AnswerOutcome,
    },
    /// Result of the startup health probe.
    BackendHealth { online: bool },
    /// UI/render tick; drives the spinner.
    Tick,
    /// Fallback for unmapped input.
    NoOp,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerOutcome {
    Answered(String),
    /// Transport or parse failure; the detail is for logs only.
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestOutcome {
    Accepted,
    /// Backend replied with `success: false`.
    Rejected { error: Option<String> },
    Failed(String),
}
