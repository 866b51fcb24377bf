use crate::view_model::{AppViewModel, InputField};

pub type RequestId = u64;

/// Passage count sent with every `/chat` query unless configured otherwise.
pub const DEFAULT_TOP_K: u32 = 4;

pub const ANSWER_ERROR_TEXT: &str = "An error occurred while fetching the answer.";
pub const INGEST_ERROR_TEXT: &str = "An error occurred while ingesting the website.";

/// Interaction model, fixed for the lifetime of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Single-shot question answering against `/chat`.
    #[default]
    Chat,
    /// Ingest a URL first, then ask questions about it.
    Site,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    AwaitingUrl,
    Ready {
        url: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Input,
    Answer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackendStatus {
    #[default]
    Unknown,
    Online,
    Offline,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    mode: Mode,
    top_k: u32,
    query: String,
    url_input: String,
    question: String,
    phase: Phase,
    loading: bool,
    ingesting: bool,
    focus: Focus,
    answer: String,
    error: Option<String>,
    pending_answer: Option<RequestId>,
    pending_ingest: Option<(RequestId, String)>,
    next_request_id: RequestId,
    backend: BackendStatus,
    spinner_frame: usize,
    answer_scroll: u16,
    /// Last scroll offset that still shows answer text, reported by the UI.
    answer_scroll_max: u16,
    dirty: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Mode::default())
    }
}

impl AppState {
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            top_k: DEFAULT_TOP_K,
            query: String::new(),
            url_input: String::new(),
            question: String::new(),
            phase: Phase::AwaitingUrl,
            loading: false,
            ingesting: false,
            focus: Focus::Input,
            answer: String::new(),
            error: None,
            pending_answer: None,
            pending_ingest: None,
            next_request_id: 1,
            backend: BackendStatus::Unknown,
            spinner_frame: 0,
            answer_scroll: 0,
            answer_scroll_max: 0,
            dirty: false,
        }
    }

    pub fn with_top_k(mut self, top_k: u32) -> Self {
        self.top_k = top_k.max(1);
        self
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_ingesting(&self) -> bool {
        self.ingesting
    }

    /// True once a URL has been ingested successfully.
    pub fn is_processed(&self) -> bool {
        matches!(self.phase, Phase::Ready { .. })
    }

    pub fn view(&self) -> AppViewModel {
        let field = self.active_field();
        let busy = self.loading || self.ingesting;
        let (action_label, action_enabled) = match field {
            InputField::Url if self.ingesting => ("Ingesting…", false),
            InputField::Url => ("Ingest", true),
            _ if self.loading => ("Thinking…", false),
            _ => ("Ask", true),
        };
        AppViewModel {
            mode: self.mode,
            field,
            input_text: self.input_text().to_string(),
            action_label: action_label.to_string(),
            action_enabled,
            ingested_url: match &self.phase {
                Phase::Ready { url } if self.mode == Mode::Site => Some(url.clone()),
                _ => None,
            },
            answer: (!self.answer.is_empty()).then(|| self.answer.clone()),
            error: self.error.clone(),
            busy,
            spinner_frame: self.spinner_frame,
            backend: self.backend,
            focus: self.focus,
            answer_scroll: self.answer_scroll,
        }
    }

    /// Returns whether a redraw is due and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn active_field(&self) -> InputField {
        match (self.mode, &self.phase) {
            (Mode::Chat, _) => InputField::Query,
            (Mode::Site, Phase::AwaitingUrl) => InputField::Url,
            (Mode::Site, Phase::Ready { .. }) => InputField::Question,
        }
    }

    fn input_text(&self) -> &str {
        match self.active_field() {
            InputField::Query => &self.query,
            InputField::Url => &self.url_input,
            InputField::Question => &self.question,
        }
    }

    pub(crate) fn set_input(&mut self, text: String) -> bool {
        let slot = match self.active_field() {
            InputField::Query => &mut self.query,
            InputField::Url => &mut self.url_input,
            InputField::Question => &mut self.question,
        };
        if *slot == text {
            return false;
        }
        *slot = text;
        true
    }

    pub(crate) fn query(&self) -> &str {
        &self.query
    }

    pub(crate) fn url_input(&self) -> &str {
        &self.url_input
    }

    pub(crate) fn question(&self) -> &str {
        &self.question
    }

    pub(crate) fn top_k(&self) -> u32 {
        self.top_k
    }

    fn allocate_request_id(&mut self) -> RequestId {
        let id = self.next_request_id;
        self.next_request_id += 1;
        id
    }

    /// Marks an answer request in flight and clears the previous answer.
    pub(crate) fn begin_answer_request(&mut self) -> RequestId {
        let id = self.allocate_request_id();
        self.loading = true;
        self.pending_answer = Some(id);
        self.answer.clear();
        self.error = None;
        self.answer_scroll = 0;
        self.spinner_frame = 0;
        id
    }

    pub(crate) fn begin_ingest_request(&mut self, url: String) -> RequestId {
        let id = self.allocate_request_id();
        self.ingesting = true;
        self.pending_ingest = Some((id, url));
        self.error = None;
        self.spinner_frame = 0;
        id
    }

    /// Clears `loading` if `request_id` is the one in flight.
    pub(crate) fn finish_answer_request(&mut self, request_id: RequestId) -> bool {
        if self.pending_answer != Some(request_id) {
            return false;
        }
        self.pending_answer = None;
        self.loading = false;
        true
    }

    /// Returns the URL that was sent if `request_id` is the ingest in flight.
    pub(crate) fn finish_ingest_request(&mut self, request_id: RequestId) -> Option<String> {
        match self.pending_ingest.take() {
            Some((id, url)) if id == request_id => {
                self.ingesting = false;
                Some(url)
            }
            other => {
                self.pending_ingest = other;
                None
            }
        }
    }

    pub(crate) fn set_answer(&mut self, answer: String) {
        self.answer = answer;
        self.error = None;
    }

    pub(crate) fn set_error(&mut self, error: impl Into<String>) {
        self.error = Some(error.into());
    }

    /// Moves to `Ready`; there is no way back to `AwaitingUrl`.
    pub(crate) fn mark_ingested(&mut self, url: String) {
        self.phase = Phase::Ready { url };
    }

    pub(crate) fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Input => Focus::Answer,
            Focus::Answer => Focus::Input,
        };
    }

    pub(crate) fn scroll_answer(&mut self, delta: i16) -> bool {
        let next = if delta < 0 {
            self.answer_scroll.saturating_sub(delta.unsigned_abs())
        } else {
            self.answer_scroll
                .saturating_add(delta as u16)
                .min(self.answer_scroll_max)
        };
        let changed = next != self.answer_scroll;
        self.answer_scroll = next;
        changed
    }

    pub(crate) fn set_answer_scroll_max(&mut self, max_scroll: u16) -> bool {
        self.answer_scroll_max = max_scroll;
        let clamped = self.answer_scroll.min(max_scroll);
        let changed = clamped != self.answer_scroll;
        self.answer_scroll = clamped;
        changed
    }

    pub(crate) fn set_backend(&mut self, status: BackendStatus) -> bool {
        let changed = self.backend != status;
        self.backend = status;
        changed
    }

    /// Advances the spinner; returns false when nothing is in flight.
    pub(crate) fn advance_spinner(&mut self) -> bool {
        if !(self.loading || self.ingesting) {
            return false;
        }
        self.spinner_frame = self.spinner_frame.wrapping_add(1);
        true
    }
}
