use crate::{BackendStatus, Focus, Mode};

/// Which text field the input pane is editing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputField {
    Query,
    Url,
    Question,
}

impl InputField {
    pub fn label(self) -> &'static str {
        match self {
            InputField::Query => "Question",
            InputField::Url => "Website URL",
            InputField::Question => "Ask about this page",
        }
    }

    pub fn placeholder(self) -> &'static str {
        match self {
            InputField::Query => "Ask a question…",
            InputField::Url => "https://example.com",
            InputField::Question => "What is this page about?",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppViewModel {
    pub mode: Mode,
    pub field: InputField,
    pub input_text: String,
    pub action_label: String,
    pub action_enabled: bool,
    pub ingested_url: Option<String>,
    pub answer: Option<String>,
    pub error: Option<String>,
    pub busy: bool,
    pub spinner_frame: usize,
    pub backend: BackendStatus,
    pub focus: Focus,
    pub answer_scroll: u16,
}
