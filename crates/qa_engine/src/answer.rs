use serde_json::Value;

/// Text to display for an answer response.
///
/// Uses the `answer` field when it is truthy; otherwise falls back to the
/// whole body as compact JSON, keys in the order the backend sent them.
pub fn answer_text(body: &Value) -> String {
    match body.get("answer") {
        Some(Value::String(text)) if !text.is_empty() => text.clone(),
        Some(answer) if is_truthy(answer) => answer.to_string(),
        _ => body.to_string(),
    }
}

/// Parsed `/api/ingest` reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestReply {
    pub success: bool,
    pub error: Option<String>,
}

impl IngestReply {
    /// A missing or non-boolean `success` counts as a failure.
    pub fn from_json(body: &Value) -> Self {
        Self {
            success: body.get("success").and_then(Value::as_bool).unwrap_or(false),
            error: body
                .get("error")
                .and_then(Value::as_str)
                .map(ToOwned::to_owned),
        }
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
