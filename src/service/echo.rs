use regex::Regex;

use crate::service::Service;

pub const FIELD_NOT_FOUND: &str = "Error: field 'text' not found";

const TEXT_FIELD_PATTERN: &str = r#""text"\s*:\s*"(.*?)""#;

/// Echoes the `"text"` field of a loosely JSON-shaped payload.
///
/// Matching is textual, not a JSON parse: the first `"text": "..."` pair
/// wins and the value stops at the next double quote. A missing field is
/// reported behind the same `Echo: ` prefix.
#[derive(Debug, Clone)]
pub struct EchoService {
    text_field: Regex,
}

impl EchoService {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            text_field: Regex::new(TEXT_FIELD_PATTERN)?,
        })
    }

    pub fn extract<'a>(&self, payload: &'a str) -> Option<&'a str> {
        self.text_field
            .captures(payload)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }
}

impl Service for EchoService {
    fn respond(&self, payload: &str) -> String {
        let reply = format!("Echo: {}", self.extract(payload).unwrap_or(FIELD_NOT_FOUND));
        tracing::debug!(response = %reply, "echo service");
        reply
    }
}
