//! Docker registry webhook payload extraction

use serde_json::Value;

use crate::error::{RelayError, Result};

/// Placeholder used for any field the payload does not carry.
pub const UNKNOWN: &str = "Unknown";

/// The only action that results in a notification.
pub const PUSH_ACTION: &str = "push";

/// A decoded webhook event.
#[derive(Debug, Clone, PartialEq)]
pub enum WebhookEvent {
    /// Any event whose `action` is not `"push"`. Carries the action if it was a string.
    Other(Option<String>),
    Push(PushEvent),
}

/// Data extracted from a push event.
/// Missing fields already hold the `Unknown` placeholder.
#[derive(Debug, Clone, PartialEq)]
pub struct PushEvent {
    /// Repository short name (`repository.name`)
    pub name: String,
    /// Repository full name (`repository.repo_name`)
    pub repo_name: String,
    pub tag: String,
    /// Push timestamp, passed through untouched
    pub pushed_at: String,
}

impl WebhookEvent {
    /// Parses a raw request body. The body must be a JSON object; every
    /// field below the top level is optional.
    pub fn from_slice(body: &[u8]) -> Result<Self> {
        let payload: Value = serde_json::from_slice(body)?;
        Self::from_value(&payload)
    }

    pub fn from_value(payload: &Value) -> Result<Self> {
        if !payload.is_object() {
            return Err(RelayError::InvalidPayload("expected a JSON object".to_string()));
        }

        let action = payload.get("action").and_then(|a| a.as_str());
        if action != Some(PUSH_ACTION) {
            return Ok(WebhookEvent::Other(action.map(String::from)));
        }

        Ok(WebhookEvent::Push(PushEvent {
            name: string_or_unknown(payload, "repository", "name"),
            repo_name: string_or_unknown(payload, "repository", "repo_name"),
            tag: string_or_unknown(payload, "target", "tag"),
            pushed_at: string_or_unknown(payload, "target", "date"),
        }))
    }
}

fn string_or_unknown(payload: &Value, section: &str, field: &str) -> String {
    payload
        .get(section)
        .and_then(|s| s.get(field))
        .and_then(|v| v.as_str())
        .unwrap_or(UNKNOWN)
        .to_string()
}
