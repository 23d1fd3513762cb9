//! Inbound request body.
//!
//! Parsing is total: whatever bytes arrive, the caller gets an
//! `InboundRequest` with defaults filled in.

use serde_json::{Map, Value};

use crate::relay::persona::Lang;
use crate::relay::render::coerce_to_string;

/// Prompt used when the caller sends none.
pub const DEFAULT_PROMPT: &str = "Dime por qué deberíamos contratarte";

#[derive(Debug, Clone, PartialEq)]
pub struct InboundRequest {
    pub prompt: String,
    pub lang: Lang,
    pub profile: Value,
    pub mini_bio: String,
}

impl Default for InboundRequest {
    fn default() -> Self {
        Self {
            prompt: DEFAULT_PROMPT.to_string(),
            lang: Lang::default(),
            profile: Value::Object(Map::new()),
            mini_bio: String::new(),
        }
    }
}

impl InboundRequest {
    /// Parse a raw body. Bodies that are not a JSON object are treated as `{}`.
    pub fn from_body(body: &[u8]) -> Self {
        match serde_json::from_slice::<Value>(body) {
            Ok(Value::Object(fields)) => Self::from_fields(&fields),
            Ok(_) => {
                tracing::debug!("Inbound body is not a JSON object, using defaults");
                Self::default()
            }
            Err(e) => {
                tracing::debug!(error = %e, "Inbound body is not valid JSON, using defaults");
                Self::default()
            }
        }
    }

    fn from_fields(fields: &Map<String, Value>) -> Self {
        let defaults = Self::default();

        let prompt = match fields.get("prompt") {
            None => defaults.prompt,
            Some(value) => coerce_to_string(value),
        };

        let lang = fields
            .get("lang")
            .and_then(Value::as_str)
            .map(Lang::from_code)
            .unwrap_or_default();

        let profile = fields.get("profile").cloned().unwrap_or(defaults.profile);

        let mini_bio = match fields.get("miniBio") {
            Some(value) if is_truthy(value) => coerce_to_string(value),
            _ => String::new(),
        };

        Self {
            prompt,
            lang,
            profile,
            mini_bio,
        }
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
