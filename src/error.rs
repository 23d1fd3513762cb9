//! Error taxonomy for the relay path.
//!
//! Every variant ends at the HTTP boundary as a plain-text 500. Malformed
//! inbound JSON and a reply without text are recovered where they occur and
//! never become a `RelayError`.

use axum::http::StatusCode;
use thiserror::Error;

/// Prefix for failures reported by, or while reaching, the generation API.
pub const UPSTREAM_ERROR_PREFIX: &str = "Gemini error: ";

/// Prefix for any other fault raised while relaying.
pub const SERVER_ERROR_PREFIX: &str = "Server error: ";

#[derive(Error, Debug)]
pub enum RelayError {
    /// The upstream credential is not configured.
    #[error("Falta GEMINI_API_KEY en la configuración del relay.")]
    MissingCredential,

    /// The generation API answered with a non-success status.
    #[error("Gemini error: {body}")]
    Upstream { status: u16, body: String },

    /// The outbound call never produced a status (connect error, timeout).
    #[error("Gemini error: {0}")]
    Transport(String),

    /// A success reply that is not JSON.
    #[error("Server error: {0}")]
    Decode(#[from] serde_json::Error),

    /// The configured base URL and model do not form a valid URL.
    #[error("Server error: {0}")]
    InvalidEndpoint(#[from] url::ParseError),

    /// The inbound request did not complete within the request timeout.
    #[error("Server error: request timed out after {0}s")]
    Timeout(u64),

    /// The inbound body could not be read.
    #[error("Server error: {0}")]
    Body(String),
}

impl RelayError {
    /// Status code surfaced to the caller.
    pub fn status(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }

    /// Short label used for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            RelayError::MissingCredential => "config",
            RelayError::Upstream { .. } | RelayError::Transport(_) => "upstream",
            RelayError::Decode(_)
            | RelayError::InvalidEndpoint(_)
            | RelayError::Timeout(_)
            | RelayError::Body(_) => {
                "internal"
            }
        }
    }
}

impl From<reqwest::Error> for RelayError {
    fn from(e: reqwest::Error) -> Self {
        use std::error::Error as _;

        // With the query transport the URL carries the key.
        let e = e.without_url();
        let mut message = e.to_string();
        let mut source = e.source();
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(&cause.to_string());
            source = cause.source();
        }
        RelayError::Transport(message)
    }
}

pub type Result<T> = std::result::Result<T, RelayError>;
