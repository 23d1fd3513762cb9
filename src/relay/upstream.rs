//! Client for the `generateContent` endpoint of the generation API.
//!
//! # Responsibilities
//! - Wire types for the request and the parts of the reply we read
//! - One POST per call, credential attached per `CredentialTransport`
//! - `extract_text`: total function from a reply to the caller's text
//!
//! The credential is never logged; the endpoint is logged without its query.

use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use crate::config::{CredentialTransport, UpstreamConfig};
use crate::error::{RelayError, Result};
use crate::observability::metrics;

/// Text returned when a successful reply carries no text.
pub const FALLBACK_TEXT: &str = "No hay texto en la respuesta.";

/// Header used by the header credential transport.
pub const API_KEY_HEADER: &str = "x-goog-api-key";

/// Query parameter used by the query credential transport.
pub const API_KEY_QUERY_PARAM: &str = "key";

/// `generateContent` request body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerateContentRequest {
    pub system_instruction: SystemInstruction,
    pub contents: Vec<Content>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SystemInstruction {
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Content {
    pub role: String,
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Part {
    pub text: String,
}

impl GenerateContentRequest {
    /// A single user turn framed by a system instruction.
    pub fn new(system_text: String, prompt: String) -> Self {
        Self {
            system_instruction: SystemInstruction {
                parts: vec![Part { text: system_text }],
            },
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![Part { text: prompt }],
            }],
        }
    }
}

/// The subset of a `generateContent` reply that is read. Every level is
/// optional; anything else in the reply is ignored.
#[derive(Debug, Default, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Option<Vec<Candidate>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<CandidateContent>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Option<Vec<ResponsePart>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ResponsePart {
    #[serde(default)]
    pub text: Option<String>,
}

impl GenerateContentResponse {
    /// Read an already-parsed JSON reply. A reply whose shape does not match
    /// at all reads as an empty reply.
    pub fn from_value(value: Value) -> Self {
        serde_json::from_value(value).unwrap_or_default()
    }
}

/// Concatenate the text parts of the first candidate, in order.
///
/// Absent levels, an empty parts list, or parts without text all end in
/// `FALLBACK_TEXT`.
pub fn extract_text(response: &GenerateContentResponse) -> String {
    response
        .candidates
        .as_deref()
        .and_then(|candidates| candidates.first())
        .and_then(|candidate| candidate.content.as_ref())
        .and_then(|content| content.parts.as_deref())
        .map(|parts| {
            parts
                .iter()
                .map(|part| part.text.as_deref().unwrap_or(""))
                .collect::<String>()
        })
        .filter(|text| !text.is_empty())
        .unwrap_or_else(|| FALLBACK_TEXT.to_string())
}

/// HTTP client for the generation API.
#[derive(Clone)]
pub struct GenerationClient {
    client: Client,
    base_url: String,
    model: String,
    api_key: Option<Secret<String>>,
    transport: CredentialTransport,
}

impl GenerationClient {
    /// Build a client from the upstream section of the config.
    pub fn new(config: &UpstreamConfig) -> std::result::Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key: config.api_key.clone(),
            transport: config.credential_transport,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Whether a usable (non-blank) credential is configured.
    pub fn has_credential(&self) -> bool {
        self.credential().is_some()
    }

    fn credential(&self) -> Option<&str> {
        self.api_key
            .as_ref()
            .map(|key| key.expose_secret().as_str())
            .filter(|key| !key.trim().is_empty())
    }

    /// Endpoint URL without any credential attached.
    pub fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }

    /// Issue exactly one `generateContent` call.
    pub async fn generate_content(
        &self,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse> {
        let key = self.credential().ok_or(RelayError::MissingCredential)?;

        let endpoint = self.endpoint();
        let mut url = Url::parse(&endpoint)?;
        if self.transport == CredentialTransport::Query {
            url.query_pairs_mut().append_pair(API_KEY_QUERY_PARAM, key);
        }

        let mut builder = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json; charset=utf-8")
            .body(serde_json::to_vec(request)?);
        if self.transport == CredentialTransport::Header {
            builder = builder.header(API_KEY_HEADER, key);
        }

        tracing::debug!(
            endpoint = %endpoint,
            model = %self.model,
            transport = ?self.transport,
            "Sending request to generation API"
        );

        let response = match builder.send().await {
            Ok(response) => response,
            Err(e) => {
                metrics::record_upstream_call("error");
                let err = RelayError::from(e);
                tracing::error!(endpoint = %endpoint, error = %err, "Generation API unreachable");
                return Err(err);
            }
        };

        let status = response.status();
        metrics::record_upstream_call(status.as_str());

        if !status.is_success() {
            let body = response.text().await?;
            tracing::warn!(
                endpoint = %endpoint,
                status = status.as_u16(),
                "Generation API returned an error"
            );
            return Err(RelayError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        let value: Value = serde_json::from_slice(&bytes)?;
        Ok(GenerateContentResponse::from_value(value))
    }
}
