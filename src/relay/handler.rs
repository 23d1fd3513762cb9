//! Relay handler.
//!
//! # Responsibilities
//! - Answer CORS preflights and the catch-all healthcheck
//! - Turn a POST to `RELAY_PATH` into one upstream call
//! - Map every failure to a plain-text 500; nothing escapes to the transport

use std::time::{Duration, Instant};

use axum::{
    body::{to_bytes, Body},
    extract::State,
    http::{Method, Request, StatusCode},
    response::Response,
};

use crate::config::RelayConfig;
use crate::error::{RelayError, Result};
use crate::http::request::request_id_of;
use crate::http::response::{error_response, preflight_response, text_response};
use crate::observability::metrics;
use crate::relay::inbound::InboundRequest;
use crate::relay::persona::system_persona_text;
use crate::relay::upstream::{extract_text, GenerateContentRequest, GenerationClient};

/// The single accepted route.
pub const RELAY_PATH: &str = "/api/damianai";

/// Read-only state shared by every invocation.
#[derive(Clone)]
pub struct RelayState {
    client: GenerationClient,
    max_body_bytes: usize,
    request_timeout: Duration,
}

impl RelayState {
    pub fn new(config: &RelayConfig) -> std::result::Result<Self, reqwest::Error> {
        Ok(Self {
            client: GenerationClient::new(&config.upstream)?,
            max_body_bytes: config.limits.max_body_bytes,
            request_timeout: Duration::from_secs(config.timeouts.request_secs),
        })
    }

    /// Handle one inbound request.
    pub async fn handle(&self, request: Request<Body>) -> Response {
        let start = Instant::now();
        let request_id = request_id_of(request.headers()).to_string();
        let method = request.method().clone();
        let path = request.uri().path().to_string();

        if method == Method::OPTIONS {
            tracing::debug!(request_id = %request_id, path = %path, "Preflight");
            metrics::record_request("preflight", StatusCode::NO_CONTENT.as_u16(), start);
            return preflight_response();
        }

        if method != Method::POST || path != RELAY_PATH {
            tracing::debug!(request_id = %request_id, method = %method, path = %path, "Catch-all");
            metrics::record_request("catch_all", StatusCode::OK.as_u16(), start);
            return text_response(StatusCode::OK, "OK");
        }

        let outcome = tokio::time::timeout(self.request_timeout, self.relay(request.into_body()))
            .await
            .unwrap_or_else(|_| Err(RelayError::Timeout(self.request_timeout.as_secs())));

        match outcome {
            Ok(text) => {
                tracing::info!(
                    request_id = %request_id,
                    model = %self.client.model(),
                    text_len = text.len(),
                    latency_ms = start.elapsed().as_millis() as u64,
                    "Relayed"
                );
                metrics::record_request("relayed", StatusCode::OK.as_u16(), start);
                text_response(StatusCode::OK, text)
            }
            Err(err) => {
                tracing::warn!(
                    request_id = %request_id,
                    kind = err.kind(),
                    error = %err,
                    latency_ms = start.elapsed().as_millis() as u64,
                    "Relay failed"
                );
                metrics::record_request(err.kind(), err.status().as_u16(), start);
                error_response(&err)
            }
        }
    }

    async fn relay(&self, body: Body) -> Result<String> {
        let bytes = to_bytes(body, self.max_body_bytes)
            .await
            .map_err(|e| RelayError::Body(e.to_string()))?;
        let inbound = InboundRequest::from_body(&bytes);

        if !self.client.has_credential() {
            return Err(RelayError::MissingCredential);
        }

        let system_text = system_persona_text(inbound.lang, &inbound.profile, &inbound.mini_bio);
        let request = GenerateContentRequest::new(system_text, inbound.prompt);
        let reply = self.client.generate_content(&request).await?;

        Ok(extract_text(&reply))
    }
}

/// Axum entry point for every method and path.
pub async fn relay_handler(State(state): State<RelayState>, request: Request<Body>) -> Response {
    state.handle(request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relay::inbound::DEFAULT_PROMPT;
    use crate::relay::upstream::FALLBACK_TEXT;
    use axum::http::header::{
        ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
    };
    use secrecy::Secret;
    use serde_json::{json, Value};
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn state_for(server: &MockServer, api_key: Option<&str>) -> RelayState {
        let mut config = RelayConfig::default();
        config.upstream.base_url = server.uri();
        config.upstream.api_key = api_key.map(|k| Secret::new(k.to_string()));
        RelayState::new(&config).unwrap()
    }

    fn post(body: impl Into<Body>) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri(RELAY_PATH)
            .body(body.into())
            .unwrap()
    }

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn assert_cors(response: &Response) {
        let headers = response.headers();
        assert_eq!(headers[ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert_eq!(headers[ACCESS_CONTROL_ALLOW_HEADERS], "Content-Type, Authorization");
        assert_eq!(headers[ACCESS_CONTROL_ALLOW_METHODS], "POST, OPTIONS");
    }

    async fn upstream_replying(template: ResponseTemplate) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(template)
            .mount(&server)
            .await;
        server
    }

    async fn sent_body(server: &MockServer) -> Value {
        let received = server.received_requests().await.unwrap();
        assert_eq!(received.len(), 1, "exactly one outbound call");
        serde_json::from_slice(&received[0].body).unwrap()
    }

    #[tokio::test]
    async fn concatenates_candidate_parts() {
        let server = upstream_replying(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{ "content": { "parts": [{ "text": "A" }, { "text": "B" }] } }]
        })))
        .await;
        let state = state_for(&server, Some("k"));

        let response = state.handle(post(r#"{"prompt":"hi"}"#)).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_cors(&response);
        assert_eq!(body_text(response).await, "AB");
    }

    #[tokio::test]
    async fn empty_candidates_yield_fallback_with_200() {
        let server =
            upstream_replying(ResponseTemplate::new(200).set_body_json(json!({ "candidates": [] })))
                .await;
        let state = state_for(&server, Some("k"));

        let response = state.handle(post("{}")).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, FALLBACK_TEXT);
    }

    #[tokio::test]
    async fn upstream_error_is_prefixed_500() {
        let server =
            upstream_replying(ResponseTemplate::new(503).set_body_string("quota exceeded")).await;
        let state = state_for(&server, Some("k"));

        let response = state.handle(post("{}")).await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_cors(&response);
        let body = body_text(response).await;
        assert!(body.starts_with("Gemini error: "));
        assert!(body.contains("quota exceeded"));
        assert_eq!(server.received_requests().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn missing_prompt_uses_default_placeholder() {
        let server = upstream_replying(ResponseTemplate::new(200).set_body_json(json!({}))).await;
        let state = state_for(&server, Some("k"));

        state.handle(post(r#"{"lang":"en"}"#)).await;

        let sent = sent_body(&server).await;
        assert_eq!(sent["contents"][0]["role"], "user");
        assert_eq!(sent["contents"][0]["parts"][0]["text"], DEFAULT_PROMPT);
    }

    #[tokio::test]
    async fn persona_follows_lang_and_embeds_profile() {
        let cases = [
            (r#"{"lang":"de"}"#, "Du bist Damian.AI"),
            (r#"{"lang":"en"}"#, "You are Damian.AI"),
            (r#"{"lang":"es"}"#, "Eres Damian.AI"),
            (r#"{"lang":"it"}"#, "Eres Damian.AI"),
            (r#"{}"#, "Eres Damian.AI"),
        ];
        for (body, expected) in cases {
            let server =
                upstream_replying(ResponseTemplate::new(200).set_body_json(json!({}))).await;
            let state = state_for(&server, Some("k"));

            state.handle(post(body)).await;

            let sent = sent_body(&server).await;
            let persona = sent["system_instruction"]["parts"][0]["text"].as_str().unwrap();
            assert!(persona.starts_with(expected), "{body}: {persona}");
            assert!(persona.ends_with("\nPerfil: {}\nMiniBio: "));
        }
    }

    #[tokio::test]
    async fn invalid_json_is_relayed_with_defaults() {
        let server = upstream_replying(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{ "content": { "parts": [{ "text": "ok" }] } }]
        })))
        .await;
        let state = state_for(&server, Some("k"));

        let response = state.handle(post("this is not json")).await;

        assert_eq!(response.status(), StatusCode::OK);
        let sent = sent_body(&server).await;
        assert_eq!(sent["contents"][0]["parts"][0]["text"], DEFAULT_PROMPT);
    }

    #[tokio::test]
    async fn missing_credential_short_circuits() {
        let server = upstream_replying(ResponseTemplate::new(200)).await;
        let state = state_for(&server, None);

        let response = state.handle(post("{}")).await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_cors(&response);
        assert!(body_text(response).await.contains("GEMINI_API_KEY"));
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn oversized_body_is_a_server_error() {
        let server = upstream_replying(ResponseTemplate::new(200)).await;
        let mut config = RelayConfig::default();
        config.upstream.base_url = server.uri();
        config.upstream.api_key = Some(Secret::new("k".to_string()));
        config.limits.max_body_bytes = 8;
        let state = RelayState::new(&config).unwrap();

        let response = state.handle(post(r#"{"prompt":"far too long"}"#)).await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body_text(response).await.starts_with("Server error: "));
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn request_timeout_is_a_plain_text_500() {
        let server = upstream_replying(
            ResponseTemplate::new(200)
                .set_body_json(json!({}))
                .set_delay(std::time::Duration::from_secs(3)),
        )
        .await;
        let mut config = RelayConfig::default();
        config.upstream.base_url = server.uri();
        config.upstream.api_key = Some(Secret::new("k".to_string()));
        config.upstream.timeout_secs = 10;
        config.timeouts.request_secs = 1;
        let state = RelayState::new(&config).unwrap();

        let response = state.handle(post("{}")).await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_cors(&response);
        assert_eq!(
            body_text(response).await,
            "Server error: request timed out after 1s"
        );
    }

    #[tokio::test]
    async fn preflight_and_catch_all_carry_cors() {
        let server = upstream_replying(ResponseTemplate::new(200)).await;
        let state = state_for(&server, Some("k"));

        let preflight = Request::builder()
            .method(Method::OPTIONS)
            .uri(RELAY_PATH)
            .body(Body::empty())
            .unwrap();
        let response = state.handle(preflight).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert_cors(&response);
        assert_eq!(body_text(response).await, "");

        for (method, uri) in [
            (Method::GET, RELAY_PATH),
            (Method::POST, "/api/other"),
            (Method::GET, "/"),
        ] {
            let request = Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap();
            let response = state.handle(request).await;
            assert_eq!(response.status(), StatusCode::OK);
            assert_cors(&response);
            assert_eq!(body_text(response).await, "OK");
        }

        assert!(server.received_requests().await.unwrap().is_empty());
    }
}
