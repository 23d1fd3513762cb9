//! Response construction.
//!
//! Every response the relay emits is plain text, carries the same
//! permissive CORS header set and is marked `Cache-Control: no-store`.

use std::any::Any;

use axum::{
    http::{
        header::{
            ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
            ACCESS_CONTROL_ALLOW_ORIGIN, CACHE_CONTROL,
        },
        HeaderName, HeaderValue, StatusCode,
    },
    response::{IntoResponse, Response},
};

use crate::error::{RelayError, SERVER_ERROR_PREFIX};

pub const ALLOW_ORIGIN: &str = "*";
pub const ALLOW_HEADERS: &str = "Content-Type, Authorization";
pub const ALLOW_METHODS: &str = "POST, OPTIONS";
pub const NO_STORE: &str = "no-store";

/// The CORS header set attached to every response.
pub fn cors_headers() -> [(HeaderName, HeaderValue); 3] {
    [
        (ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static(ALLOW_ORIGIN)),
        (ACCESS_CONTROL_ALLOW_HEADERS, HeaderValue::from_static(ALLOW_HEADERS)),
        (ACCESS_CONTROL_ALLOW_METHODS, HeaderValue::from_static(ALLOW_METHODS)),
    ]
}

fn decorate(mut response: Response) -> Response {
    let headers = response.headers_mut();
    for (name, value) in cors_headers() {
        headers.insert(name, value);
    }
    headers.insert(CACHE_CONTROL, HeaderValue::from_static(NO_STORE));
    response
}

/// `text/plain; charset=utf-8` response with the standard headers.
pub fn text_response(status: StatusCode, body: impl Into<String>) -> Response {
    decorate((status, body.into()).into_response())
}

/// Empty answer to a CORS preflight.
pub fn preflight_response() -> Response {
    decorate(StatusCode::NO_CONTENT.into_response())
}

/// Plain-text error response.
pub fn error_response(err: &RelayError) -> Response {
    text_response(err.status(), err.to_string())
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        error_response(&self)
    }
}

/// Render a panic caught below the router as a server error.
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };

    tracing::error!(panic = %message, "Handler panicked");
    text_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        format!("{SERVER_ERROR_PREFIX}{message}"),
    )
}
