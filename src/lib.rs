//! Damian.AI relay library.
//!
//! Accepts a prompt and a small profile from a public frontend, frames it
//! with a fixed persona and forwards it to the Gemini `generateContent` API,
//! keeping the API key server-side.

pub mod config;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod relay;

pub use config::RelayConfig;
pub use error::RelayError;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
