//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → environment overlay (GEMINI_API_KEY, GEMINI_MODEL, RELAY_BIND)
//!     → validation.rs (semantic checks)
//!     → RelayConfig (validated, immutable)
//!     → handed to the HTTP server, which clones what each handler needs
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults to allow minimal configs
//! - The credential is a `secrecy::Secret` and never printed

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{
    CredentialTransport, LimitsConfig, ListenerConfig, ObservabilityConfig, RelayConfig,
    TimeoutConfig, UpstreamConfig,
};
