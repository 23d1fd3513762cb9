//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! relay handler / upstream client produce:
//!     → logging.rs (structured log events via `tracing`)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → stdout (fmt layer)
//!     → Prometheus scrape endpoint (optional)
//! ```
//!
//! # Design Decisions
//! - Request ID flows through every log line of a request
//! - The upstream credential is never a field of any event
//! - Metric macros are no-ops until a recorder is installed

pub mod logging;
pub mod metrics;
