//! The relay: one inbound POST becomes one `generateContent` call.
//!
//! # Data Flow
//! ```text
//! inbound body
//!     → inbound.rs (lenient JSON, defaults)
//!     → persona.rs (system instruction by language, render.rs for values)
//!     → upstream.rs (request body, one outbound call, extract_text)
//!     → handler.rs (status + plain-text body)
//! ```

pub mod handler;
pub mod inbound;
pub mod persona;
pub mod render;
pub mod upstream;

pub use handler::{relay_handler, RelayState, RELAY_PATH};
pub use inbound::InboundRequest;
pub use persona::Lang;
pub use upstream::{extract_text, GenerationClient, FALLBACK_TEXT};
