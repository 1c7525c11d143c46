//! HTTP action surface.
//!
//! # Data Flow
//! ```text
//! POST /v1/actions/{action} (JSON object body)
//!     → server.rs (request ID, trace, timeout layers)
//!     → handlers.rs (parse body, TrustSkill::dispatch)
//!     → flat result map, status from ErrorKind
//! ```

pub mod handlers;
pub mod server;

pub use server::{AppState, HttpServer};
