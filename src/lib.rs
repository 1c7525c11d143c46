//! Trust-aware payment actions over the x402 trust and escrow contracts.
//!
//! Five actions read provider reputation from the trust protocol and move
//! payments through the escrow vault: `check_provider`,
//! `compare_providers`, `secure_payment`, `confirm_delivery` and
//! `raise_dispute`. Scoring, escrow release and dispute resolution all
//! happen on-chain; this crate validates, encodes, submits and reshapes.

pub mod actions;
pub mod blockchain;
pub mod config;
pub mod contracts;
pub mod http;
pub mod lifecycle;
pub mod observability;

pub use actions::{Action, ActionError, ActionOutput, ErrorKind, Params, TrustSkill};
pub use config::schema::TrustConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
