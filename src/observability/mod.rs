//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Actions, chain client, transaction submitter:
//!     → logging.rs (tracing subscriber: pretty or JSON, EnvFilter)
//!     → metrics.rs (counters and histograms via the `metrics` facade)
//!
//! Consumers:
//!     → stderr log lines
//!     → Prometheus scrape endpoint (serve mode, when enabled)
//! ```
//!
//! Every action invocation runs inside an `action` span that carries the
//! action name and a UUID invocation id.

pub mod logging;
pub mod metrics;
