//! Metrics collection and exposition.
//!
//! # Metrics
//! - `x402_actions_total` (counter): invocations by action, outcome
//! - `x402_action_duration_seconds` (histogram): invocation latency by action
//! - `x402_rpc_errors_total` (counter): failed or timed-out RPCs by operation
//! - `x402_transactions_total` (counter): submissions by method, status
//!
//! Without an installed recorder the macros are no-ops, so the CLI and tests
//! pay nothing.

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};
use std::net::SocketAddr;
use std::time::Instant;

/// Install the Prometheus exporter with an HTTP scrape listener.
///
/// Must be called from within a tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

/// Record one finished action invocation.
pub fn record_action(action: &'static str, outcome: &'static str, start: Instant) {
    counter!("x402_actions_total", "action" => action, "outcome" => outcome).increment(1);
    histogram!("x402_action_duration_seconds", "action" => action).record(start.elapsed().as_secs_f64());
}

/// Record a failed RPC request.
pub fn record_rpc_error(operation: &'static str) {
    counter!("x402_rpc_errors_total", "operation" => operation).increment(1);
}

/// Record a submitted transaction's final status.
pub fn record_transaction(method: &'static str, status: &'static str) {
    counter!("x402_transactions_total", "method" => method, "status" => status).increment(1);
}
