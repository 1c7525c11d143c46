//! Configuration validation.
//!
//! Semantic checks only; serde handles syntax. All errors are collected,
//! not just the first.

use std::fmt;

use crate::blockchain::address::is_valid_address;
use crate::config::schema::TrustConfig;

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a loaded configuration.
pub fn validate_config(config: &TrustConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let mut fail = |field: &'static str, message: String| {
        errors.push(ValidationError { field, message });
    };

    if let Err(e) = config.blockchain.rpc_url.parse::<url::Url>() {
        fail("blockchain.rpc_url", format!("invalid URL '{}': {}", config.blockchain.rpc_url, e));
    }
    if config.blockchain.rpc_timeout_secs == 0 {
        fail("blockchain.rpc_timeout_secs", "must be greater than zero".to_string());
    }
    if config.blockchain.confirmation_timeout_secs == 0 {
        fail("blockchain.confirmation_timeout_secs", "must be greater than zero".to_string());
    }
    if config.blockchain.receipt_poll_interval_ms == 0 {
        fail("blockchain.receipt_poll_interval_ms", "must be greater than zero".to_string());
    }
    if !(config.blockchain.gas_price_multiplier.is_finite()
        && config.blockchain.gas_price_multiplier > 0.0)
    {
        fail("blockchain.gas_price_multiplier", "must be a positive number".to_string());
    }

    let contracts = &config.contracts;
    for (field, value) in [
        ("contracts.trust_protocol", &contracts.trust_protocol),
        ("contracts.reputation_engine", &contracts.reputation_engine),
        ("contracts.escrow_vault", &contracts.escrow_vault),
        ("contracts.dispute_manager", &contracts.dispute_manager),
        ("contracts.usdc", &contracts.usdc),
    ] {
        if !is_valid_address(value) {
            fail(field, format!("invalid address '{}'", value));
        }
    }

    if config.server.bind_address.parse::<std::net::SocketAddr>().is_err() {
        fail("server.bind_address", format!("invalid socket address '{}'", config.server.bind_address));
    }
    if config.server.request_timeout_secs <= config.blockchain.confirmation_timeout_secs {
        fail(
            "server.request_timeout_secs",
            "must exceed blockchain.confirmation_timeout_secs".to_string(),
        );
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
