//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the skill.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Root configuration for the trust skill.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct TrustConfig {
    /// JSON-RPC connection and transaction settings.
    pub blockchain: BlockchainConfig,

    /// Deployed protocol contract addresses.
    pub contracts: ContractsConfig,

    /// Private key used for state-changing actions.
    ///
    /// Has no default. Read-only actions work without it.
    #[serde(skip_serializing)]
    pub signing_key: Option<SigningKey>,

    /// HTTP action surface settings.
    pub server: ServerConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Blockchain connection configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BlockchainConfig {
    /// JSON-RPC endpoint URL.
    pub rpc_url: String,

    /// Chain ID transactions are signed for.
    pub chain_id: u64,

    /// RPC request timeout in seconds.
    pub rpc_timeout_secs: u64,

    /// Maximum time to wait for a submitted transaction's receipt.
    pub confirmation_timeout_secs: u64,

    /// Receipt polling interval in milliseconds.
    pub receipt_poll_interval_ms: u64,

    /// Gas price multiplier (1.0 = network price, 1.2 = 20% buffer).
    pub gas_price_multiplier: f64,

    /// Optional gas price ceiling in gwei.
    pub max_gas_price_gwei: Option<u64>,
}

impl Default for BlockchainConfig {
    fn default() -> Self {
        Self {
            rpc_url: "https://rpc.testnet.arc.network".to_string(),
            chain_id: 5_042_002,
            rpc_timeout_secs: 10,
            confirmation_timeout_secs: 120,
            receipt_poll_interval_ms: 1000,
            gas_price_multiplier: 1.0,
            max_gas_price_gwei: None,
        }
    }
}

/// Addresses of the deployed protocol contracts.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ContractsConfig {
    /// Trust score reader.
    pub trust_protocol: String,

    /// Reputation engine. Not called by any action.
    pub reputation_engine: String,

    /// Escrow vault holding payments.
    pub escrow_vault: String,

    /// Dispute manager. Disputes are raised through the vault.
    pub dispute_manager: String,

    /// Payment token (USDC, 6 decimals).
    pub usdc: String,
}

impl Default for ContractsConfig {
    fn default() -> Self {
        Self {
            trust_protocol: "0x1eC0007C35Aa4A5008263e2C257942f4cb4F329F".to_string(),
            reputation_engine: "0x86fa599c4474E8098400e57760543E7191B2DA1e".to_string(),
            escrow_vault: "0x8E46e646ab9caACC8322dBD5E17A08166F09B9FD".to_string(),
            dispute_manager: "0x7449713F47A782b5df27ac6d375A55E6dA7A58a9".to_string(),
            usdc: "0x8Fd5A8a2d6373a1c299C46Ed7862CA277316237B".to_string(),
        }
    }
}

/// Hex-encoded private key. Never printed.
#[derive(Clone, Deserialize)]
#[serde(transparent)]
pub struct SigningKey(String);

impl SigningKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Raw key material, for wallet construction only.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SigningKey(<redacted>)")
    }
}

/// HTTP action surface configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (e.g., "127.0.0.1:8402").
    pub bind_address: String,

    /// Request timeout in seconds. Must exceed the confirmation wait.
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:8402".to_string(),
            request_timeout_secs: 300,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable metrics endpoint (serve mode only).
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9402".to_string(),
        }
    }
}
