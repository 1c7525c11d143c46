//! Configuration loading from disk and the environment.

use std::fs;
use std::path::Path;

use crate::config::schema::{LogFormat, SigningKey, TrustConfig};

/// Environment variable holding the signing key.
pub const PRIVATE_KEY_ENV_VAR: &str = "EVM_PRIVATE_KEY";

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

/// An environment value that was ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvWarning {
    pub variable: &'static str,
    pub value: String,
    pub message: &'static str,
}

impl EnvWarning {
    pub fn log(&self) {
        tracing::warn!(variable = self.variable, value = %self.value, "{}", self.message);
    }
}

/// Load configuration: defaults, then the optional TOML file, then the
/// process environment.
///
/// Ignored environment values are returned rather than logged, since this
/// usually runs before the subscriber is installed.
pub fn load_config(path: Option<&Path>) -> Result<(TrustConfig, Vec<EnvWarning>), ConfigError> {
    let mut config = match path {
        Some(path) => {
            let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
            toml::from_str(&content).map_err(ConfigError::Parse)?
        }
        None => TrustConfig::default(),
    };

    let warnings = apply_env(&mut config, |key| std::env::var(key).ok());
    Ok((config, warnings))
}

impl TrustConfig {
    /// Defaults overridden by the process environment. Never fails.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        for warning in apply_env(&mut config, |key| std::env::var(key).ok()) {
            warning.log();
        }
        config
    }
}

/// Overlay environment settings onto `config`.
///
/// `lookup` resolves a variable name; empty values count as unset.
/// Unparseable numbers keep the current value and are reported back.
pub fn apply_env<F>(config: &mut TrustConfig, lookup: F) -> Vec<EnvWarning>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
    let mut warnings = Vec::new();

    if let Some(v) = get("RPC_URL") {
        config.blockchain.rpc_url = v;
    }
    if let Some(v) = get("CHAIN_ID") {
        set_number(&mut config.blockchain.chain_id, "CHAIN_ID", &v, &mut warnings);
    }
    if let Some(v) = get("X402_RPC_TIMEOUT_SECS") {
        set_number(&mut config.blockchain.rpc_timeout_secs, "X402_RPC_TIMEOUT_SECS", &v, &mut warnings);
    }
    if let Some(v) = get("X402_CONFIRMATION_TIMEOUT_SECS") {
        set_number(
            &mut config.blockchain.confirmation_timeout_secs,
            "X402_CONFIRMATION_TIMEOUT_SECS",
            &v,
            &mut warnings,
        );
    }

    let contracts = &mut config.contracts;
    for (key, slot) in [
        ("TRUST_PROTOCOL_ADDRESS", &mut contracts.trust_protocol),
        ("REPUTATION_ENGINE_ADDRESS", &mut contracts.reputation_engine),
        ("ESCROW_VAULT_ADDRESS", &mut contracts.escrow_vault),
        ("DISPUTE_MANAGER_ADDRESS", &mut contracts.dispute_manager),
        ("USDC_ADDRESS", &mut contracts.usdc),
    ] {
        if let Some(v) = get(key) {
            *slot = v;
        }
    }

    if let Some(v) = get(PRIVATE_KEY_ENV_VAR) {
        config.signing_key = Some(SigningKey::new(v));
    }

    if let Some(v) = get("X402_LOG_LEVEL") {
        config.observability.log_level = v;
    }
    if let Some(v) = get("X402_LOG_FORMAT") {
        match v.to_ascii_lowercase().as_str() {
            "json" => config.observability.log_format = LogFormat::Json,
            "pretty" => config.observability.log_format = LogFormat::Pretty,
            _ => warnings.push(EnvWarning {
                variable: "X402_LOG_FORMAT",
                value: v,
                message: "Ignoring unknown log format",
            }),
        }
    }
    warnings
}

fn set_number<T: std::str::FromStr>(slot: &mut T, key: &'static str, raw: &str, warnings: &mut Vec<EnvWarning>) {
    match raw.trim().parse() {
        Ok(v) => *slot = v,
        Err(_) => warnings.push(EnvWarning {
            variable: key,
            value: raw.to_string(),
            message: "Ignoring non-numeric environment value",
        }),
    }
}
