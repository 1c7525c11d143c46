//! Chain-specific types and error definitions.

use alloy::primitives::{Log, TxHash};
use thiserror::Error;

/// Chain ID type for strong typing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChainId(pub u64);

impl From<u64> for ChainId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl From<ChainId> for u64 {
    fn from(id: ChainId) -> Self {
        id.0
    }
}

/// Errors that can occur during blockchain operations.
#[derive(Debug, Error)]
pub enum BlockchainError {
    /// RPC connection or request failed.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// RPC request timed out.
    #[error("RPC timeout after {0} seconds")]
    Timeout(u64),

    /// No receipt was observed before the confirmation deadline.
    #[error("Transaction {tx_hash} not confirmed after {waited_secs} seconds")]
    ConfirmationTimeout { tx_hash: TxHash, waited_secs: u64 },

    /// Transaction was mined but reverted.
    #[error("Transaction reverted: {0}")]
    Reverted(TxHash),

    /// Missing or invalid private key, or signing failure.
    #[error("Wallet error: {0}")]
    Wallet(String),

    /// Gas price exceeded maximum allowed.
    #[error("Gas price {current_gwei} gwei exceeds maximum {max_gwei} gwei")]
    GasPriceTooHigh { current_gwei: u64, max_gwei: u64 },

    /// Chain configuration mismatch.
    #[error("Chain ID mismatch: expected {expected}, got {actual}")]
    ChainMismatch { expected: u64, actual: u64 },

    /// Connection settings are unusable.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Return data did not match the contract ABI.
    #[error("Failed to decode {method}: {reason}")]
    Decode { method: &'static str, reason: String },

    /// Return data decoded but is inconsistent.
    #[error("Unexpected contract response: {0}")]
    Contract(String),
}

/// Result type for blockchain operations.
pub type BlockchainResult<T> = Result<T, BlockchainError>;

/// A mined, successful transaction and the logs it emitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxOutcome {
    /// Transaction hash.
    pub tx_hash: TxHash,
    /// Block the transaction was included in, if reported.
    pub block_number: Option<u64>,
    /// Emitted logs in receipt order.
    pub logs: Vec<Log>,
}

/// Transaction confirmation status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmationStatus {
    /// No receipt yet.
    Pending,
    /// Receipt observed with success status.
    Confirmed { block_number: Option<u64> },
    /// Receipt observed with failed status.
    Reverted,
}
