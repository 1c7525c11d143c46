//! Blockchain integration subsystem.
//!
//! # Data Flow
//! ```text
//! TrustConfig (RPC URL, chain id, signing key)
//!     → client.rs (RPC requests with timeouts)
//!     → wallet.rs (key loading, signing)
//!     → transaction.rs (fill, sign, broadcast, wait for receipt)
//!     → connection.rs (ChainAccess: call / submit / sender)
//! ```
//!
//! # Security Constraints
//! - Never log private keys or sensitive data
//! - All RPC calls and receipt waits have configurable deadlines

pub mod address;
pub mod client;
pub mod connection;
pub mod transaction;
pub mod types;
pub mod wallet;

pub use address::{checksum_string, content_hash, is_valid_address, to_checksummed};
pub use client::BlockchainClient;
pub use connection::{ChainAccess, Connection, Signing};
pub use transaction::{SubmitLock, TxSubmitter};
pub use types::{BlockchainError, BlockchainResult, ChainId, TxOutcome};
pub use wallet::Wallet;
