//! Chain access seam used by the contract layer.
//!
//! [`Connection`] is the RPC-backed implementation. Anything implementing
//! [`ChainAccess`] (an in-memory contract double in tests, for instance) can
//! stand in for it.

use alloy::primitives::{Address, Bytes};
use async_trait::async_trait;

use crate::blockchain::client::BlockchainClient;
use crate::blockchain::transaction::{SubmitLock, TxSubmitter};
use crate::blockchain::types::{BlockchainError, BlockchainResult, TxOutcome};
use crate::blockchain::wallet::Wallet;
use crate::config::TrustConfig;

/// Minimal chain surface the contract bindings need.
#[async_trait]
pub trait ChainAccess: Send + Sync {
    /// Read-only call; returns raw ABI-encoded output.
    async fn call(&self, to: Address, input: Bytes) -> BlockchainResult<Bytes>;

    /// Signed, state-changing call; resolves once the receipt is observed.
    ///
    /// `method` is a label for logs and metrics.
    async fn submit(&self, method: &'static str, to: Address, input: Bytes) -> BlockchainResult<TxOutcome>;

    /// Address transactions are signed with.
    fn sender(&self) -> BlockchainResult<Address>;

    /// Chain ID reported by the endpoint.
    async fn chain_id(&self) -> BlockchainResult<u64>;

    /// Latest block number.
    async fn block_number(&self) -> BlockchainResult<u64>;
}

/// Whether a connection must be able to sign.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signing {
    ReadOnly,
    Required,
}

/// RPC connection with an optional signer.
pub struct Connection {
    client: BlockchainClient,
    submitter: Option<TxSubmitter>,
}

impl Connection {
    /// Open a connection from configuration.
    ///
    /// Fails with [`BlockchainError::Wallet`] when signing is required and
    /// the key is missing or malformed. For read-only use a configured key is
    /// still loaded so that `sender` can answer, but a bad one is skipped.
    pub fn open(config: &TrustConfig, signing: Signing, lock: SubmitLock) -> BlockchainResult<Self> {
        let client = BlockchainClient::new(config.blockchain.clone())?;

        let wallet = match (&config.signing_key, signing) {
            (Some(key), Signing::Required) => Some(Wallet::from_private_key(key.expose(), config.blockchain.chain_id)?),
            (Some(key), Signing::ReadOnly) => match Wallet::from_private_key(key.expose(), config.blockchain.chain_id) {
                Ok(wallet) => Some(wallet),
                Err(e) => {
                    tracing::warn!(error = %e, "Ignoring unusable signing key for read-only connection");
                    None
                }
            },
            (None, Signing::Required) => {
                return Err(BlockchainError::Wallet(format!(
                    "{} not configured",
                    crate::config::loader::PRIVATE_KEY_ENV_VAR
                )));
            }
            (None, Signing::ReadOnly) => None,
        };

        let submitter = wallet.map(|w| TxSubmitter::new(client.clone(), w, lock));
        Ok(Self { client, submitter })
    }
}

#[async_trait]
impl ChainAccess for Connection {
    async fn call(&self, to: Address, input: Bytes) -> BlockchainResult<Bytes> {
        self.client.call(to, input).await
    }

    async fn submit(&self, method: &'static str, to: Address, input: Bytes) -> BlockchainResult<TxOutcome> {
        match &self.submitter {
            Some(submitter) => submitter.submit(method, to, input).await,
            None => Err(BlockchainError::Wallet(
                "Connection was opened without a signer".to_string(),
            )),
        }
    }

    fn sender(&self) -> BlockchainResult<Address> {
        self.submitter
            .as_ref()
            .map(TxSubmitter::address)
            .ok_or_else(|| BlockchainError::Wallet("No signing key configured".to_string()))
    }

    async fn chain_id(&self) -> BlockchainResult<u64> {
        self.client.get_chain_id().await.map(u64::from)
    }

    async fn block_number(&self) -> BlockchainResult<u64> {
        self.client.get_block_number().await
    }
}
