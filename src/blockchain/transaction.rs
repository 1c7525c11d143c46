//! Transaction building, signing, and confirmation monitoring.
//!
//! # Responsibilities
//! - Fill nonce, gas limit and gas price from the chain
//! - Sign and broadcast transactions
//! - Wait for the receipt under a deadline
//!
//! Submissions are serialized through a shared lock held from nonce lookup
//! to broadcast, so concurrent actions signing with one key do not race for
//! the same nonce. Failed broadcasts are not retried.

use alloy::network::{ReceiptResponse, TransactionBuilder};
use alloy::primitives::{Address, Bytes, TxHash};
use alloy::rpc::types::{TransactionReceipt, TransactionRequest};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{interval, timeout, MissedTickBehavior};

use crate::blockchain::client::BlockchainClient;
use crate::blockchain::types::{BlockchainError, BlockchainResult, ConfirmationStatus, TxOutcome};
use crate::blockchain::wallet::Wallet;
use crate::observability::metrics;

/// Lock shared by every submitter signing with the same key.
pub type SubmitLock = Arc<Mutex<()>>;

/// Builds, signs, broadcasts and confirms transactions.
pub struct TxSubmitter {
    client: BlockchainClient,
    wallet: Wallet,
    lock: SubmitLock,
}

impl TxSubmitter {
    /// Create a new transaction submitter.
    pub fn new(client: BlockchainClient, wallet: Wallet, lock: SubmitLock) -> Self {
        Self {
            client,
            wallet,
            lock,
        }
    }

    /// Submit a contract call and wait for its receipt.
    ///
    /// `method` labels logs and metrics only.
    pub async fn submit(
        &self,
        method: &'static str,
        to: Address,
        input: Bytes,
    ) -> BlockchainResult<TxOutcome> {
        let tx_hash = {
            let _guard = self.lock.lock().await;
            let tx = self.build(to, input).await?;
            let raw = self.wallet.sign_transaction(tx).await?;
            self.client.send_raw_transaction(&raw).await?
        };

        tracing::info!(method, tx_hash = %tx_hash, to = %to, "Transaction broadcast");

        let result = self.wait_for_receipt(tx_hash).await;
        match &result {
            Ok(outcome) => {
                metrics::record_transaction(method, "confirmed");
                tracing::info!(
                    method,
                    tx_hash = %tx_hash,
                    block_number = ?outcome.block_number,
                    logs = outcome.logs.len(),
                    "Transaction confirmed"
                );
            }
            Err(BlockchainError::Reverted(_)) => metrics::record_transaction(method, "reverted"),
            Err(BlockchainError::ConfirmationTimeout { .. }) => {
                metrics::record_transaction(method, "timeout")
            }
            Err(_) => metrics::record_transaction(method, "error"),
        }
        result
    }

    /// Build a transaction request with chain-provided nonce, gas and price.
    async fn build(&self, to: Address, input: Bytes) -> BlockchainResult<TransactionRequest> {
        self.client.verify_chain_id().await?;

        let config = self.client.config();
        let nonce = self.client.get_pending_nonce(self.wallet.address()).await?;

        let gas_price = self.client.get_gas_price().await?;
        if let Some(max_gwei) = config.max_gas_price_gwei {
            let gas_price_gwei = gas_price / 1_000_000_000;
            if gas_price_gwei > max_gwei as u128 {
                return Err(BlockchainError::GasPriceTooHigh {
                    current_gwei: gas_price_gwei as u64,
                    max_gwei,
                });
            }
        }
        let adjusted_gas_price = (gas_price as f64 * config.gas_price_multiplier) as u128;

        let tx = TransactionRequest::default()
            .with_from(self.wallet.address())
            .with_to(to)
            .with_input(input)
            .with_nonce(nonce)
            .with_chain_id(self.wallet.chain_id());

        let gas_limit = self.client.estimate_gas(&tx).await?;

        tracing::debug!(
            nonce,
            gas_limit,
            gas_price = adjusted_gas_price,
            "Transaction built"
        );

        Ok(tx.with_gas_limit(gas_limit).with_gas_price(adjusted_gas_price))
    }

    /// Poll for the receipt until the configured deadline.
    pub async fn wait_for_receipt(&self, tx_hash: TxHash) -> BlockchainResult<TxOutcome> {
        let config = self.client.config();
        let deadline = Duration::from_secs(config.confirmation_timeout_secs);
        let poll_interval = Duration::from_millis(config.receipt_poll_interval_ms.max(1));

        let result = timeout(deadline, async {
            let mut ticker = interval(poll_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;

                let receipt = self.client.get_transaction_receipt(tx_hash).await?;
                match confirmation_status(receipt.as_ref()) {
                    ConfirmationStatus::Pending => {
                        tracing::debug!(tx_hash = %tx_hash, "Transaction pending");
                    }
                    ConfirmationStatus::Reverted => {
                        return Err(BlockchainError::Reverted(tx_hash));
                    }
                    ConfirmationStatus::Confirmed { block_number } => {
                        let logs = receipt
                            .map(|r| r.inner.logs().iter().map(|log| log.inner.clone()).collect())
                            .unwrap_or_default();
                        return Ok(TxOutcome {
                            tx_hash,
                            block_number,
                            logs,
                        });
                    }
                }
            }
        })
        .await;

        match result {
            Ok(outcome) => outcome,
            Err(_) => Err(BlockchainError::ConfirmationTimeout {
                tx_hash,
                waited_secs: config.confirmation_timeout_secs,
            }),
        }
    }

    /// Get the wallet address.
    pub fn address(&self) -> Address {
        self.wallet.address()
    }
}

fn confirmation_status(receipt: Option<&TransactionReceipt>) -> ConfirmationStatus {
    match receipt {
        None => ConfirmationStatus::Pending,
        Some(r) if !r.status() => ConfirmationStatus::Reverted,
        Some(r) => ConfirmationStatus::Confirmed {
            block_number: r.block_number,
        },
    }
}
