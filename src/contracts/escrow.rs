//! Escrow vault binding.

use alloy::primitives::{Address, Bytes, B256, U256};
use std::fmt;
use std::sync::Arc;

use crate::blockchain::{BlockchainResult, ChainAccess, TxOutcome};
use crate::contracts::abi::IEscrowVault;
use crate::contracts::{read, write};

/// Length of the signature slot in a delivery proof.
const SIGNATURE_LEN: usize = 65;

/// Payment lifecycle stage as stored by the vault.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentStatus {
    None,
    Pending,
    Completed,
    Refunded,
    Disputed,
    Stuck,
    Unknown(u8),
}

impl PaymentStatus {
    pub fn from_code(code: u8) -> Self {
        match code {
            0 => Self::None,
            1 => Self::Pending,
            2 => Self::Completed,
            3 => Self::Refunded,
            4 => Self::Disputed,
            5 => Self::Stuck,
            other => Self::Unknown(other),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Pending => "Pending",
            Self::Completed => "Completed",
            Self::Refunded => "Refunded",
            Self::Disputed => "Disputed",
            Self::Stuck => "Stuck",
            Self::Unknown(_) => "Unknown",
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Payment record returned by `getPayment`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentRecord {
    pub buyer: Address,
    pub provider: Address,
    /// Smallest token units.
    pub amount: U256,
    pub request_hash: B256,
    pub created_at: U256,
    pub timeout_secs: U256,
    pub delivery_block: U256,
    pub status: PaymentStatus,
    pub use_escrow: bool,
}

impl From<IEscrowVault::Payment> for PaymentRecord {
    fn from(p: IEscrowVault::Payment) -> Self {
        Self {
            buyer: p.buyer,
            provider: p.provider,
            amount: p.amount,
            request_hash: p.requestHash,
            created_at: p.createdAt,
            timeout_secs: p.timeout,
            delivery_block: p.deliveryBlock,
            status: PaymentStatus::from_code(p.status),
            use_escrow: p.useEscrow,
        }
    }
}

/// Attestation attached to a delivery proof.
///
/// Only `Disabled` exists: the schema hash is zero and the signature is 65
/// zero bytes. Neither is verified by anyone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Attestation {
    #[default]
    Disabled,
}

/// Proof submitted to close a pending payment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryProof {
    pub request_hash: B256,
    pub response_hash: B256,
    pub response_size: U256,
    pub attestation: Attestation,
}

impl DeliveryProof {
    pub fn new(request_hash: B256, response_hash: B256, response_size: usize) -> Self {
        Self {
            request_hash,
            response_hash,
            response_size: U256::from(response_size),
            attestation: Attestation::Disabled,
        }
    }

    fn to_abi(&self) -> IEscrowVault::DeliveryProof {
        let (schema_hash, signature) = match self.attestation {
            Attestation::Disabled => (B256::ZERO, Bytes::from(vec![0u8; SIGNATURE_LEN])),
        };
        IEscrowVault::DeliveryProof {
            requestHash: self.request_hash,
            responseHash: self.response_hash,
            responseSize: self.response_size,
            schemaHash: schema_hash,
            signature,
        }
    }
}

/// Binding to the escrow vault.
#[derive(Clone)]
pub struct EscrowVault {
    chain: Arc<dyn ChainAccess>,
    address: Address,
}

impl EscrowVault {
    pub fn new(chain: Arc<dyn ChainAccess>, address: Address) -> Self {
        Self { chain, address }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub async fn get_payment(&self, payment_id: B256) -> BlockchainResult<PaymentRecord> {
        let payment = read(
            self.chain.as_ref(),
            self.address,
            IEscrowVault::getPaymentCall { paymentId: payment_id },
        )
        .await?;
        let record = PaymentRecord::from(payment);
        tracing::debug!(
            payment_id = %payment_id,
            status = %record.status,
            amount = %record.amount,
            "Payment loaded"
        );
        Ok(record)
    }

    /// Submit `createPayment`. The payment id comes from the receipt logs.
    pub async fn create_payment(
        &self,
        provider: Address,
        amount: U256,
        request_hash: B256,
    ) -> BlockchainResult<TxOutcome> {
        write(
            self.chain.as_ref(),
            self.address,
            IEscrowVault::createPaymentCall {
                provider,
                amount,
                requestHash: request_hash,
            },
        )
        .await
    }

    pub async fn confirm_delivery(&self, payment_id: B256, proof: &DeliveryProof) -> BlockchainResult<TxOutcome> {
        write(
            self.chain.as_ref(),
            self.address,
            IEscrowVault::confirmDeliveryCall {
                paymentId: payment_id,
                proof: proof.to_abi(),
            },
        )
        .await
    }

    pub async fn raise_dispute(&self, payment_id: B256, evidence: B256) -> BlockchainResult<TxOutcome> {
        write(
            self.chain.as_ref(),
            self.address,
            IEscrowVault::raiseDisputeCall {
                paymentId: payment_id,
                evidence,
            },
        )
        .await
    }
}
