//! Typed decoding of escrow events from receipt logs.
//!
//! A lookup either finds the event ([`EventLookup::Found`]) or falls back to
//! the transaction hash ([`EventLookup::Degraded`]). The fallback is a
//! successful outcome, not an error.

use alloy::primitives::{Log, TxHash, B256, U256};
use alloy::sol_types::SolEvent;
use serde::{Serialize, Serializer};
use std::fmt;

use crate::blockchain::TxOutcome;
use crate::contracts::abi::IEscrowVault;

/// Identifier reported to callers: an id from an event, or the
/// transaction hash when no event was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Identifier {
    Event(B256),
    Degraded(TxHash),
}

impl Identifier {
    pub fn as_b256(&self) -> B256 {
        match self {
            Self::Event(id) => *id,
            Self::Degraded(hash) => *hash,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::Degraded(_))
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_b256())
    }
}

impl Serialize for Identifier {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Outcome of scanning a receipt for one event type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventLookup<T> {
    Found(T),
    Degraded { tx_hash: TxHash },
}

/// An event record recoverable from a single log.
pub trait ReceiptEvent: Sized {
    /// Event signature hash (topic0).
    const TOPIC: B256;
    /// Name used in log output.
    const NAME: &'static str;

    /// Decode a log whose topic0 already matched.
    ///
    /// Returns `None` when not even the identifier can be recovered.
    fn from_log(log: &Log) -> Option<Self>;
}

/// `PaymentCreated` fields the actions report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentCreatedRecord {
    pub payment_id: B256,
    /// `None` when the payload did not decode.
    pub escrow_used: Option<bool>,
    pub timeout_secs: Option<u64>,
}

impl ReceiptEvent for PaymentCreatedRecord {
    const TOPIC: B256 = IEscrowVault::PaymentCreated::SIGNATURE_HASH;
    const NAME: &'static str = "PaymentCreated";

    fn from_log(log: &Log) -> Option<Self> {
        match IEscrowVault::PaymentCreated::decode_log_data(&log.data) {
            Ok(event) => Some(Self {
                payment_id: event.paymentId,
                escrow_used: Some(event.useEscrow),
                timeout_secs: Some(u64::try_from(event.timeout).unwrap_or(u64::MAX)),
            }),
            Err(e) => {
                tracing::debug!(error = %e, "PaymentCreated payload did not decode");
                // Data words: amount, useEscrow, timeout.
                let word = |i: usize| {
                    log.data
                        .data
                        .get(i * 32..(i + 1) * 32)
                        .map(U256::from_be_slice)
                };
                log.topics().get(1).map(|id| Self {
                    payment_id: *id,
                    escrow_used: word(1).map(|w| w == U256::from(1)),
                    timeout_secs: word(2).map(|w| u64::try_from(w).unwrap_or(u64::MAX)),
                })
            }
        }
    }
}

/// `DisputeRaised` fields the actions report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisputeRaisedRecord {
    pub payment_id: Option<B256>,
    pub dispute_id: B256,
}

impl ReceiptEvent for DisputeRaisedRecord {
    const TOPIC: B256 = IEscrowVault::DisputeRaised::SIGNATURE_HASH;
    const NAME: &'static str = "DisputeRaised";

    fn from_log(log: &Log) -> Option<Self> {
        if let Ok(event) = IEscrowVault::DisputeRaised::decode_log_data(&log.data) {
            return Some(Self {
                payment_id: Some(event.paymentId),
                dispute_id: event.disputeId,
            });
        }

        // Non-indexed dispute id: first data word.
        let topics = log.topics();
        let dispute_id = match topics.get(2) {
            Some(id) => *id,
            None if topics.len() == 2 && log.data.data.len() >= 32 => B256::from_slice(&log.data.data[..32]),
            None => return None,
        };
        Some(Self {
            payment_id: topics.get(1).copied(),
            dispute_id,
        })
    }
}

/// Find the first log carrying event `E` in a transaction outcome.
pub fn find_event<E: ReceiptEvent>(outcome: &TxOutcome) -> EventLookup<E> {
    let found = outcome
        .logs
        .iter()
        .filter(|log| log.topics().first() == Some(&E::TOPIC))
        .find_map(E::from_log);

    match found {
        Some(record) => EventLookup::Found(record),
        None => {
            tracing::warn!(
                event = E::NAME,
                tx_hash = %outcome.tx_hash,
                logs = outcome.logs.len(),
                "Event not found in receipt, using transaction hash"
            );
            EventLookup::Degraded {
                tx_hash: outcome.tx_hash,
            }
        }
    }
}

/// Payment id, escrow flag and timeout from a `createPayment` receipt.
pub fn find_payment_created(outcome: &TxOutcome) -> EventLookup<PaymentCreatedRecord> {
    find_event(outcome)
}

/// Dispute id from a `raiseDispute` receipt.
pub fn find_dispute_raised(outcome: &TxOutcome) -> EventLookup<DisputeRaisedRecord> {
    find_event(outcome)
}
