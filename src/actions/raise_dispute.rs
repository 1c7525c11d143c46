//! `raise_dispute`: contest a pending payment.
//!
//! The reported track is an advisory estimate from the amount. It is
//! computed after submission and never checked against the contract.

use alloy::primitives::B256;
use serde::Serialize;

use crate::actions::advisory::DisputeTrack;
use crate::actions::error::ActionError;
use crate::actions::params::{self, Params};
use crate::blockchain::content_hash;
use crate::contracts::{find_dispute_raised, from_units, Contracts, EventLookup, Identifier};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RaiseDisputeRequest {
    pub payment_id: B256,
    /// Payment id as supplied, echoed back.
    pub payment_id_input: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RaiseDisputeResponse {
    pub dispute_id: Identifier,
    pub payment_id: String,
    pub track: &'static str,
    pub resolution_hours: u32,
    pub transaction_hash: String,
    pub reason: String,
    pub amount_disputed: f64,
}

impl RaiseDisputeRequest {
    pub fn from_params(params: &Params) -> Result<Self, ActionError> {
        let payment_id_input = params::required_str(params, "payment_id")?;
        let reason = params::required_str(params, "reason")?;
        Ok(Self {
            payment_id: params::parse_payment_id(&payment_id_input)?,
            payment_id_input,
            reason,
        })
    }

    pub async fn execute(&self, contracts: &Contracts) -> Result<RaiseDisputeResponse, ActionError> {
        let caller = contracts.sender()?;
        let payment = contracts.escrow.get_payment(self.payment_id).await?;

        if !payment.status.is_pending() {
            return Err(ActionError::Precondition(format!(
                "Cannot dispute. Payment status: {}",
                payment.status
            )));
        }
        if payment.buyer != caller {
            return Err(ActionError::Precondition("Only buyer can raise dispute".to_string()));
        }

        let evidence = content_hash(&self.reason);
        let outcome = contracts.escrow.raise_dispute(self.payment_id, evidence).await?;

        let track = DisputeTrack::from_amount(payment.amount);
        let dispute_id = match find_dispute_raised(&outcome) {
            EventLookup::Found(event) => Identifier::Event(event.dispute_id),
            EventLookup::Degraded { tx_hash } => Identifier::Degraded(tx_hash),
        };

        tracing::info!(
            payment_id = %self.payment_id,
            dispute_id = %dispute_id,
            track = track.name(),
            "Dispute raised"
        );

        Ok(RaiseDisputeResponse {
            dispute_id,
            payment_id: self.payment_id_input.clone(),
            track: track.name(),
            resolution_hours: track.resolution_hours(),
            transaction_hash: outcome.tx_hash.to_string(),
            reason: self.reason.clone(),
            amount_disputed: from_units(payment.amount),
        })
    }
}
