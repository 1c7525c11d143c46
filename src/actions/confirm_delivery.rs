//! `confirm_delivery`: close a pending payment and release the escrow.

use alloy::primitives::B256;
use serde::Serialize;

use crate::actions::error::ActionError;
use crate::actions::params::{self, Params};
use crate::actions::saturating_u64;
use crate::blockchain::{checksum_string, content_hash};
use crate::contracts::{from_units, Contracts, DeliveryProof};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmDeliveryRequest {
    pub payment_id: B256,
    pub response_data: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfirmDeliveryResponse {
    pub success: bool,
    pub transaction_hash: String,
    pub provider: String,
    /// Provider score read back after confirmation.
    pub provider_new_score: u64,
    pub amount_released: f64,
}

impl ConfirmDeliveryRequest {
    pub fn from_params(params: &Params) -> Result<Self, ActionError> {
        let payment_id = params::required_str(params, "payment_id")?;
        let response_data = params::required_str(params, "response_data")?;
        Ok(Self {
            payment_id: params::parse_payment_id(&payment_id)?,
            response_data,
        })
    }

    pub async fn execute(&self, contracts: &Contracts) -> Result<ConfirmDeliveryResponse, ActionError> {
        let caller = contracts.sender()?;
        let payment = contracts.escrow.get_payment(self.payment_id).await?;

        if !payment.status.is_pending() {
            return Err(ActionError::Precondition(format!(
                "Payment not pending. Status: {}",
                payment.status
            )));
        }
        if payment.buyer != caller {
            return Err(ActionError::Precondition("Only buyer can confirm delivery".to_string()));
        }

        let proof = DeliveryProof::new(
            payment.request_hash,
            content_hash(&self.response_data),
            self.response_data.chars().count(),
        );
        let outcome = contracts.escrow.confirm_delivery(self.payment_id, &proof).await?;

        let provider_info = contracts.trust.provider_info(payment.provider).await?;

        tracing::info!(
            payment_id = %self.payment_id,
            provider = %payment.provider,
            new_score = %provider_info.score,
            "Delivery confirmed"
        );

        Ok(ConfirmDeliveryResponse {
            success: true,
            transaction_hash: outcome.tx_hash.to_string(),
            provider: checksum_string(&payment.provider),
            provider_new_score: saturating_u64(provider_info.score),
            amount_released: from_units(payment.amount),
        })
    }
}
