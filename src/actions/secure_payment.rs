//! `secure_payment`: fund a payment through the escrow vault.
//!
//! Balance check, exact-amount approval when the allowance is short, then
//! `createPayment`. The payment id comes from the `PaymentCreated` log.

use alloy::primitives::{Address, U256};
use serde::Serialize;

use crate::actions::error::ActionError;
use crate::actions::params::{self, Params};
use crate::blockchain::{checksum_string, content_hash};
use crate::contracts::{find_payment_created, from_units, to_units, Contracts, EventLookup, Identifier};

/// Smallest accepted payment, in whole tokens.
pub const MIN_PAYMENT_USDC: f64 = 1.0;

/// Timeout reported when the receipt does not carry one.
pub const DEFAULT_TIMEOUT_SECS: u64 = 900;

#[derive(Debug, Clone, PartialEq)]
pub struct SecurePaymentRequest {
    pub provider: Address,
    pub amount_usdc: f64,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SecurePaymentResponse {
    pub payment_id: Identifier,
    pub escrow_used: bool,
    pub timeout_minutes: u64,
    pub transaction_hash: String,
    pub amount_usdc: f64,
    pub provider: String,
}

impl SecurePaymentRequest {
    pub fn from_params(params: &Params) -> Result<Self, ActionError> {
        let provider = params::required_str(params, "provider_address")?;
        let amount_usdc = params::required_amount(params, "amount_usdc")?;
        let description = params::required_str(params, "request_description")?;

        let provider = params::parse_address(&provider)?;
        if amount_usdc < MIN_PAYMENT_USDC {
            return Err(ActionError::Validation("Minimum payment is 1 USDC".to_string()));
        }

        Ok(Self {
            provider,
            amount_usdc,
            description,
        })
    }

    /// Amount in smallest token units.
    pub fn units(&self) -> Result<U256, ActionError> {
        to_units(self.amount_usdc)
            .ok_or_else(|| ActionError::Validation("amount_usdc must be a number".to_string()))
    }

    pub async fn execute(&self, contracts: &Contracts) -> Result<SecurePaymentResponse, ActionError> {
        let buyer = contracts.sender()?;
        let units = self.units()?;
        let request_hash = content_hash(&self.description);

        let balance = contracts.token.balance_of(buyer).await?;
        if balance < units {
            return Err(ActionError::InsufficientBalance {
                have: from_units(balance),
                need: self.amount_usdc,
            });
        }

        let vault = contracts.escrow.address();
        let allowance = contracts.token.allowance(buyer, vault).await?;
        if allowance < units {
            tracing::info!(
                spender = %vault,
                allowance = %allowance,
                amount = %units,
                "Approving payment token"
            );
            contracts.token.approve(vault, units).await?;
        }

        let outcome = contracts
            .escrow
            .create_payment(self.provider, units, request_hash)
            .await?;

        let (payment_id, escrow_used, timeout_secs) = match find_payment_created(&outcome) {
            EventLookup::Found(event) => (
                Identifier::Event(event.payment_id),
                event.escrow_used.unwrap_or(true),
                event.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
            ),
            EventLookup::Degraded { tx_hash } => (Identifier::Degraded(tx_hash), true, DEFAULT_TIMEOUT_SECS),
        };

        tracing::info!(
            payment_id = %payment_id,
            provider = %self.provider,
            amount = %units,
            escrow_used,
            "Payment created"
        );

        Ok(SecurePaymentResponse {
            payment_id,
            escrow_used,
            timeout_minutes: timeout_secs / 60,
            transaction_hash: outcome.tx_hash.to_string(),
            amount_usdc: self.amount_usdc,
            provider: checksum_string(&self.provider),
        })
    }
}
