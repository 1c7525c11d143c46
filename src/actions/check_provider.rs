//! `check_provider`: trust score, tier and escrow requirement of one provider.

use alloy::primitives::Address;
use serde::Serialize;

use crate::actions::advisory::recommendation;
use crate::actions::error::ActionError;
use crate::actions::params::{self, Params};
use crate::actions::saturating_u64;
use crate::blockchain::checksum_string;
use crate::contracts::Contracts;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckProviderRequest {
    pub provider: Address,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckProviderResponse {
    pub provider: String,
    pub score: u64,
    /// Tier name as reported by the contract.
    pub tier: String,
    pub escrow_required: bool,
    /// Minutes.
    pub recommended_timeout: u64,
    pub recommendation: String,
    pub is_active: bool,
}

impl CheckProviderRequest {
    pub fn from_params(params: &Params) -> Result<Self, ActionError> {
        let raw = params::required_str(params, "provider_address")?;
        Ok(Self {
            provider: params::parse_address(&raw)?,
        })
    }

    pub async fn execute(&self, contracts: &Contracts) -> Result<CheckProviderResponse, ActionError> {
        let info = contracts.trust.provider_info(self.provider).await?;
        if !info.is_active {
            return Err(ActionError::ProviderInactive);
        }

        let tier = contracts.trust.trust_tier(self.provider).await?;
        let escrow_required = contracts.trust.needs_escrow(self.provider).await?;

        Ok(CheckProviderResponse {
            provider: checksum_string(&self.provider),
            score: saturating_u64(info.score),
            tier,
            escrow_required,
            recommended_timeout: saturating_u64(info.timeout_secs) / 60,
            recommendation: recommendation(info.score).to_string(),
            is_active: true,
        })
    }
}
