//! `compare_providers`: rank 2 to 10 providers by trust score.

use alloy::primitives::{Address, U256};
use serde::Serialize;

use crate::actions::advisory::{comparison_reasoning, recommendation};
use crate::actions::error::ActionError;
use crate::actions::params::{self, Params};
use crate::actions::saturating_u64;
use crate::blockchain::checksum_string;
use crate::contracts::Contracts;

pub const MIN_PROVIDERS: usize = 2;
pub const MAX_PROVIDERS: usize = 10;

/// Characters of the best provider's address shown in the reasoning.
const PREVIEW_LEN: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompareProvidersRequest {
    pub providers: Vec<Address>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonEntry {
    pub address: String,
    pub score: u64,
    pub tier: String,
    pub timeout_minutes: u64,
    pub escrow_required: bool,
    pub recommendation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompareProvidersResponse {
    /// Sorted by score, highest first. Ties keep input order.
    pub comparison: Vec<ComparisonEntry>,
    pub recommended: String,
    pub reasoning: String,
    pub total_providers: usize,
}

impl CompareProvidersRequest {
    pub fn from_params(params: &Params) -> Result<Self, ActionError> {
        let raw = params::required_list(params, "provider_addresses")?;

        if raw.len() < MIN_PROVIDERS {
            return Err(ActionError::Validation(
                "At least 2 provider addresses required for comparison".to_string(),
            ));
        }
        if raw.len() > MAX_PROVIDERS {
            return Err(ActionError::Validation(
                "Maximum 10 providers can be compared at once".to_string(),
            ));
        }

        let providers = raw
            .iter()
            .map(|a| params::parse_address(a))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { providers })
    }

    pub async fn execute(&self, contracts: &Contracts) -> Result<CompareProvidersResponse, ActionError> {
        let batch = contracts.trust.compare_providers(&self.providers).await?;

        let mut entries = Vec::with_capacity(self.providers.len());
        let mut best = 0;
        for (i, provider) in self.providers.iter().enumerate() {
            let score = batch.scores[i];
            let tier = contracts.trust.trust_tier(*provider).await?;
            let escrow_required = contracts.trust.needs_escrow(*provider).await?;

            entries.push((
                score,
                ComparisonEntry {
                    address: checksum_string(provider),
                    score: saturating_u64(score),
                    tier,
                    timeout_minutes: saturating_u64(batch.timeouts[i]) / 60,
                    escrow_required,
                    recommendation: recommendation(score).to_string(),
                },
            ));

            if score > batch.scores[best] {
                best = i;
            }
        }

        let best_score: U256 = batch.scores[best];
        let recommended = checksum_string(&self.providers[best]);
        let preview: String = recommended.chars().take(PREVIEW_LEN).collect();
        let reasoning = comparison_reasoning(&preview, best_score);

        // Stable: equal scores keep input order.
        entries.sort_by(|a, b| b.0.cmp(&a.0));
        let comparison: Vec<ComparisonEntry> = entries.into_iter().map(|(_, entry)| entry).collect();

        tracing::debug!(
            providers = comparison.len(),
            recommended = %recommended,
            best_score = %best_score,
            "Providers compared"
        );

        Ok(CompareProvidersResponse {
            total_providers: comparison.len(),
            comparison,
            recommended,
            reasoning,
        })
    }
}
