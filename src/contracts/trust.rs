//! Trust score reader binding.

use alloy::primitives::{Address, U256};
use std::fmt;
use std::sync::Arc;

use crate::blockchain::{BlockchainError, BlockchainResult, ChainAccess};
use crate::contracts::abi::ITrustProtocol;
use crate::contracts::read;

/// Trust bucket assigned by the remote contract from a provider's score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrustTier {
    None,
    Newcomer,
    Fair,
    Verified,
    Good,
    Excellent,
    Elite,
    /// A code this client does not know.
    Unknown(u8),
}

impl TrustTier {
    pub fn from_code(code: u8) -> Self {
        match code {
            0 => Self::None,
            1 => Self::Newcomer,
            2 => Self::Fair,
            3 => Self::Verified,
            4 => Self::Good,
            5 => Self::Excellent,
            6 => Self::Elite,
            other => Self::Unknown(other),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Newcomer => "Newcomer",
            Self::Fair => "Fair",
            Self::Verified => "Verified",
            Self::Good => "Good",
            Self::Excellent => "Excellent",
            Self::Elite => "Elite",
            Self::Unknown(_) => "Unknown",
        }
    }
}

impl fmt::Display for TrustTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Result of `getProviderInfo`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderInfo {
    pub score: U256,
    pub tier: TrustTier,
    /// Recommended payment timeout in seconds.
    pub timeout_secs: U256,
    pub is_active: bool,
}

/// Result of `compareProviders`, index-aligned with the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderComparison {
    pub scores: Vec<U256>,
    pub timeouts: Vec<U256>,
}

/// Read-only binding to the trust protocol contract.
#[derive(Clone)]
pub struct TrustReader {
    chain: Arc<dyn ChainAccess>,
    address: Address,
}

impl TrustReader {
    pub fn new(chain: Arc<dyn ChainAccess>, address: Address) -> Self {
        Self { chain, address }
    }

    pub async fn provider_info(&self, provider: Address) -> BlockchainResult<ProviderInfo> {
        let info = read(
            self.chain.as_ref(),
            self.address,
            ITrustProtocol::getProviderInfoCall { provider },
        )
        .await?;

        let info = ProviderInfo {
            score: info.score,
            tier: TrustTier::from_code(info.tier),
            timeout_secs: info.timeout,
            is_active: info.isActive,
        };
        tracing::debug!(
            provider = %provider,
            score = %info.score,
            tier = %info.tier,
            active = info.is_active,
            "Provider info"
        );
        Ok(info)
    }

    /// Tier name as reported by the contract.
    pub async fn trust_tier(&self, provider: Address) -> BlockchainResult<String> {
        read(
            self.chain.as_ref(),
            self.address,
            ITrustProtocol::getTrustTierCall { provider },
        )
        .await
    }

    pub async fn needs_escrow(&self, provider: Address) -> BlockchainResult<bool> {
        read(
            self.chain.as_ref(),
            self.address,
            ITrustProtocol::needsEscrowCall { provider },
        )
        .await
    }

    /// Batch score and timeout lookup.
    pub async fn compare_providers(&self, providers: &[Address]) -> BlockchainResult<ProviderComparison> {
        let result = read(
            self.chain.as_ref(),
            self.address,
            ITrustProtocol::compareProvidersCall {
                providers: providers.to_vec(),
            },
        )
        .await?;

        if result.scores.len() != providers.len() || result.timeouts.len() != providers.len() {
            return Err(BlockchainError::Contract(format!(
                "compareProviders returned {} scores and {} timeouts for {} providers",
                result.scores.len(),
                result.timeouts.len(),
                providers.len()
            )));
        }

        Ok(ProviderComparison {
            scores: result.scores,
            timeouts: result.timeouts,
        })
    }
}
