//! Display-only classifications derived locally from remote values.
//!
//! None of these are authoritative. The contracts apply their own
//! thresholds and nothing here is sent on-chain.

use alloy::primitives::U256;

const ELITE: u64 = 850;
const EXCELLENT: u64 = 700;
const GOOD: u64 = 500;
const FAIR: u64 = 400;

/// Recommendation text for a trust score.
pub fn recommendation(score: U256) -> &'static str {
    if score >= U256::from(ELITE) {
        "Highly recommended - Elite provider with excellent track record"
    } else if score >= U256::from(EXCELLENT) {
        "Recommended - Excellent provider, low risk"
    } else if score >= U256::from(GOOD) {
        "Acceptable - Good provider, use with escrow protection"
    } else if score >= U256::from(FAIR) {
        "Caution - Fair provider, escrow strongly recommended"
    } else {
        "Not recommended - Poor track record, high risk"
    }
}

/// Summary line for a provider comparison. `preview` is the shortened
/// address of the best provider.
pub fn comparison_reasoning(preview: &str, score: U256) -> String {
    if score >= U256::from(ELITE) {
        format!("Provider {}... is Elite tier with score {}. Highly recommended.", preview, score)
    } else if score >= U256::from(EXCELLENT) {
        format!(
            "Provider {}... has Excellent rating ({}). Good choice for most payments.",
            preview, score
        )
    } else if score >= U256::from(GOOD) {
        format!(
            "Provider {}... has Good rating ({}). Use with escrow protection.",
            preview, score
        )
    } else if score >= U256::from(FAIR) {
        format!(
            "Provider {}... has Fair rating ({}). Escrow strongly recommended.",
            preview, score
        )
    } else {
        format!(
            "All providers have low scores. Best available is {}... with score {}. Proceed with caution.",
            preview, score
        )
    }
}

/// Expected dispute resolution bucket, estimated from the payment amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisputeTrack {
    FastTrack,
    Standard,
    Complex,
}

impl DisputeTrack {
    /// Below 100 tokens.
    const FAST_TRACK_BELOW: u64 = 100_000_000;
    /// 1000 tokens and above.
    const COMPLEX_FROM: u64 = 1_000_000_000;

    /// Classify by amount in smallest token units.
    pub fn from_amount(amount: U256) -> Self {
        if amount < U256::from(Self::FAST_TRACK_BELOW) {
            Self::FastTrack
        } else if amount >= U256::from(Self::COMPLEX_FROM) {
            Self::Complex
        } else {
            Self::Standard
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::FastTrack => "FastTrack",
            Self::Standard => "Standard",
            Self::Complex => "Complex",
        }
    }

    pub fn resolution_hours(&self) -> u32 {
        match self {
            Self::FastTrack => 60,
            Self::Standard => 120,
            Self::Complex => 192,
        }
    }
}
