//! Skill actions.
//!
//! # Data Flow
//! ```text
//! flat parameter map
//!     → <action>::from_params (validation, no network)
//!     → TrustSkill::contracts (connection + bindings from config)
//!     → <action>::execute (reads, at most two signed submissions)
//!     → ActionOutput | ActionError
//!     → response_map (flat result map, `error` on failure)
//! ```
//!
//! Every failure is terminal for the invocation. Nothing is retried.

pub mod advisory;
pub mod check_provider;
pub mod compare_providers;
pub mod confirm_delivery;
pub mod error;
pub mod params;
pub mod raise_dispute;
pub mod secure_payment;

use alloy::primitives::U256;
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Instant;
use tracing::Instrument;
use uuid::Uuid;

use crate::blockchain::{checksum_string, ChainAccess, Connection, Signing, SubmitLock};
use crate::config::TrustConfig;
use crate::contracts::Contracts;
use crate::observability::metrics;

pub use check_provider::{CheckProviderRequest, CheckProviderResponse};
pub use compare_providers::{CompareProvidersRequest, CompareProvidersResponse, ComparisonEntry};
pub use confirm_delivery::{ConfirmDeliveryRequest, ConfirmDeliveryResponse};
pub use error::{ActionError, ErrorKind};
pub use params::Params;
pub use raise_dispute::{RaiseDisputeRequest, RaiseDisputeResponse};
pub use secure_payment::{SecurePaymentRequest, SecurePaymentResponse};

pub(crate) fn saturating_u64(value: U256) -> u64 {
    u64::try_from(value).unwrap_or(u64::MAX)
}

/// The five skill actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    CheckProvider,
    CompareProviders,
    SecurePayment,
    ConfirmDelivery,
    RaiseDispute,
}

impl Action {
    pub const ALL: [Action; 5] = [
        Action::CheckProvider,
        Action::CompareProviders,
        Action::SecurePayment,
        Action::ConfirmDelivery,
        Action::RaiseDispute,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::CheckProvider => "check_provider",
            Self::CompareProviders => "compare_providers",
            Self::SecurePayment => "secure_payment",
            Self::ConfirmDelivery => "confirm_delivery",
            Self::RaiseDispute => "raise_dispute",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::CheckProvider => "Check a provider's trust score and get a recommendation before paying",
            Self::CompareProviders => "Compare 2 to 10 providers and recommend the most trusted",
            Self::SecurePayment => "Make a USDC payment with trust-based escrow protection",
            Self::ConfirmDelivery => "Confirm successful delivery and release the escrowed payment",
            Self::RaiseDispute => "Dispute a failed or incorrect delivery",
        }
    }

    pub fn required_params(&self) -> &'static [&'static str] {
        match self {
            Self::CheckProvider => &["provider_address"],
            Self::CompareProviders => &["provider_addresses"],
            Self::SecurePayment => &["provider_address", "amount_usdc", "request_description"],
            Self::ConfirmDelivery => &["payment_id", "response_data"],
            Self::RaiseDispute => &["payment_id", "reason"],
        }
    }

    /// Whether the action submits transactions and needs the signing key.
    pub fn requires_signer(&self) -> bool {
        matches!(
            self,
            Self::SecurePayment | Self::ConfirmDelivery | Self::RaiseDispute
        )
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Action {
    type Err = ActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|a| a.name() == s)
            .ok_or_else(|| ActionError::UnknownAction(s.to_string()))
    }
}

/// Successful result of any action.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ActionOutput {
    CheckProvider(CheckProviderResponse),
    CompareProviders(CompareProvidersResponse),
    SecurePayment(SecurePaymentResponse),
    ConfirmDelivery(ConfirmDeliveryResponse),
    RaiseDispute(RaiseDisputeResponse),
}

/// Catalogue entry for one action.
#[derive(Debug, Clone, Serialize)]
pub struct ActionInfo {
    pub name: &'static str,
    pub description: &'static str,
    pub required_params: &'static [&'static str],
    pub signs_transactions: bool,
}

impl From<Action> for ActionInfo {
    fn from(action: Action) -> Self {
        Self {
            name: action.name(),
            description: action.description(),
            required_params: action.required_params(),
            signs_transactions: action.requires_signer(),
        }
    }
}

/// Chain reachability as seen by the skill.
#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub healthy: bool,
    pub rpc_url: String,
    pub configured_chain_id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_number: Option<u64>,
    /// Signing address, when a key is configured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Entry point for invoking actions.
///
/// Holds configuration and the submission lock shared by every signing
/// connection it opens. Connections themselves are per invocation.
#[derive(Clone)]
pub struct TrustSkill {
    config: Arc<TrustConfig>,
    chain: Option<Arc<dyn ChainAccess>>,
    submit_lock: SubmitLock,
}

impl TrustSkill {
    pub fn new(config: Arc<TrustConfig>) -> Self {
        Self {
            config,
            chain: None,
            submit_lock: SubmitLock::default(),
        }
    }

    /// Use `chain` for every invocation instead of opening RPC connections.
    pub fn with_chain(config: Arc<TrustConfig>, chain: Arc<dyn ChainAccess>) -> Self {
        Self {
            config,
            chain: Some(chain),
            submit_lock: SubmitLock::default(),
        }
    }

    pub fn config(&self) -> &TrustConfig {
        &self.config
    }

    fn chain(&self, signing: Signing) -> Result<Arc<dyn ChainAccess>, ActionError> {
        match &self.chain {
            Some(chain) => Ok(chain.clone()),
            None => {
                let conn = Connection::open(&self.config, signing, self.submit_lock.clone())?;
                Ok(Arc::new(conn))
            }
        }
    }

    fn contracts(&self, signing: Signing) -> Result<Contracts, ActionError> {
        let chain = self.chain(signing)?;
        Ok(Contracts::bind(&self.config.contracts, chain)?)
    }

    /// Run one action inside an invocation span.
    pub async fn dispatch(&self, action: Action, params: &Params) -> Result<ActionOutput, ActionError> {
        let span = tracing::info_span!(
            "action",
            action = action.name(),
            invocation_id = %Uuid::new_v4()
        );

        async move {
            let start = Instant::now();
            let result = self.execute(action, params).await;

            match &result {
                Ok(_) => {
                    tracing::info!(elapsed_ms = start.elapsed().as_millis() as u64, "Action completed");
                    metrics::record_action(action.name(), "success", start);
                }
                Err(e) => {
                    let kind = e.kind();
                    tracing::warn!(kind = kind.as_str(), error = %e, "Action failed");
                    metrics::record_action(action.name(), kind.as_str(), start);
                }
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn execute(&self, action: Action, params: &Params) -> Result<ActionOutput, ActionError> {
        let signing = if action.requires_signer() {
            Signing::Required
        } else {
            Signing::ReadOnly
        };

        match action {
            Action::CheckProvider => {
                let request = CheckProviderRequest::from_params(params)?;
                let contracts = self.contracts(signing)?;
                request.execute(&contracts).await.map(ActionOutput::CheckProvider)
            }
            Action::CompareProviders => {
                let request = CompareProvidersRequest::from_params(params)?;
                let contracts = self.contracts(signing)?;
                request.execute(&contracts).await.map(ActionOutput::CompareProviders)
            }
            Action::SecurePayment => {
                let request = SecurePaymentRequest::from_params(params)?;
                let contracts = self.contracts(signing)?;
                request.execute(&contracts).await.map(ActionOutput::SecurePayment)
            }
            Action::ConfirmDelivery => {
                let request = ConfirmDeliveryRequest::from_params(params)?;
                let contracts = self.contracts(signing)?;
                request.execute(&contracts).await.map(ActionOutput::ConfirmDelivery)
            }
            Action::RaiseDispute => {
                let request = RaiseDisputeRequest::from_params(params)?;
                let contracts = self.contracts(signing)?;
                request.execute(&contracts).await.map(ActionOutput::RaiseDispute)
            }
        }
    }

    /// Run an action by name and return the flat result map.
    pub async fn run(&self, action: &str, params: &Params) -> Map<String, Value> {
        match action.parse::<Action>() {
            Ok(action) => response_map(action, self.dispatch(action, params).await),
            Err(e) => error_map(None, &e),
        }
    }

    /// Query the RPC endpoint without touching any contract.
    pub async fn health(&self) -> HealthReport {
        let mut report = HealthReport {
            healthy: false,
            rpc_url: self.config.blockchain.rpc_url.clone(),
            configured_chain_id: self.config.blockchain.chain_id,
            chain_id: None,
            block_number: None,
            signer: None,
            error: None,
        };

        let chain = match self.chain(Signing::ReadOnly) {
            Ok(chain) => chain,
            Err(e) => {
                report.error = Some(e.to_string());
                return report;
            }
        };
        report.signer = chain.sender().ok().map(|a| checksum_string(&a));

        let check = async {
            let chain_id = chain.chain_id().await?;
            let block_number = chain.block_number().await?;
            Ok::<_, crate::blockchain::BlockchainError>((chain_id, block_number))
        };

        match check.await {
            Ok((chain_id, block_number)) => {
                report.chain_id = Some(chain_id);
                report.block_number = Some(block_number);
                if chain_id == report.configured_chain_id {
                    report.healthy = true;
                } else {
                    report.error = Some(format!(
                        "Chain ID mismatch: expected {}, got {}",
                        report.configured_chain_id, chain_id
                    ));
                }
            }
            Err(e) => report.error = Some(e.to_string()),
        }
        report
    }
}

/// Flatten an action result into the caller-facing map.
pub fn response_map(action: Action, result: Result<ActionOutput, ActionError>) -> Map<String, Value> {
    match result {
        Ok(output) => match serde_json::to_value(&output) {
            Ok(Value::Object(map)) => map,
            Ok(other) => {
                let mut map = Map::new();
                map.insert("result".to_string(), other);
                map
            }
            Err(e) => error_map(
                Some(action),
                &ActionError::Validation(format!("Failed to encode result: {}", e)),
            ),
        },
        Err(e) => error_map(Some(action), &e),
    }
}

/// `{error}` plus the per-action extras callers rely on.
pub fn error_map(action: Option<Action>, error: &ActionError) -> Map<String, Value> {
    let mut map = Map::new();
    map.insert("error".to_string(), Value::String(error.to_string()));

    match (action, error) {
        (_, ActionError::ProviderInactive) => {
            map.insert("is_active".to_string(), Value::Bool(false));
        }
        (Some(Action::ConfirmDelivery), ActionError::MissingParam(_) | ActionError::Precondition(_)) => {}
        (Some(Action::ConfirmDelivery), _) => {
            map.insert("success".to_string(), Value::Bool(false));
        }
        _ => {}
    }
    map
}
