//! Action error taxonomy.

use thiserror::Error;

use crate::blockchain::BlockchainError;

/// Coarse error class callers branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad or missing parameter. No network call was made.
    Validation,
    /// Remote state forbids the operation.
    Precondition,
    /// RPC, contract or balance failure.
    Remote,
    /// Transaction receipt not observed before the deadline.
    Timeout,
    /// No action with the requested name.
    UnknownAction,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Precondition => "precondition",
            Self::Remote => "remote",
            Self::Timeout => "timeout",
            Self::UnknownAction => "unknown_action",
        }
    }
}

/// Failure of a single action invocation.
///
/// `Display` is the exact message placed under `error` in the flat result.
#[derive(Debug, Error)]
pub enum ActionError {
    #[error("{0} is required")]
    MissingParam(&'static str),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Precondition(String),

    #[error("Provider not registered or inactive")]
    ProviderInactive,

    #[error("Insufficient USDC balance. Have: {have}, Need: {need}")]
    InsufficientBalance { have: f64, need: f64 },

    #[error("Unknown action: {0}")]
    UnknownAction(String),

    #[error(transparent)]
    Remote(#[from] BlockchainError),
}

impl ActionError {
    pub fn invalid_address(input: &str) -> Self {
        Self::Validation(format!("Invalid address: {}", input))
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingParam(_) | Self::Validation(_) => ErrorKind::Validation,
            Self::Precondition(_) | Self::ProviderInactive => ErrorKind::Precondition,
            Self::InsufficientBalance { .. } => ErrorKind::Remote,
            Self::UnknownAction(_) => ErrorKind::UnknownAction,
            Self::Remote(BlockchainError::ConfirmationTimeout { .. }) => ErrorKind::Timeout,
            Self::Remote(_) => ErrorKind::Remote,
        }
    }
}
