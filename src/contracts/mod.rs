//! Typed bindings for the remote trust, escrow and token contracts.
//!
//! # Data Flow
//! ```text
//! action handler
//!     → trust.rs / escrow.rs / token.rs (encode call with the sol! ABI)
//!     → ChainAccess::call | ChainAccess::submit
//!     → decode return tuple | events.rs (decode receipt logs)
//!     → typed records back to the handler
//! ```
//!
//! Addresses come from configuration; nothing is discovered on-chain.

pub mod abi;
pub mod escrow;
pub mod events;
pub mod token;
pub mod trust;

use alloy::primitives::{Address, Bytes};
use alloy::sol_types::SolCall;
use std::sync::Arc;

use crate::blockchain::{to_checksummed, BlockchainError, BlockchainResult, ChainAccess, TxOutcome};
use crate::config::ContractsConfig;

pub use escrow::{Attestation, DeliveryProof, EscrowVault, PaymentRecord, PaymentStatus};
pub use events::{
    find_dispute_raised, find_event, find_payment_created, DisputeRaisedRecord, EventLookup, Identifier,
    PaymentCreatedRecord, ReceiptEvent,
};
pub use token::{from_units, to_units, TokenContract, UNITS_PER_TOKEN};
pub use trust::{ProviderComparison, ProviderInfo, TrustReader, TrustTier};

/// The three contract bindings an action works with.
#[derive(Clone)]
pub struct Contracts {
    pub trust: TrustReader,
    pub escrow: EscrowVault,
    pub token: TokenContract,
    chain: Arc<dyn ChainAccess>,
}

impl Contracts {
    /// Bind the configured addresses to a chain connection.
    pub fn bind(config: &ContractsConfig, chain: Arc<dyn ChainAccess>) -> BlockchainResult<Self> {
        let trust = parse_address("trust_protocol", &config.trust_protocol)?;
        let escrow = parse_address("escrow_vault", &config.escrow_vault)?;
        let token = parse_address("usdc", &config.usdc)?;

        Ok(Self {
            trust: TrustReader::new(chain.clone(), trust),
            escrow: EscrowVault::new(chain.clone(), escrow),
            token: TokenContract::new(chain.clone(), token),
            chain,
        })
    }

    /// Address signed transactions come from.
    pub fn sender(&self) -> BlockchainResult<Address> {
        self.chain.sender()
    }
}

fn parse_address(name: &str, value: &str) -> BlockchainResult<Address> {
    to_checksummed(value)
        .ok_or_else(|| BlockchainError::Config(format!("Invalid {} address: {}", name, value)))
}

/// Read-only call: encode, call, decode.
pub(crate) async fn read<C>(chain: &dyn ChainAccess, to: Address, call: C) -> BlockchainResult<C::Return>
where
    C: SolCall + Send,
{
    let input: Bytes = call.abi_encode().into();
    let output = chain.call(to, input).await?;
    C::abi_decode_returns(&output).map_err(|e| BlockchainError::Decode {
        method: C::SIGNATURE,
        reason: e.to_string(),
    })
}

/// State-changing call: encode, submit, wait for the receipt.
pub(crate) async fn write<C>(chain: &dyn ChainAccess, to: Address, call: C) -> BlockchainResult<TxOutcome>
where
    C: SolCall + Send,
{
    let input: Bytes = call.abi_encode().into();
    chain.submit(C::SIGNATURE, to, input).await
}
