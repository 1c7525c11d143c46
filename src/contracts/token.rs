//! Payment token binding and unit conversion.

use alloy::primitives::{Address, U256};
use std::sync::Arc;

use crate::blockchain::{BlockchainResult, ChainAccess, TxOutcome};
use crate::contracts::abi::IERC20;
use crate::contracts::{read, write};

/// Smallest units per whole token (6 decimals).
pub const UNITS_PER_TOKEN: u64 = 1_000_000;

/// Convert a decimal token amount to smallest units, rounding to nearest.
///
/// Returns `None` for negative or non-finite input.
pub fn to_units(amount: f64) -> Option<U256> {
    if !amount.is_finite() || amount < 0.0 {
        return None;
    }
    let units = (amount * UNITS_PER_TOKEN as f64).round();
    if units >= u128::MAX as f64 {
        return None;
    }
    Some(U256::from(units as u128))
}

/// Convert smallest units to a decimal token amount.
pub fn from_units(units: U256) -> f64 {
    let units = u128::try_from(units).unwrap_or(u128::MAX);
    units as f64 / UNITS_PER_TOKEN as f64
}

/// Binding to the fungible payment token.
#[derive(Clone)]
pub struct TokenContract {
    chain: Arc<dyn ChainAccess>,
    address: Address,
}

impl TokenContract {
    pub fn new(chain: Arc<dyn ChainAccess>, address: Address) -> Self {
        Self { chain, address }
    }

    pub async fn balance_of(&self, account: Address) -> BlockchainResult<U256> {
        read(self.chain.as_ref(), self.address, IERC20::balanceOfCall { account }).await
    }

    pub async fn allowance(&self, owner: Address, spender: Address) -> BlockchainResult<U256> {
        read(
            self.chain.as_ref(),
            self.address,
            IERC20::allowanceCall { owner, spender },
        )
        .await
    }

    /// Approve `spender` for exactly `amount`.
    pub async fn approve(&self, spender: Address, amount: U256) -> BlockchainResult<TxOutcome> {
        write(
            self.chain.as_ref(),
            self.address,
            IERC20::approveCall { spender, amount },
        )
        .await
    }
}
