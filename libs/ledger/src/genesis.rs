//! Genesis document
//!
//! Describes the full ledger state at chain start. Loading the document from
//! disk is the host's concern; this module only validates it.

use crate::error::{LedgerError, LedgerResult};
use pool_types::{Address, Amount, Coin, LiquidityProvider, Params, PoolState};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A provider record together with its key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderEntry {
    pub address: Address,
    pub record: LiquidityProvider,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GenesisState {
    pub params: Params,
    /// Derived from `params` when absent
    #[serde(default)]
    pub pool: Option<PoolState>,
    /// Seeded from the whitelist amounts when empty
    #[serde(default)]
    pub reserves: Vec<Coin>,
    #[serde(default)]
    pub providers: Vec<ProviderEntry>,
}

impl GenesisState {
    pub fn new(params: Params) -> Self {
        Self {
            params,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> LedgerResult<()> {
        self.params.validate()?;

        let mut seen = HashSet::new();
        for entry in &self.providers {
            if !seen.insert(entry.address.as_str()) {
                return Err(LedgerError::DuplicateAddress(entry.address.to_string()));
            }
        }

        let mut denoms = HashSet::new();
        for reserve in &self.reserves {
            if !denoms.insert(reserve.denom.as_str()) {
                return Err(LedgerError::DuplicateAddress(reserve.denom.clone()));
            }
        }

        // A missing pool starts empty, so providers must hold nothing either
        let (liquidity, fee_counter) = self
            .pool
            .as_ref()
            .map_or((0, 0), |pool| (pool.total_liquidity, pool.total_accrued_fees));

        let shares = self.total_shares()?;
        if shares != liquidity {
            return Err(LedgerError::Invariant(format!(
                "provider shares sum to {shares}, pool holds {liquidity}"
            )));
        }
        if let Some(entry) = self
            .providers
            .iter()
            .find(|entry| entry.record.globally_accrued_fees > fee_counter)
        {
            return Err(LedgerError::Invariant(format!(
                "checkpoint of {} ahead of pool fee counter",
                entry.address
            )));
        }
        Ok(())
    }

    fn total_shares(&self) -> LedgerResult<Amount> {
        self.providers.iter().try_fold(0 as Amount, |acc, entry| {
            acc.checked_add(entry.record.pool_share.amount)
                .ok_or(LedgerError::Overflow("genesis shares"))
        })
    }
}
