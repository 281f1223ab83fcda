//! Liquidity provider stake records

use crate::coin::{Amount, Coin};
use serde::{Deserialize, Serialize};

/// Stake record with a lazy fee-accrual checkpoint.
///
/// `globally_accrued_fees` is the value of the pool's fee counter the last
/// time this provider's entitlement was settled; the difference to the
/// current counter is what the provider has not been credited for yet.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LiquidityProvider {
    /// Deposited asset, net of withdrawals
    pub stable_coin: Coin,
    /// Pool-share claim held
    pub pool_share: Coin,
    /// Settled fees not yet paid out
    pub accrued_fees: Amount,
    /// Fee counter snapshot at last settlement
    pub globally_accrued_fees: Amount,
}

impl LiquidityProvider {
    /// Zero-valued record for a provider's first deposit
    pub fn empty(stake_denom: impl Into<String>, share_denom: impl Into<String>) -> Self {
        Self {
            stable_coin: Coin::zero(stake_denom),
            pool_share: Coin::zero(share_denom),
            accrued_fees: 0,
            globally_accrued_fees: 0,
        }
    }

    /// Fees not yet reflected in `accrued_fees`. `None` if the checkpoint is
    /// ahead of the counter, which no valid history produces.
    pub fn pending_fee_delta(&self, total_accrued_fees: Amount) -> Option<Amount> {
        total_accrued_fees.checked_sub(self.globally_accrued_fees)
    }
}
