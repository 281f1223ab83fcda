//! Pool aggregate
//!
//! Singleton record created at genesis. `total_liquidity` equals the sum of
//! every provider's pool-share balance; `total_accrued_fees` is the lifetime
//! fee counter that provider checkpoints are measured against.

use crate::coin::{Amount, Coin};
use crate::params::Params;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PoolState {
    /// Deposits net of withdrawals, in the shared accounting unit
    pub total_liquidity: Amount,
    /// Lifetime sum of swap fees; never decreases
    pub total_accrued_fees: Amount,
    pub decimals: u32,
    pub share_token: Coin,
    pub swap_fee_percentage: u64,
}

impl PoolState {
    /// Fresh pool with no liquidity, configured from `params`
    pub fn from_params(params: &Params) -> Self {
        Self {
            total_liquidity: 0,
            total_accrued_fees: 0,
            decimals: params.decimals,
            share_token: params.share_token.clone(),
            swap_fee_percentage: params.swap_fee_percentage,
        }
    }

    pub fn share_denom(&self) -> &str {
        &self.share_token.denom
    }

    /// `10^decimals * 100`, or `None` when it does not fit in an [`Amount`]
    pub fn fee_denominator(&self) -> Option<Amount> {
        10u128.checked_pow(self.decimals)?.checked_mul(100)
    }

    /// Fee rate as a percentage, e.g. `0.03` for 30000 at 6 decimals.
    /// Used for reporting only; settlement never leaves integer arithmetic.
    pub fn swap_fee_rate(&self) -> Option<Decimal> {
        let mut rate = Decimal::from(self.swap_fee_percentage);
        rate.set_scale(self.decimals).ok()?;
        Some(rate.normalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_from_default_params() {
        let pool = PoolState::from_params(&Params::default());
        assert_eq!(pool.total_liquidity, 0);
        assert_eq!(pool.total_accrued_fees, 0);
        assert_eq!(pool.decimals, 6);
        assert_eq!(pool.share_denom(), "USDT");
        assert_eq!(pool.swap_fee_percentage, 30_000);
    }

    #[test]
    fn test_fee_denominator() {
        let pool = PoolState::from_params(&Params::default());
        assert_eq!(pool.fee_denominator(), Some(100_000_000));

        let wide = PoolState {
            decimals: 40,
            ..pool
        };
        assert_eq!(wide.fee_denominator(), None);
    }

    #[test]
    fn test_swap_fee_rate_reporting() {
        let pool = PoolState::from_params(&Params::default());
        assert_eq!(pool.swap_fee_rate(), Some(dec!(0.03)));

        let flat = PoolState {
            swap_fee_percentage: 250,
            decimals: 1,
            ..pool
        };
        assert_eq!(flat.swap_fee_rate(), Some(dec!(25)));
    }
}
