//! Lazy pro-rata fee accrual
//!
//! Swaps only bump the pool's global fee counter. A provider is brought up to
//! date the next time they deposit or withdraw:
//!
//! ```text
//! accrued += (total_accrued_fees - checkpoint) * pool_share / total_liquidity
//! checkpoint = total_accrued_fees
//! ```
//!
//! All arithmetic is integer and checked; division truncates toward zero so
//! rounding dust stays with the pool.

use crate::error::{LedgerError, LedgerResult};
use pool_types::{Amount, LiquidityProvider, PoolState};
use tracing::debug;

/// Fee skimmed from a swap's output: `amount * F / (10^D * 100)`
pub fn swap_fee(amount: Amount, pool: &PoolState) -> LedgerResult<Amount> {
    let denominator = pool
        .fee_denominator()
        .ok_or(LedgerError::Overflow("fee denominator"))?;
    let numerator = amount
        .checked_mul(Amount::from(pool.swap_fee_percentage))
        .ok_or(LedgerError::Overflow("swap fee"))?;
    Ok(numerator / denominator)
}

/// Bring `provider` up to date with the pool's fee counter.
///
/// Must be called with the pool as it was *before* the current operation
/// changes `total_liquidity`. Returns the amount newly credited.
pub fn settle(provider: &mut LiquidityProvider, pool: &PoolState) -> LedgerResult<Amount> {
    let diff = provider
        .pending_fee_delta(pool.total_accrued_fees)
        .ok_or_else(|| {
            LedgerError::Invariant(format!(
                "fee checkpoint {} ahead of pool counter {}",
                provider.globally_accrued_fees, pool.total_accrued_fees
            ))
        })?;

    let mut credited = 0;
    if diff != 0 && provider.pool_share.amount != 0 && pool.total_liquidity != 0 {
        credited = diff
            .checked_mul(provider.pool_share.amount)
            .ok_or(LedgerError::Overflow("fee settlement"))?
            / pool.total_liquidity;
        provider.accrued_fees = provider
            .accrued_fees
            .checked_add(credited)
            .ok_or(LedgerError::Overflow("accrued fees"))?;
    }
    provider.globally_accrued_fees = pool.total_accrued_fees;

    debug!(
        diff,
        share = provider.pool_share.amount,
        total_liquidity = pool.total_liquidity,
        credited,
        "settled provider fees"
    );
    Ok(credited)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pool_types::{Coin, Params};

    fn pool(total_liquidity: Amount, total_accrued_fees: Amount) -> PoolState {
        PoolState {
            total_liquidity,
            total_accrued_fees,
            ..PoolState::from_params(&Params::default())
        }
    }

    fn provider(share: Amount, checkpoint: Amount) -> LiquidityProvider {
        LiquidityProvider {
            stable_coin: Coin::new("ETH", share),
            pool_share: Coin::new("USDT", share),
            accrued_fees: 0,
            globally_accrued_fees: checkpoint,
        }
    }

    #[test]
    fn test_default_fee_truncates_small_swaps_to_zero() {
        // 100 * 30000 / 100_000_000 = 0.03
        assert_eq!(swap_fee(100, &pool(0, 0)).unwrap(), 0);
        assert_eq!(swap_fee(10_000, &pool(0, 0)).unwrap(), 3);
        assert_eq!(swap_fee(3_333, &pool(0, 0)).unwrap(), 0);
        assert_eq!(swap_fee(3_334, &pool(0, 0)).unwrap(), 1);
    }

    #[test]
    fn test_fee_overflow_is_reported() {
        let err = swap_fee(Amount::MAX, &pool(0, 0)).unwrap_err();
        assert!(matches!(err, LedgerError::Overflow("swap fee")));

        let wide = PoolState {
            decimals: 60,
            ..pool(0, 0)
        };
        assert!(matches!(
            swap_fee(1, &wide),
            Err(LedgerError::Overflow("fee denominator"))
        ));
    }

    #[test]
    fn test_settle_credits_pro_rata_share() {
        // 30 fees accrued since checkpoint, provider holds 100 of 300
        let mut lp = provider(100, 0);
        let credited = settle(&mut lp, &pool(300, 30)).unwrap();
        assert_eq!(credited, 10);
        assert_eq!(lp.accrued_fees, 10);
        assert_eq!(lp.globally_accrued_fees, 30);

        // Second settlement against the same counter is a no-op
        assert_eq!(settle(&mut lp, &pool(300, 30)).unwrap(), 0);
        assert_eq!(lp.accrued_fees, 10);
    }

    #[test]
    fn test_settle_truncates() {
        let mut lp = provider(1, 0);
        assert_eq!(settle(&mut lp, &pool(3, 2)).unwrap(), 0);
        assert_eq!(lp.globally_accrued_fees, 2);
    }

    #[test]
    fn test_settle_with_empty_pool_only_moves_checkpoint() {
        let mut lp = provider(0, 0);
        assert_eq!(settle(&mut lp, &pool(0, 50)).unwrap(), 0);
        assert_eq!(lp.accrued_fees, 0);
        assert_eq!(lp.globally_accrued_fees, 50);
    }

    #[test]
    fn test_checkpoint_ahead_of_counter_is_an_invariant_error() {
        let mut lp = provider(10, 9);
        assert!(matches!(
            settle(&mut lp, &pool(10, 5)),
            Err(LedgerError::Invariant(_))
        ));
    }
}
