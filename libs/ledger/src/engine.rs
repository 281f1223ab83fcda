//! # Accounting Engine
//!
//! Pure state transitions for deposit, swap and withdrawal. Each function
//! takes the current aggregates by reference, checks every precondition that
//! depends on them, and returns a [`Transition`]: the next version of the
//! touched records, the custody moves required, and an operation receipt.
//!
//! Nothing here touches storage or custody. A failed precondition or
//! arithmetic step returns before any value is produced, so callers cannot
//! observe half-applied state.
//!
//! Request checks that need no state ([`require_nonzero`],
//! [`require_equal_amounts`]) are exposed separately so the keeper can run
//! them before any lookup.

use crate::accrual;
use crate::error::{LedgerError, LedgerResult, Shortfall};
use crate::gateway::TransferIntent;
use pool_types::{Address, Amount, Coin, LiquidityProvider, Params, PoolState};
use serde::{Deserialize, Serialize};

/// Next version of a provider record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderUpdate {
    Set(LiquidityProvider),
    Remove,
}

/// Records an operation writes back
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteSet {
    pub pool: PoolState,
    /// Reserve entries to upsert, keyed by their denomination
    pub reserves: Vec<Coin>,
    pub provider: Option<(Address, ProviderUpdate)>,
}

/// Outcome of a successful engine step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition<R> {
    pub writes: WriteSet,
    /// Custody moves, in execution order
    pub transfers: Vec<TransferIntent>,
    pub receipt: R,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositReceipt {
    /// Share tokens minted to the provider
    pub minted: Coin,
    /// Fees credited to the provider's record by the catch-up settlement
    pub settled_fees: Amount,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapReceipt {
    pub swap_fee: Amount,
    /// Output actually paid to the trader
    pub payout: Coin,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawReceipt {
    /// Stake plus settled fees paid to the provider
    pub paid: Coin,
    pub burned: Coin,
    pub fees_paid: Amount,
    /// True when the provider's record was removed
    pub closed: bool,
}

pub fn require_nonzero(coin: &Coin) -> LedgerResult<()> {
    if coin.is_zero() {
        return Err(LedgerError::ZeroAmount);
    }
    Ok(())
}

/// Swaps exchange 1:1 before fees
pub fn require_equal_amounts(input: &Coin, output: &Coin) -> LedgerResult<()> {
    if input.amount != output.amount {
        return Err(LedgerError::AmountNotEqual {
            input: input.amount,
            output: output.amount,
        });
    }
    Ok(())
}

fn require_whitelisted(params: &Params, denom: &str) -> LedgerResult<()> {
    if !params.is_whitelisted(denom) {
        return Err(LedgerError::CoinInvalid {
            denom: denom.to_string(),
        });
    }
    Ok(())
}

fn require_available(
    holder: Shortfall,
    denom: &str,
    available: Amount,
    requested: Amount,
) -> LedgerResult<()> {
    if available < requested {
        return Err(LedgerError::InsufficientLiquidity {
            holder,
            denom: denom.to_string(),
            available,
            requested,
        });
    }
    Ok(())
}

fn credit(balance: Amount, amount: Amount, what: &'static str) -> LedgerResult<Amount> {
    balance.checked_add(amount).ok_or(LedgerError::Overflow(what))
}

fn debit(balance: Amount, amount: Amount, what: &'static str) -> LedgerResult<Amount> {
    balance.checked_sub(amount).ok_or_else(|| {
        LedgerError::Invariant(format!("{what} would go negative: {balance} - {amount}"))
    })
}

/// Add liquidity: settle, then mint shares 1:1 with the deposit.
///
/// `record` and `reserve` are the provider's and the denomination's current
/// entries, `None` when absent.
pub fn deposit(
    pool: &PoolState,
    params: &Params,
    provider: &Address,
    record: Option<LiquidityProvider>,
    reserve: Option<Coin>,
    token: &Coin,
) -> LedgerResult<Transition<DepositReceipt>> {
    require_nonzero(token)?;
    require_whitelisted(params, &token.denom)?;

    let mut record = record
        .unwrap_or_else(|| LiquidityProvider::empty(token.denom.clone(), pool.share_denom()));

    // Catch-up runs against the pool before this deposit's liquidity lands
    let settled_fees = accrual::settle(&mut record, pool)?;

    record.stable_coin.amount = credit(record.stable_coin.amount, token.amount, "provider stake")?;
    let minted = Coin::new(record.pool_share.denom.clone(), token.amount);
    record.pool_share.amount = credit(record.pool_share.amount, minted.amount, "provider shares")?;

    let mut reserve = reserve.unwrap_or_else(|| Coin::zero(token.denom.clone()));
    reserve.amount = credit(reserve.amount, token.amount, "coin reserve")?;

    let mut next = pool.clone();
    next.total_liquidity = credit(pool.total_liquidity, token.amount, "total liquidity")?;

    let transfers = vec![
        TransferIntent::DebitToPool {
            account: provider.clone(),
            coin: token.clone(),
        },
        TransferIntent::MintShare(minted.clone()),
        TransferIntent::CreditFromPool {
            account: provider.clone(),
            coin: minted.clone(),
        },
    ];

    Ok(Transition {
        writes: WriteSet {
            pool: next,
            reserves: vec![reserve],
            provider: Some((provider.clone(), ProviderUpdate::Set(record))),
        },
        transfers,
        receipt: DepositReceipt {
            minted,
            settled_fees,
        },
    })
}

/// Exchange `input` for the same amount of `output`, minus the swap fee.
///
/// `trader_balance` is the trader's spendable balance of the input
/// denomination. The fee only bumps the global counter; no provider record is
/// touched.
#[allow(clippy::too_many_arguments)]
pub fn swap(
    pool: &PoolState,
    params: &Params,
    trader: &Address,
    trader_balance: Amount,
    input_reserve: Option<Coin>,
    output_reserve: Option<Coin>,
    input: &Coin,
    output: &Coin,
) -> LedgerResult<Transition<SwapReceipt>> {
    require_nonzero(input)?;
    require_equal_amounts(input, output)?;
    require_whitelisted(params, &input.denom)?;
    require_whitelisted(params, &output.denom)?;
    require_available(Shortfall::Trader, &input.denom, trader_balance, input.amount)?;

    let mut output_reserve = output_reserve.unwrap_or_else(|| Coin::zero(output.denom.clone()));
    require_available(
        Shortfall::Reserve,
        &output.denom,
        output_reserve.amount,
        output.amount,
    )?;

    output_reserve.amount = debit(output_reserve.amount, output.amount, "output reserve")?;

    let swap_fee = accrual::swap_fee(output.amount, pool)?;
    let payout = output.with_amount(
        output
            .amount
            .checked_sub(swap_fee)
            .ok_or(LedgerError::Overflow("swap payout"))?,
    );

    let same_denom = input.denom == output.denom;
    let mut input_reserve = if same_denom {
        output_reserve.clone()
    } else {
        input_reserve.unwrap_or_else(|| Coin::zero(input.denom.clone()))
    };
    input_reserve.amount = credit(input_reserve.amount, input.amount, "input reserve")?;

    let mut next = pool.clone();
    next.total_accrued_fees = credit(pool.total_accrued_fees, swap_fee, "total accrued fees")?;

    let reserves = if same_denom {
        vec![input_reserve]
    } else {
        vec![output_reserve, input_reserve]
    };

    let mut transfers = vec![TransferIntent::DebitToPool {
        account: trader.clone(),
        coin: input.clone(),
    }];
    if !payout.is_zero() {
        transfers.push(TransferIntent::CreditFromPool {
            account: trader.clone(),
            coin: payout.clone(),
        });
    }

    Ok(Transition {
        writes: WriteSet {
            pool: next,
            reserves,
            provider: None,
        },
        transfers,
        receipt: SwapReceipt { swap_fee, payout },
    })
}

/// Remove liquidity: settle, burn shares 1:1 with the withdrawn stake, and pay
/// out the stake plus every fee settled so far.
pub fn withdraw(
    pool: &PoolState,
    provider: &Address,
    record: LiquidityProvider,
    reserve: Option<Coin>,
    token: &Coin,
) -> LedgerResult<Transition<WithdrawReceipt>> {
    require_nonzero(token)?;
    require_available(
        Shortfall::ProviderStake,
        &token.denom,
        record.stable_coin.amount,
        token.amount,
    )?;

    let mut reserve = reserve.unwrap_or_else(|| Coin::zero(token.denom.clone()));
    require_available(Shortfall::Reserve, &token.denom, reserve.amount, token.amount)?;

    let mut record = record;
    // Settles against the pre-withdrawal share balance
    accrual::settle(&mut record, pool)?;
    let fees_paid = record.accrued_fees;

    reserve.amount = debit(reserve.amount, token.amount, "coin reserve")?;

    let mut next = pool.clone();
    next.total_liquidity = debit(pool.total_liquidity, token.amount, "total liquidity")?;

    let burned = Coin::new(record.pool_share.denom.clone(), token.amount);
    let remaining_stake = debit(record.stable_coin.amount, token.amount, "provider stake")?;
    let remaining_shares = debit(record.pool_share.amount, burned.amount, "provider shares")?;

    let closed = remaining_stake == 0;
    let update = if closed {
        ProviderUpdate::Remove
    } else {
        // Settled fees are paid out below, so the record restarts at zero
        ProviderUpdate::Set(LiquidityProvider {
            stable_coin: record.stable_coin.with_amount(remaining_stake),
            pool_share: record.pool_share.with_amount(remaining_shares),
            accrued_fees: 0,
            globally_accrued_fees: pool.total_accrued_fees,
        })
    };

    let paid = token.with_amount(credit(token.amount, fees_paid, "withdrawal payout")?);

    let transfers = vec![
        TransferIntent::DebitToPool {
            account: provider.clone(),
            coin: burned.clone(),
        },
        TransferIntent::BurnShare(burned.clone()),
        TransferIntent::CreditFromPool {
            account: provider.clone(),
            coin: paid.clone(),
        },
    ];

    Ok(Transition {
        writes: WriteSet {
            pool: next,
            reserves: vec![reserve],
            provider: Some((provider.clone(), update)),
        },
        transfers,
        receipt: WithdrawReceipt {
            paid,
            burned,
            fees_paid,
            closed,
        },
    })
}
