//! Ledger Invariant Property Tests
//!
//! Random interleavings of deposits, swaps and withdrawals, checking after
//! every step the accounting properties that must hold in any reachable state.

use pool_ledger::{
    GenesisState, Keeper, MemoryHost, Msg, MsgAddLiquidity, MsgRemoveLiquidity, MsgSwapLiquidity,
    Query, StatusCode,
};
use pool_types::{Amount, AddressCodec, Bech32Codec, Coin, Params};
use proptest::prelude::*;

const DENOMS: [&str; 3] = ["ETH", "WETH", "stkETH"];
const ACCOUNTS: u8 = 3;
const FUNDING: Amount = 1_000_000;

#[derive(Debug, Clone)]
enum Op {
    Deposit { who: u8, denom: usize, amount: Amount },
    Swap { who: u8, input: usize, output: usize, amount: Amount },
    Withdraw { who: u8, denom: usize, amount: Amount },
}

fn addr(seed: u8) -> String {
    Bech32Codec::new("cosmos")
        .encode(&[seed + 1; 20])
        .unwrap()
        .into_inner()
}

impl Op {
    fn to_msg(&self) -> Msg {
        match *self {
            Op::Deposit { who, denom, amount } => Msg::AddLiquidity(MsgAddLiquidity {
                liquidity_provider: addr(who),
                token: Coin::new(DENOMS[denom], amount),
            }),
            Op::Swap {
                who,
                input,
                output,
                amount,
            } => Msg::SwapLiquidity(MsgSwapLiquidity {
                trader: addr(who),
                input: Coin::new(DENOMS[input], amount),
                output: Coin::new(DENOMS[output], amount),
            }),
            Op::Withdraw { who, denom, amount } => Msg::RemoveLiquidity(MsgRemoveLiquidity {
                liquidity_provider: addr(who),
                token: Coin::new(DENOMS[denom], amount),
            }),
        }
    }
}

prop_compose! {
    fn account()(who in 0..ACCOUNTS) -> u8 {
        who
    }
}

prop_compose! {
    fn denom()(index in 0..DENOMS.len()) -> usize {
        index
    }
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (account(), denom(), 0..5_000u128)
            .prop_map(|(who, denom, amount)| Op::Deposit { who, denom, amount }),
        (account(), denom(), denom(), 0..5_000u128).prop_map(|(who, input, output, amount)| {
            Op::Swap {
                who,
                input,
                output,
                amount,
            }
        }),
        (account(), denom(), 0..5_000u128)
            .prop_map(|(who, denom, amount)| Op::Withdraw { who, denom, amount }),
    ]
}

fn host(fee: u64) -> MemoryHost {
    let keeper = Keeper::new(Bech32Codec::new("cosmos"), &addr(9)).unwrap();
    let mut host = MemoryHost::new(keeper);
    let params = Params {
        decimals: 2,
        swap_fee_percentage: fee,
        ..Params::default()
    };
    host.init_genesis(&GenesisState::new(params)).unwrap();
    for who in 0..ACCOUNTS {
        for denom in DENOMS {
            host.fund(&addr(who), &Coin::new(denom, FUNDING)).unwrap();
        }
    }
    host
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn shares_always_sum_to_total_liquidity(
        fee in 1u64..2_000,
        ops in prop::collection::vec(op(), 1..40),
    ) {
        let mut host = host(fee);
        let mut last_fees = 0;

        for op in &ops {
            let before = host.clone();
            let response = host.deliver(&op.to_msg());
            if !response.is_success() {
                prop_assert!(response.status != StatusCode::Ok);
                prop_assert_eq!(host.store(), before.store());
                prop_assert_eq!(host.bank(), before.bank());
            }

            let keeper = host.keeper();
            let state = keeper.export_genesis(host.store()).unwrap();
            let pool = state.pool.clone().unwrap();

            let shares: Amount = state
                .providers
                .iter()
                .map(|entry| entry.record.pool_share.amount)
                .sum();
            prop_assert_eq!(shares, pool.total_liquidity);
            prop_assert_eq!(host.bank().supply("USDT"), pool.total_liquidity);

            // Fee counter is monotone and no checkpoint runs ahead of it
            prop_assert!(pool.total_accrued_fees >= last_fees);
            last_fees = pool.total_accrued_fees;
            for entry in &state.providers {
                prop_assert!(entry.record.globally_accrued_fees <= pool.total_accrued_fees);
                prop_assert!(entry.record.stable_coin.amount > 0);
            }

            // Every stake unit backs exactly one share unit
            for entry in &state.providers {
                prop_assert_eq!(entry.record.stable_coin.amount, entry.record.pool_share.amount);
            }
        }
    }

    #[test]
    fn queries_do_not_mutate(ops in prop::collection::vec(op(), 0..20)) {
        let mut host = host(30);
        for op in &ops {
            host.deliver(&op.to_msg());
        }

        let snapshot = host.clone();
        for query in [Query::Params, Query::Pool, Query::CoinReserves] {
            let first = host.query(&query).result.unwrap();
            let second = host.query(&query).result.unwrap();
            prop_assert_eq!(first, second);
        }
        prop_assert_eq!(host.store(), snapshot.store());
    }
}
