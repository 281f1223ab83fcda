//! Drives a [`MemoryHost`] through a parsed script

use crate::script::{ScriptLine, Step};
use anyhow::{Context, Result};
use ledger_config::LedgerConfig;
use pool_ledger::{GenesisState, Keeper, MemoryHost, Receipt};
use pool_types::{Bech32Codec, Coin, PoolState};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{info, warn};

/// Outcome counts of one replay
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReplaySummary {
    pub funded: usize,
    pub committed: usize,
    pub rejected: usize,
    /// Message outcomes keyed by status code
    pub statuses: BTreeMap<u16, usize>,
}

/// Final ledger state reported after a replay
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReplayReport {
    pub summary: ReplaySummary,
    pub pool: PoolState,
    /// Swap fee in percent, `None` when the pool's decimals overflow a decimal
    pub fee_rate: Option<Decimal>,
    pub reserves: Vec<Coin>,
}

/// Build a host from configuration and run genesis with the configured params
pub fn bootstrap(config: &LedgerConfig) -> Result<MemoryHost> {
    let codec = Bech32Codec::new(config.chain.address_prefix.clone());
    let keeper = Keeper::new(codec, &config.chain.authority)
        .context("Configured authority is not a valid address")?;

    let mut host = MemoryHost::new(keeper);
    host.init_genesis(&GenesisState::new(config.params()?))
        .context("Genesis failed")?;
    Ok(host)
}

pub fn run(host: &mut MemoryHost, steps: &[ScriptLine]) -> Result<ReplaySummary> {
    let mut summary = ReplaySummary::default();

    for ScriptLine { line, step } in steps {
        match step {
            Step::Fund(funding) => {
                host.fund(&funding.account, &funding.coin)
                    .with_context(|| format!("Funding on line {line} failed"))?;
                summary.funded += 1;
            }
            Step::Deliver(msg) => {
                let response = host.deliver(msg);
                *summary.statuses.entry(response.status.as_u16()).or_default() += 1;
                match &response.result {
                    Ok(receipt) => {
                        summary.committed += 1;
                        log_receipt(*line, receipt);
                    }
                    Err(err) => {
                        summary.rejected += 1;
                        warn!(line, op = msg.name(), status = %response.status, "{}", err);
                    }
                }
            }
        }
    }
    Ok(summary)
}

fn log_receipt(line: usize, receipt: &Receipt) {
    match receipt {
        Receipt::Deposit(r) => info!(line, minted = %r.minted, settled_fees = r.settled_fees, "deposit"),
        Receipt::Swap(r) => info!(line, payout = %r.payout, swap_fee = r.swap_fee, "swap"),
        Receipt::Withdraw(r) => info!(
            line,
            paid = %r.paid,
            fees_paid = r.fees_paid,
            closed = r.closed,
            "withdraw"
        ),
        Receipt::ParamsUpdated => info!(line, "params updated"),
    }
}

pub fn report(host: &MemoryHost, summary: ReplaySummary) -> Result<ReplayReport> {
    let keeper = host.keeper();
    let pool = keeper.pool(host.store()).context("Pool missing after replay")?;
    let reserves = keeper
        .coin_reserves(host.store())
        .context("Reserves missing after replay")?;
    Ok(ReplayReport {
        summary,
        fee_rate: pool.swap_fee_rate(),
        pool,
        reserves,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::parse_script;

    const AUTHORITY: &str = "cosmos1pyysjzgfpyysjzgfpyysjzgfpyysjzgfam50we";
    const ALICE: &str = "cosmos1qyqszqgpqyqszqgpqyqszqgpqyqszqgpjnp7du";

    fn config() -> LedgerConfig {
        let mut config = LedgerConfig::default();
        config.chain.authority = AUTHORITY.to_string();
        config
    }

    #[test]
    fn test_bootstrap_requires_authority() {
        assert!(bootstrap(&LedgerConfig::default()).is_err());
        assert!(bootstrap(&config()).is_ok());
    }

    #[test]
    fn test_run_counts_outcomes() {
        let mut host = bootstrap(&config()).unwrap();
        let script = format!(
            r#"{{"op":"fund","account":"{ALICE}","coin":{{"denom":"ETH","amount":50}}}}
{{"op":"deposit","liquidity_provider":"{ALICE}","token":{{"denom":"ETH","amount":50}}}}
{{"op":"deposit","liquidity_provider":"{ALICE}","token":{{"denom":"ETH","amount":0}}}}
{{"op":"withdraw","liquidity_provider":"{ALICE}","token":{{"denom":"ETH","amount":20}}}}"#
        );
        let steps = parse_script(&script).unwrap();
        let summary = run(&mut host, &steps).unwrap();

        assert_eq!(summary.funded, 1);
        assert_eq!(summary.committed, 2);
        assert_eq!(summary.rejected, 1);
        assert_eq!(summary.statuses.get(&200), Some(&2));
        assert_eq!(summary.statuses.get(&400), Some(&1));

        let report = report(&host, summary).unwrap();
        assert_eq!(report.pool.total_liquidity, 30);
        assert_eq!(report.reserves[0], Coin::new("ETH", 30));
    }

    #[test]
    fn test_bad_funding_aborts_the_replay() {
        let mut host = bootstrap(&config()).unwrap();
        let steps = parse_script(
            r#"{"op":"fund","account":"nobody","coin":{"denom":"ETH","amount":1}}"#,
        )
        .unwrap();
        assert!(run(&mut host, &steps).is_err());
    }
}
