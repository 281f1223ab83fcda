//! Pool parameters
//!
//! Set once at genesis and afterwards only replaced wholesale through the
//! authority-gated update. Validation runs on both paths.

use crate::coin::Coin;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Params validation failures
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParamsError {
    #[error("white listed coins cannot be nil")]
    CoinsNotPresent,

    #[error("coin provided is invalid: whitelisted coin has an empty denom")]
    CoinInvalid,

    #[error("swap fee cannot be zero")]
    ZeroSwapFee,

    #[error("decimals cannot be zero")]
    ZeroDecimals,

    #[error("share token is invalid")]
    ShareTokenInvalid,
}

/// Whitelist, precision, share token and fee rate of the pool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Params {
    /// Denominations eligible for deposit and swap. The amount of each entry
    /// seeds its reserve at genesis.
    pub whitelisted_coins: Vec<Coin>,
    /// Precision `D` of the fee numerator
    pub decimals: u32,
    /// Pool-share denomination and initial supply hint
    pub share_token: Coin,
    /// Fee numerator `F` over `10^D * 100`
    pub swap_fee_percentage: u64,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            whitelisted_coins: vec![
                Coin::zero("ETH"),
                Coin::zero("WETH"),
                Coin::zero("stkETH"),
            ],
            decimals: 6,
            share_token: Coin::new("USDT", 100),
            swap_fee_percentage: 30_000,
        }
    }
}

impl Params {
    pub fn validate(&self) -> Result<(), ParamsError> {
        if self.whitelisted_coins.is_empty() {
            return Err(ParamsError::CoinsNotPresent);
        }
        if self.whitelisted_coins.iter().any(|coin| coin.denom.is_empty()) {
            return Err(ParamsError::CoinInvalid);
        }
        if self.swap_fee_percentage == 0 {
            return Err(ParamsError::ZeroSwapFee);
        }
        if self.decimals == 0 {
            return Err(ParamsError::ZeroDecimals);
        }
        if self.share_token.denom.is_empty() {
            return Err(ParamsError::ShareTokenInvalid);
        }
        Ok(())
    }

    pub fn is_whitelisted(&self, denom: &str) -> bool {
        self.whitelisted_coins.iter().any(|coin| coin.denom == denom)
    }

    /// Whitelisted denominations in declaration order
    pub fn whitelisted_denoms(&self) -> impl Iterator<Item = &str> {
        self.whitelisted_coins.iter().map(|coin| coin.denom.as_str())
    }
}
