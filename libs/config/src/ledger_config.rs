//! Ledger Configuration Module
//!
//! Loads [`LedgerConfig`] from an optional TOML file, then applies
//! `SWAP_`-prefixed environment overrides. Nested keys are joined with a
//! double underscore, e.g. `SWAP_LOG__LEVEL=debug` or
//! `SWAP_CHAIN__ADDRESS_PREFIX=osmo`.

use anyhow::{Context, Result};
use config_crate::{Config, Environment, File};
use pool_types::{Amount, Coin, Params, ParamsError};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

pub const ENV_PREFIX: &str = "SWAP";

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct LedgerConfig {
    #[serde(default)]
    pub log: LogConfig,
    #[serde(default)]
    pub chain: ChainConfig,
    #[serde(default)]
    pub params: ParamsConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct LogConfig {
    /// `EnvFilter` directive, e.g. `info` or `pool_ledger=debug`
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub json: bool,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ChainConfig {
    /// bech32 human-readable prefix of account addresses
    #[serde(default = "default_address_prefix")]
    pub address_prefix: String,
    /// Only signer allowed to replace params
    #[serde(default)]
    pub authority: String,
}

/// A whitelisted coin as written in configuration
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct CoinConfig {
    pub denom: String,
    #[serde(default)]
    pub amount: u64,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ParamsConfig {
    #[serde(default = "default_whitelist")]
    pub whitelisted_coins: Vec<CoinConfig>,
    #[serde(default = "default_decimals")]
    pub decimals: u32,
    #[serde(default = "default_share_token")]
    pub share_token: CoinConfig,
    #[serde(default = "default_swap_fee")]
    pub swap_fee_percentage: u64,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_address_prefix() -> String {
    "cosmos".to_string()
}

impl CoinConfig {
    fn new(denom: &str, amount: u64) -> Self {
        Self {
            denom: denom.to_string(),
            amount,
        }
    }
}

fn default_whitelist() -> Vec<CoinConfig> {
    ["ETH", "WETH", "stkETH"]
        .into_iter()
        .map(|denom| CoinConfig::new(denom, 0))
        .collect()
}

fn default_decimals() -> u32 {
    Params::default().decimals
}

fn default_share_token() -> CoinConfig {
    CoinConfig::new("USDT", 100)
}

fn default_swap_fee() -> u64 {
    Params::default().swap_fee_percentage
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            address_prefix: default_address_prefix(),
            authority: String::new(),
        }
    }
}

impl Default for ParamsConfig {
    fn default() -> Self {
        Self {
            whitelisted_coins: default_whitelist(),
            decimals: default_decimals(),
            share_token: default_share_token(),
            swap_fee_percentage: default_swap_fee(),
        }
    }
}

impl From<&CoinConfig> for Coin {
    fn from(coin: &CoinConfig) -> Self {
        Coin::new(coin.denom.clone(), Amount::from(coin.amount))
    }
}

impl ParamsConfig {
    /// Convert to ledger params, rejecting any the ledger would reject
    pub fn to_params(&self) -> std::result::Result<Params, ParamsError> {
        let params = Params {
            whitelisted_coins: self.whitelisted_coins.iter().map(Coin::from).collect(),
            decimals: self.decimals,
            share_token: Coin::from(&self.share_token),
            swap_fee_percentage: self.swap_fee_percentage,
        };
        params.validate()?;
        Ok(params)
    }
}

impl LedgerConfig {
    /// Load from `path` (required when given) with `SWAP_` environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with(path, Environment::with_prefix(ENV_PREFIX))
    }

    fn load_with(path: Option<&Path>, environment: Environment) -> Result<Self> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            info!("Loading ledger config: {:?}", path);
            builder = builder.add_source(File::from(path).required(true));
        } else {
            debug!("No config file given, using defaults");
        }

        builder = builder.add_source(
            environment
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config: Self = builder
            .build()
            .context("Failed to build configuration")?
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        config
            .params
            .to_params()
            .context("Configured params are invalid")?;
        Ok(config)
    }

    pub fn params(&self) -> Result<Params> {
        self.params
            .to_params()
            .context("Configured params are invalid")
    }
}
