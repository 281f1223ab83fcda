//! # Ledger Configuration
//!
//! Layered configuration for hosts of the pool ledger.
//!
//! ## Sources
//!
//! 1. Built-in defaults, mirroring the ledger's default params
//! 2. An optional TOML file
//! 3. `SWAP_`-prefixed environment variables, nested with `__`
//!
//! ## Usage
//!
//! ```rust,no_run
//! use ledger_config::LedgerConfig;
//! use std::path::Path;
//!
//! let config = LedgerConfig::load(Some(Path::new("config/ledger.toml")))?;
//! let params = config.params()?;
//! println!("fee numerator {}", params.swap_fee_percentage);
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod ledger_config;

pub use ledger_config::{ChainConfig, CoinConfig, LedgerConfig, LogConfig, ParamsConfig, ENV_PREFIX};
