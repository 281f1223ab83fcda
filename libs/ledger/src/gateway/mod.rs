//! Transfer gateway
//!
//! Custody lives outside the ledger. The engine only describes the moves it
//! needs as [`TransferIntent`]s; the keeper replays them against a
//! [`TransferGateway`] once every validation and state computation succeeded.

pub mod memory;

pub use memory::MemoryBank;

use pool_types::{Address, Amount, Coin};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Account label used for pool custody in errors
pub const POOL_ACCOUNT: &str = "pool";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GatewayError {
    #[error("insufficient funds in {account} for {denom}: have {available}, need {requested}")]
    InsufficientFunds {
        account: String,
        denom: String,
        available: Amount,
        requested: Amount,
    },

    #[error("balance overflow for {denom}")]
    Overflow { denom: String },

    #[error("transfer rejected: {0}")]
    Rejected(String),
}

/// Custody operations consumed by the ledger
pub trait TransferGateway {
    /// Amount of `denom` the account can spend right now
    fn spendable_balance(&self, account: &Address, denom: &str) -> Result<Amount, GatewayError>;

    /// Move `coin` from the account into pool custody
    fn debit_to_pool(&mut self, account: &Address, coin: &Coin) -> Result<(), GatewayError>;

    /// Move `coin` from pool custody to the account
    fn credit_from_pool(&mut self, account: &Address, coin: &Coin) -> Result<(), GatewayError>;

    /// Create share tokens in pool custody
    fn mint_share(&mut self, coin: &Coin) -> Result<(), GatewayError>;

    /// Destroy share tokens held in pool custody
    fn burn_share(&mut self, coin: &Coin) -> Result<(), GatewayError>;
}

/// A custody move requested by the engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransferIntent {
    DebitToPool { account: Address, coin: Coin },
    CreditFromPool { account: Address, coin: Coin },
    MintShare(Coin),
    BurnShare(Coin),
}

impl TransferIntent {
    pub fn execute<G: TransferGateway + ?Sized>(&self, gateway: &mut G) -> Result<(), GatewayError> {
        match self {
            TransferIntent::DebitToPool { account, coin } => gateway.debit_to_pool(account, coin),
            TransferIntent::CreditFromPool { account, coin } => {
                gateway.credit_from_pool(account, coin)
            }
            TransferIntent::MintShare(coin) => gateway.mint_share(coin),
            TransferIntent::BurnShare(coin) => gateway.burn_share(coin),
        }
    }
}

impl fmt::Display for TransferIntent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransferIntent::DebitToPool { account, coin } => {
                write!(f, "debit {coin} {account} -> {POOL_ACCOUNT}")
            }
            TransferIntent::CreditFromPool { account, coin } => {
                write!(f, "credit {coin} {POOL_ACCOUNT} -> {account}")
            }
            TransferIntent::MintShare(coin) => write!(f, "mint {coin}"),
            TransferIntent::BurnShare(coin) => write!(f, "burn {coin}"),
        }
    }
}
