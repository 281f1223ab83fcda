//! Ledger error taxonomy
//!
//! Every failure carries a machine-checkable [`ErrorKind`] and a coarse
//! [`StatusCode`] bucket so dispatch layers never have to inspect messages.

use crate::gateway::GatewayError;
use crate::store::StoreError;
use pool_types::{Address, AddressError, Amount, ParamsError};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

pub type LedgerResult<T> = Result<T, LedgerError>;

/// HTTP-style status buckets returned alongside every operation outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u16)]
pub enum StatusCode {
    Ok = 200,
    BadRequest = 400,
    Unauthorized = 401,
    NotFound = 404,
    Conflict = 409,
    Internal = 500,
}

impl StatusCode {
    pub fn as_u16(self) -> u16 {
        self as u16
    }

    pub fn is_success(self) -> bool {
        self == StatusCode::Ok
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u16())
    }
}

/// Flat error classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    ZeroAmount,
    InvalidProviderAddress,
    CoinInvalid,
    AmountNotEqual,
    InsufficientLiquidity,
    PoolNotInitialized,
    CoinsNotPresent,
    ZeroSwapFee,
    ZeroDecimals,
    ShareTokenInvalid,
    DuplicateAddress,
    NotFound,
    Unauthorized,
    Internal,
}

impl ErrorKind {
    pub fn status(self) -> StatusCode {
        match self {
            ErrorKind::ZeroAmount
            | ErrorKind::CoinInvalid
            | ErrorKind::AmountNotEqual
            | ErrorKind::CoinsNotPresent
            | ErrorKind::ZeroSwapFee
            | ErrorKind::ZeroDecimals
            | ErrorKind::ShareTokenInvalid => StatusCode::BadRequest,
            ErrorKind::InvalidProviderAddress | ErrorKind::Unauthorized => {
                StatusCode::Unauthorized
            }
            ErrorKind::NotFound | ErrorKind::PoolNotInitialized => StatusCode::NotFound,
            ErrorKind::InsufficientLiquidity | ErrorKind::DuplicateAddress => {
                StatusCode::Conflict
            }
            ErrorKind::Internal => StatusCode::Internal,
        }
    }
}

/// Stored entity a lookup failed to find
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entity {
    Params,
    Pool,
    Provider(Address),
    Reserve(String),
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entity::Params => f.write_str("params"),
            Entity::Pool => f.write_str("pool"),
            Entity::Provider(address) => write!(f, "liquidity provider {address}"),
            Entity::Reserve(denom) => write!(f, "coin reserve {denom}"),
        }
    }
}

/// Whose balance fell short
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shortfall {
    /// Trader's spendable balance of the swap input
    Trader,
    /// Pool reserve of the requested denomination
    Reserve,
    /// Provider's deposited stake
    ProviderStake,
}

impl fmt::Display for Shortfall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shortfall::Trader => f.write_str("trader balance"),
            Shortfall::Reserve => f.write_str("pool reserve"),
            Shortfall::ProviderStake => f.write_str("provider stake"),
        }
    }
}

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("amount cannot be zero")]
    ZeroAmount,

    #[error("invalid provider address {address:?}: {source}")]
    InvalidProviderAddress {
        address: String,
        #[source]
        source: AddressError,
    },

    #[error("coin provided is invalid, for the denom: {denom}")]
    CoinInvalid { denom: String },

    #[error("amounts are not equal: input {input}, output {output}")]
    AmountNotEqual { input: Amount, output: Amount },

    #[error("required liquidity present in insufficient amount for the denom: {denom} ({holder} has {available}, requested {requested})")]
    InsufficientLiquidity {
        holder: Shortfall,
        denom: String,
        available: Amount,
        requested: Amount,
    },

    #[error("pool not initialized")]
    PoolNotInitialized,

    #[error("duplicate address: {0}")]
    DuplicateAddress(String),

    #[error("{0} not found")]
    NotFound(Entity),

    #[error("invalid authority address: {0}")]
    InvalidAuthority(#[source] AddressError),

    #[error("unauthorized, authority does not match the module's authority: got {got}, want {want}")]
    Unauthorized { got: String, want: String },

    #[error(transparent)]
    InvalidParams(#[from] ParamsError),

    #[error("arithmetic overflow in {0}")]
    Overflow(&'static str),

    #[error("ledger invariant violated: {0}")]
    Invariant(String),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("transfer failed: {0}")]
    Transfer(#[from] GatewayError),
}

impl LedgerError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            LedgerError::ZeroAmount => ErrorKind::ZeroAmount,
            LedgerError::InvalidProviderAddress { .. } => ErrorKind::InvalidProviderAddress,
            LedgerError::CoinInvalid { .. } => ErrorKind::CoinInvalid,
            LedgerError::AmountNotEqual { .. } => ErrorKind::AmountNotEqual,
            LedgerError::InsufficientLiquidity { .. } => ErrorKind::InsufficientLiquidity,
            LedgerError::PoolNotInitialized => ErrorKind::PoolNotInitialized,
            LedgerError::DuplicateAddress(_) => ErrorKind::DuplicateAddress,
            LedgerError::NotFound(_) => ErrorKind::NotFound,
            LedgerError::InvalidAuthority(_) | LedgerError::Unauthorized { .. } => {
                ErrorKind::Unauthorized
            }
            LedgerError::InvalidParams(err) => match err {
                ParamsError::CoinsNotPresent => ErrorKind::CoinsNotPresent,
                ParamsError::CoinInvalid => ErrorKind::CoinInvalid,
                ParamsError::ZeroSwapFee => ErrorKind::ZeroSwapFee,
                ParamsError::ZeroDecimals => ErrorKind::ZeroDecimals,
                ParamsError::ShareTokenInvalid => ErrorKind::ShareTokenInvalid,
            },
            LedgerError::Overflow(_)
            | LedgerError::Invariant(_)
            | LedgerError::Store(_)
            | LedgerError::Transfer(_) => ErrorKind::Internal,
        }
    }

    pub fn status(&self) -> StatusCode {
        self.kind().status()
    }

    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_buckets() {
        assert_eq!(LedgerError::ZeroAmount.status(), StatusCode::BadRequest);
        assert_eq!(
            LedgerError::InvalidProviderAddress {
                address: "foo".into(),
                source: AddressError::Empty,
            }
            .status(),
            StatusCode::Unauthorized
        );
        assert_eq!(
            LedgerError::InsufficientLiquidity {
                holder: Shortfall::Reserve,
                denom: "ETH".into(),
                available: 1,
                requested: 2,
            }
            .status(),
            StatusCode::Conflict
        );
        assert_eq!(LedgerError::PoolNotInitialized.status(), StatusCode::NotFound);
        assert_eq!(
            LedgerError::Overflow("swap fee").status(),
            StatusCode::Internal
        );
        assert_eq!(StatusCode::Conflict.as_u16(), 409);
    }

    #[test]
    fn test_params_errors_keep_their_kind() {
        let err = LedgerError::from(ParamsError::ZeroDecimals);
        assert_eq!(err.kind(), ErrorKind::ZeroDecimals);
        assert_eq!(err.status(), StatusCode::BadRequest);
        assert_eq!(err.to_string(), "decimals cannot be zero");
    }

    #[test]
    fn test_messages_name_the_denom() {
        let err = LedgerError::CoinInvalid {
            denom: "DOGE".into(),
        };
        assert_eq!(err.to_string(), "coin provided is invalid, for the denom: DOGE");
        assert!(!err.is_not_found());
        assert!(LedgerError::NotFound(Entity::Pool).is_not_found());
    }
}
