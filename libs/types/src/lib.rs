//! # Pool Ledger Types
//!
//! Domain types shared by the ledger engine, its configuration layer and the
//! replay service.
//!
//! ## Design Philosophy
//!
//! - **Integer Amounts**: every balance is a `u128` in the asset's smallest unit
//! - **Explicit Aggregates**: [`Params`], [`PoolState`] and [`LiquidityProvider`]
//!   are plain values passed by reference and returned by value, never globals
//! - **Validated Identities**: [`Address`] can only be obtained through an
//!   [`AddressCodec`], so a well-formed identity is a type-level fact
//!
//! ## Quick Start
//!
//! ```rust
//! use pool_types::{AddressCodec, Bech32Codec, Coin, Params, PoolState};
//!
//! let params = Params::default();
//! params.validate().unwrap();
//!
//! let pool = PoolState::from_params(&params);
//! assert_eq!(pool.total_liquidity, 0);
//!
//! let codec = Bech32Codec::new("cosmos");
//! let provider = codec.encode(&[1u8; 20]).unwrap();
//! assert!(codec.validate(provider.as_str()).is_ok());
//!
//! let deposit = Coin::new("ETH", 100);
//! assert!(params.is_whitelisted(&deposit.denom));
//! ```

pub mod address;
pub mod coin;
pub mod params;
pub mod pool;
pub mod provider;

pub use address::{Address, AddressCodec, AddressError, Bech32Codec};
pub use coin::{Amount, Coin};
pub use params::{Params, ParamsError};
pub use pool::PoolState;
pub use provider::LiquidityProvider;
