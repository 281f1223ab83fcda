//! # Pool Ledger - Liquidity Pool Accounting Engine
//!
//! ## Purpose
//!
//! Tracks pooled reserves for a small whitelist of assets, issues and redeems
//! pool-share claims 1:1 with deposits, and distributes swap fees among
//! liquidity providers pro rata to their shares without touching every
//! provider on each swap.
//!
//! ## Fee Accrual
//!
//! Swaps only bump the pool's lifetime fee counter. Each provider record keeps
//! a checkpoint of that counter; on the provider's next deposit or withdrawal
//! the difference is credited in proportion to their share of
//! `total_liquidity`. See [`accrual`].
//!
//! ## Layers
//!
//! - [`engine`]: pure transitions returning the next records, the custody
//!   moves required and a receipt
//! - [`keeper`]: loads aggregates from a [`KvStore`], runs the engine, writes
//!   back and replays [`TransferIntent`]s against a [`TransferGateway`]
//! - [`host::MemoryHost`]: branch-and-commit atomicity over in-memory state
//!
//! ## Quick Start
//!
//! ```rust
//! use pool_ledger::{GenesisState, Keeper, MemoryHost, Msg, MsgAddLiquidity};
//! use pool_types::{AddressCodec, Bech32Codec, Coin, Params};
//!
//! let codec = Bech32Codec::new("cosmos");
//! let authority = codec.encode(&[9u8; 20]).unwrap();
//! let provider = codec.encode(&[1u8; 20]).unwrap();
//!
//! let mut host = MemoryHost::new(Keeper::new(codec, authority.as_str()).unwrap());
//! host.init_genesis(&GenesisState::new(Params::default())).unwrap();
//! host.fund(provider.as_str(), &Coin::new("ETH", 100)).unwrap();
//!
//! let response = host.deliver(&Msg::AddLiquidity(MsgAddLiquidity {
//!     liquidity_provider: provider.to_string(),
//!     token: Coin::new("ETH", 100),
//! }));
//! assert!(response.is_success());
//! assert_eq!(host.keeper().pool(host.store()).unwrap().total_liquidity, 100);
//! ```

pub mod accrual;
pub mod engine;
pub mod error;
pub mod gateway;
pub mod genesis;
pub mod host;
pub mod keeper;
pub mod msg_server;
pub mod query;
pub mod store;

pub use engine::{DepositReceipt, SwapReceipt, Transition, WithdrawReceipt};
pub use error::{Entity, ErrorKind, LedgerError, LedgerResult, Shortfall, StatusCode};
pub use gateway::{GatewayError, MemoryBank, TransferGateway, TransferIntent};
pub use genesis::{GenesisState, ProviderEntry};
pub use host::MemoryHost;
pub use keeper::{Keeper, TxContext};
pub use msg_server::{
    Msg, MsgAddLiquidity, MsgRemoveLiquidity, MsgSwapLiquidity, MsgUpdateParams, Receipt,
    Response,
};
pub use query::{Query, QueryResponse};
pub use store::{KvStore, MemoryKv, StoreError};
