//! In-memory host
//!
//! Owns a [`MemoryKv`] and a [`MemoryBank`] and gives every invocation
//! all-or-nothing semantics: the keeper runs against a clone of both, and the
//! clone replaces the live state only when the invocation succeeds.

use crate::error::{LedgerError, LedgerResult};
use crate::gateway::{MemoryBank, TransferGateway};
use crate::genesis::GenesisState;
use crate::keeper::{Keeper, TxContext};
use crate::msg_server::{Msg, Receipt, Response};
use crate::query::{Query, QueryResponse};
use crate::store::MemoryKv;
use pool_types::{Address, AddressCodec, Amount, Bech32Codec, Coin};
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct MemoryHost<C = Bech32Codec> {
    keeper: Keeper<C>,
    store: MemoryKv,
    bank: MemoryBank,
}

impl<C: AddressCodec> MemoryHost<C> {
    pub fn new(keeper: Keeper<C>) -> Self {
        Self {
            keeper,
            store: MemoryKv::new(),
            bank: MemoryBank::new(),
        }
    }

    pub fn keeper(&self) -> &Keeper<C> {
        &self.keeper
    }

    pub fn store(&self) -> &MemoryKv {
        &self.store
    }

    pub fn bank(&self) -> &MemoryBank {
        &self.bank
    }

    /// Initialize ledger state and back it with matching custody: every
    /// reserve is placed in pool custody and every genesis provider is
    /// issued their share tokens.
    pub fn init_genesis(&mut self, genesis: &GenesisState) -> LedgerResult<()> {
        self.execute(|keeper, ctx| {
            keeper.init_genesis(&mut *ctx.store, genesis)?;
            let exported = keeper.export_genesis(&*ctx.store)?;
            for reserve in exported.reserves.iter().filter(|coin| !coin.is_zero()) {
                ctx.gateway.fund_custody(reserve)?;
            }
            for entry in &exported.providers {
                let shares = &entry.record.pool_share;
                if shares.is_zero() {
                    continue;
                }
                ctx.gateway.mint_share(shares)?;
                ctx.gateway.credit_from_pool(&entry.address, shares)?;
            }
            Ok(())
        })
    }

    /// Credit an external account, outside any ledger operation
    pub fn fund(&mut self, account: &str, coin: &Coin) -> LedgerResult<Address> {
        let account = self.keeper.parse_address(account)?;
        self.bank.fund(&account, coin)?;
        Ok(account)
    }

    /// Run `op` against a branch of the current state; commit on success
    pub fn execute<R, F>(&mut self, op: F) -> LedgerResult<R>
    where
        F: FnOnce(&Keeper<C>, &mut TxContext<'_, MemoryKv, MemoryBank>) -> LedgerResult<R>,
    {
        let mut store = self.store.clone();
        let mut bank = self.bank.clone();
        let result = op(&self.keeper, &mut TxContext::new(&mut store, &mut bank));
        if result.is_ok() {
            self.store = store;
            self.bank = bank;
        }
        result
    }

    /// Apply one message atomically and report its status
    pub fn deliver(&mut self, msg: &Msg) -> Response<Receipt> {
        let response: Response<Receipt> = self
            .execute(|keeper, ctx| keeper.handle(ctx, msg))
            .into();
        match &response.result {
            Ok(_) => info!(op = msg.name(), status = %response.status, "operation committed"),
            Err(err) => warn!(
                op = msg.name(),
                status = %response.status,
                error = %err,
                "operation rolled back"
            ),
        }
        response
    }

    pub fn query(&self, query: &Query) -> Response<QueryResponse> {
        self.keeper.query(&self.store, query).into()
    }

    /// Spendable balance of an account as seen by the ledger
    pub fn balance(&self, account: &str, denom: &str) -> LedgerResult<Amount> {
        let account = self.keeper.parse_address(account)?;
        self.bank
            .spendable_balance(&account, denom)
            .map_err(LedgerError::from)
    }
}
