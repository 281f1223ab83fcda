//! Read-only queries
//!
//! Absent records are reported as [`LedgerError::NotFound`], never as a
//! zero-valued default.

use crate::error::{Entity, LedgerError, LedgerResult};
use crate::keeper::Keeper;
use crate::store::keys::{COINS_RESERVE, LIQUIDITY_PROVIDERS, PARAMS, POOL};
use crate::store::KvStore;
use pool_types::{AddressCodec, Coin, LiquidityProvider, Params, PoolState};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Query requests accepted by [`Keeper::query`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "query", rename_all = "snake_case")]
pub enum Query {
    Params,
    Pool,
    LiquidityProvider { address: String },
    CoinReserve { denom: String },
    CoinReserves,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryResponse {
    Params(Params),
    Pool(PoolState),
    LiquidityProvider(LiquidityProvider),
    CoinReserve(Coin),
    CoinReserves(Vec<Coin>),
}

impl<C: AddressCodec> Keeper<C> {
    pub fn params<S: KvStore + ?Sized>(&self, store: &S) -> LedgerResult<Params> {
        PARAMS
            .get(store)?
            .ok_or(LedgerError::NotFound(Entity::Params))
    }

    pub fn pool<S: KvStore + ?Sized>(&self, store: &S) -> LedgerResult<PoolState> {
        POOL.get(store)?.ok_or(LedgerError::NotFound(Entity::Pool))
    }

    pub fn liquidity_provider<S: KvStore + ?Sized>(
        &self,
        store: &S,
        address: &str,
    ) -> LedgerResult<LiquidityProvider> {
        let address = self.parse_address(address)?;
        LIQUIDITY_PROVIDERS
            .get(store, address.as_str())?
            .ok_or(LedgerError::NotFound(Entity::Provider(address)))
    }

    pub fn coin_reserve<S: KvStore + ?Sized>(&self, store: &S, denom: &str) -> LedgerResult<Coin> {
        COINS_RESERVE
            .get(store, denom)?
            .ok_or_else(|| LedgerError::NotFound(Entity::Reserve(denom.to_string())))
    }

    /// Reserve of every whitelisted denomination, in whitelist order.
    /// Fails on the first denomination without a reserve entry.
    pub fn coin_reserves<S: KvStore + ?Sized>(&self, store: &S) -> LedgerResult<Vec<Coin>> {
        let params = self.params(store)?;
        params
            .whitelisted_denoms()
            .map(|denom| self.coin_reserve(store, denom))
            .collect()
    }

    pub fn query<S: KvStore + ?Sized>(&self, store: &S, query: &Query) -> LedgerResult<QueryResponse> {
        debug!(?query, "serving query");
        Ok(match query {
            Query::Params => QueryResponse::Params(self.params(store)?),
            Query::Pool => QueryResponse::Pool(self.pool(store)?),
            Query::LiquidityProvider { address } => {
                QueryResponse::LiquidityProvider(self.liquidity_provider(store, address)?)
            }
            Query::CoinReserve { denom } => QueryResponse::CoinReserve(self.coin_reserve(store, denom)?),
            Query::CoinReserves => QueryResponse::CoinReserves(self.coin_reserves(store)?),
        })
    }
}
