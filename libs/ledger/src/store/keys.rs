//! Store layout

use super::{Item, Map};
use pool_types::{Coin, LiquidityProvider, Params, PoolState};

pub const PARAMS: Item<Params> = Item::new(0, "params");
pub const POOL: Item<PoolState> = Item::new(1, "pool");
/// Keyed by provider address
pub const LIQUIDITY_PROVIDERS: Map<LiquidityProvider> = Map::new(2, "liquidity_providers");
/// Keyed by denomination
pub const COINS_RESERVE: Map<Coin> = Map::new(3, "coins_reserve");
