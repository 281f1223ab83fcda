//! # Keeper
//!
//! Binds the pure [`engine`](crate::engine) to a [`KvStore`] and a
//! [`TransferGateway`]. Each operation:
//!
//! 1. runs the request checks that need no state,
//! 2. validates the caller's address through the configured [`AddressCodec`],
//! 3. loads the aggregates it needs,
//! 4. asks the engine for a [`Transition`],
//! 5. writes the records back and replays the transfer intents.
//!
//! Steps 1-4 never mutate anything. Step 5 can still fail inside the gateway;
//! discarding the partial writes is the host's job (see
//! [`MemoryHost`](crate::host::MemoryHost)).

use crate::engine::{
    self, DepositReceipt, ProviderUpdate, SwapReceipt, Transition, WithdrawReceipt,
};
use crate::error::{Entity, LedgerError, LedgerResult};
use crate::gateway::TransferGateway;
use crate::genesis::{GenesisState, ProviderEntry};
use crate::store::keys::{COINS_RESERVE, LIQUIDITY_PROVIDERS, PARAMS, POOL};
use crate::store::KvStore;
use pool_types::{Address, AddressCodec, Bech32Codec, Coin, Params, PoolState};
use tracing::{debug, info, warn};

/// Store and gateway of one invocation
pub struct TxContext<'a, S: ?Sized, G: ?Sized> {
    pub store: &'a mut S,
    pub gateway: &'a mut G,
}

impl<'a, S: KvStore + ?Sized, G: TransferGateway + ?Sized> TxContext<'a, S, G> {
    pub fn new(store: &'a mut S, gateway: &'a mut G) -> Self {
        Self { store, gateway }
    }
}

#[derive(Debug, Clone)]
pub struct Keeper<C = Bech32Codec> {
    codec: C,
    authority: Address,
}

impl<C: AddressCodec> Keeper<C> {
    /// Fails when `authority` is not an address the codec accepts
    pub fn new(codec: C, authority: &str) -> LedgerResult<Self> {
        let authority = codec
            .validate(authority)
            .map_err(LedgerError::InvalidAuthority)?;
        Ok(Self { codec, authority })
    }

    pub fn authority(&self) -> &Address {
        &self.authority
    }

    pub fn codec(&self) -> &C {
        &self.codec
    }

    pub(crate) fn parse_address(&self, text: &str) -> LedgerResult<Address> {
        self.codec
            .validate(text)
            .map_err(|source| LedgerError::InvalidProviderAddress {
                address: text.to_string(),
                source,
            })
    }

    fn require_pool<S: KvStore + ?Sized>(store: &S) -> LedgerResult<PoolState> {
        POOL.get(store)?.ok_or(LedgerError::PoolNotInitialized)
    }

    fn require_params<S: KvStore + ?Sized>(store: &S) -> LedgerResult<Params> {
        PARAMS
            .get(store)?
            .ok_or_else(|| LedgerError::Invariant("pool exists without params".to_string()))
    }

    /// Add liquidity on behalf of `provider`
    pub fn deposit<S, G>(
        &self,
        ctx: &mut TxContext<'_, S, G>,
        provider: &str,
        token: &Coin,
    ) -> LedgerResult<DepositReceipt>
    where
        S: KvStore + ?Sized,
        G: TransferGateway + ?Sized,
    {
        engine::require_nonzero(token)?;
        let provider = self.parse_address(provider)?;
        let pool = Self::require_pool(&*ctx.store)?;
        let params = Self::require_params(&*ctx.store)?;

        let record = LIQUIDITY_PROVIDERS.get(&*ctx.store, provider.as_str())?;
        let reserve = COINS_RESERVE.get(&*ctx.store, &token.denom)?;

        let transition = engine::deposit(&pool, &params, &provider, record, reserve, token)?;
        let receipt = Self::apply(ctx, transition)?;

        info!(
            provider = %provider,
            token = %token,
            minted = %receipt.minted,
            settled_fees = receipt.settled_fees,
            "liquidity added"
        );
        Ok(receipt)
    }

    /// Exchange `input` for `output` at 1:1 minus the swap fee
    pub fn swap<S, G>(
        &self,
        ctx: &mut TxContext<'_, S, G>,
        trader: &str,
        input: &Coin,
        output: &Coin,
    ) -> LedgerResult<SwapReceipt>
    where
        S: KvStore + ?Sized,
        G: TransferGateway + ?Sized,
    {
        engine::require_nonzero(input)?;
        engine::require_equal_amounts(input, output)?;
        let trader = self.parse_address(trader)?;
        let pool = Self::require_pool(&*ctx.store)?;
        let params = Self::require_params(&*ctx.store)?;

        let balance = ctx.gateway.spendable_balance(&trader, &input.denom)?;
        let input_reserve = COINS_RESERVE.get(&*ctx.store, &input.denom)?;
        let output_reserve = COINS_RESERVE.get(&*ctx.store, &output.denom)?;

        let transition = engine::swap(
            &pool,
            &params,
            &trader,
            balance,
            input_reserve,
            output_reserve,
            input,
            output,
        )?;
        let receipt = Self::apply(ctx, transition)?;

        info!(
            trader = %trader,
            input = %input,
            payout = %receipt.payout,
            swap_fee = receipt.swap_fee,
            "liquidity swapped"
        );
        Ok(receipt)
    }

    /// Remove `token` of deposited stake and pay out settled fees
    pub fn withdraw<S, G>(
        &self,
        ctx: &mut TxContext<'_, S, G>,
        provider: &str,
        token: &Coin,
    ) -> LedgerResult<WithdrawReceipt>
    where
        S: KvStore + ?Sized,
        G: TransferGateway + ?Sized,
    {
        engine::require_nonzero(token)?;
        let provider = self.parse_address(provider)?;
        let pool = Self::require_pool(&*ctx.store)?;

        let record = LIQUIDITY_PROVIDERS
            .get(&*ctx.store, provider.as_str())?
            .ok_or_else(|| LedgerError::NotFound(Entity::Provider(provider.clone())))?;
        let reserve = COINS_RESERVE.get(&*ctx.store, &token.denom)?;

        let transition = engine::withdraw(&pool, &provider, record, reserve, token)?;
        let receipt = Self::apply(ctx, transition)?;

        info!(
            provider = %provider,
            paid = %receipt.paid,
            burned = %receipt.burned,
            fees_paid = receipt.fees_paid,
            closed = receipt.closed,
            "liquidity removed"
        );
        Ok(receipt)
    }

    /// Replace params wholesale. Only the configured authority may call this.
    pub fn update_params<S: KvStore + ?Sized>(
        &self,
        store: &mut S,
        authority: &str,
        params: Params,
    ) -> LedgerResult<()> {
        let caller = self
            .codec
            .validate(authority)
            .map_err(LedgerError::InvalidAuthority)?;
        if !caller
            .as_str()
            .eq_ignore_ascii_case(self.authority.as_str())
        {
            warn!(got = %caller, "params update from foreign authority");
            return Err(LedgerError::Unauthorized {
                got: caller.into_inner(),
                want: self.authority.to_string(),
            });
        }
        params.validate()?;

        PARAMS.set(store, &params)?;
        if let Some(mut pool) = POOL.get(&*store)? {
            pool.decimals = params.decimals;
            pool.swap_fee_percentage = params.swap_fee_percentage;
            POOL.set(store, &pool)?;
        }

        info!(
            decimals = params.decimals,
            swap_fee_percentage = params.swap_fee_percentage,
            whitelisted = params.whitelisted_coins.len(),
            "params updated"
        );
        Ok(())
    }

    /// Load a validated genesis document into an empty store
    pub fn init_genesis<S: KvStore + ?Sized>(
        &self,
        store: &mut S,
        genesis: &GenesisState,
    ) -> LedgerResult<()> {
        genesis.validate()?;
        for entry in &genesis.providers {
            self.parse_address(entry.address.as_str())?;
        }

        PARAMS.set(store, &genesis.params)?;
        let pool = genesis
            .pool
            .clone()
            .unwrap_or_else(|| PoolState::from_params(&genesis.params));
        POOL.set(store, &pool)?;

        let reserves = if genesis.reserves.is_empty() {
            &genesis.params.whitelisted_coins
        } else {
            &genesis.reserves
        };
        for reserve in reserves {
            COINS_RESERVE.set(store, &reserve.denom, reserve)?;
        }
        for entry in &genesis.providers {
            LIQUIDITY_PROVIDERS.set(store, entry.address.as_str(), &entry.record)?;
        }

        info!(
            reserves = reserves.len(),
            providers = genesis.providers.len(),
            total_liquidity = pool.total_liquidity,
            "genesis initialized"
        );
        Ok(())
    }

    pub fn export_genesis<S: KvStore + ?Sized>(&self, store: &S) -> LedgerResult<GenesisState> {
        let params = PARAMS
            .get(store)?
            .ok_or(LedgerError::NotFound(Entity::Params))?;
        let pool = POOL.get(store)?;
        let reserves = COINS_RESERVE
            .entries(store)?
            .into_iter()
            .map(|(_, coin)| coin)
            .collect();
        let providers = LIQUIDITY_PROVIDERS
            .entries(store)?
            .into_iter()
            .map(|(address, record)| {
                Ok(ProviderEntry {
                    address: self.parse_address(&address)?,
                    record,
                })
            })
            .collect::<LedgerResult<Vec<_>>>()?;

        Ok(GenesisState {
            params,
            pool,
            reserves,
            providers,
        })
    }

    fn apply<S, G, R>(ctx: &mut TxContext<'_, S, G>, transition: Transition<R>) -> LedgerResult<R>
    where
        S: KvStore + ?Sized,
        G: TransferGateway + ?Sized,
    {
        let Transition {
            writes,
            transfers,
            receipt,
        } = transition;

        POOL.set(&mut *ctx.store, &writes.pool)?;
        for reserve in &writes.reserves {
            COINS_RESERVE.set(&mut *ctx.store, &reserve.denom, reserve)?;
        }
        match writes.provider {
            Some((address, ProviderUpdate::Set(record))) => {
                LIQUIDITY_PROVIDERS.set(&mut *ctx.store, address.as_str(), &record)?
            }
            Some((address, ProviderUpdate::Remove)) => {
                LIQUIDITY_PROVIDERS.remove(&mut *ctx.store, address.as_str())?
            }
            None => {}
        }

        for intent in &transfers {
            debug!(%intent, "executing transfer");
            intent.execute(&mut *ctx.gateway)?;
        }
        Ok(receipt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ErrorKind, Shortfall};
    use crate::gateway::MemoryBank;
    use crate::store::MemoryKv;

    fn keeper() -> Keeper {
        let codec = Bech32Codec::new("cosmos");
        let authority = codec.encode(&[9; 20]).unwrap();
        Keeper::new(codec, authority.as_str()).unwrap()
    }

    fn addr(keeper: &Keeper, seed: u8) -> String {
        keeper.codec().encode(&[seed; 20]).unwrap().into_inner()
    }

    fn setup() -> (Keeper, MemoryKv, MemoryBank) {
        let keeper = keeper();
        let mut store = MemoryKv::new();
        keeper
            .init_genesis(&mut store, &GenesisState::new(Params::default()))
            .unwrap();
        (keeper, store, MemoryBank::new())
    }

    #[test]
    fn test_new_rejects_malformed_authority() {
        let err = Keeper::new(Bech32Codec::new("cosmos"), "not-an-address").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unauthorized);
    }

    #[test]
    fn test_deposit_before_genesis_is_pool_not_initialized() {
        let keeper = keeper();
        let provider = addr(&keeper, 1);
        let mut store = MemoryKv::new();
        let mut bank = MemoryBank::new();
        let mut ctx = TxContext::new(&mut store, &mut bank);
        let err = keeper
            .deposit(&mut ctx, &provider, &Coin::new("ETH", 1))
            .unwrap_err();
        assert!(matches!(err, LedgerError::PoolNotInitialized));
    }

    #[test]
    fn test_zero_amount_is_checked_before_address() {
        let (keeper, mut store, mut bank) = setup();
        let mut ctx = TxContext::new(&mut store, &mut bank);
        let err = keeper
            .deposit(&mut ctx, "garbage", &Coin::new("ETH", 0))
            .unwrap_err();
        assert!(matches!(err, LedgerError::ZeroAmount));

        let err = keeper
            .deposit(&mut ctx, "garbage", &Coin::new("ETH", 1))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidProviderAddress);
    }

    #[test]
    fn test_deposit_writes_records_and_moves_funds() {
        let (keeper, mut store, mut bank) = setup();
        let provider = addr(&keeper, 1);
        let account = keeper.parse_address(&provider).unwrap();
        bank.fund(&account, &Coin::new("ETH", 100)).unwrap();

        let mut ctx = TxContext::new(&mut store, &mut bank);
        keeper
            .deposit(&mut ctx, &provider, &Coin::new("ETH", 100))
            .unwrap();

        let record = LIQUIDITY_PROVIDERS.get(&store, &provider).unwrap().unwrap();
        assert_eq!(record.pool_share, Coin::new("USDT", 100));
        assert_eq!(POOL.get(&store).unwrap().unwrap().total_liquidity, 100);
        assert_eq!(bank.balance(&account, "ETH"), 0);
        assert_eq!(bank.balance(&account, "USDT"), 100);
        assert_eq!(bank.custody("ETH"), 100);
        assert_eq!(bank.supply("USDT"), 100);
    }

    #[test]
    fn test_withdraw_without_record_is_not_found() {
        let (keeper, mut store, mut bank) = setup();
        let provider = addr(&keeper, 1);
        let mut ctx = TxContext::new(&mut store, &mut bank);
        let err = keeper
            .withdraw(&mut ctx, &provider, &Coin::new("ETH", 1))
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_swap_reports_trader_shortfall() {
        let (keeper, mut store, mut bank) = setup();
        let trader = addr(&keeper, 2);
        let mut ctx = TxContext::new(&mut store, &mut bank);
        let err = keeper
            .swap(
                &mut ctx,
                &trader,
                &Coin::new("ETH", 5),
                &Coin::new("WETH", 5),
            )
            .unwrap_err();
        assert!(matches!(
            err,
            LedgerError::InsufficientLiquidity {
                holder: Shortfall::Trader,
                ..
            }
        ));
    }

    #[test]
    fn test_update_params_refreshes_pool_fee_but_not_share_token() {
        let (keeper, mut store, _) = setup();
        let authority = keeper.authority().to_string();
        let params = Params {
            decimals: 2,
            swap_fee_percentage: 500,
            share_token: Coin::new("LPT", 0),
            ..Params::default()
        };
        keeper
            .update_params(&mut store, &authority.to_uppercase(), params.clone())
            .unwrap();

        assert_eq!(PARAMS.get(&store).unwrap(), Some(params));
        let pool = POOL.get(&store).unwrap().unwrap();
        assert_eq!(pool.decimals, 2);
        assert_eq!(pool.swap_fee_percentage, 500);
        assert_eq!(pool.share_denom(), "USDT");
    }

    #[test]
    fn test_update_params_rejects_other_signers() {
        let (keeper, mut store, _) = setup();
        let other = addr(&keeper, 3);
        let err = keeper
            .update_params(&mut store, &other, Params::default())
            .unwrap_err();
        assert!(matches!(err, LedgerError::Unauthorized { .. }));

        let err = keeper
            .update_params(&mut store, "cosmos1bad", Params::default())
            .unwrap_err();
        assert!(matches!(err, LedgerError::InvalidAuthority(_)));
    }

    #[test]
    fn test_genesis_round_trip() {
        let (keeper, store, _) = setup();
        let exported = keeper.export_genesis(&store).unwrap();
        assert_eq!(exported.reserves.len(), 3);

        let mut fresh = MemoryKv::new();
        keeper.init_genesis(&mut fresh, &exported).unwrap();
        assert_eq!(fresh, store);
    }
}
