//! In-memory bank implementing [`TransferGateway`]

use super::{GatewayError, TransferGateway, POOL_ACCOUNT};
use pool_types::{Address, Amount, Coin};
use std::collections::BTreeMap;

/// Account balances, pool custody and share-token supply held in memory.
/// Cloning yields an independent branch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryBank {
    accounts: BTreeMap<Address, BTreeMap<String, Amount>>,
    custody: BTreeMap<String, Amount>,
    supply: BTreeMap<String, Amount>,
}

impl MemoryBank {
    pub fn new() -> Self {
        Self::default()
    }

    /// Credit an account out of thin air (genesis balances, test setup)
    pub fn fund(&mut self, account: &Address, coin: &Coin) -> Result<(), GatewayError> {
        let balance = self
            .accounts
            .entry(account.clone())
            .or_default()
            .entry(coin.denom.clone())
            .or_default();
        *balance = add(*balance, coin)?;
        Ok(())
    }

    /// Place `coin` directly in pool custody (genesis reserves)
    pub fn fund_custody(&mut self, coin: &Coin) -> Result<(), GatewayError> {
        let custody = add(self.custody(&coin.denom), coin)?;
        self.custody.insert(coin.denom.clone(), custody);
        Ok(())
    }

    pub fn balance(&self, account: &Address, denom: &str) -> Amount {
        self.accounts
            .get(account)
            .and_then(|balances| balances.get(denom))
            .copied()
            .unwrap_or(0)
    }

    /// Amount of `denom` held in pool custody
    pub fn custody(&self, denom: &str) -> Amount {
        self.custody.get(denom).copied().unwrap_or(0)
    }

    /// Outstanding share-token supply
    pub fn supply(&self, denom: &str) -> Amount {
        self.supply.get(denom).copied().unwrap_or(0)
    }
}

fn add(balance: Amount, coin: &Coin) -> Result<Amount, GatewayError> {
    balance
        .checked_add(coin.amount)
        .ok_or_else(|| GatewayError::Overflow {
            denom: coin.denom.clone(),
        })
}

fn sub(balance: Amount, coin: &Coin, account: &str) -> Result<Amount, GatewayError> {
    balance
        .checked_sub(coin.amount)
        .ok_or_else(|| GatewayError::InsufficientFunds {
            account: account.to_string(),
            denom: coin.denom.clone(),
            available: balance,
            requested: coin.amount,
        })
}

impl TransferGateway for MemoryBank {
    fn spendable_balance(&self, account: &Address, denom: &str) -> Result<Amount, GatewayError> {
        Ok(self.balance(account, denom))
    }

    fn debit_to_pool(&mut self, account: &Address, coin: &Coin) -> Result<(), GatewayError> {
        let held = self.balance(account, &coin.denom);
        let remaining = sub(held, coin, account.as_str())?;
        let custody = add(self.custody(&coin.denom), coin)?;

        self.accounts
            .entry(account.clone())
            .or_default()
            .insert(coin.denom.clone(), remaining);
        self.custody.insert(coin.denom.clone(), custody);
        Ok(())
    }

    fn credit_from_pool(&mut self, account: &Address, coin: &Coin) -> Result<(), GatewayError> {
        let custody = sub(self.custody(&coin.denom), coin, POOL_ACCOUNT)?;
        let credited = add(self.balance(account, &coin.denom), coin)?;

        self.custody.insert(coin.denom.clone(), custody);
        self.accounts
            .entry(account.clone())
            .or_default()
            .insert(coin.denom.clone(), credited);
        Ok(())
    }

    fn mint_share(&mut self, coin: &Coin) -> Result<(), GatewayError> {
        let custody = add(self.custody(&coin.denom), coin)?;
        let supply = add(self.supply(&coin.denom), coin)?;
        self.custody.insert(coin.denom.clone(), custody);
        self.supply.insert(coin.denom.clone(), supply);
        Ok(())
    }

    fn burn_share(&mut self, coin: &Coin) -> Result<(), GatewayError> {
        let custody = sub(self.custody(&coin.denom), coin, POOL_ACCOUNT)?;
        let supply = sub(self.supply(&coin.denom), coin, POOL_ACCOUNT)?;
        self.custody.insert(coin.denom.clone(), custody);
        self.supply.insert(coin.denom.clone(), supply);
        Ok(())
    }
}
