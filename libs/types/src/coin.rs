//! Denominated token amounts

use serde::{Deserialize, Serialize};
use std::fmt;

/// Token amount in the asset's smallest unit.
pub type Amount = u128;

/// A denomination paired with an amount
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Coin {
    pub denom: String,
    pub amount: Amount,
}

impl Coin {
    pub fn new(denom: impl Into<String>, amount: Amount) -> Self {
        Self {
            denom: denom.into(),
            amount,
        }
    }

    /// Zero-valued coin of the given denomination
    pub fn zero(denom: impl Into<String>) -> Self {
        Self::new(denom, 0)
    }

    pub fn is_zero(&self) -> bool {
        self.amount == 0
    }

    /// Same denomination, different amount
    pub fn with_amount(&self, amount: Amount) -> Self {
        Self::new(self.denom.clone(), amount)
    }
}

impl fmt::Display for Coin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.denom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_amount_then_denom() {
        assert_eq!(Coin::new("ETH", 100).to_string(), "100ETH");
        assert_eq!(Coin::zero("stkETH").to_string(), "0stkETH");
    }

    #[test]
    fn test_with_amount_keeps_denom() {
        let coin = Coin::new("WETH", 7);
        let other = coin.with_amount(42);
        assert_eq!(other.denom, "WETH");
        assert_eq!(other.amount, 42);
        assert!(!other.is_zero());
    }
}
