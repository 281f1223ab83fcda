//! Operation messages and their dispatch

use crate::engine::{DepositReceipt, SwapReceipt, WithdrawReceipt};
use crate::error::{LedgerError, LedgerResult, StatusCode};
use crate::gateway::TransferGateway;
use crate::keeper::{Keeper, TxContext};
use crate::store::KvStore;
use pool_types::{AddressCodec, Coin, Params};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgAddLiquidity {
    pub liquidity_provider: String,
    pub token: Coin,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgSwapLiquidity {
    pub trader: String,
    pub input: Coin,
    pub output: Coin,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgRemoveLiquidity {
    pub liquidity_provider: String,
    pub token: Coin,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgUpdateParams {
    pub authority: String,
    pub params: Params,
}

/// Any state-changing request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Msg {
    #[serde(rename = "deposit")]
    AddLiquidity(MsgAddLiquidity),
    #[serde(rename = "swap")]
    SwapLiquidity(MsgSwapLiquidity),
    #[serde(rename = "withdraw")]
    RemoveLiquidity(MsgRemoveLiquidity),
    UpdateParams(MsgUpdateParams),
}

impl Msg {
    pub fn name(&self) -> &'static str {
        match self {
            Msg::AddLiquidity(_) => "deposit",
            Msg::SwapLiquidity(_) => "swap",
            Msg::RemoveLiquidity(_) => "withdraw",
            Msg::UpdateParams(_) => "update_params",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Receipt {
    Deposit(DepositReceipt),
    Swap(SwapReceipt),
    Withdraw(WithdrawReceipt),
    ParamsUpdated,
}

/// Outcome of one operation: status bucket plus the typed result
#[derive(Debug)]
pub struct Response<T> {
    pub status: StatusCode,
    pub result: LedgerResult<T>,
}

impl<T> Response<T> {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    pub fn error(&self) -> Option<&LedgerError> {
        self.result.as_ref().err()
    }
}

impl<T> From<LedgerResult<T>> for Response<T> {
    fn from(result: LedgerResult<T>) -> Self {
        let status = match &result {
            Ok(_) => StatusCode::Ok,
            Err(err) => err.status(),
        };
        Self { status, result }
    }
}

impl<C: AddressCodec> Keeper<C> {
    /// Route a message to its keeper operation
    pub fn handle<S, G>(&self, ctx: &mut TxContext<'_, S, G>, msg: &Msg) -> LedgerResult<Receipt>
    where
        S: KvStore + ?Sized,
        G: TransferGateway + ?Sized,
    {
        match msg {
            Msg::AddLiquidity(m) => self
                .deposit(ctx, &m.liquidity_provider, &m.token)
                .map(Receipt::Deposit),
            Msg::SwapLiquidity(m) => self
                .swap(ctx, &m.trader, &m.input, &m.output)
                .map(Receipt::Swap),
            Msg::RemoveLiquidity(m) => self
                .withdraw(ctx, &m.liquidity_provider, &m.token)
                .map(Receipt::Withdraw),
            Msg::UpdateParams(m) => self
                .update_params(&mut *ctx.store, &m.authority, m.params.clone())
                .map(|()| Receipt::ParamsUpdated),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Shortfall;

    #[test]
    fn test_msg_json_shape() {
        let msg: Msg = serde_json::from_str(
            r#"{"op":"swap","trader":"cosmos1x","input":{"denom":"ETH","amount":5},"output":{"denom":"WETH","amount":5}}"#,
        )
        .unwrap();
        assert_eq!(msg.name(), "swap");
        assert_eq!(
            msg,
            Msg::SwapLiquidity(MsgSwapLiquidity {
                trader: "cosmos1x".into(),
                input: Coin::new("ETH", 5),
                output: Coin::new("WETH", 5),
            })
        );
    }

    #[test]
    fn test_response_carries_status_bucket() {
        let ok: Response<()> = Ok(()).into();
        assert!(ok.is_success());
        assert_eq!(ok.status.as_u16(), 200);

        let err: Response<()> = Err(LedgerError::InsufficientLiquidity {
            holder: Shortfall::Reserve,
            denom: "WETH".into(),
            available: 0,
            requested: 1,
        })
        .into();
        assert_eq!(err.status, StatusCode::Conflict);
        assert!(err.error().is_some());
    }
}
