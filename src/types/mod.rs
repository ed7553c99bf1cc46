//! Validated result models for each supported RPC method.
//!
//! Models decode from the server's wire casing, check their invariants while
//! decoding, and serialise back to the same casing. `Display` renders pretty
//! JSON.

pub mod balance;
pub mod token_accounts;
pub mod transaction;

use serde::{Deserialize, Serialize};
use serde_json::Number;

use crate::common::error::ModelError;

pub use balance::BalanceResult;
pub use token_accounts::{
    AccountInfo, OwnedTokenAccount, ParsedTokenAmount, RawTokenAccount, RawTokenAccountsResult,
    TokenAccount, TokenAccountsByOwnerResult, TokenAccountsResult,
};
pub use transaction::{
    ConfirmedTransaction, RawTransactionMeta, TransactionEnvelope, TransactionMessage,
    TransactionMeta, TransactionResult, TransferContext, balance_deltas,
    validate_balance_lengths,
};

/// Slot context attached to most Solana RPC results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcContext {
    pub slot: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_version: Option<String>,
}

/// Reads a JSON number as a non-negative integer.
pub(crate) fn non_negative(field: &'static str, value: &Number) -> Result<u64, ModelError> {
    if let Some(v) = value.as_u64() {
        return Ok(v);
    }
    if value.as_i64().is_some() || value.as_f64().is_some_and(|f| f < 0.0) {
        return Err(ModelError::Negative {
            field,
            value: value.to_string(),
        });
    }
    Err(ModelError::NotAnInteger {
        field,
        value: value.to_string(),
    })
}

/// Implements `Display` as pretty-printed JSON.
macro_rules! display_as_json {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl std::fmt::Display for $ty {
                fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                    let json = serde_json::to_string_pretty(self).map_err(|_| std::fmt::Error)?;
                    f.write_str(&json)
                }
            }
        )+
    };
}

pub(crate) use display_as_json;

display_as_json!(RpcContext);
