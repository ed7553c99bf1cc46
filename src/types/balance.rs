//! `getBalance` result.

use serde::{Deserialize, Serialize};
use solana_sdk::native_token::lamports_to_sol;

use super::{RpcContext, display_as_json};

/// Account balance in lamports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<RpcContext>,
    pub value: u64,
}

impl BalanceResult {
    /// The balance in whole SOL.
    #[must_use]
    pub fn sol(&self) -> f64 {
        lamports_to_sol(self.value)
    }
}

display_as_json!(BalanceResult);
