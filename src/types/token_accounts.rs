//! Token account results: `getTokenAccounts` and `getTokenAccountsByOwner`.

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

use super::{RpcContext, display_as_json, non_negative};
use crate::common::error::ModelError;

/// A token account as returned by `getTokenAccounts`, before validation.
#[derive(Debug, Clone, Deserialize)]
pub struct RawTokenAccount {
    pub address: String,
    pub mint: String,
    pub owner: String,
    pub amount: Number,
    #[serde(alias = "delegatedAmount")]
    pub delegated_amount: Number,
    pub frozen: bool,
}

/// A validated token account. Amounts are in the token's base units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawTokenAccount")]
pub struct TokenAccount {
    pub address: String,
    pub mint: String,
    pub owner: String,
    pub amount: u64,
    pub delegated_amount: u64,
    pub frozen: bool,
}

impl TryFrom<RawTokenAccount> for TokenAccount {
    type Error = ModelError;

    fn try_from(raw: RawTokenAccount) -> Result<Self, Self::Error> {
        Ok(Self {
            amount: non_negative("amount", &raw.amount)?,
            delegated_amount: non_negative("delegated_amount", &raw.delegated_amount)?,
            address: raw.address,
            mint: raw.mint,
            owner: raw.owner,
            frozen: raw.frozen,
        })
    }
}

/// A `getTokenAccounts` page, before validation.
#[derive(Debug, Clone, Deserialize)]
pub struct RawTokenAccountsResult {
    pub total: Number,
    pub limit: Number,
    #[serde(default)]
    pub cursor: Option<String>,
    #[serde(alias = "tokenAccounts", alias = "accounts")]
    pub token_accounts: Vec<TokenAccount>,
}

/// One page of token accounts owned by a wallet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawTokenAccountsResult")]
pub struct TokenAccountsResult {
    pub total: u64,
    pub limit: u64,
    pub cursor: Option<String>,
    pub token_accounts: Vec<TokenAccount>,
}

impl TryFrom<RawTokenAccountsResult> for TokenAccountsResult {
    type Error = ModelError;

    fn try_from(raw: RawTokenAccountsResult) -> Result<Self, Self::Error> {
        Ok(Self {
            total: non_negative("total", &raw.total)?,
            limit: non_negative("limit", &raw.limit)?,
            cursor: raw.cursor,
            token_accounts: raw.token_accounts,
        })
    }
}

impl TokenAccountsResult {
    /// True when the server returned no cursor to continue from.
    #[must_use]
    pub fn is_last_page(&self) -> bool {
        self.cursor.is_none()
    }

    /// Accounts holding a non-zero balance.
    pub fn non_zero_accounts(&self) -> impl Iterator<Item = &TokenAccount> {
        self.token_accounts.iter().filter(|a| a.amount > 0)
    }
}

/// `getTokenAccountsByOwner` result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenAccountsByOwnerResult {
    pub context: RpcContext,
    pub value: Vec<OwnedTokenAccount>,
}

/// A token account entry keyed by its address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OwnedTokenAccount {
    pub pubkey: String,
    pub account: AccountInfo,
}

/// On-chain account info. `data` depends on the requested encoding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountInfo {
    pub lamports: u64,
    pub owner: String,
    pub executable: bool,
    pub rent_epoch: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub space: Option<u64>,
    pub data: Value,
}

/// Token balance pulled out of `jsonParsed` account data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedTokenAmount {
    pub mint: String,
    pub owner: String,
    pub amount: u64,
    pub decimals: u8,
    pub ui_amount_string: String,
}

impl AccountInfo {
    /// Extracts the token balance from `jsonParsed` data.
    ///
    /// Returns `None` for binary encodings or non-token accounts.
    #[must_use]
    pub fn parsed_token(&self) -> Option<ParsedTokenAmount> {
        let info = self.data.get("parsed")?.get("info")?;
        let token_amount = info.get("tokenAmount")?;

        Some(ParsedTokenAmount {
            mint: info.get("mint")?.as_str()?.to_string(),
            owner: info.get("owner")?.as_str()?.to_string(),
            amount: token_amount.get("amount")?.as_str()?.parse().ok()?,
            decimals: u8::try_from(token_amount.get("decimals")?.as_u64()?).ok()?,
            ui_amount_string: token_amount
                .get("uiAmountString")?
                .as_str()?
                .to_string(),
        })
    }
}

display_as_json!(TokenAccount, TokenAccountsResult, TokenAccountsByOwnerResult);
