//! `getTransaction` result.
//!
//! The server payload decodes into [`ConfirmedTransaction`]. The caller's
//! sender/recipient addresses live in a separate [`TransferContext`], and
//! [`TransactionResult`] combines the two, deriving how many lamports each
//! address moved.
//!
//! Construction runs in two phases. Field checks come first
//! ([`validate_balance_lengths`]); derived values are computed afterwards
//! ([`balance_deltas`], [`ConfirmedTransaction::lamports_moved`]) and never
//! recomputed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::display_as_json;
use crate::common::error::ModelError;

/// Checks that both balance lists describe the same accounts.
///
/// # Errors
///
/// Returns [`ModelError::BalanceLengthMismatch`] when the lengths differ.
pub fn validate_balance_lengths(pre: &[u64], post: &[u64]) -> Result<(), ModelError> {
    if pre.len() != post.len() {
        return Err(ModelError::BalanceLengthMismatch {
            pre: pre.len(),
            post: post.len(),
        });
    }
    Ok(())
}

/// Per-account balance change, `post[i] - pre[i]`.
///
/// Callers validate lengths first; extra elements on either side are ignored.
#[must_use]
pub fn balance_deltas(pre: &[u64], post: &[u64]) -> Vec<i128> {
    pre.iter()
        .zip(post)
        .map(|(&pre, &post)| i128::from(post) - i128::from(pre))
        .collect()
}

/// Transaction status metadata as sent by the server, before validation.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTransactionMeta {
    pub pre_balances: Vec<u64>,
    pub post_balances: Vec<u64>,
    #[serde(default)]
    pub fee: Option<u64>,
    #[serde(default)]
    pub err: Option<Value>,
}

/// Validated transaction metadata. Balances are in lamports, one entry per
/// account key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawTransactionMeta")]
pub struct TransactionMeta {
    pre_balances: Vec<u64>,
    post_balances: Vec<u64>,
    delta_balances: Vec<i128>,
    #[serde(skip_serializing_if = "Option::is_none")]
    fee: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    err: Option<Value>,
}

impl TransactionMeta {
    /// Validates the balance lists, then computes the deltas.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::BalanceLengthMismatch`] when `pre_balances` and
    /// `post_balances` differ in length.
    pub fn new(pre_balances: Vec<u64>, post_balances: Vec<u64>) -> Result<Self, ModelError> {
        validate_balance_lengths(&pre_balances, &post_balances)?;
        let delta_balances = balance_deltas(&pre_balances, &post_balances);

        Ok(Self {
            pre_balances,
            post_balances,
            delta_balances,
            fee: None,
            err: None,
        })
    }

    #[must_use]
    pub fn pre_balances(&self) -> &[u64] {
        &self.pre_balances
    }

    #[must_use]
    pub fn post_balances(&self) -> &[u64] {
        &self.post_balances
    }

    /// `post - pre` for every account, computed once at construction.
    #[must_use]
    pub fn delta_balances(&self) -> &[i128] {
        &self.delta_balances
    }

    /// Fee paid in lamports, when the server reported it.
    #[must_use]
    pub fn fee(&self) -> Option<u64> {
        self.fee
    }

    /// The transaction error, if it failed on-chain.
    #[must_use]
    pub fn err(&self) -> Option<&Value> {
        self.err.as_ref()
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.err.is_none()
    }
}

impl TryFrom<RawTransactionMeta> for TransactionMeta {
    type Error = ModelError;

    fn try_from(raw: RawTransactionMeta) -> Result<Self, Self::Error> {
        let mut meta = Self::new(raw.pre_balances, raw.post_balances)?;
        meta.fee = raw.fee;
        meta.err = raw.err.filter(|e| !e.is_null());
        Ok(meta)
    }
}

/// Account key as sent by the server: a bare string for `json`, an object
/// for `jsonParsed`.
#[derive(Deserialize)]
#[serde(untagged)]
enum WireAccountKey {
    Plain(String),
    Parsed { pubkey: String },
}

fn deserialize_account_keys<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let keys = Vec::<WireAccountKey>::deserialize(deserializer)?;
    Ok(keys
        .into_iter()
        .map(|key| match key {
            WireAccountKey::Plain(pubkey) | WireAccountKey::Parsed { pubkey } => pubkey,
        })
        .collect())
}

/// Transaction message. Only the account list is modelled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionMessage {
    /// Addresses referenced by the transaction, aligned with the balance lists.
    #[serde(deserialize_with = "deserialize_account_keys")]
    pub account_keys: Vec<String>,
}

/// The `transaction` member of a `getTransaction` result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionEnvelope {
    #[serde(default)]
    pub signatures: Vec<String>,
    pub message: TransactionMessage,
}

/// A confirmed transaction exactly as the server describes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmedTransaction {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slot: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_time: Option<i64>,
    pub meta: TransactionMeta,
    pub transaction: TransactionEnvelope,
}

impl ConfirmedTransaction {
    #[must_use]
    pub fn account_keys(&self) -> &[String] {
        &self.transaction.message.account_keys
    }

    fn balance_index(&self, address: &str) -> Option<usize> {
        let index = self.account_keys().iter().position(|key| key == address)?;
        let in_bounds =
            index < self.meta.pre_balances.len() && index < self.meta.post_balances.len();
        in_bounds.then_some(index)
    }

    /// Signed balance change of `address`, if it is one of the account keys.
    #[must_use]
    pub fn delta_for(&self, address: &str) -> Option<i128> {
        self.balance_index(address)
            .and_then(|i| self.meta.delta_balances.get(i).copied())
    }

    /// Unsigned number of lamports `address` gained or lost.
    ///
    /// `None` if the address is not an account key or its index has no
    /// balance entry.
    #[must_use]
    pub fn lamports_moved(&self, address: &str) -> Option<u64> {
        let i = self.balance_index(address)?;
        Some(self.meta.post_balances[i].abs_diff(self.meta.pre_balances[i]))
    }
}

/// Addresses the caller wants transfer amounts for. Never sent to the server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferContext {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_address: Option<String>,
}

impl TransferContext {
    #[must_use]
    pub fn new(from_address: Option<String>, to_address: Option<String>) -> Self {
        Self {
            from_address,
            to_address,
        }
    }
}

/// A confirmed transaction plus the transfer amounts derived for the caller's
/// addresses.
///
/// `sol_received` is the absolute balance change of `to_address` and
/// `sol_sent` that of `from_address`, both in lamports. The sign is dropped;
/// the field an amount lands in is what says which way it went.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionResult {
    #[serde(flatten)]
    transaction: ConfirmedTransaction,
    #[serde(flatten)]
    context: TransferContext,
    #[serde(skip_serializing_if = "Option::is_none")]
    sol_received: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    sol_sent: Option<u64>,
}

impl TransactionResult {
    /// Composes a validated transaction with the caller's context.
    ///
    /// Lookups are best-effort: an unknown or out-of-range address leaves the
    /// amount unset.
    #[must_use]
    pub fn new(transaction: ConfirmedTransaction, context: TransferContext) -> Self {
        let sol_received = context
            .to_address
            .as_deref()
            .and_then(|addr| transaction.lamports_moved(addr));
        let sol_sent = context
            .from_address
            .as_deref()
            .and_then(|addr| transaction.lamports_moved(addr));

        Self {
            transaction,
            context,
            sol_received,
            sol_sent,
        }
    }

    #[must_use]
    pub fn transaction(&self) -> &ConfirmedTransaction {
        &self.transaction
    }

    #[must_use]
    pub fn meta(&self) -> &TransactionMeta {
        &self.transaction.meta
    }

    #[must_use]
    pub fn message(&self) -> &TransactionMessage {
        &self.transaction.transaction.message
    }

    #[must_use]
    pub fn context(&self) -> &TransferContext {
        &self.context
    }

    #[must_use]
    pub fn from_address(&self) -> Option<&str> {
        self.context.from_address.as_deref()
    }

    #[must_use]
    pub fn to_address(&self) -> Option<&str> {
        self.context.to_address.as_deref()
    }

    /// Lamports received by `to_address`.
    #[must_use]
    pub fn sol_received(&self) -> Option<u64> {
        self.sol_received
    }

    /// Lamports sent by `from_address`.
    #[must_use]
    pub fn sol_sent(&self) -> Option<u64> {
        self.sol_sent
    }

    /// Block time as a UTC timestamp.
    #[must_use]
    pub fn block_time_utc(&self) -> Option<DateTime<Utc>> {
        self.transaction
            .block_time
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
    }

    /// Signed balance change of any account key.
    #[must_use]
    pub fn delta_for(&self, address: &str) -> Option<i128> {
        self.transaction.delta_for(address)
    }
}

display_as_json!(TransactionMeta, ConfirmedTransaction, TransactionResult);
