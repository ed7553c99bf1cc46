//! JSON-RPC envelopes and per-method request builders.
//!
//! Each supported method is a small request struct implementing [`RpcMethod`]:
//! it checks its own arguments, renders its `params`, and turns the response's
//! `result` into a validated model.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::common::error::{Result, SolanaRpcError};
use crate::config::{CommitmentLevel, Encoding};
use crate::types::{
    BalanceResult, ConfirmedTransaction, TokenAccountsByOwnerResult, TokenAccountsResult,
    TransactionResult, TransferContext,
};

/// JSON-RPC protocol version sent with every request.
pub const JSONRPC_VERSION: &str = "2.0";

/// Request id. Calls are not pipelined, so one fixed id is enough.
pub const REQUEST_ID: u64 = 1;

/// Shortest string accepted as a transaction signature.
pub const MIN_SIGNATURE_LEN: usize = 20;

/// Default page size for `getTokenAccounts`.
pub const DEFAULT_TOKEN_ACCOUNTS_LIMIT: u32 = 10;

/// Outgoing JSON-RPC envelope.
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcRequest<'a> {
    pub jsonrpc: &'static str,
    pub id: u64,
    pub method: &'a str,
    pub params: Value,
}

impl<'a> JsonRpcRequest<'a> {
    #[must_use]
    pub fn new(method: &'a str, params: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            id: REQUEST_ID,
            method,
            params,
        }
    }
}

/// Incoming JSON-RPC envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct JsonRpcResponse {
    #[serde(default)]
    pub jsonrpc: Option<String>,
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub error: Option<Value>,
}

impl JsonRpcResponse {
    /// Surfaces a top-level `error` as [`SolanaRpcError::RpcError`], otherwise
    /// yields the `result` member (`None` when absent or null).
    ///
    /// # Errors
    ///
    /// Returns [`SolanaRpcError::RpcError`] when the response carries an error.
    pub fn into_result(self) -> Result<Option<Value>> {
        if let Some(error) = &self.error {
            return Err(SolanaRpcError::from_rpc_error_value(error));
        }
        Ok(self.result)
    }
}

/// A typed RPC method.
pub trait RpcMethod {
    /// Wire name of the method.
    const METHOD: &'static str;

    /// Validated result type.
    type Output;

    /// Checks arguments locally. Runs before any network call.
    fn validate(&self) -> Result<()>;

    /// Renders the `params` member.
    fn params(&self) -> Value;

    /// Builds the output from the response's `result` member.
    fn parse_result(&self, result: Option<Value>) -> Result<Self::Output>;
}

fn require_address(field: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(SolanaRpcError::InvalidInput(format!(
            "{field} must be a non-empty address"
        )));
    }
    Ok(())
}

/// Decodes `result` into a model, reporting shape and invariant failures as
/// [`SolanaRpcError::ValidationError`].
fn decode_result<T: DeserializeOwned>(method: &str, result: Option<Value>) -> Result<T> {
    let value = result.ok_or_else(|| {
        SolanaRpcError::ValidationError(format!("{method}: response has no result"))
    })?;
    serde_json::from_value(value)
        .map_err(|e| SolanaRpcError::ValidationError(format!("{method}: {e}")))
}

/// `getBalance`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetBalance {
    pub address: String,
    pub commitment: CommitmentLevel,
}

impl GetBalance {
    #[must_use]
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            commitment: CommitmentLevel::default(),
        }
    }

    #[must_use]
    pub fn with_commitment(mut self, commitment: CommitmentLevel) -> Self {
        self.commitment = commitment;
        self
    }
}

impl RpcMethod for GetBalance {
    const METHOD: &'static str = "getBalance";
    type Output = BalanceResult;

    fn validate(&self) -> Result<()> {
        require_address("address", &self.address)
    }

    fn params(&self) -> Value {
        json!([self.address, { "commitment": self.commitment }])
    }

    fn parse_result(&self, result: Option<Value>) -> Result<BalanceResult> {
        decode_result(Self::METHOD, result)
    }
}

/// `getTokenAccounts` (DAS extension)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetTokenAccounts {
    pub owner: String,
    pub mint: Option<String>,
    pub show_zero_balance: bool,
    pub limit: u32,
}

impl GetTokenAccounts {
    #[must_use]
    pub fn new(owner: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            mint: None,
            show_zero_balance: false,
            limit: DEFAULT_TOKEN_ACCOUNTS_LIMIT,
        }
    }

    #[must_use]
    pub fn with_mint(mut self, mint: impl Into<String>) -> Self {
        self.mint = Some(mint.into());
        self
    }

    #[must_use]
    pub fn with_show_zero_balance(mut self, show: bool) -> Self {
        self.show_zero_balance = show;
        self
    }

    #[must_use]
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }
}

impl RpcMethod for GetTokenAccounts {
    const METHOD: &'static str = "getTokenAccounts";
    type Output = TokenAccountsResult;

    fn validate(&self) -> Result<()> {
        require_address("owner", &self.owner)
    }

    fn params(&self) -> Value {
        let mut params = json!({
            "limit": self.limit,
            "owner": self.owner,
            "options": { "showZeroBalance": self.show_zero_balance }
        });
        // Absent, not null, when no mint filter was given.
        if let Some(mint) = &self.mint {
            params["mint"] = json!(mint);
        }
        params
    }

    fn parse_result(&self, result: Option<Value>) -> Result<TokenAccountsResult> {
        decode_result(Self::METHOD, result)
    }
}

/// `getTokenAccountsByOwner`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetTokenAccountsByOwner {
    pub owner: String,
    pub mint: Option<String>,
    pub commitment: CommitmentLevel,
    pub encoding: Encoding,
}

impl GetTokenAccountsByOwner {
    #[must_use]
    pub fn new(owner: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            mint: None,
            commitment: CommitmentLevel::default(),
            encoding: Encoding::JsonParsed,
        }
    }

    #[must_use]
    pub fn with_mint(mut self, mint: impl Into<String>) -> Self {
        self.mint = Some(mint.into());
        self
    }

    #[must_use]
    pub fn with_commitment(mut self, commitment: CommitmentLevel) -> Self {
        self.commitment = commitment;
        self
    }

    #[must_use]
    pub fn with_encoding(mut self, encoding: Encoding) -> Self {
        self.encoding = encoding;
        self
    }
}

impl RpcMethod for GetTokenAccountsByOwner {
    const METHOD: &'static str = "getTokenAccountsByOwner";
    type Output = TokenAccountsByOwnerResult;

    fn validate(&self) -> Result<()> {
        require_address("owner", &self.owner)
    }

    fn params(&self) -> Value {
        let filter = match &self.mint {
            Some(mint) => json!({ "mint": mint }),
            None => json!({}),
        };
        json!([
            self.owner,
            filter,
            { "commitment": self.commitment, "encoding": self.encoding }
        ])
    }

    fn parse_result(&self, result: Option<Value>) -> Result<TokenAccountsByOwnerResult> {
        decode_result(Self::METHOD, result)
    }
}

/// `getTransaction`, plus the caller's sender/recipient for amount lookups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetTransaction {
    pub signature: String,
    pub encoding: Encoding,
    pub commitment: CommitmentLevel,
    pub context: TransferContext,
}

impl GetTransaction {
    #[must_use]
    pub fn new(signature: impl Into<String>) -> Self {
        Self {
            signature: signature.into(),
            encoding: Encoding::Json,
            commitment: CommitmentLevel::default(),
            context: TransferContext::default(),
        }
    }

    #[must_use]
    pub fn with_encoding(mut self, encoding: Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    #[must_use]
    pub fn with_commitment(mut self, commitment: CommitmentLevel) -> Self {
        self.commitment = commitment;
        self
    }

    #[must_use]
    pub fn with_from_address(mut self, address: impl Into<String>) -> Self {
        self.context.from_address = Some(address.into());
        self
    }

    #[must_use]
    pub fn with_to_address(mut self, address: impl Into<String>) -> Self {
        self.context.to_address = Some(address.into());
        self
    }
}

impl RpcMethod for GetTransaction {
    const METHOD: &'static str = "getTransaction";
    type Output = TransactionResult;

    fn validate(&self) -> Result<()> {
        // Format sanity check only; the node decides whether it exists.
        if self.signature.chars().count() < MIN_SIGNATURE_LEN {
            return Err(SolanaRpcError::InvalidInput(format!(
                "signature must be at least {MIN_SIGNATURE_LEN} characters"
            )));
        }
        Ok(())
    }

    fn params(&self) -> Value {
        json!([
            self.signature,
            {
                "commitment": self.commitment,
                "encoding": self.encoding,
                "maxSupportedTransactionVersion": 0
            }
        ])
    }

    fn parse_result(&self, result: Option<Value>) -> Result<TransactionResult> {
        if result.is_none() {
            return Err(SolanaRpcError::NotFound(self.signature.clone()));
        }
        let transaction: ConfirmedTransaction = decode_result(Self::METHOD, result)?;
        Ok(TransactionResult::new(transaction, self.context.clone()))
    }
}
