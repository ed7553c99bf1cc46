//! The RPC client.
//!
//! [`SolanaRpcClient`] wraps a [`RpcTransport`] and exposes one async method per
//! supported RPC call. Every call follows the same path: local argument
//! checks, JSON-RPC envelope, one transport round trip, top-level error check,
//! then model construction.

use log::{debug, trace};
use serde_json::Value;

use super::request::{
    GetBalance, GetTokenAccounts, GetTokenAccountsByOwner, GetTransaction, JsonRpcRequest,
    JsonRpcResponse, RpcMethod,
};
use crate::common::error::{Result, SolanaRpcError};
use crate::config::{CommitmentLevel, Encoding, RpcClientConfig};
use crate::transport::{HttpTransport, RpcTransport};
use crate::types::{
    BalanceResult, TokenAccountsByOwnerResult, TokenAccountsResult, TransactionResult,
};

/// Typed Solana JSON-RPC client.
///
/// Holds no per-call state, so a shared reference can issue concurrent calls.
#[derive(Debug, Clone)]
pub struct SolanaRpcClient<T = HttpTransport> {
    transport: T,
}

impl SolanaRpcClient<HttpTransport> {
    /// Creates a client over HTTP.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &RpcClientConfig) -> Result<Self> {
        Ok(Self::with_transport(HttpTransport::new(config)?))
    }

    /// Creates a client from `SOLANA_RPC_URL` / `SOLANA_RPC_TIMEOUT_SECS`.
    ///
    /// # Errors
    ///
    /// Returns [`SolanaRpcError::ConfigError`] on invalid settings.
    pub fn from_env() -> Result<Self> {
        Self::new(&RpcClientConfig::from_env()?)
    }
}

impl<T: RpcTransport> SolanaRpcClient<T> {
    /// Creates a client over any transport.
    #[must_use]
    pub fn with_transport(transport: T) -> Self {
        Self { transport }
    }

    /// The transport this client sends through.
    #[must_use]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Executes a typed request.
    ///
    /// # Errors
    ///
    /// * [`SolanaRpcError::InvalidInput`] if the request fails its local checks;
    ///   nothing is sent.
    /// * [`SolanaRpcError::RpcError`] if the server returns an `error` member.
    /// * [`SolanaRpcError::ValidationError`] if the result is malformed.
    /// * Transport errors, unchanged.
    pub async fn call<M: RpcMethod + Sync>(&self, request: &M) -> Result<M::Output> {
        request.validate()?;
        let result = self.dispatch(M::METHOD, request.params()).await?;
        request.parse_result(result)
    }

    /// Sends an arbitrary method through the same envelope and error check.
    ///
    /// Returns the raw `result` member, `None` if it was absent or null.
    ///
    /// # Errors
    ///
    /// Returns [`SolanaRpcError::InvalidInput`] for an empty method name,
    /// [`SolanaRpcError::RpcError`] for server errors, and transport errors
    /// unchanged.
    pub async fn raw_call(&self, method: &str, params: Value) -> Result<Option<Value>> {
        if method.is_empty() {
            return Err(SolanaRpcError::InvalidInput(
                "method name must not be empty".to_string(),
            ));
        }
        self.dispatch(method, params).await
    }

    async fn dispatch(&self, method: &str, params: Value) -> Result<Option<Value>> {
        debug!("{} -> {method}", self.transport.transport_name());
        trace!("{method} params: {params}");

        let payload = serde_json::to_value(JsonRpcRequest::new(method, params))?;
        let raw = self.transport.fetch(reqwest::Method::POST, &payload).await?;

        let response: JsonRpcResponse = serde_json::from_value(raw).map_err(|e| {
            SolanaRpcError::ValidationError(format!("{method}: malformed JSON-RPC response: {e}"))
        })?;
        response.into_result()
    }

    /// Balance of `address` in lamports.
    ///
    /// # Errors
    ///
    /// See [`SolanaRpcClient::call`]. An empty address is
    /// [`SolanaRpcError::InvalidInput`].
    pub async fn get_balance(
        &self,
        address: &str,
        commitment: CommitmentLevel,
    ) -> Result<BalanceResult> {
        self.call(&GetBalance::new(address).with_commitment(commitment)).await
    }

    /// One page of token accounts owned by `owner`.
    ///
    /// `mint` is only sent when given.
    ///
    /// # Errors
    ///
    /// See [`SolanaRpcClient::call`]. An empty owner is
    /// [`SolanaRpcError::InvalidInput`].
    pub async fn get_token_accounts(
        &self,
        owner: &str,
        mint: Option<&str>,
        show_zero_balance: bool,
        limit: u32,
    ) -> Result<TokenAccountsResult> {
        let mut request = GetTokenAccounts::new(owner)
            .with_show_zero_balance(show_zero_balance)
            .with_limit(limit);
        if let Some(mint) = mint {
            request = request.with_mint(mint);
        }
        self.call(&request).await
    }

    /// Token accounts owned by `owner`, optionally filtered by mint.
    ///
    /// # Errors
    ///
    /// See [`SolanaRpcClient::call`]. An empty owner is
    /// [`SolanaRpcError::InvalidInput`].
    pub async fn get_token_accounts_by_owner(
        &self,
        owner: &str,
        mint: Option<&str>,
        commitment: CommitmentLevel,
        encoding: Encoding,
    ) -> Result<TokenAccountsByOwnerResult> {
        let mut request = GetTokenAccountsByOwner::new(owner)
            .with_commitment(commitment)
            .with_encoding(encoding);
        if let Some(mint) = mint {
            request = request.with_mint(mint);
        }
        self.call(&request).await
    }

    /// Transaction details, with transfer amounts for the given addresses.
    ///
    /// `from_address` and `to_address` never leave the client; they select
    /// which balance changes become `sol_sent` and `sol_received`.
    ///
    /// # Errors
    ///
    /// See [`SolanaRpcClient::call`]. A signature shorter than 20 characters is
    /// [`SolanaRpcError::InvalidInput`]; a null result is
    /// [`SolanaRpcError::NotFound`].
    pub async fn get_transaction(
        &self,
        signature: &str,
        encoding: Encoding,
        commitment: CommitmentLevel,
        from_address: Option<&str>,
        to_address: Option<&str>,
    ) -> Result<TransactionResult> {
        let mut request = GetTransaction::new(signature)
            .with_encoding(encoding)
            .with_commitment(commitment);
        if let Some(from) = from_address {
            request = request.with_from_address(from);
        }
        if let Some(to) = to_address {
            request = request.with_to_address(to);
        }
        self.call(&request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    const SIGNATURE: &str =
        "5j7s6NiJS3JAkvgkoc18WVAsiSaci2pxB2A6ueCJP4tprA2TFg9wSyTLeYouxPBJEMzJinENTkpA52YStRW5Dia7";

    /// Replies with a canned body and records every payload it is given.
    struct RecordingTransport {
        reply: Value,
        requests: Mutex<Vec<Value>>,
    }

    impl RecordingTransport {
        fn new(reply: Value) -> Self {
            Self {
                reply,
                requests: Mutex::new(Vec::new()),
            }
        }

        fn requests(&self) -> Vec<Value> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl RpcTransport for RecordingTransport {
        async fn fetch(&self, method: reqwest::Method, payload: &Value) -> Result<Value> {
            assert_eq!(method, reqwest::Method::POST);
            self.requests.lock().unwrap().push(payload.clone());
            Ok(self.reply.clone())
        }

        fn transport_name(&self) -> &'static str {
            "recording"
        }
    }

    /// Fails like an unreachable endpoint.
    struct DownTransport;

    #[async_trait]
    impl RpcTransport for DownTransport {
        async fn fetch(&self, _method: reqwest::Method, _payload: &Value) -> Result<Value> {
            Err(SolanaRpcError::Connection("connection refused".to_string()))
        }

        fn transport_name(&self) -> &'static str {
            "down"
        }
    }

    fn client(reply: Value) -> SolanaRpcClient<RecordingTransport> {
        SolanaRpcClient::with_transport(RecordingTransport::new(reply))
    }

    fn ok(result: Value) -> Value {
        json!({ "jsonrpc": "2.0", "id": 1, "result": result })
    }

    fn rpc_error() -> Value {
        json!({
            "jsonrpc": "2.0",
            "id": 1,
            "error": { "code": -32602, "message": "Invalid params: invalid owner address" }
        })
    }

    fn transaction_result() -> Value {
        json!({
            "meta": {
                "postBalances": [1000000000u64, 2000000000u64, 3000000000u64],
                "preBalances": [1500000000u64, 1500000000u64, 3000000000u64]
            },
            "transaction": {
                "message": {
                    "accountKeys": ["Account1Address", "Account2Address", "Account3Address"]
                }
            }
        })
    }

    #[tokio::test]
    async fn test_get_balance() {
        let client = client(ok(json!({ "context": { "slot": 1 }, "value": 5_000_000_000u64 })));

        let balance = client
            .get_balance("Addr", CommitmentLevel::Finalized)
            .await
            .unwrap();

        assert_eq!(balance.value, 5_000_000_000);
        assert_eq!(
            client.transport().requests(),
            vec![json!({
                "jsonrpc": "2.0",
                "id": 1,
                "method": "getBalance",
                "params": ["Addr", { "commitment": "finalized" }]
            })]
        );
    }

    #[tokio::test]
    async fn test_invalid_input_never_reaches_transport() {
        let client = client(ok(json!({ "value": 0 })));

        assert!(matches!(
            client.get_balance("", CommitmentLevel::Finalized).await,
            Err(SolanaRpcError::InvalidInput(_))
        ));
        assert!(matches!(
            client.get_token_accounts("", None, false, 10).await,
            Err(SolanaRpcError::InvalidInput(_))
        ));
        assert!(matches!(
            client
                .get_token_accounts_by_owner(
                    "",
                    None,
                    CommitmentLevel::Finalized,
                    Encoding::JsonParsed
                )
                .await,
            Err(SolanaRpcError::InvalidInput(_))
        ));
        assert!(matches!(
            client
                .get_transaction(
                    "tooshort",
                    Encoding::Json,
                    CommitmentLevel::Finalized,
                    None,
                    None
                )
                .await,
            Err(SolanaRpcError::InvalidInput(_))
        ));

        assert!(client.transport().requests().is_empty());
    }

    #[tokio::test]
    async fn test_get_token_accounts_omits_mint() {
        let client = client(ok(json!({
            "total": 1,
            "limit": 10,
            "cursor": null,
            "token_accounts": [{
                "address": "TokenAccount1Address",
                "mint": "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v",
                "owner": "Owner",
                "amount": 1000000,
                "delegated_amount": 0,
                "frozen": false
            }]
        })));

        let result = client
            .get_token_accounts("Owner", None, false, 10)
            .await
            .unwrap();
        assert_eq!(result.total, 1);
        assert_eq!(result.token_accounts[0].amount, 1_000_000);

        let requests = client.transport().requests();
        let sent = &requests[0];
        assert_eq!(sent["method"], "getTokenAccounts");
        assert!(sent["params"].get("mint").is_none());
        assert_eq!(sent["params"]["options"]["showZeroBalance"], false);
    }

    #[tokio::test]
    async fn test_get_token_accounts_sends_mint_verbatim() {
        let client = client(ok(json!({ "total": 0, "limit": 5, "token_accounts": [] })));

        client
            .get_token_accounts("Owner", Some("MintAddress"), true, 5)
            .await
            .unwrap();

        let requests = client.transport().requests();
        let sent = &requests[0];
        assert_eq!(sent["params"]["mint"], "MintAddress");
        assert_eq!(sent["params"]["limit"], 5);
        assert_eq!(sent["params"]["options"]["showZeroBalance"], true);
    }

    #[tokio::test]
    async fn test_get_token_accounts_negative_total_is_validation_error() {
        let client = client(ok(json!({ "total": -1, "limit": 10, "token_accounts": [] })));

        match client.get_token_accounts("Owner", None, false, 10).await {
            Err(SolanaRpcError::ValidationError(message)) => {
                assert!(message.contains("total must be non-negative"));
            }
            other => panic!("Expected ValidationError, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_get_token_accounts_by_owner() {
        let client = client(ok(json!({
            "context": { "slot": 10, "apiVersion": "2.0.15" },
            "value": []
        })));

        let result = client
            .get_token_accounts_by_owner(
                "Owner",
                Some("Mint"),
                CommitmentLevel::Confirmed,
                Encoding::JsonParsed,
            )
            .await
            .unwrap();
        assert_eq!(result.context.slot, 10);
        assert!(result.value.is_empty());

        let requests = client.transport().requests();
        let sent = &requests[0];
        assert_eq!(sent["method"], "getTokenAccountsByOwner");
        assert_eq!(
            sent["params"],
            json!(["Owner", { "mint": "Mint" }, { "commitment": "confirmed", "encoding": "jsonParsed" }])
        );
    }

    #[tokio::test]
    async fn test_get_transaction_with_addresses() {
        let client = client(ok(transaction_result()));

        let tx = client
            .get_transaction(
                SIGNATURE,
                Encoding::Json,
                CommitmentLevel::Finalized,
                Some("Account1Address"),
                Some("Account2Address"),
            )
            .await
            .unwrap();

        assert_eq!(tx.sol_sent(), Some(500_000_000));
        assert_eq!(tx.sol_received(), Some(500_000_000));
        assert_eq!(tx.meta().delta_balances(), &[-500_000_000, 500_000_000, 0]);

        let requests = client.transport().requests();
        let sent = &requests[0];
        assert_eq!(sent["params"][0], SIGNATURE);
        assert_eq!(sent["params"][1]["maxSupportedTransactionVersion"], 0);
        assert!(!sent.to_string().contains("Account1Address"));
    }

    #[tokio::test]
    async fn test_get_transaction_null_result_is_not_found() {
        let client = client(json!({ "jsonrpc": "2.0", "id": 1, "result": null }));

        match client
            .get_transaction(SIGNATURE, Encoding::Json, CommitmentLevel::Finalized, None, None)
            .await
        {
            Err(err @ SolanaRpcError::NotFound(_)) => {
                assert!(err.to_string().contains(SIGNATURE));
                assert!(err.is_rpc_error());
            }
            other => panic!("Expected NotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_get_transaction_mismatched_balances_is_validation_error() {
        let client = client(ok(json!({
            "meta": { "preBalances": [1, 2], "postBalances": [1] },
            "transaction": { "message": { "accountKeys": ["A", "B"] } }
        })));

        assert!(matches!(
            client
                .get_transaction(SIGNATURE, Encoding::Json, CommitmentLevel::Finalized, None, None)
                .await,
            Err(SolanaRpcError::ValidationError(_))
        ));
    }

    #[tokio::test]
    async fn test_rpc_error_for_every_method() {
        let client = client(rpc_error());
        let expected = "Invalid params: invalid owner address";

        let errors = vec![
            client
                .get_balance("Addr", CommitmentLevel::Finalized)
                .await
                .unwrap_err(),
            client
                .get_token_accounts("Owner", None, false, 10)
                .await
                .unwrap_err(),
            client
                .get_token_accounts_by_owner(
                    "Owner",
                    None,
                    CommitmentLevel::Finalized,
                    Encoding::JsonParsed,
                )
                .await
                .unwrap_err(),
            client
                .get_transaction(SIGNATURE, Encoding::Json, CommitmentLevel::Finalized, None, None)
                .await
                .unwrap_err(),
        ];

        for err in errors {
            match err {
                SolanaRpcError::RpcError { code, message } => {
                    assert_eq!(code, Some(-32602));
                    assert_eq!(message, expected);
                }
                other => panic!("Expected RpcError, got {other:?}"),
            }
        }
    }

    #[tokio::test]
    async fn test_rpc_error_without_message() {
        let client = client(json!({ "jsonrpc": "2.0", "id": 1, "error": {} }));

        match client.get_balance("Addr", CommitmentLevel::Finalized).await {
            Err(SolanaRpcError::RpcError { message, .. }) => {
                assert_eq!(message, crate::common::error::UNKNOWN_RPC_ERROR);
            }
            other => panic!("Expected RpcError, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_transport_errors_pass_through() {
        let client = SolanaRpcClient::with_transport(DownTransport);

        assert!(matches!(
            client.get_balance("Addr", CommitmentLevel::Finalized).await,
            Err(SolanaRpcError::Connection(_))
        ));
    }

    #[tokio::test]
    async fn test_raw_call() {
        let client = client(ok(json!(424242)));

        let result = client.raw_call("getSlot", json!([])).await.unwrap();
        assert_eq!(result, Some(json!(424242)));
        let requests = client.transport().requests();
        assert_eq!(requests[0]["method"], "getSlot");

        assert!(matches!(
            client.raw_call("", json!([])).await,
            Err(SolanaRpcError::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn test_call_with_request_struct() {
        let client = client(ok(transaction_result()));

        let tx = client
            .call(&GetTransaction::new(SIGNATURE).with_to_address("Account3Address"))
            .await
            .unwrap();
        assert_eq!(tx.sol_received(), Some(0));
        assert_eq!(tx.sol_sent(), None);
    }

    #[tokio::test]
    async fn test_non_object_response_is_validation_error() {
        let client = client(json!(["not", "an", "envelope"]));

        assert!(matches!(
            client.get_balance("Addr", CommitmentLevel::Finalized).await,
            Err(SolanaRpcError::ValidationError(_))
        ));
    }

    #[tokio::test]
    async fn test_shared_transport_behind_arc() {
        let transport = Arc::new(RecordingTransport::new(ok(json!({ "value": 7 }))));
        let client = SolanaRpcClient::with_transport(Arc::clone(&transport));

        let balance = client
            .get_balance("Addr", CommitmentLevel::Confirmed)
            .await
            .unwrap();

        assert_eq!(balance.value, 7);
        assert_eq!(client.transport().transport_name(), "recording");
        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0]["params"][1]["commitment"], "confirmed");

        let shared: Arc<dyn RpcTransport> = transport.clone();
        let dynamic = SolanaRpcClient::with_transport(shared);
        dynamic.raw_call("getSlot", json!([])).await.unwrap();
        assert_eq!(transport.requests().len(), 2);
    }
}
