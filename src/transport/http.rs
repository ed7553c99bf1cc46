//! HTTP transport for JSON-RPC requests
//!
//! This module provides a `reqwest`-backed transport that posts JSON-RPC
//! payloads to a Solana RPC endpoint and returns the decoded JSON body.

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde_json::Value;
use std::time::Duration;

use super::RpcTransport;
use crate::common::error::{Result, SolanaRpcError};
use crate::config::RpcClientConfig;

/// HTTP transport
///
/// Holds a pooled `reqwest` client bound to one endpoint. Cloning is cheap and
/// shares the connection pool.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    /// RPC endpoint (http:// or https://)
    rpc_url: String,
    /// Per-request timeout
    timeout: Duration,
    http: HttpClient,
}

impl HttpTransport {
    /// Creates a new HTTP transport
    ///
    /// # Arguments
    ///
    /// * `config` - Validated client configuration (URL and timeout)
    ///
    /// # Errors
    ///
    /// Returns [`SolanaRpcError::Http`] if the underlying client cannot be
    /// built (for example when the TLS backend fails to initialise).
    pub fn new(config: &RpcClientConfig) -> Result<Self> {
        let http = HttpClient::builder().timeout(config.timeout).build()?;

        Ok(Self {
            rpc_url: config.rpc_url().to_string(),
            timeout: config.timeout,
            http,
        })
    }

    /// The endpoint this transport posts to.
    #[must_use]
    pub fn rpc_url(&self) -> &str {
        &self.rpc_url
    }

    fn map_send_error(&self, error: reqwest::Error) -> SolanaRpcError {
        if error.is_timeout() {
            SolanaRpcError::Timeout(format!(
                "no response from {} within {:?}",
                self.rpc_url, self.timeout
            ))
        } else if error.is_connect() {
            SolanaRpcError::Connection(format!("{}: {error}", self.rpc_url))
        } else {
            SolanaRpcError::Http(error)
        }
    }
}

/// True when `body` is an object with a non-null top-level `error` member.
fn carries_rpc_error(body: &Value) -> bool {
    body.get("error").is_some_and(|error| !error.is_null())
}

#[async_trait]
impl RpcTransport for HttpTransport {
    async fn fetch(&self, method: reqwest::Method, payload: &Value) -> Result<Value> {
        let response = self
            .http
            .request(method, &self.rpc_url)
            .json(payload)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(|e| self.map_send_error(e))?;

        let parsed = serde_json::from_slice::<Value>(&bytes);
        if status.is_success() {
            return parsed.map_err(SolanaRpcError::Decode);
        }

        // JSON-RPC error objects can arrive with non-2xx statuses (429, 5xx).
        // Anything else from a failed status is the gateway talking, not the node.
        match parsed {
            Ok(body) if carries_rpc_error(&body) => Ok(body),
            _ => Err(SolanaRpcError::HttpStatus {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&bytes).into_owned(),
            }),
        }
    }

    fn transport_name(&self) -> &'static str {
        "HTTP"
    }
}
