//! Transports that carry JSON-RPC payloads to a Solana node.
//!
//! The client only needs "send this JSON, give me back JSON". Anything that
//! can do that implements [`RpcTransport`]; [`http::HttpTransport`] is the
//! default over `reqwest`.

pub mod http;

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

use crate::common::error::Result;

pub use http::HttpTransport;

/// Sends one JSON payload and returns the parsed JSON response.
///
/// Implementations own timeouts, pooling and connection errors. They must not
/// interpret the JSON-RPC envelope; error objects inside a well-formed
/// response are returned as data.
#[async_trait]
pub trait RpcTransport: Send + Sync {
    /// Sends `payload` with the given HTTP method and returns the decoded body.
    async fn fetch(&self, method: reqwest::Method, payload: &Value) -> Result<Value>;

    /// Short name used in diagnostics.
    fn transport_name(&self) -> &'static str;
}

#[async_trait]
impl<T: RpcTransport + ?Sized> RpcTransport for Arc<T> {
    async fn fetch(&self, method: reqwest::Method, payload: &Value) -> Result<Value> {
        (**self).fetch(method, payload).await
    }

    fn transport_name(&self) -> &'static str {
        (**self).transport_name()
    }
}
