//! Error types for the Solana RPC client.
//!
//! Every fallible operation in this crate returns [`Result`], whose error side
//! is a single [`SolanaRpcError`] enum covering local input checks, server-side
//! RPC errors, response validation and transport failures.

use thiserror::Error;

/// Fallback text used when the server reports an error without a message.
pub const UNKNOWN_RPC_ERROR: &str = "Unknown RPC error";

/// Errors produced by the Solana RPC client.
#[derive(Debug, Error)]
pub enum SolanaRpcError {
    /// A caller-supplied argument failed a local precondition.
    ///
    /// Raised before any network call is made.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The server answered with a top-level JSON-RPC `error` object.
    #[error("RPC error: {message}")]
    RpcError {
        /// JSON-RPC error code, when the server sent one.
        code: Option<i64>,
        /// Server-supplied message text.
        message: String,
    },

    /// The server answered successfully but the transaction does not exist.
    #[error("Transaction not found: {0}")]
    NotFound(String),

    /// The response violated a model invariant or did not match its shape.
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// The request did not complete within the configured timeout.
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// The RPC endpoint could not be reached.
    #[error("Connection error: {0}")]
    Connection(String),

    /// The endpoint returned a non-success status with a non-JSON body.
    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    /// Any other HTTP client failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The response body was not valid JSON.
    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// The client configuration is invalid.
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl SolanaRpcError {
    /// Builds an [`SolanaRpcError::RpcError`] from the raw `error` member of a
    /// JSON-RPC response.
    ///
    /// Accepts the usual `{code, message}` object as well as a bare string.
    #[must_use]
    pub fn from_rpc_error_value(error: &serde_json::Value) -> Self {
        let (code, message) = match error {
            serde_json::Value::Object(map) => (
                map.get("code").and_then(serde_json::Value::as_i64),
                map.get("message")
                    .and_then(serde_json::Value::as_str)
                    .map(str::to_string),
            ),
            serde_json::Value::String(text) => (None, Some(text.clone())),
            _ => (None, None),
        };

        Self::RpcError {
            code,
            message: message.unwrap_or_else(|| UNKNOWN_RPC_ERROR.to_string()),
        }
    }

    /// Returns true for errors reported by the server itself.
    ///
    /// [`SolanaRpcError::NotFound`] counts as an RPC error: the server answered,
    /// it just had nothing for the requested signature.
    #[must_use]
    pub fn is_rpc_error(&self) -> bool {
        matches!(self, Self::RpcError { .. } | Self::NotFound(_))
    }

    /// Returns true for transient failures a caller may reasonably retry.
    ///
    /// The client never retries on its own.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Timeout(_) | Self::Connection(_) => true,
            Self::HttpStatus { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

/// Invariant violations detected while building a result model.
///
/// Converted into [`SolanaRpcError::ValidationError`] at the client boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("{field} must be non-negative, got {value}")]
    Negative { field: &'static str, value: String },

    #[error("{field} must be an integer, got {value}")]
    NotAnInteger { field: &'static str, value: String },

    #[error("preBalances and postBalances must have the same length ({pre} != {post})")]
    BalanceLengthMismatch { pre: usize, post: usize },
}

impl From<ModelError> for SolanaRpcError {
    fn from(err: ModelError) -> Self {
        SolanaRpcError::ValidationError(err.to_string())
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SolanaRpcError>;
