//! Client configuration.
//!
//! Use [`RpcClientConfigBuilder`] to build a validated [`RpcClientConfig`], or
//! [`RpcClientConfig::from_env`] to read it from the environment (a `.env`
//! file is honoured).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::common::error::{Result, SolanaRpcError};

/// Public mainnet-beta endpoint.
pub const MAINNET_RPC_URL: &str = "https://api.mainnet-beta.solana.com";
/// Public devnet endpoint.
pub const DEVNET_RPC_URL: &str = "https://api.devnet.solana.com";
/// Public testnet endpoint.
pub const TESTNET_RPC_URL: &str = "https://api.testnet.solana.com";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 5;

/// Environment variable holding the RPC endpoint.
pub const RPC_URL_ENV: &str = "SOLANA_RPC_URL";
/// Environment variable holding the request timeout in seconds.
pub const RPC_TIMEOUT_ENV: &str = "SOLANA_RPC_TIMEOUT_SECS";

/// Finality tier requested from the server, from least to most final.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum CommitmentLevel {
    Processed,
    Confirmed,
    #[default]
    Finalized,
}

impl CommitmentLevel {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            CommitmentLevel::Processed => "processed",
            CommitmentLevel::Confirmed => "confirmed",
            CommitmentLevel::Finalized => "finalized",
        }
    }
}

impl fmt::Display for CommitmentLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CommitmentLevel {
    type Err = SolanaRpcError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "processed" => Ok(CommitmentLevel::Processed),
            "confirmed" => Ok(CommitmentLevel::Confirmed),
            "finalized" => Ok(CommitmentLevel::Finalized),
            other => Err(SolanaRpcError::InvalidInput(format!(
                "Unknown commitment level: {other}"
            ))),
        }
    }
}

/// Response encoding requested from the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Encoding {
    #[serde(rename = "json")]
    Json,
    #[serde(rename = "jsonParsed")]
    JsonParsed,
    #[serde(rename = "base58")]
    Base58,
    #[serde(rename = "base64")]
    Base64,
}

impl Encoding {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Encoding::Json => "json",
            Encoding::JsonParsed => "jsonParsed",
            Encoding::Base58 => "base58",
            Encoding::Base64 => "base64",
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Encoding {
    type Err = SolanaRpcError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "json" => Ok(Encoding::Json),
            "jsonParsed" => Ok(Encoding::JsonParsed),
            "base58" => Ok(Encoding::Base58),
            "base64" => Ok(Encoding::Base64),
            other => Err(SolanaRpcError::InvalidInput(format!(
                "Unknown encoding: {other}"
            ))),
        }
    }
}

/// Validated client configuration.
#[derive(Debug, Clone)]
pub struct RpcClientConfig {
    rpc_url: String,
    /// Per-request timeout applied by the HTTP transport.
    pub timeout: Duration,
}

impl RpcClientConfig {
    /// The RPC endpoint URL.
    #[must_use]
    pub fn rpc_url(&self) -> &str {
        &self.rpc_url
    }

    /// Loads configuration from `SOLANA_RPC_URL` and `SOLANA_RPC_TIMEOUT_SECS`.
    ///
    /// A `.env` file in the working directory is loaded first if present.
    /// Missing variables fall back to the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`SolanaRpcError::ConfigError`] if the timeout is not a number
    /// or the resulting configuration fails validation.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let mut builder = RpcClientConfigBuilder::new();
        if let Ok(url) = std::env::var(RPC_URL_ENV) {
            builder = builder.with_rpc(url);
        }
        if let Ok(raw) = std::env::var(RPC_TIMEOUT_ENV) {
            let secs = raw.trim().parse::<u64>().map_err(|e| {
                SolanaRpcError::ConfigError(format!("{RPC_TIMEOUT_ENV} must be an integer: {e}"))
            })?;
            builder = builder.with_timeout_secs(secs);
        }
        builder.build()
    }
}

impl Default for RpcClientConfig {
    fn default() -> Self {
        Self {
            rpc_url: MAINNET_RPC_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

/// Builder for [`RpcClientConfig`].
#[derive(Debug, Clone)]
pub struct RpcClientConfigBuilder {
    rpc_url: String,
    timeout: Duration,
}

impl RpcClientConfigBuilder {
    /// Starts from mainnet-beta with a five second timeout.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rpc_url: MAINNET_RPC_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Sets the RPC endpoint URL.
    #[must_use]
    pub fn with_rpc(mut self, url: impl Into<String>) -> Self {
        self.rpc_url = url.into();
        self
    }

    /// Sets the request timeout in whole seconds.
    #[must_use]
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout = Duration::from_secs(secs);
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Validates and builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SolanaRpcError::ConfigError`] if the URL does not parse, is not
    /// `http`/`https`, or the timeout is zero.
    pub fn build(self) -> Result<RpcClientConfig> {
        let url = reqwest::Url::parse(&self.rpc_url).map_err(|e| {
            SolanaRpcError::ConfigError(format!("Invalid RPC URL '{}': {e}", self.rpc_url))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(SolanaRpcError::ConfigError(format!(
                "RPC URL must use http or https, got '{}'",
                url.scheme()
            )));
        }
        if self.timeout.is_zero() {
            return Err(SolanaRpcError::ConfigError(
                "Timeout must be greater than zero".to_string(),
            ));
        }

        Ok(RpcClientConfig {
            rpc_url: self.rpc_url,
            timeout: self.timeout,
        })
    }
}

impl Default for RpcClientConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let config = RpcClientConfigBuilder::new().build().unwrap();
        assert_eq!(config.rpc_url(), MAINNET_RPC_URL);
        assert_eq!(config.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    }

    #[test]
    fn test_builder_custom_values() {
        let config = RpcClientConfigBuilder::new()
            .with_rpc(DEVNET_RPC_URL)
            .with_timeout_secs(60)
            .build()
            .unwrap();
        assert_eq!(config.rpc_url(), DEVNET_RPC_URL);
        assert_eq!(config.timeout, Duration::from_secs(60));
    }

    #[test]
    fn test_builder_rejects_bad_url() {
        let err = RpcClientConfigBuilder::new()
            .with_rpc("not a url")
            .build()
            .unwrap_err();
        assert!(matches!(err, SolanaRpcError::ConfigError(_)));
    }

    #[test]
    fn test_builder_rejects_websocket_scheme() {
        let err = RpcClientConfigBuilder::new()
            .with_rpc("ws://127.0.0.1:8900")
            .build()
            .unwrap_err();
        assert!(matches!(err, SolanaRpcError::ConfigError(_)));
    }

    #[test]
    fn test_builder_rejects_zero_timeout() {
        let err = RpcClientConfigBuilder::new()
            .with_timeout_secs(0)
            .build()
            .unwrap_err();
        assert!(matches!(err, SolanaRpcError::ConfigError(_)));
    }

    #[test]
    fn test_commitment_levels_are_ordered() {
        assert!(CommitmentLevel::Processed < CommitmentLevel::Confirmed);
        assert!(CommitmentLevel::Confirmed < CommitmentLevel::Finalized);
        assert_eq!(CommitmentLevel::default(), CommitmentLevel::Finalized);
    }

    #[test]
    fn test_commitment_and_encoding_wire_names() {
        assert_eq!(
            serde_json::to_value(CommitmentLevel::Confirmed).unwrap(),
            "confirmed"
        );
        assert_eq!(
            serde_json::to_value(Encoding::JsonParsed).unwrap(),
            "jsonParsed"
        );
        assert_eq!("base64".parse::<Encoding>().unwrap(), Encoding::Base64);
        assert_eq!(
            "processed".parse::<CommitmentLevel>().unwrap(),
            CommitmentLevel::Processed
        );
        assert!("max".parse::<CommitmentLevel>().is_err());
        assert!("binary".parse::<Encoding>().is_err());
    }
}
