//! Typed async client for the Solana JSON-RPC query interface.
//!
//! Sends `getBalance`, `getTokenAccounts`, `getTokenAccountsByOwner` and
//! `getTransaction` requests and returns validated, strongly typed results.
//!
//! ```no_run
//! use ravex_rpc::{CommitmentLevel, RpcClientConfigBuilder, SolanaRpcClient};
//!
//! # async fn run() -> ravex_rpc::Result<()> {
//! let config = RpcClientConfigBuilder::new()
//!     .with_rpc("https://api.devnet.solana.com")
//!     .build()?;
//! let client = SolanaRpcClient::new(&config)?;
//!
//! let balance = client
//!     .get_balance("5zwN9NQei4fctQ8AfEk67PVoH1jSCSYCpfYkeamkpznj", CommitmentLevel::Finalized)
//!     .await?;
//! println!("{} SOL", balance.sol());
//! # Ok(())
//! # }
//! ```

#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod common;
pub mod config;
pub mod core;
pub mod transport;
pub mod types;

pub use common::error::{ModelError, Result, SolanaRpcError};
pub use config::{CommitmentLevel, Encoding, RpcClientConfig, RpcClientConfigBuilder};
pub use crate::core::{
    GetBalance, GetTokenAccounts, GetTokenAccountsByOwner, GetTransaction, RpcMethod,
    SolanaRpcClient,
};
pub use transport::{HttpTransport, RpcTransport};
pub use types::{
    AccountInfo, BalanceResult, ConfirmedTransaction, OwnedTokenAccount, ParsedTokenAmount,
    RpcContext, TokenAccount, TokenAccountsByOwnerResult, TokenAccountsResult, TransactionMeta,
    TransactionMessage, TransactionResult, TransferContext,
};
