pub mod client;
pub mod request;

pub use client::SolanaRpcClient;
pub use request::{
    GetBalance, GetTokenAccounts, GetTokenAccountsByOwner, GetTransaction, JsonRpcRequest,
    JsonRpcResponse, RpcMethod,
};
