//! ravex-rpc command line demo.
//!
//! Reads the endpoint from `SOLANA_RPC_URL` (or `.env`) and runs one query:
//!
//! ```text
//! ravex-rpc balance <address>
//! ravex-rpc tokens <owner> [mint]
//! ravex-rpc tx <signature> [from_address] [to_address]
//! ```

#![warn(clippy::all, clippy::pedantic)]

use ravex_rpc::common::logging::{self, LogLevel};
use ravex_rpc::{
    CommitmentLevel, Encoding, GetTokenAccounts, RpcClientConfig, SolanaRpcClient,
};
use solana_sdk::native_token::lamports_to_sol;

const USAGE: &str =
    "usage: ravex-rpc <balance ADDRESS | tokens OWNER [MINT] | tx SIGNATURE [FROM] [TO]>";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(command) = args.first() else {
        logging::log(LogLevel::Error, USAGE);
        std::process::exit(2);
    };

    let config = RpcClientConfig::from_env()?;
    logging::log_section("ravex-rpc");
    logging::log(LogLevel::Info, &format!("RPC URL: {}", config.rpc_url()));
    logging::log(
        LogLevel::Debug,
        &format!("Timeout: {} seconds", config.timeout.as_secs()),
    );

    let client = SolanaRpcClient::new(&config)?;
    let arg = |i: usize| args.get(i).map(String::as_str);

    match (command.as_str(), arg(1)) {
        ("balance", Some(address)) => {
            let balance = client
                .get_balance(address, CommitmentLevel::Finalized)
                .await?;
            logging::log(
                LogLevel::Success,
                &format!("Balance of {address}: {} SOL", balance.sol()),
            );
        }
        ("tokens", Some(owner)) => {
            let mut request = GetTokenAccounts::new(owner).with_limit(5);
            if let Some(mint) = arg(2) {
                request = request.with_mint(mint);
            }
            let page = client.call(&request).await?;
            logging::log(
                LogLevel::Success,
                &format!(
                    "{} token accounts, showing {}",
                    page.total,
                    page.token_accounts.len()
                ),
            );
            for (i, account) in page.token_accounts.iter().enumerate() {
                logging::log(
                    LogLevel::Info,
                    &format!(
                        "{}. mint {} balance {} frozen {}",
                        i + 1,
                        account.mint,
                        account.amount,
                        account.frozen
                    ),
                );
            }
        }
        ("tx", Some(signature)) => {
            let tx = client
                .get_transaction(
                    signature,
                    Encoding::Json,
                    CommitmentLevel::Finalized,
                    arg(2),
                    arg(3),
                )
                .await?;
            logging::log(
                LogLevel::Info,
                &format!("Balance changes: {:?}", tx.meta().delta_balances()),
            );
            if let Some(sent) = tx.sol_sent() {
                logging::log(
                    LogLevel::Success,
                    &format!("Sent: {} SOL", lamports_to_sol(sent)),
                );
            }
            if let Some(received) = tx.sol_received() {
                logging::log(
                    LogLevel::Success,
                    &format!("Received: {} SOL", lamports_to_sol(received)),
                );
            }
        }
        _ => {
            logging::log(LogLevel::Error, USAGE);
            std::process::exit(2);
        }
    }

    Ok(())
}
