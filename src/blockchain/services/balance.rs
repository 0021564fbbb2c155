use tracing::{error, info};

use crate::blockchain::{
    address::Pubkey,
    client::ChainClient,
    models::{BalanceResult, ToolError, NATIVE_LABEL},
    wallet::Wallet,
};
use crate::utils::non_empty;

/// Balance of the wallet in SOL (no token) or in the given token.
///
/// The token address is expected to have been validated by the caller; a
/// malformed one still comes back as a failure result rather than a panic.
pub async fn get_balance(
    chain: &dyn ChainClient,
    wallet: &Wallet,
    token_address: Option<&str>,
) -> BalanceResult {
    let token = non_empty(token_address);
    match fetch(chain, wallet, token).await {
        Ok(balance) => {
            let label = token.unwrap_or(NATIVE_LABEL).to_string();
            info!("Balance for {}: {} {}", wallet.address(), balance, label);
            BalanceResult::Success {
                balance,
                token: label,
                wallet: wallet.address().to_string(),
            }
        }
        Err(e) => {
            error!("Balance lookup failed: {}", e);
            BalanceResult::failure(&e)
        }
    }
}

async fn fetch(
    chain: &dyn ChainClient,
    wallet: &Wallet,
    token: Option<&str>,
) -> Result<f64, ToolError> {
    let owner = wallet.address();
    match token {
        None => chain
            .native_balance(&owner)
            .await?
            .ok_or_else(ToolError::native_not_found),
        Some(token) => {
            let mint: Pubkey = token.parse()?;
            chain
                .token_balance(&owner, &mint)
                .await?
                .ok_or_else(|| ToolError::token_not_found(token))
        }
    }
}
