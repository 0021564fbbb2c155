//! Chain client for Solana.
//!
//! `ChainClient` is the seam between the balance/transfer services and the
//! network. `SolanaRpcClient` implements it over plain JSON-RPC; tests swap in
//! in-memory doubles.

use std::time::Duration;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64STD;
use base64::Engine;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use crate::blockchain::{
    address::Pubkey,
    models::{
        ChainError, KeyedTokenAccount, LatestBlockhash, MintInfo, ParsedAccount, RpcEnvelope,
        RpcResponse,
    },
    spl_token,
    transaction::{self, Message},
    wallet::Wallet,
};

pub const LAMPORTS_PER_SOL: u64 = 1_000_000_000;

const COMMITMENT: &str = "confirmed";

#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Native balance of `owner` in SOL; `None` when the node returns no value.
    async fn native_balance(&self, owner: &Pubkey) -> Result<Option<f64>, ChainError>;

    /// Balance of `mint` held by `owner` in whole tokens; `None` when the owner
    /// has no token account for the mint.
    async fn token_balance(&self, owner: &Pubkey, mint: &Pubkey)
        -> Result<Option<f64>, ChainError>;

    /// Send `amount` whole units (SOL, or tokens of `mint`) from `wallet` to
    /// `recipient` and return the transaction signature.
    async fn transfer(
        &self,
        wallet: &Wallet,
        recipient: &Pubkey,
        amount: u64,
        mint: Option<&Pubkey>,
    ) -> Result<String, ChainError>;
}

/// JSON-RPC implementation of [`ChainClient`].
#[derive(Clone)]
pub struct SolanaRpcClient {
    http: Client,
    rpc_url: String,
}

impl SolanaRpcClient {
    /// Create a client whose every request is bounded by `timeout`.
    pub fn new(rpc_url: &str, timeout: Duration) -> Result<Self, ChainError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            rpc_url: rpc_url.to_string(),
        })
    }

    pub fn rpc_url(&self) -> &str {
        &self.rpc_url
    }

    async fn rpc_call<T: DeserializeOwned>(
        &self,
        method: &str,
        params: Value,
    ) -> Result<T, ChainError> {
        let payload = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params,
        });
        debug!("RPC {} -> {}", method, self.rpc_url);

        let response = self
            .http
            .post(&self.rpc_url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            // Some nodes still send a JSON-RPC error object with the failure status
            if let Some(err) = serde_json::from_str::<RpcResponse>(&text)
                .ok()
                .and_then(|body| body.error)
            {
                return Err(ChainError::Rpc {
                    code: err.code,
                    message: err.message,
                });
            }
            let message = match text.trim() {
                "" => status.canonical_reason().unwrap_or("request failed").to_string(),
                body => body.to_string(),
            };
            return Err(ChainError::Http {
                status: status.as_u16(),
                message,
            });
        }

        let body: RpcResponse = response.json().await.map_err(|e| self.transport_error(e))?;

        if let Some(err) = body.error {
            return Err(ChainError::Rpc {
                code: err.code,
                message: err.message,
            });
        }
        let result = body
            .result
            .ok_or_else(|| ChainError::InvalidResponse(format!("{} returned no result", method)))?;
        serde_json::from_value(result)
            .map_err(|e| ChainError::InvalidResponse(format!("{}: {}", method, e)))
    }

    fn transport_error(&self, err: reqwest::Error) -> ChainError {
        if err.is_timeout() {
            ChainError::Timeout(self.rpc_url.clone())
        } else {
            ChainError::Transport(err)
        }
    }

    async fn mint_decimals(&self, mint: &Pubkey) -> Result<u8, ChainError> {
        let account: RpcEnvelope<ParsedAccount<MintInfo>> = self
            .rpc_call(
                "getAccountInfo",
                json!([mint.to_string(), { "encoding": "jsonParsed", "commitment": COMMITMENT }]),
            )
            .await?;
        account
            .value
            .map(|a| a.data.parsed.info.decimals)
            .ok_or_else(|| ChainError::InvalidResponse(format!("mint account {} not found", mint)))
    }

    async fn latest_blockhash(&self) -> Result<[u8; 32], ChainError> {
        let latest: RpcEnvelope<LatestBlockhash> = self
            .rpc_call("getLatestBlockhash", json!([{ "commitment": COMMITMENT }]))
            .await?;
        let blockhash = latest
            .value
            .ok_or_else(|| ChainError::InvalidResponse("no blockhash returned".into()))?
            .blockhash;
        let hash: Pubkey = blockhash
            .parse()
            .map_err(|_| ChainError::InvalidResponse(format!("bad blockhash {}", blockhash)))?;
        Ok(hash.to_bytes())
    }

    async fn send_transaction(&self, wire: &[u8]) -> Result<String, ChainError> {
        self.rpc_call(
            "sendTransaction",
            json!([
                BASE64STD.encode(wire),
                { "encoding": "base64", "preflightCommitment": COMMITMENT }
            ]),
        )
        .await
    }
}

#[async_trait]
impl ChainClient for SolanaRpcClient {
    async fn native_balance(&self, owner: &Pubkey) -> Result<Option<f64>, ChainError> {
        let balance: RpcEnvelope<u64> = self
            .rpc_call(
                "getBalance",
                json!([owner.to_string(), { "commitment": COMMITMENT }]),
            )
            .await?;
        Ok(balance
            .value
            .map(|lamports| lamports as f64 / LAMPORTS_PER_SOL as f64))
    }

    async fn token_balance(
        &self,
        owner: &Pubkey,
        mint: &Pubkey,
    ) -> Result<Option<f64>, ChainError> {
        let accounts: RpcEnvelope<Vec<KeyedTokenAccount>> = self
            .rpc_call(
                "getTokenAccountsByOwner",
                json!([
                    owner.to_string(),
                    { "mint": mint.to_string() },
                    { "encoding": "jsonParsed", "commitment": COMMITMENT }
                ]),
            )
            .await?;

        let accounts = match accounts.value {
            Some(list) if !list.is_empty() => list,
            _ => return Ok(None),
        };

        let mut total: u128 = 0;
        let mut decimals = 0u8;
        for keyed in &accounts {
            let amount = &keyed.account.data.parsed.info.token_amount;
            let raw: u128 = amount.amount.parse().map_err(|_| {
                ChainError::InvalidResponse(format!(
                    "token account {} has non-numeric amount",
                    keyed.pubkey
                ))
            })?;
            total += raw;
            decimals = amount.decimals;
        }
        Ok(Some(total as f64 / 10f64.powi(decimals as i32)))
    }

    async fn transfer(
        &self,
        wallet: &Wallet,
        recipient: &Pubkey,
        amount: u64,
        mint: Option<&Pubkey>,
    ) -> Result<String, ChainError> {
        let payer = wallet.address();
        let instructions = match mint {
            None => {
                let lamports = amount.checked_mul(LAMPORTS_PER_SOL).ok_or_else(|| {
                    ChainError::TransactionBuild(format!("{} SOL overflows lamports", amount))
                })?;
                vec![transaction::system_transfer(&payer, recipient, lamports)]
            }
            Some(mint) => {
                let decimals = self.mint_decimals(mint).await?;
                let base_units = 10u64
                    .checked_pow(decimals as u32)
                    .and_then(|scale| amount.checked_mul(scale))
                    .ok_or_else(|| {
                        ChainError::TransactionBuild(format!(
                            "{} tokens with {} decimals overflows u64",
                            amount, decimals
                        ))
                    })?;
                let source = spl_token::associated_token_address(&payer, mint)?;
                let destination = spl_token::associated_token_address(recipient, mint)?;
                vec![
                    spl_token::create_associated_token_account_idempotent(&payer, recipient, mint)?,
                    spl_token::transfer_checked(
                        &source,
                        mint,
                        &destination,
                        &payer,
                        base_units,
                        decimals,
                    ),
                ]
            }
        };

        let blockhash = self.latest_blockhash().await?;
        let message = Message::compile(&instructions, &payer, blockhash)?;
        let signed = transaction::sign(&message, wallet)?;
        debug!("Sending transaction {}", signed.id());
        let signature = self.send_transaction(&signed.wire).await?;
        if signature != signed.id() {
            warn!("Node reported signature {} for transaction {}", signature, signed.id());
        }

        info!(
            "Submitted transfer of {} {} to {}: {}",
            amount,
            mint.map(|m| m.to_string()).unwrap_or_else(|| "SOL".into()),
            recipient,
            signature
        );
        Ok(signature)
    }
}
