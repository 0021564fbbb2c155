//! Shared doubles for the integration tests.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use sol_balance_agent::{
    blockchain::{models::ChainError, ChainClient, Pubkey, Wallet},
    config::Config,
    AppContext,
};

pub const USDC_MINT: &str = "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v";

#[derive(Debug, Clone, PartialEq)]
pub enum ChainCall {
    NativeBalance(String),
    TokenBalance { owner: String, mint: String },
    Transfer {
        recipient: String,
        amount: u64,
        mint: Option<String>,
    },
}

/// In-memory chain that records every call it receives.
pub struct MockChain {
    pub native: Option<f64>,
    pub token: Option<f64>,
    pub rpc_failure: Option<(i64, String)>,
    calls: Mutex<Vec<ChainCall>>,
}

impl MockChain {
    pub fn new() -> Self {
        Self {
            native: Some(1.5),
            token: Some(42.0),
            rpc_failure: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<ChainCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: ChainCall) -> Result<(), ChainError> {
        self.calls.lock().unwrap().push(call);
        match &self.rpc_failure {
            Some((code, message)) => Err(ChainError::Rpc {
                code: *code,
                message: message.clone(),
            }),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ChainClient for MockChain {
    async fn native_balance(&self, owner: &Pubkey) -> Result<Option<f64>, ChainError> {
        self.record(ChainCall::NativeBalance(owner.to_string()))?;
        Ok(self.native)
    }

    async fn token_balance(
        &self,
        owner: &Pubkey,
        mint: &Pubkey,
    ) -> Result<Option<f64>, ChainError> {
        self.record(ChainCall::TokenBalance {
            owner: owner.to_string(),
            mint: mint.to_string(),
        })?;
        Ok(self.token)
    }

    async fn transfer(
        &self,
        _wallet: &Wallet,
        recipient: &Pubkey,
        amount: u64,
        mint: Option<&Pubkey>,
    ) -> Result<String, ChainError> {
        self.record(ChainCall::Transfer {
            recipient: recipient.to_string(),
            amount,
            mint: mint.map(|m| m.to_string()),
        })?;
        Ok("5VERv8NMvzbJMEkV8xnrLkEaWRtSz9CosKDYjCJjBRnbJLgp8uirBgmQpjKhoR4tjF3ZpRzrFmBV6UjKdiSZkQUW".to_string())
    }
}

pub fn test_wallet() -> Wallet {
    Wallet::from_seed([7u8; 32])
}

pub fn recipient() -> String {
    Wallet::from_seed([9u8; 32]).address().to_string()
}

pub fn test_context(chain: Arc<MockChain>, enable_transfers: bool) -> AppContext {
    let config = Config {
        enable_transfers,
        ..Config::default()
    };
    AppContext::new(config, test_wallet(), chain)
}
