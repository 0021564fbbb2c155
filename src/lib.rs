// src/lib.rs

use std::sync::Arc;

// Re-export modules
pub mod agent;
pub mod blockchain;
pub mod config;
pub mod mcp;
pub mod shell;
pub mod utils;

/// Everything a tool call needs, built once at startup and shared read-only.
#[derive(Clone)]
pub struct AppContext {
    /// Application configuration
    pub config: Arc<config::Config>,
    /// The single wallet every balance and transfer refers to
    pub wallet: Arc<blockchain::Wallet>,
    /// Chain RPC access
    pub chain: Arc<dyn blockchain::ChainClient>,
}

impl AppContext {
    pub fn new(
        config: config::Config,
        wallet: blockchain::Wallet,
        chain: Arc<dyn blockchain::ChainClient>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            wallet: Arc::new(wallet),
            chain,
        }
    }
}
