// src/blockchain/mod.rs

pub mod address;
pub mod client;
pub mod models;
pub mod services;
pub mod spl_token;
pub mod transaction;
pub mod wallet;

// Re-export commonly used types
pub use address::{is_valid_address, Pubkey};
pub use client::{ChainClient, SolanaRpcClient};
pub use wallet::Wallet;
