// src/blockchain/models.rs
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use validator::Validate;

/// Label used for the chain's native coin in results and tool output.
pub const NATIVE_LABEL: &str = "SOL";

/// Fallback error code for failures that carry no code of their own.
pub const UNKNOWN_ERROR: &str = "UNKNOWN_ERROR";

// --- Error types ---

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AddressError {
    #[error("Invalid address: empty string")]
    Empty,
    #[error("Invalid address: base58 decode failed: {0}")]
    Encoding(String),
    #[error("Invalid address: expected 32 bytes, got {0}")]
    Length(usize),
}

#[derive(Error, Debug)]
pub enum WalletError {
    #[error("Invalid private key: {0}")]
    InvalidPrivateKey(String),
    #[error("Invalid private key: public half does not match the secret")]
    KeypairMismatch,
}

/// Errors raised by the chain client.
#[derive(Error, Debug)]
pub enum ChainError {
    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },
    #[error("request to {0} timed out")]
    Timeout(String),
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("unexpected RPC response: {0}")]
    InvalidResponse(String),
    #[error("transaction build error: {0}")]
    TransactionBuild(String),
    #[error(transparent)]
    Address(#[from] AddressError),
}

impl ChainError {
    pub fn code(&self) -> String {
        match self {
            ChainError::Rpc { code, .. } => code.to_string(),
            ChainError::Http { status, .. } => status.to_string(),
            ChainError::Timeout(_) => "TIMEOUT".to_string(),
            ChainError::Address(_) => "INVALID_ADDRESS".to_string(),
            _ => UNKNOWN_ERROR.to_string(),
        }
    }
}

/// Errors raised while handling a balance or transfer tool call.
#[derive(Error, Debug)]
pub enum ToolError {
    #[error("Schema violation on field '{field}': {reason}")]
    Schema { field: String, reason: String },
    #[error(transparent)]
    Address(#[from] AddressError),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Unsupported(String),
    #[error("Unknown tool: {0}")]
    UnknownTool(String),
    #[error(transparent)]
    Chain(#[from] ChainError),
}

impl ToolError {
    pub fn schema(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ToolError::Schema {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn token_not_found(mint: &str) -> Self {
        ToolError::NotFound(format!("No balance found for token {}", mint))
    }

    pub fn native_not_found() -> Self {
        ToolError::NotFound("Could not fetch SOL balance".to_string())
    }

    pub fn code(&self) -> String {
        match self {
            ToolError::Schema { .. } => "INVALID_INPUT".to_string(),
            ToolError::Address(_) => "INVALID_ADDRESS".to_string(),
            ToolError::NotFound(_) => "NOT_FOUND".to_string(),
            ToolError::Unsupported(_) => "UNSUPPORTED".to_string(),
            ToolError::UnknownTool(_) => "UNKNOWN_TOOL".to_string(),
            ToolError::Chain(e) => e.code(),
        }
    }
}

// --- Balance Models ---

/// Outcome of a balance query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum BalanceResult {
    Success {
        balance: f64,
        token: String,
        wallet: String,
    },
    Error {
        message: String,
        code: String,
    },
}

impl BalanceResult {
    pub fn failure(err: &ToolError) -> Self {
        BalanceResult::Error {
            message: err.to_string(),
            code: err.code(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, BalanceResult::Success { .. })
    }

    /// Human-readable line handed back to the model and the terminal.
    pub fn render(&self) -> String {
        match self {
            BalanceResult::Success {
                balance,
                token,
                wallet,
            } if token == NATIVE_LABEL => {
                format!("SOL balance for {}: {} SOL", wallet, balance)
            }
            BalanceResult::Success {
                balance,
                token,
                wallet,
            } => format!("Token balance for {}: {} {}", wallet, balance, token),
            BalanceResult::Error { message, code } if code == "NOT_FOUND" => message.clone(),
            BalanceResult::Error { message, .. } => format!("Error: {}", message),
        }
    }
}

// --- Transfer Models ---

/// The structured transfer payload: `{"to": ..., "amount": ..., "mint": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct TransferRequest {
    #[validate(length(min = 1, message = "must not be empty"))]
    pub to: String,
    #[validate(range(min = 1, message = "must be at least 1"))]
    pub amount: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mint: Option<String>,
}

/// Outcome of a transfer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum TransferResult {
    Success {
        message: String,
        amount: u64,
        recipient: String,
        token: String,
        transaction: String,
    },
    Error {
        message: String,
        code: String,
    },
}

impl TransferResult {
    pub fn failure(err: &ToolError) -> Self {
        TransferResult::Error {
            message: err.to_string(),
            code: err.code(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, TransferResult::Success { .. })
    }

    pub fn render(&self) -> String {
        match self {
            TransferResult::Success {
                amount,
                recipient,
                token,
                transaction,
                ..
            } => format!(
                "Transferred {} {} to {} (transaction {})",
                amount, token, recipient, transaction
            ),
            TransferResult::Error { message, code } => format!("Error: {} ({})", message, code),
        }
    }
}

// --- RPC wire models ---

#[derive(Debug, Deserialize)]
pub struct RpcResponse {
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
pub struct RpcErrorObject {
    pub code: i64,
    pub message: String,
}

/// `{"context": {...}, "value": ...}` envelope used by most Solana RPC methods.
#[derive(Debug, Deserialize)]
pub struct RpcEnvelope<T> {
    pub value: Option<T>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LatestBlockhash {
    pub blockhash: String,
}

/// A `jsonParsed` account: `{"data": {"parsed": {"info": ...}}}`.
#[derive(Debug, Deserialize)]
pub struct ParsedAccount<T> {
    pub data: ParsedData<T>,
}

#[derive(Debug, Deserialize)]
pub struct ParsedData<T> {
    pub parsed: ParsedInfo<T>,
}

#[derive(Debug, Deserialize)]
pub struct ParsedInfo<T> {
    pub info: T,
}

/// One entry of `getTokenAccountsByOwner`.
#[derive(Debug, Deserialize)]
pub struct KeyedTokenAccount {
    pub pubkey: String,
    pub account: ParsedAccount<TokenAccountInfo>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenAccountInfo {
    pub token_amount: UiTokenAmount,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiTokenAmount {
    pub amount: String,
    pub decimals: u8,
}

#[derive(Debug, Deserialize)]
pub struct MintInfo {
    pub decimals: u8,
}
