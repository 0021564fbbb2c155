use serde_json::Value;
use tracing::{error, info, warn};
use validator::Validate;

use crate::blockchain::{
    address::Pubkey,
    client::ChainClient,
    models::{ToolError, TransferRequest, TransferResult, NATIVE_LABEL},
    wallet::Wallet,
};
use crate::utils;

/// Parse and schema-check a transfer payload.
///
/// Field presence, types and `amount >= 1` are checked here; addresses are not
/// decoded yet.
pub fn parse_transfer_request(raw_input: &str) -> Result<TransferRequest, ToolError> {
    let data: Value = serde_json::from_str(raw_input)
        .map_err(|e| ToolError::schema("input", format!("is not valid JSON ({})", e)))?;
    transfer_request_from_value(&data)
}

/// Schema-check an already decoded payload.
pub fn transfer_request_from_value(data: &Value) -> Result<TransferRequest, ToolError> {
    if !data.is_object() {
        return Err(ToolError::schema("input", "must be a JSON object"));
    }

    let request = TransferRequest {
        to: utils::get_required_arg(data, "to")?,
        amount: utils::get_required_arg(data, "amount")?,
        mint: utils::get_optional_arg(data, "mint")?,
    };

    request.validate().map_err(|errors| {
        let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
        fields.sort_by_key(|(field, _)| *field);
        match fields.first() {
            Some((field, errs)) => {
                let reason = errs
                    .first()
                    .and_then(|e| e.message.as_ref())
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| "is invalid".to_string());
                ToolError::schema(*field, reason)
            }
            None => ToolError::schema("input", "is invalid"),
        }
    })?;

    Ok(request)
}

/// Decode the recipient and optional mint.
fn resolve_addresses(request: &TransferRequest) -> Result<(Pubkey, Option<Pubkey>), ToolError> {
    let recipient: Pubkey = request.to.parse()?;
    let mint = match request.mint.as_deref() {
        Some(mint) => Some(mint.parse::<Pubkey>()?),
        None => None,
    };
    Ok((recipient, mint))
}

/// Execute a transfer described by the structured text payload.
pub async fn transfer(chain: &dyn ChainClient, wallet: &Wallet, raw_input: &str) -> TransferResult {
    match parse_transfer_request(raw_input) {
        Ok(request) => execute(chain, wallet, request).await,
        Err(e) => {
            warn!("Rejected transfer request: {}", e);
            TransferResult::failure(&e)
        }
    }
}

/// Execute a transfer from an already parsed request (validation still runs).
pub async fn transfer_value(chain: &dyn ChainClient, wallet: &Wallet, data: &Value) -> TransferResult {
    match transfer_request_from_value(data) {
        Ok(request) => execute(chain, wallet, request).await,
        Err(e) => {
            warn!("Rejected transfer request: {}", e);
            TransferResult::failure(&e)
        }
    }
}

/// Transfers always involve a network round trip, so there is no blocking form.
pub fn transfer_blocking(_raw_input: &str) -> TransferResult {
    TransferResult::failure(&ToolError::Unsupported(
        "This tool only supports async execution; use the async interface".to_string(),
    ))
}

async fn execute(chain: &dyn ChainClient, wallet: &Wallet, request: TransferRequest) -> TransferResult {
    let (recipient, mint) = match resolve_addresses(&request) {
        Ok(resolved) => resolved,
        Err(e) => {
            warn!("Rejected transfer request: {}", e);
            return TransferResult::failure(&e);
        }
    };

    info!(
        "Transferring {} {} to {}",
        request.amount,
        request.mint.as_deref().unwrap_or(NATIVE_LABEL),
        recipient
    );

    match chain
        .transfer(wallet, &recipient, request.amount, mint.as_ref())
        .await
    {
        Ok(transaction) => TransferResult::Success {
            message: "Transfer completed successfully".to_string(),
            amount: request.amount,
            recipient: request.to,
            token: request.mint.unwrap_or_else(|| NATIVE_LABEL.to_string()),
            transaction,
        },
        Err(e) => {
            error!("Transfer failed: {}", e);
            TransferResult::failure(&ToolError::from(e))
        }
    }
}
