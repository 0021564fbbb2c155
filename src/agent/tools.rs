//! The fixed set of tools the agent (and the MCP surface) can call.

use serde::Serialize;
use serde_json::{json, Value};
use tracing::info;

use crate::{
    blockchain::{
        address::is_valid_address,
        models::{BalanceResult, ToolError, TransferResult},
        services::{balance, transfer},
    },
    utils, AppContext,
};

pub const CHECK_SOL_BALANCE: &str = "check_sol_balance";
pub const CHECK_TOKEN_BALANCE: &str = "check_token_balance";
pub const SOLANA_TRANSFER: &str = "solana_transfer";

/// Name, description and JSON-schema parameters of one tool.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolDefinition {
    pub name: &'static str,
    pub description: &'static str,
    pub parameters: Value,
}

impl ToolDefinition {
    /// Chat-completions `tools[]` entry.
    pub fn to_function_spec(&self) -> Value {
        json!({
            "type": "function",
            "function": {
                "name": self.name,
                "description": self.description,
                "parameters": self.parameters,
            }
        })
    }

    /// MCP `tools/list` entry.
    pub fn to_mcp_spec(&self) -> Value {
        json!({
            "name": self.name,
            "description": self.description,
            "inputSchema": self.parameters,
        })
    }
}

/// Structured result of a tool call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ToolOutput {
    Balance(BalanceResult),
    Transfer(TransferResult),
}

impl ToolOutput {
    pub fn render(&self) -> String {
        match self {
            ToolOutput::Balance(result) => result.render(),
            ToolOutput::Transfer(result) => result.render(),
        }
    }

    pub fn is_success(&self) -> bool {
        match self {
            ToolOutput::Balance(result) => result.is_success(),
            ToolOutput::Transfer(result) => result.is_success(),
        }
    }
}

/// Registry resolved once from configuration.
#[derive(Debug, Clone)]
pub struct ToolRegistry {
    definitions: Vec<ToolDefinition>,
}

impl ToolRegistry {
    pub fn new(enable_transfers: bool) -> Self {
        let mut definitions = vec![
            ToolDefinition {
                name: CHECK_SOL_BALANCE,
                description: "Get the SOL balance for the current wallet.",
                parameters: json!({
                    "type": "object",
                    "properties": {},
                    "additionalProperties": false
                }),
            },
            ToolDefinition {
                name: CHECK_TOKEN_BALANCE,
                description: "Get the token balance for a specific token held by the current wallet.",
                parameters: json!({
                    "type": "object",
                    "properties": {
                        "token_address": {
                            "type": "string",
                            "description": "The token (mint) address to check balance for"
                        }
                    },
                    "required": ["token_address"],
                    "additionalProperties": false
                }),
            },
        ];
        if enable_transfers {
            definitions.push(ToolDefinition {
                name: SOLANA_TRANSFER,
                description: "Transfer SOL or an SPL token from the current wallet to another address. \
                              Omit mint to send SOL.",
                parameters: json!({
                    "type": "object",
                    "properties": {
                        "to": { "type": "string", "description": "Recipient wallet address" },
                        "amount": { "type": "integer", "minimum": 1, "description": "Whole units to send" },
                        "mint": { "type": "string", "description": "Token mint address (optional)" }
                    },
                    "required": ["to", "amount"],
                    "additionalProperties": false
                }),
            });
        }
        Self { definitions }
    }

    pub fn definitions(&self) -> &[ToolDefinition] {
        &self.definitions
    }

    pub fn contains(&self, name: &str) -> bool {
        self.definitions.iter().any(|d| d.name == name)
    }

    /// Run the named tool. Operational failures come back inside the
    /// `ToolOutput`; only an unknown tool or malformed arguments are `Err`.
    pub async fn call(
        &self,
        ctx: &AppContext,
        name: &str,
        args: &Value,
    ) -> Result<ToolOutput, ToolError> {
        if !self.contains(name) {
            return Err(ToolError::UnknownTool(name.to_string()));
        }
        info!("Calling tool {}", name);

        match name {
            CHECK_SOL_BALANCE => Ok(ToolOutput::Balance(
                balance::get_balance(ctx.chain.as_ref(), &ctx.wallet, None).await,
            )),
            CHECK_TOKEN_BALANCE => {
                let token_address: String = utils::get_required_arg(args, "token_address")?;
                let token_address = token_address.trim();
                if !is_valid_address(token_address) {
                    return Ok(ToolOutput::Balance(BalanceResult::Error {
                        message: "Invalid token address format".to_string(),
                        code: "INVALID_ADDRESS".to_string(),
                    }));
                }
                Ok(ToolOutput::Balance(
                    balance::get_balance(ctx.chain.as_ref(), &ctx.wallet, Some(token_address))
                        .await,
                ))
            }
            SOLANA_TRANSFER => Ok(ToolOutput::Transfer(
                transfer::transfer_value(ctx.chain.as_ref(), &ctx.wallet, args).await,
            )),
            other => Err(ToolError::UnknownTool(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transfer_tool_is_opt_in() {
        let names = |r: &ToolRegistry| r.definitions().iter().map(|d| d.name).collect::<Vec<_>>();
        assert_eq!(
            names(&ToolRegistry::new(false)),
            vec![CHECK_SOL_BALANCE, CHECK_TOKEN_BALANCE]
        );
        assert!(ToolRegistry::new(true).contains(SOLANA_TRANSFER));
        assert!(!ToolRegistry::new(false).contains(SOLANA_TRANSFER));
    }

    #[test]
    fn function_spec_shape() {
        let registry = ToolRegistry::new(false);
        let spec = registry.definitions()[1].to_function_spec();
        assert_eq!(spec["type"], "function");
        assert_eq!(spec["function"]["name"], CHECK_TOKEN_BALANCE);
        assert_eq!(
            spec["function"]["parameters"]["required"],
            json!(["token_address"])
        );
        let mcp = registry.definitions()[0].to_mcp_spec();
        assert_eq!(mcp["name"], CHECK_SOL_BALANCE);
        assert!(mcp["inputSchema"].is_object());
    }
}
