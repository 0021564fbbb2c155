//! Routes a free-text instruction to the registered tools via the language model.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use crate::{
    agent::{
        llm::{ChatMessage, LanguageModel, LlmError},
        tools::ToolRegistry,
    },
    AppContext,
};

/// Single instruction in, final text out.
#[async_trait]
pub trait Dispatcher: Send + Sync {
    async fn dispatch(&self, instruction: &str) -> Result<String, LlmError>;
}

pub struct AgentDispatcher {
    ctx: AppContext,
    model: Arc<dyn LanguageModel>,
    registry: ToolRegistry,
    max_rounds: usize,
}

impl AgentDispatcher {
    pub fn new(ctx: AppContext, model: Arc<dyn LanguageModel>) -> Self {
        let registry = ToolRegistry::new(ctx.config.enable_transfers);
        let max_rounds = ctx.config.max_tool_rounds.max(1);
        Self {
            ctx,
            model,
            registry,
            max_rounds,
        }
    }

    pub fn system_prompt(&self) -> String {
        let mut prompt = format!(
            "You are a Solana blockchain assistant that can check balances for wallet {}.\n\n\
             Available commands:\n\
             - For SOL balance: \"Check my SOL balance\"\n\
             - For token balance: \"Check balance for token <address>\"\n",
            self.ctx.wallet.address()
        );
        if self.ctx.config.enable_transfers {
            prompt.push_str(
                "- For transfers: \"Send <amount> SOL (or tokens of <mint>) to <address>\"\n",
            );
        }
        prompt.push_str("\nAlways use the appropriate function for each operation.");
        prompt
    }

    async fn run_tool(&self, name: &str, arguments: &str) -> String {
        let args: Value = if arguments.trim().is_empty() {
            json!({})
        } else {
            match serde_json::from_str(arguments) {
                Ok(v) => v,
                Err(e) => return format!("Error: invalid tool arguments: {}", e),
            }
        };
        match self.registry.call(&self.ctx, name, &args).await {
            Ok(output) => output.render(),
            Err(e) => {
                warn!("Tool call {} failed: {}", name, e);
                format!("Error: {}", e)
            }
        }
    }
}

#[async_trait]
impl Dispatcher for AgentDispatcher {
    async fn dispatch(&self, instruction: &str) -> Result<String, LlmError> {
        info!("Dispatching instruction: {}", instruction);
        let tools: Vec<Value> = self
            .registry
            .definitions()
            .iter()
            .map(|d| d.to_function_spec())
            .collect();

        let mut messages = vec![
            ChatMessage::system(self.system_prompt()),
            ChatMessage::user(instruction),
        ];

        for round in 0..self.max_rounds {
            let reply = self.model.complete(&messages, &tools).await?;
            if reply.tool_calls.is_empty() {
                return Ok(reply.content.unwrap_or_default());
            }

            debug!("Round {}: {} tool call(s)", round + 1, reply.tool_calls.len());
            let calls = reply.tool_calls.clone();
            messages.push(reply);
            for call in &calls {
                let output = self.run_tool(&call.function.name, &call.function.arguments).await;
                messages.push(ChatMessage::tool(&call.id, output));
            }
        }

        Err(LlmError::TooManyToolRounds(self.max_rounds))
    }
}
