//! OpenAI-compatible chat-completions client with function calling.

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;
use tracing::debug;

use crate::config::Config;

#[derive(Error, Debug)]
pub enum LlmError {
    #[error("OPENAI_API_KEY is not configured")]
    MissingApiKey,
    #[error("language model request timed out")]
    Timeout,
    #[error("language model transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("language model API error ({status}): {message}")]
    Api { status: u16, message: String },
    #[error("language model returned no choices")]
    EmptyResponse,
    #[error("gave up after {0} tool rounds without a final answer")]
    TooManyToolRounds(usize),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCall {
    pub name: String,
    /// JSON-encoded arguments, as produced by the model.
    #[serde(default)]
    pub arguments: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    pub id: String,
    #[serde(rename = "type", default = "default_call_type")]
    pub kind: String,
    pub function: FunctionCall,
}

fn default_call_type() -> String {
    "function".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolCall>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

impl ChatMessage {
    fn text(role: &str, content: impl Into<String>) -> Self {
        Self {
            role: role.to_string(),
            content: Some(content.into()),
            tool_calls: Vec::new(),
            tool_call_id: None,
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::text("system", content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::text("user", content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::text("assistant", content)
    }

    pub fn tool(tool_call_id: &str, content: impl Into<String>) -> Self {
        Self {
            tool_call_id: Some(tool_call_id.to_string()),
            ..Self::text("tool", content)
        }
    }
}

/// One model turn: messages plus available tools in, assistant message out.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    async fn complete(&self, messages: &[ChatMessage], tools: &[Value])
        -> Result<ChatMessage, LlmError>;
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChatMessage,
}

pub struct ChatClient {
    http: Client,
    base_url: String,
    model: String,
    api_key: SecretString,
}

impl ChatClient {
    pub fn new(config: &Config) -> Result<Self, LlmError> {
        let api_key = config
            .llm_api_key
            .as_ref()
            .map(|k| SecretString::new(k.expose_secret().clone()))
            .ok_or(LlmError::MissingApiKey)?;
        let http = Client::builder().timeout(config.request_timeout).build()?;
        Ok(Self {
            http,
            base_url: config.llm_base_url.trim_end_matches('/').to_string(),
            model: config.llm_model.clone(),
            api_key,
        })
    }
}

#[async_trait]
impl LanguageModel for ChatClient {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        tools: &[Value],
    ) -> Result<ChatMessage, LlmError> {
        let mut body = json!({
            "model": self.model,
            "messages": messages,
        });
        if !tools.is_empty() {
            body["tools"] = Value::Array(tools.to_vec());
            body["tool_choice"] = json!("auto");
        }

        let url = format!("{}/chat/completions", self.base_url);
        debug!("POST {} ({} messages)", url, messages.len());

        let response = self
            .http
            .post(&url)
            .bearer_auth(self.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(map_transport)?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<Value>(&text)
                .ok()
                .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
                .unwrap_or(text);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: ChatResponse = response.json().await.map_err(map_transport)?;
        parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message)
            .ok_or(LlmError::EmptyResponse)
    }
}

fn map_transport(err: reqwest::Error) -> LlmError {
    if err.is_timeout() {
        LlmError::Timeout
    } else {
        LlmError::Transport(err)
    }
}
