// src/config.rs

use std::env;
use std::fmt;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use secrecy::SecretString;
use url::Url;

pub const DEFAULT_RPC_URL: &str = "https://api.mainnet-beta.solana.com";
pub const DEFAULT_LLM_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_LLM_MODEL: &str = "gpt-4o";

// All configuration, loaded once at startup from the environment (and .env if present).
pub struct Config {
    // Wallet settings
    /// The wallet secret exactly as supplied in `PRIVATE_KEY`
    pub private_key: SecretString,

    // Chain settings
    pub rpc_url: String,

    // Language model settings
    pub llm_api_key: Option<SecretString>,
    pub llm_base_url: String,
    pub llm_model: String,
    pub max_tool_rounds: usize,

    // Behaviour
    pub request_timeout: Duration,
    pub enable_transfers: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            private_key: SecretString::new(String::new()),
            rpc_url: DEFAULT_RPC_URL.to_string(),
            llm_api_key: None,
            llm_base_url: DEFAULT_LLM_BASE_URL.to_string(),
            llm_model: DEFAULT_LLM_MODEL.to_string(),
            max_tool_rounds: 5,
            request_timeout: Duration::from_secs(30),
            enable_transfers: false,
        }
    }
}

// Secrets stay out of Debug output.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("private_key", &"[REDACTED]")
            .field("rpc_url", &self.rpc_url)
            .field(
                "llm_api_key",
                &self.llm_api_key.as_ref().map(|_| "[REDACTED]"),
            )
            .field("llm_base_url", &self.llm_base_url)
            .field("llm_model", &self.llm_model)
            .field("max_tool_rounds", &self.max_tool_rounds)
            .field("request_timeout", &self.request_timeout)
            .field("enable_transfers", &self.enable_transfers)
            .finish()
    }
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        // Load variables from the .env file into the environment
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    ///
    /// `from_env` is a thin wrapper over this; tests feed it a map instead of
    /// mutating the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let private_key = lookup("PRIVATE_KEY")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .context("PRIVATE_KEY must be set to the wallet's secret key")?;

        let rpc_url = lookup("SOLANA_RPC_URL").unwrap_or_else(|| DEFAULT_RPC_URL.to_string());
        Url::parse(&rpc_url).context("SOLANA_RPC_URL must be a valid URL")?;

        let llm_base_url =
            lookup("OPENAI_BASE_URL").unwrap_or_else(|| DEFAULT_LLM_BASE_URL.to_string());
        Url::parse(&llm_base_url).context("OPENAI_BASE_URL must be a valid URL")?;

        let timeout_secs = lookup("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|| "30".to_string())
            .parse::<u64>()
            .context("REQUEST_TIMEOUT_SECS must be a valid number")?;
        if timeout_secs == 0 {
            return Err(anyhow!("REQUEST_TIMEOUT_SECS must be greater than zero"));
        }

        let max_tool_rounds = lookup("MAX_TOOL_ROUNDS")
            .unwrap_or_else(|| "5".to_string())
            .parse::<usize>()
            .context("MAX_TOOL_ROUNDS must be a valid number")?;

        let enable_transfers = match lookup("ENABLE_TRANSFERS") {
            Some(v) => parse_bool(&v).context("ENABLE_TRANSFERS must be true or false")?,
            None => false,
        };

        Ok(Config {
            private_key: SecretString::new(private_key),
            rpc_url,
            llm_api_key: lookup("OPENAI_API_KEY")
                .filter(|v| !v.trim().is_empty())
                .map(SecretString::new),
            llm_base_url,
            llm_model: lookup("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_LLM_MODEL.to_string()),
            max_tool_rounds,
            request_timeout: Duration::from_secs(timeout_secs),
            enable_transfers,
        })
    }
}

fn parse_bool(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(anyhow!("unrecognised boolean '{}'", other)),
    }
}
