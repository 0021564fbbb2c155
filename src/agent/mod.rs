//! Language-model agent: tool registry, chat client and dispatcher.

pub mod dispatcher;
pub mod llm;
pub mod tools;

pub use dispatcher::{AgentDispatcher, Dispatcher};
pub use llm::{ChatClient, LanguageModel, LlmError};
pub use tools::ToolRegistry;
