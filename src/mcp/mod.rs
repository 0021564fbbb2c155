// JSON-RPC (MCP) surface over stdin/stdout
pub mod handler;
pub mod protocol;
pub mod server;
