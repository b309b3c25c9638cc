// MCP surface: JSON-RPC framing, tool schema and request dispatch
pub mod handler;
pub mod protocol;
pub mod schema;
