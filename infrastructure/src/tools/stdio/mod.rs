//! MCP tool servers reached over stdio

mod client;
mod protocol;
mod transport;

pub use client::StdioToolServerClient;
pub use protocol::PROTOCOL_VERSION;
