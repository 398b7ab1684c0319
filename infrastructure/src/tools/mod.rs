//! Tool server adapters
//!
//! - [`ToolExecutor`]: namespaced catalog and call routing over all servers
//! - [`StdioToolServerClient`]: one MCP server process spoken to over stdio

mod executor;
pub mod stdio;

pub use executor::ToolExecutor;
pub use stdio::StdioToolServerClient;
