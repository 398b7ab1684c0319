//! Presentation layer for mcpbridge
//!
//! This crate contains the CLI definition and output formatters.

pub mod cli;
pub mod output;

// Re-export commonly used types
pub use cli::commands::{Cli, Command, OutputFormat, Transport};
pub use output::console::ConsoleFormatter;
