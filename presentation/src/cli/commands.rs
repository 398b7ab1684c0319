//! CLI command definitions

use clap::{Parser, Subcommand, ValueEnum};
use mcpbridge_domain::config::{PROMPT_OPTION, SERVICE_MARKER, TOOLS_OPTION, TRANSPORT_MARKER};
use mcpbridge_domain::{CommandChain, CommandRecord, ConfigurationError};
use serde_json::{Map, Value};
use std::path::PathBuf;

/// What to print when the session ends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Only the final assistant answer
    #[default]
    Answer,
    /// Every message of the conversation, role-labelled
    Transcript,
    /// The session outcome as JSON
    Json,
}

/// CLI arguments for mcpbridge
#[derive(Parser, Debug)]
#[command(name = "mcpbridge")]
#[command(author, version, about = "MCP Bridge - A lightweight MCP host for personal use")]
#[command(long_about = r#"
mcpbridge connects an LLM to one or more MCP tool servers and runs a
tool-calling conversation until the model gives a final answer.

Each tool server is given as "NAME COMMAND PATH"; its tools are exposed to
the model as NAME-<tool>.

LLM settings are read from (in priority order):
1. MCPBRIDGE_* environment variables
2. --config <path>                 Explicit config file
3. ./mcpbridge.toml                Project-level config
4. ~/.config/mcpbridge/config.toml Global config

Example:
  mcpbridge --prompt "What's the weather in Oslo?" mcpserver stdio -t "weather python weather.py"
  mcpbridge --prompt "Summarize notes.md" mcpserver stdio -t "fs node fs.js" -t "git uvx git-server"
"#)]
pub struct Cli {
    /// Prompt string for the language model
    #[arg(long, global = true)]
    pub prompt: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "answer", global = true)]
    pub output: OutputFormat,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Write session events as JSON lines to this file
    #[arg(long, value_name = "PATH", global = true)]
    pub conversation_log: Option<PathBuf>,

    /// Prompt template file (built-in template when omitted)
    #[arg(long, value_name = "PATH", global = true)]
    pub template: Option<PathBuf>,

    /// Abort after this many tool-calling turns
    #[arg(long, value_name = "N", global = true)]
    pub max_tool_turns: Option<usize>,

    /// Show configuration sources and the resolved LLM settings, then exit
    #[arg(long)]
    pub show_config: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// MCP server related commands
    Mcpserver {
        #[command(subcommand)]
        transport: Transport,
    },
    /// Show version information
    Version,
}

#[derive(Subcommand, Debug)]
pub enum Transport {
    /// Tool servers spoken to over stdio
    Stdio {
        /// Tool server as "NAME COMMAND PATH" (repeatable)
        #[arg(short = 't', long = "tool", value_name = "NAME COMMAND PATH")]
        tools: Vec<String>,
    },
}

impl Cli {
    /// The invocation as a level-indexed command chain.
    ///
    /// Only the shape of each `--tool` value is checked here; field and
    /// server validation is left to the domain parser.
    pub fn command_chain(&self) -> Result<CommandChain, ConfigurationError> {
        let mut root = CommandRecord::new("mcpbridge");
        if let Some(prompt) = &self.prompt {
            root = root.with_option(PROMPT_OPTION, prompt.as_str());
        }
        let chain = CommandChain::new().push(root);

        let Some(Command::Mcpserver { transport }) = &self.command else {
            return Ok(chain);
        };
        let Transport::Stdio { tools } = transport;

        let entries = tools
            .iter()
            .map(|tool| tool_entry(tool))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(chain
            .push(CommandRecord::new(SERVICE_MARKER))
            .push(CommandRecord::new(TRANSPORT_MARKER).with_option(TOOLS_OPTION, entries)))
    }
}

/// `"NAME COMMAND PATH"` → `{name, command, path}`; missing trailing fields
/// are left out.
fn tool_entry(spec: &str) -> Result<Value, ConfigurationError> {
    let parts: Vec<&str> = spec.split_whitespace().collect();
    if parts.len() > 3 {
        return Err(ConfigurationError::InvalidValue {
            variable: "--tool".to_string(),
            reason: format!("expects \"NAME COMMAND PATH\", got \"{spec}\""),
        });
    }

    let mut entry = Map::new();
    for (key, value) in ["name", "command", "path"].into_iter().zip(parts) {
        entry.insert(key.to_string(), Value::from(value));
    }
    Ok(Value::Object(entry))
}
