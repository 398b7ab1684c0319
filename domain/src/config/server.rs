//! Tool server descriptors and the command-chain parser

use super::command::{CommandChain, CommandLevel, CommandRecord};
use crate::core::error::ConfigurationError;
use crate::tool::entities::NAMESPACE_SEPARATOR;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;

/// Service-type marker expected at [`CommandLevel::Service`].
pub const SERVICE_MARKER: &str = "mcpserver";
/// Transport marker expected at [`CommandLevel::Transport`].
pub const TRANSPORT_MARKER: &str = "stdio";
/// Option on the transport record holding the tool server entries.
pub const TOOLS_OPTION: &str = "tools";
/// Option on the root record holding the user prompt.
pub const PROMPT_OPTION: &str = "prompt";

/// How to launch one tool server.
///
/// `name` is unique across an invocation and becomes the routing namespace
/// for every tool the server exposes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolServerConfig {
    pub name: String,
    pub command: String,
    pub path: String,
}

impl ToolServerConfig {
    pub fn new(name: impl Into<String>, command: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            command: command.into(),
            path: path.into(),
        }
    }
}

/// Validates a [`CommandChain`] into tool server descriptors.
///
/// The whole chain is checked in one pass; the first problem is returned and
/// no partial configuration is produced.
pub struct ToolServerConfigParser;

impl ToolServerConfigParser {
    pub fn parse(chain: &CommandChain) -> Result<Vec<ToolServerConfig>, ConfigurationError> {
        expect_marker(chain, CommandLevel::Service, SERVICE_MARKER)?;
        let transport = expect_marker(chain, CommandLevel::Transport, TRANSPORT_MARKER)?;

        if let Some(extra) = chain.records().get(CommandLevel::Transport.index() + 1) {
            return Err(ConfigurationError::ExtraCommandLevel {
                found: extra.name.clone(),
            });
        }

        let entries = transport
            .option(TOOLS_OPTION)
            .and_then(Value::as_array)
            .filter(|entries| !entries.is_empty())
            .ok_or(ConfigurationError::MissingTools)?;

        let mut seen = HashSet::new();
        let mut servers = Vec::with_capacity(entries.len());

        for (index, entry) in entries.iter().enumerate() {
            let fields = entry
                .as_object()
                .ok_or_else(|| ConfigurationError::InvalidToolEntry {
                    index,
                    entry: entry.to_string(),
                })?;

            let name = required_field(fields, "name", entry)?;
            let command = required_field(fields, "command", entry)?;
            let path = required_field(fields, "path", entry)?;

            if name.contains(NAMESPACE_SEPARATOR) {
                return Err(ConfigurationError::InvalidServerName {
                    name,
                    separator: NAMESPACE_SEPARATOR,
                });
            }
            if !seen.insert(name.clone()) {
                return Err(ConfigurationError::DuplicateServerName(name));
            }

            servers.push(ToolServerConfig { name, command, path });
        }

        Ok(servers)
    }
}

fn expect_marker<'a>(
    chain: &'a CommandChain,
    level: CommandLevel,
    expected: &'static str,
) -> Result<&'a CommandRecord, ConfigurationError> {
    let record = chain
        .get(level)
        .ok_or(ConfigurationError::MissingCommandLevel {
            level: level.as_str(),
        })?;

    if record.name != expected {
        return Err(ConfigurationError::UnexpectedCommand {
            level: level.as_str(),
            expected,
            found: record.name.clone(),
        });
    }
    Ok(record)
}

fn required_field(
    fields: &Map<String, Value>,
    field: &'static str,
    entry: &Value,
) -> Result<String, ConfigurationError> {
    match fields.get(field).and_then(Value::as_str).map(str::trim) {
        Some(value) if !value.is_empty() => Ok(value.to_string()),
        _ => Err(ConfigurationError::MissingToolField {
            field,
            entry: entry.to_string(),
        }),
    }
}
