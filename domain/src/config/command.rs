//! Level-indexed command records

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The fixed levels of a bridge invocation, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandLevel {
    /// Top-level command carrying session-wide options (the prompt).
    Root,
    /// Service-type marker (e.g. `mcpserver`).
    Service,
    /// Transport marker (e.g. `stdio`) carrying the `tools` list.
    Transport,
}

impl CommandLevel {
    /// Position of this level inside a [`CommandChain`].
    pub fn index(self) -> usize {
        match self {
            CommandLevel::Root => 0,
            CommandLevel::Service => 1,
            CommandLevel::Transport => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CommandLevel::Root => "root",
            CommandLevel::Service => "service",
            CommandLevel::Transport => "transport",
        }
    }
}

impl std::fmt::Display for CommandLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One command of the invocation together with its options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandRecord {
    pub name: String,
    #[serde(default)]
    pub options: Map<String, Value>,
}

impl CommandRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            options: Map::new(),
        }
    }

    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    pub fn option(&self, key: &str) -> Option<&Value> {
        self.options.get(key).filter(|v| !v.is_null())
    }
}

/// Ordered list of command records; position `i` holds level `i`.
///
/// Built once by the outer surface (CLI, config) and never mutated after
/// validation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommandChain {
    records: Vec<CommandRecord>,
}

impl CommandChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the record for the next level.
    pub fn push(mut self, record: CommandRecord) -> Self {
        self.records.push(record);
        self
    }

    pub fn get(&self, level: CommandLevel) -> Option<&CommandRecord> {
        self.records.get(level.index())
    }

    pub fn records(&self) -> &[CommandRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl From<Vec<CommandRecord>> for CommandChain {
    fn from(records: Vec<CommandRecord>) -> Self {
        Self { records }
    }
}
