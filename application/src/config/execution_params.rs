//! Execution parameters for session loop control.

use serde::{Deserialize, Serialize};

/// Loop control for a [`Session`](crate::use_cases::session::Session).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionParams {
    /// Maximum number of tool-call turns; `None` lets the model decide when
    /// to stop.
    pub max_tool_turns: Option<usize>,
}

impl ExecutionParams {
    pub fn with_max_tool_turns(mut self, max: usize) -> Self {
        self.max_tool_turns = Some(max);
        self
    }

    /// Whether `turn` (1-based) is past the limit.
    pub fn exceeds_tool_turns(&self, turn: usize) -> bool {
        self.max_tool_turns.is_some_and(|max| turn > max)
    }
}
