//! Orchestration states of a session

use serde::{Deserialize, Serialize};
use std::fmt;

/// States of the session loop.
///
/// ```text
/// Init → DiscoverTools → SendInitial → (HasToolCalls → ExecuteTools → SendFollowup)* → Done
///                                   ╲                                            ╱
///                                    ────────────── Aborted ◀───────────────────
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Init,
    DiscoverTools,
    SendInitial,
    HasToolCalls,
    ExecuteTools,
    SendFollowup,
    Done,
    Aborted,
}

impl SessionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionState::Init => "init",
            SessionState::DiscoverTools => "discover_tools",
            SessionState::SendInitial => "send_initial",
            SessionState::HasToolCalls => "has_tool_calls",
            SessionState::ExecuteTools => "execute_tools",
            SessionState::SendFollowup => "send_followup",
            SessionState::Done => "done",
            SessionState::Aborted => "aborted",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionState::Done | SessionState::Aborted)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a session ended in [`SessionState::Aborted`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbortReason {
    /// The LLM produced no completion (unavailable client or LLM error).
    NoCompletion { during: SessionState },
    /// The configured tool-turn limit was reached.
    ToolTurnLimit { limit: usize },
}

impl fmt::Display for AbortReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AbortReason::NoCompletion { during } => {
                write!(f, "no completion received during {during}")
            }
            AbortReason::ToolTurnLimit { limit } => {
                write!(f, "tool turn limit of {limit} reached")
            }
        }
    }
}
