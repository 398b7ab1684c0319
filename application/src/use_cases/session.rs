//! Session use case: the tool-calling orchestration loop.
//!
//! A [`Session`] drives one top-level invocation end to end:
//!
//! ```text
//! Init ─▶ DiscoverTools ─▶ SendInitial ─┬─▶ Done
//!                                       │
//!                                       ▼
//!              ┌──── HasToolCalls ◀── response requests tools
//!              ▼                                  ▲
//!         ExecuteTools ─▶ SendFollowup ───────────┘
//!
//! Aborted: no completion from the LLM (or the tool-turn limit was hit)
//! ```
//!
//! The tool catalog is discovered once and reused unchanged for every turn.
//! Tool calls of one turn run sequentially, and their results are appended
//! in the order the model requested them. Tool and LLM resources are
//! released on every exit path.

use crate::config::ExecutionParams;
use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::llm_client::LlmClientFactory;
use crate::ports::prompt_builder::{PromptBuilderPort, PromptError};
use crate::ports::tool_executor::{ToolExecutorError, ToolExecutorPort};
use crate::use_cases::llm_executor::LlmExecutor;
use mcpbridge_domain::{
    AbortReason, Completion, Context, Conversation, SessionState, ToolDefinition,
};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tracing::{Instrument, debug, info, info_span, warn};

/// Fatal errors that stop a session.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Tool execution failed: {0}")]
    ToolExecutor(#[from] ToolExecutorError),

    #[error("Prompt construction failed: {0}")]
    Prompt(#[from] PromptError),
}

/// How a session ended.
#[derive(Debug, Clone)]
pub struct SessionOutcome {
    pub session_id: String,
    /// [`SessionState::Done`] or [`SessionState::Aborted`].
    pub state: SessionState,
    pub conversation: Conversation,
    /// Number of completions received.
    pub completions: usize,
    /// Number of tool calls executed.
    pub tool_calls: usize,
    pub abort_reason: Option<AbortReason>,
}

impl SessionOutcome {
    pub fn is_done(&self) -> bool {
        self.state == SessionState::Done
    }

    pub fn final_answer(&self) -> Option<&str> {
        self.conversation.final_answer()
    }
}

/// Mutable bookkeeping of one run.
struct Progress {
    state: SessionState,
    conversation: Conversation,
    completions: usize,
    tool_calls: usize,
}

impl Progress {
    fn enter(&mut self, next: SessionState) {
        debug!(component = "session", from = %self.state, to = %next, "State transition");
        self.state = next;
    }

    fn finish(mut self, session_id: &str, abort_reason: Option<AbortReason>) -> SessionOutcome {
        let terminal = if abort_reason.is_some() {
            SessionState::Aborted
        } else {
            SessionState::Done
        };
        self.enter(terminal);
        SessionOutcome {
            session_id: session_id.to_string(),
            state: terminal,
            conversation: self.conversation,
            completions: self.completions,
            tool_calls: self.tool_calls,
            abort_reason,
        }
    }
}

/// One orchestration run.
pub struct Session {
    id: String,
    context: Context,
    tool_executor: Arc<dyn ToolExecutorPort>,
    llm_factory: Arc<dyn LlmClientFactory>,
    prompt_builder: Arc<dyn PromptBuilderPort>,
    conversation_logger: Arc<dyn ConversationLogger>,
    execution: ExecutionParams,
}

impl Session {
    pub fn new(
        context: Context,
        tool_executor: Arc<dyn ToolExecutorPort>,
        llm_factory: Arc<dyn LlmClientFactory>,
        prompt_builder: Arc<dyn PromptBuilderPort>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            context,
            tool_executor,
            llm_factory,
            prompt_builder,
            conversation_logger: Arc::new(NoConversationLogger),
            execution: ExecutionParams::default(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.conversation_logger = logger;
        self
    }

    pub fn with_execution(mut self, execution: ExecutionParams) -> Self {
        self.execution = execution;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Run the loop to completion.
    ///
    /// An absent completion ends the session as [`SessionState::Aborted`]
    /// (reported through the outcome, not as an error). Tool routing,
    /// structural and prompt errors are returned as [`SessionError`].
    pub async fn run(self) -> Result<SessionOutcome, SessionError> {
        let span = info_span!("session", session_id = %self.id);

        async move {
            info!(
                component = "session",
                servers = self.context.servers.len(),
                "Session started"
            );
            self.log_event(
                "session_started",
                json!({"session_id": self.id, "prompt": self.context.prompt}),
            );

            let llm = LlmExecutor::initialize(&self.id, self.llm_factory.as_ref()).await;
            let result = self.drive(&llm).await;

            llm.close().await;
            self.tool_executor.close().await;

            match &result {
                Ok(outcome) => {
                    info!(
                        component = "session",
                        state = %outcome.state,
                        completions = outcome.completions,
                        tool_calls = outcome.tool_calls,
                        "Session finished"
                    );
                    self.log_event(
                        "session_finished",
                        json!({
                            "state": outcome.state,
                            "completions": outcome.completions,
                            "tool_calls": outcome.tool_calls,
                            "abort_reason": outcome.abort_reason.map(|r| r.to_string()),
                        }),
                    );
                }
                Err(e) => {
                    warn!(component = "session", error = %e, "Session failed");
                    self.log_event("session_failed", json!({"error": e.to_string()}));
                }
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn drive(&self, llm: &LlmExecutor) -> Result<SessionOutcome, SessionError> {
        let mut progress = Progress {
            state: SessionState::Init,
            conversation: Conversation::new(&self.id),
            completions: 0,
            tool_calls: 0,
        };

        progress.enter(SessionState::DiscoverTools);
        let tools = self.tool_executor.get_tools_definition().await?;
        info!(component = "session", tools = tools.len(), "Tools discovered");
        self.log_event(
            "tools_discovered",
            json!({"tools": tools.iter().map(|t| &t.name).collect::<Vec<_>>()}),
        );

        progress.enter(SessionState::SendInitial);
        let prompt = self.prompt_builder.build_initial_prompt(&self.context.prompt)?;
        for message in prompt.into_messages() {
            progress.conversation.add_message(message);
        }

        let Some(mut completion) = self.complete(llm, &mut progress, &tools).await else {
            return Ok(progress.finish(
                &self.id,
                Some(AbortReason::NoCompletion {
                    during: SessionState::SendInitial,
                }),
            ));
        };

        let mut turn = 0;
        while completion.need_tools_call() {
            progress.enter(SessionState::HasToolCalls);
            turn += 1;
            if self.execution.exceeds_tool_turns(turn) {
                let limit = self.execution.max_tool_turns.unwrap_or(0);
                warn!(component = "session", limit, "Tool turn limit reached");
                return Ok(progress.finish(&self.id, Some(AbortReason::ToolTurnLimit { limit })));
            }

            let requests = completion.prepare_tools_call();
            if requests.is_empty() {
                warn!(component = "session", turn, "Response requested tools but no call was usable");
            }

            progress.enter(SessionState::ExecuteTools);
            for request in &requests {
                debug!(
                    component = "session",
                    tool = %request.name,
                    call_id = %request.id,
                    "Executing tool call"
                );
                self.log_event(
                    "tool_call",
                    json!({"id": request.id, "name": request.name, "arguments": request.arguments}),
                );

                let result = self.tool_executor.call_tool(request).await?;
                progress.tool_calls += 1;

                self.log_event(
                    "tool_result",
                    json!({
                        "id": request.id,
                        "name": request.name,
                        "success": result.success,
                        "summary": result.summary,
                    }),
                );
                progress
                    .conversation
                    .add_tool_result(&request.id, &request.name, &result);
            }

            progress.enter(SessionState::SendFollowup);
            completion = match self.complete(llm, &mut progress, &tools).await {
                Some(next) => next,
                None => {
                    return Ok(progress.finish(
                        &self.id,
                        Some(AbortReason::NoCompletion {
                            during: SessionState::SendFollowup,
                        }),
                    ));
                }
            };
        }

        Ok(progress.finish(&self.id, None))
    }

    /// Request a completion and record its assistant message.
    async fn complete(
        &self,
        llm: &LlmExecutor,
        progress: &mut Progress,
        tools: &[ToolDefinition],
    ) -> Option<Completion> {
        let Some(completion) = llm.get_completion(&progress.conversation, tools).await else {
            warn!(component = "session", state = %progress.state, "No completion received, aborting");
            return None;
        };
        progress.completions += 1;

        self.log_event(
            "llm_response",
            json!({"provider": completion.provider(), "body": completion.body()}),
        );

        match completion.assistant_message() {
            Some(message) => progress.conversation.add_message(message),
            None => warn!(
                component = "session",
                provider = %completion.provider(),
                "Response carries no assistant message"
            ),
        }
        Some(completion)
    }

    fn log_event(&self, event_type: &'static str, payload: serde_json::Value) {
        self.conversation_logger
            .log(ConversationEvent::new(event_type, payload));
    }
}
