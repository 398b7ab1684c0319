//! LLM executor: the session's single completion entry point.
//!
//! The provider client is built exactly once, when the session starts, and
//! the executor remembers whether that worked:
//!
//! ```text
//!   initialize ──▶ factory.create + client.open
//!                     │ ok                    │ err (logged)
//!                     ▼                       ▼
//!                  Ready ──get_completion──▶ Some(Completion) / None on LlmError
//!                  Unavailable ──get_completion──▶ None
//! ```
//!
//! LLM-layer errors never propagate past this type: they are logged and
//! turned into an absent completion so the session can abort gracefully.

use crate::ports::llm_client::{CompletionOptions, LlmClient, LlmClientFactory, LlmError};
use mcpbridge_domain::{Completion, Conversation, LlmConfig, LlmProvider, ToolDefinition};
use tracing::{debug, error, info, warn};

enum ClientState {
    Ready {
        client: Box<dyn LlmClient>,
        config: LlmConfig,
    },
    Unavailable {
        reason: LlmError,
    },
}

pub struct LlmExecutor {
    state: ClientState,
}

impl LlmExecutor {
    /// Build and open the configured client. Never fails; a failure leaves
    /// the executor [unavailable](Self::is_ready).
    pub async fn initialize(session_id: &str, factory: &dyn LlmClientFactory) -> Self {
        let state = match factory.create(session_id) {
            Ok(configured) => match configured.client.open().await {
                Ok(()) => {
                    info!(
                        component = "llm_executor",
                        provider = %configured.config.provider,
                        model = %configured.config.model,
                        "LLM client ready"
                    );
                    debug!(component = "llm_executor", config = %configured.config, "LLM configuration");
                    ClientState::Ready {
                        client: configured.client,
                        config: configured.config,
                    }
                }
                Err(e) => {
                    error!(component = "llm_executor", kind = e.kind(), error = %e, "Failed to open LLM client");
                    ClientState::Unavailable { reason: e }
                }
            },
            Err(e) => {
                error!(component = "llm_executor", error = %e, "LLM client configuration failed");
                ClientState::Unavailable {
                    reason: LlmError::Configuration(e),
                }
            }
        };

        Self { state }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state, ClientState::Ready { .. })
    }

    pub fn provider(&self) -> Option<LlmProvider> {
        match &self.state {
            ClientState::Ready { config, .. } => Some(config.provider),
            ClientState::Unavailable { .. } => None,
        }
    }

    /// Why no client is available, if so.
    pub fn unavailable_reason(&self) -> Option<&LlmError> {
        match &self.state {
            ClientState::Ready { .. } => None,
            ClientState::Unavailable { reason } => Some(reason),
        }
    }

    /// Request a completion for the whole conversation.
    ///
    /// Tools are sent only when the list is non-empty and tools are enabled
    /// in configuration. Returns `None` when no client is available or the
    /// provider call failed.
    pub async fn get_completion(
        &self,
        conversation: &Conversation,
        tools: &[ToolDefinition],
    ) -> Option<Completion> {
        let ClientState::Ready { client, config } = &self.state else {
            warn!(component = "llm_executor", "No LLM client available, skipping completion");
            return None;
        };

        let tools = (config.tools_enabled && !tools.is_empty()).then_some(tools);
        debug!(
            component = "llm_executor",
            messages = conversation.len(),
            tools = tools.map_or(0, <[ToolDefinition]>::len),
            "Requesting completion"
        );

        match client
            .chat_completion(conversation.messages(), tools, CompletionOptions::default())
            .await
        {
            Ok(body) => Some(Completion::new(config.provider, body)),
            Err(e) => {
                error!(
                    component = "llm_executor",
                    kind = e.kind(),
                    status = e.status_code(),
                    error = %e,
                    "LLM completion failed"
                );
                None
            }
        }
    }

    pub async fn close(&self) {
        if let ClientState::Ready { client, .. } = &self.state {
            client.close().await;
            debug!(component = "llm_executor", "LLM client closed");
        }
    }
}
