//! Raw completion responses

use super::provider::LlmProvider;
use crate::session::entities::Message;
use crate::tool::entities::ToolCallRequest;
use serde_json::Value;

/// A provider-native completion response tagged with its provider.
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    provider: LlmProvider,
    body: Value,
}

impl Completion {
    pub fn new(provider: LlmProvider, body: Value) -> Self {
        Self { provider, body }
    }

    pub fn provider(&self) -> LlmProvider {
        self.provider
    }

    pub fn body(&self) -> &Value {
        &self.body
    }

    pub fn need_tools_call(&self) -> bool {
        self.provider.need_tools_call(&self.body)
    }

    pub fn prepare_tools_call(&self) -> Vec<ToolCallRequest> {
        self.provider.prepare_tools_call(&self.body)
    }

    pub fn assistant_message(&self) -> Option<Message> {
        self.provider.assistant_message(&self.body)
    }
}
