//! Provider abstraction over chat-completion backends

use anyhow::Result;
use async_trait::async_trait;

use super::types::{ChatRequest, ChatResponse};

/// A chat-completion backend
///
/// The agent executor, the summarizing memory and the knowledge-base tool
/// all talk to the model through this trait, so tests can swap in a
/// scripted provider.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Send a chat completion request
    async fn complete(&self, request: ChatRequest) -> Result<ChatResponse>;

    /// Model or deployment name
    fn model(&self) -> String;

    /// Provider name for logging
    fn provider_name(&self) -> &str;
}
