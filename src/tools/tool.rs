//! Tool trait definition
//!
//! All tools implement this trait to provide a consistent interface.
//! ReAct tools take a single free-text input and produce text, so there
//! is no JSON schema here.

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Result of executing a tool
///
/// A failed lookup is still a result: its text becomes the observation the
/// agent reasons about, and `is_error` lets callers tell the two apart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolResult {
    /// Text shown to the agent as the observation
    pub output: String,
    /// Whether the tool execution resulted in an error
    pub is_error: bool,
}

impl ToolResult {
    /// Create a successful tool result
    pub fn success(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
            is_error: false,
        }
    }

    /// Create an error tool result
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            output: message.into(),
            is_error: true,
        }
    }
}

/// Trait for tools that the agent can use
#[async_trait]
pub trait Tool: Send + Sync {
    /// Name the agent uses in `Action:` lines
    fn name(&self) -> &str;

    /// Description rendered into the prompt
    fn description(&self) -> &str;

    /// Execute the tool with the given `Action Input`
    ///
    /// Expected failures (nothing found, remote service down) should come
    /// back as `Ok(ToolResult::error(..))`. An `Err` is reserved for bugs
    /// and is turned into an error observation by the executor.
    async fn execute(&self, input: &str) -> Result<ToolResult>;
}
