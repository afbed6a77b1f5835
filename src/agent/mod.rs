pub mod agent_loop;
pub mod parser;
pub mod prompt;

use anyhow::Result;
use async_trait::async_trait;

pub use agent_loop::{AgentExecutor, AgentOutput, AgentStep, STOPPED_OUTPUT};
pub use parser::{AgentAction, AgentDecision, AgentFinish, ParseError};
pub use prompt::{PromptTemplate, PromptVars, REACT_TEMPLATE};

/// Anything that can answer a user turn
///
/// The interactive loop depends on this rather than on `AgentExecutor`
/// directly, so it can be driven by a scripted agent in tests.
#[async_trait]
pub trait Agent: Send {
    async fn invoke(&mut self, input: &str) -> Result<AgentOutput>;
}
