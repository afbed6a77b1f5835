//! ReAct agent executor
//!
//! Each user turn runs an inner loop:
//! - render the prompt (tools, history, question, scratchpad)
//! - ask the model for the next step, stopping before `Observation`
//! - run the requested tool and append its observation to the scratchpad
//!
//! until the model gives a final answer or the iteration cap is reached.
//! The finished exchange is then saved to the summarizing memory.

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::Instrument;
use uuid::Uuid;

use super::parser::{self, AgentAction, AgentDecision};
use super::prompt::{PromptTemplate, PromptVars, STOP_SEQUENCE};
use super::Agent;
use crate::config::DEFAULT_MAX_ITERATIONS;
use crate::llm::{ChatRequest, LlmProvider, Message};
use crate::memory::SummaryBufferMemory;
use crate::tools::ToolRegistry;

/// Answer returned when the iteration cap is hit
pub const STOPPED_OUTPUT: &str = "Agent stopped due to iteration limit or time limit.";
/// Tool name recorded for steps that failed to parse
pub const EXCEPTION_TOOL: &str = "_Exception";

/// A completed reasoning step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentStep {
    pub action: AgentAction,
    pub observation: String,
}

/// Result of one user turn
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentOutput {
    pub input: String,
    pub output: String,
    pub steps: Vec<AgentStep>,
}

/// Render completed steps the way the model expects to continue them
pub fn format_scratchpad(steps: &[AgentStep]) -> String {
    let mut scratchpad = String::new();
    for step in steps {
        scratchpad.push_str(&step.action.log);
        scratchpad.push_str("\nObservation: ");
        scratchpad.push_str(&step.observation);
        scratchpad.push_str("\nThought: ");
    }
    scratchpad
}

/// Cut model output at the observation marker in case the service ignored
/// the stop sequence
fn strip_hallucinated_observation(text: &str) -> &str {
    match text.find(STOP_SEQUENCE) {
        Some(i) => &text[..i],
        None => text,
    }
}

/// ReAct executor over a model, a tool registry and a summarizing memory
pub struct AgentExecutor {
    llm: Arc<dyn LlmProvider>,
    tools: ToolRegistry,
    prompt: PromptTemplate,
    memory: SummaryBufferMemory,
    max_iterations: usize,
    handle_parsing_errors: bool,
}

impl AgentExecutor {
    /// Create an executor with the default ReAct prompt
    pub fn new(llm: Arc<dyn LlmProvider>, tools: ToolRegistry, memory: SummaryBufferMemory) -> Self {
        tracing::info!(
            "Creating agent executor on {} ({}) with {} tools: {}",
            llm.provider_name(),
            llm.model(),
            tools.len(),
            tools.render_names()
        );

        Self {
            llm,
            tools,
            prompt: PromptTemplate::react(),
            memory,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            handle_parsing_errors: true,
        }
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Whether malformed model output becomes an observation (default) or
    /// an error
    pub fn with_handle_parsing_errors(mut self, handle: bool) -> Self {
        self.handle_parsing_errors = handle;
        self
    }

    pub fn memory(&self) -> &SummaryBufferMemory {
        &self.memory
    }

    /// Run one user turn to completion
    pub async fn invoke(&mut self, input: &str) -> Result<AgentOutput> {
        let run_id = Uuid::new_v4();
        let span = tracing::info_span!("agent_run", %run_id);
        self.run_turn(input).instrument(span).await
    }

    async fn run_turn(&mut self, input: &str) -> Result<AgentOutput> {
        tracing::info!("Processing user input: {}", input);

        let tools = self.tools.render_descriptions();
        let tool_names = self.tools.render_names();
        let chat_history = self.memory.chat_history();
        let mut steps: Vec<AgentStep> = Vec::new();
        let mut output = None;

        for iteration in 1..=self.max_iterations {
            let scratchpad = format_scratchpad(&steps);
            let prompt = self.prompt.render(&PromptVars {
                tools: &tools,
                tool_names: &tool_names,
                chat_history: &chat_history,
                input,
                agent_scratchpad: &scratchpad,
            });

            let request = ChatRequest::new(vec![Message::user(prompt)])
                .with_temperature(0.0)
                .with_stop(STOP_SEQUENCE);

            let response = self
                .llm
                .complete(request)
                .await
                .context("Language model call failed")?;
            if response.is_truncated() {
                tracing::warn!(
                    "Step {} output was cut short: {:?}",
                    iteration,
                    response.finish_reason
                );
            }
            let text = strip_hallucinated_observation(&response.content);
            tracing::info!("Step {} model output: {}", iteration, text);

            match parser::parse(text) {
                Ok(AgentDecision::Finish(finish)) => {
                    tracing::info!("Final answer after {} steps", steps.len());
                    output = Some(finish.output);
                    break;
                }
                Ok(AgentDecision::Action(action)) => {
                    let observation = self.run_tool(&action).await;
                    tracing::info!("Observation: {}", observation);
                    steps.push(AgentStep {
                        action,
                        observation,
                    });
                }
                Err(e) if self.handle_parsing_errors => {
                    tracing::warn!("Recovering from unparseable model output: {}", e);
                    let observation = e.observation();
                    steps.push(AgentStep {
                        action: AgentAction {
                            tool: EXCEPTION_TOOL.to_string(),
                            tool_input: observation.clone(),
                            log: text.to_string(),
                        },
                        observation,
                    });
                }
                Err(e) => return Err(e).context("Failed to parse model output"),
            }
        }

        let output = output.unwrap_or_else(|| {
            tracing::warn!("Maximum iterations ({}) reached", self.max_iterations);
            STOPPED_OUTPUT.to_string()
        });

        self.memory
            .save_context(input, &output)
            .await
            .context("Failed to update conversation memory")?;

        Ok(AgentOutput {
            input: input.to_string(),
            output,
            steps,
        })
    }

    /// Execute a tool call, always producing an observation
    async fn run_tool(&self, action: &AgentAction) -> String {
        tracing::info!("Action: {} (input: {})", action.tool, action.tool_input);

        match self.tools.execute(&action.tool, &action.tool_input).await {
            Ok(result) => {
                if result.is_error {
                    tracing::warn!("Tool {} reported an error: {}", action.tool, result.output);
                }
                result.output
            }
            Err(e) => {
                tracing::error!("Tool {} failed: {:?}", action.tool, e);
                format!("Tool execution failed: {:#}", e)
            }
        }
    }
}

#[async_trait]
impl Agent for AgentExecutor {
    async fn invoke(&mut self, input: &str) -> Result<AgentOutput> {
        AgentExecutor::invoke(self, input).await
    }
}
