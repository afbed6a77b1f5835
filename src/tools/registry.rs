//! Registry of the tools available to the agent

use anyhow::Result;
use std::collections::HashMap;
use std::sync::Arc;

use super::tool::{Tool, ToolResult};

/// Ordered collection of tools, looked up by name
///
/// Registration order is preserved so the prompt lists tools the same way
/// on every turn.
#[derive(Default, Clone)]
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool, replacing any earlier tool with the same name
    pub fn register<T: Tool + 'static>(&mut self, tool: T) {
        self.register_arc(Arc::new(tool));
    }

    pub fn register_arc(&mut self, tool: Arc<dyn Tool>) {
        let name = tool.name().to_string();
        tracing::debug!("Registering tool: {}", name);
        match self.index.get(&name) {
            Some(&i) => self.tools[i] = tool,
            None => {
                self.index.insert(name, self.tools.len());
                self.tools.push(tool);
            }
        }
    }

    /// Builder-style registration
    pub fn with_tool<T: Tool + 'static>(mut self, tool: T) -> Self {
        self.register(tool);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.index.get(name).map(|&i| &self.tools[i])
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Tool names in registration order
    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    /// `name: description` lines for the prompt
    pub fn render_descriptions(&self) -> String {
        self.tools
            .iter()
            .map(|t| format!("{}: {}", t.name(), t.description()))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Comma separated tool names for the prompt
    pub fn render_names(&self) -> String {
        self.names().join(", ")
    }

    /// Execute a tool by name
    ///
    /// An unknown name is not an error: the agent gets an observation
    /// pointing at the valid choices so it can correct itself.
    pub async fn execute(&self, name: &str, input: &str) -> Result<ToolResult> {
        match self.get(name) {
            Some(tool) => {
                tracing::info!("Executing tool: {} (input: {})", name, input);
                tool.execute(input).await
            }
            None => {
                tracing::warn!("Unknown tool requested: {}", name);
                Ok(ToolResult::error(format!(
                    "{} is not a valid tool, try one of [{}].",
                    name,
                    self.render_names()
                )))
            }
        }
    }
}
