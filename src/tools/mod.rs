//! Tool system for the agent
//!
//! This module provides the Tool trait, the ToolRegistry, and the three
//! tools the agent ships with.

pub mod datetime;
pub mod knowledge_base;
mod registry;
mod tool;
pub mod wikipedia;

pub use datetime::DateTimeTool;
pub use knowledge_base::{KnowledgeBaseTool, SearchError, SearchSettings};
pub use registry::ToolRegistry;
pub use tool::{Tool, ToolResult};
pub use wikipedia::{WikipediaError, WikipediaTool};
