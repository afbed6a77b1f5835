//! Date/time tool
//!
//! Returns the current local time. The agent has no clock of its own, so
//! questions like "what day is it" go through this tool.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{Local, NaiveDateTime};

use super::tool::{Tool, ToolResult};

/// ISO-8601 local timestamp with microseconds and no offset
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

pub struct DateTimeTool;

impl DateTimeTool {
    pub fn new() -> Self {
        Self
    }

    /// Current local time formatted with [`TIMESTAMP_FORMAT`]
    pub fn now() -> String {
        Local::now().naive_local().format(TIMESTAMP_FORMAT).to_string()
    }

    /// Parse a timestamp produced by [`DateTimeTool::now`]
    pub fn parse(timestamp: &str) -> chrono::ParseResult<NaiveDateTime> {
        NaiveDateTime::parse_from_str(timestamp, TIMESTAMP_FORMAT)
    }
}

impl Default for DateTimeTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for DateTimeTool {
    fn name(&self) -> &str {
        "Date Time"
    }

    fn description(&self) -> &str {
        "Useful for checking the current date and time."
    }

    async fn execute(&self, _input: &str) -> Result<ToolResult> {
        Ok(ToolResult::success(Self::now()))
    }
}
