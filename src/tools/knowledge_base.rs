//! Company knowledge base tool
//!
//! Answers questions from internal documents. The query goes to the chat
//! deployment with an Azure AI Search data source attached, so the service
//! retrieves matching documents and grounds its answer in them.

use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

use super::tool::{Tool, ToolResult};
use crate::config::{ConfigError, SearchConfig};
use crate::llm::{ChatRequest, DataSource, LlmProvider, Message};

/// Prefix of every failure observation from this tool
pub const SEARCH_ERROR_PREFIX: &str = "Search error: ";

/// Errors from a knowledge base query
#[derive(Debug, Error)]
pub enum SearchError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("{0:#}")]
    Service(anyhow::Error),

    #[error("the service returned an empty answer")]
    EmptyAnswer,
}

/// Where the search index settings come from
#[derive(Debug, Clone)]
pub enum SearchSettings {
    /// Re-read `AZURE_SEARCH_*` from the environment on every call
    Environment,
    /// Use these settings for every call
    Fixed(SearchConfig),
}

impl SearchSettings {
    fn resolve(&self) -> Result<SearchConfig, ConfigError> {
        match self {
            SearchSettings::Environment => SearchConfig::from_env(),
            SearchSettings::Fixed(config) => Ok(config.clone()),
        }
    }
}

/// Grounded search over the company knowledge base
pub struct KnowledgeBaseTool {
    llm: Arc<dyn LlmProvider>,
    settings: SearchSettings,
}

impl KnowledgeBaseTool {
    /// Create a tool that reads the search settings at call time
    pub fn new(llm: Arc<dyn LlmProvider>) -> Self {
        Self {
            llm,
            settings: SearchSettings::Environment,
        }
    }

    /// Create a tool with fixed search settings
    pub fn with_settings(llm: Arc<dyn LlmProvider>, config: SearchConfig) -> Self {
        Self {
            llm,
            settings: SearchSettings::Fixed(config),
        }
    }

    /// Ask the grounded deployment a question
    pub async fn search(&self, query: &str) -> Result<String, SearchError> {
        let search = self.settings.resolve()?;
        tracing::info!("Searching knowledge base index {:?}", search.index);

        let request = ChatRequest::new(vec![Message::user(query)]).with_data_source(
            DataSource::azure_search(search.endpoint, search.index, search.api_key),
        );

        let response = self.llm.complete(request).await.map_err(SearchError::Service)?;

        let answer = response.content.trim();
        if answer.is_empty() {
            return Err(SearchError::EmptyAnswer);
        }
        Ok(answer.to_string())
    }
}

#[async_trait]
impl Tool for KnowledgeBaseTool {
    fn name(&self) -> &str {
        "Company Knowledge Base"
    }

    fn description(&self) -> &str {
        "Use this to search internal documents and get grounded answers from the knowledge base."
    }

    async fn execute(&self, input: &str) -> Result<ToolResult> {
        match self.search(input).await {
            Ok(answer) => Ok(ToolResult::success(answer)),
            Err(e) => {
                tracing::warn!("Knowledge base search failed: {}", e);
                Ok(ToolResult::error(format!("{}{}", SEARCH_ERROR_PREFIX, e)))
            }
        }
    }
}
