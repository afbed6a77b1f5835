//! Chat types shared by the language model providers
//!
//! These are the crate's own message and request types. Providers translate
//! them to the wire format of their API at the boundary.

use serde::{Deserialize, Serialize};

/// Role of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    /// Prefix used when rendering a transcript as plain text
    pub fn transcript_prefix(&self) -> &'static str {
        match self {
            Role::System => "System",
            Role::User => "Human",
            Role::Assistant => "AI",
        }
    }
}

/// A single chat message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }

    /// Render as a `Human: ...` / `AI: ...` transcript line
    pub fn transcript_line(&self) -> String {
        format!("{}: {}", self.role.transcript_prefix(), self.content)
    }
}

/// Render messages as a plain-text transcript, one line per message
pub fn render_transcript(messages: &[Message]) -> String {
    messages
        .iter()
        .map(Message::transcript_line)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Authentication used by Azure AI Search when grounding a completion
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SearchAuthentication {
    ApiKey { key: String },
}

/// Parameters for an Azure AI Search data source
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AzureSearchParameters {
    pub endpoint: String,
    pub index_name: String,
    pub authentication: SearchAuthentication,
}

/// A retrieval source the service consults before answering
/// ("On Your Data" extension of Azure OpenAI)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DataSource {
    AzureSearch { parameters: AzureSearchParameters },
}

impl DataSource {
    pub fn azure_search(
        endpoint: impl Into<String>,
        index_name: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        DataSource::AzureSearch {
            parameters: AzureSearchParameters {
                endpoint: endpoint.into(),
                index_name: index_name.into(),
                authentication: SearchAuthentication::ApiKey { key: api_key.into() },
            },
        }
    }
}

/// A chat completion request
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChatRequest {
    pub messages: Vec<Message>,
    pub temperature: Option<f32>,
    pub stop: Vec<String>,
    pub data_sources: Vec<DataSource>,
}

impl ChatRequest {
    pub fn new(messages: Vec<Message>) -> Self {
        Self {
            messages,
            ..Default::default()
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_stop(mut self, stop: impl Into<String>) -> Self {
        self.stop.push(stop.into());
        self
    }

    pub fn with_data_source(mut self, source: DataSource) -> Self {
        self.data_sources.push(source);
        self
    }
}

/// Why the model stopped generating
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinishReason {
    Stop,
    Length,
    ContentFilter,
    Other,
}

impl FinishReason {
    pub fn from_api(reason: &str) -> Self {
        match reason {
            "stop" => FinishReason::Stop,
            "length" => FinishReason::Length,
            "content_filter" => FinishReason::ContentFilter,
            _ => FinishReason::Other,
        }
    }
}

/// Token usage reported by the service
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

/// A chat completion response
#[derive(Debug, Clone, PartialEq)]
pub struct ChatResponse {
    pub content: String,
    pub finish_reason: Option<FinishReason>,
    pub usage: Usage,
}

impl ChatResponse {
    /// Build a response carrying only text, used by scripted providers
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            finish_reason: Some(FinishReason::Stop),
            usage: Usage::default(),
        }
    }

    /// Whether the service stopped early (token limit or content filter)
    pub fn is_truncated(&self) -> bool {
        matches!(
            self.finish_reason,
            Some(FinishReason::Length | FinishReason::ContentFilter)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_data_source_wire_shape() {
        let source = DataSource::azure_search("https://s.search.windows.net", "docs", "k");
        assert_eq!(
            serde_json::to_value(&source).unwrap(),
            json!({
                "type": "azure_search",
                "parameters": {
                    "endpoint": "https://s.search.windows.net",
                    "index_name": "docs",
                    "authentication": {"type": "api_key", "key": "k"}
                }
            })
        );
    }

    #[test]
    fn test_truncated_finish_reasons() {
        let mut response = ChatResponse::text("partial");
        assert!(!response.is_truncated());

        response.finish_reason = Some(FinishReason::from_api("length"));
        assert!(response.is_truncated());
        response.finish_reason = Some(FinishReason::from_api("content_filter"));
        assert!(response.is_truncated());
        response.finish_reason = Some(FinishReason::from_api("tool_calls"));
        assert!(!response.is_truncated());
        response.finish_reason = None;
        assert!(!response.is_truncated());
    }

    #[test]
    fn test_transcript_rendering() {
        let messages = vec![Message::user("hi"), Message::assistant("hello")];
        assert_eq!(render_transcript(&messages), "Human: hi\nAI: hello");
    }
}
