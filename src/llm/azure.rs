//! Azure OpenAI API client
//!
//! A direct HTTP client for the Azure OpenAI Chat Completions API. Requests
//! are addressed to a deployment rather than a model:
//!
//! ```text
//! POST {endpoint}/openai/deployments/{deployment}/chat/completions?api-version={version}
//! api-key: {key}
//! ```
//!
//! Grounded ("On Your Data") completions are requested by attaching
//! [`DataSource`](super::DataSource) entries to the [`ChatRequest`].
//!
//! ```ignore
//! let llm = AzureOpenAiProvider::new(config.openai.clone())?.with_temperature(0.0);
//! let reply = llm.complete(ChatRequest::new(vec![Message::user("Hello")])).await?;
//! ```

use anyhow::{Context, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::provider::LlmProvider;
use super::types::{ChatRequest, ChatResponse, DataSource, FinishReason, Message, Usage};
use crate::config::AzureOpenAiConfig;

/// Default request timeout (grounded completions can be slow)
const DEFAULT_TIMEOUT_SECS: u64 = 120;

// ============================================================================
// Azure-specific request/response types
// ============================================================================

#[derive(Debug, Serialize)]
struct AzureRequest<'a> {
    messages: &'a [Message],
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "slice_is_empty")]
    stop: &'a [String],
    #[serde(skip_serializing_if = "slice_is_empty")]
    data_sources: &'a [DataSource],
}

fn slice_is_empty<T>(items: &&[T]) -> bool {
    items.is_empty()
}

#[derive(Debug, Deserialize)]
struct AzureResponse {
    #[serde(default)]
    choices: Vec<AzureChoice>,
    usage: Option<AzureUsage>,
}

#[derive(Debug, Deserialize)]
struct AzureChoice {
    message: AzureMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AzureMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AzureUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct AzureErrorBody {
    error: AzureErrorDetail,
}

#[derive(Debug, Deserialize)]
struct AzureErrorDetail {
    #[serde(default)]
    code: Option<String>,
    message: String,
}

// ============================================================================
// AzureOpenAiProvider
// ============================================================================

/// Azure OpenAI LLM provider
pub struct AzureOpenAiProvider {
    client: Client,
    config: AzureOpenAiConfig,
    temperature: Option<f32>,
}

impl AzureOpenAiProvider {
    /// Create a new provider for the configured deployment
    pub fn new(config: AzureOpenAiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .context("Failed to build HTTP client")?;

        tracing::info!("Creating Azure OpenAI provider");
        tracing::info!("Using deployment: {}", config.deployment);
        tracing::info!("API version: {}", config.api_version);

        Ok(Self {
            client,
            config,
            temperature: None,
        })
    }

    /// Set the default sampling temperature, used when a request sets none
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Chat completions URL for the configured deployment
    pub fn chat_url(&self) -> String {
        format!(
            "{}/openai/deployments/{}/chat/completions?api-version={}",
            self.config.endpoint.trim_end_matches('/'),
            self.config.deployment,
            self.config.api_version
        )
    }

    /// Turn a non-success response body into a readable message
    fn describe_error(body: &str) -> String {
        match serde_json::from_str::<AzureErrorBody>(body) {
            Ok(parsed) => match parsed.error.code {
                Some(code) => format!("{}: {}", code, parsed.error.message),
                None => parsed.error.message,
            },
            Err(_) => body.to_string(),
        }
    }

    fn convert_response(&self, azure_resp: AzureResponse) -> Result<ChatResponse> {
        let choice = azure_resp
            .choices
            .into_iter()
            .next()
            .context("No choices in Azure OpenAI response")?;

        let usage = azure_resp
            .usage
            .map(|u| Usage {
                prompt_tokens: u.prompt_tokens,
                completion_tokens: u.completion_tokens,
            })
            .unwrap_or_default();

        Ok(ChatResponse {
            content: choice.message.content.unwrap_or_default(),
            finish_reason: choice.finish_reason.as_deref().map(FinishReason::from_api),
            usage,
        })
    }
}

#[async_trait::async_trait]
impl LlmProvider for AzureOpenAiProvider {
    async fn complete(&self, request: ChatRequest) -> Result<ChatResponse> {
        tracing::info!("[Azure] Sending chat completion");
        tracing::debug!("[Azure] Messages count: {}", request.messages.len());
        tracing::debug!("[Azure] Data sources: {}", request.data_sources.len());

        let body = AzureRequest {
            messages: &request.messages,
            temperature: request.temperature.or(self.temperature),
            stop: &request.stop,
            data_sources: &request.data_sources,
        };

        let response = self
            .client
            .post(self.chat_url())
            .header("api-key", &self.config.api_key)
            .json(&body)
            .send()
            .await
            .context("Failed to send request to Azure OpenAI")?;

        let status = response.status();
        let response_text = response
            .text()
            .await
            .context("Failed to read Azure OpenAI response body")?;

        tracing::debug!("[Azure] Response status: {}", status);

        if !status.is_success() {
            tracing::error!("[Azure] API error: {} - {}", status, response_text);
            anyhow::bail!(
                "Azure OpenAI API error ({}): {}",
                status,
                Self::describe_error(&response_text)
            );
        }

        let azure_response: AzureResponse = serde_json::from_str(&response_text)
            .context("Failed to parse Azure OpenAI response")?;

        let response = self.convert_response(azure_response)?;
        tracing::debug!(
            "[Azure] Usage: {} prompt / {} completion tokens",
            response.usage.prompt_tokens,
            response.usage.completion_tokens
        );

        Ok(response)
    }

    fn model(&self) -> String {
        self.config.deployment.clone()
    }

    fn provider_name(&self) -> &str {
        "azure-openai"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(endpoint: &str) -> AzureOpenAiConfig {
        AzureOpenAiConfig {
            endpoint: endpoint.to_string(),
            api_key: "key".to_string(),
            deployment: "gpt-4o".to_string(),
            api_version: "2024-02-01".to_string(),
        }
    }

    #[test]
    fn test_chat_url_trims_trailing_slash() {
        let provider = AzureOpenAiProvider::new(config("https://x.openai.azure.com/")).unwrap();
        assert_eq!(
            provider.chat_url(),
            "https://x.openai.azure.com/openai/deployments/gpt-4o/chat/completions?api-version=2024-02-01"
        );
    }

    #[test]
    fn test_describe_error_prefers_structured_message() {
        let body = r#"{"error":{"code":"401","message":"Access denied due to invalid subscription key."}}"#;
        assert_eq!(
            AzureOpenAiProvider::describe_error(body),
            "401: Access denied due to invalid subscription key."
        );
        assert_eq!(AzureOpenAiProvider::describe_error("oops"), "oops");
    }

    #[test]
    fn test_request_omits_empty_extensions() {
        let messages = vec![Message::user("hi")];
        let body = AzureRequest {
            messages: &messages,
            temperature: Some(0.0),
            stop: &[],
            data_sources: &[],
        };
        let value = serde_json::to_value(&body).unwrap();
        assert!(value.get("stop").is_none());
        assert!(value.get("data_sources").is_none());
        assert_eq!(value["messages"][0]["role"], "user");
    }
}
