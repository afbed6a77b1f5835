// Tests for the knowledge base tool against a mock Azure OpenAI endpoint

use std::sync::Arc;

use react_rag_agent::config::{AzureOpenAiConfig, SearchConfig};
use react_rag_agent::llm::AzureOpenAiProvider;
use react_rag_agent::tools::{KnowledgeBaseTool, Tool};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CHAT_PATH: &str = "/openai/deployments/gpt-4o/chat/completions";

fn openai_config(endpoint: &str) -> AzureOpenAiConfig {
    AzureOpenAiConfig {
        endpoint: format!("{}/", endpoint),
        api_key: "oai-key".to_string(),
        deployment: "gpt-4o".to_string(),
        api_version: "2024-02-01".to_string(),
    }
}

fn search_config() -> SearchConfig {
    SearchConfig {
        endpoint: "https://margies.search.windows.net/".to_string(),
        api_key: "search-key".to_string(),
        index: "margies-index".to_string(),
    }
}

fn tool(endpoint: &str) -> KnowledgeBaseTool {
    let llm = Arc::new(AzureOpenAiProvider::new(openai_config(endpoint)).unwrap());
    KnowledgeBaseTool::with_settings(llm, search_config())
}

#[tokio::test]
async fn test_grounded_answer() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(CHAT_PATH))
        .and(query_param("api-version", "2024-02-01"))
        .and(header("api-key", "oai-key"))
        .and(body_partial_json(json!({
            "messages": [{"role": "user", "content": "Which hotels are in London?"}],
            "data_sources": [{
                "type": "azure_search",
                "parameters": {
                    "endpoint": "https://margies.search.windows.net/",
                    "index_name": "margies-index",
                    "authentication": {"type": "api_key", "key": "search-key"}
                }
            }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "chatcmpl-1",
            "object": "extensions.chat.completion",
            "created": 1700000000,
            "model": "gpt-4o",
            "choices": [{
                "index": 0,
                "finish_reason": "stop",
                "message": {
                    "role": "assistant",
                    "content": "Margie's Travel offers The Kensington Hotel [doc1].",
                    "context": {"citations": []}
                }
            }],
            "usage": {"prompt_tokens": 120, "completion_tokens": 12, "total_tokens": 132}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let result = tool(&server.uri()).execute("Which hotels are in London?").await.unwrap();

    assert!(!result.is_error);
    assert_eq!(result.output, "Margie's Travel offers The Kensington Hotel [doc1].");
}

#[tokio::test]
async fn test_invalid_credentials_return_search_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(CHAT_PATH))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": {"code": "401", "message": "Access denied due to invalid subscription key."}
        })))
        .mount(&server)
        .await;

    let result = tool(&server.uri()).execute("anything").await.unwrap();

    assert!(result.is_error);
    assert!(result.output.starts_with("Search error:"));
    assert!(result.output.contains("invalid subscription key"));
}

#[tokio::test]
async fn test_unreachable_service_returns_search_error() {
    // Nothing listens on the discard port
    let result = tool("http://127.0.0.1:9").execute("anything").await.unwrap();

    assert!(result.is_error);
    assert!(result.output.starts_with("Search error:"));
}

#[tokio::test]
async fn test_missing_search_settings_return_search_error() {
    for name in ["AZURE_SEARCH_ENDPOINT", "AZURE_SEARCH_KEY", "AZURE_SEARCH_INDEX"] {
        std::env::remove_var(name);
    }

    let llm = Arc::new(AzureOpenAiProvider::new(openai_config("http://127.0.0.1:9")).unwrap());
    let result = KnowledgeBaseTool::new(llm).execute("anything").await.unwrap();

    assert!(result.is_error);
    assert_eq!(
        result.output,
        "Search error: AZURE_SEARCH_ENDPOINT environment variable not set"
    );
}
