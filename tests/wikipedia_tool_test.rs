// Tests for the Wikipedia tool against a mock MediaWiki API

use react_rag_agent::tools::wikipedia::PAGE_NOT_FOUND;
use react_rag_agent::tools::{Tool, WikipediaTool};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const API_PATH: &str = "/w/api.php";

async fn mount_search(server: &MockServer, query: &str, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(API_PATH))
        .and(query_param("list", "search"))
        .and(query_param("srsearch", query))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

async fn mount_page(server: &MockServer, title: &str, page: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path(API_PATH))
        .and(query_param("prop", "extracts|pageprops"))
        .and(query_param("titles", title))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"batchcomplete": true, "query": {"pages": [page]}})),
        )
        .mount(server)
        .await;
}

fn tool(server: &MockServer) -> WikipediaTool {
    WikipediaTool::new(format!("{}{}", server.uri(), API_PATH)).unwrap()
}

#[tokio::test]
async fn test_valid_query_returns_summary() {
    let server = MockServer::start().await;
    mount_search(
        &server,
        "Dune novel",
        json!({"query": {"search": [{"ns": 0, "title": "Dune (novel)"}]}}),
    )
    .await;
    mount_page(
        &server,
        "Dune (novel)",
        json!({
            "pageid": 8790,
            "title": "Dune (novel)",
            "extract": "Dune is a 1965 epic science fiction novel by American author Frank Herbert.\n"
        }),
    )
    .await;

    let result = tool(&server).execute("Dune novel").await.unwrap();

    assert!(!result.is_error);
    assert_eq!(
        result.output,
        "Dune is a 1965 epic science fiction novel by American author Frank Herbert."
    );
}

#[tokio::test]
async fn test_ambiguous_query_reports_disambiguation() {
    let server = MockServer::start().await;
    mount_search(
        &server,
        "Mercury",
        json!({"query": {"search": [{"ns": 0, "title": "Mercury"}]}}),
    )
    .await;
    mount_page(
        &server,
        "Mercury",
        json!({
            "pageid": 19694,
            "title": "Mercury",
            "extract": "Mercury commonly refers to:",
            "pageprops": {"disambiguation": ""}
        }),
    )
    .await;
    Mock::given(method("GET"))
        .and(path(API_PATH))
        .and(query_param("prop", "links"))
        .and(query_param("titles", "Mercury"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "query": {"pages": [{
                "title": "Mercury",
                "links": [
                    {"ns": 0, "title": "Mercury (planet)"},
                    {"ns": 0, "title": "Mercury (element)"}
                ]
            }]}
        })))
        .mount(&server)
        .await;

    let result = tool(&server).execute("Mercury").await.unwrap();

    assert!(result.is_error);
    assert!(result.output.contains("Disambiguation error"));
    assert!(result.output.contains("Mercury (planet)"));
    assert!(result.output.contains("Mercury (element)"));
}

#[tokio::test]
async fn test_no_search_hits_is_page_not_found() {
    let server = MockServer::start().await;
    mount_search(
        &server,
        "qwzxqwzx",
        json!({"query": {"searchinfo": {"totalhits": 0}, "search": []}}),
    )
    .await;

    let result = tool(&server).execute("qwzxqwzx").await.unwrap();

    assert!(result.is_error);
    assert_eq!(result.output, PAGE_NOT_FOUND);
    assert_eq!(result.output, "Page not found.");
}

#[tokio::test]
async fn test_suggestion_used_when_search_is_empty() {
    let server = MockServer::start().await;
    mount_search(
        &server,
        "albert einstien",
        json!({"query": {"searchinfo": {"suggestion": "albert einstein"}, "search": []}}),
    )
    .await;
    mount_page(
        &server,
        "albert einstein",
        json!({"title": "Albert Einstein", "extract": "Albert Einstein was a theoretical physicist."}),
    )
    .await;

    let result = tool(&server).execute("albert einstien").await.unwrap();

    assert!(!result.is_error);
    assert!(result.output.contains("theoretical physicist"));
}

#[tokio::test]
async fn test_suggestion_preferred_over_top_hit() {
    let server = MockServer::start().await;
    mount_search(
        &server,
        "new yrok",
        json!({"query": {
            "searchinfo": {"suggestion": "new york"},
            "search": [{"ns": 0, "title": "Yrok River"}]
        }}),
    )
    .await;
    mount_page(
        &server,
        "new york",
        json!({"title": "New York", "extract": "New York is a state in the United States."}),
    )
    .await;
    mount_page(
        &server,
        "Yrok River",
        json!({"title": "Yrok River", "extract": "The Yrok is a river."}),
    )
    .await;

    let result = tool(&server).execute("new yrok").await.unwrap();

    assert!(!result.is_error);
    assert_eq!(result.output, "New York is a state in the United States.");
}

#[tokio::test]
async fn test_missing_page_is_page_not_found() {
    let server = MockServer::start().await;
    mount_search(
        &server,
        "Ghost",
        json!({"query": {"search": [{"ns": 0, "title": "Ghost page"}]}}),
    )
    .await;
    mount_page(&server, "Ghost page", json!({"title": "Ghost page", "missing": true})).await;

    let result = tool(&server).execute("Ghost").await.unwrap();

    assert_eq!(result.output, "Page not found.");
}

#[tokio::test]
async fn test_server_failure_is_returned_as_text() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(API_PATH))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let result = tool(&server).execute("Dune").await.unwrap();

    assert!(result.is_error);
    assert!(!result.output.is_empty());
    assert_ne!(result.output, "Page not found.");
    assert!(result.output.contains("503"));
}
