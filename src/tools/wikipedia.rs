//! Wikipedia lookup tool
//!
//! Resolves a free-text query to the best matching article through the
//! MediaWiki API and returns its introduction as plain text.
//!
//! Lookup is two requests: a full-text search to pick a title, then an
//! extract query on that title. Disambiguation pages are detected through
//! the `disambiguation` page property, and a third request lists the pages
//! they point to.

use anyhow::Result;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

use super::tool::{Tool, ToolResult};

/// Default timeout in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 30;
/// Maximum number of options listed for a disambiguation page
const MAX_DISAMBIGUATION_OPTIONS: usize = 50;
/// Fixed observation for a query without a matching article
pub const PAGE_NOT_FOUND: &str = "Page not found.";

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Errors from a Wikipedia lookup
#[derive(Debug, Error)]
pub enum WikipediaError {
    #[error("\"{title}\" may refer to: \n{}", .options.join("\n"))]
    Disambiguation { title: String, options: Vec<String> },

    #[error("Page \"{0}\" does not match any pages")]
    PageNotFound(String),

    #[error("Wikipedia API error {code}: {info}")]
    Api { code: String, info: String },

    #[error("Wikipedia request failed: {0}")]
    Http(#[from] reqwest::Error),
}

impl WikipediaError {
    /// Observation text handed back to the agent
    pub fn observation(&self) -> String {
        match self {
            WikipediaError::Disambiguation { .. } => format!("Disambiguation error: {}", self),
            WikipediaError::PageNotFound(_) => PAGE_NOT_FOUND.to_string(),
            other => other.to_string(),
        }
    }
}

// ============================================================================
// MediaWiki response types (formatversion=2)
// ============================================================================

#[derive(Debug, Deserialize)]
struct ApiError {
    code: String,
    #[serde(default)]
    info: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    error: Option<ApiError>,
    query: Option<SearchQuery>,
}

#[derive(Debug, Deserialize)]
struct SearchQuery {
    #[serde(default)]
    search: Vec<SearchHit>,
    searchinfo: Option<SearchInfo>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    title: String,
}

#[derive(Debug, Deserialize)]
struct SearchInfo {
    suggestion: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PageResponse {
    error: Option<ApiError>,
    query: Option<PageQuery>,
}

#[derive(Debug, Deserialize)]
struct PageQuery {
    #[serde(default)]
    pages: Vec<Page>,
}

#[derive(Debug, Deserialize)]
struct Page {
    title: String,
    #[serde(default)]
    missing: bool,
    #[serde(default)]
    invalid: bool,
    extract: Option<String>,
    pageprops: Option<PageProps>,
    #[serde(default)]
    links: Vec<PageLink>,
}

impl Page {
    fn is_disambiguation(&self) -> bool {
        self.pageprops
            .as_ref()
            .is_some_and(|p| p.disambiguation.is_some())
    }
}

#[derive(Debug, Deserialize)]
struct PageProps {
    disambiguation: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct PageLink {
    title: String,
}

// ============================================================================
// WikipediaTool
// ============================================================================

/// Wikipedia summary tool
pub struct WikipediaTool {
    api_url: String,
    client: reqwest::Client,
}

impl WikipediaTool {
    /// Create a tool talking to the given `api.php` endpoint
    pub fn new(api_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            api_url: api_url.into(),
            client,
        })
    }

    /// Summary of the best matching article
    pub async fn summary(&self, query: &str) -> Result<String, WikipediaError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(WikipediaError::PageNotFound(String::new()));
        }

        let title = self.resolve_title(query).await?;
        tracing::debug!("Wikipedia query {:?} resolved to {:?}", query, title);

        let page = self.fetch_page(&title).await?;

        if page.missing || page.invalid {
            return Err(WikipediaError::PageNotFound(title));
        }

        if page.is_disambiguation() {
            let options = self.fetch_links(&page.title).await?;
            return Err(WikipediaError::Disambiguation {
                title: page.title,
                options,
            });
        }

        match page.extract.map(|e| e.trim().to_string()) {
            Some(extract) if !extract.is_empty() => Ok(extract),
            _ => Err(WikipediaError::PageNotFound(page.title)),
        }
    }

    /// Pick an article title for a free-text query
    async fn resolve_title(&self, query: &str) -> Result<String, WikipediaError> {
        let response: SearchResponse = self
            .client
            .get(&self.api_url)
            .query(&[
                ("action", "query"),
                ("list", "search"),
                ("srsearch", query),
                ("srlimit", "1"),
                ("srinfo", "suggestion"),
                ("srprop", ""),
                ("format", "json"),
                ("formatversion", "2"),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if let Some(error) = response.error {
            return Err(WikipediaError::Api {
                code: error.code,
                info: error.info,
            });
        }

        let search = response.query.ok_or_else(|| WikipediaError::PageNotFound(query.to_string()))?;
        let top_hit = search.search.into_iter().next().map(|hit| hit.title);

        // The spelling suggestion wins over the top hit
        search
            .searchinfo
            .and_then(|info| info.suggestion)
            .filter(|s| !s.trim().is_empty())
            .or(top_hit)
            .ok_or_else(|| WikipediaError::PageNotFound(query.to_string()))
    }

    async fn fetch_page(&self, title: &str) -> Result<Page, WikipediaError> {
        let response: PageResponse = self
            .client
            .get(&self.api_url)
            .query(&[
                ("action", "query"),
                ("prop", "extracts|pageprops"),
                ("exintro", "1"),
                ("explaintext", "1"),
                ("ppprop", "disambiguation"),
                ("redirects", "1"),
                ("titles", title),
                ("format", "json"),
                ("formatversion", "2"),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if let Some(error) = response.error {
            return Err(WikipediaError::Api {
                code: error.code,
                info: error.info,
            });
        }

        response
            .query
            .and_then(|q| q.pages.into_iter().next())
            .ok_or_else(|| WikipediaError::PageNotFound(title.to_string()))
    }

    /// Article titles a disambiguation page links to
    async fn fetch_links(&self, title: &str) -> Result<Vec<String>, WikipediaError> {
        let limit = MAX_DISAMBIGUATION_OPTIONS.to_string();
        let response: PageResponse = self
            .client
            .get(&self.api_url)
            .query(&[
                ("action", "query"),
                ("prop", "links"),
                ("plnamespace", "0"),
                ("pllimit", limit.as_str()),
                ("titles", title),
                ("format", "json"),
                ("formatversion", "2"),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if let Some(error) = response.error {
            return Err(WikipediaError::Api {
                code: error.code,
                info: error.info,
            });
        }

        Ok(response
            .query
            .and_then(|q| q.pages.into_iter().next())
            .map(|page| page.links.into_iter().map(|l| l.title).collect())
            .unwrap_or_default())
    }
}

#[async_trait]
impl Tool for WikipediaTool {
    fn name(&self) -> &str {
        "Wikipedia"
    }

    fn description(&self) -> &str {
        "Useful for getting Wikipedia summaries."
    }

    async fn execute(&self, input: &str) -> Result<ToolResult> {
        match self.summary(input).await {
            Ok(summary) => Ok(ToolResult::success(summary)),
            Err(e) => {
                tracing::warn!("Wikipedia lookup failed for {:?}: {}", input, e);
                Ok(ToolResult::error(e.observation()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_observations() {
        let err = WikipediaError::Disambiguation {
            title: "Mercury".to_string(),
            options: vec!["Mercury (planet)".to_string(), "Mercury (element)".to_string()],
        };
        assert_eq!(
            err.observation(),
            "Disambiguation error: \"Mercury\" may refer to: \nMercury (planet)\nMercury (element)"
        );

        let err = WikipediaError::PageNotFound("Xyzzy".to_string());
        assert_eq!(err.observation(), PAGE_NOT_FOUND);

        let err = WikipediaError::Api {
            code: "maxlag".to_string(),
            info: "Waiting for replica".to_string(),
        };
        assert_eq!(err.observation(), "Wikipedia API error maxlag: Waiting for replica");
    }

    #[test]
    fn test_disambiguation_flag() {
        let page: Page = serde_json::from_str(
            r#"{"pageid": 1, "title": "Mercury", "extract": "Mercury may refer to:", "pageprops": {"disambiguation": ""}}"#,
        )
        .unwrap();
        assert!(page.is_disambiguation());

        let page: Page = serde_json::from_str(r#"{"title": "Nope", "missing": true}"#).unwrap();
        assert!(page.missing);
        assert!(!page.is_disambiguation());
    }

    #[tokio::test]
    async fn test_empty_query_is_not_found() {
        let tool = WikipediaTool::new("http://127.0.0.1:9/w/api.php").unwrap();
        let result = tool.execute("   ").await.unwrap();
        assert!(result.is_error);
        assert_eq!(result.output, PAGE_NOT_FOUND);
    }
}
