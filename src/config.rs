//! Configuration loaded from the process environment
//!
//! All Azure credentials come from environment variables, optionally seeded
//! from a `.env` file in the working directory. The model settings are read
//! once at start-up and are immutable afterwards. The search settings are
//! read by the knowledge base tool each time it runs.

use std::env;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use thiserror::Error;

pub const AZURE_OAI_ENDPOINT: &str = "AZURE_OAI_ENDPOINT";
pub const AZURE_OAI_KEY: &str = "AZURE_OAI_KEY";
pub const AZURE_OAI_DEPLOYMENT: &str = "AZURE_OAI_DEPLOYMENT";
pub const AZURE_OAI_API_VERSION: &str = "AZURE_OAI_API_VERSION";
pub const AZURE_SEARCH_ENDPOINT: &str = "AZURE_SEARCH_ENDPOINT";
pub const AZURE_SEARCH_KEY: &str = "AZURE_SEARCH_KEY";
pub const AZURE_SEARCH_INDEX: &str = "AZURE_SEARCH_INDEX";
pub const AGENT_MEMORY_MAX_TOKENS: &str = "AGENT_MEMORY_MAX_TOKENS";
pub const AGENT_MAX_ITERATIONS: &str = "AGENT_MAX_ITERATIONS";
pub const WIKIPEDIA_API_URL: &str = "WIKIPEDIA_API_URL";

/// Azure OpenAI REST API version used for chat completions
pub const DEFAULT_API_VERSION: &str = "2024-02-01";
/// Token budget of the conversation buffer before older turns are summarized
pub const DEFAULT_MEMORY_MAX_TOKENS: usize = 150;
/// Maximum reasoning steps per user turn
pub const DEFAULT_MAX_ITERATIONS: usize = 15;
pub const DEFAULT_WIKIPEDIA_API_URL: &str = "https://en.wikipedia.org/w/api.php";

/// Errors raised while reading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} environment variable not set")]
    Missing(&'static str),

    #[error("invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}

/// Connection settings for the Azure OpenAI deployment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AzureOpenAiConfig {
    pub endpoint: String,
    pub api_key: String,
    pub deployment: String,
    pub api_version: String,
}

/// Connection settings for the Azure AI Search index used for grounding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchConfig {
    pub endpoint: String,
    pub api_key: String,
    pub index: String,
}

impl SearchConfig {
    /// Read the search settings straight from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Read the search settings through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            endpoint: required(&lookup, AZURE_SEARCH_ENDPOINT)?,
            api_key: required(&lookup, AZURE_SEARCH_KEY)?,
            index: required(&lookup, AZURE_SEARCH_INDEX)?,
        })
    }
}

/// Full application configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub openai: AzureOpenAiConfig,
    pub memory_max_tokens: usize,
    pub max_iterations: usize,
    pub wikipedia_api_url: String,
}

impl Config {
    /// Build the configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        tracing::info!("Loading configuration from environment");
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build the configuration through an arbitrary variable lookup
    ///
    /// Empty values count as missing.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let openai = AzureOpenAiConfig {
            endpoint: required(&lookup, AZURE_OAI_ENDPOINT)?,
            api_key: required(&lookup, AZURE_OAI_KEY)?,
            deployment: required(&lookup, AZURE_OAI_DEPLOYMENT)?,
            api_version: optional(&lookup, AZURE_OAI_API_VERSION)
                .unwrap_or_else(|| DEFAULT_API_VERSION.to_string()),
        };
        if let Err(e) = SearchConfig::from_lookup(&lookup) {
            tracing::warn!("Knowledge base search is not configured: {}", e);
        }

        let memory_max_tokens =
            parsed(&lookup, AGENT_MEMORY_MAX_TOKENS)?.unwrap_or(DEFAULT_MEMORY_MAX_TOKENS);
        let max_iterations =
            parsed(&lookup, AGENT_MAX_ITERATIONS)?.unwrap_or(DEFAULT_MAX_ITERATIONS);
        if max_iterations == 0 {
            return Err(ConfigError::Invalid {
                name: AGENT_MAX_ITERATIONS,
                value: "0".to_string(),
            });
        }

        let wikipedia_api_url = optional(&lookup, WIKIPEDIA_API_URL)
            .unwrap_or_else(|| DEFAULT_WIKIPEDIA_API_URL.to_string());

        tracing::info!("Using deployment: {}", openai.deployment);
        tracing::debug!(
            "Memory max tokens: {}, max iterations: {}",
            memory_max_tokens,
            max_iterations
        );

        Ok(Self {
            openai,
            memory_max_tokens,
            max_iterations,
            wikipedia_api_url,
        })
    }
}

/// Outcome of looking for a `.env` file
///
/// Loading happens before logging is installed, so the outcome is kept
/// and logged afterwards.
#[derive(Debug)]
pub enum DotenvStatus {
    Loaded(PathBuf),
    NotFound,
    Failed(dotenvy::Error),
}

impl DotenvStatus {
    fn from_error(e: dotenvy::Error) -> Self {
        if e.not_found() {
            DotenvStatus::NotFound
        } else {
            DotenvStatus::Failed(e)
        }
    }

    pub fn log(&self) {
        match self {
            DotenvStatus::Loaded(path) => {
                tracing::info!("Loaded environment from {}", path.display())
            }
            DotenvStatus::NotFound => tracing::debug!("No .env file found"),
            DotenvStatus::Failed(e) => tracing::warn!("Failed to load .env file: {}", e),
        }
    }
}

/// Load a `.env` file from the working directory or its parents
///
/// Variables already present in the environment are not overridden.
pub fn load_dotenv() -> DotenvStatus {
    match dotenvy::dotenv() {
        Ok(path) => DotenvStatus::Loaded(path),
        Err(e) => DotenvStatus::from_error(e),
    }
}

/// Load a specific `.env` file, keeping variables already set
pub fn load_dotenv_from(path: impl AsRef<Path>) -> DotenvStatus {
    let path = path.as_ref();
    match dotenvy::from_path(path) {
        Ok(()) => DotenvStatus::Loaded(path.to_path_buf()),
        Err(e) => DotenvStatus::from_error(e),
    }
}

fn optional<F>(lookup: &F, name: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn required<F>(lookup: &F, name: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    optional(lookup, name).ok_or(ConfigError::Missing(name))
}

fn parsed<F, T>(lookup: &F, name: &'static str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match optional(lookup, name) {
        Some(value) => value
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid { name, value }),
        None => Ok(None),
    }
}
