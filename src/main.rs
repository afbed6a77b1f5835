use anyhow::{Context, Result};
use std::sync::Arc;

use react_rag_agent::{
    agent::AgentExecutor,
    cli::{self, Console},
    config::{self, Config},
    llm::{AzureOpenAiProvider, LlmProvider},
    logging,
    memory::SummaryBufferMemory,
    tools::{DateTimeTool, KnowledgeBaseTool, ToolRegistry, WikipediaTool},
};

#[tokio::main]
async fn main() -> Result<()> {
    // .env first so it can also set RUST_LOG
    let dotenv = config::load_dotenv();
    logging::init_logging()?;
    dotenv.log();

    let config = Config::from_env().context("Failed to load configuration")?;

    // Reasoning model: deterministic output for the ReAct format
    let llm: Arc<dyn LlmProvider> =
        Arc::new(AzureOpenAiProvider::new(config.openai.clone())?.with_temperature(0.0));

    // Grounded search uses the service's default sampling
    let search_llm: Arc<dyn LlmProvider> = Arc::new(AzureOpenAiProvider::new(config.openai.clone())?);

    let tools = ToolRegistry::new()
        .with_tool(DateTimeTool::new())
        .with_tool(WikipediaTool::new(&config.wikipedia_api_url)?)
        .with_tool(KnowledgeBaseTool::new(search_llm));

    let memory = SummaryBufferMemory::new(llm.clone(), config.memory_max_tokens);

    let mut executor =
        AgentExecutor::new(llm, tools, memory).with_max_iterations(config.max_iterations);

    let mut console = Console::new();
    cli::run(&mut console, &mut executor).await
}
