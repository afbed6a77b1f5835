pub mod azure;
pub mod provider;
pub mod types;

pub use azure::AzureOpenAiProvider;
pub use provider::LlmProvider;
pub use types::{
    render_transcript, AzureSearchParameters, ChatRequest, ChatResponse, DataSource,
    FinishReason, Message, Role, SearchAuthentication, Usage,
};
