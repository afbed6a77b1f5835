//! Summarizing conversation buffer
//!
//! Recent turns are kept verbatim. When the buffer grows past its token
//! budget, the oldest turns are folded into a running summary written by
//! the model, so long sessions keep their gist without growing the prompt.

use anyhow::{Context, Result};
use std::sync::Arc;

use crate::llm::{render_transcript, ChatRequest, LlmProvider, Message};

/// Rough token estimate: ~4 characters per token for English text
const CHARS_PER_TOKEN: usize = 4;

const SUMMARY_PROMPT: &str = r#"Progressively summarize the lines of conversation provided, adding onto the previous summary and returning a new summary.

EXAMPLE
Current summary:
The human asks what the AI thinks of artificial intelligence. The AI thinks artificial intelligence is a force for good.

New lines of conversation:
Human: Why do you think artificial intelligence is a force for good?
AI: Because artificial intelligence will help humans reach their full potential.

New summary:
The human asks what the AI thinks of artificial intelligence. The AI thinks artificial intelligence is a force for good because it will help humans reach their full potential.
END OF EXAMPLE

Current summary:
{summary}

New lines of conversation:
{new_lines}

New summary:"#;

/// Estimate the number of tokens in a piece of text
pub fn estimate_tokens(text: &str) -> usize {
    text.chars().count().div_ceil(CHARS_PER_TOKEN)
}

/// Conversation memory that summarizes what no longer fits
pub struct SummaryBufferMemory {
    llm: Arc<dyn LlmProvider>,
    max_token_limit: usize,
    buffer: Vec<Message>,
    summary: String,
}

impl SummaryBufferMemory {
    /// Create an empty memory that summarizes with `llm` once the buffer
    /// exceeds `max_token_limit` estimated tokens
    pub fn new(llm: Arc<dyn LlmProvider>, max_token_limit: usize) -> Self {
        Self {
            llm,
            max_token_limit,
            buffer: Vec::new(),
            summary: String::new(),
        }
    }

    pub fn max_token_limit(&self) -> usize {
        self.max_token_limit
    }

    /// Running summary of pruned turns (empty until the first prune)
    pub fn summary(&self) -> &str {
        &self.summary
    }

    /// Turns kept verbatim, oldest first
    pub fn buffer(&self) -> &[Message] {
        &self.buffer
    }

    /// Estimated tokens held in the verbatim buffer
    pub fn buffer_tokens(&self) -> usize {
        self.buffer
            .iter()
            .map(|m| estimate_tokens(&m.transcript_line()))
            .sum()
    }

    /// History as messages: the summary (as a system message) followed by
    /// the buffered turns
    pub fn load(&self) -> Vec<Message> {
        let mut messages = Vec::with_capacity(self.buffer.len() + 1);
        if !self.summary.is_empty() {
            messages.push(Message::system(self.summary.clone()));
        }
        messages.extend(self.buffer.iter().cloned());
        messages
    }

    /// History rendered as a plain-text transcript for text prompts
    pub fn chat_history(&self) -> String {
        render_transcript(&self.load())
    }

    /// Record one exchange and prune if the buffer is over budget
    pub async fn save_context(&mut self, input: &str, output: &str) -> Result<()> {
        self.buffer.push(Message::user(input));
        self.buffer.push(Message::assistant(output));
        self.prune().await
    }

    /// Forget everything
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.summary.clear();
    }

    async fn prune(&mut self) -> Result<()> {
        let mut tokens = self.buffer_tokens();
        if tokens <= self.max_token_limit {
            return Ok(());
        }

        let mut cut = 0;
        while tokens > self.max_token_limit && cut < self.buffer.len() {
            tokens -= estimate_tokens(&self.buffer[cut].transcript_line());
            cut += 1;
        }

        tracing::info!(
            "Memory over budget, summarizing {} of {} messages",
            cut,
            self.buffer.len()
        );

        // The buffer is only trimmed once the new summary exists
        let new_summary = self.predict_new_summary(&self.buffer[..cut]).await?;
        self.buffer.drain(..cut);
        self.summary = new_summary;

        tracing::debug!("New conversation summary: {}", self.summary);
        Ok(())
    }

    async fn predict_new_summary(&self, pruned: &[Message]) -> Result<String> {
        let prompt = SUMMARY_PROMPT
            .replace("{summary}", &self.summary)
            .replace("{new_lines}", &render_transcript(pruned));

        let request = ChatRequest::new(vec![Message::user(prompt)]).with_temperature(0.0);
        let response = self
            .llm
            .complete(request)
            .await
            .context("Failed to summarize conversation history")?;

        Ok(response.content.trim().to_string())
    }
}
