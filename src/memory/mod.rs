//! Conversation memory

mod summary_buffer;

pub use summary_buffer::{estimate_tokens, SummaryBufferMemory};
