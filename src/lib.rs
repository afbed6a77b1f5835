//! ReAct agent over Azure OpenAI
//!
//! A conversational agent that reasons in Thought / Action / Observation
//! steps, with three tools (local date/time, Wikipedia summaries, and a
//! knowledge base grounded in an Azure AI Search index) and a memory that
//! summarizes older turns.

pub mod agent;
pub mod cli;
pub mod config;
pub mod llm;
pub mod logging;
pub mod memory;
pub mod tools;
