//! Parser for ReAct model output
//!
//! A step either names a tool (`Action:` + `Action Input:`) or ends the
//! turn (`Final Answer:`). Output that does both, or neither, is a parse
//! error whose `observation()` tells the model how to fix its format.

use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

use super::prompt::FINAL_ANSWER_MARKER;

/// A tool call requested by the model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentAction {
    pub tool: String,
    pub tool_input: String,
    /// Raw model output for this step, replayed in the scratchpad
    pub log: String,
}

/// The model's answer to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentFinish {
    pub output: String,
    pub log: String,
}

/// One parsed model step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgentDecision {
    Action(AgentAction),
    Finish(AgentFinish),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Missing 'Action:' after 'Thought:'")]
    MissingAction,

    #[error("Missing 'Action Input:' after 'Action:'")]
    MissingActionInput,

    #[error("Parsing LLM output produced both a final answer and a parse-able action: {0}")]
    FinalAnswerAndAction(String),

    #[error("Could not parse LLM output: `{0}`")]
    Unparseable(String),
}

impl ParseError {
    /// Observation fed back to the model when parse errors are tolerated
    pub fn observation(&self) -> String {
        match self {
            ParseError::MissingAction | ParseError::MissingActionInput => {
                format!("Invalid Format: {}", self)
            }
            _ => "Invalid or incomplete response".to_string(),
        }
    }
}

fn action_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?s)Action\s*\d*\s*:[\s]*(.*?)[\s]*Action\s*\d*\s*Input\s*\d*\s*:[\s]*(.*)")
            .expect("valid action regex")
    })
}

fn action_label_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"Action\s*\d*\s*:").expect("valid action label regex"))
}

fn action_input_label_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"Action\s*\d*\s*Input\s*\d*\s*:").expect("valid action input regex")
    })
}

/// Parse one ReAct step
pub fn parse(text: &str) -> Result<AgentDecision, ParseError> {
    let includes_answer = text.contains(FINAL_ANSWER_MARKER);

    if let Some(caps) = action_regex().captures(text) {
        if includes_answer {
            return Err(ParseError::FinalAnswerAndAction(text.to_string()));
        }
        let tool = caps[1].trim().to_string();
        let tool_input = caps[2].trim_matches(' ').trim_matches('"').to_string();
        return Ok(AgentDecision::Action(AgentAction {
            tool,
            tool_input,
            log: text.to_string(),
        }));
    }

    if includes_answer {
        let output = text
            .rsplit(FINAL_ANSWER_MARKER)
            .next()
            .unwrap_or_default()
            .trim()
            .to_string();
        return Ok(AgentDecision::Finish(AgentFinish {
            output,
            log: text.to_string(),
        }));
    }

    if !action_label_regex().is_match(text) {
        Err(ParseError::MissingAction)
    } else if !action_input_label_regex().is_match(text) {
        Err(ParseError::MissingActionInput)
    } else {
        Err(ParseError::Unparseable(text.to_string()))
    }
}
