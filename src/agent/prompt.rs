//! ReAct prompt template
//!
//! The model is asked to alternate Thought / Action / Action Input lines,
//! reading tool results back as Observation lines, until it can give a
//! Final Answer. The executor stops generation at `\nObservation` so the
//! model never invents tool output.

/// Marker the model emits before its answer to the user
pub const FINAL_ANSWER_MARKER: &str = "Final Answer:";
/// Stop sequence passed to the model
pub const STOP_SEQUENCE: &str = "\nObservation";

/// The default ReAct template
pub const REACT_TEMPLATE: &str = r#"Answer the following questions as best you can. You have access to the following tools:

{tools}

Use the following format:

Question: the input question you must answer
Thought: you should always think about what to do
Action: the action to take, should be one of [{tool_names}]
Action Input: the input to the action
Observation: the result of the action
... (this Thought/Action/Action Input/Observation can repeat N times)
Thought: I now know the final answer
Final Answer: the final answer to the original input question

Previous conversation:
{chat_history}

Begin!

Question: {input}
Thought:{agent_scratchpad}"#;

const PLACEHOLDERS: [&str; 5] = [
    "{tools}",
    "{tool_names}",
    "{chat_history}",
    "{input}",
    "{agent_scratchpad}",
];

/// Values substituted into the template on each step
#[derive(Debug, Clone, Copy)]
pub struct PromptVars<'a> {
    pub tools: &'a str,
    pub tool_names: &'a str,
    pub chat_history: &'a str,
    pub input: &'a str,
    pub agent_scratchpad: &'a str,
}

/// A ReAct prompt template with named placeholders
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    template: String,
}

impl PromptTemplate {
    /// The default ReAct template
    pub fn react() -> Self {
        Self {
            template: REACT_TEMPLATE.to_string(),
        }
    }

    /// Fill in the placeholders
    ///
    /// Substitution is a single left-to-right pass, so braces inside user
    /// input or tool output are never expanded.
    pub fn render(&self, vars: &PromptVars<'_>) -> String {
        let chat_history = if vars.chat_history.trim().is_empty() {
            "(none)"
        } else {
            vars.chat_history
        };

        let mut out = String::with_capacity(self.template.len() + vars.agent_scratchpad.len());
        let mut rest = self.template.as_str();
        while let Some(start) = rest.find('{') {
            out.push_str(&rest[..start]);
            let tail = &rest[start..];
            let value = PLACEHOLDERS.iter().find(|p| tail.starts_with(*p)).map(|p| {
                let value = match *p {
                    "{tools}" => vars.tools,
                    "{tool_names}" => vars.tool_names,
                    "{chat_history}" => chat_history,
                    "{input}" => vars.input,
                    _ => vars.agent_scratchpad,
                };
                (p.len(), value)
            });
            match value {
                Some((len, value)) => {
                    out.push_str(value);
                    rest = &tail[len..];
                }
                None => {
                    out.push('{');
                    rest = &tail[1..];
                }
            }
        }
        out.push_str(rest);
        out
    }
}
