use colored::*;
use std::io::{self, BufRead, Write};

/// Prompt shown before each user turn
pub const INPUT_PROMPT: &str = "Ask something (or 'quit'):";

/// Console handles all terminal I/O with colored formatting
pub struct Console {
    input: Box<dyn BufRead + Send>,
    output: Box<dyn Write + Send>,
    user_color: Color,
    assistant_color: Color,
}

impl Console {
    /// Create a console on stdin/stdout with default colors
    pub fn new() -> Self {
        Self::with_io(io::BufReader::new(io::stdin()), io::stdout())
    }

    /// Create a console over arbitrary reader and writer
    pub fn with_io(input: impl BufRead + Send + 'static, output: impl Write + Send + 'static) -> Self {
        Self {
            input: Box::new(input),
            output: Box::new(output),
            user_color: Color::Cyan,
            assistant_color: Color::Green,
        }
    }

    /// Print a welcome banner
    pub fn print_banner(&mut self) -> io::Result<()> {
        writeln!(self.output, "{}", "=".repeat(60).bright_blue())?;
        writeln!(
            self.output,
            "{}",
            "  ReAct Agent with RAG + Tools + Memory (Azure OpenAI)"
                .bright_blue()
                .bold()
        )?;
        writeln!(self.output, "{}", "=".repeat(60).bright_blue())?;
        self.output.flush()
    }

    /// Prompt for and read one line of input
    ///
    /// Returns `None` at end of input.
    pub fn read_input(&mut self) -> io::Result<Option<String>> {
        write!(self.output, "\n{} ", INPUT_PROMPT.color(self.user_color).bold())?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\n', '\r']).to_string()))
    }

    /// Print the agent's answer
    pub fn print_response(&mut self, response: &str) -> io::Result<()> {
        writeln!(self.output, "\n{}", "Response:".color(self.assistant_color).bold())?;
        writeln!(self.output, "{}", response.color(self.assistant_color))?;
        self.output.flush()
    }

    /// Print a system message (info, goodbye)
    pub fn print_system(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.output, "{} {}", "System:".yellow().bold(), message)?;
        self.output.flush()
    }
}

impl Default for Console {
    fn default() -> Self {
        Self::new()
    }
}
