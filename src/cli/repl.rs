//! Interactive read-eval-print loop
//!
//! One user line per turn. `quit` (any casing) or end of input ends the
//! session; anything else goes to the agent exactly once and its output is
//! printed. Agent errors are not retried and end the session.

use anyhow::{Context, Result};

use super::console::Console;
use crate::agent::Agent;

/// Sentinel command that ends the session
pub const QUIT_COMMAND: &str = "quit";

/// Whether a line (already stripped of its terminator) is the quit command
pub fn is_quit(line: &str) -> bool {
    line.eq_ignore_ascii_case(QUIT_COMMAND)
}

/// Run the loop until the user quits or input ends
pub async fn run<A: Agent + ?Sized>(console: &mut Console, agent: &mut A) -> Result<()> {
    tracing::info!("Starting interactive loop");
    console.print_banner()?;

    loop {
        let line = match console.read_input().context("Failed to read user input")? {
            Some(line) => line,
            None => {
                tracing::info!("End of input");
                break;
            }
        };

        if is_quit(&line) {
            tracing::info!("User requested exit");
            break;
        }

        let response = agent.invoke(&line).await?;
        console.print_response(&response.output)?;
    }

    console.print_system("Goodbye!")?;
    tracing::info!("Interactive loop ended");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_quit_any_casing() {
        assert!(is_quit("quit"));
        assert!(is_quit("QUIT"));
        assert!(is_quit("Quit"));
        assert!(is_quit("qUiT"));
        assert!(!is_quit(" quit "));
        assert!(!is_quit("quit now"));
        assert!(!is_quit("exit"));
        assert!(!is_quit(""));
    }
}
