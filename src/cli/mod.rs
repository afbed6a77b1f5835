mod console;
mod repl;

pub use console::{Console, INPUT_PROMPT};
pub use repl::{is_quit, run, QUIT_COMMAND};
