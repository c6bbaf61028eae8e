//! Line-oriented terminal chat over the query engine.
use std::io::{self, BufRead, Write};

use console::style;
use tracing::debug;

use crate::query::{GREETING, QueryEngine, render_reply};

const QUIT_COMMANDS: [&str; 3] = ["/quit", "/exit", "/q"];

fn bot_prefix() -> String {
    style("🤖 Chatbot :").cyan().bold().to_string()
}

/// Runs the chat until end of input or a quit command. Blank lines get no
/// reply. Returns the number of answered turns.
pub fn run_chat<R: BufRead, W: Write>(
    engine: &QueryEngine,
    input: R,
    mut output: W,
) -> io::Result<usize> {
    writeln!(output, "{} {GREETING}\n", bot_prefix())?;

    let mut answered = 0;
    let mut lines = input.lines();
    loop {
        write!(output, "{} ", style("🧑 Toi :").green().bold())?;
        output.flush()?;

        let Some(line) = lines.next().transpose()? else {
            writeln!(output)?;
            break;
        };
        let line = line.trim();
        if QUIT_COMMANDS.contains(&line) {
            break;
        }

        match engine.answer(line) {
            Some(answer) => {
                writeln!(output, "{} {}\n", bot_prefix(), render_reply(&answer))?;
                answered += 1;
            }
            None => debug!("ignored blank chat input"),
        }
    }

    Ok(answered)
}
