//! # Line Shell
//!
//! Thin wrapper around buffered stdin for the interactive prompt loop.
//!
//! Prompts are written with blocking `print!` + flush (they are short and
//! stdout is a terminal), while reads go through tokio so the runtime can
//! keep database work moving underneath an idle prompt.
//!
//! `prompt` returns `Ok(None)` on end of input (Ctrl-D or a closed pipe),
//! which every screen treats as "leave this screen".

use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

pub struct Shell {
    lines: Lines<BufReader<Stdin>>,
}

impl Shell {
    pub fn new() -> Self {
        Shell {
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }

    /// Print `prompt`, flush, and read one line.
    ///
    /// ## Returns
    /// - `Ok(Some(line))` with the raw line (not trimmed)
    /// - `Ok(None)` when stdin is exhausted
    pub async fn prompt(&mut self, prompt: &str) -> std::io::Result<Option<String>> {
        print!("{prompt}");
        std::io::stdout().flush()?;
        self.lines.next_line().await
    }
}

impl Default for Shell {
    fn default() -> Self {
        Self::new()
    }
}
