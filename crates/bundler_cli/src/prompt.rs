//! Interactive yes/no prompts backing the restore confirmation points.

use bundler_core::NewFileConfirmer;
use log::debug;
use std::io::{BufRead, Write};

/// Line-based yes/no prompter.
///
/// Questions go to `output`; answers are read one line at a time from
/// `input`. End of input or an unreadable line counts as "no".
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn ask(&mut self, question: &str) -> bool {
        if write!(self.output, "{question} [y/N] ").is_err() || self.output.flush().is_err() {
            return false;
        }

        let mut answer = String::new();
        match self.input.read_line(&mut answer) {
            Ok(0) | Err(_) => {
                let _ = writeln!(self.output);
                false
            }
            Ok(_) => matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"),
        }
    }
}

impl<R: BufRead, W: Write> NewFileConfirmer for Prompter<R, W> {
    fn confirm_create(&mut self, filename: &str) -> bool {
        let create = self.ask(&format!("Create new file {filename}?"));
        debug!(
            "event=confirm_create module=cli status=answered file={} create={}",
            filename, create
        );
        create
    }
}
