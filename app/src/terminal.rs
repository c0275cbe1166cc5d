//! Interactive terminal form
//!
//! Each input is shown as `label [default]: `. An empty answer keeps the
//! default and a lone `-` clears the field. Collapsed blocks are only opened when the user asks for it;
//! otherwise their inputs keep their defaults without prompting.

use contract_form::{FieldDef, FormSurface};
use std::io::{self, BufRead, Write};

/// Answer that leaves a field empty
pub const CLEAR_ANSWER: &str = "-";

pub struct TerminalSurface<R, W> {
    input: R,
    output: W,
    skipping: bool,
    error: Option<io::Error>,
}

impl<R: BufRead, W: Write> TerminalSurface<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            skipping: false,
            error: None,
        }
    }

    /// The first I/O error met while prompting, if any
    pub fn finish(self) -> io::Result<()> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn print(&mut self, text: &str) {
        if self.error.is_some() {
            return;
        }
        if let Err(e) = self.output.write_all(text.as_bytes()).and_then(|_| self.output.flush()) {
            self.error = Some(e);
        }
    }

    /// Read one line without its line ending; `None` at end of input or
    /// after an error
    fn read_line(&mut self) -> Option<String> {
        if self.error.is_some() {
            return None;
        }
        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_string()),
            Err(e) => {
                self.error = Some(e);
                None
            }
        }
    }
}

impl<R: BufRead, W: Write> FormSurface for TerminalSurface<R, W> {
    fn heading(&mut self, title: &str) {
        self.print(&format!("\n== {} ==\n", title));
    }

    fn expander(&mut self, title: &str, expanded: bool) {
        self.print(&format!("\n-- {} --\n", title));
        self.skipping = false;
        if !expanded {
            self.print("Preencher esta seção? [s/N]: ");
            let answer = self.read_line().unwrap_or_default();
            self.skipping = !matches!(answer.trim().to_lowercase().as_str(), "s" | "sim");
        }
    }

    fn divider(&mut self) {
        if !self.skipping {
            self.print("---\n");
        }
    }

    fn text_input(&mut self, field: &FieldDef) -> String {
        if self.skipping {
            return field.default.to_string();
        }
        self.print(&format!("{} [{}]: ", field.label, field.default));
        match self.read_line() {
            Some(answer) if answer.trim() == CLEAR_ANSWER => String::new(),
            Some(answer) if !answer.is_empty() => answer,
            _ => field.default.to_string(),
        }
    }
}
