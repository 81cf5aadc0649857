//! Interactive input.
//!
//! On a terminal the token is read without echo. When stdin is piped, every
//! answer is read as one line from stdin and the labels go to stderr.

use std::io::{BufRead, IsTerminal, Stderr, Write};

use console::Term;

use crate::error::{OrgpushError, Result};

pub const ORG_PROMPT: &str = "Enter GitHub organization name: ";
pub const REPO_PROMPT: &str = "Enter repository name: ";
pub const TOKEN_PROMPT: &str = "Enter your GitHub personal access token: ";

pub trait Prompter {
    fn ask(&mut self, label: &str) -> Result<String>;
    fn ask_secret(&mut self, label: &str) -> Result<String>;
}

/// Prompts on the controlling terminal.
pub struct TermPrompter {
    term: Term,
}

impl TermPrompter {
    #[must_use]
    pub fn new() -> Self {
        Self {
            term: Term::stderr(),
        }
    }
}

impl Default for TermPrompter {
    fn default() -> Self {
        Self::new()
    }
}

impl Prompter for TermPrompter {
    fn ask(&mut self, label: &str) -> Result<String> {
        self.term.write_str(label).map_err(prompt_error)?;
        self.term.read_line().map_err(prompt_error)
    }

    fn ask_secret(&mut self, label: &str) -> Result<String> {
        self.term.write_str(label).map_err(prompt_error)?;
        self.term.read_secure_line().map_err(prompt_error)
    }
}

/// Reads answers line by line from any reader, writing labels to `output`.
pub struct LinePrompter<R, W = Stderr> {
    reader: R,
    output: W,
}

impl<R: BufRead> LinePrompter<R> {
    pub fn new(reader: R) -> Self {
        Self::with_output(reader, std::io::stderr())
    }
}

impl<R: BufRead, W: Write> LinePrompter<R, W> {
    pub const fn with_output(reader: R, output: W) -> Self {
        Self { reader, output }
    }

    fn read_answer(&mut self, label: &str) -> Result<String> {
        self.output
            .write_all(label.as_bytes())
            .map_err(prompt_error)?;
        self.output.flush().map_err(prompt_error)?;

        let mut line = String::new();
        let read = self.reader.read_line(&mut line).map_err(prompt_error)?;
        if read == 0 {
            return Err(OrgpushError::Prompt(format!(
                "input closed before answering {:?}",
                label.trim()
            )));
        }
        Ok(strip_line_ending(&line).to_string())
    }
}

impl<R: BufRead, W: Write> Prompter for LinePrompter<R, W> {
    fn ask(&mut self, label: &str) -> Result<String> {
        self.read_answer(label)
    }

    fn ask_secret(&mut self, label: &str) -> Result<String> {
        self.read_answer(label)
    }
}

/// Terminal prompts when stdin is a TTY, line reads otherwise.
#[must_use]
pub fn stdin_prompter() -> Box<dyn Prompter> {
    let stdin = std::io::stdin();
    if stdin.is_terminal() {
        Box::new(TermPrompter::new())
    } else {
        Box::new(LinePrompter::new(stdin.lock()))
    }
}

fn strip_line_ending(line: &str) -> &str {
    line.strip_suffix('\n')
        .map(|rest| rest.strip_suffix('\r').unwrap_or(rest))
        .unwrap_or(line)
}

fn prompt_error(err: std::io::Error) -> OrgpushError {
    OrgpushError::Prompt(err.to_string())
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn reads_answers_in_order() {
        let mut prompter = LinePrompter::new(Cursor::new("acme\nwidgets\r\nT\n"));
        assert_eq!(prompter.ask(ORG_PROMPT).unwrap(), "acme");
        assert_eq!(prompter.ask(REPO_PROMPT).unwrap(), "widgets");
        assert_eq!(prompter.ask_secret(TOKEN_PROMPT).unwrap(), "T");
    }

    #[test]
    fn keeps_inner_whitespace_verbatim() {
        let mut prompter = LinePrompter::new(Cursor::new(" acme \n"));
        assert_eq!(prompter.ask(ORG_PROMPT).unwrap(), " acme ");
    }

    #[test]
    fn last_line_without_newline() {
        let mut prompter = LinePrompter::new(Cursor::new("T"));
        assert_eq!(prompter.ask_secret(TOKEN_PROMPT).unwrap(), "T");
    }

    struct ClosedOutput;

    impl Write for ClosedOutput {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn labels_go_to_the_output() {
        let mut shown = Vec::new();
        let mut prompter = LinePrompter::with_output(Cursor::new("acme
"), &mut shown);
        assert_eq!(prompter.ask(ORG_PROMPT).unwrap(), "acme");
        assert_eq!(String::from_utf8(shown).unwrap(), ORG_PROMPT);
    }

    #[test]
    fn unwritable_label_is_a_prompt_error() {
        let mut prompter = LinePrompter::with_output(Cursor::new("acme
"), ClosedOutput);
        let err = prompter.ask(ORG_PROMPT).unwrap_err();
        assert!(matches!(err, OrgpushError::Prompt(_)));
    }

    #[test]
    fn eof_is_a_prompt_error() {
        let mut prompter = LinePrompter::new(Cursor::new(""));
        let err = prompter.ask(ORG_PROMPT).unwrap_err();
        assert!(matches!(err, OrgpushError::Prompt(_)));
    }
}
