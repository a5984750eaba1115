//! Interactive input.

use std::io::{self, BufRead};

use console::Term;

/// Source of interactive answers.
pub trait Prompter {
    /// Shows `message` and returns one line of input without its line ending.
    ///
    /// # Errors
    ///
    /// Returns an error if input cannot be read, including end of input.
    fn ask(&mut self, message: &str) -> io::Result<String>;
}

/// Prompter reading from stdin, clearing the terminal before each question.
#[derive(Debug, Default)]
pub struct TerminalPrompter;

impl TerminalPrompter {
    /// Creates a terminal prompter.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Prompter for TerminalPrompter {
    fn ask(&mut self, message: &str) -> io::Result<String> {
        let term = Term::stdout();
        term.clear_screen()?;
        term.write_str(message)?;
        term.flush()?;

        let mut input = String::new();
        if io::stdin().lock().read_line(&mut input)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "input closed while waiting for an answer",
            ));
        }
        Ok(input.trim_end_matches(['\r', '\n']).to_string())
    }
}

/// Clears the terminal. Does nothing when stdout is not a terminal.
///
/// # Errors
///
/// Returns an error if stdout cannot be written.
pub fn clear_screen() -> io::Result<()> {
    Term::stdout().clear_screen()
}

/// Asks `message` until `parse` accepts the trimmed answer.
///
/// Rejected answers are echoed back above the repeated question.
///
/// # Errors
///
/// Returns an error if input cannot be read.
pub fn ask_until<T, F>(prompter: &mut dyn Prompter, message: &str, mut parse: F) -> io::Result<T>
where
    F: FnMut(&str) -> Option<T>,
{
    let mut previous: Option<String> = None;
    loop {
        let question = match &previous {
            Some(value) => format!("Invalid value given \"{value}\"\n\n{message}"),
            None => message.to_string(),
        };

        let answer = prompter.ask(&question)?;
        let answer = answer.trim();
        if let Some(value) = parse(answer) {
            return Ok(value);
        }
        previous = Some(answer.to_string());
    }
}

/// Asks a yes/no question.
///
/// Accepts `1`, `y`, `yes` and `2`, `n`, `no` in any case.
///
/// # Errors
///
/// Returns an error if input cannot be read.
pub fn confirm(prompter: &mut dyn Prompter, question: &str) -> io::Result<bool> {
    let message = format!("{question}\n\n\t(1) Yes\n\t(2) No\n\n");
    ask_until(prompter, &message, |answer| {
        match answer.to_ascii_lowercase().as_str() {
            "1" | "y" | "yes" => Some(true),
            "2" | "n" | "no" => Some(false),
            _ => None,
        }
    })
}
