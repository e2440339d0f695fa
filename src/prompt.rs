use anyhow::Result;
use inquire::{required, InquireError, Text};
use std::io::{self, BufRead, IsTerminal, StdinLock, Write};

/// Source of user answers. `Ok(None)` means the user ended input.
pub trait InputProvider {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>>;

    /// Like [`InputProvider::read_line`], but blank answers are asked again.
    fn read_required(&mut self, prompt: &str) -> Result<Option<String>> {
        loop {
            match self.read_line(prompt)? {
                Some(answer) if answer.trim().is_empty() => continue,
                answer => return Ok(answer),
            }
        }
    }
}

/// Answers read line by line from a reader, the prompt echoed to a writer.
pub struct LineInput<R, W> {
    reader: R,
    prompt_out: W,
}

impl<R: BufRead, W: Write> LineInput<R, W> {
    pub fn new(reader: R, prompt_out: W) -> Self {
        Self { reader, prompt_out }
    }
}

impl<R: BufRead, W: Write> InputProvider for LineInput<R, W> {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        write!(self.prompt_out, "{} ", prompt)?;
        self.prompt_out.flush()?;

        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let answer = line.trim_end_matches(['\r', '\n']).to_string();
        Ok(Some(answer))
    }
}

/// Interactive prompts on a terminal, plain line reads when stdin is piped.
pub enum ConsoleInput {
    Terminal,
    Piped(LineInput<StdinLock<'static>, io::Stdout>),
}

impl ConsoleInput {
    pub fn detect() -> Self {
        let stdin = io::stdin();
        if stdin.is_terminal() {
            ConsoleInput::Terminal
        } else {
            tracing::debug!("stdin is not a terminal, reading answers line by line");
            ConsoleInput::Piped(LineInput::new(stdin.lock(), io::stdout()))
        }
    }
}

fn answered(result: std::result::Result<String, InquireError>) -> Result<Option<String>> {
    match result {
        Ok(answer) => Ok(Some(answer)),
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

impl InputProvider for ConsoleInput {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        match self {
            ConsoleInput::Terminal => answered(Text::new(prompt).prompt()),
            ConsoleInput::Piped(lines) => lines.read_line(prompt),
        }
    }

    fn read_required(&mut self, prompt: &str) -> Result<Option<String>> {
        match self {
            ConsoleInput::Terminal => answered(
                Text::new(prompt)
                    .with_validator(required!())
                    .prompt(),
            ),
            ConsoleInput::Piped(lines) => lines.read_required(prompt),
        }
    }
}

/// Ask for a 1-based entry number until it names one of `len` entries.
///
/// Returns the 0-based index, or `None` once the input provider runs dry.
pub fn select_index(
    input: &mut impl InputProvider,
    out: &mut impl Write,
    len: usize,
) -> Result<Option<usize>> {
    loop {
        let Some(answer) = input.read_line("Enter the number of the anime you want to select:")?
        else {
            return Ok(None);
        };

        match answer.trim().parse::<usize>() {
            Ok(n) if (1..=len).contains(&n) => return Ok(Some(n - 1)),
            Ok(_) => writeln!(out, "Invalid selection.")?,
            Err(_) => writeln!(out, "Invalid selection. Please enter a number.")?,
        }
    }
}
