//! Session loop
//!
//! Drives one calculator session in one of three modes: argument
//! expressions, a batch stream, or an interactive editor. Results go to the
//! output writer, diagnostics to the error writer.

use crate::editor::{Input, LineEditor};
use crate::help;
use anyhow::{Context, Result};
use mucalc_core::{format_results, CalcEngine};
use std::io::{BufRead, Write};
use std::process::ExitCode;
use tracing::debug;

pub const PROMPT: &str = "> ";

/// Outcome of the most recent evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Status {
    #[default]
    Success,
    Failure,
}

impl From<Status> for ExitCode {
    fn from(status: Status) -> Self {
        match status {
            Status::Success => ExitCode::SUCCESS,
            Status::Failure => ExitCode::FAILURE,
        }
    }
}

/// What an interactive line asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    ShortHelp,
    Help,
    Quit,
    Evaluate,
}

impl Command {
    /// Classify by the line with surrounding spaces removed. Tabs are kept.
    fn classify(line: &str) -> Self {
        match line.trim_matches(' ') {
            "" => Self::ShortHelp,
            "help" | "?" => Self::Help,
            "quit" | "exit" => Self::Quit,
            _ => Self::Evaluate,
        }
    }

    /// Every line with something besides spaces goes to history, commands
    /// included.
    fn is_recorded(self) -> bool {
        self != Self::ShortHelp
    }
}

pub struct Session<W: Write, E: Write> {
    engine: CalcEngine,
    out: W,
    err: E,
}

impl<W: Write, E: Write> Session<W, E> {
    pub fn new(engine: CalcEngine, out: W, err: E) -> Self {
        Self { engine, out, err }
    }

    pub fn engine(&self) -> &CalcEngine {
        &self.engine
    }

    /// Evaluate one expression and print its results or its diagnostic.
    pub fn evaluate(&mut self, expression: &str, prefix: Option<&str>) -> Result<Status> {
        match self.engine.evaluate(expression) {
            Ok(values) => {
                self.out
                    .write_all(format_results(&values).as_bytes())
                    .context("Failed to write result")?;
                Ok(Status::Success)
            },
            Err(diagnostic) => {
                self.err
                    .write_all(diagnostic.render(prefix).as_bytes())
                    .context("Failed to write error")?;
                Ok(Status::Failure)
            },
        }
    }

    /// Evaluate every argument in order; the last one decides the status.
    pub fn run_arguments(&mut self, expressions: &[String]) -> Result<Status> {
        debug!(count = expressions.len(), "evaluating arguments");
        let mut status = Status::Success;
        for (i, expression) in expressions.iter().enumerate() {
            status = self.evaluate(expression, Some(&format!("Expression {}", i + 1)))?;
        }
        Ok(status)
    }

    /// Evaluate each non-empty line of `input`. Line numbers count every
    /// physical line. Bytes that are not UTF-8 become replacement
    /// characters, which the engine then rejects for that line only.
    pub fn run_batch<R: BufRead>(&mut self, input: R) -> Result<Status> {
        debug!("evaluating input stream");
        let mut status = Status::Success;
        for (i, bytes) in input.split(b'\n').enumerate() {
            let mut bytes = bytes.context("Failed to read input")?;
            if bytes.last() == Some(&b'\r') {
                bytes.pop();
            }
            if bytes.is_empty() {
                continue;
            }

            let line_number = i + 1;
            let line = String::from_utf8_lossy(&bytes);
            if std::str::from_utf8(&bytes).is_err() {
                debug!(line = line_number, "input line is not valid UTF-8");
            }
            status = self.evaluate(&line, Some(&format!("Line {}", line_number)))?;
        }
        Ok(status)
    }

    /// Prompt until `quit`, `exit` or end of input, then save history.
    pub fn run_interactive<L: LineEditor>(&mut self, editor: &mut L) -> Result<Status> {
        debug!("starting interactive session");
        writeln!(self.out, "{}", help::short_version()).context("Failed to write banner")?;
        writeln!(self.out, "{}", help::SHORT_HELP).context("Failed to write banner")?;

        let mut status = Status::Success;
        loop {
            self.out.flush().context("Failed to flush output")?;
            let line = match editor.read_line(PROMPT) {
                Input::Line(line) => line,
                Input::Interrupted => {
                    writeln!(self.out, "^C").context("Failed to write output")?;
                    continue;
                },
                Input::Eof => {
                    writeln!(self.out, "^D").context("Failed to write output")?;
                    break;
                },
            };

            let command = Command::classify(&line);
            if command.is_recorded() {
                editor.add_history(&line);
            }
            match command {
                Command::ShortHelp => {
                    writeln!(self.out, "{}", help::SHORT_HELP).context("Failed to write help")?
                },
                Command::Help => {
                    writeln!(self.out, "{}", help::CORE_HELP).context("Failed to write help")?
                },
                Command::Quit => break,
                Command::Evaluate => status = self.evaluate(&line, None)?,
            }
        }

        editor.save_history();
        self.out.flush().context("Failed to flush output")?;
        Ok(status)
    }
}
