//! Interactive line editing
//!
//! [`LineEditor`] is what the session loop reads from. The rustyline backed
//! implementation adds Tab completion over the registry and a persistent
//! history file.

use anyhow::{Context, Result};
use mucalc_core::{complete, Registry};
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{CompletionType, Editor, Helper};
use std::path::PathBuf;
use std::rc::Rc;
use tracing::{debug, warn};

/// Characters that end the word being completed
pub const WORD_BREAKS: &str = " ()+-*/^?:,=!<>|&\t";

/// One read from the editor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Line(String),
    /// Ctrl-C
    Interrupted,
    /// Ctrl-D, or the editor failed
    Eof,
}

pub trait LineEditor {
    fn read_line(&mut self, prompt: &str) -> Input;

    fn add_history(&mut self, line: &str);

    fn save_history(&mut self);
}

// ============================================================================
// Tab Completion Helper
// ============================================================================

/// Completes function, constant and variable names from the live registry
pub struct CalcHelper {
    registry: Rc<Registry>,
}

impl CalcHelper {
    pub fn new(registry: Rc<Registry>) -> Self {
        Self { registry }
    }

    /// Start of the word ending at `pos` and the candidates for it
    pub fn candidates(&self, line: &str, pos: usize) -> (usize, Vec<Pair>) {
        let line = &line[..pos];
        let start = line
            .rfind(|c| WORD_BREAKS.contains(c))
            .map_or(0, |i| i + 1);

        let pairs = complete(&self.registry, &line[start..])
            .into_iter()
            .map(|candidate| Pair {
                replacement: candidate.replacement(),
                display: candidate.name,
            })
            .collect();

        (start, pairs)
    }
}

impl Helper for CalcHelper {}

impl Hinter for CalcHelper {
    type Hint = String;

    fn hint(&self, _line: &str, _pos: usize, _ctx: &rustyline::Context<'_>) -> Option<String> {
        None
    }
}

impl Highlighter for CalcHelper {}

impl Validator for CalcHelper {}

impl Completer for CalcHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &rustyline::Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        Ok(self.candidates(line, pos))
    }
}

// ============================================================================
// rustyline editor
// ============================================================================

pub struct RustylineEditor {
    editor: Editor<CalcHelper, DefaultHistory>,
    history_path: PathBuf,
}

impl RustylineEditor {
    /// Create the editor and load history from `history_path` if it exists.
    pub fn new(registry: Rc<Registry>, history_path: PathBuf, history_size: usize) -> Result<Self> {
        let config = rustyline::Config::builder()
            .completion_type(CompletionType::List)
            .max_history_size(history_size)
            .context("Invalid history size")?
            .history_ignore_dups(false)
            .context("Failed to configure history")?
            .auto_add_history(false)
            .build();
        let mut editor = Editor::with_config(config).context("Failed to initialize readline")?;
        editor.set_helper(Some(CalcHelper::new(registry)));

        match editor.load_history(&history_path) {
            Ok(()) => debug!(path = %history_path.display(), "loaded history"),
            Err(e) => debug!(path = %history_path.display(), error = %e, "no history loaded"),
        }

        Ok(Self {
            editor,
            history_path,
        })
    }
}

impl LineEditor for RustylineEditor {
    fn read_line(&mut self, prompt: &str) -> Input {
        match self.editor.readline(prompt) {
            Ok(line) => Input::Line(line),
            Err(ReadlineError::Interrupted) => Input::Interrupted,
            Err(ReadlineError::Eof) => Input::Eof,
            Err(e) => {
                warn!(error = %e, "readline failed");
                Input::Eof
            },
        }
    }

    fn add_history(&mut self, line: &str) {
        if let Err(e) = self.editor.add_history_entry(line) {
            debug!(error = %e, "history entry dropped");
        }
    }

    fn save_history(&mut self) {
        match self.editor.save_history(&self.history_path) {
            Ok(()) => debug!(path = %self.history_path.display(), "saved history"),
            Err(e) => warn!(path = %self.history_path.display(), error = %e, "failed to save history"),
        }
    }
}
