//! Position-accurate error reports
//!
//! Engine errors are normalized here before anything is shown to the user:
//! the offset becomes a 1-based column, the scan padding is removed from the
//! offending token, and the report points a caret at the column.

use crate::engine::{ErrorCode, ParserError};
use std::fmt;

/// A failed evaluation, ready to print
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// One-line description naming the token and column
    pub message: String,
    /// The expression exactly as it was entered
    pub expression: String,
    /// 1-based column the caret points at
    pub column: usize,
}

impl Diagnostic {
    pub fn from_parser_error(error: &ParserError, expression: &str) -> Self {
        // The end-of-input offset already lies one past the scan padding.
        let column = match error.code {
            ErrorCode::UnexpectedEof => error.pos.max(1),
            _ => error.pos + 1,
        };
        let token = error.token.strip_suffix(' ').unwrap_or(&error.token);

        Self {
            message: error.code.describe(token, column),
            expression: expression.to_string(),
            column,
        }
    }

    /// Render the three-line report, optionally labelled with `prefix`.
    pub fn render(&self, prefix: Option<&str>) -> String {
        let label = prefix.map(|p| format!("{}: ", p)).unwrap_or_default();
        format!(
            "{}{}\n{}\n{}^\n",
            label,
            self.message,
            self.expression,
            " ".repeat(self.column.saturating_sub(1))
        )
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for Diagnostic {}
