//! Parser error reporting

use std::fmt;

/// Category of a syntax error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    UnexpectedEof,
    UnexpectedOperator,
    UnexpectedValue,
    UnexpectedVariable,
    UnexpectedParens,
    UnexpectedFunction,
    UnexpectedArgSeparator,
    MisplacedColon,
    MissingElseClause,
    MissingParens,
    TooManyParams,
    TooFewParams,
    UnassignableToken,
    NestingTooDeep,
}

impl ErrorCode {
    /// Human readable message for this code.
    ///
    /// `pos` is inserted verbatim; callers decide whether it is the raw
    /// scanner offset or a display column.
    pub fn describe(self, token: &str, pos: usize) -> String {
        match self {
            Self::UnexpectedEof => format!("Unexpected end of expression at position {}", pos),
            Self::UnexpectedOperator => {
                format!("Unexpected operator \"{}\" found at position {}", token, pos)
            },
            Self::UnexpectedValue => {
                format!("Unexpected value \"{}\" found at position {}", token, pos)
            },
            Self::UnexpectedVariable => {
                format!("Unexpected variable \"{}\" found at position {}", token, pos)
            },
            Self::UnexpectedParens => {
                format!("Unexpected parenthesis \"{}\" at position {}", token, pos)
            },
            Self::UnexpectedFunction => {
                format!("Unexpected function \"{}\" at position {}", token, pos)
            },
            Self::UnexpectedArgSeparator => {
                format!("Unexpected argument separator at position {}", pos)
            },
            Self::MisplacedColon => format!("Misplaced colon at position {}", pos),
            Self::MissingElseClause => "If-then-else operator is missing an else clause".into(),
            Self::MissingParens => "Missing parenthesis".into(),
            Self::TooManyParams => format!(
                "Too many parameters for function \"{}\" at expression position {}",
                token, pos
            ),
            Self::TooFewParams => format!(
                "Too few parameters for function \"{}\" at expression position {}",
                token, pos
            ),
            Self::UnassignableToken => {
                format!("Unexpected token \"{}\" found at position {}.", token, pos)
            },
            Self::NestingTooDeep => {
                format!("Expression is nested too deeply at position {}", pos)
            },
        }
    }
}

/// Syntax error raised while compiling an expression
///
/// `pos` is the scanner offset into the padded input: the start of the
/// offending token (0-based), or one past the padding for
/// [`ErrorCode::UnexpectedEof`]. `token` is the raw token text and may carry
/// the padding blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserError {
    pub code: ErrorCode,
    pub pos: usize,
    pub token: String,
}

impl ParserError {
    pub fn new(code: ErrorCode, pos: usize, token: impl Into<String>) -> Self {
        Self {
            code,
            pos,
            token: token.into(),
        }
    }
}

impl fmt::Display for ParserError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.code.describe(&self.token, self.pos))
    }
}

impl std::error::Error for ParserError {}
