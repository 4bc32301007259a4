//! Error types for mucalc-core

use crate::engine::ParserError;
use thiserror::Error;

/// Calculator errors
#[derive(Debug, Error)]
pub enum CalcError {
    #[error("Duplicate symbol: {0}")]
    DuplicateSymbol(String),

    #[error("Expression error: {0}")]
    Parse(#[from] ParserError),
}

impl CalcError {
    pub fn duplicate_symbol(name: impl Into<String>) -> Self {
        Self::DuplicateSymbol(name.into())
    }
}

pub type Result<T> = std::result::Result<T, CalcError>;
