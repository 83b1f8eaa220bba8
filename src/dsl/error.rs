//! Error types for the DSL compiler.

use std::fmt;

use thiserror::Error;

use super::token::TokenKind;

/// A fatal error that aborts tokenizing or compiling.
#[derive(Debug, Error)]
pub enum CompileError {
    /// Input that no tokenizer rule recognizes.
    #[error("[{line}] unrecognized input: '{text}'")]
    Lex { line: usize, text: String },

    /// An assignment references a slot id with no definition.
    #[error("slot '{0}' is not defined")]
    UndefinedSlot(String),

    /// A slot references a day with no definition.
    #[error("day '{day}' (used by slot '{slot}') is not defined")]
    UndefinedDay { day: String, slot: String },

    #[error("invalid clock time '{0}', expected HH:MM")]
    InvalidTime(String),

    #[error("invalid date '{0}', expected YYYY-MM-DD or DD.MM.YYYY")]
    InvalidDate(String),

    #[error("invalid filter pattern: {0}")]
    InvalidFilter(#[from] regex::Error),
}

impl CompileError {
    pub fn lex(text: impl Into<String>, line: usize) -> Self {
        Self::Lex {
            text: text.into(),
            line,
        }
    }
}

/// A recoverable syntax problem: the parser skipped one token here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub line: usize,
    pub text: String,
    pub kind: TokenKind,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] unrecognized token '{}' ({}), skipping",
            self.line, self.text, self.kind
        )
    }
}
