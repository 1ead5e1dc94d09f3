// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Structured lexical errors.
//!
//! The lexer uses error recovery, so a lexical error never stops
//! tokenization; it is reported to the diagnostic sink under its numeric
//! code and the lexer resynchronizes at the next whitespace boundary.
//! [`LexError`] is the structured form: it integrates with [`miette`] for
//! labelled source reporting and maps onto the digest codes via
//! [`LexErrorKind::code`].

// Spurious warnings from miette derive macro expansion
#![allow(unused_assignments)]

use miette::Diagnostic;
use thiserror::Error;

use super::Position;

/// A lexical error encountered during tokenization.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
#[error("{kind}")]
#[diagnostic()]
pub struct LexError {
    /// The kind of lexical error.
    #[source]
    pub kind: LexErrorKind,
    /// Where the offending lexeme began.
    #[label("here")]
    pub pos: Position,
}

impl LexError {
    /// Creates a new lexical error.
    #[must_use]
    pub fn new(kind: LexErrorKind, pos: Position) -> Self {
        Self { kind, pos }
    }

    /// The diagnostic code this error is reported under.
    #[must_use]
    pub fn code(&self) -> u16 {
        self.kind.code()
    }
}

/// The kind of lexical error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexErrorKind {
    /// A character that cannot start any token.
    #[error("illegal character '{0}'")]
    IllegalCharacter(char),

    /// A string constant that is empty, or hit a newline or end of input
    /// before its closing quote.
    #[error("error in string constant")]
    InvalidString,

    /// A string constant longer than the maximum literal length.
    #[error("string constant is too long")]
    StringTooLong,

    /// A `(* ... *)` comment that hit end of input before `*)`.
    #[error("unterminated comment")]
    UnterminatedComment,

    /// A real constant that could not be parsed or is out of range.
    #[error("error in real constant")]
    InvalidReal,

    /// An integer constant that exceeds the maximum integer magnitude.
    #[error("integer constant exceeds range")]
    IntegerOutOfRange,
}

impl LexErrorKind {
    /// The digest code for this kind.
    #[must_use]
    pub fn code(&self) -> u16 {
        use crate::diagnostics::codes;
        match self {
            Self::IllegalCharacter(_) => codes::ILLEGAL_SYMBOL,
            Self::InvalidString => codes::INVALID_STRING,
            Self::StringTooLong => codes::STRING_TOO_LONG,
            Self::UnterminatedComment => codes::UNTERMINATED_COMMENT,
            Self::InvalidReal => codes::INVALID_REAL,
            Self::IntegerOutOfRange => codes::INTEGER_OUT_OF_RANGE,
        }
    }
}
