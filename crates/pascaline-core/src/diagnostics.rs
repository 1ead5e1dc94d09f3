// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Coded diagnostics and the diagnostic sink.
//!
//! Every analysis error, lexical, syntactic, or semantic, is reported as a
//! [`Diagnostic`]: a numeric code plus the source row and column it occurred
//! at. Message text is resolved through an [`ErrorDigest`] (code → text);
//! a default English digest ships with the crate, and callers may supply
//! their own. Loading a digest from disk is a concern of the embedding
//! application, not of this crate.
//!
//! The [`DiagnosticSink`] is append-only and enforces two caps: a maximum
//! number of diagnostics per source row and a maximum total. Reports past a
//! cap are silently dropped: [`DiagnosticSink::report`] returns `None` and
//! the analyzers carry on regardless.

use std::collections::HashMap;

use ecow::EcoString;
use tracing::trace;

use crate::source_analysis::Position;

/// Named constants for the diagnostic codes the analyzers raise directly.
///
/// Codes for expected-but-absent grammar terminals live with the tokens
/// themselves (`TokenKind::expected_code`); the constants here cover the
/// lexical and semantic taxonomy plus the generic recovery code.
pub mod codes {
    /// Illegal character, or unexpected symbol during recovery.
    pub const ILLEGAL_SYMBOL: u16 = 6;
    /// Error in the declaration part of a block.
    pub const DECLARATION_PART: u16 = 18;
    /// `to` or `downto` expected.
    pub const TO_OR_DOWNTO: u16 = 55;
    /// Empty or unterminated string constant.
    pub const INVALID_STRING: u16 = 75;
    /// String constant longer than the maximum literal length.
    pub const STRING_TOO_LONG: u16 = 76;
    /// Unterminated `(* ... *)` comment.
    pub const UNTERMINATED_COMMENT: u16 = 86;
    /// Identifier declared twice in the same scope.
    pub const DUPLICATE_IDENTIFIER: u16 = 101;
    /// Identifier not declared.
    pub const UNDECLARED_IDENTIFIER: u16 = 104;
    /// Error in type denoter.
    pub const INVALID_TYPE: u16 = 10;
    /// Operand types incompatible with the operator.
    pub const OPERATOR_TYPE_CONFLICT: u16 = 129;
    /// Operand type must be boolean.
    pub const BOOLEAN_REQUIRED: u16 = 135;
    /// Operand type does not support a leading sign.
    pub const SIGN_NOT_SUPPORTED: u16 = 140;
    /// Comparison operand types incompatible.
    pub const COMPARISON_TYPE_CONFLICT: u16 = 145;
    /// Assignment operand types incompatible.
    pub const ASSIGNMENT_TYPE_CONFLICT: u16 = 182;
    /// Malformed or out-of-range real constant.
    pub const INVALID_REAL: u16 = 201;
    /// Integer constant exceeds range.
    pub const INTEGER_OUT_OF_RANGE: u16 = 203;
}

/// A single reported diagnostic.
///
/// Diagnostics are never mutated after creation. The sequence number records
/// overall report order for listing purposes, independent of row grouping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// The numeric error code.
    pub code: u16,
    /// 1-based source row.
    pub row: u32,
    /// 1-based column within the row.
    pub column: u32,
    /// Message text resolved from the digest.
    pub message: EcoString,
    /// Ordinal report number, starting at 0.
    pub sequence: u32,
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}: error {}: {}",
            self.row, self.column, self.code, self.message
        )
    }
}

impl std::error::Error for Diagnostic {}

impl miette::Diagnostic for Diagnostic {
    fn code<'a>(&'a self) -> Option<Box<dyn std::fmt::Display + 'a>> {
        Some(Box::new(format!("pascaline::E{:03}", self.code)))
    }
}

/// Resolves diagnostic codes to message text.
#[derive(Debug, Clone)]
pub struct ErrorDigest {
    messages: HashMap<u16, EcoString>,
}

impl ErrorDigest {
    /// Creates a digest from an explicit code → message table.
    #[must_use]
    pub fn new(messages: HashMap<u16, EcoString>) -> Self {
        Self { messages }
    }

    /// Resolves a code to its message, falling back to a generic rendering
    /// for codes missing from the digest.
    #[must_use]
    pub fn resolve(&self, code: u16) -> EcoString {
        self.messages
            .get(&code)
            .cloned()
            .unwrap_or_else(|| ecow::eco_format!("error code {code}"))
    }
}

impl Default for ErrorDigest {
    /// The default English digest.
    fn default() -> Self {
        let entries: &[(u16, &str)] = &[
            (2, "identifier expected"),
            (3, "'program' expected"),
            (4, "')' expected"),
            (5, "':' expected"),
            (6, "illegal symbol"),
            (8, "'of' expected"),
            (9, "'(' expected"),
            (10, "error in type"),
            (11, "'[' expected"),
            (12, "']' expected"),
            (13, "'end' expected"),
            (14, "';' expected"),
            (15, "integer constant expected"),
            (16, "'=' expected"),
            (17, "'begin' expected"),
            (18, "error in declaration part"),
            (20, "',' expected"),
            (51, "':=' expected"),
            (52, "'then' expected"),
            (53, "'until' expected"),
            (54, "'do' expected"),
            (55, "'to' or 'downto' expected"),
            (56, "'if' expected"),
            (57, "'to' expected"),
            (58, "'downto' expected"),
            (61, "'.' expected"),
            (74, "'..' expected"),
            (75, "error in string constant"),
            (76, "string constant is too long"),
            (83, "character constant expected"),
            (86, "unterminated comment"),
            (101, "identifier declared twice"),
            (104, "identifier not declared"),
            (129, "operand types incompatible with operator"),
            (135, "operand type must be boolean"),
            (140, "operand type does not support a sign"),
            (145, "comparison operand types incompatible"),
            (182, "assignment operand types incompatible"),
            (201, "error in real constant"),
            (203, "integer constant exceeds range"),
        ];
        Self::new(
            entries
                .iter()
                .map(|&(code, text)| (code, EcoString::from(text)))
                .collect(),
        )
    }
}

/// Caps on diagnostic accumulation.
///
/// Both caps are policy, not invariants; embedders tune them to taste.
#[derive(Debug, Clone, Copy)]
pub struct DiagnosticLimits {
    /// Maximum diagnostics retained for a single source row.
    pub per_row: usize,
    /// Maximum diagnostics retained overall.
    pub total: usize,
}

impl Default for DiagnosticLimits {
    fn default() -> Self {
        Self {
            per_row: 5,
            total: 20,
        }
    }
}

/// The append-only diagnostic accumulator.
///
/// # Examples
///
/// ```
/// use pascaline_core::diagnostics::{codes, DiagnosticSink};
/// use pascaline_core::source_analysis::Position;
///
/// let mut sink = DiagnosticSink::default();
/// let diagnostic = sink.report(codes::ILLEGAL_SYMBOL, Position::new(1, 4, 3));
/// assert!(diagnostic.is_some());
/// assert_eq!(sink.diagnostics().len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct DiagnosticSink {
    digest: ErrorDigest,
    limits: DiagnosticLimits,
    diagnostics: Vec<Diagnostic>,
    row_counts: HashMap<u32, usize>,
}

impl DiagnosticSink {
    /// Creates a sink with the given digest and limits.
    #[must_use]
    pub fn new(digest: ErrorDigest, limits: DiagnosticLimits) -> Self {
        Self {
            digest,
            limits,
            diagnostics: Vec::new(),
            row_counts: HashMap::new(),
        }
    }

    /// Reports a diagnostic at the given position.
    ///
    /// Returns `None` when the per-row or total cap has been reached; the
    /// report is dropped and analysis continues unaffected.
    pub fn report(&mut self, code: u16, pos: Position) -> Option<&Diagnostic> {
        if self.diagnostics.len() >= self.limits.total {
            trace!(code, row = pos.row(), "diagnostic dropped: total cap");
            return None;
        }
        let row_count = self.row_counts.entry(pos.row()).or_insert(0);
        if *row_count >= self.limits.per_row {
            trace!(code, row = pos.row(), "diagnostic dropped: per-row cap");
            return None;
        }
        *row_count += 1;

        #[expect(
            clippy::cast_possible_truncation,
            reason = "sequence is bounded by the total cap"
        )]
        let sequence = self.diagnostics.len() as u32;
        trace!(code, row = pos.row(), column = pos.column(), "diagnostic");
        self.diagnostics.push(Diagnostic {
            code,
            row: pos.row(),
            column: pos.column(),
            message: self.digest.resolve(code),
            sequence,
        });
        self.diagnostics.last()
    }

    /// All diagnostics reported so far, in report order.
    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Diagnostics reported for a given source row.
    pub fn for_row(&self, row: u32) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(move |d| d.row == row)
    }

    /// Returns `true` if nothing has been reported.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Consumes the sink, yielding the accumulated diagnostics.
    #[must_use]
    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}
