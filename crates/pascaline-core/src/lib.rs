// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Pascaline compiler front end.
//!
//! This crate contains the core analysis pipeline:
//! - Lexical analysis (tokenization with one-token pushback)
//! - Syntactic analysis (recursive descent with panic-mode recovery)
//! - Semantic analysis (nested scopes, symbol resolution, type checking)
//!
//! There is no code generation. An analysis run consumes a character
//! source and produces a complete, ordered diagnostic list; the analyzer
//! always reaches end of input, however malformed the program.

pub mod diagnostics;
pub mod semantic_analysis;
pub mod source_analysis;
pub mod syntactic_analysis;

pub use syntactic_analysis::{analyze, AnalysisResult, SyntacticAnalyzer};

/// Re-export commonly used types.
pub mod prelude {
    pub use crate::diagnostics::{Diagnostic, DiagnosticLimits, DiagnosticSink, ErrorDigest};
    pub use crate::source_analysis::{CharacterSource, Position, StringSource, Token, TokenKind};
    pub use crate::syntactic_analysis::{analyze, AnalysisResult, SyntacticAnalyzer};
}
