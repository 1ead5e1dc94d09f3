// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Recursive-descent recognition for Pascaline.
//!
//! The [`SyntacticAnalyzer`] drives the whole front end: it pulls tokens
//! from the lexer on demand, mutates the scope stack as declarations are
//! parsed, queries the type validator as expressions are parsed, and
//! reports every mismatch to the diagnostic sink.
//!
//! # Error recovery
//!
//! Recovery is mandatory: the analyzer always reaches end of input, no
//! matter how malformed the program. Each recovered nonterminal goes
//! through `neutralized`, the panic-mode combinator: if the current token
//! cannot start the construct, report and skip to a starter or follower;
//! after the construct, if the current token cannot follow it, report and
//! skip to a follower. Follower sets are threaded down from callers so
//! every skip loop has the full context of what counts as a
//! synchronization point, and every skip loop also stops at
//! end of input, so recovery cannot loop forever.
//!
//! `accept` on a mismatched terminal reports and does **not** advance: the
//! enclosing construct's recovery owns resynchronization.
//!
//! # Usage
//!
//! ```
//! use pascaline_core::analyze;
//!
//! let result = analyze("program demo; var x: integer; begin x := x + 1 end.");
//! assert!(result.diagnostics.is_empty());
//! ```

use ecow::EcoString;
use tracing::debug;

use crate::diagnostics::{codes, Diagnostic, DiagnosticSink};
use crate::semantic_analysis::{
    validator, Builtins, IdentifierClass, IdentifierDescriptor, ScopeStack, TypeArena, TypeId,
};
use crate::source_analysis::{
    CharacterSource, LexicalAnalyzer, Position, StringSource, Token, TokenKind,
};

mod declarations;
mod expressions;
mod sets;
mod statements;

pub(crate) use sets::TokenSet;

/// Everything an analysis run produces.
///
/// The scope stack and type arena are retained so callers (tests, mostly)
/// can observe the outermost scope after analysis; the diagnostics are the
/// primary output.
#[derive(Debug)]
pub struct AnalysisResult {
    /// All diagnostics, in report order.
    pub diagnostics: Vec<Diagnostic>,
    /// The scope stack, unwound back to the outermost scope.
    pub scopes: ScopeStack,
    /// Every type descriptor allocated during the run.
    pub types: TypeArena,
    /// Ids of the built-in types.
    pub builtins: Builtins,
}

/// Analyzes an in-memory source string with default digest and limits.
///
/// This is the main library entry point; construct a [`SyntacticAnalyzer`]
/// directly to supply a custom [`CharacterSource`] or sink.
#[must_use]
pub fn analyze(source: &str) -> AnalysisResult {
    SyntacticAnalyzer::new(StringSource::new(source), DiagnosticSink::default()).run()
}

/// The recursive-descent recognizer.
pub struct SyntacticAnalyzer<S> {
    lexer: LexicalAnalyzer<S>,
    sink: DiagnosticSink,
    pub(crate) scopes: ScopeStack,
    pub(crate) arena: TypeArena,
    pub(crate) builtins: Builtins,
}

impl<S: CharacterSource> SyntacticAnalyzer<S> {
    /// Creates an analyzer over the given character source.
    ///
    /// The outermost scope is created and seeded with the built-in types
    /// and constants before any token is read.
    #[must_use]
    pub fn new(source: S, sink: DiagnosticSink) -> Self {
        let mut arena = TypeArena::new();
        let (scopes, builtins) = ScopeStack::with_builtins(&mut arena);
        Self {
            lexer: LexicalAnalyzer::new(source),
            sink,
            scopes,
            arena,
            builtins,
        }
    }

    /// Runs the analysis to end of input.
    #[must_use]
    pub fn run(mut self) -> AnalysisResult {
        debug!("starting analysis");
        self.next_symbol();
        self.program();
        debug!(
            diagnostics = self.sink.diagnostics().len(),
            "analysis complete"
        );
        AnalysisResult {
            diagnostics: self.sink.into_diagnostics(),
            scopes: self.scopes,
            types: self.arena,
            builtins: self.builtins,
        }
    }

    // ========================================================================
    // Token management
    // ========================================================================

    /// Fetches the next token, transparently re-fetching past lexical
    /// errors so the grammar never sees an erroneous lexeme.
    pub(crate) fn next_symbol(&mut self) {
        loop {
            self.lexer.next_symbol(&mut self.sink);
            if self.lexer.error().is_some() && !self.lexer.is_finished() {
                continue;
            }
            break;
        }
    }

    /// The current token's kind, or `None` once input is exhausted.
    pub(crate) fn current_kind(&self) -> Option<&TokenKind> {
        self.lexer.current().map(|token| &token.kind)
    }

    /// The position diagnostics at the current token should carry.
    pub(crate) fn current_pos(&self) -> Position {
        self.lexer
            .current()
            .map_or_else(|| self.lexer.position(), |token| token.pos)
    }

    /// Returns `true` once the character source is exhausted.
    pub(crate) fn is_finished(&self) -> bool {
        self.lexer.is_finished()
    }

    /// Checks whether the current token matches `kind` (payloads ignored).
    pub(crate) fn check(&self, kind: &TokenKind) -> bool {
        self.current_kind()
            .is_some_and(|current| std::mem::discriminant(current) == std::mem::discriminant(kind))
    }

    /// Accepts the expected terminal: advance on match, otherwise report
    /// the terminal's diagnostic code and leave the token for the caller's
    /// recovery to consume.
    pub(crate) fn accept(&mut self, expected: &TokenKind) {
        if self.check(expected) {
            self.next_symbol();
        } else {
            self.error(expected.expected_code());
        }
    }

    /// Accepts an identifier, returning its name and position.
    pub(crate) fn accept_identifier(&mut self) -> Option<(EcoString, Position)> {
        match self.lexer.current() {
            Some(Token {
                kind: TokenKind::Identifier(name),
                pos,
            }) => {
                let entry = (name.clone(), *pos);
                self.next_symbol();
                Some(entry)
            }
            _ => {
                self.error(2);
                None
            }
        }
    }

    // ========================================================================
    // Diagnostics
    // ========================================================================

    /// Reports a diagnostic at the current token.
    pub(crate) fn error(&mut self, code: u16) {
        let pos = self.current_pos();
        self.sink.report(code, pos);
    }

    /// Reports a diagnostic at an explicit position.
    pub(crate) fn error_at(&mut self, code: u16, pos: Position) {
        self.sink.report(code, pos);
    }

    // ========================================================================
    // Panic-mode recovery
    // ========================================================================

    /// Returns `true` if the current token is a member of `set`.
    pub(crate) fn current_in(&self, set: &TokenSet) -> bool {
        self.current_kind().is_some_and(|kind| set.contains(kind))
    }

    /// The panic-mode recovery combinator.
    ///
    /// Unions `followers` with the caller's `parent` followers, then:
    ///
    /// 1. If the current token is not in `starters`: report `code` and skip
    ///    until a starter or follower (or end of input).
    /// 2. If a starter was found: run `parse` with the combined followers.
    /// 3. If the token after `parse` is not a follower: report the generic
    ///    unexpected-symbol code and skip to a follower.
    ///
    /// Returns `parse`'s result, or `None` if no starter was ever found.
    pub(crate) fn neutralized<R>(
        &mut self,
        starters: &TokenSet,
        followers: &TokenSet,
        parent: &TokenSet,
        code: u16,
        parse: impl FnOnce(&mut Self, &TokenSet) -> R,
    ) -> Option<R> {
        let followers = followers.union(parent);

        if !self.current_in(starters) {
            self.error(code);
            self.skip_to_before(starters, &followers);
        }

        if !self.current_in(starters) {
            return None;
        }

        let result = parse(self, &followers);
        if !self.current_in(&followers) && !self.is_finished() {
            self.error(codes::ILLEGAL_SYMBOL);
            self.skip_to_after(&followers);
        }
        Some(result)
    }

    /// Skips tokens until one can start the construct or follow it.
    fn skip_to_before(&mut self, starters: &TokenSet, followers: &TokenSet) {
        while !self.current_in(starters) && !self.current_in(followers) && !self.is_finished() {
            self.next_symbol();
        }
    }

    /// Skips tokens until one can follow the construct.
    fn skip_to_after(&mut self, followers: &TokenSet) {
        while !self.current_in(followers) && !self.is_finished() {
            self.next_symbol();
        }
    }

    // ========================================================================
    // Shared semantic helpers
    // ========================================================================

    /// Binds an identifier in the current scope, reporting a duplicate
    /// declaration and keeping the first binding if the name already exists.
    pub(crate) fn bind(
        &mut self,
        name: EcoString,
        class: IdentifierClass,
        ty: Option<TypeId>,
        pos: Position,
    ) {
        if self.scopes.find_in_current(&name).is_some() {
            self.error_at(codes::DUPLICATE_IDENTIFIER, pos);
        } else {
            self.scopes.add(IdentifierDescriptor::new(name, class, ty));
        }
    }

    /// Resolves an identifier use, reporting an undeclared identifier once
    /// per name per scope: on the first miss a placeholder with unknown
    /// class and type is installed so later uses resolve silently.
    pub(crate) fn resolve_use(&mut self, name: &str, pos: Position) -> Option<TypeId> {
        match self.scopes.find(name) {
            Some(descriptor) => descriptor.ty,
            None => {
                self.error_at(codes::UNDECLARED_IDENTIFIER, pos);
                self.scopes.add(IdentifierDescriptor::new(
                    name,
                    IdentifierClass::Unknown,
                    None,
                ));
                None
            }
        }
    }

    /// Reports a boolean-required diagnostic unless `ty` is boolean or
    /// unknown.
    pub(crate) fn require_logical(&mut self, ty: Option<TypeId>, pos: Position) {
        if !validator::is_logical(&self.builtins, ty) {
            self.error_at(codes::BOOLEAN_REQUIRED, pos);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codes_of(source: &str) -> Vec<u16> {
        analyze(source).diagnostics.iter().map(|d| d.code).collect()
    }

    #[test]
    fn clean_program_produces_no_diagnostics() {
        let result = analyze(
            "program demo;\n\
             var x, y: integer;\n\
             begin\n\
               x := 1;\n\
               y := x + 2\n\
             end.",
        );
        assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
    }

    #[test]
    fn analysis_unwinds_to_the_outermost_scope() {
        let result = analyze("program demo; var x: integer; begin x := 1 end.");
        assert_eq!(result.scopes.depth(), 0);
        // Program-scope declarations are discarded with the scope
        assert!(result.scopes.find("x").is_none());
        // Builtins and the program name remain
        assert!(result.scopes.find("integer").is_some());
        assert!(result.scopes.find("demo").is_some());
    }

    #[test]
    fn missing_semicolon_after_heading() {
        assert_eq!(codes_of("program demo var x: integer; begin end."), vec![14]);
    }

    #[test]
    fn missing_final_dot() {
        assert_eq!(codes_of("program demo; begin end"), vec![61]);
    }

    #[test]
    fn missing_end_is_reported_once_and_analysis_terminates() {
        let result = analyze("program demo; var x: integer; begin x := 1 .");
        let codes: Vec<u16> = result.diagnostics.iter().map(|d| d.code).collect();
        assert_eq!(codes, vec![13]);
    }

    #[test]
    fn garbage_between_parts_is_skipped_with_one_report() {
        let diagnostics = codes_of("program demo; + - begin end.");
        assert_eq!(diagnostics, vec![18]);
    }

    #[test]
    fn accept_does_not_advance_past_the_mismatch() {
        // The `begin` that failed the `;` accept is still there to start
        // the statement part, so only the one diagnostic appears.
        assert_eq!(codes_of("program demo begin end."), vec![14]);
    }

    #[test]
    fn empty_input_recovers_to_end() {
        let result = analyze("");
        assert!(!result.diagnostics.is_empty());
    }
}
