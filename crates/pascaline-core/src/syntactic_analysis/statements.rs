// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Statement parsing: compound, `if`, `while`, `repeat`, `for`, and
//! assignment statements.
//!
//! Each concrete statement kind runs under its own starter/follower
//! recovery, so a malformed statement inside a `begin ... end` sequence
//! resynchronizes at the next `;` or `end` instead of desynchronizing the
//! enclosing compound statement. The empty statement is legal: a token that
//! cannot start any statement simply ends the (empty) statement, and the
//! enclosing construct deals with it.

use crate::diagnostics::codes;
use crate::semantic_analysis::validator;
use crate::source_analysis::{CharacterSource, TokenKind};

use super::{sets, SyntacticAnalyzer, TokenSet};

impl<S: CharacterSource> SyntacticAnalyzer<S> {
    /// statement-part = compound-statement
    pub(super) fn statement_part(&mut self, followers: &TokenSet) {
        self.compound_statement(followers);
    }

    /// compound-statement = `begin` statement (`;` statement)* `end`
    pub(super) fn compound_statement(&mut self, followers: &TokenSet) {
        self.accept(&TokenKind::Begin);
        let inner = followers
            .with(&TokenKind::Semicolon)
            .with(&TokenKind::End);
        self.statement(&inner);
        while self.check(&TokenKind::Semicolon) {
            self.next_symbol();
            self.statement(&inner);
        }
        self.accept(&TokenKind::End);
    }

    /// Dispatches on the current token to a concrete statement, each under
    /// its own recovery. No starter match means an empty statement.
    pub(super) fn statement(&mut self, followers: &TokenSet) {
        match self.current_kind() {
            Some(TokenKind::Begin) => {
                self.neutralized(
                    &sets::COMPOUND_STATEMENT_STARTERS,
                    &sets::COMPOUND_STATEMENT_FOLLOWERS,
                    followers,
                    TokenKind::Begin.expected_code(),
                    |s, f| s.compound_statement(f),
                );
            }
            Some(TokenKind::If) => {
                self.neutralized(
                    &sets::IF_STATEMENT_STARTERS,
                    &sets::STATEMENT_FOLLOWERS,
                    followers,
                    TokenKind::If.expected_code(),
                    |s, f| s.if_statement(f),
                );
            }
            Some(TokenKind::While) => {
                self.neutralized(
                    &sets::WHILE_STATEMENT_STARTERS,
                    &sets::STATEMENT_FOLLOWERS,
                    followers,
                    codes::ILLEGAL_SYMBOL,
                    |s, f| s.while_statement(f),
                );
            }
            Some(TokenKind::Repeat) => {
                self.neutralized(
                    &sets::REPEAT_STATEMENT_STARTERS,
                    &sets::STATEMENT_FOLLOWERS,
                    followers,
                    codes::ILLEGAL_SYMBOL,
                    |s, f| s.repeat_statement(f),
                );
            }
            Some(TokenKind::For) => {
                self.neutralized(
                    &sets::FOR_STATEMENT_STARTERS,
                    &sets::STATEMENT_FOLLOWERS,
                    followers,
                    codes::ILLEGAL_SYMBOL,
                    |s, f| s.for_statement(f),
                );
            }
            Some(TokenKind::Identifier(_)) => {
                self.neutralized(
                    &sets::ASSIGNMENT_STATEMENT_STARTERS,
                    &sets::STATEMENT_FOLLOWERS,
                    followers,
                    2,
                    |s, f| s.assignment_statement(f),
                );
            }
            _ => {} // empty statement
        }
    }

    /// if-statement = `if` expression `then` statement [`else` statement]
    fn if_statement(&mut self, followers: &TokenSet) {
        self.accept(&TokenKind::If);
        let condition_pos = self.current_pos();
        let condition = self.expression(&followers.with(&TokenKind::Then));
        self.require_logical(condition, condition_pos);
        self.accept(&TokenKind::Then);
        self.statement(&followers.with(&TokenKind::Else));
        if self.check(&TokenKind::Else) {
            self.next_symbol();
            self.statement(followers);
        }
    }

    /// while-statement = `while` expression `do` statement
    fn while_statement(&mut self, followers: &TokenSet) {
        self.accept(&TokenKind::While);
        let condition_pos = self.current_pos();
        let condition = self.expression(&followers.with(&TokenKind::Do));
        self.require_logical(condition, condition_pos);
        self.accept(&TokenKind::Do);
        self.statement(followers);
    }

    /// repeat-statement = `repeat` statement (`;` statement)* `until` expression
    fn repeat_statement(&mut self, followers: &TokenSet) {
        self.accept(&TokenKind::Repeat);
        let inner = followers
            .with(&TokenKind::Semicolon)
            .with(&TokenKind::Until);
        self.statement(&inner);
        while self.check(&TokenKind::Semicolon) {
            self.next_symbol();
            self.statement(&inner);
        }
        self.accept(&TokenKind::Until);
        let condition_pos = self.current_pos();
        let condition = self.expression(followers);
        self.require_logical(condition, condition_pos);
    }

    /// for-statement = `for` identifier `:=` expression (`to` | `downto`)
    /// expression `do` statement
    ///
    /// Both bounds must be assignment-compatible with the control variable.
    fn for_statement(&mut self, followers: &TokenSet) {
        self.accept(&TokenKind::For);
        let control_ty = match self.accept_identifier() {
            Some((name, pos)) => self.resolve_use(&name, pos),
            None => None,
        };
        self.accept(&TokenKind::Assign);

        let bound_followers = followers
            .with(&TokenKind::To)
            .with(&TokenKind::Downto)
            .with(&TokenKind::Do);
        let first_pos = self.current_pos();
        let first = self.expression(&bound_followers);
        if !validator::assignment_compatible(&self.builtins, control_ty, first) {
            self.error_at(codes::ASSIGNMENT_TYPE_CONFLICT, first_pos);
        }

        if matches!(self.current_kind(), Some(TokenKind::To | TokenKind::Downto)) {
            self.next_symbol();
        } else {
            self.error(codes::TO_OR_DOWNTO);
        }

        let second_pos = self.current_pos();
        let second = self.expression(&followers.with(&TokenKind::Do));
        if !validator::assignment_compatible(&self.builtins, control_ty, second) {
            self.error_at(codes::ASSIGNMENT_TYPE_CONFLICT, second_pos);
        }

        self.accept(&TokenKind::Do);
        self.statement(followers);
    }

    /// assignment-statement = identifier `:=` expression
    fn assignment_statement(&mut self, followers: &TokenSet) {
        let target = self.accept_identifier();
        let target_ty = match &target {
            Some((name, pos)) => self.resolve_use(name, *pos),
            None => None,
        };
        let assign_pos = self.current_pos();
        self.accept(&TokenKind::Assign);
        let value_ty = self.expression(followers);

        if !validator::assignment_compatible(&self.builtins, target_ty, value_ty) {
            self.error_at(codes::ASSIGNMENT_TYPE_CONFLICT, assign_pos);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::analyze;

    fn codes_of(source: &str) -> Vec<u16> {
        analyze(source).diagnostics.iter().map(|d| d.code).collect()
    }

    #[test]
    fn if_while_repeat_for_parse_cleanly() {
        let source = "program p;\n\
                      var i, n: integer; stop: boolean;\n\
                      begin\n\
                        if n < 10 then n := n + 1 else n := 0;\n\
                        while n > 0 do n := n - 1;\n\
                        repeat n := n + 2 until n >= 10;\n\
                        for i := 1 to 10 do n := n + i;\n\
                        for i := 10 downto 1 do stop := i = 1\n\
                      end.";
        assert_eq!(codes_of(source), vec![]);
    }

    #[test]
    fn nested_compound_statements() {
        assert_eq!(
            codes_of(
                "program p; var x: integer;\n\
                 begin begin x := 1; begin x := 2 end end end.",
            ),
            vec![]
        );
    }

    #[test]
    fn empty_statements_are_legal() {
        assert_eq!(codes_of("program p; begin ; ; end."), vec![]);
    }

    #[test]
    fn condition_must_be_boolean() {
        assert_eq!(
            codes_of("program p; var n: integer; begin if n then n := 1 end."),
            vec![135]
        );
        assert_eq!(
            codes_of("program p; var n: integer; begin while n + 1 do n := 1 end."),
            vec![135]
        );
        assert_eq!(
            codes_of("program p; var n: integer; begin repeat n := 1 until n end."),
            vec![135]
        );
    }

    #[test]
    fn assignment_widens_integer_to_real_but_not_back() {
        assert_eq!(
            codes_of("program p; var r: real; n: integer; begin r := n end."),
            vec![]
        );
        assert_eq!(
            codes_of("program p; var r: real; n: integer; begin n := r end."),
            vec![182]
        );
    }

    #[test]
    fn assigning_real_literal_to_integer_variable() {
        assert_eq!(
            codes_of("program p; var a: integer; begin a := 3.5 end."),
            vec![182]
        );
    }

    #[test]
    fn undeclared_target_reported_once_per_scope() {
        let source = "program p;\n\
                      begin\n\
                        y := 1;\n\
                        y := 2\n\
                      end.";
        assert_eq!(codes_of(source), vec![104]);
    }

    #[test]
    fn for_bounds_must_match_the_control_variable() {
        assert_eq!(
            codes_of(
                "program p; var i: integer;\n\
                 begin for i := 1 to 2.5 do i := i end.",
            ),
            vec![182]
        );
    }

    #[test]
    fn missing_then_recovers_within_the_statement() {
        assert_eq!(
            codes_of(
                "program p; var b: boolean; n: integer;\n\
                 begin if b n := 1 end.",
            ),
            vec![52]
        );
    }

    #[test]
    fn malformed_statement_does_not_desynchronize_the_compound() {
        // The bad statement is skipped to the `;`; the next one still parses
        // and its semantic error is still caught.
        let diagnostics = codes_of(
            "program p; var n: integer;\n\
             begin\n\
               n := ;\n\
               n := 1.5\n\
             end.",
        );
        assert_eq!(diagnostics, vec![6, 182]);
    }
}
