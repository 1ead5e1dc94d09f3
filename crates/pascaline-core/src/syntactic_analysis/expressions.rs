// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Expression parsing with type inference.
//!
//! The standard four-level precedence chain: expression → simple-expression
//! → term → factor. Each level returns the inferred type of what it parsed
//! (`None` = unknown), bubbling up to the statement that consumes the
//! expression. Operator applications are validated as they are parsed; an
//! invalid combination reports an operator type conflict and yields an
//! unknown type, and an unknown operand always yields an unknown result
//! *without* a fresh diagnostic; one root error must not cascade.
//!
//! Only the expression entry point runs under recovery; the inner tiers
//! report a mismatched factor where it stands and leave resynchronization
//! to the expression's (or enclosing statement's) follower sets.

use crate::diagnostics::codes;
use crate::semantic_analysis::{validator, Builtins, TypeId};
use crate::source_analysis::{CharacterSource, Position, TokenKind};

use super::{sets, SyntacticAnalyzer, TokenSet};

impl<S: CharacterSource> SyntacticAnalyzer<S> {
    /// expression = simple-expression [relational-op simple-expression]
    ///
    /// Returns the expression's inferred type. A relational application
    /// yields `boolean` when the operand types are comparable.
    pub(super) fn expression(&mut self, followers: &TokenSet) -> Option<TypeId> {
        self.neutralized(
            &sets::EXPRESSION_STARTERS,
            &sets::EXPRESSION_FOLLOWERS,
            followers,
            codes::ILLEGAL_SYMBOL,
            |s, f| s.expression_tail(f),
        )
        .flatten()
    }

    fn expression_tail(&mut self, followers: &TokenSet) -> Option<TypeId> {
        let left = self.simple_expression(followers);

        if self
            .current_kind()
            .is_some_and(TokenKind::is_relational_operator)
        {
            let op_pos = self.current_pos();
            self.next_symbol();
            let right = self.simple_expression(followers);
            return match (left, right) {
                (Some(left), Some(right)) => {
                    if validator::comparison_compatible(&self.builtins, Some(left), Some(right)) {
                        Some(self.builtins.boolean)
                    } else {
                        self.error_at(codes::COMPARISON_TYPE_CONFLICT, op_pos);
                        None
                    }
                }
                _ => None,
            };
        }

        left
    }

    /// simple-expression = [sign] term (adding-op term)*
    fn simple_expression(&mut self, followers: &TokenSet) -> Option<TypeId> {
        let sign = matches!(
            self.current_kind(),
            Some(TokenKind::Plus | TokenKind::Minus)
        )
        .then(|| {
            let pos = self.current_pos();
            self.next_symbol();
            pos
        });

        let mut ty = self.term(followers);
        if let Some(sign_pos) = sign {
            if !validator::supports_sign(&self.builtins, ty) {
                self.error_at(codes::SIGN_NOT_SUPPORTED, sign_pos);
                ty = None;
            }
        }

        while self
            .current_kind()
            .is_some_and(TokenKind::is_adding_operator)
        {
            let op = self.current_kind().cloned().expect("operator checked");
            let op_pos = self.current_pos();
            self.next_symbol();
            let rhs = self.term(followers);
            ty = self.apply_operator(ty, rhs, &op, op_pos, validator::addition_result);
        }

        ty
    }

    /// term = factor (multiplying-op factor)*
    fn term(&mut self, followers: &TokenSet) -> Option<TypeId> {
        let mut ty = self.factor(followers);

        while self
            .current_kind()
            .is_some_and(TokenKind::is_multiplying_operator)
        {
            let op = self.current_kind().cloned().expect("operator checked");
            let op_pos = self.current_pos();
            self.next_symbol();
            let rhs = self.factor(followers);
            ty = self.apply_operator(ty, rhs, &op, op_pos, validator::multiplication_result);
        }

        ty
    }

    /// factor = identifier | constant | `nil` | `not` factor
    /// | `(` expression `)`
    fn factor(&mut self, followers: &TokenSet) -> Option<TypeId> {
        match self.current_kind() {
            Some(TokenKind::Not) => {
                let pos = self.current_pos();
                self.next_symbol();
                let operand = self.factor(followers);
                match operand {
                    None => None,
                    Some(ty) if ty == self.builtins.boolean => Some(self.builtins.boolean),
                    Some(_) => {
                        self.error_at(codes::BOOLEAN_REQUIRED, pos);
                        None
                    }
                }
            }
            Some(TokenKind::Identifier(_)) => {
                let (name, pos) = self
                    .accept_identifier()
                    .expect("current token is an identifier");
                self.resolve_use(&name, pos)
            }
            Some(TokenKind::IntConstant(_)) => {
                self.next_symbol();
                Some(self.builtins.integer)
            }
            Some(TokenKind::RealConstant(_)) => {
                self.next_symbol();
                Some(self.builtins.real)
            }
            Some(TokenKind::CharConstant(_)) => {
                self.next_symbol();
                Some(self.builtins.char)
            }
            Some(TokenKind::Nil) => {
                self.next_symbol();
                None
            }
            Some(TokenKind::LeftParen) => {
                self.next_symbol();
                let inner = self.expression(&followers.with(&TokenKind::RightParen));
                self.accept(&TokenKind::RightParen);
                inner
            }
            _ => {
                self.error(codes::ILLEGAL_SYMBOL);
                None
            }
        }
    }

    /// Applies a binary operator's typing rule, reporting a conflict when
    /// both operands are known but the combination is invalid. Unknown
    /// operands propagate silently.
    fn apply_operator(
        &mut self,
        left: Option<TypeId>,
        right: Option<TypeId>,
        op: &TokenKind,
        op_pos: Position,
        result: fn(&Builtins, TypeId, TypeId, &TokenKind) -> Option<TypeId>,
    ) -> Option<TypeId> {
        match (left, right) {
            (Some(left), Some(right)) => {
                let ty = result(&self.builtins, left, right, op);
                if ty.is_none() {
                    self.error_at(codes::OPERATOR_TYPE_CONFLICT, op_pos);
                }
                ty
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::analyze;

    fn codes_of(source: &str) -> Vec<u16> {
        analyze(source).diagnostics.iter().map(|d| d.code).collect()
    }

    /// Wraps an expression in a boolean-context statement for analysis.
    fn check_condition(expr: &str) -> Vec<u16> {
        codes_of(&format!(
            "program p;\n\
             var b, c: boolean; n, m: integer; r: real; ch: char;\n\
             begin if {expr} then n := 0 end.",
        ))
    }

    #[test]
    fn precedence_chains_type_correctly() {
        assert_eq!(check_condition("n + m * 2 < 10"), vec![]);
        assert_eq!(check_condition("(n + m) * 2 <= n"), vec![]);
        assert_eq!(check_condition("n / m < r"), vec![]);
    }

    #[test]
    fn relational_application_yields_boolean() {
        assert_eq!(check_condition("n < 10"), vec![]);
        assert_eq!(check_condition("ch = 'x'"), vec![]);
        assert_eq!(check_condition("n = r"), vec![]);
        assert_eq!(check_condition("b = c"), vec![]);
    }

    #[test]
    fn incomparable_operands_are_reported() {
        assert_eq!(check_condition("ch < n"), vec![145]);
        assert_eq!(check_condition("b < r"), vec![145]);
    }

    #[test]
    fn boolean_connectives() {
        assert_eq!(check_condition("b and c"), vec![]);
        assert_eq!(check_condition("b or not c"), vec![]);
        // The conflict yields an unknown type, so the condition check
        // stays silent, no cascade.
        assert_eq!(check_condition("n and m"), vec![129]);
    }

    #[test]
    fn not_requires_a_boolean_operand() {
        assert_eq!(check_condition("not n"), vec![135]);
        assert_eq!(check_condition("not b"), vec![]);
    }

    #[test]
    fn sign_requires_a_numeric_operand() {
        assert_eq!(
            codes_of("program p; var n: integer; begin n := -n end."),
            vec![]
        );
        assert_eq!(
            codes_of("program p; var b: boolean; begin b := -b end."),
            vec![140]
        );
    }

    #[test]
    fn div_and_mod_are_integer_only() {
        assert_eq!(
            codes_of("program p; var n: integer; begin n := n div 2 + n mod 2 end."),
            vec![]
        );
        assert_eq!(
            codes_of("program p; var r: real; begin r := r div 2 end."),
            vec![129]
        );
    }

    #[test]
    fn slash_yields_real_even_for_integers() {
        assert_eq!(
            codes_of("program p; var n: integer; begin n := n / 2 end."),
            vec![182]
        );
        assert_eq!(
            codes_of("program p; var r: real; n: integer; begin r := n / 2 end."),
            vec![]
        );
    }

    #[test]
    fn unknown_operand_suppresses_operator_diagnostics() {
        // `y` is undeclared: one 104, then the additions stay silent
        assert_eq!(
            codes_of("program p; var n: integer; begin n := y + 1 + 2 end."),
            vec![104]
        );
    }

    #[test]
    fn nil_is_an_unknown_typed_factor() {
        assert_eq!(
            codes_of("program p; var n: integer; begin n := nil end."),
            vec![]
        );
    }

    #[test]
    fn char_constants_type_as_char() {
        assert_eq!(
            codes_of("program p; var ch: char; begin ch := 'q' end."),
            vec![]
        );
        assert_eq!(
            codes_of("program p; var n: integer; begin n := 'q' end."),
            vec![182]
        );
    }

    #[test]
    fn parenthesized_expressions_keep_their_type() {
        assert_eq!(
            codes_of("program p; var n: integer; begin n := (1 + 2) * 3 end."),
            vec![]
        );
    }

    #[test]
    fn true_and_false_are_boolean_constants() {
        assert_eq!(
            codes_of("program p; var b: boolean; begin b := true and not false end."),
            vec![]
        );
    }
}
