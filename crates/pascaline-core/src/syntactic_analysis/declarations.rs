// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Declaration parsing: program heading, blocks, `type` and `var` sections,
//! and type denoters.
//!
//! Declarations drive the scope stack: the program heading binds the
//! program name in the outermost scope, a block opens a fresh scope for its
//! declarations and closes it on exit, and `type`/`var` sections bind names
//! in the current scope (duplicates reported, first binding kept).

use crate::diagnostics::codes;
use crate::semantic_analysis::{IdentifierClass, TypeId};
use crate::source_analysis::{CharacterSource, TokenKind};

use super::{sets, SyntacticAnalyzer, TokenSet};

impl<S: CharacterSource> SyntacticAnalyzer<S> {
    /// program = program-heading `;` block `.`
    pub(super) fn program(&mut self) {
        self.program_heading();
        self.accept(&TokenKind::Semicolon);
        self.neutralized(
            &sets::BLOCK_STARTERS,
            &sets::BLOCK_FOLLOWERS,
            &TokenSet::EMPTY,
            codes::DECLARATION_PART,
            |s, followers| s.block(followers),
        );
        self.accept(&TokenKind::Dot);
    }

    /// program-heading = `program` identifier
    fn program_heading(&mut self) {
        self.accept(&TokenKind::Program);
        if let Some((name, pos)) = self.accept_identifier() {
            self.bind(name, IdentifierClass::Program, None, pos);
        }
    }

    /// block = type-definition-part var-declaration-part statement-part
    ///
    /// The block's declarations live in their own scope.
    pub(super) fn block(&mut self, followers: &TokenSet) {
        self.scopes.open();

        self.neutralized(
            &sets::TYPE_DEFINITION_PART_STARTERS,
            &sets::TYPE_DEFINITION_PART_FOLLOWERS,
            followers,
            codes::DECLARATION_PART,
            |s, f| s.type_definition_part(f),
        );
        self.neutralized(
            &sets::VAR_DECLARATION_PART_STARTERS,
            &sets::VAR_DECLARATION_PART_FOLLOWERS,
            followers,
            codes::DECLARATION_PART,
            |s, f| s.var_declaration_part(f),
        );
        self.neutralized(
            &sets::STATEMENT_PART_STARTERS,
            &sets::STATEMENT_PART_FOLLOWERS,
            followers,
            TokenKind::Begin.expected_code(),
            |s, f| s.statement_part(f),
        );

        self.scopes.close();
    }

    /// type-definition-part = [`type` (identifier `=` type `;`)+]
    fn type_definition_part(&mut self, followers: &TokenSet) {
        if !self.check(&TokenKind::Type) {
            return;
        }
        self.next_symbol();

        while matches!(self.current_kind(), Some(TokenKind::Identifier(_))) {
            let name = self.accept_identifier();
            self.accept(&TokenKind::Equals);
            let ty = self
                .neutralized(
                    &sets::TYPE_DENOTER_STARTERS,
                    &sets::TYPE_DENOTER_FOLLOWERS,
                    followers,
                    codes::INVALID_TYPE,
                    |s, f| s.type_denoter(f),
                )
                .flatten();
            if let Some((name, pos)) = name {
                // An alias shares the aliased type's identity.
                self.bind(name, IdentifierClass::Type, ty, pos);
            }
            self.accept(&TokenKind::Semicolon);
        }
    }

    /// var-declaration-part = [`var` (var-declaration `;`)+]
    fn var_declaration_part(&mut self, followers: &TokenSet) {
        if !self.check(&TokenKind::Var) {
            return;
        }
        self.next_symbol();

        loop {
            self.neutralized(
                &sets::VAR_DECLARATION_STARTERS,
                &sets::VAR_DECLARATION_FOLLOWERS,
                followers,
                2,
                |s, f| s.var_declaration(f),
            );
            self.accept(&TokenKind::Semicolon);
            if !matches!(self.current_kind(), Some(TokenKind::Identifier(_))) {
                break;
            }
        }
    }

    /// var-declaration = identifier (`,` identifier)* `:` type
    ///
    /// Every listed identifier is bound to the parsed type. A name already
    /// present in the current scope is a duplicate-declaration error and
    /// keeps its first binding.
    fn var_declaration(&mut self, followers: &TokenSet) {
        let mut names = Vec::new();
        if let Some(entry) = self.accept_identifier() {
            names.push(entry);
        }
        while self.check(&TokenKind::Comma) {
            self.next_symbol();
            if let Some(entry) = self.accept_identifier() {
                names.push(entry);
            }
        }

        self.accept(&TokenKind::Colon);
        let ty = self
            .neutralized(
                &sets::TYPE_DENOTER_STARTERS,
                &sets::TYPE_DENOTER_FOLLOWERS,
                followers,
                codes::INVALID_TYPE,
                |s, f| s.type_denoter(f),
            )
            .flatten();

        for (name, pos) in names {
            self.bind(name, IdentifierClass::Var, ty, pos);
        }
    }

    /// type = named type | subrange type | array type
    ///
    /// Only named types yield a descriptor. Subrange and array types are
    /// recognized syntactically but produce an unknown type, which
    /// suppresses downstream compatibility checks.
    pub(super) fn type_denoter(&mut self, followers: &TokenSet) -> Option<TypeId> {
        match self.current_kind() {
            Some(TokenKind::Identifier(_)) => self.named_type(),
            Some(TokenKind::IntConstant(_) | TokenKind::CharConstant(_)) => self.subrange_type(),
            Some(TokenKind::Array) => self.array_type(followers),
            _ => {
                self.error(codes::INVALID_TYPE);
                None
            }
        }
    }

    /// A type given by name. The name must resolve to a type identifier.
    fn named_type(&mut self) -> Option<TypeId> {
        let (name, pos) = self.accept_identifier()?;
        match self.scopes.find(&name).map(|d| (d.class, d.ty)) {
            Some((IdentifierClass::Type, ty)) => ty,
            // An installed placeholder: the undeclared-identifier report
            // already fired, don't pile a class error on top.
            Some((IdentifierClass::Unknown, _)) => None,
            Some(_) => {
                self.error_at(codes::INVALID_TYPE, pos);
                None
            }
            None => {
                self.resolve_use(&name, pos);
                None
            }
        }
    }

    /// subrange-type = constant `..` constant
    ///
    /// Both bounds must be constants of the same literal class.
    fn subrange_type(&mut self) -> Option<TypeId> {
        let bound = self
            .current_kind()
            .cloned()
            .expect("caller checked the bound constant");
        self.next_symbol();
        self.accept(&TokenKind::TwoDots);
        // The closing bound must match the opening bound's class.
        self.accept(&bound);
        None
    }

    /// array-type = `array` `[` index-type (`,` index-type)* `]` `of` type
    fn array_type(&mut self, followers: &TokenSet) -> Option<TypeId> {
        self.accept(&TokenKind::Array);
        self.accept(&TokenKind::LeftBracket);
        self.index_type();
        while self.check(&TokenKind::Comma) {
            self.next_symbol();
            self.index_type();
        }
        self.accept(&TokenKind::RightBracket);
        self.accept(&TokenKind::Of);
        self.neutralized(
            &sets::TYPE_DENOTER_STARTERS,
            &sets::TYPE_DENOTER_FOLLOWERS,
            followers,
            codes::INVALID_TYPE,
            |s, f| s.type_denoter(f),
        );
        None
    }

    /// index-type = subrange type | named simple type
    fn index_type(&mut self) {
        match self.current_kind() {
            Some(TokenKind::IntConstant(_) | TokenKind::CharConstant(_)) => {
                self.subrange_type();
            }
            Some(TokenKind::Identifier(_)) => {
                self.named_type();
            }
            _ => self.error(codes::INVALID_TYPE),
        }
    }
}
