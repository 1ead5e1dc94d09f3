// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Starter and follower token sets for panic-mode recovery.
//!
//! Every recovered nonterminal has a statically known *starter* set (tokens
//! that may legally begin it) and *follower* set (tokens that may legally
//! appear after it completes). The recovery combinator unions a construct's
//! own followers with the followers threaded down from its caller, so the
//! static sets here only list each construct's local continuation tokens.
//!
//! Sets are bitsets over the dense token-kind index, so building and
//! unioning them is cheap enough to do per invocation.

use std::sync::LazyLock;

use crate::source_analysis::TokenKind;

/// A set of token kinds, payloads ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct TokenSet(u128);

impl TokenSet {
    /// The empty set.
    pub(crate) const EMPTY: Self = Self(0);

    /// Builds a set from the given kinds.
    pub(crate) fn of(kinds: &[TokenKind]) -> Self {
        let mut bits = 0u128;
        for kind in kinds {
            bits |= 1 << kind.set_index();
        }
        Self(bits)
    }

    /// Returns the union of this set and `other`.
    #[must_use]
    pub(crate) fn union(self, other: &Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Returns this set with `kind` added.
    #[must_use]
    pub(crate) fn with(self, kind: &TokenKind) -> Self {
        Self(self.0 | (1 << kind.set_index()))
    }

    /// Returns `true` if `kind` is a member.
    pub(crate) fn contains(self, kind: &TokenKind) -> bool {
        self.0 & (1 << kind.set_index()) != 0
    }
}

/// Sample identifier kind for set construction (payload is ignored).
fn identifier() -> TokenKind {
    TokenKind::Identifier(ecow::EcoString::new())
}

fn int_constant() -> TokenKind {
    TokenKind::IntConstant(0)
}

fn real_constant() -> TokenKind {
    TokenKind::RealConstant(0.0)
}

fn char_constant() -> TokenKind {
    TokenKind::CharConstant(ecow::EcoString::new())
}

// === Declarations ===

pub(crate) static BLOCK_STARTERS: LazyLock<TokenSet> = LazyLock::new(|| {
    TokenSet::of(&[TokenKind::Type, TokenKind::Var, TokenKind::Begin])
});

pub(crate) static BLOCK_FOLLOWERS: LazyLock<TokenSet> =
    LazyLock::new(|| TokenSet::of(&[TokenKind::Dot]));

/// The type-definition part is optional, so its starters include whatever
/// may start the parts after it.
pub(crate) static TYPE_DEFINITION_PART_STARTERS: LazyLock<TokenSet> = LazyLock::new(|| {
    TokenSet::of(&[TokenKind::Type, TokenKind::Var, TokenKind::Begin])
});

pub(crate) static TYPE_DEFINITION_PART_FOLLOWERS: LazyLock<TokenSet> =
    LazyLock::new(|| TokenSet::of(&[TokenKind::Var, TokenKind::Begin]));

pub(crate) static VAR_DECLARATION_PART_STARTERS: LazyLock<TokenSet> =
    LazyLock::new(|| TokenSet::of(&[TokenKind::Var, TokenKind::Begin]));

pub(crate) static VAR_DECLARATION_PART_FOLLOWERS: LazyLock<TokenSet> =
    LazyLock::new(|| TokenSet::of(&[TokenKind::Begin]));

pub(crate) static VAR_DECLARATION_STARTERS: LazyLock<TokenSet> =
    LazyLock::new(|| TokenSet::of(&[identifier()]));

pub(crate) static VAR_DECLARATION_FOLLOWERS: LazyLock<TokenSet> =
    LazyLock::new(|| TokenSet::of(&[TokenKind::Semicolon]));

pub(crate) static TYPE_DENOTER_STARTERS: LazyLock<TokenSet> = LazyLock::new(|| {
    TokenSet::of(&[
        int_constant(),
        char_constant(),
        identifier(),
        TokenKind::Array,
    ])
});

pub(crate) static TYPE_DENOTER_FOLLOWERS: LazyLock<TokenSet> =
    LazyLock::new(|| TokenSet::of(&[TokenKind::Semicolon]));

// === Statements ===

pub(crate) static STATEMENT_PART_STARTERS: LazyLock<TokenSet> =
    LazyLock::new(|| TokenSet::of(&[TokenKind::Begin]));

pub(crate) static STATEMENT_PART_FOLLOWERS: LazyLock<TokenSet> =
    LazyLock::new(|| TokenSet::of(&[TokenKind::Dot]));

pub(crate) static COMPOUND_STATEMENT_STARTERS: LazyLock<TokenSet> =
    LazyLock::new(|| TokenSet::of(&[TokenKind::Begin]));

pub(crate) static COMPOUND_STATEMENT_FOLLOWERS: LazyLock<TokenSet> =
    LazyLock::new(|| TokenSet::of(&[TokenKind::Semicolon, TokenKind::Dot]));

pub(crate) static IF_STATEMENT_STARTERS: LazyLock<TokenSet> =
    LazyLock::new(|| TokenSet::of(&[TokenKind::If]));

pub(crate) static WHILE_STATEMENT_STARTERS: LazyLock<TokenSet> =
    LazyLock::new(|| TokenSet::of(&[TokenKind::While]));

pub(crate) static REPEAT_STATEMENT_STARTERS: LazyLock<TokenSet> =
    LazyLock::new(|| TokenSet::of(&[TokenKind::Repeat]));

pub(crate) static FOR_STATEMENT_STARTERS: LazyLock<TokenSet> =
    LazyLock::new(|| TokenSet::of(&[TokenKind::For]));

pub(crate) static ASSIGNMENT_STATEMENT_STARTERS: LazyLock<TokenSet> =
    LazyLock::new(|| TokenSet::of(&[identifier()]));

/// Shared by every concrete statement kind: what may follow a statement.
pub(crate) static STATEMENT_FOLLOWERS: LazyLock<TokenSet> =
    LazyLock::new(|| TokenSet::of(&[TokenKind::Semicolon, TokenKind::End]));

// === Expressions ===

pub(crate) static EXPRESSION_STARTERS: LazyLock<TokenSet> = LazyLock::new(|| {
    TokenSet::of(&[
        TokenKind::Plus,
        TokenKind::Minus,
        TokenKind::Not,
        TokenKind::Nil,
        TokenKind::LeftParen,
        identifier(),
        int_constant(),
        real_constant(),
        char_constant(),
    ])
});

/// Followers for the expression entry point. Besides the punctuation that
/// may directly follow an expression, this carries the statement-boundary
/// keys: a leftover token that can continue the *enclosing* statement (a
/// missing `then` before an assignment, say) must not be skipped away by
/// expression recovery; the statement's own `accept` reports it and
/// parsing resumes there.
pub(crate) static EXPRESSION_FOLLOWERS: LazyLock<TokenSet> = LazyLock::new(|| {
    TokenSet::of(&[
        TokenKind::Semicolon,
        TokenKind::End,
        TokenKind::RightParen,
        TokenKind::RightBracket,
        TokenKind::Comma,
        TokenKind::Then,
        TokenKind::Else,
        TokenKind::Do,
        TokenKind::To,
        TokenKind::Downto,
        TokenKind::Until,
        TokenKind::Begin,
        TokenKind::If,
        TokenKind::While,
        TokenKind::Repeat,
        TokenKind::For,
        identifier(),
    ])
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn membership_ignores_payloads() {
        let set = TokenSet::of(&[identifier(), TokenKind::Semicolon]);
        assert!(set.contains(&TokenKind::Identifier("anything".into())));
        assert!(set.contains(&TokenKind::Semicolon));
        assert!(!set.contains(&TokenKind::Begin));
    }

    #[test]
    fn union_and_with_extend_membership() {
        let base = TokenSet::of(&[TokenKind::End]);
        let extended = base
            .union(&TokenSet::of(&[TokenKind::Dot]))
            .with(&TokenKind::Else);
        assert!(extended.contains(&TokenKind::End));
        assert!(extended.contains(&TokenKind::Dot));
        assert!(extended.contains(&TokenKind::Else));
        assert!(!base.contains(&TokenKind::Else));
    }

    #[test]
    fn empty_set_contains_nothing() {
        assert!(!TokenSet::EMPTY.contains(&TokenKind::Begin));
        assert!(!TokenSet::EMPTY.contains(&identifier()));
    }

    #[test]
    fn expression_followers_carry_statement_boundary_keys() {
        assert!(EXPRESSION_FOLLOWERS.contains(&TokenKind::Semicolon));
        assert!(EXPRESSION_FOLLOWERS.contains(&TokenKind::Then));
        assert!(EXPRESSION_FOLLOWERS.contains(&identifier()));
        // Operators are consumed inside the expression, never followers
        assert!(!EXPRESSION_FOLLOWERS.contains(&TokenKind::Plus));
        assert!(!EXPRESSION_FOLLOWERS.contains(&TokenKind::Less));
    }
}
