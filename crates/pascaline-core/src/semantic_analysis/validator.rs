// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Type-compatibility rules.
//!
//! Pure, stateless functions over type identity. An unknown operand type
//! (`None`) is compatible with everything: a declaration or expression
//! whose type could not be determined has already been reported once, and
//! these rules exist to avoid piling unrelated diagnostics on top of it.
//!
//! The result functions ([`addition_result`], [`multiplication_result`])
//! take *known* operand types and return `None` for an invalid combination;
//! the recognizer reports that as an operator type conflict. Callers handle
//! unknown operands before asking for a result type.

use crate::source_analysis::TokenKind;

use super::{Builtins, TypeId};

/// Whether a value of type `right` may be assigned to a target of type
/// `left`: identical types, or an `integer` widening into a `real`.
#[must_use]
pub fn assignment_compatible(
    builtins: &Builtins,
    left: Option<TypeId>,
    right: Option<TypeId>,
) -> bool {
    match (left, right) {
        (None, _) | (_, None) => true,
        (Some(l), Some(r)) => l == r || (l == builtins.real && r == builtins.integer),
    }
}

/// Whether two types may be compared with a relational operator:
/// identical types, or `integer` against `real` in either order.
#[must_use]
pub fn comparison_compatible(
    builtins: &Builtins,
    left: Option<TypeId>,
    right: Option<TypeId>,
) -> bool {
    match (left, right) {
        (None, _) | (_, None) => true,
        (Some(l), Some(r)) => {
            l == r
                || (l == builtins.integer && r == builtins.real)
                || (l == builtins.real && r == builtins.integer)
        }
    }
}

/// Whether a type accepts a unary `+`/`-` sign.
#[must_use]
pub fn supports_sign(builtins: &Builtins, ty: Option<TypeId>) -> bool {
    match ty {
        None => true,
        Some(t) => t == builtins.integer || t == builtins.real,
    }
}

/// Whether a type is usable where a boolean is required
/// (`if`/`while`/`until` conditions, `not` operands).
#[must_use]
pub fn is_logical(builtins: &Builtins, ty: Option<TypeId>) -> bool {
    match ty {
        None => true,
        Some(t) => t == builtins.boolean,
    }
}

/// The result type of an adding operator (`+`, `-`, `or`) applied to two
/// known operand types, or `None` if the combination is invalid.
#[must_use]
pub fn addition_result(
    builtins: &Builtins,
    left: TypeId,
    right: TypeId,
    op: &TokenKind,
) -> Option<TypeId> {
    match op {
        TokenKind::Plus | TokenKind::Minus => arithmetic_result(builtins, left, right),
        TokenKind::Or => {
            (left == builtins.boolean && right == builtins.boolean).then_some(builtins.boolean)
        }
        _ => None,
    }
}

/// The result type of a multiplying operator (`*`, `/`, `div`, `mod`, `and`)
/// applied to two known operand types, or `None` if invalid.
///
/// `/` always yields `real`, even for two integer operands.
#[must_use]
pub fn multiplication_result(
    builtins: &Builtins,
    left: TypeId,
    right: TypeId,
    op: &TokenKind,
) -> Option<TypeId> {
    match op {
        TokenKind::Star => arithmetic_result(builtins, left, right),
        TokenKind::Slash => {
            is_arithmetic(builtins, left) && is_arithmetic(builtins, right)
        }
        .then_some(builtins.real),
        TokenKind::Div | TokenKind::Mod => {
            (left == builtins.integer && right == builtins.integer).then_some(builtins.integer)
        }
        TokenKind::And => {
            (left == builtins.boolean && right == builtins.boolean).then_some(builtins.boolean)
        }
        _ => None,
    }
}

/// Integer/real promotion shared by `+`, `-`, and `*`.
fn arithmetic_result(builtins: &Builtins, left: TypeId, right: TypeId) -> Option<TypeId> {
    if left == builtins.integer && right == builtins.integer {
        Some(builtins.integer)
    } else if is_arithmetic(builtins, left) && is_arithmetic(builtins, right) {
        Some(builtins.real)
    } else {
        None
    }
}

fn is_arithmetic(builtins: &Builtins, ty: TypeId) -> bool {
    ty == builtins.integer || ty == builtins.real
}
