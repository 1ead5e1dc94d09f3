// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Scope tracking for semantic analysis.
//!
//! Scopes form a stack owned by the syntactic analyzer: one is opened on
//! entry to a program block and closed (discarding its tables) on exit.
//! Identifier lookup searches the current scope first, then walks outward
//! through the enclosing scopes. The outermost scope is created once per
//! analysis run and seeded with the built-in types and constants.

use ecow::EcoString;
use tracing::trace;

use super::{Builtins, TypeArena, TypeId};

/// What an identifier names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentifierClass {
    /// The program name itself.
    Program,
    /// A type name (`integer`, or a `type` definition).
    Type,
    /// A constant (`true`, `false`).
    Const,
    /// A variable.
    Var,
    /// A procedure name.
    Proc,
    /// A function name.
    Func,
    /// Placeholder for a name that failed to resolve; suppresses repeat
    /// undeclared-identifier diagnostics for the same name in this scope.
    Unknown,
}

/// A declared (or placeholder) identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentifierDescriptor {
    /// The identifier's name.
    pub name: EcoString,
    /// What the identifier names.
    pub class: IdentifierClass,
    /// The identifier's type. `None` means the type could not be
    /// determined; compatibility checks treat it as wildcard-compatible.
    pub ty: Option<TypeId>,
}

impl IdentifierDescriptor {
    /// Creates a descriptor.
    #[must_use]
    pub fn new(name: impl Into<EcoString>, class: IdentifierClass, ty: Option<TypeId>) -> Self {
        Self {
            name: name.into(),
            class,
            ty,
        }
    }
}

/// One lexical scope: its identifier table and the types declared in it.
#[derive(Debug, Clone, Default)]
struct ScopeLevel {
    identifiers: Vec<IdentifierDescriptor>,
    types: Vec<TypeId>,
}

/// The stack of nested scopes.
///
/// # Examples
///
/// ```
/// use pascaline_core::semantic_analysis::{
///     IdentifierClass, IdentifierDescriptor, ScopeStack, TypeArena,
/// };
///
/// let mut arena = TypeArena::new();
/// let (mut scopes, builtins) = ScopeStack::with_builtins(&mut arena);
/// scopes.open();
/// scopes.add(IdentifierDescriptor::new("x", IdentifierClass::Var, Some(builtins.integer)));
/// assert!(scopes.find("x").is_some());
/// assert!(scopes.find("integer").is_some()); // from the outer scope
/// scopes.close();
/// assert!(scopes.find("x").is_none());
/// ```
#[derive(Debug, Clone)]
pub struct ScopeStack {
    levels: Vec<ScopeLevel>,
}

impl ScopeStack {
    /// Creates the outermost scope and seeds it with the built-in types
    /// (`boolean`, `integer`, `real`, `char`) and constants (`true`,
    /// `false`).
    pub fn with_builtins(arena: &mut TypeArena) -> (Self, Builtins) {
        let mut stack = Self {
            levels: vec![ScopeLevel::default()],
        };
        let builtins = Builtins::install(arena);

        for ty in [
            builtins.boolean,
            builtins.integer,
            builtins.real,
            builtins.char,
        ] {
            stack.register_type(ty);
        }

        stack.add(IdentifierDescriptor::new(
            "boolean",
            IdentifierClass::Type,
            Some(builtins.boolean),
        ));
        stack.add(IdentifierDescriptor::new(
            "true",
            IdentifierClass::Const,
            Some(builtins.boolean),
        ));
        stack.add(IdentifierDescriptor::new(
            "false",
            IdentifierClass::Const,
            Some(builtins.boolean),
        ));
        stack.add(IdentifierDescriptor::new(
            "integer",
            IdentifierClass::Type,
            Some(builtins.integer),
        ));
        stack.add(IdentifierDescriptor::new(
            "real",
            IdentifierClass::Type,
            Some(builtins.real),
        ));
        stack.add(IdentifierDescriptor::new(
            "char",
            IdentifierClass::Type,
            Some(builtins.char),
        ));

        (stack, builtins)
    }

    /// Opens a new scope nested in the current one.
    pub fn open(&mut self) {
        self.levels.push(ScopeLevel::default());
        trace!(depth = self.depth(), "opened scope");
    }

    /// Closes the current scope, discarding its tables.
    ///
    /// The outermost scope cannot be closed; attempting to is a no-op that
    /// returns `false`.
    pub fn close(&mut self) -> bool {
        if self.levels.len() > 1 {
            self.levels.pop();
            trace!(depth = self.depth(), "closed scope");
            true
        } else {
            false
        }
    }

    /// The current nesting depth (0 = outermost).
    #[must_use]
    pub fn depth(&self) -> usize {
        self.levels.len() - 1
    }

    /// Adds an identifier to the current scope.
    ///
    /// Duplicate detection is the caller's job (via
    /// [`find_in_current`](Self::find_in_current)): a semantic error is
    /// reported there, and the first binding is kept.
    pub fn add(&mut self, descriptor: IdentifierDescriptor) {
        // INVARIANT: levels always contains at least the outermost scope
        self.levels
            .last_mut()
            .expect("scope stack should never be empty")
            .identifiers
            .push(descriptor);
    }

    /// Records a type as declared in the current scope.
    pub fn register_type(&mut self, ty: TypeId) {
        self.levels
            .last_mut()
            .expect("scope stack should never be empty")
            .types
            .push(ty);
    }

    /// Looks up an identifier, searching the current scope first and then
    /// walking outward.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&IdentifierDescriptor> {
        self.levels
            .iter()
            .rev()
            .find_map(|level| level.identifiers.iter().find(|ident| ident.name == name))
    }

    /// Looks up an identifier in the current scope only.
    #[must_use]
    pub fn find_in_current(&self, name: &str) -> Option<&IdentifierDescriptor> {
        self.levels
            .last()
            .expect("scope stack should never be empty")
            .identifiers
            .iter()
            .find(|ident| ident.name == name)
    }

    /// The types declared in the current scope.
    #[must_use]
    pub fn current_types(&self) -> &[TypeId] {
        &self
            .levels
            .last()
            .expect("scope stack should never be empty")
            .types
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fresh() -> (TypeArena, ScopeStack, Builtins) {
        let mut arena = TypeArena::new();
        let (stack, builtins) = ScopeStack::with_builtins(&mut arena);
        (arena, stack, builtins)
    }

    #[test]
    fn initial_scope_holds_builtins() {
        let (_, scopes, builtins) = fresh();
        assert_eq!(scopes.depth(), 0);
        assert_eq!(scopes.current_types().len(), 4);

        let boolean = scopes.find("boolean").unwrap();
        assert_eq!(boolean.class, IdentifierClass::Type);
        assert_eq!(boolean.ty, Some(builtins.boolean));

        let truth = scopes.find("true").unwrap();
        assert_eq!(truth.class, IdentifierClass::Const);
        assert_eq!(truth.ty, Some(builtins.boolean));

        assert!(scopes.find("integer").is_some());
        assert!(scopes.find("real").is_some());
        assert!(scopes.find("char").is_some());
    }

    #[test]
    fn open_and_close_nest_strictly() {
        let (_, mut scopes, _) = fresh();
        scopes.open();
        assert_eq!(scopes.depth(), 1);
        assert!(scopes.close());
        assert_eq!(scopes.depth(), 0);
        // The outermost scope survives
        assert!(!scopes.close());
        assert!(scopes.find("integer").is_some());
    }

    #[test]
    fn lookup_walks_outward() {
        let (_, mut scopes, builtins) = fresh();
        scopes.open();
        scopes.add(IdentifierDescriptor::new(
            "x",
            IdentifierClass::Var,
            Some(builtins.integer),
        ));

        assert!(scopes.find("x").is_some());
        assert!(scopes.find("boolean").is_some());
        // Current-scope lookup does not walk outward
        assert!(scopes.find_in_current("x").is_some());
        assert!(scopes.find_in_current("boolean").is_none());
    }

    #[test]
    fn closing_discards_the_scope_tables() {
        let (_, mut scopes, builtins) = fresh();
        scopes.open();
        scopes.add(IdentifierDescriptor::new(
            "temp",
            IdentifierClass::Var,
            Some(builtins.real),
        ));
        scopes.close();
        assert!(scopes.find("temp").is_none());
    }

    #[test]
    fn inner_declaration_shadows_outer() {
        let (_, mut scopes, builtins) = fresh();
        scopes.open();
        scopes.add(IdentifierDescriptor::new(
            "x",
            IdentifierClass::Var,
            Some(builtins.integer),
        ));
        scopes.open();
        scopes.add(IdentifierDescriptor::new(
            "x",
            IdentifierClass::Var,
            Some(builtins.real),
        ));

        assert_eq!(scopes.find("x").unwrap().ty, Some(builtins.real));
        scopes.close();
        assert_eq!(scopes.find("x").unwrap().ty, Some(builtins.integer));
    }

    #[test]
    fn first_binding_wins_within_a_scope() {
        // The analyzer reports duplicates but keeps the first binding; if a
        // duplicate does get added, lookup still returns the original.
        let (_, mut scopes, builtins) = fresh();
        scopes.open();
        scopes.add(IdentifierDescriptor::new(
            "x",
            IdentifierClass::Var,
            Some(builtins.integer),
        ));
        scopes.add(IdentifierDescriptor::new(
            "x",
            IdentifierClass::Var,
            Some(builtins.real),
        ));
        assert_eq!(scopes.find("x").unwrap().ty, Some(builtins.integer));
    }
}
