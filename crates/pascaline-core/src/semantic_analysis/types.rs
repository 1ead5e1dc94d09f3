// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Type descriptors and the type arena.
//!
//! Pascaline compares types by *identity*: two descriptors denote the same
//! type only if they are the same allocated instance. Descriptors therefore
//! live in a [`TypeArena`] and are referenced everywhere by [`TypeId`]:
//! structurally identical but separately declared types get distinct ids and
//! compare unequal, while a `type` alias shares the aliased id and compares
//! equal.
//!
//! The four built-in types (`boolean`, `integer`, `real`, `char`) are
//! allocated once before analysis begins; [`Builtins`] holds their ids.

use ecow::EcoString;

/// The kind of a scalar type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
    Integer,
    Real,
    Char,
}

/// The semantic representation of a type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeDescriptor {
    /// A built-in scalar type.
    Scalar(ScalarKind),
    /// An enumerated type with its ordered member names.
    Enum(Vec<EcoString>),
}

/// A handle to a [`TypeDescriptor`] in the arena.
///
/// Equality of ids is identity of types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeId(usize);

/// Owns every type descriptor created during an analysis run.
#[derive(Debug, Clone, Default)]
pub struct TypeArena {
    types: Vec<TypeDescriptor>,
}

impl TypeArena {
    /// Creates an empty arena.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates a descriptor, returning its id.
    pub fn alloc(&mut self, descriptor: TypeDescriptor) -> TypeId {
        let id = TypeId(self.types.len());
        self.types.push(descriptor);
        id
    }

    /// Looks up a descriptor by id.
    #[must_use]
    pub fn get(&self, id: TypeId) -> &TypeDescriptor {
        &self.types[id.0]
    }

    /// The number of descriptors allocated so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Returns `true` if nothing has been allocated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

/// Ids of the built-in types, allocated once at analysis start.
#[derive(Debug, Clone, Copy)]
pub struct Builtins {
    /// The `boolean` enumeration `{true, false}`.
    pub boolean: TypeId,
    /// The `integer` scalar.
    pub integer: TypeId,
    /// The `real` scalar.
    pub real: TypeId,
    /// The `char` scalar.
    pub char: TypeId,
}

impl Builtins {
    /// Allocates the built-in descriptors into `arena`.
    pub fn install(arena: &mut TypeArena) -> Self {
        let boolean = arena.alloc(TypeDescriptor::Enum(vec!["true".into(), "false".into()]));
        let integer = arena.alloc(TypeDescriptor::Scalar(ScalarKind::Integer));
        let real = arena.alloc(TypeDescriptor::Scalar(ScalarKind::Real));
        let char = arena.alloc(TypeDescriptor::Scalar(ScalarKind::Char));
        Self {
            boolean,
            integer,
            real,
            char,
        }
    }
}
