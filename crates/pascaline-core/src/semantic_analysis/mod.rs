// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Semantic analysis for Pascaline.
//!
//! This module holds the machinery the recognizer consults while parsing:
//!
//! - a stack of nested scopes with chained identifier lookup (`scope`)
//! - type descriptors compared by identity, allocated in an arena (`types`)
//! - pure type-compatibility rules (`validator`)
//!
//! The recognizer owns the scope stack and arena and mutates them as
//! declarations are parsed; the validator is stateless.

pub mod scope;
pub mod types;
pub mod validator;

pub use scope::{IdentifierClass, IdentifierDescriptor, ScopeStack};
pub use types::{Builtins, ScalarKind, TypeArena, TypeDescriptor, TypeId};
