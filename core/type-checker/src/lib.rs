#![warn(clippy::pedantic)]
//! Type Checker Crate
//!
//! Type checking for the Mood language: a scope-tree symbol table, struct
//! and enum layout computation, and a node-id keyed type table consumed by
//! the layout pass and the Wasm emitter.
//!
//! ## Entry Point
//!
//! Use [`TypeCheckerBuilder`] to type-check an AST arena:
//!
//! ```ignore
//! let arena = mood_ast::parser::parse(source_code)?;
//! let typed_context = TypeCheckerBuilder::build_typed_context(arena)?.typed_context();
//! ```
//!
//! ## Architecture
//!
//! The checker runs in phases: register struct/enum declarations (source
//! order), register all function signatures (forward declaration), then check
//! each body against its declared return type. The first error aborts.
//!
//! ## Modules
//!
//! - [`errors`] - Typed error system, one variant per user-visible error
//! - [`type_info`] - Type representation with memory layout
//! - [`typed_context`] - Node-id keyed type storage

use std::marker::PhantomData;

use mood_ast::arena::Arena;

use crate::errors::TypeCheckError;
use crate::{type_checker::TypeChecker, typed_context::TypedContext};

pub mod errors;
mod symbol_table;
mod type_checker;
pub mod type_info;
pub mod typed_context;

/// State marker: no arena has been handed to the builder yet.
pub struct TypeCheckerInitState;

/// State marker: checking finished and the typed context can be taken.
pub struct TypeCheckerCompleteState;

/// Shorthand for a builder whose checking phase already ran.
pub type CompletedTypeCheckerBuilder = TypeCheckerBuilder<TypeCheckerCompleteState>;

/// Runs the type checker over an arena.
///
/// The state parameter makes the order of operations a compile-time fact:
/// the typed context is only reachable once checking has actually run.
pub struct TypeCheckerBuilder<S> {
    typed_context: TypedContext,
    _state: PhantomData<S>,
}

impl Default for TypeCheckerBuilder<TypeCheckerInitState> {
    fn default() -> Self {
        TypeCheckerBuilder::new()
    }
}

impl TypeCheckerBuilder<TypeCheckerInitState> {
    #[must_use]
    pub fn new() -> Self {
        TypeCheckerBuilder {
            typed_context: TypedContext::default(),
            _state: PhantomData,
        }
    }

    /// Checks every definition in `arena` and moves the builder into its
    /// completed state.
    ///
    /// # Errors
    ///
    /// Returns the first [`TypeCheckError`] encountered.
    #[must_use = "the completed builder carries the typed context"]
    pub fn build_typed_context(
        arena: Arena,
    ) -> Result<TypeCheckerBuilder<TypeCheckerCompleteState>, TypeCheckError> {
        let mut ctx = TypedContext::new(arena);
        let mut type_checker = TypeChecker::default();
        let symbol_table = type_checker.check(&mut ctx)?;
        ctx.symbol_table = symbol_table;

        debug_assert!(
            {
                let untyped = ctx.find_untyped_expressions();
                for missing in &untyped {
                    eprintln!(
                        "untyped {} node {} at {} survived checking",
                        missing.kind, missing.id, missing.location
                    );
                }
                untyped.is_empty()
            },
            "the checker left expression nodes without a type entry"
        );

        Ok(TypeCheckerBuilder {
            typed_context: ctx,
            _state: PhantomData,
        })
    }
}

impl TypeCheckerBuilder<TypeCheckerCompleteState> {
    /// Takes the typed context out of the finished builder.
    #[must_use = "discarding the typed context loses the checking result"]
    pub fn typed_context(self) -> TypedContext {
        self.typed_context
    }
}
