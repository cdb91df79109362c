#![warn(clippy::pedantic)]
//! Core Orchestration Crate for the Mood Compiler
//!
//! This crate provides the main entry points for the Mood compiler pipeline,
//! from source text to a WebAssembly binary:
//!
//! ```text
//! .mood source → Lexer/Parser → Arena → Type Check → Layout → Wasm binary
//! ```
//!
//! Each phase is exposed as a standalone function, and [`compile`] chains
//! them behind the user-facing contract: `Ok(bytes)` or a single
//! [`Diagnostic`] for the first error.
//!
//! ## Quick Start
//!
//! ```
//! let wasm = mood::compile("pub fn test(): i32 { 41_i32 + 1_i32 }")
//!     .expect("program compiles");
//! assert_eq!(&wasm[0..8], b"\0asm\x01\0\0\0");
//! ```
//!
//! ## Compilation Pipeline
//!
//! 1. **Parse**: [`parse`] tokenizes and parses the source into an
//!    arena-based AST with dense node ids and source spans.
//! 2. **Type check**: [`type_check`] resolves every name, computes struct
//!    and enum memory layout, and fills the node-id → type table.
//! 3. **Codegen**: [`codegen`] plans shadow-stack frames and emits the
//!    binary through the module builder.
//!
//! ## Error Handling
//!
//! The parser and the type checker produce typed errors that convert into
//! [`Diagnostic`] values; [`Diagnostic::render`] formats one as a code frame
//! over the offending source. There is no error recovery: the first error
//! aborts the compile. Code generation treats inputs it cannot lower as
//! compiler bugs and panics, because the type checker is contractually
//! responsible for rejecting them.

use mood_ast::arena::Arena;
use mood_ast::errors::ParseError;
use mood_type_checker::TypeCheckerBuilder;
use mood_type_checker::errors::TypeCheckError;
use mood_type_checker::typed_context::TypedContext;

pub use mood_ast::diagnostics::Diagnostic;

/// Parses source code into an arena-based AST.
///
/// # Errors
///
/// Returns the first [`ParseError`] encountered by the lexer or parser.
pub fn parse(source_code: &str) -> Result<Arena, ParseError> {
    mood_ast::parser::parse(source_code)
}

/// Type-checks a parsed arena and returns the typed context consumed by
/// code generation.
///
/// # Errors
///
/// Returns the first [`TypeCheckError`] encountered.
pub fn type_check(arena: Arena) -> Result<TypedContext, TypeCheckError> {
    Ok(TypeCheckerBuilder::build_typed_context(arena)?.typed_context())
}

/// Generates the Wasm binary for a fully type-checked program.
///
/// # Errors
///
/// See [`mood_wasm_codegen::codegen`].
pub fn codegen(ctx: &TypedContext) -> anyhow::Result<Vec<u8>> {
    mood_wasm_codegen::codegen(ctx)
}

/// Compiles Mood source text to a Wasm binary.
///
/// # Errors
///
/// Returns a [`Diagnostic`] describing the first syntax or type error.
pub fn compile(source_code: &str) -> Result<Vec<u8>, Diagnostic> {
    let arena = parse(source_code).map_err(|error| error.diagnostic())?;
    let ctx = type_check(arena).map_err(|error| error.diagnostic())?;
    Ok(codegen(&ctx).expect("codegen is infallible for type-checked programs"))
}
