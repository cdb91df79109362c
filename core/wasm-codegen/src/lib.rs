#![warn(clippy::pedantic)]
//! WebAssembly code generation for Mood.
//!
//! Consumes the [`TypedContext`] produced by the type checker and emits a
//! Wasm binary through `mood-wasm-builder`. Two passes run here:
//!
//! 1. [`layout::compute_stack_sizes`]: exact per-function shadow-stack
//!    frame sizes.
//! 2. The emitter: declares every function signature (with the implicit
//!    destination parameter for by-value struct returns), then lowers each
//!    body.
//!
//! `pub` functions are exported by name; the module carries one page of
//! linear memory and a mutable frame-pointer global.

use mood_type_checker::typed_context::TypedContext;

mod emitter;
pub mod layout;

pub use layout::{StackSizes, compute_stack_sizes};

/// Generates the Wasm binary for a fully type-checked program.
///
/// # Errors
///
/// Currently infallible for inputs the type checker accepted; the `Result`
/// keeps the signature stable while codegen grows real failure paths.
///
/// # Panics
///
/// Panics on inputs the type checker is contractually required to reject
/// (missing type-table entries) and on constructs that are not lowered yet
/// (struct equality, value-carrying enum variant construction).
pub fn codegen(ctx: &TypedContext) -> anyhow::Result<Vec<u8>> {
    let stack_sizes = layout::compute_stack_sizes(ctx);
    let emitter = emitter::WasmEmitter::new(ctx, stack_sizes);
    Ok(emitter.emit())
}
