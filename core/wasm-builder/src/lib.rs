#![warn(clippy::pedantic)]
//! General-purpose WebAssembly binary module builder.
//!
//! Accepts structured declarations of functions, globals, memories, and
//! instruction streams, and emits a spec-conformant Wasm binary:
//!
//! ```
//! use mood_wasm_builder::{ModuleBuilder, ValueType};
//!
//! let mut builder = ModuleBuilder::new();
//! let answer = builder.declare_function(vec![], vec![ValueType::I32]);
//! builder.function_mut(answer).expression().i32_const(42);
//! builder.export_function("answer", answer);
//! let bytes = builder.compile();
//! assert_eq!(&bytes[0..8], b"\0asm\x01\0\0\0");
//! ```
//!
//! Function types are interned by structural equality; sections are emitted
//! in canonical order with LEB128 lengths. Inconsistent instruction streams
//! are not detected here; the builder is a faithful encoder, and misuse
//! (such as a second memory) is a programmer error that panics immediately.

mod encode;
mod expression;
mod module;
mod types;

pub use expression::{BlockType, ExpressionContext};
pub use module::{FunctionContext, ModuleBuilder};
pub use types::{ExportKind, FunctionType, Limits, Mutability, ValueType};
