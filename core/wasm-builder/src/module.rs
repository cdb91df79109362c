//! Module assembly and binary emission.
//!
//! A [`ModuleBuilder`] is constructed empty, mutated by declaration calls,
//! and finalised once by [`ModuleBuilder::compile`], which writes the binary
//! in canonical section order: magic, version, types(1), functions(3),
//! memories(5), globals(6), exports(7), code(10). Empty sections are not
//! emitted.

use crate::encode::{SectionId, write_name, write_section, write_u32};
use crate::expression::ExpressionContext;
use crate::types::{ExportKind, FunctionType, Limits, Mutability, ValueType};

const MAGIC: [u8; 4] = [0x00, 0x61, 0x73, 0x6D];
const VERSION: [u8; 4] = [0x01, 0x00, 0x00, 0x00];

struct Global {
    value_type: ValueType,
    mutability: Mutability,
    init: Vec<u8>,
}

struct Export {
    name: String,
    kind: ExportKind,
    index: u32,
}

/// One function under construction: its interned type index, declared
/// locals, and instruction buffer.
pub struct FunctionContext {
    type_index: u32,
    param_count: u32,
    locals: Vec<ValueType>,
    expression: ExpressionContext,
}

impl FunctionContext {
    fn new(type_index: u32, param_count: u32) -> Self {
        Self {
            type_index,
            param_count,
            locals: Vec::new(),
            expression: ExpressionContext::new(),
        }
    }

    /// Declares a new local and returns its absolute index
    /// (`params.len() + locals defined so far`).
    pub fn define_local(&mut self, value_type: ValueType) -> u32 {
        let index = self.param_count + u32::try_from(self.locals.len()).expect("local count fits");
        self.locals.push(value_type);
        index
    }

    /// The function's instruction buffer.
    pub fn expression(&mut self) -> &mut ExpressionContext {
        &mut self.expression
    }

    /// Locals as `(count, type)` runs: identical neighbouring types coalesce
    /// into a single record in the code section.
    fn local_runs(&self) -> Vec<(u32, ValueType)> {
        let mut runs: Vec<(u32, ValueType)> = Vec::new();
        for local in &self.locals {
            match runs.last_mut() {
                Some((count, value_type)) if *value_type == *local => *count += 1,
                _ => runs.push((1, *local)),
            }
        }
        runs
    }

    fn encode_body(self) -> Vec<u8> {
        let mut body = Vec::new();
        let runs = self.local_runs();
        write_u32(&mut body, u32::try_from(runs.len()).expect("local run count fits"));
        for (count, value_type) in runs {
            write_u32(&mut body, count);
            body.push(value_type.byte());
        }
        body.extend_from_slice(self.expression.into_bytes().as_slice());
        body.push(0x0B);
        body
    }
}

/// Builder for one Wasm module.
#[derive(Default)]
pub struct ModuleBuilder {
    types: Vec<FunctionType>,
    functions: Vec<FunctionContext>,
    globals: Vec<Global>,
    memory: Option<Limits>,
    exports: Vec<Export>,
}

impl ModuleBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a function with the given signature and returns its index.
    ///
    /// The function type is interned by structural equality: declaring the
    /// same `(params, results)` shape twice yields the same type index.
    pub fn declare_function(&mut self, params: Vec<ValueType>, results: Vec<ValueType>) -> u32 {
        let param_count = u32::try_from(params.len()).expect("param count fits in u32");
        let function_type = FunctionType { params, results };
        let type_index = self
            .types
            .iter()
            .position(|existing| *existing == function_type)
            .unwrap_or_else(|| {
                self.types.push(function_type);
                self.types.len() - 1
            });
        let type_index = u32::try_from(type_index).expect("type count fits in u32");
        self.functions.push(FunctionContext::new(type_index, param_count));
        u32::try_from(self.functions.len() - 1).expect("function count fits in u32")
    }

    /// The context of a previously declared function.
    ///
    /// # Panics
    ///
    /// Panics if `function_index` was not returned by
    /// [`ModuleBuilder::declare_function`].
    pub fn function_mut(&mut self, function_index: u32) -> &mut FunctionContext {
        &mut self.functions[function_index as usize]
    }

    /// Appends an export record for a declared function.
    pub fn export_function(&mut self, name: &str, function_index: u32) {
        self.exports.push(Export {
            name: name.to_string(),
            kind: ExportKind::Function,
            index: function_index,
        });
    }

    /// Declares a global. `init` must emit a single constant instruction; it
    /// receives a private [`ExpressionContext`] for the init expression.
    pub fn declare_global(
        &mut self,
        value_type: ValueType,
        mutability: Mutability,
        init: impl FnOnce(&mut ExpressionContext),
    ) -> u32 {
        let mut expression = ExpressionContext::new();
        init(&mut expression);
        self.globals.push(Global {
            value_type,
            mutability,
            init: expression.into_bytes(),
        });
        u32::try_from(self.globals.len() - 1).expect("global count fits in u32")
    }

    /// Defines the module's linear memory and returns its index (always 0).
    ///
    /// # Panics
    ///
    /// Panics if a memory was already defined; core Wasm allows one memory.
    pub fn define_memory(&mut self, limits: Limits) -> u32 {
        assert!(
            self.memory.is_none(),
            "a module may define at most one memory"
        );
        self.memory = Some(limits);
        0
    }

    /// Writes the module binary. The builder is consumed; every function's
    /// expression buffer is frozen as written.
    #[must_use = "the compiled bytes are the entire point"]
    pub fn compile(self) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&MAGIC);
        out.extend_from_slice(&VERSION);

        if !self.types.is_empty() {
            let mut body = Vec::new();
            write_u32(&mut body, u32::try_from(self.types.len()).expect("type count fits"));
            for function_type in &self.types {
                body.push(0x60);
                write_u32(
                    &mut body,
                    u32::try_from(function_type.params.len()).expect("param count fits"),
                );
                for param in &function_type.params {
                    body.push(param.byte());
                }
                write_u32(
                    &mut body,
                    u32::try_from(function_type.results.len()).expect("result count fits"),
                );
                for result in &function_type.results {
                    body.push(result.byte());
                }
            }
            write_section(&mut out, SectionId::Type, &body);
        }

        if !self.functions.is_empty() {
            let mut body = Vec::new();
            write_u32(
                &mut body,
                u32::try_from(self.functions.len()).expect("function count fits"),
            );
            for function in &self.functions {
                write_u32(&mut body, function.type_index);
            }
            write_section(&mut out, SectionId::Function, &body);
        }

        if let Some(limits) = self.memory {
            let mut body = Vec::new();
            write_u32(&mut body, 1);
            match limits.max {
                None => {
                    body.push(0x00);
                    write_u32(&mut body, limits.min);
                }
                Some(max) => {
                    body.push(0x01);
                    write_u32(&mut body, limits.min);
                    write_u32(&mut body, max);
                }
            }
            write_section(&mut out, SectionId::Memory, &body);
        }

        if !self.globals.is_empty() {
            let mut body = Vec::new();
            write_u32(&mut body, u32::try_from(self.globals.len()).expect("global count fits"));
            for global in &self.globals {
                body.push(global.value_type.byte());
                body.push(global.mutability.byte());
                body.extend_from_slice(&global.init);
                body.push(0x0B);
            }
            write_section(&mut out, SectionId::Global, &body);
        }

        if !self.exports.is_empty() {
            let mut body = Vec::new();
            write_u32(&mut body, u32::try_from(self.exports.len()).expect("export count fits"));
            for export in &self.exports {
                write_name(&mut body, &export.name);
                body.push(export.kind.byte());
                write_u32(&mut body, export.index);
            }
            write_section(&mut out, SectionId::Export, &body);
        }

        if !self.functions.is_empty() {
            let mut body = Vec::new();
            write_u32(
                &mut body,
                u32::try_from(self.functions.len()).expect("function count fits"),
            );
            for function in self.functions {
                let function_body = function.encode_body();
                write_u32(
                    &mut body,
                    u32::try_from(function_body.len()).expect("body length fits"),
                );
                body.extend_from_slice(&function_body);
            }
            write_section(&mut out, SectionId::Code, &body);
        }

        out
    }
}
