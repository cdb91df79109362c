//! The Wasm emitter.
//!
//! Walks the typed AST and drives the [`ModuleBuilder`]. Aggregates live on a
//! shadow stack in linear memory, addressed through a mutable frame-pointer
//! global; each function's exact frame size comes from the layout pass.
//!
//! Functions returning a struct by value take an implicit leading `i32`
//! destination parameter: the caller allocates a slot in its own frame and
//! passes the address, the callee copies its result there and returns the
//! address, and the caller copies from the returned address into its slot so
//! that distinct call sites own distinct storage.
//!
//! The type checker is contractually responsible for rejecting anything this
//! emitter cannot lower; a missing type-table entry or an unsupported
//! construct here is a compiler bug and panics with a fixed message.

use std::rc::Rc;

use mood_ast::nodes::{
    BlockExpression, Definition, Expression, FunctionDeclaration, LiteralKind, OperatorKind,
};
use mood_type_checker::{type_info::TypeInfo, typed_context::TypedContext};
use mood_wasm_builder::{FunctionContext, Limits, ModuleBuilder, Mutability, ValueType};
use rustc_hash::FxHashMap;

use crate::layout::StackSizes;

/// Pages of linear memory given to the emitted program.
const SHADOW_STACK_PAGES: u32 = 1;

/// Initial frame-pointer value: the end of the single 64 KiB page, so frames
/// grow downwards from the top of usable memory.
const SHADOW_STACK_BASE: i32 = 65_536;

pub(crate) struct WasmEmitter<'ctx> {
    ctx: &'ctx TypedContext,
    stack_sizes: StackSizes,
    function_indices: FxHashMap<String, u32>,
    frame_pointer: u32,
}

/// Per-function emission state: the local-name map and the bump offset for
/// aggregate allocations within the frame.
struct FunctionState {
    locals: FxHashMap<String, u32>,
    stack_offset: u32,
}

impl<'ctx> WasmEmitter<'ctx> {
    pub(crate) fn new(ctx: &'ctx TypedContext, stack_sizes: StackSizes) -> Self {
        Self {
            ctx,
            stack_sizes,
            function_indices: FxHashMap::default(),
            frame_pointer: 0,
        }
    }

    pub(crate) fn emit(mut self) -> Vec<u8> {
        let mut builder = ModuleBuilder::new();
        builder.define_memory(Limits::at_least(SHADOW_STACK_PAGES));
        self.frame_pointer =
            builder.declare_global(ValueType::I32, Mutability::Mutable, |init| {
                init.i32_const(SHADOW_STACK_BASE);
            });

        let Some(program) = self.ctx.program() else {
            return builder.compile();
        };
        // Declare every signature first so call sites resolve in any order.
        for definition in &program.definitions {
            if let Definition::Function(function) = definition {
                self.declare_function(&mut builder, function);
            }
        }
        for definition in &program.definitions {
            if let Definition::Function(function) = definition {
                self.emit_function(&mut builder, function);
            }
        }
        builder.compile()
    }

    fn declare_function(&mut self, builder: &mut ModuleBuilder, declaration: &Rc<FunctionDeclaration>) {
        let TypeInfo::Function(signature) = self.node_type(declaration.id) else {
            panic!("function declaration without a function type entry");
        };
        let mut params = Vec::new();
        let returns_struct = matches!(signature.result, TypeInfo::Struct(_));
        if returns_struct {
            // Implicit leading destination address for by-value struct returns.
            params.push(ValueType::I32);
        }
        params.extend(signature.params.iter().map(Self::value_type_of));
        let results = vec![if returns_struct {
            ValueType::I32
        } else {
            Self::value_type_of(&signature.result)
        }];
        let index = builder.declare_function(params, results);
        let previous = self.function_indices.insert(declaration.name(), index);
        assert!(
            previous.is_none(),
            "duplicate function name `{}`",
            declaration.name()
        );
        if declaration.is_public() {
            builder.export_function(&declaration.name(), index);
        }
    }

    fn emit_function(&self, builder: &mut ModuleBuilder, declaration: &Rc<FunctionDeclaration>) {
        let index = self.function_indices[&declaration.name()];
        let TypeInfo::Function(signature) = self.node_type(declaration.id) else {
            panic!("function declaration without a function type entry");
        };
        let returns_struct_size = match &signature.result {
            TypeInfo::Struct(struct_type) => Some(struct_type.size),
            _ => None,
        };
        let param_shift = u32::from(returns_struct_size.is_some());

        let mut state = FunctionState {
            locals: FxHashMap::default(),
            stack_offset: 0,
        };
        for (position, parameter) in declaration.parameters.iter().enumerate() {
            let position = u32::try_from(position).expect("parameter count fits in u32");
            state
                .locals
                .insert(parameter.name.name.clone(), param_shift + position);
        }

        let frame_size = self.stack_sizes.get(&declaration.id).copied().unwrap_or(0);
        let function = builder.function_mut(index);

        if frame_size > 0 {
            let expr = function.expression();
            expr.global_get(self.frame_pointer);
            expr.i32_const(to_i32(frame_size));
            expr.i32_sub();
            expr.global_set(self.frame_pointer);
        }

        self.emit_block_children(function, &mut state, &declaration.body);
        assert!(
            state.stack_offset <= frame_size,
            "bump allocations exceeded the computed frame size"
        );

        // Epilogue: spill the return value, restore the frame pointer, reload.
        if let Some(size) = returns_struct_size {
            let source = function.define_local(ValueType::I32);
            {
                let expr = function.expression();
                expr.local_set(source);
                expr.local_get(0);
                expr.local_get(source);
                expr.i32_const(to_i32(size));
                expr.memory_copy();
            }
            if frame_size > 0 {
                let expr = function.expression();
                expr.global_get(self.frame_pointer);
                expr.i32_const(to_i32(frame_size));
                expr.i32_add();
                expr.global_set(self.frame_pointer);
            }
            function.expression().local_get(0);
        } else if frame_size > 0 {
            let spill = function.define_local(Self::value_type_of(&signature.result));
            let expr = function.expression();
            expr.local_set(spill);
            expr.global_get(self.frame_pointer);
            expr.i32_const(to_i32(frame_size));
            expr.i32_add();
            expr.global_set(self.frame_pointer);
            expr.local_get(spill);
        }
    }

    /// Emits a block's children in order, dropping every non-final value.
    fn emit_block_children(
        &self,
        function: &mut FunctionContext,
        state: &mut FunctionState,
        block: &Rc<BlockExpression>,
    ) {
        let saved_locals = state.locals.clone();
        let count = block.expressions.len();
        for (position, child) in block.expressions.iter().enumerate() {
            self.emit_expression(function, state, child);
            if position + 1 < count && self.leaves_value(child) {
                function.expression().drop_();
            }
        }
        state.locals = saved_locals;
    }

    fn emit_expression(
        &self,
        function: &mut FunctionContext,
        state: &mut FunctionState,
        expression: &Expression,
    ) {
        match expression {
            Expression::Literal(literal) => {
                let ty = self.node_type(literal.id);
                let expr = function.expression();
                match &literal.kind {
                    LiteralKind::Bool(value) => expr.i32_const(i32::from(*value)),
                    LiteralKind::Number { digits, fraction } => {
                        if matches!(ty, TypeInfo::F64) {
                            let text = fraction.as_ref().map_or_else(
                                || digits.clone(),
                                |fraction| format!("{digits}.{fraction}"),
                            );
                            expr.f64_const(text.parse::<f64>().expect("float literal must parse"));
                        } else {
                            expr.i32_const(
                                digits.parse::<i32>().expect("i32 literal out of range"),
                            );
                        }
                    }
                }
            }
            Expression::Identifier(identifier) => {
                let local = state
                    .locals
                    .get(&identifier.name)
                    .copied()
                    .expect("identifier must resolve to a parameter or local");
                function.expression().local_get(local);
            }
            Expression::Binary(binary) => {
                self.emit_expression(function, state, &binary.left);
                self.emit_expression(function, state, &binary.right);
                let operand = self.node_type(binary.left.id());
                let expr = function.expression();
                match (binary.operator, &operand) {
                    (OperatorKind::Add, TypeInfo::I32) => expr.i32_add(),
                    (OperatorKind::Add, TypeInfo::F64) => expr.f64_add(),
                    (OperatorKind::Mul, TypeInfo::I32) => expr.i32_mul(),
                    (OperatorKind::Mul, TypeInfo::F64) => expr.f64_mul(),
                    (OperatorKind::Eq, TypeInfo::I32 | TypeInfo::Bool | TypeInfo::Enum(_)) => {
                        expr.i32_eq();
                    }
                    (OperatorKind::Eq, TypeInfo::F64) => expr.f64_eq(),
                    (OperatorKind::Eq, TypeInfo::Struct(_)) => {
                        panic!("struct equality is not implemented in codegen");
                    }
                    (operator, operand) => {
                        panic!("operator `{operator}` cannot be lowered for `{operand}`")
                    }
                }
            }
            Expression::VariableDeclaration(declaration) => {
                let ty = self.node_type(declaration.id);
                let local = function.define_local(Self::value_type_of(&ty));
                self.emit_expression(function, state, &declaration.value);
                function.expression().local_tee(local);
                state.locals.insert(declaration.name.name.clone(), local);
            }
            Expression::Call(call) => self.emit_call(function, state, call),
            Expression::StructConstruction(construction) => {
                self.emit_struct_construction(function, state, construction);
            }
            Expression::Member(member) => {
                let TypeInfo::Struct(struct_type) = self.node_type(member.head.id()) else {
                    panic!("member access on a non-struct value");
                };
                let field = struct_type
                    .field(&member.member.name)
                    .expect("field resolved during type checking")
                    .clone();
                self.emit_expression(function, state, &member.head);
                let expr = function.expression();
                match &field.ty {
                    ty if ty.is_aggregate() => {
                        expr.i32_const(to_i32(field.offset));
                        expr.i32_add();
                    }
                    TypeInfo::F64 => expr.f64_load(3, field.offset),
                    _ => expr.i32_load(2, field.offset),
                }
            }
            Expression::Path(path) => {
                let TypeInfo::Enum(enum_type) = self.node_type(path.id) else {
                    panic!("expression path without an enum type entry");
                };
                let variant = enum_type
                    .variant(&path.variant.name)
                    .expect("variant resolved during type checking");
                assert!(
                    variant.payload.is_none(),
                    "value-carrying enum variant construction is not implemented in codegen"
                );
                let tag = enum_type
                    .variant_index(&path.variant.name)
                    .expect("variant resolved during type checking");
                function.expression().i32_const(to_i32(tag));
            }
            Expression::Block(block) => {
                self.emit_block_children(function, state, block);
            }
        }
    }

    /// Calls follow the by-value struct-return convention when the result is
    /// a struct: allocate a destination slot, pass its address as the hidden
    /// first argument, and copy from the returned address after the call.
    fn emit_call(
        &self,
        function: &mut FunctionContext,
        state: &mut FunctionState,
        call: &Rc<mood_ast::nodes::CallExpression>,
    ) {
        let function_index = self
            .function_indices
            .get(&call.callee.name)
            .copied()
            .expect("call target must be declared before emission");
        let result = self.node_type(call.id);
        if let TypeInfo::Struct(struct_type) = &result {
            let size = struct_type.size;
            let destination = state.stack_offset;
            state.stack_offset += size;
            self.push_frame_address(function, destination);
            for argument in &call.arguments {
                self.emit_expression(function, state, argument);
            }
            let returned = function.define_local(ValueType::I32);
            {
                let expr = function.expression();
                expr.call(function_index);
                expr.local_set(returned);
            }
            self.push_frame_address(function, destination);
            {
                let expr = function.expression();
                expr.local_get(returned);
                expr.i32_const(to_i32(size));
                expr.memory_copy();
            }
            self.push_frame_address(function, destination);
        } else {
            for argument in &call.arguments {
                self.emit_expression(function, state, argument);
            }
            function.expression().call(function_index);
        }
    }

    /// Reserves `struct.size` bytes in the frame, stores every field at its
    /// compile-time offset in declared order, and leaves the base address.
    fn emit_struct_construction(
        &self,
        function: &mut FunctionContext,
        state: &mut FunctionState,
        construction: &Rc<mood_ast::nodes::StructConstruction>,
    ) {
        let TypeInfo::Struct(struct_type) = self.node_type(construction.id) else {
            panic!("struct construction without a struct type entry");
        };
        let base = state.stack_offset;
        state.stack_offset += struct_type.size;
        for field in &struct_type.fields {
            let (_, value) = construction
                .fields
                .iter()
                .find(|(name, _)| name.name == field.name)
                .expect("construction fields are checked for completeness");
            match &field.ty {
                ty if ty.is_aggregate() => {
                    self.push_frame_address(function, base + field.offset);
                    self.emit_expression(function, state, value);
                    let expr = function.expression();
                    expr.i32_const(to_i32(ty.size_of()));
                    expr.memory_copy();
                }
                TypeInfo::F64 => {
                    self.push_frame_address(function, base);
                    self.emit_expression(function, state, value);
                    function.expression().f64_store(3, field.offset);
                }
                _ => {
                    self.push_frame_address(function, base);
                    self.emit_expression(function, state, value);
                    function.expression().i32_store(2, field.offset);
                }
            }
        }
        self.push_frame_address(function, base);
    }

    /// Pushes `FP + offset`, the address of a slot in the current frame.
    fn push_frame_address(&self, function: &mut FunctionContext, offset: u32) {
        let expr = function.expression();
        expr.global_get(self.frame_pointer);
        expr.i32_const(to_i32(offset));
        expr.i32_add();
    }

    fn leaves_value(&self, expression: &Expression) -> bool {
        !matches!(
            self.node_type(expression.id()),
            TypeInfo::Empty | TypeInfo::Nil
        )
    }

    fn node_type(&self, node_id: u32) -> TypeInfo {
        self.ctx
            .get_node_typeinfo(node_id)
            .expect("type table entry missing; the type checker populates every expression node")
    }

    fn value_type_of(ty: &TypeInfo) -> ValueType {
        match ty {
            TypeInfo::I32 | TypeInfo::Bool | TypeInfo::Enum(_) | TypeInfo::Struct(_) => {
                ValueType::I32
            }
            TypeInfo::F64 => ValueType::F64,
            TypeInfo::Function(_) | TypeInfo::Nil | TypeInfo::Empty => {
                panic!("type `{ty}` has no Wasm value type")
            }
        }
    }
}

fn to_i32(value: u32) -> i32 {
    i32::try_from(value).expect("offset fits in i32")
}
