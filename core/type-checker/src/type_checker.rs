//! Type Checker Implementation
//!
//! A syntax-directed pass over the AST that threads a [`SymbolTable`] and
//! populates the node-type table in the [`TypedContext`]. It runs in three
//! phases:
//!
//! 1. **register_types**: struct and enum declarations, in source order.
//!    Field offsets are the running sum of field sizes; an enum's size is its
//!    largest payload plus a 4-byte tag.
//! 2. **register_functions**: every function signature, before any body is
//!    checked. This gives forward-declaration semantics: self- and mutual
//!    recursion both resolve.
//! 3. **check bodies**: each function body in a fresh child scope seeded
//!    with its parameters, against the declared return type.
//!
//! The first error aborts the compile.

use std::rc::Rc;

use mood_ast::nodes::{
    BlockExpression, Definition, Expression, FunctionDeclaration, Identifier, LiteralKind,
    Location, OperatorKind, Program,
};

use crate::{
    errors::TypeCheckError,
    symbol_table::SymbolTable,
    type_info::{EnumType, FieldInfo, FunctionType, StructType, TypeInfo, VariantInfo},
    typed_context::TypedContext,
};

#[derive(Default)]
pub(crate) struct TypeChecker {
    symbol_table: SymbolTable,
}

impl TypeChecker {
    /// Runs all phases over the program in `ctx`.
    pub(crate) fn check(&mut self, ctx: &mut TypedContext) -> Result<SymbolTable, TypeCheckError> {
        let Some(program) = ctx.program() else {
            return Ok(self.symbol_table.clone());
        };
        self.register_types(&program, ctx)?;
        self.register_functions(&program, ctx)?;
        for definition in &program.definitions {
            if let Definition::Function(function) = definition {
                self.check_function(function, ctx)?;
            }
        }
        ctx.set_node_typeinfo(program.id, TypeInfo::Empty);
        Ok(self.symbol_table.clone())
    }

    /// Registers struct and enum declarations in source order, so a type may
    /// only refer to types declared before it.
    fn register_types(
        &mut self,
        program: &Rc<Program>,
        ctx: &mut TypedContext,
    ) -> Result<(), TypeCheckError> {
        for definition in &program.definitions {
            match definition {
                Definition::Struct(declaration) => {
                    let mut fields = Vec::new();
                    let mut offset = 0u32;
                    for field in &declaration.fields {
                        let ty = self.resolve_annotation(&field.annotation)?;
                        let size = ty.size_of();
                        fields.push(FieldInfo {
                            name: field.name.name.clone(),
                            ty,
                            offset,
                        });
                        offset += size;
                    }
                    let struct_type = TypeInfo::Struct(Rc::new(StructType {
                        name: declaration.name(),
                        fields,
                        size: offset,
                    }));
                    self.symbol_table.define(&declaration.name(), struct_type);
                    ctx.set_node_typeinfo(declaration.id, TypeInfo::Nil);
                }
                Definition::Enum(declaration) => {
                    let mut variants = Vec::new();
                    let mut largest_payload = 0u32;
                    for variant in &declaration.variants {
                        let payload = variant
                            .payload
                            .as_ref()
                            .map(|annotation| self.resolve_annotation(annotation))
                            .transpose()?;
                        if let Some(ty) = &payload {
                            largest_payload = largest_payload.max(ty.size_of());
                        }
                        variants.push(VariantInfo {
                            name: variant.name.name.clone(),
                            payload,
                        });
                    }
                    let enum_type = TypeInfo::Enum(Rc::new(EnumType {
                        name: declaration.name(),
                        variants,
                        size: largest_payload + 4,
                    }));
                    self.symbol_table.define(&declaration.name(), enum_type);
                    ctx.set_node_typeinfo(declaration.id, TypeInfo::Nil);
                }
                Definition::Function(_) => {}
            }
        }
        Ok(())
    }

    /// Registers every function signature before any body is checked.
    fn register_functions(
        &mut self,
        program: &Rc<Program>,
        ctx: &mut TypedContext,
    ) -> Result<(), TypeCheckError> {
        for definition in &program.definitions {
            if let Definition::Function(function) = definition {
                let mut params = Vec::new();
                for parameter in &function.parameters {
                    params.push(self.resolve_annotation(&parameter.annotation)?);
                }
                let result = self.resolve_annotation(&function.return_annotation)?;
                let fn_type = TypeInfo::Function(Rc::new(FunctionType { params, result }));
                self.symbol_table.define(&function.name(), fn_type.clone());
                ctx.set_node_typeinfo(function.id, fn_type);
            }
        }
        Ok(())
    }

    fn check_function(
        &mut self,
        function: &Rc<FunctionDeclaration>,
        ctx: &mut TypedContext,
    ) -> Result<(), TypeCheckError> {
        self.symbol_table.enter_scope();
        for parameter in &function.parameters {
            let ty = self.resolve_annotation(&parameter.annotation)?;
            self.symbol_table.define(&parameter.name.name, ty.clone());
            ctx.set_node_typeinfo(parameter.id, ty);
        }
        let expected = self.resolve_annotation(&function.return_annotation)?;
        self.expect_type(&Expression::Block(function.body.clone()), &expected, ctx)?;
        self.symbol_table.exit_scope();
        Ok(())
    }

    fn check_expression(
        &mut self,
        expression: &Expression,
        ctx: &mut TypedContext,
    ) -> Result<TypeInfo, TypeCheckError> {
        let ty = match expression {
            Expression::Identifier(identifier) => self
                .symbol_table
                .lookup(&identifier.name)
                .ok_or_else(|| TypeCheckError::UndefinedName {
                    name: identifier.name.clone(),
                    location: identifier.location,
                })?,
            Expression::Literal(literal) => match &literal.kind {
                LiteralKind::Number { .. } => {
                    if literal.annotation.name == "f64" {
                        TypeInfo::F64
                    } else {
                        TypeInfo::I32
                    }
                }
                LiteralKind::Bool(_) => TypeInfo::Bool,
            },
            Expression::Binary(binary) => {
                let left = self.check_expression(&binary.left, ctx)?;
                let right = self.check_expression(&binary.right, ctx)?;
                match binary.operator {
                    OperatorKind::Add | OperatorKind::Mul => {
                        if !left.is_number() {
                            return Err(TypeCheckError::NonNumeric {
                                operator: binary.operator,
                                found: left,
                                location: binary.left.location(),
                            });
                        }
                        if !right.is_number() {
                            return Err(TypeCheckError::NonNumeric {
                                operator: binary.operator,
                                found: right,
                                location: binary.right.location(),
                            });
                        }
                        if left != right {
                            return Err(TypeCheckError::TypeMismatch {
                                expected: left,
                                got: right,
                                location: binary.right.location(),
                            });
                        }
                        left
                    }
                    OperatorKind::Eq => {
                        if !left.is_equality_comparable() {
                            return Err(TypeCheckError::NotEqualityComparable {
                                found: left,
                                location: binary.left.location(),
                            });
                        }
                        if !right.is_equality_comparable() {
                            return Err(TypeCheckError::NotEqualityComparable {
                                found: right,
                                location: binary.right.location(),
                            });
                        }
                        if !Self::compatible(&left, &right) {
                            return Err(TypeCheckError::TypeMismatch {
                                expected: left,
                                got: right,
                                location: binary.right.location(),
                            });
                        }
                        TypeInfo::Bool
                    }
                }
            }
            Expression::Call(call) => {
                let callee = self.symbol_table.lookup(&call.callee.name).ok_or_else(|| {
                    TypeCheckError::UndefinedName {
                        name: call.callee.name.clone(),
                        location: call.callee.location,
                    }
                })?;
                let TypeInfo::Function(signature) = callee else {
                    return Err(TypeCheckError::NotCallable {
                        name: call.callee.name.clone(),
                        location: call.callee.location,
                    });
                };
                if call.arguments.len() != signature.params.len() {
                    return Err(TypeCheckError::ArityMismatch {
                        name: call.callee.name.clone(),
                        expected: signature.params.len(),
                        got: call.arguments.len(),
                        location: call.location,
                    });
                }
                for (argument, param) in call.arguments.iter().zip(&signature.params) {
                    self.expect_type(argument, param, ctx)?;
                }
                signature.result.clone()
            }
            Expression::Path(path) => self.check_expression_path(path, ctx)?,
            Expression::Block(block) => self.check_block(block, ctx)?,
            Expression::VariableDeclaration(declaration) => {
                let ty = self.resolve_annotation(&declaration.annotation)?;
                self.expect_type(&declaration.value, &ty, ctx)?;
                self.symbol_table.define(&declaration.name.name, ty.clone());
                ty
            }
            Expression::StructConstruction(construction) => {
                let named = self
                    .symbol_table
                    .lookup(&construction.name.name)
                    .ok_or_else(|| TypeCheckError::UndefinedName {
                        name: construction.name.name.clone(),
                        location: construction.name.location,
                    })?;
                let TypeInfo::Struct(struct_type) = &named else {
                    return Err(TypeCheckError::NotAStruct {
                        name: construction.name.name.clone(),
                        location: construction.name.location,
                    });
                };
                for (field_name, value) in &construction.fields {
                    let Some(field) = struct_type.field(&field_name.name) else {
                        return Err(TypeCheckError::UnknownField {
                            struct_name: struct_type.name.clone(),
                            name: field_name.name.clone(),
                            location: field_name.location,
                        });
                    };
                    let field_ty = field.ty.clone();
                    self.expect_type(value, &field_ty, ctx)?;
                }
                let missing: Vec<String> = struct_type
                    .fields
                    .iter()
                    .filter(|field| {
                        !construction
                            .fields
                            .iter()
                            .any(|(name, _)| name.name == field.name)
                    })
                    .map(|field| field.name.clone())
                    .collect();
                if !missing.is_empty() {
                    return Err(TypeCheckError::MissingFields {
                        struct_name: struct_type.name.clone(),
                        names: missing,
                        location: construction.location,
                    });
                }
                named.clone()
            }
            Expression::Member(member) => {
                let head = self.check_expression(&member.head, ctx)?;
                let TypeInfo::Struct(struct_type) = &head else {
                    return Err(TypeCheckError::NotAStruct {
                        name: head.to_string(),
                        location: member.head.location(),
                    });
                };
                let Some(field) = struct_type.field(&member.member.name) else {
                    return Err(TypeCheckError::UnknownField {
                        struct_name: struct_type.name.clone(),
                        name: member.member.name.clone(),
                        location: member.member.location,
                    });
                };
                field.ty.clone()
            }
        };
        ctx.set_node_typeinfo(expression.id(), ty.clone());
        Ok(ty)
    }

    fn check_block(
        &mut self,
        block: &Rc<BlockExpression>,
        ctx: &mut TypedContext,
    ) -> Result<TypeInfo, TypeCheckError> {
        self.symbol_table.enter_scope();
        let mut last = TypeInfo::Empty;
        for child in &block.expressions {
            last = self.check_expression(child, ctx)?;
        }
        self.symbol_table.exit_scope();
        Ok(last)
    }

    fn check_expression_path(
        &mut self,
        path: &Rc<mood_ast::nodes::ExpressionPath>,
        ctx: &mut TypedContext,
    ) -> Result<TypeInfo, TypeCheckError> {
        let named = self
            .symbol_table
            .lookup(&path.head.name)
            .ok_or_else(|| TypeCheckError::UndefinedName {
                name: path.head.name.clone(),
                location: path.head.location,
            })?;
        let TypeInfo::Enum(enum_type) = &named else {
            return Err(TypeCheckError::ExpectedEnum {
                name: path.head.name.clone(),
                location: path.head.location,
            });
        };
        let Some(variant) = enum_type.variant(&path.variant.name) else {
            return Err(TypeCheckError::UndefinedName {
                name: path.variant.name.clone(),
                location: path.variant.location,
            });
        };
        match (&variant.payload, &path.arguments) {
            (Some(payload), Some(arguments)) => match arguments.len() {
                0 => {
                    return Err(TypeCheckError::VariantRequiresValue {
                        variant: path.variant.name.clone(),
                        location: path.location,
                    });
                }
                1 => {
                    let payload = payload.clone();
                    self.expect_type(&arguments[0], &payload, ctx)?;
                }
                count => {
                    let location = arguments[1..]
                        .iter()
                        .map(Expression::location)
                        .reduce(Location::union)
                        .unwrap_or(path.location);
                    return Err(TypeCheckError::EnumVariantExcessArgs {
                        variant: path.variant.name.clone(),
                        count,
                        location,
                    });
                }
            },
            (Some(_), None) => {
                return Err(TypeCheckError::VariantRequiresValue {
                    variant: path.variant.name.clone(),
                    location: path.location,
                });
            }
            (None, Some(arguments)) if arguments.is_empty() => {
                return Err(TypeCheckError::VariantIsUnit {
                    variant: path.variant.name.clone(),
                    location: path.location,
                });
            }
            (None, Some(arguments)) => {
                let location = arguments
                    .iter()
                    .map(Expression::location)
                    .reduce(Location::union)
                    .unwrap_or(path.location);
                return Err(TypeCheckError::UnitVariantReceivedArg {
                    variant: path.variant.name.clone(),
                    location,
                });
            }
            (None, None) => {}
        }
        Ok(named.clone())
    }

    /// Type-checks `expression` and verifies the result against `expected`.
    ///
    /// When the subject is a non-empty block, a mismatch is reported against
    /// the block's last expression for a tighter caret; an empty block is
    /// reported on its closing brace.
    fn expect_type(
        &mut self,
        expression: &Expression,
        expected: &TypeInfo,
        ctx: &mut TypedContext,
    ) -> Result<TypeInfo, TypeCheckError> {
        let found = self.check_expression(expression, ctx)?;
        if !Self::compatible(expected, &found) {
            let location = if let Expression::Block(block) = expression {
                block
                    .expressions
                    .last()
                    .map_or(expression.location().last_char(), Expression::location)
            } else {
                expression.location()
            };
            return Err(TypeCheckError::TypeMismatch {
                expected: expected.clone(),
                got: found,
                location,
            });
        }
        Ok(found)
    }

    /// Structural equality, plus the one coercion the language allows:
    /// `bool` is accepted where `i32` is expected (comparisons lower to
    /// `i32` values).
    fn compatible(expected: &TypeInfo, found: &TypeInfo) -> bool {
        expected == found || (matches!(expected, TypeInfo::I32) && matches!(found, TypeInfo::Bool))
    }

    fn resolve_annotation(&self, annotation: &Rc<Identifier>) -> Result<TypeInfo, TypeCheckError> {
        match self.symbol_table.lookup(&annotation.name) {
            Some(ty) if ty.is_type_name() => Ok(ty),
            _ => Err(TypeCheckError::UndefinedType {
                name: annotation.name.clone(),
                location: annotation.location,
            }),
        }
    }
}
