//! Type Information
//!
//! This module defines the representation of types used throughout the type
//! checker and the code generator.
//!
//! Mood supports primitive types (`i32`, `f64`, `bool`), user-declared
//! structs and enums, and function types. `Nil` and `Empty` are internal:
//! `Empty` is the type of the program and of value-less blocks, `Nil` is
//! recorded for declarations that produce no value. Neither is representable
//! at runtime.
//!
//! Struct and enum variants carry their full memory layout (field offsets and
//! total byte size) because the Wasm emitter places aggregates in linear
//! memory.

use core::fmt;
use std::{
    fmt::{Display, Formatter},
    rc::Rc,
};

#[derive(Debug, Eq, PartialEq, Clone)]
pub enum TypeInfo {
    I32,
    F64,
    Bool,
    Nil,
    Empty,
    Function(Rc<FunctionType>),
    Struct(Rc<StructType>),
    Enum(Rc<EnumType>),
}

#[derive(Debug, Eq, PartialEq, Clone)]
pub struct FunctionType {
    pub params: Vec<TypeInfo>,
    pub result: TypeInfo,
}

/// Field order is declaration order; it fixes both structural equality and
/// the physical offsets.
#[derive(Debug, Eq, PartialEq, Clone)]
pub struct StructType {
    pub name: String,
    pub fields: Vec<FieldInfo>,
    pub size: u32,
}

#[derive(Debug, Eq, PartialEq, Clone)]
pub struct FieldInfo {
    pub name: String,
    pub ty: TypeInfo,
    pub offset: u32,
}

#[derive(Debug, Eq, PartialEq, Clone)]
pub struct EnumType {
    pub name: String,
    pub variants: Vec<VariantInfo>,
    pub size: u32,
}

#[derive(Debug, Eq, PartialEq, Clone)]
pub struct VariantInfo {
    pub name: String,
    pub payload: Option<TypeInfo>,
}

impl Display for TypeInfo {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            TypeInfo::I32 => write!(f, "i32"),
            TypeInfo::F64 => write!(f, "f64"),
            TypeInfo::Bool => write!(f, "bool"),
            TypeInfo::Nil => write!(f, "nil"),
            TypeInfo::Empty => write!(f, "empty"),
            TypeInfo::Function(function) => {
                let params = function
                    .params
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "fn({params}): {}", function.result)
            }
            TypeInfo::Struct(info) => write!(f, "{}", info.name),
            TypeInfo::Enum(info) => write!(f, "{}", info.name),
        }
    }
}

impl TypeInfo {
    #[must_use = "this is a pure check with no side effects"]
    pub fn is_number(&self) -> bool {
        matches!(self, TypeInfo::I32 | TypeInfo::F64)
    }

    /// True for types that `==` accepts.
    #[must_use = "this is a pure check with no side effects"]
    pub fn is_equality_comparable(&self) -> bool {
        matches!(
            self,
            TypeInfo::I32
                | TypeInfo::F64
                | TypeInfo::Bool
                | TypeInfo::Struct(_)
                | TypeInfo::Enum(_)
        )
    }

    /// True for types that live in linear memory rather than a Wasm
    /// value-slot.
    #[must_use = "this is a pure check with no side effects"]
    pub fn is_aggregate(&self) -> bool {
        matches!(self, TypeInfo::Struct(_) | TypeInfo::Enum(_))
    }

    /// True for names that denote a type in annotation position.
    #[must_use = "this is a pure check with no side effects"]
    pub fn is_type_name(&self) -> bool {
        matches!(
            self,
            TypeInfo::I32
                | TypeInfo::F64
                | TypeInfo::Bool
                | TypeInfo::Struct(_)
                | TypeInfo::Enum(_)
        )
    }

    /// Byte size of a value of this type in linear memory.
    ///
    /// # Panics
    ///
    /// Panics for `function`, `nil`, and `empty`, which have no runtime
    /// representation.
    #[must_use = "this is a pure computation with no side effects"]
    pub fn size_of(&self) -> u32 {
        match self {
            TypeInfo::I32 | TypeInfo::Bool => 4,
            TypeInfo::F64 => 8,
            TypeInfo::Struct(info) => info.size,
            TypeInfo::Enum(info) => info.size,
            TypeInfo::Function(_) | TypeInfo::Nil | TypeInfo::Empty => {
                panic!("type `{self}` has no runtime size")
            }
        }
    }
}

impl StructType {
    #[must_use = "this is a pure lookup with no side effects"]
    pub fn field(&self, name: &str) -> Option<&FieldInfo> {
        self.fields.iter().find(|field| field.name == name)
    }
}

impl EnumType {
    #[must_use = "this is a pure lookup with no side effects"]
    pub fn variant(&self, name: &str) -> Option<&VariantInfo> {
        self.variants.iter().find(|variant| variant.name == name)
    }

    /// Declaration-order index of a variant; this is the runtime tag value.
    #[must_use = "this is a pure lookup with no side effects"]
    pub fn variant_index(&self, name: &str) -> Option<u32> {
        self.variants
            .iter()
            .position(|variant| variant.name == name)
            .map(|index| u32::try_from(index).unwrap_or(u32::MAX))
    }
}
