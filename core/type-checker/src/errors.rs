//! Typed errors for the type checker.
//!
//! Every error is tied to an AST node and carries its source span. The first
//! error aborts the compile; [`TypeCheckError::diagnostic`] converts it into
//! the renderable [`Diagnostic`] value the public API returns.

use mood_ast::diagnostics::Diagnostic;
use mood_ast::nodes::{Location, OperatorKind};
use thiserror::Error;

use crate::type_info::TypeInfo;

#[derive(Debug, Clone, Error)]
#[must_use = "errors must not be silently ignored"]
pub enum TypeCheckError {
    #[error("{location}: use of undefined name `{name}`")]
    UndefinedName { name: String, location: Location },

    #[error("{location}: unknown type `{name}`")]
    UndefinedType { name: String, location: Location },

    #[error("{location}: `{name}` is not callable")]
    NotCallable { name: String, location: Location },

    #[error("{location}: function `{name}` expects {expected} arguments, but {got} provided")]
    ArityMismatch {
        name: String,
        expected: usize,
        got: usize,
        location: Location,
    },

    #[error("{location}: type mismatch: expected `{expected}`, found `{got}`")]
    TypeMismatch {
        expected: TypeInfo,
        got: TypeInfo,
        location: Location,
    },

    #[error("{location}: `{name}` is not a struct")]
    NotAStruct { name: String, location: Location },

    #[error("{location}: missing fields in construction of `{struct_name}`: {}", names.join(", "))]
    MissingFields {
        struct_name: String,
        names: Vec<String>,
        location: Location,
    },

    #[error("{location}: unknown field `{name}` on struct `{struct_name}`")]
    UnknownField {
        struct_name: String,
        name: String,
        location: Location,
    },

    #[error("{location}: operator `{operator}` requires numeric operands, found `{found}`")]
    NonNumeric {
        operator: OperatorKind,
        found: TypeInfo,
        location: Location,
    },

    #[error("{location}: values of type `{found}` cannot be compared with `==`")]
    NotEqualityComparable { found: TypeInfo, location: Location },

    #[error("{location}: variant `{variant}` requires a value argument")]
    VariantRequiresValue { variant: String, location: Location },

    #[error("{location}: variant `{variant}` is a unit variant")]
    VariantIsUnit { variant: String, location: Location },

    #[error("{location}: unit variant `{variant}` takes no arguments")]
    UnitVariantReceivedArg { variant: String, location: Location },

    #[error(
        "{location}: variant `{variant}` is not a unit variant; expected a single value argument, but got {count}"
    )]
    EnumVariantExcessArgs {
        variant: String,
        count: usize,
        location: Location,
    },

    #[error("{location}: `{name}` is not an enum")]
    ExpectedEnum { name: String, location: Location },
}

impl TypeCheckError {
    #[must_use]
    pub fn location(&self) -> Location {
        match self {
            TypeCheckError::UndefinedName { location, .. }
            | TypeCheckError::UndefinedType { location, .. }
            | TypeCheckError::NotCallable { location, .. }
            | TypeCheckError::ArityMismatch { location, .. }
            | TypeCheckError::TypeMismatch { location, .. }
            | TypeCheckError::NotAStruct { location, .. }
            | TypeCheckError::MissingFields { location, .. }
            | TypeCheckError::UnknownField { location, .. }
            | TypeCheckError::NonNumeric { location, .. }
            | TypeCheckError::NotEqualityComparable { location, .. }
            | TypeCheckError::VariantRequiresValue { location, .. }
            | TypeCheckError::VariantIsUnit { location, .. }
            | TypeCheckError::UnitVariantReceivedArg { location, .. }
            | TypeCheckError::EnumVariantExcessArgs { location, .. }
            | TypeCheckError::ExpectedEnum { location, .. } => *location,
        }
    }

    /// Converts this error into a renderable [`Diagnostic`].
    #[must_use]
    pub fn diagnostic(&self) -> Diagnostic {
        let (message, annotation) = match self {
            TypeCheckError::UndefinedName { name, .. } => (
                format!("Undefined name \"{name}\""),
                "not found in this scope".to_string(),
            ),
            TypeCheckError::UndefinedType { name, .. } => (
                format!("Unknown type \"{name}\""),
                "not a known type".to_string(),
            ),
            TypeCheckError::NotCallable { name, .. } => (
                format!("\"{name}\" is not callable"),
                "not a function".to_string(),
            ),
            TypeCheckError::ArityMismatch { name, expected, got, .. } => (
                format!("Function \"{name}\" expects {expected} arguments, but got {got}"),
                format!("expected {expected} arguments"),
            ),
            TypeCheckError::TypeMismatch { expected, got, .. } => (
                format!("Expected type \"{expected}\", but got \"{got}\""),
                format!("expected `{expected}`, found `{got}`"),
            ),
            TypeCheckError::NotAStruct { name, .. } => (
                format!("\"{name}\" is not a struct"),
                "not a struct".to_string(),
            ),
            TypeCheckError::MissingFields { struct_name, names, .. } => (
                format!(
                    "Missing fields in construction of \"{struct_name}\": {}",
                    names.join(", ")
                ),
                format!("missing {}", names.join(", ")),
            ),
            TypeCheckError::UnknownField { struct_name, name, .. } => (
                format!("Unknown field \"{name}\" on struct \"{struct_name}\""),
                "no such field".to_string(),
            ),
            TypeCheckError::NonNumeric { operator, found, .. } => (
                format!("Operator `{operator}` requires numeric operands"),
                format!("found `{found}`"),
            ),
            TypeCheckError::NotEqualityComparable { found, .. } => (
                format!("Values of type \"{found}\" cannot be compared with `==`"),
                "not equality-comparable".to_string(),
            ),
            TypeCheckError::VariantRequiresValue { variant, .. } => (
                format!("Variant \"{variant}\" requires a value argument"),
                "expected a single value argument".to_string(),
            ),
            TypeCheckError::VariantIsUnit { variant, .. } => (
                format!("Variant \"{variant}\" is a unit variant"),
                "remove the parentheses".to_string(),
            ),
            TypeCheckError::UnitVariantReceivedArg { variant, .. } => (
                format!("Unit variant \"{variant}\" takes no arguments"),
                "this variant has no payload".to_string(),
            ),
            TypeCheckError::EnumVariantExcessArgs { variant, count, .. } => (
                format!(
                    "Variant \"{variant}\" is not a unit variant. Expected a single value argument, but got {count}."
                ),
                "expected a single value argument".to_string(),
            ),
            TypeCheckError::ExpectedEnum { name, .. } => (
                format!("\"{name}\" is not an enum"),
                "not an enum".to_string(),
            ),
        };
        Diagnostic::new(message, self.location(), annotation)
    }
}
