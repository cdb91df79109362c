//! Error types for lexing and parsing.

use thiserror::Error;

use crate::diagnostics::Diagnostic;
use crate::nodes::Location;

/// Errors produced by the lexer and the recursive-descent parser. The first
/// error aborts the compile; there is no recovery.
#[derive(Debug, Clone, Error)]
#[must_use = "errors must not be silently ignored"]
pub enum ParseError {
    #[error("{location}: unexpected character")]
    UnexpectedCharacter { location: Location },

    #[error("{location}: expected a definition")]
    ExpectedDefinition { location: Location },

    #[error("{location}: expected {expected}")]
    ExpectedToken {
        expected: &'static str,
        location: Location,
    },

    #[error("{location}: expected an expression")]
    ExpectedExpression { location: Location },

    #[error("{location}: expected an operator")]
    ExpectedOperator { location: Location },

    #[error("{location}: numeric literals require a type suffix")]
    ExpectedNumericTypeSuffix { location: Location },

    #[error("{location}: expected a numeric type")]
    ExpectedNumericType { location: Location },
}

impl ParseError {
    #[must_use]
    pub fn location(&self) -> Location {
        match self {
            ParseError::UnexpectedCharacter { location }
            | ParseError::ExpectedDefinition { location }
            | ParseError::ExpectedToken { location, .. }
            | ParseError::ExpectedExpression { location }
            | ParseError::ExpectedOperator { location }
            | ParseError::ExpectedNumericTypeSuffix { location }
            | ParseError::ExpectedNumericType { location } => *location,
        }
    }

    /// Converts this error into a renderable [`Diagnostic`].
    #[must_use]
    pub fn diagnostic(&self) -> Diagnostic {
        let (message, annotation) = match self {
            ParseError::UnexpectedCharacter { .. } => (
                "Unexpected character".to_string(),
                "this character is not valid Mood syntax".to_string(),
            ),
            ParseError::ExpectedDefinition { .. } => (
                "Expected a definition".to_string(),
                "expected `struct`, `enum`, or `fn`".to_string(),
            ),
            ParseError::ExpectedToken { expected, .. } => (
                format!("Expected {expected}"),
                format!("expected {expected} here"),
            ),
            ParseError::ExpectedExpression { .. } => (
                "Expected an expression".to_string(),
                "expected an expression here".to_string(),
            ),
            ParseError::ExpectedOperator { .. } => (
                "Expected an operator".to_string(),
                "expected `+`, `*`, or `==`".to_string(),
            ),
            ParseError::ExpectedNumericTypeSuffix { .. } => (
                "Numeric literals require a type suffix".to_string(),
                "expected `_i32` or `_f64`".to_string(),
            ),
            ParseError::ExpectedNumericType { .. } => (
                "Expected a numeric type".to_string(),
                "expected `i32` or `f64`".to_string(),
            ),
        };
        Diagnostic::new(message, self.location(), annotation)
    }
}
