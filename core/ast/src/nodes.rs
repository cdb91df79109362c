use core::fmt;
use std::{
    fmt::{Display, Formatter},
    rc::Rc,
};

/// A source span. Offsets are 0-based byte positions, lines and columns are
/// 1-based. `offset_end` is exclusive.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct Location {
    pub offset_start: u32,
    pub offset_end: u32,
    pub start_line: u32,
    pub start_column: u32,
    pub end_line: u32,
    pub end_column: u32,
}

impl Location {
    #[must_use]
    pub fn new(
        offset_start: u32,
        offset_end: u32,
        start_line: u32,
        start_column: u32,
        end_line: u32,
        end_column: u32,
    ) -> Self {
        Self {
            offset_start,
            offset_end,
            start_line,
            start_column,
            end_line,
            end_column,
        }
    }

    /// Merges two spans into the smallest span covering both.
    #[must_use]
    pub fn union(a: Location, b: Location) -> Location {
        let (start, end) = if a.offset_start <= b.offset_start {
            (a, b)
        } else {
            (b, a)
        };
        Location {
            offset_start: start.offset_start,
            offset_end: end.offset_end,
            start_line: start.start_line,
            start_column: start.start_column,
            end_line: end.end_line,
            end_column: end.end_column,
        }
    }

    /// A one-character span on the closing character of this span.
    #[must_use]
    pub fn last_char(self) -> Location {
        Location {
            offset_start: self.offset_end.saturating_sub(1),
            offset_end: self.offset_end,
            start_line: self.end_line,
            start_column: self.end_column.saturating_sub(1).max(1),
            end_line: self.end_line,
            end_column: self.end_column,
        }
    }
}

impl Display for Location {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}:{}", self.start_line, self.start_column)
    }
}

#[macro_export]
macro_rules! ast_node {
    (
        $(#[$outer:meta])*
        $struct_vis:vis struct $name:ident {
            $(
                $(#[$field_attr:meta])*
                $field_vis:vis $field_name:ident : $field_ty:ty
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Clone, PartialEq, Eq, Debug)]
        $struct_vis struct $name {
            pub id: u32,
            pub location: $crate::nodes::Location,
            $(
                $(#[$field_attr])*
                $field_vis $field_name : $field_ty,
            )*
        }
    };
}

macro_rules! ast_nodes {
    (
        $(
            $(#[$outer:meta])*
            $struct_vis:vis struct $name:ident { $($fields:tt)* }
        )+
    ) => {
        $(
            ast_node! {
                $(#[$outer])*
                $struct_vis struct $name { $($fields)* }
            }
        )+
    };
}

macro_rules! ast_enum {
    (
        $(#[$outer:meta])*
        $enum_vis:vis enum $name:ident {
            $(
                $(#[$arm_attr:meta])*
                $arm:ident ( $($tuple:tt)* ) ,
            )*
        }
    ) => {
        $(#[$outer])*
        #[derive(Clone, PartialEq, Eq, Debug)]
        $enum_vis enum $name {
            $(
                $(#[$arm_attr])*
                $arm ( $($tuple)* ) ,
            )*
        }

        impl $name {

            #[must_use]
            pub fn id(&self) -> u32 {
                match self {
                    $(
                        $name::$arm(n, ..) => n.id,
                    )*
                }
            }

            #[must_use]
            pub fn location(&self) -> Location {
                match self {
                    $(
                        $name::$arm(n, ..) => n.location,
                    )*
                }
            }
        }
    };
}

macro_rules! ast_enums {
    (
        $(
            $(#[$outer:meta])*
            $enum_vis:vis enum $name:ident { $($arms:tt)* }
        )+
    ) => {
        $(
            ast_enum! {
                $(#[$outer])*
                $enum_vis enum $name { $($arms)* }
            }
        )+

        #[derive(Clone, Debug)]
        pub enum AstNode {
            $(
                $name($name),
            )+
        }

        impl AstNode {
            #[must_use]
            pub fn id(&self) -> u32 {
                match self {
                    $(
                        AstNode::$name(node) => node.id(),
                    )+
                }
            }

            #[must_use]
            pub fn location(&self) -> Location {
                match self {
                    $(
                        AstNode::$name(node) => node.location(),
                    )+
                }
            }
        }
    };
}

ast_enums! {

    pub enum Ast {
        Program(Rc<Program>),
    }

    pub enum Definition {
        Function(Rc<FunctionDeclaration>),
        Struct(Rc<StructDeclaration>),
        Enum(Rc<EnumDeclaration>),
    }

    pub enum Expression {
        Identifier(Rc<Identifier>),
        Literal(Rc<Literal>),
        Binary(Rc<BinaryExpression>),
        Call(Rc<CallExpression>),
        Path(Rc<ExpressionPath>),
        Block(Rc<BlockExpression>),
        VariableDeclaration(Rc<VariableDeclaration>),
        StructConstruction(Rc<StructConstruction>),
        Member(Rc<MemberExpression>),
    }

    pub enum Misc {
        Parameter(Rc<Parameter>),
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Visibility {
    #[default]
    Private,
    Public,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum OperatorKind {
    Add,
    Mul,
    Eq,
}

impl Display for OperatorKind {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            OperatorKind::Add => write!(f, "+"),
            OperatorKind::Mul => write!(f, "*"),
            OperatorKind::Eq => write!(f, "=="),
        }
    }
}

/// The payload of a [`Literal`] node.
///
/// Numeric literals keep their source digits; the value is materialised by
/// the Wasm emitter once the type annotation has been resolved.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum LiteralKind {
    Number {
        digits: String,
        fraction: Option<String>,
    },
    Bool(bool),
}

/// A struct field declaration (`name: Type`). Not itself an arena node; the
/// two identifiers carry the ids and spans.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct FieldDeclaration {
    pub name: Rc<Identifier>,
    pub annotation: Rc<Identifier>,
}

/// An enum variant declaration, optionally carrying a payload type
/// (`Some(i32)` vs `None`).
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct VariantDeclaration {
    pub name: Rc<Identifier>,
    pub payload: Option<Rc<Identifier>>,
}

ast_nodes! {

    pub struct Program {
        pub definitions: Vec<Definition>,
    }

    pub struct FunctionDeclaration {
        pub visibility: Visibility,
        pub name: Rc<Identifier>,
        pub parameters: Vec<Rc<Parameter>>,
        pub return_annotation: Rc<Identifier>,
        pub body: Rc<BlockExpression>,
    }

    pub struct Parameter {
        pub name: Rc<Identifier>,
        pub annotation: Rc<Identifier>,
    }

    pub struct StructDeclaration {
        pub name: Rc<Identifier>,
        pub fields: Vec<FieldDeclaration>,
    }

    pub struct EnumDeclaration {
        pub name: Rc<Identifier>,
        pub variants: Vec<VariantDeclaration>,
    }

    pub struct Identifier {
        pub name: String,
    }

    /// A literal together with its type annotation identifier. Numeric
    /// literals spell the annotation as a suffix (`1_i32`, `2.5_f64`);
    /// boolean literals get a synthesized `bool` annotation.
    pub struct Literal {
        pub kind: LiteralKind,
        pub annotation: Rc<Identifier>,
    }

    pub struct BinaryExpression {
        pub left: Expression,
        pub operator: OperatorKind,
        pub right: Expression,
    }

    pub struct CallExpression {
        pub callee: Rc<Identifier>,
        pub arguments: Vec<Expression>,
    }

    /// `Enum::Variant` or `Enum::Variant(args…)`.
    pub struct ExpressionPath {
        pub head: Rc<Identifier>,
        pub variant: Rc<Identifier>,
        pub arguments: Option<Vec<Expression>>,
    }

    pub struct BlockExpression {
        pub expressions: Vec<Expression>,
    }

    pub struct VariableDeclaration {
        pub name: Rc<Identifier>,
        pub annotation: Rc<Identifier>,
        pub value: Expression,
    }

    pub struct StructConstruction {
        pub name: Rc<Identifier>,
        pub fields: Vec<(Rc<Identifier>, Expression)>,
    }

    pub struct MemberExpression {
        pub head: Expression,
        pub member: Rc<Identifier>,
    }

}

impl Identifier {
    #[must_use]
    pub fn name(&self) -> String {
        self.name.clone()
    }
}

impl FunctionDeclaration {
    #[must_use]
    pub fn name(&self) -> String {
        self.name.name.clone()
    }

    #[must_use]
    pub fn is_public(&self) -> bool {
        matches!(self.visibility, Visibility::Public)
    }
}

impl StructDeclaration {
    #[must_use]
    pub fn name(&self) -> String {
        self.name.name.clone()
    }
}

impl EnumDeclaration {
    #[must_use]
    pub fn name(&self) -> String {
        self.name.name.clone()
    }
}
