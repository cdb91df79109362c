//! Recursive-descent parser for Mood.
//!
//! Declarations are parsed by dedicated methods; infix expressions use
//! precedence climbing with the binding powers `==` = 2, `*` = 1, `+` = 0
//! (higher binds tighter). Every created node receives the next fresh
//! node-id (dense, starting at 1) and a span built as the union of its first
//! and last consumed tokens.

use std::rc::Rc;

use crate::arena::Arena;
use crate::errors::ParseError;
use crate::lexer::Lexer;
use crate::nodes::{
    Ast, AstNode, BinaryExpression, BlockExpression, CallExpression, Definition, EnumDeclaration,
    Expression, ExpressionPath, FieldDeclaration, FunctionDeclaration, Identifier, Literal,
    LiteralKind, Location, MemberExpression, Misc, OperatorKind, Parameter, Program,
    StructConstruction, StructDeclaration, VariableDeclaration, VariantDeclaration, Visibility,
};
use crate::token::{Token, TokenKind};

/// Parses a whole compilation unit into an [`Arena`].
///
/// # Errors
///
/// Returns the first [`ParseError`] encountered; nothing is recovered.
pub fn parse(source: &str) -> Result<Arena, ParseError> {
    let tokens = Lexer::new(source).tokenize()?;
    let mut parser = Parser::new(tokens);
    let program = parser.parse_program()?;
    let mut arena = Arena::default();
    register_program(&mut arena, &program);
    Ok(arena)
}

pub struct Parser {
    tokens: Vec<Token>,
    position: usize,
    next_id: u32,
}

impl Parser {
    #[must_use]
    pub fn new(tokens: Vec<Token>) -> Self {
        assert!(
            matches!(tokens.last(), Some(token) if token.kind == TokenKind::Eof),
            "token stream must end with Eof"
        );
        Self {
            tokens,
            position: 0,
            next_id: 0,
        }
    }

    /// `Program ::= Definition* EOF`
    ///
    /// # Errors
    ///
    /// Returns the first [`ParseError`] encountered.
    pub fn parse_program(&mut self) -> Result<Rc<Program>, ParseError> {
        let start = self.peek().location;
        let mut definitions = Vec::new();
        while self.peek().kind != TokenKind::Eof {
            definitions.push(self.parse_definition()?);
        }
        let location = Location::union(start, self.previous_location());
        Ok(Rc::new(Program {
            id: self.fresh_id(),
            location,
            definitions,
        }))
    }

    fn parse_definition(&mut self) -> Result<Definition, ParseError> {
        match self.peek().kind {
            TokenKind::Struct => Ok(Definition::Struct(self.parse_struct_declaration()?)),
            TokenKind::Enum => Ok(Definition::Enum(self.parse_enum_declaration()?)),
            TokenKind::Pub | TokenKind::Fn => {
                Ok(Definition::Function(self.parse_function_declaration()?))
            }
            _ => Err(ParseError::ExpectedDefinition {
                location: self.peek().location,
            }),
        }
    }

    /// `StructDecl ::= "struct" Ident "{" (Field ("," Field)* ","?)? "}"`
    fn parse_struct_declaration(&mut self) -> Result<Rc<StructDeclaration>, ParseError> {
        let start = self.eat(&TokenKind::Struct)?.location;
        let name = self.eat_identifier()?;
        self.eat(&TokenKind::BraceOpen)?;
        let mut fields = Vec::new();
        while self.peek().kind != TokenKind::BraceClose {
            let field_name = self.eat_identifier()?;
            self.eat(&TokenKind::Colon)?;
            let annotation = self.eat_identifier()?;
            fields.push(FieldDeclaration {
                name: field_name,
                annotation,
            });
            if self.peek().kind == TokenKind::Comma {
                self.advance();
            } else {
                break;
            }
        }
        self.eat(&TokenKind::BraceClose)?;
        Ok(Rc::new(StructDeclaration {
            id: self.fresh_id(),
            location: Location::union(start, self.previous_location()),
            name,
            fields,
        }))
    }

    /// `EnumDecl ::= "enum" Ident "{" (Variant ("," Variant)* ","?)? "}"`
    fn parse_enum_declaration(&mut self) -> Result<Rc<EnumDeclaration>, ParseError> {
        let start = self.eat(&TokenKind::Enum)?.location;
        let name = self.eat_identifier()?;
        self.eat(&TokenKind::BraceOpen)?;
        let mut variants = Vec::new();
        while self.peek().kind != TokenKind::BraceClose {
            let variant_name = self.eat_identifier()?;
            let payload = if self.peek().kind == TokenKind::ParenOpen {
                self.advance();
                let inner = self.eat_identifier()?;
                self.eat(&TokenKind::ParenClose)?;
                Some(inner)
            } else {
                None
            };
            variants.push(VariantDeclaration {
                name: variant_name,
                payload,
            });
            if self.peek().kind == TokenKind::Comma {
                self.advance();
            } else {
                break;
            }
        }
        self.eat(&TokenKind::BraceClose)?;
        Ok(Rc::new(EnumDeclaration {
            id: self.fresh_id(),
            location: Location::union(start, self.previous_location()),
            name,
            variants,
        }))
    }

    /// `FunctionDecl ::= "pub"? "fn" Ident "(" ParamList? ")" ":" Ident Block`
    fn parse_function_declaration(&mut self) -> Result<Rc<FunctionDeclaration>, ParseError> {
        let start = self.peek().location;
        let visibility = if self.peek().kind == TokenKind::Pub {
            self.advance();
            Visibility::Public
        } else {
            Visibility::Private
        };
        self.eat(&TokenKind::Fn)?;
        let name = self.eat_identifier()?;
        self.eat(&TokenKind::ParenOpen)?;
        let mut parameters = Vec::new();
        while self.peek().kind != TokenKind::ParenClose {
            let param_start = self.peek().location;
            let param_name = self.eat_identifier()?;
            self.eat(&TokenKind::Colon)?;
            let annotation = self.eat_identifier()?;
            parameters.push(Rc::new(Parameter {
                id: self.fresh_id(),
                location: Location::union(param_start, self.previous_location()),
                name: param_name,
                annotation,
            }));
            if self.peek().kind == TokenKind::Comma {
                self.advance();
            } else {
                break;
            }
        }
        self.eat(&TokenKind::ParenClose)?;
        self.eat(&TokenKind::Colon)?;
        let return_annotation = self.eat_identifier()?;
        let body = self.parse_block()?;
        Ok(Rc::new(FunctionDeclaration {
            id: self.fresh_id(),
            location: Location::union(start, self.previous_location()),
            visibility,
            name,
            parameters,
            return_annotation,
            body,
        }))
    }

    /// `Block ::= "{" (Expr (";" Expr)* ";"?)? "}"`
    fn parse_block(&mut self) -> Result<Rc<BlockExpression>, ParseError> {
        let start = self.eat(&TokenKind::BraceOpen)?.location;
        let mut expressions = Vec::new();
        while self.peek().kind != TokenKind::BraceClose {
            expressions.push(self.parse_expression(0)?);
            if self.peek().kind == TokenKind::Semicolon {
                self.advance();
            } else {
                break;
            }
        }
        self.eat(&TokenKind::BraceClose)?;
        Ok(Rc::new(BlockExpression {
            id: self.fresh_id(),
            location: Location::union(start, self.previous_location()),
            expressions,
        }))
    }

    /// Precedence climbing: loops while the upcoming operator's binding power
    /// is at least `min_bp`, recursing with `bp + 1` for left associativity.
    fn parse_expression(&mut self, min_bp: u8) -> Result<Expression, ParseError> {
        let mut lhs = self.parse_primary()?;
        loop {
            let (operator, bp) = match self.peek().kind {
                TokenKind::Plus => (OperatorKind::Add, 0),
                TokenKind::Star => (OperatorKind::Mul, 1),
                TokenKind::EqEq => (OperatorKind::Eq, 2),
                _ => break,
            };
            if bp < min_bp {
                break;
            }
            self.advance();
            let rhs = self.parse_expression(bp + 1)?;
            let location = Location::union(lhs.location(), rhs.location());
            lhs = Expression::Binary(Rc::new(BinaryExpression {
                id: self.fresh_id(),
                location,
                left: lhs,
                operator,
                right: rhs,
            }));
        }
        if min_bp == 0 && self.starts_expression() {
            return Err(ParseError::ExpectedOperator {
                location: self.peek().location,
            });
        }
        Ok(lhs)
    }

    fn parse_primary(&mut self) -> Result<Expression, ParseError> {
        match self.peek().kind.clone() {
            TokenKind::Let => self.parse_variable_declaration(),
            TokenKind::Number(_) => self.parse_number_literal(),
            TokenKind::Identifier(name) => self.parse_identifier_expression(name),
            TokenKind::ParenOpen => {
                self.advance();
                let inner = self.parse_expression(0)?;
                self.eat(&TokenKind::ParenClose)?;
                Ok(inner)
            }
            _ => Err(ParseError::ExpectedExpression {
                location: self.peek().location,
            }),
        }
    }

    /// `VarDecl ::= "let" Ident ":" Ident "=" Expr`
    fn parse_variable_declaration(&mut self) -> Result<Expression, ParseError> {
        let start = self.eat(&TokenKind::Let)?.location;
        let name = self.eat_identifier()?;
        self.eat(&TokenKind::Colon)?;
        let annotation = self.eat_identifier()?;
        self.eat(&TokenKind::Assign)?;
        let value = self.parse_expression(0)?;
        let location = Location::union(start, value.location());
        Ok(Expression::VariableDeclaration(Rc::new(
            VariableDeclaration {
                id: self.fresh_id(),
                location,
                name,
                annotation,
                value,
            },
        )))
    }

    /// `Literal ::= Number ("." Number)? "_" ("i32"|"f64")`
    ///
    /// A fractional part requires the `_f64` suffix.
    fn parse_number_literal(&mut self) -> Result<Expression, ParseError> {
        let start = self.peek().location;
        let digits = self.eat_number()?;
        let fraction = if self.peek().kind == TokenKind::Dot
            && matches!(self.peek_at(1).map(|t| &t.kind), Some(TokenKind::Number(_)))
        {
            self.advance();
            Some(self.eat_number()?)
        } else {
            None
        };
        if self.peek().kind != TokenKind::Underscore {
            return Err(ParseError::ExpectedNumericTypeSuffix {
                location: self.peek().location,
            });
        }
        self.advance();
        let suffix = match self.peek().kind.clone() {
            TokenKind::Identifier(name) if name == "i32" || name == "f64" => {
                let token = self.advance();
                Rc::new(Identifier {
                    id: self.fresh_id(),
                    location: token.location,
                    name,
                })
            }
            _ => {
                return Err(ParseError::ExpectedNumericType {
                    location: self.peek().location,
                });
            }
        };
        if fraction.is_some() && suffix.name == "i32" {
            return Err(ParseError::ExpectedNumericType {
                location: suffix.location,
            });
        }
        let location = Location::union(start, self.previous_location());
        Ok(Expression::Literal(Rc::new(Literal {
            id: self.fresh_id(),
            location,
            kind: LiteralKind::Number { digits, fraction },
            annotation: suffix,
        })))
    }

    /// `Ident ( "{" FieldInit* "}" | "." Ident | "::" Ident ("(" ArgList? ")")?
    ///        | "(" ArgList? ")" | ε )`
    ///
    /// `true` and `false` become boolean literals with a synthesized `bool`
    /// annotation.
    fn parse_identifier_expression(&mut self, name: String) -> Result<Expression, ParseError> {
        let token = self.advance();
        if name == "true" || name == "false" {
            let annotation = Rc::new(Identifier {
                id: self.fresh_id(),
                location: token.location,
                name: "bool".to_string(),
            });
            return Ok(Expression::Literal(Rc::new(Literal {
                id: self.fresh_id(),
                location: token.location,
                kind: LiteralKind::Bool(name == "true"),
                annotation,
            })));
        }
        let identifier = Rc::new(Identifier {
            id: self.fresh_id(),
            location: token.location,
            name,
        });
        match self.peek().kind {
            TokenKind::BraceOpen => self.parse_struct_construction(identifier),
            TokenKind::Dot => {
                self.advance();
                let member = self.eat_identifier()?;
                let location = Location::union(identifier.location, member.location);
                Ok(Expression::Member(Rc::new(MemberExpression {
                    id: self.fresh_id(),
                    location,
                    head: Expression::Identifier(identifier),
                    member,
                })))
            }
            TokenKind::ColonColon => {
                self.advance();
                let variant = self.eat_identifier()?;
                let arguments = if self.peek().kind == TokenKind::ParenOpen {
                    Some(self.parse_argument_list()?)
                } else {
                    None
                };
                let location = Location::union(identifier.location, self.previous_location());
                Ok(Expression::Path(Rc::new(ExpressionPath {
                    id: self.fresh_id(),
                    location,
                    head: identifier,
                    variant,
                    arguments,
                })))
            }
            TokenKind::ParenOpen => {
                let arguments = self.parse_argument_list()?;
                let location = Location::union(identifier.location, self.previous_location());
                Ok(Expression::Call(Rc::new(CallExpression {
                    id: self.fresh_id(),
                    location,
                    callee: identifier,
                    arguments,
                })))
            }
            _ => Ok(Expression::Identifier(identifier)),
        }
    }

    fn parse_struct_construction(
        &mut self,
        name: Rc<Identifier>,
    ) -> Result<Expression, ParseError> {
        self.eat(&TokenKind::BraceOpen)?;
        let mut fields = Vec::new();
        while self.peek().kind != TokenKind::BraceClose {
            let field_name = self.eat_identifier()?;
            self.eat(&TokenKind::Colon)?;
            let value = self.parse_expression(0)?;
            fields.push((field_name, value));
            if self.peek().kind == TokenKind::Comma {
                self.advance();
            } else {
                break;
            }
        }
        self.eat(&TokenKind::BraceClose)?;
        let location = Location::union(name.location, self.previous_location());
        Ok(Expression::StructConstruction(Rc::new(StructConstruction {
            id: self.fresh_id(),
            location,
            name,
            fields,
        })))
    }

    fn parse_argument_list(&mut self) -> Result<Vec<Expression>, ParseError> {
        self.eat(&TokenKind::ParenOpen)?;
        let mut arguments = Vec::new();
        while self.peek().kind != TokenKind::ParenClose {
            arguments.push(self.parse_expression(0)?);
            if self.peek().kind == TokenKind::Comma {
                self.advance();
            } else {
                break;
            }
        }
        self.eat(&TokenKind::ParenClose)?;
        Ok(arguments)
    }

    /// True when the upcoming token could begin a new expression, which after
    /// a complete expression means an operator went missing.
    fn starts_expression(&self) -> bool {
        matches!(
            self.peek().kind,
            TokenKind::Number(_)
                | TokenKind::Identifier(_)
                | TokenKind::Let
                | TokenKind::ParenOpen
        )
    }

    fn eat(&mut self, kind: &TokenKind) -> Result<Token, ParseError> {
        if self.peek().kind == *kind {
            Ok(self.advance())
        } else {
            Err(ParseError::ExpectedToken {
                expected: kind.describe(),
                location: self.peek().location,
            })
        }
    }

    fn eat_identifier(&mut self) -> Result<Rc<Identifier>, ParseError> {
        match self.peek().kind.clone() {
            TokenKind::Identifier(name) => {
                let token = self.advance();
                Ok(Rc::new(Identifier {
                    id: self.fresh_id(),
                    location: token.location,
                    name,
                }))
            }
            _ => Err(ParseError::ExpectedToken {
                expected: "an identifier",
                location: self.peek().location,
            }),
        }
    }

    fn eat_number(&mut self) -> Result<String, ParseError> {
        match self.peek().kind.clone() {
            TokenKind::Number(digits) => {
                self.advance();
                Ok(digits)
            }
            _ => Err(ParseError::ExpectedToken {
                expected: "a number",
                location: self.peek().location,
            }),
        }
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.position.min(self.tokens.len() - 1)]
    }

    fn peek_at(&self, ahead: usize) -> Option<&Token> {
        self.tokens.get(self.position + ahead)
    }

    fn advance(&mut self) -> Token {
        let token = self.tokens[self.position.min(self.tokens.len() - 1)].clone();
        if self.position < self.tokens.len() - 1 {
            self.position += 1;
        }
        token
    }

    fn previous_location(&self) -> Location {
        self.tokens[self.position.saturating_sub(1)].location
    }

    fn fresh_id(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }
}

/// Registers the parsed tree into an [`Arena`], recording parent routes.
fn register_program(arena: &mut Arena, program: &Rc<Program>) {
    arena.add_node(AstNode::Ast(Ast::Program(program.clone())), 0);
    for definition in &program.definitions {
        arena.add_node(AstNode::Definition(definition.clone()), program.id);
        if let Definition::Function(function) = definition {
            for parameter in &function.parameters {
                arena.add_node(AstNode::Misc(Misc::Parameter(parameter.clone())), function.id);
            }
            register_expression(
                arena,
                &Expression::Block(function.body.clone()),
                function.id,
            );
        }
    }
}

fn register_expression(arena: &mut Arena, expression: &Expression, parent_id: u32) {
    arena.add_node(AstNode::Expression(expression.clone()), parent_id);
    let id = expression.id();
    match expression {
        Expression::Identifier(_) | Expression::Literal(_) => {}
        Expression::Binary(binary) => {
            register_expression(arena, &binary.left, id);
            register_expression(arena, &binary.right, id);
        }
        Expression::Call(call) => {
            for argument in &call.arguments {
                register_expression(arena, argument, id);
            }
        }
        Expression::Path(path) => {
            if let Some(arguments) = &path.arguments {
                for argument in arguments {
                    register_expression(arena, argument, id);
                }
            }
        }
        Expression::Block(block) => {
            for child in &block.expressions {
                register_expression(arena, child, id);
            }
        }
        Expression::VariableDeclaration(declaration) => {
            register_expression(arena, &declaration.value, id);
        }
        Expression::StructConstruction(construction) => {
            for (_, value) in &construction.fields {
                register_expression(arena, value, id);
            }
        }
        Expression::Member(member) => {
            register_expression(arena, &member.head, id);
        }
    }
}
