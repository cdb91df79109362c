//! Parser shape, node-id, and error tests.

#[cfg(test)]
mod parser_tests {
    use std::rc::Rc;

    use crate::utils::build_ast;
    use mood_ast::errors::ParseError;
    use mood_ast::nodes::{
        Definition, Expression, FunctionDeclaration, LiteralKind, OperatorKind, Program,
    };
    use mood_ast::parser::parse;

    fn first_function(program: &Rc<Program>) -> Rc<FunctionDeclaration> {
        program
            .definitions
            .iter()
            .find_map(|definition| {
                if let Definition::Function(function) = definition {
                    Some(function.clone())
                } else {
                    None
                }
            })
            .expect("program should contain a function")
    }

    fn body_of(source: &str) -> Vec<Expression> {
        let arena = build_ast(source);
        let program = arena.program().expect("program root");
        first_function(&program).body.expressions.clone()
    }

    #[test]
    fn multiplication_binds_tighter_than_addition() {
        let body = body_of("pub fn test(): i32 { 2_i32 + 3_i32 * 4_i32 }");
        let Expression::Binary(add) = &body[0] else {
            panic!("expected a binary expression");
        };
        assert_eq!(add.operator, OperatorKind::Add);
        assert!(matches!(&add.left, Expression::Literal(_)));
        let Expression::Binary(mul) = &add.right else {
            panic!("expected `*` to bind tighter than `+`");
        };
        assert_eq!(mul.operator, OperatorKind::Mul);
    }

    #[test]
    fn equality_binds_tighter_than_addition() {
        let body = body_of("pub fn test(): i32 { 1_i32 + 2_i32 == 3_i32 }");
        let Expression::Binary(add) = &body[0] else {
            panic!("expected a binary expression");
        };
        assert_eq!(add.operator, OperatorKind::Add);
        let Expression::Binary(eq) = &add.right else {
            panic!("expected `==` to bind tighter than `+`");
        };
        assert_eq!(eq.operator, OperatorKind::Eq);
    }

    #[test]
    fn parentheses_override_precedence() {
        let body = body_of("pub fn test(): i32 { (2_i32 + 3_i32) * 4_i32 }");
        let Expression::Binary(mul) = &body[0] else {
            panic!("expected a binary expression");
        };
        assert_eq!(mul.operator, OperatorKind::Mul);
        assert!(matches!(&mul.left, Expression::Binary(_)));
    }

    #[test]
    fn boolean_literals_carry_a_synthesized_annotation() {
        let body = body_of("pub fn test(): bool { true }");
        let Expression::Literal(literal) = &body[0] else {
            panic!("expected a literal");
        };
        assert_eq!(literal.kind, LiteralKind::Bool(true));
        assert_eq!(literal.annotation.name, "bool");
    }

    #[test]
    fn float_literals_keep_their_fraction() {
        let body = body_of("pub fn test(): f64 { 2.5_f64 }");
        let Expression::Literal(literal) = &body[0] else {
            panic!("expected a literal");
        };
        assert_eq!(
            literal.kind,
            LiteralKind::Number {
                digits: "2".to_string(),
                fraction: Some("5".to_string()),
            }
        );
        assert_eq!(literal.annotation.name, "f64");
    }

    #[test]
    fn spans_cover_whole_declarations() {
        let source = "pub fn test(): i32 { 1_i32 }";
        let arena = build_ast(source);
        let program = arena.program().expect("program root");
        let function = first_function(&program);
        assert_eq!(function.location.offset_start, 0);
        assert_eq!(function.location.offset_end, source.len() as u32);
    }

    #[test]
    fn node_ids_are_dense_and_unique() {
        let arena = build_ast(
            "struct Box { w: i32, h: i32 }\n\
             enum Maybe { Some(i32), None }\n\
             fn area(b: Box): i32 { b.w * b.h }\n\
             pub fn test(): i32 { let a: Box = Box { w: 10_i32, h: 20_i32 }; area(a) }",
        );
        let program = arena.program().expect("program root");
        let mut ids = Vec::new();
        collect_program_ids(&program, &mut ids);
        ids.sort_unstable();
        let count = ids.len();
        ids.dedup();
        assert_eq!(ids.len(), count, "node ids must be unique");
        assert_eq!(
            ids,
            (1..=count as u32).collect::<Vec<_>>(),
            "node ids must be dense from 1"
        );
    }

    #[test]
    fn missing_numeric_suffix_is_rejected() {
        let error = parse("pub fn test(): i32 { 1 }").unwrap_err();
        assert!(matches!(error, ParseError::ExpectedNumericTypeSuffix { .. }));
    }

    #[test]
    fn unknown_numeric_suffix_is_rejected() {
        let error = parse("pub fn test(): i32 { 1_i64 }").unwrap_err();
        assert!(matches!(error, ParseError::ExpectedNumericType { .. }));
    }

    #[test]
    fn fractional_literals_require_the_f64_suffix() {
        let error = parse("pub fn test(): i32 { 1.5_i32 }").unwrap_err();
        assert!(matches!(error, ParseError::ExpectedNumericType { .. }));
    }

    #[test]
    fn adjacent_expressions_need_an_operator() {
        let error = parse("pub fn test(): i32 { 1_i32 2_i32 }").unwrap_err();
        assert!(matches!(error, ParseError::ExpectedOperator { .. }));
    }

    #[test]
    fn reserved_keywords_have_no_expression_rule() {
        let error = parse("pub fn test(): i32 { if }").unwrap_err();
        assert!(matches!(error, ParseError::ExpectedExpression { .. }));
    }

    #[test]
    fn reserved_keywords_have_no_definition_rule() {
        let error = parse("while").unwrap_err();
        assert!(matches!(error, ParseError::ExpectedDefinition { .. }));
    }

    #[test]
    fn struct_and_enum_declarations_allow_trailing_commas() {
        let arena = build_ast("struct Point { x: i32, y: i32, }\nenum Tag { A, B, }");
        let program = arena.program().expect("program root");
        assert_eq!(program.definitions.len(), 2);
    }

    #[test]
    fn expression_paths_parse_with_and_without_arguments() {
        let body = body_of(
            "enum Maybe { Some(i32), None } pub fn test(): i32 { let m: Maybe = Maybe::None; 0_i32 }",
        );
        let Expression::VariableDeclaration(declaration) = &body[0] else {
            panic!("expected a variable declaration");
        };
        let Expression::Path(path) = &declaration.value else {
            panic!("expected an expression path");
        };
        assert_eq!(path.head.name, "Maybe");
        assert_eq!(path.variant.name, "None");
        assert!(path.arguments.is_none());
    }

    fn collect_program_ids(program: &Rc<Program>, out: &mut Vec<u32>) {
        out.push(program.id);
        for definition in &program.definitions {
            match definition {
                Definition::Function(function) => {
                    out.push(function.id);
                    out.push(function.name.id);
                    for parameter in &function.parameters {
                        out.push(parameter.id);
                        out.push(parameter.name.id);
                        out.push(parameter.annotation.id);
                    }
                    out.push(function.return_annotation.id);
                    collect_expression_ids(&Expression::Block(function.body.clone()), out);
                }
                Definition::Struct(declaration) => {
                    out.push(declaration.id);
                    out.push(declaration.name.id);
                    for field in &declaration.fields {
                        out.push(field.name.id);
                        out.push(field.annotation.id);
                    }
                }
                Definition::Enum(declaration) => {
                    out.push(declaration.id);
                    out.push(declaration.name.id);
                    for variant in &declaration.variants {
                        out.push(variant.name.id);
                        if let Some(payload) = &variant.payload {
                            out.push(payload.id);
                        }
                    }
                }
            }
        }
    }

    fn collect_expression_ids(expression: &Expression, out: &mut Vec<u32>) {
        out.push(expression.id());
        match expression {
            Expression::Identifier(_) => {}
            Expression::Literal(literal) => out.push(literal.annotation.id),
            Expression::Binary(binary) => {
                collect_expression_ids(&binary.left, out);
                collect_expression_ids(&binary.right, out);
            }
            Expression::Call(call) => {
                out.push(call.callee.id);
                for argument in &call.arguments {
                    collect_expression_ids(argument, out);
                }
            }
            Expression::Path(path) => {
                out.push(path.head.id);
                out.push(path.variant.id);
                for argument in path.arguments.iter().flatten() {
                    collect_expression_ids(argument, out);
                }
            }
            Expression::Block(block) => {
                for child in &block.expressions {
                    collect_expression_ids(child, out);
                }
            }
            Expression::VariableDeclaration(declaration) => {
                out.push(declaration.name.id);
                out.push(declaration.annotation.id);
                collect_expression_ids(&declaration.value, out);
            }
            Expression::StructConstruction(construction) => {
                out.push(construction.name.id);
                for (name, value) in &construction.fields {
                    out.push(name.id);
                    collect_expression_ids(value, out);
                }
            }
            Expression::Member(member) => {
                collect_expression_ids(&member.head, out);
                out.push(member.member.id);
            }
        }
    }
}
