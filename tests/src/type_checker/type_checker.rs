//! Type checker behaviour: resolution, layout, and every user-visible error
//! kind.

#[cfg(test)]
mod type_checker_tests {
    use crate::utils::{build_ast, type_check};
    use mood_type_checker::errors::TypeCheckError;
    use mood_type_checker::type_info::TypeInfo;

    fn check_error(source: &str) -> TypeCheckError {
        mood::type_check(build_ast(source)).expect_err("program should be rejected")
    }

    #[test]
    fn a_well_typed_program_checks() {
        let ctx = type_check(
            "pub fn add(a: i32, b: i32): i32 { a + b } pub fn test(): i32 { add(1_i32, 2_i32) }",
        );
        assert!(ctx.find_untyped_expressions().is_empty());
    }

    #[test]
    fn struct_field_offsets_are_contiguous() {
        let ctx = type_check(
            "struct Mixed { a: i32, b: f64, c: bool } fn use(m: Mixed): i32 { 0_i32 } pub fn test(): i32 { 0_i32 }",
        );
        let functions = ctx.functions();
        let function = functions
            .iter()
            .find(|f| f.name() == "use")
            .expect("function `use`");
        let parameter_type = ctx
            .get_node_typeinfo(function.parameters[0].id)
            .expect("parameter type");
        let TypeInfo::Struct(mixed) = parameter_type else {
            panic!("expected a struct type");
        };
        assert_eq!(mixed.size, 16);
        let mut expected_offset = 0;
        for field in &mixed.fields {
            assert_eq!(field.offset, expected_offset);
            expected_offset += field.ty.size_of();
        }
        assert_eq!(expected_offset, mixed.size);
    }

    #[test]
    fn enum_size_is_largest_payload_plus_tag() {
        let ctx = type_check(
            "enum Shape { Circle(f64), Square(i32), Empty } fn pick(s: Shape): i32 { 0_i32 } pub fn test(): i32 { 0_i32 }",
        );
        let functions = ctx.functions();
        let function = functions
            .iter()
            .find(|f| f.name() == "pick")
            .expect("function `pick`");
        let TypeInfo::Enum(shape) = ctx
            .get_node_typeinfo(function.parameters[0].id)
            .expect("parameter type")
        else {
            panic!("expected an enum type");
        };
        assert_eq!(shape.size, 12);
        assert_eq!(shape.variants.len(), 3);
    }

    #[test]
    fn forward_declared_and_recursive_calls_resolve() {
        // `first` calls `second` before its declaration; `third` calls itself.
        let ctx = type_check(
            "fn first(x: i32): i32 { second(x) }\n\
             fn second(x: i32): i32 { x }\n\
             fn third(x: i32): i32 { third(x) }\n\
             pub fn test(): i32 { first(1_i32) }",
        );
        assert!(ctx.find_untyped_expressions().is_empty());
    }

    #[test]
    fn function_body_locals_shadow_parameters() {
        let ctx = type_check("fn pick(x: i32): bool { let x: bool = true; x } pub fn test(): i32 { 0_i32 }");
        assert!(ctx.find_untyped_expressions().is_empty());
    }

    #[test]
    fn bool_is_accepted_where_i32_is_expected() {
        let ctx = type_check("pub fn test(): i32 { 1_i32 == 1_i32 }");
        assert!(ctx.find_untyped_expressions().is_empty());
    }

    #[test]
    fn undefined_names_are_reported() {
        let error = check_error("pub fn test(): i32 { missing }");
        assert!(matches!(error, TypeCheckError::UndefinedName { name, .. } if name == "missing"));
    }

    #[test]
    fn unknown_annotations_are_reported() {
        let error = check_error("pub fn test(): i32 { let x: Widget = 1_i32; x }");
        assert!(matches!(error, TypeCheckError::UndefinedType { name, .. } if name == "Widget"));
    }

    #[test]
    fn calling_a_non_function_is_reported() {
        let error = check_error("pub fn test(): i32 { let x: i32 = 1_i32; x(2_i32) }");
        assert!(matches!(error, TypeCheckError::NotCallable { name, .. } if name == "x"));
    }

    #[test]
    fn arity_is_exact() {
        let error =
            check_error("fn id(x: i32): i32 { x } pub fn test(): i32 { id(1_i32, 2_i32) }");
        assert!(matches!(
            error,
            TypeCheckError::ArityMismatch {
                expected: 1,
                got: 2,
                ..
            }
        ));
    }

    #[test]
    fn mismatches_in_blocks_point_at_the_last_expression() {
        let source = "pub fn test(): i32 { 1_i32; 2.5_f64 }";
        let error = check_error(source);
        let TypeCheckError::TypeMismatch { expected, got, location } = error else {
            panic!("expected a type mismatch");
        };
        assert_eq!(expected, TypeInfo::I32);
        assert_eq!(got, TypeInfo::F64);
        let start = source.find("2.5_f64").unwrap() as u32;
        assert_eq!(location.offset_start, start);
    }

    #[test]
    fn empty_bodies_report_on_the_closing_brace() {
        let source = "pub fn test(): i32 { }";
        let error = check_error(source);
        let TypeCheckError::TypeMismatch { got, location, .. } = error else {
            panic!("expected a type mismatch");
        };
        assert_eq!(got, TypeInfo::Empty);
        assert_eq!(location.offset_start, source.len() as u32 - 1);
    }

    #[test]
    fn arithmetic_requires_matching_numeric_operands() {
        let error = check_error("pub fn test(): i32 { 1_i32 + 2.5_f64 }");
        assert!(matches!(error, TypeCheckError::TypeMismatch { .. }));

        let error = check_error("pub fn test(): i32 { true + 1_i32 }");
        assert!(matches!(error, TypeCheckError::NonNumeric { .. }));
    }

    #[test]
    fn functions_are_not_equality_comparable() {
        let error =
            check_error("fn id(x: i32): i32 { x } pub fn test(): i32 { id == id }");
        assert!(matches!(error, TypeCheckError::NotEqualityComparable { .. }));
    }

    #[test]
    fn struct_construction_requires_every_field() {
        let error = check_error(
            "struct Box { w: i32, h: i32 } pub fn test(): i32 { let b: Box = Box { w: 1_i32 }; 0_i32 }",
        );
        let TypeCheckError::MissingFields { names, .. } = error else {
            panic!("expected missing fields");
        };
        assert_eq!(names, vec!["h".to_string()]);
    }

    #[test]
    fn struct_construction_rejects_unknown_fields() {
        let error = check_error(
            "struct Box { w: i32 } pub fn test(): i32 { let b: Box = Box { w: 1_i32, q: 2_i32 }; 0_i32 }",
        );
        assert!(matches!(error, TypeCheckError::UnknownField { name, .. } if name == "q"));
    }

    #[test]
    fn constructing_a_non_struct_is_reported() {
        let error = check_error(
            "enum Tag { A } pub fn test(): i32 { let t: Tag = Tag { x: 1_i32 }; 0_i32 }",
        );
        assert!(matches!(error, TypeCheckError::NotAStruct { name, .. } if name == "Tag"));
    }

    #[test]
    fn member_access_requires_a_struct() {
        let error = check_error("pub fn test(): i32 { let x: i32 = 1_i32; x.y }");
        assert!(matches!(error, TypeCheckError::NotAStruct { .. }));
    }

    #[test]
    fn member_access_rejects_unknown_fields() {
        let error = check_error(
            "struct Box { w: i32 } fn f(b: Box): i32 { b.q } pub fn test(): i32 { 0_i32 }",
        );
        assert!(matches!(error, TypeCheckError::UnknownField { name, .. } if name == "q"));
    }

    #[test]
    fn path_heads_must_be_enums() {
        let error = check_error(
            "struct Box { w: i32 } pub fn test(): i32 { let x: Box = Box::New; 0_i32 }",
        );
        assert!(matches!(error, TypeCheckError::ExpectedEnum { name, .. } if name == "Box"));
    }

    #[test]
    fn value_variants_require_their_argument() {
        let error = check_error(
            "enum Maybe { Some(i32), None } pub fn test(): i32 { let m: Maybe = Maybe::Some; 0_i32 }",
        );
        assert!(
            matches!(error, TypeCheckError::VariantRequiresValue { variant, .. } if variant == "Some")
        );
    }

    #[test]
    fn unit_variants_take_no_arguments() {
        let error = check_error(
            "enum Maybe { Some(i32), None } pub fn test(): i32 { let m: Maybe = Maybe::None(1_i32); 0_i32 }",
        );
        assert!(
            matches!(error, TypeCheckError::UnitVariantReceivedArg { variant, .. } if variant == "None")
        );
    }

    #[test]
    fn unit_variants_reject_empty_call_parentheses() {
        let error = check_error(
            "enum Maybe { Some(i32), None } pub fn test(): i32 { let m: Maybe = Maybe::None(); 0_i32 }",
        );
        assert!(matches!(error, TypeCheckError::VariantIsUnit { .. }));
    }

    #[test]
    fn value_variants_reject_extra_arguments() {
        let error = check_error(
            "enum Maybe { Some(i32), None } pub fn test(): i32 { let m: Maybe = Maybe::Some(1_i32, 2_i32); 0_i32 }",
        );
        assert!(matches!(
            error,
            TypeCheckError::EnumVariantExcessArgs { count: 2, .. }
        ));
    }

    #[test]
    fn variant_payloads_are_type_checked() {
        let error = check_error(
            "enum Maybe { Some(i32), None } pub fn test(): i32 { let m: Maybe = Maybe::Some(1.5_f64); 0_i32 }",
        );
        assert!(matches!(error, TypeCheckError::TypeMismatch { .. }));
    }
}
