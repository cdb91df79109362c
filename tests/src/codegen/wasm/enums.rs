//! Enum lowering: unit variants materialise as their declaration-order tag.

#[cfg(test)]
mod enum_codegen_tests {
    use crate::utils::run_test_function;

    #[test]
    fn unit_variants_compare_equal_to_themselves() {
        let result = run_test_function(
            "enum Color { Red, Green, Blue } pub fn test(): i32 { let c: Color = Color::Green; c == Color::Green }",
        );
        assert_eq!(result, 1);
    }

    #[test]
    fn distinct_unit_variants_compare_unequal() {
        let result = run_test_function(
            "enum Color { Red, Green, Blue } pub fn test(): i32 { Color::Blue == Color::Red }",
        );
        assert_eq!(result, 0);
    }

    #[test]
    fn enums_pass_through_calls_as_values() {
        let result = run_test_function(
            "enum Toggle { Off, On }\n\
             fn is_on(t: Toggle): bool { t == Toggle::On }\n\
             pub fn test(): i32 { is_on(Toggle::On) }",
        );
        assert_eq!(result, 1);
    }
}
