//! Struct lowering: shadow-stack storage, member loads, and the by-value
//! struct-return calling convention.

#[cfg(test)]
mod struct_codegen_tests {
    use crate::utils::run_test_function;

    #[test]
    fn structs_live_in_linear_memory_and_fields_load_back() {
        let result = run_test_function(
            "struct Box { w:i32, h:i32 } fn area(b:Box):i32 { b.w * b.h } pub fn test():i32 { let a:Box = Box { w:10_i32, h:20_i32 }; area(a) }",
        );
        assert_eq!(result, 200);
    }

    #[test]
    fn struct_returns_use_distinct_slots_per_call_site() {
        let result = run_test_function(
            "struct Foo { x:i32 } fn other(x:i32):Foo { Foo { x: x } } pub fn test():i32 { let foo:Foo = other(10_i32); other(20_i32); foo.x }",
        );
        assert_eq!(result, 10);
    }

    #[test]
    fn field_initialisers_may_be_expressions() {
        let result = run_test_function(
            "struct Pair { a: i32, b: i32 } fn sum(p: Pair): i32 { p.a + p.b } pub fn test(): i32 { sum(Pair { a: 3_i32 * 4_i32, b: 30_i32 }) }",
        );
        assert_eq!(result, 42);
    }

    #[test]
    fn field_initialiser_order_follows_the_declaration() {
        // Fields given out of declaration order still land at their offsets.
        let result = run_test_function(
            "struct Pair { a: i32, b: i32 } fn first(p: Pair): i32 { p.a } pub fn test(): i32 { first(Pair { b: 2_i32, a: 1_i32 }) }",
        );
        assert_eq!(result, 1);
    }

    #[test]
    fn struct_returns_chain_through_calls() {
        let result = run_test_function(
            "struct Foo { x: i32 }\n\
             fn make(x: i32): Foo { Foo { x: x } }\n\
             fn pass(f: Foo): Foo { f }\n\
             pub fn test(): i32 { let a: Foo = pass(make(41_i32)); a.x + 1_i32 }",
        );
        assert_eq!(result, 42);
    }

    #[test]
    fn f64_fields_store_and_load_at_their_offsets() {
        let result = run_test_function(
            "struct Mixed { a: i32, b: f64, c: i32 }\n\
             fn third(m: Mixed): i32 { m.c }\n\
             pub fn test(): i32 { third(Mixed { a: 1_i32, b: 2.5_f64, c: 40_i32 }) }",
        );
        assert_eq!(result, 40);
    }

    #[test]
    fn several_locals_of_the_same_struct_type_stay_distinct() {
        let result = run_test_function(
            "struct Foo { x: i32 }\n\
             pub fn test(): i32 { let a: Foo = Foo { x: 1_i32 }; let b: Foo = Foo { x: 2_i32 }; a.x + b.x }",
        );
        assert_eq!(result, 3);
    }
}
