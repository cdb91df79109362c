//! Base code generation: headers, sections, exports, arithmetic.

#[cfg(test)]
mod base_codegen_tests {
    use crate::utils::{execute_f64_export, run_test_function, wasm_codegen};

    #[test]
    fn modules_start_with_magic_and_version() {
        let wasm_bytes = wasm_codegen("pub fn test(): i32 { 0_i32 }");
        assert_eq!(
            &wasm_bytes[0..8],
            &[0x00, 0x61, 0x73, 0x6D, 0x01, 0x00, 0x00, 0x00]
        );
    }

    #[test]
    fn function_types_are_shared_between_identical_signatures() {
        let wasm_bytes = wasm_codegen(
            "fn first(x: i32): i32 { x }\n\
             fn second(y: i32): i32 { y }\n\
             pub fn test(): i32 { first(second(1_i32)) }",
        );
        // The type section is the first section after the header; its body is
        // a vector whose leading LEB128 count fits one byte here.
        assert_eq!(wasm_bytes[8], 0x01);
        let type_count = wasm_bytes[10];
        assert_eq!(
            type_count, 2,
            "two (i32)->i32 functions and ()->i32 must intern to two types"
        );
    }

    #[test]
    fn public_functions_are_exported_by_name() {
        let wasm_bytes = wasm_codegen(
            "fn helper(x: i32): i32 { x }\n\
             pub fn entry(): i32 { helper(1_i32) }\n\
             pub fn test(): i32 { entry() }",
        );
        let engine = wasmtime::Engine::default();
        let module = wasmtime::Module::new(&engine, &wasm_bytes).expect("module must validate");
        let function_exports: Vec<String> = module
            .exports()
            .filter(|export| export.ty().func().is_some())
            .map(|export| export.name().to_string())
            .collect();
        assert_eq!(function_exports, vec!["entry".to_string(), "test".to_string()]);
    }

    #[test]
    fn addition_through_a_call() {
        let result = run_test_function(
            "pub fn add(a:i32,b:i32):i32 { a + b } pub fn test():i32 { add(1_i32, 2_i32) }",
        );
        assert_eq!(result, 3);
    }

    #[test]
    fn multiplication_binds_tighter_than_addition() {
        let result = run_test_function("pub fn test():i32 { 2_i32 + 3_i32 * 4_i32 }");
        assert_eq!(result, 14);
    }

    #[test]
    fn comparison_results_lower_to_i32() {
        let result = run_test_function("pub fn test():i32 { 1_i32 == 1_i32 }");
        assert_eq!(result, 1);
        let result = run_test_function("pub fn test():i32 { 1_i32 == 2_i32 }");
        assert_eq!(result, 0);
    }

    #[test]
    fn block_values_before_the_last_are_dropped() {
        let result = run_test_function("pub fn test():i32 { 1_i32; 2_i32; 3_i32 }");
        assert_eq!(result, 3);
    }

    #[test]
    fn float_arithmetic_runs_in_f64() {
        let wasm_bytes = wasm_codegen(
            "pub fn scale(): f64 { 2.5_f64 * 4.0_f64 } pub fn test(): i32 { 0_i32 }",
        );
        let result = execute_f64_export(&wasm_bytes, "scale");
        assert!((result - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn float_comparison_returns_i32() {
        let result = run_test_function(
            "fn same(a: f64, b: f64): bool { a == b } pub fn test(): i32 { same(1.5_f64, 1.5_f64) }",
        );
        assert_eq!(result, 1);
    }

    #[test]
    fn locals_chain_through_a_block() {
        let result = run_test_function(
            "pub fn test(): i32 { let a: i32 = 1_i32; let b: i32 = a + 13_i32; b * 3_i32 }",
        );
        assert_eq!(result, 42);
    }

    #[test]
    fn a_local_may_shadow_a_parameter() {
        let result = run_test_function(
            "fn pick(x: i32): i32 { let x: i32 = 2_i32; x } pub fn test(): i32 { pick(7_i32) }",
        );
        assert_eq!(result, 2);
    }
}
