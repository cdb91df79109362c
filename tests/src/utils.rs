use mood_ast::arena::Arena;
use mood_ast::token::Token;
use mood_type_checker::typed_context::TypedContext;
use wasmtime::{Engine, Instance, Module, Store, TypedFunc};

pub(crate) fn tokenize(source_code: &str) -> Vec<Token> {
    mood_ast::lexer::Lexer::new(source_code)
        .tokenize()
        .unwrap_or_else(|e| panic!("Failed to tokenize: {e}"))
}

pub(crate) fn build_ast(source_code: &str) -> Arena {
    mood_ast::parser::parse(source_code).unwrap_or_else(|e| panic!("Failed to parse: {e}"))
}

pub(crate) fn type_check(source_code: &str) -> TypedContext {
    mood::type_check(build_ast(source_code)).unwrap_or_else(|e| panic!("Failed to type-check: {e}"))
}

pub(crate) fn wasm_codegen(source_code: &str) -> Vec<u8> {
    mood::compile(source_code)
        .unwrap_or_else(|diagnostic| panic!("Failed to compile: {}", diagnostic.message))
}

/// Compiles `source_code` and returns the value of its exported `test`
/// function.
pub(crate) fn run_test_function(source_code: &str) -> i32 {
    let wasm_bytes = wasm_codegen(source_code);
    execute_test_export(&wasm_bytes)
}

/// Instantiates `wasm_bytes` and calls the exported `test(): i32`.
pub(crate) fn execute_test_export(wasm_bytes: &[u8]) -> i32 {
    let engine = Engine::default();
    let module = Module::new(&engine, wasm_bytes)
        .unwrap_or_else(|e| panic!("Failed to create Wasm module: {e}"));
    let mut store = Store::new(&engine, ());
    let instance = Instance::new(&mut store, &module, &[])
        .unwrap_or_else(|e| panic!("Failed to instantiate Wasm module: {e}"));
    let test_func: TypedFunc<(), i32> = instance
        .get_typed_func(&mut store, "test")
        .unwrap_or_else(|e| panic!("Failed to get 'test' function: {e}"));
    test_func
        .call(&mut store, ())
        .unwrap_or_else(|e| panic!("Failed to execute 'test' function: {e}"))
}

/// Instantiates `wasm_bytes` and calls an exported `name(): f64`.
pub(crate) fn execute_f64_export(wasm_bytes: &[u8], name: &str) -> f64 {
    let engine = Engine::default();
    let module = Module::new(&engine, wasm_bytes)
        .unwrap_or_else(|e| panic!("Failed to create Wasm module: {e}"));
    let mut store = Store::new(&engine, ());
    let instance = Instance::new(&mut store, &module, &[])
        .unwrap_or_else(|e| panic!("Failed to instantiate Wasm module: {e}"));
    let func: TypedFunc<(), f64> = instance
        .get_typed_func(&mut store, name)
        .unwrap_or_else(|e| panic!("Failed to get '{name}' function: {e}"));
    func.call(&mut store, ())
        .unwrap_or_else(|e| panic!("Failed to execute '{name}' function: {e}"))
}

pub(crate) fn get_test_data_path() -> std::path::PathBuf {
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR")
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|_| std::env::current_dir().unwrap());
    manifest_dir.join("test_data")
}
