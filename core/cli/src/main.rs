#![warn(clippy::pedantic)]

//! # Mood Compiler CLI
//!
//! Command line interface for the Mood toolchain.
//!
//! 1. Parse  (`--parse`)   – build the AST.
//! 2. Check  (`--check`)   – run the type checker.
//! 3. Codegen (`--codegen`) – emit WebAssembly, optionally written to disk (`-o`).
//!
//! At least one of the phase flags must be supplied; the phases that are
//! requested will be executed in the canonical order even if specified out of
//! order on the command line, and each phase runs the ones before it.
//!
//! Output artifacts are written to an `out/` directory relative to the
//! current working directory.
//!
//! ## Exit codes
//! * 0 – success.
//! * 1 – usage / IO / compile failure.
//!
//! ## Example
//! ```bash
//! moodc demos/area.mood --codegen -o
//! ```

mod parser;
use clap::Parser;
use parser::Cli;
use std::{fs, path::PathBuf, process};

/// Entry point for the CLI executable.
///
/// Responsibilities:
/// * Parse flags.
/// * Validate that the input path exists and at least one phase is selected.
/// * Run requested phases (parse -> check -> codegen).
/// * Optionally write the emitted WASM when `-o` is set.
///
/// On any failure a diagnostic is printed to stderr and the process exits
/// with code `1`.
fn main() {
    let args = Cli::parse();
    if !args.path.exists() {
        eprintln!("Error: path not found");
        process::exit(1);
    }

    let need_parse = args.parse;
    let need_check = args.check;
    let need_codegen = args.codegen;

    if !(need_parse || need_check || need_codegen) {
        eprintln!("Error: at least one of --parse, --check, or --codegen must be specified");
        process::exit(1);
    }

    let source_code = match fs::read_to_string(&args.path) {
        Ok(source_code) => source_code,
        Err(error) => {
            eprintln!("Error: cannot read {}: {error}", args.path.display());
            process::exit(1);
        }
    };
    let filename = args.path.display().to_string();

    let arena = match mood::parse(&source_code) {
        Ok(arena) => {
            println!("Parsed: {filename}");
            arena
        }
        Err(error) => {
            eprint!("{}", error.diagnostic().render(&source_code, &filename));
            process::exit(1);
        }
    };
    if !(need_check || need_codegen) {
        return;
    }

    let ctx = match mood::type_check(arena) {
        Ok(ctx) => {
            println!("Checked: {filename}");
            ctx
        }
        Err(error) => {
            eprint!("{}", error.diagnostic().render(&source_code, &filename));
            process::exit(1);
        }
    };
    if !need_codegen {
        return;
    }

    let wasm = match mood::codegen(&ctx) {
        Ok(wasm) => {
            println!("Compiled: {filename}");
            wasm
        }
        Err(error) => {
            eprintln!("Error: codegen failed: {error}");
            process::exit(1);
        }
    };

    if args.generate_wasm_output {
        let output_path = PathBuf::from("out");
        if let Err(error) = fs::create_dir_all(&output_path) {
            eprintln!("Error: cannot create {}: {error}", output_path.display());
            process::exit(1);
        }
        let stem = args
            .path
            .file_stem()
            .map_or_else(|| "out".to_string(), |stem| stem.to_string_lossy().into_owned());
        let wasm_file_path = output_path.join(format!("{stem}.wasm"));
        if let Err(error) = fs::write(&wasm_file_path, &wasm) {
            eprintln!("Error: cannot write {}: {error}", wasm_file_path.display());
            process::exit(1);
        }
        println!("WASM generated at: {}", wasm_file_path.display());
    }
}
