//! Command line argument parsing for the Mood compiler.
//!
//! This module defines the CLI interface using `clap`. The `Cli` struct
//! captures all command line flags and arguments passed to the `moodc`
//! binary.

use clap::Parser;

/// Command line interface definition for the Mood compiler.
///
/// The `moodc` compiler operates in phases, and users must explicitly request
/// which phases to run via command line flags. Phases execute in canonical
/// order (parse → check → codegen) regardless of flag order; each phase
/// implies the ones before it.
///
/// ## Examples
///
/// Parse only:
/// ```bash
/// moodc example.mood --parse
/// ```
///
/// Full compilation with a WASM artifact:
/// ```bash
/// moodc example.mood --codegen -o
/// ```
#[derive(Parser)]
#[command(
    name = "moodc",
    author,
    version,
    about = "Mood compiler CLI (moodc)",
    long_about = "The 'moodc' command runs one or more compilation phases over a single .mood source file. \
Parse builds the AST; check runs the type checker; codegen emits a WebAssembly binary, written to out/ when -o is supplied."
)]
pub(crate) struct Cli {
    /// Path to the source file to compile.
    ///
    /// Only single-file compilation is supported.
    pub(crate) path: std::path::PathBuf,

    /// Run the parse phase to build the AST.
    ///
    /// Prints "Parsed: <filepath>" on success. Syntax errors are rendered as
    /// code frames on stderr and the process exits with code 1.
    #[clap(long = "parse", action = clap::ArgAction::SetTrue)]
    pub(crate) parse: bool,

    /// Run the type checking phase.
    ///
    /// The parse phase is automatically run first. Type errors are rendered
    /// as code frames on stderr and the process exits with code 1.
    #[clap(long = "check", action = clap::ArgAction::SetTrue)]
    pub(crate) check: bool,

    /// Run the codegen phase to emit a WebAssembly binary.
    ///
    /// Parse and check run first automatically. Use `-o` to write the binary
    /// to `out/<source_name>.wasm`.
    #[clap(long = "codegen", action = clap::ArgAction::SetTrue)]
    pub(crate) codegen: bool,

    /// Write the compiled WASM binary to disk.
    ///
    /// Only takes effect together with `--codegen`; the artifact lands in
    /// `out/<source_name>.wasm` relative to the current working directory.
    #[clap(short = 'o', action = clap::ArgAction::SetTrue)]
    pub(crate) generate_wasm_output: bool,
}
