//! Loxi is a tree-walking interpreter for the Lox programming language,
//! written in Rust. Lox is a dynamically typed language with lexical
//! scoping, closures and classes with single inheritance.
//!
//! The pipeline has four stages, run in order for every chunk of source
//! handed to [`Lox::run`]:
//!
//! 1. **Scanning** ([`scanner`]) turns source text into a flat list of
//!    [`Token`](token::Token)s, reporting [`ScanError`](error::ScanError)s
//!    for things like an unterminated string.
//! 2. **Parsing** ([`parser`]) turns tokens into an AST of
//!    [`Expr`](expr::Expr)/[`Stmt`](stmt::Stmt) nodes via recursive descent,
//!    reporting [`ParseError`](error::ParseError)s and recovering via
//!    synchronization so multiple syntax errors can be reported per run.
//! 3. **Resolving** ([`resolver`]) walks the AST once to compute, for every
//!    variable reference, how many scopes out its declaration lives. This
//!    also catches scope-related mistakes the parser can't, reported as
//!    [`ResolveError`](error::ResolveError)s.
//! 4. **Interpreting** ([`interpreter`]) walks the AST again, this time to
//!    evaluate it, reporting [`RuntimeError`](error::RuntimeError)s for
//!    mistakes that are only detectable once the program is running.

use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::process::ExitCode;

pub mod ast;
pub mod class;
pub mod environment;
pub mod error;
pub mod expr;
pub mod function;
pub mod interpreter;
pub mod literal;
pub mod object;
pub mod parser;
pub mod resolver;
pub mod scanner;
pub mod stmt;
pub mod token;

use ast::AstPrinter;
use interpreter::Interpreter;
use parser::Parser;
use resolver::Resolver;
use scanner::Scanner;

/// A script run to completion with no errors at any stage.
pub const EXIT_OK: u8 = 0;
/// A scan, parse or resolve error — the script never ran.
pub const EXIT_DATA_ERROR: u8 = 64;
/// An error raised while the program was executing.
pub const EXIT_RUNTIME_ERROR: u8 = 70;

/// The interpreter's top-level driver. Owns the persistent interpreter state
/// (the global environment and resolver side table survive across REPL
/// prompts) and the writers diagnostics and `print` output go to.
pub struct Lox {
    interpreter: Interpreter,
    err: Box<dyn Write>,
    had_error: bool,
    had_runtime_error: bool,
}

impl Lox {
    pub fn new() -> Self {
        Self::with_writers(Box::new(io::stdout()), Box::new(io::stderr()))
    }

    /// Builds a driver with injectable output/error sinks, for tests that
    /// need to capture what would otherwise go to the terminal.
    pub fn with_writers(out: Box<dyn Write>, err: Box<dyn Write>) -> Self {
        Lox {
            interpreter: Interpreter::new(out),
            err,
            had_error: false,
            had_runtime_error: false,
        }
    }

    /// Runs a script file to completion and returns the process exit code
    /// the CLI should use.
    pub fn run_file(&mut self, path: &Path) -> ExitCode {
        let source = fs::read_to_string(path).unwrap_or_else(|e| {
            eprintln!("Could not read {}: {e}", path.display());
            std::process::exit(74);
        });

        self.run(&source, false);

        if self.had_error {
            ExitCode::from(EXIT_DATA_ERROR)
        } else if self.had_runtime_error {
            ExitCode::from(EXIT_RUNTIME_ERROR)
        } else {
            ExitCode::from(EXIT_OK)
        }
    }

    /// Prints a script's AST instead of interpreting it, honoring `-p`.
    pub fn print_file(&mut self, path: &Path) -> ExitCode {
        let source = fs::read_to_string(path).unwrap_or_else(|e| {
            eprintln!("Could not read {}: {e}", path.display());
            std::process::exit(74);
        });

        self.run(&source, true);

        if self.had_error { ExitCode::from(EXIT_DATA_ERROR) } else { ExitCode::from(EXIT_OK) }
    }

    /// Runs one line of REPL input. Resets the "had error" flags first, per
    /// the interactive prompt's reset-between-lines behavior.
    pub fn run_line(&mut self, source: &str) {
        self.had_error = false;
        self.had_runtime_error = false;
        self.run(source, false);
    }

    /// Runs a complete snippet of source, as if it were a script's full
    /// contents. Used by integration tests to drive the pipeline without a
    /// file on disk.
    pub fn run_source(&mut self, source: &str) {
        self.run_line(source);
    }

    pub fn had_error(&self) -> bool {
        self.had_error
    }

    pub fn had_runtime_error(&self) -> bool {
        self.had_runtime_error
    }

    fn run(&mut self, source: &str, print_ast: bool) {
        let scanner = Scanner::new(source);
        let (tokens, scan_errors) = scanner.scan_tokens();

        if !scan_errors.is_empty() {
            for error in &scan_errors {
                let _ = error.write(&mut self.err);
            }
            self.had_error = true;
            return;
        }

        let parser = Parser::new(tokens);
        let (statements, parse_errors) = parser.parse();

        if !parse_errors.is_empty() {
            for error in &parse_errors {
                let _ = error.write(&mut self.err);
            }
            self.had_error = true;
            return;
        }

        if print_ast {
            let mut printer = AstPrinter;
            for statement in &statements {
                println!("{}", printer.print(statement));
            }
            return;
        }

        let resolve_errors = Resolver::new(&mut self.interpreter).resolve(&statements);
        if !resolve_errors.is_empty() {
            for error in &resolve_errors {
                let _ = error.write(&mut self.err);
            }
            self.had_error = true;
            return;
        }

        if let Err(error) = self.interpreter.interpret(&statements) {
            let _ = error.write(&mut self.err);
            self.had_runtime_error = true;
        }
    }
}

impl Default for Lox {
    fn default() -> Self {
        Self::new()
    }
}
