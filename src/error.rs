use std::fmt;
use std::io::{self, Write};

use crate::token::{Token, Type};

/// Writes the standard `[line L] Error ...: MESSAGE` form shared by scan,
/// parse and resolve diagnostics.
fn report(w: &mut dyn Write, line: usize, location: &str, message: &str) -> io::Result<()> {
    writeln!(w, "[line {line}] Error{location}: {message}")
}

/// An error produced while scanning. Scanning never has a token to point
/// at, only the current line.
#[derive(Debug)]
pub struct ScanError {
    pub line: usize,
    pub message: String,
}

impl ScanError {
    pub fn write(&self, w: &mut dyn Write) -> io::Result<()> {
        report(w, self.line, "", &self.message)
    }
}

impl fmt::Display for ScanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[line {}] Error: {}", self.line, self.message)
    }
}

/// An error produced while parsing, anchored to the offending token.
#[derive(Debug)]
pub struct ParseError {
    pub token: Token,
    pub message: String,
}

impl ParseError {
    pub fn write(&self, w: &mut dyn Write) -> io::Result<()> {
        write_at_token(w, &self.token, &self.message)
    }
}

/// An error produced by the resolver, anchored to the offending token.
#[derive(Debug)]
pub struct ResolveError {
    pub token: Token,
    pub message: String,
}

impl ResolveError {
    pub fn write(&self, w: &mut dyn Write) -> io::Result<()> {
        write_at_token(w, &self.token, &self.message)
    }
}

fn write_at_token(w: &mut dyn Write, token: &Token, message: &str) -> io::Result<()> {
    if token.r#type == Type::Eof {
        report(w, token.line, " at end", message)
    } else {
        report(w, token.line, &format!(" at '{}'", token.lexeme), message)
    }
}

/// A runtime error, carrying the token active when it was raised so the
/// diagnostic can report a line number. Rendered message-first, unlike the
/// other three kinds.
#[derive(Debug, Clone)]
pub struct RuntimeError {
    pub token: Token,
    pub message: String,
}

impl RuntimeError {
    pub fn write(&self, w: &mut dyn Write) -> io::Result<()> {
        writeln!(w, "{}", self.message)?;
        writeln!(w, "[line {}]", self.token.line)
    }
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\n[line {}]", self.message, self.token.line)
    }
}
