use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;

use loxi::Lox;

/// An in-memory `Write` sink that can be read back after the `Lox` that
/// owns a copy of it has been dropped.
#[derive(Clone, Default)]
pub struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

impl SharedBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8(self.0.borrow().clone()).expect("output to be valid UTF-8")
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

pub struct Run {
    pub stdout: String,
    pub stderr: String,
    pub had_error: bool,
    pub had_runtime_error: bool,
}

/// Runs a snippet of Lox source through the full pipeline and captures what
/// would otherwise go to stdout/stderr.
pub fn run(source: &str) -> Run {
    let out = SharedBuffer::default();
    let err = SharedBuffer::default();

    let mut lox = Lox::with_writers(Box::new(out.clone()), Box::new(err.clone()));
    lox.run_source(source);

    Run {
        stdout: out.contents(),
        stderr: err.contents(),
        had_error: lox.had_error(),
        had_runtime_error: lox.had_runtime_error(),
    }
}
