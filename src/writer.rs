//! Indentation-aware line writer for image statements.

use std::io::{self, Write};

const INDENT: &str = "    ";

/// Writes lines prefixed with four spaces per indentation level.
///
/// The depth is owned by the writer instance. Every [`increase_indent`]
/// must be paired with a [`decrease_indent`] by the caller.
///
/// [`increase_indent`]: StatementWriter::increase_indent
/// [`decrease_indent`]: StatementWriter::decrease_indent
pub struct StatementWriter<W: Write> {
    out: W,
    depth: usize,
}

impl<W: Write> StatementWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out, depth: 0 }
    }

    pub fn write_line(&mut self, text: &str) -> io::Result<()> {
        for _ in 0..self.depth {
            self.out.write_all(INDENT.as_bytes())?;
        }
        self.out.write_all(text.as_bytes())?;
        self.newline()
    }

    /// Writes `text` as-is, without indentation or line break.
    pub fn write_raw(&mut self, text: &str) -> io::Result<()> {
        self.out.write_all(text.as_bytes())
    }

    pub fn newline(&mut self) -> io::Result<()> {
        self.out.write_all(b"\n")
    }

    pub fn increase_indent(&mut self) {
        self.depth += 1;
    }

    pub fn decrease_indent(&mut self) {
        debug_assert!(self.depth > 0, "unbalanced decrease_indent");
        self.depth = self.depth.saturating_sub(1);
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
