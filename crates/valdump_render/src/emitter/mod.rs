//! Output sinks.
//!
//! The renderer writes every fragment through an [`Emitter`].
//! [`StringEmitter`] backs `sdump`; [`IoEmitter`] streams to a writer for
//! `fdump`.

use std::io;

pub trait Emitter {
    fn emit(&mut self, text: &str);

    fn emit_newline(&mut self) {
        self.emit("\n");
    }

    /// Emit `spaces` spaces of indentation.
    fn emit_indent(&mut self, spaces: usize) {
        self.emit(&" ".repeat(spaces));
    }
}

#[derive(Default)]
pub struct StringEmitter {
    buffer: String,
}

impl StringEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    /// The rendered text.
    pub fn output(self) -> String {
        self.buffer
    }
}

impl Emitter for StringEmitter {
    fn emit(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    fn emit_newline(&mut self) {
        self.buffer.push('\n');
    }

    fn emit_indent(&mut self, spaces: usize) {
        self.buffer.push_str(&" ".repeat(spaces));
    }
}

/// Writes fragments straight to an [`io::Write`].
///
/// Rendering itself cannot fail, so the first write error is kept and every
/// later fragment is dropped; [`IoEmitter::finish`] reports it.
pub struct IoEmitter<W: io::Write> {
    writer: W,
    error: Option<io::Error>,
}

impl<W: io::Write> IoEmitter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            error: None,
        }
    }

    /// Flush and return the first error seen, if any.
    pub fn finish(mut self) -> io::Result<()> {
        match self.error.take() {
            Some(err) => Err(err),
            None => self.writer.flush(),
        }
    }
}

impl<W: io::Write> Emitter for IoEmitter<W> {
    fn emit(&mut self, text: &str) {
        if self.error.is_none() {
            if let Err(err) = self.writer.write_all(text.as_bytes()) {
                self.error = Some(err);
            }
        }
    }
}
