//! Dump value graphs as text.
//!
//! The entry points render each root as `<type> => <value>`. Values that are
//! reachable more than once (through pointers, shared slice blocks, maps or
//! value copies) are expanded once with an `&N` label and referenced as
//! `↩︎ &N` everywhere else, so cyclic graphs always terminate.
//!
//! ```text
//! []*main.Person => |2| [
//!    0 => &1 {...}
//!    1 => ↩︎ &1
//! ]
//! ```

pub mod cli;
pub mod demos;

use std::io::{self, Write};
use std::sync::Once;

pub use valdump_render::DumpConfig;
use valdump_render::{IoEmitter, Renderer};
pub use valdump_value::{Heap, TypedValue};

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Safe to call multiple times. Enable with `RUST_LOG=valdump_refs=debug`
/// (pass summaries) or `RUST_LOG=valdump_refs=trace` (every decision).
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        // Only initialize if RUST_LOG is set
        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_writer(io::stderr).with_target(true))
                .with(filter)
                .init();
        }
    });
}

/// Dumps with a fixed configuration.
#[derive(Clone, Copy, Debug, Default)]
pub struct Dumper {
    config: DumpConfig,
}

impl Dumper {
    pub const fn new(config: DumpConfig) -> Self {
        Self { config }
    }

    pub const fn config(&self) -> DumpConfig {
        self.config
    }

    /// Render `roots` to a string.
    pub fn sdump(&self, heap: &Heap, roots: &[TypedValue]) -> String {
        valdump_render::render_to_string(self.config, heap, roots)
    }

    /// Render `roots` into `writer`.
    pub fn fdump<W: Write>(
        &self,
        writer: &mut W,
        heap: &Heap,
        roots: &[TypedValue],
    ) -> io::Result<()> {
        tracing::debug!(roots = roots.len(), "streaming dump");
        let mut emitter = IoEmitter::new(writer);
        Renderer::new(self.config, heap, roots).render(&mut emitter);
        emitter.finish()
    }

    /// Render `roots` to stdout.
    pub fn dump(&self, heap: &Heap, roots: &[TypedValue]) -> io::Result<()> {
        self.fdump(&mut io::stdout().lock(), heap, roots)
    }
}

/// Render `roots` to a string with types, metadata and references.
pub fn sdump(heap: &Heap, roots: &[TypedValue]) -> String {
    Dumper::new(DumpConfig::full()).sdump(heap, roots)
}

/// Render `roots` to a string without types or metadata.
pub fn sdump_simple(heap: &Heap, roots: &[TypedValue]) -> String {
    Dumper::new(DumpConfig::simple()).sdump(heap, roots)
}

pub fn fdump<W: Write>(writer: &mut W, heap: &Heap, roots: &[TypedValue]) -> io::Result<()> {
    Dumper::new(DumpConfig::full()).fdump(writer, heap, roots)
}

pub fn dump(heap: &Heap, roots: &[TypedValue]) -> io::Result<()> {
    Dumper::new(DumpConfig::full()).dump(heap, roots)
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "tests use unwrap for concise assertions")]
mod tests;
