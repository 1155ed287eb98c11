//! Text rendering for valdump.
//!
//! [`Renderer`] lays out the roots of one dump call using a [`DumpConfig`]
//! and, when reference tracking is on, the labels decided by
//! `valdump_refs`. Output goes through an [`Emitter`].

mod config;
mod emitter;
mod render;

pub use config::{
    DumpConfig, INDENT_WIDTH, MAX_DEPTH, MAX_INLINE_LEN, MAX_ITEMS, MAX_STRING_LEN,
};
pub use emitter::{Emitter, IoEmitter, StringEmitter};
pub use render::Renderer;

use valdump_value::{Heap, TypedValue};

/// Render `roots` to a string with the given config.
pub fn render_to_string(config: DumpConfig, heap: &Heap, roots: &[TypedValue]) -> String {
    Renderer::new(config, heap, roots).render_to_string()
}
