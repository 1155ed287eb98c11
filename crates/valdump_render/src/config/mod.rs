//! Dump configuration.
//!
//! [`DumpConfig`] is a plain copyable struct. Start from [`DumpConfig::full`]
//! (the default) or [`DumpConfig::simple`] and adjust with the `with_*`
//! builders.

/// Spaces per nesting level.
pub const INDENT_WIDTH: usize = 3;

/// Nesting levels rendered before `… (max depth reached)`.
pub const MAX_DEPTH: usize = 15;

/// Elements or entries rendered per collection before `… (truncated)`.
pub const MAX_ITEMS: usize = 150;

/// Runes of a string rendered before it is cut with `…`.
pub const MAX_STRING_LEN: usize = 10_000;

/// Widest estimated single-line rendering of a collection or struct.
pub const MAX_INLINE_LEN: usize = 80;

/// Rendering options for one dump call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DumpConfig {
    pub indent_width: usize,
    pub max_depth: usize,
    pub max_items: usize,
    pub max_string_len: usize,
    pub max_inline_len: usize,
    /// Show type names before values and in field/element columns.
    pub show_types: bool,
    /// Show length hints such as `|R:5|` and `|3|`.
    pub show_meta: bool,
    /// Label shared values with `&N` and print back-references. When off, a
    /// plain cycle guard prints `<cycle>` instead.
    pub track_references: bool,
}

impl Default for DumpConfig {
    fn default() -> Self {
        Self::full()
    }
}

impl DumpConfig {
    /// Everything on.
    pub const fn full() -> Self {
        Self {
            indent_width: INDENT_WIDTH,
            max_depth: MAX_DEPTH,
            max_items: MAX_ITEMS,
            max_string_len: MAX_STRING_LEN,
            max_inline_len: MAX_INLINE_LEN,
            show_types: true,
            show_meta: true,
            track_references: true,
        }
    }

    /// Values only: no types, no meta hints.
    pub const fn simple() -> Self {
        Self {
            show_types: false,
            show_meta: false,
            ..Self::full()
        }
    }

    #[must_use]
    pub fn with_indent_width(self, indent_width: usize) -> Self {
        Self {
            indent_width,
            ..self
        }
    }

    #[must_use]
    pub fn with_max_depth(self, max_depth: usize) -> Self {
        Self { max_depth, ..self }
    }

    #[must_use]
    pub fn with_max_items(self, max_items: usize) -> Self {
        Self { max_items, ..self }
    }

    #[must_use]
    pub fn with_max_string_len(self, max_string_len: usize) -> Self {
        Self {
            max_string_len,
            ..self
        }
    }

    #[must_use]
    pub fn with_max_inline_len(self, max_inline_len: usize) -> Self {
        Self {
            max_inline_len,
            ..self
        }
    }

    #[must_use]
    pub fn with_types(self, show_types: bool) -> Self {
        Self { show_types, ..self }
    }

    #[must_use]
    pub fn with_meta(self, show_meta: bool) -> Self {
        Self { show_meta, ..self }
    }

    #[must_use]
    pub fn with_references(self, track_references: bool) -> Self {
        Self {
            track_references,
            ..self
        }
    }
}
