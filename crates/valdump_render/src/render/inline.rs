//! Inline-or-block decisions.
//!
//! A struct, list or map renders on one line when every member is a
//! primitive, it has at most [`MAX_INLINE_MEMBERS`] members, and its
//! estimated single-line width fits `max_inline_len`.

use valdump_value::{Occurrence, Value};

use super::text::rune_len;
use super::Renderer;

const MAX_INLINE_MEMBERS: usize = 10;

/// Width charged for values the estimate does not look into.
const OPAQUE_WIDTH: usize = 10;

fn is_simple(occ: &Occurrence<'_>) -> bool {
    occ.kind().is_primitive()
}

impl<'h> Renderer<'h> {
    pub(super) fn inline_struct(&self, occ: &Occurrence<'h>, fields: &[Occurrence<'h>]) -> bool {
        fields.iter().all(is_simple)
            && fields.len() <= MAX_INLINE_MEMBERS
            && self.estimate(occ) <= self.config.max_inline_len
    }

    pub(super) fn inline_list(&self, occ: &Occurrence<'h>, elems: &[Occurrence<'h>]) -> bool {
        elems.iter().all(is_simple)
            && elems.len() <= MAX_INLINE_MEMBERS
            && self.estimate(occ) <= self.config.max_inline_len
    }

    pub(super) fn inline_map(
        &self,
        occ: &Occurrence<'h>,
        entries: &[(Occurrence<'h>, Occurrence<'h>)],
    ) -> bool {
        entries.iter().all(|(k, v)| is_simple(k) && is_simple(v))
            && entries.len() <= MAX_INLINE_MEMBERS
            && self.estimate(occ) <= self.config.max_inline_len
    }

    /// Approximate single-line width of an occurrence.
    fn estimate(&self, occ: &Occurrence<'h>) -> usize {
        let meta = |len: usize| {
            if self.config.show_meta {
                format!("|{len}| ").len()
            } else {
                0
            }
        };
        let types = self.memory.types();
        match occ.value {
            Value::Str(s) => {
                let runes = rune_len(s);
                let hint = if self.config.show_meta {
                    format!(" |R:{runes}|").len()
                } else {
                    0
                };
                runes + 2 + hint
            }
            Value::Int(i) => i.to_string().len(),
            Value::Uint(u) => u.to_string().len(),
            Value::Float(f) => f.to_string().len(),
            Value::Bool(true) => 4,
            Value::Bool(false) => 5,
            Value::Array(_) | Value::Slice(_) => {
                let elems = self.memory.elements(occ);
                let separators = elems.len().saturating_sub(1) * 2;
                let members: usize = elems.iter().map(|e| 1 + 4 + self.estimate(e)).sum();
                2 + meta(elems.len()) + separators + members
            }
            Value::Map(_) => {
                let entries = self.memory.map_entries(occ);
                let separators = entries.len().saturating_sub(1) * 2;
                let members: usize = entries
                    .iter()
                    .map(|(k, v)| {
                        let ty = if self.config.show_types {
                            types.name(v.ty).len() + 1
                        } else {
                            0
                        };
                        self.estimate(k) + 4 + self.estimate(v) + ty
                    })
                    .sum();
                2 + meta(entries.len()) + separators + members
            }
            Value::Struct(_) => {
                let fields = self.memory.fields(occ);
                let separators = fields.len().saturating_sub(1) * 2;
                let members: usize = types
                    .fields(occ.ty)
                    .iter()
                    .zip(&fields)
                    .map(|(decl, field)| {
                        let ty = if self.config.show_types {
                            types.name(field.ty).len() + 1
                        } else {
                            0
                        };
                        2 + decl.name.len() + 4 + self.estimate(field) + ty
                    })
                    .sum();
                2 + separators + members
            }
            _ => OPAQUE_WIDTH,
        }
    }
}
