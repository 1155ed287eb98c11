//! Text layout of a dump.
//!
//! [`Renderer`] walks each root depth-first and writes through an
//! [`Emitter`]. Structs, lists and maps choose between an inline form
//! (`{⯀ X int => 1, ⯀ Y int => 2}`) and a block form with padded name and
//! type columns. With reference tracking on, every occurrence is classified
//! by the analysis session before it is printed: the definition point gets
//! an `&N ` label, every other occurrence of the group a `↩︎ &N`
//! back-reference. With tracking off, a per-call guard prints `<cycle>` for
//! storage that was already printed.

mod inline;
mod text;

use rustc_hash::FxHashSet;
use valdump_refs::{CanonicalKey, KeyDeriver, RefDecision, RefId, RefSession};
use valdump_value::{
    ensure_sufficient_stack, ChanDir, ChanId, Field, FuncId, Heap, Kind, Memory, Occurrence,
    TypeKind, TypedValue, Value,
};

use crate::{DumpConfig, Emitter, StringEmitter};

use text::{escape, float, pad_right, rune_len};


const DEPTH_MARKER: &str = "… (max depth reached)";
const TRUNCATED: &str = "… (truncated)";

/// Per-call identity state.
enum Tracking<'h> {
    Refs(RefSession<'h>),
    Guard {
        keys: KeyDeriver<'h>,
        seen: FxHashSet<CanonicalKey>,
    },
}

/// Renders the roots of one dump call.
pub struct Renderer<'h> {
    config: DumpConfig,
    memory: Memory<'h>,
    tracking: Tracking<'h>,
}

impl<'h> Renderer<'h> {
    /// Prepare a render of `roots`, running reference analysis first when
    /// the config asks for it.
    pub fn new(config: DumpConfig, heap: &'h Heap, roots: &'h [TypedValue]) -> Self {
        let memory = Memory::new(heap, roots);
        let tracking = if config.track_references {
            Tracking::Refs(RefSession::analyze(memory))
        } else {
            Tracking::Guard {
                keys: KeyDeriver::new(memory),
                seen: FxHashSet::default(),
            }
        };
        Self {
            config,
            memory,
            tracking,
        }
    }

    /// Write every root as `<type> => <value>`, one block per root,
    /// separated by blank lines.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn render<E: Emitter>(mut self, out: &mut E) {
        let roots = self.memory.roots();
        tracing::debug!(roots = roots.len(), "rendering");
        for (i, root) in roots.iter().enumerate() {
            if i > 0 {
                out.emit_newline();
            }
            if self.config.show_types {
                out.emit(&self.type_column(root, false));
                out.emit(" => ");
            }
            self.value(out, root, 0, false);
            out.emit_newline();
        }
    }

    pub fn render_to_string(self) -> String {
        let mut out = StringEmitter::new();
        self.render(&mut out);
        out.output()
    }

    fn value<E: Emitter>(
        &mut self,
        out: &mut E,
        occ: &Occurrence<'h>,
        level: usize,
        skip_ref_check: bool,
    ) {
        ensure_sufficient_stack(|| self.value_inner(out, occ, level, skip_ref_check));
    }

    fn value_inner<E: Emitter>(
        &mut self,
        out: &mut E,
        occ: &Occurrence<'h>,
        level: usize,
        skip_ref_check: bool,
    ) {
        if level > self.config.max_depth {
            out.emit(DEPTH_MARKER);
            return;
        }
        if occ.value.is_nil() {
            out.emit("<nil>");
            return;
        }
        if !skip_ref_check && !self.check_identity(out, occ) {
            return;
        }

        match occ.value {
            // The label (if any) was printed for the pointer; its target
            // renders at the same level without a second check.
            Value::Pointer(_) | Value::Interface(_) => match self.memory.elem(occ) {
                Some(target) => self.value(out, &target, level, true),
                None => out.emit("<invalid>"),
            },
            Value::Struct(_) => self.structure(out, occ, level),
            Value::Array(_) | Value::Slice(_) => self.list(out, occ, level),
            Value::Map(_) => self.map(out, occ, level),
            Value::Func(Some(func)) => self.func(out, *func),
            Value::Chan(Some(chan)) => self.chan(out, occ, *chan),
            Value::Bool(b) => out.emit(&b.to_string()),
            Value::Int(i) => out.emit(&i.to_string()),
            Value::Uint(u) => out.emit(&u.to_string()),
            Value::Float(f) => out.emit(&float(*f)),
            Value::Str(s) => self.string(out, s),
            Value::Func(None) | Value::Chan(None) => out.emit("<nil>"),
        }
    }

    /// Print the reference label or back-reference for an occurrence.
    /// Returns whether its value should still be printed.
    fn check_identity<E: Emitter>(&mut self, out: &mut E, occ: &Occurrence<'h>) -> bool {
        match &mut self.tracking {
            Tracking::Refs(session) => match session.classify(occ) {
                RefDecision::Untracked => true,
                RefDecision::Define(id) => {
                    out.emit(&format!("{id} "));
                    true
                }
                RefDecision::BackRef(id) => {
                    backref(out, id);
                    false
                }
            },
            Tracking::Guard { keys, seen } => {
                if !has_identity(self.memory, occ) {
                    return true;
                }
                match keys.raw_key(occ) {
                    Some(key) if !seen.insert(key) => {
                        tracing::trace!(?key, "cycle guard");
                        out.emit("<cycle>");
                        false
                    }
                    _ => true,
                }
            }
        }
    }

    fn structure<E: Emitter>(&mut self, out: &mut E, occ: &Occurrence<'h>, level: usize) {
        let decls = self.memory.types().fields(occ.ty);
        let fields = self.memory.fields(occ);
        out.emit("{");
        if self.inline_struct(occ, &fields) {
            for (i, (decl, field)) in decls.iter().zip(&fields).enumerate() {
                if i > 0 {
                    out.emit(", ");
                }
                out.emit(&self.field_label(decl, field, None));
                self.field_value(out, field, level);
            }
        } else {
            out.emit_newline();
            let name_width = decls.iter().map(|d| rune_len(&d.name)).max().unwrap_or(0) + 2;
            let type_width = fields
                .iter()
                .map(|f| rune_len(&self.type_column(f, false)))
                .max()
                .unwrap_or(0);
            for (decl, field) in decls.iter().zip(&fields) {
                self.indent(out, level + 1);
                out.emit(&self.field_label(decl, field, Some((name_width, type_width))));
                self.field_value(out, field, level + 1);
                out.emit_newline();
            }
            self.indent(out, level);
        }
        out.emit("}");
    }

    /// `⯀ Name type => `, padded to the given column widths in block form.
    fn field_label(
        &self,
        decl: &Field,
        field: &Occurrence<'h>,
        widths: Option<(usize, usize)>,
    ) -> String {
        let symbol = if decl.exported { "⯀" } else { "🞏" };
        let mut label = format!("{symbol} {}", decl.name);
        let ty = self.type_column(field, false);
        match widths {
            None => {
                if !ty.is_empty() {
                    label.push(' ');
                    label.push_str(&ty);
                }
            }
            Some((name_width, type_width)) => {
                pad_right(&mut label, name_width);
                if !ty.is_empty() {
                    label.push_str("  ");
                    label.push_str(&ty);
                    pad_right(&mut label, name_width + 2 + type_width);
                }
            }
        }
        label.push_str(" => ");
        label
    }

    /// A struct-valued field whose group is defined behind a pointer of the
    /// same type prints a back-reference instead of repeating the fields.
    fn field_value<E: Emitter>(&mut self, out: &mut E, field: &Occurrence<'h>, level: usize) {
        if let Tracking::Refs(session) = &mut self.tracking {
            if let Some(id) = session.field_backref(field) {
                backref(out, id);
                return;
            }
        }
        self.value(out, field, level, false);
    }

    fn list<E: Emitter>(&mut self, out: &mut E, occ: &Occurrence<'h>, level: usize) {
        let elems = self.memory.elements(occ);
        if self.config.show_meta {
            out.emit(&format!("|{}| ", elems.len()));
        }
        out.emit("[");
        let max_items = self.config.max_items;
        if self.inline_list(occ, &elems) {
            for (i, elem) in elems.iter().enumerate() {
                if i >= max_items {
                    out.emit(TRUNCATED);
                    break;
                }
                if i > 0 {
                    out.emit(", ");
                }
                out.emit(&format!("{i}{} => ", self.type_column(elem, true)));
                self.value(out, elem, level, false);
            }
        } else {
            out.emit_newline();
            let shown = &elems[..elems.len().min(max_items)];
            let type_width = shown
                .iter()
                .map(|e| rune_len(&self.type_column(e, true)))
                .max()
                .unwrap_or(0);
            for (i, elem) in shown.iter().enumerate() {
                let mut label = i.to_string();
                let ty = self.type_column(elem, true);
                if !ty.is_empty() {
                    label.push(' ');
                    let start = rune_len(&label);
                    label.push_str(&ty);
                    pad_right(&mut label, start + type_width);
                }
                label.push_str(" => ");
                self.indent(out, level + 1);
                out.emit(&label);
                self.value(out, elem, level + 1, false);
                out.emit_newline();
            }
            if elems.len() > max_items {
                self.indent(out, level + 1);
                out.emit(TRUNCATED);
                out.emit_newline();
            }
            self.indent(out, level);
        }
        out.emit("]");
    }

    fn map<E: Emitter>(&mut self, out: &mut E, occ: &Occurrence<'h>, level: usize) {
        let entries = self.memory.map_entries(occ);
        if self.config.show_meta {
            out.emit(&format!("|{}| ", entries.len()));
        }
        out.emit("[");
        let max_items = self.config.max_items;
        if self.inline_map(occ, &entries) {
            for (i, (key, value)) in entries.iter().enumerate() {
                if i >= max_items {
                    out.emit(TRUNCATED);
                    break;
                }
                if i > 0 {
                    out.emit(", ");
                }
                let mut label = self.map_key(key);
                let ty = self.type_column(value, true);
                if !ty.is_empty() {
                    label.push(' ');
                    label.push_str(&ty);
                }
                label.push_str(" => ");
                out.emit(&label);
                self.value(out, value, level, false);
            }
        } else {
            out.emit_newline();
            let shown = &entries[..entries.len().min(max_items)];
            let labels: Vec<(String, String)> = shown
                .iter()
                .map(|(key, value)| (self.map_key(key), self.type_column(value, true)))
                .collect();
            let key_width = labels.iter().map(|(k, _)| rune_len(k)).max().unwrap_or(0);
            let type_width = labels.iter().map(|(_, t)| rune_len(t)).max().unwrap_or(0);
            for ((_, value), (key, ty)) in shown.iter().zip(labels) {
                let mut label = key;
                if !ty.is_empty() {
                    pad_right(&mut label, key_width);
                    label.push_str("  ");
                    label.push_str(&ty);
                    pad_right(&mut label, key_width + 2 + type_width);
                }
                label.push_str(" => ");
                self.indent(out, level + 1);
                out.emit(&label);
                self.value(out, value, level + 1, false);
                out.emit_newline();
            }
            if entries.len() > max_items {
                self.indent(out, level + 1);
                out.emit(TRUNCATED);
                out.emit_newline();
            }
            self.indent(out, level);
        }
        out.emit("]");
    }

    /// Map keys print quoted when they are strings (directly or inside an
    /// interface), plainly when they are other primitives, and as their
    /// fingerprint otherwise.
    fn map_key(&self, key: &Occurrence<'h>) -> String {
        let key = match key.value {
            Value::Interface(None) => return "<nil>".to_owned(),
            Value::Interface(Some(_)) => self.memory.elem(key).unwrap_or_else(|| key.clone()),
            _ => key.clone(),
        };
        match key.value {
            Value::Str(s) => format!("{s:?}"),
            Value::Bool(b) => b.to_string(),
            Value::Int(i) => i.to_string(),
            Value::Uint(u) => u.to_string(),
            Value::Float(f) => f.to_string(),
            _ => self.memory.fingerprint(&key),
        }
    }

    fn string<E: Emitter>(&self, out: &mut E, s: &str) {
        if self.config.show_meta {
            out.emit(&format!("|R:{}| ", rune_len(s)));
        }
        out.emit("\"");
        out.emit(&escape(s, self.config.max_string_len));
        out.emit("\"");
    }

    fn func<E: Emitter>(&self, out: &mut E, func: FuncId) {
        let Some(data) = self.memory.heap().func(func) else {
            out.emit("<invalid>");
            return;
        };
        if self.config.show_meta {
            out.emit(&format!("|func@{:#x}| ", func.raw()));
        }
        out.emit(&data.name);
    }

    fn chan<E: Emitter>(&self, out: &mut E, occ: &Occurrence<'h>, chan: ChanId) {
        let Some(data) = self.memory.heap().chan(chan) else {
            out.emit("<invalid>");
            return;
        };
        if self.config.show_meta {
            out.emit(&format!("|B:{}| ", data.capacity));
        }
        let symbol = match self.memory.types().kind(occ.ty) {
            TypeKind::Chan {
                dir: ChanDir::Send, ..
            } => "🡹",
            TypeKind::Chan {
                dir: ChanDir::Recv, ..
            } => "🢃",
            _ => "⮁",
        };
        out.emit(&format!("{symbol} chan@{:#x}", chan.raw()));
    }

    /// The type column for an occurrence. Inside collections, only
    /// composite and interface elements show their type; interfaces show
    /// `⧉ static(dynamic)`.
    fn type_column(&self, occ: &Occurrence<'h>, in_collection: bool) -> String {
        if !self.config.show_types {
            return String::new();
        }
        let types = self.memory.types();
        let name = types.name(occ.ty);
        let mut column = match occ.kind() {
            Kind::Interface => format!("⧉ {name}"),
            Kind::Array | Kind::Slice | Kind::Map | Kind::Struct => name.to_owned(),
            _ if !in_collection => name.to_owned(),
            _ => String::new(),
        };
        if let Value::Interface(Some(payload)) = occ.value {
            column.push('(');
            column.push_str(types.name(payload.ty));
            column.push(')');
        }
        column
    }

    fn indent<E: Emitter>(&self, out: &mut E, level: usize) {
        out.emit_indent(level * self.config.indent_width);
    }
}

fn backref<E: Emitter>(out: &mut E, id: RefId) {
    out.emit(&format!("↩︎ {id}"));
}

/// Occurrences the cycle guard tracks: anything with reference semantics,
/// and addressable storage.
fn has_identity<'h>(memory: Memory<'h>, occ: &Occurrence<'h>) -> bool {
    match occ.kind() {
        Kind::Pointer | Kind::Slice | Kind::Map | Kind::Func | Kind::Chan => true,
        Kind::Interface => memory
            .elem(occ)
            .is_some_and(|payload| has_identity(memory, &payload)),
        _ => occ.is_addressable(),
    }
}
