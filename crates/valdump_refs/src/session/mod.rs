//! One analysis session: all reference state for a single dump call.
//!
//! [`RefSession::analyze`] runs the passes in order (statistics, copy
//! unification, ID assignment, definition points) and keeps what the
//! renderer needs. Nothing outlives the session, so independent calls never
//! see each other's state. A session is not synchronized; use one per thread.

use rustc_hash::{FxHashMap, FxHashSet};
use valdump_value::{Kind, Memory, Occurrence, TypeId};

use crate::{
    CanonicalKey, CopyUnifier, DefinitionPoint, DefinitionPointSelector, GraphWalker, IdAssigner,
    KeyDeriver, RefId, UnionFind,
};

#[cfg(test)]
#[expect(
    clippy::unwrap_used,
    reason = "tests use unwrap for concise assertions"
)]

/// Reference facts about one occurrence.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RefInfo {
    pub root: CanonicalKey,
    pub id: RefId,
    /// Whether this occurrence is its group's definition point.
    pub is_definition: bool,
    /// Dereferenced type recorded at the definition point, if there is one.
    pub definition_type: Option<TypeId>,
}

/// What the renderer should do with an occurrence.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RefDecision {
    /// No ID: render normally.
    Untracked,
    /// First visit of the definition point: print the label, then the value.
    Define(RefId),
    /// Print `↩︎ &N` and do not descend.
    BackRef(RefId),
}

pub struct RefSession<'h> {
    keys: KeyDeriver<'h>,
    uf: UnionFind,
    ids: FxHashMap<CanonicalKey, RefId>,
    definitions: FxHashMap<CanonicalKey, DefinitionPoint>,
    rendered: FxHashSet<CanonicalKey>,
}

impl<'h> RefSession<'h> {
    /// Run every analysis pass over `memory`'s roots.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn analyze(memory: Memory<'h>) -> Self {
        let mut keys = KeyDeriver::new(memory);
        let stats = GraphWalker::new(&mut keys).collect_stats();

        let mut uf = UnionFind::new();
        CopyUnifier::new(memory.heap(), &stats).unify(&mut uf);
        uf.compress_all();

        let merged = IdAssigner::merge(&stats, &mut uf);
        let ids = IdAssigner::assign(memory.types(), &merged);
        let definitions = DefinitionPointSelector::new(&mut uf, &ids).select(&mut keys);

        tracing::debug!(
            keys = stats.len(),
            locations = keys.locations().len(),
            ids = ids.len(),
            "reference analysis complete"
        );
        Self {
            keys,
            uf,
            ids,
            definitions,
            rendered: FxHashSet::default(),
        }
    }

    pub fn memory(&self) -> Memory<'h> {
        self.keys.memory()
    }

    /// Number of visible IDs.
    pub fn id_count(&self) -> usize {
        self.ids.len()
    }

    pub fn definition(&self, root: CanonicalKey) -> Option<&DefinitionPoint> {
        self.definitions.get(&root)
    }

    pub fn raw_key(&mut self, occ: &Occurrence<'h>) -> Option<CanonicalKey> {
        self.keys.raw_key(occ)
    }

    /// Reference facts for an occurrence, or `None` if its group has no ID.
    pub fn lookup(&mut self, occ: &Occurrence<'h>) -> Option<RefInfo> {
        let raw = self.keys.raw_key(occ)?;
        let root = self.uf.find(raw);
        let id = *self.ids.get(&root)?;
        let definition = self.definitions.get(&root).copied();
        let is_definition = match (definition, self.keys.instance_key(occ)) {
            (Some(def), Some(instance)) => def.instance == instance,
            _ => false,
        };
        Some(RefInfo {
            root,
            id,
            is_definition,
            definition_type: definition.map(|d| d.value_type),
        })
    }

    /// Decide how to render an occurrence and advance its group's state.
    ///
    /// The definition point defines once; reaching it again before or after
    /// it finished (a cycle through the definition site) is a back-reference,
    /// as is every other occurrence of the group.
    pub fn classify(&mut self, occ: &Occurrence<'h>) -> RefDecision {
        let Some(info) = self.lookup(occ) else {
            return RefDecision::Untracked;
        };
        if info.is_definition && self.rendered.insert(info.root) {
            tracing::trace!(id = %info.id, "define");
            RefDecision::Define(info.id)
        } else {
            RefDecision::BackRef(info.id)
        }
    }

    /// A struct-valued field whose group is defined at a pointer occurrence
    /// of the same dereferenced type prints a back-reference in place of its
    /// fields.
    pub fn field_backref(&mut self, field: &Occurrence<'h>) -> Option<RefId> {
        if field.kind() != Kind::Struct {
            return None;
        }
        let raw = self.keys.raw_key(field)?;
        let root = self.uf.find(raw);
        let id = *self.ids.get(&root)?;
        let def = self.definitions.get(&root)?;
        (def.via_pointer && def.value_type == field.ty).then_some(id)
    }
}
