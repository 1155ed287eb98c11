//! Reference identity and definition-point resolution.
//!
//! Given the roots of one dump call, decide which values are shared, label
//! each shared group with an ID, and pick the single occurrence that shows
//! the group's full expansion. Every other occurrence prints a
//! back-reference.
//!
//! Passes, in order:
//!
//! 1. [`GraphWalker::collect_stats`]: BFS from each root, counting how each
//!    [`CanonicalKey`] is referenced
//! 2. [`CopyUnifier`]: merge by-value copies into their pointer sources
//! 3. [`IdAssigner`]: sum counts per merged group and label shared groups
//! 4. [`DefinitionPointSelector`]: second BFS choosing one occurrence per ID
//!
//! [`RefSession`] runs them and answers the renderer's questions.

mod definition;
mod ids;
mod key;
mod session;
mod stats;
mod union_find;
mod unify;
mod walk;

pub use definition::{DefinitionPoint, DefinitionPointSelector};
pub use ids::{GroupCounts, IdAssigner, RefId};
pub use key::{CanonicalKey, KeyDeriver, Location, LocationTable};
pub use session::{RefDecision, RefInfo, RefSession};
pub use stats::RefStats;
pub use union_find::UnionFind;
pub use unify::CopyUnifier;
pub use walk::{GraphWalker, Visit};
