//! The resolved, immutable module graph.
//!
//! Construction lives in [`construction`], read-only queries in `queries`,
//! path finding in `chains` and DOT/JSON export in `serialization`; each
//! file adds an `impl ModuleGraph` block.

mod chains;
mod construction;
mod queries;
mod serialization;

use petgraph::graph::DiGraph;
use rustc_hash::FxHashMap;

use crate::directive::ModuleTarget;
use crate::name::PackageName;
use crate::package_index::PackageOwnershipIndex;
use crate::readability::{ReadEdge, Readability};
use crate::universe::{ModuleId, ModuleUniverse};

pub use chains::{MAX_REQUIRES_PATH_DEPTH, RequiresPath};
pub use construction::GraphBuilder;
pub use serialization::{GraphSnapshot, ModuleSnapshot, EdgeSnapshot};

/// Command-line package grants keyed by (module, package).
pub(crate) type GrantTable = FxHashMap<(ModuleId, PackageName), Vec<ModuleTarget>>;

/// Readability graph over a [`ModuleUniverse`].
///
/// Built once by [`GraphBuilder`] and never mutated afterwards, so it can
/// be shared across analysis threads behind an `Arc`. Node indices of the
/// petgraph graph coincide with [`ModuleId`]s.
#[derive(Debug, Clone)]
pub struct ModuleGraph {
    pub(crate) universe: ModuleUniverse,
    pub(crate) graph: DiGraph<ModuleId, ReadEdge>,
    /// Direct read edges per module, in the order they were declared.
    pub(crate) direct: Vec<Vec<(ModuleId, ReadEdge)>>,
    pub(crate) readability: Readability,
    pub(crate) export_grants: GrantTable,
    pub(crate) open_grants: GrantTable,
    pub(crate) packages: PackageOwnershipIndex,
}
