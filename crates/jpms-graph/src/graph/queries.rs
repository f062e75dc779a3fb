//! Read-only lookups over a built graph.

use petgraph::Direction;
use petgraph::graph::NodeIndex;

use super::ModuleGraph;
use crate::descriptor::ModuleDescriptor;
use crate::name::{ModuleName, PackageName};
use crate::package_index::PackageOwnershipIndex;
use crate::readability::ReadEdge;
use crate::universe::{ModuleId, ModuleUniverse};

impl ModuleGraph {
    /// The observable modules after `--limit-modules`.
    pub fn universe(&self) -> &ModuleUniverse {
        &self.universe
    }

    /// Which modules contain each package.
    pub fn package_index(&self) -> &PackageOwnershipIndex {
        &self.packages
    }

    /// Number of modules in the graph, the unnamed module included.
    pub fn module_count(&self) -> usize {
        self.universe.len()
    }

    /// Id of the named module, `None` when it is not in the graph.
    pub fn id_of(&self, name: &ModuleName) -> Option<ModuleId> {
        self.universe.id_of(name)
    }

    /// Descriptor of a module in the graph.
    pub fn descriptor(&self, id: ModuleId) -> &ModuleDescriptor {
        self.universe.descriptor(id)
    }

    /// Name of a module in the graph.
    pub fn name(&self, id: ModuleId) -> &ModuleName {
        self.universe.name(id)
    }

    /// Modules `reader` reads, itself first, in provider order.
    pub fn readable(&self, reader: ModuleId) -> impl Iterator<Item = ModuleId> + '_ {
        self.readability.readable(reader).iter().copied()
    }

    /// True if `target` is in the readable set of `reader`. A module always
    /// reads itself.
    pub fn reads(&self, reader: ModuleId, target: ModuleId) -> bool {
        self.readability.readable(reader).contains(&target)
    }

    /// `module` plus every module its readers implicitly read through it.
    pub fn implied_by(&self, module: ModuleId) -> impl Iterator<Item = ModuleId> + '_ {
        self.readability.implied(module).iter().copied()
    }

    pub(crate) fn implies(&self, module: ModuleId, target: ModuleId) -> bool {
        self.readability.implied(module).contains(&target)
    }

    /// Direct read edges of `module` in declaration order: `requires`,
    /// then `--add-reads`, then the implicit `java.base`.
    pub fn direct_reads(&self, module: ModuleId) -> &[(ModuleId, ReadEdge)] {
        &self.direct[module.index()]
    }

    /// Modules with a direct read edge to `module`, in universe order.
    pub fn direct_readers(&self, module: ModuleId) -> Vec<ModuleId> {
        let mut readers: Vec<ModuleId> = self
            .graph
            .neighbors_directed(NodeIndex::new(module.index()), Direction::Incoming)
            .map(|node| self.graph[node])
            .collect();
        readers.sort();
        readers.dedup();
        readers
    }

    /// Declared or command-line export of `package` from `owner` to `reader`.
    pub fn exports_to(&self, owner: ModuleId, package: &PackageName, reader: ModuleId) -> bool {
        let reader_name = self.name(reader);
        self.descriptor(owner).exports_to(package, reader_name)
            || self
                .export_grants
                .get(&(owner, package.clone()))
                .is_some_and(|targets| targets.iter().any(|t| t.matches(reader_name)))
    }

    /// Declared or command-line open of `package` from `owner` to `reader`.
    pub fn opens_to(&self, owner: ModuleId, package: &PackageName, reader: ModuleId) -> bool {
        let reader_name = self.name(reader);
        self.descriptor(owner).opens_to(package, reader_name)
            || self
                .open_grants
                .get(&(owner, package.clone()))
                .is_some_and(|targets| targets.iter().any(|t| t.matches(reader_name)))
    }
}
