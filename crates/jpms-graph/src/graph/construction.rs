//! Building the graph from a universe and command-line directives.

use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use rustc_hash::FxHashMap;

use super::{GrantTable, ModuleGraph};
use crate::directive::{AddReads, GrantKind, ModuleTarget, PackageGrant};
use crate::error::{GraphError, RequiresCycle, Result};
use crate::name::ModuleName;
use crate::package_index::PackageOwnershipIndex;
use crate::readability::{EdgeOrigin, ReadEdge, Readability};
use crate::universe::{ModuleId, ModuleUniverse};

/// Collects the inputs of a graph build. Nothing is validated until
/// [`GraphBuilder::build`], which either yields a complete graph or the
/// first configuration-fatal error.
#[derive(Debug, Clone)]
pub struct GraphBuilder {
    universe: ModuleUniverse,
    add_reads: Vec<AddReads>,
    grants: Vec<PackageGrant>,
    limit: Vec<ModuleName>,
}

impl ModuleGraph {
    pub fn builder(universe: ModuleUniverse) -> GraphBuilder {
        GraphBuilder::new(universe)
    }

    /// Builds a graph with no command-line directives.
    pub fn from_universe(universe: ModuleUniverse) -> Result<Self> {
        GraphBuilder::new(universe).build()
    }
}

impl GraphBuilder {
    pub fn new(universe: ModuleUniverse) -> Self {
        Self {
            universe,
            add_reads: Vec::new(),
            grants: Vec::new(),
            limit: Vec::new(),
        }
    }

    pub fn add_reads(mut self, reads: impl IntoIterator<Item = AddReads>) -> Self {
        self.add_reads.extend(reads);
        self
    }

    /// `--add-exports` and `--add-opens` values.
    pub fn grants(mut self, grants: impl IntoIterator<Item = PackageGrant>) -> Self {
        self.grants.extend(grants);
        self
    }

    pub fn limit_modules(mut self, roots: impl IntoIterator<Item = ModuleName>) -> Self {
        self.limit.extend(roots);
        self
    }

    pub fn build(self) -> Result<ModuleGraph> {
        let universe = self.universe.limit(&self.limit);
        let mut direct: Vec<Vec<(ModuleId, ReadEdge)>> = vec![Vec::new(); universe.len()];

        for (id, descriptor) in universe.iter().filter(|(_, d)| d.is_explicit()) {
            for req in &descriptor.requires {
                let target = resolve(&universe, &req.module, Some(&descriptor.name))?;
                let origin = if req.static_phase {
                    EdgeOrigin::RequiresStatic
                } else {
                    EdgeOrigin::Requires
                };
                add_edge(&mut direct, id, target, ReadEdge::new(origin, req.transitive));
            }
        }

        for reads in &self.add_reads {
            let source = resolve(&universe, &reads.source, None)?;
            for target in &reads.targets {
                let target = match target {
                    ModuleTarget::Module(name) => resolve(&universe, name, None)?,
                    ModuleTarget::AllUnnamed => ModuleId::UNNAMED,
                };
                add_edge(
                    &mut direct,
                    source,
                    target,
                    ReadEdge::new(EdgeOrigin::AddReads, false),
                );
            }
        }

        if let Some(java_base) = universe.id_of(&ModuleName::java_base()) {
            for (id, descriptor) in universe.iter() {
                if descriptor.is_explicit() && id != java_base {
                    add_edge(
                        &mut direct,
                        id,
                        java_base,
                        ReadEdge::new(EdgeOrigin::Mandated, false),
                    );
                }
            }
        } else {
            tracing::debug!("java.base is not observable, no implicit requires added");
        }

        let mut export_grants = GrantTable::default();
        let mut open_grants = GrantTable::default();
        for grant in &self.grants {
            let module = resolve(&universe, &grant.module, None)?;
            let mut targets = Vec::with_capacity(grant.targets.len());
            for target in &grant.targets {
                if let ModuleTarget::Module(name) = target {
                    resolve(&universe, name, None)?;
                }
                targets.push(target.clone());
            }
            if !universe.descriptor(module).contains_package(&grant.package) {
                tracing::debug!(
                    "{} {}/{}: package not found in module",
                    grant.kind.option_name(),
                    grant.module,
                    grant.package
                );
            }

            let table = match grant.kind {
                GrantKind::Exports => &mut export_grants,
                GrantKind::Opens => &mut open_grants,
            };
            let key = (module, grant.package.clone());
            if table.contains_key(&key) {
                return Err(GraphError::DuplicatePackageGrant {
                    option: grant.kind.option_name(),
                    module: grant.module.clone(),
                    package: grant.package.clone(),
                });
            }
            table.insert(key, targets);
        }

        detect_cycles(&universe, &direct)?;

        let mut graph = DiGraph::with_capacity(universe.len(), direct.iter().map(Vec::len).sum());
        for id in universe.ids() {
            graph.add_node(id);
        }
        for (source, edges) in direct.iter().enumerate() {
            for (target, edge) in edges {
                graph.add_edge(NodeIndex::new(source), NodeIndex::new(target.index()), *edge);
            }
        }

        let readability = Readability::compute(&universe, &direct);
        let packages = PackageOwnershipIndex::build(&universe);

        tracing::debug!(
            "built module graph: {} modules, {} read edges, {} packages",
            graph.node_count(),
            graph.edge_count(),
            packages.len()
        );

        Ok(ModuleGraph {
            universe,
            graph,
            direct,
            readability,
            export_grants,
            open_grants,
            packages,
        })
    }
}

fn resolve(
    universe: &ModuleUniverse,
    name: &ModuleName,
    referenced_by: Option<&ModuleName>,
) -> Result<ModuleId> {
    universe
        .id_of(name)
        .ok_or_else(|| GraphError::UnresolvedModule {
            module: name.clone(),
            referenced_by: referenced_by.cloned(),
        })
}

/// Keeps the first edge between two modules; a later duplicate only adds
/// its transitivity.
fn add_edge(
    direct: &mut [Vec<(ModuleId, ReadEdge)>],
    source: ModuleId,
    target: ModuleId,
    edge: ReadEdge,
) {
    let edges = &mut direct[source.index()];
    match edges.iter_mut().find(|(t, _)| *t == target) {
        Some((_, existing)) => existing.transitive |= edge.transitive,
        None => {
            tracing::trace!("read edge {source} -> {target} ({:?})", edge.origin);
            edges.push((target, edge));
        }
    }
}

/// `requires` cycles among explicit modules are fatal. Every module on a
/// cycle is reported once, with its first `requires` that stays inside the
/// cycle.
fn detect_cycles(universe: &ModuleUniverse, direct: &[Vec<(ModuleId, ReadEdge)>]) -> Result<()> {
    let mut requires: DiGraph<ModuleId, ()> = DiGraph::with_capacity(universe.len(), 0);
    for id in universe.ids() {
        requires.add_node(id);
    }
    let explicit = universe.iter().filter(|(_, d)| d.is_explicit()).map(|(id, _)| id);
    for id in explicit {
        for (target, edge) in &direct[id.index()] {
            if is_requires(edge) && universe.descriptor(*target).is_explicit() {
                requires.add_edge(NodeIndex::new(id.index()), NodeIndex::new(target.index()), ());
            }
        }
    }

    let mut on_cycle: FxHashMap<ModuleId, usize> = FxHashMap::default();
    for (component, members) in tarjan_scc(&requires).into_iter().enumerate() {
        let is_cycle = members.len() > 1
            || members
                .first()
                .is_some_and(|node| requires.contains_edge(*node, *node));
        if is_cycle {
            for node in members {
                on_cycle.insert(ModuleId::from_index(node.index()), component);
            }
        }
    }
    if on_cycle.is_empty() {
        return Ok(());
    }

    let mut cycles = Vec::new();
    for id in universe.ids() {
        let Some(component) = on_cycle.get(&id) else {
            continue;
        };
        let next = direct[id.index()]
            .iter()
            .find(|(target, edge)| is_requires(edge) && on_cycle.get(target) == Some(component));
        if let Some((target, _)) = next {
            cycles.push(RequiresCycle {
                module: universe.name(id).clone(),
                requires: universe.name(*target).clone(),
            });
        }
    }
    tracing::debug!("{} modules take part in requires cycles", cycles.len());
    Err(GraphError::RequiresCycle(cycles))
}

fn is_requires(edge: &ReadEdge) -> bool {
    matches!(edge.origin, EdgeOrigin::Requires | EdgeOrigin::RequiresStatic)
}
