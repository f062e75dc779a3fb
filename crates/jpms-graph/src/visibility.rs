//! Type accessibility from a reading module.
//!
//! A package is *visible* to a reader from a provider when the reader reads
//! the provider and the provider is either the reader itself or exports the
//! package to it. Exactly one visible provider makes its types accessible;
//! more than one is a conflict. With none, the outcome depends on why:
//! a read-but-not-exported provider yields [`Resolution::NotExported`], a
//! provider the reader cannot read at all yields [`Resolution::NoReadEdge`].

use serde::{Deserialize, Serialize};

use crate::graph::ModuleGraph;
use crate::name::{PackageName, TypeName};
use crate::universe::ModuleId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "kebab-case")]
pub enum Resolution {
    Accessible { module: ModuleId },
    /// Read, but the package is not exported to the reader.
    NotExported { module: ModuleId },
    /// The package lives only in modules the reader does not read.
    NoReadEdge { module: ModuleId },
    /// Several visible providers, in provider order.
    Conflict { providers: Vec<ModuleId> },
    /// No observable module contains the type.
    Missing,
}

impl Resolution {
    /// True for [`Resolution::Accessible`].
    pub fn is_accessible(&self) -> bool {
        matches!(self, Self::Accessible { .. })
    }
}

/// Answers accessibility questions against one immutable graph.
#[derive(Debug, Clone, Copy)]
pub struct VisibilityResolver<'g> {
    graph: &'g ModuleGraph,
}

impl<'g> VisibilityResolver<'g> {
    /// Creates a resolver over a built graph.
    pub fn new(graph: &'g ModuleGraph) -> Self {
        Self { graph }
    }

    /// Modules from which `package` is visible to `reader`, in provider
    /// order (the reader itself first).
    pub fn visible_providers(&self, reader: ModuleId, package: &PackageName) -> Vec<ModuleId> {
        if !self.graph.package_index().contains(package) {
            return Vec::new();
        }
        self.graph
            .readable(reader)
            .filter(|m| self.graph.descriptor(*m).contains_package(package))
            .filter(|m| *m == reader || self.graph.exports_to(*m, package, reader))
            .collect()
    }

    /// Resolves `package` as seen from `reader`, without requiring any
    /// particular type to exist in it.
    pub fn resolve_package(&self, reader: ModuleId, package: &PackageName) -> Resolution {
        self.classify(reader, package, None)
    }

    /// Resolves a type reference from `reader`.
    ///
    /// The provider must also declare the type: a visible package that lacks
    /// it yields [`Resolution::Missing`].
    pub fn resolve(&self, reader: ModuleId, type_name: &TypeName) -> Resolution {
        self.classify(reader, &type_name.package(), Some(type_name))
    }

    /// Shorthand for [`VisibilityResolver::resolve`] yielding
    /// [`Resolution::Accessible`].
    pub fn is_accessible(&self, reader: ModuleId, type_name: &TypeName) -> bool {
        self.resolve(reader, type_name).is_accessible()
    }

    /// Deep reflective access to `package` for `reader`: the package must
    /// be readable from a provider that opens it, or from the reader itself.
    pub fn is_open(&self, reader: ModuleId, package: &PackageName) -> bool {
        self.graph.readable(reader).any(|m| {
            self.graph.descriptor(m).contains_package(package)
                && (m == reader || self.graph.opens_to(m, package, reader))
        })
    }

    fn classify(
        &self,
        reader: ModuleId,
        package: &PackageName,
        type_name: Option<&TypeName>,
    ) -> Resolution {
        let owners = self.graph.package_index().owners(package);
        if owners.is_empty() {
            return Resolution::Missing;
        }
        let declares = |m: ModuleId| {
            type_name.is_none_or(|t| self.graph.descriptor(m).declares_type(t))
        };

        let visible = self.visible_providers(reader, package);
        match visible.as_slice() {
            [] => {}
            [only] if declares(*only) => return Resolution::Accessible { module: *only },
            [_] => return Resolution::Missing,
            _ => {
                return Resolution::Conflict {
                    providers: visible,
                };
            }
        }

        let pick = |candidates: Vec<ModuleId>| {
            candidates
                .iter()
                .copied()
                .find(|m| declares(*m))
                .or_else(|| candidates.first().copied())
        };

        let read_owners: Vec<ModuleId> = owners
            .iter()
            .copied()
            .filter(|m| self.graph.reads(reader, *m))
            .collect();
        if let Some(module) = pick(read_owners) {
            return Resolution::NotExported { module };
        }
        match pick(owners.to_vec()) {
            Some(module) => Resolution::NoReadEdge { module },
            None => Resolution::Missing,
        }
    }
}
