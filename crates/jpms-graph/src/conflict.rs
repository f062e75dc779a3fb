//! Split-package detection, driven by what a reader actually uses.
//!
//! Only packages a reader declares itself or references from one of its
//! compilation units are checked. For each such package seen from more
//! than one provider:
//!
//! - if the reader owns it, one record per declaring compilation unit;
//! - otherwise one record per `requires` clause contributing a provider,
//!   and one more per referencing import or qualified name.

use std::path::PathBuf;

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::diagnostic::{Diagnostic, DiagnosticKind, Location};
use crate::graph::ModuleGraph;
use crate::name::{ModuleName, PackageName, TypeName};
use crate::span::SourceSpan;
use crate::universe::ModuleId;
use crate::visibility::VisibilityResolver;

/// Where a conflict is reported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "site", rename_all = "kebab-case")]
pub enum ConflictSite {
    /// A `requires` clause in the reader's `module-info`.
    Requires {
        module: ModuleName,
        path: PathBuf,
        span: SourceSpan,
    },
    /// The `package` statement of one of the reader's own units.
    PackageDeclaration { path: PathBuf, span: SourceSpan },
    /// An import or qualified type name.
    Reference {
        type_name: TypeName,
        path: PathBuf,
        span: SourceSpan,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictRecord {
    pub reader: ModuleName,
    pub package: PackageName,
    /// Every visible provider, in provider order. Starts with the reader
    /// when it owns the package.
    pub providers: Vec<ModuleName>,
    pub site: ConflictSite,
}

impl ConflictRecord {
    pub fn is_own_package(&self) -> bool {
        matches!(self.site, ConflictSite::PackageDeclaration { .. })
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        let (kind, location) = match &self.site {
            ConflictSite::PackageDeclaration { path, span } => (
                DiagnosticKind::PackageConflictsWithOwn {
                    package: self.package.clone(),
                    modules: self
                        .providers
                        .iter()
                        .filter(|m| **m != self.reader)
                        .cloned()
                        .collect(),
                },
                Location::new(path.clone(), *span),
            ),
            ConflictSite::Requires { path, span, .. }
            | ConflictSite::Reference { path, span, .. } => (
                DiagnosticKind::PackageAccessibleFromMultipleModules {
                    package: self.package.clone(),
                    modules: self.providers.clone(),
                },
                Location::new(path.clone(), *span),
            ),
        };
        Diagnostic::new(kind, self.reader.clone(), location)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ConflictChecker<'g> {
    graph: &'g ModuleGraph,
    resolver: VisibilityResolver<'g>,
}

impl<'g> ConflictChecker<'g> {
    pub fn new(graph: &'g ModuleGraph) -> Self {
        Self {
            graph,
            resolver: VisibilityResolver::new(graph),
        }
    }

    /// Packages whose visibility matters to `reader`: its own packages in
    /// declaration order, then referenced packages in reference order.
    fn packages_of_interest(&self, reader: ModuleId) -> IndexSet<PackageName> {
        let descriptor = self.graph.descriptor(reader);
        let mut packages: IndexSet<PackageName> = descriptor.packages.keys().cloned().collect();
        for unit in &descriptor.units {
            packages.extend(unit.references.iter().map(|r| r.name.package()));
        }
        packages
    }

    pub fn conflicts_for(&self, reader: ModuleId) -> Vec<ConflictRecord> {
        let descriptor = self.graph.descriptor(reader);
        let mut records = Vec::new();

        for package in self.packages_of_interest(reader) {
            let providers = self.resolver.visible_providers(reader, &package);
            if providers.len() < 2 {
                continue;
            }
            let names: Vec<ModuleName> = providers
                .iter()
                .map(|m| self.graph.name(*m).clone())
                .collect();
            tracing::trace!("{} sees {package} from {names:?}", descriptor.name);
            let record = |site| ConflictRecord {
                reader: descriptor.name.clone(),
                package: package.clone(),
                providers: names.clone(),
                site,
            };

            if providers[0] == reader {
                let declaring = descriptor
                    .units
                    .iter()
                    .filter(|u| u.is_associated() && u.package == package);
                for unit in declaring {
                    records.push(record(ConflictSite::PackageDeclaration {
                        path: unit.path.clone(),
                        span: unit.package_span,
                    }));
                }
                continue;
            }

            for req in &descriptor.requires {
                let Some(target) = self.graph.id_of(&req.module) else {
                    continue;
                };
                if providers.iter().any(|p| self.graph.implies(target, *p)) {
                    records.push(record(ConflictSite::Requires {
                        module: req.module.clone(),
                        path: descriptor.descriptor_path.clone(),
                        span: req.span,
                    }));
                }
            }

            for unit in &descriptor.units {
                for reference in unit.references.iter().filter(|r| r.name.package() == package) {
                    records.push(record(ConflictSite::Reference {
                        type_name: reference.name.clone(),
                        path: unit.path.clone(),
                        span: reference.span,
                    }));
                }
            }
        }

        records
    }
}
