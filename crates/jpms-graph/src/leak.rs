//! API leak detection.
//!
//! A public member of an exported package that mentions a type its
//! module's clients may not be able to see. These are warnings, never
//! accessibility errors.

use serde::{Deserialize, Serialize};

use crate::descriptor::ModuleDescriptor;
use crate::diagnostic::{Diagnostic, DiagnosticKind, Location};
use crate::graph::ModuleGraph;
use crate::name::{ModuleName, TypeName};
use crate::universe::ModuleId;
use crate::visibility::{Resolution, VisibilityResolver};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "leak", rename_all = "kebab-case")]
pub enum LeakKind {
    /// Owned by a module that clients do not read through a
    /// `requires transitive` edge.
    MissingRequiresTransitive { owner: ModuleName },
    /// Declared in this module, in a package it does not export.
    NotExported,
    /// Declared in this module, in a package exported only to some modules.
    NotAccessibleToClients,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeakWarning {
    pub module: ModuleName,
    pub member: String,
    pub exposed: TypeName,
    pub kind: LeakKind,
    pub location: Location,
}

impl LeakWarning {
    pub fn to_diagnostic(&self) -> Diagnostic {
        let kind = match &self.kind {
            LeakKind::MissingRequiresTransitive { owner } => {
                DiagnosticKind::MissingRequiresTransitive {
                    type_name: self.exposed.clone(),
                    module: owner.clone(),
                }
            }
            LeakKind::NotExported => DiagnosticKind::NotExportedFromModule {
                type_name: self.exposed.clone(),
            },
            LeakKind::NotAccessibleToClients => DiagnosticKind::NotAccessibleToClients {
                type_name: self.exposed.clone(),
            },
        };
        Diagnostic::new(kind, self.module.clone(), self.location.clone())
    }
}

/// True if clients of `declaring` that require it can read `owner`
/// without requiring it themselves.
fn is_indirectly_exported(graph: &ModuleGraph, declaring: ModuleId, owner: ModuleId) -> bool {
    graph
        .direct_reads(declaring)
        .iter()
        .filter(|(_, edge)| edge.transitive)
        .any(|(target, _)| graph.implies(*target, owner))
}

fn own_type_leak(
    descriptor: &ModuleDescriptor,
    unit_package_unqualified: bool,
    exposed: &TypeName,
) -> Option<LeakKind> {
    let package = exposed.package();
    if !descriptor.is_exported(&package) {
        return Some(LeakKind::NotExported);
    }
    if unit_package_unqualified && !descriptor.exports_unqualified(&package) {
        return Some(LeakKind::NotAccessibleToClients);
    }
    None
}

/// Leak warnings for every public API exposure in the exported packages
/// of `declaring`, in unit and exposure order.
pub fn leak_warnings_for(graph: &ModuleGraph, declaring: ModuleId) -> Vec<LeakWarning> {
    let descriptor = graph.descriptor(declaring);
    if !descriptor.is_explicit() {
        return Vec::new();
    }
    let resolver = VisibilityResolver::new(graph);
    let mut warnings = Vec::new();

    for unit in descriptor.units.iter().filter(|u| u.is_associated()) {
        if !descriptor.is_exported(&unit.package) {
            continue;
        }
        let unqualified = descriptor.exports_unqualified(&unit.package);

        for exposure in &unit.exposures {
            let exposed = &exposure.exposed;
            let kind = if descriptor.declares_type(exposed) {
                own_type_leak(descriptor, unqualified, exposed)
            } else {
                match resolver.resolve(declaring, exposed) {
                    Resolution::Accessible { module } => {
                        let owner = graph.descriptor(module);
                        if module == declaring
                            || owner.name.is_java_base()
                            || is_indirectly_exported(graph, declaring, module)
                        {
                            None
                        } else {
                            Some(LeakKind::MissingRequiresTransitive {
                                owner: owner.name.clone(),
                            })
                        }
                    }
                    _ => None,
                }
            };

            if let Some(kind) = kind {
                warnings.push(LeakWarning {
                    module: descriptor.name.clone(),
                    member: exposure.member.clone(),
                    exposed: exposed.clone(),
                    kind,
                    location: Location::new(unit.path.clone(), exposure.span),
                });
            }
        }
    }

    warnings
}
