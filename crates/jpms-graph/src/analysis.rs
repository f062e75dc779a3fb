//! One full resolution pass: fatal configuration checks first, then the
//! accumulated per-module diagnostics.

use std::sync::Arc;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::automatic::AutomaticNameSource;
use crate::conflict::ConflictChecker;
use crate::declaration::{ModuleOrigin, ProjectInput, ReferenceKind};
use crate::descriptor::ModuleDescriptor;
use crate::diagnostic::{Diagnostic, DiagnosticKind, DiagnosticReport, Location, SeverityPolicy};
use crate::directive::{AddReads, PackageGrant};
use crate::error::Result;
use crate::graph::ModuleGraph;
use crate::leak::leak_warnings_for;
use crate::name::{ModuleName, TypeName};
use crate::span::SourceSpan;
use crate::universe::{ModuleId, ModuleUniverse};
use crate::visibility::{Resolution, VisibilityResolver};

/// Directives and policy for one analysis run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisOptions {
    #[serde(default)]
    pub add_reads: Vec<AddReads>,
    /// `--add-exports` and `--add-opens`.
    #[serde(default)]
    pub grants: Vec<PackageGrant>,
    #[serde(default)]
    pub limit_modules: Vec<ModuleName>,
    #[serde(default)]
    pub policy: SeverityPolicy,
}

#[derive(Debug, Clone)]
pub struct AnalysisOutcome {
    pub graph: Arc<ModuleGraph>,
    pub report: DiagnosticReport,
}

#[derive(Debug, Clone, Default)]
pub struct Analyzer {
    options: AnalysisOptions,
}

impl Analyzer {
    pub fn new(options: AnalysisOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &AnalysisOptions {
        &self.options
    }

    /// Builds the graph for `input`, failing on the first configuration
    /// error, then collects every resolution diagnostic.
    pub fn analyze(&self, input: ProjectInput) -> Result<AnalysisOutcome> {
        let graph = Arc::new(self.build_graph(input)?);
        let report = self.check(&graph);
        Ok(AnalysisOutcome { graph, report })
    }

    /// Only the fatal half of [`Analyzer::analyze`]: the graph with every
    /// directive applied, without per-module checks.
    pub fn build_graph(&self, input: ProjectInput) -> Result<ModuleGraph> {
        let universe = ModuleUniverse::from_input(input)?;
        ModuleGraph::builder(universe)
            .add_reads(self.options.add_reads.iter().cloned())
            .grants(self.options.grants.iter().cloned())
            .limit_modules(self.options.limit_modules.iter().cloned())
            .build()
    }

    /// Runs every per-module check against a built graph. Modules are
    /// checked in parallel; the report keeps universe order.
    pub fn check(&self, graph: &ModuleGraph) -> DiagnosticReport {
        let ids: Vec<ModuleId> = graph.universe().ids().collect();
        let per_module: Vec<Vec<Diagnostic>> = ids
            .par_iter()
            .map(|id| ModuleChecks::new(graph, *id).run())
            .collect();

        let mut report = DiagnosticReport::new();
        for diagnostic in per_module.into_iter().flatten() {
            if let Some(diagnostic) = self.options.policy.apply(diagnostic) {
                report.push(diagnostic);
            }
        }
        tracing::debug!(
            "analysis finished: {} errors, {} warnings",
            report.error_count(),
            report.warning_count()
        );
        report
    }
}

struct ModuleChecks<'g> {
    graph: &'g ModuleGraph,
    id: ModuleId,
    descriptor: &'g ModuleDescriptor,
    resolver: VisibilityResolver<'g>,
    out: Vec<Diagnostic>,
}

impl<'g> ModuleChecks<'g> {
    fn new(graph: &'g ModuleGraph, id: ModuleId) -> Self {
        Self {
            graph,
            id,
            descriptor: graph.descriptor(id),
            resolver: VisibilityResolver::new(graph),
            out: Vec::new(),
        }
    }

    fn run(mut self) -> Vec<Diagnostic> {
        if self.descriptor.origin != ModuleOrigin::Source {
            return self.out;
        }
        self.out.extend(self.descriptor.validate());
        self.check_required_modules();
        self.check_services();
        self.out.extend(
            ConflictChecker::new(self.graph)
                .conflicts_for(self.id)
                .iter()
                .map(|record| record.to_diagnostic()),
        );
        self.check_references();
        self.out.extend(
            leak_warnings_for(self.graph, self.id)
                .iter()
                .map(|leak| leak.to_diagnostic()),
        );
        self.out
    }

    fn emit(&mut self, kind: DiagnosticKind, location: Location) {
        self.out
            .push(Diagnostic::new(kind, self.descriptor.name.clone(), location));
    }

    fn at_descriptor(&self, span: SourceSpan) -> Location {
        Location::new(self.descriptor.descriptor_path.clone(), span)
    }

    fn check_required_modules(&mut self) {
        let (graph, descriptor) = (self.graph, self.descriptor);
        for req in &descriptor.requires {
            let Some(target) = graph.universe().get(&req.module) else {
                continue;
            };
            if target.deprecated {
                self.emit(
                    DiagnosticKind::DeprecatedModule {
                        module: req.module.clone(),
                    },
                    self.at_descriptor(req.span),
                );
            }
            if target.automatic_name_source == Some(AutomaticNameSource::FileName) {
                self.emit(
                    DiagnosticKind::UnstableAutomaticModuleName {
                        module: req.module.clone(),
                    },
                    self.at_descriptor(req.span),
                );
            }
        }
    }

    fn check_services(&mut self) {
        let services: Vec<(TypeName, SourceSpan)> = self
            .descriptor
            .uses
            .iter()
            .map(|u| (u.service.clone(), u.span))
            .chain(
                self.descriptor
                    .provides
                    .iter()
                    .map(|p| (p.service.clone(), p.span)),
            )
            .collect();
        for (service, span) in services {
            let location = self.at_descriptor(span);
            self.report_resolution(&service, ReferenceKind::Qualified, location, true);
        }
    }

    /// Conflicts at references are already reported by the conflict checker.
    fn check_references(&mut self) {
        let mut pending = Vec::new();
        for unit in &self.descriptor.units {
            for reference in &unit.references {
                pending.push((
                    reference.name.clone(),
                    reference.kind,
                    Location::new(unit.path.clone(), reference.span),
                ));
            }
        }
        for (type_name, kind, location) in pending {
            self.report_resolution(&type_name, kind, location, false);
        }
    }

    fn report_resolution(
        &mut self,
        type_name: &TypeName,
        reference: ReferenceKind,
        location: Location,
        report_conflicts: bool,
    ) {
        let kind = match self.resolver.resolve(self.id, type_name) {
            Resolution::Accessible { .. } => return,
            Resolution::NotExported { module } => DiagnosticKind::TypeNotExported {
                type_name: type_name.clone(),
                owner: self.graph.name(module).clone(),
                reader: self.descriptor.name.clone(),
            },
            Resolution::NoReadEdge { module } => DiagnosticKind::TypeNotReadable {
                type_name: type_name.clone(),
                owner: self.graph.name(module).clone(),
                reader: self.descriptor.name.clone(),
            },
            Resolution::Conflict { providers } if report_conflicts => {
                DiagnosticKind::PackageAccessibleFromMultipleModules {
                    package: type_name.package(),
                    modules: providers.iter().map(|m| self.graph.name(*m).clone()).collect(),
                }
            }
            Resolution::Conflict { .. } => return,
            Resolution::Missing => DiagnosticKind::TypeMissing {
                type_name: type_name.clone(),
                reference,
            },
        };
        self.emit(kind, location);
    }
}
