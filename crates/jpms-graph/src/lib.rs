//! # jpms-graph
//!
//! Module resolution for a module-aware Java compiler front end: the
//! readability graph, type accessibility, split-package conflicts and
//! API-leak detection.
//!
//! ## Overview
//!
//! The crate works on already-parsed input ([`ProjectInput`]) and performs
//! no I/O. It provides:
//!
//! - **Descriptors**: [`ModuleDescriptor`] built from `module-info`
//!   declarations or synthesized for plain JARs (automatic modules)
//! - **Graph**: [`ModuleGraph`], an immutable arena of modules with memoized
//!   readable sets, built by [`GraphBuilder`] from the universe plus
//!   `--add-reads`/`--add-exports`/`--add-opens`/`--limit-modules`
//! - **Queries**: [`VisibilityResolver`], [`ConflictChecker`] and
//!   [`leak_warnings_for`]
//! - **Diagnostics**: structured [`Diagnostic`] values collected in a
//!   [`DiagnosticReport`]; configuration-fatal problems are [`GraphError`]s
//!
//! ## Architecture
//!
//! ```text
//!  ProjectInput ──► ModuleUniverse ──► GraphBuilder ──► ModuleGraph (Arc)
//!                    (descriptors)     (fatal checks)        │
//!                                                 ┌──────────┼──────────┐
//!                                                 ▼          ▼          ▼
//!                                           Visibility   Conflicts    Leaks
//!                                                 └──────────┼──────────┘
//!                                                            ▼
//!                                                   DiagnosticReport
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use jpms_graph::{AnalysisOptions, Analyzer, ProjectInput};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let input = ProjectInput::from_json(r#"{ "modules": [] }"#)?;
//! let outcome = Analyzer::new(AnalysisOptions::default()).analyze(input)?;
//! if let Some(summary) = outcome.report.summary() {
//!     println!("{summary}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod analysis;
pub mod attribute;
pub mod automatic;
pub mod conflict;
pub mod declaration;
pub mod descriptor;
pub mod diagnostic;
pub mod directive;
pub mod error;
pub mod leak;
pub mod name;
pub mod package_index;
pub mod readability;
pub mod span;
pub mod universe;
pub mod version;
pub mod visibility;

mod graph;

pub use analysis::{AnalysisOptions, AnalysisOutcome, Analyzer};
pub use attribute::ModuleAttribute;
pub use automatic::{AutomaticNameSource, DerivedName, automatic_module_name};
pub use conflict::{ConflictChecker, ConflictRecord, ConflictSite};
pub use declaration::{
    ApiExposure, CompilationUnit, DeclaredType, JarInfo, ModuleDeclaration, ModuleOrigin,
    ModuleSource, PackageDirective, ProjectInput, ProvidesDirective, ReferenceKind,
    RequiresDirective, TypeReference, UsesDirective,
};
pub use descriptor::{ModuleDescriptor, ModuleKind};
pub use diagnostic::{
    Diagnostic, DiagnosticKind, DiagnosticReport, Level, Location, Severity, SeverityPolicy,
};
pub use directive::{AddReads, GrantKind, ModuleTarget, PackageGrant};
pub use error::{GraphError, RequiresCycle, Result};
pub use graph::{
    EdgeSnapshot, GraphBuilder, GraphSnapshot, MAX_REQUIRES_PATH_DEPTH, ModuleGraph,
    ModuleSnapshot, RequiresPath,
};
pub use leak::{LeakKind, LeakWarning, leak_warnings_for};
pub use name::{ALL_UNNAMED, JAVA_BASE, ModuleName, NameError, PackageName, TypeName};
pub use package_index::PackageOwnershipIndex;
pub use readability::{EdgeOrigin, ReadEdge};
pub use span::SourceSpan;
pub use universe::{ModuleId, ModuleUniverse};
pub use version::{ModuleVersion, VersionError};
pub use visibility::{Resolution, VisibilityResolver};

#[cfg(test)]
mod tests;
