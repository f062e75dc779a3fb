//! Accumulated resolution diagnostics.
//!
//! Diagnostics carry a structured [`DiagnosticKind`] plus a location; the
//! human readable message is produced by `Display` and is a presentation
//! concern. Unlike [`crate::GraphError`], diagnostics never abort analysis:
//! they are collected into a [`DiagnosticReport`] and flushed together.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::declaration::ReferenceKind;
use crate::name::{ModuleName, PackageName, TypeName};
use crate::span::SourceSpan;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error => f.write_str("ERROR"),
            Self::Warning => f.write_str("WARNING"),
        }
    }
}

/// What went wrong, with the names needed to render a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum DiagnosticKind {
    DuplicateRequires {
        module: ModuleName,
    },
    DuplicateExports {
        package: PackageName,
    },
    DuplicateOpens {
        package: PackageName,
    },
    OpensInOpenModule {
        module: ModuleName,
    },
    /// `exports`/`opens` of a package with no successfully associated unit.
    EmptyPackage {
        package: PackageName,
    },
    DuplicateProvider {
        service: TypeName,
        implementation: TypeName,
    },
    ProviderNotInModule {
        implementation: TypeName,
    },
    /// Readable module contains the package but does not export it.
    TypeNotExported {
        type_name: TypeName,
        owner: ModuleName,
        reader: ModuleName,
    },
    /// Package exists only in modules the reader does not read.
    TypeNotReadable {
        type_name: TypeName,
        owner: ModuleName,
        reader: ModuleName,
    },
    TypeMissing {
        type_name: TypeName,
        reference: ReferenceKind,
    },
    PackageAccessibleFromMultipleModules {
        package: PackageName,
        modules: Vec<ModuleName>,
    },
    PackageConflictsWithOwn {
        package: PackageName,
        modules: Vec<ModuleName>,
    },
    MissingRequiresTransitive {
        type_name: TypeName,
        module: ModuleName,
    },
    NotExportedFromModule {
        type_name: TypeName,
    },
    NotAccessibleToClients {
        type_name: TypeName,
    },
    DeprecatedModule {
        module: ModuleName,
    },
    UnstableAutomaticModuleName {
        module: ModuleName,
    },
}

impl DiagnosticKind {
    /// Codes of the kinds that default to [`Severity::Warning`]; only these
    /// accept a [`SeverityPolicy`] override.
    pub const WARNING_CODES: &'static [&'static str] = &[
        "api-leak",
        "api-not-exported",
        "api-not-accessible",
        "deprecated-module",
        "unstable-automatic-module-name",
    ];

    /// Stable identifier used by [`SeverityPolicy`] overrides.
    pub fn code(&self) -> &'static str {
        match self {
            Self::DuplicateRequires { .. } => "duplicate-requires",
            Self::DuplicateExports { .. } => "duplicate-exports",
            Self::DuplicateOpens { .. } => "duplicate-opens",
            Self::OpensInOpenModule { .. } => "opens-in-open-module",
            Self::EmptyPackage { .. } => "empty-package",
            Self::DuplicateProvider { .. } => "duplicate-provider",
            Self::ProviderNotInModule { .. } => "provider-not-in-module",
            Self::TypeNotExported { .. } => "type-not-exported",
            Self::TypeNotReadable { .. } => "type-not-readable",
            Self::TypeMissing { .. } => "type-missing",
            Self::PackageAccessibleFromMultipleModules { .. } => "package-conflict",
            Self::PackageConflictsWithOwn { .. } => "own-package-conflict",
            Self::MissingRequiresTransitive { .. } => "api-leak",
            Self::NotExportedFromModule { .. } => "api-not-exported",
            Self::NotAccessibleToClients { .. } => "api-not-accessible",
            Self::DeprecatedModule { .. } => "deprecated-module",
            Self::UnstableAutomaticModuleName { .. } => "unstable-automatic-module-name",
        }
    }

    pub fn default_severity(&self) -> Severity {
        match self {
            Self::MissingRequiresTransitive { .. }
            | Self::NotExportedFromModule { .. }
            | Self::NotAccessibleToClients { .. }
            | Self::DeprecatedModule { .. }
            | Self::UnstableAutomaticModuleName { .. } => Severity::Warning,
            _ => Severity::Error,
        }
    }
}

fn describe_module(name: &ModuleName) -> String {
    if name.is_unnamed() {
        "the unnamed module".to_string()
    } else {
        format!("module {name}")
    }
}

fn join(modules: &[ModuleName]) -> String {
    modules
        .iter()
        .map(ModuleName::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateRequires { module } => write!(f, "Duplicate requires entry: {module}"),
            Self::DuplicateExports { package } => write!(f, "Duplicate exports entry: {package}"),
            Self::DuplicateOpens { package } => write!(f, "Duplicate opens entry: {package}"),
            Self::OpensInOpenModule { module } => write!(
                f,
                "opens statement is not allowed, as module {module} is declared open"
            ),
            Self::EmptyPackage { package } => {
                write!(f, "The package {package} does not exist or is empty")
            }
            Self::DuplicateProvider {
                service,
                implementation,
            } => write!(
                f,
                "Duplicate service entry: {implementation} for service {service}"
            ),
            Self::ProviderNotInModule { implementation } => write!(
                f,
                "The service implementation {implementation} must be defined in the same module as the provides directive"
            ),
            Self::TypeNotExported {
                type_name,
                owner,
                reader,
            } => write!(
                f,
                "The type {type_name} is not accessible: package {} is declared in module {owner}, which does not export it to {}",
                type_name.package(),
                describe_module(reader)
            ),
            Self::TypeNotReadable {
                type_name,
                owner,
                reader,
            } => write!(
                f,
                "The type {type_name} cannot be resolved: package {} is declared in module {owner}, but {} does not read it",
                type_name.package(),
                describe_module(reader)
            ),
            Self::TypeMissing {
                type_name,
                reference: ReferenceKind::Import,
            } => write!(f, "The import {type_name} cannot be resolved"),
            Self::TypeMissing {
                type_name,
                reference: ReferenceKind::Qualified,
            } => write!(f, "{type_name} cannot be resolved to a type"),
            Self::PackageAccessibleFromMultipleModules { package, modules } => write!(
                f,
                "The package {package} is accessible from more than one module: {}",
                join(modules)
            ),
            Self::PackageConflictsWithOwn { package, modules } => write!(
                f,
                "The package {package} conflicts with a package accessible from another module: {}",
                join(modules)
            ),
            Self::MissingRequiresTransitive { type_name, module } => write!(
                f,
                "The type {type_name} from module {module} may not be accessible to clients due to missing 'requires transitive'"
            ),
            Self::NotExportedFromModule { type_name } => {
                write!(f, "The type {type_name} is not exported from this module")
            }
            Self::NotAccessibleToClients { type_name } => write!(
                f,
                "The type {type_name} is not accessible to clients that require this module"
            ),
            Self::DeprecatedModule { module } => {
                write!(f, "The module {module} has been deprecated")
            }
            Self::UnstableAutomaticModuleName { module } => write!(
                f,
                "Name of automatic module '{module}' is unstable, it is derived from the module's file name."
            ),
        }
    }
}

/// File and position a diagnostic is attached to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    pub path: PathBuf,
    pub span: SourceSpan,
}

impl Location {
    pub fn new(path: impl Into<PathBuf>, span: SourceSpan) -> Self {
        Self {
            path: path.into(),
            span,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub severity: Severity,
    /// Module whose sources the diagnostic belongs to.
    pub module: ModuleName,
    pub location: Location,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, module: ModuleName, location: Location) -> Self {
        Self {
            severity: kind.default_severity(),
            kind,
            module,
            location,
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    pub fn message(&self) -> String {
        self.kind.to_string()
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} in {}", self.severity, self.location.path.display())?;
        if self.location.span.is_known() {
            write!(f, " (at line {})", self.location.span.line)?;
        }
        write!(f, ": {}", self.kind)
    }
}

/// Per-kind severity override.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Error,
    Warning,
    Ignore,
}

/// Decides the final severity of each diagnostic. Only warnings can be
/// promoted or silenced; errors always stay errors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityPolicy {
    #[serde(default)]
    pub warnings_as_errors: bool,
    /// Keyed by [`DiagnosticKind::code`].
    #[serde(default)]
    pub overrides: BTreeMap<String, Level>,
}

impl SeverityPolicy {
    pub fn apply(&self, mut diagnostic: Diagnostic) -> Option<Diagnostic> {
        if diagnostic.kind.default_severity() == Severity::Error {
            return Some(diagnostic);
        }
        match self.overrides.get(diagnostic.kind.code()) {
            Some(Level::Ignore) => return None,
            Some(Level::Error) => diagnostic.severity = Severity::Error,
            Some(Level::Warning) => diagnostic.severity = Severity::Warning,
            None if self.warnings_as_errors => diagnostic.severity = Severity::Error,
            None => {}
        }
        Some(diagnostic)
    }
}

/// All diagnostics of one compilation, in reporting order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosticReport {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn extend(&mut self, diagnostics: impl IntoIterator<Item = Diagnostic>) {
        self.diagnostics.extend(diagnostics);
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_error()).count()
    }

    pub fn warning_count(&self) -> usize {
        self.len() - self.error_count()
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    /// Diagnostics of a given kind code, handy for assertions.
    pub fn with_code<'a>(&'a self, code: &'a str) -> impl Iterator<Item = &'a Diagnostic> + 'a {
        self.diagnostics.iter().filter(move |d| d.kind.code() == code)
    }

    /// Batch-compiler summary line, e.g. `3 problems (2 errors, 1 warning)`.
    /// `None` when nothing was reported.
    pub fn summary(&self) -> Option<String> {
        if self.is_empty() {
            return None;
        }
        let plural = |n: usize, word: &str| {
            if n == 1 {
                format!("{n} {word}")
            } else {
                format!("{n} {word}s")
            }
        };
        let mut parts = Vec::new();
        if self.error_count() > 0 {
            parts.push(plural(self.error_count(), "error"));
        }
        if self.warning_count() > 0 {
            parts.push(plural(self.warning_count(), "warning"));
        }
        Some(format!(
            "{} ({})",
            plural(self.len(), "problem"),
            parts.join(", ")
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn module(name: &str) -> ModuleName {
        ModuleName::new(name).unwrap()
    }

    fn leak() -> Diagnostic {
        Diagnostic::new(
            DiagnosticKind::MissingRequiresTransitive {
                type_name: TypeName::new("q.Y").unwrap(),
                module: module("mod.one"),
            },
            module("mod.two"),
            Location::new("mod.two/p/X.java", SourceSpan::new(3, 9, 3)),
        )
    }

    fn conflict() -> Diagnostic {
        Diagnostic::new(
            DiagnosticKind::PackageAccessibleFromMultipleModules {
                package: PackageName::new("p").unwrap(),
                modules: vec![module("mod.one"), module("mod.two"), module("mod.x")],
            },
            module("mod.three"),
            Location::new("mod.three/module-info.java", SourceSpan::new(2, 2, 16)),
        )
    }

    #[test]
    fn renders_conflict_with_provider_list() {
        assert_eq!(
            conflict().message(),
            "The package p is accessible from more than one module: mod.one, mod.two, mod.x"
        );
    }

    #[test]
    fn summary_matches_batch_wording() {
        let mut report = DiagnosticReport::new();
        assert_eq!(report.summary(), None);

        report.push(conflict());
        assert_eq!(report.summary().unwrap(), "1 problem (1 error)");

        report.push(leak());
        assert_eq!(report.summary().unwrap(), "2 problems (1 error, 1 warning)");

        report.push(leak());
        assert_eq!(
            report.summary().unwrap(),
            "3 problems (1 error, 2 warnings)"
        );
    }

    #[test]
    fn policy_promotes_and_silences_warnings_only() {
        assert!(DiagnosticKind::WARNING_CODES.contains(&leak().kind.code()));
        assert!(!DiagnosticKind::WARNING_CODES.contains(&conflict().kind.code()));

        let mut policy = SeverityPolicy::default();
        assert_eq!(policy.apply(leak()).unwrap().severity, Severity::Warning);

        policy.warnings_as_errors = true;
        assert_eq!(policy.apply(leak()).unwrap().severity, Severity::Error);

        policy
            .overrides
            .insert("api-leak".to_string(), Level::Ignore);
        assert!(policy.apply(leak()).is_none());

        policy
            .overrides
            .insert("package-conflict".to_string(), Level::Ignore);
        assert!(policy.apply(conflict()).is_some(), "errors cannot be silenced");
    }

    #[test]
    fn unnamed_reader_is_described_in_words() {
        let kind = DiagnosticKind::TypeNotExported {
            type_name: TypeName::new("p.X").unwrap(),
            owner: module("mod.one"),
            reader: ModuleName::unnamed(),
        };
        assert!(kind.to_string().ends_with("does not export it to the unnamed module"));
    }
}
