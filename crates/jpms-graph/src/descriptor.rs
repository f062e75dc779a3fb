use std::path::{Path, PathBuf};

use indexmap::{IndexMap, IndexSet};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::automatic::{AutomaticNameSource, automatic_module_name};
use crate::declaration::{
    CompilationUnit, ModuleOrigin, ModuleSource, PackageDirective, ProvidesDirective,
    RequiresDirective, UsesDirective,
};
use crate::diagnostic::{Diagnostic, DiagnosticKind, Location};
use crate::error::{GraphError, Result};
use crate::name::{ModuleName, PackageName, TypeName};
use crate::span::SourceSpan;
use crate::version::ModuleVersion;

/// How a module came into being.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleKind {
    /// Declared by a `module-info`.
    Explicit,
    /// Synthesized for a plain JAR on the module path.
    Automatic,
    /// The class path.
    Unnamed,
}

/// Resolved view of one module's declarations.
///
/// Packages are only those with at least one successfully associated
/// compilation unit, in order of first appearance. Export and open queries
/// here only look at the descriptor itself; command-line grants are layered
/// on top by [`crate::ModuleGraph`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleDescriptor {
    pub name: ModuleName,
    pub kind: ModuleKind,
    pub origin: ModuleOrigin,
    pub open: bool,
    pub deprecated: bool,
    pub version: Option<ModuleVersion>,
    /// Set for automatic modules only.
    pub automatic_name_source: Option<AutomaticNameSource>,
    pub name_span: SourceSpan,
    pub requires: Vec<RequiresDirective>,
    pub exports: Vec<PackageDirective>,
    pub opens: Vec<PackageDirective>,
    pub uses: Vec<UsesDirective>,
    pub provides: Vec<ProvidesDirective>,
    pub packages: IndexMap<PackageName, IndexSet<TypeName>>,
    /// `module-info.java`, the JAR file name, or empty for the unnamed module.
    pub descriptor_path: PathBuf,
    pub units: Vec<CompilationUnit>,
}

impl ModuleDescriptor {
    /// Materializes a descriptor from one enumerated module path entry.
    pub fn from_source(source: ModuleSource) -> Result<Self> {
        let ModuleSource {
            origin,
            declaration,
            jar,
            descriptor_path,
            expected_name,
            units,
        } = source;

        let packages = index_packages(&units);

        if let Some(decl) = declaration {
            match expected_name {
                Some(expected) if expected != decl.name.as_str() => {
                    return Err(GraphError::ModuleNameMismatch {
                        found: decl.name,
                        expected,
                    });
                }
                _ => {}
            }
            let descriptor_path = descriptor_path.unwrap_or_else(|| {
                PathBuf::from(decl.name.as_str()).join("module-info.java")
            });
            return Ok(Self {
                name: decl.name,
                kind: ModuleKind::Explicit,
                origin,
                open: decl.open,
                deprecated: decl.deprecated,
                version: decl.version,
                automatic_name_source: None,
                name_span: decl.name_span,
                requires: decl.requires,
                exports: decl.exports,
                opens: decl.opens,
                uses: decl.uses,
                provides: decl.provides,
                packages,
                descriptor_path,
                units,
            });
        }

        let Some(jar) = jar else {
            let label = descriptor_path
                .as_deref()
                .map(|p| p.display().to_string())
                .or(expected_name)
                .unwrap_or_else(|| "<unknown>".to_string());
            return Err(GraphError::MissingDescriptor(label));
        };

        let derived = automatic_module_name(&jar)?;
        Ok(Self {
            name: derived.name,
            kind: ModuleKind::Automatic,
            origin,
            open: true,
            deprecated: false,
            version: derived
                .version
                .and_then(|v| ModuleVersion::parse(&v).ok()),
            automatic_name_source: Some(derived.source),
            name_span: SourceSpan::zero(),
            requires: Vec::new(),
            exports: Vec::new(),
            opens: Vec::new(),
            uses: Vec::new(),
            provides: Vec::new(),
            packages,
            descriptor_path: PathBuf::from(jar.file_name),
            units,
        })
    }

    /// The module holding every class path compilation unit.
    pub fn unnamed(units: Vec<CompilationUnit>) -> Self {
        Self {
            name: ModuleName::unnamed(),
            kind: ModuleKind::Unnamed,
            origin: ModuleOrigin::Source,
            open: true,
            deprecated: false,
            version: None,
            automatic_name_source: None,
            name_span: SourceSpan::zero(),
            requires: Vec::new(),
            exports: Vec::new(),
            opens: Vec::new(),
            uses: Vec::new(),
            provides: Vec::new(),
            packages: index_packages(&units),
            descriptor_path: PathBuf::new(),
            units,
        }
    }

    pub fn is_explicit(&self) -> bool {
        self.kind == ModuleKind::Explicit
    }

    pub fn is_automatic(&self) -> bool {
        self.kind == ModuleKind::Automatic
    }

    pub fn is_unnamed(&self) -> bool {
        self.kind == ModuleKind::Unnamed
    }

    pub fn descriptor_path(&self) -> &Path {
        &self.descriptor_path
    }

    pub fn contains_package(&self, package: &PackageName) -> bool {
        self.packages.contains_key(package)
    }

    pub fn declares_type(&self, type_name: &TypeName) -> bool {
        self.packages
            .get(&type_name.package())
            .is_some_and(|types| types.contains(type_name))
    }

    /// Declared export of `package` to `reader`. Automatic and unnamed
    /// modules export every package they contain.
    pub fn exports_to(&self, package: &PackageName, reader: &ModuleName) -> bool {
        if !self.is_explicit() {
            return self.contains_package(package);
        }
        grants(&self.exports, package, reader)
    }

    /// True when `package` is exported to every module.
    pub fn exports_unqualified(&self, package: &PackageName) -> bool {
        if !self.is_explicit() {
            return self.contains_package(package);
        }
        self.exports
            .iter()
            .any(|e| e.package == *package && e.to.is_empty())
    }

    pub fn is_exported(&self, package: &PackageName) -> bool {
        if !self.is_explicit() {
            return self.contains_package(package);
        }
        self.exports.iter().any(|e| e.package == *package)
    }

    /// Declared deep-reflective access to `package` for `reader`.
    pub fn opens_to(&self, package: &PackageName, reader: &ModuleName) -> bool {
        if self.open || !self.is_explicit() {
            return self.contains_package(package);
        }
        grants(&self.opens, package, reader)
    }

    pub fn requires_clause(&self, module: &ModuleName) -> Option<&RequiresDirective> {
        self.requires.iter().find(|r| r.module == *module)
    }

    fn location(&self, span: SourceSpan) -> Location {
        Location::new(self.descriptor_path.clone(), span)
    }

    /// Checks that need nothing but the descriptor itself. Only modules
    /// compiled in this run are checked; binary modules were checked when
    /// they were built.
    pub fn validate(&self) -> Vec<Diagnostic> {
        if !self.is_explicit() || self.origin != ModuleOrigin::Source {
            return Vec::new();
        }
        let mut out = Vec::new();
        let mut emit = |kind: DiagnosticKind, span: SourceSpan| {
            out.push(Diagnostic::new(kind, self.name.clone(), self.location(span)));
        };

        let mut seen = FxHashSet::default();
        for req in &self.requires {
            if !seen.insert(&req.module) {
                emit(
                    DiagnosticKind::DuplicateRequires {
                        module: req.module.clone(),
                    },
                    req.span,
                );
            }
        }

        let mut seen = FxHashSet::default();
        for export in &self.exports {
            if !seen.insert(&export.package) {
                emit(
                    DiagnosticKind::DuplicateExports {
                        package: export.package.clone(),
                    },
                    export.span,
                );
            } else if !self.contains_package(&export.package) {
                emit(
                    DiagnosticKind::EmptyPackage {
                        package: export.package.clone(),
                    },
                    export.span,
                );
            }
        }

        let mut seen = FxHashSet::default();
        for opens in &self.opens {
            if self.open {
                emit(
                    DiagnosticKind::OpensInOpenModule {
                        module: self.name.clone(),
                    },
                    opens.span,
                );
            } else if !seen.insert(&opens.package) {
                emit(
                    DiagnosticKind::DuplicateOpens {
                        package: opens.package.clone(),
                    },
                    opens.span,
                );
            } else if !self.contains_package(&opens.package) {
                emit(
                    DiagnosticKind::EmptyPackage {
                        package: opens.package.clone(),
                    },
                    opens.span,
                );
            }
        }

        for provides in &self.provides {
            let mut seen = FxHashSet::default();
            for implementation in &provides.with {
                if !seen.insert(implementation) {
                    emit(
                        DiagnosticKind::DuplicateProvider {
                            service: provides.service.clone(),
                            implementation: implementation.clone(),
                        },
                        provides.span,
                    );
                } else if !self.declares_type(implementation) {
                    emit(
                        DiagnosticKind::ProviderNotInModule {
                            implementation: implementation.clone(),
                        },
                        provides.span,
                    );
                }
            }
        }

        out
    }
}

fn grants(directives: &[PackageDirective], package: &PackageName, reader: &ModuleName) -> bool {
    directives
        .iter()
        .filter(|d| d.package == *package)
        .any(|d| d.to.is_empty() || d.to.contains(reader))
}

fn index_packages(units: &[CompilationUnit]) -> IndexMap<PackageName, IndexSet<TypeName>> {
    let mut packages: IndexMap<PackageName, IndexSet<TypeName>> = IndexMap::new();
    for unit in units.iter().filter(|u| u.is_associated()) {
        let types = packages.entry(unit.package.clone()).or_default();
        for ty in &unit.types {
            match TypeName::in_package(&unit.package, &ty.name) {
                Ok(name) => {
                    types.insert(name);
                }
                Err(err) => tracing::debug!("skipping type in {}: {err}", unit.path.display()),
            }
        }
    }
    packages
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::declaration::{DeclaredType, JarInfo, ModuleDeclaration};

    fn unit(path: &str, package: &str, types: &[&str]) -> CompilationUnit {
        let mut unit = CompilationUnit::new(path, PackageName::new(package).unwrap());
        unit.types = types.iter().map(|t| DeclaredType::public(*t)).collect();
        unit
    }

    fn export(package: &str, to: &[&str]) -> PackageDirective {
        PackageDirective {
            package: PackageName::new(package).unwrap(),
            to: to.iter().map(|m| ModuleName::new(m).unwrap()).collect(),
            span: SourceSpan::new(2, 2, 9),
        }
    }

    fn explicit(decl: ModuleDeclaration, units: Vec<CompilationUnit>) -> ModuleDescriptor {
        ModuleDescriptor::from_source(ModuleSource {
            declaration: Some(decl),
            units,
            ..ModuleSource::default()
        })
        .unwrap()
    }

    #[test]
    fn expected_name_mismatch_is_fatal() {
        let source = ModuleSource {
            declaration: Some(ModuleDeclaration::new(ModuleName::new("mod.one").unwrap())),
            expected_name: Some("mod.uno".to_string()),
            ..ModuleSource::default()
        };
        let err = ModuleDescriptor::from_source(source).unwrap_err();
        assert_eq!(
            err.to_string(),
            "module name mod.one does not match expected name mod.uno"
        );
    }

    #[test]
    fn qualified_exports_only_reach_their_audience() {
        let mut decl = ModuleDeclaration::new(ModuleName::new("mod.one").unwrap());
        decl.exports.push(export("p", &["mod.two"]));
        let module = explicit(decl, vec![unit("mod.one/p/X.java", "p", &["X"])]);

        let p = PackageName::new("p").unwrap();
        assert!(module.exports_to(&p, &ModuleName::new("mod.two").unwrap()));
        assert!(!module.exports_to(&p, &ModuleName::new("mod.three").unwrap()));
        assert!(!module.exports_unqualified(&p));
        assert!(!module.opens_to(&p, &ModuleName::new("mod.two").unwrap()));
    }

    #[test]
    fn exporting_an_empty_package_is_reported() {
        let mut decl = ModuleDeclaration::new(ModuleName::new("mod.one").unwrap());
        decl.exports.push(export("p", &[]));
        decl.exports.push(export("q", &[]));
        decl.exports.push(export("p", &[]));
        let mut mismatched = unit("mod.one/q/Y.java", "q", &["Y"]);
        mismatched.directory_package = Some(PackageName::new("r").unwrap());
        let module = explicit(
            decl,
            vec![unit("mod.one/p/X.java", "p", &["X"]), mismatched, unit("mod.one/p/E.java", "p", &[])],
        );

        let codes: Vec<_> = module.validate().iter().map(|d| d.kind.code()).collect();
        assert_eq!(codes, vec!["empty-package", "duplicate-exports"]);
    }

    #[test]
    fn open_module_rejects_opens_directives() {
        let mut decl = ModuleDeclaration::new(ModuleName::new("mod.one").unwrap());
        decl.open = true;
        decl.opens.push(export("p", &[]));
        let module = explicit(decl, vec![unit("mod.one/p/X.java", "p", &["X"])]);

        let diagnostics = module.validate();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(
            diagnostics[0].message(),
            "opens statement is not allowed, as module mod.one is declared open"
        );
        assert!(module.opens_to(&PackageName::new("p").unwrap(), &ModuleName::unnamed()));
    }

    #[test]
    fn providers_must_live_in_the_module() {
        let mut decl = ModuleDeclaration::new(ModuleName::new("mod.one").unwrap());
        decl.provides.push(ProvidesDirective {
            service: TypeName::new("s.Service").unwrap(),
            with: vec![
                TypeName::new("p.Impl").unwrap(),
                TypeName::new("q.Elsewhere").unwrap(),
                TypeName::new("p.Impl").unwrap(),
            ],
            span: SourceSpan::new(3, 2, 40),
        });
        let module = explicit(decl, vec![unit("mod.one/p/Impl.java", "p", &["Impl"])]);

        let codes: Vec<_> = module.validate().iter().map(|d| d.kind.code()).collect();
        assert_eq!(codes, vec!["provider-not-in-module", "duplicate-provider"]);
    }

    #[test]
    fn jar_becomes_automatic_module_exporting_everything() {
        let source = ModuleSource {
            origin: ModuleOrigin::Jar,
            jar: Some(JarInfo {
                file_name: "lib1-1.0.jar".to_string(),
                manifest_name: None,
            }),
            units: vec![unit("lib1/X.class", "lib1", &["X"])],
            ..ModuleSource::default()
        };
        let module = ModuleDescriptor::from_source(source).unwrap();
        assert_eq!(module.name.as_str(), "lib1");
        assert!(module.is_automatic());
        assert_eq!(module.version.as_ref().map(ToString::to_string).as_deref(), Some("1.0"));
        assert_eq!(module.automatic_name_source, Some(AutomaticNameSource::FileName));

        let pkg = PackageName::new("lib1").unwrap();
        assert!(module.exports_unqualified(&pkg));
        assert!(module.opens_to(&pkg, &ModuleName::unnamed()));
        assert!(module.validate().is_empty());
    }

    #[test]
    fn source_without_declaration_or_jar_is_fatal() {
        let err = ModuleDescriptor::from_source(ModuleSource::default()).unwrap_err();
        assert!(matches!(err, GraphError::MissingDescriptor(_)));
    }
}
