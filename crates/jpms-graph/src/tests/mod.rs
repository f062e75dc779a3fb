//! Scenario tests built from small declarative fixtures.

mod graph_tests;

use std::path::PathBuf;

use crate::{
    AnalysisOptions, AnalysisOutcome, Analyzer, ApiExposure, CompilationUnit, DeclaredType,
    JarInfo, ModuleDeclaration, ModuleGraph, ModuleId, ModuleName, ModuleOrigin, ModuleSource,
    ModuleUniverse, PackageDirective, PackageName, ProjectInput, ReferenceKind,
    RequiresDirective, SourceSpan, TypeName, TypeReference, UsesDirective,
};

pub(crate) fn name(value: &str) -> ModuleName {
    ModuleName::new(value).expect("valid module name")
}

pub(crate) fn ty(value: &str) -> TypeName {
    TypeName::new(value).expect("valid type name")
}

pub(crate) fn pkg(value: &str) -> PackageName {
    PackageName::new(value).expect("valid package name")
}

/// Fluent description of one module. Directives get consecutive lines of
/// `module-info.java`, starting at line 2.
pub(crate) struct ModuleFixture {
    decl: ModuleDeclaration,
    origin: ModuleOrigin,
    units: Vec<CompilationUnit>,
    line: u32,
}

pub(crate) fn module(value: &str) -> ModuleFixture {
    ModuleFixture {
        decl: ModuleDeclaration::new(name(value)),
        origin: ModuleOrigin::Source,
        units: Vec::new(),
        line: 1,
    }
}

impl ModuleFixture {
    fn next_span(&mut self, len: u32) -> SourceSpan {
        self.line += 1;
        SourceSpan::new(self.line, 2, len)
    }

    fn add_requires(mut self, target: &str, transitive: bool, static_phase: bool) -> Self {
        let span = self.next_span(9 + target.len() as u32);
        self.decl.requires.push(RequiresDirective {
            module: name(target),
            transitive,
            static_phase,
            span,
        });
        self
    }

    pub(crate) fn requires(self, target: &str) -> Self {
        self.add_requires(target, false, false)
    }

    pub(crate) fn requires_transitive(self, target: &str) -> Self {
        self.add_requires(target, true, false)
    }

    pub(crate) fn requires_static(self, target: &str) -> Self {
        self.add_requires(target, false, true)
    }

    pub(crate) fn exports(self, package: &str) -> Self {
        self.exports_to(package, &[])
    }

    pub(crate) fn exports_to(mut self, package: &str, to: &[&str]) -> Self {
        let span = self.next_span(8 + package.len() as u32);
        self.decl.exports.push(PackageDirective {
            package: pkg(package),
            to: to.iter().map(|m| name(m)).collect(),
            span,
        });
        self
    }

    pub(crate) fn opens(mut self, package: &str) -> Self {
        let span = self.next_span(6 + package.len() as u32);
        self.decl.opens.push(PackageDirective {
            package: pkg(package),
            to: Vec::new(),
            span,
        });
        self
    }

    pub(crate) fn uses(mut self, service: &str) -> Self {
        let span = self.next_span(5 + service.len() as u32);
        self.decl.uses.push(UsesDirective {
            service: ty(service),
            span,
        });
        self
    }

    pub(crate) fn open(mut self) -> Self {
        self.decl.open = true;
        self
    }

    pub(crate) fn deprecated(mut self) -> Self {
        self.decl.deprecated = true;
        self
    }

    /// Marks the module as already compiled (found on the module path).
    pub(crate) fn binary(mut self) -> Self {
        self.origin = ModuleOrigin::ModulePath;
        self
    }

    /// Adds one compilation unit declaring `types` in `package`.
    pub(crate) fn package(mut self, package: &str, types: &[&str]) -> Self {
        self.units.push(unit(self.decl.name.as_str(), package, types));
        self
    }

    /// Adds an import of `type_name` to the last compilation unit.
    pub(crate) fn imports(mut self, type_name: &str) -> Self {
        let last = self.units.last_mut().expect("a compilation unit to import from");
        let line = last.references.len() as u32 + 3;
        last.references.push(TypeReference {
            name: ty(type_name),
            kind: ReferenceKind::Import,
            span: SourceSpan::new(line, 8, type_name.len() as u32),
        });
        self
    }

    /// Adds a public member exposing `type_name` to the last unit.
    pub(crate) fn exposes(mut self, member: &str, type_name: &str) -> Self {
        let last = self.units.last_mut().expect("a compilation unit to expose from");
        let line = last.exposures.len() as u32 + 10;
        last.exposures.push(ApiExposure {
            member: member.to_string(),
            exposed: ty(type_name),
            span: SourceSpan::new(line, 9, type_name.len() as u32),
        });
        self
    }

    pub(crate) fn build(self) -> ModuleSource {
        let path = PathBuf::from(self.decl.name.as_str()).join("module-info.java");
        ModuleSource {
            origin: self.origin,
            declaration: Some(self.decl),
            jar: None,
            descriptor_path: Some(path),
            expected_name: None,
            units: self.units,
        }
    }
}

pub(crate) fn unit(root: &str, package: &str, types: &[&str]) -> CompilationUnit {
    let dir = package.replace('.', "/");
    let file = types.first().copied().unwrap_or("package-info");
    let mut unit = CompilationUnit::new(format!("{root}/{dir}/{file}.java"), pkg(package));
    unit.package_span = SourceSpan::new(1, 9, package.len() as u32);
    unit.types = types.iter().map(|t| DeclaredType::public(*t)).collect();
    unit
}

/// A plain JAR on the module path.
pub(crate) fn jar(file_name: &str, packages: &[(&str, &[&str])]) -> ModuleSource {
    ModuleSource {
        origin: ModuleOrigin::Jar,
        jar: Some(JarInfo {
            file_name: file_name.to_string(),
            manifest_name: None,
        }),
        units: packages
            .iter()
            .map(|(p, types)| unit(file_name, p, types))
            .collect(),
        ..ModuleSource::default()
    }
}

/// A binary `java.base` exporting `java.lang`.
pub(crate) fn java_base() -> ModuleSource {
    module("java.base")
        .binary()
        .exports("java.lang")
        .package("java.lang", &["Object", "String"])
        .build()
}

pub(crate) fn project(modules: Vec<ModuleSource>) -> ProjectInput {
    ProjectInput {
        modules,
        classpath: Vec::new(),
    }
}

pub(crate) fn build_graph(input: ProjectInput) -> ModuleGraph {
    let universe = ModuleUniverse::from_input(input).expect("valid universe");
    ModuleGraph::from_universe(universe).expect("graph builds")
}

pub(crate) fn analyze(input: ProjectInput, options: AnalysisOptions) -> AnalysisOutcome {
    Analyzer::new(options).analyze(input).expect("analysis succeeds")
}

pub(crate) fn id(graph: &ModuleGraph, value: &str) -> ModuleId {
    graph.id_of(&name(value)).expect("module in graph")
}

pub(crate) fn messages(outcome: &AnalysisOutcome) -> Vec<String> {
    outcome
        .report
        .diagnostics()
        .iter()
        .map(|d| d.message())
        .collect()
}
