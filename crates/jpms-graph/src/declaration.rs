//! Parsed input handed to the resolver by the front end.
//!
//! These types mirror what a Java parser produces for `module-info.java`
//! and for ordinary compilation units, reduced to what module resolution
//! needs. They deserialize from JSON or TOML so a project can be described
//! without running a parser.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::name::{ModuleName, PackageName, TypeName};
use crate::span::SourceSpan;
use crate::version::ModuleVersion;

/// A `module` declaration as written in `module-info.java`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleDeclaration {
    pub name: ModuleName,
    #[serde(default)]
    pub name_span: SourceSpan,
    /// `open module m { ... }`
    #[serde(default)]
    pub open: bool,
    /// Annotated with `@Deprecated`.
    #[serde(default)]
    pub deprecated: bool,
    #[serde(default)]
    pub version: Option<ModuleVersion>,
    #[serde(default)]
    pub requires: Vec<RequiresDirective>,
    #[serde(default)]
    pub exports: Vec<PackageDirective>,
    #[serde(default)]
    pub opens: Vec<PackageDirective>,
    #[serde(default)]
    pub uses: Vec<UsesDirective>,
    #[serde(default)]
    pub provides: Vec<ProvidesDirective>,
}

impl ModuleDeclaration {
    pub fn new(name: ModuleName) -> Self {
        Self {
            name,
            name_span: SourceSpan::zero(),
            open: false,
            deprecated: false,
            version: None,
            requires: Vec::new(),
            exports: Vec::new(),
            opens: Vec::new(),
            uses: Vec::new(),
            provides: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequiresDirective {
    pub module: ModuleName,
    #[serde(default)]
    pub transitive: bool,
    #[serde(default, rename = "static")]
    pub static_phase: bool,
    #[serde(default)]
    pub span: SourceSpan,
}

/// `exports p [to m, ...]` or `opens p [to m, ...]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageDirective {
    pub package: PackageName,
    #[serde(default)]
    pub to: Vec<ModuleName>,
    #[serde(default)]
    pub span: SourceSpan,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsesDirective {
    pub service: TypeName,
    #[serde(default)]
    pub span: SourceSpan,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvidesDirective {
    pub service: TypeName,
    pub with: Vec<TypeName>,
    #[serde(default)]
    pub span: SourceSpan,
}

/// One source file (or class file, for binary modules).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CompilationUnit {
    pub path: PathBuf,
    #[serde(default = "PackageName::unnamed")]
    pub package: PackageName,
    #[serde(default)]
    pub package_span: SourceSpan,
    /// Package implied by the file's directory, when known. A unit whose
    /// declared package differs is not associated with any package.
    #[serde(default)]
    pub directory_package: Option<PackageName>,
    #[serde(default)]
    pub types: Vec<DeclaredType>,
    #[serde(default)]
    pub references: Vec<TypeReference>,
    /// Public API members whose signatures mention other types.
    #[serde(default)]
    pub exposures: Vec<ApiExposure>,
    /// Original text, used only to render carets under diagnostics.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl CompilationUnit {
    pub fn new(path: impl Into<PathBuf>, package: PackageName) -> Self {
        Self {
            path: path.into(),
            package,
            ..Self::default()
        }
    }

    /// True when the unit contributes its package to the owning module:
    /// it declares at least one type and its package statement agrees with
    /// its location.
    pub fn is_associated(&self) -> bool {
        if self.types.is_empty() {
            return false;
        }
        match &self.directory_package {
            Some(dir) => *dir == self.package,
            None => true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeclaredType {
    pub name: String,
    #[serde(default = "default_public")]
    pub public: bool,
}

fn default_public() -> bool {
    true
}

impl DeclaredType {
    pub fn public(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            public: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferenceKind {
    /// `import p.X;`
    #[default]
    Import,
    /// A qualified name in code, e.g. `p.X x = ...`.
    Qualified,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeReference {
    #[serde(rename = "type")]
    pub name: TypeName,
    #[serde(default)]
    pub kind: ReferenceKind,
    #[serde(default)]
    pub span: SourceSpan,
}

/// A public member (`method`, `field`, super type...) whose signature
/// exposes `exposed` to clients of the declaring module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiExposure {
    pub member: String,
    pub exposed: TypeName,
    #[serde(default)]
    pub span: SourceSpan,
}

/// Where a module was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ModuleOrigin {
    /// Compiled in this invocation (`--module-source-path` or a single
    /// `module-info.java`).
    #[default]
    Source,
    /// Already compiled, found on `--module-path`.
    ModulePath,
    /// A plain JAR without `module-info.class`.
    Jar,
}

/// JAR metadata used to name an automatic module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JarInfo {
    pub file_name: String,
    /// `Automatic-Module-Name` manifest attribute.
    #[serde(default)]
    pub manifest_name: Option<String>,
}

/// One entry of the enumerated module path / module source path.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ModuleSource {
    #[serde(default)]
    pub origin: ModuleOrigin,
    /// Absent for plain JARs, which become automatic modules.
    #[serde(default)]
    pub declaration: Option<ModuleDeclaration>,
    #[serde(default)]
    pub jar: Option<JarInfo>,
    /// Location of `module-info.java`, used for diagnostics.
    #[serde(default)]
    pub descriptor_path: Option<PathBuf>,
    /// Name implied by the module source path directory, if checked.
    #[serde(default)]
    pub expected_name: Option<String>,
    #[serde(default)]
    pub units: Vec<CompilationUnit>,
}

/// Everything one compilation sees.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProjectInput {
    #[serde(default)]
    pub modules: Vec<ModuleSource>,
    /// Compilation units on the class path: members of the unnamed module.
    #[serde(default)]
    pub classpath: Vec<CompilationUnit>,
}

impl ProjectInput {
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }
}
