//! The `Module` class-file attribute of `module-info.class`.
//!
//! Names use the internal form (`p/q` for packages and types, module names
//! unchanged) and flags use the class-file bit values. The binary encoding
//! is bincode behind a leading format version, not the class-file
//! constant-pool layout.

use serde::{Deserialize, Serialize};

use crate::declaration::{
    ModuleDeclaration, PackageDirective, ProvidesDirective, RequiresDirective, UsesDirective,
};
use crate::descriptor::ModuleDescriptor;
use crate::error::{GraphError, Result};
use crate::graph::ModuleGraph;
use crate::name::{ModuleName, PackageName, TypeName};
use crate::span::SourceSpan;
use crate::universe::ModuleId;
use crate::version::ModuleVersion;

pub const ACC_OPEN: u16 = 0x0020;
pub const ACC_TRANSITIVE: u16 = 0x0020;
pub const ACC_STATIC_PHASE: u16 = 0x0040;
pub const ACC_SYNTHETIC: u16 = 0x1000;
pub const ACC_MANDATED: u16 = 0x8000;

/// Bumped whenever the encoded layout changes.
pub const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleAttribute {
    pub name: String,
    pub flags: u16,
    pub version: Option<String>,
    pub requires: Vec<RequiresEntry>,
    pub exports: Vec<PackageEntry>,
    pub opens: Vec<PackageEntry>,
    pub uses: Vec<String>,
    pub provides: Vec<ProvidesEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequiresEntry {
    pub module: String,
    pub flags: u16,
    pub version: Option<String>,
}

/// An `exports` or `opens` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageEntry {
    pub package: String,
    pub flags: u16,
    pub to: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvidesEntry {
    pub service: String,
    pub with: Vec<String>,
}

fn internal_form(name: &str) -> String {
    name.replace('.', "/")
}

fn binary_form(name: &str) -> String {
    name.replace('/', ".")
}

fn package_entry(directive: &PackageDirective) -> PackageEntry {
    PackageEntry {
        package: internal_form(directive.package.as_str()),
        flags: 0,
        to: directive.to.iter().map(ToString::to_string).collect(),
    }
}

fn package_directive(entry: PackageEntry) -> Result<PackageDirective> {
    Ok(PackageDirective {
        package: PackageName::new(binary_form(&entry.package))?,
        to: entry
            .to
            .iter()
            .map(ModuleName::new)
            .collect::<std::result::Result<_, _>>()?,
        span: SourceSpan::zero(),
    })
}

fn type_name(internal: &str) -> Result<TypeName> {
    Ok(TypeName::new(binary_form(internal))?)
}

impl ModuleAttribute {
    /// Attribute for an explicit module, without dependency versions.
    /// The implicit `requires java.base` is written as a mandated entry.
    pub fn from_descriptor(descriptor: &ModuleDescriptor) -> Result<Self> {
        if !descriptor.is_explicit() {
            return Err(GraphError::Attribute(format!(
                "{} is not an explicit module",
                descriptor.name
            )));
        }

        let mut requires: Vec<RequiresEntry> = descriptor
            .requires
            .iter()
            .map(|r| RequiresEntry {
                module: r.module.to_string(),
                flags: (if r.transitive { ACC_TRANSITIVE } else { 0 })
                    | (if r.static_phase { ACC_STATIC_PHASE } else { 0 }),
                version: None,
            })
            .collect();
        let declares_java_base = descriptor.requires.iter().any(|r| r.module.is_java_base());
        if !descriptor.name.is_java_base() && !declares_java_base {
            requires.insert(
                0,
                RequiresEntry {
                    module: ModuleName::java_base().to_string(),
                    flags: ACC_MANDATED,
                    version: None,
                },
            );
        }

        Ok(Self {
            name: descriptor.name.to_string(),
            flags: if descriptor.open { ACC_OPEN } else { 0 },
            version: descriptor.version.as_ref().map(ToString::to_string),
            requires,
            exports: descriptor.exports.iter().map(package_entry).collect(),
            opens: descriptor.opens.iter().map(package_entry).collect(),
            uses: descriptor
                .uses
                .iter()
                .map(|u| internal_form(u.service.as_str()))
                .collect(),
            provides: descriptor
                .provides
                .iter()
                .map(|p| ProvidesEntry {
                    service: internal_form(p.service.as_str()),
                    with: p.with.iter().map(|t| internal_form(t.as_str())).collect(),
                })
                .collect(),
        })
    }

    /// Attribute for a module of a built graph, recording the version of
    /// each required module when it is known.
    pub fn for_module(graph: &ModuleGraph, module: ModuleId) -> Result<Self> {
        let mut attribute = Self::from_descriptor(graph.descriptor(module))?;
        for entry in &mut attribute.requires {
            let version = ModuleName::new(&entry.module)
                .ok()
                .and_then(|name| graph.universe().get(&name))
                .and_then(|d| d.version.as_ref());
            entry.version = version.map(ToString::to_string);
        }
        Ok(attribute)
    }

    pub fn is_open(&self) -> bool {
        self.flags & ACC_OPEN != 0
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        bincode::serde::encode_to_vec((FORMAT_VERSION, self), bincode::config::standard())
            .map_err(|e| GraphError::Attribute(format!("failed to encode: {e}")))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let ((version, attribute), _): ((u32, Self), usize) =
            bincode::serde::decode_from_slice(bytes, bincode::config::standard())
                .map_err(|e| GraphError::Attribute(format!("failed to decode: {e}")))?;
        if version != FORMAT_VERSION {
            return Err(GraphError::Attribute(format!(
                "unsupported format version {version} (expected {FORMAT_VERSION})"
            )));
        }
        Ok(attribute)
    }

    /// Reads the attribute back as a declaration. Mandated and synthetic
    /// entries are dropped since they were never written in source.
    pub fn into_declaration(self) -> Result<ModuleDeclaration> {
        let mut declaration = ModuleDeclaration::new(ModuleName::new(&self.name)?);
        declaration.open = self.is_open();
        declaration.version = self.version.as_deref().map(ModuleVersion::parse).transpose()?;

        for entry in self.requires {
            if entry.flags & (ACC_MANDATED | ACC_SYNTHETIC) != 0 {
                continue;
            }
            declaration.requires.push(RequiresDirective {
                module: ModuleName::new(&entry.module)?,
                transitive: entry.flags & ACC_TRANSITIVE != 0,
                static_phase: entry.flags & ACC_STATIC_PHASE != 0,
                span: SourceSpan::zero(),
            });
        }
        for entry in self.exports {
            if entry.flags & (ACC_MANDATED | ACC_SYNTHETIC) == 0 {
                declaration.exports.push(package_directive(entry)?);
            }
        }
        for entry in self.opens {
            if entry.flags & (ACC_MANDATED | ACC_SYNTHETIC) == 0 {
                declaration.opens.push(package_directive(entry)?);
            }
        }
        for service in &self.uses {
            declaration.uses.push(UsesDirective {
                service: type_name(service)?,
                span: SourceSpan::zero(),
            });
        }
        for entry in &self.provides {
            declaration.provides.push(ProvidesDirective {
                service: type_name(&entry.service)?,
                with: entry
                    .with
                    .iter()
                    .map(String::as_str)
                    .map(type_name)
                    .collect::<Result<_>>()?,
                span: SourceSpan::zero(),
            });
        }
        Ok(declaration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::declaration::{CompilationUnit, DeclaredType, ModuleSource};

    fn descriptor() -> ModuleDescriptor {
        let decl: ModuleDeclaration = serde_json::from_str(
            r#"{
                "name": "mod.two",
                "version": "1.2",
                "requires": [
                    { "module": "mod.one", "transitive": true },
                    { "module": "mod.opt", "static": true }
                ],
                "exports": [{ "package": "p.api", "to": ["mod.z", "mod.a"] }],
                "opens": [{ "package": "p.impl" }],
                "uses": [{ "service": "p.api.Service" }],
                "provides": [{ "service": "p.api.Service", "with": ["p.impl.Impl"] }]
            }"#,
        )
        .unwrap();
        let mut unit = CompilationUnit::new("mod.two/p/impl/Impl.java", PackageName::new("p.impl").unwrap());
        unit.types.push(DeclaredType::public("Impl"));
        ModuleDescriptor::from_source(ModuleSource {
            declaration: Some(decl),
            units: vec![unit],
            ..ModuleSource::default()
        })
        .unwrap()
    }

    #[test]
    fn writes_internal_names_and_flags() {
        let attribute = ModuleAttribute::from_descriptor(&descriptor()).unwrap();
        assert_eq!(attribute.requires[0].module, "java.base");
        assert_eq!(attribute.requires[0].flags, ACC_MANDATED);
        assert_eq!(attribute.requires[1].flags, ACC_TRANSITIVE);
        assert_eq!(attribute.requires[2].flags, ACC_STATIC_PHASE);
        assert_eq!(attribute.exports[0].package, "p/api");
        assert_eq!(attribute.exports[0].to, vec!["mod.z", "mod.a"]);
        assert_eq!(attribute.provides[0].with, vec!["p/impl/Impl"]);
        assert_eq!(attribute.version.as_deref(), Some("1.2"));
    }

    #[test]
    fn bytes_round_trip_back_to_declaration() {
        let original = descriptor();
        let bytes = ModuleAttribute::from_descriptor(&original)
            .unwrap()
            .to_bytes()
            .unwrap();
        let decl = ModuleAttribute::from_bytes(&bytes)
            .unwrap()
            .into_declaration()
            .unwrap();

        let strip = |mut d: Vec<PackageDirective>| {
            for e in &mut d {
                e.span = SourceSpan::zero();
            }
            d
        };
        assert_eq!(decl.requires, original.requires);
        assert_eq!(decl.exports, strip(original.exports.clone()));
        assert_eq!(decl.opens, strip(original.opens.clone()));
        assert_eq!(decl.provides, original.provides);
    }

    #[test]
    fn rejects_unknown_format_version() {
        let attribute = ModuleAttribute::from_descriptor(&descriptor()).unwrap();
        let bytes =
            bincode::serde::encode_to_vec((FORMAT_VERSION + 1, &attribute), bincode::config::standard())
                .unwrap();
        let err = ModuleAttribute::from_bytes(&bytes).unwrap_err();
        assert!(err.to_string().contains("unsupported format version"));
    }
}
