//! Command-line module directives: `--add-reads`, `--add-exports` and
//! `--add-opens`.
//!
//! Values arrive as the raw option arguments (`SRC=TARGET,...` and
//! `MODULE/PKG=TARGET,...`). Syntax errors are fatal and reported before
//! any name is validated.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{GraphError, Result};
use crate::name::{ALL_UNNAMED, ModuleName, PackageName};

/// Target of a directive: a named module or every unnamed module.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModuleTarget {
    Module(ModuleName),
    AllUnnamed,
}

impl ModuleTarget {
    fn parse(value: &str) -> Result<Self> {
        if value == ALL_UNNAMED {
            Ok(Self::AllUnnamed)
        } else {
            Ok(Self::Module(ModuleName::new(value)?))
        }
    }

    pub fn module(&self) -> Option<&ModuleName> {
        match self {
            Self::Module(name) => Some(name),
            Self::AllUnnamed => None,
        }
    }

    /// True if this target names `reader` (the unnamed module is matched by
    /// `ALL-UNNAMED`).
    pub fn matches(&self, reader: &ModuleName) -> bool {
        match self {
            Self::Module(name) => name == reader,
            Self::AllUnnamed => reader.is_unnamed(),
        }
    }
}

impl fmt::Display for ModuleTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Module(name) => write!(f, "{name}"),
            Self::AllUnnamed => f.write_str(ALL_UNNAMED),
        }
    }
}

/// `--add-reads SOURCE=TARGET(,TARGET)*`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddReads {
    pub source: ModuleName,
    pub targets: Vec<ModuleTarget>,
}

impl AddReads {
    pub const OPTION: &'static str = "--add-reads";

    pub fn parse(value: &str) -> Result<Self> {
        let malformed = || GraphError::MalformedOption {
            option: Self::OPTION,
            value: value.to_string(),
        };

        let (source, targets) = split_assignment(value).ok_or_else(malformed)?;
        if source.contains('/') {
            return Err(malformed());
        }
        let targets = parse_targets(targets).ok_or_else(malformed)?;

        Ok(Self {
            source: ModuleName::new(source)?,
            targets: targets
                .into_iter()
                .map(ModuleTarget::parse)
                .collect::<Result<_>>()?,
        })
    }
}

/// Which kind of package access a [`PackageGrant`] adds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GrantKind {
    Exports,
    Opens,
}

impl GrantKind {
    pub fn option_name(self) -> &'static str {
        match self {
            Self::Exports => "--add-exports",
            Self::Opens => "--add-opens",
        }
    }
}

/// `--add-exports MODULE/PACKAGE=TARGET(,TARGET)*` or the `--add-opens`
/// equivalent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageGrant {
    pub kind: GrantKind,
    pub module: ModuleName,
    pub package: PackageName,
    pub targets: Vec<ModuleTarget>,
}

impl PackageGrant {
    pub fn parse_exports(value: &str) -> Result<Self> {
        Self::parse(GrantKind::Exports, value)
    }

    pub fn parse_opens(value: &str) -> Result<Self> {
        Self::parse(GrantKind::Opens, value)
    }

    pub fn parse(kind: GrantKind, value: &str) -> Result<Self> {
        let malformed = || GraphError::MalformedOption {
            option: kind.option_name(),
            value: value.to_string(),
        };

        let (source, targets) = split_assignment(value).ok_or_else(malformed)?;
        let (module, package) = source.split_once('/').ok_or_else(malformed)?;
        if module.is_empty() || package.is_empty() || package.contains('/') {
            return Err(malformed());
        }
        let targets = parse_targets(targets).ok_or_else(malformed)?;

        let package = PackageName::new(package)?;
        if package.is_unnamed() {
            return Err(malformed());
        }

        Ok(Self {
            kind,
            module: ModuleName::new(module)?,
            package,
            targets: targets
                .into_iter()
                .map(ModuleTarget::parse)
                .collect::<Result<_>>()?,
        })
    }
}

/// Splits `left=right` where both sides are non-empty and `=` occurs once.
fn split_assignment(value: &str) -> Option<(&str, &str)> {
    let (left, right) = value.split_once('=')?;
    if left.is_empty() || right.is_empty() || right.contains('=') {
        return None;
    }
    Some((left, right))
}

fn parse_targets(value: &str) -> Option<Vec<&str>> {
    let targets: Vec<&str> = value.split(',').collect();
    if targets.iter().any(|t| t.is_empty() || t.contains('/')) {
        return None;
    }
    Some(targets)
}
