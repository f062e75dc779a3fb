//! Configuration-fatal errors.
//!
//! Anything in here aborts the compilation before per-file analysis starts.
//! Problems that are attached to a source location (inaccessible types,
//! package conflicts, API leaks) are never errors of this type; they are
//! reported as [`crate::Diagnostic`] values.

use std::fmt;

use thiserror::Error;

use crate::name::{ModuleName, NameError, PackageName};
use crate::version::VersionError;

#[derive(Debug, Error)]
pub enum GraphError {
    /// Two module path entries declare the same module.
    #[error("Duplicate module {0} found on the module path")]
    DuplicateModule(ModuleName),

    /// Declared name differs from the module source path directory.
    #[error("module name {found} does not match expected name {expected}")]
    ModuleNameMismatch { found: ModuleName, expected: String },

    /// A `requires`, `--add-reads` or `--add-exports` names a module outside
    /// the observable universe.
    #[error("{module} cannot be resolved to a module")]
    UnresolvedModule {
        module: ModuleName,
        referenced_by: Option<ModuleName>,
    },

    #[error(transparent)]
    InvalidName(#[from] NameError),

    /// Wrong `=`/`/` arrangement in a directive option.
    #[error("Incorrectly formatted option: {option} {value}")]
    MalformedOption { option: &'static str, value: String },

    #[error("can specify a package in a module only once with {option}")]
    DuplicatePackageGrant {
        option: &'static str,
        module: ModuleName,
        package: PackageName,
    },

    #[error("{}", cycle_messages(.0))]
    RequiresCycle(Vec<RequiresCycle>),

    #[error("Unable to derive module descriptor for {file}: {reason}")]
    AutomaticModuleName { file: String, reason: String },

    /// Module path entry with neither `module-info` nor JAR metadata.
    #[error("module source {0} has neither a module declaration nor a JAR")]
    MissingDescriptor(String),

    #[error(transparent)]
    InvalidVersion(#[from] VersionError),

    #[error("Module attribute error: {0}")]
    Attribute(String),

    #[error("Failed to serialize graph: {0}")]
    Serialization(String),
}

/// One module taking part in a `requires` cycle, and the module it requires
/// that leads back to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequiresCycle {
    pub module: ModuleName,
    pub requires: ModuleName,
}

impl fmt::Display for RequiresCycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Cycle exists in module dependencies, Module {} requires {}",
            self.module, self.requires
        )
    }
}

fn cycle_messages(cycles: &[RequiresCycle]) -> String {
    cycles
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

pub type Result<T> = std::result::Result<T, GraphError>;
