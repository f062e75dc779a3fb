//! Error types for option loading and validation.

use std::path::PathBuf;

use jpms_graph::{GraphError, VersionError};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    // Loading
    #[error("config file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to load configuration: {0}")]
    Load(#[from] Box<figment::Error>),

    #[error("failed to write configuration: {0}")]
    Serialize(#[from] toml::ser::Error),

    // Flag combinations
    #[error("option -source is not supported when --release is used")]
    SourceWithRelease,

    #[error("option -bootclasspath not supported at compliance level 9 and above")]
    BootclasspathNotSupported,

    #[error("release version {0} is not supported")]
    UnsupportedRelease(String),

    #[error("invalid {field} level: {value}")]
    InvalidLevel { field: &'static str, value: String },

    #[error("invalid module version '{value}'")]
    InvalidModuleVersion {
        value: String,
        #[source]
        source: VersionError,
    },

    // Severity overrides
    #[error("unknown warning '{0}'")]
    UnknownWarning(String),

    #[error("warning '{0}' is listed in more than one severity group")]
    ConflictingSeverity(String),

    // Directive syntax and names
    #[error(transparent)]
    Directive(#[from] GraphError),
}

impl From<figment::Error> for ConfigError {
    fn from(error: figment::Error) -> Self {
        Self::Load(Box::new(error))
    }
}
