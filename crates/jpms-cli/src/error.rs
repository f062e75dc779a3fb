//! Error handling for the jpms CLI.
//!
//! [`CliError`] wraps the library errors via `#[from]`; `main` turns it into
//! a miette report with [`cli_error_to_miette`]. Resolution problems are not
//! errors here: they are diagnostics in the report and only affect the exit
//! status.

mod miette;

use std::path::PathBuf;

use thiserror::Error;

pub use self::miette::cli_error_to_miette;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    /// Option loading or validation failed.
    #[error("Configuration error: {0}")]
    Config(#[from] jpms_config::ConfigError),

    /// The module graph could not be built.
    #[error(transparent)]
    Graph(#[from] jpms_graph::GraphError),

    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("Invalid project description {}: {source}", path.display())]
    InvalidInput {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Module {0} is not in the module graph")]
    ModuleNotFound(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
