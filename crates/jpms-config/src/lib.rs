//! Compiler options for module resolution.
//!
//! [`CompilerOptions`] is loaded by [`ConfigDiscovery`] from defaults,
//! `jpms.toml`, `JPMS_*` environment variables and command-line overrides,
//! checked with [`CompilerOptions::validate`] and then turned into the
//! [`jpms_graph::AnalysisOptions`] the analyzer consumes.

pub mod discovery;
pub mod error;
pub mod options;
pub mod validation;

pub use discovery::{CONFIG_FILE_NAME, ConfigDiscovery, ENV_PREFIX};
pub use error::{ConfigError, Result};
pub use options::{CompilerOptions, ConfigOverrides};
pub use validation::{JavaLevel, MAX_RELEASE, MIN_RELEASE};
