//! Layered option loading.
//!
//! Sources, lowest priority first: defaults, `jpms.toml` in the root
//! directory (or an explicit file), `JPMS_*` environment variables, then
//! command-line overrides.

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format as _, Serialized, Toml};

use crate::error::{ConfigError, Result};
use crate::options::{CompilerOptions, ConfigOverrides};

pub const CONFIG_FILE_NAME: &str = "jpms.toml";

/// `JPMS_ADD_READS`, `JPMS_WARNINGS_AS_ERRORS`, ...
pub const ENV_PREFIX: &str = "JPMS_";

/// Option keys read from the environment, after the prefix. Other `JPMS_*`
/// variables are ignored.
const ENV_KEYS: &[&str] = &[
    "add_reads",
    "add_exports",
    "add_opens",
    "limit_modules",
    "release",
    "source",
    "compliance",
    "bootclasspath",
    "module_version",
    "warnings_as_errors",
    "errors",
    "warnings",
    "ignore",
];

/// Finds and loads [`CompilerOptions`] for a project root.
///
/// # Example
///
/// ```no_run
/// use jpms_config::{ConfigDiscovery, ConfigOverrides};
///
/// let options = ConfigDiscovery::new(".").load(&ConfigOverrides::default()).unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct ConfigDiscovery {
    root: PathBuf,
    file: Option<PathBuf>,
}

impl ConfigDiscovery {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            file: None,
        }
    }

    /// Use `path` instead of looking for `jpms.toml`. Relative paths are
    /// resolved against the root.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        self.file = Some(self.root.join(path));
        self
    }

    /// The config file that would be loaded, if any. An explicit file is
    /// returned even when it does not exist.
    pub fn find(&self) -> Option<PathBuf> {
        if let Some(file) = &self.file {
            return Some(file.clone());
        }
        let default = self.root.join(CONFIG_FILE_NAME);
        default.exists().then_some(default)
    }

    /// The merged provider chain. List values in the environment use
    /// figment's array syntax: `JPMS_LIMIT_MODULES=[mod.a,mod.b]`.
    pub fn figment(&self, overrides: &ConfigOverrides) -> Result<Figment> {
        let mut figment = Figment::new().merge(Serialized::defaults(CompilerOptions::default()));

        if let Some(path) = self.find() {
            if !path.exists() {
                return Err(ConfigError::NotFound(path));
            }
            tracing::debug!(path = %path.display(), "loading config file");
            figment = figment.merge(Toml::file(path));
        }

        Ok(figment
            .merge(
                Env::prefixed(ENV_PREFIX)
                    .only(ENV_KEYS)
                    .map(|key| key.as_str().to_ascii_lowercase().replace('_', "-").into()),
            )
            .merge(Serialized::defaults(overrides.clone())))
    }

    pub fn load(&self, overrides: &ConfigOverrides) -> Result<CompilerOptions> {
        Ok(self.figment(overrides)?.extract()?)
    }
}
