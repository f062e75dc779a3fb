//! Shared command plumbing: option loading and input reading.

use std::io;
use std::path::{Path, PathBuf};

use jpms_config::{CompilerOptions, ConfigDiscovery, ConfigOverrides};
use jpms_graph::{Analyzer, ProjectInput};

use crate::cli::OptionArgs;
use crate::error::{CliError, Result};

/// Loads, merges and validates compiler options for a command.
pub(crate) fn load_options(args: &OptionArgs) -> Result<CompilerOptions> {
    let root = args.root.clone().unwrap_or_else(|| PathBuf::from("."));
    let mut discovery = ConfigDiscovery::new(root);
    if let Some(config) = &args.config {
        discovery = discovery.with_file(config);
    }

    let options = discovery.load(&ConfigOverrides::from(args))?;
    options.validate()?;
    tracing::debug!(?options, "compiler options loaded");
    Ok(options)
}

pub(crate) fn analyzer(options: &CompilerOptions) -> Result<Analyzer> {
    Ok(Analyzer::new(options.to_analysis_options()?))
}

pub(crate) fn read_file(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|e| not_found_or_io(path, e))
}

pub(crate) fn read_input(path: &Path) -> Result<ProjectInput> {
    let text = std::fs::read_to_string(path).map_err(|e| not_found_or_io(path, e))?;
    ProjectInput::from_json(&text).map_err(|source| CliError::InvalidInput {
        path: path.to_path_buf(),
        source,
    })
}

fn not_found_or_io(path: &Path, error: io::Error) -> CliError {
    if error.kind() == io::ErrorKind::NotFound {
        CliError::FileNotFound(path.to_path_buf())
    } else {
        CliError::Io(error)
    }
}
