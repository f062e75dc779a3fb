//! Miette report conversion for CLI errors.

use jpms_config::ConfigError;
use jpms_graph::{DiagnosticKind, GraphError};
use miette::Report;

use crate::error::CliError;

pub fn cli_error_to_miette(err: CliError) -> Report {
    match err {
        CliError::Graph(e) => graph_error_to_miette(e),
        CliError::Config(e) => config_error_to_miette(e),
        CliError::FileNotFound(path) => miette::miette!(
            help = "Pass the JSON project description produced by the parser",
            "File not found: {}",
            path.display()
        ),
        _ => miette::miette!("{}", err),
    }
}

fn graph_error_to_miette(err: GraphError) -> Report {
    match err {
        GraphError::UnresolvedModule {
            module,
            referenced_by: Some(by),
        } => miette::miette!(
            help = format!("Add {module} to the module path or remove it from {by}"),
            "{module} cannot be resolved to a module"
        ),
        GraphError::RequiresCycle(_) => miette::miette!(
            help = "Remove one of the requires directives in the cycle",
            "{}",
            err
        ),
        GraphError::DuplicatePackageGrant { .. } => miette::miette!(
            help = "List every target of the package in a single option",
            "{}",
            err
        ),
        _ => miette::miette!("{}", err),
    }
}

fn config_error_to_miette(err: ConfigError) -> Report {
    let help = match &err {
        ConfigError::SourceWithRelease => Some("Use either --release or --source".to_string()),
        ConfigError::BootclasspathNotSupported => {
            Some("Use --release to select the platform".to_string())
        }
        ConfigError::UnknownWarning(_) => Some(format!(
            "Known warnings: {}",
            DiagnosticKind::WARNING_CODES.join(", ")
        )),
        _ => None,
    };
    match help {
        Some(help) => miette::miette!(help = help, "Configuration error: {}", err),
        None => miette::miette!("Configuration error: {}", err),
    }
}
