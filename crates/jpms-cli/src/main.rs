//! jpms CLI - module resolution checks for Java projects.
//!
//! Parses arguments, initializes logging and dispatches to the command
//! implementations.

use std::process::ExitCode;

use clap::Parser;
use jpms_cli::{cli, commands, error, logger, ui};
use miette::Result;

fn main() -> Result<ExitCode> {
    let args = cli::Cli::parse();

    logger::init_logger(args.verbose, args.quiet, args.no_color);
    ui::init_colors(args.no_color);

    let result = match args.command {
        cli::Command::Check(check_args) => commands::check_execute(check_args),
        cli::Command::Graph(graph_args) => commands::graph_execute(graph_args),
        cli::Command::Attribute(attribute_args) => commands::attribute_execute(attribute_args),
    };

    result.map_err(error::cli_error_to_miette)
}
