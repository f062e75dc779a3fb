//! Command-line interface definition.
//!
//! # Command Structure
//!
//! - `jpms check` - resolve a project and report module diagnostics
//! - `jpms graph` - dump the readability graph as DOT or JSON
//! - `jpms attribute` - encode or decode a module's `Module` attribute

mod commands;

use clap::Parser;

pub use commands::{
    AttributeCommand, CheckArgs, Command, DecodeArgs, EncodeArgs, GraphArgs,
    GraphFormat, OptionArgs, ReportFormat,
};

/// jpms - Java module resolution checks
#[derive(Parser, Debug)]
#[command(
    name = "jpms",
    version,
    about = "Java module resolution checks",
    long_about = "Resolves the module graph of a Java project (requires, exports, opens,\n\
                  automatic and unnamed modules) and reports inaccessible types, split\n\
                  packages and API leaks in batch-compiler format."
)]
pub struct Cli {
    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}
