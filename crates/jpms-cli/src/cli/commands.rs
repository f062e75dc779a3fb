use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};
use jpms_config::ConfigOverrides;

/// Available jpms subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Resolve the project and report module diagnostics
    ///
    /// Exits with status 1 when any error is reported.
    Check(CheckArgs),

    /// Print the readability graph
    Graph(GraphArgs),

    /// Encode or decode the Module attribute of a module
    #[command(subcommand)]
    Attribute(AttributeCommand),
}

/// Compiler options shared by every command that resolves a project.
#[derive(Args, Debug, Clone, Default)]
pub struct OptionArgs {
    /// Config file (default: jpms.toml in the root directory, if present)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory searched for jpms.toml
    #[arg(long, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// SOURCE=TARGET(,TARGET)*, repeatable
    #[arg(long = "add-reads", value_name = "VALUE")]
    pub add_reads: Vec<String>,

    /// MODULE/PACKAGE=TARGET(,TARGET)*, repeatable
    #[arg(long = "add-exports", value_name = "VALUE")]
    pub add_exports: Vec<String>,

    /// MODULE/PACKAGE=TARGET(,TARGET)*, repeatable
    #[arg(long = "add-opens", value_name = "VALUE")]
    pub add_opens: Vec<String>,

    /// Restrict the observable modules to these roots and their requires
    #[arg(long = "limit-modules", value_name = "MODULE(,MODULE)*")]
    pub limit_modules: Vec<String>,

    #[arg(long, value_name = "N")]
    pub release: Option<String>,

    #[arg(long, value_name = "N")]
    pub source: Option<String>,

    #[arg(long, value_name = "N")]
    pub compliance: Option<String>,

    /// Version recorded for the modules being compiled
    #[arg(long = "module-version", value_name = "VERSION")]
    pub module_version: Option<String>,

    /// Report every warning as an error
    #[arg(long = "warnings-as-errors")]
    pub warnings_as_errors: bool,
}

impl From<&OptionArgs> for ConfigOverrides {
    fn from(args: &OptionArgs) -> Self {
        Self {
            add_reads: args.add_reads.clone(),
            add_exports: args.add_exports.clone(),
            add_opens: args.add_opens.clone(),
            limit_modules: args.limit_modules.clone(),
            release: args.release.clone(),
            source: args.source.clone(),
            compliance: args.compliance.clone(),
            module_version: args.module_version.clone(),
            // The flag can only turn the promotion on.
            warnings_as_errors: args.warnings_as_errors.then_some(true),
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    /// Batch-compiler text
    #[default]
    Text,
    Json,
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Project description (JSON)
    #[arg(value_name = "PROJECT")]
    pub input: PathBuf,

    #[arg(long, value_enum, default_value = "text")]
    pub format: ReportFormat,

    /// Directory that diagnostic paths are relative to (default: the
    /// project file's directory)
    #[arg(long, value_name = "DIR")]
    pub sources: Option<PathBuf>,

    #[command(flatten)]
    pub options: OptionArgs,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GraphFormat {
    #[default]
    Dot,
    Json,
}

#[derive(Args, Debug)]
pub struct GraphArgs {
    /// Project description (JSON)
    #[arg(value_name = "PROJECT")]
    pub input: PathBuf,

    #[arg(short, long, value_enum, default_value = "dot")]
    pub format: GraphFormat,

    /// Write to FILE instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub options: OptionArgs,
}

#[derive(Subcommand, Debug)]
pub enum AttributeCommand {
    /// Write the attribute of MODULE as bytes
    Encode(EncodeArgs),

    /// Print an encoded attribute as a module declaration (JSON)
    Decode(DecodeArgs),
}

#[derive(Args, Debug)]
pub struct EncodeArgs {
    /// Project description (JSON)
    #[arg(value_name = "PROJECT")]
    pub input: PathBuf,

    /// Module to encode
    #[arg(value_name = "MODULE")]
    pub module: String,

    #[arg(short, long, value_name = "FILE")]
    pub output: PathBuf,

    #[command(flatten)]
    pub options: OptionArgs,
}

#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Encoded attribute
    #[arg(value_name = "FILE")]
    pub input: PathBuf,
}
