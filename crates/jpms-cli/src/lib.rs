//! jpms CLI - module resolution checks for Java projects.
//!
//! The binary reads a project description (the parsed `module-info` and
//! compilation units, as JSON), loads compiler options through
//! `jpms-config` and runs `jpms-graph` over it.
//!
//! # Architecture
//!
//! - [`cli`] - clap argument definitions
//! - [`commands`] - `check`, `graph` and `attribute` implementations
//! - [`error`] - `CliError` and conversion to miette reports
//! - [`logger`] - tracing subscriber setup
//! - [`report`] - batch-compiler rendering of diagnostics
//! - [`ui`] - status messages on stderr
//!
//! # Example
//!
//! ```rust,no_run
//! use jpms_cli::{error::Result, logger};
//!
//! fn main() -> Result<()> {
//!     logger::init_logger(false, false, false);
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod commands;
pub mod error;
pub mod logger;
pub mod report;
pub mod ui;

pub use error::{CliError, Result};
