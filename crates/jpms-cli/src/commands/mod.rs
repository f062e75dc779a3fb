//! Command implementations for the jpms CLI.
//!
//! - [`check`] - resolve and report diagnostics
//! - [`graph`] - dump the readability graph
//! - [`attribute`] - encode and decode module attributes
//!
//! Each command exposes an `execute` function taking its parsed arguments.

pub mod attribute;
pub mod check;
pub mod graph;
pub(crate) mod utils;

pub use attribute::execute as attribute_execute;
pub use check::execute as check_execute;
pub use graph::execute as graph_execute;
