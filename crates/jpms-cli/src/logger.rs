//! Logging setup for the jpms CLI.
//!
//! Library crates only emit `tracing` events; the binary decides what is
//! shown:
//!
//! 1. `--verbose`: DEBUG for the jpms crates
//! 2. `--quiet`: errors only
//! 3. `RUST_LOG`, when set
//! 4. otherwise INFO for the jpms crates
//!
//! # Example
//!
//! ```rust,no_run
//! use jpms_cli::logger::init_logger;
//!
//! init_logger(false, false, false);
//! tracing::info!("checking modules");
//! ```

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub(crate) const VERBOSE_FILTER: &str = "jpms_graph=debug,jpms_config=debug,jpms_cli=debug";
pub(crate) const QUIET_FILTER: &str = "error";
pub(crate) const DEFAULT_FILTER: &str = "jpms_graph=info,jpms_config=info,jpms_cli=info";

/// Initialize the global tracing subscriber. Call once, before any logging.
pub fn init_logger(verbose: bool, quiet: bool, no_color: bool) {
    let filter = if verbose {
        EnvFilter::new(VERBOSE_FILTER)
    } else if quiet {
        EnvFilter::new(QUIET_FILTER)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    };

    init_logger_with_filter(filter, no_color);
}

/// Initialize the subscriber with an explicit filter.
pub fn init_logger_with_filter(filter: EnvFilter, no_color: bool) {
    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_level(true)
        .with_ansi(!no_color)
        .with_writer(std::io::stderr)
        .compact();

    // A second initialization (tests) is not an error worth reporting.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}

/// Whether stdout should get ANSI colors. `NO_COLOR` wins over
/// `FORCE_COLOR`; otherwise the terminal decides.
pub fn should_use_colors() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if std::env::var_os("FORCE_COLOR").is_some() {
        return true;
    }
    console::Term::stdout().features().colors_supported()
}
