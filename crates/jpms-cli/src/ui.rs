//! Status messages on stderr.
//!
//! Command output (reports, graphs) goes to stdout; these helpers are for
//! the human reading the terminal.

use std::sync::atomic::{AtomicBool, Ordering};

use owo_colors::OwoColorize;

use crate::logger::should_use_colors;

static COLORS: AtomicBool = AtomicBool::new(false);

/// Decide once whether output is colored.
pub fn init_colors(no_color: bool) {
    COLORS.store(!no_color && should_use_colors(), Ordering::Relaxed);
}

pub fn colors_enabled() -> bool {
    COLORS.load(Ordering::Relaxed)
}

pub fn success(message: &str) {
    if colors_enabled() {
        eprintln!("{} {}", "✓".green().bold(), message);
    } else {
        eprintln!("✓ {message}");
    }
}

pub fn info(message: &str) {
    if colors_enabled() {
        eprintln!("{} {}", "ℹ".blue().bold(), message);
    } else {
        eprintln!("ℹ {message}");
    }
}

pub fn warning(message: &str) {
    if colors_enabled() {
        eprintln!("{} {}", "⚠".yellow().bold(), message.yellow());
    } else {
        eprintln!("⚠ {message}");
    }
}
