use std::sync::OnceLock;
use std::time::Duration;

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

/// How much console output to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    /// Errors only.
    Quiet,
    Normal,
    /// Also tool command lines and per-package fingerprints.
    Verbose,
}

static VERBOSITY: OnceLock<Verbosity> = OnceLock::new();

/// Set the console verbosity once, at startup.
pub fn init(verbosity: Verbosity) {
    let _ = VERBOSITY.set(verbosity);
}

fn verbosity() -> Verbosity {
    VERBOSITY.get().copied().unwrap_or(Verbosity::Normal)
}

fn enabled(level: Verbosity) -> bool {
    verbosity() >= level
}

/// Print a success message.
pub fn success(msg: &str) {
    if enabled(Verbosity::Normal) {
        println!("  {} {}", "✓".green(), msg);
    }
}

/// Print a warning message.
pub fn warning(msg: &str) {
    if enabled(Verbosity::Normal) {
        println!("  {} {}", "⚠".yellow(), msg);
    }
}

/// Print an error message. Always shown.
pub fn error(msg: &str) {
    eprintln!("  {} {}", "✗".red(), msg);
}

/// Print a header line.
pub fn header(msg: &str) {
    if enabled(Verbosity::Normal) {
        println!("\n{}", msg.bold());
    }
}

/// Print a plain indented line.
pub fn info(msg: &str) {
    if enabled(Verbosity::Normal) {
        println!("    {msg}");
    }
}

/// Print a dimmed line, only in verbose mode.
pub fn detail(msg: &str) {
    if enabled(Verbosity::Verbose) && !msg.is_empty() {
        println!("    {}", msg.dimmed());
    }
}

/// Progress bar over `len` items; hidden in quiet mode.
pub fn progress(len: usize, prefix: &str) -> ProgressBar {
    if !enabled(Verbosity::Normal) {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new(len as u64);
    let style = ProgressStyle::with_template("  {spinner:.cyan} {prefix} [{pos}/{len}] {wide_msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    pb.set_style(style);
    pb.set_prefix(prefix.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
