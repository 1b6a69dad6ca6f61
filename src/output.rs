//! User-facing output utilities for colored terminal messages
//!
//! Lookup results go to stdout uncolored so they can be piped. Warnings and
//! errors go to stderr through these helpers, without the timestamps and
//! module paths that `env_logger` adds.

use owo_colors::OwoColorize;

/// Display a warning message to the user in yellow
///
/// # Example
/// ```ignore
/// output::warn("--pretty has no effect without --json");
/// ```
pub fn warn(message: &str) {
    eprintln!("{}", message.yellow());
}

/// Display an error message to the user in red with padding
///
/// Format: blank line + red message + blank line
///
/// # Example
/// ```ignore
/// output::error("Error: Vendor 1234 not found");
/// ```
pub fn error(message: &str) {
    eprintln!("\n{}\n", message.red());
}
