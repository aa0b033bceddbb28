//! Output formatting utilities.
//!
//! Results go to stdout undecorated so they can be piped; status lines go
//! to stderr.

use colored::Colorize;

/// Prints a success message.
pub fn success(message: &str) {
    eprintln!("{} {}", "✓".green().bold(), message);
}

/// Prints an error message.
pub fn error(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message);
}

/// Prints a warning message.
pub fn warning(message: &str) {
    eprintln!("{} {}", "⚠".yellow().bold(), message);
}

/// Prints an info message.
pub fn info(message: &str) {
    eprintln!("{} {}", "ℹ".blue().bold(), message);
}

/// Prints a labelled value.
pub fn field(label: &str, value: impl std::fmt::Display) {
    eprintln!("  {:<12} {}", format!("{label}:").bold(), value);
}

/// Prints command output.
pub fn result(value: &str) {
    println!("{value}");
}
