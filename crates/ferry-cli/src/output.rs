//! Formatted output helpers for CLI status text.

/// Bold ANSI escape.
pub const BOLD: &str = "\x1b[1m";
/// Dim ANSI escape.
pub const DIM: &str = "\x1b[2m";
/// Green ANSI escape.
pub const GREEN: &str = "\x1b[32m";
/// Red ANSI escape.
pub const RED: &str = "\x1b[31m";
/// Reset ANSI escape.
pub const RESET: &str = "\x1b[0m";

/// Prints a green status line.
pub fn status(message: &str) {
    eprintln!("  {GREEN}●{RESET} {message}");
}

/// Prints a dim detail line.
pub fn detail(message: &str) {
    eprintln!("    {DIM}{message}{RESET}");
}
