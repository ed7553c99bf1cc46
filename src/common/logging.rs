//! Coloured console logging for binaries built on the client.
//!
//! The library itself reports through the `log` facade; these helpers are for
//! human-facing output. Set `RAVEX_RPC_SILENT` to mute everything and
//! `RAVEX_RPC_DEBUG` to show debug lines.

use colored::Colorize;

/// Environment variable that suppresses all console output.
pub const SILENT_ENV: &str = "RAVEX_RPC_SILENT";

/// Environment variable that enables [`LogLevel::Debug`] output.
pub const DEBUG_ENV: &str = "RAVEX_RPC_DEBUG";

/// Severity of a console message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
    Debug,
}

impl LogLevel {
    fn tag(self) -> colored::ColoredString {
        match self {
            LogLevel::Info => "[INFO]".blue().bold(),
            LogLevel::Success => "[OK]".green().bold(),
            LogLevel::Warning => "[WARN]".yellow().bold(),
            LogLevel::Error => "[ERROR]".red().bold(),
            LogLevel::Debug => "[DEBUG]".dimmed(),
        }
    }
}

fn is_silent() -> bool {
    std::env::var_os(SILENT_ENV).is_some()
}

fn debug_enabled() -> bool {
    std::env::var_os(DEBUG_ENV).is_some()
}

/// Formats a message line without printing it.
#[must_use]
pub fn format_line(level: LogLevel, message: &str) -> String {
    let timestamp = chrono::Local::now().format("%H:%M:%S");
    format!("{} {} {}", timestamp.to_string().dimmed(), level.tag(), message)
}

/// Prints a message at the given level.
///
/// Errors go to stderr, everything else to stdout.
pub fn log(level: LogLevel, message: &str) {
    if is_silent() || (level == LogLevel::Debug && !debug_enabled()) {
        return;
    }

    let line = format_line(level, message);
    if level == LogLevel::Error {
        eprintln!("{line}");
    } else {
        println!("{line}");
    }
}

/// Prints a section banner.
pub fn log_section(title: &str) {
    if is_silent() {
        return;
    }
    let rule = "=".repeat(60);
    println!("\n{}\n{}\n{}", rule.cyan(), title.bold(), rule.cyan());
}
