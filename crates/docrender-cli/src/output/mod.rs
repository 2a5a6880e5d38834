//! Output formatting utilities

pub mod table_output;

use crate::error::Result;
use console::style;
use docrender_sdk::ProgressReporter;
use serde::Serialize;

/// Output data as JSON
pub fn json_output<T: Serialize>(data: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(data)?;
    println!("{json}");
    Ok(())
}

/// Print a success message with green checkmark
pub fn print_success(message: &str) {
    println!("{} {}", style("✓").green().bold(), message);
}

/// Print an informational message with blue info icon
pub fn print_info(message: &str) {
    println!("{} {}", style("ℹ").blue(), message);
}

/// Compress a path to use tilde notation for home directory
pub fn compress_path(path: &std::path::Path) -> String {
    if let Some(home_dir) = dirs::home_dir() {
        if let Ok(relative) = path.strip_prefix(&home_dir) {
            return format!("~/{}", relative.display());
        }
    }
    path.display().to_string()
}

/// Renders workflow progress on the terminal.
///
/// Quiet mode keeps failures only, so `--json` output stays parseable.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalReporter {
    quiet: bool,
}

impl TerminalReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn quiet() -> Self {
        Self { quiet: true }
    }
}

impl ProgressReporter for TerminalReporter {
    fn step(&self, message: &str) {
        if !self.quiet {
            println!("  {} {}", style("→").cyan(), message);
        }
    }

    fn success(&self, message: &str) {
        if !self.quiet {
            println!("  {} {}", style("✓").green().bold(), message);
        }
    }

    fn warn(&self, message: &str) {
        eprintln!("  {} {}", style("!").yellow().bold(), style(message).yellow());
    }
}
