//! Styled terminal output.
//!
//! Mirrors the classic Homebrew installer voice: blue `==>` headlines,
//! red `Warning:` prefixes, underlined references. The `console` crate
//! suppresses styling automatically when stdout is not a terminal or
//! `NO_COLOR` is set.

use std::io::Write;
use std::path::PathBuf;

use console::style;

/// Output writer for the installer.
#[derive(Debug, Clone, Copy)]
pub struct Output {
    quiet: bool,
}

impl Output {
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }

    /// A `==>` headline.
    pub fn ohai(&self, msg: &str) {
        if self.quiet {
            return;
        }
        println!("{} {}", style("==>").blue().bold(), style(msg).bold());
    }

    /// An unadorned line.
    pub fn plain(&self, msg: &str) {
        if !self.quiet {
            println!("{msg}");
        }
    }

    /// One path per line.
    pub fn list(&self, paths: &[PathBuf]) {
        for path in paths {
            self.plain(&path.display().to_string());
        }
    }

    /// A warning. Printed even in quiet mode.
    pub fn warn(&self, msg: &str) {
        println!("{}: {}", style("Warning").red().bold(), msg.trim_end());
    }

    /// An error, to stderr. Printed even in quiet mode.
    pub fn error(&self, msg: &str) {
        eprintln!("{}", style(msg).red());
    }

    /// Underline a reference (URLs, user names) for emphasis.
    pub fn underline(&self, text: &str) -> String {
        style(text).underlined().to_string()
    }

    /// Ring the terminal bell.
    pub fn bell(&self) {
        if self.quiet {
            return;
        }
        print!("\x07");
        let _ = std::io::stdout().flush();
    }
}
