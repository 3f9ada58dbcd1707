//! CLI argument definitions.

use std::path::PathBuf;

use clap::Parser;

/// Strap - one-shot Homebrew bootstrap installer for macOS.
#[derive(Debug, Parser)]
#[command(name = "strap")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Compute and print the permission plan without changing anything
    #[arg(long)]
    pub dry_run: bool,

    /// With --dry-run, emit the plan as JSON
    #[arg(long)]
    pub json: bool,

    /// Never prompt; proceed without confirmation
    #[arg(long)]
    pub non_interactive: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Minimal output
    #[arg(short, long)]
    pub quiet: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Install prefix (testing only; installs elsewhere are unsupported)
    #[arg(long, value_name = "DIR")]
    pub prefix: Option<PathBuf>,

    /// Invoking user name (defaults to $USER, then `id -un`)
    #[arg(long, value_name = "NAME")]
    pub user: Option<String>,

    /// Target group for ownership reconciliation
    #[arg(long, value_name = "NAME", default_value = "admin")]
    pub admin_group: String,
}
