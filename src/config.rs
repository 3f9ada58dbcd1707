//! Installer configuration.
//!
//! Built once at startup from CLI flags and the environment, then passed
//! by reference to every component. Nothing reads ambient global state
//! after construction.

use std::path::PathBuf;

use crate::cli::Cli;
use crate::error::Result;
use crate::exec;
use crate::ui;

/// The installer only supports this prefix. Installing elsewhere is
/// unsupported; untar the Homebrew tarball anywhere you like instead.
pub const HOMEBREW_PREFIX: &str = "/usr/local";

/// Upstream repository cloned into `<prefix>/Homebrew`.
pub const BREW_REPO: &str = "https://github.com/Homebrew/brew";

/// Immutable configuration for one run.
#[derive(Debug, Clone)]
pub struct InstallConfig {
    /// Install prefix, `/usr/local` unless overridden for testing.
    pub prefix: PathBuf,
    /// Checkout location of the Homebrew repository.
    pub repository: PathBuf,
    /// Download cache, `~/Library/Caches/Homebrew`.
    pub cache: PathBuf,
    /// Upstream git remote.
    pub remote_url: String,
    /// Invoking (non-root) user.
    pub user: String,
    /// Target group for ownership reconciliation.
    pub admin_group: String,
    /// Whether to pause for confirmation before mutating anything.
    pub interactive: bool,
}

impl InstallConfig {
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let prefix = cli
            .prefix
            .clone()
            .unwrap_or_else(|| PathBuf::from(HOMEBREW_PREFIX));
        let repository = prefix.join("Homebrew");
        let cache = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("/"))
            .join("Library/Caches/Homebrew");

        let user = match &cli.user {
            Some(user) => user.clone(),
            None => resolve_user()?,
        };
        // Subprocesses (sudo askpass helpers, brew itself) expect USER.
        std::env::set_var("USER", &user);

        let interactive = !cli.non_interactive && ui::user_attended() && !ui::is_ci();

        Ok(Self {
            prefix,
            repository,
            cache,
            remote_url: BREW_REPO.to_string(),
            user,
            admin_group: cli.admin_group.clone(),
            interactive,
        })
    }
}

/// USER isn't always set, so fall back to `id -un`.
fn resolve_user() -> Result<String> {
    if let Ok(user) = std::env::var("USER") {
        if !user.is_empty() {
            return Ok(user);
        }
    }
    let captured = exec::capture("id", &["-un"])?;
    Ok(captured.stdout.trim().to_string())
}
