//! Fixed catalog of prefix directories the installer manages.

use std::path::{Path, PathBuf};

/// Prefix subdirectories that should be group writable.
///
/// Kept relatively in sync with Homebrew's keg.rb.
const GROUP_WRITABLE: &[&str] = &[
    "bin",
    "etc",
    "include",
    "lib",
    "sbin",
    "share",
    "opt",
    "var",
    "Frameworks",
    "etc/bash_completion.d",
    "lib/pkgconfig",
    "share/aclocal",
    "share/doc",
    "share/info",
    "share/locale",
    "share/man",
    "share/man/man1",
    "share/man/man2",
    "share/man/man3",
    "share/man/man4",
    "share/man/man5",
    "share/man/man6",
    "share/man/man7",
    "share/man/man8",
    "var/log",
    "var/homebrew",
    "var/homebrew/linked",
    "bin/brew",
];

/// zsh refuses to read from group-writable directories, so these are
/// reset to plain 0755 instead.
const USER_ONLY: &[&str] = &["share/zsh", "share/zsh/site-functions"];

/// Subdirectories created when missing.
const CREATE: &[&str] = &[
    "bin",
    "etc",
    "include",
    "lib",
    "sbin",
    "share",
    "var",
    "opt",
    "share/zsh",
    "share/zsh/site-functions",
    "var/homebrew",
    "var/homebrew/linked",
    "Cellar",
    "Caskroom",
    "Homebrew",
    "Frameworks",
];

/// The candidate paths for one install prefix, in catalog order.
#[derive(Debug, Clone)]
pub struct DirectoryCatalog {
    /// Candidates for group-writable chmod.
    pub group_writable: Vec<PathBuf>,
    /// Candidates for the user-only 0755 chmod.
    pub user_only: Vec<PathBuf>,
    /// Candidates for creation.
    pub create: Vec<PathBuf>,
}

impl DirectoryCatalog {
    /// Materialize the catalog against an install prefix.
    pub fn for_prefix(prefix: &Path) -> Self {
        let join = |names: &[&str]| -> Vec<PathBuf> {
            names.iter().map(|name| prefix.join(name)).collect()
        };
        Self {
            group_writable: join(GROUP_WRITABLE),
            user_only: join(USER_ONLY),
            create: join(CREATE),
        }
    }
}
