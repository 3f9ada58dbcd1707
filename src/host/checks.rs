//! Host preflight checks and the macOS support window.

use crate::error::{Result, StrapError};
use crate::exec;
use crate::host::version::MacosVersion;

// TODO: bump both when a new macOS is released.
pub const MACOS_LATEST_SUPPORTED: &str = "10.15";
pub const MACOS_OLDEST_SUPPORTED: &str = "10.13";

/// Where a macOS release falls relative to the supported window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SupportLevel {
    /// Installation cannot proceed at all.
    Fatal { message: String },
    /// Installation proceeds, but with a prominent warning.
    Unsupported {
        /// "pre-release version" or "old version".
        what: &'static str,
        /// Whether Apple has also dropped support ("We (and Apple)").
        apple_agrees: bool,
    },
    Supported,
}

/// Classify a macOS version against the supported window.
pub fn support_level(version: &MacosVersion) -> SupportLevel {
    if *version < *"10.7" {
        SupportLevel::Fatal {
            message: "Your Mac OS X version is too old. See:\n  \
                      https://github.com/mistydemeo/tigerbrew"
                .to_string(),
        }
    } else if *version < *"10.9" {
        SupportLevel::Fatal {
            message: "Your OS X version is too old".to_string(),
        }
    } else if *version > *MACOS_LATEST_SUPPORTED {
        SupportLevel::Unsupported {
            what: "pre-release version",
            apple_agrees: false,
        }
    } else if *version < *MACOS_OLDEST_SUPPORTED {
        SupportLevel::Unsupported {
            what: "old version",
            apple_agrees: true,
        }
    } else {
        SupportLevel::Supported
    }
}

/// Query the running macOS version via `sw_vers`.
pub fn macos_version() -> Result<MacosVersion> {
    let captured = exec::capture("/usr/bin/sw_vers", &["-productVersion"])?;
    MacosVersion::from_product_version(captured.stdout.trim())
}

/// Whether the process is running as root.
pub fn is_root() -> bool {
    #[cfg(unix)]
    {
        // SAFETY: geteuid() has no preconditions and cannot fail.
        unsafe { libc::geteuid() == 0 }
    }

    #[cfg(not(unix))]
    {
        false
    }
}

/// Whether the user is a member of the admin group, per `dsmemberutil`.
///
/// A failed query counts as "not a member"; the caller aborts either way.
pub fn is_admin_member(user: &str, admin_group: &str) -> bool {
    exec::capture(
        "/usr/bin/dsmemberutil",
        &["checkmembership", "-U", user, "-G", admin_group],
    )
    .map(|captured| captured.stdout.contains("user is a member"))
    .unwrap_or(false)
}

/// Linuxbrew redirect for Linux hosts.
pub fn linux_redirect() -> StrapError {
    StrapError::UnsupportedHost {
        message: "To install Linuxbrew, paste at a terminal prompt:\n  \
                  sh -c \"$(curl -fsSL https://raw.githubusercontent.com/Linuxbrew/install/master/install.sh)\""
            .to_string(),
    }
}
