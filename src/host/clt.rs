//! Xcode Command Line Tools detection and installation.

use std::cmp::Ordering;
use std::path::Path;

use crate::error::{Result, StrapError};
use crate::exec::{self, Sudo};
use crate::host::version::MacosVersion;
use crate::ui::{self, Output};

const CLT_ROOT: &str = "/Library/Developer/CommandLineTools";
const CLT_GIT: &str = "/Library/Developer/CommandLineTools/usr/bin/git";
const ICONV_HEADER: &str = "/usr/include/iconv.h";

/// Temporary file that prompts `softwareupdate` to list the CLT.
const CLT_PLACEHOLDER: &str =
    "/tmp/.com.apple.dt.CommandLineTools.installondemand.in-progress";

/// Whether the Command Line Tools need to be installed.
pub fn should_install(version: &MacosVersion) -> bool {
    should_install_at(version, Path::new(CLT_GIT), Path::new(ICONV_HEADER))
}

/// Probe with explicit paths so tests can point at a scratch tree.
///
/// On releases newer than 10.13 only the CLT git binary matters; older
/// releases also need the iconv header that full Xcode installs used to
/// provide.
pub(crate) fn should_install_at(
    version: &MacosVersion,
    clt_git: &Path,
    iconv_header: &Path,
) -> bool {
    if *version > *"10.13" {
        !clt_git.exists()
    } else {
        !clt_git.exists() || !iconv_header.exists()
    }
}

/// Install the Command Line Tools.
///
/// Tries the headless `softwareupdate` route first (10.13 and newer);
/// if the tools are still missing afterwards and a user is attending the
/// terminal, falls back to the GUI `xcode-select --install` flow.
pub fn install(version: &MacosVersion, out: &Output, sudo: &Sudo) -> Result<()> {
    if *version >= *"10.13" {
        out.ohai("Searching online for the Command Line Tools");
        sudo.run(&["/usr/bin/touch", CLT_PLACEHOLDER])?;

        let label = exec::capture("/usr/sbin/softwareupdate", &["-l"])
            .ok()
            .and_then(|captured| latest_label(&captured.stdout));

        if let Some(label) = label {
            out.ohai(&format!("Installing {label}"));
            sudo.run(&["/usr/sbin/softwareupdate", "-i", &label])?;
            sudo.run(&["/bin/rm", "-f", CLT_PLACEHOLDER])?;
            sudo.run(&["/usr/bin/xcode-select", "--switch", CLT_ROOT])?;
        }
    }

    // The headless install may have failed; fall back to the GUI flow.
    if should_install(version) && ui::user_attended() {
        out.ohai("Installing the Command Line Tools (expect a GUI popup):");
        sudo.run(&["/usr/bin/xcode-select", "--install"])?;
        out.plain("Press any key when the installation has completed.");
        ui::wait_for_any_key()?;
        sudo.run(&["/usr/bin/xcode-select", "--switch", CLT_ROOT])?;
    }

    Ok(())
}

/// Abort when the Xcode license has not been accepted.
///
/// `xcrun clang` failing while mentioning "license" is the signal; any
/// other failure (including xcrun being absent) is ignored here.
pub fn ensure_license_accepted() -> Result<()> {
    let Ok(captured) = exec::capture("/usr/bin/xcrun", &["clang"]) else {
        return Ok(());
    };
    let combined = format!("{}{}", captured.stdout, captured.stderr);
    if !captured.success && combined.contains("license") {
        return Err(StrapError::LicenseNotAccepted);
    }
    Ok(())
}

/// Pick the newest "Command Line Tools" label from `softwareupdate -l`
/// output.
///
/// Listing lines look like `   * Label: Command Line Tools for
/// Xcode-12.4` (Catalina and newer) or `   * Command Line Tools (macOS
/// High Sierra version 10.13) for Xcode-10.1` (older). The newest label
/// wins under version-aware ordering.
pub fn latest_label(listing: &str) -> Option<String> {
    let mut labels: Vec<&str> = Vec::new();
    for line in listing.lines() {
        let trimmed = line.trim_start();
        let Some(rest) = trimmed.strip_prefix('*') else {
            continue;
        };
        let rest = rest.trim_start();
        let label = rest
            .strip_prefix("Label:")
            .map(str::trim_start)
            .unwrap_or(rest)
            .trim_end();
        if label.contains("Command Line Tools") {
            labels.push(label);
        }
    }
    labels
        .into_iter()
        .max_by(|a, b| natural_cmp(a, b))
        .map(str::to_string)
}

/// `sort -V`-style comparison: digit runs compare numerically, other
/// runs lexically.
fn natural_cmp(a: &str, b: &str) -> Ordering {
    chunks(a).cmp(&chunks(b))
}

#[derive(PartialEq, Eq, PartialOrd, Ord)]
enum Chunk<'a> {
    Number(u64),
    Text(&'a str),
}

fn chunks(s: &str) -> Vec<Chunk<'_>> {
    let bytes = s.as_bytes();
    let mut out = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        let start = i;
        let digits = bytes[i].is_ascii_digit();
        while i < bytes.len() && bytes[i].is_ascii_digit() == digits {
            i += 1;
        }
        let piece = &s[start..i];
        if digits {
            // Overlong digit runs saturate.
            out.push(Chunk::Number(piece.parse().unwrap_or(u64::MAX)));
        } else {
            out.push(Chunk::Text(piece));
        }
    }
    out
}
