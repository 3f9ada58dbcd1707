//! Privileged command execution via `sudo`.
//!
//! Every privileged action echoes its full command line before running,
//! so the user sees exactly what is executed with elevated rights.

use std::path::PathBuf;
use std::process::{Command, Stdio};

use crate::error::Result;
use crate::exec::command::{run, shell_join};
use crate::ui::Output;

const SUDO: &str = "/usr/bin/sudo";

/// Runner for privileged commands.
pub struct Sudo<'a> {
    out: &'a Output,
}

impl<'a> Sudo<'a> {
    pub fn new(out: &'a Output) -> Self {
        Self { out }
    }

    /// Echo and run a command under sudo, failing fast on non-zero exit.
    ///
    /// When `SUDO_ASKPASS` is set, `-A` is prepended so sudo uses the
    /// askpass helper instead of a terminal prompt.
    pub fn run(&self, args: &[&str]) -> Result<()> {
        let mut full: Vec<&str> = Vec::with_capacity(args.len() + 1);
        if std::env::var_os("SUDO_ASKPASS").is_some() {
            full.push("-A");
        }
        full.extend_from_slice(args);

        let mut display = Vec::with_capacity(full.len() + 1);
        display.push(SUDO);
        display.extend_from_slice(&full);
        self.out.ohai(&shell_join(&display));

        run(SUDO, &full)
    }

    /// Run a command under sudo with a list of paths appended.
    pub fn run_on_paths(&self, base: &[&str], paths: &[PathBuf]) -> Result<()> {
        let rendered: Vec<String> = paths
            .iter()
            .map(|p| p.to_string_lossy().into_owned())
            .collect();
        let mut args: Vec<&str> = base.to_vec();
        args.extend(rendered.iter().map(String::as_str));
        self.run(&args)
    }
}

/// Sudo timestamp hygiene for the whole run.
///
/// If no sudo timestamp was active when the installer started, whatever
/// timestamp the run creates is invalidated again on drop, so the
/// installer does not leave a privileged grace period behind.
pub struct SudoSession {
    invalidate_on_drop: bool,
}

impl SudoSession {
    /// Probe for an already-active timestamp (`sudo -n -v`).
    pub fn begin() -> Self {
        let already_active = Command::new(SUDO)
            .args(["-n", "-v"])
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|status| status.success())
            .unwrap_or(false);

        Self {
            invalidate_on_drop: !already_active,
        }
    }

    /// A session that never invalidates (plan-only runs).
    pub fn inert() -> Self {
        Self {
            invalidate_on_drop: false,
        }
    }
}

impl Drop for SudoSession {
    fn drop(&mut self) {
        if self.invalidate_on_drop {
            let _ = Command::new(SUDO)
                .arg("-k")
                .stdin(Stdio::null())
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .status();
        }
    }
}
