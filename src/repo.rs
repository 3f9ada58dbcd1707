//! Homebrew repository checkout and update.

use std::path::Path;

use crate::config::InstallConfig;
use crate::error::Result;
use crate::exec;
use crate::ui::Output;

/// Fetch and hard-reset the Homebrew repository, then hand over to
/// `brew update`.
///
/// Done as init/config/fetch/reset instead of a clone so reinstalling
/// over an existing checkout cannot hit merge errors.
pub fn sync(config: &InstallConfig, out: &Output) -> Result<()> {
    out.ohai("Downloading and installing Homebrew...");
    let repo = &config.repository;

    git(repo, &["init", "-q"])?;

    // "git remote add" fails when the remote is already defined in the
    // global config, so set the keys directly.
    git(repo, &["config", "remote.origin.url", &config.remote_url])?;
    git(
        repo,
        &[
            "config",
            "remote.origin.fetch",
            "+refs/heads/*:refs/remotes/origin/*",
        ],
    )?;

    // Don't munge line endings on checkout.
    git(repo, &["config", "core.autocrlf", "false"])?;

    git(
        repo,
        &[
            "fetch",
            "origin",
            "master:refs/remotes/origin/master",
            "--tags",
            "--force",
        ],
    )?;
    git(repo, &["reset", "--hard", "origin/master"])?;

    let brew_source = repo.join("bin/brew");
    let brew_target = config.prefix.join("bin/brew");
    let source = brew_source.to_string_lossy();
    let target = brew_target.to_string_lossy();
    exec::run_in(Some(repo), "ln", &["-sf", &source, &target])?;

    exec::run_in(Some(repo), &target, &["update", "--force"])?;

    Ok(())
}

/// Re-enable the analytics notices that were suppressed during install.
pub fn enable_analytics_messages(config: &InstallConfig) -> Result<()> {
    let repo = &config.repository;
    git(
        repo,
        &["config", "--replace-all", "homebrew.analyticsmessage", "true"],
    )?;
    git(
        repo,
        &[
            "config",
            "--replace-all",
            "homebrew.caskanalyticsmessage",
            "true",
        ],
    )?;
    Ok(())
}

fn git(dir: &Path, args: &[&str]) -> Result<()> {
    exec::run_in(Some(dir), "git", args)
}
