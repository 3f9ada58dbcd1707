//! The linear installation flow.
//!
//! Mirrors the classic install script: host preflight, a report of the
//! filesystem changes, one confirmation prompt, privileged permission
//! reconciliation, optional Command Line Tools install, then a git
//! fetch/reset of the Homebrew repository. Strictly sequential; the
//! first failing step aborts the run.

use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::config::InstallConfig;
use crate::error::{Result, StrapError};
use crate::exec::{self, Sudo, SudoSession};
use crate::host::checks::{self, SupportLevel};
use crate::host::clt;
use crate::host::version::MacosVersion;
use crate::plan::{self, DirectoryCatalog, FsInspector, PathInspector, PermissionPlan};
use crate::repo;
use crate::ui::{self, Output};

pub struct Installer<'a> {
    config: &'a InstallConfig,
    out: &'a Output,
}

impl<'a> Installer<'a> {
    pub fn new(config: &'a InstallConfig, out: &'a Output) -> Self {
        Self { config, out }
    }

    /// Run the full installation.
    pub fn run(&self) -> Result<()> {
        // No analytics during installation; brew inherits these.
        std::env::set_var("HOMEBREW_NO_ANALYTICS_THIS_RUN", "1");
        std::env::set_var("HOMEBREW_NO_ANALYTICS_MESSAGE_OUTPUT", "1");

        let version = self.preflight()?;

        let catalog = DirectoryCatalog::for_prefix(&self.config.prefix);
        let inspector = FsInspector::new(&self.config.admin_group);
        let plan = plan::plan(&catalog, &inspector);
        let install_clt = clt::should_install(&version);

        self.report(&plan, install_clt);

        if self.config.interactive {
            ui::wait_for_user()?;
        }

        let _session = SudoSession::begin();
        let sudo = Sudo::new(self.out);

        self.apply(&plan, &catalog, &sudo)?;
        self.prepare_cache(&inspector, &sudo)?;

        if install_clt {
            clt::install(&version, self.out, &sudo)?;
        }
        clt::ensure_license_accepted()?;

        repo::sync(self.config, self.out)?;

        self.epilogue()
    }

    /// Dry run: compute the plan and print it (or emit JSON).
    pub fn report_only(&self, json: bool) -> Result<()> {
        let catalog = DirectoryCatalog::for_prefix(&self.config.prefix);
        let inspector = FsInspector::new(&self.config.admin_group);
        let plan = plan::plan(&catalog, &inspector);

        if json {
            let rendered = serde_json::to_string_pretty(&plan)
                .context("failed to serialize permission plan")?;
            println!("{rendered}");
        } else {
            self.report(&plan, false);
        }
        Ok(())
    }

    /// Fatal host checks, in script order, then support warnings.
    fn preflight(&self) -> Result<MacosVersion> {
        if std::env::consts::OS == "linux" {
            return Err(checks::linux_redirect());
        }

        let version = checks::macos_version()?;
        tracing::debug!("detected macOS {}", version);

        if let SupportLevel::Fatal { message } = checks::support_level(&version) {
            return Err(StrapError::UnsupportedHost { message });
        }

        if checks::is_root() {
            return Err(StrapError::UnsupportedHost {
                message: "Don't run this as root!".to_string(),
            });
        }

        if !checks::is_admin_member(&self.config.user, &self.config.admin_group) {
            return Err(StrapError::UnsupportedHost {
                message: format!(
                    "This script requires the user {} to be an Administrator.",
                    self.config.user
                ),
            });
        }

        let prefix = &self.config.prefix;
        if prefix.is_dir() && !crate::plan::inspect::is_searchable(prefix) {
            return Err(StrapError::UnsupportedHost {
                message: format!(
                    "The Homebrew prefix, {prefix}, exists but is not searchable. If this is\n\
                     not intentional, please restore the default permissions and try running the\n\
                     installer again:\n    sudo chmod 775 {prefix}",
                    prefix = prefix.display()
                ),
            });
        }

        if let SupportLevel::Unsupported { what, apple_agrees } = checks::support_level(&version)
        {
            let who = if apple_agrees { "We (and Apple)" } else { "We" };
            self.out.ohai(&format!("You are using macOS {version}."));
            self.out
                .ohai(&format!("{who} do not provide support for this {what}."));
            self.out.plain(&format!(
                "This installation may not succeed.\n\
                 After installation, you will encounter build failures with some formulae.\n\
                 Please create pull requests instead of asking for help on Homebrew's GitHub,\n\
                 Discourse, Twitter or IRC. You are responsible for resolving any issues you\n\
                 experience while you are running this {what}.\n"
            ));
        }

        Ok(version)
    }

    /// Print everything the run is about to do.
    fn report(&self, plan: &PermissionPlan, install_clt: bool) {
        let prefix = &self.config.prefix;
        self.out.ohai("This script will install:");
        for installed in [
            "bin/brew",
            "share/doc/homebrew",
            "share/man/man1/brew.1",
            "share/zsh/site-functions/_brew",
            "etc/bash_completion.d/brew",
        ] {
            self.out.plain(&prefix.join(installed).display().to_string());
        }
        self.out
            .plain(&self.config.repository.display().to_string());

        // Only paths that exist right now are chmod/chown/chgrp'd in
        // place; missing ones get their bits when they are created.
        let group_chmods = existing(&plan.group_chmods);
        let user_chmods = existing(&plan.user_chmods);
        let chowns = existing(&plan.chowns);
        let chgrps = existing(&plan.chgrps);

        if !group_chmods.is_empty() {
            self.out
                .ohai("The following existing directories will be made group writable:");
            self.out.list(&group_chmods);
        }
        if !user_chmods.is_empty() {
            self.out
                .ohai("The following existing directories will be made writable by user only:");
            self.out.list(&user_chmods);
        }
        if !chowns.is_empty() {
            self.out.ohai(&format!(
                "The following existing directories will have their owner set to {}:",
                self.out.underline(&self.config.user)
            ));
            self.out.list(&chowns);
        }
        if !chgrps.is_empty() {
            self.out.ohai(&format!(
                "The following existing directories will have their group set to {}:",
                self.out.underline(&self.config.admin_group)
            ));
            self.out.list(&chgrps);
        }
        if !plan.mkdirs.is_empty() {
            self.out
                .ohai("The following new directories will be created:");
            self.out.list(&plan.mkdirs);
        }
        if install_clt {
            self.out
                .ohai("The Xcode Command Line Tools will be installed.");
        }
    }

    /// Apply a permission plan through privileged shell-outs.
    fn apply(&self, plan: &PermissionPlan, catalog: &DirectoryCatalog, sudo: &Sudo) -> Result<()> {
        let user = self.config.user.as_str();
        let group = self.config.admin_group.as_str();

        if self.config.prefix.is_dir() {
            let chmods = existing(&plan.chmods);
            let group_chmods = existing(&plan.group_chmods);
            let user_chmods = existing(&plan.user_chmods);
            let chowns = existing(&plan.chowns);
            let chgrps = existing(&plan.chgrps);

            if !chmods.is_empty() {
                sudo.run_on_paths(&["/bin/chmod", "u+rwx"], &chmods)?;
            }
            if !group_chmods.is_empty() {
                sudo.run_on_paths(&["/bin/chmod", "g+rwx"], &group_chmods)?;
            }
            if !user_chmods.is_empty() {
                sudo.run_on_paths(&["/bin/chmod", "755"], &user_chmods)?;
            }
            if !chowns.is_empty() {
                sudo.run_on_paths(&["/usr/sbin/chown", user], &chowns)?;
            }
            if !chgrps.is_empty() {
                sudo.run_on_paths(&["/usr/bin/chgrp", group], &chgrps)?;
            }
        } else {
            let prefix = self.config.prefix.to_string_lossy().into_owned();
            sudo.run(&["/bin/mkdir", "-p", &prefix])?;
            sudo.run(&["/usr/sbin/chown", "root:wheel", &prefix])?;
        }

        if !plan.mkdirs.is_empty() {
            sudo.run_on_paths(&["/bin/mkdir", "-p"], &plan.mkdirs)?;
            sudo.run_on_paths(&["/bin/chmod", "g+rwx"], &plan.mkdirs)?;
            sudo.run_on_paths(&["/bin/chmod", "755"], &catalog.user_only)?;
            sudo.run_on_paths(&["/usr/sbin/chown", user], &plan.mkdirs)?;
            sudo.run_on_paths(&["/usr/bin/chgrp", group], &plan.mkdirs)?;
        }

        Ok(())
    }

    /// Create and reconcile the download cache, then mark it cleaned.
    fn prepare_cache(&self, inspector: &FsInspector, sudo: &Sudo) -> Result<()> {
        let cache = &self.config.cache;
        let rendered = cache.to_string_lossy().into_owned();

        if !cache.is_dir() {
            sudo.run(&["/bin/mkdir", "-p", &rendered])?;
        }

        // Re-inspect after the mkdir; a fresh sudo-created directory is
        // root-owned and needs the full treatment.
        let state = inspector.inspect(cache);
        if state.exists && !state.accessible {
            sudo.run(&["/bin/chmod", "g+rwx", &rendered])?;
        }
        if state.exists && !state.owned_by_user {
            sudo.run(&["/usr/sbin/chown", &self.config.user, &rendered])?;
        }
        if state.exists && !state.group_is_admin {
            sudo.run(&["/usr/bin/chgrp", &self.config.admin_group, &rendered])?;
        }

        if cache.is_dir() {
            let cleaned = cache.join(".cleaned");
            exec::run("/usr/bin/touch", &[&cleaned.to_string_lossy()])?;
        }
        Ok(())
    }

    /// Success banner, PATH advice, analytics and donation notices.
    fn epilogue(&self) -> Result<()> {
        let bin = self.config.prefix.join("bin");
        let on_path = std::env::var("PATH")
            .unwrap_or_default()
            .split(':')
            .any(|entry| Path::new(entry) == bin);
        if !on_path {
            self.out
                .warn(&format!("{} is not in your PATH.", bin.display()));
        }

        self.out.ohai("Installation successful!");
        self.out.plain("");
        self.out.bell();

        self.out
            .ohai("Homebrew has enabled anonymous aggregate formulae and cask analytics.");
        self.out.plain(&format!(
            "Read the analytics documentation (and how to opt-out) here:\n  {}\n",
            self.out.underline("https://docs.brew.sh/Analytics")
        ));

        self.out
            .ohai("Homebrew is run entirely by unpaid volunteers. Please consider donating:");
        self.out.plain(&format!(
            "  {}",
            self.out
                .underline("https://github.com/Homebrew/brew#donations")
        ));

        repo::enable_analytics_messages(self.config)?;

        self.out.ohai("Next steps:");
        self.out.plain("- Run `brew help` to get started");
        self.out.plain("- Further documentation: ");
        self.out
            .plain(&format!("    {}", self.out.underline("https://docs.brew.sh")));
        Ok(())
    }
}

/// Paths from a plan set that exist at this moment.
fn existing(paths: &[PathBuf]) -> Vec<PathBuf> {
    paths.iter().filter(|p| p.exists()).cloned().collect()
}
