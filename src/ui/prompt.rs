//! Single-key interactive prompts.

use console::{Key, Term};

use crate::error::{Result, StrapError};

/// Check if running in a CI environment.
///
/// Used to force non-interactive mode. Checks common CI environment
/// variables: `CI`, `GITHUB_ACTIONS`, `GITLAB_CI`, `CIRCLECI`, `TRAVIS`,
/// `JENKINS_URL`.
pub fn is_ci() -> bool {
    std::env::var("CI").is_ok()
        || std::env::var("GITHUB_ACTIONS").is_ok()
        || std::env::var("GITLAB_CI").is_ok()
        || std::env::var("CIRCLECI").is_ok()
        || std::env::var("TRAVIS").is_ok()
        || std::env::var("JENKINS_URL").is_ok()
}

/// Whether a user is attending the terminal.
pub fn user_attended() -> bool {
    console::user_attended()
}

/// "Press RETURN to continue or any other key to abort."
///
/// Only Enter continues; anything else aborts the run. Both `\r` and
/// `\n` count as Enter (the `console` crate normalizes them).
pub fn wait_for_user() -> Result<()> {
    println!();
    println!("Press RETURN to continue or any other key to abort");
    match Term::stdout().read_key() {
        Ok(Key::Enter) => Ok(()),
        Ok(_) => Err(StrapError::Aborted),
        Err(e) => Err(StrapError::Io(e)),
    }
}

/// Block until any key is pressed (used while a GUI installer runs).
pub fn wait_for_any_key() -> Result<()> {
    Term::stdout().read_key().map_err(StrapError::Io)?;
    Ok(())
}
