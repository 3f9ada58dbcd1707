//! Strap - one-shot Homebrew bootstrap installer for macOS.
//!
//! Strap validates host preconditions (OS version, privileges, prefix
//! permissions), reconciles the `/usr/local` directory tree, optionally
//! installs the Xcode Command Line Tools, and clones/updates the
//! Homebrew repository before handing over to `brew update`.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Immutable run configuration built once at startup
//! - [`error`] - Error types and result aliases
//! - [`exec`] - Fail-fast shell-outs and privileged (sudo) execution
//! - [`host`] - macOS version comparison, preflight checks, CLT handling
//! - [`installer`] - The linear installation flow
//! - [`plan`] - Permission reconciliation planning (pure, no mutation)
//! - [`repo`] - Homebrew repository checkout and update
//! - [`ui`] - Styled output and single-key prompts
//!
//! # Example
//!
//! ```
//! use strap::host::MacosVersion;
//!
//! // Dotted versions compare numerically, component by component.
//! let version: MacosVersion = "10.13".parse().unwrap();
//! assert!(version > *"10.9");
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod exec;
pub mod host;
pub mod installer;
pub mod plan;
pub mod repo;
pub mod ui;

pub use error::{Result, StrapError};
