//! Permission reconciliation planning.
//!
//! Planning is split from mutation: this module only inspects filesystem
//! metadata and computes which directories need chmod/chown/chgrp/mkdir.
//! The privileged shell-outs that apply a plan live in the installer.

pub mod catalog;
pub mod inspect;
pub mod planner;

pub use catalog::DirectoryCatalog;
pub use inspect::{FsInspector, PathInspector, PathState};
pub use planner::{plan, PermissionPlan};
