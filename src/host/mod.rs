//! Host inspection: macOS version, privilege and support checks, and
//! Command Line Tools detection.

pub mod checks;
pub mod clt;
pub mod version;

pub use checks::{support_level, SupportLevel};
pub use version::MacosVersion;
