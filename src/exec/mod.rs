//! External command execution.

pub mod command;
pub mod sudo;

pub use command::{capture, run, run_in, shell_join, Captured};
pub use sudo::{Sudo, SudoSession};
