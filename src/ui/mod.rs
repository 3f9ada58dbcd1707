//! Terminal output and interactive prompts.

pub mod output;
pub mod prompt;

pub use output::Output;
pub use prompt::{is_ci, user_attended, wait_for_any_key, wait_for_user};
