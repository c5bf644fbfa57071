//! CLI command handlers. Each command is in its own file.

mod completions;
mod config;
mod resolve;

pub use completions::{run_completions, run_man};
pub use config::run_config;
pub use resolve::{run_resolve, ResolveArgs};
