//! CLI layer - Command-line interface
//!
//! Contains argument parsing, prompts, output formatting, Ctrl+C handling,
//! and the application runners.

pub mod app;
pub mod args;
pub mod config_cmd;
pub mod presenter;
pub mod prompt;
pub mod signals;

// Re-export commonly used types
pub use app::{run_devices, run_interactive, run_record, EXIT_ERROR, EXIT_SUCCESS, EXIT_USAGE_ERROR};
pub use args::{Cli, Commands, ConfigAction, RecordArgs};
pub use presenter::Presenter;
