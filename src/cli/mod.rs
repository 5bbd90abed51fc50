//! Command-line interface.

pub mod commands;
pub mod context;
pub mod output;
pub mod types;

pub use output::{handle_error, output, CommandOutput};
pub use types::{Cli, Commands, ConfigCommands};
