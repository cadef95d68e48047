//! Command-line interface
//!
//! - `args` - argument definitions (clap derive)
//! - `commands` - command handlers

pub mod args;
pub mod commands;

pub use args::{Args, Commands};
pub use commands::run_command;
