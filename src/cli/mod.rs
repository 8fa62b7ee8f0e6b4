//! CLI module - argument parsing and run configuration

mod args;
mod config;

pub use args::{Cli, DEFAULT_CONFIG_FILE, MAX_WORKERS};
pub use config::*;
