//! `memctl`: the memory service operations as shell commands.

pub mod cli;
pub mod commands;

pub use cli::Cli;
pub use commands::{run, CliResult};
