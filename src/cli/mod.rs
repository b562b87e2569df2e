//! CLI module for csvstore
//!
//! One-shot commands against a data directory. Each prints a single JSON
//! response on stdout; logs go to stderr.

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{execute, parse_assignment, parse_condition, resolve_config, run};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{write_error, write_response};
