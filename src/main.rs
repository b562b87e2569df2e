//! csvstore CLI entry point
//!
//! Parsing, dispatch and output all live in the CLI module. Errors are
//! reported as the JSON response on stdout; this only sets the exit status.

use csvstore::cli;

fn main() {
    if cli::run().is_err() {
        std::process::exit(1);
    }
}
