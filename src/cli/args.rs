//! CLI argument definitions using clap
//!
//! Commands:
//! - csvstore create-table <table> <columns>...
//! - csvstore insert <table> --set col=value...
//! - csvstore query <table> [--where "<col> <op> <value>"]...
//! - csvstore select <table> [--column <col>]... [--where ...]...
//! - csvstore update <table> --set col=value... [--where ...]...
//! - csvstore delete <table> [--where ...]...
//! - csvstore range <table> --column <col> [--order asc|desc] --limit <n>
//! - csvstore list-tables
//! - csvstore path <table>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// csvstore - tables kept as plain CSV files
#[derive(Parser, Debug)]
#[command(name = "csvstore")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Data directory, overrides the configuration file
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a table with the given columns
    CreateTable {
        table: String,
        #[arg(required = true)]
        columns: Vec<String>,
    },

    /// Append one record
    Insert {
        table: String,
        /// Column value as col=value
        #[arg(long = "set")]
        values: Vec<String>,
    },

    /// Return every record matching all conditions
    Query {
        table: String,
        /// Condition as "<column> <operator> <value>"
        #[arg(long = "where")]
        conditions: Vec<String>,
    },

    /// Like query, restricted to some columns
    Select {
        table: String,
        /// Column to keep, all columns when omitted
        #[arg(long = "column", short = 'c')]
        columns: Vec<String>,
        #[arg(long = "where")]
        conditions: Vec<String>,
    },

    /// Change every matching record
    Update {
        table: String,
        #[arg(long = "set", required = true)]
        values: Vec<String>,
        #[arg(long = "where")]
        conditions: Vec<String>,
    },

    /// Remove every matching record
    Delete {
        table: String,
        #[arg(long = "where")]
        conditions: Vec<String>,
    },

    /// Sort the table by a column and return the first records
    Range {
        table: String,
        #[arg(long)]
        column: String,
        /// asc or desc
        #[arg(long, default_value = "asc")]
        order: String,
        #[arg(long)]
        limit: usize,
    },

    /// List table names
    ListTables,

    /// Print the file path of a table
    Path { table: String },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
