//! Command-line interface for Paris clustering.
//!
//! The `run` command reads an edge list, clusters it, and prints the
//! dendrogram as tab-separated rows.

mod commands;

pub use commands::{
    Cli, CliError, Command, EngineArg, ExecutionSummary, RunCommand, WeightsArg, render_summary,
    run_cli,
};
