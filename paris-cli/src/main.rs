//! `paris` command-line entry point.
//!
//! Reads an edge list, clusters it, and prints the dendrogram to `stdout`.
//! Failures are logged with their stable error code and mapped to a non-zero
//! exit status.

use std::io::{self, BufWriter, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use paris_cli::{
    cli::{Cli, CliError, render_summary, run_cli},
    logging::{self, LoggingConfig, LoggingError},
};
use tracing::{error, field};

fn try_main(cli: Cli) -> Result<()> {
    let summary = run_cli(cli).context("failed to execute command")?;
    let stdout = io::stdout();
    let mut writer = BufWriter::new(stdout.lock());
    render_summary(&summary, &mut writer).context("failed to render dendrogram")?;
    writer.flush().context("failed to flush output")?;
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let logging = LoggingConfig::resolve(&cli.logging)
        .and_then(|config| logging::init_logging(&config));
    if let Err(err) = logging {
        report_logging_init_error(&err);
        return ExitCode::FAILURE;
    }

    if let Err(err) = try_main(cli) {
        let core = err.downcast_ref::<CliError>().and_then(CliError::core);
        let code = core.map(|core| field::display(core.code().as_str()));
        let adjacency_code = core
            .and_then(|core| core.adjacency_code())
            .map(|code| field::display(code.as_str()));

        error!(
            error = %err,
            code,
            adjacency_code,
            "command execution failed"
        );
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

#[expect(
    clippy::print_stderr,
    reason = "tracing is not installed yet, so stderr is the only channel"
)]
fn report_logging_init_error(err: &LoggingError) {
    eprintln!("failed to initialise logging: {err}");
}
