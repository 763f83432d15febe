//! Command implementations and argument parsing for the Paris CLI.

use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use paris_core::{Dendrogram, Engine, NormalizedGraph, ParisBuilder, ParisError, WeightScheme};
use paris_providers_edgelist::{EdgeListError, EdgeListSource};
use thiserror::Error;
use tracing::{Span, field, info, instrument};

use crate::logging::LogArgs;

/// Top-level CLI options parsed by [`clap`].
#[derive(Debug, Parser, Clone)]
#[command(name = "paris", about = "Hierarchical clustering of weighted graphs.")]
pub struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    pub command: Command,

    /// Diagnostic output options.
    #[command(flatten)]
    pub logging: LogArgs,
}

/// Supported CLI commands.
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Cluster an edge list and print its dendrogram.
    Run(RunCommand),
}

/// Options accepted by the `run` command.
#[derive(Debug, Args, Clone)]
pub struct RunCommand {
    /// Edge list with one `source target [weight]` triple per line.
    pub path: PathBuf,

    /// Aggregate graph engine.
    #[arg(long, value_enum, default_value_t = EngineArg::Auto)]
    pub engine: EngineArg,

    /// Node weighting used to normalise similarities.
    #[arg(long, value_enum, default_value_t = WeightsArg::Degree)]
    pub weights: WeightsArg,

    /// Symmetrise the input before computing node weights.
    #[arg(long)]
    pub force_undirected: bool,

    /// Keep merges in discovery order instead of sorting them by height.
    #[arg(long)]
    pub no_reorder: bool,

    /// Total node count; nodes beyond the largest id are isolated.
    #[arg(long)]
    pub nodes: Option<usize>,

    /// Override name for the data source (defaults to the file name).
    #[arg(long)]
    pub name: Option<String>,
}

/// Engine choices exposed on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EngineArg {
    /// Let the library choose.
    Auto,
    /// Per-cluster neighbour maps.
    #[value(alias = "python")]
    Reference,
    /// Flat adjacency lists.
    #[value(alias = "numba")]
    Flat,
}

impl From<EngineArg> for Engine {
    fn from(arg: EngineArg) -> Self {
        match arg {
            EngineArg::Auto => Self::Auto,
            EngineArg::Reference => Self::Reference,
            EngineArg::Flat => Self::Flat,
        }
    }
}

/// Node weighting choices exposed on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum WeightsArg {
    /// Weight nodes by weighted degree.
    Degree,
    /// Weight all nodes equally.
    Uniform,
}

impl From<WeightsArg> for WeightScheme {
    fn from(arg: WeightsArg) -> Self {
        match arg {
            WeightsArg::Degree => Self::Degree,
            WeightsArg::Uniform => Self::Uniform,
        }
    }
}

/// Errors surfaced while executing CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// The input file could not be opened.
    #[error("failed to open `{path}`: {source}")]
    Io {
        /// Path that triggered the failure.
        path: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
    /// The edge list could not be read.
    #[error(transparent)]
    EdgeList(#[from] EdgeListError),
    /// Clustering failed.
    #[error(transparent)]
    Core(#[from] ParisError),
}

impl CliError {
    /// The core error behind this failure, if any.
    #[must_use]
    pub fn core(&self) -> Option<&ParisError> {
        match self {
            Self::Core(error) | Self::EdgeList(EdgeListError::Core(error)) => Some(error),
            _ => None,
        }
    }
}

/// Outcome of a `run` command.
#[derive(Debug, Clone)]
pub struct ExecutionSummary {
    /// Name of the data source.
    pub data_source: String,
    /// Number of nodes clustered.
    pub nodes: usize,
    /// The resulting dendrogram.
    pub dendrogram: Dendrogram,
}

/// Executes the CLI command represented by `cli`.
///
/// # Errors
/// Returns [`CliError`] when reading the input or clustering fails.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use paris_cli::cli::{Cli, Command, EngineArg, RunCommand, WeightsArg, run_cli};
/// # use paris_cli::logging::LogArgs;
/// # use tempfile::NamedTempFile;
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let file = NamedTempFile::new()?;
/// std::fs::write(file.path(), "0 1\n1 2\n2 0\n")?;
/// let cli = Cli {
///     command: Command::Run(RunCommand {
///         path: file.path().to_path_buf(),
///         engine: EngineArg::Auto,
///         weights: WeightsArg::Degree,
///         force_undirected: true,
///         no_reorder: false,
///         nodes: None,
///         name: None,
///     }),
///     logging: LogArgs::default(),
/// };
/// let summary = run_cli(cli)?;
/// assert_eq!(summary.dendrogram.len(), 2);
/// # Ok(())
/// # }
/// ```
#[instrument(
    name = "cli.run",
    err,
    skip(cli),
    fields(command = field::Empty),
)]
pub fn run_cli(cli: Cli) -> Result<ExecutionSummary, CliError> {
    match cli.command {
        Command::Run(run) => {
            Span::current().record("command", field::display("run"));
            run_command(run)
        }
    }
}

#[instrument(
    name = "cli.execute",
    err,
    skip(command),
    fields(
        path = %command.path.display(),
        engine = ?command.engine,
        weights = ?command.weights,
        nodes = field::Empty,
    ),
)]
pub(super) fn run_command(command: RunCommand) -> Result<ExecutionSummary, CliError> {
    let paris = ParisBuilder::new()
        .with_engine(command.engine.into())
        .with_reorder(!command.no_reorder)
        .build()?;

    let name = derive_data_source_name(&command.path, command.name.as_deref());
    let reader = open_edge_list(&command.path)?;
    let mut source = EdgeListSource::try_from_reader(name, reader)?;
    if let Some(nodes) = command.nodes {
        source = source.with_node_count(nodes)?;
    }
    Span::current().record("nodes", source.node_count());

    let adjacency = source.to_adjacency()?;
    let graph = NormalizedGraph::new(
        &adjacency,
        &command.weights.into(),
        None,
        command.force_undirected,
    )?;
    let dendrogram = paris.fit(&graph)?;

    info!(
        data_source = source.name(),
        nodes = source.node_count(),
        merges = dendrogram.len(),
        components = dendrogram.infinite_merge_count() + 1,
        "command completed"
    );
    Ok(ExecutionSummary {
        data_source: source.name().to_owned(),
        nodes: source.node_count(),
        dendrogram,
    })
}

#[instrument(name = "cli.open_edge_list", err, fields(path = field::Empty))]
pub(super) fn open_edge_list(path: &Path) -> Result<File, CliError> {
    Span::current().record("path", field::display(path.display()));
    File::open(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })
}

pub(super) fn derive_data_source_name(path: &Path, override_name: Option<&str>) -> String {
    if let Some(name) = override_name {
        return name.to_owned();
    }

    path.file_stem()
        .and_then(|value| value.to_str())
        .map_or_else(|| "graph".to_owned(), ToOwned::to_owned)
}

/// Renders `summary` to `writer`: a short header followed by one
/// `left<TAB>right<TAB>height<TAB>size` row per merge.
///
/// # Errors
/// Returns [`io::Error`] if writing to the supplied writer fails.
///
/// # Examples
/// ```
/// # use std::io::Cursor;
/// # use paris_cli::cli::{ExecutionSummary, render_summary};
/// # use paris_core::{Dendrogram, Merge};
/// let summary = ExecutionSummary {
///     data_source: "pair".into(),
///     nodes: 2,
///     dendrogram: Dendrogram::from_merges(vec![Merge::new(1, 0, 0.5, 2)]),
/// };
/// let mut buffer = Cursor::new(Vec::new());
/// render_summary(&summary, &mut buffer)?;
/// let text = String::from_utf8(buffer.into_inner())?;
/// assert_eq!(text, "data source: pair\nnodes: 2\nmerges: 1\n1\t0\t0.5\t2\n");
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn render_summary(summary: &ExecutionSummary, mut writer: impl Write) -> io::Result<()> {
    writeln!(writer, "data source: {}", summary.data_source)?;
    writeln!(writer, "nodes: {}", summary.nodes)?;
    writeln!(writer, "merges: {}", summary.dendrogram.len())?;
    for merge in summary.dendrogram.merges() {
        writeln!(
            writer,
            "{}\t{}\t{}\t{}",
            merge.left(),
            merge.right(),
            merge.height(),
            merge.size()
        )?;
    }
    Ok(())
}
