use paris_core::ParisError;
use thiserror::Error;

/// Failure to read or interpret an edge list.
#[derive(Debug, Error)]
pub enum EdgeListError {
    /// The input contains no edges.
    #[error("edge list `{name}` contains no edges")]
    EmptyInput {
        /// Name of the source.
        name: String,
    },
    /// A line could not be parsed.
    #[error("line {line}: {reason}")]
    InvalidLine {
        /// One-based line number.
        line: usize,
        /// What was wrong with the line.
        reason: String,
    },
    /// The requested node count does not cover every edge endpoint.
    #[error("node count {requested} is too small; edges reference node {max_id}")]
    NodeCountTooSmall {
        /// Node count requested by the caller.
        requested: usize,
        /// Largest node id found in the edges.
        max_id: usize,
    },
    /// The requested node count is beyond what the engines support.
    #[error("node count {requested} exceeds the supported maximum of {max}")]
    NodeCountTooLarge {
        /// Node count requested by the caller.
        requested: usize,
        /// Largest supported node count.
        max: usize,
    },
    /// The edges were rejected by the core library.
    #[error("core error: {0}")]
    Core(#[from] ParisError),
    /// Reading the input failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}
