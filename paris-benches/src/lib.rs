//! Benchmark support crate for Paris.
//!
//! Provides seeded synthetic graphs and parameter types used by the Criterion
//! benchmarks comparing the aggregate graph engines.

pub mod params;
pub mod source;

use paris_core::ParisError;

/// Errors that may occur during benchmark setup.
#[derive(Debug, thiserror::Error)]
pub enum BenchSetupError {
    /// Synthetic graph generation failed.
    #[error("synthetic graph generation failed: {0}")]
    Synthetic(#[from] source::SyntheticError),
    /// The core library rejected the graph or configuration.
    #[error("paris operation failed: {0}")]
    Paris(#[from] ParisError),
}
