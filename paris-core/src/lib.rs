//! Paris hierarchical graph clustering.
//!
//! The crate turns a weighted graph into a binary dendrogram by repeatedly
//! merging the pair of clusters with the highest Paris similarity
//! `p(a, b) / (p(a) p(b))`. Merges are discovered with a reciprocal
//! nearest-neighbour chain over a mutable aggregate graph, and the result is
//! emitted as `n - 1` rows in the `[left, right, height, size]` layout.
//!
//! ```
//! use paris_core::{ParisBuilder, SparseAdjacency, WeightScheme};
//!
//! let adjacency = SparseAdjacency::from_edges(4, &[(0, 1, 1.0), (2, 3, 1.0)])?;
//! let dendrogram = ParisBuilder::new()
//!     .build()?
//!     .fit_adjacency(&adjacency, &WeightScheme::Degree)?;
//! assert_eq!(dendrogram.len(), 3);
//! assert_eq!(dendrogram.infinite_merge_count(), 1);
//! # Ok::<(), paris_core::ParisError>(())
//! ```
#![cfg_attr(docsrs, feature(doc_cfg))]

mod adjacency;
mod builder;
mod chain;
mod dendrogram;
mod error;
pub mod graph;
mod paris;

pub use crate::{
    adjacency::{NormalizedGraph, SparseAdjacency, WeightScheme},
    builder::{Engine, ParisBuilder},
    chain::ChainMerger,
    dendrogram::{Dendrogram, DendrogramBuilder, INFINITE_HEIGHT, Merge, reorder},
    error::{AdjacencyError, AdjacencyErrorCode, ParisError, ParisErrorCode, Result},
    paris::Paris,
};

#[cfg(test)]
mod property;
#[cfg(test)]
pub(crate) mod test_utils;
