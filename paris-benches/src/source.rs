//! Seeded planted-partition graphs for benchmarking.
//!
//! Nodes are split into equally sized blocks. Each node draws a fixed number
//! of edges; with probability `mixing` the other endpoint lies in a different
//! block, otherwise in its own. The result has a clear community structure
//! that the merge chain has to recover.

use paris_core::{NormalizedGraph, SparseAdjacency, WeightScheme};
use rand::{Rng, SeedableRng, rngs::SmallRng};

use crate::BenchSetupError;

/// Errors that may occur during synthetic graph generation.
#[derive(Clone, Debug, thiserror::Error, PartialEq)]
pub enum SyntheticError {
    /// Fewer than two nodes were requested.
    #[error("node count must be at least two (got {0})")]
    TooFewNodes(usize),
    /// The block count is zero or exceeds the node count.
    #[error("block count {blocks} must be between one and the node count {nodes}")]
    InvalidBlocks {
        /// Requested block count.
        blocks: usize,
        /// Requested node count.
        nodes: usize,
    },
    /// The mixing probability is outside `[0, 1]`.
    #[error("mixing probability {0} must lie in [0, 1]")]
    InvalidMixing(f64),
}

/// Configuration for planted-partition generation.
#[derive(Clone, Debug)]
pub struct PlantedPartition {
    /// Number of nodes.
    pub node_count: usize,
    /// Number of communities.
    pub blocks: usize,
    /// Edges drawn per node.
    pub edges_per_node: usize,
    /// Probability that an edge leaves its block.
    pub mixing: f64,
    /// RNG seed for reproducibility.
    pub seed: u64,
}

impl PlantedPartition {
    /// A configuration with `node_count` nodes in roughly 20-node blocks.
    #[must_use]
    pub fn with_nodes(node_count: usize, seed: u64) -> Self {
        Self {
            node_count,
            blocks: node_count.div_ceil(20).max(1),
            edges_per_node: 4,
            mixing: 0.05,
            seed,
        }
    }

    /// Generates the weighted edge list.
    ///
    /// # Errors
    /// Returns [`SyntheticError`] when the configuration is out of range.
    ///
    /// # Examples
    /// ```
    /// use paris_benches::source::PlantedPartition;
    ///
    /// let edges = PlantedPartition::with_nodes(100, 7).edges()?;
    /// assert_eq!(edges.len(), 400);
    /// # Ok::<(), paris_benches::source::SyntheticError>(())
    /// ```
    pub fn edges(&self) -> Result<Vec<(usize, usize, f64)>, SyntheticError> {
        self.validate()?;
        let mut rng = SmallRng::seed_from_u64(self.seed);
        let block_size = self.node_count.div_ceil(self.blocks);
        let mut edges = Vec::with_capacity(self.node_count * self.edges_per_node);
        for node in 0..self.node_count {
            let block = node / block_size;
            for _ in 0..self.edges_per_node {
                let target = if self.blocks > 1 && rng.gen_bool(self.mixing) {
                    rng.gen_range(0..self.node_count)
                } else {
                    let start = block * block_size;
                    let end = (start + block_size).min(self.node_count);
                    rng.gen_range(start..end)
                };
                if target != node {
                    edges.push((node, target, rng.gen_range(0.5..2.0)));
                } else {
                    edges.push((node, (node + 1) % self.node_count, 1.0));
                }
            }
        }
        Ok(edges)
    }

    /// Generates the graph and normalises it with degree weights.
    ///
    /// # Errors
    /// Returns [`BenchSetupError`] when generation or normalisation fails.
    pub fn normalized(&self) -> Result<NormalizedGraph, BenchSetupError> {
        let adjacency = SparseAdjacency::from_edges(self.node_count, &self.edges()?)?;
        Ok(NormalizedGraph::new(
            &adjacency,
            &WeightScheme::Degree,
            None,
            true,
        )?)
    }

    fn validate(&self) -> Result<(), SyntheticError> {
        if self.node_count < 2 {
            return Err(SyntheticError::TooFewNodes(self.node_count));
        }
        if self.blocks == 0 || self.blocks > self.node_count {
            return Err(SyntheticError::InvalidBlocks {
                blocks: self.blocks,
                nodes: self.node_count,
            });
        }
        if !(0.0..=1.0).contains(&self.mixing) {
            return Err(SyntheticError::InvalidMixing(self.mixing));
        }
        Ok(())
    }
}
