//! Entry point for running Paris hierarchical clustering.
//!
//! Provides the [`Paris`] runtime, which validates the input graph, drives the
//! chain merger over the selected engine, and optionally canonicalises the
//! resulting dendrogram.

use tracing::{instrument, warn};

use crate::{
    Result,
    adjacency::{NormalizedGraph, SparseAdjacency, WeightScheme},
    builder::Engine,
    chain::ChainMerger,
    dendrogram::Dendrogram,
    error::ParisError,
    graph::{FlatGraph, MapGraph},
};

/// Configured Paris clustering run.
///
/// # Examples
/// ```
/// use paris_core::{ParisBuilder, SparseAdjacency, WeightScheme};
///
/// let edges = [(0, 1, 1.0), (0, 4, 1.0), (1, 2, 1.0), (1, 4, 1.0), (2, 3, 1.0), (3, 4, 1.0)];
/// let adjacency = SparseAdjacency::from_edges(5, &edges)?;
/// let paris = ParisBuilder::new().build()?;
/// let dendrogram = paris.fit_adjacency(&adjacency, &WeightScheme::Degree)?;
/// assert_eq!(dendrogram.len(), 4);
/// assert_eq!(dendrogram.root_size(), 5);
/// assert!(dendrogram.is_height_sorted());
/// # Ok::<(), paris_core::ParisError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Paris {
    engine: Engine,
    reorder: bool,
}

impl Paris {
    pub(crate) fn new(engine: Engine, reorder: bool) -> Self {
        Self { engine, reorder }
    }

    /// Returns the engine selected at build time, before resolution.
    #[must_use]
    pub fn engine(&self) -> Engine {
        self.engine
    }

    /// Returns whether [`Paris::fit`] reorders its output by height.
    #[must_use]
    pub fn reorder(&self) -> bool {
        self.reorder
    }

    /// Clusters a normalised graph and returns its dendrogram.
    ///
    /// The dendrogram has exactly `n - 1` rows. Disconnected components are
    /// joined at [`crate::INFINITE_HEIGHT`].
    ///
    /// # Errors
    /// Returns [`ParisError::TooFewNodes`] when the graph has fewer than two
    /// nodes and [`ParisError::TooManyNodes`] when the flat engine cannot
    /// index the graph.
    #[instrument(
        name = "core.fit",
        err,
        skip(self, graph),
        fields(
            engine = %self.engine.resolve(),
            nodes = graph.node_count(),
            reorder = self.reorder,
        ),
    )]
    pub fn fit(&self, graph: &NormalizedGraph) -> Result<Dendrogram> {
        let nodes = graph.node_count();
        ensure_enough_nodes(nodes)?;
        let dendrogram = match self.engine.resolve() {
            Engine::Reference => ChainMerger::<MapGraph>::new(graph).run(),
            _ => {
                if nodes > FlatGraph::MAX_NODES {
                    return Err(ParisError::TooManyNodes {
                        nodes,
                        max: FlatGraph::MAX_NODES,
                        engine: Engine::Flat.as_str(),
                    });
                }
                ChainMerger::<FlatGraph>::new(graph).run()
            }
        };
        Ok(if self.reorder {
            dendrogram.reordered()
        } else {
            dendrogram
        })
    }

    /// Normalises `adjacency` with `weights` and clusters the result.
    ///
    /// Out weights follow row sums and in weights follow column sums, so a
    /// directed input keeps its asymmetric node masses while its edges are
    /// summed with their transpose.
    ///
    /// # Errors
    /// Propagates normalisation failures such as
    /// [`ParisError::MalformedAdjacency`] and the errors of [`Paris::fit`].
    pub fn fit_adjacency(
        &self,
        adjacency: &SparseAdjacency,
        weights: &WeightScheme,
    ) -> Result<Dendrogram> {
        if adjacency.is_square() {
            ensure_enough_nodes(adjacency.rows())?;
        }
        let graph = NormalizedGraph::new(adjacency, weights, None, false)?;
        self.fit(&graph)
    }
}

fn ensure_enough_nodes(nodes: usize) -> Result<()> {
    if nodes < 2 {
        warn!(nodes, "graph has fewer than two nodes, returning error");
        return Err(ParisError::TooFewNodes { nodes });
    }
    Ok(())
}
