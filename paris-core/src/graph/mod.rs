//! Mutable weighted aggregate graphs driven by the nearest-neighbour chain.
//!
//! Each vertex of an aggregate graph is a cluster identified by a stable
//! integer id. Original nodes occupy ids `0..n`; every merge retires two ids
//! and allocates the next unused one. Edge weights are normalised at
//! construction by the total weight of the symmetric input, self-loops
//! included, and merges preserve the stored edge mass until both endpoints
//! of an edge end up in the same cluster.
//!
//! Two representations implement [`ClusterGraph`]:
//!
//! - [`MapGraph`] keeps an arena of cluster records, each owning a hash map
//!   from neighbour id to weight.
//! - [`FlatGraph`] keeps flat adjacency lists and one hash map keyed by the
//!   packed ordered pair of endpoints.
//!
//! Both add weights in the same order, so a chain run over either produces
//! bit-identical dendrograms.

mod flat;
mod reference;

pub use self::{flat::FlatGraph, reference::MapGraph};

use crate::adjacency::NormalizedGraph;

/// Identifier of a cluster inside an aggregate graph.
pub type ClusterIndex = usize;

/// Similarity of two clusters joined by an edge of normalised `weight`.
///
/// Returns `2 * weight / (out_a * in_b + out_b * in_a)`, or
/// [`f64::NEG_INFINITY`] when the denominator is not positive so the pair is
/// never preferred over one with a defined similarity.
///
/// # Examples
/// ```
/// use paris_core::graph::similarity;
///
/// assert_eq!(similarity(0.5, 0.5, 0.5, 0.5, 0.5), 2.0);
/// assert_eq!(similarity(0.5, 0.0, 0.0, 0.5, 0.5), f64::NEG_INFINITY);
/// ```
#[must_use]
pub fn similarity(weight: f64, out_a: f64, in_a: f64, out_b: f64, in_b: f64) -> f64 {
    let denominator = out_a * in_b + out_b * in_a;
    if denominator > 0.0 {
        2.0 * weight / denominator
    } else {
        f64::NEG_INFINITY
    }
}

/// Operations the chain driver needs from an aggregate graph.
///
/// Implementations own their state exclusively for one run. All methods
/// taking a cluster id expect an id that is still alive; passing a retired id
/// is a logic error and panics.
pub trait ClusterGraph {
    /// Builds the aggregate graph over the normalised input.
    ///
    /// Every stored entry `(i, j)` with `i != j` becomes an edge of weight
    /// `2 * w / total`, where `total` sums all stored entries including
    /// self-loops.
    fn from_normalized(graph: &NormalizedGraph) -> Self;

    /// Number of original nodes.
    fn node_count(&self) -> usize;

    /// The id the next merge will allocate.
    fn next_cluster(&self) -> ClusterIndex;

    /// Whether `cluster` has no remaining neighbours.
    fn is_isolated(&self, cluster: ClusterIndex) -> bool;

    /// Number of original nodes contained in `cluster`.
    fn size(&self, cluster: ClusterIndex) -> usize;

    /// Calls `visit` once for every `(neighbour, weight)` pair of `cluster`.
    fn for_each_neighbor(&self, cluster: ClusterIndex, visit: impl FnMut(ClusterIndex, f64));

    /// Similarity between two adjacent clusters, see [`similarity`].
    fn similarity(&self, a: ClusterIndex, b: ClusterIndex) -> f64;

    /// Folds `a` and `b` into a fresh cluster and returns its id.
    ///
    /// Runs in expected time proportional to the degrees of `a` and `b`.
    fn merge(&mut self, a: ClusterIndex, b: ClusterIndex) -> ClusterIndex;

    /// Whether no live cluster has a neighbour left.
    fn is_exhausted(&self) -> bool;

    /// Sum of all stored edge weights, each unordered pair counted twice.
    fn total_edge_weight(&self) -> f64;

    /// Returns the neighbour of `cluster` with the highest similarity and
    /// that similarity, or `None` when `cluster` is isolated.
    ///
    /// Ties resolve to the smallest neighbour id, so the outcome does not
    /// depend on iteration order.
    fn nearest_neighbor(&self, cluster: ClusterIndex) -> Option<(ClusterIndex, f64)> {
        let mut best: Option<(ClusterIndex, f64)> = None;
        self.for_each_neighbor(cluster, |neighbor, _| {
            let sim = self.similarity(cluster, neighbor);
            best = match best {
                None => Some((neighbor, sim)),
                Some((_, max_sim)) if sim > max_sim => Some((neighbor, sim)),
                Some((current, max_sim)) if sim == max_sim => {
                    Some((current.min(neighbor), max_sim))
                }
                keep => keep,
            };
        });
        best
    }
}

/// Iterates the normalised off-diagonal entries of `graph`'s adjacency as
/// `(row, col, weight)` triples.
pub(crate) fn normalized_entries(
    graph: &NormalizedGraph,
) -> impl Iterator<Item = (ClusterIndex, ClusterIndex, f64)> + '_ {
    let adjacency = graph.adjacency();
    let total = adjacency.total_weight();
    (0..adjacency.rows()).flat_map(move |row| {
        adjacency
            .row(row)
            .filter(move |&(col, _)| col != row && total > 0.0)
            .map(move |(col, weight)| (row, col, 2.0 * weight / total))
    })
}
