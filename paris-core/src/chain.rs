//! Reciprocal nearest-neighbour chain over an aggregate graph.
//!
//! The chain grows by repeatedly pushing the nearest neighbour of its top
//! cluster. As soon as the top two entries are each other's nearest
//! neighbour they are merged: a reciprocal pair is always a valid next merge
//! because the Paris similarity is reducible. A cluster with no neighbours
//! left is the representative of its connected component and is retired from
//! the work list. Chains are seeded from the smallest pending id so runs are
//! deterministic.

use std::collections::BTreeSet;

use tracing::{debug, instrument, trace};

use crate::{
    dendrogram::{Dendrogram, DendrogramBuilder, Merge},
    graph::{ClusterGraph, ClusterIndex},
};

/// Converts the similarity of a reciprocal pair into a merge height.
///
/// `floor` is the larger height of the two clusters being merged; a merge
/// never sits below its children, so heights grow along every root path.
/// A pair without a positive similarity (a cluster with no mass) inherits
/// `floor`. Only component joins carry [`INFINITE_HEIGHT`](crate::INFINITE_HEIGHT).
#[must_use]
pub(crate) fn merge_height(similarity: f64, floor: f64) -> f64 {
    if similarity > 0.0 {
        (1.0 / similarity).max(floor)
    } else {
        floor
    }
}

/// Drives a [`ClusterGraph`] through nearest-neighbour chain merges.
///
/// # Examples
/// ```
/// use paris_core::{ChainMerger, NormalizedGraph, SparseAdjacency, WeightScheme};
/// use paris_core::graph::MapGraph;
///
/// let adjacency = SparseAdjacency::from_edges(3, &[(0, 1, 1.0), (1, 2, 1.0)])?;
/// let normalized = NormalizedGraph::new(&adjacency, &WeightScheme::Degree, None, true)?;
/// let dendrogram = ChainMerger::<MapGraph>::new(&normalized).run();
/// assert_eq!(dendrogram.len(), 2);
/// assert_eq!(dendrogram.root_size(), 3);
/// # Ok::<(), paris_core::ParisError>(())
/// ```
#[derive(Debug)]
pub struct ChainMerger<G> {
    graph: G,
    pending: BTreeSet<ClusterIndex>,
    heights: Vec<f64>,
    builder: DendrogramBuilder,
}

impl<G: ClusterGraph> ChainMerger<G> {
    /// Builds the aggregate graph for `normalized` and marks every node as
    /// pending.
    #[must_use]
    pub fn new(normalized: &crate::NormalizedGraph) -> Self {
        Self::from_graph(G::from_normalized(normalized))
    }

    /// Wraps an existing aggregate graph whose live clusters are `0..n`.
    #[must_use]
    pub fn from_graph(graph: G) -> Self {
        let node_count = graph.node_count();
        Self {
            pending: (0..node_count).collect(),
            heights: Vec::with_capacity(node_count.saturating_sub(1)),
            builder: DendrogramBuilder::with_capacity(node_count),
            graph,
        }
    }

    /// Borrows the aggregate graph in its current state.
    #[must_use]
    pub fn graph(&self) -> &G {
        &self.graph
    }

    /// Runs chains until every cluster is merged or retired and returns the
    /// raw dendrogram in emission order.
    #[instrument(
        name = "core.chain_merge",
        skip(self),
        fields(nodes = self.graph.node_count(), components = tracing::field::Empty),
    )]
    pub fn run(mut self) -> Dendrogram {
        while let Some(&seed) = self.pending.first() {
            self.run_chain(seed);
        }
        let components = self.builder.component_count();
        tracing::Span::current().record("components", components);
        #[cfg(feature = "metrics")]
        metrics::counter!("paris_components_total").increment(components as u64);
        self.builder.finish(self.graph.next_cluster())
    }

    fn run_chain(&mut self, seed: ClusterIndex) {
        let mut chain = vec![seed];
        while let Some(node) = chain.pop() {
            // Entries can go stale when an earlier merge consumed them.
            if !self.pending.contains(&node) {
                continue;
            }
            let Some((nearest, max_similarity)) = self.graph.nearest_neighbor(node) else {
                self.retire(node);
                continue;
            };
            match chain.pop() {
                Some(previous) if previous == nearest => {
                    self.merge(node, nearest, max_similarity);
                }
                Some(previous) => chain.extend([previous, node, nearest]),
                None => chain.extend([node, nearest]),
            }
        }
    }

    fn retire(&mut self, node: ClusterIndex) {
        let size = self.graph.size(node);
        debug!(cluster = node, size, "connected component resolved");
        self.builder.push_component(node, size);
        self.pending.remove(&node);
    }

    /// Height at which `cluster` was formed; original nodes sit at zero.
    fn height_of(&self, cluster: ClusterIndex) -> f64 {
        cluster
            .checked_sub(self.graph.node_count())
            .and_then(|row| self.heights.get(row))
            .copied()
            .unwrap_or(0.0)
    }

    fn merge(&mut self, node: ClusterIndex, nearest: ClusterIndex, max_similarity: f64) {
        let floor = self.height_of(node).max(self.height_of(nearest));
        let height = merge_height(max_similarity, floor);
        let size = self.graph.size(node) + self.graph.size(nearest);
        self.builder
            .push_merge(Merge::new(node, nearest, height, size));
        let merged = self.graph.merge(node, nearest);
        trace!(left = node, right = nearest, merged, height, size, "clusters merged");
        self.pending.remove(&node);
        self.pending.remove(&nearest);
        self.pending.insert(merged);
        self.heights.push(height);
        #[cfg(feature = "metrics")]
        metrics::counter!("paris_merges_total").increment(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    use crate::{
        INFINITE_HEIGHT, NormalizedGraph, SparseAdjacency, WeightScheme,
        graph::{FlatGraph, MapGraph},
        test_utils::{assert_heights_close, house},
    };

    #[rstest]
    #[case::inverse(0.25, 0.0, 4.0)]
    #[case::above_floor(2.0, 0.25, 0.5)]
    #[case::clamped(2.0, 0.75, 0.75)]
    #[case::zero(0.0, 0.3, 0.3)]
    #[case::undefined(f64::NEG_INFINITY, 0.0, 0.0)]
    fn merge_height_inverts_similarity_above_floor(
        #[case] similarity: f64,
        #[case] floor: f64,
        #[case] expected: f64,
    ) {
        assert_eq!(merge_height(similarity, floor), expected);
    }

    #[test]
    fn house_raw_dendrogram_follows_emission_order() {
        let dendrogram = ChainMerger::<MapGraph>::new(&house()).run();
        let pairs: Vec<_> = dendrogram
            .merges()
            .iter()
            .map(|merge| (merge.left(), merge.right(), merge.size()))
            .collect();
        assert_eq!(pairs, vec![(1, 0, 2), (3, 2, 2), (5, 4, 3), (7, 6, 5)]);
        assert_heights_close(&dendrogram, &[0.25, 1.0 / 6.0, 0.3125, 2.0 / 3.0]);
    }

    #[test]
    fn engines_agree_on_the_house_graph() {
        let normalized = house();
        let reference = ChainMerger::<MapGraph>::new(&normalized).run();
        let flat = ChainMerger::<FlatGraph>::new(&normalized).run();
        assert_eq!(reference, flat);
    }

    #[test]
    fn isolated_nodes_are_joined_at_infinite_height() {
        let adjacency = SparseAdjacency::identity(4);
        let normalized = NormalizedGraph::new(&adjacency, &WeightScheme::Degree, None, false)
            .expect("identity normalises");
        let dendrogram = ChainMerger::<FlatGraph>::new(&normalized).run();
        assert_eq!(
            dendrogram.merges(),
            &[
                Merge::new(3, 0, INFINITE_HEIGHT, 2),
                Merge::new(4, 1, INFINITE_HEIGHT, 3),
                Merge::new(5, 2, INFINITE_HEIGHT, 4),
            ]
        );
    }

    #[test]
    fn undefined_similarity_merges_at_child_height() {
        // Node 1 carries no mass, so the only edge has no defined similarity.
        let adjacency = SparseAdjacency::from_edges(2, &[(0, 1, 1.0)]).expect("edges are valid");
        let normalized = NormalizedGraph::new(
            &adjacency,
            &WeightScheme::Custom(vec![1.0, 0.0]),
            None,
            true,
        )
        .expect("custom weights normalise");
        let dendrogram = ChainMerger::<MapGraph>::new(&normalized).run();
        assert_eq!(dendrogram.merges(), &[Merge::new(1, 0, 0.0, 2)]);
        assert_eq!(dendrogram.infinite_merge_count(), 0);
    }

    #[test]
    fn massless_cluster_merges_without_undercutting_its_children() {
        // 0-1 and 2-3 pair up first; node 4 has no mass and hangs off 3.
        let adjacency = SparseAdjacency::from_edges(
            5,
            &[(0, 1, 4.0), (2, 3, 1.0), (1, 2, 1.0), (3, 4, 1.0)],
        )
        .expect("edges are valid");
        let normalized = NormalizedGraph::new(
            &adjacency,
            &WeightScheme::Custom(vec![1.0, 1.0, 1.0, 1.0, 0.0]),
            None,
            true,
        )
        .expect("custom weights normalise");
        let dendrogram = ChainMerger::<MapGraph>::new(&normalized).run();

        assert_eq!(dendrogram.len(), 4);
        assert_eq!(dendrogram.infinite_merge_count(), 0);
        let mut formed: Vec<f64> = vec![0.0; 5];
        for merge in dendrogram.merges() {
            let floor = formed[merge.left()].max(formed[merge.right()]);
            assert!(merge.height() >= floor, "{merge:?} sits below a child");
            formed.push(merge.height());
        }
    }
}
