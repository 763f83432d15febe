//! Type definitions for Paris property-based tests.

use proptest::prelude::*;

use crate::{NormalizedGraph, SparseAdjacency, WeightScheme};

/// Topology family of a generated graph.
///
/// Each family stresses a different part of the chain merger.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(super) enum GraphTopology {
    /// Random sparse graph with distinct continuous weights.
    Sparse,
    /// Dense graph approaching a complete graph.
    Dense,
    /// Unit weights on a regular structure, so similarities tie often.
    TieHeavy,
    /// Several blocks with no edges between them.
    Disconnected,
    /// Random graph plus nodes with no incident edge.
    WithIsolated,
    /// Random graph with custom node weights, some of them zero.
    ZeroMass,
}

impl Arbitrary for GraphTopology {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with((): Self::Parameters) -> Self::Strategy {
        prop_oneof![
            2 => Just(Self::Sparse),
            1 => Just(Self::Dense),
            3 => Just(Self::TieHeavy),
            2 => Just(Self::Disconnected),
            1 => Just(Self::WithIsolated),
            2 => Just(Self::ZeroMass),
        ]
        .boxed()
    }
}

/// Fixture for Paris property tests.
///
/// Keeps the raw edge list next to the topology so failures can be
/// reproduced by hand.
#[derive(Clone, Debug)]
pub(super) struct GraphFixture {
    /// Number of nodes in the graph.
    pub node_count: usize,
    /// Undirected edges as `(source, target, weight)` with `source < target`.
    pub edges: Vec<(usize, usize, f64)>,
    /// Custom node weights; `None` selects degree weights.
    pub node_weights: Option<Vec<f64>>,
    /// Topology used during generation.
    pub topology: GraphTopology,
}

impl GraphFixture {
    /// Builds the adjacency described by the fixture.
    pub(super) fn adjacency(&self) -> SparseAdjacency {
        SparseAdjacency::from_edges(self.node_count, &self.edges)
            .expect("generated edges must be valid")
    }

    /// Normalises the fixture with its custom weights, or degree weights.
    pub(super) fn normalized(&self) -> NormalizedGraph {
        let weights = self
            .node_weights
            .clone()
            .map_or(WeightScheme::Degree, WeightScheme::Custom);
        NormalizedGraph::new(&self.adjacency(), &weights, None, true)
            .expect("generated graphs must normalise")
    }

    /// Number of connected components, isolated nodes included.
    pub(super) fn component_count(&self) -> usize {
        fn find(parent: &mut [usize], mut node: usize) -> usize {
            while parent[node] != node {
                parent[node] = parent[parent[node]];
                node = parent[node];
            }
            node
        }
        let mut parent: Vec<usize> = (0..self.node_count).collect();
        let mut components = self.node_count;
        for &(a, b, _) in &self.edges {
            let (ra, rb) = (find(&mut parent, a), find(&mut parent, b));
            if ra != rb {
                parent[ra] = rb;
                components -= 1;
            }
        }
        components
    }
}
