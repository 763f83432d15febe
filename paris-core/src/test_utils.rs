//! Shared test utilities for `paris-core`.

use paris_test_support::ci::property_test_profile::ProptestRunProfile;
use proptest::test_runner::Config as ProptestConfig;

use crate::{Dendrogram, NormalizedGraph, SparseAdjacency, WeightScheme};

/// Builds a standard proptest configuration from the shared CI profile.
///
/// This keeps property suites aligned on the same `PROGTEST_CASES` and
/// `PARIS_PBT_FORK` interpretation.
#[must_use]
pub(crate) fn suite_proptest_config(default_cases: u32) -> ProptestConfig {
    let profile = ProptestRunProfile::load(default_cases, false);
    ProptestConfig {
        cases: profile.cases(),
        fork: profile.fork(),
        ..ProptestConfig::default()
    }
}

/// Edges of the five-node "house": a square 0-1-2-3-4 ring with the 1-4
/// diagonal.
pub(crate) const HOUSE_EDGES: [(usize, usize); 6] = [(0, 1), (0, 4), (1, 2), (1, 4), (2, 3), (3, 4)];

fn unit_edges(edges: &[(usize, usize)]) -> Vec<(usize, usize, f64)> {
    edges.iter().map(|&(a, b)| (a, b, 1.0)).collect()
}

/// The house graph, symmetrised, with degree weights.
#[must_use]
pub(crate) fn house() -> NormalizedGraph {
    let adjacency =
        SparseAdjacency::from_edges(5, &unit_edges(&HOUSE_EDGES)).expect("house edges are valid");
    NormalizedGraph::new(&adjacency, &WeightScheme::Degree, None, true)
        .expect("house graph normalises")
}

/// A path `0 - 1 - ... - (n - 1)` with unit edges and uniform weights.
#[must_use]
pub(crate) fn path(node_count: usize) -> NormalizedGraph {
    let edges: Vec<_> = (1..node_count).map(|node| (node - 1, node)).collect();
    let adjacency =
        SparseAdjacency::from_edges(node_count, &unit_edges(&edges)).expect("path edges are valid");
    NormalizedGraph::new(&adjacency, &WeightScheme::Uniform, None, true)
        .expect("path graph normalises")
}

/// Asserts that the dendrogram heights match `expected` up to rounding.
#[track_caller]
pub(crate) fn assert_heights_close(dendrogram: &Dendrogram, expected: &[f64]) {
    let heights: Vec<f64> = dendrogram.merges().iter().map(|merge| merge.height()).collect();
    assert_eq!(heights.len(), expected.len(), "heights: {heights:?}");
    for (got, want) in heights.iter().zip(expected) {
        let close = if want.is_finite() {
            (got - want).abs() <= 1e-12 * want.abs().max(1.0)
        } else {
            got == want
        };
        assert!(close, "heights {heights:?} differ from {expected:?}");
    }
}
