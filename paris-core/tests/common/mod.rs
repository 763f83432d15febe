use paris_core::{Dendrogram, NormalizedGraph, SparseAdjacency, WeightScheme};

/// Builds an adjacency from unit-weight undirected edges.
#[must_use]
pub fn unit_graph(node_count: usize, edges: &[(usize, usize)]) -> SparseAdjacency {
    let weighted: Vec<_> = edges.iter().map(|&(a, b)| (a, b, 1.0)).collect();
    SparseAdjacency::from_edges(node_count, &weighted).expect("edges must be valid")
}

/// Normalises `adjacency` after symmetrising it.
#[must_use]
pub fn normalize(adjacency: &SparseAdjacency, weights: &WeightScheme) -> NormalizedGraph {
    NormalizedGraph::new(adjacency, weights, None, true).expect("graph must normalise")
}

/// The five-node house: a ring with the 1-4 diagonal.
#[must_use]
pub fn house() -> SparseAdjacency {
    unit_graph(5, &[(0, 1), (0, 4), (1, 2), (1, 4), (2, 3), (3, 4)])
}

/// Compares dendrogram rows to `expected`, with a relative tolerance on
/// finite heights.
#[track_caller]
pub fn assert_rows_close(dendrogram: &Dendrogram, expected: &[[f64; 4]]) {
    let rows = dendrogram.to_rows();
    assert_eq!(rows.len(), expected.len(), "rows: {rows:?}");
    for (row, want) in rows.iter().zip(expected) {
        assert_eq!([row[0], row[1], row[3]], [want[0], want[1], want[3]], "rows: {rows:?}");
        let close = if want[2].is_finite() {
            (row[2] - want[2]).abs() <= 1e-12 * want[2].abs().max(1.0)
        } else {
            row[2] == want[2]
        };
        assert!(close, "height {} differs from {} in {rows:?}", row[2], want[2]);
    }
}
