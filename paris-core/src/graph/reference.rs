//! Arena-of-maps aggregate graph.

use std::collections::HashMap;

use crate::adjacency::NormalizedGraph;

use super::{ClusterGraph, ClusterIndex, normalized_entries, similarity};

#[derive(Clone, Debug)]
struct ClusterRecord {
    neighbors: HashMap<ClusterIndex, f64>,
    size: usize,
    out_weight: f64,
    in_weight: f64,
}

/// Reference aggregate graph: one record per cluster id, each owning a map
/// from neighbour id to edge weight.
///
/// Retired ids keep an empty arena slot so that ids stay stable and are
/// never reused.
///
/// # Examples
/// ```
/// use paris_core::{NormalizedGraph, SparseAdjacency, WeightScheme};
/// use paris_core::graph::{ClusterGraph, MapGraph};
///
/// let adjacency = SparseAdjacency::from_edges(3, &[(0, 1, 1.0), (1, 2, 1.0)])?;
/// let normalized = NormalizedGraph::new(&adjacency, &WeightScheme::Degree, None, true)?;
/// let mut graph = MapGraph::from_normalized(&normalized);
/// let merged = graph.merge(0, 1);
/// assert_eq!(merged, 3);
/// assert_eq!(graph.size(merged), 2);
/// # Ok::<(), paris_core::ParisError>(())
/// ```
#[derive(Clone, Debug)]
pub struct MapGraph {
    clusters: Vec<Option<ClusterRecord>>,
    node_count: usize,
    linked: usize,
}

impl MapGraph {
    fn record(&self, cluster: ClusterIndex) -> &ClusterRecord {
        match self.clusters.get(cluster) {
            Some(Some(record)) => record,
            _ => panic!("cluster {cluster} is not alive"),
        }
    }

    fn record_mut(&mut self, cluster: ClusterIndex) -> &mut ClusterRecord {
        match self.clusters.get_mut(cluster) {
            Some(Some(record)) => record,
            _ => panic!("cluster {cluster} is not alive"),
        }
    }

    fn take(&mut self, cluster: ClusterIndex) -> ClusterRecord {
        match self.clusters.get_mut(cluster).and_then(Option::take) {
            Some(record) => record,
            None => panic!("cluster {cluster} is not alive"),
        }
    }

    /// Weight of the edge between `a` and `b`, if any.
    #[must_use]
    pub fn edge_weight(&self, a: ClusterIndex, b: ClusterIndex) -> Option<f64> {
        self.record(a).neighbors.get(&b).copied()
    }
}

impl ClusterGraph for MapGraph {
    fn from_normalized(graph: &NormalizedGraph) -> Self {
        let node_count = graph.node_count();
        let mut clusters: Vec<Option<ClusterRecord>> = graph
            .out_weights()
            .iter()
            .zip(graph.in_weights())
            .map(|(&out_weight, &in_weight)| {
                Some(ClusterRecord {
                    neighbors: HashMap::new(),
                    size: 1,
                    out_weight,
                    in_weight,
                })
            })
            .collect();
        clusters.reserve(node_count.saturating_sub(1));
        for (row, col, weight) in normalized_entries(graph) {
            if let Some(Some(record)) = clusters.get_mut(row) {
                record.neighbors.insert(col, weight);
            }
        }
        let linked = clusters
            .iter()
            .flatten()
            .filter(|record| !record.neighbors.is_empty())
            .count();
        Self {
            clusters,
            node_count,
            linked,
        }
    }

    fn node_count(&self) -> usize {
        self.node_count
    }

    fn next_cluster(&self) -> ClusterIndex {
        self.clusters.len()
    }

    fn is_isolated(&self, cluster: ClusterIndex) -> bool {
        self.record(cluster).neighbors.is_empty()
    }

    fn size(&self, cluster: ClusterIndex) -> usize {
        self.record(cluster).size
    }

    fn for_each_neighbor(&self, cluster: ClusterIndex, mut visit: impl FnMut(ClusterIndex, f64)) {
        for (&neighbor, &weight) in &self.record(cluster).neighbors {
            visit(neighbor, weight);
        }
    }

    fn similarity(&self, a: ClusterIndex, b: ClusterIndex) -> f64 {
        let left = self.record(a);
        let right = self.record(b);
        let weight = left.neighbors.get(&b).copied().unwrap_or(0.0);
        similarity(
            weight,
            left.out_weight,
            left.in_weight,
            right.out_weight,
            right.in_weight,
        )
    }

    fn merge(&mut self, a: ClusterIndex, b: ClusterIndex) -> ClusterIndex {
        let new_cluster = self.clusters.len();
        let left = self.take(a);
        let right = self.take(b);

        // Plan the merged neighbourhood before touching any neighbour record.
        let mut neighbors: HashMap<ClusterIndex, f64> =
            HashMap::with_capacity(left.neighbors.len() + right.neighbors.len());
        for (&neighbor, &weight) in &left.neighbors {
            if neighbor == b {
                continue;
            }
            let merged = match right.neighbors.get(&neighbor) {
                Some(&other) => weight + other,
                None => weight,
            };
            neighbors.insert(neighbor, merged);
        }
        for (&neighbor, &weight) in &right.neighbors {
            if neighbor != a && !left.neighbors.contains_key(&neighbor) {
                neighbors.insert(neighbor, weight);
            }
        }

        for (&neighbor, &weight) in &neighbors {
            let record = self.record_mut(neighbor);
            record.neighbors.remove(&a);
            record.neighbors.remove(&b);
            record.neighbors.insert(new_cluster, weight);
        }

        let retired = usize::from(!left.neighbors.is_empty()) + usize::from(!right.neighbors.is_empty());
        self.linked = self.linked - retired + usize::from(!neighbors.is_empty());
        self.clusters.push(Some(ClusterRecord {
            neighbors,
            size: left.size + right.size,
            out_weight: left.out_weight + right.out_weight,
            in_weight: left.in_weight + right.in_weight,
        }));
        new_cluster
    }

    fn is_exhausted(&self) -> bool {
        self.linked == 0
    }

    fn total_edge_weight(&self) -> f64 {
        self.clusters
            .iter()
            .flatten()
            .flat_map(|record| record.neighbors.values())
            .sum()
    }
}
