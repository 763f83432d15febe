//! Flat aggregate graph backed by adjacency lists and a packed-pair weight map.
//!
//! Cluster attributes live in parallel vectors indexed by id, adjacency is a
//! `Vec` of neighbour lists, and every directed edge weight is stored once in
//! a single hash map keyed by `(source << 32) | target`. Each entry also
//! records the target's slot in the source's list, so a neighbour list drops
//! a retired id with one `swap_remove`. A merge therefore costs time in the
//! degrees of the two merged clusters and never allocates per-cluster maps.

use std::collections::HashMap;

use crate::adjacency::NormalizedGraph;

use super::{ClusterGraph, ClusterIndex, normalized_entries, similarity};

/// Packs an ordered pair of cluster ids into a single map key.
#[inline]
fn pair_key(source: ClusterIndex, target: ClusterIndex) -> u64 {
    ((source as u64) << 32) | (target as u64 & 0xFFFF_FFFF)
}

/// A directed edge: its weight and the target's index in the source's list.
#[derive(Clone, Copy, Debug)]
struct Link {
    weight: f64,
    slot: usize,
}

/// Optimised aggregate graph with flat storage.
///
/// Cluster ids must fit in 32 bits, so at most [`FlatGraph::MAX_NODES`]
/// original nodes are supported.
///
/// # Examples
/// ```
/// use paris_core::{NormalizedGraph, SparseAdjacency, WeightScheme};
/// use paris_core::graph::{ClusterGraph, FlatGraph};
///
/// let adjacency = SparseAdjacency::from_edges(3, &[(0, 1, 1.0), (1, 2, 1.0)])?;
/// let normalized = NormalizedGraph::new(&adjacency, &WeightScheme::Degree, None, true)?;
/// let mut graph = FlatGraph::from_normalized(&normalized);
/// let merged = graph.merge(1, 2);
/// assert!(!graph.is_isolated(merged));
/// assert_eq!(graph.nearest_neighbor(merged).map(|(id, _)| id), Some(0));
/// # Ok::<(), paris_core::ParisError>(())
/// ```
#[derive(Clone, Debug)]
pub struct FlatGraph {
    neighbors: Vec<Vec<ClusterIndex>>,
    links: HashMap<u64, Link>,
    alive: Vec<bool>,
    sizes: Vec<usize>,
    out_weights: Vec<f64>,
    in_weights: Vec<f64>,
    node_count: usize,
    linked: usize,
}

impl FlatGraph {
    /// Largest supported number of original nodes; merged ids reach
    /// `2 * n - 2` and must stay below `2^32`.
    pub const MAX_NODES: usize = 1 << 31;

    fn weight(&self, source: ClusterIndex, target: ClusterIndex) -> f64 {
        self.links
            .get(&pair_key(source, target))
            .map_or(0.0, |link| link.weight)
    }

    /// Removes the edge `source -> target` and returns its weight.
    fn take_weight(&mut self, source: ClusterIndex, target: ClusterIndex) -> Option<f64> {
        self.links
            .remove(&pair_key(source, target))
            .map(|link| link.weight)
    }

    /// Removes `retired` from the list of `cluster` and returns the weight of
    /// the edge `cluster -> retired`.
    fn detach(&mut self, cluster: ClusterIndex, retired: ClusterIndex) -> Option<f64> {
        let link = self.links.remove(&pair_key(cluster, retired))?;
        let list = &mut self.neighbors[cluster];
        list.swap_remove(link.slot);
        let moved = list.get(link.slot).copied();
        if let Some(moved_link) = moved.and_then(|id| self.links.get_mut(&pair_key(cluster, id))) {
            moved_link.slot = link.slot;
        }
        Some(link.weight)
    }

    /// Appends the edge pair between a fresh cluster and `neighbor`.
    fn attach(
        &mut self,
        merged: &mut Vec<ClusterIndex>,
        cluster: ClusterIndex,
        neighbor: ClusterIndex,
        forward: f64,
        backward: f64,
    ) {
        self.links.insert(
            pair_key(cluster, neighbor),
            Link {
                weight: forward,
                slot: merged.len(),
            },
        );
        merged.push(neighbor);
        let list = &mut self.neighbors[neighbor];
        self.links.insert(
            pair_key(neighbor, cluster),
            Link {
                weight: backward,
                slot: list.len(),
            },
        );
        list.push(cluster);
    }

    /// Whether `cluster` is still alive.
    #[must_use]
    pub fn is_alive(&self, cluster: ClusterIndex) -> bool {
        self.alive.get(cluster).copied().unwrap_or(false)
    }
}

impl ClusterGraph for FlatGraph {
    fn from_normalized(graph: &NormalizedGraph) -> Self {
        let node_count = graph.node_count();
        let capacity = (2 * node_count).saturating_sub(1);
        let mut neighbors: Vec<Vec<ClusterIndex>> = Vec::with_capacity(capacity);
        neighbors.resize_with(node_count, Vec::new);
        let mut links = HashMap::with_capacity(graph.adjacency().nnz());
        for (row, col, weight) in normalized_entries(graph) {
            let list = &mut neighbors[row];
            links.insert(
                pair_key(row, col),
                Link {
                    weight,
                    slot: list.len(),
                },
            );
            list.push(col);
        }
        let linked = neighbors.iter().filter(|list| !list.is_empty()).count();
        let mut alive = Vec::with_capacity(capacity);
        alive.resize(node_count, true);
        let mut sizes = Vec::with_capacity(capacity);
        sizes.resize(node_count, 1);
        let mut out_weights = Vec::with_capacity(capacity);
        out_weights.extend_from_slice(graph.out_weights());
        let mut in_weights = Vec::with_capacity(capacity);
        in_weights.extend_from_slice(graph.in_weights());
        Self {
            neighbors,
            links,
            alive,
            sizes,
            out_weights,
            in_weights,
            node_count,
            linked,
        }
    }

    fn node_count(&self) -> usize {
        self.node_count
    }

    fn next_cluster(&self) -> ClusterIndex {
        self.alive.len()
    }

    fn is_isolated(&self, cluster: ClusterIndex) -> bool {
        self.neighbors[cluster].is_empty()
    }

    fn size(&self, cluster: ClusterIndex) -> usize {
        self.sizes[cluster]
    }

    fn for_each_neighbor(&self, cluster: ClusterIndex, mut visit: impl FnMut(ClusterIndex, f64)) {
        for &neighbor in &self.neighbors[cluster] {
            visit(neighbor, self.weight(cluster, neighbor));
        }
    }

    fn similarity(&self, a: ClusterIndex, b: ClusterIndex) -> f64 {
        similarity(
            self.weight(a, b),
            self.out_weights[a],
            self.in_weights[a],
            self.out_weights[b],
            self.in_weights[b],
        )
    }

    fn merge(&mut self, a: ClusterIndex, b: ClusterIndex) -> ClusterIndex {
        assert!(
            self.is_alive(a) && self.is_alive(b) && a != b,
            "cannot merge clusters {a} and {b}"
        );
        let new_cluster = self.alive.len();
        let left = std::mem::take(&mut self.neighbors[a]);
        let right = std::mem::take(&mut self.neighbors[b]);
        let mut merged = Vec::with_capacity(left.len() + right.len());

        for &neighbor in &left {
            if neighbor == b {
                continue;
            }
            let mut forward = self.take_weight(a, neighbor).unwrap_or(0.0);
            let mut backward = self.detach(neighbor, a).unwrap_or(0.0);
            if let Some(shared) = self.take_weight(b, neighbor) {
                forward += shared;
                backward += self.detach(neighbor, b).unwrap_or(0.0);
            }
            self.attach(&mut merged, new_cluster, neighbor, forward, backward);
        }
        for &neighbor in &right {
            if neighbor == a {
                continue;
            }
            // Shared neighbours were consumed above.
            let Some(forward) = self.take_weight(b, neighbor) else {
                continue;
            };
            let backward = self.detach(neighbor, b).unwrap_or(0.0);
            self.attach(&mut merged, new_cluster, neighbor, forward, backward);
        }
        self.links.remove(&pair_key(a, b));
        self.links.remove(&pair_key(b, a));

        let retired = usize::from(!left.is_empty()) + usize::from(!right.is_empty());
        self.linked = self.linked - retired + usize::from(!merged.is_empty());

        self.alive[a] = false;
        self.alive[b] = false;
        self.neighbors.push(merged);
        self.alive.push(true);
        self.sizes.push(self.sizes[a] + self.sizes[b]);
        self.out_weights
            .push(self.out_weights[a] + self.out_weights[b]);
        self.in_weights.push(self.in_weights[a] + self.in_weights[b]);
        new_cluster
    }

    fn is_exhausted(&self) -> bool {
        self.linked == 0
    }

    fn total_edge_weight(&self) -> f64 {
        self.links.values().map(|link| link.weight).sum()
    }
}
