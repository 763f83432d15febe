//! Strategy builders for Paris property-based tests.
//!
//! Each generator draws a node count and an edge list from a seeded
//! [`SmallRng`], so proptest only has to shrink the topology and the seed.

use proptest::prelude::*;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use super::types::{GraphFixture, GraphTopology};

/// Minimum node count for generated graphs.
const MIN_NODES: usize = 2;
/// Maximum node count for generated graphs.
const MAX_NODES: usize = 48;
/// Maximum node count for dense graphs.
const DENSE_MAX_NODES: usize = 24;

/// Generates fixtures across every [`GraphTopology`].
pub(super) fn graph_fixture_strategy() -> impl Strategy<Value = GraphFixture> {
    (any::<GraphTopology>(), any::<u64>()).prop_map(|(topology, seed)| {
        let mut rng = SmallRng::seed_from_u64(seed);
        generate_fixture(topology, &mut rng)
    })
}

/// Generates a fixture for a specific topology.
pub(super) fn generate_fixture(topology: GraphTopology, rng: &mut SmallRng) -> GraphFixture {
    let (node_count, mut edges) = match topology {
        GraphTopology::Sparse => {
            let node_count = rng.gen_range(MIN_NODES..=MAX_NODES);
            let probability = (2.5 / node_count as f64).min(1.0);
            (node_count, random_edges(rng, 0..node_count, probability, continuous))
        }
        GraphTopology::Dense => {
            let node_count = rng.gen_range(MIN_NODES..=DENSE_MAX_NODES);
            let probability = rng.gen_range(0.7..=0.95);
            (node_count, random_edges(rng, 0..node_count, probability, continuous))
        }
        GraphTopology::TieHeavy => tie_heavy(rng),
        GraphTopology::Disconnected => disconnected(rng),
        GraphTopology::WithIsolated => {
            let linked = rng.gen_range(MIN_NODES..=MAX_NODES / 2);
            let isolated = rng.gen_range(1..=8);
            let edges = random_edges(rng, 0..linked, 0.3, continuous);
            (linked + isolated, edges)
        }
        GraphTopology::ZeroMass => {
            let node_count = rng.gen_range(MIN_NODES..=MAX_NODES / 2);
            (node_count, random_edges(rng, 0..node_count, 0.3, continuous))
        }
    };
    ensure_at_least_one_edge(&mut edges);
    let node_weights = (topology == GraphTopology::ZeroMass).then(|| zero_mass_weights(rng, node_count));
    GraphFixture {
        node_count,
        edges,
        node_weights,
        topology,
    }
}

/// Roughly a third of the nodes get no mass; node 0 always keeps some so the
/// total stays positive.
fn zero_mass_weights(rng: &mut SmallRng, node_count: usize) -> Vec<f64> {
    (0..node_count)
        .map(|node| {
            if node > 0 && rng.gen_bool(0.35) {
                0.0
            } else {
                continuous(rng)
            }
        })
        .collect()
}

/// Degree weights need a positive total, so an edgeless draw gets one edge.
fn ensure_at_least_one_edge(edges: &mut Vec<(usize, usize, f64)>) {
    if edges.is_empty() {
        edges.push((0, 1, 1.0));
    }
}

fn continuous(rng: &mut SmallRng) -> f64 {
    rng.gen_range(0.1..10.0)
}

fn random_edges(
    rng: &mut SmallRng,
    nodes: std::ops::Range<usize>,
    probability: f64,
    mut weight: impl FnMut(&mut SmallRng) -> f64,
) -> Vec<(usize, usize, f64)> {
    let mut edges = Vec::new();
    for a in nodes.clone() {
        for b in (a + 1)..nodes.end {
            if rng.gen_bool(probability) {
                edges.push((a, b, weight(rng)));
            }
        }
    }
    edges
}

/// Cycles, stars and complete graphs with unit weights.
fn tie_heavy(rng: &mut SmallRng) -> (usize, Vec<(usize, usize, f64)>) {
    let node_count = rng.gen_range(3..=MAX_NODES / 2);
    let edges = match rng.gen_range(0..3) {
        0 => (0..node_count)
            .map(|node| (node.min((node + 1) % node_count), node.max((node + 1) % node_count), 1.0))
            .collect(),
        1 => (1..node_count).map(|leaf| (0, leaf, 1.0)).collect(),
        _ => random_edges(rng, 0..node_count, 1.0, |_| 1.0),
    };
    (node_count, edges)
}

/// Between two and five blocks, each a random connected-ish subgraph.
fn disconnected(rng: &mut SmallRng) -> (usize, Vec<(usize, usize, f64)>) {
    let blocks = rng.gen_range(2..=5);
    let mut node_count = 0;
    let mut edges = Vec::new();
    for _ in 0..blocks {
        let size = rng.gen_range(1..=8);
        let start = node_count;
        node_count += size;
        // A spanning path keeps each block connected.
        for node in (start + 1)..node_count {
            edges.push((node - 1, node, continuous(rng)));
        }
        edges.extend(
            random_edges(rng, start..node_count, 0.3, continuous)
                .into_iter()
                .filter(|&(a, b, _)| b != a + 1),
        );
    }
    (node_count, edges)
}
