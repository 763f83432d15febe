//! Property 1: both engines agree.
//!
//! For any generated graph, the reference and flat engines must emit
//! bit-identical merge sequences and agree on every pairwise similarity.

use proptest::test_runner::{TestCaseError, TestCaseResult};

use crate::{
    ChainMerger,
    graph::{ClusterGraph, FlatGraph, MapGraph},
};

use super::types::GraphFixture;

/// Runs the engine equivalence property for the given fixture.
pub(super) fn run_engine_equivalence_property(fixture: &GraphFixture) -> TestCaseResult {
    let normalized = fixture.normalized();
    let reference = ChainMerger::<MapGraph>::new(&normalized).run();
    let flat = ChainMerger::<FlatGraph>::new(&normalized).run();

    if reference != flat {
        let first = reference
            .merges()
            .iter()
            .zip(flat.merges())
            .position(|(a, b)| a != b);
        return Err(TestCaseError::fail(format!(
            "engines diverge at row {first:?}: reference={:?}, flat={:?} \
             (topology={:?}, nodes={}, edges={})",
            first.map(|row| reference.merges()[row]),
            first.map(|row| flat.merges()[row]),
            fixture.topology,
            fixture.node_count,
            fixture.edges.len(),
        )));
    }
    Ok(())
}

/// Runs the similarity symmetry property for the given fixture.
///
/// Every edge must report the same similarity from both endpoints, in both
/// engines, before and after a merge.
pub(super) fn run_similarity_symmetry_property(fixture: &GraphFixture) -> TestCaseResult {
    let normalized = fixture.normalized();
    check_symmetry(&mut MapGraph::from_normalized(&normalized), fixture)?;
    check_symmetry(&mut FlatGraph::from_normalized(&normalized), fixture)
}

fn check_symmetry<G: ClusterGraph>(graph: &mut G, fixture: &GraphFixture) -> TestCaseResult {
    let check = |graph: &G, cluster: usize| -> TestCaseResult {
        let mut result = Ok(());
        graph.for_each_neighbor(cluster, |neighbor, _| {
            let forward = graph.similarity(cluster, neighbor);
            let backward = graph.similarity(neighbor, cluster);
            if forward != backward && result.is_ok() {
                result = Err(TestCaseError::fail(format!(
                    "similarity({cluster}, {neighbor})={forward} but reverse={backward} \
                     (topology={:?}, nodes={})",
                    fixture.topology, fixture.node_count,
                )));
            }
        });
        result
    };

    for cluster in 0..graph.node_count() {
        check(&*graph, cluster)?;
    }
    let Some(&(a, b, _)) = fixture.edges.first() else {
        return Ok(());
    };
    let merged = graph.merge(a, b);
    check(&*graph, merged)
}
