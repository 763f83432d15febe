//! Property 2: structural invariants of the dendrogram.
//!
//! For any generated graph, the dendrogram must have `n - 1` rows forming a
//! single binary tree whose sizes add up, with one infinite join per extra
//! connected component. The reordered form must be height-sorted, keep the
//! same tree, and be a fixed point of [`crate::reorder`].

use proptest::test_runner::{TestCaseError, TestCaseResult};

use crate::{ChainMerger, Dendrogram, graph::FlatGraph, reorder};

use super::types::GraphFixture;

/// Runs the structural invariants property for the given fixture.
pub(super) fn run_structural_invariants_property(fixture: &GraphFixture) -> TestCaseResult {
    let raw = ChainMerger::<FlatGraph>::new(&fixture.normalized()).run();
    let context = || {
        format!(
            "(topology={:?}, nodes={}, edges={})",
            fixture.topology,
            fixture.node_count,
            fixture.edges.len()
        )
    };

    check_tree(&raw, fixture.node_count).map_err(|reason| {
        TestCaseError::fail(format!("raw dendrogram: {reason} {}", context()))
    })?;

    let expected_joins = fixture.component_count() - 1;
    if raw.infinite_merge_count() != expected_joins {
        return Err(TestCaseError::fail(format!(
            "expected {expected_joins} infinite joins, got {} {}",
            raw.infinite_merge_count(),
            context()
        )));
    }

    let sorted = raw.reordered();
    check_tree(&sorted, fixture.node_count).map_err(|reason| {
        TestCaseError::fail(format!("reordered dendrogram: {reason} {}", context()))
    })?;
    if !sorted.is_height_sorted() {
        return Err(TestCaseError::fail(format!(
            "reordered heights are not sorted {}",
            context()
        )));
    }
    let tail = &sorted.merges()[sorted.len() - expected_joins..];
    if !tail.iter().all(|merge| merge.is_infinite()) {
        return Err(TestCaseError::fail(format!(
            "component joins are not the last rows {}",
            context()
        )));
    }
    if reorder(sorted.merges()) != sorted.merges() {
        return Err(TestCaseError::fail(format!(
            "reorder is not idempotent {}",
            context()
        )));
    }
    Ok(())
}

/// Checks that `dendrogram` is a binary tree over `node_count` leaves.
///
/// Every row may only reference leaves or earlier rows, every id is merged
/// exactly once, and each size equals the sum of its children's sizes.
pub(super) fn check_tree(dendrogram: &Dendrogram, node_count: usize) -> Result<(), String> {
    if dendrogram.len() != node_count - 1 {
        return Err(format!(
            "expected {} rows, got {}",
            node_count - 1,
            dendrogram.len()
        ));
    }
    let mut sizes = vec![1_usize; node_count];
    let mut consumed = vec![false; 2 * node_count - 1];
    for (row, merge) in dendrogram.merges().iter().enumerate() {
        let limit = node_count + row;
        let mut children = 0;
        for child in [merge.left(), merge.right()] {
            if child >= limit {
                return Err(format!("row {row} references future cluster {child}"));
            }
            if std::mem::replace(&mut consumed[child], true) {
                return Err(format!("cluster {child} is merged twice"));
            }
            children += sizes[child];
        }
        if children != merge.size() {
            return Err(format!(
                "row {row} has size {} but its children hold {children}",
                merge.size()
            ));
        }
        sizes.push(merge.size());
    }
    match dendrogram.root_size() {
        root if root == node_count => Ok(()),
        root => Err(format!("root holds {root} of {node_count} nodes")),
    }
}
