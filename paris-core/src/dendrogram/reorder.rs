//! Canonical height ordering of dendrogram rows.

use super::Merge;

/// Sorts merges by non-decreasing height and renumbers internal clusters to
/// match their new row positions.
///
/// Rows are ordered by their sort key with ties kept in emission order (a
/// stable sort). A row's key is the larger of its height and its children's
/// keys, so a row always lands after the rows that form its children even
/// when its own height is lower. Heights themselves are left untouched.
///
/// The cluster created by the row moved to position `t` becomes `n + t`, and
/// every reference to it is rewritten; original nodes `0..n` keep their ids.
/// Applying the function to its own output is a no-op.
///
/// # Examples
/// ```
/// use paris_core::{Merge, reorder};
///
/// let raw = vec![Merge::new(1, 0, 0.25, 2), Merge::new(3, 2, 0.125, 2), Merge::new(5, 4, 0.5, 4)];
/// let sorted = reorder(&raw);
/// assert_eq!(sorted[0], Merge::new(3, 2, 0.125, 2));
/// assert_eq!(sorted[2], Merge::new(4, 5, 0.5, 4));
/// assert_eq!(reorder(&sorted), sorted);
/// ```
#[must_use]
pub fn reorder(merges: &[Merge]) -> Vec<Merge> {
    let node_count = merges.len() + 1;
    let mut keys: Vec<f64> = Vec::with_capacity(merges.len());
    for merge in merges {
        let key = [merge.left(), merge.right()]
            .into_iter()
            .filter_map(|child| child.checked_sub(node_count))
            .filter_map(|row| keys.get(row).copied())
            .fold(merge.height(), f64::max);
        keys.push(key);
    }

    let mut order: Vec<usize> = (0..merges.len()).collect();
    order.sort_by(|&a, &b| keys[a].total_cmp(&keys[b]));

    let mut relabel: Vec<usize> = (0..node_count + merges.len()).collect();
    for (rank, &row) in order.iter().enumerate() {
        relabel[node_count + row] = node_count + rank;
    }
    let lookup = |cluster: usize| relabel.get(cluster).copied().unwrap_or(cluster);

    order
        .iter()
        .map(|&row| {
            let merge = merges[row];
            merge.with_children(lookup(merge.left()), lookup(merge.right()))
        })
        .collect()
}
