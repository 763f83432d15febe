//! Dendrogram records, assembly, and canonical reordering.
//!
//! A dendrogram over `n` nodes is a sequence of `n - 1` binary merges. Row
//! `t` creates cluster `n + t` from its `left` and `right` children, which are
//! either original nodes (`< n`) or clusters created by earlier rows. The
//! layout matches the `(n - 1) x 4` linkage matrices used by SciPy.

mod reorder;

pub use self::reorder::reorder;

use crate::graph::ClusterIndex;

/// Height used for joins between disconnected components and for merges
/// whose similarity is undefined. It compares greater than every finite
/// height.
pub const INFINITE_HEIGHT: f64 = f64::INFINITY;

/// One binary merge in a [`Dendrogram`].
///
/// # Examples
/// ```
/// use paris_core::Merge;
///
/// let merge = Merge::new(0, 1, 0.25, 2);
/// assert_eq!(merge.left(), 0);
/// assert_eq!(merge.size(), 2);
/// assert!(merge.height().is_finite());
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Merge {
    left: ClusterIndex,
    right: ClusterIndex,
    height: f64,
    size: usize,
}

impl Merge {
    /// Creates a merge record.
    #[rustfmt::skip]
    #[must_use]
    pub fn new(left: ClusterIndex, right: ClusterIndex, height: f64, size: usize) -> Self {
        Self { left, right, height, size }
    }

    /// First merged cluster.
    #[rustfmt::skip]
    #[must_use]
    pub fn left(&self) -> ClusterIndex { self.left }

    /// Second merged cluster.
    #[rustfmt::skip]
    #[must_use]
    pub fn right(&self) -> ClusterIndex { self.right }

    /// Dissimilarity at which the merge happened.
    #[rustfmt::skip]
    #[must_use]
    pub fn height(&self) -> f64 { self.height }

    /// Number of original nodes in the resulting cluster.
    #[rustfmt::skip]
    #[must_use]
    pub fn size(&self) -> usize { self.size }

    /// Whether this merge joins disconnected components.
    #[must_use]
    pub fn is_infinite(&self) -> bool {
        self.height == INFINITE_HEIGHT
    }

    pub(crate) fn with_children(self, left: ClusterIndex, right: ClusterIndex) -> Self {
        Self {
            left,
            right,
            ..self
        }
    }
}

/// The full merge history of a hierarchical clustering.
///
/// # Examples
/// ```
/// use paris_core::{Dendrogram, Merge};
///
/// let dendrogram = Dendrogram::from_merges(vec![
///     Merge::new(2, 3, 0.5, 2),
///     Merge::new(0, 1, 0.25, 2),
///     Merge::new(4, 5, 1.0, 4),
/// ]);
/// let sorted = dendrogram.reordered();
/// assert!(sorted.is_height_sorted());
/// assert_eq!(sorted.merges()[0], Merge::new(0, 1, 0.25, 2));
/// assert_eq!(sorted.merges()[2], Merge::new(5, 4, 1.0, 4));
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Dendrogram {
    merges: Vec<Merge>,
}

impl Dendrogram {
    /// Wraps merges in emission order.
    #[must_use]
    pub fn from_merges(merges: Vec<Merge>) -> Self {
        Self { merges }
    }

    /// Merge records in row order.
    #[must_use]
    pub fn merges(&self) -> &[Merge] {
        &self.merges
    }

    /// Consumes the dendrogram and returns its merge records.
    #[must_use]
    pub fn into_merges(self) -> Vec<Merge> {
        self.merges
    }

    /// Number of merge records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.merges.len()
    }

    /// Whether the dendrogram has no merges.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.merges.is_empty()
    }

    /// Number of original nodes described by the dendrogram.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.merges.len() + 1
    }

    /// Size of the root cluster, or `0` for an empty dendrogram.
    #[must_use]
    pub fn root_size(&self) -> usize {
        self.merges.last().map_or(0, Merge::size)
    }

    /// Whether heights never decrease from one row to the next.
    #[must_use]
    pub fn is_height_sorted(&self) -> bool {
        self.merges
            .windows(2)
            .all(|pair| pair[0].height.total_cmp(&pair[1].height).is_le())
    }

    /// Number of merges at [`INFINITE_HEIGHT`].
    #[must_use]
    pub fn infinite_merge_count(&self) -> usize {
        self.merges.iter().filter(|merge| merge.is_infinite()).count()
    }

    /// Rows as `[left, right, height, size]`, the SciPy linkage layout.
    #[must_use]
    pub fn to_rows(&self) -> Vec<[f64; 4]> {
        self.merges
            .iter()
            .map(|merge| {
                [
                    merge.left as f64,
                    merge.right as f64,
                    merge.height,
                    merge.size as f64,
                ]
            })
            .collect()
    }

    /// Returns the canonical, height-sorted form of this dendrogram.
    ///
    /// See [`reorder`].
    #[must_use]
    pub fn reordered(&self) -> Self {
        Self::from_merges(reorder(&self.merges))
    }
}

impl From<Dendrogram> for Vec<Merge> {
    fn from(dendrogram: Dendrogram) -> Self {
        dendrogram.merges
    }
}

/// Collects merges and connected-component representatives emitted by the
/// chain driver, then closes the forest into a single tree.
#[derive(Clone, Debug, Default)]
pub struct DendrogramBuilder {
    merges: Vec<Merge>,
    components: Vec<(ClusterIndex, usize)>,
}

impl DendrogramBuilder {
    /// Creates a builder sized for `node_count` original nodes.
    #[must_use]
    pub fn with_capacity(node_count: usize) -> Self {
        Self {
            merges: Vec::with_capacity(node_count.saturating_sub(1)),
            components: Vec::new(),
        }
    }

    /// Records a merge in emission order.
    pub fn push_merge(&mut self, merge: Merge) {
        self.merges.push(merge);
    }

    /// Records a cluster that has no neighbours left, with its size.
    pub fn push_component(&mut self, cluster: ClusterIndex, size: usize) {
        self.components.push((cluster, size));
    }

    /// Number of component representatives recorded so far.
    #[must_use]
    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    /// Joins the recorded components at [`INFINITE_HEIGHT`] and returns the
    /// dendrogram.
    ///
    /// The last recorded representative seeds the join; the others are
    /// attached in encounter order, each join allocating the next id from
    /// `next_cluster` and carrying the running total size.
    #[must_use]
    pub fn finish(mut self, mut next_cluster: ClusterIndex) -> Dendrogram {
        if let Some((mut node, mut size)) = self.components.pop() {
            for (other, other_size) in self.components {
                size += other_size;
                self.merges
                    .push(Merge::new(node, other, INFINITE_HEIGHT, size));
                node = next_cluster;
                next_cluster += 1;
            }
        }
        Dendrogram::from_merges(self.merges)
    }
}
