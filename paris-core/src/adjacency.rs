//! Sparse adjacency input and node weight normalisation.
//!
//! The clustering engine consumes an already normalised triple: a symmetric
//! weighted adjacency plus per-node out and in weights. This module validates
//! compressed sparse row (CSR) input and derives that triple from a raw
//! adjacency and a [`WeightScheme`].

use std::{str::FromStr, sync::Arc};

use crate::error::{AdjacencyError, ParisError, Result};

/// A weighted adjacency matrix stored in compressed sparse row form.
///
/// Rows are sources and columns are destinations. Entries within a row are
/// kept in ascending column order; duplicate entries are summed when built via
/// [`Self::from_edges`].
///
/// # Examples
/// ```
/// use paris_core::SparseAdjacency;
///
/// let adjacency = SparseAdjacency::from_edges(3, &[(0, 1, 1.0), (1, 2, 2.0)])?;
/// assert_eq!(adjacency.rows(), 3);
/// assert_eq!(adjacency.nnz(), 2);
/// assert_eq!(adjacency.total_weight(), 3.0);
/// # Ok::<(), paris_core::ParisError>(())
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct SparseAdjacency {
    rows: usize,
    cols: usize,
    indptr: Vec<usize>,
    indices: Vec<usize>,
    data: Vec<f64>,
}

impl SparseAdjacency {
    /// Builds a matrix from raw CSR arrays after validating their structure.
    ///
    /// # Errors
    /// Returns [`ParisError::MalformedAdjacency`] when the row pointer array
    /// has the wrong length or is not monotonic, when `indices` and `data`
    /// differ in length, when a column index is out of bounds, or when a weight
    /// is negative or not finite.
    pub fn try_new(
        rows: usize,
        cols: usize,
        indptr: Vec<usize>,
        indices: Vec<usize>,
        data: Vec<f64>,
    ) -> Result<Self> {
        validate_csr(rows, cols, &indptr, &indices, &data)?;
        Ok(Self {
            rows,
            cols,
            indptr,
            indices,
            data,
        })
    }

    /// Builds a square `node_count x node_count` matrix from weighted edges.
    ///
    /// Each `(source, target, weight)` triple becomes one stored entry; the
    /// matrix is not symmetrised. Every triple is checked before repeated
    /// pairs are summed, so a negative weight cannot hide inside a sum.
    ///
    /// # Errors
    /// Returns [`ParisError::MalformedAdjacency`] when an endpoint is out of
    /// bounds or a weight is negative or not finite.
    pub fn from_edges(node_count: usize, edges: &[(usize, usize, f64)]) -> Result<Self> {
        let mut buckets: Vec<Vec<(usize, f64)>> = vec![Vec::new(); node_count];
        for &(source, target, weight) in edges {
            let bounded = source.max(target);
            if bounded >= node_count {
                return Err(AdjacencyError::IndexOutOfBounds {
                    row: source,
                    index: bounded,
                    cols: node_count,
                }
                .into());
            }
            check_entry(source, target, weight)?;
            buckets[source].push((target, weight));
        }
        Self::from_buckets(node_count, node_count, buckets)
    }

    /// Builds a matrix from dense rows. Zero entries are not stored.
    ///
    /// # Errors
    /// Returns [`ParisError::MalformedAdjacency`] when rows differ in length or
    /// contain negative or non-finite weights.
    pub fn from_dense(dense: &[Vec<f64>]) -> Result<Self> {
        let rows = dense.len();
        let cols = dense.first().map_or(0, Vec::len);
        let mut buckets = Vec::with_capacity(rows);
        for (row, values) in dense.iter().enumerate() {
            if values.len() != cols {
                return Err(AdjacencyError::RaggedRow {
                    row,
                    expected: cols,
                    got: values.len(),
                }
                .into());
            }
            buckets.push(
                values
                    .iter()
                    .enumerate()
                    .filter(|(_, weight)| **weight != 0.0)
                    .map(|(col, weight)| (col, *weight))
                    .collect(),
            );
        }
        Self::from_buckets(rows, cols, buckets)
    }

    /// Returns the `node_count x node_count` identity matrix: every node
    /// carries a unit self-loop and nothing else.
    #[must_use]
    pub fn identity(node_count: usize) -> Self {
        Self {
            rows: node_count,
            cols: node_count,
            indptr: (0..=node_count).collect(),
            indices: (0..node_count).collect(),
            data: vec![1.0; node_count],
        }
    }

    fn from_buckets(rows: usize, cols: usize, buckets: Vec<Vec<(usize, f64)>>) -> Result<Self> {
        let matrix = Self::assemble(rows, cols, buckets);
        validate_csr(
            matrix.rows,
            matrix.cols,
            &matrix.indptr,
            &matrix.indices,
            &matrix.data,
        )?;
        Ok(matrix)
    }

    /// Number of rows.
    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    #[must_use]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Number of stored entries.
    #[must_use]
    pub fn nnz(&self) -> usize {
        self.data.len()
    }

    /// Whether the matrix has as many rows as columns.
    #[must_use]
    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    /// Iterates over `(column, weight)` pairs stored in `row`.
    ///
    /// Rows outside the matrix yield nothing.
    pub fn row(&self, row: usize) -> impl Iterator<Item = (usize, f64)> + '_ {
        let start = self.indptr.get(row).copied().unwrap_or(0);
        let end = self.indptr.get(row + 1).copied().unwrap_or(start);
        self.indices[start..end]
            .iter()
            .copied()
            .zip(self.data[start..end].iter().copied())
    }

    /// Sum of all stored weights, self-loops included.
    #[must_use]
    pub fn total_weight(&self) -> f64 {
        self.data.iter().sum()
    }

    /// Row sums (weighted out-degrees).
    #[must_use]
    pub fn out_degrees(&self) -> Vec<f64> {
        (0..self.rows)
            .map(|row| self.row(row).map(|(_, weight)| weight).sum())
            .collect()
    }

    /// Column sums (weighted in-degrees).
    #[must_use]
    pub fn in_degrees(&self) -> Vec<f64> {
        let mut degrees = vec![0.0; self.cols];
        for (col, weight) in self.indices.iter().zip(&self.data) {
            degrees[*col] += weight;
        }
        degrees
    }

    /// Returns the transpose of this matrix.
    #[must_use]
    pub fn transposed(&self) -> Self {
        let mut buckets: Vec<Vec<(usize, f64)>> = vec![Vec::new(); self.cols];
        for row in 0..self.rows {
            for (col, weight) in self.row(row) {
                buckets[col].push((row, weight));
            }
        }
        Self::assemble(self.cols, self.rows, buckets)
    }

    /// Returns `A + Aᵀ`, the symmetric adjacency the engine aggregates.
    ///
    /// Non-square inputs are summed over the square `max(rows, cols)` frame.
    #[must_use]
    pub fn symmetrized(&self) -> Self {
        let size = self.rows.max(self.cols);
        let mut buckets: Vec<Vec<(usize, f64)>> = vec![Vec::new(); size];
        for row in 0..self.rows {
            for (col, weight) in self.row(row) {
                buckets[row].push((col, weight));
                buckets[col].push((row, weight));
            }
        }
        Self::assemble(size, size, buckets)
    }

    /// Whether every entry `(i, j)` is matched by an equal entry `(j, i)`.
    #[must_use]
    pub fn is_symmetric(&self) -> bool {
        self.is_square() && self == &self.transposed()
    }

    // Sorts each row and sums repeated columns; callers validate weights.
    fn assemble(rows: usize, cols: usize, buckets: Vec<Vec<(usize, f64)>>) -> Self {
        let mut indptr = Vec::with_capacity(rows + 1);
        let mut indices = Vec::new();
        let mut data: Vec<f64> = Vec::new();
        indptr.push(0);
        for mut bucket in buckets {
            bucket.sort_by_key(|&(col, _)| col);
            let row_start = indices.len();
            for (col, weight) in bucket {
                if indices.len() > row_start && indices.last() == Some(&col) {
                    if let Some(last) = data.last_mut() {
                        *last += weight;
                    }
                } else {
                    indices.push(col);
                    data.push(weight);
                }
            }
            indptr.push(indices.len());
        }
        Self {
            rows,
            cols,
            indptr,
            indices,
            data,
        }
    }
}

fn check_entry(row: usize, col: usize, weight: f64) -> core::result::Result<(), AdjacencyError> {
    if !weight.is_finite() {
        return Err(AdjacencyError::NonFiniteWeight { row, col });
    }
    if weight < 0.0 {
        return Err(AdjacencyError::NegativeWeight { row, col, weight });
    }
    Ok(())
}

fn validate_csr(
    rows: usize,
    cols: usize,
    indptr: &[usize],
    indices: &[usize],
    data: &[f64],
) -> core::result::Result<(), AdjacencyError> {
    if indptr.len() != rows + 1 {
        return Err(AdjacencyError::IndptrLength {
            expected: rows + 1,
            got: indptr.len(),
        });
    }
    if indices.len() != data.len() {
        return Err(AdjacencyError::LengthMismatch {
            indices: indices.len(),
            data: data.len(),
        });
    }
    if indptr.first() != Some(&0) {
        return Err(AdjacencyError::IndptrNotMonotonic { row: 0 });
    }
    for (row, window) in indptr.windows(2).enumerate() {
        let (start, end) = (window[0], window[1]);
        if end < start || end > indices.len() {
            return Err(AdjacencyError::IndptrNotMonotonic { row });
        }
        for (&col, &weight) in indices[start..end].iter().zip(&data[start..end]) {
            if col >= cols {
                return Err(AdjacencyError::IndexOutOfBounds {
                    row,
                    index: col,
                    cols,
                });
            }
            check_entry(row, col, weight)?;
        }
    }
    if indptr.last() != Some(&indices.len()) {
        return Err(AdjacencyError::IndptrNotMonotonic { row: rows });
    }
    Ok(())
}

/// How node masses are derived for the similarity normalisation.
///
/// # Examples
/// ```
/// use paris_core::WeightScheme;
///
/// let scheme: WeightScheme = "uniform".parse()?;
/// assert_eq!(scheme, WeightScheme::Uniform);
/// # Ok::<(), paris_core::ParisError>(())
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub enum WeightScheme {
    /// Weight each node by its weighted degree.
    #[default]
    Degree,
    /// Give every node the same weight.
    Uniform,
    /// Use caller-supplied weights, one per node.
    Custom(Vec<f64>),
}

impl FromStr for WeightScheme {
    type Err = ParisError;

    fn from_str(raw: &str) -> Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "degree" => Ok(Self::Degree),
            "uniform" => Ok(Self::Uniform),
            other => Err(ParisError::UnknownWeightScheme {
                name: Arc::from(other),
            }),
        }
    }
}

impl WeightScheme {
    /// Resolves the scheme to a probability vector over `degrees.len()` nodes.
    fn resolve(&self, degrees: &[f64]) -> Result<Vec<f64>> {
        let node_count = degrees.len();
        let raw: Vec<f64> = match self {
            Self::Degree => degrees.to_vec(),
            Self::Uniform => vec![1.0; node_count],
            Self::Custom(weights) => {
                if weights.len() != node_count {
                    return Err(ParisError::WeightLengthMismatch {
                        expected: node_count,
                        got: weights.len(),
                    });
                }
                weights.clone()
            }
        };
        normalise_weights(raw)
    }
}

fn normalise_weights(raw: Vec<f64>) -> Result<Vec<f64>> {
    if let Some((index, &weight)) = raw
        .iter()
        .enumerate()
        .find(|(_, weight)| !weight.is_finite() || **weight < 0.0)
    {
        return Err(ParisError::InvalidNodeWeight { index, weight });
    }
    let total: f64 = raw.iter().sum();
    if total <= 0.0 {
        return Err(ParisError::NonPositiveWeightTotal { total });
    }
    Ok(raw.into_iter().map(|weight| weight / total).collect())
}

/// The normalised triple consumed by the clustering engine.
///
/// Holds a symmetric, square adjacency together with out and in weight
/// vectors that each sum to one.
///
/// # Examples
/// ```
/// use paris_core::{NormalizedGraph, SparseAdjacency, WeightScheme};
///
/// let adjacency = SparseAdjacency::from_edges(3, &[(0, 1, 1.0), (1, 2, 1.0)])?;
/// let graph = NormalizedGraph::new(&adjacency, &WeightScheme::Degree, None, true)?;
/// assert_eq!(graph.node_count(), 3);
/// assert!(graph.adjacency().is_symmetric());
/// # Ok::<(), paris_core::ParisError>(())
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct NormalizedGraph {
    adjacency: SparseAdjacency,
    out_weights: Vec<f64>,
    in_weights: Vec<f64>,
}

impl NormalizedGraph {
    /// Normalises `adjacency` into the triple consumed by the engine.
    ///
    /// Out weights follow `weights` over row sums; in weights follow
    /// `secondary_weights` (or `weights` when `None`) over column sums. When
    /// `force_undirected` is set the adjacency is symmetrised before the
    /// degrees are read. The stored adjacency is always `A + Aᵀ`.
    ///
    /// # Errors
    /// Returns [`ParisError::MalformedAdjacency`] when the matrix is not
    /// square, and the weight errors of [`Self::from_parts`] when a scheme
    /// cannot be normalised.
    pub fn new(
        adjacency: &SparseAdjacency,
        weights: &WeightScheme,
        secondary_weights: Option<&WeightScheme>,
        force_undirected: bool,
    ) -> Result<Self> {
        if !adjacency.is_square() {
            return Err(AdjacencyError::NotSquare {
                rows: adjacency.rows(),
                cols: adjacency.cols(),
            }
            .into());
        }
        let undirected;
        let source = if force_undirected {
            undirected = adjacency.symmetrized();
            &undirected
        } else {
            adjacency
        };
        let out_weights = weights.resolve(&source.out_degrees())?;
        let in_weights = secondary_weights
            .unwrap_or(weights)
            .resolve(&source.in_degrees())?;
        Ok(Self {
            adjacency: source.symmetrized(),
            out_weights,
            in_weights,
        })
    }

    /// Wraps an already normalised triple after checking its shape.
    ///
    /// The adjacency must be square and symmetric; the weight vectors must
    /// have one finite, non-negative entry per node and a positive sum.
    ///
    /// # Errors
    /// Returns [`ParisError::MalformedAdjacency`] for a non-square or
    /// asymmetric matrix, [`ParisError::WeightLengthMismatch`] for vectors of
    /// the wrong length, [`ParisError::InvalidNodeWeight`] for negative or
    /// non-finite weights, and [`ParisError::NonPositiveWeightTotal`] when a
    /// vector sums to zero.
    pub fn from_parts(
        adjacency: SparseAdjacency,
        out_weights: Vec<f64>,
        in_weights: Vec<f64>,
    ) -> Result<Self> {
        if !adjacency.is_square() {
            return Err(AdjacencyError::NotSquare {
                rows: adjacency.rows(),
                cols: adjacency.cols(),
            }
            .into());
        }
        if !adjacency.is_symmetric() {
            return Err(ParisError::AsymmetricAdjacency);
        }
        for weights in [&out_weights, &in_weights] {
            check_weights(adjacency.rows(), weights)?;
        }
        Ok(Self {
            adjacency,
            out_weights,
            in_weights,
        })
    }

    /// Number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.adjacency.rows()
    }

    /// The symmetric adjacency.
    #[must_use]
    pub fn adjacency(&self) -> &SparseAdjacency {
        &self.adjacency
    }

    /// Out weights, one per node.
    #[must_use]
    pub fn out_weights(&self) -> &[f64] {
        &self.out_weights
    }

    /// In weights, one per node.
    #[must_use]
    pub fn in_weights(&self) -> &[f64] {
        &self.in_weights
    }
}

fn check_weights(node_count: usize, weights: &[f64]) -> Result<()> {
    if weights.len() != node_count {
        return Err(ParisError::WeightLengthMismatch {
            expected: node_count,
            got: weights.len(),
        });
    }
    if let Some((index, &weight)) = weights
        .iter()
        .enumerate()
        .find(|(_, weight)| !weight.is_finite() || **weight < 0.0)
    {
        return Err(ParisError::InvalidNodeWeight { index, weight });
    }
    let total: f64 = weights.iter().sum();
    if total <= 0.0 {
        return Err(ParisError::NonPositiveWeightTotal { total });
    }
    Ok(())
}
