//! Edge-list source and its conversion into a core adjacency.
use std::{
    fs::File,
    io::{BufRead, BufReader, Read},
    path::Path,
};

use paris_core::{SparseAdjacency, graph::FlatGraph};
use tracing::debug;

use crate::{
    errors::EdgeListError,
    parse::{Edge, parse_line},
};

/// A weighted graph read from an edge list.
///
/// # Examples
/// ```
/// use paris_providers_edgelist::EdgeListSource;
///
/// let text = "# ring\n0 1\n1 2 0.5\n2,0\n";
/// let source = EdgeListSource::try_from_reader("ring", text.as_bytes())?;
/// assert_eq!(source.node_count(), 3);
/// assert_eq!(source.edges().len(), 3);
/// let adjacency = source.to_adjacency()?;
/// assert_eq!(adjacency.nnz(), 3);
/// # Ok::<(), paris_providers_edgelist::EdgeListError>(())
/// ```
#[derive(Clone, Debug)]
pub struct EdgeListSource {
    name: String,
    edges: Vec<Edge>,
    node_count: usize,
}

impl EdgeListSource {
    /// Parses an edge list from `reader`.
    ///
    /// # Errors
    /// Returns [`EdgeListError::Io`] when reading fails,
    /// [`EdgeListError::InvalidLine`] for a malformed line, and
    /// [`EdgeListError::EmptyInput`] when no line holds an edge.
    pub fn try_from_reader(name: impl Into<String>, reader: impl Read) -> Result<Self, EdgeListError> {
        let name = name.into();
        let mut edges = Vec::new();
        for (index, line) in BufReader::new(reader).lines().enumerate() {
            if let Some(edge) = parse_line(index + 1, &line?)? {
                edges.push(edge);
            }
        }
        let Some(max_id) = edges.iter().map(|&(a, b, _)| a.max(b)).max() else {
            return Err(EdgeListError::EmptyInput { name });
        };
        // Ids are capped at `MAX_NODE_ID` while parsing.
        let node_count = max_id.saturating_add(1);
        debug!(source = %name, edges = edges.len(), nodes = node_count, "edge list parsed");
        Ok(Self {
            name,
            edges,
            node_count,
        })
    }

    /// Opens and parses the edge list at `path`.
    ///
    /// # Errors
    /// See [`EdgeListSource::try_from_reader`].
    pub fn try_from_path(name: impl Into<String>, path: impl AsRef<Path>) -> Result<Self, EdgeListError> {
        let file = File::open(path)?;
        Self::try_from_reader(name, file)
    }

    /// Extends the graph to `node_count` nodes, adding isolated nodes after
    /// the largest id seen in the input.
    ///
    /// # Errors
    /// Returns [`EdgeListError::NodeCountTooSmall`] when an edge references a
    /// node at or beyond `node_count`, and [`EdgeListError::NodeCountTooLarge`]
    /// when `node_count` exceeds [`FlatGraph::MAX_NODES`].
    pub fn with_node_count(mut self, node_count: usize) -> Result<Self, EdgeListError> {
        if node_count > FlatGraph::MAX_NODES {
            return Err(EdgeListError::NodeCountTooLarge {
                requested: node_count,
                max: FlatGraph::MAX_NODES,
            });
        }
        let max_id = self.node_count - 1;
        if node_count <= max_id {
            return Err(EdgeListError::NodeCountTooSmall {
                requested: node_count,
                max_id,
            });
        }
        self.node_count = node_count;
        Ok(self)
    }

    /// Name given at construction.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.node_count
    }

    /// Parsed edges in input order.
    #[must_use]
    pub fn edges(&self) -> &[(usize, usize, f64)] {
        &self.edges
    }

    /// Builds the adjacency matrix. Each line contributes one stored entry;
    /// repeated pairs are summed.
    ///
    /// # Errors
    /// Returns [`EdgeListError::Core`] when the core rejects the edges.
    pub fn to_adjacency(&self) -> Result<SparseAdjacency, EdgeListError> {
        Ok(SparseAdjacency::from_edges(self.node_count, &self.edges)?)
    }
}
