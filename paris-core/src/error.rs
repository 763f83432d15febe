//! Error types for the Paris core library.
//!
//! Defines error enums exposed by the public API and a convenient result alias.

use std::{fmt, sync::Arc};

use thiserror::Error;

macro_rules! define_error_codes {
    (
        $(#[$enum_meta:meta])*
        enum $CodeTy:ident for $ErrTy:ident {
            $(
                $(#[$variant_meta:meta])*
                $CodeVariant:ident => $ErrVariant:ident $( { $($pattern:tt)* } )? => $code:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        #[non_exhaustive]
        pub enum $CodeTy {
            $(
                $(#[$variant_meta])*
                $CodeVariant,
            )+
        }

        impl $CodeTy {
            /// Return the stable machine-readable representation of this error code.
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$CodeVariant => $code,)+
                }
            }
        }

        impl fmt::Display for $CodeTy {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $ErrTy {
            #[doc = concat!(
                "Retrieve the stable [`",
                stringify!($CodeTy),
                "`] for this error."
            )]
            pub const fn code(&self) -> $CodeTy {
                match self {
                    $(Self::$ErrVariant $( { $($pattern)* } )? => $CodeTy::$CodeVariant,)+
                }
            }
        }
    };
}

/// A structural problem found while validating a [`crate::SparseAdjacency`].
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum AdjacencyError {
    /// The matrix is not square, so it cannot describe a graph adjacency.
    #[error("adjacency must be square but has shape {rows}x{cols}")]
    NotSquare {
        /// Number of rows.
        rows: usize,
        /// Number of columns.
        cols: usize,
    },
    /// The row pointer array does not have `rows + 1` entries.
    #[error("indptr has length {got} but {expected} entries were expected")]
    IndptrLength {
        /// Expected length (`rows + 1`).
        expected: usize,
        /// Observed length.
        got: usize,
    },
    /// The row pointer array decreases, does not start at zero, or does not
    /// end at the number of stored entries.
    #[error("indptr is not monotonic at row {row}")]
    IndptrNotMonotonic {
        /// Row at which the pointer array became inconsistent.
        row: usize,
    },
    /// The column indices and weights arrays have different lengths.
    #[error("indices has length {indices} but data has length {data}")]
    LengthMismatch {
        /// Length of the column index array.
        indices: usize,
        /// Length of the weight array.
        data: usize,
    },
    /// A stored entry points at a column outside the matrix.
    #[error("column index {index} in row {row} is out of bounds for {cols} columns")]
    IndexOutOfBounds {
        /// Row holding the offending entry.
        row: usize,
        /// The offending column index.
        index: usize,
        /// Number of columns in the matrix.
        cols: usize,
    },
    /// A dense row does not have as many entries as the first row.
    #[error("row {row} has {got} entries but {expected} were expected")]
    RaggedRow {
        /// Offending row.
        row: usize,
        /// Length of the first row.
        expected: usize,
        /// Length of the offending row.
        got: usize,
    },
    /// A stored weight is NaN or infinite.
    #[error("weight of entry ({row}, {col}) is not finite")]
    NonFiniteWeight {
        /// Row of the entry.
        row: usize,
        /// Column of the entry.
        col: usize,
    },
    /// A stored weight is negative.
    #[error("weight {weight} of entry ({row}, {col}) is negative")]
    NegativeWeight {
        /// Row of the entry.
        row: usize,
        /// Column of the entry.
        col: usize,
        /// The negative weight.
        weight: f64,
    },
}

define_error_codes! {
    /// Stable codes describing [`AdjacencyError`] variants.
    enum AdjacencyErrorCode for AdjacencyError {
        /// The matrix is not square.
        NotSquare => NotSquare { .. } => "ADJACENCY_NOT_SQUARE",
        /// The row pointer array has the wrong length.
        IndptrLength => IndptrLength { .. } => "ADJACENCY_INDPTR_LENGTH",
        /// The row pointer array is inconsistent.
        IndptrNotMonotonic => IndptrNotMonotonic { .. } => "ADJACENCY_INDPTR_NOT_MONOTONIC",
        /// Column indices and weights differ in length.
        LengthMismatch => LengthMismatch { .. } => "ADJACENCY_LENGTH_MISMATCH",
        /// A column index is out of bounds.
        IndexOutOfBounds => IndexOutOfBounds { .. } => "ADJACENCY_INDEX_OUT_OF_BOUNDS",
        /// A dense row has the wrong length.
        RaggedRow => RaggedRow { .. } => "ADJACENCY_RAGGED_ROW",
        /// A weight is NaN or infinite.
        NonFiniteWeight => NonFiniteWeight { .. } => "ADJACENCY_NON_FINITE_WEIGHT",
        /// A weight is negative.
        NegativeWeight => NegativeWeight { .. } => "ADJACENCY_NEGATIVE_WEIGHT",
    }
}

/// Error type produced when configuring or running [`crate::Paris`].
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ParisError {
    /// The graph has fewer than two nodes, so there is nothing to merge.
    #[error("the graph must contain at least two nodes (got {nodes})")]
    TooFewNodes {
        /// Number of nodes supplied by the caller.
        nodes: usize,
    },
    /// The graph has more nodes than the selected engine can index.
    #[error("the {engine} engine supports at most {max} nodes (got {nodes})")]
    TooManyNodes {
        /// Number of nodes supplied by the caller.
        nodes: usize,
        /// Largest node count the engine accepts.
        max: usize,
        /// Name of the engine that rejected the graph.
        engine: &'static str,
    },
    /// The adjacency failed structural validation.
    #[error("malformed adjacency: {error}")]
    MalformedAdjacency {
        #[source]
        /// Underlying validation failure.
        error: AdjacencyError,
    },
    /// A pre-normalised adjacency is not symmetric.
    #[error("the normalised adjacency must be symmetric")]
    AsymmetricAdjacency,
    /// A node weight vector does not have one entry per node.
    #[error("weight vector has length {got} but the graph has {expected} nodes")]
    WeightLengthMismatch {
        /// Number of nodes in the graph.
        expected: usize,
        /// Length of the supplied vector.
        got: usize,
    },
    /// A node weight is negative or not finite.
    #[error("weight {weight} of node {index} must be finite and non-negative")]
    InvalidNodeWeight {
        /// Node carrying the invalid weight.
        index: usize,
        /// The invalid weight.
        weight: f64,
    },
    /// A node weight vector sums to zero, so it cannot be normalised.
    #[error("node weights must sum to a positive total (got {total})")]
    NonPositiveWeightTotal {
        /// Observed total.
        total: f64,
    },
    /// The requested weight scheme name does not match any known scheme.
    #[error("unknown weight scheme `{name}`; expected `degree` or `uniform`")]
    UnknownWeightScheme {
        /// The unrecognised name.
        name: Arc<str>,
    },
    /// The requested engine name does not match any known engine.
    #[error("unknown engine `{name}`; expected `auto`, `reference` or `flat`")]
    UnknownEngine {
        /// The unrecognised name.
        name: Arc<str>,
    },
}

define_error_codes! {
    /// Stable codes describing [`ParisError`] variants.
    enum ParisErrorCode for ParisError {
        /// The graph has fewer than two nodes.
        TooFewNodes => TooFewNodes { .. } => "PARIS_TOO_FEW_NODES",
        /// The graph is too large for the selected engine.
        TooManyNodes => TooManyNodes { .. } => "PARIS_TOO_MANY_NODES",
        /// The adjacency failed structural validation.
        MalformedAdjacency => MalformedAdjacency { .. } => "PARIS_MALFORMED_ADJACENCY",
        /// A pre-normalised adjacency is not symmetric.
        AsymmetricAdjacency => AsymmetricAdjacency => "PARIS_ASYMMETRIC_ADJACENCY",
        /// A node weight vector has the wrong length.
        WeightLengthMismatch => WeightLengthMismatch { .. } => "PARIS_WEIGHT_LENGTH_MISMATCH",
        /// A node weight is negative or not finite.
        InvalidNodeWeight => InvalidNodeWeight { .. } => "PARIS_INVALID_NODE_WEIGHT",
        /// Node weights sum to zero.
        NonPositiveWeightTotal => NonPositiveWeightTotal { .. } => "PARIS_NON_POSITIVE_WEIGHT_TOTAL",
        /// The weight scheme name is not recognised.
        UnknownWeightScheme => UnknownWeightScheme { .. } => "PARIS_UNKNOWN_WEIGHT_SCHEME",
        /// The engine name is not recognised.
        UnknownEngine => UnknownEngine { .. } => "PARIS_UNKNOWN_ENGINE",
    }
}

impl ParisError {
    /// Retrieve the inner [`AdjacencyErrorCode`] when the error originated in
    /// adjacency validation.
    pub const fn adjacency_code(&self) -> Option<AdjacencyErrorCode> {
        match self {
            Self::MalformedAdjacency { error } => Some(error.code()),
            _ => None,
        }
    }
}

impl From<AdjacencyError> for ParisError {
    fn from(error: AdjacencyError) -> Self {
        Self::MalformedAdjacency { error }
    }
}

/// Convenient alias for results returned by the core API.
pub type Result<T> = core::result::Result<T, ParisError>;
