use std::sync::Arc;

use paris_core::{AdjacencyError, AdjacencyErrorCode, ParisError, ParisErrorCode};
use rstest::rstest;

#[rstest]
#[case(AdjacencyError::NotSquare { rows: 2, cols: 3 }, AdjacencyErrorCode::NotSquare)]
#[case(
    AdjacencyError::IndptrLength { expected: 3, got: 2 },
    AdjacencyErrorCode::IndptrLength,
)]
#[case(AdjacencyError::IndptrNotMonotonic { row: 1 }, AdjacencyErrorCode::IndptrNotMonotonic)]
#[case(
    AdjacencyError::LengthMismatch { indices: 2, data: 1 },
    AdjacencyErrorCode::LengthMismatch,
)]
#[case(
    AdjacencyError::IndexOutOfBounds { row: 0, index: 5, cols: 2 },
    AdjacencyErrorCode::IndexOutOfBounds,
)]
#[case(
    AdjacencyError::RaggedRow { row: 1, expected: 2, got: 1 },
    AdjacencyErrorCode::RaggedRow,
)]
#[case(AdjacencyError::NonFiniteWeight { row: 0, col: 1 }, AdjacencyErrorCode::NonFiniteWeight)]
#[case(
    AdjacencyError::NegativeWeight { row: 0, col: 1, weight: -1.0 },
    AdjacencyErrorCode::NegativeWeight,
)]
fn returns_expected_adjacency_code(
    #[case] error: AdjacencyError,
    #[case] expected: AdjacencyErrorCode,
) {
    assert_eq!(error.code(), expected);
    assert_eq!(error.code().to_string(), expected.as_str());
    assert!(expected.as_str().starts_with("ADJACENCY_"));
}

#[rstest]
#[case(ParisError::TooFewNodes { nodes: 1 }, ParisErrorCode::TooFewNodes, None)]
#[case(
    ParisError::TooManyNodes { nodes: 10, max: 4, engine: "flat" },
    ParisErrorCode::TooManyNodes,
    None,
)]
#[case(
    ParisError::MalformedAdjacency { error: AdjacencyError::IndptrNotMonotonic { row: 2 } },
    ParisErrorCode::MalformedAdjacency,
    Some(AdjacencyErrorCode::IndptrNotMonotonic),
)]
#[case(ParisError::AsymmetricAdjacency, ParisErrorCode::AsymmetricAdjacency, None)]
#[case(
    ParisError::WeightLengthMismatch { expected: 3, got: 2 },
    ParisErrorCode::WeightLengthMismatch,
    None,
)]
#[case(
    ParisError::InvalidNodeWeight { index: 0, weight: f64::NAN },
    ParisErrorCode::InvalidNodeWeight,
    None,
)]
#[case(
    ParisError::NonPositiveWeightTotal { total: 0.0 },
    ParisErrorCode::NonPositiveWeightTotal,
    None,
)]
#[case(
    ParisError::UnknownWeightScheme { name: Arc::from("pagerank") },
    ParisErrorCode::UnknownWeightScheme,
    None,
)]
#[case(
    ParisError::UnknownEngine { name: Arc::from("gpu") },
    ParisErrorCode::UnknownEngine,
    None,
)]
fn returns_expected_paris_code(
    #[case] error: ParisError,
    #[case] expected: ParisErrorCode,
    #[case] adjacency_code: Option<AdjacencyErrorCode>,
) {
    assert_eq!(error.code(), expected);
    assert_eq!(error.code().as_str(), expected.as_str());
    assert_eq!(error.adjacency_code(), adjacency_code);
}

#[test]
fn adjacency_errors_convert_into_malformed_adjacency() {
    let error = ParisError::from(AdjacencyError::NotSquare { rows: 1, cols: 2 });
    assert_eq!(error.code(), ParisErrorCode::MalformedAdjacency);
    assert_eq!(
        error.to_string(),
        "malformed adjacency: adjacency must be square but has shape 1x2"
    );
    let source = std::error::Error::source(&error).expect("source must be kept");
    assert_eq!(source.to_string(), "adjacency must be square but has shape 1x2");
}
