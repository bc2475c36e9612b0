//! Errors surfaced by descriptor extraction and similarity scoring.
//!
//! Every failure is deterministic for a given input, so nothing here is
//! retried or replaced by a default. Each variant names the operation that
//! failed so a matching loop can decide to skip the pair or abort.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, MatchError>;

#[derive(Clone, Debug, PartialEq, Error)]
pub enum MatchError {
    /// Zero perimeter, hull area, axis length or vector magnitude feeding a division,
    /// or a polygon with too few distinct vertices.
    #[error("{op}: degenerate geometry ({reason})")]
    DegenerateGeometry {
        op: &'static str,
        reason: &'static str,
    },
    /// Cosine still outside [-1, 1] after rounding to a fixed number of digits.
    #[error("{op}: value {value} outside the domain of acos")]
    DomainRange { op: &'static str, value: f64 },
    /// Vectors of unequal length.
    #[error("{op}: dimension mismatch ({left} vs {right})")]
    DimensionMismatch {
        op: &'static str,
        left: usize,
        right: usize,
    },
    #[error("{op}: empty vector")]
    EmptyVector { op: &'static str },
    /// NaN or infinite component; `operand` is 1 or 2.
    #[error("{op}: non-finite component at index {index} of operand {operand}")]
    NonFinite {
        op: &'static str,
        operand: u8,
        index: usize,
    },
}

impl MatchError {
    #[inline]
    pub(crate) fn degenerate(op: &'static str, reason: &'static str) -> Self {
        MatchError::DegenerateGeometry { op, reason }
    }

    /// Name of the operation that produced the error.
    pub fn op(&self) -> &'static str {
        match self {
            MatchError::DegenerateGeometry { op, .. }
            | MatchError::DomainRange { op, .. }
            | MatchError::DimensionMismatch { op, .. }
            | MatchError::EmptyVector { op }
            | MatchError::NonFinite { op, .. } => op,
        }
    }
}
