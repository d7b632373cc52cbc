//! MeshMigrationError: unified error type for mesh-migration public APIs
//!
//! Every public entry point returns `Result<_, MeshMigrationError>`; invalid
//! input never panics.

use thiserror::Error;

/// Unified error type for migration-decision operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MeshMigrationError {
    /// A flat input buffer disagrees with the counts implied by the other inputs.
    #[error("buffer `{buffer}` has length {found}, expected {expected}")]
    BufferSizeMismatch {
        buffer: &'static str,
        expected: usize,
        found: usize,
    },
    /// Offsets are non-monotonic or a neighbor is not a valid element index.
    #[error("invalid incidence range at point {point}: {reason}")]
    InvalidIncidenceRange { point: usize, reason: String },
    /// An element references a point index outside `[0, num_points)`.
    #[error("element {element} references vertex {vertex}, outside [0, {num_points})")]
    ElementVertexOutOfRange {
        element: usize,
        vertex: i64,
        num_points: usize,
    },
    /// The three vertices of an element are collinear.
    #[error("element {element} is degenerate (collinear vertices)")]
    DegenerateElement { element: usize },
    /// A neighbor box has non-finite corners or is inverted.
    #[error("invalid box {index}: {reason}")]
    InvalidBox { index: usize, reason: String },
    /// A [`MigrationOptions`](crate::algs::classify::MigrationOptions) field is
    /// out of range.
    #[error("invalid option `{field}` = {value}: must be finite and >= 0")]
    InvalidOption { field: &'static str, value: f64 },
    /// Ranks are non-negative.
    #[error("invalid rank {0}")]
    InvalidRank(i64),
    /// A transfer buffer does not follow the header/record/sentinel layout.
    #[error("malformed transfer buffer: {0}")]
    MalformedTransferBuffer(String),
    /// Byte payload could not be decoded.
    #[error("wire decode error: {0}")]
    Wire(String),
}
