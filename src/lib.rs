#![cfg_attr(docsrs, feature(doc_cfg))]
//! # mesh-migration
//!
//! mesh-migration decides, for one partition of a strip-decomposed 2D
//! triangulation, which points must be handed to the neighboring partitions
//! so that re-triangulation near partition boundaries stays consistent.
//!
//! An element whose circumcircle reaches into the extent of rank `r - 1` or
//! `r + 1` marks its vertices for export to that rank. The decision is a pure
//! function of the local points, elements, vertex-to-element incidence and the
//! two neighbor extents; nothing is communicated and the mesh is never
//! modified.
//!
//! ## Features
//! - Error-bound guarded circumcircle construction; degenerate elements are
//!   skipped and reported instead of producing garbage circles
//! - CSR vertex-to-element incidence with validation and a builder
//! - Last-hit-wins classification over any ordered list of labelled boxes
//! - Legacy `(num_points + 1) x 3` transfer buffer with header and sentinel
//!   rows, plus a typed [`MigrationPlan`](algs::pack::MigrationPlan)
//! - Versioned little-endian byte codec for transfer buffers
//! - Optional `rayon` feature for parallel classification
//!
//! ## Usage
//! ```toml
//! [dependencies]
//! mesh-migration = "0.1"
//! # features = ["rayon"]
//! ```
//!
//! ## Determinism
//! Points are scanned in index order and each point's incident elements in
//! incidence order, so identical inputs produce bit-identical buffers, with or
//! without `rayon`.

pub mod algs;
pub mod debug_invariants;
pub mod geometry;
pub mod mesh_error;
pub mod partitioning;
pub mod topology;

pub use debug_invariants::DebugInvariants;

/// A convenient prelude to import the most-used traits & types:
pub mod prelude {
    pub use crate::algs::classify::{
        Classification, DegeneratePolicy, MigrationOptions, MigrationReport, classify_points,
    };
    #[cfg(feature = "rayon")]
    pub use crate::algs::classify::classify_points_par;
    pub use crate::algs::pack::{ExportRecord, MigrationPlan, TransferBuffer};
    pub use crate::algs::where_to::{plan_migration, where_to, where_to_with_options};
    pub use crate::algs::wire::{decode_transfer_buffer, encode_transfer_buffer};
    pub use crate::debug_invariants::DebugInvariants;
    pub use crate::geometry::{Aabb2, Circle};
    pub use crate::mesh_error::MeshMigrationError;
    pub use crate::partitioning::{Axis, CandidateBox, Direction, NeighborBoxes, StripLayout};
    pub use crate::topology::incidence::Incidence;
    pub use crate::topology::tri_mesh::TriMesh;
}
