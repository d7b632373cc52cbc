//! Geometry utilities for mesh-migration.
//!
//! Circumcircle construction with an error-bound guarded degeneracy test, and
//! the closed disk / axis-aligned rectangle overlap predicate used to decide
//! whether an element reaches into a neighbor partition.

pub mod aabb;
pub mod circumcircle;

pub use aabb::Aabb2;
pub use circumcircle::{Circle, CircumcircleError, ORIENT2D_ERRBOUND, circumcircle};
