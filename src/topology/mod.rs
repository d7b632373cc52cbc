//! Mesh connectivity: the borrowed triangle mesh and its vertex-to-element
//! incidence.

pub mod incidence;
pub mod tri_mesh;
