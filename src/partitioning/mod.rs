//! Neighbor-partition extents for strip decompositions.

pub mod neighbor_boxes;

pub use neighbor_boxes::{Axis, CandidateBox, Direction, NeighborBoxes, StripLayout};
