//! Extents of neighboring partitions.
//!
//! A strip decomposition gives every rank at most two neighbors, `rank - 1`
//! and `rank + 1`. [`NeighborBoxes`] holds those two extents in the fixed
//! order the legacy transfer layout expects (previous first). The classifier
//! itself works on any ordered list of [`CandidateBox`]es whose label tells
//! the orchestrator where an exported point goes.

use serde::{Deserialize, Serialize};

use crate::geometry::Aabb2;
use crate::mesh_error::MeshMigrationError;

/// Destination of an exported point in a strip decomposition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Direction {
    /// The partition owned by `rank - 1`.
    Previous,
    /// The partition owned by `rank + 1`.
    Next,
}

impl Direction {
    /// Box index in the legacy two-box layout.
    #[inline]
    pub const fn box_index(self) -> usize {
        match self {
            Direction::Previous => 0,
            Direction::Next => 1,
        }
    }

    /// Neighbor rank of `rank` in this direction, if any.
    #[inline]
    pub fn neighbor_of(self, rank: usize, n_ranks: usize) -> Option<usize> {
        match self {
            Direction::Previous => rank.checked_sub(1),
            Direction::Next => rank.checked_add(1).filter(|&r| r < n_ranks),
        }
    }
}

/// Axis a strip decomposition slices along.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
}

/// A neighbor extent tagged with the label points are classified under.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CandidateBox<L> {
    pub label: L,
    pub extent: Aabb2,
}

impl<L> CandidateBox<L> {
    pub const fn new(label: L, extent: Aabb2) -> Self {
        Self { label, extent }
    }
}

/// The previous/next extents of one strip partition.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct NeighborBoxes {
    pub previous: Aabb2,
    pub next: Aabb2,
}

impl NeighborBoxes {
    pub const fn new(previous: Aabb2, next: Aabb2) -> Self {
        Self { previous, next }
    }

    /// Parse two `(llx, lly, urx, ury)` slices.
    pub fn try_from_extents(previous: &[f64], next: &[f64]) -> Result<Self, MeshMigrationError> {
        Ok(Self {
            previous: Aabb2::try_from_extent(extent4(previous, "previous_box")?, 0)?,
            next: Aabb2::try_from_extent(extent4(next, "next_box")?, 1)?,
        })
    }

    /// Parse the corner-array layout: `llc = [prev.llx, prev.lly, next.llx,
    /// next.lly]`, `urc` likewise for the upper-right corners.
    pub fn from_corner_arrays(llc: &[f64], urc: &[f64]) -> Result<Self, MeshMigrationError> {
        let llc = extent4(llc, "llc")?;
        let urc = extent4(urc, "urc")?;
        Ok(Self {
            previous: Aabb2::try_from_extent([llc[0], llc[1], urc[0], urc[1]], 0)?,
            next: Aabb2::try_from_extent([llc[2], llc[3], urc[2], urc[3]], 1)?,
        })
    }

    /// Extent in the given direction.
    #[inline]
    pub fn get(&self, dir: Direction) -> &Aabb2 {
        match dir {
            Direction::Previous => &self.previous,
            Direction::Next => &self.next,
        }
    }

    /// Candidate list in scan order: previous, then next.
    pub fn candidates(&self) -> [CandidateBox<Direction>; 2] {
        [
            CandidateBox::new(Direction::Previous, self.previous),
            CandidateBox::new(Direction::Next, self.next),
        ]
    }
}

/// Per-rank extents of a strip decomposition, ordered by rank.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StripLayout {
    extents: Vec<Aabb2>,
}

impl StripLayout {
    pub fn new(extents: Vec<Aabb2>) -> Self {
        Self { extents }
    }

    /// Split `[lo, hi]` along `axis` into `n_ranks` equal strips spanning
    /// `cross` on the other axis.
    pub fn uniform(axis: Axis, lo: f64, hi: f64, cross: [f64; 2], n_ranks: usize) -> Self {
        let width = (hi - lo) / n_ranks.max(1) as f64;
        let extents = (0..n_ranks)
            .map(|r| {
                let a = lo + width * r as f64;
                let b = if r + 1 == n_ranks { hi } else { a + width };
                match axis {
                    Axis::X => Aabb2::new([a, cross[0]], [b, cross[1]]),
                    Axis::Y => Aabb2::new([cross[0], a], [cross[1], b]),
                }
            })
            .collect();
        Self { extents }
    }

    pub fn n_ranks(&self) -> usize {
        self.extents.len()
    }

    pub fn extent(&self, rank: usize) -> Option<&Aabb2> {
        self.extents.get(rank)
    }

    /// Boxes of the existing neighbors of `rank`, previous first. The first
    /// and last rank get a single candidate.
    pub fn neighbor_boxes(
        &self,
        rank: usize,
    ) -> Result<Vec<CandidateBox<Direction>>, MeshMigrationError> {
        if rank >= self.n_ranks() {
            return Err(MeshMigrationError::InvalidRank(rank as i64));
        }
        Ok([Direction::Previous, Direction::Next]
            .into_iter()
            .filter_map(|dir| {
                dir.neighbor_of(rank, self.n_ranks())
                    .map(|nb| CandidateBox::new(dir, self.extents[nb]))
            })
            .collect())
    }
}

fn extent4(v: &[f64], buffer: &'static str) -> Result<[f64; 4], MeshMigrationError> {
    <[f64; 4]>::try_from(v).map_err(|_| MeshMigrationError::BufferSizeMismatch {
        buffer,
        expected: 4,
        found: v.len(),
    })
}
