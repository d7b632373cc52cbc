//! Axis-aligned rectangles and the disk/rectangle overlap predicate.

use serde::{Deserialize, Serialize};

use super::circumcircle::{Circle, dist_sq};
use crate::mesh_error::MeshMigrationError;

/// Closed axis-aligned rectangle `[lower.x, upper.x] x [lower.y, upper.y]`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Aabb2 {
    pub lower: [f64; 2],
    pub upper: [f64; 2],
}

impl Aabb2 {
    /// Build from lower-left and upper-right corners without checks.
    #[inline]
    pub const fn new(lower: [f64; 2], upper: [f64; 2]) -> Self {
        Self { lower, upper }
    }

    /// Build from `(llx, lly, urx, ury)`, rejecting non-finite or inverted
    /// corners. `index` only labels the error.
    pub fn try_from_extent(extent: [f64; 4], index: usize) -> Result<Self, MeshMigrationError> {
        if extent.iter().any(|v| !v.is_finite()) {
            return Err(MeshMigrationError::InvalidBox {
                index,
                reason: format!("non-finite corner in {extent:?}"),
            });
        }
        if extent[0] > extent[2] || extent[1] > extent[3] {
            return Err(MeshMigrationError::InvalidBox {
                index,
                reason: format!("lower-left corner exceeds upper-right in {extent:?}"),
            });
        }
        Ok(Self::new([extent[0], extent[1]], [extent[2], extent[3]]))
    }

    /// `(llx, lly, urx, ury)`.
    #[inline]
    pub fn extent(&self) -> [f64; 4] {
        [self.lower[0], self.lower[1], self.upper[0], self.upper[1]]
    }

    /// Point of the rectangle closest to `p`.
    #[inline]
    pub fn clamp(&self, p: [f64; 2]) -> [f64; 2] {
        // `f64::clamp` panics on inverted bounds; `new` does not check them
        [
            p[0].max(self.lower[0]).min(self.upper[0]),
            p[1].max(self.lower[1]).min(self.upper[1]),
        ]
    }

    /// Squared distance from `p` to the rectangle; zero inside.
    #[inline]
    pub fn dist_sq(&self, p: [f64; 2]) -> f64 {
        dist_sq(self.clamp(p), p)
    }

    /// Closed-rectangle containment.
    #[inline]
    pub fn contains(&self, p: [f64; 2]) -> bool {
        p[0] >= self.lower[0] && p[0] <= self.upper[0] && p[1] >= self.lower[1] && p[1] <= self.upper[1]
    }

    /// Does the closed disk of `circle` overlap this rectangle?
    ///
    /// Covers the center lying inside, a corner lying inside the disk, and the
    /// circle crossing an edge. Touching counts. `slack` is added to the
    /// squared radius and must be non-negative.
    #[inline]
    pub fn intersects_circle(&self, circle: &Circle, slack: f64) -> bool {
        self.dist_sq(circle.center) <= circle.radius_sq + slack
    }
}
