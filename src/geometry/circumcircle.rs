//! Circumcircles of triangles.
//!
//! # Degeneracy
//! A triangle is rejected when its orientation determinant cannot be told
//! apart from zero. The test compares `|det|` against a forward error bound
//! proportional to `|bx*cy| + |by*cx|` (Shewchuk's static filter for
//! `orient2d`), so a near-collinear sliver whose sign is unreliable in double
//! precision is treated as degenerate instead of producing a huge, meaningless
//! circle.
//!
//! # Examples
//! ```rust
//! use mesh_migration::geometry::circumcircle::{circumcircle, ORIENT2D_ERRBOUND};
//!
//! let c = circumcircle([0.0, 0.0], [1.0, 0.0], [1.0, 1.0], ORIENT2D_ERRBOUND).unwrap();
//! assert!((c.center[0] - 0.5).abs() < 1e-12);
//! assert!((c.radius_sq - 0.5).abs() < 1e-12);
//! ```

use serde::{Deserialize, Serialize};

/// `(3 + 16ε)ε` with `ε = 2^-53`: relative error bound of a double precision
/// 2x2 orientation determinant.
pub const ORIENT2D_ERRBOUND: f64 = (3.0 + 16.0 * (f64::EPSILON / 2.0)) * (f64::EPSILON / 2.0);

/// A circle given by its center and squared radius.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub center: [f64; 2],
    pub radius_sq: f64,
}

impl Circle {
    /// Radius (not squared).
    #[inline]
    pub fn radius(&self) -> f64 {
        self.radius_sq.sqrt()
    }

    /// Closed-disk containment.
    #[inline]
    pub fn contains(&self, p: [f64; 2]) -> bool {
        dist_sq(self.center, p) <= self.radius_sq
    }
}

/// Why a triangle has no circumcircle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CircumcircleError {
    /// Vertices are collinear within the orientation error bound.
    Collinear,
    /// The construction overflowed or hit a NaN coordinate.
    NonFinite,
}

/// Signed orientation determinant of `(a, b, c)` together with the magnitude
/// used to scale its error bound.
#[inline]
pub fn orient2d(a: [f64; 2], b: [f64; 2], c: [f64; 2]) -> (f64, f64) {
    let detleft = (b[0] - a[0]) * (c[1] - a[1]);
    let detright = (b[1] - a[1]) * (c[0] - a[0]);
    (detleft - detright, detleft.abs() + detright.abs())
}

/// True if `(a, b, c)` is collinear as far as double precision can tell.
///
/// `tolerance` multiplies the determinant magnitude; pass
/// [`ORIENT2D_ERRBOUND`] for the tightest safe value.
#[inline]
pub fn is_degenerate(a: [f64; 2], b: [f64; 2], c: [f64; 2], tolerance: f64) -> bool {
    let (det, detsum) = orient2d(a, b, c);
    !det.is_finite() || det == 0.0 || det.abs() <= tolerance * detsum
}

/// Circumcircle of the triangle `(p1, p2, p3)`.
///
/// The circumcenter is computed relative to `p1` to limit cancellation; the
/// squared radius is the squared distance from the circumcenter to `p1`.
pub fn circumcircle(
    p1: [f64; 2],
    p2: [f64; 2],
    p3: [f64; 2],
    tolerance: f64,
) -> Result<Circle, CircumcircleError> {
    if is_degenerate(p1, p2, p3, tolerance) {
        return Err(CircumcircleError::Collinear);
    }
    let b = sub(p2, p1);
    let c = sub(p3, p1);
    let d = 2.0 * (b[0] * c[1] - b[1] * c[0]);
    let b2 = b[0] * b[0] + b[1] * b[1];
    let c2 = c[0] * c[0] + c[1] * c[1];
    let ux = (c[1] * b2 - b[1] * c2) / d;
    let uy = (b[0] * c2 - c[0] * b2) / d;
    let center = [p1[0] + ux, p1[1] + uy];
    let radius_sq = dist_sq(center, p1);
    if !(center[0].is_finite() && center[1].is_finite() && radius_sq.is_finite()) {
        return Err(CircumcircleError::NonFinite);
    }
    Ok(Circle { center, radius_sq })
}

#[inline]
fn sub(a: [f64; 2], b: [f64; 2]) -> [f64; 2] {
    [a[0] - b[0], a[1] - b[1]]
}

#[inline]
pub(crate) fn dist_sq(a: [f64; 2], b: [f64; 2]) -> f64 {
    let d = sub(a, b);
    d[0] * d[0] + d[1] * d[1]
}
