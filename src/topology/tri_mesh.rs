//! Borrowed view of a partition's points and triangles.

use crate::mesh_error::MeshMigrationError;

/// Points and triangles of one partition, borrowed from the caller.
///
/// Construction checks that every triangle references existing points; the
/// mesh itself is never modified.
#[derive(Clone, Copy, Debug)]
pub struct TriMesh<'a> {
    points: &'a [[f64; 2]],
    elements: &'a [[usize; 3]],
}

impl<'a> TriMesh<'a> {
    pub fn try_new(
        points: &'a [[f64; 2]],
        elements: &'a [[usize; 3]],
    ) -> Result<Self, MeshMigrationError> {
        let num_points = points.len();
        for (e, tri) in elements.iter().enumerate() {
            if let Some(&v) = tri.iter().find(|&&v| v >= num_points) {
                return Err(MeshMigrationError::ElementVertexOutOfRange {
                    element: e,
                    vertex: v as i64,
                    num_points,
                });
            }
        }
        Ok(Self { points, elements })
    }

    #[inline]
    pub fn points(&self) -> &'a [[f64; 2]] {
        self.points
    }

    #[inline]
    pub fn elements(&self) -> &'a [[usize; 3]] {
        self.elements
    }

    #[inline]
    pub fn num_points(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn num_elements(&self) -> usize {
        self.elements.len()
    }

    /// Vertex coordinates of element `e`.
    #[inline]
    pub fn triangle(&self, e: usize) -> [[f64; 2]; 3] {
        let [a, b, c] = self.elements[e];
        [self.points[a], self.points[b], self.points[c]]
    }
}
