//! Vertex-to-element incidence in CSR (Compressed Sparse Row) form.
//!
//! For point `iv` the incident elements are
//! `neighbors[offsets[iv]..offsets[iv + 1]]`. The structure is immutable once
//! built and every constructor validates it, so traversal never needs bounds
//! checks beyond slice indexing.

use crate::debug_invariants::DebugInvariants;
use crate::mesh_error::MeshMigrationError;

/// Immutable point → incident-element map.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Incidence {
    offsets: Vec<usize>,
    neighbors: Vec<usize>,
    num_elements: usize,
}

impl Default for Incidence {
    fn default() -> Self {
        Self {
            offsets: vec![0],
            neighbors: Vec::new(),
            num_elements: 0,
        }
    }
}

impl Incidence {
    /// Wrap an existing `(offsets, neighbors)` pair.
    ///
    /// Rejects a wrong neighbor count with
    /// [`MeshMigrationError::BufferSizeMismatch`] and non-monotonic offsets or
    /// out-of-range element indices with
    /// [`MeshMigrationError::InvalidIncidenceRange`].
    pub fn try_new(
        offsets: Vec<usize>,
        neighbors: Vec<usize>,
        num_elements: usize,
    ) -> Result<Self, MeshMigrationError> {
        let inc = Self {
            offsets,
            neighbors,
            num_elements,
        };
        inc.validate_invariants()?;
        Ok(inc)
    }

    /// Build the incidence of `elements` over `num_points` points.
    ///
    /// Each point lists its elements in increasing element index. A point
    /// repeated within one element is recorded once for that element.
    pub fn from_elements(
        num_points: usize,
        elements: &[[usize; 3]],
    ) -> Result<Self, MeshMigrationError> {
        // 1) degree counts
        let mut deg = vec![0usize; num_points];
        for (e, tri) in elements.iter().enumerate() {
            for (k, &v) in tri.iter().enumerate() {
                if v >= num_points {
                    return Err(MeshMigrationError::ElementVertexOutOfRange {
                        element: e,
                        vertex: v as i64,
                        num_points,
                    });
                }
                if !tri[..k].contains(&v) {
                    deg[v] += 1;
                }
            }
        }

        // prefix sums
        let mut offsets = vec![0usize; num_points + 1];
        for i in 0..num_points {
            offsets[i + 1] = offsets[i] + deg[i];
        }

        // 2) populate in element order, so each list comes out sorted
        let mut neighbors = vec![0usize; offsets[num_points]];
        let mut write = offsets.clone();
        for (e, tri) in elements.iter().enumerate() {
            for (k, &v) in tri.iter().enumerate() {
                if !tri[..k].contains(&v) {
                    neighbors[write[v]] = e;
                    write[v] += 1;
                }
            }
        }

        let inc = Self {
            offsets,
            neighbors,
            num_elements: elements.len(),
        };
        inc.debug_assert_invariants();
        Ok(inc)
    }

    /// Number of points covered.
    #[inline]
    pub fn num_points(&self) -> usize {
        self.offsets.len() - 1
    }

    /// Number of elements neighbor indices range over.
    #[inline]
    pub fn num_elements(&self) -> usize {
        self.num_elements
    }

    /// Number of elements incident to `iv`.
    #[inline]
    pub fn degree(&self, iv: usize) -> usize {
        self.offsets[iv + 1] - self.offsets[iv]
    }

    /// Incident element slice of `iv`.
    #[inline]
    pub fn neighbors_of(&self, iv: usize) -> &[usize] {
        &self.neighbors[self.offsets[iv]..self.offsets[iv + 1]]
    }

    /// Lazy walk over the elements incident to `iv`, in stored order.
    ///
    /// Yields exactly [`degree(iv)`](Self::degree) items.
    #[inline]
    pub fn elements_of(&self, iv: usize) -> IncidentElements<'_> {
        IncidentElements {
            neighbors: &self.neighbors,
            pos: self.offsets[iv],
            end: self.offsets[iv + 1],
        }
    }

    /// CSR offsets, length `num_points + 1`.
    pub fn offsets(&self) -> &[usize] {
        &self.offsets
    }

    /// Flattened neighbor list.
    pub fn neighbors(&self) -> &[usize] {
        &self.neighbors
    }
}

impl DebugInvariants for Incidence {
    fn validate_invariants(&self) -> Result<(), MeshMigrationError> {
        let Some(&last) = self.offsets.last() else {
            return Err(MeshMigrationError::BufferSizeMismatch {
                buffer: "incidence_offsets",
                expected: 1,
                found: 0,
            });
        };
        for (iv, w) in self.offsets.windows(2).enumerate() {
            if w[1] < w[0] {
                return Err(MeshMigrationError::InvalidIncidenceRange {
                    point: iv,
                    reason: format!("offsets decrease from {} to {}", w[0], w[1]),
                });
            }
        }
        if last != self.neighbors.len() {
            return Err(MeshMigrationError::BufferSizeMismatch {
                buffer: "incidence_neighbors",
                expected: last,
                found: self.neighbors.len(),
            });
        }
        for iv in 0..self.num_points() {
            if let Some(&e) = self
                .neighbors_of(iv)
                .iter()
                .find(|&&e| e >= self.num_elements)
            {
                return Err(MeshMigrationError::InvalidIncidenceRange {
                    point: iv,
                    reason: format!(
                        "element index {e} outside [0, {})",
                        self.num_elements
                    ),
                });
            }
        }
        Ok(())
    }
}

/// Iterator over one point's incident elements.
///
/// Finite and single-pass; obtain a fresh one from
/// [`Incidence::elements_of`] to walk again.
#[derive(Debug)]
pub struct IncidentElements<'a> {
    neighbors: &'a [usize],
    pos: usize,
    end: usize,
}

impl Iterator for IncidentElements<'_> {
    type Item = usize;

    #[inline]
    fn next(&mut self) -> Option<usize> {
        if self.pos < self.end {
            let k = self.pos;
            self.pos += 1;
            Some(self.neighbors[k])
        } else {
            None
        }
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.end - self.pos;
        (n, Some(n))
    }
}

impl ExactSizeIterator for IncidentElements<'_> {}
