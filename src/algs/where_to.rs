//! Entry points deciding which points leave a strip partition.
//!
//! [`where_to`] takes the flat numeric buffers a host runtime hands over
//! (`f64` coordinates, `i32` indices) and returns the legacy
//! [`TransferBuffer`]. Buffer lengths are checked against the counts they
//! imply before anything is computed. [`plan_migration`] is the typed
//! equivalent returning a [`MigrationPlan`].
//!
//! # Rank contract
//! `rank` identifies the calling partition for diagnostics only. The caller
//! supplies the extents of ranks `rank - 1` and `rank + 1`; use
//! [`StripLayout::neighbor_boxes`](crate::partitioning::StripLayout::neighbor_boxes)
//! to derive them from a full strip layout. A rank without one of the two
//! neighbors should pass a box that no circumcircle can reach, or call
//! [`classify_points`](crate::algs::classify::classify_points) with a
//! shorter candidate list.
//!
//! # Example
//! ```rust
//! use mesh_migration::algs::where_to::where_to;
//!
//! // unit square split along its diagonal
//! let points = [0.0, 0.0, 1.0, 0.0, 1.0, 1.0, 0.0, 1.0];
//! let elements = [0, 1, 2, 0, 2, 3];
//! let offsets = [0, 2, 3, 5, 6];
//! let neighbors = [0, 1, 0, 0, 1, 1];
//! let buf = where_to(
//!     &points,
//!     &elements,
//!     &neighbors,
//!     &offsets,
//!     &[-1.0, -1.0, 0.5, 2.0],
//!     &[0.5, -1.0, 2.0, 2.0],
//!     1,
//! )?;
//! assert_eq!(buf.counts()?, (0, 4));
//! # Ok::<(), mesh_migration::mesh_error::MeshMigrationError>(())
//! ```

use crate::algs::classify::{MigrationOptions, MigrationReport};
use crate::algs::pack::{MigrationPlan, TransferBuffer};
use crate::mesh_error::MeshMigrationError;
use crate::partitioning::NeighborBoxes;
use crate::topology::incidence::Incidence;
use crate::topology::tri_mesh::TriMesh;

/// Decide migrations with default [`MigrationOptions`].
pub fn where_to(
    points: &[f64],
    elements: &[i32],
    incidence_neighbors: &[i32],
    incidence_offsets: &[i32],
    previous_box: &[f64],
    next_box: &[f64],
    rank: i32,
) -> Result<TransferBuffer, MeshMigrationError> {
    where_to_with_options(
        points,
        elements,
        incidence_neighbors,
        incidence_offsets,
        previous_box,
        next_box,
        rank,
        &MigrationOptions::default(),
    )
    .map(|(buf, _)| buf)
}

/// [`where_to`] with explicit options, also returning the pass diagnostics.
#[allow(clippy::too_many_arguments)]
pub fn where_to_with_options(
    points: &[f64],
    elements: &[i32],
    incidence_neighbors: &[i32],
    incidence_offsets: &[i32],
    previous_box: &[f64],
    next_box: &[f64],
    rank: i32,
    opts: &MigrationOptions,
) -> Result<(TransferBuffer, MigrationReport), MeshMigrationError> {
    if rank < 0 {
        return Err(MeshMigrationError::InvalidRank(rank as i64));
    }

    // 1) sizes
    if points.len() % 2 != 0 {
        return Err(MeshMigrationError::BufferSizeMismatch {
            buffer: "points",
            expected: points.len() - 1,
            found: points.len(),
        });
    }
    if elements.len() % 3 != 0 {
        return Err(MeshMigrationError::BufferSizeMismatch {
            buffer: "elements",
            expected: elements.len() / 3 * 3,
            found: elements.len(),
        });
    }
    let num_points = points.len() / 2;
    let num_elements = elements.len() / 3;
    if incidence_offsets.len() != num_points + 1 {
        return Err(MeshMigrationError::BufferSizeMismatch {
            buffer: "incidence_offsets",
            expected: num_points + 1,
            found: incidence_offsets.len(),
        });
    }
    let boxes = NeighborBoxes::try_from_extents(previous_box, next_box)?;

    // 2) typed views
    let coords: Vec<[f64; 2]> = points.chunks_exact(2).map(|c| [c[0], c[1]]).collect();
    let tris = elements
        .chunks_exact(3)
        .enumerate()
        .map(|(e, c)| -> Result<[usize; 3], MeshMigrationError> {
            let mut tri = [0usize; 3];
            for (slot, &v) in tri.iter_mut().zip(c) {
                *slot = usize::try_from(v).map_err(|_| {
                    MeshMigrationError::ElementVertexOutOfRange {
                        element: e,
                        vertex: v as i64,
                        num_points,
                    }
                })?;
            }
            Ok(tri)
        })
        .collect::<Result<Vec<[usize; 3]>, MeshMigrationError>>()?;
    let offsets = incidence_offsets
        .iter()
        .enumerate()
        .map(|(iv, &o)| {
            usize::try_from(o).map_err(|_| MeshMigrationError::InvalidIncidenceRange {
                point: iv,
                reason: format!("negative offset {o}"),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    let neighbors = to_element_indices(incidence_neighbors, &offsets)?;

    let mesh = TriMesh::try_new(&coords, &tris)?;
    let incidence = Incidence::try_new(offsets, neighbors, num_elements)?;

    // 3) classify + pack
    let (plan, report) = plan_migration(&mesh, &incidence, &boxes, opts)?;
    let buf = plan.to_transfer_buffer(num_points)?;
    log::debug!(
        "rank {rank}: {} point(s) to rank-1, {} to rank+1 of {num_points}",
        plan.previous.len(),
        plan.next.len()
    );
    Ok((buf, report))
}

/// Typed entry point: classify against `boxes` and group the exports.
pub fn plan_migration(
    mesh: &TriMesh<'_>,
    incidence: &Incidence,
    boxes: &NeighborBoxes,
    opts: &MigrationOptions,
) -> Result<(MigrationPlan, MigrationReport), MeshMigrationError> {
    #[cfg(feature = "rayon")]
    let (cls, report) =
        crate::algs::classify::classify_points_par(mesh, incidence, &boxes.candidates(), opts)?;
    #[cfg(not(feature = "rayon"))]
    let (cls, report) =
        crate::algs::classify::classify_points(mesh, incidence, &boxes.candidates(), opts)?;
    Ok((MigrationPlan::from_classification(mesh.points(), &cls), report))
}

/// Convert `i32` neighbor entries, naming the owning point on failure.
fn to_element_indices(
    neighbors: &[i32],
    offsets: &[usize],
) -> Result<Vec<usize>, MeshMigrationError> {
    neighbors
        .iter()
        .enumerate()
        .map(|(k, &e)| {
            usize::try_from(e).map_err(|_| MeshMigrationError::InvalidIncidenceRange {
                // last point whose range starts at or before k
                point: offsets.partition_point(|&o| o <= k).saturating_sub(1),
                reason: format!("negative element index {e}"),
            })
        })
        .collect()
}
