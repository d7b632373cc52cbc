//! Per-point export classification.
//!
//! For every point the classifier walks its incident elements in incidence
//! order and tests each element's circumcircle against every candidate box in
//! box order. Each hit overwrites the point's label, so the final label is the
//! last hit in (element, box) scan order. Points with no hit stay `None`.
//!
//! Degenerate (collinear) elements have no circumcircle; they contribute
//! nothing and are reported in [`MigrationReport::degenerate_elements`], or
//! abort the pass under [`DegeneratePolicy::Error`].

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::geometry::{Circle, CircumcircleError, ORIENT2D_ERRBOUND, circumcircle};
use crate::mesh_error::MeshMigrationError;
use crate::partitioning::CandidateBox;
use crate::topology::incidence::Incidence;
use crate::topology::tri_mesh::TriMesh;

/// What to do when an incident element is degenerate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DegeneratePolicy {
    /// Skip the element silently.
    Skip,
    /// Skip the element and log a warning.
    Warn,
    /// Return [`MeshMigrationError::DegenerateElement`].
    Error,
}

/// Tuning knobs for one classification pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MigrationOptions {
    /// Relative tolerance of the orientation test deciding degeneracy.
    pub degeneracy_tolerance: f64,
    /// Added to the squared circumradius in the circle/box test; must be
    /// finite and `>= 0`.
    pub boundary_tolerance: f64,
    pub degenerate_policy: DegeneratePolicy,
}

impl Default for MigrationOptions {
    fn default() -> Self {
        Self {
            degeneracy_tolerance: ORIENT2D_ERRBOUND,
            boundary_tolerance: 0.0,
            degenerate_policy: DegeneratePolicy::Warn,
        }
    }
}

impl MigrationOptions {
    /// Reject negative or non-finite tolerances.
    pub fn validate(&self) -> Result<(), MeshMigrationError> {
        for (field, value) in [
            ("degeneracy_tolerance", self.degeneracy_tolerance),
            ("boundary_tolerance", self.boundary_tolerance),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(MeshMigrationError::InvalidOption { field, value });
            }
        }
        Ok(())
    }
}

/// Diagnostics of one classification pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MigrationReport {
    /// Points scanned.
    pub points_visited: usize,
    /// Circle/box tests evaluated.
    pub circle_tests: usize,
    /// Distinct degenerate elements referenced by the incidence, ascending.
    pub degenerate_elements: Vec<usize>,
}

impl MigrationReport {
    /// Number of degenerate elements skipped.
    pub fn skipped_elements(&self) -> usize {
        self.degenerate_elements.len()
    }
}

/// One label (or none) per point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification<L> {
    labels: Vec<Option<L>>,
}

impl<L: Copy + PartialEq> Classification<L> {
    pub fn from_labels(labels: Vec<Option<L>>) -> Self {
        Self { labels }
    }

    #[inline]
    pub fn get(&self, iv: usize) -> Option<L> {
        self.labels[iv]
    }

    pub fn as_slice(&self) -> &[Option<L>] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Points labelled `label`, ascending.
    pub fn points_with(&self, label: L) -> impl Iterator<Item = usize> + '_ {
        self.labels
            .iter()
            .positions(move |l| *l == Some(label))
    }

    pub fn count(&self, label: L) -> usize {
        self.points_with(label).count()
    }
}

/// Circumcircle of every element, in element order.
pub fn element_circles(
    mesh: &TriMesh<'_>,
    opts: &MigrationOptions,
) -> Vec<Result<Circle, CircumcircleError>> {
    (0..mesh.num_elements())
        .map(|e| {
            let [a, b, c] = mesh.triangle(e);
            circumcircle(a, b, c, opts.degeneracy_tolerance)
        })
        .collect()
}

/// Classify every point of `mesh` against `boxes`.
pub fn classify_points<L>(
    mesh: &TriMesh<'_>,
    incidence: &Incidence,
    boxes: &[CandidateBox<L>],
    opts: &MigrationOptions,
) -> Result<(Classification<L>, MigrationReport), MeshMigrationError>
where
    L: Copy + PartialEq + std::fmt::Debug,
{
    opts.validate()?;
    check_shapes(mesh, incidence)?;
    let circles = element_circles(mesh, opts);
    let degenerate_elements = referenced_degenerates(incidence, &circles, opts)?;

    let mut circle_tests = 0;
    let labels = (0..mesh.num_points())
        .map(|iv| {
            let (label, tests) = classify_point(iv, incidence, &circles, boxes, opts);
            circle_tests += tests;
            label
        })
        .collect();

    let report = MigrationReport {
        points_visited: mesh.num_points(),
        circle_tests,
        degenerate_elements,
    };
    Ok((Classification { labels }, report))
}

/// [`classify_points`] with elements and points processed on the rayon pool.
///
/// Produces the same classification and report as the serial version.
#[cfg(feature = "rayon")]
pub fn classify_points_par<L>(
    mesh: &TriMesh<'_>,
    incidence: &Incidence,
    boxes: &[CandidateBox<L>],
    opts: &MigrationOptions,
) -> Result<(Classification<L>, MigrationReport), MeshMigrationError>
where
    L: Copy + PartialEq + std::fmt::Debug + Send + Sync,
{
    use rayon::prelude::*;

    opts.validate()?;
    check_shapes(mesh, incidence)?;
    let circles: Vec<_> = (0..mesh.num_elements())
        .into_par_iter()
        .map(|e| {
            let [a, b, c] = mesh.triangle(e);
            circumcircle(a, b, c, opts.degeneracy_tolerance)
        })
        .collect();
    let degenerate_elements = referenced_degenerates(incidence, &circles, opts)?;

    let per_point: Vec<(Option<L>, usize)> = (0..mesh.num_points())
        .into_par_iter()
        .map(|iv| classify_point(iv, incidence, &circles, boxes, opts))
        .collect();
    let circle_tests = per_point.iter().map(|(_, t)| t).sum();
    let labels = per_point.into_iter().map(|(l, _)| l).collect();

    let report = MigrationReport {
        points_visited: mesh.num_points(),
        circle_tests,
        degenerate_elements,
    };
    Ok((Classification { labels }, report))
}

/// Scan one point; returns its label and the number of circle/box tests.
#[inline]
fn classify_point<L>(
    iv: usize,
    incidence: &Incidence,
    circles: &[Result<Circle, CircumcircleError>],
    boxes: &[CandidateBox<L>],
    opts: &MigrationOptions,
) -> (Option<L>, usize)
where
    L: Copy + std::fmt::Debug,
{
    let mut label = None;
    let mut tests = 0;
    for e in incidence.elements_of(iv) {
        let Ok(circle) = &circles[e] else {
            continue;
        };
        for b in boxes {
            tests += 1;
            if b.extent.intersects_circle(circle, opts.boundary_tolerance) {
                label = Some(b.label);
            }
        }
    }
    if let Some(l) = label {
        log::trace!("point {iv} exports to {l:?}");
    }
    (label, tests)
}

fn check_shapes(mesh: &TriMesh<'_>, incidence: &Incidence) -> Result<(), MeshMigrationError> {
    if incidence.num_points() != mesh.num_points() {
        return Err(MeshMigrationError::BufferSizeMismatch {
            buffer: "incidence_offsets",
            expected: mesh.num_points() + 1,
            found: incidence.num_points() + 1,
        });
    }
    if incidence.num_elements() != mesh.num_elements() {
        return Err(MeshMigrationError::BufferSizeMismatch {
            buffer: "elements",
            expected: incidence.num_elements(),
            found: mesh.num_elements(),
        });
    }
    Ok(())
}

fn referenced_degenerates(
    incidence: &Incidence,
    circles: &[Result<Circle, CircumcircleError>],
    opts: &MigrationOptions,
) -> Result<Vec<usize>, MeshMigrationError> {
    let degenerate: Vec<usize> = incidence
        .neighbors()
        .iter()
        .copied()
        .filter(|&e| circles[e].is_err())
        .sorted_unstable()
        .dedup()
        .collect();
    if let Some(&first) = degenerate.first() {
        match opts.degenerate_policy {
            DegeneratePolicy::Skip => {}
            DegeneratePolicy::Warn => {
                log::warn!(
                    "skipping {} degenerate element(s), first is {first}",
                    degenerate.len()
                );
            }
            DegeneratePolicy::Error => {
                return Err(MeshMigrationError::DegenerateElement { element: first });
            }
        }
    }
    Ok(degenerate)
}
