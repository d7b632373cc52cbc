mod support;

use mesh_migration::algs::classify::{DegeneratePolicy, MigrationOptions};
use mesh_migration::algs::pack::SENTINEL;
use mesh_migration::algs::where_to::{where_to, where_to_with_options};
use mesh_migration::mesh_error::MeshMigrationError;
use support::{grid_mesh, incidence_of};

#[test]
fn unit_square_goes_next() {
    let points = [0.0, 0.0, 1.0, 0.0, 1.0, 1.0, 0.0, 1.0];
    let elements = [0, 1, 2, 0, 2, 3];
    let (neighbors, offsets) = incidence_of(4, &elements);
    let buf = where_to(
        &points,
        &elements,
        &neighbors,
        &offsets,
        &[-1.0, -1.0, 0.5, 2.0],
        &[0.5, -1.0, 2.0, 2.0],
        3,
    )
    .unwrap();
    assert_eq!(buf.counts().unwrap(), (0, 4));
    assert_eq!(
        buf.rows(),
        &[
            [0.0, 4.0, 0.0],
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 1.0],
            [1.0, 1.0, 2.0],
            [0.0, 1.0, 3.0],
        ]
    );
}

#[test]
fn far_boxes_export_nothing() {
    let m = grid_mesh(6, 4, 0.0, 1);
    let buf = where_to(
        &m.points,
        &m.elements,
        &m.neighbors,
        &m.offsets,
        &[-100.0, -100.0, -50.0, 100.0],
        &[50.0, -100.0, 100.0, 100.0],
        1,
    )
    .unwrap();
    assert_eq!(buf.header(), [0.0, 0.0, 0.0]);
    assert_eq!(buf.rows().len(), m.num_points() + 1);
    assert!(buf.rows()[1..].iter().all(|r| *r == [SENTINEL; 3]));
}

#[test]
fn strip_boundaries_split_by_side() {
    // 10 x 3 grid on x in [0, 9]; neighbors own x <= 2 and x >= 7
    let m = grid_mesh(10, 3, 0.0, 1);
    let buf = where_to(
        &m.points,
        &m.elements,
        &m.neighbors,
        &m.offsets,
        &[-10.0, -10.0, 2.0, 10.0],
        &[7.0, -10.0, 20.0, 10.0],
        2,
    )
    .unwrap();
    // unit right triangles have circumradius ~0.707 about the cell center:
    // cells 0..=2 reach the previous box, cells 6..=8 the next one
    assert_eq!(buf.counts().unwrap(), (12, 12));
    let plan = buf.to_plan().unwrap();
    assert!(plan.previous.iter().all(|r| r.point[0] <= 3.0));
    assert!(plan.next.iter().all(|r| r.point[0] >= 6.0));
    let exported: Vec<usize> = plan
        .previous
        .iter()
        .chain(&plan.next)
        .map(|r| r.index)
        .collect();
    for iv in 0..m.num_points() {
        let x = m.points[2 * iv];
        assert_eq!(exported.contains(&iv), !(x == 4.0 || x == 5.0), "point {iv}");
    }
}

#[test]
fn later_element_overrides_earlier_box() {
    // point 0 lies in element 0 (reaching left only) and element 1 (reaching right only)
    let points = [0.0, 0.0, -1.0, 0.0, -1.0, 1.0, 1.0, 0.0, 1.0, 1.0];
    let elements = [0, 1, 2, 0, 3, 4];
    let (neighbors, offsets) = incidence_of(5, &elements);
    let buf = where_to(
        &points,
        &elements,
        &neighbors,
        &offsets,
        &[-10.0, -10.0, -1.2, 10.0],
        &[1.2, -10.0, 10.0, 10.0],
        1,
    )
    .unwrap();
    let plan = buf.to_plan().unwrap();
    let prev: Vec<_> = plan.previous.iter().map(|r| r.index).collect();
    let next: Vec<_> = plan.next.iter().map(|r| r.index).collect();
    assert_eq!(prev, vec![1, 2]);
    assert_eq!(next, vec![0, 3, 4]);
}

#[test]
fn collinear_element_is_ignored() {
    // element 1 = (0, 1, 3) is collinear and would otherwise reach the next box
    let points = [0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 50.0, 0.0];
    let elements = [0, 1, 2, 0, 1, 3];
    let (neighbors, offsets) = incidence_of(4, &elements);
    let (buf, report) = where_to_with_options(
        &points,
        &elements,
        &neighbors,
        &offsets,
        &[-10.0, -10.0, -5.0, 10.0],
        &[40.0, -10.0, 60.0, 10.0],
        0,
        &MigrationOptions::default(),
    )
    .unwrap();
    assert_eq!(buf.counts().unwrap(), (0, 0));
    assert_eq!(report.degenerate_elements, vec![1]);

    let strict = MigrationOptions {
        degenerate_policy: DegeneratePolicy::Error,
        ..Default::default()
    };
    let err = where_to_with_options(
        &points,
        &elements,
        &neighbors,
        &offsets,
        &[-10.0, -10.0, -5.0, 10.0],
        &[40.0, -10.0, 60.0, 10.0],
        0,
        &strict,
    )
    .unwrap_err();
    assert_eq!(err, MeshMigrationError::DegenerateElement { element: 1 });
}

#[test]
fn isolated_points_stay() {
    // point 3 is not referenced by any element
    let points = [0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.5, 0.5];
    let elements = [0, 1, 2];
    let (neighbors, offsets) = incidence_of(4, &elements);
    let buf = where_to(
        &points,
        &elements,
        &neighbors,
        &offsets,
        &[-10.0, -10.0, 10.0, 10.0],
        &[100.0, 100.0, 101.0, 101.0],
        0,
    )
    .unwrap();
    let plan = buf.to_plan().unwrap();
    let prev: Vec<_> = plan.previous.iter().map(|r| r.index).collect();
    assert_eq!(prev, vec![0, 1, 2]);
    assert!(plan.next.is_empty());
}

#[test]
fn empty_partition() {
    let buf = where_to(&[], &[], &[], &[0], &[0.0, 0.0, 1.0, 1.0], &[0.0, 0.0, 1.0, 1.0], 0).unwrap();
    assert_eq!(buf.rows(), &[[0.0, 0.0, 0.0]]);
}

#[test]
fn inverted_box_is_rejected() {
    let m = grid_mesh(3, 3, 0.0, 1);
    let err = where_to(
        &m.points,
        &m.elements,
        &m.neighbors,
        &m.offsets,
        &[0.0, 0.0, 1.0, 1.0],
        &[5.0, 0.0, 4.0, 1.0],
        0,
    )
    .unwrap_err();
    assert!(matches!(err, MeshMigrationError::InvalidBox { index: 1, .. }));
}

#[test]
fn decreasing_offsets_are_rejected() {
    let m = grid_mesh(3, 3, 0.0, 1);
    let mut offsets = m.offsets.clone();
    offsets.swap(1, 2);
    let err = where_to(
        &m.points,
        &m.elements,
        &m.neighbors,
        &offsets,
        &[0.0, 0.0, 1.0, 1.0],
        &[1.0, 0.0, 2.0, 1.0],
        0,
    )
    .unwrap_err();
    assert!(matches!(err, MeshMigrationError::InvalidIncidenceRange { .. }));
}
