mod support;

use mesh_migration::geometry::{Aabb2, circumcircle};
use mesh_migration::prelude::*;
use proptest::prelude::*;
use support::{FlatMesh, grid_mesh};

fn run(m: &FlatMesh, prev: [f64; 4], next: [f64; 4]) -> TransferBuffer {
    where_to(&m.points, &m.elements, &m.neighbors, &m.offsets, &prev, &next, 1)
        .expect("valid grid input")
}

/// Label by scanning the elements containing `iv` in ascending order.
fn brute_force(m: &FlatMesh, boxes: &NeighborBoxes) -> Vec<Option<Direction>> {
    let pts = m.coords();
    let tris = m.triangles();
    let opts = MigrationOptions::default();
    (0..pts.len())
        .map(|iv| {
            let mut label = None;
            for tri in tris.iter().filter(|t| t.contains(&iv)) {
                let Ok(c) = circumcircle(
                    pts[tri[0]],
                    pts[tri[1]],
                    pts[tri[2]],
                    opts.degeneracy_tolerance,
                ) else {
                    continue;
                };
                for b in boxes.candidates() {
                    if b.extent.intersects_circle(&c, 0.0) {
                        label = Some(b.label);
                    }
                }
            }
            label
        })
        .collect()
}

prop_compose! {
    fn scenario()(
        nx in 2usize..9,
        ny in 2usize..6,
        jitter in 0.0f64..0.3,
        seed in any::<u64>(),
        cut_lo in -1.0f64..4.0,
        gap in 0.0f64..4.0,
    ) -> (FlatMesh, [f64; 4], [f64; 4]) {
        let m = grid_mesh(nx, ny, jitter, seed);
        let prev = [-20.0, -20.0, cut_lo, 20.0];
        let next = [cut_lo + gap, -20.0, 30.0, 20.0];
        (m, prev, next)
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn exports_partition_the_points((m, prev, next) in scenario()) {
        let buf = run(&m, prev, next);
        let (n_prev, n_next) = buf.counts().unwrap();
        prop_assert!(n_prev + n_next <= m.num_points());
        prop_assert_eq!(buf.rows().len(), m.num_points() + 1);
        prop_assert!(buf.validate_invariants().is_ok());

        let plan = buf.to_plan().unwrap();
        let pts = m.coords();
        let mut seen = vec![false; m.num_points()];
        for rec in plan.previous.iter().chain(&plan.next) {
            prop_assert!(!seen[rec.index], "point {} exported twice", rec.index);
            seen[rec.index] = true;
            prop_assert_eq!(rec.point, pts[rec.index]);
        }
        prop_assert!(plan.previous.windows(2).all(|w| w[0].index < w[1].index));
        prop_assert!(plan.next.windows(2).all(|w| w[0].index < w[1].index));
    }

    #[test]
    fn matches_brute_force_scan((m, prev, next) in scenario()) {
        let boxes = NeighborBoxes::try_from_extents(&prev, &next).unwrap();
        let expected = brute_force(&m, &boxes);
        let plan = run(&m, prev, next).to_plan().unwrap();
        let mut got = vec![None; m.num_points()];
        for r in &plan.previous {
            got[r.index] = Some(Direction::Previous);
        }
        for r in &plan.next {
            got[r.index] = Some(Direction::Next);
        }
        prop_assert_eq!(got, expected);
    }

    #[test]
    fn repeated_calls_are_bit_identical((m, prev, next) in scenario()) {
        let a = run(&m, prev, next);
        let b = run(&m, prev, next);
        let bits = |t: &TransferBuffer| t.as_flat().iter().map(|v| v.to_bits()).collect::<Vec<_>>();
        prop_assert_eq!(bits(&a), bits(&b));
    }

    #[test]
    fn typed_plan_packs_to_same_buffer((m, prev, next) in scenario()) {
        let pts = m.coords();
        let tris = m.triangles();
        let mesh = TriMesh::try_new(&pts, &tris).unwrap();
        let inc = Incidence::from_elements(pts.len(), &tris).unwrap();
        let boxes = NeighborBoxes::try_from_extents(&prev, &next).unwrap();
        let (plan, _) = plan_migration(&mesh, &inc, &boxes, &MigrationOptions::default()).unwrap();
        let buf = run(&m, prev, next);
        prop_assert_eq!(&plan.to_transfer_buffer(pts.len()).unwrap(), &buf);
        prop_assert_eq!(buf.to_plan().unwrap(), plan);
    }

    #[test]
    fn wire_roundtrip((m, prev, next) in scenario()) {
        let buf = run(&m, prev, next);
        let back = decode_transfer_buffer(&encode_transfer_buffer(&buf)).unwrap();
        prop_assert_eq!(back, buf);
    }

    #[test]
    fn built_incidence_matches_arrays(nx in 2usize..9, ny in 2usize..6, seed in any::<u64>()) {
        let m = grid_mesh(nx, ny, 0.1, seed);
        let tris = m.triangles();
        let inc = Incidence::from_elements(m.num_points(), &tris).unwrap();
        prop_assert_eq!(*inc.offsets().last().unwrap(), 3 * tris.len());
        let offsets: Vec<usize> = m.offsets.iter().map(|&o| o as usize).collect();
        let neighbors: Vec<usize> = m.neighbors.iter().map(|&e| e as usize).collect();
        prop_assert_eq!(inc.offsets(), &offsets[..]);
        prop_assert_eq!(inc.neighbors(), &neighbors[..]);
    }

    #[test]
    fn unreachable_boxes_export_nothing((m, _prev, _next) in scenario()) {
        let far = Aabb2::new([1e3, 1e3], [1e3 + 1.0, 1e3 + 1.0]);
        let buf = run(&m, far.extent(), far.extent());
        prop_assert_eq!(buf.counts().unwrap(), (0, 0));
    }
}

#[test]
fn strip_layout_drives_interior_rank() {
    let m = grid_mesh(12, 4, 0.2, 7);
    let layout = StripLayout::uniform(Axis::X, -0.5, 11.5, [-1.0, 4.0], 3);
    let boxes = layout.neighbor_boxes(1).unwrap();
    assert_eq!(boxes.len(), 2);
    let nb = NeighborBoxes::new(boxes[0].extent, boxes[1].extent);
    let buf = run(&m, nb.previous.extent(), nb.next.extent());
    let (n_prev, n_next) = buf.counts().unwrap();
    assert!(n_prev > 0 && n_next > 0);
}
