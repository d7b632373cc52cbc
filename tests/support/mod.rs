#![allow(dead_code)]

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Jittered `nx x ny` grid triangulated with two triangles per cell, in the
/// flat `f64` / `i32` layout `where_to` consumes.
#[derive(Debug, Clone)]
pub struct FlatMesh {
    pub points: Vec<f64>,
    pub elements: Vec<i32>,
    pub neighbors: Vec<i32>,
    pub offsets: Vec<i32>,
}

impl FlatMesh {
    pub fn num_points(&self) -> usize {
        self.points.len() / 2
    }

    pub fn coords(&self) -> Vec<[f64; 2]> {
        self.points.chunks_exact(2).map(|c| [c[0], c[1]]).collect()
    }

    pub fn triangles(&self) -> Vec<[usize; 3]> {
        self.elements
            .chunks_exact(3)
            .map(|c| [c[0] as usize, c[1] as usize, c[2] as usize])
            .collect()
    }
}

pub fn grid_mesh(nx: usize, ny: usize, jitter: f64, seed: u64) -> FlatMesh {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut points = Vec::with_capacity(2 * nx * ny);
    for j in 0..ny {
        for i in 0..nx {
            let dx = if jitter > 0.0 { rng.gen_range(-jitter..jitter) } else { 0.0 };
            let dy = if jitter > 0.0 { rng.gen_range(-jitter..jitter) } else { 0.0 };
            points.push(i as f64 + dx);
            points.push(j as f64 + dy);
        }
    }
    let id = |i: usize, j: usize| (j * nx + i) as i32;
    let mut elements = Vec::new();
    for j in 0..ny.saturating_sub(1) {
        for i in 0..nx.saturating_sub(1) {
            elements.extend([id(i, j), id(i + 1, j), id(i + 1, j + 1)]);
            elements.extend([id(i, j), id(i + 1, j + 1), id(i, j + 1)]);
        }
    }
    let (neighbors, offsets) = incidence_of(nx * ny, &elements);
    FlatMesh {
        points,
        elements,
        neighbors,
        offsets,
    }
}

/// Vertex-to-element CSR arrays, elements ascending per point.
pub fn incidence_of(num_points: usize, elements: &[i32]) -> (Vec<i32>, Vec<i32>) {
    let mut lists = vec![Vec::new(); num_points];
    for (e, tri) in elements.chunks_exact(3).enumerate() {
        for &v in tri {
            lists[v as usize].push(e as i32);
        }
    }
    let mut offsets = vec![0i32];
    let mut neighbors = Vec::new();
    for l in lists {
        neighbors.extend(l);
        offsets.push(neighbors.len() as i32);
    }
    (neighbors, offsets)
}
