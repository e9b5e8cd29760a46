//! Glyph primitives used as per-species shape templates.
//!
//! Every glyph is generated on the unit sphere (or unit cube) and scaled
//! by the requested radius, so the same glyph and radius always yield the
//! same mesh.

use glam::Vec3;
use rustc_hash::FxHashMap;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Shape instanced at every molecule position.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Glyph {
    /// 12-vertex icosahedron (icosphere, no subdivision).
    #[default]
    Icosahedron,
    /// 6-vertex octahedron.
    Octahedron,
    /// 8-vertex axis-aligned cube.
    Cube,
    /// Once-subdivided icosphere, 42 vertices.
    Sphere,
}

/// Triangle mesh for a glyph.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeMesh {
    /// Vertex positions.
    pub positions: Vec<Vec3>,
    /// Triangles as vertex index triples.
    pub faces: Vec<[u32; 3]>,
}

impl ShapeMesh {
    /// Build the mesh for `glyph` at `radius`.
    #[must_use]
    pub fn build(glyph: Glyph, radius: f32) -> Self {
        let mut mesh = match glyph {
            Glyph::Icosahedron => icosphere(0),
            Glyph::Sphere => icosphere(1),
            Glyph::Octahedron => octahedron(),
            Glyph::Cube => cube(),
        };
        for p in &mut mesh.positions {
            *p *= radius;
        }
        mesh
    }

    /// Number of vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Positions flattened to `[x, y, z, ...]`.
    #[must_use]
    pub fn flat_positions(&self) -> &[f32] {
        bytemuck::cast_slice(&self.positions)
    }
}

/// Icosphere with the given subdivision level.
/// Level 0 = icosahedron (20 triangles, 12 vertices)
/// Level 1 = 80 triangles, 42 vertices
fn icosphere(subdivisions: u32) -> ShapeMesh {
    let phi = (1.0 + 5.0_f32.sqrt()) / 2.0;
    let inv_len = 1.0 / (1.0 + phi * phi).sqrt();

    let mut positions: Vec<Vec3> = vec![
        Vec3::new(-1.0, phi, 0.0) * inv_len,
        Vec3::new(1.0, phi, 0.0) * inv_len,
        Vec3::new(-1.0, -phi, 0.0) * inv_len,
        Vec3::new(1.0, -phi, 0.0) * inv_len,
        Vec3::new(0.0, -1.0, phi) * inv_len,
        Vec3::new(0.0, 1.0, phi) * inv_len,
        Vec3::new(0.0, -1.0, -phi) * inv_len,
        Vec3::new(0.0, 1.0, -phi) * inv_len,
        Vec3::new(phi, 0.0, -1.0) * inv_len,
        Vec3::new(phi, 0.0, 1.0) * inv_len,
        Vec3::new(-phi, 0.0, -1.0) * inv_len,
        Vec3::new(-phi, 0.0, 1.0) * inv_len,
    ];

    // CCW winding for outward-facing normals
    let mut faces: Vec<[u32; 3]> = vec![
        [0, 5, 11], [0, 1, 5], [0, 7, 1], [0, 10, 7], [0, 11, 10],
        [1, 9, 5], [5, 4, 11], [11, 2, 10], [10, 6, 7], [7, 8, 1],
        [3, 4, 9], [3, 2, 4], [3, 6, 2], [3, 8, 6], [3, 9, 8],
        [4, 5, 9], [2, 11, 4], [6, 10, 2], [8, 7, 6], [9, 1, 8],
    ];

    let mut midpoint_cache: FxHashMap<(u32, u32), u32> = FxHashMap::default();
    for _ in 0..subdivisions {
        let mut next = Vec::with_capacity(faces.len() * 4);
        for &[v0, v1, v2] in &faces {
            let a = midpoint(&mut positions, &mut midpoint_cache, v0, v1);
            let b = midpoint(&mut positions, &mut midpoint_cache, v1, v2);
            let c = midpoint(&mut positions, &mut midpoint_cache, v2, v0);
            next.extend_from_slice(&[[v0, a, c], [v1, b, a], [v2, c, b], [a, b, c]]);
        }
        faces = next;
    }

    ShapeMesh { positions, faces }
}

fn midpoint(
    positions: &mut Vec<Vec3>,
    cache: &mut FxHashMap<(u32, u32), u32>,
    v0: u32,
    v1: u32,
) -> u32 {
    let key = if v0 < v1 { (v0, v1) } else { (v1, v0) };
    if let Some(&idx) = cache.get(&key) {
        return idx;
    }

    let mid =
        ((positions[v0 as usize] + positions[v1 as usize]) * 0.5).normalize();
    let idx = positions.len() as u32;
    positions.push(mid);
    let _ = cache.insert(key, idx);
    idx
}

fn octahedron() -> ShapeMesh {
    let positions = vec![
        Vec3::X,
        Vec3::NEG_X,
        Vec3::Y,
        Vec3::NEG_Y,
        Vec3::Z,
        Vec3::NEG_Z,
    ];
    let faces = vec![
        [0, 2, 4], [2, 1, 4], [1, 3, 4], [3, 0, 4],
        [2, 0, 5], [1, 2, 5], [3, 1, 5], [0, 3, 5],
    ];
    ShapeMesh { positions, faces }
}

fn cube() -> ShapeMesh {
    let h = 1.0 / 3.0_f32.sqrt();
    let positions = (0..8)
        .map(|i| {
            Vec3::new(
                if i & 1 == 0 { -h } else { h },
                if i & 2 == 0 { -h } else { h },
                if i & 4 == 0 { -h } else { h },
            )
        })
        .collect();
    let faces = vec![
        [0, 2, 1], [1, 2, 3], // -z
        [4, 5, 6], [5, 7, 6], // +z
        [0, 1, 4], [1, 5, 4], // -y
        [2, 6, 3], [3, 6, 7], // +y
        [0, 4, 2], [2, 4, 6], // -x
        [1, 3, 5], [3, 7, 5], // +x
    ];
    ShapeMesh { positions, faces }
}
