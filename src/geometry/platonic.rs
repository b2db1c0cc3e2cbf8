use std::collections::HashMap;
use std::f32::consts::{PI, TAU};

use glam::{Vec2, Vec3};

use super::mesh::{MeshBuilder, TriMesh, Vertex};

const FACES: [[u32; 3]; 20] = [
    [0, 11, 5],
    [0, 5, 1],
    [0, 1, 7],
    [0, 7, 10],
    [0, 10, 11],
    [1, 5, 9],
    [5, 11, 4],
    [11, 10, 2],
    [10, 7, 6],
    [7, 1, 8],
    [3, 9, 4],
    [3, 4, 2],
    [3, 2, 6],
    [3, 6, 8],
    [3, 8, 9],
    [4, 9, 5],
    [2, 4, 11],
    [6, 2, 10],
    [8, 6, 7],
    [9, 8, 1],
];

/// The 12 vertices of the icosahedron inscribed in the unit sphere
fn vertices() -> Vec<Vec3> {
    let t = (1.0 + 5f32.sqrt()) / 2.0;
    [
        (-1.0, t, 0.0),
        (1.0, t, 0.0),
        (-1.0, -t, 0.0),
        (1.0, -t, 0.0),
        (0.0, -1.0, t),
        (0.0, 1.0, t),
        (0.0, -1.0, -t),
        (0.0, 1.0, -t),
        (t, 0.0, -1.0),
        (t, 0.0, 1.0),
        (-t, 0.0, -1.0),
        (-t, 0.0, 1.0),
    ]
    .into_iter()
    .map(|(x, y, z)| Vec3::new(x, y, z).normalize())
    .collect()
}

fn spherical_uv(p: Vec3) -> Vec2 {
    Vec2::new(
        0.5 + f32::atan2(p.x, p.z) / TAU,
        0.5 + p.y.clamp(-1.0, 1.0).asin() / PI,
    )
}

/// Flat shaded icosahedron, every face has its own vertices
pub fn icosahedron(with_colors: bool) -> TriMesh {
    let positions = vertices();
    let mut builder = MeshBuilder::new(with_colors);
    for face in FACES {
        let corners = face.map(|i| positions[i as usize]);
        let normal = ((corners[0] + corners[1] + corners[2]) / 3.0).normalize();
        let [a, b, c] = corners.map(|p| builder.vertex(Vertex::new(p, normal, spherical_uv(p))));
        builder.triangle(a, b, c);
    }
    builder.build()
}

/// Icosahedron whose faces are split in 4, `subdivisions` times, and projected on the unit sphere
pub fn icosphere(subdivisions: usize, with_colors: bool) -> TriMesh {
    let mut positions = vertices();
    let mut faces = FACES.to_vec();

    for _ in 0..subdivisions {
        let mut midpoints: HashMap<(u32, u32), u32> = HashMap::new();
        let mut midpoint = |a: u32, b: u32, positions: &mut Vec<Vec3>| -> u32 {
            *midpoints.entry((a.min(b), a.max(b))).or_insert_with(|| {
                let p = (positions[a as usize] + positions[b as usize]).normalize();
                positions.push(p);
                positions.len() as u32 - 1
            })
        };

        faces = faces
            .into_iter()
            .flat_map(|[a, b, c]| {
                let ab = midpoint(a, b, &mut positions);
                let bc = midpoint(b, c, &mut positions);
                let ca = midpoint(c, a, &mut positions);
                [[a, ab, ca], [b, bc, ab], [c, ca, bc], [ab, bc, ca]]
            })
            .collect();
    }

    let mut builder = MeshBuilder::new(with_colors);
    for p in &positions {
        builder.vertex(Vertex::new(*p, *p, spherical_uv(*p)));
    }
    for [a, b, c] in faces {
        builder.triangle(a, b, c);
    }
    builder.build()
}
