use std::f32::consts::{FRAC_PI_2, PI};

use glam::{Vec2, Vec3};

use super::{
    mesh::{MeshBuilder, TriMesh, Vertex},
    surface::{revolve, ProfilePoint},
};

fn normal_color(_: &ProfilePoint, normal: Vec3) -> Vec3 {
    normal * 0.5 + 0.5
}

/// Unit sphere centered on the origin, `segments` around and `segments / 2` rings
pub fn sphere(segments: usize, with_colors: bool) -> TriMesh {
    let segments = segments.max(3);
    let rings = (segments / 2).max(2);
    let profile: Vec<_> = (0..=rings)
        .map(|i| {
            let f = i as f32 / rings as f32;
            let (s, c) = (f * PI).sin_cos();
            ProfilePoint::new(s, c, Vec2::new(s, c), 1.0 - f)
        })
        .collect();

    let mut builder = MeshBuilder::new(with_colors);
    revolve(&mut builder, &profile, segments, normal_color);
    builder.build()
}

/// Capsule along Y, the cylindrical part spans `[-length / 2, length / 2]`
pub fn capsule(radius: f32, length: f32, axis: usize, height: usize, with_colors: bool) -> TriMesh {
    let radius = radius.max(1e-3);
    let length = length.max(0.0);
    let axis = axis.max(3);
    let height = height.max(1);
    let cap_rings = (axis / 4).max(2);
    let half = length / 2.0;
    let total = length + 2.0 * radius;
    let v = |y: f32| (y + half + radius) / total;

    let mut profile = Vec::with_capacity(2 * cap_rings + height + 1);
    for k in 0..=cap_rings {
        let a = k as f32 / cap_rings as f32 * FRAC_PI_2;
        let (s, c) = a.sin_cos();
        let y = half + radius * c;
        profile.push(ProfilePoint::new(radius * s, y, Vec2::new(s, c), v(y)));
    }
    for k in 1..=height {
        let y = half - k as f32 / height as f32 * length;
        profile.push(ProfilePoint::new(radius, y, Vec2::X, v(y)));
    }
    for k in 1..=cap_rings {
        let a = FRAC_PI_2 + k as f32 / cap_rings as f32 * FRAC_PI_2;
        let (s, c) = a.sin_cos();
        let y = -half + radius * c;
        profile.push(ProfilePoint::new(radius * s, y, Vec2::new(s, c), v(y)));
    }

    let mut builder = MeshBuilder::new(with_colors);
    revolve(&mut builder, &profile, axis, normal_color);
    builder.build()
}

const CONE_BASE_COLOR: Vec3 = Vec3::new(0.2, 0.4, 1.0);
const CONE_APEX_COLOR: Vec3 = Vec3::new(1.0, 0.6, 0.2);

/// Truncated cone along Y from `y = 0` (radius `base`) to `y = 2` (radius `apex`)
pub fn cone(
    base: f32,
    apex: f32,
    axis: usize,
    height: usize,
    caps: usize,
    with_colors: bool,
) -> TriMesh {
    const HEIGHT: f32 = 2.0;
    let axis = axis.max(3);
    let height = height.max(1);
    let caps = caps.max(1);
    let base = base.max(0.0);
    let apex = apex.max(0.0);

    let side_normal = Vec2::new(HEIGHT, base - apex).normalize_or_zero();
    let side: Vec<_> = (0..=height)
        .map(|k| {
            let f = k as f32 / height as f32;
            let radius = apex + (base - apex) * f;
            ProfilePoint::new(radius, HEIGHT * (1.0 - f), side_normal, 1.0 - f)
        })
        .collect();
    let gradient = |p: &ProfilePoint, _: Vec3| CONE_BASE_COLOR.lerp(CONE_APEX_COLOR, p.y / HEIGHT);

    let cap = |radius: f32, y: f32, normal: Vec2| -> Vec<ProfilePoint> {
        (0..=caps)
            .map(|k| {
                let f = k as f32 / caps as f32;
                ProfilePoint::new(radius * f, y, normal, f)
            })
            .collect()
    };

    let mut builder = MeshBuilder::new(with_colors);
    revolve(&mut builder, &side, axis, gradient);
    if apex > 0.0 {
        revolve(&mut builder, &cap(apex, HEIGHT, Vec2::Y), axis, gradient);
    }
    if base > 0.0 {
        revolve(&mut builder, &cap(base, 0.0, Vec2::NEG_Y), axis, gradient);
    }
    builder.build()
}

pub fn cylinder(axis: usize, height: usize, caps: usize, with_colors: bool) -> TriMesh {
    cone(1.0, 1.0, axis, height, caps, with_colors)
}

/// Axis aligned cube of size 1 centered on the origin, each face split in `subdivisions`²
/// quads
pub fn cube(subdivisions: usize, with_colors: bool) -> TriMesh {
    // normal, u axis, v axis, color
    const FACES: [(Vec3, Vec3, Vec3, Vec3); 6] = [
        (Vec3::X, Vec3::NEG_Z, Vec3::Y, Vec3::new(1.0, 0.0, 0.0)),
        (Vec3::NEG_X, Vec3::Z, Vec3::Y, Vec3::new(0.0, 1.0, 1.0)),
        (Vec3::Y, Vec3::X, Vec3::NEG_Z, Vec3::new(0.0, 1.0, 0.0)),
        (Vec3::NEG_Y, Vec3::X, Vec3::Z, Vec3::new(1.0, 0.0, 1.0)),
        (Vec3::Z, Vec3::X, Vec3::Y, Vec3::new(0.0, 0.0, 1.0)),
        (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y, Vec3::new(1.0, 1.0, 0.0)),
    ];

    let n = subdivisions.max(1);
    let mut builder = MeshBuilder::new(with_colors);
    for (normal, u_axis, v_axis, color) in FACES {
        builder.grid(n, n, |i, j| {
            let uv = Vec2::new(j as f32, i as f32) / n as f32;
            let position = 0.5 * normal + (uv.x - 0.5) * u_axis + (uv.y - 0.5) * v_axis;
            Vertex::new(position, normal, uv).with_color(color)
        });
    }
    builder.build()
}
