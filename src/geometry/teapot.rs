//! A teapot made of a lathed body and lid, plus a swept handle and spout.

use glam::{Vec2, Vec3};

use super::{
    mesh::{MeshBuilder, TriMesh},
    surface::{cubic_bezier, cubic_bezier_derivative, revolve, ProfilePoint, Sweep},
};

type Curve = [Vec2; 4];

const BODY: [Curve; 4] = [
    // rim
    [
        Vec2::new(1.4, 2.25),
        Vec2::new(1.3375, 2.38125),
        Vec2::new(1.4375, 2.38125),
        Vec2::new(1.5, 2.25),
    ],
    [
        Vec2::new(1.5, 2.25),
        Vec2::new(1.75, 1.725),
        Vec2::new(2.0, 1.2),
        Vec2::new(2.0, 0.75),
    ],
    [
        Vec2::new(2.0, 0.75),
        Vec2::new(2.0, 0.3),
        Vec2::new(1.5, 0.075),
        Vec2::new(1.5, 0.0),
    ],
    // bottom
    [
        Vec2::new(1.5, 0.0),
        Vec2::new(1.0, 0.0),
        Vec2::new(0.5, 0.0),
        Vec2::new(0.0, 0.0),
    ],
];

const LID: [Curve; 2] = [
    [
        Vec2::new(0.0, 3.15),
        Vec2::new(0.8, 3.15),
        Vec2::new(0.0, 2.7),
        Vec2::new(0.2, 2.55),
    ],
    [
        Vec2::new(0.2, 2.55),
        Vec2::new(0.4, 2.4),
        Vec2::new(1.3, 2.4),
        Vec2::new(1.3, 2.25),
    ],
];

const HANDLE: [Curve; 2] = [
    [
        Vec2::new(-1.5, 2.1),
        Vec2::new(-2.5, 2.1),
        Vec2::new(-3.0, 2.0),
        Vec2::new(-3.0, 1.6),
    ],
    [
        Vec2::new(-3.0, 1.6),
        Vec2::new(-3.0, 1.2),
        Vec2::new(-2.6, 0.9),
        Vec2::new(-1.9, 0.7),
    ],
];

const SPOUT: [Curve; 1] = [[
    Vec2::new(1.7, 0.8),
    Vec2::new(2.6, 0.9),
    Vec2::new(2.4, 1.9),
    Vec2::new(3.0, 2.25),
]];

const HANDLE_RADIUS: f32 = 0.15;
const SPOUT_RADII: (f32, f32) = (0.35, 0.15);
const SCALE: f32 = 1.0 / 3.0;

/// Sample a chain of curves in the (radius, y) plane, normals are the tangents rotated a quarter
/// turn clockwise
fn profile(curves: &[Curve], steps: usize) -> Vec<ProfilePoint> {
    let total = (curves.len() * steps) as f32;
    let mut points = Vec::with_capacity(curves.len() * steps + 1);
    for (c, curve) in curves.iter().enumerate() {
        let first = if c == 0 { 0 } else { 1 };
        for k in first..=steps {
            let t = k as f32 / steps as f32;
            let p = cubic_bezier(*curve, t);
            let d = cubic_bezier_derivative(*curve, t);
            let normal = Vec2::new(-d.y, d.x).normalize_or_zero();
            let v = 1.0 - (c * steps + k) as f32 / total;
            points.push(ProfilePoint::new(p.x, p.y, normal, v));
        }
    }
    points
}

/// Sample a chain of curves in the XY plane
fn centerline(curves: &[Curve], steps: usize) -> Vec<Vec3> {
    let mut points = Vec::with_capacity(curves.len() * steps + 1);
    for (c, curve) in curves.iter().enumerate() {
        let first = if c == 0 { 0 } else { 1 };
        for k in first..=steps {
            points.push(cubic_bezier(*curve, k as f32 / steps as f32).extend(0.0));
        }
    }
    points
}

pub fn teapot(subdivisions: usize, with_colors: bool) -> TriMesh {
    let s = subdivisions.max(1);
    let segments = 8 * s;
    let steps = (2 * s).max(2);
    let tube_segments = (4 * s).max(8);
    let tube_steps = (4 * s).max(4);

    let mut builder = MeshBuilder::new(with_colors);
    let color = |_: &ProfilePoint, n: Vec3| n * 0.5 + 0.5;
    revolve(&mut builder, &profile(&BODY, steps), segments, color);
    revolve(&mut builder, &profile(&LID, steps), segments, color);

    let handle = centerline(&HANDLE, tube_steps);
    let radii = vec![HANDLE_RADIUS; handle.len()];
    Sweep {
        initial_normal: Some(Vec3::Z),
        ..Sweep::new(&handle, &radii, false, tube_segments)
    }
    .build(&mut builder);

    let spout = centerline(&SPOUT, tube_steps);
    let last = (spout.len() - 1).max(1) as f32;
    let radii: Vec<_> = (0..spout.len())
        .map(|i| SPOUT_RADII.0 + (SPOUT_RADII.1 - SPOUT_RADII.0) * i as f32 / last)
        .collect();
    Sweep {
        initial_normal: Some(Vec3::Z),
        ..Sweep::new(&spout, &radii, false, tube_segments)
    }
    .build(&mut builder);

    let mut mesh = builder.build();
    for p in mesh.positions.iter_mut() {
        *p *= SCALE;
    }
    mesh
}
