use std::f32::consts::{FRAC_PI_2, TAU};

use glam::{Vec2, Vec3};

use super::mesh::{MeshBuilder, TriMesh, Vertex};

fn uv_color(uv: Vec2) -> Vec3 {
    Vec3::new(uv.x, uv.y, 1.0 - uv.x)
}

/// A vertex of the XY plane, facing +Z
fn planar(p: Vec2, uv: Vec2) -> Vertex {
    Vertex::new(p.extend(0.0), Vec3::Z, uv).with_color(uv_color(uv))
}

/// Square of size 2 in the XZ plane, facing +Y
pub fn plane(subdivisions: (usize, usize), with_colors: bool) -> TriMesh {
    let (nx, nz) = (subdivisions.0.max(1), subdivisions.1.max(1));
    let mut builder = MeshBuilder::new(with_colors);
    builder.grid(nz, nx, |i, j| {
        let uv = Vec2::new(j as f32 / nx as f32, i as f32 / nz as f32);
        let position = Vec3::new(2.0 * uv.x - 1.0, 0.0, 1.0 - 2.0 * uv.y);
        Vertex::new(position, Vec3::Y, uv).with_color(uv_color(uv))
    });
    builder.build()
}

/// Unit square centered on the origin, each corner has its own color
pub fn rect(with_colors: bool) -> TriMesh {
    const CORNERS: [(Vec2, Vec3); 4] = [
        (Vec2::new(0.0, 0.0), Vec3::new(1.0, 0.0, 0.0)),
        (Vec2::new(1.0, 0.0), Vec3::new(0.0, 1.0, 0.0)),
        (Vec2::new(1.0, 1.0), Vec3::new(0.0, 0.0, 1.0)),
        (Vec2::new(0.0, 1.0), Vec3::new(1.0, 1.0, 0.0)),
    ];
    let mut builder = MeshBuilder::new(with_colors);
    let [a, b, c, d] = CORNERS.map(|(uv, color)| {
        builder.vertex(planar(uv - 0.5, uv).with_color(color))
    });
    builder.quad(a, b, c, d);
    builder.build()
}

/// Unit square with corners rounded by `corner_radius`
pub fn rounded_rect(corner_radius: f32, corner_subdivisions: usize, with_colors: bool) -> TriMesh {
    let radius = corner_radius.clamp(0.0, 0.5);
    let steps = corner_subdivisions.max(1);
    let inner = 0.5 - radius;
    let corners = [
        Vec2::new(inner, inner),
        Vec2::new(-inner, inner),
        Vec2::new(-inner, -inner),
        Vec2::new(inner, -inner),
    ];

    let rim: Vec<_> = corners
        .iter()
        .enumerate()
        .flat_map(|(k, center)| {
            (0..=steps).map(move |s| {
                let a = (k as f32 + s as f32 / steps as f32) * FRAC_PI_2;
                let p = *center + radius * Vec2::new(a.cos(), a.sin());
                planar(p, p + 0.5)
            })
        })
        .collect();

    let mut builder = MeshBuilder::new(with_colors);
    builder.fan(planar(Vec2::ZERO, Vec2::splat(0.5)), &rim);
    builder.build()
}

/// Disc of radius 1
pub fn circle(subdivisions: usize, with_colors: bool) -> TriMesh {
    let n = subdivisions.max(3);
    let rim: Vec<_> = (0..n)
        .map(|k| {
            let a = k as f32 / n as f32 * TAU;
            let p = Vec2::new(a.cos(), a.sin());
            planar(p, p * 0.5 + 0.5)
        })
        .collect();

    let mut builder = MeshBuilder::new(with_colors);
    builder.fan(planar(Vec2::ZERO, Vec2::splat(0.5)), &rim);
    builder.build()
}

/// Ring of mean radius 1 and of the given width
pub fn ring(width: f32, subdivisions: usize, with_colors: bool) -> TriMesh {
    let n = subdivisions.max(3);
    let width = width.clamp(0.0, 2.0);
    let radii = [1.0 - width / 2.0, 1.0 + width / 2.0];

    let mut builder = MeshBuilder::new(with_colors);
    builder.grid(1, n, |i, j| {
        let uv = Vec2::new(j as f32 / n as f32, i as f32);
        let a = uv.x * TAU;
        planar(radii[i] * Vec2::new(a.cos(), a.sin()), uv)
    });
    builder.build()
}
