use std::f32::consts::TAU;

use glam::{Vec2, Vec3};

use super::{
    mesh::{MeshBuilder, TriMesh, Vertex},
    surface::Sweep,
};

/// Radius of the circle followed by the tube center and radius of the tube, for an outer radius
/// of 1 and a hole of radius `1 - ratio`
fn ring_radii(ratio: f32) -> (f32, f32) {
    let outer = 1.0;
    let inner = outer - ratio.clamp(0.0, 1.0);
    ((outer + inner) / 2.0, (outer - inner) / 2.0)
}

/// Torus around the Y axis.
///
/// `twist` whole turns of the cross section are added along the ring, starting at `offset`
/// radians. They are only visible through texturing.
pub fn torus(
    ratio: f32,
    twist: u32,
    offset: f32,
    axis: usize,
    height: usize,
    with_colors: bool,
) -> TriMesh {
    let (center, tube) = ring_radii(ratio);
    let axis = axis.max(3);
    let height = height.max(3);

    let mut builder = MeshBuilder::new(with_colors);
    builder.grid(axis, height, |i, j| {
        let uv = Vec2::new(i as f32 / axis as f32, j as f32 / height as f32);
        let u = uv.x * TAU;
        let theta = uv.y * TAU + twist as f32 * u + offset;
        let (su, cu) = u.sin_cos();
        let (st, ct) = theta.sin_cos();
        let normal = Vec3::new(ct * cu, st, ct * su);
        let position = Vec3::new(center * cu, 0.0, center * su) + tube * normal;
        Vertex::new(position, normal, uv)
    });
    builder.build()
}

/// Helix of `coils` turns around the Y axis, of total height 2 centered on the origin
pub fn helix(
    ratio: f32,
    coils: f32,
    twist: u32,
    offset: f32,
    axis: usize,
    height: usize,
    with_colors: bool,
) -> TriMesh {
    let (center, tube) = ring_radii(ratio);
    let coils = coils.max(0.1);
    let steps = ((axis.max(3) as f32 * coils).ceil() as usize).max(2);
    let centers: Vec<_> = (0..=steps)
        .map(|i| {
            let f = i as f32 / steps as f32;
            let a = f * coils * TAU;
            Vec3::new(center * a.cos(), 2.0 * f - 1.0, center * a.sin())
        })
        .collect();
    let radii = vec![tube; centers.len()];

    let mut builder = MeshBuilder::new(with_colors);
    Sweep {
        twist: twist as f32,
        twist_offset: offset,
        initial_normal: Some(Vec3::X),
        ..Sweep::new(&centers, &radii, false, height.max(3))
    }
    .build(&mut builder);
    builder.build()
}

/// `(p, q)` torus knot, flattened by `scale`.
///
/// `axis` is the subdivision around the tube, `height` the subdivision along the knot.
pub fn torus_knot(
    p: u32,
    q: u32,
    radius: f32,
    scale: Vec3,
    axis: usize,
    height: usize,
    with_colors: bool,
) -> TriMesh {
    let (p, q) = (p.max(1) as f32, q.max(1) as f32);
    let height = height.max(8);
    let centers: Vec<_> = (0..height)
        .map(|i| {
            let t = i as f32 / height as f32 * TAU;
            let r = f32::cos(q * t) + 2.0;
            Vec3::new(r * f32::cos(p * t), -f32::sin(q * t), r * f32::sin(p * t)) / 3.0
        })
        .collect();
    let radii = vec![radius; centers.len()];

    let mut builder = MeshBuilder::new(with_colors);
    Sweep::new(&centers, &radii, true, axis.max(3)).build(&mut builder);
    let mut mesh = builder.build();

    let scale = if scale.cmpeq(Vec3::ZERO).any() {
        Vec3::ONE
    } else {
        scale
    };
    for p in mesh.positions.iter_mut() {
        *p *= scale;
    }
    for n in mesh.normals.iter_mut() {
        *n = (*n / scale).normalize_or_zero();
    }
    if with_colors {
        mesh.colors = mesh.normals.iter().map(|n| *n * 0.5 + 0.5).collect();
    }
    mesh.compute_tangents();
    mesh
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use glam::Vec3;

    use super::*;

    #[test]
    fn torus_extent() {
        let mesh = torus(0.25, 0, 0.0, 24, 12, false);
        let bounds = mesh.bounds().unwrap();
        assert_relative_eq!(bounds.end().x, 1.0, epsilon = 1e-5);
        assert_relative_eq!(bounds.size().y, 0.25, epsilon = 1e-5);
        for (p, n) in mesh.positions.iter().zip(&mesh.normals) {
            // normals point away from the tube center
            let ring = Vec3::new(p.x, 0.0, p.z).normalize() * 0.875;
            assert!((*p - ring).dot(*n) > 0.0);
        }
    }

    #[test]
    fn twist_keeps_the_shape() {
        let plain = torus(0.25, 0, 0.0, 12, 6, false);
        let twisted = torus(0.25, 2, 0.3, 12, 6, false);
        let a = plain.bounds().unwrap();
        let b = twisted.bounds().unwrap();
        assert!(a.center().abs_diff_eq(b.center(), 1e-2));
        assert_eq!(plain.num_triangles(), twisted.num_triangles());
    }

    #[test]
    fn helix_spans_height() {
        let mesh = helix(0.25, 3.0, 0, 0.0, 24, 12, false);
        let bounds = mesh.bounds().unwrap();
        assert!(bounds.origin.y < -0.99 && bounds.end().y > 0.99);
        assert!(bounds.end().x < 1.0 + 1e-4);
    }

    #[test]
    fn torus_knot_is_flattened() {
        let mesh = torus_knot(2, 5, 0.15, Vec3::new(1.0, 0.2, 1.0), 16, 256, true);
        let bounds = mesh.bounds().unwrap();
        assert!(bounds.size().y < 0.2 * bounds.size().x);
        assert!(mesh.has_colors());
        assert!(mesh.has_tangents());
        for n in &mesh.normals {
            assert_relative_eq!(n.length(), 1.0, epsilon = 1e-4);
        }
    }
}
