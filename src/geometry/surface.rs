//! Surfaces of revolution and swept tubes, shared by most of the curved primitives.

use std::f32::consts::TAU;
use std::ops::{Add, Mul};

use glam::{Quat, Vec2, Vec3};

use super::mesh::{MeshBuilder, Vertex};
use crate::math::vec::any_orthonormal;

pub fn cubic_bezier<T>(p: [T; 4], t: f32) -> T
where
    T: Copy + Add<Output = T> + Mul<f32, Output = T>,
{
    let s = 1.0 - t;
    p[0] * (s * s * s) + p[1] * (3.0 * s * s * t) + p[2] * (3.0 * s * t * t) + p[3] * (t * t * t)
}

pub fn cubic_bezier_derivative<T>(p: [T; 4], t: f32) -> T
where
    T: Copy + Add<Output = T> + Mul<f32, Output = T>,
{
    let s = 1.0 - t;
    p[0] * (-3.0 * s * s)
        + p[1] * (3.0 * s * s - 6.0 * s * t)
        + p[2] * (6.0 * s * t - 3.0 * t * t)
        + p[3] * (3.0 * t * t)
}

/// A point of a profile revolved around the Y axis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProfilePoint {
    pub radius: f32,
    pub y: f32,
    /// Outward normal in the (radius, y) half plane
    pub normal: Vec2,
    /// Texture coordinate along the profile
    pub v: f32,
}

impl ProfilePoint {
    pub fn new(radius: f32, y: f32, normal: Vec2, v: f32) -> Self {
        Self {
            radius,
            y,
            normal,
            v,
        }
    }
}

/// Revolve `profile` around the Y axis, `phi = 0` lies on +Z
pub fn revolve<F>(builder: &mut MeshBuilder, profile: &[ProfilePoint], segments: usize, color: F)
where
    F: Fn(&ProfilePoint, Vec3) -> Vec3,
{
    if profile.len() < 2 || segments < 3 {
        return;
    }

    builder.grid(profile.len() - 1, segments, |i, j| {
        let p = &profile[i];
        let u = j as f32 / segments as f32;
        let (s, c) = (u * TAU).sin_cos();
        let position = Vec3::new(p.radius * s, p.y, p.radius * c);
        let normal = Vec3::new(p.normal.x * s, p.normal.y, p.normal.x * c).normalize_or_zero();
        Vertex::new(position, normal, Vec2::new(u, p.v)).with_color(color(p, normal))
    });
}

/// A tube of circular cross section following a polyline
#[derive(Debug, Clone)]
pub struct Sweep<'a> {
    pub centers: &'a [Vec3],
    /// One radius per center
    pub radii: &'a [f32],
    /// The last center connects back to the first
    pub closed: bool,
    /// Subdivisions around the tube
    pub segments: usize,
    /// Turns of the cross section along the whole path
    pub twist: f32,
    /// Initial angle of the cross section, in radians
    pub twist_offset: f32,
    pub initial_normal: Option<Vec3>,
}

impl<'a> Sweep<'a> {
    pub fn new(centers: &'a [Vec3], radii: &'a [f32], closed: bool, segments: usize) -> Self {
        Self {
            centers,
            radii,
            closed,
            segments,
            twist: 0.0,
            twist_offset: 0.0,
            initial_normal: None,
        }
    }

    fn tangents(&self) -> Vec<Vec3> {
        let n = self.centers.len();
        let mut previous = Vec3::Z;
        (0..n)
            .map(|i| {
                let (before, after) = if self.closed {
                    (self.centers[(i + n - 1) % n], self.centers[(i + 1) % n])
                } else {
                    (self.centers[i.saturating_sub(1)], self.centers[(i + 1).min(n - 1)])
                };
                let t = (after - before).normalize_or_zero();
                if t != Vec3::ZERO {
                    previous = t;
                }
                previous
            })
            .collect()
    }

    /// Normals of rotation minimizing frames, corrected for closed paths so that the last frame
    /// matches the first one
    fn frame_normals(&self, tangents: &[Vec3]) -> Vec<Vec3> {
        let transport = |n: Vec3, t: Vec3| {
            let n = (n - t * t.dot(n)).normalize_or_zero();
            if n == Vec3::ZERO {
                any_orthonormal(t)
            } else {
                n
            }
        };

        let first = transport(
            self.initial_normal.unwrap_or_else(|| any_orthonormal(tangents[0])),
            tangents[0],
        );
        let mut normals = Vec::with_capacity(tangents.len());
        normals.push(first);
        for t in &tangents[1..] {
            let last = normals[normals.len() - 1];
            normals.push(transport(last, *t));
        }

        if self.closed {
            let t0 = tangents[0];
            let closing = transport(normals[normals.len() - 1], t0);
            let angle = f32::atan2(t0.dot(closing.cross(first)), closing.dot(first));
            let count = normals.len() as f32;
            for (i, (n, t)) in normals.iter_mut().zip(tangents).enumerate() {
                *n = Quat::from_axis_angle(*t, angle * i as f32 / count) * *n;
            }
        }
        normals
    }

    pub fn build(&self, builder: &mut MeshBuilder) {
        let n = self.centers.len();
        if n < 2 || self.segments < 3 || self.radii.len() != n {
            return;
        }

        let tangents = self.tangents();
        let normals = self.frame_normals(&tangents);
        let rows = if self.closed { n } else { n - 1 };

        builder.grid(rows, self.segments, |i, j| {
            let k = i % n;
            let f = i as f32 / rows as f32;
            let u = j as f32 / self.segments as f32;
            let theta = u * TAU + self.twist * TAU * f + self.twist_offset;
            let (s, c) = theta.sin_cos();
            let binormal = tangents[k].cross(normals[k]);
            let normal = c * normals[k] + s * binormal;
            let position = self.centers[k] + self.radii[k] * normal;
            Vertex::new(position, normal, Vec2::new(f, u))
        });
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use glam::{Vec2, Vec3};

    use super::*;

    #[test]
    fn bezier_ends() {
        let p = [Vec2::ZERO, Vec2::X, Vec2::ONE, Vec2::Y];
        assert_eq!(cubic_bezier(p, 0.0), Vec2::ZERO);
        assert_eq!(cubic_bezier(p, 1.0), Vec2::Y);
        assert!(cubic_bezier_derivative(p, 0.0).abs_diff_eq(Vec2::new(3.0, 0.0), 1e-6));
    }

    #[test]
    fn revolved_cylinder_faces_out() {
        let profile = [
            ProfilePoint::new(1.0, 1.0, Vec2::X, 1.0),
            ProfilePoint::new(1.0, -1.0, Vec2::X, 0.0),
        ];
        let mut builder = MeshBuilder::new(false);
        revolve(&mut builder, &profile, 8, |_, n| n);
        let mesh = builder.build();
        assert_eq!(mesh.num_triangles(), 16);
        for t in 0..mesh.num_triangles() {
            let [a, b, c] = mesh.triangle_vertices(t);
            let center = (a + b + c) / 3.0;
            let face = (b - a).cross(c - a);
            assert!(face.dot(Vec3::new(center.x, 0.0, center.z)) > 0.0);
        }
    }

    #[test]
    fn closed_sweep_is_seamless() {
        let centers: Vec<_> = (0..32)
            .map(|i| {
                let a = i as f32 / 32.0 * TAU;
                Vec3::new(a.cos(), 0.3 * (3.0 * a).sin(), a.sin())
            })
            .collect();
        let radii = vec![0.1; centers.len()];
        let mut builder = MeshBuilder::new(false);
        let sweep = Sweep::new(&centers, &radii, true, 6);
        sweep.build(&mut builder);
        let mesh = builder.build();

        let row = 7;
        let last = 32 * row;
        for j in 0..row {
            assert!(mesh.positions[j].abs_diff_eq(mesh.positions[last + j], 1e-4));
        }
        for n in &mesh.normals {
            assert_relative_eq!(n.length(), 1.0, epsilon = 1e-4);
        }
    }
}
