use std::ops::RangeInclusive;

use glam::Vec3;

#[derive(Debug, Clone, Copy)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
    pub bounds: (f32, f32),
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
            bounds: (0.0, f32::INFINITY),
        }
    }

    pub fn range(&self) -> RangeInclusive<f32> {
        self.bounds.0..=self.bounds.1
    }

    pub fn at(&self, t: f32) -> Vec3 {
        if !self.range().contains(&t) {
            crate::warn_once!("a ray has been accessed out of bounds");
        }

        self.at_unchecked(t)
    }
    pub fn at_unchecked(&self, t: f32) -> Vec3 {
        self.origin + t * self.direction
    }

    /// Distance along the ray to the triangle `v0 v1 v2`, if it is hit inside the ray range.
    ///
    /// Both faces of the triangle can be hit.
    pub fn triangle_intersection(&self, v0: Vec3, v1: Vec3, v2: Vec3) -> Option<f32> {
        match MollerTrumboreResult::moller_trumbore([v0, v1, v2], self) {
            MollerTrumboreResult::Result { u, v, t } => {
                let inside = u >= 0.0 && v >= 0.0 && u + v <= 1.0;
                (inside && self.range().contains(&t)).then_some(t)
            }
            MollerTrumboreResult::NoResult => None,
        }
    }
}

/// A private type that stores the result of the Möller-Trumbore algorithm
enum MollerTrumboreResult {
    Result { u: f32, v: f32, t: f32 },
    NoResult,
}

impl MollerTrumboreResult {
    const EPSILON: f32 = 1e-8;

    fn moller_trumbore(vertices: [Vec3; 3], ray: &Ray) -> Self {
        let edge1 = vertices[1] - vertices[0];
        let edge2 = vertices[2] - vertices[0];
        let p = ray.direction.cross(edge2);
        let det = edge1.dot(p);

        // ray parallel to the triangle plane
        if det.abs() < Self::EPSILON {
            return MollerTrumboreResult::NoResult;
        }

        let inv_det = 1.0 / det;
        let s = ray.origin - vertices[0];
        let u = s.dot(p) * inv_det;
        let q = s.cross(edge1);
        let v = ray.direction.dot(q) * inv_det;
        let t = edge2.dot(q) * inv_det;

        MollerTrumboreResult::Result { u, v, t }
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::Ray;

    #[test]
    fn ray() {
        let eps = 0.01;
        let ray = Ray::new(
            Vec3 {
                x: 1.,
                y: 0.,
                z: 0.,
            },
            Vec3 {
                x: -1.,
                y: 1.,
                z: 0.,
            },
        );

        assert!(ray.at(0.0).distance_squared(ray.origin) < eps);
        assert!(ray.at(1.0).distance_squared(ray.origin + ray.direction) < eps);
    }

    #[test]
    fn triangle_hit() {
        let ray = Ray::new(Vec3::new(0.2, 0.2, 3.0), Vec3::NEG_Z);
        let t = ray
            .triangle_intersection(Vec3::ZERO, Vec3::X, Vec3::Y)
            .expect("should hit");
        assert!((t - 3.0).abs() < 1e-5);

        // back face is hit too
        let t = ray
            .triangle_intersection(Vec3::ZERO, Vec3::Y, Vec3::X)
            .expect("should hit");
        assert!((t - 3.0).abs() < 1e-5);
    }

    #[test]
    fn triangle_miss() {
        let ray = Ray::new(Vec3::new(0.8, 0.8, 3.0), Vec3::NEG_Z);
        assert!(ray
            .triangle_intersection(Vec3::ZERO, Vec3::X, Vec3::Y)
            .is_none());

        // behind the origin
        let ray = Ray::new(Vec3::new(0.2, 0.2, -3.0), Vec3::NEG_Z);
        assert!(ray
            .triangle_intersection(Vec3::ZERO, Vec3::X, Vec3::Y)
            .is_none());

        // parallel
        let ray = Ray::new(Vec3::new(0.2, 0.2, 0.0), Vec3::X);
        assert!(ray
            .triangle_intersection(Vec3::ZERO, Vec3::X, Vec3::Y)
            .is_none());
    }
}
