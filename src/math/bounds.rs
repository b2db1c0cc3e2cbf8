use std::ops::Range;

use glam::{Mat4, Vec3};

use crate::ray::Ray;

/// Axis Aligned Bounding Box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub origin: Vec3,
    /// Should have all coordinates >= 0
    pub diag: Vec3,
}

impl Bounds {
    pub fn from_corners(a: Vec3, b: Vec3) -> Self {
        let origin = a.min(b);
        Self {
            origin,
            diag: a.max(b) - origin,
        }
    }

    /// Smallest box containing all the points, `None` if there are none
    pub fn from_points<I: IntoIterator<Item = Vec3>>(points: I) -> Option<Self> {
        let mut points = points.into_iter();
        let first = points.next()?;
        let (min, max) = points.fold((first, first), |(min, max), p| (min.min(p), max.max(p)));
        Some(Self::from_corners(min, max))
    }

    pub fn end(&self) -> Vec3 {
        self.origin + self.diag
    }

    pub fn center(&self) -> Vec3 {
        self.origin + 0.5 * self.diag
    }

    pub fn size(&self) -> Vec3 {
        self.diag
    }

    pub fn contains(&self, point: Vec3) -> bool {
        self.origin.cmple(point).all() && point.cmple(self.end()).all()
    }

    pub fn corners(&self) -> [Vec3; 8] {
        let (a, b) = (self.origin, self.end());
        [
            Vec3::new(a.x, a.y, a.z),
            Vec3::new(b.x, a.y, a.z),
            Vec3::new(b.x, b.y, a.z),
            Vec3::new(a.x, b.y, a.z),
            Vec3::new(a.x, a.y, b.z),
            Vec3::new(b.x, a.y, b.z),
            Vec3::new(b.x, b.y, b.z),
            Vec3::new(a.x, b.y, b.z),
        ]
    }

    /// The 12 edges of the box, as pairs of corners
    pub fn edges(&self) -> [(Vec3, Vec3); 12] {
        let c = self.corners();
        [
            (c[0], c[1]),
            (c[1], c[2]),
            (c[2], c[3]),
            (c[3], c[0]),
            (c[4], c[5]),
            (c[5], c[6]),
            (c[6], c[7]),
            (c[7], c[4]),
            (c[0], c[4]),
            (c[1], c[5]),
            (c[2], c[6]),
            (c[3], c[7]),
        ]
    }

    /// Fast approximation of the box of a transformed object: the transformed corners are
    /// re-fitted.
    /// The result always contains the exact transformed bounds but may be larger.
    pub fn transformed(&self, transform: &Mat4) -> Bounds {
        Self::from_points(self.corners().map(|c| transform.transform_point3(c)))
            .unwrap_or(*self)
    }

    pub fn ray_intersect(&self, ray: &Ray) -> Option<Range<f32>> {
        // R(t) = ray.origin + t*ray.dir => t*ray_dir = R(t) - ray.origin
        // We want self.origin <= R(t) <= self.end thus
        // self.origin - ray.origin <= t*ray_dir <= self.end - ray.origin
        // Solving for x y z and taking the intersection of results
        // Division by 0.0 gives +/- infinity which keeps the slab logic valid
        let ts_start = (self.origin - ray.origin) / ray.direction;
        let ts_end = (self.end() - ray.origin) / ray.direction;

        let t_min = Vec3::min(ts_start, ts_end).max_element().max(ray.bounds.0);
        let t_max = Vec3::max(ts_start, ts_end).min_element().min(ray.bounds.1);

        if t_min > t_max || t_max.is_nan() || t_min.is_nan() {
            None
        } else {
            Some(t_min..t_max)
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::{Mat4, Vec3};

    use super::Bounds;
    use crate::ray::Ray;

    fn unit() -> Bounds {
        Bounds::from_corners(Vec3::splat(-1.0), Vec3::splat(1.0))
    }

    #[test]
    fn from_points() {
        let b = Bounds::from_points([Vec3::new(1., -2., 0.), Vec3::new(-1., 3., 2.)]).unwrap();
        assert_eq!(b.origin, Vec3::new(-1., -2., 0.));
        assert_eq!(b.end(), Vec3::new(1., 3., 2.));
        assert_eq!(b.center(), Vec3::new(0., 0.5, 1.));
        assert!(Bounds::from_points(std::iter::empty()).is_none());
    }

    #[test]
    fn ray_hits_box() {
        let ray = Ray::new(Vec3::new(0., 0., 5.), Vec3::NEG_Z);
        let range = unit().ray_intersect(&ray).unwrap();
        assert!((range.start - 4.0).abs() < 1e-5);
        assert!((range.end - 6.0).abs() < 1e-5);
    }

    #[test]
    fn ray_misses_box() {
        let ray = Ray::new(Vec3::new(0., 3., 5.), Vec3::NEG_Z);
        assert!(unit().ray_intersect(&ray).is_none());

        // Box is behind the origin
        let ray = Ray::new(Vec3::new(0., 0., 5.), Vec3::Z);
        assert!(unit().ray_intersect(&ray).is_none());
    }

    #[test]
    fn ray_from_inside() {
        let ray = Ray::new(Vec3::ZERO, Vec3::new(1., 1., 0.));
        let range = unit().ray_intersect(&ray).unwrap();
        assert_eq!(range.start, 0.0);
        assert!((range.end - 2f32.sqrt()).abs() < 1e-5);
    }

    #[test]
    fn transformed_contains_rotated_corners() {
        let rot = Mat4::from_rotation_y(0.7);
        let approx = unit().transformed(&rot);
        for c in unit().corners() {
            assert!(approx.contains(rot.transform_point3(c) * 0.999));
        }
        assert!(approx.size().x > 2.0);
    }
}
