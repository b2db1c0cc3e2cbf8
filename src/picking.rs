use glam::{Mat4, Vec3};
use rayon::prelude::{IntoParallelIterator, IntoParallelRefIterator, ParallelIterator};

use crate::{geometry::TriMesh, math::bounds::Bounds, ray::Ray};

/// Closest intersection between a ray and a mesh, in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickResult {
    pub point: Vec3,
    /// Geometric normal of the hit triangle
    pub normal: Vec3,
    pub distance: f32,
    pub triangle: usize,
}

/// The boxes shown around the picked object
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickBounds {
    /// In object space
    pub object: Bounds,
    /// Fitted around every transformed vertex
    pub world_exact: Bounds,
    /// Fitted around the transformed object box, larger than the exact one
    pub world_approx: Bounds,
}

impl PickBounds {
    pub fn new(mesh: &TriMesh, model: &Mat4) -> Option<Self> {
        let object = mesh.bounds()?;
        Some(Self {
            object,
            world_exact: mesh.bounds_transformed(model)?,
            world_approx: object.transformed(model),
        })
    }
}

/// Intersect `ray` (in world space) with `mesh` placed by `model`
pub fn pick(ray: &Ray, mesh: &TriMesh, model: &Mat4) -> Option<PickResult> {
    let bounds = mesh.bounds_transformed(model)?;
    bounds.ray_intersect(ray)?;

    let world: Vec<Vec3> = mesh
        .positions
        .par_iter()
        .map(|p| model.transform_point3(*p))
        .collect();

    (0..mesh.num_triangles())
        .into_par_iter()
        .filter_map(|triangle| {
            let [v0, v1, v2] = mesh.triangle_indices(triangle).map(|i| world[i]);
            let distance = ray.triangle_intersection(v0, v1, v2)?;
            Some(PickResult {
                point: ray.at_unchecked(distance),
                normal: (v1 - v0).cross(v2 - v0).normalize_or_zero(),
                distance,
                triangle,
            })
        })
        .min_by(|a, b| a.distance.total_cmp(&b.distance))
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use glam::{Mat4, Vec3};

    use super::*;
    use crate::geometry::{build, Primitive, PrimitiveParams, Quality};

    fn sphere() -> TriMesh {
        build(
            Primitive::Icosphere,
            Quality::Default,
            &PrimitiveParams::default(),
            false,
        )
        .unwrap()
    }

    #[test]
    fn closest_hit() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z);
        let hit = pick(&ray, &sphere(), &Mat4::IDENTITY).unwrap();
        assert_relative_eq!(hit.distance, 4.0, epsilon = 0.02);
        assert!(hit.point.z > 0.0);
        // front face, wound counter-clockwise
        assert!(hit.normal.dot(Vec3::Z) > 0.9);
    }

    #[test]
    fn model_transform_is_applied() {
        let model = Mat4::from_translation(Vec3::new(3.0, 0.0, 0.0));
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z);
        assert!(pick(&ray, &sphere(), &model).is_none());

        let ray = Ray::new(Vec3::new(3.0, 0.0, 5.0), Vec3::NEG_Z);
        let hit = pick(&ray, &sphere(), &model).unwrap();
        assert_relative_eq!(hit.point.x, 3.0, epsilon = 0.05);
    }

    #[test]
    fn miss_outside_bounds() {
        let ray = Ray::new(Vec3::new(0.0, 2.0, 5.0), Vec3::NEG_Z);
        assert!(pick(&ray, &sphere(), &Mat4::IDENTITY).is_none());
        assert!(pick(&ray, &TriMesh::default(), &Mat4::IDENTITY).is_none());
    }

    #[test]
    fn approximate_bounds_contain_exact_ones() {
        let model = Mat4::from_rotation_y(0.7) * Mat4::from_rotation_x(0.3);
        let mesh = sphere();
        let bounds = PickBounds::new(&mesh, &model).unwrap();
        let (exact, approx) = (bounds.world_exact, bounds.world_approx);
        assert!(approx.origin.cmple(exact.origin + 1e-5).all());
        assert!(exact.end().cmple(approx.end() + 1e-5).all());
        assert!(approx.size().length() > exact.size().length());
        assert!(bounds.object.contains(Vec3::ZERO));
    }
}
