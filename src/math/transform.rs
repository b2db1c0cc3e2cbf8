use glam::{Mat3, Mat4, Quat, Vec3};

/// The wobbling rotation applied to the displayed object
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelTransform {
    pub elapsed: f32,
}

impl ModelTransform {
    pub fn at(elapsed: f32) -> Self {
        Self { elapsed }
    }

    /// Rotate around X then Y then Z as the time goes
    pub fn matrix(&self) -> Mat4 {
        let t = self.elapsed;
        Mat4::from_axis_angle(Vec3::X, f32::sin(t * 3.0) * 0.08)
            * Mat4::from_axis_angle(Vec3::Y, t * 0.1)
            * Mat4::from_axis_angle(Vec3::Z, f32::sin(t * 4.3) * 0.09)
    }
}

/// Matrix to use on normals when positions are transformed by `model`
pub fn normal_matrix(model: &Mat4) -> Mat3 {
    Mat3::from_mat4(*model).inverse().transpose()
}

/// Rotation bringing `Vec3::NEG_Z` onto `direction` while keeping `up` as vertical as possible
pub fn look_rotation(direction: Vec3, up: Vec3) -> Quat {
    let forward = direction.normalize();
    let right = forward.cross(up).normalize_or_zero();
    let right = if right == Vec3::ZERO {
        crate::math::vec::any_orthonormal(forward)
    } else {
        right
    };
    let up = right.cross(forward);
    Quat::from_mat3(&Mat3::from_cols(right, up, -forward)).normalize()
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;

    #[test]
    fn identity_at_zero() {
        let m = ModelTransform::at(0.0).matrix();
        assert!(m.abs_diff_eq(Mat4::IDENTITY, 1e-6));
    }

    #[test]
    fn look_rotation_faces_direction() {
        let dir = Vec3::new(1.0, -1.0, 2.0).normalize();
        let q = look_rotation(dir, Vec3::Y);
        assert!((q * Vec3::NEG_Z).abs_diff_eq(dir, 1e-5));
        // up stays in the upper half space
        assert!((q * Vec3::Y).y > 0.0);
    }

    #[test]
    fn normal_matrix_non_uniform_scale() {
        let model = Mat4::from_scale(Vec3::new(2.0, 1.0, 1.0));
        let n = (normal_matrix(&model) * Vec3::new(1.0, 1.0, 0.0)).normalize();
        // the surface x + y = c becomes x/2 + y = c, normal (0.5, 1)
        assert!(n.abs_diff_eq(Vec3::new(0.5, 1.0, 0.0).normalize(), 1e-5));
    }
}
