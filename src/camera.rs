use glam::{Mat4, Quat, Vec2, Vec3};

use crate::{math::transform::look_rotation, ray::Ray};

/// A perspective camera looking down its local `-Z` axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerspectiveCamera {
    pub eye: Vec3,
    pub orientation: Quat,
    pub world_up: Vec3,
    /// Vertical field of view, in degrees
    pub fov: f32,
    pub aspect_ratio: f32,
    pub near: f32,
    pub far: f32,
    /// Distance from the eye to the point the camera orbits around
    pub pivot_distance: f32,
}

impl Default for PerspectiveCamera {
    fn default() -> Self {
        Self {
            eye: Vec3::new(28.0, 21.0, 28.0),
            orientation: look_rotation(Vec3::new(-28.0, -21.0, -28.0), Vec3::Y),
            world_up: Vec3::Y,
            fov: 35.0,
            aspect_ratio: 1.0,
            near: 0.1,
            far: 1000.0,
            pivot_distance: Vec3::new(28.0, 21.0, 28.0).length(),
        }
    }
}

impl PerspectiveCamera {
    pub fn look_at(&mut self, eye: Vec3, target: Vec3) {
        self.eye = eye;
        let direction = target - eye;
        if direction.length_squared() > 0.0 {
            self.orientation = look_rotation(direction, self.world_up);
            self.pivot_distance = direction.length();
        }
    }

    pub fn view_direction(&self) -> Vec3 {
        self.orientation * Vec3::NEG_Z
    }

    pub fn pivot_point(&self) -> Vec3 {
        self.eye + self.pivot_distance * self.view_direction()
    }

    /// Right and up vectors of the image plane, in world space
    pub fn billboard_vectors(&self) -> (Vec3, Vec3) {
        (self.orientation * Vec3::X, self.orientation * Vec3::Y)
    }

    pub fn view_matrix(&self) -> Mat4 {
        let (_, up) = self.billboard_vectors();
        Mat4::look_to_rh(self.eye, self.view_direction(), up)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(
            self.fov.to_radians(),
            self.aspect_ratio,
            self.near,
            self.far,
        )
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Ray through the image plane point `(u, v)`, both in `[0, 1]`.
    ///
    /// `(0, 0)` is the bottom left corner of the image.
    pub fn generate_ray(&self, u: f32, v: f32, aspect_ratio: f32) -> Ray {
        let s = (u - 0.5) * aspect_ratio;
        let t = v - 0.5;
        // distance of the image plane for an image of height 1
        let view_distance = 0.5 / f32::tan(self.fov.to_radians() / 2.0);
        let (right, up) = self.billboard_vectors();
        Ray::new(
            self.eye,
            right * s + up * t + self.view_direction() * view_distance,
        )
    }

    /// Map a world space point to window coordinates, `None` when it is behind the camera
    pub fn world_to_screen(&self, point: Vec3, size: Vec2) -> Option<Vec2> {
        let clip = self.view_projection() * point.extend(1.0);
        if clip.w <= self.near {
            return None;
        }
        let ndc = clip.truncate() / clip.w;
        Some(Vec2::new(
            (ndc.x * 0.5 + 0.5) * size.x,
            (0.5 - ndc.y * 0.5) * size.y,
        ))
    }
}

/// Mouse buttons the orbit controller reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
}

/// Mouse driven camera manipulation:
/// - left drag tumbles around the pivot point
/// - middle drag pans
/// - right drag dollies
/// - the wheel zooms
#[derive(Debug, Clone)]
pub struct OrbitController {
    initial_mouse: Vec2,
    initial_camera: PerspectiveCamera,
    pub minimum_pivot_distance: f32,
}

impl Default for OrbitController {
    fn default() -> Self {
        Self {
            initial_mouse: Vec2::ZERO,
            initial_camera: PerspectiveCamera::default(),
            minimum_pivot_distance: 1.0,
        }
    }
}

impl OrbitController {
    pub fn mouse_down(&mut self, camera: &PerspectiveCamera, pos: Vec2) {
        self.initial_mouse = pos;
        self.initial_camera = *camera;
    }

    pub fn mouse_drag(
        &mut self,
        camera: &mut PerspectiveCamera,
        pos: Vec2,
        button: MouseButton,
        window_size: Vec2,
    ) {
        let initial = &self.initial_camera;
        let delta = pos - self.initial_mouse;
        match button {
            MouseButton::Left => {
                let mut delta_x = delta.x / -100.0;
                let mut delta_y = delta.y / 100.0;
                let w = initial.view_direction();
                let invert_motion = (initial.orientation * initial.world_up).y < 0.0;
                let u = initial.world_up.cross(w).normalize_or_zero();
                if invert_motion {
                    delta_x = -delta_x;
                    delta_y = -delta_y;
                }

                let pitch = Quat::from_axis_angle(u, delta_y);
                let yaw = Quat::from_axis_angle(initial.world_up, delta_x);
                let rotated = yaw * (pitch * (-w * initial.pivot_distance));
                camera.eye = initial.eye + w * initial.pivot_distance + rotated;
                camera.orientation = (yaw * pitch * initial.orientation).normalize();
            }
            MouseButton::Middle => {
                let (right, up) = initial.billboard_vectors();
                let delta_x = delta.x / 1000.0 * initial.pivot_distance;
                let delta_y = delta.y / 1000.0 * initial.pivot_distance;
                camera.eye = initial.eye - right * delta_x + up * delta_y;
            }
            MouseButton::Right => {
                let mouse_delta = delta.x + delta.y;
                let diagonal = window_size.length().max(1.0);
                let new_pivot_distance =
                    f32::exp(2.0 * -mouse_delta / diagonal) * initial.pivot_distance;
                let old_target = initial.eye + initial.view_direction() * initial.pivot_distance;
                camera.eye = old_target - initial.view_direction() * new_pivot_distance;
                camera.pivot_distance = new_pivot_distance.max(self.minimum_pivot_distance);
            }
        }
    }

    pub fn mouse_wheel(&self, camera: &mut PerspectiveCamera, increment: f32) {
        let multiplier = 1.2f32.powf(increment);
        camera.eye += camera.view_direction() * (camera.pivot_distance * (1.0 - multiplier));
        camera.pivot_distance =
            (camera.pivot_distance * multiplier).max(self.minimum_pivot_distance);
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use glam::{Vec2, Vec3};

    use super::*;

    fn camera() -> PerspectiveCamera {
        let mut camera = PerspectiveCamera {
            aspect_ratio: 4.0 / 3.0,
            ..Default::default()
        };
        camera.look_at(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO);
        camera
    }

    #[test]
    fn look_at_sets_pivot() {
        let camera = camera();
        assert_relative_eq!(camera.pivot_distance, 5.0);
        assert!(camera.view_direction().abs_diff_eq(Vec3::NEG_Z, 1e-6));
        assert!(camera.pivot_point().abs_diff_eq(Vec3::ZERO, 1e-5));
    }

    #[test]
    fn center_ray_follows_view_direction() {
        let camera = camera();
        let ray = camera.generate_ray(0.5, 0.5, camera.aspect_ratio);
        assert!(ray.direction.abs_diff_eq(Vec3::NEG_Z, 1e-6));
        assert_eq!(ray.origin, camera.eye);
    }

    #[test]
    fn top_ray_matches_fov() {
        let camera = camera();
        let ray = camera.generate_ray(0.5, 1.0, camera.aspect_ratio);
        let angle = ray.direction.angle_between(Vec3::NEG_Z);
        assert_relative_eq!(angle, camera.fov.to_radians() / 2.0, epsilon = 1e-5);
        assert!(ray.direction.y > 0.0);
    }

    #[test]
    fn ray_and_projection_agree() {
        let camera = camera();
        let size = Vec2::new(400.0, 300.0);
        let ray = camera.generate_ray(0.25, 0.75, camera.aspect_ratio);
        let point = ray.at(3.0);
        let screen = camera.world_to_screen(point, size).unwrap();
        assert_relative_eq!(screen.x, 100.0, epsilon = 1e-2);
        assert_relative_eq!(screen.y, 75.0, epsilon = 1e-2);
    }

    #[test]
    fn tumble_keeps_pivot() {
        let mut camera = camera();
        let mut orbit = OrbitController::default();
        orbit.mouse_down(&camera, Vec2::new(100.0, 100.0));
        orbit.mouse_drag(
            &mut camera,
            Vec2::new(180.0, 130.0),
            MouseButton::Left,
            Vec2::new(800.0, 600.0),
        );
        assert!(camera.pivot_point().abs_diff_eq(Vec3::ZERO, 1e-4));
        assert_relative_eq!(camera.eye.length(), 5.0, epsilon = 1e-4);
        assert!(!camera.eye.abs_diff_eq(Vec3::new(0.0, 0.0, 5.0), 1e-2));
    }

    #[test]
    fn dolly_and_wheel_move_along_view() {
        let mut camera = camera();
        let mut orbit = OrbitController::default();
        orbit.mouse_down(&camera, Vec2::ZERO);
        orbit.mouse_drag(
            &mut camera,
            Vec2::new(0.0, 100.0),
            MouseButton::Right,
            Vec2::new(800.0, 600.0),
        );
        assert!(camera.eye.z > 0.0 && camera.eye.z < 5.0);

        let mut camera = self::camera();
        orbit.mouse_wheel(&mut camera, 1.0);
        assert_relative_eq!(camera.eye.z, 5.0 - 5.0 * (1.0 - 1.2), epsilon = 1e-4);
        assert_relative_eq!(camera.pivot_distance, 6.0, epsilon = 1e-4);
    }
}
