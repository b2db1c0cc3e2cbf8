use glam::{Mat4, Vec3, Vec4};

use super::{framebuffer::FrameBuffer, triangle::DepthMode};
use crate::geometry::Segment;

/// A colored world space segment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line {
    pub a: Vec3,
    pub b: Vec3,
    pub color: Vec3,
}

impl Line {
    pub fn new(a: Vec3, b: Vec3, color: Vec3) -> Self {
        Self { a, b, color }
    }

    pub fn from_segment(segment: &Segment, transform: &Mat4, color: Vec3) -> Self {
        Self {
            a: transform.transform_point3(segment.a),
            b: transform.transform_point3(segment.b),
            color,
        }
    }
}

/// Clip the segment against the near plane, in clip space
fn clip_near(mut a: Vec4, mut b: Vec4, near: f32) -> Option<(Vec4, Vec4)> {
    match (a.w > near, b.w > near) {
        (true, true) => {}
        (false, false) => return None,
        (a_in, _) => {
            let t = (near - a.w) / (b.w - a.w);
            let clipped = a.lerp(b, t);
            if a_in {
                b = clipped;
            } else {
                a = clipped;
            }
        }
    }
    Some((a, b))
}

/// Clip the segment against the side planes `-w <= x, y <= w` (Liang–Barsky)
fn clip_viewport(a: Vec4, b: Vec4) -> Option<(Vec4, Vec4)> {
    let planes = [
        Vec4::new(1.0, 0.0, 0.0, 1.0),
        Vec4::new(-1.0, 0.0, 0.0, 1.0),
        Vec4::new(0.0, 1.0, 0.0, 1.0),
        Vec4::new(0.0, -1.0, 0.0, 1.0),
    ];
    let (mut t0, mut t1) = (0.0f32, 1.0f32);
    for plane in planes {
        let (da, db) = (plane.dot(a), plane.dot(b));
        match (da < 0.0, db < 0.0) {
            (true, true) => return None,
            (true, false) => t0 = t0.max(da / (da - db)),
            (false, true) => t1 = t1.min(da / (da - db)),
            (false, false) => {}
        }
    }
    (t0 <= t1).then(|| (a.lerp(b, t0), a.lerp(b, t1)))
}

/// Draw a one pixel wide line
pub fn draw_line(
    frame: &mut FrameBuffer,
    view_projection: &Mat4,
    near: f32,
    line: &Line,
    depth_mode: DepthMode,
) {
    let a = *view_projection * line.a.extend(1.0);
    let b = *view_projection * line.b.extend(1.0);
    let Some((a, b)) = clip_near(a, b, near).and_then(|(a, b)| clip_viewport(a, b)) else {
        return;
    };

    let (width, height) = (frame.width as f32, frame.height as f32);
    let to_screen = |c: Vec4| {
        let ndc = c.truncate() / c.w;
        Vec3::new(
            (ndc.x * 0.5 + 0.5) * width,
            (0.5 - ndc.y * 0.5) * height,
            ndc.z,
        )
    };
    let (a, b) = (to_screen(a), to_screen(b));

    let steps = (b - a).truncate().abs().max_element().ceil().max(1.0) as usize;

    for i in 0..=steps {
        let p = a.lerp(b, i as f32 / steps as f32);
        if p.x < 0.0 || p.y < 0.0 || p.x >= width || p.y >= height {
            continue;
        }
        let index = p.y as usize * frame.width + p.x as usize;
        if depth_mode.passes(p.z, frame.depth[index]) {
            frame.color[index] = line.color;
            if depth_mode.write {
                frame.depth[index] = p.z;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::{Mat4, Vec3, Vec4};

    use super::*;

    #[test]
    fn near_clipping() {
        let a = Vec4::new(0.0, 0.0, 0.0, 1.0);
        let b = Vec4::new(0.0, 0.0, 0.0, -1.0);
        let (a2, b2) = clip_near(a, b, 0.1).unwrap();
        assert_eq!(a2, a);
        assert!((b2.w - 0.1).abs() < 1e-6);
        assert!(clip_near(b, b, 0.1).is_none());
    }

    #[test]
    fn horizontal_line() {
        let mut frame = FrameBuffer::new(8, 8);
        let line = Line::new(
            Vec3::new(-1.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::X,
        );
        draw_line(&mut frame, &Mat4::IDENTITY, 0.1, &line, DepthMode::OPAQUE);
        let row = 4 * 8;
        assert!(frame.color[row..row + 8].iter().all(|c| *c == Vec3::X));
        assert_eq!(frame.color.iter().filter(|c| **c == Vec3::X).count(), 8);
    }

    #[test]
    fn viewport_clipping() {
        let a = Vec4::new(-3.0, 0.5, 0.0, 1.0);
        let b = Vec4::new(3.0, 0.5, 0.0, 1.0);
        let (a2, b2) = clip_viewport(a, b).unwrap();
        assert!((a2.x + 1.0).abs() < 1e-6 && (b2.x - 1.0).abs() < 1e-6);
        assert_eq!(a2.y, 0.5);

        let outside = Vec4::new(-3.0, 2.0, 0.0, 1.0);
        assert!(clip_viewport(outside, Vec4::new(3.0, 2.0, 0.0, 1.0)).is_none());
    }

    #[test]
    fn line_crossing_the_viewport_edges() {
        let mut frame = FrameBuffer::new(8, 8);
        let line = Line::new(
            Vec3::new(-50.0, 0.0, 0.0),
            Vec3::new(50.0, 0.0, 0.0),
            Vec3::X,
        );
        draw_line(&mut frame, &Mat4::IDENTITY, 0.1, &line, DepthMode::DISABLED);
        let row = 4 * 8;
        assert!(frame.color[row + 1..row + 7].iter().all(|c| *c == Vec3::X));
        let lit = frame.color.iter().filter(|c| **c == Vec3::X).count();
        let lit_in_row = frame.color[row..row + 8].iter().filter(|c| **c == Vec3::X).count();
        assert_eq!(lit, lit_in_row);
    }

    #[test]
    fn line_ending_behind_the_eye() {
        let mut frame = FrameBuffer::new(64, 64);
        let projection = Mat4::perspective_rh(35f32.to_radians(), 1.0, 0.1, 1000.0);
        let view = Mat4::look_at_rh(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, Vec3::Y);
        let line = Line::new(
            Vec3::new(5.0, 0.0, -50.0),
            Vec3::new(5.0, 0.0, 10.0),
            Vec3::X,
        );
        draw_line(&mut frame, &(projection * view), 0.1, &line, DepthMode::DISABLED);
        let lit = frame.color.iter().filter(|c| **c == Vec3::X).count();
        assert!(lit > 0);
        // the visible part runs from the vanishing side to the right edge
        assert!((0..64).any(|y| frame.color[y * 64 + 63] == Vec3::X));
    }

    #[test]
    fn hidden_line() {
        let mut frame = FrameBuffer::new(8, 8);
        frame.depth.fill(-0.5);
        let line = Line::new(
            Vec3::new(-1.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::X,
        );
        draw_line(&mut frame, &Mat4::IDENTITY, 0.1, &line, DepthMode::overlay(0.0));
        assert!(frame.color.iter().all(|c| *c == Vec3::ZERO));
    }
}
