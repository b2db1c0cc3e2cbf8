use glam::Vec3;

use crate::{
    math::{bounds::Bounds, vec::any_orthonormal},
    raster::Line,
};

pub const GRID_COLOR: Vec3 = Vec3::splat(0.25);
pub const NORMAL_COLOR: Vec3 = Vec3::new(1.0, 1.0, 0.0);
pub const TANGENT_COLOR: Vec3 = Vec3::new(0.0, 1.0, 0.0);
pub const OBJECT_BOUNDS_COLOR: Vec3 = Vec3::new(1.0, 1.0, 0.0);
pub const EXACT_BOUNDS_COLOR: Vec3 = Vec3::new(1.0, 0.5, 0.0);
pub const APPROX_BOUNDS_COLOR: Vec3 = Vec3::new(0.0, 1.0, 1.0);
pub const PICK_COLOR: Vec3 = Vec3::new(0.0, 1.0, 0.0);
pub const PROBE_COLOR: Vec3 = Vec3::new(1.0, 0.0, 0.0);

/// Line layers of a frame, see [crate::raster::RenderScene]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameOverlay {
    pub lines: Vec<Line>,
    pub guides: Vec<Line>,
    pub markers: Vec<Line>,
}

/// Lines of the XZ plane every unit, from -10 to 10
pub fn grid() -> Vec<Line> {
    (-10..=10)
        .flat_map(|i| {
            let i = i as f32;
            [
                Line::new(Vec3::new(i, 0.0, -10.0), Vec3::new(i, 0.0, 10.0), GRID_COLOR),
                Line::new(Vec3::new(-10.0, 0.0, i), Vec3::new(10.0, 0.0, i), GRID_COLOR),
            ]
        })
        .collect()
}

/// X, Y and Z axes in red, green and blue
pub fn coordinate_frame(length: f32) -> [Line; 3] {
    [
        Line::new(Vec3::ZERO, Vec3::X * length, Vec3::X),
        Line::new(Vec3::ZERO, Vec3::Y * length, Vec3::Y),
        Line::new(Vec3::ZERO, Vec3::Z * length, Vec3::Z),
    ]
}

pub fn wire_box(bounds: &Bounds, color: Vec3) -> impl Iterator<Item = Line> {
    bounds
        .edges()
        .into_iter()
        .map(move |(a, b)| Line::new(a, b, color))
}

/// An arrow from `from` to `to`, with a small head
pub fn arrow(from: Vec3, to: Vec3, color: Vec3) -> Vec<Line> {
    let direction = (to - from).normalize_or_zero();
    if direction == Vec3::ZERO {
        return vec![];
    }
    let length = from.distance(to);
    let side = any_orthonormal(direction);
    let other = direction.cross(side);
    let base = to - 0.15 * length * direction;
    let radius = 0.05 * length;

    let mut lines = vec![Line::new(from, to, color)];
    lines.extend(
        [side, -side, other, -other]
            .into_iter()
            .map(|s| Line::new(base + radius * s, to, color)),
    );
    lines
}

/// A small 3D cross
pub fn marker(center: Vec3, size: f32, color: Vec3) -> [Line; 3] {
    let h = size / 2.0;
    [Vec3::X, Vec3::Y, Vec3::Z].map(|axis| Line::new(center - h * axis, center + h * axis, color))
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;

    #[test]
    fn grid_lines() {
        let grid = grid();
        assert_eq!(grid.len(), 42);
        assert!(grid.iter().all(|l| l.a.y == 0.0 && l.b.y == 0.0));
        assert!(grid.iter().all(|l| l.a.distance(l.b) == 20.0));
    }

    #[test]
    fn arrow_ends_on_target() {
        let lines = arrow(Vec3::Y, Vec3::ZERO, PICK_COLOR);
        assert_eq!(lines.len(), 5);
        assert!(lines.iter().all(|l| l.b == Vec3::ZERO));
        assert!(arrow(Vec3::ONE, Vec3::ONE, PICK_COLOR).is_empty());
    }

    #[test]
    fn box_has_twelve_edges() {
        let bounds = Bounds::from_corners(Vec3::ZERO, Vec3::ONE);
        assert_eq!(wire_box(&bounds, OBJECT_BOUNDS_COLOR).count(), 12);
    }
}
