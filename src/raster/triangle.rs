use std::ops::Range;

use glam::{Vec2, Vec3, Vec4};

/// Interpolated attributes of a covered pixel
#[derive(Debug, Clone, Copy)]
pub struct Fragment {
    pub world: Vec3,
    pub normal: Vec3,
    pub uv: Vec2,
    pub color: Vec3,
    pub front: bool,
    /// Distance to the closest edge of the triangle, in pixels
    pub edge_distance: f32,
}

/// How the depth buffer is used by a pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DepthMode {
    pub test: bool,
    pub write: bool,
    /// Subtracted from the fragment depth before testing
    pub bias: f32,
}

impl DepthMode {
    pub const OPAQUE: DepthMode = DepthMode {
        test: true,
        write: true,
        bias: 0.0,
    };
    pub const DISABLED: DepthMode = DepthMode {
        test: false,
        write: false,
        bias: 0.0,
    };

    pub fn overlay(bias: f32) -> Self {
        DepthMode {
            test: true,
            write: false,
            bias,
        }
    }

    pub fn passes(&self, depth: f32, stored: f32) -> bool {
        !self.test || depth - self.bias <= stored
    }
}

/// A transformed vertex, ready to be rasterized
#[derive(Debug, Clone, Copy)]
pub struct ClipVertex {
    pub clip: Vec4,
    pub world: Vec3,
    pub normal: Vec3,
    pub uv: Vec2,
    pub color: Vec3,
}

/// A triangle projected on the screen, `y` pointing down
#[derive(Debug, Clone)]
pub struct ScreenTriangle {
    /// Pixel coordinates and device depth
    screen: [Vec3; 3],
    inv_w: [f32; 3],
    vertices: [ClipVertex; 3],
    area: f32,
    /// Distance from each vertex to the opposite edge, in pixels
    heights: [f32; 3],
    pub front: bool,
    pub rows: Range<usize>,
    columns: Range<usize>,
}

fn edge(a: Vec3, b: Vec3, c: Vec2) -> f32 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

impl ScreenTriangle {
    /// Project a triangle on a `width` x `height` viewport.
    ///
    /// Triangles crossing the near plane, degenerate ones and the ones outside the viewport are
    /// dropped.
    pub fn setup(
        vertices: [ClipVertex; 3],
        width: usize,
        height: usize,
        near: f32,
    ) -> Option<Self> {
        if vertices.iter().any(|v| v.clip.w <= near) {
            return None;
        }

        let screen = vertices.map(|v| {
            let ndc = v.clip.truncate() / v.clip.w;
            Vec3::new(
                (ndc.x * 0.5 + 0.5) * width as f32,
                (0.5 - ndc.y * 0.5) * height as f32,
                ndc.z,
            )
        });
        let area = edge(screen[0], screen[1], screen[2].truncate());
        if area.abs() < 1e-8 {
            return None;
        }

        let min = screen[0].min(screen[1]).min(screen[2]);
        let max = screen[0].max(screen[1]).max(screen[2]);
        if max.x < 0.0 || max.y < 0.0 || min.x >= width as f32 || min.y >= height as f32 {
            return None;
        }
        let rows = (min.y.max(0.0) as usize)..((max.y.ceil().max(0.0) as usize).min(height));
        let columns = (min.x.max(0.0) as usize)..((max.x.ceil().max(0.0) as usize).min(width));

        let edge_length = |a: usize, b: usize| screen[a].truncate().distance(screen[b].truncate());
        let double_area = area.abs();
        let heights = [
            double_area / edge_length(1, 2).max(1e-6),
            double_area / edge_length(2, 0).max(1e-6),
            double_area / edge_length(0, 1).max(1e-6),
        ];

        Some(Self {
            screen,
            inv_w: vertices.map(|v| 1.0 / v.clip.w),
            vertices,
            area,
            heights,
            // counter-clockwise in device space becomes clockwise once y points down
            front: area < 0.0,
            rows,
            columns,
        })
    }

    /// Rasterize the rows `rows` of the triangle into a band of the frame starting at row
    /// `rows.start`, blending the output of `shade` (color, alpha)
    pub fn rasterize<F>(
        &self,
        rows: Range<usize>,
        width: usize,
        color: &mut [Vec3],
        depth: &mut [f32],
        depth_mode: DepthMode,
        shade: F,
    ) where
        F: Fn(&Fragment) -> Option<(Vec3, f32)>,
    {
        let band_start = rows.start;
        let start = rows.start.max(self.rows.start);
        let end = rows.end.min(self.rows.end);
        let [s0, s1, s2] = self.screen;
        let [v0, v1, v2] = &self.vertices;

        for y in start..end {
            for x in self.columns.clone() {
                let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                let b = Vec3::new(edge(s1, s2, p), edge(s2, s0, p), edge(s0, s1, p)) / self.area;
                if b.min_element() < 0.0 {
                    continue;
                }

                let z = b.x * s0.z + b.y * s1.z + b.z * s2.z;
                let index = (y - band_start) * width + x;
                if !depth_mode.passes(z, depth[index]) {
                    continue;
                }

                // perspective correct weights
                let w = Vec3::new(b.x * self.inv_w[0], b.y * self.inv_w[1], b.z * self.inv_w[2]);
                let w = w / (w.x + w.y + w.z);
                let fragment = Fragment {
                    world: w.x * v0.world + w.y * v1.world + w.z * v2.world,
                    normal: (w.x * v0.normal + w.y * v1.normal + w.z * v2.normal)
                        .normalize_or_zero(),
                    uv: w.x * v0.uv + w.y * v1.uv + w.z * v2.uv,
                    color: w.x * v0.color + w.y * v1.color + w.z * v2.color,
                    front: self.front,
                    edge_distance: (b * Vec3::from_array(self.heights)).min_element(),
                };

                if let Some((c, alpha)) = shade(&fragment) {
                    color[index] = color[index].lerp(c, alpha.clamp(0.0, 1.0));
                    if depth_mode.write {
                        depth[index] = z;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::{Vec2, Vec3, Vec4};

    use super::*;

    fn vertex(x: f32, y: f32) -> ClipVertex {
        ClipVertex {
            clip: Vec4::new(x, y, 0.5, 1.0),
            world: Vec3::new(x, y, 0.0),
            normal: Vec3::Z,
            uv: Vec2::new(x, y),
            color: Vec3::ONE,
        }
    }

    #[test]
    fn counter_clockwise_is_front() {
        let ccw = [vertex(-1.0, -1.0), vertex(1.0, -1.0), vertex(0.0, 1.0)];
        let t = ScreenTriangle::setup(ccw, 8, 8, 0.1).unwrap();
        assert!(t.front);
        let cw = [vertex(-1.0, -1.0), vertex(0.0, 1.0), vertex(1.0, -1.0)];
        let t = ScreenTriangle::setup(cw, 8, 8, 0.1).unwrap();
        assert!(!t.front);
    }

    #[test]
    fn behind_near_plane_is_dropped() {
        let mut vertices = [vertex(-1.0, -1.0), vertex(1.0, -1.0), vertex(0.0, 1.0)];
        vertices[1].clip.w = 0.05;
        assert!(ScreenTriangle::setup(vertices, 8, 8, 0.1).is_none());
    }

    #[test]
    fn covers_half_the_viewport() {
        let vertices = [vertex(-1.0, -1.0), vertex(1.0, -1.0), vertex(1.0, 1.0)];
        let t = ScreenTriangle::setup(vertices, 16, 16, 0.1).unwrap();
        let mut color = vec![Vec3::ZERO; 256];
        let mut depth = vec![1.0; 256];
        t.rasterize(0..16, 16, &mut color, &mut depth, DepthMode::OPAQUE, |_| {
            Some((Vec3::ONE, 1.0))
        });
        let covered = color.iter().filter(|c| **c == Vec3::ONE).count();
        assert!((120..=136).contains(&covered), "{covered}");
        assert!(depth.iter().filter(|d| **d == 0.5).count() == covered);
    }

    #[test]
    fn depth_test_rejects_farther_fragments() {
        let vertices = [vertex(-1.0, -1.0), vertex(1.0, -1.0), vertex(1.0, 1.0)];
        let t = ScreenTriangle::setup(vertices, 4, 4, 0.1).unwrap();
        let mut color = vec![Vec3::ZERO; 16];
        let mut depth = vec![0.25; 16];
        t.rasterize(0..4, 4, &mut color, &mut depth, DepthMode::OPAQUE, |_| {
            Some((Vec3::ONE, 1.0))
        });
        assert!(color.iter().all(|c| *c == Vec3::ZERO));

        t.rasterize(0..4, 4, &mut color, &mut depth, DepthMode::DISABLED, |_| {
            Some((Vec3::ONE, 1.0))
        });
        assert!(color.iter().any(|c| *c == Vec3::ONE));
        // no depth writes
        assert!(depth.iter().all(|d| *d == 0.25));
    }

    #[test]
    fn band_offsets() {
        let vertices = [vertex(-1.0, -1.0), vertex(1.0, -1.0), vertex(1.0, 1.0)];
        let t = ScreenTriangle::setup(vertices, 4, 4, 0.1).unwrap();
        // only the last two rows, stored from index 0
        let mut color = vec![Vec3::ZERO; 8];
        let mut depth = vec![1.0; 8];
        t.rasterize(2..4, 4, &mut color, &mut depth, DepthMode::OPAQUE, |_| {
            Some((Vec3::ONE, 1.0))
        });
        // the bottom row is fully covered
        assert!(color[4..8].iter().all(|c| *c == Vec3::ONE));
    }
}
