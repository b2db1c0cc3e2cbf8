use glam::{Mat3, Mat4, Vec2, Vec3};
use itertools::Itertools;

use crate::math::{bounds::Bounds, transform::normal_matrix, vec::any_orthonormal};

/// An indexed triangle mesh.
///
/// All per-vertex attributes have either the same length as `positions` or are empty.
/// `colors` is empty when the mesh has no color attribute.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TriMesh {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub tex_coords: Vec<Vec2>,
    pub tangents: Vec<Vec3>,
    pub colors: Vec<Vec3>,
    pub indices: Vec<u32>,
}

/// A line segment, used for normals/tangents display
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub a: Vec3,
    pub b: Vec3,
}

impl TriMesh {
    pub fn num_vertices(&self) -> usize {
        self.positions.len()
    }

    pub fn num_triangles(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.num_triangles() == 0
    }

    pub fn has_normals(&self) -> bool {
        !self.positions.is_empty() && self.normals.len() == self.positions.len()
    }

    pub fn has_tex_coords(&self) -> bool {
        !self.positions.is_empty() && self.tex_coords.len() == self.positions.len()
    }

    pub fn has_tangents(&self) -> bool {
        !self.positions.is_empty() && self.tangents.len() == self.positions.len()
    }

    pub fn has_colors(&self) -> bool {
        !self.positions.is_empty() && self.colors.len() == self.positions.len()
    }

    pub fn triangle_indices(&self, i: usize) -> [usize; 3] {
        let t = &self.indices[3 * i..3 * i + 3];
        [t[0] as usize, t[1] as usize, t[2] as usize]
    }

    pub fn triangle_vertices(&self, i: usize) -> [Vec3; 3] {
        self.triangle_indices(i).map(|v| self.positions[v])
    }

    pub fn bounds(&self) -> Option<Bounds> {
        Bounds::from_points(self.positions.iter().copied())
    }

    /// Exact bounds of the mesh once transformed, every vertex is visited
    pub fn bounds_transformed(&self, transform: &Mat4) -> Option<Bounds> {
        Bounds::from_points(self.positions.iter().map(|p| transform.transform_point3(*p)))
    }

    /// One segment per vertex, along its normal
    pub fn vertex_normal_lines(&self, length: f32) -> Vec<Segment> {
        self.positions
            .iter()
            .zip(&self.normals)
            .map(|(&p, &n)| Segment { a: p, b: p + length * n })
            .collect()
    }

    /// One segment per vertex, along its tangent. Empty if the mesh has no tangents.
    pub fn tangent_lines(&self, length: f32) -> Vec<Segment> {
        self.positions
            .iter()
            .zip(&self.tangents)
            .map(|(&p, &t)| Segment { a: p, b: p + length * t })
            .collect()
    }

    /// Unique undirected edges, by vertex indices
    pub fn edges(&self) -> Vec<(u32, u32)> {
        self.indices
            .chunks_exact(3)
            .flat_map(|t| [(t[0], t[1]), (t[1], t[2]), (t[2], t[0])])
            .map(|(a, b)| (a.min(b), a.max(b)))
            .unique()
            .collect()
    }

    /// Area weighted vertex normals from the faces
    pub fn compute_smooth_normals(&mut self) {
        let mut normals = vec![Vec3::ZERO; self.positions.len()];
        for t in 0..self.num_triangles() {
            let [a, b, c] = self.triangle_indices(t);
            let face = (self.positions[b] - self.positions[a])
                .cross(self.positions[c] - self.positions[a]);
            normals[a] += face;
            normals[b] += face;
            normals[c] += face;
        }
        self.normals = normals.into_iter().map(Vec3::normalize_or_zero).collect();
    }

    /// Tangents following the `u` texture direction, orthogonalized against the normals.
    ///
    /// Tangents are cleared when there are no texture coordinates.
    pub fn compute_tangents(&mut self) {
        if !self.has_tex_coords() || !self.has_normals() {
            self.tangents.clear();
            return;
        }

        let mut tangents = vec![Vec3::ZERO; self.positions.len()];
        for t in 0..self.num_triangles() {
            let [a, b, c] = self.triangle_indices(t);
            let e1 = self.positions[b] - self.positions[a];
            let e2 = self.positions[c] - self.positions[a];
            let duv1 = self.tex_coords[b] - self.tex_coords[a];
            let duv2 = self.tex_coords[c] - self.tex_coords[a];
            let r = duv1.x * duv2.y - duv2.x * duv1.y;
            if r.abs() < 1e-12 {
                continue;
            }
            let tangent = (e1 * duv2.y - e2 * duv1.y) / r;
            tangents[a] += tangent;
            tangents[b] += tangent;
            tangents[c] += tangent;
        }

        self.tangents = tangents
            .into_iter()
            .zip(&self.normals)
            .map(|(t, &n)| {
                let t = (t - n * n.dot(t)).normalize_or_zero();
                if t == Vec3::ZERO {
                    any_orthonormal(n)
                } else {
                    t
                }
            })
            .collect();
    }

    /// Apply a transformation to positions, normals and tangents
    pub fn transform(&mut self, transform: &Mat4) {
        let normal_transform: Mat3 = normal_matrix(transform);
        let tangent_transform = Mat3::from_mat4(*transform);
        for p in self.positions.iter_mut() {
            *p = transform.transform_point3(*p);
        }
        for n in self.normals.iter_mut() {
            *n = (normal_transform * *n).normalize_or_zero();
        }
        for t in self.tangents.iter_mut() {
            *t = (tangent_transform * *t).normalize_or_zero();
        }
    }
}

/// A vertex as emitted by the primitive generators
#[derive(Debug, Clone, Copy)]
pub struct Vertex {
    pub position: Vec3,
    pub normal: Vec3,
    pub uv: Vec2,
    pub color: Vec3,
}

impl Vertex {
    /// A vertex colored after its normal
    pub fn new(position: Vec3, normal: Vec3, uv: Vec2) -> Self {
        Self {
            position,
            normal,
            uv,
            color: normal * 0.5 + 0.5,
        }
    }

    pub fn with_color(self, color: Vec3) -> Self {
        Self { color, ..self }
    }
}

/// Incrementally builds a [TriMesh].
///
/// Triangles are wound counter-clockwise when seen from the side the vertex normals point to.
#[derive(Debug, Default)]
pub struct MeshBuilder {
    mesh: TriMesh,
    with_colors: bool,
}

impl MeshBuilder {
    pub fn new(with_colors: bool) -> Self {
        Self {
            mesh: TriMesh::default(),
            with_colors,
        }
    }

    pub fn vertex(&mut self, vertex: Vertex) -> u32 {
        let index = self.mesh.positions.len() as u32;
        self.mesh.positions.push(vertex.position);
        self.mesh.normals.push(vertex.normal);
        self.mesh.tex_coords.push(vertex.uv);
        if self.with_colors {
            self.mesh.colors.push(vertex.color);
        }
        index
    }

    pub fn triangle(&mut self, a: u32, b: u32, c: u32) {
        let p = &self.mesh.positions;
        let n = &self.mesh.normals;
        let face = (p[b as usize] - p[a as usize]).cross(p[c as usize] - p[a as usize]);
        let normal = n[a as usize] + n[b as usize] + n[c as usize];
        if face.dot(normal) < 0.0 {
            self.mesh.indices.extend([a, c, b]);
        } else {
            self.mesh.indices.extend([a, b, c]);
        }
    }

    pub fn quad(&mut self, a: u32, b: u32, c: u32, d: u32) {
        self.triangle(a, b, c);
        self.triangle(a, c, d);
    }

    /// A `rows` x `cols` grid of quads, `vertex(i, j)` is called for `i` in `0..=rows` and `j` in
    /// `0..=cols`
    pub fn grid<F: FnMut(usize, usize) -> Vertex>(
        &mut self,
        rows: usize,
        cols: usize,
        mut vertex: F,
    ) {
        let base = self.mesh.positions.len() as u32;
        for i in 0..=rows {
            for j in 0..=cols {
                self.vertex(vertex(i, j));
            }
        }
        let index = |i: usize, j: usize| base + (i * (cols + 1) + j) as u32;
        for i in 0..rows {
            for j in 0..cols {
                self.quad(index(i, j), index(i + 1, j), index(i + 1, j + 1), index(i, j + 1));
            }
        }
    }

    /// A fan around `center`, `rim` is expected to be closed (last point connects to the first)
    pub fn fan(&mut self, center: Vertex, rim: &[Vertex]) {
        let c = self.vertex(center);
        let first = self.mesh.positions.len() as u32;
        for v in rim {
            self.vertex(*v);
        }
        let n = rim.len() as u32;
        for k in 0..n {
            self.triangle(c, first + k, first + (k + 1) % n);
        }
    }

    pub fn build(mut self) -> TriMesh {
        self.mesh.compute_tangents();
        self.mesh
    }
}

#[cfg(test)]
mod tests {
    use glam::{Vec2, Vec3};

    use super::*;

    fn quad_mesh() -> TriMesh {
        let mut builder = MeshBuilder::new(false);
        builder.grid(1, 1, |i, j| {
            let uv = Vec2::new(j as f32, i as f32);
            Vertex::new(Vec3::new(uv.x, uv.y, 0.0), Vec3::Z, uv)
        });
        builder.build()
    }

    #[test]
    fn grid_winding_follows_normals() {
        let mesh = quad_mesh();
        assert_eq!(mesh.num_triangles(), 2);
        for t in 0..mesh.num_triangles() {
            let [a, b, c] = mesh.triangle_vertices(t);
            assert!((b - a).cross(c - a).z > 0.0);
        }
    }

    #[test]
    fn flipped_normals_flip_winding() {
        let mut builder = MeshBuilder::new(false);
        let a = builder.vertex(Vertex::new(Vec3::ZERO, Vec3::NEG_Z, Vec2::ZERO));
        let b = builder.vertex(Vertex::new(Vec3::X, Vec3::NEG_Z, Vec2::X));
        let c = builder.vertex(Vertex::new(Vec3::Y, Vec3::NEG_Z, Vec2::Y));
        builder.triangle(a, b, c);
        let mesh = builder.build();
        let [a, b, c] = mesh.triangle_vertices(0);
        assert!((b - a).cross(c - a).z < 0.0);
    }

    #[test]
    fn tangents_follow_u() {
        let mesh = quad_mesh();
        assert!(mesh.has_tangents());
        for t in &mesh.tangents {
            assert!(t.abs_diff_eq(Vec3::X, 1e-5));
        }
    }

    #[test]
    fn edges_are_unique() {
        // 4 border edges + the diagonal
        assert_eq!(quad_mesh().edges().len(), 5);
    }

    #[test]
    fn smooth_normals() {
        let mut mesh = quad_mesh();
        mesh.normals.clear();
        mesh.compute_smooth_normals();
        for n in &mesh.normals {
            assert!(n.abs_diff_eq(Vec3::Z, 1e-6));
        }
    }

    #[test]
    fn colors_only_when_requested() {
        assert!(!quad_mesh().has_colors());

        let mut builder = MeshBuilder::new(true);
        builder.vertex(Vertex::new(Vec3::ZERO, Vec3::Y, Vec2::ZERO));
        let mesh = builder.build();
        assert!(mesh.has_colors());
        assert!(mesh.colors[0].abs_diff_eq(Vec3::new(0.5, 1.0, 0.5), 1e-6));
    }

    #[test]
    fn normal_lines_have_length() {
        let lines = quad_mesh().vertex_normal_lines(0.5);
        assert_eq!(lines.len(), 4);
        assert!(lines
            .iter()
            .all(|s| ((s.b - s.a).length() - 0.5).abs() < 1e-6));
    }
}
