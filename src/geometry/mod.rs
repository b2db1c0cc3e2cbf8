//! Parametric primitives and the triangle mesh they produce.

pub mod flat;
pub mod mesh;
pub mod platonic;
pub mod solids;
pub mod surface;
pub mod teapot;
pub mod tubes;

use glam::Vec3;

pub use mesh::{MeshBuilder, Segment, TriMesh, Vertex};

/// The displayable objects, in cycling order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    Capsule,
    Cone,
    Cube,
    Cylinder,
    Helix,
    Icosahedron,
    Icosphere,
    Sphere,
    Teapot,
    Torus,
    TorusKnot,
    Plane,
    Rect,
    RoundedRect,
    Circle,
    Ring,
    ImportedMesh,
}

impl Primitive {
    pub const ALL: [Primitive; 17] = [
        Primitive::Capsule,
        Primitive::Cone,
        Primitive::Cube,
        Primitive::Cylinder,
        Primitive::Helix,
        Primitive::Icosahedron,
        Primitive::Icosphere,
        Primitive::Sphere,
        Primitive::Teapot,
        Primitive::Torus,
        Primitive::TorusKnot,
        Primitive::Plane,
        Primitive::Rect,
        Primitive::RoundedRect,
        Primitive::Circle,
        Primitive::Ring,
        Primitive::ImportedMesh,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Primitive::Capsule => "Capsule",
            Primitive::Cone => "Cone",
            Primitive::Cube => "Cube",
            Primitive::Cylinder => "Cylinder",
            Primitive::Helix => "Helix",
            Primitive::Icosahedron => "Icosahedron",
            Primitive::Icosphere => "Icosphere",
            Primitive::Sphere => "Sphere",
            Primitive::Teapot => "Teapot",
            Primitive::Torus => "Torus",
            Primitive::TorusKnot => "Torus Knot",
            Primitive::Plane => "Plane",
            Primitive::Rect => "Rectangle",
            Primitive::RoundedRect => "Rounded Rectangle",
            Primitive::Circle => "Circle",
            Primitive::Ring => "Ring",
            Primitive::ImportedMesh => "Imported Mesh",
        }
    }

    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn next(&self) -> Primitive {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Quality {
    Low,
    #[default]
    Default,
    High,
}

impl Quality {
    pub const ALL: [Quality; 3] = [Quality::Low, Quality::Default, Quality::High];

    pub fn label(&self) -> &'static str {
        match self {
            Quality::Low => "Low",
            Quality::Default => "Default",
            Quality::High => "High",
        }
    }

    pub fn next(&self) -> Quality {
        match self {
            Quality::Low => Quality::Default,
            Quality::Default => Quality::High,
            Quality::High => Quality::Low,
        }
    }

    /// Pick the value matching this quality
    fn pick<T>(&self, low: T, default: T, high: T) -> T {
        match self {
            Quality::Low => low,
            Quality::Default => default,
            Quality::High => high,
        }
    }
}

/// User editable shape parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrimitiveParams {
    pub capsule_radius: f32,
    pub capsule_length: f32,
    pub cone_ratio: f32,
    pub helix_ratio: f32,
    pub helix_twist: u32,
    pub helix_offset: f32,
    pub helix_coils: f32,
    pub ring_width: f32,
    pub rounded_rect_radius: f32,
    pub torus_twist: u32,
    pub torus_offset: f32,
    pub torus_ratio: f32,
    pub torus_knot_p: u32,
    pub torus_knot_q: u32,
    pub torus_knot_radius: f32,
    pub torus_knot_scale: Vec3,
}

impl Default for PrimitiveParams {
    fn default() -> Self {
        Self {
            capsule_radius: 0.5,
            capsule_length: 1.0,
            cone_ratio: 0.5,
            helix_ratio: 0.25,
            helix_twist: 0,
            helix_offset: 0.0,
            helix_coils: 3.0,
            ring_width: 0.25,
            rounded_rect_radius: 0.2,
            torus_twist: 0,
            torus_offset: 0.0,
            torus_ratio: 0.25,
            torus_knot_p: 2,
            torus_knot_q: 5,
            torus_knot_radius: 0.15,
            torus_knot_scale: Vec3::new(1.0, 0.2, 1.0),
        }
    }
}

/// Build the mesh of `primitive` at the given quality.
///
/// [Primitive::ImportedMesh] is not generated here and yields `None`.
pub fn build(
    primitive: Primitive,
    quality: Quality,
    params: &PrimitiveParams,
    with_colors: bool,
) -> Option<TriMesh> {
    let q = quality;
    let mesh = match primitive {
        Primitive::Capsule => {
            let (axis, height) = q.pick((6, 1), (24, 6), (60, 20));
            solids::capsule(
                params.capsule_radius,
                params.capsule_length,
                axis,
                height,
                with_colors,
            )
        }
        Primitive::Cone => {
            let (axis, height) = q.pick((6, 1), (18, 1), (60, 60));
            solids::cone(1.0, params.cone_ratio, axis, height, 1, with_colors)
        }
        Primitive::Cube => solids::cube(q.pick(1, 2, 10), with_colors),
        Primitive::Cylinder => {
            let (axis, height, caps) = q.pick((6, 1, 1), (18, 1, 1), (60, 20, 10));
            solids::cylinder(axis, height, caps, with_colors)
        }
        Primitive::Helix => {
            let (axis, height) = q.pick((12, 6), (24, 12), (60, 60));
            tubes::helix(
                params.helix_ratio,
                params.helix_coils,
                params.helix_twist,
                params.helix_offset,
                axis,
                height,
                with_colors,
            )
        }
        Primitive::Icosahedron => platonic::icosahedron(with_colors),
        Primitive::Icosphere => platonic::icosphere(q.pick(1, 3, 5), with_colors),
        Primitive::Sphere => solids::sphere(q.pick(6, 18, 60), with_colors),
        Primitive::Teapot => teapot::teapot(q.pick(2, 4, 12), with_colors),
        Primitive::Torus => {
            let (axis, height) = q.pick((12, 6), (24, 12), (60, 60));
            tubes::torus(
                params.torus_ratio,
                params.torus_twist,
                params.torus_offset,
                axis,
                height,
                with_colors,
            )
        }
        Primitive::TorusKnot => {
            let (axis, height) = q.pick((6, 64), (16, 256), (32, 1024));
            tubes::torus_knot(
                params.torus_knot_p,
                params.torus_knot_q,
                params.torus_knot_radius,
                params.torus_knot_scale,
                axis,
                height,
                with_colors,
            )
        }
        Primitive::Plane => {
            let n = q.pick(2, 10, 100);
            flat::plane((n, n), with_colors)
        }
        Primitive::Rect => flat::rect(with_colors),
        Primitive::RoundedRect => {
            flat::rounded_rect(params.rounded_rect_radius, q.pick(1, 3, 9), with_colors)
        }
        Primitive::Circle => flat::circle(q.pick(8, 24, 120), with_colors),
        Primitive::Ring => flat::ring(params.ring_width, q.pick(8, 24, 120), with_colors),
        Primitive::ImportedMesh => return None,
    };
    Some(mesh)
}
