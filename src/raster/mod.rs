//! A small software rasterizer drawing the viewer frame on the CPU.

pub mod framebuffer;
pub mod line;
pub mod texture;
pub mod triangle;

use glam::{Mat4, Vec2, Vec3};
use rayon::prelude::{
    IndexedParallelIterator, IntoParallelIterator, ParallelIterator, ParallelSliceMut,
};

use crate::{
    color::Rgb,
    geometry::TriMesh,
    math::{
        transform::normal_matrix,
        vec::{ReflectVecExt, RgbAsVec3Ext},
    },
};

pub use framebuffer::FrameBuffer;
pub use line::Line;
pub use texture::Texture;
use triangle::{ClipVertex, DepthMode, Fragment, ScreenTriangle};

/// Rows rendered by a rayon task
const BAND_HEIGHT: usize = 16;
/// Depth offset of the wire overlay over the solid surface
const WIRE_DEPTH_BIAS: f32 = 1e-4;
const SHININESS: f32 = 32.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    Phong,
    Wireframe,
    Lambert,
}

impl ViewMode {
    pub const ALL: [ViewMode; 3] = [ViewMode::Phong, ViewMode::Wireframe, ViewMode::Lambert];

    pub fn label(&self) -> &'static str {
        match self {
            ViewMode::Phong => "Phong",
            ViewMode::Wireframe => "Wireframe",
            ViewMode::Lambert => "Lambert",
        }
    }

    pub fn next(&self) -> ViewMode {
        match self {
            ViewMode::Phong => ViewMode::Wireframe,
            ViewMode::Wireframe => ViewMode::Lambert,
            ViewMode::Lambert => ViewMode::Phong,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TexturingMode {
    #[default]
    None,
    Procedural,
    Sampler,
}

impl TexturingMode {
    pub const ALL: [TexturingMode; 3] = [
        TexturingMode::None,
        TexturingMode::Procedural,
        TexturingMode::Sampler,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            TexturingMode::None => "None",
            TexturingMode::Procedural => "Procedural",
            TexturingMode::Sampler => "Sampler",
        }
    }
}

/// How the primitive is drawn
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceStyle {
    pub view_mode: ViewMode,
    pub texturing: TexturingMode,
    /// Checker frequency of the procedural texture
    pub texture_frequency: Vec2,
    pub solid: bool,
    pub wire_overlay: bool,
    pub face_culling: bool,
    pub vertex_colors: bool,
    pub primitive_color: Rgb,
    pub wire_color: Rgb,
}

impl Default for SurfaceStyle {
    fn default() -> Self {
        Self {
            view_mode: ViewMode::Phong,
            texturing: TexturingMode::None,
            texture_frequency: Vec2::splat(20.0),
            solid: true,
            wire_overlay: false,
            face_culling: false,
            vertex_colors: false,
            primitive_color: image::Rgb([1.0, 0.5, 0.25]),
            wire_color: image::Rgb([1.0, 1.0, 1.0]),
        }
    }
}

/// Everything needed to draw a frame
#[derive(Debug, Clone, Copy)]
pub struct RenderScene<'a> {
    pub mesh: Option<&'a TriMesh>,
    pub model: Mat4,
    pub view_projection: Mat4,
    pub eye: Vec3,
    pub near: f32,
    pub background: Rgb,
    pub style: SurfaceStyle,
    pub texture: &'a Texture,
    /// Depth tested and written
    pub lines: &'a [Line],
    /// Depth tested, drawn without writing depth
    pub guides: &'a [Line],
    /// Drawn on top of everything
    pub markers: &'a [Line],
}

fn clip_vertices(scene: &RenderScene, mesh: &TriMesh) -> Vec<ClipVertex> {
    let mvp = scene.view_projection * scene.model;
    let normal_transform = normal_matrix(&scene.model);
    let base = scene.style.primitive_color.vec();
    let use_colors = scene.style.vertex_colors && mesh.has_colors();

    (0..mesh.num_vertices())
        .into_par_iter()
        .map(|i| {
            let p = mesh.positions[i];
            ClipVertex {
                clip: mvp * p.extend(1.0),
                world: scene.model.transform_point3(p),
                normal: mesh
                    .normals
                    .get(i)
                    .map(|n| (normal_transform * *n).normalize_or_zero())
                    .unwrap_or(Vec3::ZERO),
                uv: mesh.tex_coords.get(i).copied().unwrap_or(Vec2::ZERO),
                color: if use_colors { mesh.colors[i] } else { base },
            }
        })
        .collect()
}

fn surface_color(scene: &RenderScene, fragment: &Fragment) -> Vec3 {
    let style = &scene.style;
    let albedo = match style.texturing {
        TexturingMode::None => fragment.color,
        TexturingMode::Procedural => {
            let cell = (fragment.uv * style.texture_frequency).floor();
            let checker = (cell.x + cell.y).rem_euclid(2.0);
            fragment.color * (0.35 + 0.65 * checker)
        }
        TexturingMode::Sampler => fragment.color * scene.texture.sample(fragment.uv),
    };

    // two sided lighting from a light at the eye
    let to_eye = (scene.eye - fragment.world).normalize_or_zero();
    let normal = if fragment.front {
        fragment.normal
    } else {
        -fragment.normal
    };
    let diffuse = normal.dot(to_eye).max(0.0);

    match style.view_mode {
        ViewMode::Lambert => albedo * (0.2 + 0.8 * diffuse),
        _ => {
            let reflected = (-to_eye).reflect(normal);
            let specular = reflected.dot(to_eye).max(0.0).powf(SHININESS);
            albedo * (0.1 + 0.9 * diffuse) + Vec3::splat(0.5 * specular)
        }
    }
}

/// Opacity of a wire pixel, one pixel wide lines with a smooth falloff
fn wire_alpha(edge_distance: f32) -> f32 {
    1.0 - (edge_distance - 0.5).clamp(0.0, 1.0)
}

/// Draw the triangles of one horizontal band of the frame
fn draw_band(
    scene: &RenderScene,
    triangles: &[ScreenTriangle],
    rows: std::ops::Range<usize>,
    width: usize,
    color: &mut [Vec3],
    depth: &mut [f32],
) {
    let style = &scene.style;
    let visible = triangles
        .iter()
        .filter(|t| t.rows.start < rows.end && rows.start < t.rows.end);
    let wire = |base: Vec3, brightness: f32| {
        let wire_color = base * brightness;
        move |f: &Fragment| {
            let alpha = wire_alpha(f.edge_distance);
            (alpha > 0.0).then_some((wire_color, alpha))
        }
    };

    match style.view_mode {
        ViewMode::Wireframe if style.solid => {
            let white = Vec3::ONE;
            // back faces first, dimmed, then front faces
            for t in visible.clone().filter(|t| !t.front) {
                let wire = wire(white, 0.5);
                t.rasterize(rows.clone(), width, color, depth, DepthMode::DISABLED, wire);
            }
            for t in visible.filter(|t| t.front) {
                let wire = wire(white, 1.0);
                t.rasterize(rows.clone(), width, color, depth, DepthMode::DISABLED, wire);
            }
        }
        ViewMode::Wireframe => {}
        ViewMode::Phong | ViewMode::Lambert => {
            let drawn = visible.filter(|t| t.front || !style.face_culling);
            if style.solid {
                for t in drawn.clone() {
                    t.rasterize(rows.clone(), width, color, depth, DepthMode::OPAQUE, |f| {
                        Some((surface_color(scene, f), 1.0))
                    });
                }
            }
            if style.wire_overlay {
                for t in drawn {
                    t.rasterize(
                        rows.clone(),
                        width,
                        color,
                        depth,
                        DepthMode::overlay(WIRE_DEPTH_BIAS),
                        wire(style.wire_color.vec(), 1.0),
                    );
                }
            }
        }
    }
}

/// Draw the scene into `frame`
pub fn render(frame: &mut FrameBuffer, scene: &RenderScene) {
    frame.clear(scene.background);
    let (width, height) = (frame.width, frame.height);
    if width == 0 || height == 0 {
        return;
    }

    if let Some(mesh) = scene.mesh {
        let vertices = clip_vertices(scene, mesh);
        let triangles: Vec<ScreenTriangle> = (0..mesh.num_triangles())
            .into_par_iter()
            .filter_map(|t| {
                let [a, b, c] = mesh.triangle_indices(t).map(|i| vertices[i]);
                ScreenTriangle::setup([a, b, c], width, height, scene.near)
            })
            .collect();

        let band = BAND_HEIGHT * width;
        frame
            .color
            .par_chunks_mut(band)
            .zip(frame.depth.par_chunks_mut(band))
            .enumerate()
            .for_each(|(i, (color, depth))| {
                let start = i * BAND_HEIGHT;
                let rows = start..(start + BAND_HEIGHT).min(height);
                draw_band(scene, &triangles, rows, width, color, depth);
            });
    }

    for line in scene.lines {
        line::draw_line(frame, &scene.view_projection, scene.near, line, DepthMode::OPAQUE);
    }
    for line in scene.guides {
        line::draw_line(
            frame,
            &scene.view_projection,
            scene.near,
            line,
            DepthMode::overlay(0.0),
        );
    }
    for line in scene.markers {
        line::draw_line(frame, &scene.view_projection, scene.near, line, DepthMode::DISABLED);
    }
}

#[cfg(test)]
mod tests {
    use glam::{Mat4, Vec3};

    use super::*;
    use crate::{
        camera::PerspectiveCamera,
        color,
        geometry::{build, Primitive, PrimitiveParams, Quality},
    };

    fn camera() -> PerspectiveCamera {
        let mut camera = PerspectiveCamera::default();
        camera.look_at(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO);
        camera
    }

    fn draw(mesh: &TriMesh, style: SurfaceStyle, lines: &[Line]) -> FrameBuffer {
        let camera = camera();
        let texture = Texture::stripes();
        let scene = RenderScene {
            mesh: Some(mesh),
            model: Mat4::IDENTITY,
            view_projection: camera.view_projection(),
            eye: camera.eye,
            near: camera.near,
            background: color::BLACK,
            style,
            texture: &texture,
            lines,
            guides: &[],
            markers: &[],
        };
        let mut frame = FrameBuffer::new(64, 64);
        render(&mut frame, &scene);
        frame
    }

    fn sphere() -> TriMesh {
        build(Primitive::Sphere, Quality::Default, &PrimitiveParams::default(), false).unwrap()
    }

    #[test]
    fn sphere_is_lit_in_the_center() {
        let frame = draw(&sphere(), SurfaceStyle::default(), &[]);
        let center = frame.pixel(32, 32);
        assert!(center.0[0] > 0.5);
        // corners keep the background
        assert_eq!(frame.pixel(0, 0), color::BLACK);
        assert!(frame.depth[32 * 64 + 32] < 1.0);
    }

    #[test]
    fn lambert_is_darker_than_phong_highlight() {
        let phong = draw(&sphere(), SurfaceStyle::default(), &[]);
        let lambert = draw(
            &sphere(),
            SurfaceStyle {
                view_mode: ViewMode::Lambert,
                ..Default::default()
            },
            &[],
        );
        assert!(lambert.pixel(32, 32).0[2] < phong.pixel(32, 32).0[2]);
    }

    #[test]
    fn wireframe_leaves_faces_transparent() {
        let frame = draw(
            &sphere(),
            SurfaceStyle {
                view_mode: ViewMode::Wireframe,
                ..Default::default()
            },
            &[],
        );
        let lit = frame.color.iter().filter(|c| c.length() > 0.0).count();
        assert!(lit > 0);
        assert!(frame.depth.iter().all(|d| *d == 1.0));
    }

    #[test]
    fn wireframe_ignores_the_overlay_wire_color() {
        let frame = draw(
            &sphere(),
            SurfaceStyle {
                view_mode: ViewMode::Wireframe,
                wire_color: color::BLACK,
                ..Default::default()
            },
            &[],
        );
        let brightest = frame.color.iter().map(|c| c.min_element()).fold(0.0, f32::max);
        assert!(brightest > 0.9);
        // back faces are drawn dimmed
        assert!(frame.color.iter().any(|c| c.x > 0.2 && c.x < 0.8));
    }

    #[test]
    fn culling_hides_inside_of_open_shapes() {
        let plane = build(Primitive::Rect, Quality::Default, &PrimitiveParams::default(), false)
            .unwrap();
        let mut flipped = plane.clone();
        for t in flipped.indices.chunks_exact_mut(3) {
            t.swap(1, 2);
        }
        let culled = SurfaceStyle {
            face_culling: true,
            ..Default::default()
        };
        assert_ne!(draw(&plane, culled, &[]).pixel(32, 32), color::BLACK);
        assert_eq!(draw(&flipped, culled, &[]).pixel(32, 32), color::BLACK);
        // not culled, lit from the back side
        assert_ne!(draw(&flipped, SurfaceStyle::default(), &[]).pixel(32, 32), color::BLACK);
    }

    #[test]
    fn lines_are_depth_tested() {
        let hidden = Line::new(Vec3::new(-1.0, 0.0, -2.0), Vec3::new(1.0, 0.0, -2.0), Vec3::Y);
        let frame = draw(&sphere(), SurfaceStyle::default(), &[hidden]);
        assert_ne!(frame.pixel(32, 32), image::Rgb([0.0, 1.0, 0.0]));

        let visible = Line::new(Vec3::new(-1.0, 0.0, 2.0), Vec3::new(1.0, 0.0, 2.0), Vec3::Y);
        let frame = draw(&sphere(), SurfaceStyle::default(), &[visible]);
        assert!(frame.color.iter().any(|c| *c == Vec3::Y));
    }
}
