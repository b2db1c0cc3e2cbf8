//! Application state of the geometry viewer, independent from the windowing toolkit.
//!
//! The GUI feeds input events and the elapsed time to a [ViewerState], then asks it for a
//! [RenderScene] to draw.

pub mod overlay;
pub mod settings;

use std::path::Path;

use glam::{Mat4, Vec2, Vec3};

use crate::{
    camera::{MouseButton, OrbitController, PerspectiveCamera},
    geometry::{self, Primitive, PrimitiveParams, Quality, Segment, TriMesh},
    loader::{self, LoadError},
    math::{bounds::Bounds, transform::ModelTransform, vec::lerp},
    picking::{self, PickBounds, PickResult},
    raster::{self, FrameBuffer, Line, RenderScene, SurfaceStyle, Texture},
    utils::timer::timed_scope_log,
};
use overlay::FrameOverlay;
pub use settings::{DisplayOptions, ViewerSettings};

/// Two presses closer than this, in seconds, select the next primitive
const DOUBLE_CLICK_DELAY: f64 = 0.2;
/// Distance the camera settles at after a rebuild
const RECENTER_DISTANCE: f32 = 5.0;
const RECENTER_SPEED: f32 = 0.25;
const PROBE_MARKER_SIZE: f32 = 0.2;

/// Keyboard shortcuts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerKey {
    /// Next primitive
    Space,
    /// Toggle vertex colors
    C,
    /// Toggle normals
    N,
    /// Toggle the grid
    G,
    /// Next quality
    Q,
    /// Next view mode
    V,
    /// Toggle the wire overlay
    W,
    /// Rebuild the primitive
    Return,
}

/// Camera and matrices shown in the options window
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DebugReadout {
    pub eye: Vec3,
    pub up: Vec3,
    pub right: Vec3,
    pub fov: f32,
    pub model: Mat4,
    pub projection: Mat4,
    pub view: Mat4,
    pub mouse: Vec2,
}

/// One line per row
pub fn format_matrix(m: &Mat4) -> String {
    (0..4)
        .map(|i| {
            let r = m.row(i);
            format!("{:>8.3} {:>8.3} {:>8.3} {:>8.3}", r.x, r.y, r.z, r.w)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub struct ViewerState {
    pub settings: ViewerSettings,
    pub options: DisplayOptions,
    /// Editing them requires a call to [ViewerState::rebuild_geometry]
    pub params: PrimitiveParams,
    pub primitive_selected: Primitive,
    primitive_current: Primitive,
    pub quality_selected: Quality,
    quality_current: Quality,

    pub camera: PerspectiveCamera,
    orbit: OrbitController,
    pressed_button: Option<MouseButton>,
    camera_target: Vec3,
    lerp_target: Vec3,
    lerp_view_direction: Vec3,
    recenter: bool,

    elapsed: f64,
    animation_time: f64,
    model: Mat4,

    mesh: Option<TriMesh>,
    imported: Option<TriMesh>,
    normal_lines: Vec<Segment>,
    tangent_lines: Vec<Segment>,
    title: String,
    texture: Texture,

    mouse_pos: Vec2,
    window_size: Vec2,
    last_mouse_down: Option<f64>,
    pick: Option<PickResult>,
    pick_bounds: Option<PickBounds>,
    /// Point in normalized device coordinates
    pub probe: Vec3,
    probe_marker: Option<Vec3>,
}

impl ViewerState {
    pub fn new(settings: ViewerSettings) -> Self {
        let window_size = settings.window_size;
        let mut camera = PerspectiveCamera::default();
        if window_size.y > 0.0 {
            camera.aspect_ratio = window_size.x / window_size.y;
        }
        camera.look_at(Vec3::new(3.0, 3.0, 6.0).normalize() * 5.0, Vec3::ZERO);

        let mut state = Self {
            options: DisplayOptions::new(&settings),
            params: PrimitiveParams::default(),
            primitive_selected: settings.primitive,
            primitive_current: settings.primitive,
            quality_selected: settings.quality,
            quality_current: settings.quality,
            camera,
            orbit: OrbitController::default(),
            pressed_button: None,
            camera_target: Vec3::ZERO,
            lerp_target: Vec3::ZERO,
            lerp_view_direction: camera.view_direction(),
            recenter: false,
            elapsed: 0.0,
            animation_time: 0.0,
            model: Mat4::IDENTITY,
            mesh: None,
            imported: None,
            normal_lines: Vec::new(),
            tangent_lines: Vec::new(),
            title: String::new(),
            texture: Texture::stripes(),
            mouse_pos: Vec2::ZERO,
            window_size,
            last_mouse_down: None,
            pick: None,
            pick_bounds: None,
            probe: Vec3::ZERO,
            probe_marker: None,
            settings,
        };

        if let Some(path) = state.settings.texture.clone() {
            state.load_texture(&path);
        }
        if let Some(path) = state.settings.mesh.clone() {
            if let Err(err) = state.import(&path) {
                log::error!("Could not import {}: {err}", path.display());
            }
        }
        state.rebuild_geometry();
        state
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn mesh(&self) -> Option<&TriMesh> {
        self.mesh.as_ref()
    }

    pub fn primitive_current(&self) -> Primitive {
        self.primitive_current
    }

    pub fn quality_current(&self) -> Quality {
        self.quality_current
    }

    pub fn model(&self) -> Mat4 {
        self.model
    }

    pub fn pick(&self) -> Option<PickResult> {
        self.pick
    }

    pub fn probe_marker(&self) -> Option<Vec3> {
        self.probe_marker
    }

    pub fn window_size(&self) -> Vec2 {
        self.window_size
    }

    pub fn has_imported_mesh(&self) -> bool {
        self.imported.is_some()
    }

    /// Advance to `elapsed` seconds since start up
    pub fn update(&mut self, elapsed: f64) {
        let delta = (elapsed - self.elapsed).max(0.0);
        self.elapsed = elapsed;
        if self.options.animate {
            self.animation_time += delta;
        }
        self.model = ModelTransform::at(self.animation_time as f32).matrix();

        if self.primitive_selected != self.primitive_current
            || self.quality_selected != self.quality_current
        {
            self.rebuild_geometry();
        }

        if self.recenter {
            let distance = self.camera.eye.distance(self.lerp_target);
            let eye = self.lerp_target
                - lerp(distance, RECENTER_DISTANCE, RECENTER_SPEED) * self.lerp_view_direction;
            self.camera_target = self.camera_target.lerp(self.lerp_target, RECENTER_SPEED);
            self.camera.look_at(eye, self.camera_target);
        }

        self.perform_picking();
    }

    /// Build the selected primitive at the selected quality
    pub fn rebuild_geometry(&mut self) {
        self.primitive_current = self.primitive_selected;
        self.quality_current = self.quality_selected;
        let primitive = self.primitive_current;

        let mesh = match primitive {
            Primitive::ImportedMesh => {
                if self.imported.is_none() {
                    crate::warn_once!("No mesh imported, open one first");
                }
                self.imported.clone()
            }
            _ => {
                let (quality, params, colors) =
                    (self.quality_current, &self.params, self.options.show_colors);
                timed_scope_log(&format!("Build {}", primitive.label()), || {
                    geometry::build(primitive, quality, params, colors)
                })
                .res
            }
        };

        self.set_mesh(mesh);
    }

    fn set_mesh(&mut self, mesh: Option<TriMesh>) {
        self.pick = None;
        self.pick_bounds = None;
        self.normal_lines.clear();
        self.tangent_lines.clear();

        let (vertices, lines) = mesh
            .as_ref()
            .map(|m| (m.num_vertices(), m.edges().len()))
            .unwrap_or_default();
        self.title = format!("Geometry - {vertices} vertices - {lines} lines");
        log::info!("{}", self.title);

        if let Some(bounds) = mesh.as_ref().and_then(TriMesh::bounds) {
            self.camera_target = self.camera.pivot_point();
            self.lerp_target = bounds.center();
            self.lerp_view_direction = self.camera.view_direction();
            self.recenter = true;

            let scale = bounds.size().max_element() / 25.0;
            if let Some(mesh) = &mesh {
                self.normal_lines = mesh.vertex_normal_lines(scale);
                if mesh.has_tangents() {
                    self.tangent_lines = mesh.tangent_lines(scale);
                }
            }
        }
        self.mesh = mesh;
    }

    pub fn mouse_down(&mut self, pos: Vec2, button: MouseButton, time: f64) {
        self.recenter = false;
        self.mouse_pos = pos;
        self.pressed_button = Some(button);
        self.orbit.mouse_down(&self.camera, pos);

        if matches!(self.last_mouse_down, Some(last) if time - last < DOUBLE_CLICK_DELAY) {
            self.primitive_selected = self.primitive_selected.next();
        }
        self.last_mouse_down = Some(time);
    }

    pub fn mouse_up(&mut self) {
        self.pressed_button = None;
    }

    pub fn mouse_move(&mut self, pos: Vec2) {
        self.mouse_pos = pos;
    }

    /// Move the camera with the button pressed in [ViewerState::mouse_down]
    pub fn mouse_drag(&mut self, pos: Vec2) {
        self.mouse_move(pos);
        if let Some(button) = self.pressed_button {
            self.orbit
                .mouse_drag(&mut self.camera, pos, button, self.window_size);
        }
    }

    pub fn mouse_wheel(&mut self, increment: f32) {
        self.recenter = false;
        self.orbit.mouse_wheel(&mut self.camera, increment);
    }

    pub fn resize(&mut self, size: Vec2) {
        self.window_size = size;
        if size.y > 0.0 {
            self.camera.aspect_ratio = size.x / size.y;
        }
    }

    pub fn key_down(&mut self, key: ViewerKey) {
        match key {
            ViewerKey::Space => self.primitive_selected = self.primitive_selected.next(),
            ViewerKey::C => {
                self.options.show_colors = !self.options.show_colors;
                self.rebuild_geometry();
            }
            ViewerKey::N => self.options.show_normals = !self.options.show_normals,
            ViewerKey::G => self.options.show_grid = !self.options.show_grid,
            ViewerKey::Q => self.quality_selected = self.quality_selected.next(),
            ViewerKey::V => self.options.view_mode = self.options.view_mode.next(),
            ViewerKey::W => self.options.show_wire = !self.options.show_wire,
            ViewerKey::Return => {
                log::debug!("reload");
                self.rebuild_geometry();
            }
        }
    }

    /// Intersect the ray under the mouse with the current mesh
    pub fn perform_picking(&mut self) -> Option<PickResult> {
        self.pick = None;
        self.pick_bounds = None;
        let mesh = self.mesh.as_ref()?;
        if self.window_size.x <= 0.0 || self.window_size.y <= 0.0 {
            return None;
        }

        let u = self.mouse_pos.x / self.window_size.x;
        let v = 1.0 - self.mouse_pos.y / self.window_size.y;
        let ray = self.camera.generate_ray(u, v, self.camera.aspect_ratio);

        self.pick_bounds = PickBounds::new(mesh, &self.model);
        self.pick = picking::pick(&ray, mesh, &self.model);
        self.pick
    }

    fn import(&mut self, path: &Path) -> Result<(), LoadError> {
        let mesh = loader::load_mesh(path)?;
        self.imported = Some(mesh);
        self.primitive_selected = Primitive::ImportedMesh;
        Ok(())
    }

    /// Import a mesh file and display it
    pub fn load_mesh(&mut self, path: &Path) -> Result<(), LoadError> {
        self.import(path)?;
        self.rebuild_geometry();
        Ok(())
    }

    /// Replace the sampled texture, keeping the previous one on failure
    pub fn load_texture(&mut self, path: &Path) {
        match Texture::load(path) {
            Ok(texture) => self.texture = texture,
            Err(err) => log::error!("Could not load texture {}: {err}", path.display()),
        }
    }

    /// Map [ViewerState::probe] from normalized device coordinates to world space and mark it
    pub fn unproject_probe(&mut self) -> Option<Vec3> {
        let inverse = self.camera.view_projection().inverse();
        let p = inverse * self.probe.extend(1.0);
        if p.w.abs() < f32::EPSILON {
            log::warn!("Probe {} has no finite unprojection", self.probe);
            self.probe_marker = None;
            return None;
        }
        let world = p.truncate() / p.w;
        log::info!("Probe {} unprojects to {}", self.probe, world);
        self.probe_marker = Some(world);
        Some(world)
    }

    pub fn debug_readout(&self) -> DebugReadout {
        let (right, up) = self.camera.billboard_vectors();
        DebugReadout {
            eye: self.camera.eye,
            up,
            right,
            fov: self.camera.fov,
            model: self.model,
            projection: self.camera.projection_matrix(),
            view: self.camera.view_matrix(),
            mouse: self.mouse_pos,
        }
    }

    /// Normals, tangents, bounds, pick vector, grid and probe marker of the frame
    pub fn overlay_lines(&self) -> FrameOverlay {
        let mut frame = FrameOverlay::default();

        if self.mesh.is_some() {
            if self.options.show_normals {
                frame.lines.extend(
                    self.normal_lines
                        .iter()
                        .map(|s| Line::from_segment(s, &self.model, overlay::NORMAL_COLOR)),
                );
            }
            if self.options.show_tangents {
                frame.lines.extend(
                    self.tangent_lines
                        .iter()
                        .map(|s| Line::from_segment(s, &self.model, overlay::TANGENT_COLOR)),
                );
            }
        }

        if let (true, Some(bounds)) = (self.options.show_bounds, &self.pick_bounds) {
            let boxes: [(&Bounds, Vec3); 3] = [
                (&bounds.object, overlay::OBJECT_BOUNDS_COLOR),
                (&bounds.world_exact, overlay::EXACT_BOUNDS_COLOR),
                (&bounds.world_approx, overlay::APPROX_BOUNDS_COLOR),
            ];
            for (b, color) in boxes {
                frame.lines.extend(overlay::wire_box(b, color));
            }
        }

        if let Some(pick) = &self.pick {
            frame.lines.extend(overlay::arrow(
                pick.point + pick.normal,
                pick.point,
                overlay::PICK_COLOR,
            ));
        }

        if self.options.show_grid {
            frame.guides.extend(overlay::grid());
            frame.guides.extend(overlay::coordinate_frame(2.0));
        }

        if let Some(marker) = self.probe_marker {
            frame
                .markers
                .extend(overlay::marker(marker, PROBE_MARKER_SIZE, overlay::PROBE_COLOR));
        }

        frame
    }

    pub fn surface_style(&self) -> SurfaceStyle {
        let options = &self.options;
        SurfaceStyle {
            view_mode: options.view_mode,
            texturing: options.texturing,
            texture_frequency: match self.primitive_current {
                Primitive::TorusKnot => Vec2::new(100.0, 10.0),
                _ => Vec2::splat(20.0),
            },
            solid: options.show_solid,
            wire_overlay: options.show_wire,
            face_culling: options.face_culling,
            vertex_colors: options.show_colors,
            primitive_color: options.primitive_color,
            wire_color: options.wire_color,
        }
    }

    pub fn render_scene<'a>(&'a self, overlay: &'a FrameOverlay) -> RenderScene<'a> {
        RenderScene {
            mesh: self.mesh.as_ref(),
            model: self.model,
            view_projection: self.camera.view_projection(),
            eye: self.camera.eye,
            near: self.camera.near,
            background: self.options.background,
            style: self.surface_style(),
            texture: &self.texture,
            lines: &overlay.lines,
            guides: &overlay.guides,
            markers: &overlay.markers,
        }
    }

    /// Draw the current frame
    pub fn render(&self, frame: &mut FrameBuffer) {
        let overlay = self.overlay_lines();
        raster::render(frame, &self.render_scene(&overlay));
    }
}
