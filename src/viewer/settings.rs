use std::path::PathBuf;

use glam::Vec2;

use crate::{
    color::{self, Rgb},
    geometry::{Primitive, Quality},
    raster::{TexturingMode, ViewMode},
};

/// Start up configuration of the viewer
#[derive(Debug, Clone, PartialEq)]
pub struct ViewerSettings {
    pub primitive: Primitive,
    pub quality: Quality,
    pub view_mode: ViewMode,
    pub texturing: TexturingMode,
    /// Mesh imported at start up, selected instead of `primitive`
    pub mesh: Option<PathBuf>,
    /// Image replacing the default striped texture
    pub texture: Option<PathBuf>,
    pub window_size: Vec2,
    /// Size of the rendered frame relative to the viewport, in `[0.25, 1]`
    pub render_scale: f32,
}

impl Default for ViewerSettings {
    fn default() -> Self {
        Self {
            primitive: Primitive::Teapot,
            quality: Quality::High,
            view_mode: ViewMode::Lambert,
            texturing: TexturingMode::Procedural,
            mesh: None,
            texture: None,
            window_size: Vec2::new(1024.0, 768.0),
            render_scale: 1.0,
        }
    }
}

/// Toggles and colors editable at runtime
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayOptions {
    pub view_mode: ViewMode,
    pub texturing: TexturingMode,
    pub show_grid: bool,
    pub show_normals: bool,
    pub show_tangents: bool,
    /// Vertex colors, changing it requires a rebuild
    pub show_colors: bool,
    pub face_culling: bool,
    pub show_wire: bool,
    pub show_solid: bool,
    pub show_bounds: bool,
    pub animate: bool,
    pub background: Rgb,
    pub primitive_color: Rgb,
    pub wire_color: Rgb,
}

impl DisplayOptions {
    pub fn new(settings: &ViewerSettings) -> Self {
        Self {
            view_mode: settings.view_mode,
            texturing: settings.texturing,
            show_grid: true,
            show_normals: false,
            show_tangents: false,
            show_colors: false,
            face_culling: false,
            show_wire: false,
            show_solid: true,
            show_bounds: true,
            animate: true,
            background: color::WHITE,
            primitive_color: color::WHITE,
            wire_color: color::BLACK,
        }
    }
}
