mod app;
mod panel;
mod utils;

use std::path::PathBuf;

use clap::Parser;
use geometry_viewer::viewer::ViewerSettings;
use glam::Vec2;
use utils::{AvailablePrimitive, AvailableQuality, AvailableViewMode, Dimensions};

#[derive(Parser, Debug)]
pub struct Args {
    #[arg(long, value_enum, default_value_t)]
    /// Primitive shown at start up, ignored when a mesh is given
    primitive: AvailablePrimitive,

    #[arg(long, value_enum, default_value_t)]
    quality: AvailableQuality,

    #[arg(long, value_enum, default_value_t)]
    view_mode: AvailableViewMode,

    #[arg(long)]
    /// Mesh to import (stl, obj or off)
    mesh: Option<PathBuf>,

    #[arg(long)]
    /// Image used by the "Sampler" texturing mode
    texture: Option<PathBuf>,

    #[arg(short, long, default_value = "1024x768")]
    /// Window dimension in format `width`x`height`
    dimensions: Dimensions,

    #[arg(long, default_value_t = 1.0, value_parser = utils::parse_render_scale)]
    /// Resolution of the software renderer relative to the viewport, between 0.25 and 1
    render_scale: f32,
}

impl From<Args> for ViewerSettings {
    fn from(args: Args) -> Self {
        ViewerSettings {
            primitive: args.primitive.into(),
            quality: args.quality.into(),
            view_mode: args.view_mode.into(),
            mesh: args.mesh,
            texture: args.texture,
            window_size: Vec2::new(args.dimensions.width as f32, args.dimensions.height as f32),
            render_scale: args.render_scale,
            ..Default::default()
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    log::info!("Starting viewer with {}", args.dimensions);

    let settings = ViewerSettings::from(args);
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([settings.window_size.x, settings.window_size.y])
            .with_title("Geometry")
            .with_drag_and_drop(true),
        vsync: false,
        ..Default::default()
    };

    eframe::run_native(
        "Geometry",
        native_options,
        Box::new(|cc| Box::new(app::ViewerApp::new(cc, settings))),
    )
    .map_err(|err| anyhow::anyhow!("Viewer stopped: {err}"))
}
