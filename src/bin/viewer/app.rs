use std::time::Instant;

use eframe::egui::{self, Color32, PointerButton, TextureOptions};
use geometry_viewer::{
    camera::MouseButton,
    color,
    loader::Format,
    raster::FrameBuffer,
    viewer::{ViewerKey, ViewerSettings, ViewerState},
};
use glam::Vec2;

use crate::panel;

const KEYS: [(egui::Key, ViewerKey); 8] = [
    (egui::Key::Space, ViewerKey::Space),
    (egui::Key::C, ViewerKey::C),
    (egui::Key::N, ViewerKey::N),
    (egui::Key::G, ViewerKey::G),
    (egui::Key::Q, ViewerKey::Q),
    (egui::Key::V, ViewerKey::V),
    (egui::Key::W, ViewerKey::W),
    (egui::Key::Enter, ViewerKey::Return),
];

const BUTTONS: [(PointerButton, MouseButton); 3] = [
    (PointerButton::Primary, MouseButton::Left),
    (PointerButton::Middle, MouseButton::Middle),
    (PointerButton::Secondary, MouseButton::Right),
];

/// Scroll distance of one wheel notch, in points
const SCROLL_STEP: f32 = 50.0;

pub struct ViewerApp {
    state: ViewerState,
    frame: FrameBuffer,
    texture: Option<egui::TextureHandle>,
    start: Instant,
    last_frame: Instant,
    fps: f32,
    title: String,
}

impl ViewerApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, settings: ViewerSettings) -> Self {
        log::info!("Initializing viewer...");
        Self {
            state: ViewerState::new(settings),
            frame: FrameBuffer::new(1, 1),
            texture: None,
            start: Instant::now(),
            last_frame: Instant::now(),
            fps: 0.0,
            title: String::new(),
        }
    }

    fn handle_keys(&mut self, ctx: &egui::Context) {
        if ctx.wants_keyboard_input() {
            return;
        }
        let pressed: Vec<ViewerKey> = ctx.input(|i| {
            KEYS.iter()
                .filter(|(key, _)| i.key_pressed(*key))
                .map(|(_, k)| *k)
                .collect()
        });
        for key in pressed {
            self.state.key_down(key);
        }
    }

    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        for path in dropped.into_iter().filter_map(|f| f.path) {
            if Format::from_path(&path).is_ok() {
                if let Err(err) = self.state.load_mesh(&path) {
                    log::error!("Could not open {}: {err}", path.display());
                }
            } else {
                self.state.load_texture(&path);
            }
        }
    }

    fn handle_pointer(&mut self, ui: &egui::Ui, response: &egui::Response, rect: egui::Rect) {
        let local = |pos: egui::Pos2| Vec2::new(pos.x - rect.min.x, pos.y - rect.min.y);

        if let Some(pos) = response.hover_pos() {
            self.state.mouse_move(local(pos));
        }

        if response.hovered() {
            let (time, scroll) = ui.input(|i| (i.time, i.raw_scroll_delta.y));
            for (egui_button, button) in BUTTONS {
                if ui.input(|i| i.pointer.button_pressed(egui_button)) {
                    if let Some(pos) = response.interact_pointer_pos().or(response.hover_pos()) {
                        self.state.mouse_down(local(pos), button, time);
                    }
                }
            }
            if scroll != 0.0 {
                self.state.mouse_wheel(scroll / SCROLL_STEP);
            }
        }

        if response.dragged() {
            if let Some(pos) = response.interact_pointer_pos() {
                self.state.mouse_drag(local(pos));
            }
        }
        if ui.input(|i| i.pointer.any_released()) {
            self.state.mouse_up();
        }
    }

    /// Draw the scene and upload it to the viewport texture
    fn render(&mut self, ctx: &egui::Context, size: egui::Vec2) {
        let scale = self.state.settings.render_scale;
        let width = (size.x * scale).round().max(1.0) as usize;
        let height = (size.y * scale).round().max(1.0) as usize;
        if (self.frame.width, self.frame.height) != (width, height) {
            self.frame.resize(width, height);
        }

        self.state.render(&mut self.frame);
        let pixels = self.frame.to_rgba8();
        let image = egui::ColorImage::from_rgba_unmultiplied(
            [width, height],
            bytemuck::cast_slice(pixels.as_slice()),
        );

        match &mut self.texture {
            Some(texture) => texture.set(image, TextureOptions::LINEAR),
            None => {
                self.texture = Some(ctx.load_texture("viewport", image, TextureOptions::LINEAR))
            }
        }
    }

    fn update_title(&mut self, ctx: &egui::Context) {
        if self.title != self.state.title() {
            self.title = self.state.title().to_owned();
            ctx.send_viewport_cmd(egui::ViewportCommand::Title(self.title.clone()));
        }
    }
}

impl eframe::App for ViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();
        let dt = (now - self.last_frame).as_secs_f32();
        self.last_frame = now;
        if dt > 0.0 {
            self.fps = 0.9 * self.fps + 0.1 / dt;
        }

        self.handle_dropped_files(ctx);
        self.handle_keys(ctx);
        panel::show(ctx, &mut self.state, self.fps);

        let [r, g, b, a] = color::to_rgba8(self.state.options.background);
        egui::CentralPanel::default()
            .frame(egui::Frame::none().fill(Color32::from_rgba_unmultiplied(r, g, b, a)))
            .show(ctx, |ui| {
                let (rect, response) =
                    ui.allocate_exact_size(ui.available_size(), egui::Sense::click_and_drag());
                self.state.resize(Vec2::new(rect.width(), rect.height()));
                self.handle_pointer(ui, &response, rect);
                self.state.update(self.start.elapsed().as_secs_f64());

                self.render(ctx, rect.size());
                if let Some(texture) = &self.texture {
                    let uv = egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
                    ui.painter().image(texture.id(), rect, uv, Color32::WHITE);
                }
            });

        self.update_title(ctx);
        ctx.request_repaint();
    }
}
