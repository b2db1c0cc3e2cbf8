use std::ops::RangeInclusive;

use eframe::egui::{self, emath::Numeric};
use geometry_viewer::{
    color::Rgb,
    geometry::{Primitive, PrimitiveParams, Quality},
    loader::SUPPORTED_EXTENSIONS,
    raster::{TexturingMode, ViewMode},
    viewer::{format_matrix, ViewerState},
};
use glam::Vec3;

fn drag<N: Numeric>(
    ui: &mut egui::Ui,
    label: &str,
    value: &mut N,
    range: RangeInclusive<N>,
) -> bool {
    ui.horizontal(|ui| {
        let speed = (range.end().to_f64() - range.start().to_f64()) / 200.0;
        let changed = ui
            .add(egui::DragValue::new(value).clamp_range(range).speed(speed))
            .changed();
        ui.label(label);
        changed
    })
    .inner
}

/// Widgets of the shape parameters of `primitive`, true when one changed
fn primitive_params(ui: &mut egui::Ui, primitive: Primitive, params: &mut PrimitiveParams) -> bool {
    let tau = std::f32::consts::TAU;
    match primitive {
        Primitive::Capsule => {
            drag(ui, "Radius", &mut params.capsule_radius, 0.05..=2.0)
                | drag(ui, "Length", &mut params.capsule_length, 0.0..=4.0)
        }
        Primitive::Cone => drag(ui, "Ratio", &mut params.cone_ratio, 0.0..=1.0),
        Primitive::Helix => {
            drag(ui, "Ratio", &mut params.helix_ratio, 0.05..=1.0)
                | drag(ui, "Coils", &mut params.helix_coils, 0.5..=10.0)
                | drag(ui, "Twist", &mut params.helix_twist, 0..=10)
                | drag(ui, "Twist Offset", &mut params.helix_offset, 0.0..=tau)
        }
        Primitive::Torus => {
            drag(ui, "Ratio", &mut params.torus_ratio, 0.05..=1.0)
                | drag(ui, "Twist", &mut params.torus_twist, 0..=10)
                | drag(ui, "Twist Offset", &mut params.torus_offset, 0.0..=tau)
        }
        Primitive::TorusKnot => {
            let scale = &mut params.torus_knot_scale;
            drag(ui, "P", &mut params.torus_knot_p, 1..=10)
                | drag(ui, "Q", &mut params.torus_knot_q, 1..=10)
                | drag(ui, "Radius", &mut params.torus_knot_radius, 0.05..=0.5)
                | drag(ui, "Scale X", &mut scale.x, 0.1..=2.0)
                | drag(ui, "Scale Y", &mut scale.y, 0.1..=2.0)
                | drag(ui, "Scale Z", &mut scale.z, 0.1..=2.0)
        }
        Primitive::Ring => drag(ui, "Width", &mut params.ring_width, 0.05..=1.0),
        Primitive::RoundedRect => {
            drag(ui, "Corner Radius", &mut params.rounded_rect_radius, 0.0..=0.5)
        }
        _ => false,
    }
}

fn combo<T: PartialEq + Copy>(
    ui: &mut egui::Ui,
    label: &str,
    value: &mut T,
    choices: &[T],
    name: impl Fn(&T) -> &'static str,
) {
    egui::ComboBox::from_label(label)
        .selected_text(name(value))
        .show_ui(ui, |ui| {
            for choice in choices {
                ui.selectable_value(value, *choice, name(choice));
            }
        });
}

fn color_edit(ui: &mut egui::Ui, label: &str, color: &mut Rgb) {
    ui.horizontal(|ui| {
        ui.color_edit_button_rgb(&mut color.0);
        ui.label(label);
    });
}

fn vec3_label(ui: &mut egui::Ui, label: &str, v: Vec3) {
    ui.monospace(format!("{label:<6}{:>8.3} {:>8.3} {:>8.3}", v.x, v.y, v.z));
}

/// The "View options" window
pub fn show(ctx: &egui::Context, state: &mut ViewerState, fps: f32) {
    egui::Window::new("View options")
        .default_pos([10.0, 10.0])
        .resizable(false)
        .show(ctx, |ui| {
            let mut rebuild = false;

            combo(
                ui,
                "Primitive",
                &mut state.primitive_selected,
                &Primitive::ALL,
                Primitive::label,
            );
            rebuild |= primitive_params(ui, state.primitive_selected, &mut state.params);
            combo(ui, "Quality", &mut state.quality_selected, &Quality::ALL, Quality::label);
            combo(
                ui,
                "Viewing Mode",
                &mut state.options.view_mode,
                &ViewMode::ALL,
                ViewMode::label,
            );
            combo(
                ui,
                "Texturing Mode",
                &mut state.options.texturing,
                &TexturingMode::ALL,
                TexturingMode::label,
            );

            ui.separator();
            let options = &mut state.options;
            ui.checkbox(&mut options.show_grid, "Show Grid");
            ui.checkbox(&mut options.show_normals, "Show Normals");
            ui.checkbox(&mut options.show_tangents, "Show Tangents");
            rebuild |= ui.checkbox(&mut options.show_colors, "Show Colors").changed();
            ui.checkbox(&mut options.face_culling, "Face Culling");
            ui.checkbox(&mut options.show_wire, "Wire Primitive");
            ui.checkbox(&mut options.show_solid, "Solid Primitive");
            ui.checkbox(&mut options.show_bounds, "Show Bounds");
            ui.checkbox(&mut options.animate, "Animate");
            color_edit(ui, "Background", &mut options.background);
            color_edit(ui, "Primitive Color", &mut options.primitive_color);
            color_edit(ui, "Wire Color", &mut options.wire_color);

            ui.separator();
            if ui.button("Open Mesh...").clicked() {
                if let Some(path) = rfd::FileDialog::new()
                    .add_filter("Meshes", &SUPPORTED_EXTENSIONS)
                    .pick_file()
                {
                    if let Err(err) = state.load_mesh(&path) {
                        log::error!("Could not open {}: {err}", path.display());
                    }
                }
            }

            ui.horizontal(|ui| {
                for v in [&mut state.probe.x, &mut state.probe.y, &mut state.probe.z] {
                    ui.add(egui::DragValue::new(v).clamp_range(-1.0..=1.0).speed(0.01));
                }
                if ui.button("Unproject").clicked() {
                    state.unproject_probe();
                }
            });
            if let Some(marker) = state.probe_marker() {
                vec3_label(ui, "Probe", marker);
            }

            ui.separator();
            let readout = state.debug_readout();
            ui.label(format!("{fps:.1} fps"));
            ui.label(format!("Mouse: {:.0}, {:.0}", readout.mouse.x, readout.mouse.y));
            vec3_label(ui, "Eye", readout.eye);
            vec3_label(ui, "Up", readout.up);
            vec3_label(ui, "Right", readout.right);
            ui.label(format!("FoV: {:.1}°", readout.fov));
            egui::CollapsingHeader::new("Matrices").show(ui, |ui| {
                for (name, m) in [
                    ("Model", readout.model),
                    ("Projection", readout.projection),
                    ("View", readout.view),
                ] {
                    ui.label(name);
                    ui.monospace(format_matrix(&m));
                }
            });

            if rebuild {
                state.rebuild_geometry();
            }
        });
}
