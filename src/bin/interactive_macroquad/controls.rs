use macroquad::prelude::*;
use macroquad::ui::{hash, root_ui, widgets};

use parabolic_motion::core::model::GeometryMode;

use crate::state::AppRuntime;

#[derive(Default, Clone, Copy)]
pub(crate) struct FrameActions {
    pub(crate) start: bool,
    pub(crate) reset: bool,
    pub(crate) prev_variant: bool,
    pub(crate) next_variant: bool,
}

impl FrameActions {
    pub(crate) fn merge(self, other: Self) -> Self {
        Self {
            start: self.start || other.start,
            reset: self.reset || other.reset,
            prev_variant: self.prev_variant || other.prev_variant,
            next_variant: self.next_variant || other.next_variant,
        }
    }
}

pub(crate) fn hotkey_actions() -> FrameActions {
    FrameActions {
        start: is_key_pressed(KeyCode::Space),
        reset: is_key_pressed(KeyCode::R),
        prev_variant: is_key_pressed(KeyCode::P),
        next_variant: is_key_pressed(KeyCode::N),
    }
}

pub(crate) fn draw_control_panel(state: &mut AppRuntime) -> FrameActions {
    let store = state.engine.store();
    let limits = *store.limits();
    let angle_lo = store.angles().min() as f32;
    let angle_hi = store.angles().max() as f32;
    let geometry = store.model().geometry;
    let running = state.view.running;

    let mut actions = FrameActions::default();
    widgets::Window::new(hash!(), vec2(18.0, 120.0), vec2(360.0, 330.0))
        .label(state.label)
        .ui(&mut *root_ui(), |ui| {
            ui.slider(
                hash!(),
                "Speed (m/s)",
                0.0..limits.max_speed_mps as f32,
                &mut state.sliders.speed_mps,
            );
            if geometry == GeometryMode::Angled {
                ui.slider(
                    hash!(),
                    "Angle (deg)",
                    angle_lo..angle_hi,
                    &mut state.sliders.angle_deg,
                );
            }
            ui.slider(
                hash!(),
                "Mass (kg)",
                limits.min_mass_kg as f32..limits.max_mass_kg as f32,
                &mut state.sliders.mass_kg,
            );
            ui.slider(
                hash!(),
                "Height (m)",
                0.0..limits.max_height_m as f32,
                &mut state.sliders.height_m,
            );
            ui.separator();
            if running {
                ui.label(None, "Start (Space): in flight");
            } else if ui.button(None, "Start (Space)") {
                actions.start = true;
            }
            if ui.button(None, "Reset (R)") {
                actions.reset = true;
            }
            if ui.button(None, "Toggle Preview") {
                state.show_preview = !state.show_preview;
            }
            if ui.button(None, "Prev Variant (P)") {
                actions.prev_variant = true;
            }
            if ui.button(None, "Next Variant (N)") {
                actions.next_variant = true;
            }
            ui.label(
                None,
                if running {
                    "Flight state: Running"
                } else {
                    "Flight state: Idle"
                },
            );
        });

    actions
}
