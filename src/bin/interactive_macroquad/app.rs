use std::path::PathBuf;

use macroquad::prelude::*;

use parabolic_motion::core::ballistics::sample_trajectory;
use parabolic_motion::core::config::{SimulationConfig, Variant};
use parabolic_motion::core::window::{AxisWindow, PlotRect};

use crate::constants::{
    BOTTOM_MARGIN, INITIAL_WINDOW_HEIGHT, INITIAL_WINDOW_WIDTH, LEFT_MARGIN, MSAA_SAMPLES,
    PREVIEW_SAMPLES, RIGHT_MARGIN, TOP_MARGIN, UI_FONT_PATH,
};
use crate::controls::{draw_control_panel, hotkey_actions};
use crate::gameplay::{apply_actions, step_active_flight, sync_sliders};
use crate::hud::draw_hud;
use crate::render::{
    draw_axis_tick_labels, draw_ball, draw_grid, draw_launch_stand, draw_path,
};
use crate::state::AppRuntime;

pub(crate) fn window_conf() -> Conf {
    Conf {
        window_title: "ParabolicMotion Interactive".to_string(),
        window_width: INITIAL_WINDOW_WIDTH,
        window_height: INITIAL_WINDOW_HEIGHT,
        high_dpi: true,
        sample_count: MSAA_SAMPLES,
        ..Default::default()
    }
}

/// Uses `PARABOLIC_CONFIG` when it names a readable config, labelled as a
/// custom config, and the angled preset otherwise.
fn initial_runtime() -> AppRuntime {
    let Some(path) = std::env::var_os("PARABOLIC_CONFIG").map(PathBuf::from) else {
        return AppRuntime::new(Variant::Angled);
    };
    match SimulationConfig::load(&path) {
        Ok(config) => AppRuntime::custom(&config),
        Err(err) => {
            log::warn!("{err}; falling back to the angled preset");
            AppRuntime::new(Variant::Angled)
        }
    }
}

pub(crate) async fn run() {
    let ui_font = match load_ttf_font(UI_FONT_PATH).await {
        Ok(font) => Some(font),
        Err(err) => {
            log::info!("Could not load '{UI_FONT_PATH}': {err}. Falling back to default font.");
            None
        }
    };

    let mut state = initial_runtime();

    loop {
        let screen_w = screen_width();
        let screen_h = screen_height();
        let rect = PlotRect {
            left: f64::from(LEFT_MARGIN),
            right: f64::from(screen_w - RIGHT_MARGIN),
            top: f64::from(TOP_MARGIN),
            bottom: f64::from(screen_h - BOTTOM_MARGIN),
        };

        let actions = hotkey_actions().merge(draw_control_panel(&mut state));
        if apply_actions(&mut state, actions) {
            next_frame().await;
            continue;
        }
        sync_sliders(&mut state);
        step_active_flight(&mut state);

        let store = state.engine.store();
        let params = *store.params();
        let model = *store.model();
        let envelope = state.view.envelope;
        let window = AxisWindow::for_flight(&params, &model, &envelope);

        clear_background(Color::from_rgba(250, 251, 253, 255));
        draw_grid(rect, Color::from_rgba(227, 231, 236, 255));
        draw_axis_tick_labels(rect, &window, model.geometry, ui_font.as_ref());
        draw_launch_stand(&window, rect, model.geometry, params.height_m);

        if state.show_preview && !state.view.running {
            let preview = sample_trajectory(
                &params,
                &model,
                store.integration(),
                envelope.flight_duration_s,
                PREVIEW_SAMPLES,
            );
            draw_path(
                &preview,
                &window,
                rect,
                model.geometry,
                2.0,
                Color::from_rgba(76, 141, 245, 140),
            );
        }

        draw_path(
            &state.view.trail,
            &window,
            rect,
            model.geometry,
            3.0,
            Color::from_rgba(54, 123, 245, 255),
        );
        draw_ball(&state.view.sample, &window, rect, model.geometry);
        draw_hud(&state, LEFT_MARGIN, screen_h, ui_font.as_ref());

        next_frame().await;
    }
}
