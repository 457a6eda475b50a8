use macroquad::prelude::*;

use crate::constants::TITLE_Y;
use crate::render::draw_ui_text;
use crate::state::AppRuntime;

pub(crate) fn draw_hud(state: &AppRuntime, left: f32, screen_h: f32, font: Option<&Font>) {
    let header_color = Color::from_rgba(30, 30, 35, 255);
    draw_ui_text(
        "ParabolicMotion - Interactive",
        left,
        TITLE_Y,
        30,
        header_color,
        font,
    );
    draw_ui_text(
        &format!(
            "{} | Space start | R reset | P/N variant",
            state.label
        ),
        left,
        TITLE_Y + 30.0,
        20,
        DARKGRAY,
        font,
    );

    let params = state.engine.params();
    let model = state.engine.store().model();
    draw_ui_text(
        &format!(
            "Speed: {:.2} m/s | Angle: {:.1} deg | Mass: {:.2} kg | Height: {:.2} m",
            params.speed_mps,
            model.effective_angle_deg(params),
            params.mass_kg,
            params.height_m
        ),
        left,
        screen_h - 76.0,
        22,
        header_color,
        font,
    );

    let envelope = state.view.envelope;
    draw_ui_text(
        &format!(
            "Prediction -> max height {:.3} m, flight {:.3} s | {}",
            envelope.peak_height_m, envelope.flight_duration_s, state.view.status_line
        ),
        left,
        screen_h - 45.0,
        18,
        DARKGRAY,
        font,
    );

    let sample = state.view.sample;
    draw_ui_text(
        &format!(
            "t = {:.3} s | h = {:.3} m | x = {:.3} m | vy = {:.3} m/s | |v| = {:.3} m/s",
            sample.elapsed_s,
            sample.height_m,
            sample.distance_m,
            sample.vertical_velocity_mps,
            sample.speed_mps()
        ),
        left,
        screen_h - 14.0,
        20,
        BLUE,
        font,
    );
}
