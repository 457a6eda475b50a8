use macroquad::prelude::*;

use parabolic_motion::core::model::{GeometryMode, MotionSample};
use parabolic_motion::core::window::{AxisWindow, PlotRect};

use crate::constants::{BALL_RADIUS_PX, X_GRID_LINES, Y_GRID_LINES};

fn format_axis_value(value: f32, axis_max: f32) -> String {
    if axis_max >= 1000.0 {
        format!("{value:.0}")
    } else if axis_max >= 10.0 {
        format!("{value:.1}")
    } else {
        format!("{value:.2}")
    }
}

pub(crate) fn draw_ui_text(
    text: &str,
    x: f32,
    y: f32,
    font_size: u16,
    color: Color,
    font: Option<&Font>,
) {
    draw_text_ex(
        text,
        x,
        y,
        TextParams {
            font,
            font_size,
            color,
            ..Default::default()
        },
    );
}

pub(crate) fn to_screen(window: &AxisWindow, rect: PlotRect, x_m: f64, y_m: f64) -> Vec2 {
    let (x, y) = window.world_to_screen(x_m, y_m, rect);
    vec2(x as f32, y as f32)
}

pub(crate) fn draw_grid(rect: PlotRect, color: Color) {
    let (left, right, top, bottom) = (
        rect.left as f32,
        rect.right as f32,
        rect.top as f32,
        rect.bottom as f32,
    );
    for i in 0..=X_GRID_LINES {
        let t = i as f32 / X_GRID_LINES as f32;
        let x = left + t * (right - left);
        draw_line(x, top, x, bottom, 1.0, color);
    }
    for i in 0..=Y_GRID_LINES {
        let t = i as f32 / Y_GRID_LINES as f32;
        let y = bottom - t * (bottom - top);
        draw_line(left, y, right, y, 1.0, color);
    }
    draw_line(left, bottom, right, bottom, 2.0, DARKGRAY);
    draw_line(left, top, left, bottom, 2.0, DARKGRAY);
}

pub(crate) fn draw_axis_tick_labels(
    rect: PlotRect,
    window: &AxisWindow,
    geometry: GeometryMode,
    font: Option<&Font>,
) {
    let label_color = Color::from_rgba(105, 113, 124, 255);
    let tick_font_size: u16 = 16;
    let (left, right, top, bottom) = (
        rect.left as f32,
        rect.right as f32,
        rect.top as f32,
        rect.bottom as f32,
    );
    let world_max_x = window.max_x_m as f32;
    let world_max_y = window.max_y_m as f32;

    if geometry == GeometryMode::Angled {
        for i in 0..=X_GRID_LINES {
            let t = i as f32 / X_GRID_LINES as f32;
            let x = left + t * (right - left);
            let label = format_axis_value(t * world_max_x, world_max_x);
            let size = measure_text(&label, font, tick_font_size, 1.0);
            draw_ui_text(
                &label,
                x - (size.width * 0.5),
                bottom + 22.0,
                tick_font_size,
                label_color,
                font,
            );
        }
        draw_ui_text(
            "Distance (m)",
            right - 130.0,
            bottom + 48.0,
            18,
            label_color,
            font,
        );
    }

    for i in 0..=Y_GRID_LINES {
        let t = i as f32 / Y_GRID_LINES as f32;
        let y = bottom - t * (bottom - top);
        let label = format_axis_value(t * world_max_y, world_max_y);
        let size = measure_text(&label, font, tick_font_size, 1.0);
        draw_ui_text(
            &label,
            (left - 8.0) - size.width,
            y + (size.height * 0.35),
            tick_font_size,
            label_color,
            font,
        );
    }
    draw_ui_text("Height (m)", left + 10.0, top - 8.0, 18, label_color, font);
}

/// Podium or launch pad under the starting point.
pub(crate) fn draw_launch_stand(
    window: &AxisWindow,
    rect: PlotRect,
    geometry: GeometryMode,
    height_m: f64,
) {
    if height_m <= 0.0 {
        return;
    }
    let x = window.display_x(geometry, 0.0);
    let top = to_screen(window, rect, x, height_m);
    let base = to_screen(window, rect, x, 0.0);
    let half_w = 26.0;
    draw_rectangle(
        top.x - half_w,
        top.y + BALL_RADIUS_PX,
        half_w * 2.0,
        (base.y - top.y - BALL_RADIUS_PX).max(2.0),
        Color::from_rgba(170, 178, 189, 255),
    );
}

pub(crate) fn draw_path(
    samples: &[MotionSample],
    window: &AxisWindow,
    rect: PlotRect,
    geometry: GeometryMode,
    thickness: f32,
    color: Color,
) {
    let point = |s: &MotionSample| {
        to_screen(
            window,
            rect,
            window.display_x(geometry, s.distance_m),
            s.height_m,
        )
    };
    for pair in samples.windows(2) {
        let a = point(&pair[0]);
        let b = point(&pair[1]);
        draw_line(a.x, a.y, b.x, b.y, thickness, color);
    }
}

/// Draws the mass resting on, not centred on, its height.
pub(crate) fn draw_ball(
    sample: &MotionSample,
    window: &AxisWindow,
    rect: PlotRect,
    geometry: GeometryMode,
) {
    let p = to_screen(
        window,
        rect,
        window.display_x(geometry, sample.distance_m),
        sample.height_m,
    );
    let y = p.y - BALL_RADIUS_PX;
    draw_circle(p.x, y, BALL_RADIUS_PX, RED);
    draw_circle_lines(p.x, y, BALL_RADIUS_PX, 2.0, MAROON);
}
