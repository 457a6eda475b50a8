//! Height and velocity against time, written to PNG or SVG.

use std::path::{Path, PathBuf};

use chrono::Local;
use plotters::coord::Shift;
use plotters::prelude::*;

use crate::core::ballistics::sample_trajectory;
use crate::core::error::{Error, Result};
use crate::core::model::{FlightEnvelope, MotionSample};
use crate::core::params::ParameterStore;

const CHART_SIZE: (u32, u32) = (1000, 900);
const BACKGROUND: RGBColor = RGBColor(0xf8, 0xf9, 0xfa);
const SERIES: RGBColor = RGBColor(0x2e, 0x86, 0xab);
const MARKER: RGBColor = RGBColor(0x7f, 0x8c, 0x8d);
const AXIS: RGBColor = RGBColor(0xcc, 0xcc, 0xcc);
const CHART_SAMPLES: usize = 200;

/// `dir/motion_YYYYMMDD_HHMMSS.png`
pub fn default_chart_path(dir: &Path) -> PathBuf {
    dir.join(format!("motion_{}.png", Local::now().format("%Y%m%d_%H%M%S")))
}

/// Charts the flight the store currently predicts.
pub fn render_flight_chart(store: &ParameterStore, path: &Path) -> Result<()> {
    let envelope = store.envelope();
    let samples = sample_trajectory(
        store.params(),
        store.model(),
        store.integration(),
        envelope.flight_duration_s,
        CHART_SAMPLES,
    );
    render_motion_chart(&samples, &envelope, path)
}

/// Two stacked panels, height and vertical velocity, each with a marker at
/// the predicted landing time. `.svg` paths get the SVG backend, anything
/// else a bitmap.
pub fn render_motion_chart(
    samples: &[MotionSample],
    envelope: &FlightEnvelope,
    path: &Path,
) -> Result<()> {
    if samples.len() < 2 {
        return Err(Error::InvalidInput(
            "a chart needs at least two samples".to_string(),
        ));
    }

    let is_svg = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("svg"));
    let drawn = if is_svg {
        draw(
            SVGBackend::new(path, CHART_SIZE).into_drawing_area(),
            samples,
            envelope,
        )
    } else {
        draw(
            BitMapBackend::new(path, CHART_SIZE).into_drawing_area(),
            samples,
            envelope,
        )
    };
    drawn?;

    log::info!("Wrote chart to {}", path.display());
    Ok(())
}

fn plot_err(err: impl std::fmt::Display) -> Error {
    Error::Plot(err.to_string())
}

fn draw<DB: DrawingBackend>(
    root: DrawingArea<DB, Shift>,
    samples: &[MotionSample],
    envelope: &FlightEnvelope,
) -> Result<()> {
    root.fill(&BACKGROUND).map_err(plot_err)?;
    let (upper, lower) = root.split_vertically(CHART_SIZE.1 / 2);

    draw_panel(
        &upper,
        "Height vs Time",
        "Height (m)",
        samples,
        |s| s.height_m,
        envelope.flight_duration_s,
        Some(envelope.peak_height_m),
    )?;
    draw_panel(
        &lower,
        "Velocity vs Time",
        "Velocity (m/s)",
        samples,
        |s| s.vertical_velocity_mps,
        envelope.flight_duration_s,
        None,
    )?;

    root.present().map_err(plot_err)
}

fn draw_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    title: &str,
    y_desc: &str,
    samples: &[MotionSample],
    value: impl Fn(&MotionSample) -> f64,
    landing_s: f64,
    level: Option<f64>,
) -> Result<()> {
    let t_max = samples
        .iter()
        .map(|s| s.elapsed_s)
        .fold(landing_s, f64::max)
        .max(1e-3);
    let (lo, hi) = samples
        .iter()
        .map(&value)
        .chain(level)
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    let pad = ((hi - lo) * 0.1).max(0.1);
    let (y_lo, y_hi) = (lo - pad, hi + pad);

    let mut chart = ChartBuilder::on(area)
        .caption(title, ("serif", 24))
        .margin(16)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(0.0..t_max, y_lo..y_hi)
        .map_err(plot_err)?;

    chart
        .configure_mesh()
        .x_desc("Time (s)")
        .y_desc(y_desc)
        .light_line_style(AXIS.mix(0.4))
        .axis_style(AXIS)
        .draw()
        .map_err(plot_err)?;

    chart
        .draw_series(LineSeries::new(
            samples.iter().map(|s| (s.elapsed_s, value(s))),
            SERIES.stroke_width(3),
        ))
        .map_err(plot_err)?;

    chart
        .draw_series(LineSeries::new(
            [(landing_s, y_lo), (landing_s, y_hi)],
            MARKER.mix(0.7).stroke_width(2),
        ))
        .map_err(plot_err)?;

    if let Some(level) = level {
        chart
            .draw_series(LineSeries::new(
                [(0.0, level), (t_max, level)],
                MARKER.mix(0.7).stroke_width(2),
            ))
            .map_err(plot_err)?;
    }

    Ok(())
}
