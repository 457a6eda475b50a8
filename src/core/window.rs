use crate::core::model::{FlightEnvelope, GeometryMode, MotionModel, SimulationParameters};

pub const DISTANCE_TO_HEIGHT_RATIO: f64 = 2.0; // x:y data window ratio

const X_PADDING_RATIO: f64 = 0.06;
const Y_PADDING_RATIO: f64 = 0.10;

/// Screen-space rectangle the world is drawn into. `bottom > top`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlotRect {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

/// Visible world extent, anchored at the origin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AxisWindow {
    pub max_x_m: f64,
    pub max_y_m: f64,
}

impl AxisWindow {
    /// Pads both spans and widens one of them until `x:y` is
    /// [`DISTANCE_TO_HEIGHT_RATIO`].
    pub fn fixed_ratio(raw_max_x: f64, raw_max_y: f64) -> Self {
        let padded = |raw: f64, ratio: f64| (raw + raw.max(1.0) * ratio).max(1.0);
        let x_span = padded(raw_max_x, X_PADDING_RATIO);
        let y_span = padded(raw_max_y, Y_PADDING_RATIO);

        // Grow whichever side is short of the ratio; never shrink.
        let max_y_m = y_span.max(x_span / DISTANCE_TO_HEIGHT_RATIO);
        Self {
            max_x_m: max_y_m * DISTANCE_TO_HEIGHT_RATIO,
            max_y_m,
        }
    }

    /// A window that holds the whole predicted flight.
    pub fn for_flight(
        params: &SimulationParameters,
        model: &MotionModel,
        envelope: &FlightEnvelope,
    ) -> Self {
        let (vx, _) = model.velocity_components(params);
        let range = (vx * envelope.flight_duration_s).max(0.0);
        Self::fixed_ratio(range, envelope.peak_height_m.max(params.height_m))
    }

    /// Horizontal position to draw the mass at: the middle of the window for
    /// vertical launches, the travelled distance otherwise.
    pub fn display_x(&self, geometry: GeometryMode, distance_m: f64) -> f64 {
        match geometry {
            GeometryMode::Vertical => self.max_x_m * 0.5,
            GeometryMode::Angled => distance_m,
        }
    }

    pub fn world_to_screen(&self, x_m: f64, y_m: f64, rect: PlotRect) -> (f64, f64) {
        let plot_w = (rect.right - rect.left).max(1.0);
        let plot_h = (rect.bottom - rect.top).max(1.0);
        let x = rect.left + (x_m / self.max_x_m.max(1.0)) * plot_w;
        let y = rect.bottom - (y_m / self.max_y_m.max(1.0)) * plot_h;
        (x, y)
    }
}
