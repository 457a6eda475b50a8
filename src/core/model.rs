use serde::{Deserialize, Serialize};

/// User-adjustable launch parameters.
///
/// `mass_kg` does not enter the trajectory; it is carried for display only.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimulationParameters {
    pub speed_mps: f64,
    pub angle_deg: f64,
    pub mass_kg: f64,
    pub height_m: f64,
}

impl Default for SimulationParameters {
    fn default() -> Self {
        Self {
            speed_mps: 2.5,
            angle_deg: 25.0,
            mass_kg: 1.0,
            height_m: 0.0,
        }
    }
}

/// Gravitational acceleration, either fixed or a function of height.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GravityModel {
    Constant { g: f64 },
    /// `g(h) = strength / (h + offset_m)`
    InverseHeight { strength: f64, offset_m: f64 },
}

impl GravityModel {
    /// Downward acceleration at `height_m`. Heights below ground are evaluated
    /// at ground level so the inverse model never approaches its pole.
    pub fn at(self, height_m: f64) -> f64 {
        match self {
            Self::Constant { g } => g,
            Self::InverseHeight { strength, offset_m } => strength / (height_m.max(0.0) + offset_m),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeometryMode {
    /// Straight up and down; the launch angle is treated as 90 degrees.
    Vertical,
    /// Full projectile motion with a horizontal component.
    Angled,
}

/// Where a flight ends.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LandingSurface {
    Ground,
    /// The mass lands back on whatever it was launched from (a podium).
    LaunchHeight,
}

/// Everything about the physics that is chosen per variant rather than per
/// launch.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MotionModel {
    pub gravity: GravityModel,
    pub geometry: GeometryMode,
    pub landing: LandingSurface,
}

impl MotionModel {
    pub fn landing_height(&self, params: &SimulationParameters) -> f64 {
        match self.landing {
            LandingSurface::Ground => 0.0,
            LandingSurface::LaunchHeight => params.height_m.max(0.0),
        }
    }

    pub fn effective_angle_deg(&self, params: &SimulationParameters) -> f64 {
        match self.geometry {
            GeometryMode::Vertical => 90.0,
            GeometryMode::Angled => params.angle_deg,
        }
    }

    /// Initial `(horizontal, vertical)` velocity.
    pub fn velocity_components(&self, params: &SimulationParameters) -> (f64, f64) {
        match self.geometry {
            GeometryMode::Vertical => (0.0, params.speed_mps),
            GeometryMode::Angled => {
                let theta = params.angle_deg.to_radians();
                (params.speed_mps * theta.cos(), params.speed_mps * theta.sin())
            }
        }
    }
}

/// One frame's worth of motion state. Built fresh from `(parameters, t)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MotionSample {
    pub elapsed_s: f64,
    pub height_m: f64,
    pub distance_m: f64,
    pub vertical_velocity_mps: f64,
    pub horizontal_velocity_mps: f64,
}

impl MotionSample {
    /// The mass sitting still at `height_m` before launch.
    pub fn at_rest(height_m: f64) -> Self {
        Self {
            elapsed_s: 0.0,
            height_m: height_m.max(0.0),
            distance_m: 0.0,
            vertical_velocity_mps: 0.0,
            horizontal_velocity_mps: 0.0,
        }
    }

    /// Same position, zero velocity, height forced onto `surface_m`.
    pub fn clamped_to(self, surface_m: f64) -> Self {
        Self {
            height_m: surface_m,
            vertical_velocity_mps: 0.0,
            horizontal_velocity_mps: 0.0,
            ..self
        }
    }

    pub fn speed_mps(&self) -> f64 {
        self.vertical_velocity_mps.hypot(self.horizontal_velocity_mps)
    }
}

/// Predicted peak height and total duration of a flight.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FlightEnvelope {
    pub peak_height_m: f64,
    pub flight_duration_s: f64,
}
