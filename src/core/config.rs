//! Simulation configuration and the built-in variants.
//!
//! A configuration file is TOML; every section is optional and falls back to
//! the `angled` preset:
//!
//! ```toml
//! [model]
//! gravity = { kind = "inverse_height", strength = 7.0, offset_m = 1.0 }
//! geometry = "vertical"
//! landing = "launch_height"
//!
//! [angles]
//! ranges = [[90.0, 90.0]]
//!
//! [defaults]
//! speed_mps = 2.5
//! angle_deg = 90.0
//! mass_kg = 1.0
//! height_m = 0.0
//! ```

use std::fs;
use std::path::Path;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::core::error::{Error, Result};
use crate::core::model::{
    GeometryMode, GravityModel, LandingSurface, MotionModel, SimulationParameters,
};
use crate::core::params::AngleRanges;

pub const DEFAULT_GRAVITY_MPS2: f64 = 7.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    /// Angled launch from the ground, constant gravity.
    #[default]
    Angled,
    /// Vertical launch from a podium, landing back on it.
    Podium,
    /// Vertical launch with gravity weakening with height.
    VariableGravity,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntegrationMethod {
    /// Closed form for constant gravity, integrator otherwise.
    #[default]
    Auto,
    /// Always integrate numerically.
    Numerical,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Integration {
    pub method: IntegrationMethod,
    /// Sub-step of the per-frame integrator.
    pub step_s: f64,
    /// Coarser sub-step used when estimating a variable-gravity envelope.
    pub estimate_step_s: f64,
    /// Hard ceiling on simulated time for any estimation loop.
    pub max_estimate_time_s: f64,
}

impl Default for Integration {
    fn default() -> Self {
        Self {
            method: IntegrationMethod::Auto,
            step_s: 0.001,
            estimate_step_s: 0.01,
            max_estimate_time_s: 60.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tolerances {
    pub ground_epsilon_m: f64,
    pub time_epsilon_s: f64,
    pub min_flight_duration_s: f64,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            ground_epsilon_m: 0.01,
            time_epsilon_s: 0.001,
            min_flight_duration_s: 0.1,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Limits {
    pub max_speed_mps: f64,
    pub min_mass_kg: f64,
    pub max_mass_kg: f64,
    pub max_height_m: f64,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_speed_mps: 50.0,
            min_mass_kg: 0.1,
            max_mass_kg: 100.0,
            max_height_m: 50.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub model: MotionModel,
    pub angles: AngleRanges,
    pub limits: Limits,
    pub tolerances: Tolerances,
    pub integration: Integration,
    pub defaults: SimulationParameters,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self::preset(Variant::Angled)
    }
}

impl SimulationConfig {
    pub fn preset(variant: Variant) -> Self {
        let vertical_only = AngleRanges::new(vec![[90.0, 90.0]]);
        let (model, angles, defaults) = match variant {
            Variant::Angled => (
                MotionModel {
                    gravity: GravityModel::Constant {
                        g: DEFAULT_GRAVITY_MPS2,
                    },
                    geometry: GeometryMode::Angled,
                    landing: LandingSurface::Ground,
                },
                AngleRanges::new(vec![[0.0, 25.0], [65.0, 75.0]]),
                SimulationParameters {
                    speed_mps: 2.5,
                    angle_deg: 25.0,
                    mass_kg: 1.0,
                    height_m: 0.0,
                },
            ),
            Variant::Podium => (
                MotionModel {
                    gravity: GravityModel::Constant {
                        g: DEFAULT_GRAVITY_MPS2,
                    },
                    geometry: GeometryMode::Vertical,
                    landing: LandingSurface::LaunchHeight,
                },
                vertical_only,
                SimulationParameters {
                    speed_mps: 2.5,
                    angle_deg: 90.0,
                    mass_kg: 1.0,
                    height_m: 2.5,
                },
            ),
            Variant::VariableGravity => (
                MotionModel {
                    gravity: GravityModel::InverseHeight {
                        strength: DEFAULT_GRAVITY_MPS2,
                        offset_m: 1.0,
                    },
                    geometry: GeometryMode::Vertical,
                    landing: LandingSurface::LaunchHeight,
                },
                vertical_only,
                SimulationParameters {
                    speed_mps: 2.5,
                    angle_deg: 90.0,
                    mass_kg: 1.0,
                    height_m: 0.0,
                },
            ),
        };

        Self {
            model,
            angles,
            limits: Limits::default(),
            tolerances: Tolerances::default(),
            integration: Integration::default(),
            defaults,
        }
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        log::info!("Loaded simulation config from {}", path.display());
        Ok(config)
    }

    /// Rejects values that would make gravity non-positive, loops unbounded
    /// or the angle policy meaningless.
    pub fn validate(&self) -> Result<()> {
        match self.model.gravity {
            GravityModel::Constant { g } => {
                if !(g.is_finite() && g > 0.0) {
                    return Err(invalid(format!("gravity g must be positive, got {g}")));
                }
            }
            GravityModel::InverseHeight { strength, offset_m } => {
                if !(strength.is_finite() && strength > 0.0) {
                    return Err(invalid(format!(
                        "gravity strength must be positive, got {strength}"
                    )));
                }
                if !(offset_m.is_finite() && offset_m > 0.0) {
                    return Err(invalid(format!(
                        "gravity offset_m must be positive, got {offset_m}"
                    )));
                }
            }
        }

        self.angles.validate()?;

        let i = &self.integration;
        for (label, value) in [
            ("integration.step_s", i.step_s),
            ("integration.estimate_step_s", i.estimate_step_s),
            ("integration.max_estimate_time_s", i.max_estimate_time_s),
            ("tolerances.min_flight_duration_s", self.tolerances.min_flight_duration_s),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(invalid(format!("{label} must be positive, got {value}")));
            }
        }
        for (label, value) in [
            ("tolerances.ground_epsilon_m", self.tolerances.ground_epsilon_m),
            ("tolerances.time_epsilon_s", self.tolerances.time_epsilon_s),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(invalid(format!("{label} cannot be negative, got {value}")));
            }
        }

        let l = &self.limits;
        if !(l.max_speed_mps >= 0.0 && l.max_height_m >= 0.0) {
            return Err(invalid("speed and height limits cannot be negative".to_string()));
        }
        if !(l.min_mass_kg > 0.0 && l.max_mass_kg >= l.min_mass_kg) {
            return Err(invalid(format!(
                "mass limits must satisfy 0 < min <= max, got [{}, {}]",
                l.min_mass_kg, l.max_mass_kg
            )));
        }

        Ok(())
    }
}

fn invalid(message: String) -> Error {
    Error::InvalidConfig(message)
}
