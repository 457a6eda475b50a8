use serde::{Deserialize, Serialize};

use crate::core::config::{Integration, Limits, SimulationConfig, Tolerances};
use crate::core::envelope;
use crate::core::error::{Error, Result};
use crate::core::model::{FlightEnvelope, MotionModel, SimulationParameters};

/// Allowed launch angles as sorted, disjoint `[lo, hi]` degree ranges.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AngleRanges {
    pub ranges: Vec<[f64; 2]>,
}

impl AngleRanges {
    pub fn new(ranges: Vec<[f64; 2]>) -> Self {
        Self { ranges }
    }

    pub fn validate(&self) -> Result<()> {
        if self.ranges.is_empty() {
            return Err(Error::InvalidConfig(
                "at least one allowed angle range is required".to_string(),
            ));
        }
        for [lo, hi] in &self.ranges {
            if !(lo.is_finite() && hi.is_finite() && lo <= hi) {
                return Err(Error::InvalidConfig(format!(
                    "angle range [{lo}, {hi}] is inverted or not finite"
                )));
            }
        }
        for pair in self.ranges.windows(2) {
            if pair[0][1] >= pair[1][0] {
                return Err(Error::InvalidConfig(format!(
                    "angle ranges must be sorted and disjoint: [{}, {}] then [{}, {}]",
                    pair[0][0], pair[0][1], pair[1][0], pair[1][1]
                )));
            }
        }
        Ok(())
    }

    pub fn min(&self) -> f64 {
        self.ranges.first().map_or(0.0, |r| r[0])
    }

    pub fn max(&self) -> f64 {
        self.ranges.last().map_or(0.0, |r| r[1])
    }

    pub fn contains(&self, angle_deg: f64) -> bool {
        self.ranges
            .iter()
            .any(|[lo, hi]| (*lo..=*hi).contains(&angle_deg))
    }

    /// Nearest allowed angle to `angle_deg`.
    ///
    /// Inside a gap the value goes to the lower range's upper bound up to and
    /// including the gap midpoint, and to the upper range's lower bound past
    /// it. Non-finite requests land on the overall minimum.
    pub fn snap(&self, angle_deg: f64) -> f64 {
        if self.ranges.is_empty() {
            return angle_deg;
        }
        if !angle_deg.is_finite() {
            return self.min();
        }
        if angle_deg <= self.min() {
            return self.min();
        }
        if angle_deg >= self.max() {
            return self.max();
        }
        if self.contains(angle_deg) {
            return angle_deg;
        }

        for pair in self.ranges.windows(2) {
            let below_hi = pair[0][1];
            let above_lo = pair[1][0];
            if angle_deg > below_hi && angle_deg < above_lo {
                let midpoint = (below_hi + above_lo) / 2.0;
                return if angle_deg <= midpoint { below_hi } else { above_lo };
            }
        }
        angle_deg
    }
}

/// Current, validated launch parameters and the envelope they imply.
///
/// Every setter clamps its input, stores it and re-estimates the envelope
/// before returning the accepted value.
#[derive(Clone, Debug)]
pub struct ParameterStore {
    params: SimulationParameters,
    model: MotionModel,
    angles: AngleRanges,
    limits: Limits,
    integration: Integration,
    tolerances: Tolerances,
    envelope: FlightEnvelope,
}

impl ParameterStore {
    pub fn new(config: &SimulationConfig) -> Self {
        let mut store = Self {
            params: config.defaults,
            model: config.model,
            angles: config.angles.clone(),
            limits: config.limits,
            integration: config.integration,
            tolerances: config.tolerances,
            envelope: FlightEnvelope {
                peak_height_m: config.defaults.height_m,
                flight_duration_s: config.tolerances.min_flight_duration_s,
            },
        };
        let defaults = config.defaults;
        store.params.speed_mps = store.clamp_speed(defaults.speed_mps);
        store.params.angle_deg = store.angles.snap(defaults.angle_deg);
        store.params.mass_kg = store.clamp_mass(defaults.mass_kg);
        store.params.height_m = store.clamp_height(defaults.height_m);
        store.refresh_envelope();
        store
    }

    pub fn params(&self) -> &SimulationParameters {
        &self.params
    }

    pub fn model(&self) -> &MotionModel {
        &self.model
    }

    pub fn integration(&self) -> &Integration {
        &self.integration
    }

    pub fn tolerances(&self) -> &Tolerances {
        &self.tolerances
    }

    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    pub fn angles(&self) -> &AngleRanges {
        &self.angles
    }

    pub fn envelope(&self) -> FlightEnvelope {
        self.envelope
    }

    pub fn set_speed(&mut self, speed_mps: f64) -> f64 {
        self.params.speed_mps = self.clamp_speed(speed_mps);
        self.refresh_envelope();
        self.params.speed_mps
    }

    pub fn set_angle(&mut self, angle_deg: f64) -> f64 {
        self.params.angle_deg = self.angles.snap(angle_deg);
        self.refresh_envelope();
        self.params.angle_deg
    }

    pub fn set_mass(&mut self, mass_kg: f64) -> f64 {
        self.params.mass_kg = self.clamp_mass(mass_kg);
        self.refresh_envelope();
        self.params.mass_kg
    }

    pub fn set_height(&mut self, height_m: f64) -> f64 {
        self.params.height_m = self.clamp_height(height_m);
        self.refresh_envelope();
        self.params.height_m
    }

    pub fn refresh_envelope(&mut self) -> FlightEnvelope {
        self.envelope = envelope::estimate(
            &self.params,
            &self.model,
            &self.integration,
            &self.tolerances,
        );
        self.envelope
    }

    fn clamp_speed(&self, speed_mps: f64) -> f64 {
        clamp_finite(speed_mps, 0.0, self.limits.max_speed_mps)
    }

    fn clamp_mass(&self, mass_kg: f64) -> f64 {
        clamp_finite(mass_kg, self.limits.min_mass_kg, self.limits.max_mass_kg)
    }

    fn clamp_height(&self, height_m: f64) -> f64 {
        clamp_finite(height_m, 0.0, self.limits.max_height_m)
    }
}

/// `value.clamp(lo, hi)`, with NaN mapped to `lo`.
fn clamp_finite(value: f64, lo: f64, hi: f64) -> f64 {
    if value.is_nan() { lo } else { value.clamp(lo, hi) }
}
