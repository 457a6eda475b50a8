use crate::core::ballistics::{integrated_landing_time, semi_implicit_step};
use crate::core::config::{Integration, Tolerances};
use crate::core::model::{FlightEnvelope, GravityModel, MotionModel, SimulationParameters};

/// Below this the launch is treated as having no vertical speed at all.
const STILL_VY_MPS: f64 = 1e-9;

/// Predicted peak height and flight duration for `params`.
///
/// Pure and cheap enough to call on every parameter change. The duration is
/// never shorter than `tolerances.min_flight_duration_s`.
pub fn estimate(
    params: &SimulationParameters,
    model: &MotionModel,
    integration: &Integration,
    tolerances: &Tolerances,
) -> FlightEnvelope {
    let envelope = match model.gravity {
        GravityModel::Constant { g } => closed_form(params, model, g, tolerances),
        GravityModel::InverseHeight { .. } => forward_simulated(params, model, integration, tolerances),
    };
    log::trace!(
        "envelope: peak {:.4} m, duration {:.4} s",
        envelope.peak_height_m,
        envelope.flight_duration_s
    );
    envelope
}

fn closed_form(
    params: &SimulationParameters,
    model: &MotionModel,
    g: f64,
    tolerances: &Tolerances,
) -> FlightEnvelope {
    let floor = tolerances.min_flight_duration_s;
    let (_, vy) = model.velocity_components(params);
    let h0 = params.height_m;
    let drop = h0 - model.landing_height(params);

    let peak_height_m = if vy > 0.0 { h0 + (vy * vy) / (2.0 * g) } else { h0 };

    let duration = if drop <= 0.0 {
        2.0 * vy.abs() / g
    } else {
        // Largest root of h0 + vy*t - g*t^2/2 = surface.
        let disc = vy * vy + 2.0 * g * drop;
        if disc < 0.0 {
            floor
        } else {
            (vy + disc.sqrt()) / g
        }
    };

    FlightEnvelope {
        peak_height_m,
        flight_duration_s: duration.max(floor),
    }
}

fn forward_simulated(
    params: &SimulationParameters,
    model: &MotionModel,
    integration: &Integration,
    tolerances: &Tolerances,
) -> FlightEnvelope {
    let floor = tolerances.min_flight_duration_s;
    let (_, vy) = model.velocity_components(params);
    if vy.abs() < STILL_VY_MPS {
        return FlightEnvelope {
            peak_height_m: params.height_m,
            flight_duration_s: floor,
        };
    }

    let peak_height_m = find_peak(params, model, integration);
    let flight_duration_s = find_landing(params, model, integration).max(floor);
    FlightEnvelope {
        peak_height_m,
        flight_duration_s,
    }
}

fn max_steps(integration: &Integration) -> u64 {
    (integration.max_estimate_time_s / integration.estimate_step_s).ceil() as u64
}

/// Highest point reached before vertical velocity turns non-positive.
fn find_peak(params: &SimulationParameters, model: &MotionModel, integration: &Integration) -> f64 {
    let (_, mut vy) = model.velocity_components(params);
    let mut height = params.height_m;
    let mut peak = height;

    for _ in 0..max_steps(integration) {
        if vy <= 0.0 {
            return peak;
        }
        (height, vy) = semi_implicit_step(height, vy, model.gravity, integration.estimate_step_s);
        peak = peak.max(height);
    }

    log::warn!(
        "peak search hit the {} s ceiling; using highest point seen ({peak:.3} m)",
        integration.max_estimate_time_s
    );
    peak
}

/// Time at which the mass first comes back to the landing surface. Searched
/// at the sampling step so the mass is already resting when a tick reaches
/// the predicted duration.
fn find_landing(params: &SimulationParameters, model: &MotionModel, integration: &Integration) -> f64 {
    integrated_landing_time(params, model, integration.step_s, integration.max_estimate_time_s)
        .unwrap_or_else(|| {
            log::warn!(
                "landing search hit the {} s ceiling; using it as the flight duration",
                integration.max_estimate_time_s
            );
            integration.max_estimate_time_s
        })
}
