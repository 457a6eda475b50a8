use crate::core::config::{Integration, IntegrationMethod};
use crate::core::model::{GravityModel, MotionModel, MotionSample, SimulationParameters};

const STEP_SNAP: f64 = 1e-9;

/// Motion of the mass `elapsed_s` seconds after launch.
///
/// Pure: every call recomputes from `t = 0`. Constant gravity uses the closed
/// form unless the configuration forces the numerical integrator; gravity that
/// depends on height always integrates.
pub fn sample(
    params: &SimulationParameters,
    model: &MotionModel,
    integration: &Integration,
    elapsed_s: f64,
) -> MotionSample {
    match (model.gravity, integration.method) {
        (GravityModel::Constant { g }, IntegrationMethod::Auto) => {
            closed_form_sample(params, model, g, elapsed_s)
        }
        _ => integrated_sample(params, model, integration.step_s, elapsed_s),
    }
}

/// Largest non-negative time at which the constant-gravity trajectory meets
/// the landing surface.
pub fn closed_form_landing_time(params: &SimulationParameters, model: &MotionModel, g: f64) -> f64 {
    let (_, vy) = model.velocity_components(params);
    let drop = params.height_m - model.landing_height(params);
    let disc = vy * vy + 2.0 * g * drop;
    if disc < 0.0 {
        return 0.0;
    }
    ((vy + disc.sqrt()) / g).max(0.0)
}

pub fn closed_form_sample(
    params: &SimulationParameters,
    model: &MotionModel,
    g: f64,
    elapsed_s: f64,
) -> MotionSample {
    let t = elapsed_s.max(0.0);
    let (vx, vy) = model.velocity_components(params);
    let surface = model.landing_height(params);
    let t_land = closed_form_landing_time(params, model, g);

    if t > 0.0 && t >= t_land {
        return MotionSample {
            elapsed_s: t,
            height_m: surface,
            distance_m: vx * t_land,
            vertical_velocity_mps: 0.0,
            horizontal_velocity_mps: 0.0,
        };
    }

    let y = params.height_m + (vy * t) - (0.5 * g * t * t);
    MotionSample {
        elapsed_s: t,
        height_m: y.max(surface),
        distance_m: vx * t,
        vertical_velocity_mps: vy - g * t,
        horizontal_velocity_mps: vx,
    }
}

/// One semi-implicit Euler sub-step: velocity first, from gravity at the
/// current height, then height from the new velocity.
pub fn semi_implicit_step(height_m: f64, vy: f64, gravity: GravityModel, dt: f64) -> (f64, f64) {
    let next_vy = vy - gravity.at(height_m) * dt;
    (height_m + next_vy * dt, next_vy)
}

/// Fixed-step numerical solution, recomputed from launch on every call.
///
/// Stops at the first sub-step that would reach the landing surface and
/// reports the mass at rest there.
pub fn integrated_sample(
    params: &SimulationParameters,
    model: &MotionModel,
    step_s: f64,
    elapsed_s: f64,
) -> MotionSample {
    let target = elapsed_s.max(0.0);
    let (vx, vy0) = model.velocity_components(params);
    let surface = model.landing_height(params);

    // A target on a sub-step boundary counts as that whole step.
    let full_steps = (target / step_s + STEP_SNAP).floor() as u64;
    let remainder = target - (full_steps as f64 * step_s);

    let mut height = params.height_m;
    let mut vy = vy0;
    let mut time = 0.0;

    let steps = (0..full_steps)
        .map(|_| step_s)
        .chain((remainder > 0.0).then_some(remainder));
    for dt in steps {
        let (next_height, next_vy) = semi_implicit_step(height, vy, model.gravity, dt);
        time += dt;
        if next_height <= surface {
            return MotionSample {
                elapsed_s: target,
                height_m: surface,
                distance_m: vx * time,
                vertical_velocity_mps: 0.0,
                horizontal_velocity_mps: 0.0,
            };
        }
        height = next_height;
        vy = next_vy;
    }

    MotionSample {
        elapsed_s: target,
        height_m: height,
        distance_m: vx * target,
        vertical_velocity_mps: vy,
        horizontal_velocity_mps: vx,
    }
}

/// Time of the first sub-step, taken the same way [`integrated_sample`] takes
/// them, that reaches the landing surface. `None` if that does not happen
/// within `max_time_s`.
pub fn integrated_landing_time(
    params: &SimulationParameters,
    model: &MotionModel,
    step_s: f64,
    max_time_s: f64,
) -> Option<f64> {
    let (_, mut vy) = model.velocity_components(params);
    let surface = model.landing_height(params);
    let mut height = params.height_m;

    let max_steps = (max_time_s / step_s).ceil() as u64;
    for i in 1..=max_steps {
        (height, vy) = semi_implicit_step(height, vy, model.gravity, step_s);
        if height <= surface {
            return Some(i as f64 * step_s);
        }
    }
    None
}

/// Evenly spaced samples over `[0, duration_s]`, used for previews and charts.
pub fn sample_trajectory(
    params: &SimulationParameters,
    model: &MotionModel,
    integration: &Integration,
    duration_s: f64,
    samples: usize,
) -> Vec<MotionSample> {
    let sample_count = samples.max(2);
    (0..=sample_count)
        .map(|i| {
            let t = (i as f64 * duration_s) / sample_count as f64;
            sample(params, model, integration, t)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::{GeometryMode, LandingSurface};

    const EARTH_GRAVITY_MPS2: f64 = 9.8;

    fn assert_close(actual: f64, expected: f64, tolerance: f64) {
        assert!(
            (actual - expected).abs() <= tolerance,
            "actual={actual}, expected={expected}, tolerance={tolerance}"
        );
    }

    fn angled() -> MotionModel {
        MotionModel {
            gravity: GravityModel::Constant { g: 7.0 },
            geometry: GeometryMode::Angled,
            landing: LandingSurface::Ground,
        }
    }

    fn podium() -> MotionModel {
        MotionModel {
            gravity: GravityModel::Constant { g: 7.0 },
            geometry: GeometryMode::Vertical,
            landing: LandingSurface::LaunchHeight,
        }
    }

    #[test]
    fn launch_state_is_reported_at_time_zero() {
        let params = SimulationParameters {
            speed_mps: 10.0,
            angle_deg: 65.0,
            mass_kg: 1.0,
            height_m: 1.5,
        };
        let s = closed_form_sample(&params, &angled(), 7.0, 0.0);
        assert_eq!(s.height_m, 1.5);
        assert_close(s.vertical_velocity_mps, 10.0 * 65f64.to_radians().sin(), 1e-12);
        assert_eq!(s.distance_m, 0.0);
    }

    #[test]
    fn computes_known_range_for_flat_ground() {
        let params = SimulationParameters {
            speed_mps: 10.0,
            angle_deg: 45.0,
            mass_kg: 1.0,
            height_m: 0.0,
        };
        let model = MotionModel {
            gravity: GravityModel::Constant {
                g: EARTH_GRAVITY_MPS2,
            },
            ..angled()
        };
        let t_land = closed_form_landing_time(&params, &model, EARTH_GRAVITY_MPS2);
        assert_close(t_land, 1.4431, 0.001);

        let landed = closed_form_sample(&params, &model, EARTH_GRAVITY_MPS2, 5.0);
        assert_close(landed.distance_m, 10.2041, 0.001);
        assert_eq!(landed.height_m, 0.0);
        assert_eq!(landed.vertical_velocity_mps, 0.0);
    }

    #[test]
    fn podium_launch_comes_back_to_launch_height() {
        let params = SimulationParameters {
            speed_mps: 2.5,
            angle_deg: 90.0,
            mass_kg: 1.0,
            height_m: 2.5,
        };
        let t_land = closed_form_landing_time(&params, &podium(), 7.0);
        assert_close(t_land, 2.0 * 2.5 / 7.0, 1e-12);

        let apex = closed_form_sample(&params, &podium(), 7.0, 2.5 / 7.0);
        assert_close(apex.height_m, 2.5 + 2.5 * 2.5 / 14.0, 1e-9);
        assert_close(apex.vertical_velocity_mps, 0.0, 1e-12);

        let after = closed_form_sample(&params, &podium(), 7.0, 3.0);
        assert_eq!(after.height_m, 2.5);
    }

    #[test]
    fn height_never_goes_below_ground() {
        let params = SimulationParameters {
            speed_mps: 3.0,
            angle_deg: 20.0,
            mass_kg: 1.0,
            height_m: 0.0,
        };
        for i in 0..200 {
            let s = closed_form_sample(&params, &angled(), 7.0, i as f64 * 0.01);
            assert!(s.height_m >= 0.0);
        }
    }

    #[test]
    fn integrator_tracks_closed_form_under_constant_gravity() {
        let params = SimulationParameters {
            speed_mps: 2.5,
            angle_deg: 25.0,
            mass_kg: 1.0,
            height_m: 0.0,
        };
        for t in [0.0, 0.05, 0.1, 0.15, 0.2, 0.25] {
            let exact = closed_form_sample(&params, &angled(), 7.0, t);
            let numeric = integrated_sample(&params, &angled(), 0.001, t);
            assert_close(numeric.height_m, exact.height_m, 1e-3);
            assert_close(numeric.vertical_velocity_mps, exact.vertical_velocity_mps, 1e-9);
            assert_close(numeric.distance_m, exact.distance_m, 1e-12);
        }
    }

    #[test]
    fn numerical_method_is_honoured_for_constant_gravity() {
        let params = SimulationParameters {
            speed_mps: 2.5,
            angle_deg: 25.0,
            mass_kg: 1.0,
            height_m: 0.0,
        };
        let numerical = Integration {
            method: IntegrationMethod::Numerical,
            ..Integration::default()
        };
        for t in [0.0, 0.05, 0.1, 0.15, 0.2, 0.25] {
            let exact = closed_form_sample(&params, &angled(), 7.0, t);
            let forced = sample(&params, &angled(), &numerical, t);
            assert_eq!(forced, integrated_sample(&params, &angled(), numerical.step_s, t));
            assert_close(forced.height_m, exact.height_m, 1e-3);
            assert_close(forced.vertical_velocity_mps, exact.vertical_velocity_mps, 1e-9);
        }

        let landed = sample(&params, &angled(), &numerical, 1.0);
        assert_eq!(landed.height_m, 0.0);
        assert_eq!(landed.vertical_velocity_mps, 0.0);
    }

    #[test]
    fn landing_time_matches_integrated_rest() {
        let params = SimulationParameters {
            speed_mps: 2.5,
            angle_deg: 90.0,
            mass_kg: 1.0,
            height_m: 0.0,
        };
        let model = MotionModel {
            gravity: GravityModel::InverseHeight {
                strength: 7.0,
                offset_m: 1.0,
            },
            geometry: GeometryMode::Vertical,
            landing: LandingSurface::LaunchHeight,
        };
        let t_land = integrated_landing_time(&params, &model, 0.001, 60.0).expect("lands");
        assert_eq!(integrated_sample(&params, &model, 0.001, t_land).height_m, 0.0);
        assert!(integrated_sample(&params, &model, 0.001, t_land - 0.001).height_m > 0.0);
        assert_eq!(integrated_landing_time(&params, &model, 0.001, 0.1), None);
    }

    #[test]
    fn integrator_rests_on_surface_after_landing() {
        let params = SimulationParameters {
            speed_mps: 2.5,
            angle_deg: 90.0,
            mass_kg: 1.0,
            height_m: 0.0,
        };
        let model = MotionModel {
            gravity: GravityModel::InverseHeight {
                strength: 7.0,
                offset_m: 1.0,
            },
            geometry: GeometryMode::Vertical,
            landing: LandingSurface::Ground,
        };
        let a = integrated_sample(&params, &model, 0.001, 5.0);
        let b = integrated_sample(&params, &model, 0.001, 9.0);
        assert_eq!(a.height_m, 0.0);
        assert_eq!(a.vertical_velocity_mps, 0.0);
        assert_eq!(a.distance_m, b.distance_m);
    }

    #[test]
    fn weaker_gravity_aloft_flies_higher() {
        let params = SimulationParameters {
            speed_mps: 5.0,
            angle_deg: 90.0,
            mass_kg: 1.0,
            height_m: 0.0,
        };
        let constant = MotionModel {
            gravity: GravityModel::Constant { g: 7.0 },
            geometry: GeometryMode::Vertical,
            landing: LandingSurface::Ground,
        };
        let variable = MotionModel {
            gravity: GravityModel::InverseHeight {
                strength: 7.0,
                offset_m: 1.0,
            },
            ..constant
        };
        let t = 5.0 / 7.0;
        let h_const = integrated_sample(&params, &constant, 0.001, t).height_m;
        let h_var = integrated_sample(&params, &variable, 0.001, t).height_m;
        assert!(h_var > h_const);
    }

    #[test]
    fn trajectory_spans_requested_duration() {
        let params = SimulationParameters::default();
        let integration = Integration::default();
        let points = sample_trajectory(&params, &angled(), &integration, 0.3, 10);
        assert_eq!(points.len(), 11);
        assert_eq!(points[0].elapsed_s, 0.0);
        assert_close(points[10].elapsed_s, 0.3, 1e-12);
    }
}
