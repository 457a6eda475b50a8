use parabolic_motion::core::clock::TickOutcome;

use crate::controls::FrameActions;
use crate::state::{AppRuntime, FrameTime, Sliders, next_variant, prev_variant};

/// Applies button and hotkey actions. Returns `true` when the runtime was
/// rebuilt and the rest of the frame should be skipped.
pub(crate) fn apply_actions(state: &mut AppRuntime, actions: FrameActions) -> bool {
    if actions.prev_variant {
        state.switch_variant(prev_variant(state.variant));
        return true;
    }
    if actions.next_variant {
        state.switch_variant(next_variant(state.variant));
        return true;
    }

    if actions.reset {
        state.engine.reset(&mut state.frames, &mut state.view);
        state.view.trail.clear();
        state.view.status_line = "Reset".to_string();
    }

    if actions.start {
        let now = macroquad::time::get_time();
        if !state.engine.start(now, &mut state.frames, &mut state.view) {
            state.view.status_line = "Already in flight".to_string();
        }
    }

    false
}

/// Pushes slider movement into the parameter store while idle and writes the
/// accepted (clamped or snapped) values back. In flight the sliders are held
/// at the launch values.
pub(crate) fn sync_sliders(state: &mut AppRuntime) {
    let current = Sliders::from_engine(&state.engine);
    if state.view.running || state.sliders == current {
        state.sliders = current;
        return;
    }

    let wanted = state.sliders;
    let engine = &mut state.engine;
    let view = &mut state.view;
    if wanted.speed_mps != current.speed_mps {
        engine.set_speed(f64::from(wanted.speed_mps), view);
    }
    if wanted.angle_deg != current.angle_deg {
        engine.set_angle(f64::from(wanted.angle_deg), view);
    }
    if wanted.mass_kg != current.mass_kg {
        engine.set_mass(f64::from(wanted.mass_kg), view);
    }
    if wanted.height_m != current.height_m {
        let accepted = engine.set_height(f64::from(wanted.height_m), view);
        view.sample = engine.last_sample();
        view.status_line = format!("Height {accepted:.2} m");
    }
    state.sliders = Sliders::from_engine(&state.engine);
}

/// Runs the tick the engine scheduled for this display refresh.
pub(crate) fn step_active_flight(state: &mut AppRuntime) {
    if let Some(TickOutcome::Stale) = state
        .engine
        .pump(&mut state.frames, &FrameTime, &mut state.view)
    {
        log::debug!("skipped a stale frame");
    }
}
