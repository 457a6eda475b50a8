use parabolic_motion::core::clock::ClockState;
use parabolic_motion::core::config::{SimulationConfig, Variant};
use parabolic_motion::core::engine::{FrameQueue, PresentationSink, SimulationEngine, TimeSource};
use parabolic_motion::core::model::{FlightEnvelope, MotionSample};

use crate::constants::MAX_TRAIL_POINTS;

/// `macroquad::time::get_time`, seconds since the window opened.
pub(crate) struct FrameTime;

impl TimeSource for FrameTime {
    fn now_s(&self) -> f64 {
        macroquad::time::get_time()
    }
}

/// What the window shows, fed only through the engine's callbacks.
pub(crate) struct View {
    pub(crate) sample: MotionSample,
    pub(crate) envelope: FlightEnvelope,
    pub(crate) running: bool,
    pub(crate) trail: Vec<MotionSample>,
    pub(crate) status_line: String,
}

impl View {
    fn new(engine: &SimulationEngine) -> Self {
        Self {
            sample: engine.last_sample(),
            envelope: engine.envelope(),
            running: false,
            trail: Vec::new(),
            status_line: "Ready".to_string(),
        }
    }
}

impl PresentationSink for View {
    fn on_sample(&mut self, sample: &MotionSample) {
        self.sample = *sample;
        if self.running && self.trail.len() < MAX_TRAIL_POINTS {
            self.trail.push(*sample);
        }
    }

    fn on_envelope_changed(&mut self, envelope: &FlightEnvelope) {
        self.envelope = *envelope;
    }

    fn on_state_changed(&mut self, state: ClockState) {
        self.running = state.is_running();
        self.status_line = if self.running {
            self.trail.clear();
            "Launched".to_string()
        } else {
            format!("Landed after {:.3} s", self.sample.elapsed_s)
        };
    }
}

/// Slider positions. macroquad sliders work in `f32`.
#[derive(Clone, Copy, PartialEq)]
pub(crate) struct Sliders {
    pub(crate) speed_mps: f32,
    pub(crate) angle_deg: f32,
    pub(crate) mass_kg: f32,
    pub(crate) height_m: f32,
}

impl Sliders {
    pub(crate) fn from_engine(engine: &SimulationEngine) -> Self {
        let p = engine.params();
        Self {
            speed_mps: p.speed_mps as f32,
            angle_deg: p.angle_deg as f32,
            mass_kg: p.mass_kg as f32,
            height_m: p.height_m as f32,
        }
    }
}

pub(crate) struct AppRuntime {
    pub(crate) variant: Variant,
    /// Shown in the HUD and panel; a loaded config file is not a preset.
    pub(crate) label: &'static str,
    pub(crate) engine: SimulationEngine,
    pub(crate) frames: FrameQueue,
    pub(crate) view: View,
    pub(crate) sliders: Sliders,
    pub(crate) show_preview: bool,
}

impl AppRuntime {
    pub(crate) fn new(variant: Variant) -> Self {
        Self::with_config(variant, variant_name(variant), &SimulationConfig::preset(variant))
    }

    /// Runs `config` under the custom label. Variant cycling continues from
    /// the angled preset.
    pub(crate) fn custom(config: &SimulationConfig) -> Self {
        Self::with_config(Variant::Angled, CUSTOM_LABEL, config)
    }

    fn with_config(variant: Variant, label: &'static str, config: &SimulationConfig) -> Self {
        let engine = SimulationEngine::new(config);
        let view = View::new(&engine);
        let sliders = Sliders::from_engine(&engine);
        Self {
            variant,
            label,
            engine,
            frames: FrameQueue::default(),
            view,
            sliders,
            show_preview: true,
        }
    }

    pub(crate) fn switch_variant(&mut self, variant: Variant) {
        *self = Self::new(variant);
        self.view.status_line = format!("Loaded {}", variant_name(variant));
    }
}

pub(crate) const CUSTOM_LABEL: &str = "Custom config";

pub(crate) fn variant_name(variant: Variant) -> &'static str {
    match variant {
        Variant::Angled => "Angled launch",
        Variant::Podium => "Podium launch",
        Variant::VariableGravity => "Variable gravity",
    }
}

pub(crate) fn next_variant(variant: Variant) -> Variant {
    match variant {
        Variant::Angled => Variant::Podium,
        Variant::Podium => Variant::VariableGravity,
        Variant::VariableGravity => Variant::Angled,
    }
}

pub(crate) fn prev_variant(variant: Variant) -> Variant {
    match variant {
        Variant::Angled => Variant::VariableGravity,
        Variant::Podium => Variant::Angled,
        Variant::VariableGravity => Variant::Podium,
    }
}
