//! The owned simulation value a host drives frame by frame.
//!
//! A host supplies three collaborators: a [`TimeSource`], a
//! [`FrameScheduler`] that runs queued ticks on its next display refresh, and
//! a [`PresentationSink`] that draws whatever the engine emits.
//!
//! ```
//! use parabolic_motion::core::config::{SimulationConfig, Variant};
//! use parabolic_motion::core::engine::{FrameQueue, SimulationEngine};
//!
//! let mut engine = SimulationEngine::new(&SimulationConfig::preset(Variant::Angled));
//! let mut frames = FrameQueue::default();
//! engine.start(0.0, &mut frames, &mut ());
//!
//! let mut now = 0.0;
//! while let Some(ticket) = frames.take() {
//!     now += 1.0 / 60.0;
//!     engine.tick(ticket, now, &mut frames, &mut ());
//! }
//! assert_eq!(engine.last_sample().height_m, 0.0);
//! ```

use std::collections::VecDeque;

use crate::core::ballistics;
use crate::core::clock::{ClockState, FrameTicket, SimulationClock, TickOutcome};
use crate::core::config::SimulationConfig;
use crate::core::model::{FlightEnvelope, MotionSample, SimulationParameters};
use crate::core::params::ParameterStore;

/// Monotonic seconds.
pub trait TimeSource {
    fn now_s(&self) -> f64;
}

/// Receives everything the engine wants drawn.
pub trait PresentationSink {
    fn on_sample(&mut self, _sample: &MotionSample) {}
    fn on_envelope_changed(&mut self, _envelope: &FlightEnvelope) {}
    fn on_state_changed(&mut self, _state: ClockState) {}
}

impl PresentationSink for () {}

/// The host's per-frame scheduling primitive.
pub trait FrameScheduler {
    /// Run `ticket` on the next display refresh.
    fn request_frame(&mut self, ticket: FrameTicket);
    /// Drop every frame requested so far.
    fn cancel_pending(&mut self);
}

/// Pending frames, drained by the host once per refresh.
#[derive(Clone, Debug, Default)]
pub struct FrameQueue {
    pending: VecDeque<FrameTicket>,
}

impl FrameQueue {
    pub fn take(&mut self) -> Option<FrameTicket> {
        self.pending.pop_front()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl FrameScheduler for FrameQueue {
    fn request_frame(&mut self, ticket: FrameTicket) {
        self.pending.push_back(ticket);
    }

    fn cancel_pending(&mut self) {
        self.pending.clear();
    }
}

#[derive(Clone, Debug)]
pub struct SimulationEngine {
    store: ParameterStore,
    clock: SimulationClock,
    last_sample: MotionSample,
}

impl SimulationEngine {
    pub fn new(config: &SimulationConfig) -> Self {
        let store = ParameterStore::new(config);
        let last_sample = MotionSample::at_rest(store.params().height_m);
        Self {
            store,
            clock: SimulationClock::new(),
            last_sample,
        }
    }

    pub fn store(&self) -> &ParameterStore {
        &self.store
    }

    pub fn params(&self) -> &SimulationParameters {
        self.store.params()
    }

    pub fn envelope(&self) -> FlightEnvelope {
        self.store.envelope()
    }

    pub fn state(&self) -> ClockState {
        self.clock.state()
    }

    pub fn elapsed_s(&self) -> f64 {
        self.clock.elapsed_s()
    }

    pub fn last_sample(&self) -> MotionSample {
        self.last_sample
    }

    /// Motion at `elapsed_s` for the current parameters, without touching
    /// the clock.
    pub fn preview(&self, elapsed_s: f64) -> MotionSample {
        ballistics::sample(
            self.store.params(),
            self.store.model(),
            self.store.integration(),
            elapsed_s,
        )
    }

    pub fn set_speed(&mut self, speed_mps: f64, sink: &mut impl PresentationSink) -> f64 {
        let accepted = self.store.set_speed(speed_mps);
        self.announce_params("speed", speed_mps, accepted, sink);
        accepted
    }

    pub fn set_angle(&mut self, angle_deg: f64, sink: &mut impl PresentationSink) -> f64 {
        let accepted = self.store.set_angle(angle_deg);
        self.announce_params("angle", angle_deg, accepted, sink);
        accepted
    }

    pub fn set_mass(&mut self, mass_kg: f64, sink: &mut impl PresentationSink) -> f64 {
        let accepted = self.store.set_mass(mass_kg);
        self.announce_params("mass", mass_kg, accepted, sink);
        accepted
    }

    pub fn set_height(&mut self, height_m: f64, sink: &mut impl PresentationSink) -> f64 {
        let accepted = self.store.set_height(height_m);
        if !self.clock.is_running() {
            self.last_sample = MotionSample::at_rest(accepted);
        }
        self.announce_params("height", height_m, accepted, sink);
        accepted
    }

    fn announce_params(
        &self,
        label: &str,
        requested: f64,
        accepted: f64,
        sink: &mut impl PresentationSink,
    ) {
        if requested != accepted {
            log::debug!("{label} {requested} adjusted to {accepted}");
        }
        sink.on_envelope_changed(&self.store.envelope());
    }

    /// Starts a flight at `now_s` and schedules its first tick. Returns
    /// `false`, changing nothing, if a flight is already running.
    pub fn start(
        &mut self,
        now_s: f64,
        scheduler: &mut impl FrameScheduler,
        sink: &mut impl PresentationSink,
    ) -> bool {
        let Some(ticket) = self.clock.start(now_s) else {
            return false;
        };
        scheduler.cancel_pending();

        let envelope = self.store.refresh_envelope();
        sink.on_envelope_changed(&envelope);
        sink.on_state_changed(self.clock.state());
        scheduler.request_frame(ticket);
        true
    }

    /// Runs one scheduled frame. The sample is always emitted before the
    /// landing check; a landing additionally emits the terminal sample and
    /// the switch to idle.
    pub fn tick(
        &mut self,
        ticket: FrameTicket,
        now_s: f64,
        scheduler: &mut impl FrameScheduler,
        sink: &mut impl PresentationSink,
    ) -> TickOutcome {
        let Some(sample) = self.clock.advance(ticket, now_s, &self.store) else {
            return TickOutcome::Stale;
        };
        self.last_sample = sample;
        sink.on_sample(&sample);

        match self.clock.settle(&sample, &self.store) {
            Some(terminal) => {
                self.last_sample = terminal;
                sink.on_sample(&terminal);
                sink.on_state_changed(self.clock.state());
                TickOutcome::Landed(terminal)
            }
            None => {
                scheduler.request_frame(ticket);
                TickOutcome::Flying(sample)
            }
        }
    }

    /// Runs the next frame waiting in `frames`, if there is one.
    pub fn pump(
        &mut self,
        frames: &mut FrameQueue,
        time: &impl TimeSource,
        sink: &mut impl PresentationSink,
    ) -> Option<TickOutcome> {
        let ticket = frames.take()?;
        Some(self.tick(ticket, time.now_s(), frames, sink))
    }

    /// Back to idle with the mass resting at its launch height. Pending
    /// frames are dropped and any that escaped become stale.
    pub fn reset(
        &mut self,
        scheduler: &mut impl FrameScheduler,
        sink: &mut impl PresentationSink,
    ) -> MotionSample {
        scheduler.cancel_pending();
        let was_running = self.clock.is_running();
        let rest = self.clock.reset(self.store.params().height_m);
        self.last_sample = rest;
        sink.on_sample(&rest);
        if was_running {
            sink.on_state_changed(self.clock.state());
        }
        rest
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::Variant;

    #[derive(Default)]
    struct Counts {
        samples: usize,
        envelopes: usize,
        states: Vec<ClockState>,
    }

    impl PresentationSink for Counts {
        fn on_sample(&mut self, _sample: &MotionSample) {
            self.samples += 1;
        }

        fn on_envelope_changed(&mut self, _envelope: &FlightEnvelope) {
            self.envelopes += 1;
        }

        fn on_state_changed(&mut self, state: ClockState) {
            self.states.push(state);
        }
    }

    #[test]
    fn setters_publish_envelope_without_touching_clock() {
        let mut engine = SimulationEngine::new(&SimulationConfig::preset(Variant::Angled));
        let mut sink = Counts::default();
        assert_eq!(engine.set_angle(45.0, &mut sink), 25.0);
        engine.set_speed(4.0, &mut sink);
        assert_eq!(sink.envelopes, 2);
        assert!(sink.states.is_empty());
        assert_eq!(engine.state(), ClockState::Idle);
    }

    #[test]
    fn reset_while_idle_emits_no_state_change() {
        let mut engine = SimulationEngine::new(&SimulationConfig::preset(Variant::Podium));
        let mut frames = FrameQueue::default();
        let mut sink = Counts::default();
        let rest = engine.reset(&mut frames, &mut sink);
        assert_eq!(rest.height_m, 2.5);
        assert_eq!(sink.samples, 1);
        assert!(sink.states.is_empty());
    }

    #[test]
    fn start_schedules_exactly_one_frame() {
        let mut engine = SimulationEngine::new(&SimulationConfig::preset(Variant::Angled));
        let mut frames = FrameQueue::default();
        assert!(engine.start(0.0, &mut frames, &mut ()));
        assert!(!engine.start(0.1, &mut frames, &mut ()));
        assert_eq!(frames.len(), 1);
    }

    #[test]
    fn height_change_while_idle_moves_rest_sample() {
        let mut engine = SimulationEngine::new(&SimulationConfig::preset(Variant::Podium));
        engine.set_height(4.0, &mut ());
        assert_eq!(engine.last_sample().height_m, 4.0);
        assert_eq!(engine.preview(0.0).height_m, 4.0);
    }
}
