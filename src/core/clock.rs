use crate::core::ballistics;
use crate::core::model::MotionSample;
use crate::core::params::ParameterStore;

/// Whether a flight is in progress. `epoch_s` is the time-source reading at
/// which the current run started.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ClockState {
    Idle,
    Running { epoch_s: f64 },
}

impl ClockState {
    pub fn is_running(&self) -> bool {
        matches!(self, Self::Running { .. })
    }
}

/// Permission to run one tick of a particular run. Tickets from a run that
/// has since ended or been reset are rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameTicket {
    run_id: u64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TickOutcome {
    Flying(MotionSample),
    /// Carries the terminal sample, already clamped onto the landing surface.
    Landed(MotionSample),
    Stale,
}

/// Maps wall-clock readings to simulated time and decides when a flight ends.
#[derive(Clone, Debug)]
pub struct SimulationClock {
    state: ClockState,
    run_id: u64,
    elapsed_s: f64,
}

impl Default for SimulationClock {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulationClock {
    pub fn new() -> Self {
        Self {
            state: ClockState::Idle,
            run_id: 0,
            elapsed_s: 0.0,
        }
    }

    pub fn state(&self) -> ClockState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state.is_running()
    }

    pub fn elapsed_s(&self) -> f64 {
        self.elapsed_s
    }

    /// Begins a run at `now_s`. Returns `None` if one is already running;
    /// the running flight keeps its epoch.
    pub fn start(&mut self, now_s: f64) -> Option<FrameTicket> {
        if self.is_running() {
            log::debug!("start ignored: flight already running");
            return None;
        }
        self.run_id += 1;
        self.state = ClockState::Running { epoch_s: now_s };
        self.elapsed_s = 0.0;
        log::debug!("run {} started at {now_s:.4}", self.run_id);
        Some(FrameTicket {
            run_id: self.run_id,
        })
    }

    /// Computes this frame's sample. `None` means the ticket is stale and
    /// nothing may be applied.
    pub fn advance(
        &mut self,
        ticket: FrameTicket,
        now_s: f64,
        store: &ParameterStore,
    ) -> Option<MotionSample> {
        let ClockState::Running { epoch_s } = self.state else {
            log::debug!("dropping tick for run {}: clock idle", ticket.run_id);
            return None;
        };
        if ticket.run_id != self.run_id {
            log::debug!(
                "dropping tick for run {}: current run is {}",
                ticket.run_id,
                self.run_id
            );
            return None;
        }

        self.elapsed_s = (now_s - epoch_s).max(0.0);
        let sample = ballistics::sample(
            store.params(),
            store.model(),
            store.integration(),
            self.elapsed_s,
        );
        log::trace!(
            "t={:.4} h={:.4} x={:.4}",
            sample.elapsed_s,
            sample.height_m,
            sample.distance_m
        );
        Some(sample)
    }

    /// Ends the flight if `sample` is past the predicted duration or resting
    /// on the landing surface, returning the ground-clamped terminal sample.
    pub fn settle(&mut self, sample: &MotionSample, store: &ParameterStore) -> Option<MotionSample> {
        let tolerances = store.tolerances();
        let surface = store.model().landing_height(store.params());
        let elapsed = sample.elapsed_s;

        let out_of_time = elapsed >= store.envelope().flight_duration_s;
        let on_surface = sample.height_m - surface <= tolerances.ground_epsilon_m
            && sample.vertical_velocity_mps <= 0.0
            && elapsed > tolerances.time_epsilon_s;
        if !(out_of_time || on_surface) {
            return None;
        }

        self.state = ClockState::Idle;
        log::debug!("run {} landed after {elapsed:.4} s", self.run_id);
        Some(sample.clamped_to(surface))
    }

    pub fn tick(&mut self, ticket: FrameTicket, now_s: f64, store: &ParameterStore) -> TickOutcome {
        match self.advance(ticket, now_s, store) {
            None => TickOutcome::Stale,
            Some(sample) => match self.settle(&sample, store) {
                Some(terminal) => TickOutcome::Landed(terminal),
                None => TickOutcome::Flying(sample),
            },
        }
    }

    /// Returns to idle and invalidates every outstanding ticket.
    pub fn reset(&mut self, height_m: f64) -> MotionSample {
        self.run_id += 1;
        self.state = ClockState::Idle;
        self.elapsed_s = 0.0;
        log::debug!("clock reset");
        MotionSample::at_rest(height_m)
    }
}
