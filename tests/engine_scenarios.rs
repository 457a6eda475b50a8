use std::cell::Cell;

use parabolic_motion::core::clock::{ClockState, TickOutcome};
use parabolic_motion::core::config::{SimulationConfig, Variant};
use parabolic_motion::core::engine::{
    FrameQueue, FrameScheduler, PresentationSink, SimulationEngine, TimeSource,
};
use parabolic_motion::core::model::{FlightEnvelope, MotionSample};

fn assert_close(actual: f64, expected: f64, tolerance: f64) {
    assert!(
        (actual - expected).abs() <= tolerance,
        "actual={actual}, expected={expected}, tolerance={tolerance}"
    );
}

struct ManualTime {
    now_s: Cell<f64>,
}

impl ManualTime {
    fn at(now_s: f64) -> Self {
        Self {
            now_s: Cell::new(now_s),
        }
    }

    fn advance(&self, dt: f64) {
        self.now_s.set(self.now_s.get() + dt);
    }
}

impl TimeSource for ManualTime {
    fn now_s(&self) -> f64 {
        self.now_s.get()
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Event {
    Sample(MotionSample),
    Envelope(FlightEnvelope),
    State(ClockState),
}

#[derive(Default)]
struct Recorder {
    events: Vec<Event>,
}

impl Recorder {
    fn samples(&self) -> Vec<MotionSample> {
        self.events
            .iter()
            .filter_map(|e| match e {
                Event::Sample(s) => Some(*s),
                _ => None,
            })
            .collect()
    }

    fn states(&self) -> Vec<ClockState> {
        self.events
            .iter()
            .filter_map(|e| match e {
                Event::State(s) => Some(*s),
                _ => None,
            })
            .collect()
    }
}

impl PresentationSink for Recorder {
    fn on_sample(&mut self, sample: &MotionSample) {
        self.events.push(Event::Sample(*sample));
    }

    fn on_envelope_changed(&mut self, envelope: &FlightEnvelope) {
        self.events.push(Event::Envelope(*envelope));
    }

    fn on_state_changed(&mut self, state: ClockState) {
        self.events.push(Event::State(state));
    }
}

fn run_to_completion(
    engine: &mut SimulationEngine,
    frames: &mut FrameQueue,
    time: &ManualTime,
    sink: &mut Recorder,
    frame_s: f64,
) -> usize {
    let mut ticks = 0;
    while !frames.is_empty() {
        assert!(ticks < 100_000, "flight never ended");
        time.advance(frame_s);
        engine.pump(frames, time, sink);
        ticks += 1;
    }
    ticks
}

#[test]
fn angled_flight_lands_on_ground_at_predicted_time() {
    let mut engine = SimulationEngine::new(&SimulationConfig::preset(Variant::Angled));
    let mut frames = FrameQueue::default();
    let time = ManualTime::at(100.0);
    let mut sink = Recorder::default();

    assert!(engine.start(time.now_s(), &mut frames, &mut sink));
    run_to_completion(&mut engine, &mut frames, &time, &mut sink, 1.0 / 240.0);

    let samples = sink.samples();
    let terminal = samples.last().copied().expect("terminal sample");
    assert_eq!(terminal.height_m, 0.0);
    assert_eq!(terminal.vertical_velocity_mps, 0.0);
    assert_close(terminal.elapsed_s, 0.302, 0.01);
    assert!(samples.iter().all(|s| s.height_m >= 0.0));

    let states = sink.states();
    assert!(matches!(states[0], ClockState::Running { epoch_s } if epoch_s == 100.0));
    assert_eq!(states.last(), Some(&ClockState::Idle));
    assert_eq!(states.len(), 2);
}

#[test]
fn landing_emits_sample_then_terminal_then_state() {
    let mut engine = SimulationEngine::new(&SimulationConfig::preset(Variant::Podium));
    let mut frames = FrameQueue::default();
    let time = ManualTime::at(0.0);
    let mut sink = Recorder::default();

    engine.start(0.0, &mut frames, &mut sink);
    sink.events.clear();
    time.advance(5.0);
    let outcome = engine.pump(&mut frames, &time, &mut sink);

    assert!(matches!(outcome, Some(TickOutcome::Landed(_))));
    assert_eq!(sink.events.len(), 3);
    assert!(matches!(sink.events[0], Event::Sample(_)));
    match sink.events[1] {
        Event::Sample(terminal) => assert_eq!(terminal.height_m, 2.5),
        ref other => panic!("expected terminal sample, got {other:?}"),
    }
    assert_eq!(sink.events[2], Event::State(ClockState::Idle));
    assert!(frames.is_empty());
}

#[test]
fn podium_flight_returns_to_launch_height() {
    let mut engine = SimulationEngine::new(&SimulationConfig::preset(Variant::Podium));
    let mut frames = FrameQueue::default();
    let time = ManualTime::at(0.0);
    let mut sink = Recorder::default();

    engine.start(0.0, &mut frames, &mut sink);
    assert_close(engine.envelope().peak_height_m, 2.946, 0.001);
    run_to_completion(&mut engine, &mut frames, &time, &mut sink, 1.0 / 60.0);

    let samples = sink.samples();
    let peak = samples.iter().map(|s| s.height_m).fold(0.0, f64::max);
    assert!(peak <= engine.envelope().peak_height_m + 1e-9);
    assert!(peak > 2.9);
    assert_close(engine.last_sample().elapsed_s, 0.714, 0.02);
    assert_eq!(engine.last_sample().height_m, 2.5);
}

#[test]
fn double_start_does_not_reset_elapsed_time() {
    let mut engine = SimulationEngine::new(&SimulationConfig::preset(Variant::Podium));
    let mut frames = FrameQueue::default();
    let time = ManualTime::at(0.0);
    let mut sink = Recorder::default();

    engine.start(time.now_s(), &mut frames, &mut sink);
    time.advance(0.05);
    engine.pump(&mut frames, &time, &mut sink);
    let first = engine.elapsed_s();

    assert!(!engine.start(time.now_s(), &mut frames, &mut sink));
    assert_eq!(frames.len(), 1);

    let mut previous = first;
    for _ in 0..5 {
        time.advance(0.05);
        engine.pump(&mut frames, &time, &mut sink);
        assert!(engine.elapsed_s() > previous);
        previous = engine.elapsed_s();
    }
    assert_close(previous, 0.3, 1e-9);
}

#[test]
fn reset_drops_pending_frame_and_stale_tickets() {
    let mut engine = SimulationEngine::new(&SimulationConfig::preset(Variant::Angled));
    let mut frames = FrameQueue::default();
    let time = ManualTime::at(0.0);
    let mut sink = Recorder::default();

    engine.start(0.0, &mut frames, &mut sink);
    time.advance(0.05);
    engine.pump(&mut frames, &time, &mut sink);

    // A frame that escaped the queue before the reset.
    let mut escaped = FrameQueue::default();
    let ticket = frames.take().expect("pending frame");
    escaped.request_frame(ticket);

    let rest = engine.reset(&mut frames, &mut sink);
    assert!(frames.is_empty());
    assert_eq!(rest, MotionSample::at_rest(0.0));
    assert_eq!(engine.state(), ClockState::Idle);

    let before = sink.events.len();
    time.advance(0.05);
    let outcome = engine.tick(ticket, time.now_s(), &mut frames, &mut sink);
    assert_eq!(outcome, TickOutcome::Stale);
    assert_eq!(sink.events.len(), before);
    assert!(frames.is_empty());
    assert_eq!(engine.last_sample(), rest);

    // Still stale after a fresh start with a new epoch.
    engine.start(time.now_s(), &mut frames, &mut sink);
    assert_eq!(
        engine.tick(ticket, time.now_s() + 0.01, &mut escaped, &mut sink),
        TickOutcome::Stale
    );
}

#[test]
fn variable_gravity_flight_terminates() {
    let mut engine = SimulationEngine::new(&SimulationConfig::preset(Variant::VariableGravity));
    let mut frames = FrameQueue::default();
    let time = ManualTime::at(0.0);
    let mut sink = Recorder::default();

    engine.start(0.0, &mut frames, &mut sink);
    let ticks = run_to_completion(&mut engine, &mut frames, &time, &mut sink, 1.0 / 60.0);
    assert!(ticks > 10);
    assert_eq!(engine.state(), ClockState::Idle);
    assert_eq!(engine.last_sample().height_m, 0.0);
    assert!(engine.last_sample().elapsed_s <= engine.envelope().flight_duration_s + 1.0 / 60.0);
}

#[test]
fn parameter_changes_publish_envelope_only() {
    let mut engine = SimulationEngine::new(&SimulationConfig::preset(Variant::Angled));
    let mut sink = Recorder::default();

    assert_eq!(engine.set_angle(45.0, &mut sink), 25.0);
    assert_eq!(engine.set_angle(80.0, &mut sink), 75.0);
    assert_eq!(engine.set_speed(3.0, &mut sink), 3.0);

    assert_eq!(sink.events.len(), 3);
    assert!(sink.events.iter().all(|e| matches!(e, Event::Envelope(_))));
    assert_eq!(engine.state(), ClockState::Idle);
    assert_eq!(engine.elapsed_s(), 0.0);
}

#[test]
fn start_refreshes_envelope_for_display() {
    let mut engine = SimulationEngine::new(&SimulationConfig::preset(Variant::Angled));
    let mut frames = FrameQueue::default();
    let mut sink = Recorder::default();

    engine.start(0.0, &mut frames, &mut sink);
    assert_eq!(sink.events[0], Event::Envelope(engine.envelope()));
    assert!(matches!(sink.events[1], Event::State(ClockState::Running { .. })));
}
