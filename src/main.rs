use std::cell::Cell;
use std::io::{self, Write};
use std::path::PathBuf;

use clap::Parser;
use parabolic_motion::core::ballistics::sample_trajectory;
use parabolic_motion::core::clock::ClockState;
use parabolic_motion::core::config::{SimulationConfig, Variant};
use parabolic_motion::core::engine::{FrameQueue, PresentationSink, SimulationEngine, TimeSource};
use parabolic_motion::core::error::{Error, Result};
use parabolic_motion::core::model::{GeometryMode, MotionSample};
use parabolic_motion::core::plots::{default_chart_path, render_flight_chart};

/// Predict and simulate the flight of a launched point mass.
///
/// With no launch values on the command line, prompts for them.
#[derive(Parser, Debug)]
#[command(name = "parabolic_motion", version, allow_negative_numbers = true)]
struct Cli {
    /// Built-in variant to start from
    #[arg(long, value_enum, default_value_t = Variant::Angled)]
    variant: Variant,

    /// TOML configuration file; replaces the variant preset
    #[arg(long, env = "PARABOLIC_CONFIG")]
    config: Option<PathBuf>,

    /// Launch speed (m/s)
    speed: Option<f64>,

    /// Launch angle (degrees)
    angle: Option<f64>,

    /// Launch height (m)
    height: Option<f64>,

    /// Mass (kg), shown only
    #[arg(long)]
    mass: Option<f64>,

    /// Print N+1 evenly spaced samples over the flight
    #[arg(long, value_name = "N")]
    samples: Option<usize>,

    /// Run the frame-driven simulation headlessly at the given frame rate
    #[arg(long, value_name = "FPS", num_args = 0..=1, default_missing_value = "60")]
    simulate: Option<f64>,

    /// Write a height/velocity chart (PNG or SVG)
    #[arg(long, value_name = "PATH", num_args = 0..=1)]
    plot: Option<Option<PathBuf>>,
}

#[derive(Clone, Copy, Debug)]
struct LaunchValues {
    speed_mps: Option<f64>,
    angle_deg: Option<f64>,
    height_m: Option<f64>,
}

fn require_finite(value: f64, label: &str) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(Error::InvalidInput(format!(
            "{label} must be a finite number, got {value}"
        )))
    }
}

fn read_f64(prompt: &str) -> Result<f64> {
    loop {
        print!("{prompt}");
        io::stdout()
            .flush()
            .map_err(|e| Error::InvalidInput(format!("Failed to flush stdout: {e}")))?;

        let mut line = String::new();
        let bytes = io::stdin()
            .read_line(&mut line)
            .map_err(|e| Error::InvalidInput(format!("Could not read input: {e}")))?;

        if bytes == 0 {
            return Err(Error::InvalidInput(
                "Input ended unexpectedly (EOF).".to_string(),
            ));
        }

        match line.trim().parse::<f64>() {
            Ok(v) if v.is_finite() => return Ok(v),
            _ => eprintln!("Please enter a valid number (e.g., 45 or 12.5)."),
        }
    }
}

fn get_inputs_from_user(geometry: GeometryMode) -> Result<LaunchValues> {
    let speed_mps = read_f64("Velocity (m/s): ")?;
    let angle_deg = match geometry {
        GeometryMode::Angled => Some(read_f64("Angle (degrees): ")?),
        GeometryMode::Vertical => None,
    };
    let height_m = read_f64("Height (m): ")?;
    Ok(LaunchValues {
        speed_mps: Some(speed_mps),
        angle_deg,
        height_m: Some(height_m),
    })
}

fn get_inputs_from_args(cli: &Cli) -> Result<LaunchValues> {
    Ok(LaunchValues {
        speed_mps: cli.speed.map(|v| require_finite(v, "speed")).transpose()?,
        angle_deg: cli.angle.map(|v| require_finite(v, "angle")).transpose()?,
        height_m: cli.height.map(|v| require_finite(v, "height")).transpose()?,
    })
}

fn report_adjusted(label: &str, requested: f64, accepted: f64) {
    if requested != accepted {
        println!("Note: {label} {requested} adjusted to {accepted}");
    }
}

fn apply_inputs(engine: &mut SimulationEngine, values: LaunchValues, mass: Option<f64>) -> Result<()> {
    if let Some(speed) = values.speed_mps {
        let accepted = engine.set_speed(speed, &mut ());
        report_adjusted("speed", speed, accepted);
    }
    if let Some(angle) = values.angle_deg {
        let accepted = engine.set_angle(angle, &mut ());
        report_adjusted("angle", angle, accepted);
    }
    if let Some(height) = values.height_m {
        let accepted = engine.set_height(height, &mut ());
        report_adjusted("height", height, accepted);
    }
    if let Some(mass) = mass {
        let mass = require_finite(mass, "mass")?;
        let accepted = engine.set_mass(mass, &mut ());
        report_adjusted("mass", mass, accepted);
    }
    Ok(())
}

fn print_summary(engine: &SimulationEngine) {
    let params = engine.params();
    let envelope = engine.envelope();
    let landed = engine.preview(envelope.flight_duration_s);

    println!(
        "\nLaunch: {:.2} m/s at {:.1} deg from {:.2} m ({:.2} kg)",
        params.speed_mps,
        engine.store().model().effective_angle_deg(params),
        params.height_m,
        params.mass_kg
    );
    println!("Peak height: {:.4} m", envelope.peak_height_m);
    println!("Time of flight: {:.4} s", envelope.flight_duration_s);
    println!("Horizontal distance: {:.4} m", landed.distance_m.max(0.0));
}

fn print_sample_row(sample: &MotionSample) {
    println!(
        "{:>8.4} {:>10.4} {:>10.4} {:>10.4} {:>10.4}",
        sample.elapsed_s,
        sample.height_m,
        sample.distance_m,
        sample.vertical_velocity_mps,
        sample.horizontal_velocity_mps
    );
}

fn print_sample_header() {
    println!(
        "{:>8} {:>10} {:>10} {:>10} {:>10}",
        "t (s)", "h (m)", "x (m)", "vy (m/s)", "vx (m/s)"
    );
}

fn print_samples(engine: &SimulationEngine, count: usize) {
    let store = engine.store();
    let samples = sample_trajectory(
        store.params(),
        store.model(),
        store.integration(),
        engine.envelope().flight_duration_s,
        count,
    );
    println!();
    print_sample_header();
    for sample in &samples {
        print_sample_row(sample);
    }
}

/// Frame clock that only moves when told to.
struct SyntheticTime {
    now_s: Cell<f64>,
}

impl TimeSource for SyntheticTime {
    fn now_s(&self) -> f64 {
        self.now_s.get()
    }
}

struct ConsoleSink;

impl PresentationSink for ConsoleSink {
    fn on_sample(&mut self, sample: &MotionSample) {
        print_sample_row(sample);
    }

    fn on_state_changed(&mut self, state: ClockState) {
        match state {
            ClockState::Running { .. } => println!("-- running"),
            ClockState::Idle => println!("-- landed"),
        }
    }
}

fn simulate(engine: &mut SimulationEngine, fps: f64) -> Result<()> {
    if !(fps.is_finite() && fps > 0.0) {
        return Err(Error::InvalidInput(format!(
            "frame rate must be positive, got {fps}"
        )));
    }

    let time = SyntheticTime {
        now_s: Cell::new(0.0),
    };
    let mut frames = FrameQueue::default();
    let mut sink = ConsoleSink;

    println!();
    print_sample_header();
    engine.start(time.now_s(), &mut frames, &mut sink);
    let mut ticks = 0u64;
    while !frames.is_empty() {
        ticks += 1;
        time.now_s.set(ticks as f64 / fps);
        engine.pump(&mut frames, &time, &mut sink);
    }
    println!("Frames: {ticks}");
    Ok(())
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => SimulationConfig::load(path)?,
        None => SimulationConfig::preset(cli.variant),
    };
    let mut engine = SimulationEngine::new(&config);

    let values = if cli.speed.is_none() && cli.angle.is_none() && cli.height.is_none() {
        get_inputs_from_user(config.model.geometry)?
    } else {
        get_inputs_from_args(&cli)?
    };
    apply_inputs(&mut engine, values, cli.mass)?;

    print_summary(&engine);

    if let Some(count) = cli.samples {
        print_samples(&engine, count);
    }

    if let Some(fps) = cli.simulate {
        simulate(&mut engine, fps)?;
    }

    if let Some(plot) = &cli.plot {
        let path = plot
            .clone()
            .unwrap_or_else(|| default_chart_path(&PathBuf::from(".")));
        render_flight_chart(engine.store(), &path)?;
        println!("Chart: {}", path.display());
    }

    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}
