//! Hand gesture control application shell.
//!
//! The detector and OS injection layers are pluggable collaborators; this
//! binary wires the interpretation pipeline to a logging dispatcher and,
//! absent a live detector, exercises it with a synthetic replay so the
//! whole chain can be run and observed end to end.

use anyhow::Result;
use clap::Parser;
use hand_control::config::Config;
use hand_control::constants::{
    INDEX_DIP, INDEX_MCP, INDEX_PIP, INDEX_TIP, MIDDLE_TIP, NUM_HAND_LANDMARKS, THUMB_TIP, WRIST,
};
use hand_control::landmarks::{Handedness, Landmark, LandmarkSet};
use hand_control::pipeline::{ActionDispatcher, ActionEvent, LandmarkSource, Pipeline, TrackedFrame};
use log::info;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file (YAML format)
    #[arg(short = 'C', long)]
    config: Option<String>,

    /// Path to a saved calibration file (JSON format)
    #[arg(long)]
    calibration: Option<String>,

    /// Screen width in pixels
    #[arg(long, default_value = "1920")]
    screen_width: f64,

    /// Screen height in pixels
    #[arg(long, default_value = "1080")]
    screen_height: f64,

    /// Number of synthetic replay frames to run
    #[arg(long, default_value = "120")]
    frames: u32,

    /// Print the example configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,
}

/// Dispatcher that logs events instead of injecting OS input
struct LoggingDispatcher;

impl ActionDispatcher for LoggingDispatcher {
    fn dispatch(&mut self, event: &ActionEvent) -> hand_control::Result<()> {
        match (&event.gesture, event.cursor) {
            (hand_control::gesture::RecognizedGesture::Idle, _) => {}
            (gesture, Some((x, y))) => {
                info!("t={:.3}s {gesture:?} cursor=({x:.0}, {y:.0})", event.timestamp);
            }
            (gesture, None) => info!("t={:.3}s {gesture:?}", event.timestamp),
        }
        Ok(())
    }
}

/// Synthetic landmark stream standing in for a live detector: a pointing
/// hand sweeps across the frame and pinches index and middle together
/// near the end of the run
struct ReplaySource {
    frame: u32,
    total: u32,
}

impl LandmarkSource for ReplaySource {
    fn next_frame(&mut self) -> Option<TrackedFrame> {
        if self.frame >= self.total {
            return None;
        }
        let progress = f64::from(self.frame) / f64::from(self.total.max(1));
        let timestamp = f64::from(self.frame) / hand_control::constants::DEFAULT_FPS;
        self.frame += 1;
        Some(TrackedFrame {
            first: Some(replay_hand(progress)),
            second: None,
            timestamp,
        })
    }
}

fn replay_hand(progress: f64) -> LandmarkSet {
    let x = 0.2 + 0.6 * progress;
    let y = 0.5 - 0.2 * (progress * std::f64::consts::PI).sin();

    let mut points = vec![Landmark::new(x - 0.1, y + 0.35, 0.0); NUM_HAND_LANDMARKS];
    points[WRIST] = Landmark::new(x - 0.12, y + 0.40, 0.0);
    points[THUMB_TIP] = Landmark::new(x - 0.105, y + 0.28, 0.0);
    points[INDEX_MCP] = Landmark::new(x - 0.07, y + 0.30, 0.0);
    points[INDEX_PIP] = Landmark::new(x - 0.04, y + 0.20, 0.0);
    points[INDEX_DIP] = Landmark::new(x - 0.02, y + 0.10, 0.0);
    points[INDEX_TIP] = Landmark::new(x, y, 0.0);

    if progress > 0.9 {
        // Close middle onto index for a left-click pose
        points[MIDDLE_TIP] = Landmark::new(x + 0.001, y + 0.001, 0.0);
        let (pip, dip) = (points[INDEX_PIP], points[INDEX_DIP]);
        points[hand_control::constants::MIDDLE_PIP] = pip;
        points[hand_control::constants::MIDDLE_DIP] = dip;
    }

    LandmarkSet::new(points, Handedness::Right, 0.95)
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.debug {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("debug"));
    } else {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    }

    if args.print_config {
        print!("{}", hand_control::config::EXAMPLE_CONFIG);
        return Ok(());
    }

    info!("Hand Control");

    let config = if let Some(path) = &args.config {
        info!("Loading configuration from: {path}");
        Config::from_file(path)?
    } else {
        Config::default()
    };

    let mut pipeline = Pipeline::new(config, args.screen_width, args.screen_height)?;

    if let Some(path) = &args.calibration {
        match pipeline.mapper_mut().load_from_file(path) {
            Ok(()) => info!("Calibration loaded"),
            Err(e) => log::warn!("Could not load calibration ({e}); using fallback mapping"),
        }
    }

    info!("Running {} synthetic replay frames", args.frames);
    let mut source = ReplaySource {
        frame: 0,
        total: args.frames,
    };
    let mut dispatcher = LoggingDispatcher;
    pipeline.run(&mut source, &mut dispatcher);

    info!("Replay complete");
    Ok(())
}
