//! Replays a scripted drag against the launcher state machine without a
//! window or physics and prints every transition as one JSON object per line.
//!
//! ```text
//! launch_timeline --press-at 0.2 --release-at 1.0 --until 3.0
//! ```

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use bevy::math::Vec2;
use clap::Parser;
use serde::Serialize;

use slingshot::core::config::GameConfig;
use slingshot::gameplay::launcher::recording::{RecordingWorld, ViewportProjector};
use slingshot::gameplay::launcher::{
    LaunchController, LaunchEvent, LaunchSettings, PointerContact,
};

#[derive(Parser, Debug)]
#[command(name = "launch_timeline", version, about)]
struct Args {
    /// Optional config file; launcher delays and pivot are read from it.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Override `launcher.detach_delay`.
    #[arg(long)]
    detach_delay: Option<f32>,

    /// Override `launcher.respawn_delay`.
    #[arg(long)]
    respawn_delay: Option<f32>,

    /// Time the pointer goes down, seconds.
    #[arg(long, default_value_t = 0.2)]
    press_at: f64,

    /// Time the pointer comes up, seconds.
    #[arg(long, default_value_t = 1.0)]
    release_at: f64,

    /// Screen point held while pressed (x y, pixels, origin top-left).
    #[arg(long, num_args = 2, value_names = ["X", "Y"], default_values_t = [400.0, 300.0])]
    drag_to: Vec<f32>,

    /// Viewport size in pixels used to project the drag point.
    #[arg(long, num_args = 2, value_names = ["W", "H"], default_values_t = [1280.0, 720.0])]
    viewport: Vec<f32>,

    /// Simulated duration, seconds.
    #[arg(long, default_value_t = 3.0)]
    until: f64,

    /// Fixed step, seconds.
    #[arg(long, default_value_t = 1.0 / 60.0)]
    step: f32,
}

#[derive(Serialize)]
struct TimelineRecord {
    time: f64,
    event: &'static str,
    ball: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    position: Option<[f32; 2]>,
    kinematic: bool,
    tethered: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    if args.step.is_nan() || args.step <= 0.0 {
        bail!("--step must be > 0");
    }
    if args.release_at < args.press_at {
        bail!("--release-at must not be earlier than --press-at");
    }

    let mut cfg = match &args.config {
        Some(path) => GameConfig::load_from_file(path)
            .map_err(anyhow::Error::msg)
            .with_context(|| format!("loading {}", path.display()))?,
        None => GameConfig::default(),
    };
    if let Some(d) = args.detach_delay {
        cfg.launcher.detach_delay = d;
    }
    if let Some(d) = args.respawn_delay {
        cfg.launcher.respawn_delay = d;
    }
    for w in cfg.validate() {
        eprintln!("config warning: {w}");
    }

    let settings = LaunchSettings::from(&cfg.launcher);
    let projector = ViewportProjector::new(Vec2::new(args.viewport[0], args.viewport[1]), Vec2::ZERO);
    let drag_to = Vec2::new(args.drag_to[0], args.drag_to[1]);

    let mut world = RecordingWorld::new(settings.pivot);
    let mut controller = LaunchController::new(settings);
    let stdout = io::stdout();
    let mut out = stdout.lock();

    let events = controller.init(&mut world);
    emit(&mut out, &world, &events)?;

    let mut now = 0.0_f64;
    while now < args.until {
        now += f64::from(args.step);
        let pointer = if now >= args.press_at && now < args.release_at {
            PointerContact::pressed_at(drag_to)
        } else {
            PointerContact::released()
        };
        let events = controller.tick(args.step, &pointer, &projector, &mut world);
        emit(&mut out, &world, &events)?;
    }
    out.flush()?;
    Ok(())
}

fn emit(out: &mut impl Write, world: &RecordingWorld, events: &[LaunchEvent<u32>]) -> Result<()> {
    for ev in events {
        let ball = ev.ball();
        let state = world.ball(ball);
        let record = TimelineRecord {
            time: ev.time(),
            event: ev.kind(),
            ball,
            position: state.map(|b| b.position.to_array()),
            kinematic: state.is_some_and(|b| b.kinematic),
            tethered: state.is_some_and(|b| b.spring_target.is_some()),
        };
        serde_json::to_writer(&mut *out, &record)?;
        writeln!(out)?;
    }
    Ok(())
}
