#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Headless command-line runner for Elemental Siege.

use std::{path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use clap::Parser;
use elemental_siege_core::{Element, TimeScale, Vec2};
use elemental_siege_engine::{PointerEvent, Simulation, SimulationConfig};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Runs a simulation for a fixed number of frames and reports the outcome.
#[derive(Parser, Debug)]
#[command(name = "elemental-siege")]
#[command(about = "Headless Elemental Siege tower-defense simulation")]
struct Args {
    /// TOML configuration file; defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of frames to simulate.
    #[arg(long, default_value_t = 3_600)]
    frames: u32,

    /// Wall-clock duration of one frame in milliseconds.
    #[arg(long, default_value_t = 16)]
    frame_ms: u64,

    /// Time scale multiplier: 1, 2 or 4.
    #[arg(long, default_value = "1", value_parser = parse_speed)]
    speed: TimeScale,

    /// Tower to place before the first frame, as `element:x,y`. Repeatable.
    #[arg(long = "tower", value_parser = parse_tower)]
    towers: Vec<TowerOrder>,

    /// Print the final frame as JSON instead of a summary.
    #[arg(long)]
    json: bool,
}

#[derive(Clone, Copy, Debug)]
struct TowerOrder {
    element: Element,
    position: Vec2,
}

fn parse_speed(value: &str) -> Result<TimeScale, String> {
    value
        .parse::<u32>()
        .ok()
        .and_then(TimeScale::from_factor)
        .ok_or_else(|| format!("unsupported speed `{value}`, expected 1, 2 or 4"))
}

fn parse_tower(value: &str) -> Result<TowerOrder, String> {
    let (name, coordinates) = value
        .split_once(':')
        .ok_or_else(|| format!("expected `element:x,y`, found `{value}`"))?;
    let element = Element::ALL
        .into_iter()
        .find(|element| element.name().eq_ignore_ascii_case(name.trim()))
        .ok_or_else(|| format!("unknown element `{name}`"))?;
    let (x, y) = coordinates
        .split_once(',')
        .ok_or_else(|| format!("expected `x,y`, found `{coordinates}`"))?;
    let parse = |axis: &str| {
        axis.trim()
            .parse::<f32>()
            .map_err(|error| format!("invalid coordinate `{axis}`: {error}"))
    };
    Ok(TowerOrder {
        element,
        position: Vec2::new(parse(x)?, parse(y)?),
    })
}

fn place(simulation: &mut Simulation, order: TowerOrder) {
    if simulation.snapshot().state.placing != Some(order.element) {
        let _ = simulation.toggle_placement(order.element);
    }
    let _ = simulation.handle_pointer(PointerEvent::Down(order.position));
    if simulation.snapshot().state.placing.is_some() {
        warn!(
            element = order.element.name(),
            x = order.position.x,
            y = order.position.y,
            reason = simulation.announcement(),
            "tower order skipped"
        );
        let _ = simulation.toggle_placement(order.element);
    }
}

/// Entry point for the Elemental Siege command-line interface.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => SimulationConfig::load(path)
            .with_context(|| format!("failed to load configuration {}", path.display()))?,
        None => SimulationConfig::default(),
    };

    let mut simulation = Simulation::new(config);
    println!("{}", simulation.announcement());

    let _ = simulation.start_run();
    while simulation.snapshot().state.time_scale != args.speed {
        let _ = simulation.cycle_time_scale();
    }
    for order in &args.towers {
        place(&mut simulation, *order);
    }

    let frame_dt = Duration::from_millis(args.frame_ms);
    let mut announcement = simulation.announcement().to_owned();
    for _ in 0..args.frames {
        let _ = simulation.step(frame_dt);
        if simulation.announcement() != announcement {
            announcement = simulation.announcement().to_owned();
            info!(%announcement, "announcement");
        }
        if simulation.snapshot().state.game_over {
            break;
        }
    }

    let frame = simulation.snapshot();
    if args.json {
        let rendered =
            serde_json::to_string_pretty(&frame).context("failed to serialize final frame")?;
        println!("{rendered}");
    } else {
        let state = &frame.state;
        println!(
            "wave {} | gold {} | diamonds {} | hearts {} | towers {} | enemies {}{}",
            state.wave,
            state.gold,
            state.diamonds,
            state.hearts,
            frame.towers.len(),
            frame.enemies.len(),
            if state.game_over { " | GAME OVER" } else { "" },
        );
        println!("{}", frame.announcement);
    }
    Ok(())
}
