//! Yard Siege headless runner
//!
//! Builds the demo block, lets the autopilot play at a fixed timestep and
//! logs what happens. Usage:
//!
//! ```text
//! yard-siege [seed] [seconds] [tuning.json] [settings.json]
//! ```

use std::error::Error;
use std::fs;

use glam::Vec2;

use yard_siege::consts::*;
use yard_siege::sim::{Aabb, GamePhase, GameState, SimEvent, StaticCollider, TickInput, tick};
use yard_siege::{HudSnapshot, Settings, Tuning};

/// Houses along both sides of the street, with fences and a few crates
fn build_block(state: &mut GameState) {
    let world = &mut state.world;
    for i in 0..4 {
        let x = -33.0 + i as f32 * 22.0;
        for z in [-20.0, 20.0] {
            world.add_static(StaticCollider::solid(Aabb::from_center(
                Vec2::new(x, z),
                Vec2::new(10.0, 8.0),
            )));
        }
    }
    for x in [-44.0, -22.0, 0.0, 22.0, 44.0] {
        world.add_static(StaticCollider::solid(Aabb::from_center(
            Vec2::new(x, -12.0),
            Vec2::new(4.0, 0.3),
        )));
    }
    for pos in [
        Vec2::new(-10.0, 5.0),
        Vec2::new(12.0, -4.0),
        Vec2::new(30.0, 6.0),
    ] {
        world.add_static(StaticCollider::destructible(
            Aabb::from_center(pos, Vec2::splat(1.2)),
            40.0,
        ));
    }
    log::info!("Built block with {} colliders", world.len());
}

/// Read and parse an optional JSON file
fn load<T>(
    path: Option<&String>,
    parse: fn(&str) -> Result<T, serde_json::Error>,
) -> Result<Option<T>, Box<dyn Error>> {
    match path {
        Some(path) => Ok(Some(parse(&fs::read_to_string(path)?)?)),
        None => Ok(None),
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    #[cfg(not(target_arch = "wasm32"))]
    env_logger::init();
    log::info!("Yard Siege (headless) starting...");

    let args: Vec<String> = std::env::args().skip(1).collect();
    let seed = args.first().and_then(|s| s.parse().ok()).unwrap_or(0xC0FFEE);
    let seconds: f32 = args.get(1).and_then(|s| s.parse().ok()).unwrap_or(120.0);
    let tuning = load(args.get(2), Tuning::from_json)?.unwrap_or_default();
    let settings = load(args.get(3), Settings::from_json)?.unwrap_or_default();

    let mut state = GameState::with_config(seed, tuning, settings);
    build_block(&mut state);

    let input = TickInput {
        idle_mode: true,
        ..TickInput::default()
    };

    // Uneven frame times to exercise the accumulator
    let frame_times = [0.016, 0.017, 0.033, 0.008, 0.016, 0.070];
    let mut accumulator = 0.0;
    let mut elapsed = 0.0;
    let mut frame = 0usize;

    while elapsed < seconds {
        let frame_dt: f32 = frame_times[frame % frame_times.len()];
        frame += 1;
        elapsed += frame_dt;
        accumulator += frame_dt.min(MAX_FRAME_DT);

        let mut substeps = 0;
        while accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            tick(&mut state, &input, SIM_DT);
            accumulator -= SIM_DT;
            substeps += 1;
        }

        for event in state.drain_events() {
            match event {
                SimEvent::WaveStarted { wave, enemies } => {
                    log::info!("[{elapsed:7.2}s] wave {wave} ({enemies} enemies)")
                }
                SimEvent::MissionComplete { label, points } => {
                    log::info!("[{elapsed:7.2}s] {label} +{points}")
                }
                SimEvent::PropDestroyed { collider, .. } => {
                    log::debug!("[{elapsed:7.2}s] prop {} destroyed", collider.0)
                }
                _ => {}
            }
        }

        if state.phase == GamePhase::GameOver {
            break;
        }
    }

    let hud = HudSnapshot::capture(&state);
    log::info!(
        "Finished after {elapsed:.1}s on wave {}: score {} (rank {}), {} kills, best combo {}",
        hud.wave,
        hud.score,
        hud.rank,
        state.score.kills(),
        state.score.max_combo()
    );
    println!("{}", serde_json::to_string_pretty(&hud)?);
    Ok(())
}
