//! Headless autoplay harness
//!
//! Runs one level with a trivial bot that swims toward the nearest
//! uncollected treasure. Useful for smoke-testing the simulation and for
//! reproducing a run from a seed:
//!
//! ```text
//! reef-raider [seed] [config.json]
//! ```

use rand::Rng;

use reef_raider::config::LevelConfig;
use reef_raider::consts::TICK_HZ;
use reef_raider::sim::{PickupKind, SimEvent, SimPhase, SimState, TickInput, countdown_tick, tick};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let seed: u64 = args
        .next()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| rand::rng().random());
    let config = match args.next() {
        Some(path) => match std::fs::read_to_string(&path) {
            Ok(json) => LevelConfig::from_json(&json),
            Err(err) => {
                log::warn!("cannot read {path}: {err}, using defaults");
                LevelConfig::default()
            }
        },
        None => LevelConfig::default(),
    };

    log::info!("seed {seed}");
    let mut state = SimState::new(config, seed);

    while state.phase == SimPhase::CountingDown {
        log::info!("countdown: {}", state.countdown_display());
        countdown_tick(&mut state);
    }

    // Fixed-step loop, no rendering: at most one simulated hour
    let max_ticks = 60 * 60 * TICK_HZ as u64;
    while state.phase != SimPhase::Ended && state.time_ticks < max_ticks {
        let input = steer(&state);
        tick(&mut state, &input);
        for event in state.drain_events() {
            match event {
                SimEvent::PickupCollected { kind, value } => {
                    log::debug!("collected {kind:?} ({value})");
                }
                SimEvent::HazardContact => log::info!("hit a mine"),
                SimEvent::Caught => log::info!("caught by a pursuer"),
                SimEvent::LevelComplete => log::info!("level complete"),
                SimEvent::TimeUp => log::info!("out of time"),
            }
        }
    }

    println!(
        "score {} | treasures {}/{} | {} ticks simulated",
        state.score,
        state.collected_treasures,
        state.config.total_treasures,
        state.time_ticks,
    );
}

/// Head straight for the nearest uncollected treasure
fn steer(state: &SimState) -> TickInput {
    let here = state.player.rect.center();
    let target = state
        .pickups
        .iter()
        .filter(|p| p.kind == PickupKind::Treasure && !p.collected)
        .map(|p| p.rect.center())
        .min_by(|a, b| here.distance(*a).total_cmp(&here.distance(*b)));

    match target {
        Some(t) => {
            let d = t - here;
            TickInput {
                move_x: if d.x.abs() > 1.0 { d.x.signum() } else { 0.0 },
                move_y: if d.y.abs() > 1.0 { d.y.signum() } else { 0.0 },
                quit: false,
            }
        }
        None => TickInput::default(),
    }
}
