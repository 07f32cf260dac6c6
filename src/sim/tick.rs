//! Fixed timestep simulation clock
//!
//! Sequences countdown -> running -> exploding/celebrating -> ended, and
//! owns the per-tick update order while running:
//! modifier decay -> input displacement -> hazards -> pursuers -> player
//! movement -> pickups -> terminal checks. Later entities observe earlier
//! entities' already-updated positions within the same tick.
//!
//! The countdown runs on a separate one-second step (`countdown_tick`);
//! the per-frame `tick` does nothing until it finishes.

use std::collections::HashSet;

use glam::Vec2;
use rand::Rng;

use super::grid::{LevelGeometry, Scenery};
use super::placement;
use super::pursuer;
use super::rect::Rect;
use super::state::{
    Confetti, Debris, FloatingReward, Mine, Pickup, PickupKind, Player, Pursuer, SimEvent,
    SimPhase, SimState,
};
use super::{hazard, player};
use crate::consts::*;

/// Input commands for a single tick
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Normalized horizontal input, -1..1
    pub move_x: f32,
    /// Normalized vertical input, -1..1
    pub move_y: f32,
    /// External quit: force the level to Ended immediately
    pub quit: bool,
}

/// One step of the pre-game countdown, driven at one-second granularity.
/// The visible 3..1 count is followed by one "ready" step; level setup
/// happens when that step elapses.
pub fn countdown_tick(state: &mut SimState) {
    if state.phase != SimPhase::CountingDown {
        return;
    }
    state.countdown_steps = state.countdown_steps.saturating_sub(1);
    if state.countdown_steps == 0 {
        setup_level(state);
        state.phase = SimPhase::Running;
    }
}

/// Advance the simulation by one fixed timestep
pub fn tick(state: &mut SimState, input: &TickInput) {
    if input.quit {
        state.abort();
        return;
    }

    match state.phase {
        // No entity updates during the countdown; only the one-second
        // countdown_tick runs. Ended is terminal.
        SimPhase::CountingDown | SimPhase::Ended => return,
        SimPhase::Running => running_tick(state, input),
        SimPhase::Exploding => explosion_tick(state),
        SimPhase::Celebrating => celebration_tick(state),
    }

    // Floating reward markers drift up and fade
    for reward in &mut state.rewards {
        reward.pos.y += reward.vy;
        reward.alpha -= 0.012;
    }
    state.rewards.retain(|r| r.alpha > 0.0);

    state.shake.update(&mut state.rng);
    state.camera.follow(
        &state.player.rect,
        Vec2::new(WORLD_WIDTH, WORLD_HEIGHT),
        state.viewport,
        state.shake.offset,
    );
}

fn running_tick(state: &mut SimState, input: &TickInput) {
    state.time_ticks += 1;
    let world = Vec2::new(WORLD_WIDTH, WORLD_HEIGHT);

    // 1. Timed speed modifiers decay
    state.player.decay_modifiers();

    // 2. Displacement from input (applied in step 5)
    let delta = player::displacement(&state.player, input.move_x, input.move_y);

    // 3. Patrol hazards
    let mine_contact = hazard::update_mines(
        &mut state.mines,
        &state.geometry.walls,
        world,
        &state.player.rect,
    );

    // 4. Pursuers
    let caught = pursuer::update_pursuers(
        &mut state.pursuers,
        &state.player.rect,
        &state.geometry.walls,
        &state.geometry.anchors,
        world,
        &mut state.rng,
    );

    // 5. Player movement, per axis against walls
    player::apply_movement(&mut state.player, delta, &state.geometry.walls, world);

    // 6. Pickups
    collect_pickups(state);

    // 7. Terminal checks, in priority order
    if state.config.total_treasures > 0 && state.collected_treasures >= state.config.total_treasures
    {
        start_celebration(state);
        return;
    }
    state.time_left_ticks = state.time_left_ticks.saturating_sub(1);
    if state.time_left_ticks == 0 {
        log::info!("time up: score {}", state.score);
        state.push_event(SimEvent::TimeUp);
        state.phase = SimPhase::Ended;
        return;
    }
    if let Some(contact) = mine_contact {
        state.mines.remove(contact.mine_index);
        state.push_event(SimEvent::HazardContact);
        start_explosion(state);
        return;
    }
    if caught {
        state.push_event(SimEvent::Caught);
        start_explosion(state);
    }
}

/// Player-vs-pickup overlap checks. At most one chest (real or fake)
/// registers per tick; boosts and bubbles all trigger.
fn collect_pickups(state: &mut SimState) {
    let player_rect = state.player.rect;
    let mut chest_done = false;

    for i in 0..state.pickups.len() {
        let pickup = &state.pickups[i];
        if pickup.collected || !pickup.rect.overlaps(&player_rect) {
            continue;
        }
        let kind = pickup.kind;
        let value = pickup.value;
        let pos = Vec2::new(pickup.rect.center().x, pickup.rect.y);

        match kind {
            PickupKind::Treasure | PickupKind::FakeTreasure if chest_done => continue,
            PickupKind::Treasure => {
                chest_done = true;
                state.pickups[i].collected = true;
                state.score += value;
                state.collected_treasures += 1;
                state.rewards.push(FloatingReward {
                    pos,
                    label: format!("+{value}"),
                    alpha: 1.0,
                    vy: -1.3,
                });
            }
            PickupKind::FakeTreasure => {
                chest_done = true;
                state.pickups[i].collected = true;
                state.player.slow_ticks = SLOW_TICKS;
                state.rewards.push(FloatingReward {
                    pos,
                    label: "Slowed!".to_string(),
                    alpha: 1.0,
                    vy: -1.3,
                });
            }
            PickupKind::Boost => {
                state.pickups[i].collected = true;
                state.player.boost_ticks = BOOST_TICKS;
            }
            PickupKind::TimerBonus => {
                state.pickups[i].collected = true;
                state.time_left_ticks = state
                    .time_left_ticks
                    .saturating_add(value.saturating_mul(TICK_HZ));
                state.rewards.push(FloatingReward {
                    pos,
                    label: format!("+{value}s"),
                    alpha: 1.0,
                    vy: -1.3,
                });
            }
        }
        state.push_event(SimEvent::PickupCollected { kind, value });
    }
}

/// One-time level setup on entry to Running
fn setup_level(state: &mut SimState) {
    let world = Vec2::new(WORLD_WIDTH, WORLD_HEIGHT);
    let mut geo = LevelGeometry::build(
        &state.config.maze_pattern,
        WORLD_WIDTH,
        WORLD_HEIGHT,
        &mut state.rng,
    );
    if geo.anchors.is_empty() {
        // A pattern with zero open cells still has to be playable
        log::warn!("pattern has no open cells, degrading to fallback anchor");
        geo = LevelGeometry::fallback(WORLD_WIDTH, WORLD_HEIGHT);
    }

    // Player spawns at the 'X' cell, else a random open anchor
    let spawn_center = geo.spawn_center.unwrap_or_else(|| {
        let anchor = geo.anchors[state.rng.random_range(0..geo.anchors.len())];
        anchor + Vec2::splat(CHEST_SIZE / 2.0)
    });
    state.player = Player::new();
    state.player.rect = Rect::new(
        spawn_center.x - PLAYER_WIDTH / 2.0,
        spawn_center.y - PLAYER_HEIGHT / 2.0,
        PLAYER_WIDTH,
        PLAYER_HEIGHT,
    );
    state.player.rect.clamp_to_world(world.x, world.y);

    state.pursuers = geo
        .pursuer_spawns
        .iter()
        .map(|&center| {
            let target = pursuer::random_roam_target(&geo.anchors, world, &mut state.rng);
            Pursuer::spawn_at(center, target)
        })
        .collect();

    // Chests avoid the spawn neighborhood unless that starves the pool
    let required_min = 8.max(state.config.total_treasures + state.config.total_fake_chests);
    let candidates = placement::exclusion_filter(
        &geo.anchors,
        state.player.rect.center(),
        SPAWN_EXCLUDE_RADIUS,
        required_min,
    );

    let mut used: HashSet<usize> = HashSet::new();
    let mut pickups: Vec<Pickup> = Vec::new();
    const VALUES: [u32; 3] = [5, 10, 15];

    for idx in placement::spread_indices(
        &geo.anchors,
        &candidates,
        state.config.total_treasures,
        CHEST_MIN_DISTANCE,
        &used,
        &mut state.rng,
    ) {
        used.insert(idx);
        pickups.push(Pickup {
            rect: Rect::new(geo.anchors[idx].x, geo.anchors[idx].y, CHEST_SIZE, CHEST_SIZE),
            kind: PickupKind::Treasure,
            value: VALUES[state.rng.random_range(0..VALUES.len())],
            collected: false,
        });
    }
    for idx in placement::spread_indices(
        &geo.anchors,
        &candidates,
        state.config.total_fake_chests,
        FAKE_CHEST_MIN_DISTANCE,
        &used,
        &mut state.rng,
    ) {
        used.insert(idx);
        pickups.push(Pickup {
            rect: Rect::new(geo.anchors[idx].x, geo.anchors[idx].y, CHEST_SIZE, CHEST_SIZE),
            kind: PickupKind::FakeTreasure,
            value: 0,
            collected: false,
        });
    }

    // Boosts and timer bonuses draw from the full pool, minus used anchors
    let all: Vec<usize> = (0..geo.anchors.len()).collect();
    for idx in placement::spread_indices(
        &geo.anchors,
        &all,
        state.config.total_seaweeds,
        0.0,
        &used,
        &mut state.rng,
    ) {
        used.insert(idx);
        pickups.push(Pickup {
            rect: Rect::new(
                geo.anchors[idx].x,
                geo.anchors[idx].y,
                SEAWEED_WIDTH,
                SEAWEED_HEIGHT,
            ),
            kind: PickupKind::Boost,
            value: 0,
            collected: false,
        });
    }
    for idx in placement::spread_indices(
        &geo.anchors,
        &all,
        state.config.total_bubbles,
        0.0,
        &used,
        &mut state.rng,
    ) {
        used.insert(idx);
        pickups.push(Pickup {
            rect: Rect::new(geo.anchors[idx].x, geo.anchors[idx].y, BUBBLE_SIZE, BUBBLE_SIZE),
            kind: PickupKind::TimerBonus,
            value: VALUES[state.rng.random_range(0..VALUES.len())],
            collected: false,
        });
    }

    state.mines = placement::mine_positions(&geo, state.config.total_mines, &mut state.rng)
        .into_iter()
        .map(|pos| Mine::spawn_at(pos, &mut state.rng))
        .collect();

    state.scenery = Scenery::generate(
        state.config.total_bubbles,
        state.config.total_seaweeds,
        world,
        &mut state.rng,
    );

    state.pickups = pickups;
    state.time_left_ticks = state.config.game_time_seconds.saturating_mul(TICK_HZ);
    state.score = 0;
    state.collected_treasures = 0;
    state.debris.clear();
    state.confetti.clear();
    state.rewards.clear();

    log::info!(
        "level ready: {} anchors, {} walls, {} pickups, {} mines, {} pursuers{}",
        geo.anchors.len(),
        geo.walls.len(),
        state.pickups.len(),
        state.mines.len(),
        state.pursuers.len(),
        if geo.degraded { " (degraded)" } else { "" },
    );
    state.geometry = geo;
}

fn start_explosion(state: &mut SimState) {
    log::info!("player down: score {}", state.score);
    state.phase = SimPhase::Exploding;
    state.explosion_ticks = EXPLOSION_TICKS;
    state.shake.start(SHAKE_TICKS, SHAKE_MAGNITUDE);

    let center = state.player.rect.center();
    state.debris = (0..DEBRIS_PIECES)
        .map(|i| {
            let angle = std::f32::consts::TAU * (i as f32 / DEBRIS_PIECES as f32)
                + state.rng.random_range(-0.15..0.15);
            let speed = state.rng.random_range(6.0..10.0);
            Debris {
                part: i,
                pos: center,
                vel: Vec2::new(angle.cos(), angle.sin()) * speed,
                rot: state.rng.random_range(0.0..std::f32::consts::TAU),
                rot_speed: (state.rng.random::<f32>() - 0.5) * 0.12,
            }
        })
        .collect();
}

fn explosion_tick(state: &mut SimState) {
    for debris in &mut state.debris {
        debris.pos += debris.vel;
        debris.rot += debris.rot_speed;
    }
    state.explosion_ticks = state.explosion_ticks.saturating_sub(1);
    if state.explosion_ticks == 0 {
        state.phase = SimPhase::Ended;
    }
}

fn start_celebration(state: &mut SimState) {
    log::info!("all treasures collected: score {}", state.score);
    state.push_event(SimEvent::LevelComplete);
    state.phase = SimPhase::Celebrating;
    state.celebration_ticks = CELEBRATION_TICKS;
    state.jump_frame = 0;
    state.jump_count = 0;

    // Confetti rains in from the top edge of the current view
    let origin = state.camera.origin;
    let viewport = state.viewport;
    state.confetti = (0..160)
        .map(|_| Confetti {
            pos: Vec2::new(
                origin.x + state.rng.random_range(0.0..viewport.x.max(1.0)),
                origin.y - 20.0 + state.rng.random_range(0.0..30.0),
            ),
            vel: Vec2::new(
                state.rng.random_range(-1.5..1.5),
                state.rng.random_range(2.0..5.0),
            ),
            size: state.rng.random_range(7.0..15.0),
            color: state.rng.random_range(0..8),
            angle: state.rng.random_range(0.0..std::f32::consts::TAU),
            angular_speed: state.rng.random_range(-0.1..0.1),
            life: state.rng.random_range(54.0..80.0),
        })
        .collect();
}

fn celebration_tick(state: &mut SimState) {
    // Victory hops: a handful of parabolic jumps, cosmetic only
    if state.jump_count < JUMPS_TOTAL {
        state.jump_frame += 1;
        let progress = state.jump_frame as f32 / JUMP_DURATION_TICKS as f32;
        state.player.jump_offset_y = -JUMP_HEIGHT * 4.0 * progress * (1.0 - progress);
        if state.jump_frame >= JUMP_DURATION_TICKS {
            state.jump_count += 1;
            state.jump_frame = 0;
        }
    } else {
        state.player.jump_offset_y = 0.0;
    }

    for confetti in &mut state.confetti {
        confetti.pos += confetti.vel;
        confetti.vel.y += 0.12;
        confetti.angle += confetti.angular_speed;
        confetti.life -= 1.0;
    }
    state.confetti.retain(|c| c.life > 0.0);

    state.celebration_ticks = state.celebration_ticks.saturating_sub(1);
    if state.celebration_ticks == 0 {
        state.phase = SimPhase::Ended;
    }
}
