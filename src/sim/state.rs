//! Game state and core simulation types
//!
//! The `SimState` owns every mutable entity collection, the phase machine
//! and the seeded RNG; controllers receive pieces of it by reference and
//! never touch module-level state.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::camera::{Camera, Shake};
use super::grid::{LevelGeometry, Scenery};
use super::rect::Rect;
use crate::config::LevelConfig;
use crate::consts::*;

/// Top-level phase of a level instance
///
/// Transitions are one-directional: CountingDown -> Running -> one of
/// Exploding/Celebrating -> Ended. An external quit can force Ended from
/// any phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SimPhase {
    CountingDown,
    Running,
    Exploding,
    Celebrating,
    Ended,
}

/// Pickup families placed at level start
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PickupKind {
    Treasure,
    /// Looks like a chest, slows the player instead of scoring
    FakeTreasure,
    /// Seaweed frond: temporary speed boost
    Boost,
    /// Air bubble: adds seconds to the clock
    TimerBonus,
}

/// A placed pickup; never removed, only flagged collected
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pickup {
    pub rect: Rect,
    pub kind: PickupKind,
    /// Score points for treasures, bonus seconds for timer pickups
    pub value: u32,
    pub collected: bool,
}

/// Movement axis of a patrol mine, fixed at spawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MineAxis {
    Horizontal,
    Vertical,
}

/// A mobile hazard sweeping back and forth along one axis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mine {
    pub rect: Rect,
    pub speed: f32,
    /// +1 or -1 along the patrol axis
    pub direction: f32,
    pub axis: MineAxis,
}

impl Mine {
    /// Spawn at a placed position with random axis, speed and heading
    pub fn spawn_at(pos: Vec2, rng: &mut Pcg32) -> Self {
        Self {
            rect: Rect::new(pos.x, pos.y, MINE_SIZE, MINE_SIZE),
            speed: rng.random_range(3.0..5.0),
            direction: if rng.random_bool(0.5) { 1.0 } else { -1.0 },
            axis: if rng.random_bool(0.5) {
                MineAxis::Horizontal
            } else {
                MineAxis::Vertical
            },
        }
    }
}

/// Pursuer behavior states; see `pursuer` for the transition rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PursuerState {
    Patrol,
    /// Stationary wind-up after spotting the player
    Alert,
    Chase,
    /// Tired swim back to a roam target at reduced speed
    Recovery,
}

/// The antagonist entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pursuer {
    pub rect: Rect,
    pub state: PursuerState,
    /// Ticks left in Alert/Chase/Recovery
    pub state_timer: u32,
    pub roam_target: Vec2,
    /// Consecutive ticks with every axis blocked
    pub stuck_counter: u32,
    /// Where the player was spotted (drawn as the "!" marker)
    pub alert_origin: Option<Vec2>,
}

impl Pursuer {
    pub fn spawn_at(center: Vec2, roam_target: Vec2) -> Self {
        Self {
            rect: Rect::new(
                center.x - PURSUER_SIZE / 2.0,
                center.y - PURSUER_SIZE / 2.0,
                PURSUER_SIZE,
                PURSUER_SIZE,
            ),
            state: PursuerState::Patrol,
            state_timer: 0,
            roam_target,
            stuck_counter: 0,
            alert_origin: None,
        }
    }
}

/// The player-controlled entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub rect: Rect,
    /// Facing for rendering: +1 right, -1 left
    pub facing: f32,
    /// Boost ticks remaining (seaweed)
    pub boost_ticks: u32,
    /// Slow ticks remaining (fake chest)
    pub slow_ticks: u32,
    /// Cosmetic hop offset during the celebration
    pub jump_offset_y: f32,
}

impl Player {
    pub fn new() -> Self {
        Self {
            rect: Rect::new(CHEST_SIZE, CHEST_SIZE, PLAYER_WIDTH, PLAYER_HEIGHT),
            facing: 1.0,
            boost_ticks: 0,
            slow_ticks: 0,
            jump_offset_y: 0.0,
        }
    }

    /// Current speed multiplier; boost and slow stack multiplicatively
    pub fn speed_multiplier(&self) -> f32 {
        let mut m = 1.0;
        if self.boost_ticks > 0 {
            m *= BOOST_MULTIPLIER;
        }
        if self.slow_ticks > 0 {
            m *= SLOW_MULTIPLIER;
        }
        m
    }

    /// Tick down the timed speed modifiers
    pub fn decay_modifiers(&mut self) {
        self.boost_ticks = self.boost_ticks.saturating_sub(1);
        self.slow_ticks = self.slow_ticks.saturating_sub(1);
    }
}

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}

/// One piece of the player flying apart during the explosion sequence
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Debris {
    pub part: usize,
    pub pos: Vec2,
    pub vel: Vec2,
    pub rot: f32,
    pub rot_speed: f32,
}

/// Celebration confetti particle (draw data only)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Confetti {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: f32,
    pub color: u8,
    pub angle: f32,
    pub angular_speed: f32,
    pub life: f32,
}

/// Floating "+10" / "Slowed!" marker rising from a pickup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FloatingReward {
    pub pos: Vec2,
    pub label: String,
    pub alpha: f32,
    pub vy: f32,
}

/// Discrete events for external scoring/telemetry, drained by the embedder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SimEvent {
    PickupCollected { kind: PickupKind, value: u32 },
    /// Mine contact; the level is ending in an explosion
    HazardContact,
    /// A pursuer caught the player
    Caught,
    /// All treasures collected
    LevelComplete,
    TimeUp,
}

/// Complete simulation state for one level instance
#[derive(Debug, Clone)]
pub struct SimState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub config: LevelConfig,
    pub phase: SimPhase,

    /// Pre-game steps remaining: the visible 3..1 count plus one ready step
    pub countdown_steps: u32,
    /// Remaining play time in ticks
    pub time_left_ticks: u32,
    /// Total ticks simulated
    pub time_ticks: u64,

    pub score: u32,
    pub collected_treasures: usize,

    pub geometry: LevelGeometry,
    /// Backdrop dressing rolled at setup; draw data only
    pub scenery: Scenery,
    pub pickups: Vec<Pickup>,
    pub mines: Vec<Mine>,
    pub pursuers: Vec<Pursuer>,
    pub player: Player,

    pub camera: Camera,
    pub shake: Shake,
    pub viewport: Vec2,

    pub debris: Vec<Debris>,
    pub confetti: Vec<Confetti>,
    pub rewards: Vec<FloatingReward>,
    /// Ticks left in the Exploding sequence
    pub explosion_ticks: u32,
    /// Ticks left in the Celebrating sequence
    pub celebration_ticks: u32,
    pub jump_frame: u32,
    pub jump_count: u32,

    events: Vec<SimEvent>,
}

impl SimState {
    /// Create a fresh level instance; entities spawn when the countdown ends
    pub fn new(config: LevelConfig, seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: SimPhase::CountingDown,
            countdown_steps: COUNTDOWN_SECONDS + 1,
            time_left_ticks: config.game_time_seconds.saturating_mul(TICK_HZ),
            time_ticks: 0,
            score: 0,
            collected_treasures: 0,
            geometry: LevelGeometry::fallback(WORLD_WIDTH, WORLD_HEIGHT),
            scenery: Scenery::default(),
            pickups: Vec::new(),
            mines: Vec::new(),
            pursuers: Vec::new(),
            player: Player::new(),
            camera: Camera::default(),
            shake: Shake::default(),
            viewport: Vec2::new(1280.0, 720.0),
            debris: Vec::new(),
            confetti: Vec::new(),
            rewards: Vec::new(),
            explosion_ticks: 0,
            celebration_ticks: 0,
            jump_frame: 0,
            jump_count: 0,
            events: Vec::new(),
            config,
        }
    }

    /// Countdown value for display (3, 2, 1, then 0 on the ready step)
    pub fn countdown_display(&self) -> u32 {
        self.countdown_steps.saturating_sub(1)
    }

    /// Whole seconds left on the play clock
    pub fn time_left_secs(&self) -> u32 {
        self.time_left_ticks.div_ceil(TICK_HZ)
    }

    /// Externally requested quit: stop the level immediately
    pub fn abort(&mut self) {
        if self.phase != SimPhase::Ended {
            log::info!("level aborted in phase {:?}", self.phase);
            self.phase = SimPhase::Ended;
        }
    }

    pub fn push_event(&mut self, event: SimEvent) {
        self.events.push(event);
    }

    /// Take all events accumulated since the last drain
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }

    /// Uncollected treasures remaining (real ones only)
    pub fn treasures_remaining(&self) -> usize {
        self.pickups
            .iter()
            .filter(|p| p.kind == PickupKind::Treasure && !p.collected)
            .count()
    }
}
