//! Reef Raider - a top-down underwater maze treasure hunt
//!
//! Core modules:
//! - `sim`: Deterministic simulation (maze geometry, placement, AI, game state)
//! - `config`: Level configuration consumed from external collaborators
//!
//! Rendering, UI chrome, asset loading and telemetry are external; this crate
//! only produces the data those layers consume (entity collections, camera
//! origin, phase, score).

pub mod config;
pub mod sim;

pub use config::LevelConfig;
pub use sim::{SimEvent, SimPhase, SimState, TickInput, tick};

/// Game tuning constants
pub mod consts {
    /// Fixed simulation rate (ticks per second)
    pub const TICK_HZ: u32 = 60;

    /// World dimensions
    pub const WORLD_WIDTH: f32 = 4800.0;
    pub const WORLD_HEIGHT: f32 = 3600.0;

    /// Default maze pattern shape when no config is supplied
    pub const DEFAULT_ROWS: usize = 14;
    pub const DEFAULT_COLS: usize = 28;

    /// Player defaults
    pub const PLAYER_WIDTH: f32 = 80.0;
    pub const PLAYER_HEIGHT: f32 = 60.0;
    pub const PLAYER_SPEED: f32 = 5.0;

    /// Treasure chests (real and fake share the footprint)
    pub const CHEST_SIZE: f32 = 60.0;
    /// Minimum pairwise spread between real chests
    pub const CHEST_MIN_DISTANCE: f32 = 180.0;
    /// Fake chests pack a little tighter
    pub const FAKE_CHEST_MIN_DISTANCE: f32 = 140.0;
    /// No chest spawns within this radius of the player spawn
    pub const SPAWN_EXCLUDE_RADIUS: f32 = 280.0;

    /// Boost pickup (seaweed frond)
    pub const SEAWEED_WIDTH: f32 = 60.0;
    pub const SEAWEED_HEIGHT: f32 = 120.0;
    /// Speed multiplier while boosted
    pub const BOOST_MULTIPLIER: f32 = 1.5;
    /// Boost duration (8 seconds)
    pub const BOOST_TICKS: u32 = 8 * TICK_HZ;

    /// Timer pickup (air bubble)
    pub const BUBBLE_SIZE: f32 = 52.0;

    /// Fake chest slow: half speed for 3 seconds
    pub const SLOW_MULTIPLIER: f32 = 0.5;
    pub const SLOW_TICKS: u32 = 3 * TICK_HZ;

    /// Patrol mines
    pub const MINE_SIZE: f32 = 80.0;
    pub const MINE_MIN_DISTANCE: f32 = 220.0;
    /// Keep mines off cell edges when jittering inside their cell
    pub const MINE_MARGIN: f32 = 16.0;
    pub const MINE_PLACEMENT_TRIES: u32 = 300;

    /// Pursuer (mermaid)
    pub const PURSUER_SIZE: f32 = 70.0;
    pub const PURSUER_PATROL_STEP: f32 = 2.3;
    pub const PURSUER_CHASE_STEP: f32 = 5.0;
    pub const PURSUER_RECOVERY_STEP: f32 = 1.2;
    /// Distance at which a roam target counts as reached
    pub const PURSUER_TARGET_REACHED: f32 = 40.0;
    /// Consecutive blocked ticks before forcing a new roam target
    pub const PURSUER_STUCK_LIMIT: u32 = 20;
    /// Wind-up before the chase begins (1 second)
    pub const PURSUER_ALERT_TICKS: u32 = TICK_HZ;
    /// How long a chase lasts before the pursuer tires (8 seconds)
    pub const PURSUER_CHASE_TICKS: u32 = 8 * TICK_HZ;
    /// Tired swim back to patrol (4 seconds)
    pub const PURSUER_RECOVERY_TICKS: u32 = 4 * TICK_HZ;

    /// Pre-game countdown (one-second granularity)
    pub const COUNTDOWN_SECONDS: u32 = 3;

    /// Terminal sequence lengths
    pub const EXPLOSION_TICKS: u32 = 180;
    pub const CELEBRATION_TICKS: u32 = 120;
    pub const DEBRIS_PIECES: usize = 9;

    /// Impact feedback shake
    pub const SHAKE_TICKS: u32 = 30;
    pub const SHAKE_MAGNITUDE: f32 = 60.0;
    pub const SHAKE_DECAY: f32 = 0.92;

    /// Seabed coral silhouettes spaced across the world width
    pub const AMBIENT_CORAL_COUNT: usize = 80;

    /// Celebration hop animation (cosmetic, consumed by rendering)
    pub const JUMPS_TOTAL: u32 = 3;
    pub const JUMP_DURATION_TICKS: u32 = 40;
    pub const JUMP_HEIGHT: f32 = 110.0;
}
