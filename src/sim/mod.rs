//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only (one `Pcg32` owned by the state)
//! - No rendering or platform dependencies
//!
//! Update order within a tick is significant: later entities observe earlier
//! entities' already-updated positions. See `tick`.

pub mod camera;
pub mod grid;
pub mod hazard;
pub mod placement;
pub mod player;
pub mod pursuer;
pub mod rect;
pub mod state;
pub mod tick;

pub use camera::Camera;
pub use grid::{Cell, DriftBubble, LevelGeometry, Scenery, Wall};
pub use rect::Rect;
pub use state::{
    Mine, MineAxis, Pickup, PickupKind, Player, Pursuer, PursuerState, SimEvent, SimPhase,
    SimState,
};
pub use tick::{TickInput, countdown_tick, tick};
