//! Patrol mine movement: advance along the fixed axis, reverse on wall
//! contact, clamp to world bounds

use glam::Vec2;

use super::grid::Wall;
use super::rect::Rect;
use super::state::{Mine, MineAxis};

/// Outcome of one mine update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MineContact {
    /// Index of the mine that hit the player; the clock removes it
    pub mine_index: usize,
}

/// Advance every mine one tick. Returns the first mine that ended the tick
/// overlapping the player, as a removal intent for the clock to apply.
pub fn update_mines(
    mines: &mut [Mine],
    walls: &[Wall],
    world: Vec2,
    player: &Rect,
) -> Option<MineContact> {
    let mut contact = None;
    for (i, mine) in mines.iter_mut().enumerate() {
        step_mine(mine, walls, world);
        if contact.is_none() && mine.rect.overlaps(player) {
            contact = Some(MineContact { mine_index: i });
        }
    }
    contact
}

/// One movement step: try the move, revert and flip on wall overlap
fn step_mine(mine: &mut Mine, walls: &[Wall], world: Vec2) {
    let prev = (mine.rect.x, mine.rect.y);
    match mine.axis {
        MineAxis::Horizontal => mine.rect.x += mine.speed * mine.direction,
        MineAxis::Vertical => mine.rect.y += mine.speed * mine.direction,
    }
    if mine.rect.hits_any(walls) {
        mine.rect.x = prev.0;
        mine.rect.y = prev.1;
        mine.direction = -mine.direction;
    }
    // Redundant with wall collision on well-formed mazes, but degenerate
    // edges have no boundary walls
    mine.rect.clamp_to_world(world.x, world.y);
}
