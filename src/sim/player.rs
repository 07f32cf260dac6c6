//! Player movement: input displacement resolved against walls per axis

use glam::Vec2;

use super::grid::Wall;
use super::state::Player;
use crate::consts::PLAYER_SPEED;

/// Displacement for this tick from a normalized input vector
/// (keyboard gives +/-1 per axis, a joystick gives analog values)
pub fn displacement(player: &Player, move_x: f32, move_y: f32) -> Vec2 {
    let speed = PLAYER_SPEED * player.speed_multiplier();
    Vec2::new(
        move_x.clamp(-1.0, 1.0) * speed,
        move_y.clamp(-1.0, 1.0) * speed,
    )
}

/// Apply a displacement, axis by axis: a blocked axis is dropped, the other
/// still applies, so the player slides along walls
pub fn apply_movement(player: &mut Player, delta: Vec2, walls: &[Wall], world: Vec2) {
    if delta.x < 0.0 {
        player.facing = -1.0;
    } else if delta.x > 0.0 {
        player.facing = 1.0;
    }
    if delta.x != 0.0 {
        let tried = player.rect.at(player.rect.x + delta.x, player.rect.y);
        if !tried.hits_any(walls) {
            player.rect.x = tried.x;
        }
    }
    if delta.y != 0.0 {
        let tried = player.rect.at(player.rect.x, player.rect.y + delta.y);
        if !tried.hits_any(walls) {
            player.rect.y = tried.y;
        }
    }
    player.rect.clamp_to_world(world.x, world.y);
}
