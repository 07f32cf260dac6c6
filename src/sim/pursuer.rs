//! Pursuer state machine: patrol -> alert -> chase -> recovery
//!
//! Movement is resolved per axis: a wall blocking one axis simply cancels
//! that axis for the tick, it is never redirected. This is what lets
//! pursuers slide along walls toward their target.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::grid::Wall;
use super::rect::Rect;
use super::state::{Pursuer, PursuerState};
use crate::consts::*;

/// Pick a random open-cell target, falling back to the world center
pub fn random_roam_target(anchors: &[Vec2], world: Vec2, rng: &mut Pcg32) -> Vec2 {
    if anchors.is_empty() {
        world / 2.0 - Vec2::splat(CHEST_SIZE / 2.0)
    } else {
        anchors[rng.random_range(0..anchors.len())]
    }
}

/// Advance every pursuer one tick. Pursuers run independently and do not
/// interact. Returns true if any pursuer caught the player this tick.
pub fn update_pursuers(
    pursuers: &mut [Pursuer],
    player: &Rect,
    walls: &[Wall],
    anchors: &[Vec2],
    world: Vec2,
    rng: &mut Pcg32,
) -> bool {
    let mut caught = false;
    for pursuer in pursuers.iter_mut() {
        if step_pursuer(pursuer, player, walls, anchors, world, rng) {
            caught = true;
        }
        pursuer.rect.clamp_to_world(world.x, world.y);
    }
    caught
}

fn step_pursuer(
    p: &mut Pursuer,
    player: &Rect,
    walls: &[Wall],
    anchors: &[Vec2],
    world: Vec2,
    rng: &mut Pcg32,
) -> bool {
    match p.state {
        PursuerState::Patrol => {
            let target = p.roam_target;
            let dist = Vec2::new(target.x - p.rect.x, target.y - p.rect.y).length();
            let mut moved = false;
            if dist < PURSUER_TARGET_REACHED {
                p.roam_target = random_roam_target(anchors, world, rng);
            } else {
                moved = move_toward(&mut p.rect, target, PURSUER_PATROL_STEP, walls);
            }
            if moved {
                p.stuck_counter = 0;
            } else {
                p.stuck_counter += 1;
                if p.stuck_counter > PURSUER_STUCK_LIMIT {
                    p.roam_target = random_roam_target(anchors, world, rng);
                    p.stuck_counter = 0;
                }
            }
            // Spotting the player is only possible from patrol; alert and
            // chase never re-trigger on continued overlap
            if p.rect.overlaps(player) {
                p.state = PursuerState::Alert;
                p.state_timer = PURSUER_ALERT_TICKS;
                p.alert_origin = Some(Vec2::new(p.rect.x, p.rect.y));
            }
            false
        }
        PursuerState::Alert => {
            // Stationary wind-up
            p.state_timer = p.state_timer.saturating_sub(1);
            if p.state_timer == 0 {
                p.state = PursuerState::Chase;
                p.state_timer = PURSUER_CHASE_TICKS;
            }
            false
        }
        PursuerState::Chase => {
            let target = Vec2::new(player.x, player.y);
            move_toward(&mut p.rect, target, PURSUER_CHASE_STEP, walls);
            let caught = p.rect.overlaps(player);
            p.state_timer = p.state_timer.saturating_sub(1);
            if p.state_timer == 0 {
                // Tired before catching the player
                p.state = PursuerState::Recovery;
                p.state_timer = PURSUER_RECOVERY_TICKS;
                p.roam_target = random_roam_target(anchors, world, rng);
                p.alert_origin = None;
            }
            caught
        }
        PursuerState::Recovery => {
            let target = p.roam_target;
            let dist = Vec2::new(target.x - p.rect.x, target.y - p.rect.y).length();
            if dist > PURSUER_RECOVERY_STEP {
                move_toward(&mut p.rect, target, PURSUER_RECOVERY_STEP, walls);
            }
            p.state_timer = p.state_timer.saturating_sub(1);
            if p.state_timer == 0 {
                p.state = PursuerState::Patrol;
                p.roam_target = random_roam_target(anchors, world, rng);
            }
            false
        }
    }
}

/// Step `rect` toward `target`, each axis independently blocked by walls.
/// Returns true if either axis actually moved.
fn move_toward(rect: &mut Rect, target: Vec2, step: f32, walls: &[Wall]) -> bool {
    let dx = target.x - rect.x;
    let dy = target.y - rect.y;
    let dist = (dx * dx + dy * dy).sqrt();
    if dist < 0.1 {
        return false;
    }
    let mut moved = false;
    if dx.abs() > 1.0 {
        let try_x = rect.x + step * dx / dist;
        if !rect.at(try_x, rect.y).hits_any(walls) {
            rect.x = try_x;
            moved = true;
        }
    }
    if dy.abs() > 1.0 {
        let try_y = rect.y + step * dy / dist;
        if !rect.at(rect.x, try_y).hits_any(walls) {
            rect.y = try_y;
            moved = true;
        }
    }
    moved
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    const WORLD: Vec2 = Vec2::new(4800.0, 3600.0);

    fn rng() -> Pcg32 {
        Pcg32::seed_from_u64(11)
    }

    fn pursuer_at(x: f32, y: f32) -> Pursuer {
        Pursuer::spawn_at(
            Vec2::new(x + PURSUER_SIZE / 2.0, y + PURSUER_SIZE / 2.0),
            Vec2::new(2000.0, 2000.0),
        )
    }

    #[test]
    fn test_patrol_moves_toward_roam_target() {
        let mut p = vec![pursuer_at(500.0, 500.0)];
        let player = Rect::new(4000.0, 3000.0, 80.0, 60.0);
        let before = (p[0].rect.x, p[0].rect.y);
        update_pursuers(&mut p, &player, &[], &[], WORLD, &mut rng());
        assert!(p[0].rect.x > before.0);
        assert!(p[0].rect.y > before.1);
        assert_eq!(p[0].state, PursuerState::Patrol);
    }

    #[test]
    fn test_overlap_in_patrol_transitions_to_alert_same_tick() {
        let mut p = vec![pursuer_at(500.0, 500.0)];
        let player = Rect::new(510.0, 510.0, 80.0, 60.0);
        let caught = update_pursuers(&mut p, &player, &[], &[], WORLD, &mut rng());
        assert!(!caught);
        assert_eq!(p[0].state, PursuerState::Alert);
        assert_eq!(p[0].state_timer, PURSUER_ALERT_TICKS);
        assert!(p[0].alert_origin.is_some());
    }

    #[test]
    fn test_alert_does_not_retrigger_on_overlap() {
        let mut p = vec![pursuer_at(500.0, 500.0)];
        let player = Rect::new(510.0, 510.0, 80.0, 60.0);
        update_pursuers(&mut p, &player, &[], &[], WORLD, &mut rng());
        let timer_after_first = p[0].state_timer;
        update_pursuers(&mut p, &player, &[], &[], WORLD, &mut rng());
        // Still alert, timer strictly decremented, no restart
        assert_eq!(p[0].state, PursuerState::Alert);
        assert_eq!(p[0].state_timer, timer_after_first - 1);
    }

    #[test]
    fn test_chase_only_reached_through_alert() {
        let mut p = vec![pursuer_at(500.0, 500.0)];
        let player = Rect::new(510.0, 510.0, 80.0, 60.0);
        // Tick 1: patrol -> alert. Then the full wind-up must elapse.
        update_pursuers(&mut p, &player, &[], &[], WORLD, &mut rng());
        for _ in 0..PURSUER_ALERT_TICKS - 1 {
            update_pursuers(&mut p, &player, &[], &[], WORLD, &mut rng());
            assert_eq!(p[0].state, PursuerState::Alert);
        }
        update_pursuers(&mut p, &player, &[], &[], WORLD, &mut rng());
        assert_eq!(p[0].state, PursuerState::Chase);
        assert_eq!(p[0].state_timer, PURSUER_CHASE_TICKS);
    }

    #[test]
    fn test_chase_overlap_reports_caught() {
        let mut p = vec![pursuer_at(500.0, 500.0)];
        p[0].state = PursuerState::Chase;
        p[0].state_timer = PURSUER_CHASE_TICKS;
        let player = Rect::new(505.0, 505.0, 80.0, 60.0);
        let caught = update_pursuers(&mut p, &player, &[], &[], WORLD, &mut rng());
        assert!(caught);
    }

    #[test]
    fn test_chase_expires_into_recovery_then_patrol() {
        let mut p = vec![pursuer_at(500.0, 500.0)];
        p[0].state = PursuerState::Chase;
        p[0].state_timer = 2;
        let player = Rect::new(4000.0, 3000.0, 80.0, 60.0);
        update_pursuers(&mut p, &player, &[], &[], WORLD, &mut rng());
        update_pursuers(&mut p, &player, &[], &[], WORLD, &mut rng());
        assert_eq!(p[0].state, PursuerState::Recovery);
        assert_eq!(p[0].state_timer, PURSUER_RECOVERY_TICKS);
        p[0].state_timer = 1;
        update_pursuers(&mut p, &player, &[], &[], WORLD, &mut rng());
        assert_eq!(p[0].state, PursuerState::Patrol);
    }

    #[test]
    fn test_blocked_axis_is_skipped_not_redirected() {
        // Wall directly to the right; target up-right. X is blocked, Y moves.
        let wall = Wall {
            rect: Rect::new(570.0, 0.0, 100.0, 3600.0),
            decorations: Vec::new(),
        };
        let mut p = vec![pursuer_at(500.0, 500.0)];
        p[0].roam_target = Vec2::new(900.0, 100.0);
        let player = Rect::new(4000.0, 3000.0, 80.0, 60.0);
        update_pursuers(&mut p, &player, &[wall], &[], WORLD, &mut rng());
        assert_eq!(p[0].rect.x, 500.0);
        assert!(p[0].rect.y < 500.0);
    }

    #[test]
    fn test_stuck_counter_forces_new_target() {
        // Boxed in on both axes toward the target
        let walls = vec![
            Wall {
                rect: Rect::new(570.0, 0.0, 40.0, 3600.0),
                decorations: Vec::new(),
            },
            Wall {
                rect: Rect::new(0.0, 570.0, 4800.0, 40.0),
                decorations: Vec::new(),
            },
        ];
        let anchors = vec![Vec2::new(100.0, 100.0), Vec2::new(200.0, 300.0)];
        let mut p = vec![pursuer_at(500.0, 500.0)];
        p[0].roam_target = Vec2::new(2000.0, 2000.0);
        let player = Rect::new(4000.0, 3000.0, 80.0, 60.0);
        for _ in 0..=PURSUER_STUCK_LIMIT {
            update_pursuers(&mut p, &player, &walls, &anchors, WORLD, &mut rng());
        }
        assert_eq!(p[0].stuck_counter, 0);
        assert!(anchors.contains(&p[0].roam_target));
    }
}
