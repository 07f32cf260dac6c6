//! Geometry builder: maze pattern -> wall rectangles and placement anchors
//!
//! The character grid is the source of truth for level topology. Each wall
//! cell becomes one collidable rectangle (plus cosmetic shell/coral
//! decorations); each open cell contributes one anchor point, pre-offset by
//! half a chest so a standard pickup centers inside its cell.
//!
//! A missing or malformed pattern never fails the level: we degrade to an
//! empty wall set with a single anchor at the world center.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::rect::Rect;
use crate::consts::{AMBIENT_CORAL_COUNT, CHEST_SIZE};

/// One grid cell of the maze pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cell {
    Wall,
    Open,
    /// Player spawn ('X')
    Spawn,
    /// Pursuer spawn ('M')
    PursuerSpawn,
}

impl Cell {
    fn from_symbol(symbol: char) -> Self {
        match symbol {
            '1' => Cell::Wall,
            'X' => Cell::Spawn,
            'M' => Cell::PursuerSpawn,
            _ => Cell::Open,
        }
    }

    /// Anything a pickup can sit on or an entity can swim through
    pub fn is_open(self) -> bool {
        self != Cell::Wall
    }
}

/// Cosmetic sub-rectangle attached to a wall; not collidable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DecorationKind {
    Shell,
    Coral,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Decoration {
    pub kind: DecorationKind,
    /// Offset within the wall cell
    pub x: f32,
    pub y: f32,
    pub size: f32,
}

/// A collidable wall cell with its decorations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wall {
    pub rect: Rect,
    pub decorations: Vec<Decoration>,
}

/// Everything derived from the maze pattern at level load
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelGeometry {
    pub walls: Vec<Wall>,
    /// Top-left positions for chest-sized items, one per open cell
    pub anchors: Vec<Vec2>,
    /// Center of the 'X' cell, if the pattern has one
    pub spawn_center: Option<Vec2>,
    /// Centers of all 'M' cells
    pub pursuer_spawns: Vec<Vec2>,
    cells: Vec<Vec<Cell>>,
    pub cell_width: f32,
    pub cell_height: f32,
    /// True when the pattern was unusable and we fell back to a single anchor
    pub degraded: bool,
}

impl LevelGeometry {
    /// Build geometry from a symbol pattern
    ///
    /// Decoration placement is the only randomness here; two independent
    /// Bernoulli draws per wall cell.
    pub fn build(
        pattern: &[String],
        world_width: f32,
        world_height: f32,
        rng: &mut Pcg32,
    ) -> Self {
        let cells = match parse_pattern(pattern) {
            Some(cells) => cells,
            None => {
                log::warn!("maze pattern missing or malformed, degrading to open water");
                return Self::fallback(world_width, world_height);
            }
        };

        let rows = cells.len();
        let cols = cells[0].len();
        let cell_width = world_width / cols as f32;
        let cell_height = world_height / rows as f32;

        let mut walls = Vec::new();
        let mut anchors = Vec::new();
        let mut spawn_center = None;
        let mut pursuer_spawns = Vec::new();

        for (r, row) in cells.iter().enumerate() {
            for (c, &cell) in row.iter().enumerate() {
                let x = c as f32 * cell_width;
                let y = r as f32 * cell_height;
                let center = Vec2::new(x + cell_width / 2.0, y + cell_height / 2.0);
                match cell {
                    Cell::Wall => {
                        let rect = Rect::new(x, y, cell_width, cell_height);
                        let decorations = roll_decorations(cell_width, cell_height, rng);
                        walls.push(Wall { rect, decorations });
                    }
                    Cell::Open => {
                        anchors.push(center - Vec2::splat(CHEST_SIZE / 2.0));
                    }
                    Cell::Spawn => {
                        if spawn_center.is_none() {
                            spawn_center = Some(center);
                        }
                    }
                    Cell::PursuerSpawn => pursuer_spawns.push(center),
                }
            }
        }

        Self {
            walls,
            anchors,
            spawn_center,
            pursuer_spawns,
            cells,
            cell_width,
            cell_height,
            degraded: false,
        }
    }

    /// Degraded single-anchor geometry: one placement point at world center
    pub fn fallback(world_width: f32, world_height: f32) -> Self {
        let center = Vec2::new(world_width / 2.0, world_height / 2.0);
        Self {
            walls: Vec::new(),
            anchors: vec![center - Vec2::splat(CHEST_SIZE / 2.0)],
            spawn_center: None,
            pursuer_spawns: Vec::new(),
            cells: Vec::new(),
            cell_width: world_width,
            cell_height: world_height,
            degraded: true,
        }
    }

    /// Grid cell containing a world position
    pub fn cell_at(&self, pos: Vec2) -> Option<(usize, usize)> {
        if self.cells.is_empty() {
            return None;
        }
        let row = (pos.y / self.cell_height) as isize;
        let col = (pos.x / self.cell_width) as isize;
        if row < 0 || col < 0 {
            return None;
        }
        let (row, col) = (row as usize, col as usize);
        (row < self.cells.len() && col < self.cells[row].len()).then_some((row, col))
    }

    /// Count orthogonally adjacent wall cells; used to reject corner traps
    pub fn wall_neighbors(&self, row: usize, col: usize) -> usize {
        let mut count = 0;
        let at = |r: isize, c: isize| -> bool {
            r >= 0
                && c >= 0
                && self
                    .cells
                    .get(r as usize)
                    .and_then(|row| row.get(c as usize))
                    .is_some_and(|&cell| cell == Cell::Wall)
        };
        let (r, c) = (row as isize, col as isize);
        for (dr, dc) in [(-1, 0), (1, 0), (0, -1), (0, 1)] {
            if at(r + dr, c + dc) {
                count += 1;
            }
        }
        count
    }
}

/// Parse symbol rows into cells, rejecting empty or ragged patterns
fn parse_pattern(pattern: &[String]) -> Option<Vec<Vec<Cell>>> {
    if pattern.is_empty() {
        return None;
    }
    let cols = pattern[0].chars().count();
    if cols == 0 {
        return None;
    }
    let mut cells = Vec::with_capacity(pattern.len());
    for row in pattern {
        let parsed: Vec<Cell> = row.chars().map(Cell::from_symbol).collect();
        if parsed.len() != cols {
            return None;
        }
        cells.push(parsed);
    }
    Some(cells)
}

fn roll_decorations(cell_width: f32, cell_height: f32, rng: &mut Pcg32) -> Vec<Decoration> {
    let mut decorations = Vec::new();
    if rng.random_bool(0.35) {
        let size = rng.random_range(32.0..48.0);
        decorations.push(Decoration {
            kind: DecorationKind::Shell,
            x: rng.random_range(0.0..(cell_width - size).max(f32::EPSILON)),
            y: rng.random_range(0.0..(cell_height - size).max(f32::EPSILON)),
            size,
        });
    }
    if rng.random_bool(0.28) {
        let size = rng.random_range(42.0..74.0);
        decorations.push(Decoration {
            kind: DecorationKind::Coral,
            x: rng.random_range(0.0..(cell_width - size).max(f32::EPSILON)),
            y: rng.random_range(0.0..(cell_height - size).max(f32::EPSILON)),
            size,
        });
    }
    decorations
}

/// Background drift bubble; the renderer animates the upward drift
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriftBubble {
    pub pos: Vec2,
    pub radius: f32,
    pub speed: f32,
}

/// Non-interactive backdrop dressing rolled once at level setup.
/// Draw data only; nothing here collides or affects gameplay.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scenery {
    pub bubbles: Vec<DriftBubble>,
    pub seaweeds: Vec<Rect>,
    pub corals: Vec<Rect>,
}

impl Scenery {
    /// Drift bubbles and seaweed fronds scatter anywhere in open water;
    /// corals line the seabed at even intervals.
    pub fn generate(bubbles: usize, seaweeds: usize, world: Vec2, rng: &mut Pcg32) -> Self {
        let drift = (0..bubbles)
            .map(|_| DriftBubble {
                pos: Vec2::new(
                    15.0 + rng.random_range(0.0..(world.x - 30.0).max(f32::EPSILON)),
                    100.0 + rng.random_range(0.0..(world.y - 200.0).max(f32::EPSILON)),
                ),
                radius: rng.random_range(8.0..20.0),
                speed: rng.random_range(0.3..1.0),
            })
            .collect();

        let fronds = (0..seaweeds)
            .map(|_| {
                let width = rng.random_range(60.0..130.0);
                let height = rng.random_range(160.0..300.0);
                Rect::new(
                    rng.random_range(0.0..(world.x - width).max(f32::EPSILON)),
                    rng.random_range(0.0..(world.y - height).max(f32::EPSILON)),
                    width,
                    height,
                )
            })
            .collect();

        let spacing = world.x / AMBIENT_CORAL_COUNT as f32;
        let corals = (0..AMBIENT_CORAL_COUNT)
            .map(|i| {
                let width = rng.random_range(120.0..300.0);
                let height = rng.random_range(100.0..330.0);
                Rect::new(
                    i as f32 * spacing + rng.random_range(0.0..50.0),
                    world.y - height + rng.random_range(0.0..30.0),
                    width,
                    height,
                )
            })
            .collect();

        Self {
            bubbles: drift,
            seaweeds: fronds,
            corals,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn rng() -> Pcg32 {
        Pcg32::seed_from_u64(7)
    }

    fn pattern(rows: &[&str]) -> Vec<String> {
        rows.iter().map(|r| r.to_string()).collect()
    }

    #[test]
    fn test_walls_and_anchors_partition_the_grid() {
        let geo = LevelGeometry::build(
            &pattern(&["1111", "1001", "1X11"]),
            4800.0,
            3600.0,
            &mut rng(),
        );
        assert_eq!(geo.walls.len(), 9);
        assert_eq!(geo.anchors.len(), 2);
        assert!(geo.spawn_center.is_some());
        assert!(!geo.degraded);
    }

    #[test]
    fn test_no_anchor_lies_inside_a_wall() {
        let geo = LevelGeometry::build(
            &pattern(&["10101", "01010", "10101", "0X0M0"]),
            4800.0,
            3600.0,
            &mut rng(),
        );
        for anchor in &geo.anchors {
            let center = *anchor + Vec2::splat(CHEST_SIZE / 2.0);
            for wall in &geo.walls {
                assert!(
                    !wall.rect.contains(center),
                    "anchor center {center:?} inside wall {:?}",
                    wall.rect
                );
            }
        }
    }

    #[test]
    fn test_empty_pattern_degrades_to_center_anchor() {
        let geo = LevelGeometry::build(&[], 4800.0, 3600.0, &mut rng());
        assert!(geo.degraded);
        assert!(geo.walls.is_empty());
        assert_eq!(geo.anchors.len(), 1);
        let center = geo.anchors[0] + Vec2::splat(CHEST_SIZE / 2.0);
        assert_eq!(center, Vec2::new(2400.0, 1800.0));
    }

    #[test]
    fn test_ragged_pattern_degrades() {
        let geo = LevelGeometry::build(&pattern(&["000", "00"]), 4800.0, 3600.0, &mut rng());
        assert!(geo.degraded);
        assert_eq!(geo.anchors.len(), 1);
    }

    #[test]
    fn test_wall_neighbor_count() {
        // Open cell at (1,1) surrounded by walls on three sides
        let geo = LevelGeometry::build(&pattern(&["111", "100", "111"]), 4800.0, 3600.0, &mut rng());
        assert_eq!(geo.wall_neighbors(1, 1), 3);
        assert_eq!(geo.wall_neighbors(1, 2), 2);
    }

    #[test]
    fn test_cell_at_maps_positions_back() {
        let geo = LevelGeometry::build(&pattern(&["00", "0X"]), 100.0, 100.0, &mut rng());
        assert_eq!(geo.cell_at(Vec2::new(10.0, 10.0)), Some((0, 0)));
        assert_eq!(geo.cell_at(Vec2::new(75.0, 75.0)), Some((1, 1)));
        assert_eq!(geo.cell_at(Vec2::new(-1.0, 10.0)), None);
        assert_eq!(geo.cell_at(Vec2::new(500.0, 10.0)), None);
    }

    #[test]
    fn test_scenery_stays_inside_open_water_bounds() {
        let world = Vec2::new(4800.0, 3600.0);
        let scenery = Scenery::generate(120, 50, world, &mut rng());
        assert_eq!(scenery.bubbles.len(), 120);
        assert_eq!(scenery.seaweeds.len(), 50);
        assert_eq!(scenery.corals.len(), AMBIENT_CORAL_COUNT);
        for bubble in &scenery.bubbles {
            assert!(bubble.pos.x >= 15.0 && bubble.pos.x <= world.x - 15.0);
            assert!(bubble.pos.y >= 100.0 && bubble.pos.y <= world.y - 100.0);
        }
        for frond in &scenery.seaweeds {
            assert!(frond.x >= 0.0 && frond.x + frond.width <= world.x);
            assert!(frond.y >= 0.0 && frond.y + frond.height <= world.y);
        }
        // Corals hug the seabed
        for coral in &scenery.corals {
            assert!(coral.y + coral.height >= world.y);
        }
    }

    #[test]
    fn test_pursuer_spawns_collected() {
        let geo = LevelGeometry::build(&pattern(&["M0M", "0X0"]), 300.0, 200.0, &mut rng());
        assert_eq!(geo.pursuer_spawns.len(), 2);
        assert_eq!(geo.pursuer_spawns[0], Vec2::new(50.0, 50.0));
    }
}
