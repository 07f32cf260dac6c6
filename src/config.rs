//! Level configuration consumed from external collaborators
//!
//! The backend ships this as camelCase JSON. A missing or malformed config
//! must never block play: we substitute a built-in default with a
//! synthetically generated open pattern.

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_COLS, DEFAULT_ROWS};

/// Per-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LevelConfig {
    /// Rows of maze symbols: '1' wall, '0' open, 'X' spawn, 'M' pursuer spawn
    pub maze_pattern: Vec<String>,
    pub total_treasures: usize,
    /// Boost pickup count
    pub total_seaweeds: usize,
    /// Timer pickup count
    pub total_bubbles: usize,
    /// Patrol hazard count
    pub total_mines: usize,
    pub total_fake_chests: usize,
    pub game_time_seconds: u32,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            maze_pattern: open_pattern(DEFAULT_ROWS, DEFAULT_COLS),
            total_treasures: 16,
            total_seaweeds: 50,
            total_bubbles: 6,
            total_mines: 6,
            total_fake_chests: 4,
            game_time_seconds: 90,
        }
    }
}

impl LevelConfig {
    /// Parse a config from JSON, falling back to the default on any error
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str(json) {
            Ok(cfg) => cfg,
            Err(err) => {
                log::warn!("bad level config ({err}), using defaults");
                Self::default()
            }
        }
    }
}

/// Build an entirely open pattern with one spawn 'X' near the top-left and
/// one pursuer 'M' toward the bottom-right
pub fn open_pattern(rows: usize, cols: usize) -> Vec<String> {
    let mut pattern: Vec<String> = (0..rows).map(|_| "0".repeat(cols)).collect();
    let rx = (rows as f32 * 0.2) as usize;
    let cx = (cols as f32 * 0.2) as usize;
    let rm = ((rows as f32 * 0.7) as usize).min(rows.saturating_sub(2));
    let cm = ((cols as f32 * 0.7) as usize).min(cols.saturating_sub(2));
    set_symbol(&mut pattern, rx.max(1), cx.max(1), 'X');
    set_symbol(&mut pattern, rm, cm, 'M');
    pattern
}

fn set_symbol(pattern: &mut [String], row: usize, col: usize, symbol: char) {
    if let Some(line) = pattern.get_mut(row) {
        let mut chars: Vec<char> = line.chars().collect();
        if let Some(slot) = chars.get_mut(col) {
            *slot = symbol;
            *line = chars.into_iter().collect();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_pattern_has_spawn_and_pursuer() {
        let cfg = LevelConfig::default();
        assert_eq!(cfg.maze_pattern.len(), DEFAULT_ROWS);
        let joined = cfg.maze_pattern.join("");
        assert_eq!(joined.matches('X').count(), 1);
        assert_eq!(joined.matches('M').count(), 1);
        assert!(!joined.contains('1'));
    }

    #[test]
    fn test_parses_camel_case_json() {
        let json = r#"{
            "mazePattern": ["0X0", "0M0"],
            "totalTreasures": 2,
            "totalSeaweeds": 3,
            "totalBubbles": 1,
            "totalMines": 0,
            "totalFakeChests": 1,
            "gameTimeSeconds": 45
        }"#;
        let cfg = LevelConfig::from_json(json);
        assert_eq!(cfg.maze_pattern, vec!["0X0", "0M0"]);
        assert_eq!(cfg.total_treasures, 2);
        assert_eq!(cfg.game_time_seconds, 45);
    }

    #[test]
    fn test_bad_json_falls_back_to_default() {
        let cfg = LevelConfig::from_json("{not json");
        assert_eq!(cfg.total_treasures, 16);
        assert_eq!(cfg.game_time_seconds, 90);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let cfg = LevelConfig::from_json(r#"{"totalTreasures": 5}"#);
        assert_eq!(cfg.total_treasures, 5);
        assert_eq!(cfg.total_mines, 6);
        assert!(!cfg.maze_pattern.is_empty());
    }
}
