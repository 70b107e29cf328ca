use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::infra::{Direction, Position};
use crate::state::{Agent, Grid};

/// Errors raised while reading or building a map.
#[derive(Error, Debug)]
pub enum MapError {
    #[error("cannot read map {path:?}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid map json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("grid size {0} is not positive")]
    InvalidGridSize(i32),

    #[error("position ({x}, {y}) lies outside the {size}x{size} grid")]
    OutOfBounds { x: i32, y: i32, size: i32 },

    #[error("expected exactly 2 teleports, got {0}")]
    TeleportCount(usize),

    #[error("two players start on ({x}, {y})")]
    SharedStart { x: i32, y: i32 },

    #[error("text level line {line}: {reason}")]
    TextLevel { line: usize, reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointRecord {
    pub x: i32,
    pub y: i32,
}

impl From<PointRecord> for Position {
    fn from(point: PointRecord) -> Self {
        Position::new(point.x, point.y)
    }
}

impl From<Position> for PointRecord {
    fn from(pos: Position) -> Self {
        PointRecord { x: pos.x, y: pos.y }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellRecord {
    pub x: i32,
    pub y: i32,
    #[serde(default)]
    pub walls: Vec<Direction>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub food: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateCellRecord {
    pub x: i32,
    pub y: i32,
    pub orientation: Direction,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateRecord {
    pub switch: PointRecord,
    pub cells: Vec<GateCellRecord>,
}

/// Square level as stored by the map tools.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapFile {
    pub grid_size: i32,
    #[serde(default)]
    pub players: Vec<PointRecord>,
    pub cells: Vec<CellRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub teleports: Option<Vec<PointRecord>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gate: Option<GateRecord>,
}

pub fn load_map(path: impl AsRef<Path>) -> Result<MapFile, MapError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| MapError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_map(&text)
}

pub fn parse_map(text: &str) -> Result<MapFile, MapError> {
    Ok(serde_json::from_str(text)?)
}

impl MapFile {
    /// Builds the grid and the agents. Agent ids follow the order of `players`.
    pub fn build(&self) -> Result<(Grid, Vec<Agent>), MapError> {
        if self.grid_size <= 0 {
            return Err(MapError::InvalidGridSize(self.grid_size));
        }
        let mut grid = Grid::square(self.grid_size);

        let mut starts: Vec<Position> = Vec::with_capacity(self.players.len());
        for player in &self.players {
            let pos = self.checked(player.x, player.y)?;
            if starts.contains(&pos) {
                return Err(MapError::SharedStart { x: pos.x, y: pos.y });
            }
            starts.push(pos);
        }

        if let Some(teleports) = &self.teleports {
            let [first, second] = teleports.as_slice() else {
                return Err(MapError::TeleportCount(teleports.len()));
            };
            let first = self.checked(first.x, first.y)?;
            let second = self.checked(second.x, second.y)?;
            grid.add_teleport(first, second);
        }

        for cell in &self.cells {
            let pos = self.checked(cell.x, cell.y)?;
            if cell.food {
                grid.add_food(pos);
            }
            for wall in &cell.walls {
                grid.add_wall(pos, *wall);
            }
        }

        if let Some(gate) = &self.gate {
            let switch_pos = self.checked(gate.switch.x, gate.switch.y)?;
            let switch = grid.add_switch(switch_pos).ok_or(MapError::OutOfBounds {
                x: switch_pos.x,
                y: switch_pos.y,
                size: self.grid_size,
            })?;
            for gate_cell in &gate.cells {
                let pos = self.checked(gate_cell.x, gate_cell.y)?;
                grid.add_gate(pos, gate_cell.orientation, switch);
            }
        }

        Ok((grid, Agent::from_positions(&starts)))
    }

    fn checked(&self, x: i32, y: i32) -> Result<Position, MapError> {
        if x < 0 || y < 0 || x >= self.grid_size || y >= self.grid_size {
            return Err(MapError::OutOfBounds {
                x,
                y,
                size: self.grid_size,
            });
        }
        Ok(Position::new(x, y))
    }

    /// Exports a square grid in the map tools' format. Only the first switch
    /// is written since the format holds a single one.
    pub fn from_grid(grid: &Grid, agents: &[Agent]) -> MapFile {
        let mut agents = agents.to_vec();
        agents.sort_by_key(|a| a.id);

        let cells = grid
            .cells()
            .map(|cell| CellRecord {
                x: cell.pos.x,
                y: cell.pos.y,
                walls: cell.walls().collect(),
                food: cell.has_food(),
            })
            .collect();

        let teleports = grid
            .teleport_pair()
            .map(|(first, second)| vec![first.into(), second.into()]);

        let gate = grid.switches().first().map(|switch| GateRecord {
            switch: switch.pos.into(),
            cells: grid
                .cells()
                .filter_map(|cell| cell.gate())
                .filter(|gate| gate.switch == 0)
                .map(|gate| GateCellRecord {
                    x: gate.pos.x,
                    y: gate.pos.y,
                    orientation: gate.direction,
                })
                .collect(),
        });

        MapFile {
            grid_size: grid.width,
            players: agents.iter().map(|a| a.pos.into()).collect(),
            cells,
            teleports,
            gate,
        }
    }

    pub fn to_json(&self) -> Result<String, MapError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Parses the legacy text level format: a `n,n` size line followed by `n`
/// rows of `n` comma separated cell codes. Each code is a bit field, from the
/// high bit down: food, player, left, down, right, up.
pub fn parse_text_level(text: &str) -> Result<MapFile, MapError> {
    let mut lines = text.lines();
    let header = lines.next().ok_or_else(|| MapError::TextLevel {
        line: 1,
        reason: "missing size line".to_string(),
    })?;

    let size = parse_size(header)?;
    let mut players = Vec::new();
    let mut cells = Vec::new();

    for y in 0..size {
        let line_no = y as usize + 2;
        let row = lines.next().ok_or_else(|| MapError::TextLevel {
            line: line_no,
            reason: "missing row".to_string(),
        })?;
        let codes: Vec<&str> = row.trim().split(',').collect();
        if codes.len() != size as usize {
            return Err(MapError::TextLevel {
                line: line_no,
                reason: format!("expected {} cells, got {}", size, codes.len()),
            });
        }

        for (x, code) in codes.iter().enumerate() {
            let x = x as i32;
            let bits: u8 = code.trim().parse().map_err(|_| MapError::TextLevel {
                line: line_no,
                reason: format!("bad cell code {:?}", code),
            })?;

            let walls = [
                (0b001000, Direction::Left),
                (0b000100, Direction::Down),
                (0b000010, Direction::Right),
                (0b000001, Direction::Up),
            ]
            .into_iter()
            .filter(|(mask, _)| bits & mask != 0)
            .map(|(_, direction)| direction)
            .collect();

            if bits & 0b010000 != 0 {
                players.push(PointRecord { x, y });
            }
            cells.push(CellRecord {
                x,
                y,
                walls,
                food: bits & 0b100000 != 0,
            });
        }
    }

    Ok(MapFile {
        grid_size: size,
        players,
        cells,
        teleports: None,
        gate: None,
    })
}

fn parse_size(header: &str) -> Result<i32, MapError> {
    let invalid = || MapError::TextLevel {
        line: 1,
        reason: format!("bad size line {:?}", header.trim()),
    };
    let mut parts = header.trim().split(',');
    let width: i32 = parts
        .next()
        .and_then(|p| p.trim().parse().ok())
        .ok_or_else(invalid)?;
    let height: i32 = parts
        .next()
        .and_then(|p| p.trim().parse().ok())
        .ok_or_else(invalid)?;
    if width != height {
        return Err(MapError::TextLevel {
            line: 1,
            reason: format!("level is not square ({}x{})", width, height),
        });
    }
    if width <= 0 {
        return Err(MapError::InvalidGridSize(width));
    }
    Ok(width)
}

#[cfg(test)]
mod tests {
    use super::*;

    const GATED_MAP: &str = r#"{
        "gridSize": 3,
        "players": [{"x": 0, "y": 0}],
        "cells": [
            {"x": 0, "y": 0, "walls": ["up", "left"]},
            {"x": 1, "y": 0, "walls": ["up"]},
            {"x": 2, "y": 0, "walls": ["up", "right"], "food": true},
            {"x": 0, "y": 1, "walls": ["left"]},
            {"x": 1, "y": 1, "walls": []},
            {"x": 2, "y": 1, "walls": ["right"]},
            {"x": 0, "y": 2, "walls": ["down", "left"]},
            {"x": 1, "y": 2, "walls": ["down"]},
            {"x": 2, "y": 2, "walls": ["down", "right"]}
        ],
        "teleports": [{"x": 1, "y": 1}, {"x": 2, "y": 2}],
        "gate": {
            "switch": {"x": 0, "y": 2},
            "cells": [
                {"x": 0, "y": 0, "orientation": "right"},
                {"x": 1, "y": 0, "orientation": "left"}
            ]
        }
    }"#;

    #[test]
    fn test_build_from_json() {
        let map = parse_map(GATED_MAP).unwrap();
        let (grid, agents) = map.build().unwrap();

        assert_eq!(agents, vec![Agent::new(0, Position::new(0, 0))]);
        assert_eq!(grid.food_count(), 1);
        assert!(grid.has_gates());
        assert_eq!(
            grid.cell(&Position::new(2, 2)).unwrap().teleport(),
            Some(Position::new(1, 1))
        );
        assert!(grid.cell(&Position::new(0, 2)).unwrap().switch().is_some());
        assert!(grid.cell(&Position::new(2, 0)).unwrap().has_wall(Direction::Right));
    }

    #[test]
    fn test_export_round_trips() {
        let map = parse_map(GATED_MAP).unwrap();
        let (grid, agents) = map.build().unwrap();
        let exported = MapFile::from_grid(&grid, &agents);
        let (rebuilt, rebuilt_agents) = exported.build().unwrap();

        assert_eq!(rebuilt, grid);
        assert_eq!(rebuilt_agents, agents);
    }

    #[test]
    fn test_out_of_bounds_cell_rejected() {
        let text = r#"{"gridSize": 2, "players": [], "cells": [{"x": 2, "y": 0, "walls": []}]}"#;
        let err = parse_map(text).unwrap().build().unwrap_err();
        assert!(matches!(err, MapError::OutOfBounds { x: 2, y: 0, size: 2 }));
    }

    #[test]
    fn test_single_teleport_rejected() {
        let text = r#"{"gridSize": 2, "cells": [], "teleports": [{"x": 0, "y": 0}]}"#;
        let err = parse_map(text).unwrap().build().unwrap_err();
        assert!(matches!(err, MapError::TeleportCount(1)));
    }

    #[test]
    fn test_unknown_wall_name_rejected() {
        let text = r#"{"gridSize": 1, "cells": [{"x": 0, "y": 0, "walls": ["north"]}]}"#;
        assert!(matches!(parse_map(text), Err(MapError::Json(_))));
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = load_map("/nonexistent/slidepath/map.json").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/slidepath/map.json"));
    }

    #[test]
    fn test_text_level_bits() {
        // 41 = food + left + up, 18 = player + right, 5 = down + up, 0 = empty
        let text = "2,2\n41,18\n5,0\n";
        let map = parse_text_level(text).unwrap();

        assert_eq!(map.grid_size, 2);
        assert_eq!(map.players, vec![PointRecord { x: 1, y: 0 }]);
        assert_eq!(map.cells[0].walls, vec![Direction::Left, Direction::Up]);
        assert!(map.cells[0].food);
        assert_eq!(map.cells[1].walls, vec![Direction::Right]);
        assert_eq!(map.cells[2].walls, vec![Direction::Down, Direction::Up]);
        assert!(map.cells[3].walls.is_empty());
    }

    #[test]
    fn test_text_level_rejects_non_square() {
        let err = parse_text_level("2,3\n0,0\n0,0\n0,0\n").unwrap_err();
        assert!(matches!(err, MapError::TextLevel { line: 1, .. }));
    }

    #[test]
    fn test_text_level_rejects_short_row() {
        let err = parse_text_level("2,2\n0\n0,0\n").unwrap_err();
        assert!(matches!(err, MapError::TextLevel { line: 2, .. }));
    }
}
