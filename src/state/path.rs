use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::infra::{Direction, Position};
use crate::state::Grid;

/// One agent's entry in a path snapshot. `direction` is the command that
/// produced the snapshot and is absent on the initial one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PathStep {
    #[serde(flatten)]
    pub pos: Position,
    #[serde(rename = "orient", default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<Direction>,
}

impl PathStep {
    pub fn start(pos: Position) -> Self {
        Self {
            pos,
            direction: None,
        }
    }

    pub fn after(pos: Position, direction: Direction) -> Self {
        Self {
            pos,
            direction: Some(direction),
        }
    }
}

/// Solution of a puzzle: the initial snapshot followed by one snapshot per
/// command. Each snapshot holds one entry per agent, ordered by agent id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Path {
    snapshots: Vec<Vec<PathStep>>,
}

impl Path {
    pub fn new(snapshots: Vec<Vec<PathStep>>) -> Self {
        Self { snapshots }
    }

    pub fn snapshots(&self) -> &[Vec<PathStep>] {
        &self.snapshots
    }

    /// Number of commands.
    pub fn len(&self) -> usize {
        self.snapshots.len().saturating_sub(1)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn commands(&self) -> Vec<Direction> {
        self.snapshots
            .iter()
            .filter_map(|snapshot| snapshot.first().and_then(|step| step.direction))
            .collect()
    }

    pub fn command_names(&self) -> Vec<String> {
        self.commands().iter().map(|d| d.to_string()).collect()
    }

    pub fn initial_positions(&self) -> Vec<Position> {
        Self::positions_of(self.snapshots.first())
    }

    pub fn final_positions(&self) -> Vec<Position> {
        Self::positions_of(self.snapshots.last())
    }

    fn positions_of(snapshot: Option<&Vec<PathStep>>) -> Vec<Position> {
        snapshot
            .map(|s| s.iter().map(|step| step.pos).collect())
            .unwrap_or_default()
    }
}

/// Every cell each agent crosses, command by command, ending with its final
/// position. A command whose end point is not on the straight line from its
/// start went through the grid's teleport, so the walk jumps at the first
/// teleport cell it meets.
pub fn expand_path(path: &Path, grid: &Grid) -> Vec<Vec<Position>> {
    let agent_count = path.snapshots.first().map_or(0, Vec::len);
    let mut crossed = vec![Vec::new(); agent_count];

    for window in path.snapshots.windows(2) {
        for (index, (from, to)) in window[0].iter().zip(&window[1]).enumerate() {
            let Some(direction) = to.direction else {
                continue;
            };
            walk_command(grid, from.pos, to.pos, direction, &mut crossed[index]);
        }
    }

    if let Some(last) = path.snapshots.last() {
        for (index, step) in last.iter().enumerate() {
            crossed[index].push(step.pos);
        }
    }

    crossed
}

/// Union of all cells crossed by any agent.
pub fn visited_cells(path: &Path, grid: &Grid) -> BTreeSet<Position> {
    expand_path(path, grid).into_iter().flatten().collect()
}

fn walk_command(
    grid: &Grid,
    from: Position,
    to: Position,
    direction: Direction,
    out: &mut Vec<Position>,
) {
    let mut current = from;

    if !is_ahead(from, to, direction) {
        while let Some(cell) = grid.cell(&current) {
            out.push(current);
            if let Some(partner) = cell.teleport() {
                current = partner;
                break;
            }
            current = current.step(direction);
        }
    }

    while current != to && grid.contains(&current) {
        out.push(current);
        current = current.step(direction);
    }
}

fn is_ahead(from: Position, to: Position, direction: Direction) -> bool {
    let (dx, dy) = direction.offset();
    if dx != 0 {
        to.y == from.y && (to.x - from.x) * dx >= 0
    } else {
        to.x == from.x && (to.y - from.y) * dy >= 0
    }
}
