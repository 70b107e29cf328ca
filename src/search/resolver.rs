use std::cmp::Reverse;
use std::collections::HashSet;

use tracing::warn;

use crate::infra::{Direction, Position};
use crate::state::{Agent, Grid, SearchState};

/// Result of one successful resolution step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub to: Position,
    /// Toggle value after the step.
    pub switch_on: bool,
    /// The step was a teleport jump; the next step from `to` may not jump again.
    pub teleported: bool,
    /// Food cell entered by this step.
    pub food: Option<Position>,
}

/// Movement rules for agents on one grid.
pub struct MoveResolver<'a> {
    grid: &'a Grid,
    force_switch_off: bool,
}

impl<'a> MoveResolver<'a> {
    /// With `force_switch_off`, gates stay closed whatever the toggle says.
    pub fn new(grid: &'a Grid, force_switch_off: bool) -> Self {
        Self {
            grid,
            force_switch_off,
        }
    }

    pub fn grid(&self) -> &'a Grid {
        self.grid
    }

    /// Tries to leave `from` towards `direction`. Checks run in a fixed order:
    /// teleport, gate, occupancy, wall. Returns `None` when blocked.
    pub fn resolve(
        &self,
        from: Position,
        direction: Direction,
        switch_on: bool,
        continuation: bool,
        others: &[Position],
    ) -> Option<Step> {
        let cell = self.grid.cell(&from)?;

        if !continuation && let Some(partner) = cell.teleport() {
            if others.contains(&partner) {
                return None;
            }
            return Some(Step {
                to: partner,
                switch_on,
                teleported: true,
                food: None,
            });
        }

        if let Some(gate) = cell.gate() {
            let gate_open = switch_on && !self.force_switch_off;
            if gate.blocks(direction, gate_open) {
                return None;
            }
        }

        let to = from.step(direction);
        if others.contains(&to) || cell.has_wall(direction) {
            return None;
        }

        // Leaving the grid counts as hitting a wall.
        let next = self.grid.cell(&to)?;

        Some(Step {
            to,
            switch_on: if cell.switch().is_some() {
                !switch_on
            } else {
                switch_on
            },
            teleported: false,
            food: next.has_food().then_some(to),
        })
    }

    /// Moves agent `index` of `state` in `direction` until blocked, recording
    /// collected food and toggle flips on `state`. Returns whether it moved.
    pub fn slide(&self, state: &mut SearchState, index: usize, direction: Direction) -> bool {
        let start = state.agents()[index].pos;
        let others: Vec<Position> = state
            .agents()
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != index)
            .map(|(_, a)| a.pos)
            .collect();

        let mut pos = start;
        let mut switch_on = state.switch_on();
        let mut continuation = false;
        let mut seen = HashSet::new();

        loop {
            // A repeated (cell, continuation, toggle) means the teleports form
            // a cycle along this line; stop where we are.
            if !seen.insert((pos, continuation, switch_on)) {
                warn!(
                    "Resolver: slide {} from {} cycles through teleports, stopping at {}",
                    direction, start, pos
                );
                break;
            }

            let Some(step) = self.resolve(pos, direction, switch_on, continuation, &others) else {
                break;
            };

            pos = step.to;
            switch_on = step.switch_on;
            continuation = step.teleported;
            if let Some(food) = step.food {
                state.collect_food(food);
            }
        }

        state.set_position(index, pos);
        state.set_switch(switch_on);
        pos != start
    }

    /// Applies one shared command to every agent and returns the new state.
    /// The path of the returned state is not extended.
    pub fn apply_command(&self, state: &SearchState, direction: Direction) -> SearchState {
        let mut next = state.clone();
        for index in resolution_order(state.agents(), direction) {
            self.slide(&mut next, index, direction);
        }
        next
    }
}

/// Agent indices in the order they move for `direction`: the agent furthest
/// along the direction goes first, so followers find its cell already empty.
pub fn resolution_order(agents: &[Agent], direction: Direction) -> Vec<usize> {
    let mut order: Vec<usize> = (0..agents.len()).collect();
    match direction {
        Direction::Right => order.sort_by_key(|&i| Reverse(agents[i].pos.x)),
        Direction::Left => order.sort_by_key(|&i| agents[i].pos.x),
        Direction::Down => order.sort_by_key(|&i| Reverse(agents[i].pos.y)),
        Direction::Up => order.sort_by_key(|&i| agents[i].pos.y),
    }
    order
}
