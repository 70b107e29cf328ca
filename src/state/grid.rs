use std::fmt::Write as _;

use crate::infra::{Direction, Position};
use crate::state::Agent;

/// Toggle source. Its on/off value is not stored here: the search carries it
/// as part of every state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Switch {
    pub pos: Position,
}

/// Directional barrier controlled by a switch. Blocks `direction` while the
/// toggle is off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Gate {
    pub pos: Position,
    pub direction: Direction,
    pub switch: usize,
}

impl Gate {
    pub fn blocks(&self, direction: Direction, switch_on: bool) -> bool {
        !switch_on && self.direction == direction
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub pos: Position,
    walls: u8,
    food: bool,
    teleport: Option<Position>,
    switch: Option<usize>,
    gate: Option<Gate>,
}

impl Cell {
    fn new(pos: Position) -> Self {
        Self {
            pos,
            walls: 0,
            food: false,
            teleport: None,
            switch: None,
            gate: None,
        }
    }

    pub fn has_wall(&self, direction: Direction) -> bool {
        self.walls & direction.bit() != 0
    }

    pub fn walls(&self) -> impl Iterator<Item = Direction> + '_ {
        Direction::ALL.into_iter().filter(|d| self.has_wall(*d))
    }

    pub fn has_food(&self) -> bool {
        self.food
    }

    pub fn teleport(&self) -> Option<Position> {
        self.teleport
    }

    pub fn switch(&self) -> Option<usize> {
        self.switch
    }

    pub fn gate(&self) -> Option<&Gate> {
        self.gate.as_ref()
    }
}

/// Static maze topology. Built once, then only read while searching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    pub width: i32,
    pub height: i32,
    cells: Vec<Cell>,
    switches: Vec<Switch>,
}

impl Grid {
    pub fn new(width: i32, height: i32) -> Self {
        let width = width.max(0);
        let height = height.max(0);
        let cells = (0..height)
            .flat_map(|y| (0..width).map(move |x| Cell::new(Position::new(x, y))))
            .collect();
        Self {
            width,
            height,
            cells,
            switches: Vec::new(),
        }
    }

    pub fn square(size: i32) -> Self {
        Self::new(size, size)
    }

    /// Square grid with every boundary edge walled off.
    pub fn enclosed(size: i32) -> Self {
        let mut grid = Self::square(size);
        grid.enclose();
        grid
    }

    pub fn contains(&self, pos: &Position) -> bool {
        pos.x >= 0 && pos.x < self.width && pos.y >= 0 && pos.y < self.height
    }

    fn index(&self, pos: &Position) -> Option<usize> {
        if self.contains(pos) {
            Some((pos.y * self.width + pos.x) as usize)
        } else {
            None
        }
    }

    pub fn cell(&self, pos: &Position) -> Option<&Cell> {
        self.index(pos).map(|i| &self.cells[i])
    }

    fn cell_mut(&mut self, pos: &Position) -> Option<&mut Cell> {
        let index = self.index(pos)?;
        Some(&mut self.cells[index])
    }

    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    pub fn switches(&self) -> &[Switch] {
        &self.switches
    }

    // ------------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------------

    /// Wall on a single cell side. Returns false when `pos` is off the grid.
    pub fn add_wall(&mut self, pos: Position, direction: Direction) -> bool {
        match self.cell_mut(&pos) {
            Some(cell) => {
                cell.walls |= direction.bit();
                true
            }
            None => false,
        }
    }

    /// Wall on both sides of the edge between `pos` and its neighbour.
    pub fn add_wall_between(&mut self, pos: Position, direction: Direction) -> bool {
        if !self.add_wall(pos, direction) {
            return false;
        }
        self.add_wall(pos.step(direction), direction.opposite());
        true
    }

    pub fn enclose(&mut self) {
        for x in 0..self.width {
            self.add_wall(Position::new(x, 0), Direction::Up);
            self.add_wall(Position::new(x, self.height - 1), Direction::Down);
        }
        for y in 0..self.height {
            self.add_wall(Position::new(0, y), Direction::Left);
            self.add_wall(Position::new(self.width - 1, y), Direction::Right);
        }
    }

    pub fn add_food(&mut self, pos: Position) -> bool {
        match self.cell_mut(&pos) {
            Some(cell) => {
                cell.food = true;
                true
            }
            None => false,
        }
    }

    /// Pairs two cells so that leaving either one lands on the other.
    pub fn add_teleport(&mut self, first: Position, second: Position) -> bool {
        if !self.contains(&first) || !self.contains(&second) || first == second {
            return false;
        }
        if let Some(cell) = self.cell_mut(&first) {
            cell.teleport = Some(second);
        }
        if let Some(cell) = self.cell_mut(&second) {
            cell.teleport = Some(first);
        }
        true
    }

    /// Places a switch and returns its id for gates to reference.
    pub fn add_switch(&mut self, pos: Position) -> Option<usize> {
        let id = self.switches.len();
        let cell = self.cell_mut(&pos)?;
        cell.switch = Some(id);
        self.switches.push(Switch { pos });
        Some(id)
    }

    pub fn add_gate(&mut self, pos: Position, direction: Direction, switch: usize) -> bool {
        if switch >= self.switches.len() {
            return false;
        }
        match self.cell_mut(&pos) {
            Some(cell) => {
                cell.gate = Some(Gate {
                    pos,
                    direction,
                    switch,
                });
                true
            }
            None => false,
        }
    }

    /// Gate pair across one edge: both neighbouring cells block the shared side.
    pub fn add_gate_between(&mut self, pos: Position, direction: Direction, switch: usize) -> bool {
        if !self.add_gate(pos, direction, switch) {
            return false;
        }
        self.add_gate(pos.step(direction), direction.opposite(), switch);
        true
    }

    // ------------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------------

    pub fn food_count(&self) -> usize {
        self.cells.iter().filter(|c| c.food).count()
    }

    pub fn food_positions(&self) -> Vec<Position> {
        self.cells.iter().filter(|c| c.food).map(|c| c.pos).collect()
    }

    /// First teleport pair in row-major order.
    pub fn teleport_pair(&self) -> Option<(Position, Position)> {
        self.cells
            .iter()
            .find_map(|c| c.teleport.map(|other| (c.pos, other)))
    }

    pub fn has_gates(&self) -> bool {
        self.cells.iter().any(|c| c.gate.is_some())
    }

    pub fn has_teleports(&self) -> bool {
        self.cells.iter().any(|c| c.teleport.is_some())
    }

    /// Text drawing: two characters per cell, walls as `|` and `_`.
    pub fn draw_ascii(&self, agents: &[Agent]) -> String {
        let mut output = String::new();

        output.push(' ');
        for x in 0..self.width {
            let top = self
                .cell(&Position::new(x, 0))
                .is_some_and(|c| c.has_wall(Direction::Up));
            output.push_str(if top { "_ " } else { "  " });
        }
        output.push('\n');

        for y in 0..self.height {
            let left = self
                .cell(&Position::new(0, y))
                .is_some_and(|c| c.has_wall(Direction::Left));
            output.push(if left { '|' } else { ' ' });

            for x in 0..self.width {
                let pos = Position::new(x, y);
                let Some(cell) = self.cell(&pos) else {
                    continue;
                };

                let symbol = if let Some(agent) = agents.iter().find(|a| a.pos == pos) {
                    char::from_digit((agent.id % 10) as u32, 10).unwrap_or('@')
                } else if cell.food {
                    '*'
                } else if cell.teleport.is_some() {
                    'T'
                } else if cell.switch.is_some() {
                    'S'
                } else if cell.gate.is_some() {
                    'G'
                } else if cell.has_wall(Direction::Down) {
                    '_'
                } else {
                    '.'
                };
                output.push(symbol);
                output.push(if cell.has_wall(Direction::Right) { '|' } else { ' ' });
            }
            let _ = writeln!(output);
        }

        output
    }
}
