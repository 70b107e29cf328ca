use crate::infra::Position;

/// A controllable piece. `id` follows input order and never changes; only
/// `pos` moves during search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Agent {
    pub id: usize,
    pub pos: Position,
}

impl Agent {
    pub fn new(id: usize, pos: Position) -> Self {
        Self { id, pos }
    }

    /// Agents numbered by their order in `positions`.
    pub fn from_positions(positions: &[Position]) -> Vec<Agent> {
        positions
            .iter()
            .enumerate()
            .map(|(id, pos)| Agent::new(id, *pos))
            .collect()
    }
}
