use std::collections::BTreeSet;

use crate::infra::{Direction, Position};
use crate::state::{Agent, Path, PathStep};

pub type FoodSet = BTreeSet<Position>;

/// Physical configuration of a search state: where the agents stand
/// (ignoring which agent is where) and the toggle value. Food is left out so
/// that every state of one configuration lands in the same bucket.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StateKey {
    pub positions: Vec<Position>,
    pub switch_on: bool,
}

/// Snapshot of a partial plan. A fresh copy is made for every command tried,
/// so a state is never changed once it sits in the frontier or visited set.
#[derive(Debug, Clone)]
pub struct SearchState {
    /// Ordered by agent id.
    agents: Vec<Agent>,
    switch_on: bool,
    food: FoodSet,
    path: Vec<Vec<PathStep>>,
}

impl SearchState {
    pub fn initial(agents: &[Agent]) -> Self {
        let mut agents = agents.to_vec();
        agents.sort_by_key(|a| a.id);
        let start = agents.iter().map(|a| PathStep::start(a.pos)).collect();
        Self {
            agents,
            switch_on: false,
            food: FoodSet::new(),
            path: vec![start],
        }
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn switch_on(&self) -> bool {
        self.switch_on
    }

    pub fn food(&self) -> &FoodSet {
        &self.food
    }

    pub fn food_count(&self) -> usize {
        self.food.len()
    }

    /// Commands taken from the initial state.
    pub fn depth(&self) -> usize {
        self.path.len() - 1
    }

    pub fn sorted_positions(&self) -> Vec<Position> {
        let mut positions: Vec<Position> = self.agents.iter().map(|a| a.pos).collect();
        positions.sort();
        positions
    }

    pub fn key(&self) -> StateKey {
        StateKey {
            positions: self.sorted_positions(),
            switch_on: self.switch_on,
        }
    }

    /// `self <= other`: same configuration and no food that `other` lacks.
    pub fn is_dominated_by(&self, other: &SearchState) -> bool {
        self.switch_on == other.switch_on
            && self.sorted_positions() == other.sorted_positions()
            && self.food.is_subset(&other.food)
    }

    /// Equal positions, toggle and food, regardless of how they were reached.
    pub fn same_configuration(&self, other: &SearchState) -> bool {
        self.switch_on == other.switch_on
            && self.food == other.food
            && self.sorted_positions() == other.sorted_positions()
    }

    pub fn path(&self) -> &[Vec<PathStep>] {
        &self.path
    }

    pub fn into_path(self) -> Path {
        Path::new(self.path)
    }

    pub(crate) fn set_position(&mut self, index: usize, pos: Position) {
        self.agents[index].pos = pos;
    }

    pub(crate) fn set_switch(&mut self, switch_on: bool) {
        self.switch_on = switch_on;
    }

    /// Returns false when the food was already collected.
    pub(crate) fn collect_food(&mut self, pos: Position) -> bool {
        self.food.insert(pos)
    }

    pub(crate) fn record_command(&mut self, direction: Direction) {
        let snapshot = self
            .agents
            .iter()
            .map(|a| PathStep::after(a.pos, direction))
            .collect();
        self.path.push(snapshot);
    }
}

impl PartialEq for SearchState {
    fn eq(&self, other: &Self) -> bool {
        self.same_configuration(other) && self.path == other.path
    }
}

impl Eq for SearchState {}
