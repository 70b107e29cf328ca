use std::collections::{BTreeMap, VecDeque};

use crate::state::SearchState;

/// Best-first worklist: states with more food collected come out first,
/// states with equal food come out in insertion order.
#[derive(Debug, Default)]
pub struct Frontier {
    levels: BTreeMap<usize, VecDeque<SearchState>>,
    len: usize,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, state: SearchState) {
        self.levels
            .entry(state.food_count())
            .or_default()
            .push_back(state);
        self.len += 1;
    }

    pub fn pop(&mut self) -> Option<SearchState> {
        let mut level = self.levels.last_entry()?;
        let state = level.get_mut().pop_front();
        if level.get().is_empty() {
            level.remove();
        }
        if state.is_some() {
            self.len -= 1;
        }
        state
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::Position;
    use crate::state::Agent;

    fn state_with_food(start_x: i32, food: &[Position]) -> SearchState {
        let mut state = SearchState::initial(&[Agent::new(0, Position::new(start_x, 0))]);
        for pos in food {
            state.collect_food(*pos);
        }
        state
    }

    #[test]
    fn test_more_food_pops_first() {
        let mut frontier = Frontier::new();
        frontier.push(state_with_food(0, &[]));
        frontier.push(state_with_food(1, &[Position::new(5, 5)]));
        frontier.push(state_with_food(2, &[]));

        assert_eq!(frontier.len(), 3);
        assert_eq!(frontier.pop().unwrap().food_count(), 1);
        assert_eq!(frontier.pop().unwrap().agents()[0].pos.x, 0);
        assert_eq!(frontier.pop().unwrap().agents()[0].pos.x, 2);
        assert!(frontier.pop().is_none());
        assert!(frontier.is_empty());
    }

    #[test]
    fn test_equal_food_is_fifo() {
        let mut frontier = Frontier::new();
        for x in 0..5 {
            frontier.push(state_with_food(x, &[Position::new(9, 9)]));
        }
        let order: Vec<i32> = std::iter::from_fn(|| frontier.pop())
            .map(|s| s.agents()[0].pos.x)
            .collect();
        assert_eq!(order, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_late_richer_state_jumps_queue() {
        let mut frontier = Frontier::new();
        frontier.push(state_with_food(0, &[]));
        frontier.push(state_with_food(1, &[]));
        assert_eq!(frontier.pop().unwrap().agents()[0].pos.x, 0);

        frontier.push(state_with_food(2, &[Position::new(1, 1)]));
        assert_eq!(frontier.pop().unwrap().agents()[0].pos.x, 2);
        assert_eq!(frontier.pop().unwrap().agents()[0].pos.x, 1);
    }
}
