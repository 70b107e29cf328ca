use std::collections::HashMap;

use crate::state::{FoodSet, SearchState, StateKey};

/// Expanded states, bucketed by configuration. Each bucket keeps the food
/// sets reached at that configuration; none of them is a subset of another.
#[derive(Debug, Default)]
pub struct VisitedSet {
    buckets: HashMap<StateKey, Vec<FoodSet>>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when some visited state has the same configuration and at least
    /// the same food.
    pub fn is_dominated(&self, state: &SearchState) -> bool {
        self.buckets
            .get(&state.key())
            .is_some_and(|sets| sets.iter().any(|food| state.food().is_subset(food)))
    }

    /// Records `state` unless it is dominated. Returns whether it was recorded.
    pub fn visit(&mut self, state: &SearchState) -> bool {
        let bucket = self.buckets.entry(state.key()).or_default();
        if bucket.iter().any(|food| state.food().is_subset(food)) {
            return false;
        }
        // Anything the new set covers can no longer prune on its own.
        bucket.retain(|food| !food.is_subset(state.food()));
        bucket.push(state.food().clone());
        true
    }

    /// Number of distinct configurations seen.
    pub fn configurations(&self) -> usize {
        self.buckets.len()
    }

    /// Number of stored food sets across all configurations.
    pub fn len(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}
