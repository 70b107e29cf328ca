use tracing::{debug, info, trace, warn};

use crate::infra::Direction;
use crate::search::{Frontier, MoveResolver, VisitedSet};
use crate::state::{Agent, Grid, Path, SearchState};

/// Optional bound imposed by the caller. The search itself never gives up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchLimits {
    /// Maximum number of states to expand before reporting `LimitReached`.
    pub max_expansions: Option<usize>,
}

impl SearchLimits {
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn with_max_expansions(max_expansions: usize) -> Self {
        Self {
            max_expansions: Some(max_expansions),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// States popped, accepted and expanded.
    pub expanded: usize,
    /// States popped and discarded as dominated.
    pub pruned: usize,
    /// States pushed onto the frontier, the initial one included.
    pub generated: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    Solved(Path),
    /// Every reachable configuration was explored without clearing the food.
    Unsolvable,
    LimitReached,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchReport {
    pub outcome: SearchOutcome,
    pub stats: SearchStats,
}

impl SearchReport {
    pub fn is_solved(&self) -> bool {
        matches!(self.outcome, SearchOutcome::Solved(_))
    }

    pub fn path(&self) -> Option<&Path> {
        match &self.outcome {
            SearchOutcome::Solved(path) => Some(path),
            _ => None,
        }
    }

    pub fn into_path(self) -> Option<Path> {
        match self.outcome {
            SearchOutcome::Solved(path) => Some(path),
            _ => None,
        }
    }
}

/// Finds a command sequence that moves the agents over every food cell.
/// `None` means the puzzle cannot be solved from this configuration.
///
/// With `force_switch_off`, gates stay closed for the whole search; map tools
/// use this to check that a gate really is required.
pub fn find_path(agents: &[Agent], grid: &Grid, force_switch_off: bool) -> Option<Path> {
    find_path_with_limits(agents, grid, force_switch_off, SearchLimits::unbounded()).into_path()
}

pub fn find_path_with_limits(
    agents: &[Agent],
    grid: &Grid,
    force_switch_off: bool,
    limits: SearchLimits,
) -> SearchReport {
    let resolver = MoveResolver::new(grid, force_switch_off);
    let food_total = grid.food_count();

    debug!(
        "Search: starting with {} agents, {} food, force_switch_off: {}",
        agents.len(),
        food_total,
        force_switch_off
    );

    let mut frontier = Frontier::new();
    let mut visited = VisitedSet::new();
    let mut stats = SearchStats {
        generated: 1,
        ..SearchStats::default()
    };
    frontier.push(SearchState::initial(agents));

    while let Some(state) = frontier.pop() {
        if !visited.visit(&state) {
            stats.pruned += 1;
            continue;
        }

        if state.food_count() == food_total {
            info!(
                "Search: solved in {} commands after expanding {} states ({} pruned)",
                state.depth(),
                stats.expanded,
                stats.pruned
            );
            return SearchReport {
                outcome: SearchOutcome::Solved(state.into_path()),
                stats,
            };
        }

        if limits
            .max_expansions
            .is_some_and(|max| stats.expanded >= max)
        {
            warn!(
                "Search: expansion limit reached ({} states, {} in frontier)",
                stats.expanded,
                frontier.len()
            );
            return SearchReport {
                outcome: SearchOutcome::LimitReached,
                stats,
            };
        }

        stats.expanded += 1;
        trace!(
            "Search: expanding depth {} with {}/{} food, switch: {}",
            state.depth(),
            state.food_count(),
            food_total,
            state.switch_on()
        );

        for direction in Direction::ALL {
            let mut next = resolver.apply_command(&state, direction);
            if next.same_configuration(&state) {
                continue;
            }
            next.record_command(direction);
            frontier.push(next);
            stats.generated += 1;
        }
    }

    debug!(
        "Search: exhausted after expanding {} states ({} configurations visited)",
        stats.expanded,
        visited.configurations()
    );
    SearchReport {
        outcome: SearchOutcome::Unsolvable,
        stats,
    }
}

/// Whether some agent could clear the map on its own.
pub fn solvable_with_single_agent(grid: &Grid, agents: &[Agent]) -> bool {
    agents
        .iter()
        .any(|agent| find_path(std::slice::from_ref(agent), grid, false).is_some())
}
