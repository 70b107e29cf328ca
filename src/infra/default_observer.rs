use std::io::{self, Write};

use tracing::{info, warn};

use crate::infra::{MapError, SolveObserver};
use crate::search::{SearchOutcome, SearchReport};
use crate::state::{Agent, Grid};

/// Logs every map and, when `show_map` is set, prints its drawing with the
/// agents at their final positions.
pub struct DefaultObserver {
    pub show_map: bool,
}

impl DefaultObserver {
    pub fn new(show_map: bool) -> Self {
        Self { show_map }
    }
}

impl SolveObserver for DefaultObserver {
    fn on_map_loaded(&mut self, name: &str, grid: &Grid, agents: &[Agent]) {
        info!("Map {} loaded", name);
        info!("- size: {}x{}", grid.width, grid.height);
        info!("- agents: {}, food: {}", agents.len(), grid.food_count());
        if grid.has_gates() {
            info!("- gates: {}", grid.cells().filter(|c| c.gate().is_some()).count());
        }
        if let Some((first, second)) = grid.teleport_pair() {
            info!("- teleport: {} <-> {}", first, second);
        }
    }

    fn on_map_searched(&mut self, name: &str, grid: &Grid, report: &SearchReport) {
        let stats = report.stats;
        match &report.outcome {
            SearchOutcome::Solved(path) => {
                info!(
                    "Map {} solved in {} commands: {}",
                    name,
                    path.len(),
                    path.command_names().join(", ")
                );
                if self.show_map {
                    let agents = Agent::from_positions(&path.final_positions());
                    let _ = writeln!(io::stdout(), "{}", grid.draw_ascii(&agents));
                }
            }
            SearchOutcome::Unsolvable => info!("Map {} is unsolvable", name),
            SearchOutcome::LimitReached => warn!("Map {} hit the expansion limit", name),
        }
        info!(
            "- expanded: {}, pruned: {}, generated: {}",
            stats.expanded, stats.pruned, stats.generated
        );
    }

    fn on_map_failed(&mut self, name: &str, error: &MapError) {
        warn!("Map {} skipped: {}", name, error);
    }

    fn on_batch_finished(&mut self, solved: usize, total: usize) {
        info!("Solved {}/{} maps", solved, total);
    }
}
