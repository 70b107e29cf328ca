use crate::infra::MapError;
use crate::search::SearchReport;
use crate::state::{Agent, Grid};

/// Trait for observing a batch solve
pub trait SolveObserver {
    /// Called when a map has been loaded and built
    fn on_map_loaded(&mut self, name: &str, grid: &Grid, agents: &[Agent]);

    /// Called when the search for a map finishes, solved or not
    fn on_map_searched(&mut self, name: &str, grid: &Grid, report: &SearchReport);

    /// Called when a map cannot be read or built
    fn on_map_failed(&mut self, name: &str, error: &MapError);

    /// Called once every map has been handled
    fn on_batch_finished(&mut self, _solved: usize, _total: usize) {
        // Default implementation does nothing
    }
}
