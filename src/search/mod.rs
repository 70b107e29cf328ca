mod driver;
mod frontier;
mod resolver;
mod visited;

pub use driver::{
    SearchLimits, SearchOutcome, SearchReport, SearchStats, find_path, find_path_with_limits,
    solvable_with_single_agent,
};
pub use frontier::Frontier;
pub use resolver::{MoveResolver, Step, resolution_order};
pub use visited::VisitedSet;
