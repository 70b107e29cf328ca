mod agent;
mod grid;
mod path;
mod search_state;

pub use agent::Agent;
pub use grid::{Cell, Gate, Grid, Switch};
pub use path::{Path, PathStep, expand_path, visited_cells};
pub use search_state::{FoodSet, SearchState, StateKey};
