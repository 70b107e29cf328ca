pub mod infra;
pub mod search;
pub mod state;

// Re-export commonly used types for convenience
pub use infra::{Direction, MapError, MapFile, Position};
pub use search::{SearchLimits, SearchOutcome, SearchReport, find_path, find_path_with_limits};
pub use state::{Agent, Grid, Path};
