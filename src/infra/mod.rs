mod batch;
mod default_observer;
mod map_file;
mod solve_observer;
mod types;

pub use batch::{BatchOptions, Solutions, solve_folder, solve_map_file, write_solutions};
pub use default_observer::DefaultObserver;
pub use map_file::{
    CellRecord, GateCellRecord, GateRecord, MapError, MapFile, PointRecord, load_map, parse_map,
    parse_text_level,
};
pub use solve_observer::SolveObserver;
pub use types::{Direction, ParseDirectionError, Position};

