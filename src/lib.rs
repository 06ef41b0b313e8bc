//! 15-puzzle state model and solver.

pub mod config;
pub mod error;
pub mod puzzle;
pub mod solver;

pub use config::SolverConfig;
pub use error::{GridError, SolveError};
pub use puzzle::{coordinates_to_index, index_to_coordinates, Grid, Move, Tile, SIDE, TILE_COUNT};
pub use solver::{heuristic, Solution, Solver};
