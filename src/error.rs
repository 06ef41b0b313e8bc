use std::time::Duration;

use thiserror::Error;

/// Reasons an explicit tile list cannot become a [`Grid`](crate::Grid).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GridError {
    #[error("expected 16 tiles, got {0}")]
    WrongLength(usize),

    #[error("tile {0} is outside 1..=16")]
    OutOfRange(u8),

    #[error("tile {0} appears more than once")]
    Duplicate(u8),
}

/// Failure outcomes of a solve.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SolveError {
    /// The grid fails the parity check, so no move sequence reaches the goal.
    #[error("puzzle is not solvable")]
    Unsolvable,

    /// Every reachable arrangement was expanded without meeting the goal.
    #[error("search exhausted after expanding {expanded} nodes")]
    Exhausted { expanded: usize },

    #[error("node limit of {limit} expansions reached")]
    NodeLimit { limit: usize },

    #[error("time budget exceeded after {elapsed:?}")]
    TimedOut { elapsed: Duration },
}
