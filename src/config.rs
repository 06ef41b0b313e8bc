use std::time::Duration;

/// Budgets applied between frontier pops. The default imposes none, so a
/// solvable grid always runs to completion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SolverConfig {
    /// Maximum number of nodes to expand before giving up.
    pub max_expanded: Option<usize>,
    /// Wall-clock budget for a single solve.
    pub time_budget: Option<Duration>,
}

impl SolverConfig {
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn with_max_expanded(mut self, limit: usize) -> Self {
        self.max_expanded = Some(limit);
        self
    }

    pub fn with_time_budget(mut self, budget: Duration) -> Self {
        self.time_budget = Some(budget);
        self
    }
}
