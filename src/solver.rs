//! Greedy best-first search over grid arrangements.
//!
//! Nodes are ordered by heuristic alone, with no accumulated path cost, so the
//! search always finds a solution for a solvable grid but not necessarily the
//! shortest one.

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::time::Instant;

use rustc_hash::{FxHashMap, FxHashSet};

use crate::config::SolverConfig;
use crate::error::SolveError;
use crate::puzzle::{index_to_coordinates, Grid, Move};

const PROGRESS_INTERVAL: usize = 10_000;

/// Misplaced non-blank tiles plus the sum of their Manhattan distances to
/// their goal cells. Zero exactly when the grid is solved.
pub fn heuristic(grid: &Grid) -> u32 {
    let mut misplaced = 0;
    let mut distance = 0;
    for (i, tile) in grid.tiles().iter().enumerate() {
        if tile.is_blank() {
            continue;
        }
        let goal = tile.goal_index();
        if goal != i {
            misplaced += 1;
        }
        let (row, col) = index_to_coordinates(i);
        let (goal_row, goal_col) = index_to_coordinates(goal);
        distance += row.abs_diff(goal_row) + col.abs_diff(goal_col);
    }
    (misplaced + distance) as u32
}

/// Result of a successful search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    /// Blank directions from the input grid to the solved grid.
    pub moves: Vec<Move>,
    /// Number of nodes taken off the frontier.
    pub expanded: usize,
}

#[derive(Debug, Clone, Default)]
pub struct Solver {
    config: SolverConfig,
}

impl Solver {
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    pub fn solve(&self, grid: &Grid) -> Result<Vec<Move>, SolveError> {
        self.search(grid).map(|solution| solution.moves)
    }

    pub fn search(&self, grid: &Grid) -> Result<Solution, SolveError> {
        if !grid.is_solvable() {
            log::warn!("refusing to search unsolvable grid {:?}", grid.numbers());
            return Err(SolveError::Unsolvable);
        }

        let started = Instant::now();
        let mut search = Search::new(grid.clone());
        log::debug!("search started, root heuristic {}", search.nodes[0].heuristic);

        let result = search.run(&self.config, started);
        match &result {
            Ok(solution) => log::debug!(
                "solved in {} moves: expanded {}, frontier {}, cached {}, {:?}",
                solution.moves.len(),
                solution.expanded,
                search.frontier.len(),
                search.cache.len(),
                started.elapsed()
            ),
            Err(err) => log::debug!("search stopped: {err}"),
        }
        result
    }
}

/// One state in the search tree. `parent` indexes into the node arena.
#[derive(Debug)]
struct SearchNode {
    grid: Grid,
    heuristic: u32,
    parent: Option<usize>,
    movement: Option<Move>,
}

/// State scoped to a single solve.
struct Search {
    nodes: Vec<SearchNode>,
    /// Lowest heuristic first; ties go to the earlier node.
    frontier: BinaryHeap<Reverse<(u32, usize)>>,
    in_frontier: FxHashSet<u64>,
    explored: FxHashSet<u64>,
    cache: FxHashMap<u64, u32>,
}

impl Search {
    fn new(root: Grid) -> Self {
        let mut search = Self {
            nodes: Vec::new(),
            frontier: BinaryHeap::new(),
            in_frontier: FxHashSet::default(),
            explored: FxHashSet::default(),
            cache: FxHashMap::default(),
        };
        let key = root.key();
        let score = search.score(key, &root);
        search.push(SearchNode {
            grid: root,
            heuristic: score,
            parent: None,
            movement: None,
        });
        search
    }

    fn score(&mut self, key: u64, grid: &Grid) -> u32 {
        *self.cache.entry(key).or_insert_with(|| heuristic(grid))
    }

    fn push(&mut self, node: SearchNode) {
        let index = self.nodes.len();
        self.in_frontier.insert(node.grid.key());
        self.frontier.push(Reverse((node.heuristic, index)));
        self.nodes.push(node);
    }

    fn run(&mut self, config: &SolverConfig, started: Instant) -> Result<Solution, SolveError> {
        let mut expanded = 0;

        while let Some(Reverse((_, index))) = self.frontier.pop() {
            if let Some(limit) = config.max_expanded {
                if expanded >= limit {
                    return Err(SolveError::NodeLimit { limit });
                }
            }
            if let Some(budget) = config.time_budget {
                let elapsed = started.elapsed();
                if elapsed > budget {
                    return Err(SolveError::TimedOut { elapsed });
                }
            }

            expanded += 1;
            if expanded % PROGRESS_INTERVAL == 0 {
                log::trace!(
                    "expanded {expanded}, frontier {}, best heuristic {}",
                    self.frontier.len(),
                    self.nodes[index].heuristic
                );
            }

            let key = self.nodes[index].grid.key();
            self.in_frontier.remove(&key);
            self.explored.insert(key);

            if self.nodes[index].grid.is_solved() {
                return Ok(Solution {
                    moves: self.build_path(index),
                    expanded,
                });
            }

            self.expand(index);
        }

        Err(SolveError::Exhausted { expanded })
    }

    fn expand(&mut self, index: usize) {
        let moves: Vec<_> = self.nodes[index].grid.legal_moves().collect();
        for (movement, target) in moves {
            let mut child = self.nodes[index].grid.clone();
            child.move_tile(target);

            let key = child.key();
            if self.explored.contains(&key) || self.in_frontier.contains(&key) {
                continue;
            }

            let score = self.score(key, &child);
            self.push(SearchNode {
                grid: child,
                heuristic: score,
                parent: Some(index),
                movement: Some(movement),
            });
        }
    }

    /// Walks parent links from `goal` back to the root.
    fn build_path(&self, goal: usize) -> Vec<Move> {
        let mut path = Vec::new();
        let mut current = goal;
        while let Some(parent) = self.nodes[current].parent {
            if let Some(movement) = self.nodes[current].movement {
                path.push(movement);
            }
            current = parent;
        }
        path.reverse();
        path
    }
}
