//! Path planning over the grid world.
//!
//! This module provides:
//! - BFS, uniform-cost and A* search sharing one best-first loop
//! - The [`Planner`] seam the hybrid agent consults for goal-directed moves

mod search;

pub use search::{search, Algorithm, PlanError, SearchResult};

use crate::simulation::environment::{GridWorld, Position};

/// Parses algorithm names such as `["bfs", "astar"]`, in order.
pub fn parse_algorithms<S: AsRef<str>>(names: &[S]) -> crate::error::Result<Vec<Algorithm>> {
    names
        .iter()
        .map(|name| Ok(name.as_ref().parse::<Algorithm>()?))
        .collect()
}

/// Plans a route from a cell to the world's goal.
pub trait Planner {
    /// Returns a path starting at `from` and ending at the goal.
    fn plan(&self, world: &GridWorld, from: Position) -> Result<SearchResult, PlanError>;
}

/// Planner backed by [`search`] with a fixed algorithm.
#[derive(Clone, Copy, Debug, Default)]
pub struct SearchPlanner {
    algorithm: Algorithm,
}

impl SearchPlanner {
    #[must_use]
    pub const fn new(algorithm: Algorithm) -> Self {
        Self { algorithm }
    }

    #[must_use]
    pub const fn algorithm(&self) -> Algorithm {
        self.algorithm
    }
}

impl Planner for SearchPlanner {
    fn plan(&self, world: &GridWorld, from: Position) -> Result<SearchResult, PlanError> {
        search(world, from, world.goal(), self.algorithm)
    }
}
