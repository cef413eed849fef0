//! Uninformed and informed graph search over the grid.
//!
//! All three algorithms share one best-first loop; they differ only in the
//! frontier ordering:
//! - BFS: insertion order (FIFO)
//! - UCS: path cost `g`
//! - A*:  `g + h`, with `h` the Manhattan distance to the goal
//!
//! Moves are 4-connected with unit cost; obstacle cells are impassable.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

use log::{debug, trace};
use thiserror::Error;

use crate::simulation::environment::{GridWorld, Position};

/// Search algorithm selector.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Algorithm {
    /// Breadth-first search
    Bfs,
    /// Uniform-cost search
    Ucs,
    /// A* with Manhattan heuristic
    #[default]
    AStar,
}

impl Algorithm {
    /// Returns all algorithms.
    #[must_use]
    pub const fn all() -> [Algorithm; 3] {
        [Algorithm::Bfs, Algorithm::Ucs, Algorithm::AStar]
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Bfs => "bfs",
            Self::Ucs => "ucs",
            Self::AStar => "astar",
        };
        f.write_str(name)
    }
}

impl FromStr for Algorithm {
    type Err = PlanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bfs" => Ok(Self::Bfs),
            "ucs" => Ok(Self::Ucs),
            "astar" | "a*" => Ok(Self::AStar),
            other => Err(PlanError::UnknownAlgorithm(other.to_string())),
        }
    }
}

/// Reason a search failed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlanError {
    #[error("start or goal {0} is outside the grid")]
    OutOfBounds(Position),

    #[error("start or goal {0} is an obstacle")]
    Blocked(Position),

    #[error("no path from {from} to {to} after expanding {nodes_expanded} nodes")]
    NoPath {
        from: Position,
        to: Position,
        nodes_expanded: usize,
    },

    #[error("unknown search algorithm '{0}'")]
    UnknownAlgorithm(String),
}

/// A successful search.
#[derive(Clone, Debug, PartialEq)]
pub struct SearchResult {
    /// Cells from start to goal, both inclusive
    pub path: Vec<Position>,
    /// Total path cost
    pub cost: f64,
    /// Number of nodes expanded during search
    pub nodes_expanded: usize,
}

/// Frontier entry. Ordered as a min-heap on `priority`, then FIFO on `seq`.
#[derive(Clone, Debug)]
struct FrontierNode {
    position: Position,
    g_cost: u32,
    priority: u32,
    seq: u64,
}

impl PartialEq for FrontierNode {
    fn eq(&self, other: &Self) -> bool {
        self.priority == other.priority && self.seq == other.seq
    }
}

impl Eq for FrontierNode {}

impl Ord for FrontierNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap behavior
        other
            .priority
            .cmp(&self.priority)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for FrontierNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Finds a path from `from` to `to` using `algorithm`.
pub fn search(
    world: &GridWorld,
    from: Position,
    to: Position,
    algorithm: Algorithm,
) -> Result<SearchResult, PlanError> {
    trace!("[{algorithm}] search: {from} -> {to}");

    for endpoint in [from, to] {
        if !world.in_bounds(endpoint) {
            return Err(PlanError::OutOfBounds(endpoint));
        }
        if world.is_obstacle(endpoint) {
            return Err(PlanError::Blocked(endpoint));
        }
    }

    let priority = |g: u32, p: Position| -> u32 {
        match algorithm {
            // BFS ignores cost; seq alone orders the frontier
            Algorithm::Bfs => 0,
            Algorithm::Ucs => g,
            Algorithm::AStar => g + p.manhattan(to),
        }
    };

    let mut open_set = BinaryHeap::new();
    let mut closed_set = HashSet::new();
    let mut came_from: HashMap<Position, Position> = HashMap::new();
    let mut g_scores: HashMap<Position, u32> = HashMap::new();
    let mut seq = 0_u64;

    open_set.push(FrontierNode {
        position: from,
        g_cost: 0,
        priority: priority(0, from),
        seq,
    });
    g_scores.insert(from, 0);

    let mut nodes_expanded = 0;

    while let Some(current) = open_set.pop() {
        if !closed_set.insert(current.position) {
            continue;
        }
        nodes_expanded += 1;

        if current.position == to {
            let path = reconstruct_path(&came_from, to);
            trace!(
                "[{algorithm}] SUCCESS: {} cells, cost={}, nodes_expanded={nodes_expanded}",
                path.len(),
                current.g_cost
            );
            return Ok(SearchResult {
                path,
                cost: f64::from(current.g_cost),
                nodes_expanded,
            });
        }

        for neighbor in world.neighbors(current.position) {
            if closed_set.contains(&neighbor) || world.is_obstacle(neighbor) {
                continue;
            }
            let tentative_g = current.g_cost + 1;
            let known_g = g_scores.get(&neighbor).copied().unwrap_or(u32::MAX);
            if tentative_g < known_g {
                came_from.insert(neighbor, current.position);
                g_scores.insert(neighbor, tentative_g);
                seq += 1;
                open_set.push(FrontierNode {
                    position: neighbor,
                    g_cost: tentative_g,
                    priority: priority(tentative_g, neighbor),
                    seq,
                });
            }
        }
    }

    debug!("[{algorithm}] FAILED: no path after expanding {nodes_expanded} nodes");
    Err(PlanError::NoPath {
        from,
        to,
        nodes_expanded,
    })
}

fn reconstruct_path(came_from: &HashMap<Position, Position>, goal: Position) -> Vec<Position> {
    let mut path = vec![goal];
    let mut current = goal;
    while let Some(&prev) = came_from.get(&current) {
        path.push(prev);
        current = prev;
    }
    path.reverse();
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(row: i32, col: i32) -> Position {
        Position::new(row, col)
    }

    #[test]
    fn test_algorithm_parse_and_display() {
        for algorithm in Algorithm::all() {
            assert_eq!(algorithm.to_string().parse::<Algorithm>().unwrap(), algorithm);
        }
        assert_eq!("A*".parse::<Algorithm>().unwrap(), Algorithm::AStar);
        assert!("dfs".parse::<Algorithm>().is_err());
    }

    #[test]
    fn test_all_algorithms_find_optimal_path_on_open_grid() {
        let world = GridWorld::new(5, 5);
        for algorithm in Algorithm::all() {
            let result = search(&world, world.start(), world.goal(), algorithm).unwrap();
            assert_eq!(result.path.first(), Some(&world.start()));
            assert_eq!(result.path.last(), Some(&world.goal()));
            assert_eq!(result.path.len(), 9, "{algorithm}");
            assert!((result.cost - 8.0).abs() < 1e-10);
        }
    }

    #[test]
    fn test_path_is_contiguous_and_avoids_obstacles() {
        let mut world = GridWorld::new(4, 4);
        for row in 0..3 {
            world.set_obstacle(pos(row, 1), true).unwrap();
        }
        let result = search(&world, world.start(), world.goal(), Algorithm::AStar).unwrap();

        for pair in result.path.windows(2) {
            assert_eq!(pair[0].manhattan(pair[1]), 1);
        }
        assert!(result.path.iter().all(|&p| !world.is_obstacle(p)));
    }

    #[test]
    fn test_astar_expands_no_more_than_ucs() {
        let world = GridWorld::new(10, 10);
        let ucs = search(&world, world.start(), world.goal(), Algorithm::Ucs).unwrap();
        let astar = search(&world, world.start(), world.goal(), Algorithm::AStar).unwrap();
        assert!(astar.nodes_expanded <= ucs.nodes_expanded);
    }

    #[test]
    fn test_trivial_path() {
        let world = GridWorld::new(1, 1);
        let result = search(&world, pos(0, 0), pos(0, 0), Algorithm::AStar).unwrap();
        assert_eq!(result.path, vec![pos(0, 0)]);
        assert_eq!(result.cost, 0.0);
    }

    #[test]
    fn test_walled_off_goal_has_no_path() {
        let mut world = GridWorld::new(3, 3);
        world.set_obstacle(pos(1, 2), true).unwrap();
        world.set_obstacle(pos(2, 1), true).unwrap();
        let err = search(&world, world.start(), world.goal(), Algorithm::Bfs).unwrap_err();
        assert!(matches!(err, PlanError::NoPath { .. }));
    }

    #[test]
    fn test_blocked_and_out_of_bounds_endpoints() {
        let mut world = GridWorld::new(3, 3);
        world.set_obstacle(pos(2, 2), true).unwrap();
        assert_eq!(
            search(&world, pos(0, 0), pos(2, 2), Algorithm::AStar),
            Err(PlanError::Blocked(pos(2, 2)))
        );
        assert_eq!(
            search(&world, pos(0, 0), pos(5, 0), Algorithm::AStar),
            Err(PlanError::OutOfBounds(pos(5, 0)))
        );
    }
}
