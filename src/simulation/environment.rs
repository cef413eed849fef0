use std::fmt;

use rand::Rng;

use crate::error::{Result, RoboMindError};

/// A grid cell, addressed by row and column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub row: i32,
    pub col: i32,
}

impl Position {
    #[must_use]
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Manhattan (L1) distance to another cell.
    #[must_use]
    pub const fn manhattan(self, other: Position) -> u32 {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }
}

impl From<(i32, i32)> for Position {
    fn from((row, col): (i32, i32)) -> Self {
        Self::new(row, col)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Represents the simulation environment (the grid world).
///
/// Holds the ground-truth occupancy of every cell, the start and goal cells and
/// the agent's current position. Agents never read occupancy directly; they
/// perceive it through a [`Sensor`](crate::simulation::sensor::Sensor).
#[derive(Clone, Debug)]
pub struct GridWorld {
    width: usize,
    height: usize,
    obstacles: Vec<bool>,
    start: Position,
    goal: Position,
    agent_position: Position,
}

impl GridWorld {
    /// Creates an obstacle-free grid with start at the top-left corner and goal
    /// at the bottom-right corner.
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        let start = Position::new(0, 0);
        let goal = Position::new(
            i32::try_from(height.saturating_sub(1)).unwrap_or(i32::MAX),
            i32::try_from(width.saturating_sub(1)).unwrap_or(i32::MAX),
        );
        Self {
            width,
            height,
            obstacles: vec![false; width * height],
            start,
            goal,
            agent_position: start,
        }
    }

    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    #[must_use]
    pub const fn start(&self) -> Position {
        self.start
    }

    #[must_use]
    pub const fn goal(&self) -> Position {
        self.goal
    }

    #[must_use]
    pub const fn agent_position(&self) -> Position {
        self.agent_position
    }

    /// Returns true if the position lies inside the grid.
    #[must_use]
    pub fn in_bounds(&self, pos: Position) -> bool {
        self.index(pos).is_some()
    }

    fn index(&self, pos: Position) -> Option<usize> {
        let row = usize::try_from(pos.row).ok()?;
        let col = usize::try_from(pos.col).ok()?;
        (row < self.height && col < self.width).then_some(row * self.width + col)
    }

    fn checked_index(&self, pos: Position) -> Result<usize> {
        self.index(pos).ok_or(RoboMindError::OutOfBounds {
            position: pos,
            width: self.width,
            height: self.height,
        })
    }

    /// Ground truth occupancy. Cells outside the grid count as obstacles.
    #[must_use]
    pub fn is_obstacle(&self, pos: Position) -> bool {
        self.index(pos).map_or(true, |i| self.obstacles[i])
    }

    /// In-bounds 4-connected neighbors in a fixed order: up, down, left, right.
    #[must_use]
    pub fn neighbors(&self, pos: Position) -> Vec<Position> {
        [(-1, 0), (1, 0), (0, -1), (0, 1)]
            .into_iter()
            .map(|(dr, dc)| Position::new(pos.row + dr, pos.col + dc))
            .filter(|&p| self.in_bounds(p))
            .collect()
    }

    /// Every in-bounds position, row-major.
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.height).flat_map(move |row| {
            (0..self.width).map(move |col| {
                Position::new(
                    i32::try_from(row).unwrap_or(i32::MAX),
                    i32::try_from(col).unwrap_or(i32::MAX),
                )
            })
        })
    }

    /// Marks or clears an obstacle.
    pub fn set_obstacle(&mut self, pos: Position, blocked: bool) -> Result<()> {
        let i = self.checked_index(pos)?;
        self.obstacles[i] = blocked;
        Ok(())
    }

    pub fn set_start(&mut self, pos: Position) -> Result<()> {
        self.checked_index(pos)?;
        self.start = pos;
        Ok(())
    }

    pub fn set_goal(&mut self, pos: Position) -> Result<()> {
        self.checked_index(pos)?;
        self.goal = pos;
        Ok(())
    }

    pub fn set_agent_position(&mut self, pos: Position) -> Result<()> {
        self.checked_index(pos)?;
        self.agent_position = pos;
        Ok(())
    }

    /// Moves the agent back to the start cell.
    pub fn reset(&mut self) {
        self.agent_position = self.start;
    }

    #[must_use]
    pub fn obstacle_count(&self) -> usize {
        self.obstacles.iter().filter(|&&b| b).count()
    }

    /// Places up to `count` obstacles on random free cells, never on start or goal.
    ///
    /// Returns the number of obstacles actually placed.
    pub fn add_random_obstacles(&mut self, count: usize, rng: &mut impl Rng) -> usize {
        let mut free: Vec<usize> = self
            .positions()
            .filter(|&p| p != self.start && p != self.goal && !self.is_obstacle(p))
            .filter_map(|p| self.index(p))
            .collect();

        let mut placed = 0;
        while placed < count && !free.is_empty() {
            let i = free.swap_remove(rng.random_range(0..free.len()));
            self.obstacles[i] = true;
            placed += 1;
        }
        placed
    }
}
