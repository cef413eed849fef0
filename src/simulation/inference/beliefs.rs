//! Per-cell obstacle beliefs.
//!
//! Each cell holds the posterior probability that it is an obstacle, refined by
//! Bayes rule from repeated noisy binary readings.

use super::bayes;
use crate::simulation::environment::{GridWorld, Position};
use crate::simulation::params::{KNOWN_FREE_PRIOR, SENSOR_ACCURACY, UNKNOWN_PRIOR};

/// Belief about a single grid cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CellBelief {
    /// Posterior probability of an obstacle
    pub probability: f64,
    /// Number of readings folded into this cell
    pub observations: u32,
}

impl Default for CellBelief {
    fn default() -> Self {
        Self {
            probability: UNKNOWN_PRIOR,
            observations: 0,
        }
    }
}

impl CellBelief {
    /// Creates a cell with a fixed prior and no observations.
    #[must_use]
    pub const fn with_prior(probability: f64) -> Self {
        Self {
            probability,
            observations: 0,
        }
    }

    /// Folds a new reading into the cell and returns the posterior.
    pub fn update(&mut self, reading: bool, accuracy: f64) -> f64 {
        self.observations = self.observations.saturating_add(1);
        self.probability = bayes::posterior(self.probability, reading, accuracy);
        self.probability
    }

    /// True if the belief lies strictly outside `(low, high)`.
    #[must_use]
    pub fn is_confident(&self, high: f64, low: f64) -> bool {
        self.probability > high || self.probability < low
    }
}

/// A 2D grid of obstacle beliefs matching a [`GridWorld`].
///
/// Every cell starts at the maximal-uncertainty prior except start and goal,
/// which are known to be free.
#[derive(Clone, Debug)]
pub struct BeliefMap {
    cells: Vec<CellBelief>,
    width: usize,
    height: usize,
    accuracy: f64,
}

impl BeliefMap {
    /// Creates beliefs for every cell of `world`.
    #[must_use]
    pub fn new(world: &GridWorld, accuracy: f64) -> Self {
        let mut map = Self {
            cells: vec![CellBelief::default(); world.width() * world.height()],
            width: world.width(),
            height: world.height(),
            accuracy,
        };
        for known_free in [world.start(), world.goal()] {
            if let Some(cell) = map.cell_mut(known_free) {
                *cell = CellBelief::with_prior(KNOWN_FREE_PRIOR);
            }
        }
        map
    }

    /// Creates beliefs with the default sensor accuracy.
    #[must_use]
    pub fn with_default_accuracy(world: &GridWorld) -> Self {
        Self::new(world, SENSOR_ACCURACY)
    }

    fn index(&self, pos: Position) -> Option<usize> {
        let row = usize::try_from(pos.row).ok()?;
        let col = usize::try_from(pos.col).ok()?;
        (row < self.height && col < self.width).then_some(row * self.width + col)
    }

    /// Returns the cell belief, if the position is on the map.
    #[must_use]
    pub fn cell(&self, pos: Position) -> Option<&CellBelief> {
        self.index(pos).map(|i| &self.cells[i])
    }

    fn cell_mut(&mut self, pos: Position) -> Option<&mut CellBelief> {
        self.index(pos).map(|i| &mut self.cells[i])
    }

    /// Obstacle probability at `pos`; off-map positions read as maximal uncertainty.
    #[must_use]
    pub fn get(&self, pos: Position) -> f64 {
        self.cell(pos).map_or(UNKNOWN_PRIOR, |c| c.probability)
    }

    /// Overwrites the belief at `pos`. Off-map positions are ignored.
    pub fn set(&mut self, pos: Position, probability: f64) {
        if let Some(cell) = self.cell_mut(pos) {
            cell.probability = probability.clamp(0.0, 1.0);
        }
    }

    /// Folds a sensor reading into the belief at `pos` and returns the posterior.
    ///
    /// Off-map positions are not stored; the posterior from the uncertain prior
    /// is returned.
    pub fn update(&mut self, pos: Position, reading: bool) -> f64 {
        let accuracy = self.accuracy;
        match self.cell_mut(pos) {
            Some(cell) => {
                let posterior = cell.update(reading, accuracy);
                log::trace!("belief {pos} <- {posterior:.3} (reading: {reading})");
                posterior
            }
            None => bayes::posterior(UNKNOWN_PRIOR, reading, accuracy),
        }
    }

    #[must_use]
    pub const fn accuracy(&self) -> f64 {
        self.accuracy
    }

    /// Number of cells holding a belief.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Number of cells whose belief lies above `high` or below `low`.
    #[must_use]
    pub fn confident_count(&self, high: f64, low: f64) -> usize {
        self.cells
            .iter()
            .filter(|c| c.is_confident(high, low))
            .count()
    }

    /// Fraction of believed cells that are confidently classified.
    ///
    /// An empty map has ratio 0.
    #[must_use]
    #[allow(clippy::cast_precision_loss)] // Grid sizes are small
    pub fn confidence_ratio(&self, high: f64, low: f64) -> f64 {
        if self.cells.is_empty() {
            return 0.0;
        }
        self.confident_count(high, low) as f64 / self.cells.len() as f64
    }

    /// Total readings folded into the map.
    #[must_use]
    pub fn total_observations(&self) -> u64 {
        self.cells.iter().map(|c| u64::from(c.observations)).sum()
    }
}
