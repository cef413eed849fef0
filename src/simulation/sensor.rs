//! Noisy binary obstacle sensing.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::simulation::environment::{GridWorld, Position};
use crate::simulation::params::SENSOR_ACCURACY;

/// Source of obstacle readings for a single cell.
pub trait Sensor {
    /// Returns true if the sensor reports an obstacle at `pos`.
    fn sense(&mut self, world: &GridWorld, pos: Position) -> bool;

    /// Probability that a reading matches ground truth.
    fn accuracy(&self) -> f64;
}

/// Reports ground truth with probability `accuracy`, the inverted truth otherwise.
#[derive(Clone, Debug)]
pub struct NoisySensor {
    accuracy: f64,
    rng: StdRng,
}

impl Default for NoisySensor {
    fn default() -> Self {
        Self::new(SENSOR_ACCURACY)
    }
}

impl NoisySensor {
    /// Creates a sensor seeded from the operating system.
    #[must_use]
    pub fn new(accuracy: f64) -> Self {
        Self {
            accuracy: accuracy.clamp(0.0, 1.0),
            rng: StdRng::from_os_rng(),
        }
    }

    /// Creates a sensor with a reproducible noise sequence.
    #[must_use]
    pub fn with_seed(accuracy: f64, seed: u64) -> Self {
        Self {
            accuracy: accuracy.clamp(0.0, 1.0),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// A sensor that never errs.
    #[must_use]
    pub fn perfect() -> Self {
        Self::with_seed(1.0, 0)
    }
}

impl Sensor for NoisySensor {
    fn sense(&mut self, world: &GridWorld, pos: Position) -> bool {
        let truth = world.is_obstacle(pos);
        if self.rng.random::<f64>() < self.accuracy {
            truth
        } else {
            !truth
        }
    }

    fn accuracy(&self) -> f64 {
        self.accuracy
    }
}
