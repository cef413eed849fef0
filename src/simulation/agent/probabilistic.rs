use log::{debug, info, warn};

use super::{Agent, AgentState};
use crate::simulation::environment::{GridWorld, Position};
use crate::simulation::inference::BeliefMap;
use crate::simulation::params::{PROBABILISTIC_BACKTRACK_PENALTY, RISK_THRESHOLD};
use crate::simulation::sensor::{NoisySensor, Sensor};

/// An agent that tracks obstacle beliefs with Bayes rule.
///
/// Owns the sensor and the belief map. On its own it greedily moves to the
/// low-risk neighbor closest to the goal; inside a [`HybridAgent`] it serves as
/// the belief component.
///
/// [`HybridAgent`]: super::HybridAgent
#[derive(Clone, Debug)]
pub struct ProbabilisticAgent<S: Sensor = NoisySensor> {
    sensor: S,
    beliefs: BeliefMap,
    state: AgentState,
    risk_threshold: f64,
}

impl<S: Sensor> ProbabilisticAgent<S> {
    /// Creates an agent at the world's start with beliefs seeded from `world`.
    #[must_use]
    pub fn new(world: &GridWorld, sensor: S) -> Self {
        Self {
            beliefs: BeliefMap::new(world, sensor.accuracy()),
            sensor,
            state: AgentState::new(world.start()),
            risk_threshold: RISK_THRESHOLD,
        }
    }

    /// Sets the belief at or above which a cell is avoided.
    #[must_use]
    pub fn with_risk_threshold(mut self, risk_threshold: f64) -> Self {
        self.risk_threshold = risk_threshold;
        self
    }

    #[must_use]
    pub const fn beliefs(&self) -> &BeliefMap {
        &self.beliefs
    }

    /// Mutable access to the beliefs, for seeding known cells.
    pub fn beliefs_mut(&mut self) -> &mut BeliefMap {
        &mut self.beliefs
    }

    #[must_use]
    pub const fn state(&self) -> &AgentState {
        &self.state
    }

    #[must_use]
    pub const fn risk_threshold(&self) -> f64 {
        self.risk_threshold
    }

    /// Takes one (noisy) reading of `pos` and folds it into the beliefs.
    ///
    /// Returns the posterior obstacle probability.
    pub fn sense_and_update(&mut self, world: &GridWorld, pos: Position) -> f64 {
        let reading = self.sensor.sense(world, pos);
        self.beliefs.update(pos, reading)
    }

    /// Keeps the cells whose obstacle belief is below the risk threshold.
    #[must_use]
    pub fn low_risk(&self, cells: &[Position]) -> Vec<Position> {
        cells
            .iter()
            .copied()
            .filter(|&p| self.beliefs.get(p) < self.risk_threshold)
            .collect()
    }

    /// Senses the current cell and its neighbors, then moves to the low-risk
    /// neighbor that minimizes belief plus distance to goal.
    pub fn act(&mut self, world: &mut GridWorld) -> Option<Position> {
        let current = world.agent_position();
        self.state.position = current;
        self.sense_and_update(world, current);

        let neighbors = world.neighbors(current);
        for &neighbor in &neighbors {
            self.sense_and_update(world, neighbor);
        }
        let safe_moves = self.low_risk(&neighbors);
        if safe_moves.is_empty() {
            warn!("No safe moves found from {current}");
            return None;
        }

        let goal = world.goal();
        let mut best: Option<(Position, f64)> = None;
        for candidate in safe_moves {
            let mut score = self.beliefs.get(candidate) + f64::from(candidate.manhattan(goal));
            if self.state.previous == Some(candidate) {
                score += PROBABILISTIC_BACKTRACK_PENALTY;
            }
            debug!("candidate {candidate}: score {score:.2}");
            if best.map_or(true, |(_, best_score)| score < best_score) {
                best = Some((candidate, score));
            }
        }
        let (next, score) = best?;

        if let Err(e) = world.set_agent_position(next) {
            warn!("Cannot move to {next}: {e}");
            return None;
        }
        self.state.commit(next);
        info!(
            "ProbabilisticAgent moving to {next} (score: {score:.2}, obstacle prob: {:.2})",
            self.beliefs.get(next)
        );
        Some(next)
    }
}

impl<S: Sensor> Agent for ProbabilisticAgent<S> {
    fn act(&mut self, world: &mut GridWorld) -> Option<Position> {
        ProbabilisticAgent::act(self, world)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_moves_toward_goal_on_open_grid() {
        let mut world = GridWorld::new(3, 3);
        let mut agent = ProbabilisticAgent::new(&world, NoisySensor::perfect());

        let next = agent.act(&mut world).unwrap();

        assert_eq!(next.manhattan(world.goal()), 3);
        assert_eq!(world.agent_position(), next);
        assert_eq!(agent.state().previous, Some(world.start()));
    }

    #[test]
    fn test_avoids_sensed_obstacles() {
        let mut world = GridWorld::new(3, 3);
        world.set_obstacle(Position::new(1, 0), true).unwrap();
        let mut agent = ProbabilisticAgent::new(&world, NoisySensor::perfect());

        assert_eq!(agent.act(&mut world), Some(Position::new(0, 1)));
        assert_eq!(agent.beliefs().get(Position::new(1, 0)), 1.0);
    }

    #[test]
    fn test_boxed_in_reports_no_move() {
        let mut world = GridWorld::new(3, 3);
        world.set_obstacle(Position::new(1, 0), true).unwrap();
        world.set_obstacle(Position::new(0, 1), true).unwrap();
        let mut agent = ProbabilisticAgent::new(&world, NoisySensor::perfect());

        assert_eq!(agent.act(&mut world), None);
        assert_eq!(world.agent_position(), world.start());
    }
}
