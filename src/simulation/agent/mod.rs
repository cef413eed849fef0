//! Grid-world agents.
//!
//! - [`ProbabilisticAgent`]: Bayesian beliefs and risk-aware greedy moves
//! - [`HybridAgent`]: fuses search plans, logical safe moves and beliefs

mod hybrid;
mod probabilistic;
mod strategy;

pub use hybrid::HybridAgent;
pub use probabilistic::ProbabilisticAgent;
pub use strategy::{choose_strategy, Strategy, StrategyInputs};

use crate::simulation::environment::{GridWorld, Position};

/// Something that can take one step in a grid world.
pub trait Agent {
    /// Runs one decision cycle and moves the agent.
    ///
    /// Returns the new position, or `None` when no safe move exists.
    fn act(&mut self, world: &mut GridWorld) -> Option<Position>;

    /// Strategy used in the most recent cycle, for agents that have one.
    fn strategy(&self) -> Option<Strategy> {
        None
    }
}

/// Position bookkeeping owned by an agent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AgentState {
    /// Current cell
    pub position: Position,
    /// Cell occupied before the last move
    pub previous: Option<Position>,
    /// Strategy chosen in the most recent cycle
    pub strategy: Option<Strategy>,
}

impl AgentState {
    #[must_use]
    pub const fn new(position: Position) -> Self {
        Self {
            position,
            previous: None,
            strategy: None,
        }
    }

    /// Records a move: the current cell becomes the previous one.
    pub fn commit(&mut self, next: Position) {
        self.previous = Some(self.position);
        self.position = next;
    }
}
