//! Hybrid decision agent.
//!
//! One call to [`HybridAgent::act`] runs a full decision cycle:
//!
//! ```text
//! perceive -> update beliefs -> reason -> choose strategy
//!          -> candidates (fallback: low-risk neighbors)
//!          -> drop backtrack -> score -> commit
//! ```
//!
//! Score of a candidate `c` (lower is better):
//!
//! ```text
//! manhattan(c, goal) + belief(c) × risk_weight + [c == previous] × backtrack_penalty
//! ```

use std::iter;

use log::{debug, info, warn};

use super::strategy::{choose_strategy, Strategy, StrategyInputs};
use super::{Agent, AgentState, ProbabilisticAgent};
use crate::config::AgentConfig;
use crate::simulation::environment::{GridWorld, Position};
use crate::simulation::inference::{BeliefMap, Fact, KnowledgeBase};
use crate::simulation::planning::{Planner, SearchPlanner};
use crate::simulation::sensor::{NoisySensor, Sensor};

/// Agent that fuses search, logic and probability into one move per step.
#[derive(Clone, Debug)]
pub struct HybridAgent<S: Sensor = NoisySensor, P: Planner = SearchPlanner> {
    probabilistic: ProbabilisticAgent<S>,
    knowledge: KnowledgeBase,
    planner: P,
    config: AgentConfig,
    state: AgentState,
}

impl<S: Sensor> HybridAgent<S> {
    /// Creates an agent with an A* planner and default thresholds.
    #[must_use]
    pub fn new(world: &GridWorld, sensor: S) -> Self {
        Self::with_config(world, sensor, AgentConfig::default())
    }

    /// Creates an agent with an A* planner and the given thresholds.
    #[must_use]
    pub fn with_config(world: &GridWorld, sensor: S, config: AgentConfig) -> Self {
        Self::with_parts(world, sensor, SearchPlanner::default(), config)
    }
}

impl<S: Sensor, P: Planner> HybridAgent<S, P> {
    /// Creates an agent from an explicit planner and thresholds.
    #[must_use]
    pub fn with_parts(world: &GridWorld, sensor: S, planner: P, config: AgentConfig) -> Self {
        let probabilistic =
            ProbabilisticAgent::new(world, sensor).with_risk_threshold(config.risk_threshold);
        Self {
            probabilistic,
            knowledge: KnowledgeBase::new(),
            planner,
            config,
            state: AgentState::new(world.start()),
        }
    }

    /// Obstacle beliefs for every cell.
    #[must_use]
    pub const fn beliefs(&self) -> &BeliefMap {
        self.probabilistic.beliefs()
    }

    /// Mutable access to the beliefs, for seeding prior knowledge.
    pub fn beliefs_mut(&mut self) -> &mut BeliefMap {
        self.probabilistic.beliefs_mut()
    }

    /// Asserted and derived facts.
    #[must_use]
    pub const fn knowledge(&self) -> &KnowledgeBase {
        &self.knowledge
    }

    /// Mutable access to the knowledge base, for registering rules.
    pub fn knowledge_mut(&mut self) -> &mut KnowledgeBase {
        &mut self.knowledge
    }

    /// Current and previous cell, last strategy.
    #[must_use]
    pub const fn state(&self) -> &AgentState {
        &self.state
    }

    /// Thresholds and weights in use.
    #[must_use]
    pub const fn config(&self) -> &AgentConfig {
        &self.config
    }

    /// Runs one decision cycle and moves the agent.
    ///
    /// Returns the new position, or `None` when no candidate survives. The
    /// agent stays put in that case.
    pub fn act(&mut self, world: &mut GridWorld) -> Option<Position> {
        let current = world.agent_position();
        self.state.position = current;
        let neighbors = world.neighbors(current);

        self.perceive(world, current, &neighbors);
        self.update_beliefs(world, current, &neighbors);
        let safe_moves = self.reason(&neighbors);

        let inputs = self.strategy_inputs();
        let strategy = choose_strategy(&inputs, &self.config);
        self.state.strategy = Some(strategy);
        debug!(
            "At {current}: strategy {strategy} (confidence ratio {:.2}, {} facts)",
            inputs.confidence_ratio, inputs.fact_count
        );

        let mut candidates = self.candidates(strategy, world, &safe_moves);
        if candidates.is_empty() && strategy != Strategy::Probability {
            debug!("No {strategy} candidates, falling back to probability");
            candidates = self.candidates(Strategy::Probability, world, &safe_moves);
        }
        if candidates.is_empty() {
            warn!("No safe moves found from {current}");
            return None;
        }

        self.filter_backtrack(&mut candidates);
        let (next, score) = self.select(&candidates, world.goal())?;

        if let Err(e) = world.set_agent_position(next) {
            warn!("Cannot move to {next}: {e}");
            return None;
        }
        self.state.commit(next);
        info!(
            "HybridAgent moving to {next} using {strategy} (score: {score:.2}, obstacle prob: {:.2})",
            self.beliefs().get(next)
        );
        Some(next)
    }

    /// Senses the current cell and its neighbors, asserting facts for
    /// confident beliefs.
    pub fn perceive(&mut self, world: &GridWorld, current: Position, neighbors: &[Position]) {
        for pos in iter::once(current).chain(neighbors.iter().copied()) {
            let belief = self.probabilistic.sense_and_update(world, pos);
            if belief > self.config.obstacle_threshold {
                self.knowledge.tell(Fact::obstacle(pos));
            } else if belief < self.config.free_threshold {
                self.knowledge.tell(Fact::free(pos));
            }
        }

        let contradictions = self.knowledge.contradictions();
        if !contradictions.is_empty() {
            warn!("Cells believed both free and blocked: {contradictions:?}");
        }
    }

    /// Takes a second reading of the current cell and its neighbors.
    ///
    /// Each reading is sampled afresh, so noise compounds rather than averages.
    pub fn update_beliefs(&mut self, world: &GridWorld, current: Position, neighbors: &[Position]) {
        for pos in iter::once(current).chain(neighbors.iter().copied()) {
            self.probabilistic.sense_and_update(world, pos);
        }
    }

    /// Runs inference and returns the neighbors known to be free.
    pub fn reason(&mut self, neighbors: &[Position]) -> Vec<Position> {
        let derived = self.knowledge.infer();
        if derived > 0 {
            debug!("Derived {derived} new facts");
        }
        neighbors
            .iter()
            .copied()
            .filter(|&p| self.knowledge.ask(&Fact::free(p)))
            .collect()
    }

    /// Current inputs to strategy selection.
    #[must_use]
    pub fn strategy_inputs(&self) -> StrategyInputs {
        StrategyInputs {
            confidence_ratio: self
                .beliefs()
                .confidence_ratio(self.config.obstacle_threshold, self.config.free_threshold),
            fact_count: self.knowledge.len(),
        }
    }

    /// Proposes moves from the agent's current cell using `strategy`.
    ///
    /// `safe_moves` are the neighbors the logic strategy may use.
    #[must_use]
    pub fn candidates(
        &self,
        strategy: Strategy,
        world: &GridWorld,
        safe_moves: &[Position],
    ) -> Vec<Position> {
        match strategy {
            Strategy::Search => self.search_candidates(world),
            Strategy::Logic => safe_moves.to_vec(),
            Strategy::Probability => self
                .probabilistic
                .low_risk(&world.neighbors(world.agent_position())),
        }
    }

    fn search_candidates(&self, world: &GridWorld) -> Vec<Position> {
        let result = match self.planner.plan(world, world.agent_position()) {
            Ok(result) => result,
            Err(e) => {
                debug!("Planner failed: {e}");
                return Vec::new();
            }
        };

        let risky = result
            .path
            .iter()
            .find(|&&p| self.beliefs().get(p) >= self.config.risk_threshold);
        if let Some(cell) = risky {
            debug!(
                "Rejecting {}-cell plan: {cell} has obstacle prob {:.2}",
                result.path.len(),
                self.beliefs().get(*cell)
            );
            return Vec::new();
        }

        result.path.get(1).copied().into_iter().collect()
    }

    /// Drops the previous cell when other candidates remain.
    pub fn filter_backtrack(&self, candidates: &mut Vec<Position>) {
        if let Some(previous) = self.state.previous {
            if candidates.len() > 1 {
                candidates.retain(|&c| c != previous);
            }
        }
    }

    /// Cost of moving to `candidate`; lower is better.
    #[must_use]
    pub fn score(&self, candidate: Position, goal: Position) -> f64 {
        let mut score = f64::from(candidate.manhattan(goal))
            + self.beliefs().get(candidate) * self.config.risk_weight;
        if self.state.previous == Some(candidate) {
            score += self.config.backtrack_penalty;
        }
        score
    }

    /// Lowest-scoring candidate. Ties keep the earliest candidate.
    #[must_use]
    pub fn select(&self, candidates: &[Position], goal: Position) -> Option<(Position, f64)> {
        let mut best: Option<(Position, f64)> = None;
        for &candidate in candidates {
            let score = self.score(candidate, goal);
            debug!("candidate {candidate}: score {score:.2}");
            if best.map_or(true, |(_, best_score)| score < best_score) {
                best = Some((candidate, score));
            }
        }
        best
    }
}

impl<S: Sensor, P: Planner> Agent for HybridAgent<S, P> {
    fn act(&mut self, world: &mut GridWorld) -> Option<Position> {
        HybridAgent::act(self, world)
    }

    fn strategy(&self) -> Option<Strategy> {
        self.state.strategy
    }
}
