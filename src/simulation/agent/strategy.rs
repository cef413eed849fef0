//! Reasoning-mode selection.
//!
//! The hybrid agent picks one strategy per cycle from an ordered decision
//! table: the first row whose condition holds wins.
//!
//! | Row | Condition                               | Strategy      |
//! |-----|-----------------------------------------|---------------|
//! | 1   | confidence ratio > ratio threshold      | `Search`      |
//! | 2   | fact count > fact threshold             | `Logic`       |
//! | 3   | always                                  | `Probability` |

use std::fmt;

use crate::config::AgentConfig;

/// Reasoning mode used to propose move candidates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// Follow an A* plan toward the goal
    Search,
    /// Move only into cells the knowledge base proves free
    Logic,
    /// Move into any neighbor whose obstacle belief is low
    Probability,
}

impl Strategy {
    /// Returns all strategies in decision-table order.
    #[must_use]
    pub const fn all() -> [Strategy; 3] {
        [Strategy::Search, Strategy::Logic, Strategy::Probability]
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Search => "search",
            Self::Logic => "logic",
            Self::Probability => "probability",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the agent knows when choosing a strategy.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StrategyInputs {
    /// Fraction of believed cells that are confidently classified
    pub confidence_ratio: f64,
    /// Facts in the knowledge base, asserted plus derived
    pub fact_count: usize,
}

struct StrategyRule {
    strategy: Strategy,
    applies: fn(&StrategyInputs, &AgentConfig) -> bool,
}

fn map_is_well_known(inputs: &StrategyInputs, config: &AgentConfig) -> bool {
    inputs.confidence_ratio > config.confidence_ratio_threshold
}

fn knowledge_is_rich(inputs: &StrategyInputs, config: &AgentConfig) -> bool {
    inputs.fact_count > config.logic_fact_threshold
}

fn always(_: &StrategyInputs, _: &AgentConfig) -> bool {
    true
}

const STRATEGY_TABLE: [StrategyRule; 3] = [
    StrategyRule {
        strategy: Strategy::Search,
        applies: map_is_well_known,
    },
    StrategyRule {
        strategy: Strategy::Logic,
        applies: knowledge_is_rich,
    },
    StrategyRule {
        strategy: Strategy::Probability,
        applies: always,
    },
];

/// Picks the first strategy in the decision table whose condition holds.
#[must_use]
pub fn choose_strategy(inputs: &StrategyInputs, config: &AgentConfig) -> Strategy {
    STRATEGY_TABLE
        .iter()
        .find(|rule| (rule.applies)(inputs, config))
        .map_or(Strategy::Probability, |rule| rule.strategy)
}
