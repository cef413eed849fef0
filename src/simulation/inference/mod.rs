//! Belief and knowledge maintenance.
//!
//! - Bayesian obstacle beliefs per cell, updated from noisy binary readings
//! - A forward-chaining knowledge base of typed cell facts
//!
//! ```text
//! posterior = P(reading | obstacle) × prior / P(reading)
//! ```

pub mod bayes;
mod beliefs;
mod knowledge;

pub use bayes::{bayes_update, compute_evidence, posterior, sensor_likelihoods};
pub use beliefs::{BeliefMap, CellBelief};
pub use knowledge::{Fact, FactKind, KnowledgeBase, Rule};
