pub mod agent;
pub mod environment;
pub mod episode;
pub mod inference;
pub mod params;
pub mod planning;
pub mod sensor;

pub use agent::{Agent, HybridAgent, ProbabilisticAgent, Strategy};
pub use environment::{GridWorld, Position};
pub use episode::{run_episode, EpisodeOutcome};
