//! Bounded episode runner shared by every [`Agent`].

use log::info;

use crate::simulation::agent::{Agent, Strategy};
use crate::simulation::environment::{GridWorld, Position};

/// How an episode ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EpisodeOutcome {
    /// Moves actually made
    pub steps: usize,
    pub reached_goal: bool,
    pub final_position: Position,
    /// Strategy of the last cycle, for agents that choose one
    pub final_strategy: Option<Strategy>,
    /// True if the agent ran out of safe moves before the budget
    pub stalled: bool,
}

/// Drives `agent` until it reaches the goal, finds no safe move, or has
/// taken `max_steps` moves.
pub fn run_episode<A: Agent + ?Sized>(
    agent: &mut A,
    world: &mut GridWorld,
    max_steps: usize,
) -> EpisodeOutcome {
    let mut steps = 0;
    let mut stalled = false;

    while steps < max_steps && world.agent_position() != world.goal() {
        if agent.act(world).is_none() {
            stalled = true;
            break;
        }
        steps += 1;
    }

    let outcome = EpisodeOutcome {
        steps,
        reached_goal: world.agent_position() == world.goal(),
        final_position: world.agent_position(),
        final_strategy: agent.strategy(),
        stalled,
    };
    if outcome.reached_goal {
        info!("Goal {} reached in {steps} steps", world.goal());
    } else if stalled {
        info!("Stuck at {} after {steps} steps", outcome.final_position);
    } else {
        info!(
            "Step budget of {max_steps} exhausted at {}",
            outcome.final_position
        );
    }
    outcome
}
