use robomind::config::AgentConfig;
use robomind::simulation::agent::{Agent, HybridAgent, ProbabilisticAgent, Strategy};
use robomind::simulation::environment::{GridWorld, Position};
use robomind::simulation::inference::{Fact, Rule};
use robomind::simulation::sensor::NoisySensor;

fn pos(row: i32, col: i32) -> Position {
    Position::new(row, col)
}

/// 3x3 grid where only (0, 0), (0, 1) and the goal are free.
fn dead_end_world() -> GridWorld {
    let mut world = GridWorld::new(3, 3);
    for cell in [(0, 2), (1, 0), (1, 1), (1, 2), (2, 0), (2, 1)] {
        world.set_obstacle(cell.into(), true).unwrap();
    }
    world
}

#[test]
fn test_start_and_goal_beliefs_are_zero() {
    let world = GridWorld::new(8, 8);
    let agent = HybridAgent::new(&world, NoisySensor::default());
    assert_eq!(agent.beliefs().get(world.start()), 0.0);
    assert_eq!(agent.beliefs().get(world.goal()), 0.0);
    assert_eq!(agent.beliefs().len(), 64);
}

#[test]
fn test_open_grid_move_approaches_goal() {
    let mut world = GridWorld::new(3, 3);
    let mut agent = HybridAgent::new(&world, NoisySensor::perfect());

    let search = agent.candidates(Strategy::Search, &world, &[]);
    assert!(!search.is_empty());

    let before = world.agent_position().manhattan(world.goal());
    let next = agent.act(&mut world).unwrap();

    assert!(next.manhattan(world.goal()) < before);
    assert_eq!(world.agent_position(), next);
    assert_eq!(agent.state().previous, Some(pos(0, 0)));
}

#[test]
fn test_dead_end_forces_backtrack() {
    let mut world = dead_end_world();
    let mut agent = HybridAgent::new(&world, NoisySensor::perfect());

    assert_eq!(agent.act(&mut world), Some(pos(0, 1)));
    assert_eq!(agent.strategy(), Some(Strategy::Probability));
    assert!(agent.knowledge().ask(&Fact::obstacle(pos(1, 0))));
    assert!(!agent.knowledge().ask(&Fact::obstacle(pos(1, 1))));

    assert_eq!(agent.act(&mut world), Some(pos(0, 0)));
    assert_eq!(agent.state().previous, Some(pos(0, 1)));

    // Every neighbor of (0, 1) except the previous cell is a known obstacle
    assert!(agent.knowledge().ask(&Fact::obstacle(pos(1, 1))));
    assert!(agent.knowledge().ask(&Fact::obstacle(pos(0, 2))));
    assert!(agent.beliefs().get(pos(1, 1)) >= 0.9);
    assert!(agent.beliefs().get(pos(0, 2)) >= 0.9);
}

#[test]
fn test_single_cell_world_has_no_move() {
    let mut world = GridWorld::new(1, 1);
    let mut agent = HybridAgent::new(&world, NoisySensor::perfect());

    assert_eq!(agent.act(&mut world), None);
    // Every cell is known, so search was chosen and came up empty
    assert_eq!(agent.strategy(), Some(Strategy::Search));
    assert_eq!(world.agent_position(), pos(0, 0));
}

#[test]
fn test_boxed_in_agent_stays_put() {
    let mut world = GridWorld::new(3, 3);
    world.set_obstacle(pos(1, 0), true).unwrap();
    world.set_obstacle(pos(0, 1), true).unwrap();
    let mut agent = HybridAgent::new(&world, NoisySensor::perfect());

    assert_eq!(agent.act(&mut world), None);
    assert_eq!(world.agent_position(), world.start());
    assert_eq!(agent.state().previous, None);
}

#[test]
fn test_strategy_cascade_on_open_grid() {
    let mut world = GridWorld::new(4, 4);
    let mut agent = HybridAgent::new(&world, NoisySensor::perfect());

    // Few facts and low confidence
    agent.act(&mut world).unwrap();
    assert_eq!(agent.strategy(), Some(Strategy::Probability));

    // Facts pile up faster than the map fills in
    agent.act(&mut world).unwrap();
    agent.act(&mut world).unwrap();
    assert_eq!(agent.strategy(), Some(Strategy::Logic));

    let mut steps = 3;
    while world.agent_position() != world.goal() && steps < 20 {
        agent.act(&mut world).unwrap();
        steps += 1;
    }
    assert_eq!(steps, 6);
}

#[test]
fn test_custom_thresholds_are_honored() {
    let mut world = GridWorld::new(3, 3);
    let config = AgentConfig {
        confidence_ratio_threshold: 0.0,
        ..AgentConfig::default()
    };
    let mut agent = HybridAgent::with_config(&world, NoisySensor::perfect(), config);

    agent.act(&mut world).unwrap();

    assert_eq!(agent.strategy(), Some(Strategy::Search));
    assert!((agent.config().confidence_ratio_threshold).abs() < f64::EPSILON);
}

#[test]
fn test_registered_rules_fire_during_act() {
    let mut world = GridWorld::new(3, 3);
    let mut agent = HybridAgent::new(&world, NoisySensor::perfect());
    agent
        .knowledge_mut()
        .add_rule(Rule::new(vec![Fact::free(pos(0, 1))], Fact::safe(pos(0, 1))));

    agent.act(&mut world).unwrap();

    assert!(agent.knowledge().ask(&Fact::safe(pos(0, 1))));
}

#[test]
fn test_probabilistic_agent_prefers_forward_moves() {
    let mut world = GridWorld::new(3, 3);
    let mut agent = ProbabilisticAgent::new(&world, NoisySensor::perfect());

    assert_eq!(agent.act(&mut world), Some(pos(1, 0)));
    // (0, 0) scores 4 + 1 penalty; (2, 0) and (1, 1) score 2
    assert_eq!(agent.act(&mut world), Some(pos(2, 0)));
    assert_eq!(Agent::strategy(&agent), None);
}

#[test]
fn test_probabilistic_agent_respects_risk_threshold() {
    let mut world = GridWorld::new(3, 3);
    let mut agent = ProbabilisticAgent::new(&world, NoisySensor::perfect()).with_risk_threshold(0.0);

    // Nothing is strictly below zero risk
    assert_eq!(agent.act(&mut world), None);
}
