use std::f32::consts::TAU;
use std::time::Duration;

use chase_core::{
    AdvanceStopReason, BehaviorMode, ChaseStyle, EncounterOutcome, LevelSpawns, NodeId,
    PursuerSpawn, SimConfig, SimEvent, Simulation, Topic, Topology, Vec3,
};

const TICK: Duration = Duration::from_millis(16);

/// Ring of `len` nodes with a spoke from every fourth node to a shared hub at the end.
fn hub_ring(len: usize) -> Topology {
    let mut topology = Topology::default();
    for i in 0..len {
        let angle = i as f32 / len as f32 * TAU;
        topology.positions.push(Vec3::new(angle.cos() * 100.0, angle.sin() * 100.0, 0.0));
        topology.edges.push((i, (i + 1) % len));
    }
    topology.positions.push(Vec3::ZERO);
    for i in (0..len).step_by(4) {
        topology.edges.push((i, len));
    }
    topology
}

fn three_styles(nodes: &[usize; 3]) -> Vec<PursuerSpawn> {
    let styles = [ChaseStyle::Direct, ChaseStyle::Ambush, ChaseStyle::Shy];
    nodes.iter().zip(styles).map(|(&node, style)| PursuerSpawn { node, style }).collect()
}

fn run_until_caught(sim: &mut Simulation, max_ticks: u32) -> Option<u32> {
    let result = sim.advance(TICK, max_ticks);
    match result.stop_reason {
        AdvanceStopReason::LifeLost { .. } => Some(result.simulated_ticks),
        _ => None,
    }
}

#[test]
fn test_smoke_idle_player_is_caught() {
    let config = SimConfig { contact_radius: 3.0, wait_for_first_move: false, ..SimConfig::default() };
    let mut sim = Simulation::new(12345, config).expect("config");
    let spawns = LevelSpawns { player: 0, pursuers: three_styles(&[10, 11, 12]) };
    sim.start_level(&hub_ring(16), &spawns).expect("level");

    let ticks = run_until_caught(&mut sim, 20_000);
    assert!(ticks.is_some(), "somebody should reach a stationary player");
    assert!(sim.events().iter().any(|event| matches!(
        event,
        SimEvent::EncounterResolved { outcome: EncounterOutcome::LifeLost, .. }
    )));
}

#[test]
fn test_smoke_full_life_cycle() {
    let config = SimConfig { contact_radius: 3.0, ..SimConfig::default() };
    let mut sim = Simulation::new(99, config).expect("config");
    let spawns = LevelSpawns { player: 0, pursuers: three_styles(&[8, 9, 16]) };
    sim.start_level(&hub_ring(16), &spawns).expect("level");
    assert_eq!(sim.subscriber_count(Topic::PowerPickup), 3);

    assert_eq!(sim.advance(TICK, 100).simulated_ticks, 100);
    for id in sim.pursuer_ids() {
        let pursuer = sim.pursuer(id).expect("pursuer");
        assert!(pursuer.mover.is_idle(), "pursuers wait for the first move");
    }

    sim.move_player(NodeId(1)).expect("first move");
    sim.power_pickup_collected().expect("pickup");
    for id in sim.pursuer_ids() {
        assert_eq!(sim.pursuer(id).expect("pursuer").mode, BehaviorMode::Frightened);
    }

    let id = sim.pursuer_ids()[0];
    let outcome = sim.report_contact(id).expect("contact");
    assert!(matches!(outcome, EncounterOutcome::PursuerCaught { .. }));
    assert_eq!(sim.pursuer(id).expect("pursuer").mode, BehaviorMode::Chase);

    if run_until_caught(&mut sim, 30_000).is_some() {
        sim.life_lost().expect("respawn");
        assert_eq!(sim.player().and_then(|player| player.mover.current()), Some(NodeId(0)));
    }

    sim.end_level();
    assert_eq!(sim.subscriber_count(Topic::PowerPickup), 0);
    assert!(matches!(sim.advance(TICK, 1).stop_reason, AdvanceStopReason::NoLevel));
}

#[test]
fn test_smoke_levels_restart_cleanly() {
    let mut sim = Simulation::new(5, SimConfig::default()).expect("config");
    for round in 0..3 {
        let spawns = LevelSpawns { player: round, pursuers: three_styles(&[6, 7, 16]) };
        sim.start_level(&hub_ring(16), &spawns).expect("level");
        assert_eq!(sim.subscriber_count(Topic::PlayerFirstMove), 3);
        sim.advance(TICK, 10);
    }
    let starts = sim
        .events()
        .iter()
        .filter(|event| matches!(event, SimEvent::LevelStarted { .. }))
        .count();
    let ends = sim.events().iter().filter(|event| **event == SimEvent::LevelEnded).count();
    assert_eq!((starts, ends), (3, 2));
}
