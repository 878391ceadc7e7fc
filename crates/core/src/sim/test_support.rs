//! Shared test fixtures for the `sim` submodule test suites.
//! This module exists to avoid repeating topology and simulation setup across many tests.
//! It does not own production simulation logic.

use super::*;

pub(super) const TICK: Duration = Duration::from_millis(20);

/// Square 0-1-2-3-0 with ten-unit sides.
pub(super) fn cycle4() -> Topology {
    Topology {
        positions: vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(10.0, 0.0, 0.0),
            Vec3::new(10.0, 10.0, 0.0),
            Vec3::new(0.0, 10.0, 0.0),
        ],
        edges: vec![(0, 1), (1, 2), (2, 3), (3, 0)],
    }
}

/// Nodes along +x, ten units apart.
pub(super) fn line(len: usize) -> Topology {
    Topology {
        positions: (0..len).map(|i| Vec3::new(i as f32 * 10.0, 0.0, 0.0)).collect(),
        edges: (1..len).map(|i| (i - 1, i)).collect(),
    }
}

/// Center 0 with one arm per axis direction: 1 +x, 2 -x, 3 +y, 4 -y, 5 +z, 6 -z.
pub(super) fn star() -> Topology {
    let mut positions = vec![Vec3::ZERO];
    for axis in 0..3 {
        for sign in [1.0, -1.0] {
            let mut arm = [0.0; 3];
            arm[axis] = 10.0 * sign;
            positions.push(Vec3::new(arm[0], arm[1], arm[2]));
        }
    }
    Topology { positions, edges: (1..=6).map(|arm| (0, arm)).collect() }
}

/// Two disconnected pairs: 0-1 and 2-3.
pub(super) fn two_islands() -> Topology {
    Topology {
        positions: vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(10.0, 0.0, 0.0),
            Vec3::new(100.0, 0.0, 0.0),
            Vec3::new(110.0, 0.0, 0.0),
        ],
        edges: vec![(0, 1), (2, 3)],
    }
}

/// Appends one node with no edges; its id is the old node count.
pub(super) fn with_isolated(mut topology: Topology) -> Topology {
    topology.positions.push(Vec3::new(500.0, 500.0, 500.0));
    topology
}

/// `size`³ grid with ten-unit spacing; node id is `x + size * (y + size * z)`.
pub(super) fn lattice(size: usize) -> Topology {
    let index = |x: usize, y: usize, z: usize| x + size * (y + size * z);
    let mut positions = Vec::with_capacity(size * size * size);
    let mut edges = Vec::new();
    for z in 0..size {
        for y in 0..size {
            for x in 0..size {
                positions.push(Vec3::new(x as f32 * 10.0, y as f32 * 10.0, z as f32 * 10.0));
                if x + 1 < size {
                    edges.push((index(x, y, z), index(x + 1, y, z)));
                }
                if y + 1 < size {
                    edges.push((index(x, y, z), index(x, y + 1, z)));
                }
                if z + 1 < size {
                    edges.push((index(x, y, z), index(x, y, z + 1)));
                }
            }
        }
    }
    Topology { positions, edges }
}

/// Released from the start, no warm-up surprises inside short tests.
pub(super) fn eager_config() -> SimConfig {
    SimConfig { wait_for_first_move: false, warmup_secs: 60.0, ..SimConfig::default() }
}

pub(super) fn spawns(player: usize, pursuers: &[(usize, ChaseStyle)]) -> LevelSpawns {
    LevelSpawns {
        player,
        pursuers: pursuers.iter().map(|&(node, style)| PursuerSpawn { node, style }).collect(),
    }
}

pub(super) fn started_sim(
    config: SimConfig,
    topology: &Topology,
    spawns: &LevelSpawns,
) -> Simulation {
    let mut sim = Simulation::new(0xC0FFEE, config).expect("valid config");
    sim.start_level(topology, spawns).expect("level starts");
    sim
}

pub(super) fn first_pursuer(sim: &Simulation) -> PursuerId {
    sim.pursuer_ids()[0]
}

/// Steps one tick at a time until `done` holds. Returns whether it did within `max_ticks`.
pub(super) fn run_until(
    sim: &mut Simulation,
    max_ticks: u32,
    mut done: impl FnMut(&Simulation) -> bool,
) -> bool {
    for _ in 0..max_ticks {
        if done(sim) {
            return true;
        }
        sim.advance(TICK, 1);
    }
    done(sim)
}
