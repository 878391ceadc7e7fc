//! Headless helpers shared by the `chase-sim` and `fuzz` binaries.
//! Stands in for the game's layout generator so the simulation can run without a renderer.

use std::io;

use chase_core::{ChaseStyle, LevelSpawns, PursuerSpawn, Topology, Vec3};
use rand_chacha::{ChaCha8Rng, rand_core::Rng};
use tracing_subscriber::EnvFilter;

/// Logs to stderr so JSON summaries on stdout stay machine-readable. `RUST_LOG` overrides.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(io::stderr)
        .init();
}

/// Uniform draw in `-1.0..=1.0`.
fn unit_offset(rng: &mut ChaCha8Rng) -> f32 {
    let bits = (rng.next_u64() >> 40) as f32 / (1u64 << 24) as f32;
    bits * 2.0 - 1.0
}

/// `parts`³ grid spanning `size` units per axis. Each node is nudged by up to `jitter` of a
/// cell along every axis; edges join axis neighbors only.
pub fn cubic_lattice(parts: usize, size: f32, jitter: f32, rng: &mut ChaCha8Rng) -> Topology {
    let parts = parts.max(2);
    let cell = size / (parts - 1) as f32;
    let index = |i: usize, j: usize, k: usize| k + parts * (j + parts * i);

    let mut topology = Topology::default();
    for i in 0..parts {
        for j in 0..parts {
            for k in 0..parts {
                let nudge = Vec3::new(unit_offset(rng), unit_offset(rng), unit_offset(rng));
                let base = Vec3::new(i as f32 * cell, j as f32 * cell, k as f32 * cell);
                topology.positions.push(base + nudge * (cell * jitter));
                if i + 1 < parts {
                    topology.edges.push((index(i, j, k), index(i + 1, j, k)));
                }
                if j + 1 < parts {
                    topology.edges.push((index(i, j, k), index(i, j + 1, k)));
                }
                if k + 1 < parts {
                    topology.edges.push((index(i, j, k), index(i, j, k + 1)));
                }
            }
        }
    }
    topology
}

/// Player at the grid center, pursuers on the corners, styles cycling Direct, Ambush, Shy.
/// A corner that coincides with the center (two nodes per axis) is skipped.
pub fn lattice_spawns(parts: usize, pursuers: usize) -> LevelSpawns {
    let parts = parts.max(2);
    let last = parts - 1;
    let index = |i: usize, j: usize, k: usize| k + parts * (j + parts * i);
    let player = index(parts / 2, parts / 2, parts / 2);
    let corners: Vec<usize> = [
        index(last, last, last),
        index(0, last, last),
        index(last, 0, last),
        index(last, last, 0),
        index(0, 0, last),
        index(0, last, 0),
        index(last, 0, 0),
    ]
    .into_iter()
    .filter(|&corner| corner != player)
    .collect();
    let styles = [ChaseStyle::Direct, ChaseStyle::Ambush, ChaseStyle::Shy];
    LevelSpawns {
        player,
        pursuers: (0..pursuers)
            .map(|n| PursuerSpawn { node: corners[n % corners.len()], style: styles[n % 3] })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use chase_core::Graph;
    use proptest::prelude::*;
    use rand_chacha::rand_core::SeedableRng;

    use super::*;

    #[test]
    fn lattice_has_grid_edge_count() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let topology = cubic_lattice(4, 120.0, 0.0, &mut rng);
        let graph = Graph::build(&topology).expect("lattice is valid");
        assert_eq!(graph.node_count(), 64);
        assert_eq!(graph.edge_count(), 3 * 4 * 4 * 3);
        assert_eq!(topology.positions[63], Vec3::new(120.0, 120.0, 120.0));
    }

    #[test]
    fn spawns_are_distinct_from_the_player() {
        let spawns = lattice_spawns(5, 4);
        assert_eq!(spawns.player, 62);
        assert!(spawns.pursuers.iter().all(|spawn| spawn.node != spawns.player));
        assert_eq!(spawns.pursuers[3].style, ChaseStyle::Direct);
    }

    #[test]
    fn smallest_lattice_keeps_pursuers_off_the_center() {
        for parts in 2..=6 {
            let spawns = lattice_spawns(parts, 7);
            assert!(
                spawns.pursuers.iter().all(|spawn| spawn.node != spawns.player),
                "parts = {parts}"
            );
        }
        let spawns = lattice_spawns(2, 1);
        assert_eq!(spawns.player, 7);
        assert_eq!(spawns.pursuers[0].node, 3);
    }

    proptest! {
        #[test]
        fn jitter_stays_inside_the_cell(seed in any::<u64>(), jitter in 0.0f32..0.45) {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let topology = cubic_lattice(3, 100.0, jitter, &mut rng);
            let cell = 50.0;
            for (n, position) in topology.positions.iter().enumerate() {
                let k = n % 3;
                let j = (n / 3) % 3;
                let i = n / 9;
                let base = Vec3::new(i as f32 * cell, j as f32 * cell, k as f32 * cell);
                let limit = cell * jitter + 1e-3;
                prop_assert!((position.x - base.x).abs() <= limit);
                prop_assert!((position.y - base.y).abs() <= limit);
                prop_assert!((position.z - base.z).abs() <= limit);
            }
        }
    }
}
