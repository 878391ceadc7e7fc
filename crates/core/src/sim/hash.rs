//! Stable snapshot hashing for deterministic verification.
//! This module exists to keep hashing concerns separate from simulation control code.

use std::hash::Hasher;

use xxhash_rust::xxh3::Xxh3;

use super::*;

fn write_vec3(hasher: &mut Xxh3, value: Vec3) {
    hasher.write_u32(value.x.to_bits());
    hasher.write_u32(value.y.to_bits());
    hasher.write_u32(value.z.to_bits());
}

fn write_node(hasher: &mut Xxh3, node: Option<NodeId>) {
    match node {
        Some(node) => hasher.write_u64(node.index() as u64 + 1),
        None => hasher.write_u64(0),
    }
}

fn write_mover(hasher: &mut Xxh3, mover: &Mover) {
    write_vec3(hasher, mover.position());
    write_node(hasher, mover.current());
    write_node(hasher, mover.target());
    hasher.write_u32(mover.speed().to_bits());
}

impl Simulation {
    pub fn snapshot_hash(&self) -> u64 {
        let mut hasher = Xxh3::new();
        hasher.write_u64(self.seed);
        hasher.write_u64(self.tick);
        hasher.write_u128(self.now.as_nanos());
        let Some(level) = self.level.as_ref() else {
            return hasher.finish();
        };

        hasher.write_u8(match level.phase {
            LevelPhase::Running => 0,
            LevelPhase::AwaitingRespawn { .. } => 1,
        });
        write_mover(&mut hasher, &level.player.mover);
        hasher.write_u8(u8::from(level.player.has_moved));

        for pursuer in level.pursuers.values() {
            write_mover(&mut hasher, &pursuer.mover);
            hasher.write_u8(pursuer.style as u8);
            hasher.write_u8(pursuer.mode as u8);
            hasher.write_u8(u8::from(pursuer.released));
            hasher.write_u64(pursuer.generation);
            match pursuer.alternation {
                ModeAlternation::Running { next_toggle_at } => {
                    hasher.write_u8(0);
                    hasher.write_u128(next_toggle_at.as_nanos());
                }
                ModeAlternation::Suspended { remaining } => {
                    hasher.write_u8(1);
                    hasher.write_u128(remaining.as_nanos());
                }
            }
            match pursuer.frightened {
                Some(countdown) => {
                    hasher.write_u8(1);
                    hasher.write_u128(countdown.deadline.as_nanos());
                    hasher.write_u64(countdown.generation);
                }
                None => hasher.write_u8(0),
            }
        }
        hasher.finish()
    }
}
