use std::time::Duration;

use slotmap::SlotMap;

use crate::graph::Graph;
use crate::movement::Mover;
use crate::pathfinding::PathCache;
use crate::types::*;

#[derive(Clone, Debug)]
pub struct Player {
    pub mover: Mover,
    pub spawn: NodeId,
    /// Whether the player has started a transit since the last (re)spawn.
    pub has_moved: bool,
}

/// Chase/Scatter toggle clock. Suspended while frightened; the remainder survives.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModeAlternation {
    Running { next_toggle_at: Duration },
    Suspended { remaining: Duration },
}

/// One-shot frightened deadline, tagged with the spawn generation that armed it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrightenedCountdown {
    pub deadline: Duration,
    pub generation: u64,
}

#[derive(Clone, Debug)]
pub struct Pursuer {
    pub id: PursuerId,
    pub style: ChaseStyle,
    pub spawn: NodeId,
    pub mover: Mover,
    pub mode: BehaviorMode,
    pub alternation: ModeAlternation,
    pub frightened: Option<FrightenedCountdown>,
    /// Bumped on every respawn or relocation so stale timers can be recognized.
    pub generation: u64,
    /// Cleared after (re)spawn until the player's first move of that life.
    pub released: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PursuerSpawn {
    pub node: usize,
    pub style: ChaseStyle,
}

/// Spawn points for one level, as node indices into the level topology.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LevelSpawns {
    pub player: usize,
    pub pursuers: Vec<PursuerSpawn>,
}

pub struct LevelState {
    pub graph: Graph,
    pub paths: PathCache,
    pub player: Player,
    pub pursuers: SlotMap<PursuerId, Pursuer>,
    pub phase: LevelPhase,
}

impl LevelState {
    pub fn pursuer_ids(&self) -> Vec<PursuerId> {
        self.pursuers.keys().collect()
    }
}
